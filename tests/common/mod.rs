#![allow(dead_code)]

use fretforge::config::{Config, FingeringWeights};
use fretforge::fretboard::{assignment_cost, CandidateIndex, EventAssignment, PositionCandidate};
use fretforge::geometry::{Fret, InstrumentGeometry, Tuning};
use fretforge::pitch::{parse_label, PitchClass};
use fretforge::resolver::{TabEvent, TabNote};
use fretforge::Fretboard;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Caller metadata that must survive every transform untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarMeta {
    pub bar: usize,
    pub tick: u32,
}

pub fn guitar() -> Tuning {
    Tuning::standard_guitar()
}

pub fn guitar_index() -> CandidateIndex {
    CandidateIndex::build(&guitar(), 24).expect("standard guitar index")
}

pub fn board() -> Fretboard {
    Fretboard::new(guitar(), 24, Config::default()).expect("standard guitar board")
}

pub fn event(bar: usize, notes: Vec<TabNote>) -> TabEvent<BarMeta> {
    TabEvent::new(
        BarMeta {
            bar,
            tick: bar as u32 * 480,
        },
        notes,
    )
}

/// One event per label, no positions.
pub fn melody(labels: &[&str]) -> Vec<TabEvent<BarMeta>> {
    labels
        .iter()
        .enumerate()
        .map(|(i, l)| event(i, vec![TabNote::new(l)]))
        .collect()
}

pub fn pos(tuning: &Tuning, string_id: &str, fret: Fret) -> PositionCandidate {
    PositionCandidate {
        string_id: string_id.to_string(),
        fret,
        string_index: tuning.string_index(string_id).expect("known string"),
    }
}

/// An assignment holding `positions`, costed with `weights`.
pub fn assignment(positions: Vec<PositionCandidate>, weights: &FingeringWeights) -> EventAssignment {
    let cost = assignment_cost(&positions, weights);
    let mut a = EventAssignment::unresolved(0, weights);
    a.positions = positions;
    a.internal_cost = cost.cost;
    a.hand_position = cost.hand_position;
    a
}

pub fn assert_no_string_collisions<M>(events: &[TabEvent<M>]) {
    for (i, e) in events.iter().enumerate() {
        let mut seen = HashSet::new();
        for n in &e.notes {
            if let Some(s) = &n.string_id {
                assert!(seen.insert(s.clone()), "event {} uses string {} twice", i, s);
            }
        }
    }
}

/// Every positioned note sounds what its label names: the exact pitch when the
/// label has an octave, the class otherwise.
pub fn assert_pitch_fidelity<M>(events: &[TabEvent<M>], tuning: &Tuning) {
    for e in events {
        for n in &e.notes {
            if let (Some(s), Some(f)) = (&n.string_id, n.fret) {
                let pitch = tuning.pitch_at(s, f).expect("position exists on instrument");
                if let Some(parsed) = parse_label(&n.label) {
                    assert_eq!(
                        PitchClass::of(pitch),
                        parsed.class,
                        "{} placed at {}:{} sounds {}",
                        n.label,
                        s,
                        f,
                        PitchClass::of(pitch)
                    );
                    if let Some(required) = parsed.pitch() {
                        assert_eq!(pitch, required, "{} placed at {}:{} sounds {}", n.label, s, f, pitch);
                    }
                }
            }
        }
    }
}

pub fn sounding(tuning: &Tuning, note: &TabNote) -> Option<i32> {
    tuning.pitch_at(note.string_id.as_deref()?, note.fret?)
}

pub type TabEventMeta = TabEvent<BarMeta>;
