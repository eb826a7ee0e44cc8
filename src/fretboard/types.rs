use super::candidates::PositionCandidate;
use crate::config::FingeringWeights;
use crate::geometry::{Fret, StringId};
use crate::pitch::{Pitch, PitchClass};
use serde::{Deserialize, Serialize};

/// The pitch an occurrence has to sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PitchTarget {
    /// A specific pitch in a specific octave.
    Exact(Pitch),
    /// Any octave of the class will do.
    Class(PitchClass),
}

impl PitchTarget {
    pub fn class(&self) -> PitchClass {
        match *self {
            PitchTarget::Exact(p) => PitchClass::of(p),
            PitchTarget::Class(c) => c,
        }
    }

    /// Search order key. Exact pitches sort above bare classes, so fixed and
    /// octave-specific notes are placed before the free ones.
    pub fn ordering_key(&self) -> i32 {
        match *self {
            PitchTarget::Exact(p) => p,
            PitchTarget::Class(c) => c.semitone(),
        }
    }

    pub fn accepts(&self, pitch: Pitch) -> bool {
        match *self {
            PitchTarget::Exact(p) => p == pitch,
            PitchTarget::Class(c) => PitchClass::of(pitch) == c,
        }
    }
}

/// One note within one event, with the positions it may take.
#[derive(Debug, Clone, PartialEq)]
pub struct EventOccurrence {
    pub target: PitchTarget,
    pub label: String,
    /// Index of the note in its event's note list.
    pub occurrence_index: usize,
    pub candidates: Vec<PositionCandidate>,
    /// Pinned notes keep their single candidate unless its string is taken.
    pub pinned: bool,
}

impl EventOccurrence {
    pub fn exact(
        occurrence_index: usize,
        label: &str,
        pitch: Pitch,
        candidates: Vec<PositionCandidate>,
    ) -> Self {
        Self {
            target: PitchTarget::Exact(pitch),
            label: label.to_string(),
            occurrence_index,
            candidates,
            pinned: false,
        }
    }

    pub fn class(
        occurrence_index: usize,
        label: &str,
        class: PitchClass,
        candidates: Vec<PositionCandidate>,
    ) -> Self {
        Self {
            target: PitchTarget::Class(class),
            label: label.to_string(),
            occurrence_index,
            candidates,
            pinned: false,
        }
    }

    pub fn pinned(
        occurrence_index: usize,
        label: &str,
        pitch: Pitch,
        position: PositionCandidate,
    ) -> Self {
        Self {
            target: PitchTarget::Exact(pitch),
            label: label.to_string(),
            occurrence_index,
            candidates: vec![position],
            pinned: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedNote {
    pub label: String,
    pub string_id: StringId,
    pub fret: Fret,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceAssignment {
    pub occurrence_index: usize,
    pub label: String,
    pub position: PositionCandidate,
}

/// One way of placing an event's notes. Vectors are ordered by occurrence index,
/// and no two positions share a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAssignment {
    pub resolved_notes: Vec<ResolvedNote>,
    pub positions: Vec<PositionCandidate>,
    pub occurrence_assignments: Vec<OccurrenceAssignment>,
    pub unresolved_count: usize,
    pub internal_cost: f32,
    pub hand_position: Option<Fret>,
}

impl EventAssignment {
    /// Placeholder that leaves every note of the event without a position.
    pub fn unresolved(occurrence_count: usize, weights: &FingeringWeights) -> Self {
        Self {
            resolved_notes: Vec::new(),
            positions: Vec::new(),
            occurrence_assignments: Vec::new(),
            unresolved_count: occurrence_count,
            internal_cost: weights.cost_empty_assignment,
            hand_position: None,
        }
    }

    pub fn resolved_count(&self) -> usize {
        self.resolved_notes.len()
    }

    pub fn position_for(&self, occurrence_index: usize) -> Option<&PositionCandidate> {
        self.occurrence_assignments
            .iter()
            .find(|a| a.occurrence_index == occurrence_index)
            .map(|a| &a.position)
    }

    /// Cost of this assignment on its own, with unresolved notes charged at `penalty`.
    #[inline(always)]
    pub fn local_cost(&self, unresolved_penalty: f32) -> f32 {
        self.internal_cost + self.unresolved_count as f32 * unresolved_penalty
    }
}

/// An event in the sequence being optimised. `payload` is whatever the caller
/// needs to map the result back to its own data.
#[derive(Debug, Clone)]
pub struct Event<P> {
    pub payload: P,
    pub occurrences: Vec<EventOccurrence>,
    pub candidate_assignments: Vec<EventAssignment>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectedPath {
    pub assignments: Vec<EventAssignment>,
    pub chosen_indexes: Vec<usize>,
    pub total_cost: f32,
}
