mod common;

use common::{guitar, guitar_index};
use fretforge::error::FretError;
use fretforge::fretboard::CandidateIndex;
use fretforge::geometry::{Fret, InstrumentGeometry, StringId, Tuning};
use fretforge::pitch::{Pitch, PitchClass};

/// Five-string banjo: the short fifth string only starts at the fifth fret.
struct Banjo;

impl InstrumentGeometry for Banjo {
    fn string_order(&self) -> Vec<StringId> {
        ["G4s", "D3", "G3", "B3", "D4"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn pitch_at(&self, string_id: &str, fret: Fret) -> Option<Pitch> {
        match string_id {
            "G4s" if fret == 0 => Some(67),
            "G4s" if fret < 5 => None,
            "G4s" => Some(62 + fret as Pitch),
            "D3" => Some(50 + fret as Pitch),
            "G3" => Some(55 + fret as Pitch),
            "B3" => Some(59 + fret as Pitch),
            "D4" => Some(62 + fret as Pitch),
            _ => None,
        }
    }
}

#[test]
fn test_lowest_pitch_has_single_position() {
    let index = guitar_index();
    let list = index.candidates_for_pitch(40);
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].string_id, "E2");
    assert_eq!(list[0].fret, 0);
}

#[test]
fn test_candidates_sorted_by_fret_then_string() {
    let index = guitar_index();
    let frets: Vec<(Fret, &str)> = index
        .candidates_for_pitch(64)
        .iter()
        .map(|c| (c.fret, c.string_id.as_str()))
        .collect();
    assert_eq!(
        frets,
        vec![(0, "E4"), (5, "B3"), (9, "G3"), (14, "D3"), (19, "A2"), (24, "E2")]
    );
}

#[test]
fn test_range_and_counts() {
    let index = guitar_index();
    assert_eq!(index.len(), 49); // 40..=88
    assert_eq!(index.position_count(), 6 * 25);
    assert!(index.contains_pitch(88));
    assert!(!index.contains_pitch(89));
    assert!(index.candidates_for_pitch(39).is_empty());
    assert_eq!(index.max_fret(), 24);
    assert_eq!(index.string_count(), 6);
}

#[test]
fn test_class_index() {
    let index = guitar_index();
    let first: Vec<(String, Fret)> = index
        .candidates_for_class(PitchClass::E)
        .iter()
        .take(6)
        .map(|c| (c.string_id.clone(), c.fret))
        .collect();
    assert_eq!(
        first,
        vec![
            ("E2".to_string(), 0),
            ("E4".to_string(), 0),
            ("D3".to_string(), 2),
            ("B3".to_string(), 5),
            ("A2".to_string(), 7),
            ("G3".to_string(), 9),
        ]
    );
    assert_eq!(index.pitches_for_class(PitchClass::E), vec![40, 52, 64, 76, 88]);
}

#[test]
fn test_string_index_matches_order() {
    let tuning = guitar();
    let index = guitar_index();
    for pitch in 40..=88 {
        for c in index.candidates_for_pitch(pitch) {
            assert_eq!(tuning.string_index(&c.string_id), Some(c.string_index));
            assert_eq!(tuning.pitch_at(&c.string_id, c.fret), Some(pitch));
        }
    }
}

#[test]
fn test_max_fret_limits_positions() {
    let index = CandidateIndex::build(&guitar(), 12).unwrap();
    assert_eq!(index.position_count(), 6 * 13);
    assert!(index
        .candidates_for_pitch(64)
        .iter()
        .all(|c| c.fret <= 12));
    assert!(!index.contains_pitch(77));
}

#[test]
fn test_undefined_locations_are_skipped() {
    let index = CandidateIndex::build(&Banjo, 12).unwrap();
    assert!(index
        .candidates_for_pitch(63)
        .iter()
        .all(|c| c.string_id != "G4s"));
    let g4: Vec<(&str, Fret)> = index
        .candidates_for_pitch(67)
        .iter()
        .map(|c| (c.string_id.as_str(), c.fret))
        .collect();
    assert_eq!(g4, vec![("G4s", 0), ("G4s", 5), ("D4", 5), ("B3", 8), ("G3", 12)]);
}

#[test]
fn test_empty_tuning_gives_empty_index() {
    let index = CandidateIndex::build(&Tuning::new("Nothing", &[]), 24).unwrap();
    assert!(index.is_empty());
    assert!(index.candidates_for_class(PitchClass::C).is_empty());
    assert!(index.pitches_for_class(PitchClass::C).is_empty());
}

#[test]
fn test_fret_ceiling_is_rejected() {
    let err = CandidateIndex::build(&guitar(), 49).unwrap_err();
    assert!(matches!(err, FretError::Validation(_)));
}

#[test]
fn test_duplicate_string_is_rejected() {
    let tuning = Tuning::new("Twin", &[("E2", 40), ("E2", 52)]);
    assert!(matches!(
        CandidateIndex::build(&tuning, 24),
        Err(FretError::Validation(_))
    ));
}
