mod common;

use common::{guitar, guitar_index, pos};
use fretforge::config::{FingeringWeights, SearchParams};
use fretforge::error::FretError;
use fretforge::fretboard::{enumerate_assignments, CandidateIndex, EventOccurrence};
use fretforge::geometry::{InstrumentGeometry, Tuning};
use fretforge::pitch::PitchClass;
use std::collections::HashSet;

fn exact(index: &CandidateIndex, i: usize, label: &str, pitch: i32) -> EventOccurrence {
    EventOccurrence::exact(i, label, pitch, index.candidates_for_pitch(pitch).to_vec())
}

fn class(index: &CandidateIndex, i: usize, label: &str, class: PitchClass) -> EventOccurrence {
    EventOccurrence::class(i, label, class, index.candidates_for_class(class).to_vec())
}

#[test]
fn test_empty_event_yields_single_empty_assignment() {
    let w = FingeringWeights::default();
    let result = enumerate_assignments(&[], &SearchParams::default(), &w).unwrap();
    assert_eq!(result.len(), 1);
    assert!(result[0].positions.is_empty());
    assert_eq!(result[0].unresolved_count, 0);
    assert_eq!(result[0].internal_cost, 1000.0);
}

#[test]
fn test_single_note_ranks_open_first_and_unresolved_last() {
    let index = guitar_index();
    let occ = vec![exact(&index, 0, "E4", 64)];
    let result =
        enumerate_assignments(&occ, &SearchParams::default(), &FingeringWeights::default()).unwrap();

    // Six positions plus leaving it out
    assert_eq!(result.len(), 7);
    assert_eq!(result[0].resolved_notes[0].string_id, "E4");
    assert_eq!(result[0].resolved_notes[0].fret, 0);
    assert_eq!(result.last().unwrap().unresolved_count, 1);
    assert!(result[..6].iter().all(|a| a.unresolved_count == 0));
    assert!(result[..6]
        .windows(2)
        .all(|p| p[0].internal_cost <= p[1].internal_cost));
}

#[test]
fn test_chord_never_shares_a_string() {
    let index = guitar_index();
    let occ = vec![
        class(&index, 0, "C", PitchClass::C),
        class(&index, 1, "E", PitchClass::E),
        class(&index, 2, "G", PitchClass::G),
    ];
    let result =
        enumerate_assignments(&occ, &SearchParams::default(), &FingeringWeights::default()).unwrap();

    assert!(!result.is_empty());
    assert_eq!(result[0].unresolved_count, 0);
    for a in &result {
        let strings: HashSet<usize> = a.positions.iter().map(|p| p.string_index).collect();
        assert_eq!(strings.len(), a.positions.len());
        assert_eq!(a.resolved_count() + a.unresolved_count, 3);
        // Vectors are kept in occurrence order
        let order: Vec<usize> = a.occurrence_assignments.iter().map(|o| o.occurrence_index).collect();
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(order, sorted);
    }
}

#[test]
fn test_assignments_are_unique() {
    let index = guitar_index();
    let occ = vec![
        class(&index, 0, "A", PitchClass::A),
        class(&index, 1, "A", PitchClass::A),
    ];
    let result =
        enumerate_assignments(&occ, &SearchParams::default(), &FingeringWeights::default()).unwrap();
    let signatures: HashSet<Vec<(usize, usize, u8)>> = result
        .iter()
        .map(|a| {
            a.occurrence_assignments
                .iter()
                .map(|o| (o.occurrence_index, o.position.string_index, o.position.fret))
                .collect()
        })
        .collect();
    assert_eq!(signatures.len(), result.len());
}

#[test]
fn test_more_notes_than_strings_resolves_partially() {
    let tuning = Tuning::new("Mono", &[("A2", 45)]);
    let index = CandidateIndex::build(&tuning, 12).unwrap();
    let occ = vec![exact(&index, 0, "C3", 48), exact(&index, 1, "E3", 52)];
    let result =
        enumerate_assignments(&occ, &SearchParams::default(), &FingeringWeights::default()).unwrap();

    assert_eq!(result[0].unresolved_count, 1);
    assert_eq!(result[0].positions.len(), 1);
    assert!(result.iter().all(|a| a.positions.len() <= 1));
}

#[test]
fn test_max_alternatives_caps_output() {
    let index = guitar_index();
    let occ = vec![
        class(&index, 0, "C", PitchClass::C),
        class(&index, 1, "E", PitchClass::E),
    ];
    let search = SearchParams {
        max_alternatives: 3,
        ..Default::default()
    };
    let result = enumerate_assignments(&occ, &search, &FingeringWeights::default()).unwrap();
    assert_eq!(result.len(), 3);
}

fn scale_chord(index: &CandidateIndex, classes: &[PitchClass]) -> Vec<EventOccurrence> {
    classes
        .iter()
        .enumerate()
        .map(|(i, &c)| class(index, i, &c.to_string(), c))
        .collect()
}

#[test]
fn test_small_cap_keeps_the_best_ranked_prefix() {
    let index = guitar_index();
    let occ = scale_chord(
        &index,
        &[
            PitchClass::C,
            PitchClass::D,
            PitchClass::E,
            PitchClass::F,
            PitchClass::G,
            PitchClass::A,
            PitchClass::B,
        ],
    );
    let w = FingeringWeights::default();
    let wide = SearchParams {
        max_alternatives: 100_000,
        ..Default::default()
    };
    let narrow = SearchParams {
        max_alternatives: 5,
        ..Default::default()
    };

    let all = enumerate_assignments(&occ, &wide, &w).unwrap();
    let top = enumerate_assignments(&occ, &narrow, &w).unwrap();

    assert!(all.len() > 5);
    assert_eq!(top, all[..5].to_vec());
    assert!(all[0].unresolved_count >= 1);
}

#[test]
fn test_large_chord_stays_within_strings() {
    let index = guitar_index();
    let occ = scale_chord(
        &index,
        &[
            PitchClass::C,
            PitchClass::CSharp,
            PitchClass::D,
            PitchClass::DSharp,
            PitchClass::E,
            PitchClass::F,
            PitchClass::FSharp,
            PitchClass::G,
            PitchClass::GSharp,
            PitchClass::A,
            PitchClass::ASharp,
            PitchClass::B,
        ],
    );
    let search = SearchParams::default();
    let result = enumerate_assignments(&occ, &search, &FingeringWeights::default()).unwrap();

    assert_eq!(result.len(), search.max_alternatives);
    assert!(result[0].unresolved_count >= 6);
    assert!(result
        .windows(2)
        .all(|p| p[0].unresolved_count <= p[1].unresolved_count));
    for a in &result {
        let strings: HashSet<usize> = a.positions.iter().map(|p| p.string_index).collect();
        assert_eq!(strings.len(), a.positions.len());
        assert_eq!(a.resolved_count() + a.unresolved_count, 12);
    }
}

#[test]
fn test_candidate_budget_limits_positions_tried() {
    let index = guitar_index();
    let occ = vec![class(&index, 0, "E", PitchClass::E)];
    let search = SearchParams {
        candidate_budget: 2,
        min_candidates_per_note: 1,
        ..Default::default()
    };
    let result = enumerate_assignments(&occ, &search, &FingeringWeights::default()).unwrap();
    // Two positions plus the unresolved choice
    assert_eq!(result.len(), 3);
}

#[test]
fn test_pinned_note_is_kept_when_its_string_is_free() {
    let tuning = guitar();
    let index = guitar_index();
    let occ = vec![
        EventOccurrence::pinned(0, "C", 48, pos(&tuning, "A2", 3)),
        class(&index, 1, "E", PitchClass::E),
    ];
    let result =
        enumerate_assignments(&occ, &SearchParams::default(), &FingeringWeights::default()).unwrap();
    for a in &result {
        let p = a.position_for(0).expect("pinned note always placed");
        assert_eq!((p.string_id.as_str(), p.fret), ("A2", 3));
    }
}

#[test]
fn test_pinned_collision_drops_one_note() {
    let tuning = guitar();
    let occ = vec![
        EventOccurrence::pinned(0, "E", 40, pos(&tuning, "E2", 0)),
        EventOccurrence::pinned(1, "A", 45, pos(&tuning, "E2", 5)),
    ];
    let result =
        enumerate_assignments(&occ, &SearchParams::default(), &FingeringWeights::default()).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].unresolved_count, 1);
    // The higher note is placed first and keeps the string
    assert_eq!(result[0].position_for(1).map(|p| p.fret), Some(5));
    assert!(result[0].position_for(0).is_none());
}

#[test]
fn test_duplicate_occurrence_index_is_rejected() {
    let index = guitar_index();
    let occ = vec![exact(&index, 0, "E4", 64), exact(&index, 0, "A3", 57)];
    let err = enumerate_assignments(&occ, &SearchParams::default(), &FingeringWeights::default())
        .unwrap_err();
    assert!(matches!(err, FretError::Validation(_)));
}

#[test]
fn test_enumeration_is_deterministic() {
    let index = guitar_index();
    let occ = vec![
        class(&index, 0, "D", PitchClass::D),
        class(&index, 1, "F#", PitchClass::FSharp),
        class(&index, 2, "A", PitchClass::A),
    ];
    let search = SearchParams::default();
    let w = FingeringWeights::default();
    let a = enumerate_assignments(&occ, &search, &w).unwrap();
    let b = enumerate_assignments(&occ, &search, &w).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_candidates_stay_on_the_instrument() {
    let tuning = guitar();
    let index = guitar_index();
    let occ = vec![exact(&index, 0, "G3", 55), exact(&index, 1, "B3", 59)];
    let result =
        enumerate_assignments(&occ, &SearchParams::default(), &FingeringWeights::default()).unwrap();
    for a in &result {
        for o in &a.occurrence_assignments {
            let expected = if o.occurrence_index == 0 { 55 } else { 59 };
            assert_eq!(tuning.pitch_at(&o.position.string_id, o.position.fret), Some(expected));
        }
    }
}
