use super::events::{apply_assignment, explicit_candidate, TabEvent, TabNote};
use crate::config::Config;
use crate::consts::{MAX_OCTAVE_SEARCH, MAX_TRANSPOSE_SEMITONES, SEMITONES_PER_OCTAVE};
use crate::error::{FretError, FretResult};
use crate::fretboard::{enumerate_assignments, CandidateIndex, EventOccurrence};
use crate::geometry::InstrumentGeometry;
use crate::pitch::{octave_of, parse_label, Pitch, PitchClass};
use tracing::debug;

/// `target` itself if the index can play it, otherwise the nearest octave of
/// it that can, trying up before down at each distance.
fn playable_octave(index: &CandidateIndex, target: Pitch) -> Option<Pitch> {
    if index.contains_pitch(target) {
        return Some(target);
    }
    (1..=MAX_OCTAVE_SEARCH).find_map(|k| {
        let shift = k * SEMITONES_PER_OCTAVE;
        [target.checked_add(shift), target.checked_sub(shift)]
            .into_iter()
            .flatten()
            .find(|&p| index.contains_pitch(p))
    })
}

/// Where a note should land after transposition, before octave correction.
fn target_pitch<G: InstrumentGeometry + ?Sized>(
    note: &TabNote,
    semitones: i32,
    previous: Option<Pitch>,
    geometry: &G,
    index: &CandidateIndex,
) -> Option<Pitch> {
    if let Some((pitch, _)) = explicit_candidate(note, geometry, index) {
        return pitch.checked_add(semitones);
    }

    let parsed = parse_label(&note.label)?;
    if let Some(pitch) = parsed.pitch() {
        return pitch.checked_add(semitones);
    }

    // Only the class is known: stay close to the line so far, or start in the
    // middle of the playable range.
    let class = parsed.class.transposed(semitones);
    match previous {
        Some(prev) => Some(class.nearest_to(prev)),
        None => {
            let pitches = index.pitches_for_class(class);
            pitches.get(pitches.len() / 2).copied()
        }
    }
}

fn relabel(label: &str, pitch: Pitch) -> String {
    match parse_label(label) {
        Some(parsed) => {
            let name = PitchClass::of(pitch).spelled(parsed.uses_flat);
            match parsed.octave {
                Some(_) => format!("{}{}", name, octave_of(pitch)),
                None => name,
            }
        }
        None => PitchClass::of(pitch).to_string(),
    }
}

/// Shifts every note by `semitones`, re-spelling labels and choosing new
/// positions. Exact pitches are kept where the neck allows, otherwise moved by
/// whole octaves. Each event takes its best-ranked assignment.
///
/// Fails when `semitones` is beyond `MAX_TRANSPOSE_SEMITONES` either way.
pub fn transpose<M: Clone, G: InstrumentGeometry + ?Sized>(
    events: &[TabEvent<M>],
    semitones: i32,
    geometry: &G,
    index: &CandidateIndex,
    config: &Config,
) -> FretResult<Vec<TabEvent<M>>> {
    if !(-MAX_TRANSPOSE_SEMITONES..=MAX_TRANSPOSE_SEMITONES).contains(&semitones) {
        return Err(FretError::Validation(format!(
            "cannot transpose by {} semitones, the limit is {} either way",
            semitones, MAX_TRANSPOSE_SEMITONES
        )));
    }

    let mut previous: Option<Pitch> = None;
    let mut result = Vec::with_capacity(events.len());
    let mut unresolved_total = 0;

    for event in events {
        let mut out = event.clone();
        let mut occurrences = Vec::with_capacity(event.notes.len());

        for (i, note) in event.notes.iter().enumerate() {
            let target = target_pitch(note, semitones, previous, geometry, index)
                .and_then(|t| playable_octave(index, t));

            match target {
                Some(pitch) => {
                    out.notes[i].label = relabel(&note.label, pitch);
                    occurrences.push(EventOccurrence::exact(
                        i,
                        &out.notes[i].label,
                        pitch,
                        index.candidates_for_pitch(pitch).to_vec(),
                    ));
                    previous = Some(pitch);
                }
                None => {
                    if let Some(parsed) = parse_label(&note.label) {
                        out.notes[i].label = parsed
                            .class
                            .transposed(semitones)
                            .spelled(parsed.uses_flat);
                    }
                }
            }
        }

        let alternatives = enumerate_assignments(&occurrences, &config.search, &config.weights)?;
        match alternatives.first() {
            Some(best) => unresolved_total += apply_assignment(&mut out, best),
            None => {
                for note in &mut out.notes {
                    note.clear_position();
                }
                unresolved_total += out.notes.len();
            }
        }
        result.push(out);
    }

    debug!(
        "Transposed {} events by {} semitones, {} notes unresolved",
        events.len(),
        semitones,
        unresolved_total
    );

    Ok(result)
}
