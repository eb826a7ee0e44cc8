use super::events::{apply_assignment, explicit_candidate, TabEvent};
use crate::config::Config;
use crate::error::FretResult;
use crate::fretboard::{enumerate_assignments, select_path, CandidateIndex, Event, EventOccurrence};
use crate::geometry::InstrumentGeometry;
use crate::pitch::parse_label;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution<M> {
    pub events: Vec<TabEvent<M>>,
    /// Notes that had no usable position and received one.
    pub filled_count: usize,
    /// Notes left without a position.
    pub unresolved_count: usize,
}

/// Builds the search occurrences for one event. Valid stored positions are
/// pinned; everything else draws from the index by exact pitch (label with
/// octave) or by pitch class. Repeated labels stay separate occurrences.
fn occurrences_for<M, G: InstrumentGeometry + ?Sized>(
    event: &TabEvent<M>,
    geometry: &G,
    index: &CandidateIndex,
) -> (Vec<EventOccurrence>, Vec<bool>) {
    let mut occurrences = Vec::with_capacity(event.notes.len());
    let mut pinned = vec![false; event.notes.len()];

    for (i, note) in event.notes.iter().enumerate() {
        if let Some((pitch, position)) = explicit_candidate(note, geometry, index) {
            occurrences.push(EventOccurrence::pinned(i, &note.label, pitch, position));
            pinned[i] = true;
            continue;
        }
        let Some(parsed) = parse_label(&note.label) else {
            continue;
        };
        let occurrence = match parsed.pitch() {
            Some(pitch) => EventOccurrence::exact(
                i,
                &note.label,
                pitch,
                index.candidates_for_pitch(pitch).to_vec(),
            ),
            None => EventOccurrence::class(
                i,
                &note.label,
                parsed.class,
                index.candidates_for_class(parsed.class).to_vec(),
            ),
        };
        occurrences.push(occurrence);
    }

    (occurrences, pinned)
}

/// Fills in missing positions across a whole sequence, keeping valid stored
/// positions as they are. The chosen placement minimises hand movement over
/// the sequence, not just per event.
pub fn resolve_positions<M: Clone, G: InstrumentGeometry + ?Sized>(
    events: &[TabEvent<M>],
    geometry: &G,
    index: &CandidateIndex,
    config: &Config,
) -> FretResult<Resolution<M>> {
    let mut lattice: Vec<Event<Vec<bool>>> = Vec::with_capacity(events.len());
    for event in events {
        let (occurrences, pinned) = occurrences_for(event, geometry, index);
        let candidate_assignments =
            enumerate_assignments(&occurrences, &config.search, &config.weights)?;
        lattice.push(Event {
            payload: pinned,
            occurrences,
            candidate_assignments,
        });
    }

    let path = select_path(&lattice, config.search.unresolved_penalty, &config.weights);

    let mut filled_count = 0;
    let mut unresolved_count = 0;
    let mut resolved = Vec::with_capacity(events.len());

    for ((event, step), assignment) in events.iter().zip(&lattice).zip(&path.assignments) {
        let mut out = event.clone();
        unresolved_count += apply_assignment(&mut out, assignment);
        filled_count += out
            .notes
            .iter()
            .zip(&step.payload)
            .filter(|(note, &was_pinned)| !was_pinned && note.has_position())
            .count();
        resolved.push(out);
    }

    debug!(
        "Resolved {} events: {} filled, {} unresolved, path cost {:.2}",
        events.len(),
        filled_count,
        unresolved_count,
        path.total_cost
    );

    Ok(Resolution {
        events: resolved,
        filled_count,
        unresolved_count,
    })
}
