use super::events::{sounding_pitch, TabEvent};
use crate::geometry::{Fret, InstrumentGeometry};
use fnv::FnvHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftOutcome<M> {
    pub feasible: bool,
    /// The shifted events, or the input unchanged when the shift is infeasible.
    pub events: Vec<TabEvent<M>>,
}

/// Moves every positioned note `offset` strings over at the same pitch.
/// `None` as soon as one note has nowhere to go or two notes of an event meet
/// on one string. Notes without a position are carried as they are.
fn plan_shift<M: Clone, G: InstrumentGeometry + ?Sized>(
    events: &[TabEvent<M>],
    offset: i32,
    geometry: &G,
    max_fret: Fret,
) -> Option<Vec<TabEvent<M>>> {
    if offset == 0 {
        return Some(events.to_vec());
    }

    let strings = geometry.string_order();
    let mut shifted = Vec::with_capacity(events.len());

    for event in events {
        let mut out = event.clone();
        let mut taken = FnvHashSet::default();

        for note in out.notes.iter_mut() {
            if !note.has_position() {
                continue;
            }
            let (pitch, string_index) = sounding_pitch(note, geometry)?;
            let target_index = usize::try_from(string_index as i64 + offset as i64).ok()?;
            let target = strings.get(target_index)?;
            let fret = (0..=max_fret).find(|&f| geometry.pitch_at(target, f) == Some(pitch))?;
            if !taken.insert(target_index) {
                return None;
            }
            note.string_id = Some(target.clone());
            note.fret = Some(fret);
        }
        shifted.push(out);
    }

    Some(shifted)
}

/// Whether every positioned note can move `offset` strings at the same pitch
/// without leaving the neck or colliding. An offset of zero is always feasible.
pub fn is_shift_feasible<M: Clone, G: InstrumentGeometry + ?Sized>(
    events: &[TabEvent<M>],
    offset: i32,
    geometry: &G,
    max_fret: Fret,
) -> bool {
    plan_shift(events, offset, geometry, max_fret).is_some()
}

pub fn shift_strings<M: Clone, G: InstrumentGeometry + ?Sized>(
    events: &[TabEvent<M>],
    offset: i32,
    geometry: &G,
    max_fret: Fret,
) -> ShiftOutcome<M> {
    match plan_shift(events, offset, geometry, max_fret) {
        Some(events) => ShiftOutcome {
            feasible: true,
            events,
        },
        None => {
            debug!("String shift by {} is infeasible", offset);
            ShiftOutcome {
                feasible: false,
                events: events.to_vec(),
            }
        }
    }
}

/// The feasible offset closest to `offset` on the same side of zero, walking
/// the magnitude down one string at a time. Zero when nothing smaller works.
pub fn coerce_shift_to_feasible<M: Clone, G: InstrumentGeometry + ?Sized>(
    events: &[TabEvent<M>],
    offset: i32,
    geometry: &G,
    max_fret: Fret,
) -> i32 {
    if is_shift_feasible(events, offset, geometry, max_fret) {
        return offset;
    }

    // No shift wider than the neck can land, so start the walk there.
    let widest = geometry.string_order().len().saturating_sub(1) as u32;
    let start = offset.unsigned_abs().saturating_sub(1).min(widest) as i32;
    let sign = offset.signum();

    (1..=start)
        .rev()
        .map(|m| m * sign)
        .find(|&candidate| is_shift_feasible(events, candidate, geometry, max_fret))
        .unwrap_or(0)
}
