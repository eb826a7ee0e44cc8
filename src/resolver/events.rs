use crate::fretboard::{CandidateIndex, EventAssignment, PositionCandidate};
use crate::geometry::{Fret, InstrumentGeometry, StringId};
use crate::pitch::{parse_label, Pitch, PitchClass};
use serde::{Deserialize, Serialize};

/// Free-form event metadata (timing, bar index, ...) carried through untouched.
pub type JsonMeta = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabNote {
    pub label: String,
    #[serde(default)]
    pub string_id: Option<StringId>,
    #[serde(default)]
    pub fret: Option<Fret>,
}

impl TabNote {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            string_id: None,
            fret: None,
        }
    }

    pub fn at(label: &str, string_id: &str, fret: Fret) -> Self {
        Self {
            label: label.to_string(),
            string_id: Some(string_id.to_string()),
            fret: Some(fret),
        }
    }

    pub fn has_position(&self) -> bool {
        self.string_id.is_some() && self.fret.is_some()
    }

    pub fn clear_position(&mut self) {
        self.string_id = None;
        self.fret = None;
    }

    pub fn set_position(&mut self, position: &PositionCandidate) {
        self.string_id = Some(position.string_id.clone());
        self.fret = Some(position.fret);
    }
}

/// A musical event as the surrounding application sees it. Everything except
/// `notes` lives in `meta` and is copied to the output unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabEvent<M> {
    #[serde(flatten)]
    pub meta: M,
    pub notes: Vec<TabNote>,
}

impl<M> TabEvent<M> {
    pub fn new(meta: M, notes: Vec<TabNote>) -> Self {
        Self { meta, notes }
    }
}

/// The sounding pitch of a note's stored position, if that position exists on
/// the instrument. The label is not consulted.
pub(crate) fn sounding_pitch<G: InstrumentGeometry + ?Sized>(
    note: &TabNote,
    geometry: &G,
) -> Option<(Pitch, usize)> {
    let string_id = note.string_id.as_deref()?;
    let fret = note.fret?;
    let index = geometry.string_index(string_id)?;
    let pitch = geometry.pitch_at(string_id, fret)?;
    Some((pitch, index))
}

/// A note's stored position, when it is inside the indexed range and sounds
/// what its label names: the exact pitch for labels with an octave, the pitch
/// class otherwise. Notes with unparseable labels are taken at their
/// position's word.
pub(crate) fn explicit_candidate<G: InstrumentGeometry + ?Sized>(
    note: &TabNote,
    geometry: &G,
    index: &CandidateIndex,
) -> Option<(Pitch, PositionCandidate)> {
    let (pitch, string_index) = sounding_pitch(note, geometry)?;
    let fret = note.fret?;
    if fret > index.max_fret() || string_index >= index.string_count() {
        return None;
    }
    if let Some(parsed) = parse_label(&note.label) {
        let sounds_label = match parsed.pitch() {
            Some(required) => required == pitch,
            None => parsed.class == PitchClass::of(pitch),
        };
        if !sounds_label {
            return None;
        }
    }
    Some((
        pitch,
        PositionCandidate {
            string_id: note.string_id.clone()?,
            fret,
            string_index,
        },
    ))
}

/// Copies `assignment` onto `event`'s notes. Notes the assignment leaves out
/// lose their position. Returns how many notes ended up without one.
pub(crate) fn apply_assignment<M>(event: &mut TabEvent<M>, assignment: &EventAssignment) -> usize {
    let mut unresolved = 0;
    for (i, note) in event.notes.iter_mut().enumerate() {
        match assignment.position_for(i) {
            Some(position) => note.set_position(position),
            None => {
                note.clear_position();
                unresolved += 1;
            }
        }
    }
    unresolved
}
