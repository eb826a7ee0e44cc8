use crate::error::{FretError, FretResult};
use crate::pitch::Pitch;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use fnv::FnvHashSet;
use std::fs;
use std::path::Path;

pub type StringId = String;
pub type Fret = u8;

/// What the resolver needs to know about an instrument: which strings it has,
/// in canonical order, and which pitch each (string, fret) produces.
///
/// `pitch_at` must be pure. Returning `None` marks a location as unplayable.
pub trait InstrumentGeometry {
    fn string_order(&self) -> Vec<StringId>;

    fn pitch_at(&self, string_id: &str, fret: Fret) -> Option<Pitch>;

    fn string_index(&self, string_id: &str) -> Option<usize> {
        self.string_order().iter().position(|s| s == string_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TunedString {
    pub id: StringId,
    pub open_pitch: Pitch,
}

/// A fretted instrument described by its open-string pitches, one semitone per fret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tuning {
    #[serde(default)]
    pub name: String,
    pub strings: Vec<TunedString>,
}

impl Tuning {
    pub fn new(name: &str, strings: &[(&str, Pitch)]) -> Self {
        Self {
            name: name.to_string(),
            strings: strings
                .iter()
                .map(|&(id, open_pitch)| TunedString {
                    id: id.to_string(),
                    open_pitch,
                })
                .collect(),
        }
    }

    /// Six-string guitar in E standard, lowest string first.
    pub fn standard_guitar() -> Self {
        Self::new(
            "Guitar (E Standard)",
            &[
                ("E2", 40),
                ("A2", 45),
                ("D3", 50),
                ("G3", 55),
                ("B3", 59),
                ("E4", 64),
            ],
        )
    }

    /// Four-string bass in E standard.
    pub fn standard_bass() -> Self {
        Self::new(
            "Bass (E Standard)",
            &[("E1", 28), ("A1", 33), ("D2", 38), ("G2", 43)],
        )
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> FretResult<Self> {
        let content = fs::read_to_string(path)?;
        let tuning: Tuning = serde_json::from_str(&content)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> FretResult<()> {
        let mut seen = FnvHashSet::default();
        for s in &self.strings {
            if !seen.insert(s.id.as_str()) {
                return Err(FretError::Validation(format!(
                    "Tuning '{}' lists string '{}' more than once",
                    self.name, s.id
                )));
            }
        }
        Ok(())
    }

    pub fn string_count(&self) -> usize {
        self.strings.len()
    }

    /// Content hash of the tuning, stable across processes. Two tunings with the
    /// same strings and pitches share an identity regardless of name.
    pub fn identity(&self) -> String {
        let mut hasher = Sha256::new();
        for s in &self.strings {
            hasher.update(s.id.as_bytes());
            hasher.update([0u8]);
            hasher.update(s.open_pitch.to_le_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

impl InstrumentGeometry for Tuning {
    fn string_order(&self) -> Vec<StringId> {
        self.strings.iter().map(|s| s.id.clone()).collect()
    }

    fn pitch_at(&self, string_id: &str, fret: Fret) -> Option<Pitch> {
        self.strings
            .iter()
            .find(|s| s.id == string_id)
            .and_then(|s| s.open_pitch.checked_add(Pitch::from(fret)))
    }

    fn string_index(&self, string_id: &str) -> Option<usize> {
        self.strings.iter().position(|s| s.id == string_id)
    }
}

/// Checks the geometry-level invariants the search relies on.
pub fn validate_geometry<G: InstrumentGeometry + ?Sized>(geometry: &G) -> FretResult<()> {
    let order = geometry.string_order();
    let mut seen = FnvHashSet::default();
    for id in &order {
        if !seen.insert(id.as_str()) {
            return Err(FretError::Validation(format!(
                "String '{}' appears more than once in the instrument's string order",
                id
            )));
        }
    }
    Ok(())
}
