use crate::consts::{MAX_INDEXED_STRINGS, MAX_SUPPORTED_FRET};
use crate::error::{FretError, FretResult};
use crate::geometry::{validate_geometry, Fret, InstrumentGeometry, StringId};
use crate::pitch::{Pitch, PitchClass};
use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};
use strum::EnumCount;
use tracing::{debug, warn};

/// One playable location on the neck.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionCandidate {
    pub string_id: StringId,
    pub fret: Fret,
    pub string_index: usize,
}

impl PositionCandidate {
    #[inline(always)]
    pub fn is_open(&self) -> bool {
        self.fret == 0
    }
}

/// Every (string, fret) location grouped by the pitch it produces.
///
/// Lists are ordered by fret, then string index. Built once per
/// (instrument, max fret) and never mutated afterwards, so one index can be
/// shared read-only across threads.
#[derive(Debug, Clone)]
pub struct CandidateIndex {
    max_fret: Fret,
    string_count: usize,
    by_pitch: FnvHashMap<Pitch, Vec<PositionCandidate>>,
    by_class: [Vec<PositionCandidate>; PitchClass::COUNT],
}

impl CandidateIndex {
    pub fn build<G: InstrumentGeometry + ?Sized>(geometry: &G, max_fret: Fret) -> FretResult<Self> {
        if max_fret > MAX_SUPPORTED_FRET {
            return Err(FretError::Validation(format!(
                "max fret {} exceeds the supported ceiling of {}",
                max_fret, MAX_SUPPORTED_FRET
            )));
        }
        validate_geometry(geometry)?;

        let strings = geometry.string_order();
        if strings.len() > MAX_INDEXED_STRINGS {
            warn!(
                "Instrument has {} strings; only the first {} receive candidates",
                strings.len(),
                MAX_INDEXED_STRINGS
            );
        }

        let mut by_pitch: FnvHashMap<Pitch, Vec<PositionCandidate>> = FnvHashMap::default();
        let mut by_class: [Vec<PositionCandidate>; PitchClass::COUNT] =
            std::array::from_fn(|_| Vec::new());

        for (string_index, string_id) in strings.iter().enumerate().take(MAX_INDEXED_STRINGS) {
            for fret in 0..=max_fret {
                let Some(pitch) = geometry.pitch_at(string_id, fret) else {
                    continue;
                };
                let candidate = PositionCandidate {
                    string_id: string_id.clone(),
                    fret,
                    string_index,
                };
                by_class[PitchClass::of(pitch) as usize].push(candidate.clone());
                by_pitch.entry(pitch).or_default().push(candidate);
            }
        }

        for list in by_pitch.values_mut().chain(by_class.iter_mut()) {
            list.sort_by_key(|c| (c.fret, c.string_index));
        }

        let index = Self {
            max_fret,
            string_count: strings.len().min(MAX_INDEXED_STRINGS),
            by_pitch,
            by_class,
        };

        if index.is_empty() {
            warn!("Candidate index is empty; every note will come back unresolved");
        } else {
            debug!(
                "Candidate index: {} pitches, {} positions over {} strings (max fret {})",
                index.len(),
                index.position_count(),
                index.string_count,
                max_fret
            );
        }

        Ok(index)
    }

    pub fn max_fret(&self) -> Fret {
        self.max_fret
    }

    pub fn string_count(&self) -> usize {
        self.string_count
    }

    /// Number of distinct pitches with at least one position.
    pub fn len(&self) -> usize {
        self.by_pitch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_pitch.is_empty()
    }

    pub fn position_count(&self) -> usize {
        self.by_pitch.values().map(Vec::len).sum()
    }

    pub fn contains_pitch(&self, pitch: Pitch) -> bool {
        self.by_pitch.contains_key(&pitch)
    }

    pub fn candidates_for_pitch(&self, pitch: Pitch) -> &[PositionCandidate] {
        self.by_pitch.get(&pitch).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn candidates_for_class(&self, class: PitchClass) -> &[PositionCandidate] {
        &self.by_class[class as usize]
    }

    /// Sorted distinct pitches of `class` that can be played somewhere.
    pub fn pitches_for_class(&self, class: PitchClass) -> Vec<Pitch> {
        let mut pitches: Vec<Pitch> = self
            .by_pitch
            .keys()
            .copied()
            .filter(|&p| PitchClass::of(p) == class)
            .collect();
        pitches.sort_unstable();
        pitches
    }
}
