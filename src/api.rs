use crate::config::Config;
use crate::error::FretResult;
use crate::fretboard::CandidateIndex;
use crate::geometry::{Fret, Tuning};
use crate::resolver::{
    self, content_signature, CacheKey, MelodyCache, Resolution, ShiftOutcome, TabEvent,
};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use typed_builder::TypedBuilder;

pub const DEFAULT_MAX_FRET: Fret = 24;

#[derive(TypedBuilder)]
pub struct FretboardParams {
    pub tuning: Tuning,
    #[builder(default = DEFAULT_MAX_FRET)]
    pub max_fret: Fret,
    #[builder(default)]
    pub config: Config,
}

impl FretboardParams {
    pub fn build_fretboard(self) -> FretResult<Fretboard> {
        Fretboard::new(self.tuning, self.max_fret, self.config)
    }
}

/// A tuning and fret range with its candidate index built once, ready to
/// resolve any number of melodies. Read-only after construction, so it can be
/// shared across threads.
#[derive(Debug, Clone)]
pub struct Fretboard {
    tuning: Tuning,
    max_fret: Fret,
    config: Config,
    index: Arc<CandidateIndex>,
    identity: String,
}

impl Fretboard {
    pub fn new(tuning: Tuning, max_fret: Fret, config: Config) -> FretResult<Self> {
        tuning.validate()?;
        config.validate()?;
        let index = CandidateIndex::build(&tuning, max_fret)?;
        let identity = format!("{}:{}", tuning.identity(), max_fret);

        info!(
            "Fretboard ready: '{}', {} strings, frets 0-{}",
            tuning.name,
            tuning.string_count(),
            max_fret
        );

        Ok(Self {
            tuning,
            max_fret,
            config,
            index: Arc::new(index),
            identity,
        })
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn max_fret(&self) -> Fret {
        self.max_fret
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn index(&self) -> &CandidateIndex {
        &self.index
    }

    /// Identifies tuning and fret range together; cache keys embed it so a
    /// retuned board never reads another board's entries.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Swaps the tuning and rebuilds the index. On error the board is unchanged.
    pub fn set_tuning(&mut self, tuning: Tuning) -> FretResult<()> {
        *self = Self::new(tuning, self.max_fret, self.config.clone())?;
        Ok(())
    }

    pub fn set_max_fret(&mut self, max_fret: Fret) -> FretResult<()> {
        *self = Self::new(self.tuning.clone(), max_fret, self.config.clone())?;
        Ok(())
    }

    pub fn resolve_positions<M: Clone>(&self, events: &[TabEvent<M>]) -> FretResult<Resolution<M>> {
        resolver::resolve_positions(events, &self.tuning, &self.index, &self.config)
    }

    pub fn transpose<M: Clone>(
        &self,
        events: &[TabEvent<M>],
        semitones: i32,
    ) -> FretResult<Vec<TabEvent<M>>> {
        resolver::transpose(events, semitones, &self.tuning, &self.index, &self.config)
    }

    pub fn shift_strings<M: Clone>(&self, events: &[TabEvent<M>], offset: i32) -> ShiftOutcome<M> {
        resolver::shift_strings(events, offset, &self.tuning, self.max_fret)
    }

    pub fn is_shift_feasible<M: Clone>(&self, events: &[TabEvent<M>], offset: i32) -> bool {
        resolver::is_shift_feasible(events, offset, &self.tuning, self.max_fret)
    }

    pub fn coerce_shift_to_feasible<M: Clone>(&self, events: &[TabEvent<M>], offset: i32) -> i32 {
        resolver::coerce_shift_to_feasible(events, offset, &self.tuning, self.max_fret)
    }

    /// Resolves independent melodies in parallel against the shared index.
    pub fn resolve_many<M: Clone + Send + Sync>(
        &self,
        melodies: &[Vec<TabEvent<M>>],
    ) -> FretResult<Vec<Resolution<M>>> {
        melodies
            .par_iter()
            .map(|events| self.resolve_positions(events))
            .collect()
    }

    pub fn new_cache<V>(&self) -> MelodyCache<V> {
        MelodyCache::new(self.config.search.cache_capacity)
    }

    fn cache_key<M: Serialize>(
        &self,
        melody_id: &str,
        offset: i32,
        events: &[TabEvent<M>],
    ) -> FretResult<CacheKey> {
        Ok(CacheKey {
            instrument: self.identity.clone(),
            melody: melody_id.to_string(),
            offset,
            content: content_signature(events)?,
        })
    }

    pub fn transpose_cached<M: Clone + Serialize>(
        &self,
        cache: &mut MelodyCache<Vec<TabEvent<M>>>,
        melody_id: &str,
        events: &[TabEvent<M>],
        semitones: i32,
    ) -> FretResult<Arc<Vec<TabEvent<M>>>> {
        let key = self.cache_key(melody_id, semitones, events)?;
        if let Some(hit) = cache.get(&key) {
            return Ok(hit);
        }
        let result = self.transpose(events, semitones)?;
        Ok(cache.insert(key, result))
    }

    pub fn shift_strings_cached<M: Clone + Serialize>(
        &self,
        cache: &mut MelodyCache<ShiftOutcome<M>>,
        melody_id: &str,
        events: &[TabEvent<M>],
        offset: i32,
    ) -> FretResult<Arc<ShiftOutcome<M>>> {
        let key = self.cache_key(melody_id, offset, events)?;
        if let Some(hit) = cache.get(&key) {
            return Ok(hit);
        }
        Ok(cache.insert(key, self.shift_strings(events, offset)))
    }
}
