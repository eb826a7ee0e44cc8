use crate::consts::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_CANDIDATE_BUDGET, DEFAULT_MAX_ALTERNATIVES,
    DEFAULT_MIN_CANDIDATES_PER_NOTE, DEFAULT_UNRESOLVED_PENALTY,
};
use crate::error::{FretError, FretResult};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[command(flatten)]
    #[serde(default)]
    pub search: SearchParams,
    #[command(flatten)]
    #[serde(default)]
    pub weights: FingeringWeights,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    #[arg(long, default_value_t = DEFAULT_MAX_ALTERNATIVES)]
    pub max_alternatives: usize,
    #[arg(long, default_value_t = DEFAULT_UNRESOLVED_PENALTY)]
    pub unresolved_penalty: f32,

    // Candidate positions tried per note = max(min, ceil(budget / notes))
    #[arg(long, default_value_t = DEFAULT_CANDIDATE_BUDGET)]
    pub candidate_budget: usize,
    #[arg(long, default_value_t = DEFAULT_MIN_CANDIDATES_PER_NOTE)]
    pub min_candidates_per_note: usize,

    #[arg(long, default_value_t = DEFAULT_CACHE_CAPACITY)]
    pub cache_capacity: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_alternatives: DEFAULT_MAX_ALTERNATIVES,
            unresolved_penalty: DEFAULT_UNRESOLVED_PENALTY,
            candidate_budget: DEFAULT_CANDIDATE_BUDGET,
            min_candidates_per_note: DEFAULT_MIN_CANDIDATES_PER_NOTE,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl SearchParams {
    /// How many of a note's candidates the backtracking search may try.
    #[inline(always)]
    pub fn candidates_per_note(&self, occurrence_count: usize) -> usize {
        let n = occurrence_count.max(1);
        self.min_candidates_per_note
            .max(self.candidate_budget.div_ceil(n))
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FingeringWeights {
    // === EVENT SHAPE ===
    #[arg(long, default_value_t = 0.5)]
    pub weight_avg_fret: f32,
    #[arg(long, default_value_t = 0.18)]
    pub weight_max_fret: f32,
    #[arg(long, default_value_t = 1.35)]
    pub weight_fret_spread: f32,
    #[arg(long, default_value_t = 0.6)]
    pub weight_string_spread: f32,
    #[arg(long, default_value_t = 0.45)]
    pub weight_anchor_offset: f32,

    // === HAND PROFILE ===
    #[arg(long, default_value_t = 4)]
    pub hand_span: u8,
    #[arg(long, default_value_t = 3)]
    pub anchor_backoff: u8,
    #[arg(long, default_value_t = 1.6)]
    pub penalty_hand_shift: f32,
    #[arg(long, default_value_t = 1.25)]
    pub penalty_clamped_finger: f32,

    // === STRETCH ===
    #[arg(long, default_value_t = 4.0)]
    pub threshold_stretch: f32,
    #[arg(long, default_value_t = 2.1)]
    pub penalty_stretch: f32,
    #[arg(long, default_value_t = 6.0)]
    pub threshold_wide_stretch: f32,
    #[arg(long, default_value_t = 2.6)]
    pub penalty_wide_stretch: f32,

    // === HIGH FRETS ===
    #[arg(long, default_value_t = 12.0)]
    pub threshold_high_avg_fret: f32,
    #[arg(long, default_value_t = 0.65)]
    pub penalty_high_avg_fret: f32,
    #[arg(long, default_value_t = 16.0)]
    pub threshold_high_max_fret: f32,
    #[arg(long, default_value_t = 0.75)]
    pub penalty_high_max_fret: f32,

    // === OPEN STRINGS ===
    #[arg(long, default_value_t = 0.45)]
    pub bonus_open_single: f32,
    #[arg(long, default_value_t = 0.2)]
    pub bonus_open_chord: f32,

    #[arg(long, default_value_t = 1000.0)]
    pub cost_empty_assignment: f32,

    // === TRANSITIONS ===
    #[arg(long, default_value_t = 8.0)]
    pub cost_empty_transition: f32,
    #[arg(long, default_value_t = 1.45)]
    pub weight_move_avg_fret: f32,
    #[arg(long, default_value_t = 1.1)]
    pub weight_move_avg_string: f32,
    #[arg(long, default_value_t = 0.7)]
    pub weight_move_nearest: f32,
    #[arg(long, default_value_t = 1.25)]
    pub weight_move_string_step: f32,
    #[arg(long, default_value_t = 5.0)]
    pub threshold_jump: f32,
    #[arg(long, default_value_t = 1.2)]
    pub penalty_jump: f32,
    #[arg(long, default_value_t = 0.85)]
    pub weight_move_hand: f32,
}

impl Default for FingeringWeights {
    fn default() -> Self {
        Self {
            weight_avg_fret: 0.5,
            weight_max_fret: 0.18,
            weight_fret_spread: 1.35,
            weight_string_spread: 0.6,
            weight_anchor_offset: 0.45,
            hand_span: 4,
            anchor_backoff: 3,
            penalty_hand_shift: 1.6,
            penalty_clamped_finger: 1.25,
            threshold_stretch: 4.0,
            penalty_stretch: 2.1,
            threshold_wide_stretch: 6.0,
            penalty_wide_stretch: 2.6,
            threshold_high_avg_fret: 12.0,
            penalty_high_avg_fret: 0.65,
            threshold_high_max_fret: 16.0,
            penalty_high_max_fret: 0.75,
            bonus_open_single: 0.45,
            bonus_open_chord: 0.2,
            cost_empty_assignment: 1000.0,
            cost_empty_transition: 8.0,
            weight_move_avg_fret: 1.45,
            weight_move_avg_string: 1.1,
            weight_move_nearest: 0.7,
            weight_move_string_step: 1.25,
            threshold_jump: 5.0,
            penalty_jump: 1.2,
            weight_move_hand: 0.85,
        }
    }
}

impl Config {
    /// Reads a config file without validating it, so command-line flags can
    /// still be merged in before the check.
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> FretResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> FretResult<Self> {
        let config = Self::read_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> FretResult<()> {
        if self.search.max_alternatives == 0 {
            return Err(FretError::Config(
                "max_alternatives must be at least 1".to_string(),
            ));
        }
        if self.search.min_candidates_per_note == 0 {
            return Err(FretError::Config(
                "min_candidates_per_note must be at least 1".to_string(),
            ));
        }
        if !self.search.unresolved_penalty.is_finite() || self.search.unresolved_penalty < 0.0 {
            return Err(FretError::Config(format!(
                "unresolved_penalty must be a non-negative number, got {}",
                self.search.unresolved_penalty
            )));
        }
        if self.weights.hand_span == 0 {
            return Err(FretError::Config("hand_span must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Overwrites file-loaded values with flags the user actually typed.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($section:ident, $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$section.$field = cli.$section.$field.clone();
                }
            };
        }

        update_if_present!(search, max_alternatives);
        update_if_present!(search, unresolved_penalty);
        update_if_present!(search, candidate_budget);
        update_if_present!(search, min_candidates_per_note);
        update_if_present!(search, cache_capacity);

        update_if_present!(weights, weight_avg_fret);
        update_if_present!(weights, weight_max_fret);
        update_if_present!(weights, weight_fret_spread);
        update_if_present!(weights, weight_string_spread);
        update_if_present!(weights, weight_anchor_offset);

        update_if_present!(weights, hand_span);
        update_if_present!(weights, anchor_backoff);
        update_if_present!(weights, penalty_hand_shift);
        update_if_present!(weights, penalty_clamped_finger);

        update_if_present!(weights, threshold_stretch);
        update_if_present!(weights, penalty_stretch);
        update_if_present!(weights, threshold_wide_stretch);
        update_if_present!(weights, penalty_wide_stretch);

        update_if_present!(weights, threshold_high_avg_fret);
        update_if_present!(weights, penalty_high_avg_fret);
        update_if_present!(weights, threshold_high_max_fret);
        update_if_present!(weights, penalty_high_max_fret);

        update_if_present!(weights, bonus_open_single);
        update_if_present!(weights, bonus_open_chord);
        update_if_present!(weights, cost_empty_assignment);

        update_if_present!(weights, cost_empty_transition);
        update_if_present!(weights, weight_move_avg_fret);
        update_if_present!(weights, weight_move_avg_string);
        update_if_present!(weights, weight_move_nearest);
        update_if_present!(weights, weight_move_string_step);
        update_if_present!(weights, threshold_jump);
        update_if_present!(weights, penalty_jump);
        update_if_present!(weights, weight_move_hand);
    }
}
