use super::candidates::PositionCandidate;
use super::types::EventAssignment;
use crate::config::FingeringWeights;
use crate::geometry::Fret;
use itertools::{Itertools, MinMaxResult};

/// Where the fretting hand sits for one event and how much it has to work.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HandProfile {
    /// Fret under the index finger. `None` when every position is open.
    pub anchor: Option<Fret>,
    pub hand_shift_count: u32,
    pub clamped_finger_count: u32,
}

/// Walks fretted positions low to high. The anchor starts on the lowest fretted
/// note and jumps to `fret - anchor_backoff` whenever a note lies more than
/// `hand_span` frets above it. A note whose finger number (`fret - anchor + 1`)
/// falls outside 1..=4 counts as clamped.
pub fn hand_profile(positions: &[PositionCandidate], w: &FingeringWeights) -> HandProfile {
    let frets: Vec<Fret> = positions
        .iter()
        .map(|p| p.fret)
        .filter(|&f| f > 0)
        .sorted_unstable()
        .collect();

    let Some(&lowest) = frets.first() else {
        return HandProfile::default();
    };

    let mut profile = HandProfile {
        anchor: Some(lowest),
        ..Default::default()
    };
    let mut anchor = lowest as i32;

    for &fret in &frets {
        let fret = fret as i32;
        if (fret - anchor).abs() > w.hand_span as i32 {
            profile.hand_shift_count += 1;
            anchor = (fret - w.anchor_backoff as i32).max(1);
        }
        let finger = fret - anchor + 1;
        if !(1..=4).contains(&finger) {
            profile.clamped_finger_count += 1;
        }
    }

    profile.anchor = Some(anchor as Fret);
    profile
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignmentCost {
    pub cost: f32,
    pub hand_position: Option<Fret>,
}

#[inline(always)]
fn excess(value: f32, threshold: f32) -> f32 {
    (value - threshold).max(0.0)
}

fn span<I: Iterator<Item = f32>>(values: I) -> f32 {
    match values.minmax_by(|a, b| a.total_cmp(b)) {
        MinMaxResult::MinMax(lo, hi) => hi - lo,
        MinMaxResult::OneElement(_) | MinMaxResult::NoElements => 0.0,
    }
}

/// Ergonomic cost of holding one event's positions at once.
pub fn assignment_cost(positions: &[PositionCandidate], w: &FingeringWeights) -> AssignmentCost {
    if positions.is_empty() {
        return AssignmentCost {
            cost: w.cost_empty_assignment,
            hand_position: None,
        };
    }

    let n = positions.len() as f32;
    let avg_fret = positions.iter().map(|p| p.fret as f32).sum::<f32>() / n;
    let max_fret = positions.iter().map(|p| p.fret).max().unwrap_or(0) as f32;

    // Open strings need no finger, so they do not widen the stretch.
    let fret_spread = span(positions.iter().filter(|p| !p.is_open()).map(|p| p.fret as f32));
    let string_spread = span(positions.iter().map(|p| p.string_index as f32));
    let min_fretted = positions
        .iter()
        .filter(|p| !p.is_open())
        .map(|p| p.fret)
        .min();

    let profile = hand_profile(positions, w);
    let anchor_offset = match (profile.anchor, min_fretted) {
        (Some(anchor), Some(min)) => (anchor as f32 - min as f32).abs(),
        _ => 0.0,
    };

    let open_count = positions.iter().filter(|p| p.is_open()).count() as f32;
    let open_bonus = if positions.len() > 1 {
        open_count * w.bonus_open_chord
    } else {
        open_count * w.bonus_open_single
    };

    let stretch = excess(fret_spread, w.threshold_stretch) * w.penalty_stretch
        + excess(fret_spread, w.threshold_wide_stretch) * w.penalty_wide_stretch;
    let high = excess(avg_fret, w.threshold_high_avg_fret) * w.penalty_high_avg_fret
        + excess(max_fret, w.threshold_high_max_fret) * w.penalty_high_max_fret;

    let cost = avg_fret * w.weight_avg_fret
        + max_fret * w.weight_max_fret
        + fret_spread * w.weight_fret_spread
        + string_spread * w.weight_string_spread
        + anchor_offset * w.weight_anchor_offset
        + profile.hand_shift_count as f32 * w.penalty_hand_shift
        + profile.clamped_finger_count as f32 * w.penalty_clamped_finger
        + stretch
        + high
        - open_bonus;

    AssignmentCost {
        cost,
        hand_position: profile.anchor,
    }
}

fn averages(positions: &[PositionCandidate]) -> (f32, f32) {
    let n = positions.len() as f32;
    let fret = positions.iter().map(|p| p.fret as f32).sum::<f32>() / n;
    let string = positions.iter().map(|p| p.string_index as f32).sum::<f32>() / n;
    (fret, string)
}

/// Cost of moving the hand from `prev` to `next`.
pub fn transition_cost(prev: &EventAssignment, next: &EventAssignment, w: &FingeringWeights) -> f32 {
    if prev.positions.is_empty() || next.positions.is_empty() {
        return w.cost_empty_transition;
    }

    let (prev_fret, prev_string) = averages(&prev.positions);
    let (next_fret, next_string) = averages(&next.positions);

    let nearest_total: f32 = next
        .positions
        .iter()
        .map(|np| {
            prev.positions
                .iter()
                .map(|pp| {
                    (np.fret as f32 - pp.fret as f32).abs()
                        + (np.string_index as f32 - pp.string_index as f32).abs()
                            * w.weight_move_string_step
                })
                .fold(f32::INFINITY, f32::min)
        })
        .sum();
    let nearest_mean = nearest_total / next.positions.len() as f32;

    let prev_max = prev.positions.iter().map(|p| p.fret).max().unwrap_or(0) as f32;
    let next_max = next.positions.iter().map(|p| p.fret).max().unwrap_or(0) as f32;
    let jump = excess((next_max - prev_max).abs(), w.threshold_jump) * w.penalty_jump;

    let hand = match (prev.hand_position, next.hand_position) {
        (Some(a), Some(b)) => (a as f32 - b as f32).abs() * w.weight_move_hand,
        _ => 0.0,
    };

    (next_fret - prev_fret).abs() * w.weight_move_avg_fret
        + (next_string - prev_string).abs() * w.weight_move_avg_string
        + nearest_mean * w.weight_move_nearest
        + jump
        + hand
}
