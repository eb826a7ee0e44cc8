use super::costs::transition_cost;
use super::types::{Event, EventAssignment, SelectedPath};
use crate::config::FingeringWeights;
use std::borrow::Cow;
use tracing::debug;

fn alternatives<'a, P>(event: &'a Event<P>, weights: &FingeringWeights) -> Cow<'a, [EventAssignment]> {
    if event.candidate_assignments.is_empty() {
        Cow::Owned(vec![EventAssignment::unresolved(
            event.occurrences.len(),
            weights,
        )])
    } else {
        Cow::Borrowed(event.candidate_assignments.as_slice())
    }
}

/// Picks one assignment per event minimising internal costs, transition costs
/// and `unresolved_penalty` per unplaced note over the whole sequence
/// (Viterbi over the lattice of per-event alternatives).
///
/// Events without alternatives get a fully unresolved placeholder. Among equal
/// costs the lower alternative index wins.
pub fn select_path<P>(
    events: &[Event<P>],
    unresolved_penalty: f32,
    weights: &FingeringWeights,
) -> SelectedPath {
    if events.is_empty() {
        return SelectedPath::default();
    }

    let lattice: Vec<Cow<'_, [EventAssignment]>> =
        events.iter().map(|e| alternatives(e, weights)).collect();

    let mut costs: Vec<Vec<f32>> = Vec::with_capacity(lattice.len());
    let mut back: Vec<Vec<usize>> = Vec::with_capacity(lattice.len());

    costs.push(
        lattice[0]
            .iter()
            .map(|a| a.local_cost(unresolved_penalty))
            .collect(),
    );
    back.push(vec![0; lattice[0].len()]);

    for i in 1..lattice.len() {
        let prev_alts = &lattice[i - 1];
        let prev_costs = &costs[i - 1];
        let mut row = Vec::with_capacity(lattice[i].len());
        let mut row_back = Vec::with_capacity(lattice[i].len());

        for alt in lattice[i].iter() {
            let mut best_cost = f32::INFINITY;
            let mut best_prev = 0;
            for (p, prev) in prev_alts.iter().enumerate() {
                let c = prev_costs[p] + transition_cost(prev, alt, weights);
                if c < best_cost {
                    best_cost = c;
                    best_prev = p;
                }
            }
            row.push(best_cost + alt.local_cost(unresolved_penalty));
            row_back.push(best_prev);
        }

        costs.push(row);
        back.push(row_back);
    }

    let last = costs.len() - 1;
    let (mut idx, total_cost) = costs[last]
        .iter()
        .copied()
        .enumerate()
        .fold((0, f32::INFINITY), |best, (i, c)| if c < best.1 { (i, c) } else { best });

    let mut chosen_indexes = vec![0; lattice.len()];
    for i in (0..lattice.len()).rev() {
        chosen_indexes[i] = idx;
        idx = back[i][idx];
    }

    let assignments = chosen_indexes
        .iter()
        .zip(&lattice)
        .map(|(&i, alts)| alts[i].clone())
        .collect();

    debug!(
        "Selected path over {} events, total cost {:.2}",
        events.len(),
        total_cost
    );

    SelectedPath {
        assignments,
        chosen_indexes,
        total_cost,
    }
}

/// Total cost of a fixed choice of alternatives, scored the same way
/// `select_path` scores its optimum. Returns `None` if an index is out of range.
pub fn path_cost<P>(
    events: &[Event<P>],
    chosen_indexes: &[usize],
    unresolved_penalty: f32,
    weights: &FingeringWeights,
) -> Option<f32> {
    if events.len() != chosen_indexes.len() {
        return None;
    }

    let mut total = 0.0;
    let mut prev: Option<EventAssignment> = None;
    for (event, &i) in events.iter().zip(chosen_indexes) {
        let alts = alternatives(event, weights);
        let current = alts.get(i)?.clone();
        if let Some(p) = &prev {
            total += transition_cost(p, &current, weights);
        }
        total += current.local_cost(unresolved_penalty);
        prev = Some(current);
    }
    Some(total)
}
