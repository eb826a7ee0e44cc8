use super::candidates::PositionCandidate;
use super::costs::assignment_cost;
use super::types::{EventAssignment, EventOccurrence, OccurrenceAssignment, ResolvedNote};
use crate::config::{FingeringWeights, SearchParams};
use crate::consts::MAX_INDEXED_STRINGS;
use crate::error::{FretError, FretResult};
use crate::geometry::Fret;
use fnv::{FnvHashMap, FnvHashSet};
use std::cmp::Ordering;
use tracing::trace;

type Signature = Vec<(usize, usize, Fret)>;

/// A partial placement on the search stack. Each branch owns its picks and its
/// used-string mask, so nothing is shared or undone between siblings.
struct Branch {
    depth: usize,
    used_strings: u64,
    unresolved: usize,
    picks: Vec<Option<usize>>,
}

fn validate(occurrences: &[EventOccurrence]) -> FretResult<()> {
    let mut seen = FnvHashSet::default();
    for occ in occurrences {
        if !seen.insert(occ.occurrence_index) {
            return Err(FretError::Validation(format!(
                "occurrence index {} appears twice in one event",
                occ.occurrence_index
            )));
        }
        if let Some(c) = occ
            .candidates
            .iter()
            .find(|c| c.string_index >= MAX_INDEXED_STRINGS)
        {
            return Err(FretError::Validation(format!(
                "candidate on string '{}' has index {}, beyond the {} searchable strings",
                c.string_id, c.string_index, MAX_INDEXED_STRINGS
            )));
        }
    }
    Ok(())
}

/// Ranked ways of placing one event's notes on distinct strings.
///
/// Higher notes are placed first. Every note may also be left unresolved, so an
/// event with more notes than usable strings still produces partial
/// assignments. Results are ordered by unresolved count, then cost, then number
/// of resolved notes, and capped at `search.max_alternatives`. A branch is cut
/// once that many kept assignments already leave out fewer notes than it must.
pub fn enumerate_assignments(
    occurrences: &[EventOccurrence],
    search: &SearchParams,
    weights: &FingeringWeights,
) -> FretResult<Vec<EventAssignment>> {
    validate(occurrences)?;

    if occurrences.is_empty() {
        return Ok(vec![EventAssignment::unresolved(0, weights)]);
    }

    let mut order: Vec<usize> = (0..occurrences.len()).collect();
    order.sort_by(|&a, &b| {
        let (oa, ob) = (&occurrences[a], &occurrences[b]);
        ob.target
            .ordering_key()
            .cmp(&oa.target.ordering_key())
            .then(oa.occurrence_index.cmp(&ob.occurrence_index))
    });

    let limit = search.candidates_per_note(occurrences.len());
    let options: Vec<&[PositionCandidate]> = order
        .iter()
        .map(|&i| {
            let c = &occurrences[i].candidates;
            &c[..c.len().min(limit)]
        })
        .collect();

    // Strings any note from a given depth onward could still use
    let mut reachable = vec![0u64; order.len() + 1];
    for depth in (0..order.len()).rev() {
        reachable[depth] = options[depth]
            .iter()
            .fold(reachable[depth + 1], |mask, c| mask | (1u64 << c.string_index));
    }

    let mut best: FnvHashMap<Signature, EventAssignment> = FnvHashMap::default();
    // Distinct kept signatures per unresolved count
    let mut kept_by_unresolved = vec![0usize; order.len() + 1];
    let mut leaves = 0usize;
    let mut pruned = 0usize;
    let mut stack = vec![Branch {
        depth: 0,
        used_strings: 0,
        unresolved: 0,
        picks: Vec::with_capacity(order.len()),
    }];

    while let Some(branch) = stack.pop() {
        // Fewest notes this branch can end up leaving out
        let free = (reachable[branch.depth] & !branch.used_strings).count_ones() as usize;
        let floor = branch.unresolved + (order.len() - branch.depth).saturating_sub(free);
        let ahead: usize = kept_by_unresolved[..floor].iter().sum();
        if ahead >= search.max_alternatives {
            pruned += 1;
            continue;
        }

        if branch.depth == order.len() {
            leaves += 1;
            let assignment = materialize(occurrences, &order, &options, &branch.picks, weights);
            let signature: Signature = assignment
                .occurrence_assignments
                .iter()
                .map(|a| (a.occurrence_index, a.position.string_index, a.position.fret))
                .collect();
            let score = assignment.local_cost(1.0);
            match best.get(&signature) {
                Some(existing) if existing.local_cost(1.0) <= score => {}
                Some(_) => {
                    best.insert(signature, assignment);
                }
                None => {
                    kept_by_unresolved[assignment.unresolved_count] += 1;
                    best.insert(signature, assignment);
                }
            }
            continue;
        }

        let occ = &occurrences[order[branch.depth]];
        let placeable: Vec<(usize, u64)> = options[branch.depth]
            .iter()
            .enumerate()
            .map(|(k, c)| (k, 1u64 << c.string_index))
            .filter(|&(_, bit)| branch.used_strings & bit == 0)
            .collect();

        // Pushed first so it is explored last, after the placements have
        // filled in the lower unresolved counts.
        if !occ.pinned || placeable.is_empty() {
            let mut picks = branch.picks.clone();
            picks.push(None);
            stack.push(Branch {
                depth: branch.depth + 1,
                used_strings: branch.used_strings,
                unresolved: branch.unresolved + 1,
                picks,
            });
        }

        for &(k, bit) in placeable.iter().rev() {
            let mut picks = branch.picks.clone();
            picks.push(Some(k));
            stack.push(Branch {
                depth: branch.depth + 1,
                used_strings: branch.used_strings | bit,
                unresolved: branch.unresolved,
                picks,
            });
        }
    }

    let mut ranked: Vec<(Signature, EventAssignment)> = best.into_iter().collect();
    ranked.sort_by(|(sa, a), (sb, b)| rank(a, b).then_with(|| sa.cmp(sb)));
    ranked.truncate(search.max_alternatives);

    trace!(
        "Enumerated {} leaves for {} notes ({} branches pruned), kept {}",
        leaves,
        occurrences.len(),
        pruned,
        ranked.len()
    );

    Ok(ranked.into_iter().map(|(_, a)| a).collect())
}

fn rank(a: &EventAssignment, b: &EventAssignment) -> Ordering {
    a.unresolved_count
        .cmp(&b.unresolved_count)
        .then(a.internal_cost.total_cmp(&b.internal_cost))
        .then(a.resolved_count().cmp(&b.resolved_count()))
}

fn materialize(
    occurrences: &[EventOccurrence],
    order: &[usize],
    options: &[&[PositionCandidate]],
    picks: &[Option<usize>],
    weights: &FingeringWeights,
) -> EventAssignment {
    let mut placed: Vec<OccurrenceAssignment> = Vec::with_capacity(picks.len());
    let mut unresolved_count = 0;

    for (depth, pick) in picks.iter().enumerate() {
        let occ = &occurrences[order[depth]];
        match pick {
            Some(k) => placed.push(OccurrenceAssignment {
                occurrence_index: occ.occurrence_index,
                label: occ.label.clone(),
                position: options[depth][*k].clone(),
            }),
            None => unresolved_count += 1,
        }
    }
    placed.sort_by_key(|a| a.occurrence_index);

    let positions: Vec<PositionCandidate> = placed.iter().map(|a| a.position.clone()).collect();
    let resolved_notes = placed
        .iter()
        .map(|a| ResolvedNote {
            label: a.label.clone(),
            string_id: a.position.string_id.clone(),
            fret: a.position.fret,
        })
        .collect();
    let cost = assignment_cost(&positions, weights);

    EventAssignment {
        resolved_notes,
        positions,
        occurrence_assignments: placed,
        unresolved_count,
        internal_cost: cost.cost,
        hand_position: cost.hand_position,
    }
}
