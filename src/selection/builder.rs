//! Initial deck construction.

use super::deck::Deck;
use crate::config::SelectionPlan;
use crate::error::DeckError;
use crate::record::{ColumnId, RecordId, RecordPool};
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use tracing::debug;

/// Builds a starting deck of exactly `plan.size` records.
///
/// 1. All mandatory records.
/// 2. For each individual feature not yet present, one random carrier
///    (skipped when the feature has no unselected carrier or the deck is full).
/// 3. Fill up: take the unfilled targeted column with the highest target
///    (lowest column index on ties) and add a random unselected record
///    flagged in it, or any random unselected record when none is.
///
/// The result is shuffled.
///
/// # Errors
///
/// [`DeckError::Initialization`] when the pool runs out before the deck is full.
pub fn build_initial_deck<R: Rng>(
    pool: &RecordPool,
    plan: &SelectionPlan,
    rng: &mut R,
) -> Result<Deck, DeckError> {
    let mut selected = vec![false; pool.len()];
    let mut members: Vec<RecordId> = Vec::with_capacity(plan.size);

    for &id in &plan.mandatory {
        if !selected[id.index()] {
            selected[id.index()] = true;
            members.push(id);
        }
    }

    for &column in &plan.individuals {
        if members.len() >= plan.size {
            break;
        }
        if members.iter().any(|&id| pool.get(id).has_flag(column)) {
            continue;
        }
        let carriers: Vec<RecordId> = pool
            .carriers(column)
            .map(|r| r.id())
            .filter(|id| !selected[id.index()])
            .collect();
        match carriers.choose(rng) {
            Some(&id) => {
                selected[id.index()] = true;
                members.push(id);
            }
            None => debug!(column = column.0, "individual feature has no available carrier"),
        }
    }

    while members.len() < plan.size {
        let remaining: Vec<RecordId> = pool.ids().filter(|id| !selected[id.index()]).collect();
        if remaining.is_empty() {
            break;
        }

        let flagged: Vec<RecordId> = match priority_column(pool, &members, plan) {
            Some(column) => remaining
                .iter()
                .copied()
                .filter(|&id| pool.get(id).has_flag(column))
                .collect(),
            None => Vec::new(),
        };
        let pick = flagged.choose(rng).or_else(|| remaining.choose(rng));

        if let Some(&id) = pick {
            selected[id.index()] = true;
            members.push(id);
        }
    }

    if members.len() < plan.size {
        return Err(DeckError::Initialization {
            required: plan.size,
            available: members.len(),
        });
    }

    members.shuffle(rng);
    debug!(size = members.len(), mandatory = plan.mandatory.len(), "initial deck built");
    Ok(Deck::new(members))
}

/// The targeted column still short of its quota with the highest target.
///
/// A column's quota is `ceil(target% * size)` flagged records. Ties go to
/// the lowest column index.
fn priority_column(
    pool: &RecordPool,
    members: &[RecordId],
    plan: &SelectionPlan,
) -> Option<ColumnId> {
    let mut best: Option<(ColumnId, f64)> = None;
    for t in &plan.targets {
        let quota = (t.target / 100.0 * plan.size as f64).ceil() as usize;
        let count = members.iter().filter(|&&id| pool.get(id).has_flag(t.column)).count();
        if count >= quota {
            continue;
        }
        if best.is_none_or(|(_, target)| t.target > target) {
            best = Some((t.column, t.target));
        }
    }
    best.map(|(column, _)| column)
}
