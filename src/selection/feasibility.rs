//! Final acceptance test.

use super::deck::Deck;
use super::energy::individuals_present;
use crate::config::SelectionPlan;
use crate::meter::column_proportion;
use crate::record::RecordPool;

/// Whether every targeted column is within tolerance and every individual
/// feature is present.
///
/// Short-circuits on the first violation. Deck size is not checked here;
/// the energy function covers it.
pub fn is_feasible(pool: &RecordPool, deck: &Deck, plan: &SelectionPlan) -> bool {
    plan.targets.iter().all(|t| {
        let observed = column_proportion(deck.records(pool), t.column);
        within_tolerance(observed, t.target, plan.tolerance)
    }) && individuals_present(pool, deck, &plan.individuals)
}

/// `|observed - target| <= tolerance`.
pub fn within_tolerance(observed: f64, target: f64, tolerance: f64) -> bool {
    (observed - target).abs() <= tolerance
}
