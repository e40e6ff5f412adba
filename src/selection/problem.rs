//! Deck selection as an annealing problem.

use super::deck::Deck;
use super::{energy, feasibility, neighbor};
use crate::config::SelectionPlan;
use crate::record::RecordPool;
use crate::sa::SaProblem;
use rand::Rng;

/// Binds a pool and a resolved plan to the [`SaProblem`] interface.
pub struct DeckProblem<'a> {
    pool: &'a RecordPool,
    plan: &'a SelectionPlan,
}

impl<'a> DeckProblem<'a> {
    pub fn new(pool: &'a RecordPool, plan: &'a SelectionPlan) -> Self {
        Self { pool, plan }
    }
}

impl SaProblem for DeckProblem<'_> {
    type Solution = Deck;

    fn cost(&self, deck: &Deck) -> f64 {
        energy::energy(self.pool, deck, self.plan)
    }

    fn neighbor<R: Rng>(&self, deck: &Deck, rng: &mut R) -> Option<Deck> {
        neighbor::neighbor(deck, self.plan, rng)
    }

    fn is_feasible(&self, deck: &Deck) -> bool {
        feasibility::is_feasible(self.pool, deck, self.plan)
    }
}
