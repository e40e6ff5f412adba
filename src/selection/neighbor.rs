//! Size-preserving swap move.

use super::deck::Deck;
use crate::config::SelectionPlan;
use crate::record::RecordId;
use rand::Rng;

/// Swaps one non-mandatory deck member for one non-mandatory record outside the deck.
///
/// The removed and added records are drawn uniformly and independently.
/// Returns `None` when either side is empty. The added record takes the
/// removed one's position, so size and every other member, mandatory
/// records included, are untouched.
pub fn neighbor<R: Rng>(deck: &Deck, plan: &SelectionPlan, rng: &mut R) -> Option<Deck> {
    let removable: Vec<usize> = deck
        .members()
        .iter()
        .enumerate()
        .filter(|&(_, &id)| !plan.is_mandatory(id))
        .map(|(position, _)| position)
        .collect();
    if removable.is_empty() {
        return None;
    }

    let in_deck = deck.mask(plan.pool_len());
    let addable: Vec<usize> = (0..plan.pool_len())
        .filter(|&i| !in_deck[i] && !plan.mandatory_mask[i])
        .collect();
    if addable.is_empty() {
        return None;
    }

    let position = removable[rng.random_range(0..removable.len())];
    let added = addable[rng.random_range(0..addable.len())];

    let mut next = deck.clone();
    next.replace_at(position, RecordId(added));
    Some(next)
}
