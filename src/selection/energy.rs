//! Deck cost.

use super::deck::Deck;
use crate::config::{ColumnTarget, SelectionPlan};
use crate::meter::column_proportion;
use crate::record::{ColumnId, RecordPool};

/// Cost of `deck`. Lower is better, 0.0 is a perfect match.
///
/// Sums `|observed - target|` over every targeted column. Returns
/// `f64::INFINITY` when the deck has the wrong size or when an individual
/// feature is absent from it; both are hard constraints.
pub fn energy(pool: &RecordPool, deck: &Deck, plan: &SelectionPlan) -> f64 {
    if deck.len() != plan.size {
        return f64::INFINITY;
    }
    if !individuals_present(pool, deck, &plan.individuals) {
        return f64::INFINITY;
    }
    target_error(pool, deck, &plan.targets)
}

/// Sum of absolute per-column deviations from target.
pub fn target_error(pool: &RecordPool, deck: &Deck, targets: &[ColumnTarget]) -> f64 {
    targets
        .iter()
        .map(|t| (column_proportion(deck.records(pool), t.column) - t.target).abs())
        .sum()
}

/// Whether every column in `individuals` is flagged on some deck record.
pub fn individuals_present(pool: &RecordPool, deck: &Deck, individuals: &[ColumnId]) -> bool {
    individuals
        .iter()
        .all(|&column| deck.records(pool).any(|r| r.has_flag(column)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FeatureGroup, SelectionConfig};
    use crate::record::RecordId;

    /// Columns: 1 name, 2 group A, 3 group A, 4 group B, 5 individual.
    fn toy_pool() -> RecordPool {
        let rows = [
            ["r0", "X", "X", "", ""],
            ["r1", "X", "", "X", ""],
            ["r2", "", "", "X", "X"],
            ["r3", "", "X", "", ""],
            ["r4", "X", "X", "X", "X"],
            ["r5", "", "", "", ""],
        ];
        RecordPool::from_rows(
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    fn plan(pool: &RecordPool, size: usize, individuals: &[usize]) -> SelectionPlan {
        SelectionConfig::new(size)
            .with_group(FeatureGroup::new("A", [2, 3], 50.0))
            .with_group(FeatureGroup::new("B", [4], 25.0))
            .with_individuals(individuals.iter().copied())
            .resolve(pool)
            .unwrap()
    }

    fn deck(ids: &[usize]) -> Deck {
        Deck::new(ids.iter().map(|&i| RecordId(i)).collect())
    }

    #[test]
    fn test_energy_hand_computed() {
        let pool = toy_pool();
        let plan = plan(&pool, 4, &[]);
        // r0 r1 r2 r3: col2 = 50%, col3 = 50%, col4 = 50%
        // |50-50| + |50-50| + |50-25| = 25
        assert_eq!(energy(&pool, &deck(&[0, 1, 2, 3]), &plan), 25.0);
        // r0 r3 r4 r5: col2 = 50%, col3 = 75%, col4 = 25%
        // 0 + 25 + 0 = 25
        assert_eq!(energy(&pool, &deck(&[0, 3, 4, 5]), &plan), 25.0);
        // r0 r1 r3 r5: col2 = 50%, col3 = 50%, col4 = 25%
        assert_eq!(energy(&pool, &deck(&[0, 1, 3, 5]), &plan), 0.0);
    }

    #[test]
    fn test_energy_wrong_size_is_infinite() {
        let pool = toy_pool();
        let plan = plan(&pool, 4, &[]);
        assert!(energy(&pool, &deck(&[0, 1, 3]), &plan).is_infinite());
        assert!(energy(&pool, &deck(&[0, 1, 2, 3, 4]), &plan).is_infinite());
    }

    #[test]
    fn test_energy_missing_individual_is_infinite() {
        let pool = toy_pool();
        let plan = plan(&pool, 4, &[5]);
        assert!(energy(&pool, &deck(&[0, 1, 3, 5]), &plan).is_infinite());
        // r2 carries column 5: col2 25%, col3 50%, col4 25% -> 25 + 0 + 0
        assert_eq!(energy(&pool, &deck(&[0, 2, 3, 5]), &plan), 25.0);
    }

    #[test]
    fn test_group_columns_scored_independently() {
        let pool = toy_pool();
        let plan = plan(&pool, 2, &[]);
        // r1 r3: col2 50%, col3 50% though both rows carry a group A flag.
        assert_eq!(target_error(&pool, &deck(&[1, 3]), &plan.targets), 0.0 + 0.0 + 25.0);
    }
}
