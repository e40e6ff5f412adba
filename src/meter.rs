//! Flag proportions over a collection of records.

use crate::config::FeatureGroup;
use crate::record::{ColumnId, Record};

/// Percentage (0–100) of `records` flagged in any of `columns`.
///
/// An empty collection yields 0.0. With a single column this is the share
/// of records flagged in that column; with several it is the union share.
pub fn proportion<'a, I>(records: I, columns: &[ColumnId]) -> f64
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut total = 0usize;
    let mut flagged = 0usize;
    for record in records {
        total += 1;
        if record.has_any_flag(columns) {
            flagged += 1;
        }
    }
    if total == 0 {
        return 0.0;
    }
    flagged as f64 / total as f64 * 100.0
}

/// Percentage of `records` flagged in `column`.
pub fn column_proportion<'a, I>(records: I, column: ColumnId) -> f64
where
    I: IntoIterator<Item = &'a Record>,
{
    proportion(records, &[column])
}

/// Share of `records` carrying at least one flag of `group`.
///
/// Informational only: energy and feasibility score each column of a group
/// against the group target separately.
pub fn group_union_proportion<'a, I>(records: I, group: &FeatureGroup) -> f64
where
    I: IntoIterator<Item = &'a Record>,
{
    proportion(records, &group.columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordPool;

    fn pool() -> RecordPool {
        let rows = [["a", "X", ""], ["b", "X", "X"], ["c", "", "X"], ["d", "", ""]];
        RecordPool::from_rows(
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_empty_collection_is_zero() {
        assert_eq!(proportion(std::iter::empty(), &[ColumnId(2)]), 0.0);
    }

    #[test]
    fn test_single_column() {
        let pool = pool();
        assert_eq!(column_proportion(pool.records(), ColumnId(2)), 50.0);
        assert_eq!(column_proportion(pool.records(), ColumnId(3)), 50.0);
    }

    #[test]
    fn test_union_of_columns() {
        let pool = pool();
        assert_eq!(proportion(pool.records(), &[ColumnId(2), ColumnId(3)]), 75.0);
        let group = FeatureGroup::new("g", [2, 3], 50.0);
        assert_eq!(group_union_proportion(pool.records(), &group), 75.0);
    }

    #[test]
    fn test_no_columns_is_zero() {
        let pool = pool();
        assert_eq!(proportion(pool.records(), &[]), 0.0);
    }
}
