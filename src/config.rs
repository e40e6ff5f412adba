//! Selection configuration and its resolution against a pool.

use crate::error::ConfigError;
use crate::record::{ColumnId, RecordId, RecordPool};
use std::collections::BTreeMap;
use tracing::warn;

/// A named set of feature columns sharing one target percentage.
///
/// Every column in the group is scored on its own against `target`: a
/// 50% group target asks each column to be flagged on about half of the
/// deck, not that half the deck carries some flag of the group.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureGroup {
    pub name: String,
    pub columns: Vec<ColumnId>,
    /// Target percentage in [0, 100].
    pub target: f64,
}

impl FeatureGroup {
    pub fn new(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = usize>,
        target: f64,
    ) -> Self {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(ColumnId).collect(),
            target,
        }
    }
}

/// Target percentage for a single column, inherited from its group.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnTarget {
    pub column: ColumnId,
    pub target: f64,
}

/// User-facing description of a selection run.
///
/// # Examples
///
/// ```
/// use u_deck::config::{FeatureGroup, SelectionConfig};
///
/// let config = SelectionConfig::new(20)
///     .with_tolerance(5.0)
///     .with_group(FeatureGroup::new("habitat", [5, 6, 7], 30.0))
///     .with_individuals([8, 9])
///     .with_mandatory(["Barn Owl"]);
/// assert_eq!(config.targets_by_column().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionConfig {
    /// Number of records in the deck.
    pub size: usize,
    /// Allowed absolute deviation, in percentage points, per targeted column.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tolerance: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub groups: Vec<FeatureGroup>,
    /// Columns that must be flagged on at least one deck record.
    #[cfg_attr(feature = "serde", serde(default))]
    pub individuals: Vec<ColumnId>,
    /// Identities (cell 0) of records that must be in the deck.
    #[cfg_attr(feature = "serde", serde(default))]
    pub mandatory: Vec<String>,
}

impl SelectionConfig {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            tolerance: 0.0,
            groups: Vec::new(),
            individuals: Vec::new(),
            mandatory: Vec::new(),
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_group(mut self, group: FeatureGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_groups(mut self, groups: impl IntoIterator<Item = FeatureGroup>) -> Self {
        self.groups.extend(groups);
        self
    }

    pub fn with_individuals(mut self, columns: impl IntoIterator<Item = usize>) -> Self {
        self.individuals.extend(columns.into_iter().map(ColumnId));
        self
    }

    pub fn with_mandatory<S: Into<String>>(
        mut self,
        identities: impl IntoIterator<Item = S>,
    ) -> Self {
        self.mandatory.extend(identities.into_iter().map(Into::into));
        self
    }

    /// Flattens group targets into one target per column, ordered by column.
    ///
    /// A column listed in several groups keeps the last group's target;
    /// [`SelectionConfig::resolve`] rejects that case.
    pub fn targets_by_column(&self) -> Vec<ColumnTarget> {
        let mut targets = BTreeMap::new();
        for group in &self.groups {
            for &column in &group.columns {
                targets.insert(column, group.target);
            }
        }
        targets
            .into_iter()
            .map(|(column, target)| ColumnTarget { column, target })
            .collect()
    }

    /// Checks the configuration against `pool` and resolves mandatory identities.
    ///
    /// Mandatory identities matching no record are dropped with a warning and
    /// listed in [`SelectionPlan::unmatched_mandatory`].
    pub fn resolve(&self, pool: &RecordPool) -> Result<SelectionPlan, ConfigError> {
        if self.size == 0 {
            return Err(ConfigError::ZeroSize);
        }
        if self.size > pool.len() {
            return Err(ConfigError::SizeExceedsPool {
                size: self.size,
                pool: pool.len(),
            });
        }
        if self.tolerance.is_nan() || self.tolerance < 0.0 {
            return Err(ConfigError::NegativeTolerance(self.tolerance));
        }

        let width = pool.width();
        let check_column = |column: ColumnId| {
            if column.0 == 0 || column.0 > width {
                Err(ConfigError::ColumnOutOfRange { column, width })
            } else {
                Ok(())
            }
        };

        let mut assigned: Vec<ColumnId> = Vec::new();
        for group in &self.groups {
            if group.columns.is_empty() {
                return Err(ConfigError::EmptyGroup {
                    group: group.name.clone(),
                });
            }
            if !(0.0..=100.0).contains(&group.target) {
                return Err(ConfigError::TargetOutOfRange {
                    group: group.name.clone(),
                    target: group.target,
                });
            }
            for &column in &group.columns {
                check_column(column)?;
                if assigned.contains(&column) {
                    return Err(ConfigError::DuplicateColumn { column });
                }
                assigned.push(column);
            }
        }

        let mut individuals: Vec<ColumnId> = Vec::new();
        for &column in &self.individuals {
            check_column(column)?;
            if assigned.contains(&column) {
                return Err(ConfigError::DuplicateColumn { column });
            }
            if !individuals.contains(&column) {
                individuals.push(column);
            }
        }

        let (mandatory, unmatched_mandatory) = pool.find_by_identity(&self.mandatory);
        for identity in &unmatched_mandatory {
            warn!(identity = %identity, "mandatory record not found in pool");
        }
        if mandatory.len() > self.size {
            return Err(ConfigError::MandatoryExceedsSize {
                mandatory: mandatory.len(),
                size: self.size,
            });
        }

        for &column in &individuals {
            if pool.carriers(column).next().is_none() {
                warn!(column = column.0, "no record in the pool carries this individual feature");
            }
        }

        let mut mandatory_mask = vec![false; pool.len()];
        for id in &mandatory {
            mandatory_mask[id.index()] = true;
        }

        Ok(SelectionPlan {
            size: self.size,
            tolerance: self.tolerance,
            targets: self.targets_by_column(),
            individuals,
            mandatory,
            mandatory_mask,
            unmatched_mandatory,
        })
    }
}

/// A validated configuration bound to one pool.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionPlan {
    pub size: usize,
    pub tolerance: f64,
    /// One entry per targeted column, ordered by column.
    pub targets: Vec<ColumnTarget>,
    pub individuals: Vec<ColumnId>,
    /// Mandatory records, in pool order.
    pub mandatory: Vec<RecordId>,
    /// `mandatory_mask[i]` is set when record `i` is mandatory.
    pub mandatory_mask: Vec<bool>,
    pub unmatched_mandatory: Vec<String>,
}

impl SelectionPlan {
    pub fn is_mandatory(&self, id: RecordId) -> bool {
        self.mandatory_mask.get(id.index()).copied().unwrap_or(false)
    }

    /// Size of the pool this plan was resolved against.
    pub fn pool_len(&self) -> usize {
        self.mandatory_mask.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(n: usize, width: usize) -> RecordPool {
        let rows = (0..n)
            .map(|i| {
                let mut row = vec![format!("r{i}")];
                row.extend((1..width).map(|c| {
                    if (i + c) % 2 == 0 {
                        "X".into()
                    } else {
                        String::new()
                    }
                }));
                row
            })
            .collect();
        RecordPool::from_rows(rows)
    }

    #[test]
    fn test_targets_by_column_flattens_groups() {
        let config = SelectionConfig::new(4)
            .with_group(FeatureGroup::new("b", [5, 3], 40.0))
            .with_group(FeatureGroup::new("a", [2], 10.0));
        let targets = config.targets_by_column();
        let columns: Vec<usize> = targets.iter().map(|t| t.column.0).collect();
        assert_eq!(columns, vec![2, 3, 5]);
        assert_eq!(targets[1].target, 40.0);
        assert_eq!(targets[0].target, 10.0);
    }

    #[test]
    fn test_resolve_ok() {
        let pool = pool(10, 6);
        let plan = SelectionConfig::new(4)
            .with_tolerance(5.0)
            .with_group(FeatureGroup::new("g", [2, 3], 50.0))
            .with_individuals([4, 4, 5])
            .with_mandatory(["r1", "R3 ", "nobody"])
            .resolve(&pool)
            .unwrap();
        assert_eq!(plan.targets.len(), 2);
        assert_eq!(plan.individuals, vec![ColumnId(4), ColumnId(5)]);
        assert_eq!(plan.mandatory, vec![RecordId(1), RecordId(3)]);
        assert!(plan.is_mandatory(RecordId(3)));
        assert!(!plan.is_mandatory(RecordId(2)));
        assert_eq!(plan.unmatched_mandatory, vec!["nobody".to_string()]);
        assert_eq!(plan.pool_len(), 10);
    }

    #[test]
    fn test_resolve_size_errors() {
        let pool = pool(5, 3);
        assert_eq!(SelectionConfig::new(0).resolve(&pool), Err(ConfigError::ZeroSize));
        assert_eq!(
            SelectionConfig::new(6).resolve(&pool),
            Err(ConfigError::SizeExceedsPool { size: 6, pool: 5 })
        );
    }

    #[test]
    fn test_resolve_mandatory_exceeds_size() {
        let pool = pool(5, 3);
        let err = SelectionConfig::new(2)
            .with_mandatory(["r0", "r1", "r2"])
            .resolve(&pool)
            .unwrap_err();
        assert_eq!(err, ConfigError::MandatoryExceedsSize { mandatory: 3, size: 2 });
    }

    #[test]
    fn test_resolve_column_errors() {
        let pool = pool(5, 3);
        let out_of_range = SelectionConfig::new(2)
            .with_group(FeatureGroup::new("g", [4], 10.0))
            .resolve(&pool);
        assert_eq!(
            out_of_range,
            Err(ConfigError::ColumnOutOfRange { column: ColumnId(4), width: 3 })
        );

        let zero = SelectionConfig::new(2).with_individuals([0]).resolve(&pool);
        assert!(matches!(zero, Err(ConfigError::ColumnOutOfRange { .. })));

        let duplicate = SelectionConfig::new(2)
            .with_group(FeatureGroup::new("a", [2], 10.0))
            .with_group(FeatureGroup::new("b", [2, 3], 10.0))
            .resolve(&pool);
        assert_eq!(duplicate, Err(ConfigError::DuplicateColumn { column: ColumnId(2) }));

        let overlap = SelectionConfig::new(2)
            .with_group(FeatureGroup::new("a", [2], 10.0))
            .with_individuals([2])
            .resolve(&pool);
        assert_eq!(overlap, Err(ConfigError::DuplicateColumn { column: ColumnId(2) }));
    }

    #[test]
    fn test_resolve_value_errors() {
        let pool = pool(5, 3);
        let target = SelectionConfig::new(2)
            .with_group(FeatureGroup::new("a", [2], 100.5))
            .resolve(&pool);
        assert!(matches!(target, Err(ConfigError::TargetOutOfRange { .. })));

        let tolerance = SelectionConfig::new(2).with_tolerance(-1.0).resolve(&pool);
        assert_eq!(tolerance, Err(ConfigError::NegativeTolerance(-1.0)));

        let empty = SelectionConfig::new(2)
            .with_group(FeatureGroup::new("a", [], 10.0))
            .resolve(&pool);
        assert_eq!(empty, Err(ConfigError::EmptyGroup { group: "a".into() }));
    }
}
