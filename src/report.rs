//! Result tables and listings for a selected deck.

use crate::config::{SelectionConfig, SelectionPlan};
use crate::meter::{column_proportion, group_union_proportion};
use crate::record::{ColumnId, Record, RecordPool};
use crate::selection::{within_tolerance, Deck};
use std::fmt;

/// Observed vs. target share for one targeted column.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnReport {
    pub column: ColumnId,
    /// Header label, when the pool has a header.
    pub name: Option<String>,
    pub observed: f64,
    pub target: f64,
    pub within_tolerance: bool,
}

/// Per-column rows of one feature group.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupReport {
    pub name: String,
    pub target: f64,
    /// Share of the deck flagged in any column of the group.
    ///
    /// Informational only: scoring and feasibility use the per-column rows.
    pub union_observed: f64,
    pub columns: Vec<ColumnReport>,
}

/// Presence of one individual feature.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndividualReport {
    pub column: ColumnId,
    pub name: Option<String>,
    pub observed: f64,
    pub present: bool,
}

/// Terminal report handed to the caller.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionReport {
    pub deck_size: usize,
    pub tolerance: f64,
    pub energy: f64,
    pub feasible: bool,
    pub groups: Vec<GroupReport>,
    pub individuals: Vec<IndividualReport>,
}

impl SelectionReport {
    pub fn new(
        pool: &RecordPool,
        config: &SelectionConfig,
        plan: &SelectionPlan,
        deck: &Deck,
        energy: f64,
        feasible: bool,
    ) -> Self {
        let name = |column: ColumnId| pool.column_name(column).map(str::to_string);

        let groups = config
            .groups
            .iter()
            .map(|group| GroupReport {
                name: group.name.clone(),
                target: group.target,
                union_observed: group_union_proportion(deck.records(pool), group),
                columns: group
                    .columns
                    .iter()
                    .map(|&column| {
                        let observed = column_proportion(deck.records(pool), column);
                        ColumnReport {
                            column,
                            name: name(column),
                            observed,
                            target: group.target,
                            within_tolerance: within_tolerance(
                                observed,
                                group.target,
                                plan.tolerance,
                            ),
                        }
                    })
                    .collect(),
            })
            .collect();

        let individuals = plan
            .individuals
            .iter()
            .map(|&column| {
                let observed = column_proportion(deck.records(pool), column);
                IndividualReport {
                    column,
                    name: name(column),
                    observed,
                    present: observed > 0.0,
                }
            })
            .collect();

        Self {
            deck_size: deck.len(),
            tolerance: plan.tolerance,
            energy,
            feasible,
            groups,
            individuals,
        }
    }

    /// Every targeted column, in group order.
    pub fn columns(&self) -> impl Iterator<Item = &ColumnReport> + '_ {
        self.groups.iter().flat_map(|g| g.columns.iter())
    }

    /// Targeted columns outside tolerance.
    pub fn violations(&self) -> impl Iterator<Item = &ColumnReport> + '_ {
        self.columns().filter(|c| !c.within_tolerance)
    }
}

impl fmt::Display for SelectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Deck of {} records, energy {:.2}, tolerance {:.1}%: {}",
            self.deck_size,
            self.energy,
            self.tolerance,
            if self.feasible { "met" } else { "not met" }
        )?;
        for group in &self.groups {
            writeln!(
                f,
                "\nGroup '{}' (target {:.2}% per column, any-column {:.1}%):",
                group.name, group.target, group.union_observed
            )?;
            for c in &group.columns {
                writeln!(
                    f,
                    "  - col {}{}: {:.1}% (target {:.1}%) {}",
                    c.column,
                    label(&c.name),
                    c.observed,
                    c.target,
                    if c.within_tolerance { "OK" } else { "OUT" }
                )?;
            }
        }
        if !self.individuals.is_empty() {
            writeln!(f, "\nIndividual features:")?;
            for i in &self.individuals {
                writeln!(
                    f,
                    "  - col {}{}: {:.1}% {}",
                    i.column,
                    label(&i.name),
                    i.observed,
                    if i.present { "present" } else { "MISSING" }
                )?;
            }
        }
        Ok(())
    }
}

fn label(name: &Option<String>) -> String {
    match name {
        Some(n) if !n.trim().is_empty() => format!(" ({})", n.trim()),
        _ => String::new(),
    }
}

/// Which records to list for a finished deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ListingMode {
    /// The whole deck.
    #[default]
    Full,
    /// Deck records that are not mandatory.
    Added,
    /// Pool records left out of the deck.
    Removed,
}

/// Records to show for `mode`, in deck order (pool order for `Removed`).
pub fn listing<'a>(
    pool: &'a RecordPool,
    deck: &Deck,
    plan: &SelectionPlan,
    mode: ListingMode,
) -> Vec<&'a Record> {
    match mode {
        ListingMode::Full => deck.members().iter().map(|&id| pool.get(id)).collect(),
        ListingMode::Added => deck
            .members()
            .iter()
            .filter(|&&id| !plan.is_mandatory(id))
            .map(|&id| pool.get(id))
            .collect(),
        ListingMode::Removed => {
            let in_deck = deck.mask(pool.len());
            pool.records()
                .iter()
                .filter(|r| !in_deck[r.id().index()])
                .collect()
        }
    }
}
