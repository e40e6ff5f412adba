//! Proportion-targeted deck selection.
//!
//! Picks a fixed-size subset ("deck") of records from a larger pool so that
//! boolean feature flags across the deck approximate target percentages,
//! while always including a mandatory subset and guaranteeing that certain
//! individual features appear on at least one selected record.
//!
//! - **Records** ([`record`]): rows of string cells, flagged with `"X"`.
//! - **Configuration** ([`config`]): feature groups with one target each,
//!   individual features, mandatory records, deck size and tolerance.
//! - **Selection** ([`selection`]): initial deck construction, swap
//!   neighbors, energy and feasibility, driven by simulated annealing.
//! - **Simulated Annealing** ([`sa`]): the generic annealing loop with
//!   geometric cooling, infinite-cost handling and feasibility early exit.
//! - **Reporting and I/O** ([`report`], [`io`]): per-column result tables,
//!   listings, CSV load and export.
//!
//! # Example
//!
//! ```
//! use u_deck::config::{FeatureGroup, SelectionConfig};
//! use u_deck::record::RecordPool;
//! use u_deck::sa::SaConfig;
//! use u_deck::selection::DeckRunner;
//!
//! let rows = (0..8)
//!     .map(|i| vec![format!("bird {i}"), if i < 4 { "X".into() } else { String::new() }])
//!     .collect();
//! let pool = RecordPool::from_rows(rows);
//! let config = SelectionConfig::new(4)
//!     .with_tolerance(5.0)
//!     .with_group(FeatureGroup::new("colour", [2], 50.0));
//!
//! let outcome = DeckRunner::select(&pool, &config, &SaConfig::default().with_seed(1)).unwrap();
//! assert!(outcome.feasible);
//! assert_eq!(outcome.deck.len(), 4);
//! ```

pub mod config;
pub mod error;
pub mod io;
pub mod meter;
pub mod random;
pub mod record;
pub mod report;
pub mod sa;
pub mod selection;

pub use error::{ConfigError, DeckError};
