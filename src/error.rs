//! Error types.

use crate::record::ColumnId;
use thiserror::Error;

/// Invalid selection configuration. Detected before any iteration runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("deck size must be at least 1")]
    ZeroSize,

    #[error("deck size {size} exceeds the pool of {pool} records")]
    SizeExceedsPool { size: usize, pool: usize },

    #[error("{mandatory} mandatory records do not fit in a deck of {size}")]
    MandatoryExceedsSize { mandatory: usize, size: usize },

    #[error("column {column} is outside the record width of {width}")]
    ColumnOutOfRange { column: ColumnId, width: usize },

    #[error("column {column} is assigned more than once")]
    DuplicateColumn { column: ColumnId },

    #[error("group '{group}' has no columns")]
    EmptyGroup { group: String },

    #[error("target {target}% for group '{group}' is outside [0, 100]")]
    TargetOutOfRange { group: String, target: f64 },

    #[error("tolerance must be a non-negative percentage, got {0}")]
    NegativeTolerance(f64),

    #[error("invalid annealing parameters: {0}")]
    Annealing(String),
}

/// Errors surfaced by deck selection and its I/O helpers.
#[derive(Error, Debug)]
pub enum DeckError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The pool ran out before the deck reached the required size.
    #[error("cannot assemble a deck of {required} records, only {available} available")]
    Initialization { required: usize, available: usize },

    #[error("input has no header row")]
    EmptyInput,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, DeckError>;
