//! Simulated Annealing (SA).
//!
//! A single-solution trajectory metaheuristic inspired by the physical
//! annealing process. Accepts worsening moves with a probability that
//! decreases over time (temperature), allowing the search to escape
//! local optima.
//!
//! This variant runs a fixed iteration budget under geometric cooling and
//! stops early as soon as the best solution satisfies the problem's
//! feasibility test. Infinite cost marks a hard-constraint violation:
//! the search never moves into an infinite state and always leaves one
//! when offered a finite neighbor.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast Computing Machines"

mod config;
mod runner;
mod types;

pub use config::SaConfig;
pub use runner::{SaOutcome, SaResult, SaRunner};
pub use types::SaProblem;
