//! SA execution loop.

use super::config::SaConfig;
use super::types::SaProblem;
use crate::random::create_rng;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// How a Simulated Annealing run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SaOutcome {
    /// The best solution passed the feasibility test.
    ///
    /// `iteration` is the 1-based iteration that produced it; 0 means the
    /// initial solution was already feasible.
    Feasible { iteration: usize },

    /// The iteration budget ran out without a feasible best solution.
    Exhausted,

    /// Stopped through the cancellation flag.
    Cancelled,
}

impl SaOutcome {
    pub fn is_feasible(&self) -> bool {
        matches!(self, SaOutcome::Feasible { .. })
    }
}

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone)]
pub struct SaResult<S: Clone> {
    /// The best solution found.
    pub best: S,

    /// Cost of the best solution.
    pub best_cost: f64,

    /// Iterations consumed, skipped ones included.
    pub iterations: usize,

    /// Final temperature when the algorithm stopped.
    pub final_temperature: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of improving moves.
    pub improving_moves: usize,

    /// Iterations where the problem offered no neighbor.
    pub skipped_moves: usize,

    /// Terminal state.
    pub outcome: SaOutcome,

    /// Best cost sampled at regular intervals. Non-increasing.
    pub cost_history: Vec<f64>,
}

/// Executes the Simulated Annealing algorithm.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA from `initial` with a generator seeded from `config.seed`.
    ///
    /// # Errors
    ///
    /// Returns the validation message when `config` is invalid.
    pub fn run<P: SaProblem>(
        problem: &P,
        initial: P::Solution,
        config: &SaConfig,
    ) -> Result<SaResult<P::Solution>, String> {
        let mut rng = create_rng(config.seed);
        Self::run_with_rng(problem, initial, config, &mut rng, None)
    }

    /// Runs SA with an injected random source and an optional cancellation flag.
    ///
    /// `config.seed` is ignored; the caller owns the generator. The flag is
    /// polled once per iteration.
    pub fn run_with_rng<P: SaProblem, R: Rng>(
        problem: &P,
        initial: P::Solution,
        config: &SaConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SaResult<P::Solution>, String> {
        config.validate()?;

        let mut current = initial;
        let mut current_cost = problem.cost(&current);
        let mut best = current.clone();
        let mut best_cost = current_cost;

        let mut temperature = config.initial_temperature;
        let mut total_iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut skipped_moves = 0usize;

        let mut cost_history = vec![best_cost];

        let mut outcome = if problem.is_feasible(&best) {
            SaOutcome::Feasible { iteration: 0 }
        } else {
            SaOutcome::Exhausted
        };

        while outcome == SaOutcome::Exhausted && total_iterations < config.max_iterations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    outcome = SaOutcome::Cancelled;
                    break;
                }
            }

            total_iterations += 1;

            match problem.neighbor(&current, rng) {
                None => skipped_moves += 1,
                Some(neighbor) => {
                    let neighbor_cost = problem.cost(&neighbor);

                    if accept(current_cost, neighbor_cost, temperature, rng) {
                        if neighbor_cost < current_cost {
                            improving_moves += 1;
                        }
                        current = neighbor;
                        current_cost = neighbor_cost;
                        accepted_moves += 1;
                    }

                    if current_cost < best_cost {
                        best = current.clone();
                        best_cost = current_cost;
                        if problem.is_feasible(&best) {
                            outcome = SaOutcome::Feasible {
                                iteration: total_iterations,
                            };
                        }
                    }
                }
            }

            if total_iterations.is_multiple_of(config.history_interval) {
                cost_history.push(best_cost);
            }

            // Cool down
            temperature *= config.cooling_rate;
        }

        // Final history entry
        if cost_history.last().is_none_or(|&last| last != best_cost) {
            cost_history.push(best_cost);
        }

        Ok(SaResult {
            best,
            best_cost,
            iterations: total_iterations,
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
            skipped_moves,
            outcome,
            cost_history,
        })
    }
}

/// Metropolis acceptance with infinite-cost handling.
///
/// An improvement is always taken, including one that leaves an infinite
/// state. A move into an infinite state is never taken.
fn accept<R: Rng>(current_cost: f64, neighbor_cost: f64, temperature: f64, rng: &mut R) -> bool {
    if neighbor_cost < current_cost {
        return true;
    }
    if neighbor_cost.is_infinite() || temperature <= 0.0 {
        return false;
    }
    let probability = (-(neighbor_cost - current_cost) / temperature).exp();
    rng.random_range(0.0..1.0) < probability
}
