//! Deck selection driver.

use super::builder::build_initial_deck;
use super::deck::Deck;
use super::feasibility::is_feasible;
use super::problem::DeckProblem;
use crate::config::{SelectionConfig, SelectionPlan};
use crate::error::{ConfigError, DeckError};
use crate::random::{create_rng, derive_seed};
use crate::record::RecordPool;
use crate::report::SelectionReport;
use crate::sa::{SaConfig, SaOutcome, SaRunner};
use rand::Rng;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, info};

/// Result of a deck selection run.
#[derive(Debug, Clone)]
pub struct SelectionOutcome {
    /// Best deck found (lowest energy).
    pub deck: Deck,

    /// Energy of `deck`; infinite when a hard constraint could not be met.
    pub energy: f64,

    /// Whether `deck` is within tolerance on every targeted column and
    /// carries every individual feature.
    pub feasible: bool,

    /// How the annealing loop ended.
    pub outcome: SaOutcome,

    /// Iterations consumed.
    pub iterations: usize,

    /// Accepted swaps.
    pub accepted_moves: usize,

    /// Best energy sampled during the run. Non-increasing.
    pub cost_history: Vec<f64>,

    /// The resolved configuration the run used.
    pub plan: SelectionPlan,

    /// Per-column observed vs. target table.
    pub report: SelectionReport,
}

impl SelectionOutcome {
    /// Feasible beats infeasible, then lower energy wins.
    fn is_better_than(&self, other: &SelectionOutcome) -> bool {
        match (self.feasible, other.feasible) {
            (true, false) => true,
            (false, true) => false,
            _ => self.energy < other.energy,
        }
    }
}

/// Selects decks with simulated annealing.
pub struct DeckRunner;

impl DeckRunner {
    /// Runs one selection with a generator seeded from `sa.seed`.
    ///
    /// # Errors
    ///
    /// [`DeckError::Config`] for an invalid configuration, detected before
    /// any iteration runs; [`DeckError::Initialization`] when no starting
    /// deck of the required size exists.
    pub fn select(
        pool: &RecordPool,
        config: &SelectionConfig,
        sa: &SaConfig,
    ) -> Result<SelectionOutcome, DeckError> {
        let mut rng = create_rng(sa.seed);
        Self::select_with_rng(pool, config, sa, &mut rng, None)
    }

    /// Like [`DeckRunner::select`], stopping early once `cancel` is set.
    pub fn select_with_cancel(
        pool: &RecordPool,
        config: &SelectionConfig,
        sa: &SaConfig,
        cancel: Arc<AtomicBool>,
    ) -> Result<SelectionOutcome, DeckError> {
        let mut rng = create_rng(sa.seed);
        Self::select_with_rng(pool, config, sa, &mut rng, Some(cancel))
    }

    /// Runs one selection with an injected random source and an optional
    /// cancellation flag, polled once per iteration.
    pub fn select_with_rng<R: Rng>(
        pool: &RecordPool,
        config: &SelectionConfig,
        sa: &SaConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SelectionOutcome, DeckError> {
        let plan = Self::prepare(pool, config, sa)?;
        Self::run_plan(pool, config, plan, sa, rng, cancel)
    }

    /// Runs `restarts` independent selections and keeps the best.
    ///
    /// Restart `i` is seeded from `sa.seed` (or a fresh random seed) mixed
    /// with `i`, so a seeded call is reproducible. With the `parallel`
    /// feature the restarts run on the rayon thread pool.
    pub fn select_multistart(
        pool: &RecordPool,
        config: &SelectionConfig,
        sa: &SaConfig,
        restarts: usize,
    ) -> Result<SelectionOutcome, DeckError> {
        let plan = Self::prepare(pool, config, sa)?;
        let base = sa.seed.unwrap_or_else(rand::random);
        let restarts = restarts.max(1);

        let run = |i: usize| {
            let mut rng = create_rng(Some(derive_seed(base, i as u64)));
            Self::run_plan(pool, config, plan.clone(), sa, &mut rng, None)
        };

        let first = run(0)?;

        #[cfg(feature = "parallel")]
        let rest: Vec<Result<SelectionOutcome, DeckError>> = {
            use rayon::prelude::*;
            (1..restarts).into_par_iter().map(run).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let rest: Vec<Result<SelectionOutcome, DeckError>> = (1..restarts).map(run).collect();

        rest.into_iter().try_fold(first, |best, outcome| {
            let outcome = outcome?;
            Ok(if outcome.is_better_than(&best) {
                outcome
            } else {
                best
            })
        })
    }

    fn prepare(
        pool: &RecordPool,
        config: &SelectionConfig,
        sa: &SaConfig,
    ) -> Result<SelectionPlan, DeckError> {
        sa.validate().map_err(ConfigError::Annealing)?;
        Ok(config.resolve(pool)?)
    }

    fn run_plan<R: Rng>(
        pool: &RecordPool,
        config: &SelectionConfig,
        plan: SelectionPlan,
        sa: &SaConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SelectionOutcome, DeckError> {
        let initial = build_initial_deck(pool, &plan, rng)?;
        let problem = DeckProblem::new(pool, &plan);

        let result = SaRunner::run_with_rng(&problem, initial, sa, rng, cancel)
            .map_err(ConfigError::Annealing)?;

        let feasible = is_feasible(pool, &result.best, &plan);
        match result.outcome {
            SaOutcome::Feasible { iteration } => {
                info!(iteration, energy = result.best_cost, "deck within tolerance")
            }
            SaOutcome::Exhausted => info!(
                iterations = result.iterations,
                energy = result.best_cost,
                "iteration budget exhausted, returning best deck found"
            ),
            SaOutcome::Cancelled => info!(iterations = result.iterations, "selection cancelled"),
        }
        debug!(
            accepted = result.accepted_moves,
            improving = result.improving_moves,
            skipped = result.skipped_moves,
            final_temperature = result.final_temperature,
            "annealing statistics"
        );

        let report = SelectionReport::new(
            pool,
            config,
            &plan,
            &result.best,
            result.best_cost,
            feasible,
        );
        Ok(SelectionOutcome {
            deck: result.best,
            energy: result.best_cost,
            feasible,
            outcome: result.outcome,
            iterations: result.iterations,
            accepted_moves: result.accepted_moves,
            cost_history: result.cost_history,
            plan,
            report,
        })
    }
}
