//! Core trait for Simulated Annealing.

use rand::Rng;

/// Defines a Simulated Annealing problem.
///
/// The user implements neighbor generation, cost evaluation and the
/// feasibility test. The SA framework handles temperature management,
/// the acceptance criterion, cooling and best-solution tracking.
///
/// # Minimization
///
/// SA minimizes the cost function. Return `f64::INFINITY` for solutions
/// that violate a hard constraint.
///
/// # Examples
///
/// ```ignore
/// struct Parity { n: usize }
///
/// impl SaProblem for Parity {
///     type Solution = Vec<bool>;
///
///     fn cost(&self, bits: &Vec<bool>) -> f64 {
///         bits.iter().filter(|&&b| b).count() as f64
///     }
///
///     fn neighbor<R: Rng>(&self, bits: &Vec<bool>, rng: &mut R) -> Option<Vec<bool>> {
///         let mut next = bits.clone();
///         let i = rng.random_range(0..self.n);
///         next[i] = !next[i];
///         Some(next)
///     }
/// }
/// ```
pub trait SaProblem {
    /// The solution representation type.
    type Solution: Clone;

    /// Computes the cost of a solution. Lower is better.
    fn cost(&self, solution: &Self::Solution) -> f64;

    /// Generates a neighbor of the current solution.
    ///
    /// Returns `None` when no move is possible from `solution`; the
    /// iteration is then skipped (the temperature still cools).
    fn neighbor<R: Rng>(&self, solution: &Self::Solution, rng: &mut R) -> Option<Self::Solution>;

    /// Whether `solution` is good enough to stop the search.
    ///
    /// Evaluated on every new best solution. The default never stops early.
    fn is_feasible(&self, _solution: &Self::Solution) -> bool {
        false
    }
}
