//! Core trait for Tabu Search problems.

use rand::Rng;
use std::hash::Hash;

/// A candidate move: the solution it leads to and the key it is remembered by.
///
/// Moves with equal keys are considered equivalent (e.g. swapping the same
/// pair of items in either order).
#[derive(Debug, Clone)]
pub struct TabuMove<S, K> {
    pub solution: S,
    pub key: K,
}

/// Defines a combinatorial optimization problem for Tabu Search.
///
/// Candidates are proposed without a cost; the runner discards tabu moves
/// first and only evaluates the admissible ones.
pub trait TabuProblem: Send + Sync {
    type Solution: Clone + Send;

    /// Move identity stored in the tabu list.
    type Key: Clone + Eq + Hash + Send;

    fn initial_solution<R: Rng>(&self, rng: &mut R) -> Self::Solution;

    /// Cost of a solution (lower is better).
    fn cost(&self, solution: &Self::Solution) -> f64;

    /// Samples up to `size` candidate moves from `solution`.
    ///
    /// The neighborhood need not be exhaustive; a random sample is fine.
    fn neighbors<R: Rng>(
        &self,
        solution: &Self::Solution,
        size: usize,
        rng: &mut R,
    ) -> Vec<TabuMove<Self::Solution, Self::Key>>;
}
