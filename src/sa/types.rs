//! Core trait for Simulated Annealing.

use rand::Rng;

/// Defines a Simulated Annealing problem.
///
/// The problem supplies the initial state, neighbor generation and cost;
/// the runner handles temperature, acceptance and cooling.
///
/// SA minimizes the cost function.
///
/// # Examples
///
/// ```ignore
/// struct Ordering { weights: Vec<f64> }
///
/// impl SaProblem for Ordering {
///     type Solution = Vec<usize>;
///
///     fn initial_solution<R: Rng>(&self, rng: &mut R) -> Vec<usize> {
///         let mut perm: Vec<usize> = (0..self.weights.len()).collect();
///         perm.shuffle(rng);
///         perm
///     }
///
///     fn cost(&self, perm: &Vec<usize>) -> f64 {
///         perm.iter().enumerate().map(|(i, &j)| i as f64 * self.weights[j]).sum()
///     }
///
///     fn neighbor<R: Rng>(&self, perm: &Vec<usize>, rng: &mut R) -> Vec<usize> {
///         let mut next = perm.clone();
///         swap_mutation(&mut next, rng);
///         next
///     }
/// }
/// ```
///
/// # References
///
/// Kirkpatrick et al. (1983), Cerny (1985)
pub trait SaProblem: Send + Sync {
    type Solution: Clone + Send;

    fn initial_solution<R: Rng>(&self, rng: &mut R) -> Self::Solution;

    /// Cost of a solution. Lower is better.
    fn cost(&self, solution: &Self::Solution) -> f64;

    /// A small random perturbation of `solution`.
    fn neighbor<R: Rng>(&self, solution: &Self::Solution, rng: &mut R) -> Self::Solution;
}
