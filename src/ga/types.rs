//! Core trait definitions for the GA framework.
//!
//! The two central traits, [`Individual`] and [`GaProblem`], define the
//! contract between the generic GA engine and the problem being solved.

use rand::Rng;

/// Marker trait for fitness values.
///
/// Lower fitness is better (minimization). Built-in implementations exist
/// for `i64` (strip heights) and `f64`.
pub trait Fitness: PartialOrd + Copy + Send + Sync + std::fmt::Debug + 'static {
    /// The worst possible fitness, used for individuals that failed to evaluate.
    fn worst() -> Self;

    /// Converts the fitness to `f64` for histories and logging.
    fn to_f64(self) -> f64;
}

impl Fitness for i64 {
    fn worst() -> Self {
        i64::MAX
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Fitness for f64 {
    fn worst() -> Self {
        f64::INFINITY
    }

    fn to_f64(self) -> f64 {
        self
    }
}

/// A candidate solution in the GA population.
///
/// Individuals carry their own fitness value. The runner calls
/// [`GaProblem::evaluate`] and stores the result via
/// [`set_fitness`](Individual::set_fitness).
pub trait Individual: Clone + Send + Sync {
    type Fitness: Fitness;

    fn fitness(&self) -> Self::Fitness;

    fn set_fitness(&mut self, fitness: Self::Fitness);
}

/// Defines a GA optimization problem.
///
/// # Thread Safety
///
/// `GaProblem` must be `Send + Sync` because offspring may be evaluated in
/// parallel (`parallel` feature).
pub trait GaProblem: Send + Sync {
    type Individual: Individual;

    /// Creates a random individual.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;

    /// Evaluates an individual. Lower is better.
    ///
    /// Must be pure: the same individual always gets the same fitness.
    fn evaluate(&self, individual: &Self::Individual) -> <Self::Individual as Individual>::Fitness;

    /// Produces one or two offspring from two parents.
    ///
    /// The default implementation clones `parent1`.
    fn crossover<R: Rng>(
        &self,
        parent1: &Self::Individual,
        _parent2: &Self::Individual,
        _rng: &mut R,
    ) -> Vec<Self::Individual> {
        vec![parent1.clone()]
    }

    /// Structural mutation, applied to a child with probability
    /// [`mutation_rate`](super::GaConfig::mutation_rate).
    fn mutate<R: Rng>(&self, _individual: &mut Self::Individual, _rng: &mut R) {}

    /// Point mutation, applied to every child. Each gene flips independently
    /// with probability `rate`.
    fn flip_bits<R: Rng>(&self, _individual: &mut Self::Individual, _rate: f64, _rng: &mut R) {}
}
