//! Parent selection.
//!
//! Both strategies assume **minimization** and a population sorted by
//! fitness ascending, which the runner guarantees.

use super::types::Individual;
use rand::Rng;

/// Selection strategy for choosing parents.
///
/// # Examples
///
/// ```
/// use u_strip::ga::Selection;
///
/// assert_eq!(Selection::default(), Selection::BetterHalf);
/// let _pressure = Selection::Tournament(3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    /// Uniform choice among the better half of the sorted population
    /// (at least the two best individuals).
    #[default]
    BetterHalf,

    /// Pick `k` individuals uniformly, keep the best.
    Tournament(usize),
}

impl Selection {
    /// Selects a parent index from a population sorted best-first.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    pub fn select<I: Individual, R: Rng>(&self, population: &[I], rng: &mut R) -> usize {
        assert!(
            !population.is_empty(),
            "cannot select from empty population"
        );

        match self {
            Selection::BetterHalf => better_half(population.len(), rng),
            Selection::Tournament(k) => tournament(population, *k, rng),
        }
    }
}

fn better_half<R: Rng>(n: usize, rng: &mut R) -> usize {
    let pool = (n / 2).max(2).min(n);
    rng.random_range(0..pool)
}

fn tournament<I: Individual, R: Rng>(population: &[I], k: usize, rng: &mut R) -> usize {
    let n = population.len();
    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k.max(1) {
        let idx = rng.random_range(0..n);
        if population[idx].fitness() < population[best_idx].fitness() {
            best_idx = idx;
        }
    }
    best_idx
}
