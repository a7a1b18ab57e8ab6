//! GA evolutionary loop execution.
//!
//! [`GaRunner`] orchestrates the complete evolutionary process:
//! initialization → evaluation → elitism → selection → crossover →
//! mutation → repeat, until the deadline, the generation cap, or
//! cancellation.

use super::config::GaConfig;
use super::types::{Fitness, GaProblem, Individual};
use crate::random::rng_from;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Result of a GA optimization run.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// The best individual found during the entire run.
    pub best: I,

    /// Best fitness value (same as `best.fitness()`).
    pub best_fitness: I::Fitness,

    /// Number of completed generations after the initial population.
    pub generations: usize,

    /// Whether the run stopped on the wall-clock deadline.
    pub timed_out: bool,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Best-so-far fitness: the initial population, then one entry per generation.
    pub fitness_history: Vec<f64>,
}

/// Executes the GA evolutionary loop.
///
/// The best individual is tracked across generations, so
/// `fitness_history` is non-increasing.
///
/// # Usage
///
/// ```ignore
/// let problem = MyProblem::new();
/// let config = GaConfig::default().with_seed(42);
/// let result = GaRunner::run(&problem, &config);
/// println!("Best fitness: {:?}", result.best_fitness);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA optimization.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call [`GaConfig::validate`] first
    /// to get a descriptive error).
    pub fn run<P: GaProblem>(problem: &P, config: &GaConfig) -> GaResult<P::Individual> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the GA stops
    /// before the next generation and returns the best individual so far.
    pub fn run_with_cancel<P: GaProblem>(
        problem: &P,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> GaResult<P::Individual> {
        config.validate().expect("invalid GaConfig");

        let deadline = Instant::now() + Duration::from_millis(config.time_limit_ms);
        let mut rng = rng_from(config.seed);

        // 1. Initialize and evaluate
        let mut population: Vec<P::Individual> = (0..config.population_size)
            .map(|_| problem.create_individual(&mut rng))
            .collect();
        evaluate_population(problem, &mut population, config.parallel);
        sort_population(&mut population);

        // 2. Track best
        let mut best = population[0].clone();
        let mut fitness_history = vec![best.fitness().to_f64()];

        let mut generations = 0usize;
        let mut timed_out = false;
        let mut cancelled = false;

        // 3. Evolutionary loop
        loop {
            if config.max_generations.is_some_and(|cap| generations >= cap) {
                break;
            }
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }
            if Instant::now() >= deadline {
                timed_out = true;
                break;
            }

            // Elite preservation
            let elite_count = config.elite_count;
            let mut next_gen: Vec<P::Individual> = population[..elite_count].to_vec();

            // Offspring
            while next_gen.len() < config.population_size {
                let p1 = config.selection.select(&population, &mut rng);
                let p2 = config.selection.select(&population, &mut rng);

                for mut child in problem.crossover(&population[p1], &population[p2], &mut rng) {
                    if next_gen.len() >= config.population_size {
                        break;
                    }
                    if rng.random_bool(config.mutation_rate) {
                        problem.mutate(&mut child, &mut rng);
                    }
                    problem.flip_bits(&mut child, config.bit_flip_rate, &mut rng);
                    next_gen.push(child);
                }
            }

            // Elites keep their fitness
            evaluate_population(problem, &mut next_gen[elite_count..], config.parallel);
            sort_population(&mut next_gen);
            population = next_gen;
            generations += 1;

            if population[0].fitness() < best.fitness() {
                best = population[0].clone();
            }
            fitness_history.push(best.fitness().to_f64());
        }

        log::debug!(
            "ga: {generations} generations, best {:?} (timed_out: {timed_out}, cancelled: {cancelled})",
            best.fitness()
        );

        GaResult {
            best_fitness: best.fitness(),
            best,
            generations,
            timed_out,
            cancelled,
            fitness_history,
        }
    }
}

/// Evaluates individuals in place.
fn evaluate_population<P: GaProblem>(
    problem: &P,
    population: &mut [P::Individual],
    parallel: bool,
) {
    #[cfg(feature = "parallel")]
    {
        if parallel {
            population.par_iter_mut().for_each(|ind| {
                let f = problem.evaluate(ind);
                ind.set_fitness(f);
            });
            return;
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    for ind in population.iter_mut() {
        let f = problem.evaluate(ind);
        ind.set_fitness(f);
    }
}

/// Stable sort by fitness, best first.
fn sort_population<I: Individual>(population: &mut [I]) {
    population.sort_by(|a, b| {
        a.fitness()
            .partial_cmp(&b.fitness())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

// ============================================================================
// Tests
// ============================================================================
