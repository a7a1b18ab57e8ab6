//! SA execution loop.

use super::config::SaConfig;
use super::types::SaProblem;
use crate::random::rng_from;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Temperatures below this are clamped in the acceptance test.
const MIN_TEMPERATURE: f64 = 1e-6;

/// Iterations between two cost history samples.
const HISTORY_INTERVAL: usize = 100;

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone)]
pub struct SaResult<S: Clone> {
    /// The best solution found.
    pub best: S,

    /// Cost of the best solution.
    pub best_cost: f64,

    /// Total number of iterations (neighbor evaluations).
    pub iterations: usize,

    /// Temperature at the last executed iteration.
    pub final_temperature: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of improving moves.
    pub improving_moves: usize,

    /// Whether the run stopped on the wall-clock deadline.
    pub timed_out: bool,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Best cost sampled every 100 iterations, plus the final value.
    pub cost_history: Vec<f64>,
}

/// Executes the Simulated Annealing algorithm.
///
/// Each iteration draws one neighbor of the current state, accepts it
/// when it improves or with probability `exp(-Δ / T)` otherwise, and
/// checks it against the best-ever state whether accepted or not.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA optimization.
    ///
    /// # Panics
    /// Panics if the configuration is invalid.
    pub fn run<P: SaProblem>(problem: &P, config: &SaConfig) -> SaResult<P::Solution> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs SA with an optional cancellation token.
    pub fn run_with_cancel<P: SaProblem>(
        problem: &P,
        config: &SaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> SaResult<P::Solution> {
        config.validate().expect("invalid SaConfig");

        let deadline = Instant::now() + Duration::from_millis(config.time_limit_ms);
        let mut rng = rng_from(config.seed);

        let mut current = problem.initial_solution(&mut rng);
        let mut current_cost = problem.cost(&current);
        let mut best = current.clone();
        let mut best_cost = current_cost;

        let mut temperature = config.initial_temperature;
        let mut iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut timed_out = false;
        let mut cancelled = false;

        let mut cost_history = vec![best_cost];

        for it in 0..config.max_iterations {
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

            let candidate = problem.neighbor(&current, &mut rng);
            let candidate_cost = problem.cost(&candidate);
            let delta = candidate_cost - current_cost;
            temperature = config.cooling.temperature(
                config.initial_temperature,
                config.final_temperature,
                it,
                config.max_iterations,
            );

            if candidate_cost < best_cost {
                best = candidate.clone();
                best_cost = candidate_cost;
            }

            // Metropolis acceptance criterion
            let accept = if delta < 0.0 {
                improving_moves += 1;
                true
            } else {
                let probability = (-delta / temperature.max(MIN_TEMPERATURE)).exp();
                rng.random_range(0.0..1.0) < probability
            };

            if accept {
                current = candidate;
                current_cost = candidate_cost;
                accepted_moves += 1;
            }

            iterations += 1;
            if iterations % HISTORY_INTERVAL == 0 {
                cost_history.push(best_cost);
            }
        }

        if cost_history
            .last()
            .map_or(true, |&last| (last - best_cost).abs() > 1e-15)
        {
            cost_history.push(best_cost);
        }

        log::debug!(
            "sa: {iterations} iterations, {accepted_moves} accepted, best {best_cost} (T = {temperature:.2e})"
        );

        SaResult {
            best,
            best_cost,
            iterations,
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
            timed_out,
            cancelled,
            cost_history,
        }
    }
}
