//! Tabu Search execution engine.
//!
//! # Algorithm
//!
//! 1. Generate initial solution
//! 2. At each iteration:
//!    a. Sample a neighborhood and drop tabu moves (unless aspiration admits them)
//!    b. Evaluate the admissible moves and take the best one, even if it worsens
//!    c. Remember its key; the oldest key is forgotten once the list exceeds the tenure
//!    d. Update global best if improved
//! 3. Terminate on the deadline, the iteration cap, cancellation, or an
//!    empty admissible neighborhood
//!
//! # Reference
//!
//! Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3), 190-206.
//! Glover, F. (1990). "Tabu Search—Part II", *ORSA Journal on Computing* 2(1), 4-32.

use std::collections::HashSet;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::config::{TabuConfig, MIN_TENURE};
use super::types::TabuProblem;
use crate::random::rng_from;

/// Result of a Tabu Search run.
#[derive(Debug, Clone)]
pub struct TabuResult<S: Clone> {
    /// Best solution found.
    pub best: S,
    /// Cost of the best solution.
    pub best_cost: f64,
    /// Total iterations executed.
    pub iterations: usize,
    /// Iteration at which the best solution was found (0 = initial solution).
    pub best_iteration: usize,
    /// Whether the run stopped on the wall-clock deadline.
    pub timed_out: bool,
    /// Whether the run was cancelled externally.
    pub cancelled: bool,
    /// Whether the run stopped because every sampled move was tabu.
    pub exhausted: bool,
    /// Best cost after each iteration.
    pub cost_history: Vec<f64>,
}

/// FIFO tabu memory with O(1) membership.
struct TabuList<K> {
    queue: VecDeque<K>,
    set: HashSet<K>,
    tenure: usize,
}

impl<K: Clone + Eq + std::hash::Hash> TabuList<K> {
    fn new(tenure: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(tenure + 1),
            set: HashSet::with_capacity(tenure + 1),
            tenure,
        }
    }

    fn contains(&self, key: &K) -> bool {
        self.set.contains(key)
    }

    fn remember(&mut self, key: K) {
        if !self.set.insert(key.clone()) {
            return;
        }
        self.queue.push_back(key);
        if self.queue.len() > self.tenure {
            if let Some(old) = self.queue.pop_front() {
                self.set.remove(&old);
            }
        }
    }
}

/// Tabu Search runner.
pub struct TabuRunner;

impl TabuRunner {
    /// Executes Tabu Search on the given problem.
    ///
    /// A `None` tenure falls back to the minimum tenure of 5; callers that
    /// know the instance size resolve it with [`TabuConfig::resolved_tenure`].
    ///
    /// # Panics
    /// Panics if the configuration is invalid.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use u_strip::tabu::{TabuConfig, TabuMove, TabuProblem, TabuRunner};
    /// use rand::Rng;
    ///
    /// struct Walk;
    /// impl TabuProblem for Walk {
    ///     type Solution = i32;
    ///     type Key = i32;
    ///     fn initial_solution<R: Rng>(&self, _rng: &mut R) -> i32 { 0 }
    ///     fn cost(&self, x: &i32) -> f64 { ((x - 5) * (x - 5)) as f64 }
    ///     fn neighbors<R: Rng>(&self, x: &i32, _size: usize, _rng: &mut R) -> Vec<TabuMove<i32, i32>> {
    ///         vec![TabuMove { solution: x - 1, key: x - 1 }, TabuMove { solution: x + 1, key: x + 1 }]
    ///     }
    /// }
    ///
    /// let result = TabuRunner::run(&Walk, &TabuConfig::default().with_max_iterations(20));
    /// assert_eq!(result.best, 5);
    /// ```
    pub fn run<P: TabuProblem>(problem: &P, config: &TabuConfig) -> TabuResult<P::Solution> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs Tabu Search with an optional cancellation token.
    pub fn run_with_cancel<P: TabuProblem>(
        problem: &P,
        config: &TabuConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> TabuResult<P::Solution> {
        config.validate().expect("invalid TabuConfig");

        let deadline = Instant::now() + Duration::from_millis(config.time_limit_ms);
        let mut rng = rng_from(config.seed);

        let mut current = problem.initial_solution(&mut rng);
        let mut best = current.clone();
        let mut best_cost = problem.cost(&current);
        let mut best_iteration = 0;

        let mut tabu = TabuList::new(config.tabu_tenure.unwrap_or(MIN_TENURE));
        let mut cost_history = Vec::new();
        let mut iterations = 0usize;
        let mut timed_out = false;
        let mut cancelled = false;
        let mut exhausted = false;

        loop {
            if config.max_iterations.is_some_and(|cap| iterations >= cap) {
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

            // Best admissible move; ties keep the first sampled
            let mut chosen = None;
            let mut chosen_cost = f64::INFINITY;
            for mv in problem.neighbors(&current, config.neighborhood_size, &mut rng) {
                let is_tabu = tabu.contains(&mv.key);
                if is_tabu && !config.aspiration {
                    continue;
                }
                let cost = problem.cost(&mv.solution);
                if is_tabu && cost >= best_cost {
                    continue;
                }
                if chosen.is_none() || cost < chosen_cost {
                    chosen_cost = cost;
                    chosen = Some(mv);
                }
            }

            let Some(mv) = chosen else {
                exhausted = true;
                log::warn!("tabu: every sampled move is tabu, stopping after {iterations} iterations");
                break;
            };

            tabu.remember(mv.key);
            current = mv.solution;
            iterations += 1;

            if chosen_cost < best_cost {
                best = current.clone();
                best_cost = chosen_cost;
                best_iteration = iterations;
            }
            cost_history.push(best_cost);
        }

        log::debug!("tabu: {iterations} iterations, best {best_cost} at iteration {best_iteration}");

        TabuResult {
            best,
            best_cost,
            iterations,
            best_iteration,
            timed_out,
            cancelled,
            exhausted,
            cost_history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabu::{TabuConfig, TabuMove, TabuProblem};
    use rand::seq::SliceRandom;
    use rand::Rng;

    // ---- Quadratic minimization: f(x) = (x - 5)^2, minimum at x = 5 ----

    struct DiscretizedQuadratic;

    impl TabuProblem for DiscretizedQuadratic {
        type Solution = i32;
        type Key = i32;

        fn initial_solution<R: Rng>(&self, rng: &mut R) -> i32 {
            rng.random_range(-50..50)
        }

        fn cost(&self, &x: &i32) -> f64 {
            let d = x as f64 - 5.0;
            d * d
        }

        fn neighbors<R: Rng>(&self, &x: &i32, _size: usize, _rng: &mut R) -> Vec<TabuMove<i32, i32>> {
            vec![
                TabuMove {
                    solution: x - 1,
                    key: x - 1,
                },
                TabuMove {
                    solution: x + 1,
                    key: x + 1,
                },
            ]
        }
    }

    #[test]
    fn test_tabu_quadratic_finds_optimum() {
        let config = TabuConfig::default()
            .with_max_iterations(200)
            .with_tabu_tenure(3)
            .with_seed(42);
        let result = TabuRunner::run(&DiscretizedQuadratic, &config);
        assert_eq!(result.best, 5);
        assert!(result.best_cost < 1e-10);
        assert!(result.best_iteration <= result.iterations);
    }

    #[test]
    fn test_tabu_cost_history_non_increasing() {
        let config = TabuConfig::default()
            .with_max_iterations(100)
            .with_tabu_tenure(5)
            .with_seed(42);
        let result = TabuRunner::run(&DiscretizedQuadratic, &config);
        assert_eq!(result.cost_history.len(), result.iterations);
        for window in result.cost_history.windows(2) {
            assert!(window[1] <= window[0] + 1e-10);
        }
    }

    // ---- Permutation sorting with sampled swap neighborhoods ----

    struct PermSortTabu {
        n: usize,
    }

    impl TabuProblem for PermSortTabu {
        type Solution = Vec<usize>;
        type Key = (usize, usize);

        fn initial_solution<R: Rng>(&self, rng: &mut R) -> Vec<usize> {
            let mut perm: Vec<usize> = (0..self.n).collect();
            perm.shuffle(rng);
            perm
        }

        fn cost(&self, perm: &Vec<usize>) -> f64 {
            perm.iter().enumerate().filter(|&(i, &v)| i != v).count() as f64
        }

        fn neighbors<R: Rng>(
            &self,
            perm: &Vec<usize>,
            _size: usize,
            _rng: &mut R,
        ) -> Vec<TabuMove<Vec<usize>, (usize, usize)>> {
            let mut moves = Vec::new();
            for i in 0..self.n {
                for j in (i + 1)..self.n {
                    let mut next = perm.clone();
                    next.swap(i, j);
                    let (a, b) = (perm[i].min(perm[j]), perm[i].max(perm[j]));
                    moves.push(TabuMove {
                        solution: next,
                        key: (a, b),
                    });
                }
            }
            moves
        }
    }

    #[test]
    fn test_tabu_permutation_sort() {
        let config = TabuConfig::default()
            .with_max_iterations(300)
            .with_tabu_tenure(5)
            .with_seed(42);
        let result = TabuRunner::run(&PermSortTabu { n: 8 }, &config);
        assert!(result.best_cost < 1e-10, "got cost {}", result.best_cost);
    }

    // ---- Tabu list bookkeeping ----

    /// Every move improves; the path records which key was taken.
    struct KeyCycle;

    impl TabuProblem for KeyCycle {
        type Solution = Vec<u8>;
        type Key = u8;

        fn initial_solution<R: Rng>(&self, _rng: &mut R) -> Vec<u8> {
            Vec::new()
        }

        fn cost(&self, path: &Vec<u8>) -> f64 {
            -(path.len() as f64)
        }

        fn neighbors<R: Rng>(&self, path: &Vec<u8>, _size: usize, _rng: &mut R) -> Vec<TabuMove<Vec<u8>, u8>> {
            (0..3u8)
                .map(|k| {
                    let mut next = path.clone();
                    next.push(k);
                    TabuMove {
                        solution: next,
                        key: k,
                    }
                })
                .collect()
        }
    }

    #[test]
    fn test_fifo_eviction_order() {
        let config = TabuConfig::default()
            .with_tabu_tenure(2)
            .with_max_iterations(6)
            .with_seed(0);
        let result = TabuRunner::run(&KeyCycle, &config);
        assert_eq!(result.best, vec![0, 1, 2, 0, 1, 2]);
        assert!(!result.exhausted);
    }

    #[test]
    fn test_all_tabu_stops_search() {
        let config = TabuConfig::default()
            .with_tabu_tenure(3)
            .with_max_iterations(10)
            .with_seed(0);
        let result = TabuRunner::run(&KeyCycle, &config);
        assert!(result.exhausted);
        assert_eq!(result.iterations, 3);
        assert_eq!(result.best, vec![0, 1, 2]);
    }

    #[test]
    fn test_aspiration_admits_new_best() {
        let config = TabuConfig::default()
            .with_tabu_tenure(3)
            .with_aspiration(true)
            .with_max_iterations(5)
            .with_seed(0);
        let result = TabuRunner::run(&KeyCycle, &config);
        assert!(!result.exhausted);
        assert_eq!(result.iterations, 5);
    }

    #[test]
    fn test_empty_neighborhood() {
        struct Empty;

        impl TabuProblem for Empty {
            type Solution = i32;
            type Key = i32;

            fn initial_solution<R: Rng>(&self, _rng: &mut R) -> i32 {
                0
            }

            fn cost(&self, &x: &i32) -> f64 {
                x as f64
            }

            fn neighbors<R: Rng>(&self, _sol: &i32, _size: usize, _rng: &mut R) -> Vec<TabuMove<i32, i32>> {
                vec![]
            }
        }

        let result = TabuRunner::run(&Empty, &TabuConfig::default().with_seed(42));
        assert_eq!(result.best, 0);
        assert_eq!(result.iterations, 0);
        assert!(result.exhausted);
    }

    #[test]
    fn test_cancellation() {
        let cancel = Arc::new(AtomicBool::new(true));
        let result =
            TabuRunner::run_with_cancel(&DiscretizedQuadratic, &TabuConfig::default().with_seed(1), Some(cancel));
        assert!(result.cancelled);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_time_limit() {
        let config = TabuConfig::default().with_time_limit_ms(15).with_seed(1);
        let result = TabuRunner::run(&DiscretizedQuadratic, &config);
        assert!(result.timed_out);
        assert_eq!(result.best, 5);
    }
}
