//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

use super::selection::Selection;

/// Configuration for the Genetic Algorithm.
///
/// # Defaults
///
/// ```
/// use u_strip::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 40);
/// assert_eq!(config.elite_count, 4);
/// assert_eq!(config.time_limit_ms, 5_000);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_strip::ga::{GaConfig, Selection};
///
/// let config = GaConfig::default()
///     .with_population_size(60)
///     .with_selection(Selection::Tournament(3))
///     .with_max_generations(200)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct GaConfig {
    /// Number of individuals in the population.
    pub population_size: usize,

    /// Number of best individuals copied unchanged into the next generation.
    pub elite_count: usize,

    /// Selection strategy for choosing parents.
    pub selection: Selection,

    /// Probability of applying the structural mutation to a child (0.0–1.0).
    pub mutation_rate: f64,

    /// Per-gene probability of a point mutation (0.0–1.0).
    pub bit_flip_rate: f64,

    /// Optional generation cap. `None` runs until the time limit.
    pub max_generations: Option<usize>,

    /// Wall-clock budget in milliseconds.
    ///
    /// Checked at the start of each generation, so the actual runtime may
    /// exceed it by one generation's worth of work.
    pub time_limit_ms: u64,

    /// Random seed for reproducibility. `None` draws a fresh seed.
    pub seed: Option<u64>,

    /// Whether to evaluate offspring in parallel.
    ///
    /// Only has an effect with the `parallel` feature. Evaluation is pure,
    /// so results do not depend on this flag.
    pub parallel: bool,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 40,
            elite_count: 4,
            selection: Selection::default(),
            mutation_rate: 0.1,
            bit_flip_rate: 0.05,
            max_generations: None,
            time_limit_ms: 5_000,
            seed: None,
            parallel: true,
        }
    }
}

impl GaConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_elite_count(mut self, n: usize) -> Self {
        self.elite_count = n;
        self
    }

    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    /// Sets the mutation rate, clamped to `[0, 1]`.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the per-gene flip rate, clamped to `[0, 1]`.
    pub fn with_bit_flip_rate(mut self, rate: f64) -> Self {
        self.bit_flip_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = Some(n);
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size < 2 {
            return Err("population_size must be at least 2".into());
        }
        if self.elite_count >= self.population_size {
            return Err(format!(
                "elite_count ({}) must be smaller than population_size ({})",
                self.elite_count, self.population_size
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(format!(
                "mutation_rate must be in [0, 1], got {}",
                self.mutation_rate
            ));
        }
        if !(0.0..=1.0).contains(&self.bit_flip_rate) {
            return Err(format!(
                "bit_flip_rate must be in [0, 1], got {}",
                self.bit_flip_rate
            ));
        }
        if let Selection::Tournament(0) = self.selection {
            return Err("tournament size must be at least 1".into());
        }
        if self.max_generations == Some(0) {
            return Err("max_generations must be at least 1 or None".into());
        }
        if self.time_limit_ms == 0 {
            return Err("time_limit_ms must be positive".into());
        }
        Ok(())
    }
}
