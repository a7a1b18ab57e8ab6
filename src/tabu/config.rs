//! Tabu Search configuration.

/// Smallest tenure used when none is configured.
pub const MIN_TENURE: usize = 5;

/// Configuration parameters for Tabu Search.
///
/// # Examples
///
/// ```
/// use u_strip::tabu::TabuConfig;
///
/// let config = TabuConfig::default()
///     .with_neighborhood_size(50)
///     .with_tabu_tenure(7)
///     .with_max_iterations(1000);
/// assert_eq!(config.neighborhood_size, 50);
/// assert_eq!(config.tabu_tenure, Some(7));
/// assert_eq!(TabuConfig::default().resolved_tenure(120), 12);
/// ```
#[derive(Debug, Clone)]
pub struct TabuConfig {
    /// Candidate moves sampled per iteration.
    pub neighborhood_size: usize,
    /// Probability that a candidate also flips one orientation bit.
    pub flip_probability: f64,
    /// How many moves the tabu list remembers. `None` scales with the
    /// instance, see [`resolved_tenure`](Self::resolved_tenure).
    pub tabu_tenure: Option<usize>,
    /// Whether a tabu move producing a new global best is admissible.
    pub aspiration: bool,
    /// Optional iteration cap. `None` runs until the time limit.
    pub max_iterations: Option<usize>,
    /// Wall-clock budget in milliseconds.
    pub time_limit_ms: u64,
    /// Random seed (None for random).
    pub seed: Option<u64>,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self {
            neighborhood_size: 30,
            flip_probability: 0.5,
            tabu_tenure: None,
            aspiration: false,
            max_iterations: None,
            time_limit_ms: 5_000,
            seed: None,
        }
    }
}

impl TabuConfig {
    pub fn with_neighborhood_size(mut self, n: usize) -> Self {
        self.neighborhood_size = n;
        self
    }

    /// Sets the flip probability, clamped to `[0, 1]`.
    pub fn with_flip_probability(mut self, p: f64) -> Self {
        self.flip_probability = p.clamp(0.0, 1.0);
        self
    }

    pub fn with_tabu_tenure(mut self, tenure: usize) -> Self {
        self.tabu_tenure = Some(tenure);
        self
    }

    pub fn with_aspiration(mut self, aspiration: bool) -> Self {
        self.aspiration = aspiration;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = Some(n);
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

    /// Configured tenure, or `max(5, n / 10)` for a problem of `n` items.
    pub fn resolved_tenure(&self, n: usize) -> usize {
        self.tabu_tenure.unwrap_or_else(|| (n / 10).max(MIN_TENURE))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.neighborhood_size == 0 {
            return Err("neighborhood_size must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.flip_probability) {
            return Err(format!(
                "flip_probability must be in [0, 1], got {}",
                self.flip_probability
            ));
        }
        if self.tabu_tenure == Some(0) {
            return Err("tabu_tenure must be at least 1 or None".into());
        }
        if self.max_iterations == Some(0) {
            return Err("max_iterations must be at least 1 or None".into());
        }
        if self.time_limit_ms == 0 {
            return Err("time_limit_ms must be positive".into());
        }
        Ok(())
    }
}
