//! SA configuration and cooling schedules.

/// How the temperature moves from `initial_temperature` to
/// `final_temperature` over `max_iterations`.
///
/// Both schedules are functions of the iteration fraction `it / max_iterations`,
/// so the temperature at a given iteration does not depend on past acceptances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoolingSchedule {
    /// `T = T0 · (Tend / T0)^(it / max_iterations)`.
    #[default]
    Exponential,

    /// `T = T0 + (Tend − T0) · it / max_iterations`.
    Linear,
}

impl CoolingSchedule {
    /// Temperature at `iteration` out of `max_iterations`.
    pub fn temperature(
        &self,
        initial: f64,
        end: f64,
        iteration: usize,
        max_iterations: usize,
    ) -> f64 {
        let frac = if max_iterations == 0 {
            1.0
        } else {
            iteration as f64 / max_iterations as f64
        };
        match self {
            CoolingSchedule::Exponential => initial * (end / initial).powf(frac),
            CoolingSchedule::Linear => initial + (end - initial) * frac,
        }
    }
}

/// Configuration for Simulated Annealing.
///
/// ```
/// use u_strip::sa::{CoolingSchedule, SaConfig};
///
/// let config = SaConfig::default()
///     .with_cooling(CoolingSchedule::Linear)
///     .with_max_iterations(2_000)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct SaConfig {
    /// Starting temperature `T0`.
    pub initial_temperature: f64,

    /// Temperature reached at the last iteration, `Tend`.
    pub final_temperature: f64,

    pub cooling: CoolingSchedule,

    /// Iteration budget; also the denominator of the cooling fraction.
    pub max_iterations: usize,

    /// Wall-clock budget in milliseconds, checked before each iteration.
    pub time_limit_ms: u64,

    /// Random seed. `None` draws a fresh seed.
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1.0,
            final_temperature: 1e-3,
            cooling: CoolingSchedule::default(),
            max_iterations: 10_000,
            time_limit_ms: 5_000,
            seed: None,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_final_temperature(mut self, t: f64) -> Self {
        self.final_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
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

    pub fn validate(&self) -> Result<(), String> {
        if self.initial_temperature <= 0.0 {
            return Err("initial_temperature must be positive".into());
        }
        if self.final_temperature <= 0.0 {
            return Err("final_temperature must be positive".into());
        }
        if self.final_temperature >= self.initial_temperature {
            return Err("final_temperature must be less than initial_temperature".into());
        }
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1".into());
        }
        if self.time_limit_ms == 0 {
            return Err("time_limit_ms must be positive".into());
        }
        Ok(())
    }
}
