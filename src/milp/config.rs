//! MILP formulation configurations.

/// Big-M magnitude used by the coordinate model's disjunctions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BigMMode {
    /// Half the item extents on top of the strip and skyline sizes.
    #[default]
    Tight,
    /// The full item extents on top of the strip and skyline sizes.
    Loose,
}

/// Configuration for the level (shelf) model.
///
/// # Examples
///
/// ```
/// use u_strip::milp::LevelConfig;
///
/// let config = LevelConfig::default().with_max_levels(4).with_time_limit_ms(10_000);
/// assert_eq!(config.resolved_levels(10), 4);
/// assert_eq!(LevelConfig::default().resolved_levels(7), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelConfig {
    pub allow_rotation: bool,
    /// Candidate level count. `None` uses `ceil(n / 2) + 1`.
    pub max_levels: Option<usize>,
    /// Wall-clock budget handed to the backend.
    pub time_limit_ms: u64,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            allow_rotation: true,
            max_levels: None,
            time_limit_ms: 60_000,
        }
    }
}

impl LevelConfig {
    pub fn with_allow_rotation(mut self, allow: bool) -> Self {
        self.allow_rotation = allow;
        self
    }

    pub fn with_max_levels(mut self, levels: usize) -> Self {
        self.max_levels = Some(levels);
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    /// Level count for `n` items, never above `n`.
    pub fn resolved_levels(&self, n: usize) -> usize {
        self.max_levels
            .unwrap_or(n.div_ceil(2) + 1)
            .min(n.max(1))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_levels == Some(0) {
            return Err("max_levels must be at least 1 or None".into());
        }
        if self.time_limit_ms == 0 {
            return Err("time_limit_ms must be positive".into());
        }
        Ok(())
    }
}

/// Configuration for the coordinate model.
///
/// # Examples
///
/// ```
/// use u_strip::milp::{BigMMode, CoordinateConfig};
///
/// let config = CoordinateConfig::default()
///     .with_big_m(BigMMode::Loose)
///     .with_guide_radius(0);
/// assert!(config.warm_start);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateConfig {
    pub allow_rotation: bool,
    pub big_m: BigMMode,
    /// Seed the backend with the skyline solution.
    pub warm_start: bool,
    /// Half-width of the box around each warm-start coordinate the item is
    /// confined to. Only applied with zero kerf; 0 disables it.
    pub guide_radius: i64,
    /// Wall-clock budget handed to the backend.
    pub time_limit_ms: u64,
}

impl Default for CoordinateConfig {
    fn default() -> Self {
        Self {
            allow_rotation: true,
            big_m: BigMMode::Tight,
            warm_start: true,
            guide_radius: 2,
            time_limit_ms: 60_000,
        }
    }
}

impl CoordinateConfig {
    pub fn with_allow_rotation(mut self, allow: bool) -> Self {
        self.allow_rotation = allow;
        self
    }

    pub fn with_big_m(mut self, mode: BigMMode) -> Self {
        self.big_m = mode;
        self
    }

    pub fn with_warm_start(mut self, warm_start: bool) -> Self {
        self.warm_start = warm_start;
        self
    }

    pub fn with_guide_radius(mut self, radius: i64) -> Self {
        self.guide_radius = radius;
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.guide_radius < 0 {
            return Err("guide_radius must be non-negative".into());
        }
        if self.time_limit_ms == 0 {
            return Err("time_limit_ms must be positive".into());
        }
        Ok(())
    }
}
