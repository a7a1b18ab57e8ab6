//! Heuristic configuration.

/// Placement policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Policy {
    /// Next-Fit Decreasing Height shelves.
    #[default]
    Shelf,
    /// Skyline profile, bottom-left on the lowest segment.
    Skyline,
}

impl Policy {
    /// Method tag carried by produced solutions.
    pub fn method_tag(&self) -> &'static str {
        match self {
            Policy::Shelf => "Heuristic-NFDH",
            Policy::Skyline => "Heuristic-Skyline",
        }
    }
}

/// Configuration for [`HeuristicSolver`](super::HeuristicSolver).
///
/// # Examples
///
/// ```
/// use u_strip::heuristic::{HeuristicConfig, Policy};
///
/// let config = HeuristicConfig::default()
///     .with_policy(Policy::Skyline)
///     .with_allow_rotation(false);
/// assert_eq!(config.effective_policy(), Policy::Skyline);
/// assert_eq!(config.with_guillotine(true).effective_policy(), Policy::Shelf);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeuristicConfig {
    /// Placement policy.
    pub policy: Policy,

    /// Global rotation switch. Items with `rotatable = false` never rotate.
    pub allow_rotation: bool,

    /// Forces guillotine-cuttable layouts: Skyline is reduced to Shelf.
    pub guillotine: bool,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            policy: Policy::Shelf,
            allow_rotation: true,
            guillotine: false,
        }
    }
}

impl HeuristicConfig {
    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_allow_rotation(mut self, allow: bool) -> Self {
        self.allow_rotation = allow;
        self
    }

    pub fn with_guillotine(mut self, guillotine: bool) -> Self {
        self.guillotine = guillotine;
        self
    }

    /// The policy actually run, after applying the guillotine switch.
    pub fn effective_policy(&self) -> Policy {
        if self.guillotine {
            Policy::Shelf
        } else {
            self.policy
        }
    }
}
