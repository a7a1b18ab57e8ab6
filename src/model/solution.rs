//! Solver output: achieved height, placements, and status tags.

use super::instance::Instance;
use super::types::{Placement, RectId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Terminal status of the solver that produced a [`Solution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Optimality {
    /// Proven optimal.
    Optimal,
    /// Feasible, optimality not proven.
    #[default]
    Feasible,
    /// Stopped by a time limit before proving optimality.
    Timeout,
    /// The model was proven infeasible.
    Infeasible,
    /// The solver failed; placements may be incomplete.
    Error,
}

impl Optimality {
    /// Lower-case tag used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Optimal => "optimal",
            Self::Feasible => "feasible",
            Self::Timeout => "timeout",
            Self::Infeasible => "infeasible",
            Self::Error => "error",
        }
    }

    pub fn is_optimal(&self) -> bool {
        matches!(self, Self::Optimal)
    }
}

impl std::fmt::Display for Optimality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A strip packing solution.
///
/// Created once per solve call. Only [`method`](Self::method) is meant to
/// change afterwards, through [`with_method`](Self::with_method).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Solution {
    /// Achieved strip height `H`.
    pub height: i64,
    /// One placement per rectangle of the instance.
    pub placements: Vec<Placement>,
    /// Tag of the producing solver, e.g. `"Heuristic-Skyline"`.
    pub method: String,
    /// Terminal status.
    pub optimality: Optimality,
}

impl Solution {
    pub fn new(
        height: i64,
        placements: Vec<Placement>,
        method: impl Into<String>,
        optimality: Optimality,
    ) -> Self {
        Self {
            height,
            placements,
            method: method.into(),
            optimality,
        }
    }

    /// Creates a solution whose height is the top of the highest placement.
    pub fn from_placements(
        placements: Vec<Placement>,
        method: impl Into<String>,
        optimality: Optimality,
    ) -> Self {
        let height = placements.iter().map(Placement::top).max().unwrap_or(0);
        Self::new(height, placements, method, optimality)
    }

    /// Relabels the producing method.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Finds the placement of a rectangle.
    pub fn placement(&self, id: RectId) -> Option<&Placement> {
        self.placements.iter().find(|p| p.rect_id == id)
    }

    /// Fraction of the used strip area `W × H` covered by items.
    pub fn utilization(&self, instance: &Instance) -> f64 {
        if self.height <= 0 {
            return 0.0;
        }
        instance.total_area() as f64 / (instance.width() * self.height) as f64
    }

    /// Relative gap `(H - LB) / H` against the combined lower bound.
    pub fn lower_bound_gap(&self, instance: &Instance, allow_rotation: bool) -> f64 {
        if self.height <= 0 {
            return 0.0;
        }
        let lb = crate::bounds::lower_bound(instance, allow_rotation);
        (self.height - lb) as f64 / self.height as f64
    }
}
