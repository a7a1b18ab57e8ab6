//! Mixed-integer formulations of strip packing.
//!
//! Two models are built on a backend-agnostic [`MilpModel`]:
//!
//! - [`LevelModel`]: items assigned to horizontal levels; solutions are
//!   guillotine-cuttable shelf layouts
//! - [`CoordinateModel`]: free integer coordinates with pairwise Big-M
//!   disjunctions, kerf and forbidden zones, warm-started from the skyline
//!   heuristic
//!
//! Solving goes through a [`MilpBackend`]. With the `milp` feature,
//! [`default_backend`] returns a `good_lp` backend over `microlp`; without
//! it every solve fails with
//! [`StripError::BackendUnavailable`](crate::error::StripError::BackendUnavailable)
//! naming the model family, and all other solvers stay usable.
//!
//! # Usage
//!
//! ```
//! use u_strip::error::StripError;
//! use u_strip::milp::{self, CoordinateConfig, UnavailableBackend};
//! use u_strip::model::{Instance, Rectangle};
//!
//! let instance = Instance::new(10, vec![Rectangle::new(1, 4, 3)]).unwrap();
//! let result = milp::solve_coordinate(&instance, &CoordinateConfig::default(), &UnavailableBackend);
//! assert!(matches!(result, Err(StripError::BackendUnavailable { .. })));
//! ```

mod backend;
mod config;
mod coordinate;
mod level;
mod model;

#[cfg(feature = "milp")]
pub use backend::GoodLpBackend;
pub use backend::{
    default_backend, is_milp_available, BackendStatus, MilpBackend, MilpOutcome,
    UnavailableBackend,
};
pub use config::{BigMMode, CoordinateConfig, LevelConfig};
pub use coordinate::{CoordinateModel, Orientation, Selectors, COORDINATE_FAMILY};
pub use level::{LevelModel, LEVEL_FAMILY};
pub use model::{Constraint, LinearExpr, MilpModel, Sense, VarDef, VarId, VarKind};

use crate::error::Result;
use crate::model::{Instance, Solution};

/// Builds and solves the level model.
pub fn solve_level(
    instance: &Instance,
    config: &LevelConfig,
    backend: &dyn MilpBackend,
) -> Result<Solution> {
    LevelModel::build(instance, config)?.solve(backend)
}

/// Builds and solves the coordinate model.
pub fn solve_coordinate(
    instance: &Instance,
    config: &CoordinateConfig,
    backend: &dyn MilpBackend,
) -> Result<Solution> {
    CoordinateModel::build(instance, config)?.solve(backend)
}
