//! Error taxonomy for the strip packing engine.
//!
//! Every fallible entry point returns [`Result`]. Timeouts and suboptimal
//! termination are not errors: solvers report them through
//! [`Optimality`](crate::model::Optimality) on the returned solution.

use crate::model::RectId;
use thiserror::Error;

/// Errors raised by the strip packing engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StripError {
    /// The instance or an algorithm configuration is malformed.
    ///
    /// Detected before any solving attempt.
    #[error("invalid configuration: {reason}")]
    Configuration { reason: String },

    /// A rectangle cannot fit the strip in any allowed orientation.
    #[error(
        "rectangle {rect_id} needs width {min_width} in its narrowest allowed orientation, \
         but the strip is only {strip_width} wide"
    )]
    Geometry {
        rect_id: RectId,
        min_width: i64,
        strip_width: i64,
    },

    /// No MILP backend is available for the requested formulation.
    #[error("{family}: no MILP backend available (enable the `milp` feature or supply a backend)")]
    BackendUnavailable { family: String },

    /// The MILP backend failed while solving.
    #[error("MILP backend error: {reason}")]
    Backend { reason: String },
}

impl StripError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        StripError::Configuration {
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StripError>;
