//! Deterministic placement heuristics.
//!
//! Two policies map an ordered rectangle sequence plus orientation choices
//! to a [`Solution`](crate::model::Solution):
//!
//! - [`Policy::Shelf`]: Next-Fit Decreasing Height. Items fill shelves left
//!   to right; a full shelf is closed and a new one opened above it.
//!   Every layout is guillotine-cuttable.
//! - [`Policy::Skyline`]: keeps the upper profile of the packing as a list
//!   of horizontal segments and drops each item on the lowest, leftmost
//!   segment wide enough to host it. Layouts need not be guillotine.
//!
//! [`HeuristicSolver`] is the standalone entry point: it orients each item
//! with the "prefer low" rule and sorts by height before packing. The
//! lower-level [`pack_shelf`] and [`pack_skyline`] take a ready sequence
//! and are used as decoders by the search layer.
//!
//! Both policies keep `kerf_delta` between neighbouring items and avoid
//! forbidden zones inflated by `kerf_delta`.

mod config;
mod shelf;
mod skyline;
mod solver;

pub use config::{HeuristicConfig, Policy};
pub use shelf::pack_shelf;
pub use skyline::{pack_skyline, Segment, Skyline};
pub use solver::{check_geometry, orient, HeuristicSolver, OrientedItem};
pub(crate) use solver::{pack, sort_for_policy};
