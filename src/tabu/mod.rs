//! Tabu Search (TS).
//!
//! A single-solution trajectory metaheuristic that remembers recently used
//! moves (the tabu list) and forbids them, preventing cycling and pushing
//! the search into new regions.
//!
//! # References
//!
//! - Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3), 190-206.
//! - Glover, F. (1990). "Tabu Search—Part II", *ORSA Journal on Computing* 2(1), 4-32.

mod config;
mod runner;
mod types;

pub use config::{TabuConfig, MIN_TENURE};
pub use runner::{TabuResult, TabuRunner};
pub use types::{TabuMove, TabuProblem};
