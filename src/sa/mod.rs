//! Simulated Annealing (SA).
//!
//! A single-solution trajectory metaheuristic. Worsening moves are accepted
//! with a probability that shrinks as the temperature falls, letting the
//! search escape local optima early and settle late.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"

mod config;
mod runner;
mod types;

pub use config::{CoolingSchedule, SaConfig};
pub use runner::{SaResult, SaRunner};
pub use types::SaProblem;
