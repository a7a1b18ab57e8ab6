//! Two-dimensional strip packing engine.
//!
//! Packs axis-aligned rectangles into a strip of fixed width, minimizing
//! the height used. The crate provides:
//!
//! - **Bounds**: area and tallest-item lower bounds on the optimal height.
//! - **Heuristics**: deterministic shelf (NFDH) and skyline placement,
//!   both honoring kerf spacing and forbidden zones.
//! - **Feasibility**: an independent verifier for any [`Solution`].
//! - **Metaheuristics**: generic Genetic Algorithm, Simulated Annealing
//!   and Tabu Search runners, plus the [`search`] layer that drives them
//!   over (permutation, orientation-bit) genomes through a pluggable
//!   [`Decoder`](search::Decoder).
//! - **MILP**: level and coordinate formulations solved through a
//!   [`MilpBackend`](milp::MilpBackend). The `milp` feature enables a
//!   pure-Rust `good_lp` backend.
//!
//! # Quick start
//!
//! ```
//! use u_strip::bounds::lower_bound;
//! use u_strip::feasibility::check;
//! use u_strip::heuristic::{HeuristicConfig, HeuristicSolver, Policy};
//! use u_strip::model::{Instance, Rectangle};
//!
//! let instance = Instance::new(
//!     10,
//!     vec![
//!         Rectangle::new(1, 4, 3),
//!         Rectangle::new(2, 4, 3),
//!         Rectangle::new(3, 2, 6),
//!     ],
//! )
//! .unwrap();
//!
//! let config = HeuristicConfig::default().with_policy(Policy::Shelf);
//! let solution = HeuristicSolver::solve(&instance, &config).unwrap();
//! assert!(check(&solution, &instance));
//! assert!(solution.height >= lower_bound(&instance, true));
//! ```
//!
//! # Features
//!
//! - `serde`: serialization of the data model
//! - `parallel`: rayon evaluation of GA offspring
//! - `milp`: `good_lp` backend over `microlp`

pub mod bounds;
pub mod error;
pub mod feasibility;
pub mod ga;
pub mod heuristic;
pub mod milp;
pub mod model;
pub mod random;
pub mod sa;
pub mod search;
pub mod tabu;

pub use error::{Result, StripError};
pub use model::{ForbiddenZone, Instance, Optimality, Placement, RectId, Rectangle, Solution};
