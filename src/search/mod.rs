//! Metaheuristic search over item sequences.
//!
//! A candidate is a [`Genome`]: a permutation of the instance's items plus
//! one orientation bit per item. A [`Decoder`] turns it into a packed
//! [`Solution`](crate::model::Solution) whose height is the fitness.
//! [`StripProblem`] adapts an instance and a decoder to the generic
//! [`ga`](crate::ga), [`sa`](crate::sa) and [`tabu`](crate::tabu) runners,
//! and [`MetaheuristicSolver`] wraps the whole pipeline.
//!
//! The runners never see geometry, and the decoder never sees the search:
//! swapping in another decoder needs no change to GA, SA or Tabu.

mod decoder;
mod problem;
mod solver;

pub use decoder::{Decoder, HeuristicDecoder};
pub use problem::{Genome, StripProblem};
pub use solver::{MetaheuristicSolver, Strategy};
