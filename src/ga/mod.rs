//! Genetic Algorithm framework.
//!
//! A generic GA built on trait-based abstractions. A problem plugs in by
//! implementing [`GaProblem`], which specifies how to create, evaluate,
//! recombine, and mutate individuals. The strip packing problem itself is
//! wired in by [`crate::search`].
//!
//! # Core Traits
//!
//! - [`Individual`]: a candidate solution carrying its fitness
//! - [`GaProblem`]: problem definition (initialization, evaluation, operators)
//!
//! # Key Types
//!
//! - [`GaConfig`]: population size, elitism, selection, rates, limits
//! - [`GaRunner`]: executes the evolutionary loop
//! - [`GaResult`]: best individual and run statistics
//!
//! # Submodules
//!
//! - [`operators`]: OX and uniform crossover, swap and bit-flip mutation
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
pub mod operators;
mod runner;
mod selection;
mod types;

pub use config::GaConfig;
pub use runner::{GaResult, GaRunner};
pub use selection::Selection;
pub use types::{Fitness, GaProblem, Individual};
