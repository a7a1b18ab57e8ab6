//! Entry point running GA, SA or Tabu Search over a decoder.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use super::decoder::{Decoder, HeuristicDecoder};
use super::problem::{Genome, StripProblem};
use crate::error::{Result, StripError};
use crate::ga::{GaConfig, GaRunner};
use crate::heuristic::check_geometry;
use crate::model::{Instance, Optimality, Solution};
use crate::sa::{SaConfig, SaRunner};
use crate::tabu::{TabuConfig, TabuRunner};

/// Search strategy together with its configuration.
#[derive(Debug, Clone)]
pub enum Strategy {
    Ga(GaConfig),
    Sa(SaConfig),
    Tabu(TabuConfig),
}

impl Strategy {
    /// Short name used in method tags.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Ga(_) => "GA",
            Strategy::Sa(_) => "SA",
            Strategy::Tabu(_) => "Tabu",
        }
    }

    fn validate(&self) -> Result<()> {
        let checked = match self {
            Strategy::Ga(c) => c.validate(),
            Strategy::Sa(c) => c.validate(),
            Strategy::Tabu(c) => c.validate(),
        };
        checked.map_err(|reason| StripError::config(format!("{}: {reason}", self.name())))
    }
}

/// Anytime metaheuristic solver over a pluggable [`Decoder`].
///
/// The returned solution is the best genome ever decoded, tagged
/// `Meta-<strategy>-<decoder>` (for example `Meta-GA-SkylineDecode`) and
/// [`Optimality::Feasible`]: the search proves nothing.
///
/// # Examples
///
/// ```
/// use u_strip::ga::GaConfig;
/// use u_strip::model::{Instance, Rectangle};
/// use u_strip::search::{MetaheuristicSolver, Strategy};
///
/// let instance = Instance::new(10, vec![Rectangle::new(1, 4, 3), Rectangle::new(2, 6, 3)]).unwrap();
/// let strategy = Strategy::Ga(GaConfig::default().with_seed(1).with_max_generations(10));
/// let solution = MetaheuristicSolver::new(true).solve(&instance, &strategy).unwrap();
/// assert_eq!(solution.height, 3);
/// assert_eq!(solution.method, "Meta-GA-SkylineDecode");
/// ```
#[derive(Debug, Clone)]
pub struct MetaheuristicSolver<D: Decoder = HeuristicDecoder> {
    decoder: D,
    allow_rotation: bool,
}

impl MetaheuristicSolver<HeuristicDecoder> {
    /// Solver over the default skyline decoder.
    pub fn new(allow_rotation: bool) -> Self {
        Self {
            decoder: HeuristicDecoder::default(),
            allow_rotation,
        }
    }
}

impl<D: Decoder> MetaheuristicSolver<D> {
    /// Replaces the decoder.
    pub fn with_decoder<E: Decoder>(self, decoder: E) -> MetaheuristicSolver<E> {
        MetaheuristicSolver {
            decoder,
            allow_rotation: self.allow_rotation,
        }
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    pub fn solve(&self, instance: &Instance, strategy: &Strategy) -> Result<Solution> {
        self.solve_with_cancel(instance, strategy, None)
    }

    /// Runs the strategy with an optional cancellation flag.
    ///
    /// # Errors
    ///
    /// - [`StripError::Configuration`] for an invalid strategy config
    /// - [`StripError::Geometry`] if some rectangle fits the strip in no
    ///   allowed orientation
    pub fn solve_with_cancel(
        &self,
        instance: &Instance,
        strategy: &Strategy,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<Solution> {
        strategy.validate()?;
        check_geometry(instance, self.allow_rotation)?;

        let method = format!("Meta-{}-{}", strategy.name(), self.decoder.tag());
        if instance.is_empty() {
            return Ok(Solution::new(0, Vec::new(), method, Optimality::Feasible));
        }

        let n = instance.len();
        log::debug!(
            "{method}: {n} items, W = {}, kerf = {}, {} zones",
            instance.width(),
            instance.kerf_delta(),
            instance.forbidden_zones().len()
        );

        let best = match strategy {
            Strategy::Ga(config) => {
                let problem = StripProblem::new(instance, &self.decoder, self.allow_rotation);
                let result = GaRunner::run_with_cancel(&problem, config, cancel);
                log::debug!(
                    "{method}: {} generations, timed_out = {}, cancelled = {}",
                    result.generations,
                    result.timed_out,
                    result.cancelled
                );
                result.best
            }
            Strategy::Sa(config) => {
                let problem = StripProblem::new(instance, &self.decoder, self.allow_rotation);
                let result = SaRunner::run_with_cancel(&problem, config, cancel);
                log::debug!(
                    "{method}: {} iterations, {} accepted, T = {:.4}",
                    result.iterations,
                    result.accepted_moves,
                    result.final_temperature
                );
                result.best
            }
            Strategy::Tabu(config) => {
                let problem = StripProblem::new(instance, &self.decoder, self.allow_rotation)
                    .with_flip_probability(config.flip_probability)?;
                let config = config.clone().with_tabu_tenure(config.resolved_tenure(n));
                let result = TabuRunner::run_with_cancel(&problem, &config, cancel);
                log::debug!(
                    "{method}: {} iterations, best at {}, exhausted = {}",
                    result.iterations,
                    result.best_iteration,
                    result.exhausted
                );
                result.best
            }
        };

        let solution = self.finish(instance, &best, method)?;
        log::info!("{}: H = {}", solution.method, solution.height);
        Ok(solution)
    }

    /// Re-decodes the best genome and relabels it.
    fn finish(&self, instance: &Instance, best: &Genome, method: String) -> Result<Solution> {
        let decoded = self
            .decoder
            .decode(instance, &best.order, &best.flips, self.allow_rotation)?;
        Ok(Solution {
            optimality: Optimality::Feasible,
            ..decoded.with_method(method)
        })
    }
}
