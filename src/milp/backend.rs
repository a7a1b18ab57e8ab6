//! Solver backends for [`MilpModel`].

use super::model::MilpModel;
use crate::error::{Result, StripError};
use crate::model::Optimality;

/// Terminal status reported by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendStatus {
    Optimal,
    Feasible,
    Infeasible,
    Error,
}

/// What a backend returns for one solve call.
#[derive(Debug, Clone, PartialEq)]
pub struct MilpOutcome {
    pub status: BackendStatus,
    /// Incumbent assignment, indexed by [`VarId::index`](super::VarId::index).
    pub values: Option<Vec<f64>>,
    pub objective: Option<f64>,
    /// Whether the backend stopped on its time limit.
    pub hit_time_limit: bool,
}

impl MilpOutcome {
    pub fn optimal(values: Vec<f64>, objective: f64) -> Self {
        Self {
            status: BackendStatus::Optimal,
            values: Some(values),
            objective: Some(objective),
            hit_time_limit: false,
        }
    }

    pub fn infeasible() -> Self {
        Self {
            status: BackendStatus::Infeasible,
            values: None,
            objective: None,
            hit_time_limit: false,
        }
    }

    /// Status tag for the decoded solution.
    pub fn optimality(&self) -> Optimality {
        match self.status {
            BackendStatus::Optimal => Optimality::Optimal,
            BackendStatus::Feasible if self.hit_time_limit => Optimality::Timeout,
            BackendStatus::Feasible => Optimality::Feasible,
            BackendStatus::Infeasible => Optimality::Infeasible,
            BackendStatus::Error => Optimality::Error,
        }
    }
}

/// An external mixed-integer solver.
pub trait MilpBackend {
    /// Backend name for logs.
    fn name(&self) -> &str;

    /// Solves the model within `time_limit_ms`.
    ///
    /// # Errors
    ///
    /// [`StripError::BackendUnavailable`] when the backend cannot run at
    /// all, [`StripError::Backend`] when it fails while solving.
    fn solve(&self, model: &MilpModel, time_limit_ms: u64) -> Result<MilpOutcome>;
}

/// Backend used when no solver is compiled in.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableBackend;

impl MilpBackend for UnavailableBackend {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn solve(&self, model: &MilpModel, _time_limit_ms: u64) -> Result<MilpOutcome> {
        Err(StripError::BackendUnavailable {
            family: model.name().to_string(),
        })
    }
}

/// Whether a real backend is compiled in.
pub fn is_milp_available() -> bool {
    cfg!(feature = "milp")
}

/// The best backend available in this build.
pub fn default_backend() -> Box<dyn MilpBackend> {
    #[cfg(feature = "milp")]
    {
        Box::new(good_lp_backend::GoodLpBackend)
    }
    #[cfg(not(feature = "milp"))]
    {
        log::warn!("MILP solver not available (compile with 'milp' feature)");
        Box::new(UnavailableBackend)
    }
}

#[cfg(feature = "milp")]
pub use good_lp_backend::GoodLpBackend;

#[cfg(feature = "milp")]
mod good_lp_backend {
    use super::{BackendStatus, MilpBackend, MilpOutcome};
    use crate::error::{Result, StripError};
    use crate::milp::model::{LinearExpr, MilpModel, Sense, VarKind};
    use good_lp::{
        constraint, microlp, variable, Expression, ProblemVariables, ResolutionError, Solution,
        SolverModel, Variable,
    };

    /// Pure-Rust backend: `good_lp` over `microlp`.
    ///
    /// `microlp` has no time limit or warm start; both are ignored.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct GoodLpBackend;

    fn to_expression(expr: &LinearExpr, handles: &[Variable]) -> Expression {
        expr.terms()
            .iter()
            .fold(Expression::from(expr.constant()), |acc, &(v, c)| {
                acc + c * handles[v.index()]
            })
    }

    impl MilpBackend for GoodLpBackend {
        fn name(&self) -> &str {
            "good_lp/microlp"
        }

        fn solve(&self, model: &MilpModel, time_limit_ms: u64) -> Result<MilpOutcome> {
            log::warn!(
                "{}: microlp ignores the {time_limit_ms} ms time limit and the warm start",
                model.name()
            );

            let mut vars = ProblemVariables::new();
            let handles: Vec<Variable> = model
                .variables()
                .iter()
                .map(|def| {
                    let mut v = variable().name(def.name.clone());
                    v = match def.kind {
                        VarKind::Binary => v.binary(),
                        VarKind::Integer => v.integer().min(def.lower),
                    };
                    if let (VarKind::Integer, Some(ub)) = (def.kind, def.upper) {
                        v = v.max(ub);
                    }
                    vars.add(v)
                })
                .collect();

            let mut problem = vars
                .minimise(to_expression(model.objective(), &handles))
                .using(microlp);
            for c in model.constraints() {
                let lhs = to_expression(&c.expr, &handles);
                problem = problem.with(match c.sense {
                    Sense::Le => constraint::leq(lhs, c.rhs),
                    Sense::Ge => constraint::geq(lhs, c.rhs),
                    Sense::Eq => constraint::eq(lhs, c.rhs),
                });
            }

            log::info!(
                "Solving {} with {} variables, {} constraints",
                model.name(),
                handles.len(),
                model.constraints().len()
            );
            match problem.solve() {
                Ok(solution) => {
                    let values: Vec<f64> = handles.iter().map(|&h| solution.value(h)).collect();
                    let objective = model.evaluate(&values);
                    Ok(MilpOutcome::optimal(values, objective))
                }
                Err(ResolutionError::Infeasible) => Ok(MilpOutcome::infeasible()),
                Err(ResolutionError::Unbounded) => Ok(MilpOutcome {
                    status: BackendStatus::Error,
                    values: None,
                    objective: None,
                    hit_time_limit: false,
                }),
                Err(e) => Err(StripError::Backend {
                    reason: e.to_string(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let mut outcome = MilpOutcome::optimal(vec![], 0.0);
        assert_eq!(outcome.optimality(), Optimality::Optimal);
        outcome.status = BackendStatus::Feasible;
        assert_eq!(outcome.optimality(), Optimality::Feasible);
        outcome.hit_time_limit = true;
        assert_eq!(outcome.optimality(), Optimality::Timeout);
        assert_eq!(MilpOutcome::infeasible().optimality(), Optimality::Infeasible);
        outcome.status = BackendStatus::Error;
        assert_eq!(outcome.optimality(), Optimality::Error);
    }

    #[test]
    fn test_unavailable_names_family() {
        let model = MilpModel::new("MILP-Coordinate");
        let err = UnavailableBackend.solve(&model, 1_000).unwrap_err();
        assert_eq!(
            err,
            StripError::BackendUnavailable {
                family: "MILP-Coordinate".into()
            }
        );
    }

    #[test]
    fn test_availability_matches_feature() {
        assert_eq!(is_milp_available(), cfg!(feature = "milp"));
    }
}
