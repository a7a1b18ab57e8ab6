//! Level (shelf) formulation.
//!
//! Items are assigned to one of `L` candidate levels in one orientation.
//! Per level `ℓ`:
//!
//! - `u[ℓ]` binary: the level is in use
//! - `s[ℓ]` integer: the level height
//! - `zH[i, ℓ]`, `zV[i, ℓ]` binary: item `i` sits on `ℓ` unrotated / rotated
//!
//! Constraints:
//!
//! - every item is assigned exactly once: `Σ_ℓ (zH + zV) = 1`
//! - width with kerf: `Σ (w + d)·zH + (h + d)·zV <= (W + d)·u[ℓ]`,
//!   i.e. `Σ w + d·(count - 1) <= W` on an active level and nothing on an
//!   inactive one
//! - `s[ℓ] >= h·zH[i, ℓ]` and `s[ℓ] >= w·zV[i, ℓ]`
//! - `s[ℓ] >= s[ℓ + 1]` (symmetry breaking)
//! - `H >= Σ s[ℓ] + d·(Σ u[ℓ] - 1)`, `H >= max(area_lb, maxh_lb)`
//!
//! Objective: minimize `H`. Forbidden zones are not modelled; instances
//! carrying zones are rejected.

use std::collections::BTreeMap;

use super::backend::MilpBackend;
use super::config::LevelConfig;
use super::model::{LinearExpr, MilpModel, VarId};
use crate::bounds::lower_bound;
use crate::error::{Result, StripError};
use crate::heuristic::check_geometry;
use crate::model::{Instance, Optimality, Placement, RectId, Solution};

/// Method tag of level-model solutions.
pub const LEVEL_FAMILY: &str = "MILP-ShelfLevel";

/// A built level model, ready for a backend.
#[derive(Debug, Clone)]
pub struct LevelModel<'a> {
    instance: &'a Instance,
    config: LevelConfig,
    model: MilpModel,
    levels: usize,
    height: VarId,
    z_h: BTreeMap<(RectId, usize), VarId>,
    z_v: BTreeMap<(RectId, usize), VarId>,
}

impl<'a> LevelModel<'a> {
    /// Builds the model.
    ///
    /// # Errors
    ///
    /// - [`StripError::Configuration`] for an invalid config or an instance
    ///   with forbidden zones
    /// - [`StripError::Geometry`] if an item fits the strip in no allowed
    ///   orientation
    pub fn build(instance: &'a Instance, config: &LevelConfig) -> Result<Self> {
        config.validate().map_err(StripError::config)?;
        if !instance.forbidden_zones().is_empty() {
            return Err(StripError::config(format!(
                "{LEVEL_FAMILY} does not model forbidden zones"
            )));
        }
        check_geometry(instance, config.allow_rotation)?;

        let strip_width = instance.width() as f64;
        let kerf = instance.kerf_delta() as f64;
        let levels = config.resolved_levels(instance.len());
        let mut model = MilpModel::new(LEVEL_FAMILY);

        let u: Vec<VarId> = (0..levels).map(|l| model.add_binary(format!("u_{l}"))).collect();
        let s: Vec<VarId> = (0..levels)
            .map(|l| model.add_integer(format!("s_{l}"), 0.0, None))
            .collect();
        let lb = lower_bound(instance, config.allow_rotation) as f64;
        let height = model.add_integer("H", lb, None);

        let mut z_h = BTreeMap::new();
        let mut z_v = BTreeMap::new();
        for rect in instance.rectangles() {
            let upright = rect.w <= instance.width();
            let turned = rect.can_rotate(config.allow_rotation)
                && rect.w != rect.h
                && rect.h <= instance.width();
            for l in 0..levels {
                if upright {
                    z_h.insert((rect.id, l), model.add_binary(format!("zH_{}_{l}", rect.id)));
                }
                if turned {
                    z_v.insert((rect.id, l), model.add_binary(format!("zV_{}_{l}", rect.id)));
                }
            }
        }

        // Assignment
        for rect in instance.rectangles() {
            let mut expr = LinearExpr::new();
            for l in 0..levels {
                for z in [&z_h, &z_v] {
                    if let Some(&var) = z.get(&(rect.id, l)) {
                        expr.add_term(var, 1.0);
                    }
                }
            }
            model.add_eq(expr, 1.0);
        }

        for l in 0..levels {
            // Width with kerf, gated by u
            let mut width = LinearExpr::new().term(u[l], -(strip_width + kerf));
            for rect in instance.rectangles() {
                if let Some(&var) = z_h.get(&(rect.id, l)) {
                    width.add_term(var, rect.w as f64 + kerf);
                    model.add_ge(LinearExpr::var(s[l]).term(var, -(rect.h as f64)), 0.0);
                }
                if let Some(&var) = z_v.get(&(rect.id, l)) {
                    width.add_term(var, rect.h as f64 + kerf);
                    model.add_ge(LinearExpr::var(s[l]).term(var, -(rect.w as f64)), 0.0);
                }
            }
            model.add_le(width, 0.0);

            if l + 1 < levels {
                model.add_ge(LinearExpr::var(s[l]).term(s[l + 1], -1.0), 0.0);
            }
        }

        // H >= Σ s + d·(Σ u - 1)
        let mut total = LinearExpr::var(height);
        for l in 0..levels {
            total.add_term(s[l], -1.0);
            total.add_term(u[l], -kerf);
        }
        model.add_ge(total, -kerf);
        model.minimize(LinearExpr::var(height));

        log::debug!(
            "{LEVEL_FAMILY}: {} items, {levels} levels, {} variables, {} constraints",
            instance.len(),
            model.variables().len(),
            model.constraints().len()
        );

        Ok(Self {
            instance,
            config: config.clone(),
            model,
            levels,
            height,
            z_h,
            z_v,
        })
    }

    pub fn model(&self) -> &MilpModel {
        &self.model
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    pub fn height_var(&self) -> VarId {
        self.height
    }

    /// Assignment variable of an item on a level, if it exists.
    pub fn assignment(&self, id: RectId, level: usize, rotated: bool) -> Option<VarId> {
        let z = if rotated { &self.z_v } else { &self.z_h };
        z.get(&(id, level)).copied()
    }

    /// Builds placements from an assignment.
    ///
    /// Levels are stacked bottom-up in index order, skipping empty ones.
    /// Within a level items go left to right by effective height
    /// descending, ties in instance order; `kerf_delta` separates items and
    /// levels.
    ///
    /// # Errors
    ///
    /// [`StripError::Backend`] if some item is not assigned.
    pub fn decode(&self, values: &[f64]) -> Result<Vec<Placement>> {
        if values.len() != self.model.variables().len() {
            return Err(StripError::Backend {
                reason: format!(
                    "{LEVEL_FAMILY}: expected {} values, got {}",
                    self.model.variables().len(),
                    values.len()
                ),
            });
        }
        let kerf = self.instance.kerf_delta();
        let is_set = |var: Option<&VarId>| var.is_some_and(|v| values[v.index()] > 0.5);

        let mut rows: Vec<Vec<Placement>> = vec![Vec::new(); self.levels];
        for rect in self.instance.rectangles() {
            let slot = (0..self.levels).find_map(|l| {
                if is_set(self.z_v.get(&(rect.id, l))) {
                    Some((l, true))
                } else if is_set(self.z_h.get(&(rect.id, l))) {
                    Some((l, false))
                } else {
                    None
                }
            });
            let Some((l, rotated)) = slot else {
                return Err(StripError::Backend {
                    reason: format!("{LEVEL_FAMILY}: rectangle {} is not assigned", rect.id),
                });
            };
            let (w, h) = rect.dims(rotated);
            rows[l].push(Placement::new(rect.id, 0, 0, w, h, rotated));
        }

        let mut placements = Vec::with_capacity(self.instance.len());
        let mut y = 0;
        for mut row in rows.into_iter().filter(|r| !r.is_empty()) {
            row.sort_by_key(|p| std::cmp::Reverse(p.h));
            let level_height = row.iter().map(|p| p.h).max().unwrap_or(0);
            let mut x = 0;
            for mut p in row {
                p.x = x;
                p.y = y;
                x += p.w + kerf;
                placements.push(p);
            }
            y += level_height + kerf;
        }
        Ok(placements)
    }

    /// Solves with the given backend and decodes the incumbent.
    ///
    /// # Errors
    ///
    /// Backend errors propagate; a run without an incumbent is reported as
    /// [`StripError::Backend`].
    pub fn solve(&self, backend: &dyn MilpBackend) -> Result<Solution> {
        if self.instance.is_empty() {
            return Ok(Solution::new(0, Vec::new(), LEVEL_FAMILY, Optimality::Optimal));
        }
        let outcome = backend.solve(&self.model, self.config.time_limit_ms)?;
        let Some(values) = outcome.values.as_deref() else {
            return Err(StripError::Backend {
                reason: format!(
                    "{LEVEL_FAMILY}: {} returned no incumbent ({})",
                    backend.name(),
                    outcome.optimality()
                ),
            });
        };
        let placements = self.decode(values)?;
        let solution = Solution::from_placements(placements, LEVEL_FAMILY, outcome.optimality());
        log::info!(
            "{LEVEL_FAMILY}: H = {} ({})",
            solution.height,
            solution.optimality
        );
        Ok(solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feasibility::{check, FeasibilityChecker};
    use crate::milp::backend::{MilpOutcome, UnavailableBackend};
    use crate::model::{ForbiddenZone, Rectangle};

    struct FixedBackend(Option<Vec<f64>>);

    impl MilpBackend for FixedBackend {
        fn name(&self) -> &str {
            "fixed"
        }

        fn solve(&self, _model: &MilpModel, _time_limit_ms: u64) -> Result<MilpOutcome> {
            Ok(match &self.0 {
                Some(values) => MilpOutcome::optimal(values.clone(), 0.0),
                None => MilpOutcome::infeasible(),
            })
        }
    }

    fn scenario_a() -> Instance {
        Instance::new(
            10,
            vec![
                Rectangle::new(1, 4, 3),
                Rectangle::new(2, 4, 3),
                Rectangle::new(3, 2, 6),
            ],
        )
        .unwrap()
    }

    /// Items 1 and 2 on level 0, item 3 turned on level 1.
    fn scenario_a_values(m: &LevelModel<'_>) -> Vec<f64> {
        let mut values = vec![0.0; m.model().variables().len()];
        let set = |values: &mut Vec<f64>, name: &str, v: f64| {
            let idx = m
                .model()
                .variables()
                .iter()
                .position(|d| d.name == name)
                .unwrap();
            values[idx] = v;
        };
        set(&mut values, "u_0", 1.0);
        set(&mut values, "u_1", 1.0);
        set(&mut values, "s_0", 3.0);
        set(&mut values, "s_1", 2.0);
        set(&mut values, "H", 5.0);
        set(&mut values, "zH_1_0", 1.0);
        set(&mut values, "zH_2_0", 1.0);
        set(&mut values, "zV_3_1", 1.0);
        values
    }

    #[test]
    fn test_variable_layout() {
        let inst = scenario_a();
        let m = LevelModel::build(&inst, &LevelConfig::default()).unwrap();
        assert_eq!(m.levels(), 3);
        assert!(m.assignment(3, 2, true).is_some());
        // Locked rotation off globally: no zV at all.
        let m = LevelModel::build(&inst, &LevelConfig::default().with_allow_rotation(false))
            .unwrap();
        assert!(m.assignment(1, 0, true).is_none());
        assert!(m.assignment(1, 0, false).is_some());
    }

    #[test]
    fn test_known_assignment_satisfies_model() {
        let inst = scenario_a();
        let m = LevelModel::build(&inst, &LevelConfig::default()).unwrap();
        let values = scenario_a_values(&m);
        assert!(m.model().is_satisfied(&values, 1e-9));
        assert_eq!(m.model().evaluate(&values), 5.0);
    }

    #[test]
    fn test_overfull_level_violates_width() {
        let inst = scenario_a();
        let m = LevelModel::build(&inst, &LevelConfig::default()).unwrap();
        let mut values = scenario_a_values(&m);
        // Move item 3 (turned, 6 wide) onto level 0 next to 1 and 2.
        let zv_1 = m.assignment(3, 1, true).unwrap();
        let zv_0 = m.assignment(3, 0, true).unwrap();
        values[zv_1.index()] = 0.0;
        values[zv_0.index()] = 1.0;
        assert!(!m.model().is_satisfied(&values, 1e-9));
    }

    #[test]
    fn test_kerf_counts_between_items() {
        // 4 + 2 + 4 = 10 fits with kerf 2; kerf 3 does not.
        let inst = Instance::new(10, vec![Rectangle::fixed(1, 4, 3), Rectangle::fixed(2, 4, 3)])
            .unwrap()
            .with_kerf(2)
            .unwrap();
        let m = LevelModel::build(&inst, &LevelConfig::default()).unwrap();
        let mut values = vec![0.0; m.model().variables().len()];
        let u0 = m
            .model()
            .variables()
            .iter()
            .position(|d| d.name == "u_0")
            .unwrap();
        let s0 = u0 + m.levels();
        values[u0] = 1.0;
        values[s0] = 3.0;
        values[m.height_var().index()] = 3.0;
        values[m.assignment(1, 0, false).unwrap().index()] = 1.0;
        values[m.assignment(2, 0, false).unwrap().index()] = 1.0;
        assert!(m.model().is_satisfied(&values, 1e-9));

        let inst = inst.with_kerf(3).unwrap();
        let m = LevelModel::build(&inst, &LevelConfig::default()).unwrap();
        let mut values = vec![0.0; m.model().variables().len()];
        values[u0] = 1.0;
        values[s0] = 3.0;
        values[m.height_var().index()] = 3.0;
        values[m.assignment(1, 0, false).unwrap().index()] = 1.0;
        values[m.assignment(2, 0, false).unwrap().index()] = 1.0;
        assert!(!m.model().is_satisfied(&values, 1e-9));
    }

    #[test]
    fn test_solve_decodes_levels() {
        let inst = scenario_a();
        let m = LevelModel::build(&inst, &LevelConfig::default()).unwrap();
        let sol = m.solve(&FixedBackend(Some(scenario_a_values(&m)))).unwrap();
        assert_eq!(sol.method, LEVEL_FAMILY);
        assert_eq!(sol.optimality, Optimality::Optimal);
        assert_eq!(sol.height, 5);
        let p3 = sol.placement(3).unwrap();
        assert_eq!((p3.x, p3.y, p3.w, p3.h, p3.rotated), (0, 3, 6, 2, true));
        assert_eq!(sol.placement(2).map(|p| p.x), Some(4));
        assert!(check(&sol, &inst));
    }

    #[test]
    fn test_decode_keeps_kerf_between_levels() {
        let inst = scenario_a().with_kerf(1).unwrap();
        let m = LevelModel::build(&inst, &LevelConfig::default()).unwrap();
        let placements = m.decode(&scenario_a_values(&m)).unwrap();
        let sol = Solution::from_placements(placements, LEVEL_FAMILY, Optimality::Feasible);
        assert_eq!(sol.placement(2).map(|p| p.x), Some(5));
        assert_eq!(sol.placement(3).map(|p| p.y), Some(4));
        assert!(FeasibilityChecker::strict().is_feasible(&sol, &inst));
    }

    #[test]
    fn test_no_incumbent_is_backend_error() {
        let inst = scenario_a();
        let m = LevelModel::build(&inst, &LevelConfig::default()).unwrap();
        let err = m.solve(&FixedBackend(None)).unwrap_err();
        assert!(matches!(err, StripError::Backend { .. }));
    }

    #[test]
    fn test_unavailable_backend() {
        let inst = scenario_a();
        let m = LevelModel::build(&inst, &LevelConfig::default()).unwrap();
        let err = m.solve(&UnavailableBackend).unwrap_err();
        assert_eq!(
            err,
            StripError::BackendUnavailable {
                family: LEVEL_FAMILY.into()
            }
        );
    }

    #[test]
    fn test_rejects_zones_and_bad_geometry() {
        let inst = scenario_a()
            .with_forbidden_zones(vec![ForbiddenZone::new(0, 0, 1, 1)])
            .unwrap();
        assert!(matches!(
            LevelModel::build(&inst, &LevelConfig::default()),
            Err(StripError::Configuration { .. })
        ));
        let inst = Instance::new(10, vec![Rectangle::fixed(1, 12, 3)]).unwrap();
        assert!(matches!(
            LevelModel::build(&inst, &LevelConfig::default()),
            Err(StripError::Geometry { rect_id: 1, .. })
        ));
    }
}
