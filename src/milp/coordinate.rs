//! Coordinate formulation.
//!
//! Every item gets integer `x`, `y` and, when it may take either
//! orientation, a binary `r`. Effective sizes are linear in `r`:
//! `w_eff = w + (h - w)·r`, `h_eff = h + (w - h)·r`. A single integer `H`
//! is minimized.
//!
//! - strip: `x + w_eff <= W`, `y + h_eff <= H`, `H >= max(area_lb, maxh_lb)`
//! - each unordered pair `(i, j)` picks exactly one of left / right / below
//!   / above through four binaries, each side gated by Big-M and keeping
//!   `kerf_delta` between the boxes
//! - each item / forbidden zone pair is separated the same way
//! - the item with the largest presented dimension is anchored at `x = 0`
//!   when the instance has no forbidden zones
//!
//! # Big-M
//!
//! With `S_w`, `S_h` the sums of the largest allowed width and height of
//! every item, and `H_ub` the skyline height:
//!
//! | mode  | `Mx`              | `My`                          |
//! |-------|-------------------|-------------------------------|
//! | tight | `W + d + S_w / 2` | `max(H_ub, LB) + d + S_h / 2` |
//! | loose | `W + d + S_w`     | `max(H_ub, LB) + d + S_h`     |
//!
//! A deactivated horizontal side needs `x_i + w_i + d - x_j <= W + d <= Mx`.
//! A deactivated vertical side needs `H + d <= My`, which holds for every
//! packing at most `S_h / 2` above the skyline height. Zone disjunctions
//! add the zone's offset and extent to both constants.
//!
//! # Warm start
//!
//! The skyline solution seeds every variable, selectors included. With
//! zero kerf and a positive guide radius each item is additionally boxed
//! within the radius of its warm-start position.

use std::collections::BTreeMap;

use super::backend::MilpBackend;
use super::config::{BigMMode, CoordinateConfig};
use super::model::{LinearExpr, MilpModel, VarId};
use crate::bounds::{lower_bound, maxh_lb};
use crate::error::{Result, StripError};
use crate::heuristic::{HeuristicConfig, HeuristicSolver, Policy};
use crate::model::{ForbiddenZone, Instance, Optimality, Placement, RectId, Rectangle, Solution};

/// Method tag of coordinate-model solutions.
pub const COORDINATE_FAMILY: &str = "MILP-Coordinate";

/// Orientation of an item in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Only one orientation is allowed and fits; `true` means rotated.
    Fixed(bool),
    /// Chosen by the binary variable.
    Free(VarId),
}

/// Separation selectors: `[left, right, below, above]`.
///
/// For a pair `(i, j)`: `i` left of `j`, `j` left of `i`, `i` below `j`,
/// `j` below `i`. For an item and a zone: the item left of, right of,
/// below or above the zone.
pub type Selectors = [VarId; 4];

/// A built coordinate model, ready for a backend.
#[derive(Debug, Clone)]
pub struct CoordinateModel<'a> {
    instance: &'a Instance,
    config: CoordinateConfig,
    model: MilpModel,
    x: BTreeMap<RectId, VarId>,
    y: BTreeMap<RectId, VarId>,
    orientation: BTreeMap<RectId, Orientation>,
    height: VarId,
    pairs: BTreeMap<(RectId, RectId), Selectors>,
    zones: BTreeMap<(RectId, usize), Selectors>,
    anchor: Option<RectId>,
    big_m: (f64, f64),
    warm: Solution,
}

impl<'a> CoordinateModel<'a> {
    /// Builds the model and its skyline warm start.
    ///
    /// # Errors
    ///
    /// - [`StripError::Configuration`] for an invalid config
    /// - [`StripError::Geometry`] if an item fits the strip in no allowed
    ///   orientation
    pub fn build(instance: &'a Instance, config: &CoordinateConfig) -> Result<Self> {
        config.validate().map_err(StripError::config)?;
        let heuristic = HeuristicConfig::default()
            .with_policy(Policy::Skyline)
            .with_allow_rotation(config.allow_rotation);
        let warm = HeuristicSolver::solve(instance, &heuristic)?;

        let strip_width = instance.width() as f64;
        let kerf = instance.kerf_delta() as f64;
        let lb = lower_bound(instance, config.allow_rotation);
        let h_ub = warm.height.max(maxh_lb(instance, config.allow_rotation));

        let mut model = MilpModel::new(COORDINATE_FAMILY);
        let mut x = BTreeMap::new();
        let mut y = BTreeMap::new();
        let mut orientation = BTreeMap::new();
        for rect in instance.rectangles() {
            x.insert(
                rect.id,
                model.add_integer(format!("x_{}", rect.id), 0.0, Some(strip_width)),
            );
            y.insert(rect.id, model.add_integer(format!("y_{}", rect.id), 0.0, None));
            let o = match fixed_orientation(rect, config.allow_rotation, instance.width()) {
                Some(rotated) => Orientation::Fixed(rotated),
                None => Orientation::Free(model.add_binary(format!("r_{}", rect.id))),
            };
            orientation.insert(rect.id, o);
        }
        let height = model.add_integer("H", lb as f64, None);

        let (sum_w, sum_h) = instance
            .rectangles()
            .iter()
            .map(|r| extent(r, orientation[&r.id]))
            .fold((0, 0), |(sw, sh), (w, h)| (sw + w, sh + h));
        let base_h = h_ub.max(lb) as f64 + kerf;
        let (mx, my) = match config.big_m {
            BigMMode::Tight => (
                strip_width + kerf + (sum_w / 2) as f64,
                base_h + (sum_h / 2) as f64,
            ),
            BigMMode::Loose => (strip_width + kerf + sum_w as f64, base_h + sum_h as f64),
        };

        let mut this = Self {
            instance,
            config: config.clone(),
            model,
            x,
            y,
            orientation,
            height,
            pairs: BTreeMap::new(),
            zones: BTreeMap::new(),
            anchor: None,
            big_m: (mx, my),
            warm,
        };
        this.add_strip_constraints();
        this.add_pair_constraints(kerf);
        this.add_zone_constraints(kerf);
        this.add_anchor();
        this.model.minimize(LinearExpr::var(height));
        if config.warm_start {
            this.add_warm_start();
        }

        log::debug!(
            "{COORDINATE_FAMILY}: {} items, Mx = {mx}, My = {my}, {} variables, {} constraints",
            instance.len(),
            this.model.variables().len(),
            this.model.constraints().len()
        );
        Ok(this)
    }

    fn w_eff(&self, rect: &Rectangle) -> LinearExpr {
        match self.orientation[&rect.id] {
            Orientation::Fixed(rotated) => LinearExpr::new().plus(rect.dims(rotated).0 as f64),
            Orientation::Free(r) => LinearExpr::new()
                .plus(rect.w as f64)
                .term(r, (rect.h - rect.w) as f64),
        }
    }

    fn h_eff(&self, rect: &Rectangle) -> LinearExpr {
        match self.orientation[&rect.id] {
            Orientation::Fixed(rotated) => LinearExpr::new().plus(rect.dims(rotated).1 as f64),
            Orientation::Free(r) => LinearExpr::new()
                .plus(rect.h as f64)
                .term(r, (rect.w - rect.h) as f64),
        }
    }

    fn add_strip_constraints(&mut self) {
        let instance = self.instance;
        let strip_width = instance.width() as f64;
        for rect in instance.rectangles() {
            let mut right = LinearExpr::var(self.x[&rect.id]);
            right.add_scaled(&self.w_eff(rect), 1.0);
            self.model.add_le(right, strip_width);

            let mut top = LinearExpr::var(self.y[&rect.id]).term(self.height, -1.0);
            top.add_scaled(&self.h_eff(rect), 1.0);
            self.model.add_le(top, 0.0);
        }
    }

    fn add_pair_constraints(&mut self, kerf: f64) {
        let (mx, my) = self.big_m;
        let instance = self.instance;
        let rects = instance.rectangles();
        for (k, a) in rects.iter().enumerate() {
            for b in &rects[k + 1..] {
                let sel: Selectors = ["L", "R", "D", "U"]
                    .map(|side| self.model.add_binary(format!("b{side}_{}_{}", a.id, b.id)));
                self.model.add_eq(
                    sel.iter()
                        .fold(LinearExpr::new(), |e, &v| e.term(v, 1.0)),
                    1.0,
                );

                let (xa, xb, ya, yb) = (self.x[&a.id], self.x[&b.id], self.y[&a.id], self.y[&b.id]);
                // a left of b: x_a + w_a + d <= x_b + Mx (1 - bL)
                let mut left = LinearExpr::var(xa).term(xb, -1.0).term(sel[0], mx);
                left.add_scaled(&self.w_eff(a), 1.0);
                self.model.add_le(left, mx - kerf);
                // b left of a
                let mut right = LinearExpr::var(xb).term(xa, -1.0).term(sel[1], mx);
                right.add_scaled(&self.w_eff(b), 1.0);
                self.model.add_le(right, mx - kerf);
                // a below b
                let mut below = LinearExpr::var(ya).term(yb, -1.0).term(sel[2], my);
                below.add_scaled(&self.h_eff(a), 1.0);
                self.model.add_le(below, my - kerf);
                // b below a
                let mut above = LinearExpr::var(yb).term(ya, -1.0).term(sel[3], my);
                above.add_scaled(&self.h_eff(b), 1.0);
                self.model.add_le(above, my - kerf);

                self.pairs.insert((a.id, b.id), sel);
            }
        }
    }

    fn add_zone_constraints(&mut self, kerf: f64) {
        let (mx, my) = self.big_m;
        let instance = self.instance;
        for rect in instance.rectangles() {
            for (k, z) in instance.forbidden_zones().iter().enumerate() {
                let (zx, zy, zw, zh) = (z.x as f64, z.y as f64, z.w as f64, z.h as f64);
                let mzx = mx + zx.abs() + zw;
                let mzy = my + zy.abs() + zh;
                let sel: Selectors = ["L", "R", "D", "U"]
                    .map(|side| self.model.add_binary(format!("fz{side}_{}_{k}", rect.id)));
                self.model.add_eq(
                    sel.iter()
                        .fold(LinearExpr::new(), |e, &v| e.term(v, 1.0)),
                    1.0,
                );

                let (xi, yi) = (self.x[&rect.id], self.y[&rect.id]);
                let mut left = LinearExpr::var(xi).term(sel[0], mzx);
                left.add_scaled(&self.w_eff(rect), 1.0);
                self.model.add_le(left, mzx + zx - kerf);

                self.model.add_le(
                    LinearExpr::new().term(xi, -1.0).term(sel[1], mzx),
                    mzx - zx - zw - kerf,
                );

                let mut below = LinearExpr::var(yi).term(sel[2], mzy);
                below.add_scaled(&self.h_eff(rect), 1.0);
                self.model.add_le(below, mzy + zy - kerf);

                self.model.add_le(
                    LinearExpr::new().term(yi, -1.0).term(sel[3], mzy),
                    mzy - zy - zh - kerf,
                );

                self.zones.insert((rect.id, k), sel);
            }
        }
    }

    /// Pins the item with the largest presented dimension to `x = 0`.
    ///
    /// Ties go to the earliest item, which is also the first item the
    /// skyline places, so the warm start respects the anchor.
    fn add_anchor(&mut self) {
        let instance = self.instance;
        if !instance.forbidden_zones().is_empty() {
            return;
        }
        let allow = self.config.allow_rotation;
        let key = |r: &Rectangle| {
            if r.can_rotate(allow) {
                r.w.max(r.h)
            } else {
                r.h
            }
        };
        let mut anchor: Option<&Rectangle> = None;
        for rect in instance.rectangles() {
            if anchor.map_or(true, |a| key(rect) > key(a)) {
                anchor = Some(rect);
            }
        }
        if let Some(rect) = anchor {
            self.model.add_eq(LinearExpr::var(self.x[&rect.id]), 0.0);
            self.anchor = Some(rect.id);
        }
    }

    fn add_warm_start(&mut self) {
        let kerf = self.instance.kerf_delta();
        let radius = self.config.guide_radius;
        let guide = kerf == 0 && radius > 0;

        let by_id: BTreeMap<RectId, Placement> =
            self.warm.placements.iter().map(|p| (p.rect_id, *p)).collect();
        for (&id, p) in &by_id {
            let (xv, yv) = (self.x[&id], self.y[&id]);
            self.model.set_warm_start(xv, p.x as f64);
            self.model.set_warm_start(yv, p.y as f64);
            if let Orientation::Free(r) = self.orientation[&id] {
                self.model.set_warm_start(r, if p.rotated { 1.0 } else { 0.0 });
            }
            if guide {
                self.model.add_ge(LinearExpr::var(xv), (p.x - radius).max(0) as f64);
                self.model.add_le(LinearExpr::var(xv), (p.x + radius) as f64);
                self.model.add_ge(LinearExpr::var(yv), (p.y - radius).max(0) as f64);
                self.model.add_le(LinearExpr::var(yv), (p.y + radius) as f64);
            }
        }
        self.model
            .set_warm_start(self.height, self.warm.height as f64);

        for (&(a, b), sel) in &self.pairs {
            if let Some(side) = separating_side(&by_id[&a], &by_id[&b], kerf) {
                for (k, &v) in sel.iter().enumerate() {
                    self.model.set_warm_start(v, if k == side { 1.0 } else { 0.0 });
                }
            }
        }
        let zones = self.instance.forbidden_zones();
        for (&(id, k), sel) in &self.zones {
            if let Some(side) = zone_side(&by_id[&id], &zones[k], kerf) {
                for (j, &v) in sel.iter().enumerate() {
                    self.model.set_warm_start(v, if j == side { 1.0 } else { 0.0 });
                }
            }
        }
    }

    pub fn model(&self) -> &MilpModel {
        &self.model
    }

    /// `(Mx, My)`.
    pub fn big_m(&self) -> (f64, f64) {
        self.big_m
    }

    /// Item pinned to `x = 0`, if any.
    pub fn anchor(&self) -> Option<RectId> {
        self.anchor
    }

    /// The skyline solution used as warm start and fallback.
    pub fn warm_solution(&self) -> &Solution {
        &self.warm
    }

    pub fn x_var(&self, id: RectId) -> Option<VarId> {
        self.x.get(&id).copied()
    }

    pub fn y_var(&self, id: RectId) -> Option<VarId> {
        self.y.get(&id).copied()
    }

    pub fn orientation(&self, id: RectId) -> Option<Orientation> {
        self.orientation.get(&id).copied()
    }

    pub fn height_var(&self) -> VarId {
        self.height
    }

    pub fn pair_selectors(&self, a: RectId, b: RectId) -> Option<Selectors> {
        self.pairs.get(&(a.min(b), a.max(b))).copied()
    }

    pub fn zone_selectors(&self, id: RectId, zone: usize) -> Option<Selectors> {
        self.zones.get(&(id, zone)).copied()
    }

    /// Builds placements from an assignment.
    ///
    /// # Errors
    ///
    /// [`StripError::Backend`] if `values` does not match the model.
    pub fn decode(&self, values: &[f64]) -> Result<Vec<Placement>> {
        if values.len() != self.model.variables().len() {
            return Err(StripError::Backend {
                reason: format!(
                    "{COORDINATE_FAMILY}: expected {} values, got {}",
                    self.model.variables().len(),
                    values.len()
                ),
            });
        }
        let placements = self
            .instance
            .rectangles()
            .iter()
            .map(|rect| {
                let rotated = match self.orientation[&rect.id] {
                    Orientation::Fixed(rotated) => rotated,
                    Orientation::Free(r) => values[r.index()] > 0.5,
                };
                let (w, h) = rect.dims(rotated);
                Placement::new(
                    rect.id,
                    values[self.x[&rect.id].index()].round() as i64,
                    values[self.y[&rect.id].index()].round() as i64,
                    w,
                    h,
                    rotated,
                )
            })
            .collect();
        Ok(placements)
    }

    /// Solves with the given backend.
    ///
    /// Without an incumbent the warm-start solution is returned, tagged
    /// [`Optimality::Timeout`] if the backend hit its time limit and
    /// [`Optimality::Infeasible`] otherwise.
    ///
    /// # Errors
    ///
    /// Backend errors propagate, as does a backend reporting an error
    /// status without an incumbent.
    pub fn solve(&self, backend: &dyn MilpBackend) -> Result<Solution> {
        if self.instance.is_empty() {
            return Ok(Solution::new(
                0,
                Vec::new(),
                COORDINATE_FAMILY,
                Optimality::Optimal,
            ));
        }
        let outcome = backend.solve(&self.model, self.config.time_limit_ms)?;
        let solution = match outcome.values.as_deref() {
            Some(values) => Solution::from_placements(
                self.decode(values)?,
                COORDINATE_FAMILY,
                outcome.optimality(),
            ),
            None if outcome.optimality() == Optimality::Error => {
                return Err(StripError::Backend {
                    reason: format!("{COORDINATE_FAMILY}: {} failed", backend.name()),
                });
            }
            None => {
                let tag = if outcome.hit_time_limit {
                    Optimality::Timeout
                } else {
                    Optimality::Infeasible
                };
                log::warn!(
                    "{COORDINATE_FAMILY}: no incumbent from {}, returning the warm start",
                    backend.name()
                );
                Solution {
                    optimality: tag,
                    ..self.warm.clone().with_method(COORDINATE_FAMILY)
                }
            }
        };
        log::info!(
            "{COORDINATE_FAMILY}: H = {} ({})",
            solution.height,
            solution.optimality
        );
        Ok(solution)
    }
}

/// Orientation forced by locks, squares or strip width; `None` if free.
fn fixed_orientation(rect: &Rectangle, allow_rotation: bool, strip_width: i64) -> Option<bool> {
    if !rect.can_rotate(allow_rotation) || rect.w == rect.h {
        return Some(false);
    }
    match (rect.w <= strip_width, rect.h <= strip_width) {
        (true, true) => None,
        (false, _) => Some(true),
        (true, false) => Some(false),
    }
}

/// Largest width and height over the item's allowed orientations.
fn extent(rect: &Rectangle, orientation: Orientation) -> (i64, i64) {
    match orientation {
        Orientation::Fixed(rotated) => rect.dims(rotated),
        Orientation::Free(_) => {
            let side = rect.w.max(rect.h);
            (side, side)
        }
    }
}

fn separating_side(a: &Placement, b: &Placement, kerf: i64) -> Option<usize> {
    if a.right() + kerf <= b.x {
        Some(0)
    } else if b.right() + kerf <= a.x {
        Some(1)
    } else if a.top() + kerf <= b.y {
        Some(2)
    } else if b.top() + kerf <= a.y {
        Some(3)
    } else {
        None
    }
}

fn zone_side(p: &Placement, z: &ForbiddenZone, kerf: i64) -> Option<usize> {
    if p.right() + kerf <= z.x {
        Some(0)
    } else if z.right() + kerf <= p.x {
        Some(1)
    } else if p.top() + kerf <= z.y {
        Some(2)
    } else if z.top() + kerf <= p.y {
        Some(3)
    } else {
        None
    }
}
