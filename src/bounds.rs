//! Lower bounds on the optimal strip height.
//!
//! Every solver seeds or constrains itself with these values; no strategy
//! returns a height below [`lower_bound`].

use crate::model::Instance;

/// Area bound: `ceil(Σ area / W)`.
///
/// Valid because the total item area cannot exceed `W × H`.
pub fn area_lb(instance: &Instance) -> i64 {
    let area = instance.total_area();
    let w = instance.width();
    (area + w - 1) / w
}

/// Tallest-item bound.
///
/// With rotation allowed an item can present its shorter side, so the
/// bound is the largest `min(w, h)`; otherwise the largest raw `h`.
/// Only the global flag is consulted; per-item locks are not.
pub fn maxh_lb(instance: &Instance, allow_rotation: bool) -> i64 {
    instance
        .rectangles()
        .iter()
        .map(|r| if allow_rotation { r.w.min(r.h) } else { r.h })
        .max()
        .unwrap_or(0)
}

/// `max(area_lb, maxh_lb)`.
pub fn lower_bound(instance: &Instance, allow_rotation: bool) -> i64 {
    area_lb(instance).max(maxh_lb(instance, allow_rotation))
}
