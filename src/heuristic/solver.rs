//! Orientation rule and the standalone heuristic entry point.

use super::config::{HeuristicConfig, Policy};
use super::shelf::pack_shelf;
use super::skyline::pack_skyline;
use crate::error::{Result, StripError};
use crate::model::{Instance, Optimality, Placement, RectId, Rectangle, Solution};

/// A rectangle with its orientation decided, ready to be packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrientedItem {
    pub rect_id: RectId,
    /// Effective width.
    pub w: i64,
    /// Effective height.
    pub h: i64,
    pub rotated: bool,
}

impl OrientedItem {
    fn of(rect: &Rectangle, rotated: bool) -> Self {
        let (w, h) = rect.dims(rotated);
        Self {
            rect_id: rect.id,
            w,
            h,
            rotated,
        }
    }

    /// The same rectangle turned by 90°.
    pub(crate) fn turned(self) -> Self {
        Self {
            rect_id: self.rect_id,
            w: self.h,
            h: self.w,
            rotated: !self.rotated,
        }
    }
}

/// Applies the "prefer low" orientation rule.
///
/// A rotatable item (under the global switch) takes the orientation with
/// the smaller height, ties staying unrotated. If that orientation is wider
/// than the strip and the other one fits, the other one is used.
///
/// # Errors
///
/// [`StripError::Geometry`] when no allowed orientation fits the strip.
pub fn orient(rect: &Rectangle, allow_rotation: bool, strip_width: i64) -> Result<OrientedItem> {
    let can_rotate = rect.can_rotate(allow_rotation);
    let preferred = OrientedItem::of(rect, can_rotate && rect.h > rect.w);

    if preferred.w <= strip_width {
        return Ok(preferred);
    }
    if can_rotate {
        let other = preferred.turned();
        if other.w <= strip_width {
            return Ok(other);
        }
    }
    Err(geometry_error(rect, allow_rotation, strip_width))
}

/// Verifies that every rectangle fits the strip in some allowed orientation.
pub fn check_geometry(instance: &Instance, allow_rotation: bool) -> Result<()> {
    let strip_width = instance.width();
    for rect in instance.rectangles() {
        if min_width(rect, allow_rotation) > strip_width {
            return Err(geometry_error(rect, allow_rotation, strip_width));
        }
    }
    Ok(())
}

fn min_width(rect: &Rectangle, allow_rotation: bool) -> i64 {
    if rect.can_rotate(allow_rotation) {
        rect.w.min(rect.h)
    } else {
        rect.w
    }
}

fn geometry_error(rect: &Rectangle, allow_rotation: bool, strip_width: i64) -> StripError {
    StripError::Geometry {
        rect_id: rect.id,
        min_width: min_width(rect, allow_rotation),
        strip_width,
    }
}

/// Stable height sort used before packing.
///
/// Shelf sorts by effective height descending. Skyline sorts by the longer
/// side for rotatable items and by the presented height otherwise.
pub(crate) fn sort_for_policy(
    items: &mut [OrientedItem],
    instance: &Instance,
    policy: Policy,
    allow_rotation: bool,
) {
    match policy {
        Policy::Shelf => items.sort_by_key(|item| std::cmp::Reverse(item.h)),
        Policy::Skyline => items.sort_by_key(|item| {
            let rotatable = instance
                .rectangle(item.rect_id)
                .is_some_and(|r| r.can_rotate(allow_rotation));
            std::cmp::Reverse(if rotatable {
                item.w.max(item.h)
            } else {
                item.h
            })
        }),
    }
}

/// Packs an ordered, oriented sequence with the given policy.
pub(crate) fn pack(instance: &Instance, items: &[OrientedItem], policy: Policy) -> Vec<Placement> {
    match policy {
        Policy::Shelf => pack_shelf(instance, items),
        Policy::Skyline => pack_skyline(instance, items),
    }
}

/// Standalone heuristic solver.
///
/// # Usage
///
/// ```
/// use u_strip::heuristic::{HeuristicConfig, HeuristicSolver, Policy};
/// use u_strip::model::{Instance, Rectangle};
///
/// let instance = Instance::new(10, vec![Rectangle::new(1, 5, 3)]).unwrap();
/// let config = HeuristicConfig::default().with_policy(Policy::Skyline);
/// let solution = HeuristicSolver::solve(&instance, &config).unwrap();
/// assert_eq!(solution.height, 3);
/// ```
pub struct HeuristicSolver;

impl HeuristicSolver {
    /// Orients every item, sorts by height and packs with the configured policy.
    ///
    /// Equal sort keys keep instance order.
    pub fn solve(instance: &Instance, config: &HeuristicConfig) -> Result<Solution> {
        let strip_width = instance.width();
        let mut items = instance
            .rectangles()
            .iter()
            .map(|r| orient(r, config.allow_rotation, strip_width))
            .collect::<Result<Vec<_>>>()?;

        let policy = config.effective_policy();
        sort_for_policy(&mut items, instance, policy, config.allow_rotation);
        let placements = pack(instance, &items, policy);

        let solution =
            Solution::from_placements(placements, policy.method_tag(), Optimality::Feasible);
        log::debug!(
            "{}: {} items, H = {}",
            solution.method,
            instance.len(),
            solution.height
        );
        Ok(solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orient_prefers_low() {
        let r = Rectangle::new(3, 2, 6);
        let item = orient(&r, true, 10).unwrap();
        assert_eq!((item.w, item.h, item.rotated), (6, 2, true));
    }

    #[test]
    fn test_orient_tie_stays_unrotated() {
        let item = orient(&Rectangle::new(1, 4, 4), true, 10).unwrap();
        assert!(!item.rotated);
    }

    #[test]
    fn test_orient_respects_lock_and_switch() {
        let locked = orient(&Rectangle::fixed(1, 2, 6), true, 10).unwrap();
        assert!(!locked.rotated);
        let global_off = orient(&Rectangle::new(1, 2, 6), false, 10).unwrap();
        assert!(!global_off.rotated);
    }

    #[test]
    fn test_orient_falls_back_to_narrow_side() {
        // Low orientation is 12x3, which does not fit; 3x12 does.
        let item = orient(&Rectangle::new(1, 12, 3), true, 10).unwrap();
        assert_eq!((item.w, item.h, item.rotated), (3, 12, true));
    }

    #[test]
    fn test_orient_geometry_error_details() {
        let err = orient(&Rectangle::fixed(4, 12, 3), true, 10).unwrap_err();
        assert_eq!(
            err,
            StripError::Geometry {
                rect_id: 4,
                min_width: 12,
                strip_width: 10
            }
        );
    }

    #[test]
    fn test_check_geometry() {
        let ok = Instance::new(10, vec![Rectangle::new(1, 12, 3)]).unwrap();
        assert!(check_geometry(&ok, true).is_ok());
        assert!(check_geometry(&ok, false).is_err());
    }

    #[test]
    fn test_solver_single_item_both_policies() {
        let inst = Instance::new(10, vec![Rectangle::new(1, 5, 3)]).unwrap();
        for policy in [Policy::Shelf, Policy::Skyline] {
            let config = HeuristicConfig::default().with_policy(policy);
            let sol = HeuristicSolver::solve(&inst, &config).unwrap();
            assert_eq!(sol.height, 3, "policy {policy:?}");
            assert_eq!(sol.method, policy.method_tag());
            assert_eq!(sol.optimality, Optimality::Feasible);
        }
    }

    #[test]
    fn test_solver_guillotine_reports_shelf() {
        let inst = Instance::new(10, vec![Rectangle::new(1, 5, 3)]).unwrap();
        let config = HeuristicConfig::default()
            .with_policy(Policy::Skyline)
            .with_guillotine(true);
        let sol = HeuristicSolver::solve(&inst, &config).unwrap();
        assert_eq!(sol.method, "Heuristic-NFDH");
    }

    #[test]
    fn test_solver_propagates_geometry_error() {
        let inst = Instance::new(10, vec![Rectangle::new(1, 12, 3)]).unwrap();
        let config = HeuristicConfig::default().with_allow_rotation(false);
        let err = HeuristicSolver::solve(&inst, &config).unwrap_err();
        assert!(matches!(err, StripError::Geometry { rect_id: 1, .. }));
    }
}
