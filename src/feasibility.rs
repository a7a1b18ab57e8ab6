//! Solution validation.
//!
//! [`check`] is the lenient checker: every rectangle placed exactly once,
//! inside the strip up to the reported height, no pairwise overlap, no
//! zone intersection, locks and sizes respected. Boxes are not inflated by `kerf_delta`.
//! [`FeasibilityChecker::strict`] additionally requires the kerf gap between
//! items and between items and zones.

use crate::model::{Instance, Placement, RectId, Solution};
use std::collections::HashSet;
use thiserror::Error;

/// First invariant a solution breaks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("rectangle {0} is not placed")]
    MissingRectangle(RectId),

    #[error("rectangle {0} is placed more than once")]
    DuplicatePlacement(RectId),

    #[error("placement refers to unknown rectangle {0}")]
    UnknownRectangle(RectId),

    #[error("rectangle {0} leaves the strip")]
    OutOfStrip(RectId),

    #[error("rectangles {0} and {1} overlap")]
    Overlap(RectId, RectId),

    #[error("rectangle {rect_id} intersects forbidden zone {zone}")]
    ZoneIntersection { rect_id: RectId, zone: usize },

    #[error("rectangle {0} is rotated but its orientation is locked")]
    OrientationLocked(RectId),

    #[error("rectangle {0} has the wrong size for its orientation")]
    SizeMismatch(RectId),
}

/// Configurable solution checker.
///
/// ```
/// use u_strip::feasibility::{FeasibilityChecker, Violation};
/// use u_strip::model::{Instance, Optimality, Placement, Rectangle, Solution};
///
/// let instance = Instance::new(10, vec![Rectangle::new(1, 4, 3), Rectangle::new(2, 4, 3)])
///     .unwrap()
///     .with_kerf(2)
///     .unwrap();
/// let touching = Solution::from_placements(
///     vec![Placement::new(1, 0, 0, 4, 3, false), Placement::new(2, 4, 0, 4, 3, false)],
///     "manual",
///     Optimality::Feasible,
/// );
/// assert!(FeasibilityChecker::lenient().verify(&touching, &instance).is_ok());
/// assert_eq!(
///     FeasibilityChecker::strict().verify(&touching, &instance),
///     Err(Violation::Overlap(1, 2))
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeasibilityChecker {
    enforce_kerf: bool,
}

impl FeasibilityChecker {
    /// Ignores `kerf_delta`.
    pub fn lenient() -> Self {
        Self {
            enforce_kerf: false,
        }
    }

    /// Requires `kerf_delta` between items and between items and zones.
    pub fn strict() -> Self {
        Self { enforce_kerf: true }
    }

    pub fn enforces_kerf(&self) -> bool {
        self.enforce_kerf
    }

    pub fn is_feasible(&self, solution: &Solution, instance: &Instance) -> bool {
        self.verify(solution, instance).is_ok()
    }

    /// Returns the first violation found.
    pub fn verify(&self, solution: &Solution, instance: &Instance) -> Result<(), Violation> {
        let gap = if self.enforce_kerf {
            instance.kerf_delta()
        } else {
            0
        };

        let mut seen = HashSet::with_capacity(solution.placements.len());
        for p in &solution.placements {
            let rect = instance
                .rectangle(p.rect_id)
                .ok_or(Violation::UnknownRectangle(p.rect_id))?;
            if !seen.insert(p.rect_id) {
                return Err(Violation::DuplicatePlacement(p.rect_id));
            }
            if p.rotated && !rect.rotatable {
                return Err(Violation::OrientationLocked(p.rect_id));
            }
            if (p.w, p.h) != rect.dims(p.rotated) {
                return Err(Violation::SizeMismatch(p.rect_id));
            }
            if !inside_strip(p, instance.width(), solution.height) {
                return Err(Violation::OutOfStrip(p.rect_id));
            }
            if let Some(zone) = instance
                .forbidden_zones()
                .iter()
                .position(|z| z.blocks(p.x, p.y, p.w, p.h, gap))
            {
                return Err(Violation::ZoneIntersection {
                    rect_id: p.rect_id,
                    zone,
                });
            }
        }
        if let Some(missing) = instance
            .rectangles()
            .iter()
            .find(|r| !seen.contains(&r.id))
        {
            return Err(Violation::MissingRectangle(missing.id));
        }

        for (i, a) in solution.placements.iter().enumerate() {
            for b in &solution.placements[i + 1..] {
                if a.overlaps(b, gap) {
                    return Err(Violation::Overlap(a.rect_id, b.rect_id));
                }
            }
        }
        Ok(())
    }
}

fn inside_strip(p: &Placement, strip_width: i64, height: i64) -> bool {
    p.x >= 0 && p.y >= 0 && p.right() <= strip_width && p.top() <= height
}

/// Lenient feasibility check.
pub fn check(solution: &Solution, instance: &Instance) -> bool {
    FeasibilityChecker::lenient().is_feasible(solution, instance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ForbiddenZone, Optimality, Rectangle};

    fn solution(placements: Vec<Placement>) -> Solution {
        Solution::from_placements(placements, "test", Optimality::Feasible)
    }

    fn pair() -> Instance {
        Instance::new(10, vec![Rectangle::new(1, 4, 3), Rectangle::fixed(2, 4, 3)]).unwrap()
    }

    #[test]
    fn test_valid_side_by_side() {
        let sol = solution(vec![
            Placement::new(1, 0, 0, 4, 3, false),
            Placement::new(2, 4, 0, 4, 3, false),
        ]);
        assert!(check(&sol, &pair()));
    }

    #[test]
    fn test_missing_and_duplicate() {
        let sol = solution(vec![Placement::new(1, 0, 0, 4, 3, false)]);
        assert_eq!(
            FeasibilityChecker::lenient().verify(&sol, &pair()),
            Err(Violation::MissingRectangle(2))
        );
        let sol = solution(vec![
            Placement::new(1, 0, 0, 4, 3, false),
            Placement::new(1, 4, 0, 4, 3, false),
        ]);
        assert_eq!(
            FeasibilityChecker::lenient().verify(&sol, &pair()),
            Err(Violation::DuplicatePlacement(1))
        );
        let sol = solution(vec![Placement::new(9, 0, 0, 4, 3, false)]);
        assert_eq!(
            FeasibilityChecker::lenient().verify(&sol, &pair()),
            Err(Violation::UnknownRectangle(9))
        );
    }

    #[test]
    fn test_out_of_strip() {
        let sol = solution(vec![
            Placement::new(1, 7, 0, 4, 3, false),
            Placement::new(2, 0, 0, 4, 3, false),
        ]);
        assert_eq!(
            FeasibilityChecker::lenient().verify(&sol, &pair()),
            Err(Violation::OutOfStrip(1))
        );
        let sol = solution(vec![
            Placement::new(1, 0, -1, 4, 3, false),
            Placement::new(2, 4, 0, 4, 3, false),
        ]);
        assert!(!check(&sol, &pair()));

        // Reported height below the top of a placement.
        let sol = Solution::new(
            2,
            vec![
                Placement::new(1, 0, 0, 4, 3, false),
                Placement::new(2, 4, 0, 4, 3, false),
            ],
            "test",
            Optimality::Feasible,
        );
        assert_eq!(
            FeasibilityChecker::lenient().verify(&sol, &pair()),
            Err(Violation::OutOfStrip(1))
        );
    }

    #[test]
    fn test_overlap() {
        let sol = solution(vec![
            Placement::new(1, 0, 0, 4, 3, false),
            Placement::new(2, 3, 2, 4, 3, false),
        ]);
        assert_eq!(
            FeasibilityChecker::lenient().verify(&sol, &pair()),
            Err(Violation::Overlap(1, 2))
        );
    }

    #[test]
    fn test_locked_and_size_mismatch() {
        let sol = solution(vec![
            Placement::new(1, 0, 0, 4, 3, false),
            Placement::new(2, 4, 0, 3, 4, true),
        ]);
        assert_eq!(
            FeasibilityChecker::lenient().verify(&sol, &pair()),
            Err(Violation::OrientationLocked(2))
        );
        let sol = solution(vec![
            Placement::new(1, 0, 0, 4, 3, true),
            Placement::new(2, 4, 0, 4, 3, false),
        ]);
        assert_eq!(
            FeasibilityChecker::lenient().verify(&sol, &pair()),
            Err(Violation::SizeMismatch(1))
        );
    }

    #[test]
    fn test_forbidden_zone_rejected() {
        let inst = Instance::new(10, vec![Rectangle::new(1, 4, 3)])
            .unwrap()
            .with_forbidden_zones(vec![ForbiddenZone::new(0, 0, 10, 1)])
            .unwrap();
        let on_floor = solution(vec![Placement::new(1, 0, 0, 4, 3, false)]);
        assert_eq!(
            FeasibilityChecker::lenient().verify(&on_floor, &inst),
            Err(Violation::ZoneIntersection { rect_id: 1, zone: 0 })
        );
        let lifted = solution(vec![Placement::new(1, 0, 1, 4, 3, false)]);
        assert!(check(&lifted, &inst));
    }

    #[test]
    fn test_kerf_only_in_strict_mode() {
        let inst = pair().with_kerf(2).unwrap();
        let tight = solution(vec![
            Placement::new(1, 0, 0, 4, 3, false),
            Placement::new(2, 5, 0, 4, 3, false),
        ]);
        assert!(check(&tight, &inst));
        assert!(!FeasibilityChecker::strict().is_feasible(&tight, &inst));

        let spaced = solution(vec![
            Placement::new(1, 0, 0, 4, 3, false),
            Placement::new(2, 6, 0, 4, 3, false),
        ]);
        assert!(FeasibilityChecker::strict().is_feasible(&spaced, &inst));
    }

    #[test]
    fn test_strict_kerf_around_zones() {
        let inst = Instance::new(10, vec![Rectangle::new(1, 4, 3)])
            .unwrap()
            .with_kerf(1)
            .unwrap()
            .with_forbidden_zones(vec![ForbiddenZone::new(0, 0, 10, 1)])
            .unwrap();
        let touching = solution(vec![Placement::new(1, 0, 1, 4, 3, false)]);
        assert!(check(&touching, &inst));
        assert!(matches!(
            FeasibilityChecker::strict().verify(&touching, &inst),
            Err(Violation::ZoneIntersection { .. })
        ));
        let spaced = solution(vec![Placement::new(1, 0, 2, 4, 3, false)]);
        assert!(FeasibilityChecker::strict().is_feasible(&spaced, &inst));
    }

    #[test]
    fn test_empty_instance_is_feasible() {
        let inst = Instance::new(10, vec![]).unwrap();
        assert!(check(&solution(vec![]), &inst));
    }
}
