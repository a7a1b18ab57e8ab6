//! Genome decoding: (permutation, orientation bits) → [`Solution`].

use crate::error::{Result, StripError};
use crate::heuristic::{orient, pack, sort_for_policy, Policy};
use crate::model::{Instance, Optimality, Solution};

/// Maps an item order plus orientation choices to a packed solution.
///
/// Decoding must be deterministic: the search layer uses it as a pure
/// fitness function and may call it from several threads.
pub trait Decoder: Send + Sync {
    /// Packs the instance.
    ///
    /// `order` is a permutation of positions into
    /// [`Instance::rectangles`]; `flips[i]` is the orientation bit of the
    /// rectangle at position `i`.
    fn decode(
        &self,
        instance: &Instance,
        order: &[usize],
        flips: &[bool],
        allow_rotation: bool,
    ) -> Result<Solution>;

    /// Suffix of the method tag, e.g. `"SkylineDecode"`.
    fn tag(&self) -> &str;
}

/// Decoder built on the placement heuristics.
///
/// Each item starts from the "prefer low" orientation; a set bit turns it
/// to the other orientation when the item may rotate and the turned item
/// still fits the strip. Items are packed in permutation order unless
/// [`with_height_sort`](Self::with_height_sort) is enabled, in which case
/// the heuristic's height sort runs first and the permutation only breaks
/// ties.
///
/// ```
/// use u_strip::heuristic::Policy;
/// use u_strip::model::{Instance, Rectangle};
/// use u_strip::search::{Decoder, HeuristicDecoder};
///
/// let instance = Instance::new(10, vec![Rectangle::new(1, 4, 3), Rectangle::new(2, 6, 2)]).unwrap();
/// let decoder = HeuristicDecoder::new(Policy::Skyline);
/// let solution = decoder.decode(&instance, &[1, 0], &[false, false], true).unwrap();
/// assert_eq!(solution.placement(2).map(|p| (p.x, p.y)), Some((0, 0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeuristicDecoder {
    policy: Policy,
    sort_by_height: bool,
}

impl Default for HeuristicDecoder {
    fn default() -> Self {
        Self::new(Policy::Skyline)
    }
}

impl HeuristicDecoder {
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            sort_by_height: false,
        }
    }

    /// Sorts items by height before packing, as the standalone heuristic does.
    pub fn with_height_sort(mut self, sort_by_height: bool) -> Self {
        self.sort_by_height = sort_by_height;
        self
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }
}

impl Decoder for HeuristicDecoder {
    fn decode(
        &self,
        instance: &Instance,
        order: &[usize],
        flips: &[bool],
        allow_rotation: bool,
    ) -> Result<Solution> {
        if flips.len() != instance.len() {
            return Err(StripError::config(format!(
                "{} orientation bits for {} rectangles",
                flips.len(),
                instance.len()
            )));
        }
        let ordered = instance.reordered(order)?;
        let strip_width = ordered.width();

        let mut items = Vec::with_capacity(order.len());
        for (rect, &pos) in ordered.rectangles().iter().zip(order) {
            let preferred = orient(rect, allow_rotation, strip_width)?;
            let flip = flips[pos] && rect.can_rotate(allow_rotation);
            let turned = preferred.turned();
            items.push(if flip && turned.w <= strip_width {
                turned
            } else {
                preferred
            });
        }

        if self.sort_by_height {
            sort_for_policy(&mut items, &ordered, self.policy, allow_rotation);
        }

        let placements = pack(&ordered, &items, self.policy);
        Ok(Solution::from_placements(
            placements,
            self.policy.method_tag(),
            Optimality::Feasible,
        ))
    }

    fn tag(&self) -> &str {
        match self.policy {
            Policy::Shelf => "ShelfDecode",
            Policy::Skyline => "SkylineDecode",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StripError;
    use crate::model::Rectangle;

    fn instance() -> Instance {
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

    #[test]
    fn test_decodes_in_permutation_order() {
        let decoder = HeuristicDecoder::new(Policy::Shelf);
        let sol = decoder
            .decode(&instance(), &[2, 0, 1], &[false; 3], true)
            .unwrap();
        // Item 3 goes first, turned low to 6x2.
        let p3 = sol.placement(3).unwrap();
        assert_eq!((p3.x, p3.y, p3.w, p3.h, p3.rotated), (0, 0, 6, 2, true));
        let p1 = sol.placement(1).unwrap();
        assert_eq!((p1.x, p1.y), (6, 0));
    }

    #[test]
    fn test_bit_selects_other_orientation() {
        let decoder = HeuristicDecoder::new(Policy::Skyline);
        let sol = decoder
            .decode(&instance(), &[0, 1, 2], &[false, false, true], true)
            .unwrap();
        let p3 = sol.placement(3).unwrap();
        assert_eq!((p3.w, p3.h, p3.rotated), (2, 6, false));
    }

    #[test]
    fn test_bit_ignored_when_locked_or_disabled() {
        let inst = Instance::new(10, vec![Rectangle::fixed(1, 2, 6)]).unwrap();
        let decoder = HeuristicDecoder::default();
        let sol = decoder.decode(&inst, &[0], &[true], true).unwrap();
        assert!(!sol.placements[0].rotated);

        let inst = Instance::new(10, vec![Rectangle::new(1, 6, 2)]).unwrap();
        let sol = decoder.decode(&inst, &[0], &[true], false).unwrap();
        assert!(!sol.placements[0].rotated);
    }

    #[test]
    fn test_bit_ignored_when_turned_item_is_too_wide() {
        // Preferred 3x12 (width fallback); turning gives 12x3, wider than W.
        let inst = Instance::new(10, vec![Rectangle::new(1, 12, 3)]).unwrap();
        let sol = HeuristicDecoder::default()
            .decode(&inst, &[0], &[true], true)
            .unwrap();
        assert_eq!(sol.placements[0].w, 3);
    }

    #[test]
    fn test_height_sort_overrides_order() {
        let decoder = HeuristicDecoder::new(Policy::Shelf).with_height_sort(true);
        let a = decoder.decode(&instance(), &[2, 0, 1], &[false; 3], true).unwrap();
        let b = decoder.decode(&instance(), &[0, 1, 2], &[false; 3], true).unwrap();
        assert_eq!(a.height, b.height);
        assert_eq!(a.height, 5);
    }

    #[test]
    fn test_geometry_error_propagates() {
        let inst = Instance::new(10, vec![Rectangle::new(1, 12, 3)]).unwrap();
        let err = HeuristicDecoder::default()
            .decode(&inst, &[0], &[false], false)
            .unwrap_err();
        assert!(matches!(err, StripError::Geometry { rect_id: 1, .. }));
    }

    #[test]
    fn test_malformed_genome_is_configuration_error() {
        let decoder = HeuristicDecoder::default();
        let inst = instance();
        let cases: [(&[usize], &[bool]); 4] = [
            (&[0, 1], &[false; 3]),
            (&[0, 1, 1], &[false; 3]),
            (&[0, 1, 7], &[false; 3]),
            (&[0, 1, 2], &[false; 2]),
        ];
        for (order, flips) in cases {
            let err = decoder.decode(&inst, order, flips, true).unwrap_err();
            assert!(matches!(err, StripError::Configuration { .. }), "{order:?} {flips:?}");
        }
    }

    #[test]
    fn test_tags() {
        assert_eq!(HeuristicDecoder::new(Policy::Shelf).tag(), "ShelfDecode");
        assert_eq!(HeuristicDecoder::new(Policy::Skyline).tag(), "SkylineDecode");
    }
}
