//! Skyline profile packing.

use super::solver::OrientedItem;
use crate::model::{ForbiddenZone, Instance, Placement};

/// A horizontal piece of the skyline: `[x, x + width)` at `height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub x: i64,
    pub width: i64,
    pub height: i64,
}

impl Segment {
    pub fn end(&self) -> i64 {
        self.x + self.width
    }
}

/// Upper boundary of the items placed so far.
///
/// Segments are kept sorted by `x`, cover `[0, W)` without gaps, and
/// adjacent segments never share a height.
#[derive(Debug, Clone)]
pub struct Skyline {
    strip_width: i64,
    segments: Vec<Segment>,
}

impl Skyline {
    /// A flat profile at height 0 spanning the strip.
    pub fn new(strip_width: i64) -> Self {
        Self {
            strip_width,
            segments: vec![Segment {
                x: 0,
                width: strip_width,
                height: 0,
            }],
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn max_height(&self) -> i64 {
        self.segments.iter().map(|s| s.height).max().unwrap_or(0)
    }

    /// Whether a segment can host an item of width `w` plus its kerf margin.
    ///
    /// The margin may be dropped against the right wall of the strip.
    fn hosts(&self, seg: &Segment, w: i64, kerf: i64) -> bool {
        seg.width >= w + kerf || (seg.end() == self.strip_width && seg.width >= w)
    }

    /// Lowest, then leftmost, position among hosting segments.
    ///
    /// Each candidate sits at its segment's start and height, lifted above
    /// any forbidden zone it would touch. `None` when no segment is wide
    /// enough.
    pub fn find_position(
        &self,
        w: i64,
        h: i64,
        kerf: i64,
        zones: &[ForbiddenZone],
    ) -> Option<(i64, i64)> {
        let mut best: Option<(i64, i64)> = None;
        for seg in &self.segments {
            if !self.hosts(seg, w, kerf) {
                continue;
            }
            let y = lift_over_zones(zones, seg.x, seg.height, w, h, kerf);
            // Segments are sorted by x, so a strictly lower y is the only way to win.
            if best.map_or(true, |(_, by)| y < by) {
                best = Some((seg.x, y));
            }
        }
        best
    }

    /// Raises `[x, x + width)` to at least `top`.
    ///
    /// Overlapped segments are split into their uncovered remainders, the
    /// covered part takes `max(old height, top)`, and equal-height
    /// neighbours are merged.
    pub fn raise(&mut self, x: i64, width: i64, top: i64) {
        let end = (x + width).min(self.strip_width);
        let mut next = Vec::with_capacity(self.segments.len() + 2);

        for seg in &self.segments {
            if seg.end() <= x || seg.x >= end {
                next.push(*seg);
                continue;
            }
            if seg.x < x {
                next.push(Segment {
                    x: seg.x,
                    width: x - seg.x,
                    height: seg.height,
                });
            }
            let covered_x = seg.x.max(x);
            let covered_end = seg.end().min(end);
            next.push(Segment {
                x: covered_x,
                width: covered_end - covered_x,
                height: seg.height.max(top),
            });
            if seg.end() > end {
                next.push(Segment {
                    x: end,
                    width: seg.end() - end,
                    height: seg.height,
                });
            }
        }

        next.sort_by_key(|s| s.x);
        let mut merged: Vec<Segment> = Vec::with_capacity(next.len());
        for seg in next {
            match merged.last_mut() {
                Some(last) if last.height == seg.height && last.end() == seg.x => {
                    last.width += seg.width;
                }
                _ => merged.push(seg),
            }
        }
        self.segments = merged;
    }
}

/// Packs items on a skyline in the given order.
///
/// Each item lands on the lowest hosting segment (leftmost on ties). Its
/// footprint plus a `kerf_delta` margin to the right and above is raised
/// into the profile. When no segment is wide enough the item goes to
/// `x = 0` above the current maximum height.
///
/// Items must already be oriented so that `w <= W`.
pub fn pack_skyline(instance: &Instance, items: &[OrientedItem]) -> Vec<Placement> {
    let kerf = instance.kerf_delta();
    let zones = instance.forbidden_zones();
    let mut skyline = Skyline::new(instance.width());
    let mut placements = Vec::with_capacity(items.len());

    for item in items {
        let (x, y) = match skyline.find_position(item.w, item.h, kerf, zones) {
            Some(pos) => pos,
            None => {
                let y = lift_over_zones(zones, 0, skyline.max_height(), item.w, item.h, kerf);
                log::debug!(
                    "skyline: no segment hosts rectangle {}, stacking at y = {y}",
                    item.rect_id
                );
                (0, y)
            }
        };

        placements.push(Placement::new(
            item.rect_id,
            x,
            y,
            item.w,
            item.h,
            item.rotated,
        ));
        skyline.raise(x, item.w + kerf, y + item.h + kerf);
    }

    placements
}

/// Smallest `y' >= y` where the box at `x` clears every zone.
fn lift_over_zones(zones: &[ForbiddenZone], x: i64, y: i64, w: i64, h: i64, kerf: i64) -> i64 {
    let mut y = y;
    while let Some(top) = zones
        .iter()
        .filter(|z| z.blocks(x, y, w, h, kerf))
        .map(|z| z.top() + kerf)
        .max()
    {
        y = top;
    }
    y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rectangle;

    fn item(id: u32, w: i64, h: i64) -> OrientedItem {
        OrientedItem {
            rect_id: id,
            w,
            h,
            rotated: false,
        }
    }

    fn instance(width: i64, kerf: i64, zones: Vec<ForbiddenZone>) -> Instance {
        Instance::new(width, vec![Rectangle::new(1, 1, 1)])
            .unwrap()
            .with_kerf(kerf)
            .unwrap()
            .with_forbidden_zones(zones)
            .unwrap()
    }

    #[test]
    fn test_raise_splits_and_merges() {
        let mut sky = Skyline::new(10);
        sky.raise(0, 4, 3);
        assert_eq!(
            sky.segments(),
            &[
                Segment { x: 0, width: 4, height: 3 },
                Segment { x: 4, width: 6, height: 0 },
            ]
        );
        sky.raise(4, 6, 3);
        assert_eq!(sky.segments(), &[Segment { x: 0, width: 10, height: 3 }]);
        assert_eq!(sky.max_height(), 3);
    }

    #[test]
    fn test_raise_middle_and_never_lowers() {
        let mut sky = Skyline::new(10);
        sky.raise(3, 2, 5);
        assert_eq!(sky.segments().len(), 3);
        // Raising across a taller segment keeps the taller height.
        sky.raise(0, 10, 2);
        assert_eq!(
            sky.segments(),
            &[
                Segment { x: 0, width: 3, height: 2 },
                Segment { x: 3, width: 2, height: 5 },
                Segment { x: 5, width: 5, height: 2 },
            ]
        );
    }

    #[test]
    fn test_find_position_lowest_then_leftmost() {
        let mut sky = Skyline::new(10);
        sky.raise(0, 3, 4);
        sky.raise(3, 3, 1);
        // Segments: [0,3)@4, [3,6)@1, [6,10)@0
        assert_eq!(sky.find_position(2, 1, 0, &[]), Some((6, 0)));
        // Widest segment is 4.
        assert_eq!(sky.find_position(5, 1, 0, &[]), None);
    }

    #[test]
    fn test_pack_single_item() {
        let inst = instance(10, 0, vec![]);
        let p = pack_skyline(&inst, &[item(1, 5, 3)]);
        assert_eq!((p[0].x, p[0].y), (0, 0));
    }

    #[test]
    fn test_pack_fills_lowest_segment() {
        let inst = instance(10, 0, vec![]);
        let items = [item(1, 6, 4), item(2, 4, 2), item(3, 4, 1)];
        let p = pack_skyline(&inst, &items);
        assert_eq!((p[0].x, p[0].y), (0, 0));
        assert_eq!((p[1].x, p[1].y), (6, 0));
        assert_eq!((p[2].x, p[2].y), (6, 2));
    }

    #[test]
    fn test_fallback_stacks_at_left_wall() {
        let inst = instance(10, 0, vec![]);
        // After two items the profile is [0,5)@2, [5,10)@3: no segment is 6 wide.
        let items = [item(1, 5, 2), item(2, 5, 3), item(3, 6, 1)];
        let p = pack_skyline(&inst, &items);
        assert_eq!((p[2].x, p[2].y), (0, 3));
    }

    #[test]
    fn test_kerf_margin_right_and_above() {
        let inst = instance(10, 1, vec![]);
        let items = [item(1, 4, 3), item(2, 5, 3), item(3, 4, 2)];
        let p = pack_skyline(&inst, &items);
        assert_eq!((p[0].x, p[0].y), (0, 0));
        // [5,10) ends at the wall, so no margin is needed on the right.
        assert_eq!((p[1].x, p[1].y), (5, 0));
        assert_eq!((p[2].x, p[2].y), (0, 4));
    }

    #[test]
    fn test_lifts_over_zone() {
        let inst = instance(10, 0, vec![ForbiddenZone::new(0, 0, 10, 1)]);
        let p = pack_skyline(&inst, &[item(1, 4, 3)]);
        assert_eq!((p[0].x, p[0].y), (0, 1));
    }
}
