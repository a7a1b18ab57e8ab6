//! Next-Fit Decreasing Height shelf packing.

use super::solver::OrientedItem;
use crate::model::{ForbiddenZone, Instance, Placement};

/// The shelf currently being filled.
#[derive(Debug, Clone, Copy)]
struct Shelf {
    y: i64,
    height: i64,
    /// Right edge of the last item on the shelf.
    cursor: i64,
    count: usize,
}

impl Shelf {
    fn open(y: i64) -> Self {
        Self {
            y,
            height: 0,
            cursor: 0,
            count: 0,
        }
    }
}

/// Packs items on shelves in the given order.
///
/// Items go left to right with `kerf_delta` between neighbours. When an
/// item no longer fits, the shelf is closed and the next one opens at
/// `y + shelf height + kerf_delta`. An item blocked by a forbidden zone
/// slides right past it; an empty shelf that cannot host the item anywhere
/// is lifted above the blocking zones.
///
/// Items must already be oriented so that `w <= W`.
pub fn pack_shelf(instance: &Instance, items: &[OrientedItem]) -> Vec<Placement> {
    let strip_width = instance.width();
    let kerf = instance.kerf_delta();
    let zones = instance.forbidden_zones();

    let mut placements = Vec::with_capacity(items.len());
    let mut shelf = Shelf::open(0);

    for item in items {
        loop {
            let start = if shelf.count == 0 {
                0
            } else {
                shelf.cursor + kerf
            };

            if let Some(x) = slide_past_zones(zones, start, shelf.y, item, strip_width, kerf) {
                placements.push(Placement::new(
                    item.rect_id,
                    x,
                    shelf.y,
                    item.w,
                    item.h,
                    item.rotated,
                ));
                shelf.cursor = x + item.w;
                shelf.height = shelf.height.max(item.h);
                shelf.count += 1;
                break;
            }

            if shelf.count > 0 {
                shelf = Shelf::open(shelf.y + shelf.height + kerf);
                continue;
            }

            match lift_over_zones(zones, shelf.y, item.h, kerf) {
                Some(y) => shelf.y = y,
                None => {
                    // Unreachable for items with w <= W; keep the item rather than loop.
                    log::warn!("shelf: no position found for rectangle {}", item.rect_id);
                    placements.push(Placement::new(
                        item.rect_id,
                        0,
                        shelf.y,
                        item.w,
                        item.h,
                        item.rotated,
                    ));
                    shelf.cursor = item.w;
                    shelf.height = item.h;
                    shelf.count = 1;
                    break;
                }
            }
        }
    }

    placements
}

/// Leftmost `x >= start` on the shelf row where the item clears every zone.
fn slide_past_zones(
    zones: &[ForbiddenZone],
    start: i64,
    y: i64,
    item: &OrientedItem,
    strip_width: i64,
    kerf: i64,
) -> Option<i64> {
    let mut x = start;
    loop {
        if x + item.w > strip_width {
            return None;
        }
        let blocker = zones
            .iter()
            .filter(|z| z.blocks(x, y, item.w, item.h, kerf))
            .map(|z| z.right() + kerf)
            .max();
        match blocker {
            Some(next_x) => x = next_x,
            None => return Some(x),
        }
    }
}

/// Lowest zone top (plus kerf) among zones crossing the band `[y, y + h)`.
fn lift_over_zones(zones: &[ForbiddenZone], y: i64, h: i64, kerf: i64) -> Option<i64> {
    zones
        .iter()
        .filter(|z| z.y < y + h + kerf && y < z.top() + kerf)
        .map(|z| z.top() + kerf)
        .min()
}
