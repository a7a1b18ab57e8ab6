//! Value types: rectangles, placements, and forbidden zones.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Caller-assigned rectangle identifier.
pub type RectId = u32;

/// A rectangle to be packed.
///
/// Dimensions are validated when the rectangle is added to an
/// [`Instance`](super::Instance); the value itself is a plain record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rectangle {
    /// Unique identifier within an instance.
    pub id: RectId,
    /// Width in the unrotated orientation.
    pub w: i64,
    /// Height in the unrotated orientation.
    pub h: i64,
    /// Whether a 90° rotation is permitted for this item.
    pub rotatable: bool,
}

impl Rectangle {
    /// Creates a rotatable rectangle.
    pub fn new(id: RectId, w: i64, h: i64) -> Self {
        Self {
            id,
            w,
            h,
            rotatable: true,
        }
    }

    /// Creates a rectangle whose orientation is locked.
    pub fn fixed(id: RectId, w: i64, h: i64) -> Self {
        Self {
            id,
            w,
            h,
            rotatable: false,
        }
    }

    /// Sets the rotatable flag.
    pub fn with_rotatable(mut self, rotatable: bool) -> Self {
        self.rotatable = rotatable;
        self
    }

    pub fn area(&self) -> i64 {
        self.w * self.h
    }

    /// Whether this item may be rotated under a global rotation switch.
    pub fn can_rotate(&self, allow_rotation: bool) -> bool {
        allow_rotation && self.rotatable
    }

    /// Effective `(w, h)` in the given orientation.
    pub fn dims(&self, rotated: bool) -> (i64, i64) {
        if rotated {
            (self.h, self.w)
        } else {
            (self.w, self.h)
        }
    }
}

/// Where a solver put a rectangle.
///
/// `w` and `h` are the effective dimensions after any rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    /// Id of the placed rectangle in the originating instance.
    pub rect_id: RectId,
    /// Lower-left corner x.
    pub x: i64,
    /// Lower-left corner y.
    pub y: i64,
    /// Effective width.
    pub w: i64,
    /// Effective height.
    pub h: i64,
    /// Whether the rectangle was rotated by 90°.
    pub rotated: bool,
}

impl Placement {
    pub fn new(rect_id: RectId, x: i64, y: i64, w: i64, h: i64, rotated: bool) -> Self {
        Self {
            rect_id,
            x,
            y,
            w,
            h,
            rotated,
        }
    }

    pub fn right(&self) -> i64 {
        self.x + self.w
    }

    pub fn top(&self) -> i64 {
        self.y + self.h
    }

    /// Whether the two boxes are closer than `gap` on every axis.
    ///
    /// With `gap = 0` this is the strict separating-axis test: boxes that
    /// only touch along an edge do not overlap.
    pub fn overlaps(&self, other: &Placement, gap: i64) -> bool {
        boxes_overlap(
            (self.x, self.y, self.w, self.h),
            (other.x, other.y, other.w, other.h),
            gap,
        )
    }
}

/// An axis-aligned region of the strip that no item may intersect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ForbiddenZone {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

impl ForbiddenZone {
    pub fn new(x: i64, y: i64, w: i64, h: i64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> i64 {
        self.x + self.w
    }

    pub fn top(&self) -> i64 {
        self.y + self.h
    }

    /// Whether a box at `(x, y)` of size `w × h` comes closer than `gap`.
    pub fn blocks(&self, x: i64, y: i64, w: i64, h: i64, gap: i64) -> bool {
        boxes_overlap((x, y, w, h), (self.x, self.y, self.w, self.h), gap)
    }
}

/// Separating-axis test on `(x, y, w, h)` boxes with a required gap.
pub(crate) fn boxes_overlap(a: (i64, i64, i64, i64), b: (i64, i64, i64, i64), gap: i64) -> bool {
    let (ax, ay, aw, ah) = a;
    let (bx, by, bw, bh) = b;
    !(ax + aw + gap <= bx || bx + bw + gap <= ax || ay + ah + gap <= by || by + bh + gap <= ay)
}
