//! Strip packing instance with an id index built once at construction.

use super::types::{ForbiddenZone, RectId, Rectangle};
use crate::error::{Result, StripError};
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A strip packing instance.
///
/// Validated on construction and never mutated afterwards; every solver
/// borrows it immutably. Rectangle lookups by id go through an index
/// built once in [`Instance::new`].
///
/// # Examples
///
/// ```
/// use u_strip::model::{ForbiddenZone, Instance, Rectangle};
///
/// let instance = Instance::new(10, vec![Rectangle::new(1, 4, 3), Rectangle::new(2, 4, 3)])
///     .unwrap()
///     .with_kerf(1)
///     .unwrap()
///     .with_forbidden_zones(vec![ForbiddenZone::new(8, 0, 2, 2)])
///     .unwrap();
/// assert_eq!(instance.len(), 2);
/// assert_eq!(instance.rectangle(2).unwrap().w, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "InstanceRepr", into = "InstanceRepr")
)]
pub struct Instance {
    width: i64,
    rectangles: Vec<Rectangle>,
    kerf_delta: i64,
    forbidden_zones: Vec<ForbiddenZone>,
    index: HashMap<RectId, usize>,
}

impl Instance {
    /// Creates an instance with no kerf and no forbidden zones.
    ///
    /// # Errors
    ///
    /// [`StripError::Configuration`] if the width is not positive, a
    /// rectangle has a non-positive dimension, or ids repeat.
    pub fn new(width: i64, rectangles: Vec<Rectangle>) -> Result<Self> {
        if width <= 0 {
            return Err(StripError::config(format!(
                "strip width must be positive, got {width}"
            )));
        }

        let mut index = HashMap::with_capacity(rectangles.len());
        for (pos, rect) in rectangles.iter().enumerate() {
            if rect.w <= 0 || rect.h <= 0 {
                return Err(StripError::config(format!(
                    "rectangle {} has non-positive size {}x{}",
                    rect.id, rect.w, rect.h
                )));
            }
            if index.insert(rect.id, pos).is_some() {
                return Err(StripError::config(format!(
                    "duplicate rectangle id {}",
                    rect.id
                )));
            }
        }

        Ok(Self {
            width,
            rectangles,
            kerf_delta: 0,
            forbidden_zones: Vec::new(),
            index,
        })
    }

    /// Sets the minimum spacing between items, and between items and zones.
    pub fn with_kerf(mut self, kerf_delta: i64) -> Result<Self> {
        if kerf_delta < 0 {
            return Err(StripError::config(format!(
                "kerf must be non-negative, got {kerf_delta}"
            )));
        }
        self.kerf_delta = kerf_delta;
        Ok(self)
    }

    /// Sets the forbidden zones.
    pub fn with_forbidden_zones(mut self, zones: Vec<ForbiddenZone>) -> Result<Self> {
        for (k, z) in zones.iter().enumerate() {
            if z.w <= 0 || z.h <= 0 {
                return Err(StripError::config(format!(
                    "forbidden zone {k} has non-positive size {}x{}",
                    z.w, z.h
                )));
            }
        }
        self.forbidden_zones = zones;
        Ok(self)
    }

    /// Strip width `W`.
    pub fn width(&self) -> i64 {
        self.width
    }

    pub fn rectangles(&self) -> &[Rectangle] {
        &self.rectangles
    }

    pub fn kerf_delta(&self) -> i64 {
        self.kerf_delta
    }

    pub fn forbidden_zones(&self) -> &[ForbiddenZone] {
        &self.forbidden_zones
    }

    pub fn len(&self) -> usize {
        self.rectangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rectangles.is_empty()
    }

    /// Looks up a rectangle by id.
    pub fn rectangle(&self, id: RectId) -> Option<&Rectangle> {
        self.index.get(&id).map(|&pos| &self.rectangles[pos])
    }

    /// Position of a rectangle id in [`rectangles`](Self::rectangles).
    pub fn index_of(&self, id: RectId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn total_area(&self) -> i64 {
        self.rectangles.iter().map(Rectangle::area).sum()
    }

    /// Builds a derived instance with the rectangles reordered.
    ///
    /// `order` lists positions into [`rectangles`](Self::rectangles); width,
    /// kerf and forbidden zones are preserved.
    ///
    /// # Errors
    ///
    /// [`StripError::Configuration`] if `order` is not a permutation of
    /// `0..len()`.
    pub fn reordered(&self, order: &[usize]) -> Result<Instance> {
        if order.len() != self.rectangles.len() {
            return Err(StripError::config(format!(
                "order has {} positions for {} rectangles",
                order.len(),
                self.rectangles.len()
            )));
        }
        let mut seen = vec![false; order.len()];
        for &pos in order {
            match seen.get_mut(pos) {
                Some(slot) if !*slot => *slot = true,
                _ => {
                    return Err(StripError::config(format!(
                        "order is not a permutation: position {pos} is out of range or repeated"
                    )))
                }
            }
        }

        let rectangles: Vec<Rectangle> = order.iter().map(|&i| self.rectangles[i]).collect();
        let index = rectangles
            .iter()
            .enumerate()
            .map(|(pos, r)| (r.id, pos))
            .collect();
        Ok(Instance {
            width: self.width,
            rectangles,
            kerf_delta: self.kerf_delta,
            forbidden_zones: self.forbidden_zones.clone(),
            index,
        })
    }

    /// `ceil(total area / W)`; see [`crate::bounds::area_lb`].
    pub fn area_lb(&self) -> i64 {
        crate::bounds::area_lb(self)
    }

    /// Largest minimal presented height; see [`crate::bounds::maxh_lb`].
    pub fn maxh_lb(&self, allow_rotation: bool) -> i64 {
        crate::bounds::maxh_lb(self, allow_rotation)
    }
}

/// Serialized form of an [`Instance`]; deserialization re-runs validation.
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct InstanceRepr {
    width: i64,
    rectangles: Vec<Rectangle>,
    #[serde(default)]
    kerf_delta: i64,
    #[serde(default)]
    forbidden_zones: Vec<ForbiddenZone>,
}

#[cfg(feature = "serde")]
impl TryFrom<InstanceRepr> for Instance {
    type Error = StripError;

    fn try_from(repr: InstanceRepr) -> Result<Self> {
        Instance::new(repr.width, repr.rectangles)?
            .with_kerf(repr.kerf_delta)?
            .with_forbidden_zones(repr.forbidden_zones)
    }
}

#[cfg(feature = "serde")]
impl From<Instance> for InstanceRepr {
    fn from(instance: Instance) -> Self {
        InstanceRepr {
            width: instance.width,
            rectangles: instance.rectangles,
            kerf_delta: instance.kerf_delta,
            forbidden_zones: instance.forbidden_zones,
        }
    }
}
