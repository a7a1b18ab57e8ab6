//! Geometric data model shared by every solver.
//!
//! - [`Rectangle`]: an item to pack, identified by a caller-assigned id
//! - [`Placement`]: where a solver put a rectangle, and in which orientation
//! - [`ForbiddenZone`]: an axis-aligned region no item may intersect
//! - [`Instance`]: the strip width, the items, kerf and forbidden zones
//! - [`Solution`]: achieved height, placements, producing method, status
//!
//! All coordinates are integers with the origin at the lower-left corner
//! of the strip; `x` grows to the right and `y` grows upward.

mod instance;
mod solution;
mod types;

pub use instance::Instance;
pub use solution::{Optimality, Solution};
pub use types::{ForbiddenZone, Placement, RectId, Rectangle};
