//! 2D geometry used by the collision engine
//!
//! # Module Organization
//!
//! - [`primitives`] - Rectangles, circles, segments and convex point lists
//! - [`sat`] - Separating Axis Theorem and edge-based polygon tests
//! - [`intersection`] - Pairwise dispatch between primitive kinds
//!
//! # Key Types
//!
//! - [`Rect`] - Axis-aligned rectangle, used for all bounding boxes
//! - [`Primitive`] - Borrowed view of a simple shape's geometry

pub mod primitives;
pub mod sat;
pub mod intersection;

pub use primitives::{Circle, Rect, Segment};
pub use intersection::Primitive;
