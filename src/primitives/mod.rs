//! Floating-point geometric primitives and operations.
//!
//! Boundaries are built from two kinds of [`EdgeShape`]: straight
//! [`Segment2`]s and circular [`Arc2`]s.

mod arc2;
mod circle2;
mod distance;
mod intersect;
mod point2;
mod segment2;
mod shape;
mod vec2;

pub use arc2::Arc2;
pub use circle2::Circle2;
pub use distance::{arc_to_arc, point_to_arc, point_to_segment, segment_to_arc, segment_to_segment};
pub use intersect::{intersect_arcs, intersect_segment_arc, intersect_segments};
pub use point2::Point2;
pub use segment2::Segment2;
pub use shape::{EdgeShape, Split};
pub use vec2::Vec2;
