//! planum - Boolean operations on planar polygons
//!
//! Polygons are half-edge subdivisions whose edges are straight segments or
//! circular arcs. Faces may be islands or holes, and a polygon may hold any
//! number of them. Union, intersection and difference are computed by
//! splitting both operands where their boundaries cross, discarding the
//! stretches of boundary the operation does not keep, and walking the rest
//! into new faces.
//!
//! Every float comparison goes through an explicit [`Tolerance`].
//!
//! # Example
//!
//! ```
//! use planum::bounds::Aabb2;
//! use planum::polygon::{unify, Polygon};
//! use planum::{Circle2, Tolerance};
//!
//! let square = Polygon::from_box(Aabb2::from_coords(0.0_f64, 0.0, 10.0, 10.0));
//! let disc = Polygon::from_circle(Circle2::from_coords(10.0, 5.0, 3.0));
//!
//! let union = unify(&square, &disc, Tolerance::default()).unwrap();
//! let expected = 100.0 + 4.5 * std::f64::consts::PI;
//! assert!((union.area() - expected).abs() < 1e-9);
//! ```

pub mod bounds;
pub mod error;
pub mod polygon;
pub mod primitives;
pub mod spatial;
pub mod tolerance;

pub use error::BooleanError;
pub use polygon::Polygon;
pub use primitives::{Arc2, Circle2, EdgeShape, Point2, Segment2, Vec2};
pub use tolerance::{orient2d, point_on_segment, Orientation, Tolerance};
