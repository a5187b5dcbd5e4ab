//! Polygons as half-edge subdivisions, and boolean operations on them.
//!
//! This module provides:
//! - [`Polygon`], a set of faces whose boundaries are rings of segment and
//!   arc edges
//! - Point classification by ray shooting
//! - Boolean operations (union, intersection, difference) and boundary
//!   clipping
//! - The interior/boundary/exterior relation matrix and its predicates
//!
//! # Example
//!
//! ```
//! use planum::bounds::Aabb2;
//! use planum::polygon::{intersect, subtract, Polygon};
//! use planum::Tolerance;
//!
//! let tol = Tolerance::default();
//! let a = Polygon::from_box(Aabb2::from_coords(0.0_f64, 0.0, 10.0, 10.0));
//! let b = Polygon::from_box(Aabb2::from_coords(5.0, 5.0, 15.0, 15.0));
//!
//! let overlap = intersect(&a, &b, tol).unwrap();
//! assert!((overlap.area() - 25.0).abs() < 1e-9);
//!
//! let frame = subtract(&a, &Polygon::from_box(Aabb2::from_coords(2.0, 2.0, 8.0, 8.0)), tol).unwrap();
//! assert_eq!(frame.num_faces(), 2);
//! assert!((frame.area() - 64.0).abs() < 1e-9);
//! ```

mod boolean;
mod conflicts;
mod core;
mod edge;
mod face;
mod intersections;
mod ray_shoot;
mod relate;

pub use boolean::{
    boolean_op, calculate_intersections, inner_clip, intersect, outer_clip, subtract, unify, BooleanOp,
};
pub use core::Polygon;
pub use edge::{Edge, EdgeId, FaceId, Inclusion, Overlap};
pub use face::{Face, FaceEdges, FaceOrientation, FaceRef};
pub use intersections::{IntersectionPoint, VertexKind};
pub use ray_shoot::ray_shoot;
pub use relate::{
    contain, cover, covered, disjoint, equal, inside, intersects, relate, touch, De9im, Geometry, Part,
    Shape,
};
