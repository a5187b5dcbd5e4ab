//! Edge shapes: the curves a polygon boundary is made of.

use super::distance::{arc_to_arc, segment_to_arc, segment_to_segment};
use super::{intersect_arcs, intersect_segment_arc, intersect_segments, Arc2, Point2, Segment2, Vec2};
use crate::bounds::Aabb2;
use crate::tolerance::Tolerance;
use num_traits::Float;

/// Outcome of splitting a shape at a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Split<T> {
    /// The point is the start; nothing precedes it.
    AtStart,
    /// The point is the end; nothing follows it.
    AtEnd,
    /// The point is interior; the shape becomes two pieces.
    Pieces(T, T),
}

impl<T> Split<T> {
    pub fn map<U>(self, f: impl Fn(T) -> U) -> Split<U> {
        match self {
            Split::AtStart => Split::AtStart,
            Split::AtEnd => Split::AtEnd,
            Split::Pieces(a, b) => Split::Pieces(f(a), f(b)),
        }
    }
}

/// A directed boundary curve: a segment or a circular arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeShape<F> {
    Segment(Segment2<F>),
    Arc(Arc2<F>),
}

impl<F: Float> EdgeShape<F> {
    #[inline]
    pub fn start(&self) -> Point2<F> {
        match self {
            EdgeShape::Segment(s) => s.start,
            EdgeShape::Arc(a) => a.start_point(),
        }
    }

    #[inline]
    pub fn end(&self) -> Point2<F> {
        match self {
            EdgeShape::Segment(s) => s.end,
            EdgeShape::Arc(a) => a.end_point(),
        }
    }

    #[inline]
    pub fn length(&self) -> F {
        match self {
            EdgeShape::Segment(s) => s.length(),
            EdgeShape::Arc(a) => a.length(),
        }
    }

    #[inline]
    pub fn bounding_box(&self) -> Aabb2<F> {
        match self {
            EdgeShape::Segment(s) => s.bounding_box(),
            EdgeShape::Arc(a) => a.bounding_box(),
        }
    }

    /// Point halfway along the shape.
    #[inline]
    pub fn middle(&self) -> Point2<F> {
        match self {
            EdgeShape::Segment(s) => s.midpoint(),
            EdgeShape::Arc(a) => a.middle(),
        }
    }

    #[inline]
    pub fn is_arc(&self) -> bool {
        matches!(self, EdgeShape::Arc(_))
    }

    /// Unit tangent at the start, in the direction of travel.
    #[inline]
    pub fn tangent_in_start(&self) -> Vec2<F> {
        match self {
            EdgeShape::Segment(s) => s.tangent_in_start(),
            EdgeShape::Arc(a) => a.tangent_in_start(),
        }
    }

    /// Unit tangent at the end, pointing back toward the start.
    #[inline]
    pub fn tangent_in_end(&self) -> Vec2<F> {
        match self {
            EdgeShape::Segment(s) => s.tangent_in_end(),
            EdgeShape::Arc(a) => a.tangent_in_end(),
        }
    }

    #[inline]
    pub fn reversed(&self) -> Self {
        match self {
            EdgeShape::Segment(s) => EdgeShape::Segment(s.reversed()),
            EdgeShape::Arc(a) => EdgeShape::Arc(a.reversed()),
        }
    }

    pub fn contains(&self, p: Point2<F>, tol: Tolerance<F>) -> bool {
        match self {
            EdgeShape::Segment(s) => s.contains(p, tol),
            EdgeShape::Arc(a) => a.contains(p, tol),
        }
    }

    /// Splits the shape at `p`, which is assumed to lie on it.
    pub fn split(&self, p: Point2<F>, tol: Tolerance<F>) -> Split<Self> {
        match self {
            EdgeShape::Segment(s) => {
                if tol.points_eq(p, s.start) {
                    Split::AtStart
                } else if tol.points_eq(p, s.end) {
                    Split::AtEnd
                } else {
                    Split::Pieces(
                        EdgeShape::Segment(Segment2::new(s.start, p)),
                        EdgeShape::Segment(Segment2::new(p, s.end)),
                    )
                }
            }
            EdgeShape::Arc(a) => a.split(p, tol).map(EdgeShape::Arc),
        }
    }

    /// Length travelled from the start to reach `p`.
    pub fn coord(&self, p: Point2<F>) -> F {
        match self {
            EdgeShape::Segment(s) => s.coord(p),
            EdgeShape::Arc(a) => a.coord(p),
        }
    }

    pub fn intersect(&self, other: &Self, tol: Tolerance<F>) -> Vec<Point2<F>> {
        match (self, other) {
            (EdgeShape::Segment(a), EdgeShape::Segment(b)) => intersect_segments(a, b, tol),
            (EdgeShape::Segment(s), EdgeShape::Arc(a)) => intersect_segment_arc(s, a, tol),
            (EdgeShape::Arc(a), EdgeShape::Segment(s)) => intersect_segment_arc(s, a, tol),
            (EdgeShape::Arc(a), EdgeShape::Arc(b)) => intersect_arcs(a, b, tol),
        }
    }

    /// Shortest distance to `other`, with the segment realising it.
    pub fn distance_to(&self, other: &Self, tol: Tolerance<F>) -> (F, Segment2<F>) {
        match (self, other) {
            (EdgeShape::Segment(a), EdgeShape::Segment(b)) => segment_to_segment(a, b, tol),
            (EdgeShape::Segment(s), EdgeShape::Arc(a)) => segment_to_arc(s, a, tol),
            (EdgeShape::Arc(a), EdgeShape::Segment(s)) => {
                let (d, seg) = segment_to_arc(s, a, tol);
                (d, seg.reversed())
            }
            (EdgeShape::Arc(a), EdgeShape::Arc(b)) => arc_to_arc(a, b, tol),
        }
    }

    /// Contribution to the signed area of the closed ring this shape is part of.
    pub fn signed_area_term(&self) -> F {
        match self {
            EdgeShape::Segment(s) => s.signed_area_term(),
            EdgeShape::Arc(a) => a.signed_area_term(),
        }
    }
}

impl<F> From<Segment2<F>> for EdgeShape<F> {
    fn from(s: Segment2<F>) -> Self {
        EdgeShape::Segment(s)
    }
}

impl<F> From<Arc2<F>> for EdgeShape<F> {
    fn from(a: Arc2<F>) -> Self {
        EdgeShape::Arc(a)
    }
}
