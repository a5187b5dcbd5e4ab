//! Half-edge records and their classification flags.

use super::ray_shoot::ray_shoot;
use super::Polygon;
use crate::bounds::Aabb2;
use crate::primitives::{EdgeShape, Point2};
use crate::tolerance::Tolerance;
use num_traits::Float;
use slotmap::{new_key_type, Key};

new_key_type! {
    /// Stable handle of an edge inside one polygon.
    pub struct EdgeId;
    /// Stable handle of a face inside one polygon.
    pub struct FaceId;
}

/// Position of a point or edge relative to a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Inclusion {
    Inside,
    Outside,
    Boundary,
}

/// Direction agreement between two coincident boundary edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Overlap {
    /// Both edges run the same way.
    Same,
    /// The edges run in opposite directions.
    Opposite,
}

/// One shape of a face boundary, linked to its neighbours in the ring.
///
/// Links are handles into the owning polygon's arenas. A freshly created
/// edge has null `next`/`prev` links and no face until it is placed in a
/// ring.
#[derive(Debug, Clone)]
pub struct Edge<F> {
    pub shape: EdgeShape<F>,
    pub(crate) next: EdgeId,
    pub(crate) prev: EdgeId,
    pub(crate) face: Option<FaceId>,
    /// Boundary length from the face's first edge to this edge's start.
    pub arc_length: F,
    /// Classification of the start point.
    pub bv_start: Option<Inclusion>,
    /// Classification of the end point.
    pub bv_end: Option<Inclusion>,
    /// Classification of the whole edge.
    pub bv: Option<Inclusion>,
    pub overlap: Option<Overlap>,
}

impl<F: Float> Edge<F> {
    pub fn new(shape: EdgeShape<F>) -> Self {
        Self {
            shape,
            next: EdgeId::null(),
            prev: EdgeId::null(),
            face: None,
            arc_length: F::zero(),
            bv_start: None,
            bv_end: None,
            bv: None,
            overlap: None,
        }
    }

    #[inline]
    pub fn next(&self) -> EdgeId {
        self.next
    }

    #[inline]
    pub fn prev(&self) -> EdgeId {
        self.prev
    }

    #[inline]
    pub fn face(&self) -> Option<FaceId> {
        self.face
    }

    #[inline]
    pub fn start(&self) -> Point2<F> {
        self.shape.start()
    }

    #[inline]
    pub fn end(&self) -> Point2<F> {
        self.shape.end()
    }

    #[inline]
    pub fn length(&self) -> F {
        self.shape.length()
    }

    #[inline]
    pub fn bounding_box(&self) -> Aabb2<F> {
        self.shape.bounding_box()
    }

    #[inline]
    pub fn middle(&self) -> Point2<F> {
        self.shape.middle()
    }

    /// Forgets every classification flag.
    pub fn reset_flags(&mut self) {
        self.bv_start = None;
        self.bv_end = None;
        self.bv = None;
        self.overlap = None;
    }

    /// Classifies the edge against `other`, reusing cached flags.
    ///
    /// Missing endpoint labels are filled in by ray shooting. An edge with an
    /// end outside is outside; otherwise an end inside makes it inside; an
    /// edge with both ends on the boundary takes its midpoint's label.
    pub fn set_inclusion(&mut self, other: &Polygon<F>, tol: Tolerance<F>) -> Inclusion {
        if let Some(bv) = self.bv {
            return bv;
        }

        let (start, end) = (self.start(), self.end());
        let bv_start = *self
            .bv_start
            .get_or_insert_with(|| ray_shoot(other, start, tol));
        let bv_end = *self.bv_end.get_or_insert_with(|| ray_shoot(other, end, tol));

        let bv = if bv_start == Inclusion::Outside || bv_end == Inclusion::Outside {
            Inclusion::Outside
        } else if bv_start == Inclusion::Inside || bv_end == Inclusion::Inside {
            Inclusion::Inside
        } else {
            ray_shoot(other, self.middle(), tol)
        };
        self.bv = Some(bv);
        bv
    }

    /// How this edge's shape coincides with `other`'s, if it does.
    pub(crate) fn overlap_with(&self, other: &Edge<F>, tol: Tolerance<F>) -> Option<Overlap> {
        let (a, b) = (&self.shape, &other.shape);
        let same_kind = a.is_arc() == b.is_arc();
        if !same_kind {
            return None;
        }
        let middles_match = !a.is_arc() || tol.points_eq(a.middle(), b.middle());
        if !middles_match {
            return None;
        }
        if tol.points_eq(a.start(), b.start()) && tol.points_eq(a.end(), b.end()) {
            Some(Overlap::Same)
        } else if tol.points_eq(a.start(), b.end()) && tol.points_eq(a.end(), b.start()) {
            Some(Overlap::Opposite)
        } else {
            None
        }
    }
}
