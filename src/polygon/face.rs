//! Faces: closed rings of edges inside a polygon.

use super::{Edge, EdgeId, FaceId, Polygon};
use crate::bounds::Aabb2;
use crate::primitives::EdgeShape;
use crate::tolerance::Tolerance;
use num_traits::Float;

/// Entry points into one closed ring of edges.
///
/// A face owns nothing. Its edges live in the polygon's arena and are
/// reached by following `next` from `first` until `first` comes round again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub(crate) first: EdgeId,
    pub(crate) last: EdgeId,
}

/// Winding of a face ring, from the sign of its area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceOrientation {
    CounterClockwise,
    Clockwise,
    /// Zero signed area within tolerance.
    NotOrientable,
}

/// A face borrowed together with the polygon that holds its edges.
#[derive(Debug, Clone, Copy)]
pub struct FaceRef<'a, F> {
    pub(crate) polygon: &'a Polygon<F>,
    pub(crate) id: FaceId,
    pub(crate) face: Face,
}

impl<'a, F: Float> FaceRef<'a, F> {
    #[inline]
    pub fn id(&self) -> FaceId {
        self.id
    }

    #[inline]
    pub fn first(&self) -> EdgeId {
        self.face.first
    }

    #[inline]
    pub fn last(&self) -> EdgeId {
        self.face.last
    }

    /// Edges of the ring, starting at `first`.
    ///
    /// The walk stops after as many steps as the polygon has edges, so a
    /// broken ring can never make it spin.
    pub fn edges(&self) -> FaceEdges<'a, F> {
        FaceEdges {
            polygon: self.polygon,
            first: self.face.first,
            next: Some(self.face.first),
            remaining: self.polygon.edges.len(),
        }
    }

    pub fn shapes(&self) -> impl Iterator<Item = EdgeShape<F>> + 'a {
        self.edges().map(|(_, e)| e.shape)
    }

    pub fn len(&self) -> usize {
        self.edges().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Signed area enclosed by the ring. Positive for counter-clockwise.
    pub fn signed_area(&self) -> F {
        self.edges()
            .fold(F::zero(), |acc, (_, e)| acc + e.shape.signed_area_term())
    }

    #[inline]
    pub fn area(&self) -> F {
        self.signed_area().abs()
    }

    pub fn orientation(&self, tol: Tolerance<F>) -> FaceOrientation {
        let area = self.signed_area();
        if tol.eq_zero(area) {
            FaceOrientation::NotOrientable
        } else if area > F::zero() {
            FaceOrientation::CounterClockwise
        } else {
            FaceOrientation::Clockwise
        }
    }

    pub fn perimeter(&self) -> F {
        self.edges().fold(F::zero(), |acc, (_, e)| acc + e.length())
    }

    /// Union of the edge boxes.
    pub fn bounding_box(&self) -> Option<Aabb2<F>> {
        self.edges()
            .map(|(_, e)| e.bounding_box())
            .reduce(|a, b| a.union(b))
    }

    /// True when `next`/`prev` links are mutually consistent and the ring
    /// returns to `first` with `last` as the final edge.
    pub fn is_closed(&self) -> bool {
        let edges = &self.polygon.edges;
        let mut count = 0;
        let mut cur = self.face.first;
        loop {
            let Some(edge) = edges.get(cur) else {
                return false;
            };
            if edges.get(edge.next).map(|n| n.prev) != Some(cur) {
                return false;
            }
            count += 1;
            if count > edges.len() {
                return false;
            }
            if edge.next == self.face.first {
                return cur == self.face.last;
            }
            cur = edge.next;
        }
    }

    /// True when no two edges of the ring cross or touch anywhere except at
    /// the vertex shared by neighbours.
    pub fn is_simple(&self, tol: Tolerance<F>) -> bool {
        let polygon = self.polygon;
        for (id1, e1) in self.edges() {
            for id2 in polygon.edge_set.search(&e1.bounding_box()) {
                if id1 == id2 {
                    continue;
                }
                let Some(e2) = polygon.edges.get(id2) else {
                    continue;
                };
                if e2.face != Some(self.id) {
                    continue;
                }
                for p in e1.shape.intersect(&e2.shape, tol) {
                    if e1.prev == id2 && tol.points_eq(p, e1.start()) && tol.points_eq(p, e2.end()) {
                        continue;
                    }
                    if e1.next == id2 && tol.points_eq(p, e1.end()) && tol.points_eq(p, e2.start()) {
                        continue;
                    }
                    return false;
                }
            }
        }
        true
    }
}

/// Iterator over the edges of one face ring.
#[derive(Debug, Clone)]
pub struct FaceEdges<'a, F> {
    polygon: &'a Polygon<F>,
    first: EdgeId,
    next: Option<EdgeId>,
    remaining: usize,
}

impl<'a, F> Iterator for FaceEdges<'a, F> {
    type Item = (EdgeId, &'a Edge<F>);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        if self.remaining == 0 {
            self.next = None;
            return None;
        }
        self.remaining -= 1;
        let Some(edge) = self.polygon.edges.get(id) else {
            self.next = None;
            return None;
        };
        self.next = (edge.next != self.first).then_some(edge.next);
        Some((id, edge))
    }
}
