//! Intersection records shared by the two operands of a boolean operation.
//!
//! Every crossing found between the operands is stored twice, once in each
//! operand's list, at the same index. The record carries the point's place on
//! its own operand's boundary: the face, the distance along it and, once the
//! edges have been split, the edges meeting there.

use super::{EdgeId, FaceId, Inclusion, Polygon};
use crate::primitives::{Point2, Split};
use crate::tolerance::Tolerance;
use log::trace;
use num_traits::Float;
use std::cmp::Ordering;

/// Whether an intersection coincides with an end of the edge it was found
/// on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexKind {
    NotVertex,
    Start,
    End,
}

/// One crossing between two polygons, seen from one of them.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionPoint<F> {
    /// Index of the record for the same crossing in the other polygon's
    /// list. `None` once the record is discarded.
    pub id: Option<usize>,
    pub pt: Point2<F>,
    /// Distance along the face boundary, numbered like
    /// [`Edge::arc_length`](super::Edge::arc_length).
    pub arc_length: F,
    /// Edge arriving at the point.
    pub edge_before: Option<EdgeId>,
    /// Edge leaving the point.
    pub edge_after: Option<EdgeId>,
    pub face: Option<FaceId>,
    pub vertex: VertexKind,
}

/// A stretch of the first polygon's boundary between two consecutive
/// intersections, given as record indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Chain {
    pub from: usize,
    pub to: usize,
}

/// Paired record lists of both operands plus their boundary order.
#[derive(Debug, Clone)]
pub(crate) struct Intersections<F> {
    pub points1: Vec<IntersectionPoint<F>>,
    pub points2: Vec<IntersectionPoint<F>>,
    /// Indices into `points1` by face, then by distance along the face.
    pub sorted1: Vec<usize>,
    pub sorted2: Vec<usize>,
}

impl<F: Float> Intersections<F> {
    /// Collects every crossing between the edges of `poly1` and `poly2`.
    ///
    /// Candidate pairs come from the second polygon's edge index, queried
    /// with each edge box of the first.
    pub fn find(poly1: &Polygon<F>, poly2: &Polygon<F>, tol: Tolerance<F>) -> Self {
        let mut ix = Self {
            points1: Vec::new(),
            points2: Vec::new(),
            sorted1: Vec::new(),
            sorted2: Vec::new(),
        };
        for (id1, e1) in poly1.edges() {
            for id2 in poly2.edge_set.search(&e1.bounding_box()) {
                let e2 = &poly2.edges[id2];
                for pt in e1.shape.intersect(&e2.shape, tol) {
                    push_point(poly1, id1, pt, &mut ix.points1, tol);
                    push_point(poly2, id2, pt, &mut ix.points2, tol);
                }
            }
        }
        ix
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points1.len()
    }

    /// Rebuilds both boundary orders.
    pub fn sort(&mut self) {
        self.sorted1 = boundary_order(&self.points1);
        self.sorted2 = boundary_order(&self.points2);
    }

    /// Drops records that repeat another record at the same place on both
    /// polygons, then renumbers and re-sorts the survivors. Returns `true`
    /// if anything was dropped.
    pub fn remove_duplicates(&mut self, tol: Tolerance<F>) -> bool {
        if self.points1.len() < 2 {
            return false;
        }
        let mut squeeze = mark_duplicates(&mut self.points1, &self.sorted1, &mut self.points2, tol);
        squeeze |= mark_duplicates(&mut self.points2, &self.sorted2, &mut self.points1, tol);
        if !squeeze {
            return false;
        }

        let before = self.points1.len();
        self.points1.retain(|p| p.id.is_some());
        self.points2.retain(|p| p.id.is_some());
        for (i, p) in self.points1.iter_mut().enumerate() {
            p.id = Some(i);
        }
        for (i, p) in self.points2.iter_mut().enumerate() {
            p.id = Some(i);
        }
        trace!("dropped {} duplicate intersections", before - self.points1.len());
        self.sort();
        true
    }

    /// Chains of the first polygon, one per sorted record.
    ///
    /// A chain runs from a record to the first record of the next pool on
    /// the same face, wrapping round to the face's first pool. Within that
    /// pool the closing record is the one whose partner sits on the same
    /// face of the second polygon as the opening record's partner; if none
    /// does, the record opens no chain.
    pub fn chains(&self, tol: Tolerance<F>) -> Vec<Chain> {
        let (points, sorted) = (&self.points1, &self.sorted1);
        let mut chains = Vec::with_capacity(sorted.len());
        let mut face = None;
        let mut first_in_face = 0;
        for pos in 0..sorted.len() {
            let from = sorted[pos];
            if pos == 0 || points[from].face != face {
                first_in_face = pos;
                face = points[from].face;
            }
            let next = next_pool(points, sorted, pos, first_in_face, tol);
            let pool = pool_len(points, sorted, next, tol);
            let partner_face = self.points2[from].face;
            let to = sorted[next..next + pool]
                .iter()
                .copied()
                .find(|&j| points[j].face == face && self.points2[j].face == partner_face);
            if let Some(to) = to {
                chains.push(Chain { from, to });
            }
        }
        chains
    }
}

/// Appends a record for `pt`, which lies on `edge_id` of `poly`.
pub(crate) fn push_point<F: Float>(
    poly: &Polygon<F>,
    edge_id: EdgeId,
    pt: Point2<F>,
    points: &mut Vec<IntersectionPoint<F>>,
    tol: Tolerance<F>,
) {
    let edge = &poly.edges[edge_id];
    let length = edge.length();
    let len = match edge.shape.split(pt, tol) {
        Split::AtStart => F::zero(),
        Split::AtEnd => length,
        Split::Pieces(a, _) => a.length(),
    };
    let vertex = if tol.eq_zero(len) {
        VertexKind::Start
    } else if tol.eq(len, length) {
        VertexKind::End
    } else {
        VertexKind::NotVertex
    };
    // The end of a face's last edge is the face's start
    let wraps = vertex == VertexKind::End
        && poly
            .edges
            .get(edge.next)
            .is_some_and(|n| n.arc_length == F::zero());
    let arc_length = if wraps {
        F::zero()
    } else {
        edge.arc_length + len
    };
    points.push(IntersectionPoint {
        id: Some(points.len()),
        pt,
        arc_length,
        edge_before: Some(edge_id),
        edge_after: None,
        face: edge.face,
        vertex,
    });
}

/// Record indices ordered by face (in order of first appearance), then by
/// distance along the face. Ties keep list order.
fn boundary_order<F: Float>(points: &[IntersectionPoint<F>]) -> Vec<usize> {
    let mut faces: Vec<Option<FaceId>> = Vec::new();
    let rank: Vec<usize> = points
        .iter()
        .map(|p| match faces.iter().position(|&f| f == p.face) {
            Some(r) => r,
            None => {
                faces.push(p.face);
                faces.len() - 1
            }
        })
        .collect();

    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| {
        rank[a].cmp(&rank[b]).then_with(|| {
            points[a]
                .arc_length
                .partial_cmp(&points[b].arc_length)
                .unwrap_or(Ordering::Equal)
        })
    });
    order
}

fn mark_duplicates<F: Float>(
    points: &mut [IntersectionPoint<F>],
    sorted: &[usize],
    partners: &mut [IntersectionPoint<F>],
    tol: Tolerance<F>,
) -> bool {
    let mut marked = false;
    for (i, &r) in sorted.iter().enumerate() {
        if points[r].id.is_none() {
            continue;
        }
        let reference = (points[r].edge_before, points[r].edge_after);
        let partner = (partners[r].edge_before, partners[r].edge_after);
        for &c in &sorted[i + 1..] {
            if !tol.eq(points[c].arc_length, points[r].arc_length) {
                break;
            }
            if points[c].id.is_none() || partners[c].id.is_none() {
                continue;
            }
            if (points[c].edge_before, points[c].edge_after) == reference
                && (partners[c].edge_before, partners[c].edge_after) == partner
            {
                points[c].id = None;
                partners[c].id = None;
                marked = true;
            }
        }
    }
    marked
}

/// Splits `poly`'s edges at its records, visited in boundary order, and
/// fills in `edge_before`/`edge_after`.
///
/// Records on one original edge are met in increasing distance, so each
/// split leaves the rest of the edge under its old handle for the next one.
pub(crate) fn split_edges<F: Float>(
    poly: &mut Polygon<F>,
    points: &mut [IntersectionPoint<F>],
    sorted: &[usize],
    tol: Tolerance<F>,
) {
    for &i in sorted {
        let Some(edge_id) = points[i].edge_before else {
            continue;
        };
        let Some(edge) = poly.edges.get(edge_id) else {
            continue;
        };
        let ip = &mut points[i];
        if tol.points_eq(edge.start(), ip.pt) {
            ip.edge_before = Some(edge.prev);
        } else if !tol.points_eq(edge.end(), ip.pt) {
            ip.edge_before = Some(poly.add_vertex(ip.pt, edge_id, tol));
        }
        ip.vertex = VertexKind::End;
    }
    for ip in points.iter_mut() {
        ip.edge_after = ip
            .edge_before
            .and_then(|e| poly.edges.get(e))
            .map(|e| e.next);
    }
}

/// Current label of an edge, if it still exists and has one.
pub(crate) fn label<F>(poly: &Polygon<F>, edge: Option<EdgeId>) -> Option<Inclusion> {
    edge.and_then(|e| poly.edges.get(e)).and_then(|e| e.bv)
}

/// Clears the labels of edges meeting at intersections and marks their
/// ends there as boundary.
pub(crate) fn init_inclusion<F: Float>(poly: &mut Polygon<F>, points: &[IntersectionPoint<F>]) {
    for ip in points {
        for id in [ip.edge_before, ip.edge_after].into_iter().flatten() {
            if let Some(edge) = poly.edges.get_mut(id) {
                edge.reset_flags();
            }
        }
    }
    for ip in points {
        if let Some(edge) = ip.edge_before.and_then(|e| poly.edges.get_mut(e)) {
            edge.bv_end = Some(Inclusion::Boundary);
        }
        if let Some(edge) = ip.edge_after.and_then(|e| poly.edges.get_mut(e)) {
            edge.bv_start = Some(Inclusion::Boundary);
        }
    }
}

/// Labels the edges meeting at intersections against `other`.
pub(crate) fn calculate_inclusion<F: Float>(
    poly: &mut Polygon<F>,
    other: &Polygon<F>,
    points: &[IntersectionPoint<F>],
    tol: Tolerance<F>,
) {
    for ip in points {
        for id in [ip.edge_before, ip.edge_after].into_iter().flatten() {
            if let Some(edge) = poly.edges.get_mut(id) {
                edge.set_inclusion(other, tol);
            }
        }
    }
}

/// Faces of `poly` that no record lies on.
pub(crate) fn untouched_faces<F>(poly: &Polygon<F>, points: &[IntersectionPoint<F>]) -> Vec<FaceId> {
    poly.faces
        .keys()
        .filter(|&f| points.iter().all(|p| p.face != Some(f)))
        .collect()
}

/// Labels each face by its first edge against `other`.
pub(crate) fn classify_faces<F: Float>(
    poly: &mut Polygon<F>,
    faces: &[FaceId],
    other: &Polygon<F>,
    tol: Tolerance<F>,
) {
    for &face_id in faces {
        let Some(first) = poly.faces.get(face_id).map(|f| f.first) else {
            continue;
        };
        if let Some(edge) = poly.edges.get_mut(first) {
            edge.reset_flags();
            edge.set_inclusion(other, tol);
        }
    }
}

/// Number of consecutive sorted records from `pos` at the same point with
/// the same edges.
pub(crate) fn pool_len<F: Float>(
    points: &[IntersectionPoint<F>],
    sorted: &[usize],
    pos: usize,
    tol: Tolerance<F>,
) -> usize {
    let cur = &points[sorted[pos]];
    1 + sorted[pos + 1..]
        .iter()
        .map(|&j| &points[j])
        .take_while(|p| {
            p.face == cur.face
                && tol.points_eq(p.pt, cur.pt)
                && p.edge_before == cur.edge_before
                && p.edge_after == cur.edge_after
        })
        .count()
}

/// Sorted position of the pool that follows the pool at `pos` on the same
/// face, wrapping round to `first_in_face`.
pub(crate) fn next_pool<F: Float>(
    points: &[IntersectionPoint<F>],
    sorted: &[usize],
    pos: usize,
    first_in_face: usize,
    tol: Tolerance<F>,
) -> usize {
    let after = pos + pool_len(points, sorted, pos, tol);
    if after < sorted.len() && points[sorted[after]].face == points[sorted[pos]].face {
        after
    } else {
        first_in_face
    }
}

/// Tags coincident one-edge boundary chains of the two polygons as running
/// the same or opposite ways. Existing tags are kept.
pub(crate) fn set_overlap_flags<F: Float>(
    poly1: &mut Polygon<F>,
    poly2: &mut Polygon<F>,
    ix: &Intersections<F>,
    tol: Tolerance<F>,
) {
    let boundary = Some(Inclusion::Boundary);
    for chain in ix.chains(tol) {
        let (Some(edge1), Some(to1)) = (ix.points1[chain.from].edge_after, ix.points1[chain.to].edge_before) else {
            continue;
        };
        if edge1 != to1 || label(poly1, Some(edge1)) != boundary {
            continue;
        }

        let single = |a: usize, b: usize| {
            let from = ix.points2[a].edge_after?;
            let to = ix.points2[b].edge_before?;
            (from == to && label(poly2, Some(from)) == boundary).then_some(from)
        };
        let Some(edge2) = single(chain.from, chain.to).or_else(|| single(chain.to, chain.from)) else {
            continue;
        };

        let (Some(e1), Some(e2)) = (poly1.edges.get(edge1), poly2.edges.get(edge2)) else {
            continue;
        };
        let flag = e1.overlap_with(e2, tol);
        trace!("boundary chain {:?}/{:?} overlaps {:?}", edge1, edge2, flag);
        let e1 = &mut poly1.edges[edge1];
        if e1.overlap.is_none() {
            e1.overlap = flag;
        }
        let e2 = &mut poly2.edges[edge2];
        if e2.overlap.is_none() {
            e2.overlap = flag;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::Aabb2;
    use crate::polygon::Overlap;
    use approx::assert_relative_eq;

    fn tol() -> Tolerance<f64> {
        Tolerance::new(1e-6)
    }

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon<f64> {
        Polygon::from_box(Aabb2::from_coords(x0, y0, x1, y1))
    }

    fn prepared(a: &mut Polygon<f64>, b: &mut Polygon<f64>) -> Intersections<f64> {
        let mut ix = Intersections::find(a, b, tol());
        ix.sort();
        split_edges(a, &mut ix.points1, &ix.sorted1, tol());
        split_edges(b, &mut ix.points2, &ix.sorted2, tol());
        ix.remove_duplicates(tol());
        ix.sort();
        ix
    }

    #[test]
    fn test_crossing_squares() {
        let mut a = rect(0.0, 0.0, 10.0, 10.0);
        let mut b = rect(5.0, 5.0, 15.0, 15.0);
        let ix = prepared(&mut a, &mut b);

        assert_eq!(ix.len(), 2);
        assert_eq!(a.num_edges(), 6);
        assert_eq!(b.num_edges(), 6);

        let arcs: Vec<f64> = ix.sorted1.iter().map(|&i| ix.points1[i].arc_length).collect();
        assert_relative_eq!(arcs[0], 15.0, epsilon = 1e-9);
        assert_relative_eq!(arcs[1], 25.0, epsilon = 1e-9);

        for (p1, p2) in ix.points1.iter().zip(&ix.points2) {
            assert_eq!(p1.pt, p2.pt);
            let before = a.edge(p1.edge_before.unwrap()).unwrap();
            let after = a.edge(p1.edge_after.unwrap()).unwrap();
            assert!(tol().points_eq(before.end(), p1.pt));
            assert!(tol().points_eq(after.start(), p1.pt));
        }
    }

    #[test]
    fn test_vertex_hits_are_deduplicated() {
        let mut a = rect(0.0, 0.0, 10.0, 10.0);
        let mut b = rect(0.0, 0.0, 10.0, 10.0);
        let ix = prepared(&mut a, &mut b);
        // One record per shared corner
        assert_eq!(ix.len(), 4);
        assert_eq!(a.num_edges(), 4);
        assert!(ix.points1.iter().all(|p| p.vertex == VertexKind::End));
    }

    #[test]
    fn test_labels_and_overlap() {
        let mut a = rect(0.0, 0.0, 50.0, 30.0);
        let mut b = rect(25.0, 0.0, 50.0, 15.0);
        let ix = prepared(&mut a, &mut b);
        assert_eq!(ix.len(), 3);

        init_inclusion(&mut a, &ix.points1);
        init_inclusion(&mut b, &ix.points2);
        calculate_inclusion(&mut a, &b, &ix.points1, tol());
        calculate_inclusion(&mut b, &a, &ix.points2, tol());
        set_overlap_flags(&mut a, &mut b, &ix, tol());

        let shared = a
            .edges()
            .filter(|(_, e)| e.bv == Some(Inclusion::Boundary))
            .count();
        assert_eq!(shared, 2);
        assert!(a
            .edges()
            .filter(|(_, e)| e.bv == Some(Inclusion::Boundary))
            .all(|(_, e)| e.overlap == Some(Overlap::Same)));
        let inner = b
            .edges()
            .filter(|(_, e)| e.bv == Some(Inclusion::Inside))
            .count();
        assert_eq!(inner, 2);
    }

    #[test]
    fn test_untouched_faces() {
        let mut a = Polygon::from_faces(&[
            Aabb2::from_coords(0.0, 0.0, 10.0, 10.0).corners(),
            Aabb2::from_coords(20.0, 0.0, 30.0, 10.0).corners(),
        ]);
        let mut b = rect(5.0, 5.0, 15.0, 15.0);
        let ix = prepared(&mut a, &mut b);
        let untouched = untouched_faces(&a, &ix.points1);
        assert_eq!(untouched.len(), 1);
        let face = a.face(untouched[0]).unwrap();
        assert_eq!(face.bounding_box(), Some(Aabb2::from_coords(20.0, 0.0, 30.0, 10.0)));
        assert!(untouched_faces(&b, &ix.points2).is_empty());
    }
}
