//! Polygon boolean operations.
//!
//! Both operands are cloned, split at every crossing, and each stretch of
//! boundary between crossings is labelled inside, outside or on the other
//! operand. Stretches the operation does not keep are cut out, and for the
//! merging operations the surviving pieces of both operands are spliced
//! together at the crossings and walked into new faces.

use super::conflicts::resolve_conflicts;
use super::intersections::{
    calculate_inclusion, classify_faces, init_inclusion, next_pool, pool_len, set_overlap_flags,
    split_edges, untouched_faces, Intersections,
};
use super::ray_shoot::ray_shoot;
use super::{Edge, EdgeId, FaceId, FaceRef, Inclusion, IntersectionPoint, Overlap, Polygon};
use crate::error::BooleanError;
use crate::primitives::{EdgeShape, Point2};
use crate::tolerance::Tolerance;
use log::{debug, trace};
use num_traits::Float;
use slotmap::SecondaryMap;

/// The boolean operation to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanOp {
    Union,
    Intersect,
    Subtract,
}

/// Applies `op` to `a` and `b`.
///
/// For [`BooleanOp::Subtract`] the faces of `b` are reversed first, so its
/// islands end up as holes of the result.
pub fn boolean_op<F: Float>(
    a: &Polygon<F>,
    b: &Polygon<F>,
    op: BooleanOp,
    tol: Tolerance<F>,
) -> Result<Polygon<F>, BooleanError> {
    let (res, _) = match op {
        BooleanOp::Subtract => boolean_op_binary(a, &b.reversed(), op, true, tol)?,
        _ => boolean_op_binary(a, b, op, true, tol)?,
    };
    Ok(res)
}

/// Union of two polygons.
///
/// # Example
///
/// ```
/// use planum::bounds::Aabb2;
/// use planum::polygon::{unify, Polygon};
/// use planum::Tolerance;
///
/// let a = Polygon::from_box(Aabb2::from_coords(0.0_f64, 0.0, 2.0, 2.0));
/// let b = Polygon::from_box(Aabb2::from_coords(1.0, 1.0, 3.0, 3.0));
/// let union = unify(&a, &b, Tolerance::default()).unwrap();
/// assert_eq!(union.num_faces(), 1);
/// assert!((union.area() - 7.0).abs() < 1e-9);
/// ```
pub fn unify<F: Float>(a: &Polygon<F>, b: &Polygon<F>, tol: Tolerance<F>) -> Result<Polygon<F>, BooleanError> {
    boolean_op(a, b, BooleanOp::Union, tol)
}

/// Intersection of two polygons.
///
/// # Arguments
///
/// * `a`, `b` - Operands; neither is modified
/// * `tol` - Tolerance for matching points and classifying edges
///
/// # Returns
///
/// The region covered by both operands, possibly with several faces. Two
/// operands that only touch give an empty polygon.
///
/// # Example
///
/// ```
/// use planum::bounds::Aabb2;
/// use planum::polygon::{intersect, Polygon};
/// use planum::Tolerance;
///
/// let a = Polygon::from_box(Aabb2::from_coords(0.0_f64, 0.0, 4.0, 4.0));
/// let b = Polygon::from_box(Aabb2::from_coords(2.0, 1.0, 6.0, 3.0));
/// let both = intersect(&a, &b, Tolerance::default()).unwrap();
/// assert_eq!(both.num_faces(), 1);
/// assert!((both.area() - 4.0).abs() < 1e-9);
/// ```
pub fn intersect<F: Float>(a: &Polygon<F>, b: &Polygon<F>, tol: Tolerance<F>) -> Result<Polygon<F>, BooleanError> {
    boolean_op(a, b, BooleanOp::Intersect, tol)
}

/// `a` minus `b`.
///
/// `b` is reversed before the boolean pass, so parts of `b` inside `a`
/// come back as holes.
///
/// # Errors
///
/// Returns [`BooleanError`] when labels along a shared boundary cannot be
/// made consistent, or a rebuilt face ring does not close.
///
/// # Example
///
/// ```
/// use planum::bounds::Aabb2;
/// use planum::polygon::{subtract, FaceOrientation, Polygon};
/// use planum::Tolerance;
///
/// let tol = Tolerance::default();
/// let a = Polygon::from_box(Aabb2::from_coords(0.0_f64, 0.0, 10.0, 10.0));
/// let b = Polygon::from_box(Aabb2::from_coords(4.0, 4.0, 6.0, 6.0));
/// let frame = subtract(&a, &b, tol).unwrap();
/// assert_eq!(frame.num_faces(), 2);
/// assert!(frame.faces().any(|f| f.orientation(tol) == FaceOrientation::Clockwise));
/// ```
pub fn subtract<F: Float>(a: &Polygon<F>, b: &Polygon<F>, tol: Tolerance<F>) -> Result<Polygon<F>, BooleanError> {
    boolean_op(a, b, BooleanOp::Subtract, tol)
}

/// Boundary of the intersection, split by origin: the pieces of `a`'s
/// boundary inside `b`, then the pieces of `b`'s boundary inside `a`.
pub fn inner_clip<F: Float>(
    a: &Polygon<F>,
    b: &Polygon<F>,
    tol: Tolerance<F>,
) -> Result<(Vec<EdgeShape<F>>, Vec<EdgeShape<F>>), BooleanError> {
    let (res, wrk) = boolean_op_binary(a, b, BooleanOp::Intersect, false, tol)?;
    Ok((face_shapes(&res), face_shapes(&wrk)))
}

/// Pieces of `a`'s boundary outside `b`.
pub fn outer_clip<F: Float>(
    a: &Polygon<F>,
    b: &Polygon<F>,
    tol: Tolerance<F>,
) -> Result<Vec<EdgeShape<F>>, BooleanError> {
    let (res, _) = boolean_op_binary(a, b, BooleanOp::Subtract, false, tol)?;
    Ok(face_shapes(&res))
}

/// Crossings between the boundaries of `a` and `b`, once each, in boundary
/// order of `a` and of `b` respectively.
pub fn calculate_intersections<F: Float>(
    a: &Polygon<F>,
    b: &Polygon<F>,
    tol: Tolerance<F>,
) -> (Vec<Point2<F>>, Vec<Point2<F>>) {
    let mut res = a.clone();
    let mut wrk = b.clone();
    let ix = prepare_intersections(&mut res, &mut wrk, tol);
    let pts = |points: &[IntersectionPoint<F>], sorted: &[usize]| sorted.iter().map(|&i| points[i].pt).collect();
    (pts(&ix.points1, &ix.sorted1), pts(&ix.points2, &ix.sorted2))
}

fn face_shapes<F: Float>(poly: &Polygon<F>) -> Vec<EdgeShape<F>> {
    poly.faces().flat_map(|f| f.shapes()).collect()
}

/// Runs `op` on clones of `a` (the result operand) and `b` (the working
/// operand). Without `restore` both are returned pruned but unspliced.
pub(crate) fn boolean_op_binary<F: Float>(
    a: &Polygon<F>,
    b: &Polygon<F>,
    op: BooleanOp,
    restore: bool,
    tol: Tolerance<F>,
) -> Result<(Polygon<F>, Polygon<F>), BooleanError> {
    let mut res = a.clone();
    let mut wrk = b.clone();

    let mut ix = prepare_intersections(&mut res, &mut wrk, tol);
    debug!("{:?}: {} intersection(s)", op, ix.len());

    filter_irrelevant_edges(&mut res, &mut wrk, &mut ix, op, tol)?;

    if restore {
        forget_removed(&res, &mut ix.points1);
        copy_wrk_to_res(&mut res, &wrk, &mut ix.points2)?;
        swap_links(&mut res, &mut ix, tol);
        remove_old_faces(&mut res, &mut ix.points1);
        remove_old_faces(&mut res, &mut ix.points2);
        restore_faces(&mut res, &mut ix.points1, &mut ix.points2)?;
        restore_faces(&mut res, &mut ix.points2, &mut ix.points1)?;
        debug!(
            "{:?}: result has {} face(s), {} edge(s)",
            op,
            res.num_faces(),
            res.num_edges()
        );
    }
    Ok((res, wrk))
}

/// Finds the crossings, splits both polygons there and drops duplicates.
///
/// Splitting can make records coincide that did not before, so splitting
/// and dedup repeat until a pass drops nothing. Each repeat drops at least
/// one record, which bounds the passes.
fn prepare_intersections<F: Float>(
    res: &mut Polygon<F>,
    wrk: &mut Polygon<F>,
    tol: Tolerance<F>,
) -> Intersections<F> {
    let mut ix = Intersections::find(res, wrk, tol);
    ix.sort();
    for pass in 1..=ix.len() + 1 {
        split_edges(res, &mut ix.points1, &ix.sorted1, tol);
        split_edges(wrk, &mut ix.points2, &ix.sorted2, tol);
        if !ix.remove_duplicates(tol) {
            trace!("intersections settled after {} pass(es)", pass);
            break;
        }
    }
    ix.sort();
    ix
}

fn filter_irrelevant_edges<F: Float>(
    res: &mut Polygon<F>,
    wrk: &mut Polygon<F>,
    ix: &mut Intersections<F>,
    op: BooleanOp,
    tol: Tolerance<F>,
) -> Result<(), BooleanError> {
    let untouched_res = untouched_faces(res, &ix.points1);
    let untouched_wrk = untouched_faces(wrk, &ix.points2);
    classify_faces(res, &untouched_res, wrk, tol);
    classify_faces(wrk, &untouched_wrk, res, tol);

    init_inclusion(res, &ix.points1);
    init_inclusion(wrk, &ix.points2);
    calculate_inclusion(res, wrk, &ix.points1, tol);
    calculate_inclusion(wrk, res, &ix.points2, tol);

    resolve_conflicts(res, wrk, ix, tol)?;
    set_overlap_flags(res, wrk, ix, tol);

    remove_irrelevant_chains(res, op, &mut ix.points1, &ix.sorted1, true, tol);
    remove_irrelevant_chains(wrk, op, &mut ix.points2, &ix.sorted2, false, tol);
    // Both sides are judged before either loses a face
    let dropped_res = irrelevant_faces(res, &untouched_res, &ix.points1, wrk, op, true, tol);
    let dropped_wrk = irrelevant_faces(wrk, &untouched_wrk, &ix.points2, res, op, false, tol);
    remove_irrelevant_faces(res, &dropped_res);
    remove_irrelevant_faces(wrk, &dropped_wrk);
    Ok(())
}

/// Whether the chain from `from` to `to` is dropped from the result
/// (`is_res`) or working operand.
fn chain_is_irrelevant<F>(op: BooleanOp, from: &Edge<F>, to: &Edge<F>, is_res: bool) -> bool {
    use Inclusion::*;
    let (f, t) = (from.bv, to.bv);
    let drop = match op {
        BooleanOp::Union => f == Some(Inside) && t == Some(Inside),
        BooleanOp::Intersect => f == Some(Outside) && t == Some(Outside),
        BooleanOp::Subtract if is_res => f == Some(Inside) || t == Some(Inside),
        BooleanOp::Subtract => f == Some(Outside) || t == Some(Outside),
    };
    if drop {
        return true;
    }
    let shared = f == Some(Boundary) && t == Some(Boundary);
    match from.overlap {
        Some(Overlap::Same) => shared && is_res,
        Some(Overlap::Opposite) => shared,
        None => false,
    }
}

fn remove_irrelevant_chains<F: Float>(
    poly: &mut Polygon<F>,
    op: BooleanOp,
    points: &mut [IntersectionPoint<F>],
    sorted: &[usize],
    is_res: bool,
    tol: Tolerance<F>,
) {
    let mut face = None;
    let mut first_in_face = 0;
    let mut pos = 0;
    while pos < sorted.len() {
        let cur = sorted[pos];
        if pos == 0 || points[cur].face != face {
            first_in_face = pos;
            face = points[cur].face;
        }
        let from_pool = pool_len(points, sorted, pos, tol);
        let Some(face_id) = face.filter(|&f| poly.faces.contains_key(f)) else {
            pos += from_pool;
            continue;
        };
        let next = next_pool(points, sorted, pos, first_in_face, tol);
        let to_pool = pool_len(points, sorted, next, tol);

        let from = points[cur].edge_after;
        let to = points[sorted[next]].edge_before;
        let (Some(from), Some(to)) = (from, to) else {
            pos += from_pool;
            continue;
        };
        let (Some(edge_from), Some(edge_to)) = (poly.edges.get(from), poly.edges.get(to)) else {
            pos += from_pool;
            continue;
        };

        if chain_is_irrelevant(op, edge_from, edge_to, is_res) {
            trace!(
                "{:?}: dropping chain {:?}..{:?} labelled {:?}/{:?}",
                op,
                from,
                to,
                edge_from.bv,
                edge_to.bv
            );
            poly.remove_chain(face_id, from, to);
            for &k in &sorted[pos..pos + from_pool] {
                points[k].edge_after = None;
            }
            for &k in &sorted[next..next + to_pool] {
                points[k].edge_before = None;
            }
        }
        pos += from_pool;
    }
}

/// Untouched faces of `poly` the operation does not keep.
///
/// A face whose first edge lies on `other`'s boundary traces a face of
/// `other` and is judged like a shared boundary chain.
fn irrelevant_faces<F: Float>(
    poly: &Polygon<F>,
    faces: &[FaceId],
    points: &[IntersectionPoint<F>],
    other: &Polygon<F>,
    op: BooleanOp,
    is_res: bool,
    tol: Tolerance<F>,
) -> Vec<FaceId> {
    use Inclusion::*;
    let mut dropped = Vec::new();
    for &face_id in faces {
        if points.iter().any(|p| p.face == Some(face_id)) {
            continue;
        }
        let Some(first) = poly.faces.get(face_id).map(|f| f.first) else {
            continue;
        };
        let bv = poly.edges.get(first).and_then(|e| e.bv);
        let drop = match (op, bv) {
            (BooleanOp::Union, Some(Inside)) => true,
            (BooleanOp::Intersect, Some(Outside)) => true,
            (BooleanOp::Subtract, Some(Inside)) => is_res,
            (BooleanOp::Subtract, Some(Outside)) => !is_res,
            (_, Some(Boundary)) => match coincident_overlap(poly, face_id, other, tol) {
                Some(Overlap::Same) => is_res,
                Some(Overlap::Opposite) => true,
                None => false,
            },
            _ => false,
        };
        if drop {
            trace!("{:?}: dropping untouched face {:?} labelled {:?}", op, face_id, bv);
            dropped.push(face_id);
        }
    }
    dropped
}

/// Whether a face of `other` traces the same ring as `face_id`, and if so
/// whether it runs the same way.
fn coincident_overlap<F: Float>(
    poly: &Polygon<F>,
    face_id: FaceId,
    other: &Polygon<F>,
    tol: Tolerance<F>,
) -> Option<Overlap> {
    let face = poly.face(face_id)?;
    let aabb = face.bounding_box()?;
    let area = face.signed_area();
    other.faces_in(&aabb).into_iter().find_map(|id| {
        let candidate = other.face(id)?;
        let bounds = candidate.bounding_box()?;
        let traced = tol.points_eq(bounds.min, aabb.min)
            && tol.points_eq(bounds.max, aabb.max)
            && tol.eq(candidate.area(), face.area())
            && runs_along(face, other, tol)
            && runs_along(candidate, poly, tol);
        if !traced {
            return None;
        }
        let same_way = (candidate.signed_area() > F::zero()) == (area > F::zero());
        Some(if same_way { Overlap::Same } else { Overlap::Opposite })
    })
}

/// Every edge of `face` has its middle on `target`'s boundary.
fn runs_along<F: Float>(face: FaceRef<'_, F>, target: &Polygon<F>, tol: Tolerance<F>) -> bool {
    face.edges()
        .all(|(_, e)| ray_shoot(target, e.middle(), tol) == Inclusion::Boundary)
}

fn remove_irrelevant_faces<F: Float>(poly: &mut Polygon<F>, faces: &[FaceId]) {
    for &face_id in faces {
        poly.delete_face(face_id);
    }
}

/// Clears record links to edges that no longer exist.
fn forget_removed<F>(poly: &Polygon<F>, points: &mut [IntersectionPoint<F>]) {
    for p in points {
        p.edge_before = p.edge_before.filter(|&e| poly.edges.contains_key(e));
        p.edge_after = p.edge_after.filter(|&e| poly.edges.contains_key(e));
    }
}

/// Moves every surviving edge of `wrk` into `res`.
///
/// Faces of `wrk` without crossings come across whole. Edges of the other
/// faces arrive faceless, and the records are rewritten to the new handles.
fn copy_wrk_to_res<F: Float>(
    res: &mut Polygon<F>,
    wrk: &Polygon<F>,
    points: &mut [IntersectionPoint<F>],
) -> Result<(), BooleanError> {
    let mut moved: SecondaryMap<EdgeId, EdgeId> = SecondaryMap::new();
    let mut whole = Vec::new();
    for (face_id, face) in wrk.faces.iter() {
        for id in wrk.ring(face.first)? {
            let mut edge = wrk.edges[id].clone();
            edge.face = None;
            moved.insert(id, res.insert_edge(edge));
        }
        if points.iter().all(|p| p.face != Some(face_id)) {
            whole.push(*face);
        }
    }

    for (old, &new) in moved.iter() {
        let src = &wrk.edges[old];
        let edge = &mut res.edges[new];
        if let Some(&next) = moved.get(src.next) {
            edge.next = next;
        }
        if let Some(&prev) = moved.get(src.prev) {
            edge.prev = prev;
        }
    }

    for face in whole {
        if let (Some(&first), Some(&last)) = (moved.get(face.first), moved.get(face.last)) {
            res.add_face_from_ring(first, last)?;
        }
    }

    for p in points.iter_mut() {
        p.edge_before = p.edge_before.and_then(|e| moved.get(e).copied());
        p.edge_after = p.edge_after.and_then(|e| moved.get(e).copied());
        p.face = None;
    }
    Ok(())
}

fn link<F>(poly: &mut Polygon<F>, before: EdgeId, after: EdgeId) {
    if let Some(e) = poly.edges.get_mut(before) {
        e.next = after;
    }
    if let Some(e) = poly.edges.get_mut(after) {
        e.prev = before;
    }
}

/// Where one operand lost the edge leaving a crossing, continues its
/// boundary with the other operand's edge leaving the same crossing.
fn link_across<F>(
    poly: &mut Polygon<F>,
    a: &mut [IntersectionPoint<F>],
    b: &mut [IntersectionPoint<F>],
    i: usize,
) {
    if let ((Some(before), None), (None, Some(after))) =
        ((a[i].edge_before, a[i].edge_after), (b[i].edge_before, b[i].edge_after))
    {
        link(poly, before, after);
        a[i].edge_after = Some(after);
        b[i].edge_before = Some(before);
    }
}

/// Fallback for touching points: continues with an edge of the same
/// operand leaving another record at the same place.
fn link_within<F: Float>(
    poly: &mut Polygon<F>,
    points: &mut [IntersectionPoint<F>],
    sorted: &[usize],
    i: usize,
    tol: Tolerance<F>,
) {
    let (Some(before), None) = (points[i].edge_before, points[i].edge_after) else {
        return;
    };
    let found = sorted.iter().find_map(|&k| {
        let p = &points[k];
        match (p.edge_before, p.edge_after) {
            (None, Some(after)) if k != i && tol.points_eq(p.pt, points[i].pt) => Some((k, after)),
            _ => None,
        }
    });
    if let Some((k, after)) = found {
        link(poly, before, after);
        points[i].edge_after = Some(after);
        points[k].edge_before = Some(before);
    }
}

fn swap_links<F: Float>(res: &mut Polygon<F>, ix: &mut Intersections<F>, tol: Tolerance<F>) {
    for i in 0..ix.points1.len() {
        link_across(res, &mut ix.points1, &mut ix.points2, i);
        link_across(res, &mut ix.points2, &mut ix.points1, i);
        link_within(res, &mut ix.points1, &ix.sorted1, i, tol);
        link_within(res, &mut ix.points2, &ix.sorted2, i, tol);
    }
}

/// Forgets the faces that crossings ran through. Their edges stay for
/// rebuilding.
fn remove_old_faces<F: Float>(res: &mut Polygon<F>, points: &mut [IntersectionPoint<F>]) {
    for p in points {
        if let Some(face_id) = p.face.take() {
            res.detach_face(face_id);
        }
        for id in [p.edge_before, p.edge_after].into_iter().flatten() {
            if let Some(edge) = res.edges.get_mut(id) {
                edge.face = None;
            }
        }
    }
}

/// Walks a new face from every record whose edges have none yet, then
/// marks each record of either list that the new face passes through.
fn restore_faces<F: Float>(
    res: &mut Polygon<F>,
    points: &mut [IntersectionPoint<F>],
    partners: &mut [IntersectionPoint<F>],
) -> Result<(), BooleanError> {
    for i in 0..points.len() {
        let (Some(before), Some(after)) = (points[i].edge_before, points[i].edge_after) else {
            continue;
        };
        if points[i].face.is_some() || res.has_live_face(before) || res.has_live_face(after) {
            continue;
        }
        let face_id = res.add_face_from_ring(after, before)?;
        trace!("restored face {:?}", face_id);

        for p in points.iter_mut().chain(partners.iter_mut()) {
            let on_face = |e: Option<EdgeId>| e.and_then(|e| res.edges.get(e)).and_then(|e| e.face) == Some(face_id);
            if on_face(p.edge_before) && on_face(p.edge_after) {
                p.face = Some(face_id);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::Aabb2;
    use crate::polygon::FaceOrientation;
    use crate::primitives::Circle2;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn tol() -> Tolerance<f64> {
        Tolerance::new(1e-6)
    }

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon<f64> {
        Polygon::from_box(Aabb2::from_coords(x0, y0, x1, y1))
    }

    fn l_shape() -> Polygon<f64> {
        Polygon::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 4.0),
            Point2::new(4.0, 4.0),
            Point2::new(4.0, 10.0),
            Point2::new(0.0, 10.0),
        ])
    }

    #[test]
    fn test_union_overlapping_squares() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(5.0, 5.0, 15.0, 15.0);
        let u = unify(&a, &b, tol()).unwrap();
        assert_eq!(u.num_faces(), 1);
        assert_eq!(u.num_edges(), 8);
        assert_relative_eq!(u.area(), 175.0, epsilon = 1e-9);
        assert_relative_eq!(u.perimeter(), 60.0, epsilon = 1e-9);
        assert!(u.is_valid(tol()));
        // Operands are left alone
        assert_eq!(a.num_edges(), 4);
        assert_eq!(b.num_edges(), 4);
    }

    #[test]
    fn test_union_is_commutative() {
        let pairs = [
            (rect(0.0, 0.0, 10.0, 10.0), rect(5.0, 5.0, 15.0, 15.0)),
            (l_shape(), rect(2.0, 2.0, 8.0, 8.0)),
            (rect(0.0, 0.0, 10.0, 10.0), Polygon::from_circle(Circle2::from_coords(10.0, 5.0, 3.0))),
        ];
        for (a, b) in &pairs {
            let ab = unify(a, b, tol()).unwrap();
            let ba = unify(b, a, tol()).unwrap();
            assert_relative_eq!(ab.area(), ba.area(), epsilon = 1e-9);
            assert_relative_eq!(ab.perimeter(), ba.perimeter(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_union_area_identity() {
        let pairs = [
            (rect(0.0, 0.0, 10.0, 10.0), rect(5.0, 5.0, 15.0, 15.0)),
            (l_shape(), rect(2.0, 2.0, 8.0, 8.0)),
            (rect(0.0, 0.0, 10.0, 10.0), Polygon::from_circle(Circle2::from_coords(10.0, 5.0, 3.0))),
        ];
        for (a, b) in &pairs {
            let u = unify(a, b, tol()).unwrap();
            let i = intersect(a, b, tol()).unwrap();
            assert_relative_eq!(u.area(), a.area() + b.area() - i.area(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_concave_operand() {
        let a = l_shape();
        let b = rect(2.0, 2.0, 8.0, 8.0);
        assert_relative_eq!(intersect(&a, &b, tol()).unwrap().area(), 20.0, epsilon = 1e-9);
        assert_relative_eq!(unify(&a, &b, tol()).unwrap().area(), 80.0, epsilon = 1e-9);
        assert_relative_eq!(subtract(&a, &b, tol()).unwrap().area(), 44.0, epsilon = 1e-9);
        assert_relative_eq!(subtract(&b, &a, tol()).unwrap().area(), 16.0, epsilon = 1e-9);
    }

    #[test]
    fn test_square_and_circle() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = Polygon::from_circle(Circle2::from_coords(10.0, 5.0, 3.0));

        let u = unify(&a, &b, tol()).unwrap();
        assert_eq!(u.num_faces(), 1);
        assert_eq!(u.num_edges(), 6);
        assert_relative_eq!(u.area(), 100.0 + 4.5 * PI, epsilon = 1e-9);

        let i = intersect(&a, &b, tol()).unwrap();
        assert_eq!(i.num_faces(), 1);
        assert_eq!(i.num_edges(), 3);
        assert_relative_eq!(i.area(), 4.5 * PI, epsilon = 1e-9);
    }

    #[test]
    fn test_self_operations() {
        let a = l_shape();
        let i = intersect(&a, &a, tol()).unwrap();
        assert_eq!(i.num_faces(), 1);
        assert_relative_eq!(i.area(), a.area(), epsilon = 1e-9);

        let d = subtract(&a, &a, tol()).unwrap();
        assert!(d.is_empty());
        assert_eq!(d.num_faces(), 0);
    }

    #[test]
    fn test_disjoint_operands() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(20.0, 0.0, 30.0, 10.0);

        let u = unify(&a, &b, tol()).unwrap();
        assert_eq!(u.num_faces(), a.num_faces() + b.num_faces());
        assert_relative_eq!(u.area(), 200.0, epsilon = 1e-9);

        let d = subtract(&a, &b, tol()).unwrap();
        assert_eq!(d.num_faces(), 1);
        assert_eq!(d.num_edges(), 4);
        assert_relative_eq!(d.area(), 100.0, epsilon = 1e-9);

        assert!(intersect(&a, &b, tol()).unwrap().is_empty());
    }

    #[test]
    fn test_containment() {
        let a = rect(0.0, 0.0, 50.0, 30.0);
        let b = rect(-100.0, -50.0, 200.0, 100.0);

        let u = unify(&a, &b, tol()).unwrap();
        assert_eq!(u.num_faces(), 1);
        assert_eq!(u.num_edges(), 4);
        assert_relative_eq!(u.area(), b.area(), epsilon = 1e-9);
        assert_eq!(u.bounding_box(), b.bounding_box());

        let i = intersect(&a, &b, tol()).unwrap();
        assert_relative_eq!(i.area(), a.area(), epsilon = 1e-9);
        assert!(subtract(&a, &b, tol()).unwrap().is_empty());
    }

    #[test]
    fn test_subtract_makes_hole() {
        let a = rect(0.0, 0.0, 100.0, 100.0);
        let b = rect(10.0, 10.0, 90.0, 90.0);
        let d = subtract(&a, &b, tol()).unwrap();

        assert_eq!(d.num_faces(), 2);
        assert_eq!(d.num_edges(), 8);
        assert_relative_eq!(d.area(), 3600.0, epsilon = 1e-9);

        let mut orientations: Vec<_> = d.faces().map(|f| (f.area() as i64, f.orientation(tol()))).collect();
        orientations.sort_by_key(|&(area, _)| area);
        assert_eq!(orientations[0], (6400, FaceOrientation::Clockwise));
        assert_eq!(orientations[1], (10000, FaceOrientation::CounterClockwise));
    }

    #[test]
    fn test_union_along_shared_boundary() {
        let a = rect(0.0, 0.0, 50.0, 30.0);
        let b = rect(25.0, 0.0, 50.0, 15.0);
        let u = unify(&a, &b, tol()).unwrap();
        assert_eq!(u.num_faces(), 1);
        assert_eq!(u.num_edges(), 6);
        assert_relative_eq!(u.area(), 1500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_clips() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(5.0, 5.0, 15.0, 15.0);
        let length = |shapes: &[EdgeShape<f64>]| shapes.iter().map(|s| s.length()).sum::<f64>();

        let (inner_a, inner_b) = inner_clip(&a, &b, tol()).unwrap();
        assert_eq!(inner_a.len(), 2);
        assert_eq!(inner_b.len(), 2);
        assert_relative_eq!(length(&inner_a), 10.0, epsilon = 1e-9);
        assert_relative_eq!(length(&inner_b), 10.0, epsilon = 1e-9);

        let outer = outer_clip(&a, &b, tol()).unwrap();
        assert_eq!(outer.len(), 4);
        assert_relative_eq!(length(&outer), 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_calculate_intersections() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(5.0, 5.0, 15.0, 15.0);
        let (pa, pb) = calculate_intersections(&a, &b, tol());
        assert_eq!(pa, vec![Point2::new(10.0, 5.0), Point2::new(5.0, 10.0)]);
        assert_eq!(pb, vec![Point2::new(10.0, 5.0), Point2::new(5.0, 10.0)]);

        let (pa, _) = calculate_intersections(&a, &a, tol());
        assert_eq!(pa.len(), 4);
    }

    #[test]
    fn test_prepared_intersections_are_distinct() {
        let diamond = Polygon::from_points(&[
            Point2::new(5.0, 0.0),
            Point2::new(10.0, 5.0),
            Point2::new(5.0, 10.0),
            Point2::new(0.0, 5.0),
        ]);
        let pairs = [
            (rect(0.0, 0.0, 10.0, 10.0), diamond, Some(4)),
            (rect(0.0, 0.0, 10.0, 10.0), rect(0.0, 0.0, 10.0, 10.0), Some(4)),
            (l_shape(), rect(4.0, 4.0, 10.0, 10.0), None),
        ];
        for (a, b, expected) in &pairs {
            let (mut res, mut wrk) = (a.clone(), b.clone());
            let mut ix = prepare_intersections(&mut res, &mut wrk, tol());
            if let Some(n) = expected {
                assert_eq!(ix.len(), *n);
            }

            // Another split and dedup pass finds nothing left to do
            let (records, edges) = (ix.len(), (res.num_edges(), wrk.num_edges()));
            split_edges(&mut res, &mut ix.points1, &ix.sorted1, tol());
            split_edges(&mut wrk, &mut ix.points2, &ix.sorted2, tol());
            assert!(!ix.remove_duplicates(tol()));
            assert_eq!(ix.len(), records);
            assert_eq!((res.num_edges(), wrk.num_edges()), edges);
        }
    }

    #[test]
    fn test_multiple_faces() {
        let a = Polygon::from_faces(&[
            Aabb2::from_coords(0.0, 0.0, 10.0, 10.0).corners(),
            Aabb2::from_coords(40.0, 0.0, 50.0, 10.0).corners(),
        ]);
        let b = rect(5.0, 5.0, 15.0, 15.0);
        let u = unify(&a, &b, tol()).unwrap();
        assert_eq!(u.num_faces(), 2);
        assert_relative_eq!(u.area(), 275.0, epsilon = 1e-9);

        let i = intersect(&a, &b, tol()).unwrap();
        assert_eq!(i.num_faces(), 1);
        assert_relative_eq!(i.area(), 25.0, epsilon = 1e-9);
    }

    #[test]
    fn test_near_coincident_edges() {
        // b's left edge sits 1e-7 inside a's right edge, well within tolerance
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(10.0 - 1e-7, 2.0, 20.0, 8.0);

        let u = unify(&a, &b, tol()).unwrap();
        assert_eq!(u.num_faces(), 1);
        assert_relative_eq!(u.area(), 160.0, epsilon = 1e-4);

        let d = subtract(&a, &b, tol()).unwrap();
        assert_eq!(d.num_faces(), 1);
        assert_relative_eq!(d.area(), 100.0, epsilon = 1e-4);

        let i = intersect(&a, &b, tol()).unwrap();
        assert!(i.area() < 1e-4);
    }

    #[test]
    fn test_circle_self_operations() {
        let c = Polygon::from_circle(Circle2::from_coords(0.0, 0.0, 5.0));

        let u = unify(&c, &c, tol()).unwrap();
        assert_eq!(u.num_faces(), 1);
        assert_eq!(u.num_edges(), 1);
        assert_relative_eq!(u.area(), 25.0 * PI, epsilon = 1e-9);

        let i = intersect(&c, &c, tol()).unwrap();
        assert_eq!(i.num_faces(), 1);
        assert_relative_eq!(i.area(), 25.0 * PI, epsilon = 1e-9);

        let d = subtract(&c, &c, tol()).unwrap();
        assert!(d.is_empty());
        assert_eq!(d.num_edges(), 0);
    }

    #[test]
    fn test_disc_filling_a_ring() {
        let mut ring = Polygon::from_circle(Circle2::from_coords(0.0, 0.0, 10.0));
        let disc = Polygon::from_circle(Circle2::from_coords(0.0, 0.0, 4.0));
        let hole: Vec<_> = disc.reversed().faces().flat_map(|f| f.shapes()).collect();
        ring.add_face_from_shapes(hole);
        assert_relative_eq!(ring.area(), 84.0 * PI, epsilon = 1e-9);

        let u = unify(&ring, &disc, tol()).unwrap();
        assert_eq!(u.num_faces(), 1);
        assert_relative_eq!(u.area(), 100.0 * PI, epsilon = 1e-9);

        let d = subtract(&ring, &disc, tol()).unwrap();
        assert_eq!(d.num_faces(), 2);
        assert_relative_eq!(d.area(), 84.0 * PI, epsilon = 1e-9);

        assert!(intersect(&ring, &disc, tol()).unwrap().is_empty());
    }

    #[test]
    fn test_offset_circles_area_identities() {
        let (r, d) = (5.0, 6.0);
        let a = Polygon::from_circle(Circle2::from_coords(0.0, 0.0, r));
        let b = Polygon::from_circle(Circle2::from_coords(d, 0.0, r));
        let lens = 2.0 * r * r * (d / (2.0 * r)).acos() - 0.5 * d * (4.0 * r * r - d * d).sqrt();

        let u = unify(&a, &b, tol()).unwrap();
        let i = intersect(&a, &b, tol()).unwrap();
        let ab = subtract(&a, &b, tol()).unwrap();
        let ba = subtract(&b, &a, tol()).unwrap();
        assert_relative_eq!(i.area(), lens, epsilon = 1e-9);
        assert_relative_eq!(u.area(), a.area() + b.area() - lens, epsilon = 1e-9);
        assert_relative_eq!(ab.area(), a.area() - lens, epsilon = 1e-9);
        // The union splits into a minus b, b minus a and their overlap
        assert_relative_eq!(u.area(), ab.area() + ba.area() + i.area(), epsilon = 1e-9);
        assert_eq!(u.num_faces(), 1);
        assert_eq!(i.num_faces(), 1);
    }
}
