//! Repair of chain labels that disagree at their two ends.
//!
//! After labelling, a chain of the first polygon between two consecutive
//! intersections should carry one label. Where the edges at its ends
//! disagree, either one end is a sliver wrongly taken for boundary, or the
//! chain hugs the other polygon's boundary, or a crossing was missed by the
//! intersection arithmetic and has to be put back.

use super::intersections::{label, push_point, Intersections, VertexKind};
use super::{EdgeId, Inclusion, Polygon};
use crate::error::BooleanError;
use crate::primitives::Point2;
use crate::tolerance::Tolerance;
use log::{debug, trace, warn};
use num_traits::Float;

/// Repeats conflict repair until a round changes no intersection.
///
/// Rounds are capped by the size of the input; running out is reported as
/// an unresolved conflict.
pub(crate) fn resolve_conflicts<F: Float>(
    poly1: &mut Polygon<F>,
    poly2: &mut Polygon<F>,
    ix: &mut Intersections<F>,
    tol: Tolerance<F>,
) -> Result<(), BooleanError> {
    let cap = 2 * (poly1.num_edges() + poly2.num_edges()) + ix.len() + 8;
    for round in 1..=cap {
        if !fix_boundary_conflicts(poly1, poly2, ix, tol)? {
            debug!("chain labels settled after {} round(s)", round);
            return Ok(());
        }
    }
    let at = ix.points1.first().map_or(Point2::origin(), |p| p.pt);
    warn!("conflict repair did not settle within {} rounds", cap);
    Err(BooleanError::conflict_at(at))
}

/// One pass over the chains of `poly1`. Returns `true` if a missed crossing
/// was inserted, after which the chains must be walked again.
pub(crate) fn fix_boundary_conflicts<F: Float>(
    poly1: &mut Polygon<F>,
    poly2: &mut Polygon<F>,
    ix: &mut Intersections<F>,
    tol: Tolerance<F>,
) -> Result<bool, BooleanError> {
    use Inclusion::*;

    for chain in ix.chains(tol) {
        let (Some(from), Some(to)) = (ix.points1[chain.from].edge_after, ix.points1[chain.to].edge_before) else {
            continue;
        };
        if !poly1.edges.contains_key(from) || !poly1.edges.contains_key(to) {
            continue;
        }
        let (from_bv, to_bv) = (label(poly1, Some(from)), label(poly1, Some(to)));

        // A boundary end next to a labelled one is a sliver
        if from_bv == Some(Boundary) && to_bv != Some(Boundary) {
            poly1.edges[from].bv = to_bv;
            continue;
        }
        if from_bv != Some(Boundary) && to_bv == Some(Boundary) {
            poly1.edges[to].bv = from_bv;
            continue;
        }

        let hugging = from_bv == Some(Boundary) && to_bv == Some(Boundary) && from != to;
        let flipped = matches!(
            (from_bv, to_bv),
            (Some(Inside), Some(Outside)) | (Some(Outside), Some(Inside))
        );
        if !hugging && !flipped {
            continue;
        }

        let middle = interior_of(poly1, from, to);
        for &id in &middle {
            let edge = &mut poly1.edges[id];
            edge.bv_start = None;
            edge.bv_end = None;
            edge.bv = None;
            edge.set_inclusion(poly2, tol);
        }

        if hugging {
            let mut agreed = None;
            for &id in &middle {
                let bv = poly1.edges[id].bv;
                if bv == Some(Boundary) {
                    continue;
                }
                match agreed {
                    None => agreed = bv,
                    Some(_) if agreed != bv => {
                        warn!("boundary chain {:?}..{:?} has mixed interior labels", from, to);
                        return Err(BooleanError::conflict_at(ix.points1[chain.from].pt));
                    }
                    Some(_) => {}
                }
            }
            if agreed.is_some() {
                trace!("boundary chain {:?}..{:?} relabelled {:?}", from, to, agreed);
                poly1.edges[from].bv = agreed;
                poly1.edges[to].bv = agreed;
            }
            continue;
        }

        if restore_missed_crossing(poly1, poly2, ix, from, to, tol)? {
            return Ok(true);
        }
        warn!("no crossing found on chain {:?}..{:?}", from, to);
        return Err(BooleanError::conflict_at(ix.points1[chain.from].pt));
    }
    Ok(false)
}

/// Edges strictly between `from` and `to` along `next`.
fn interior_of<F>(poly: &Polygon<F>, from: EdgeId, to: EdgeId) -> Vec<EdgeId> {
    let mut ids = Vec::new();
    let mut cur = poly.edges[from].next;
    for _ in 0..poly.edges.len() {
        if cur == to {
            break;
        }
        let Some(edge) = poly.edges.get(cur) else {
            break;
        };
        ids.push(cur);
        cur = edge.next;
    }
    ids
}

/// Looks along the chain for the edge whose ends carry the chain's two
/// labels. If that edge comes within the snap distance of `poly2`, the
/// closest point becomes a new intersection on both polygons.
fn restore_missed_crossing<F: Float>(
    poly1: &mut Polygon<F>,
    poly2: &mut Polygon<F>,
    ix: &mut Intersections<F>,
    from: EdgeId,
    to: EdgeId,
    tol: Tolerance<F>,
) -> Result<bool, BooleanError> {
    let (from_bv, to_bv) = (poly1.edges[from].bv, poly1.edges[to].bv);
    let mut cur = from;
    for _ in 0..poly1.edges.len() {
        if cur == to {
            break;
        }
        let Some(edge) = poly1.edges.get(cur) else {
            break;
        };
        let next = edge.next;
        if edge.bv_start == from_bv && edge.bv_end == to_bv {
            if let Some((pt, nearest)) = closest_approach(poly1, cur, poly2, tol) {
                debug!("restoring missed crossing on edge {:?} near edge {:?}", cur, nearest);
                insert_crossing(poly1, poly2, ix, cur, pt, Some(nearest), tol)?;
                ix.sort();
                return Ok(true);
            }
        }
        cur = next;
    }
    Ok(false)
}

/// Point of `edge_id` nearest to `poly2`, with the `poly2` edge it is nearest
/// to, if they are closer than the snap distance.
fn closest_approach<F: Float>(
    poly1: &Polygon<F>,
    edge_id: EdgeId,
    poly2: &Polygon<F>,
    tol: Tolerance<F>,
) -> Option<(Point2<F>, EdgeId)> {
    let snap = tol.snap_distance();
    let shape = poly1.edges[edge_id].shape;
    let query = shape.bounding_box().inflate(snap);
    let mut best: Option<(F, Point2<F>, EdgeId)> = None;
    for id in poly2.edge_set.search(&query) {
        let (dist, link) = shape.distance_to(&poly2.edges[id].shape, tol);
        if best.map_or(true, |(d, _, _)| dist < d) {
            best = Some((dist, link.start, id));
        }
    }
    best.filter(|&(d, _, _)| d < snap).map(|(_, pt, id)| (pt, id))
}

/// Adds a crossing at `pt` on `edge1` of `poly1` and on the matching edge of
/// `poly2`, splitting both where the point is interior, and relabels the
/// edges that now end there.
pub(crate) fn insert_crossing<F: Float>(
    poly1: &mut Polygon<F>,
    poly2: &mut Polygon<F>,
    ix: &mut Intersections<F>,
    edge1: EdgeId,
    pt: Point2<F>,
    nearest: Option<EdgeId>,
    tol: Tolerance<F>,
) -> Result<(), BooleanError> {
    push_point(poly1, edge1, pt, &mut ix.points1, tol);
    let i = ix.points1.len() - 1;
    match ix.points1[i].vertex {
        VertexKind::Start => {
            let edge = &mut poly1.edges[edge1];
            ix.points1[i].edge_before = Some(edge.prev);
            ix.points1[i].edge_after = Some(edge1);
            edge.bv_start = Some(Inclusion::Boundary);
            edge.bv = None;
            edge.set_inclusion(poly2, tol);
        }
        VertexKind::End => {
            let edge = &mut poly1.edges[edge1];
            ix.points1[i].edge_after = Some(edge.next);
            edge.bv_end = Some(Inclusion::Boundary);
            edge.bv = None;
            edge.set_inclusion(poly2, tol);
        }
        VertexKind::NotVertex => {
            let start_label = poly1.edges[edge1].bv_start;
            let head = split_for_record(poly1, &mut ix.points1, i, edge1, tol);
            let h = &mut poly1.edges[head];
            h.bv_start = start_label;
            h.bv_end = Some(Inclusion::Boundary);
            h.bv = None;
            h.set_inclusion(poly2, tol);
            let tail = &mut poly1.edges[edge1];
            tail.bv_start = Some(Inclusion::Boundary);
            tail.bv = None;
            tail.set_inclusion(poly2, tol);
        }
    }

    let Some(edge2) = poly2.find_edge_by_point(pt, tol).or(nearest) else {
        warn!(
            "restored crossing at ({:?}, {:?}) is not on the other boundary",
            pt.x.to_f64(),
            pt.y.to_f64()
        );
        return Err(BooleanError::conflict_at(pt));
    };
    push_point(poly2, edge2, pt, &mut ix.points2, tol);
    let j = ix.points2.len() - 1;
    match ix.points2[j].vertex {
        VertexKind::Start => {
            ix.points2[j].edge_before = Some(poly2.edges[edge2].prev);
            ix.points2[j].edge_after = Some(edge2);
        }
        VertexKind::End => {
            ix.points2[j].edge_after = Some(poly2.edges[edge2].next);
        }
        VertexKind::NotVertex => {
            let head = split_for_record(poly2, &mut ix.points2, j, edge2, tol);
            let h = &mut poly2.edges[head];
            h.bv_start = None;
            h.bv_end = Some(Inclusion::Boundary);
            h.bv = None;
            h.set_inclusion(poly1, tol);
            let tail = &mut poly2.edges[edge2];
            tail.bv_start = Some(Inclusion::Boundary);
            tail.bv = None;
            tail.set_inclusion(poly1, tol);
        }
    }
    Ok(())
}

/// Splits `edge_id` at record `i`'s point and points the record at the two
/// pieces. Records that left the old edge's start now leave the new head.
fn split_for_record<F: Float>(
    poly: &mut Polygon<F>,
    points: &mut [super::IntersectionPoint<F>],
    i: usize,
    edge_id: EdgeId,
    tol: Tolerance<F>,
) -> EdgeId {
    let head = poly.add_vertex(points[i].pt, edge_id, tol);
    for (k, p) in points.iter_mut().enumerate() {
        if k != i && p.edge_after == Some(edge_id) {
            p.edge_after = Some(head);
        }
    }
    points[i].edge_before = Some(head);
    points[i].edge_after = Some(edge_id);
    head
}
