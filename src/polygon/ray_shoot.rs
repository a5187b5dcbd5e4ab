//! Point-in-polygon classification by ray shooting.

use super::{EdgeId, Inclusion, Polygon};
use crate::bounds::Aabb2;
use crate::primitives::{EdgeShape, Point2, Segment2};
use crate::tolerance::Tolerance;
use num_traits::Float;
use std::cmp::Ordering;

struct Hit<F> {
    point: Point2<F>,
    edge: EdgeId,
}

/// Classifies `point` against `polygon`.
///
/// A horizontal ray is cast to the right and its crossings with the
/// polygon's edges are counted; an odd count means inside. Only edges whose
/// box reaches the ray's band are examined. A point within tolerance of an
/// edge is [`Inclusion::Boundary`].
///
/// Where the ray passes through a vertex, the crossing counts once if the
/// two edges meeting there leave on opposite sides of the ray and not at
/// all if they stay on one side. An arc grazed at its top or bottom does not
/// count.
///
/// # Example
///
/// ```
/// use planum::bounds::Aabb2;
/// use planum::polygon::{ray_shoot, Inclusion, Polygon};
/// use planum::{Point2, Tolerance};
///
/// let square = Polygon::from_box(Aabb2::from_coords(0.0, 0.0, 2.0, 2.0));
/// let tol = Tolerance::default();
/// assert_eq!(ray_shoot(&square, Point2::new(1.0, 1.0), tol), Inclusion::Inside);
/// assert_eq!(ray_shoot(&square, Point2::new(2.0, 1.0), tol), Inclusion::Boundary);
/// assert_eq!(ray_shoot(&square, Point2::new(3.0, 1.0), tol), Inclusion::Outside);
/// ```
pub fn ray_shoot<F: Float>(polygon: &Polygon<F>, point: Point2<F>, tol: Tolerance<F>) -> Inclusion {
    let Some(bounds) = polygon.bounding_box() else {
        return Inclusion::Outside;
    };
    if !bounds.inflate(tol.eps).contains_point(point) {
        return Inclusion::Outside;
    }

    let band = Aabb2::from_coords(
        point.x - tol.eps,
        point.y - tol.eps,
        F::infinity(),
        point.y + tol.eps,
    );
    let candidates = polygon.edge_set.search(&band);
    if candidates.is_empty() {
        return Inclusion::Outside;
    }

    let edges = &polygon.edges;
    if candidates
        .iter()
        .any(|&id| edges[id].shape.contains(point, tol))
    {
        return Inclusion::Boundary;
    }

    let far = bounds.max.x + bounds.width() + F::one();
    let ray = EdgeShape::Segment(Segment2::new(point, Point2::new(far, point.y)));

    let mut hits = Vec::new();
    for &id in &candidates {
        for p in edges[id].shape.intersect(&ray, tol) {
            if tol.points_eq(p, point) {
                return Inclusion::Boundary;
            }
            hits.push(Hit { point: p, edge: id });
        }
    }

    hits.sort_by(|a, b| {
        let (ea, eb) = (&edges[a.edge], &edges[b.edge]);
        a.point
            .x
            .partial_cmp(&b.point.x)
            .unwrap_or(Ordering::Equal)
            .then_with(|| ea.face.cmp(&eb.face))
            .then_with(|| ea.arc_length.partial_cmp(&eb.arc_length).unwrap_or(Ordering::Equal))
    });

    let above = |v: F| tol.gt(v, F::zero());
    let mut crossings = 0usize;
    for (i, hit) in hits.iter().enumerate() {
        let edge = &edges[hit.edge];
        let repeat_of = |neighbour: EdgeId| {
            i > 0 && tol.points_eq(hit.point, hits[i - 1].point) && hits[i - 1].edge == neighbour
        };

        if tol.points_eq(hit.point, edge.start()) {
            if repeat_of(edge.prev) {
                continue;
            }
            let Some(prev) = skip_degenerate(polygon, hit.edge, |e| edges[e].prev, tol) else {
                continue;
            };
            let incoming = edges[prev].shape.tangent_in_end();
            let outgoing = edge.shape.tangent_in_start();
            if above(incoming.y) != above(outgoing.y) {
                crossings += 1;
            }
        } else if tol.points_eq(hit.point, edge.end()) {
            if repeat_of(edge.next) {
                continue;
            }
            let Some(next) = skip_degenerate(polygon, hit.edge, |e| edges[e].next, tol) else {
                continue;
            };
            let outgoing = edges[next].shape.tangent_in_start();
            let incoming = edge.shape.tangent_in_end();
            if above(incoming.y) != above(outgoing.y) {
                crossings += 1;
            }
        } else if !edge.shape.is_arc() {
            crossings += 1;
        } else {
            let aabb = edge.bounding_box();
            if !(tol.eq(hit.point.y, aabb.min.y) || tol.eq(hit.point.y, aabb.max.y)) {
                crossings += 1;
            }
        }
    }

    if crossings % 2 == 1 {
        Inclusion::Inside
    } else {
        Inclusion::Outside
    }
}

/// Steps from `from` with `step` past zero-length edges. `None` if the
/// whole ring is degenerate.
fn skip_degenerate<F: Float>(
    polygon: &Polygon<F>,
    from: EdgeId,
    step: impl Fn(EdgeId) -> EdgeId,
    tol: Tolerance<F>,
) -> Option<EdgeId> {
    let mut cur = step(from);
    for _ in 0..polygon.edges.len() {
        let edge = polygon.edges.get(cur)?;
        if !tol.eq_zero(edge.length()) {
            return Some(cur);
        }
        cur = step(cur);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Circle2;

    fn tol() -> Tolerance<f64> {
        Tolerance::new(1e-6)
    }

    #[test]
    fn test_circle_inside_boundary_outside() {
        let c = Circle2::from_coords(3.0, -1.0, 2.0);
        let poly = Polygon::from_circle(c);
        for angle in [0.3f64, 1.7, 2.9, 4.4, 5.8] {
            let (s, co) = angle.sin_cos();
            let at = |r: f64| Point2::new(3.0 + r * co, -1.0 + r * s);
            assert_eq!(ray_shoot(&poly, at(1.5), tol()), Inclusion::Inside);
            assert_eq!(ray_shoot(&poly, at(2.0), tol()), Inclusion::Boundary);
            assert_eq!(ray_shoot(&poly, at(2.5), tol()), Inclusion::Outside);
        }
        // Ray through the seam of the full circle and past its right extreme
        assert_eq!(ray_shoot(&poly, Point2::new(2.0, -1.0), tol()), Inclusion::Inside);
        // Ray tangent to the top of the circle
        assert_eq!(ray_shoot(&poly, Point2::new(1.0, 1.0), tol()), Inclusion::Outside);
    }

    #[test]
    fn test_ray_through_vertices() {
        // Diamond: the ray from the centre leaves through the right vertex
        let diamond = Polygon::from_points(&[
            Point2::new(0.0, -2.0),
            Point2::new(2.0, 0.0),
            Point2::new(0.0, 2.0),
            Point2::new(-2.0, 0.0),
        ]);
        assert_eq!(ray_shoot(&diamond, Point2::new(0.0, 0.0), tol()), Inclusion::Inside);
        assert_eq!(ray_shoot(&diamond, Point2::new(-3.0, 0.0), tol()), Inclusion::Outside);
        assert_eq!(ray_shoot(&diamond, Point2::new(-1.9, 0.0), tol()), Inclusion::Inside);

        // A notch whose tip touches the ray must not flip parity
        let notched = Polygon::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(6.0, 10.0),
            Point2::new(5.0, 5.0),
            Point2::new(4.0, 10.0),
            Point2::new(0.0, 10.0),
        ]);
        assert_eq!(ray_shoot(&notched, Point2::new(2.0, 5.0), tol()), Inclusion::Inside);
        assert_eq!(ray_shoot(&notched, Point2::new(5.0, 7.0), tol()), Inclusion::Outside);
    }

    #[test]
    fn test_ray_along_horizontal_edge() {
        let step = Polygon::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 5.0),
            Point2::new(6.0, 5.0),
            Point2::new(6.0, 8.0),
            Point2::new(0.0, 8.0),
        ]);
        assert_eq!(ray_shoot(&step, Point2::new(2.0, 5.0), tol()), Inclusion::Inside);
        assert_eq!(ray_shoot(&step, Point2::new(8.0, 5.0), tol()), Inclusion::Boundary);
        assert_eq!(ray_shoot(&step, Point2::new(-1.0, 5.0), tol()), Inclusion::Outside);
    }

    #[test]
    fn test_holes_flip_parity() {
        let outer = Aabb2::from_coords(0.0, 0.0, 10.0, 10.0).corners();
        let mut hole = Aabb2::from_coords(3.0, 3.0, 7.0, 7.0).corners();
        hole.reverse();
        let poly = Polygon::from_faces(&[outer, hole]);
        assert_eq!(ray_shoot(&poly, Point2::new(1.0, 5.0), tol()), Inclusion::Inside);
        assert_eq!(ray_shoot(&poly, Point2::new(5.0, 5.0), tol()), Inclusion::Outside);
        assert_eq!(ray_shoot(&poly, Point2::new(3.0, 5.0), tol()), Inclusion::Boundary);
        assert_eq!(ray_shoot(&poly, Point2::new(8.0, 3.0), tol()), Inclusion::Inside);
    }
}
