//! Shortest distances between points, segments and arcs.
//!
//! Each function returns the distance together with the shortest segment,
//! which starts on the first argument and ends on the second.

use super::{intersect_arcs, intersect_segment_arc, intersect_segments, Arc2, Point2, Segment2};
use crate::tolerance::Tolerance;
use num_traits::Float;

fn shortest<F: Float>(candidates: impl IntoIterator<Item = (F, Segment2<F>)>) -> (F, Segment2<F>) {
    candidates
        .into_iter()
        .fold(None, |best: Option<(F, Segment2<F>)>, cand| match best {
            Some(b) if b.0 <= cand.0 => Some(b),
            _ => Some(cand),
        })
        .unwrap_or_else(|| {
            let origin = Point2::origin();
            (F::infinity(), Segment2::new(origin, origin))
        })
}

#[inline]
fn flip<F: Float>((d, s): (F, Segment2<F>)) -> (F, Segment2<F>) {
    (d, s.reversed())
}

/// Distance from a point to a segment.
pub fn point_to_segment<F: Float>(p: Point2<F>, s: &Segment2<F>) -> (F, Segment2<F>) {
    let (closest, _) = s.closest_point(p);
    (p.distance(closest), Segment2::new(p, closest))
}

/// Distance from a point to an arc.
pub fn point_to_arc<F: Float>(p: Point2<F>, arc: &Arc2<F>, tol: Tolerance<F>) -> (F, Segment2<F>) {
    let to_start = (p.distance(arc.start_point()), Segment2::new(p, arc.start_point()));
    let radial = match (p - arc.center).normalize() {
        Some(r) => r,
        // Every point of the arc is equally far from its center
        None => return to_start,
    };

    let on_circle = arc.center + radial * arc.radius;
    if arc.contains(on_circle, tol) {
        return (p.distance(on_circle), Segment2::new(p, on_circle));
    }
    shortest([
        to_start,
        (p.distance(arc.end_point()), Segment2::new(p, arc.end_point())),
    ])
}

pub fn segment_to_segment<F: Float>(
    a: &Segment2<F>,
    b: &Segment2<F>,
    tol: Tolerance<F>,
) -> (F, Segment2<F>) {
    if let Some(&p) = intersect_segments(a, b, tol).first() {
        return (F::zero(), Segment2::new(p, p));
    }
    shortest([
        point_to_segment(a.start, b),
        point_to_segment(a.end, b),
        flip(point_to_segment(b.start, a)),
        flip(point_to_segment(b.end, a)),
    ])
}

pub fn segment_to_arc<F: Float>(
    s: &Segment2<F>,
    arc: &Arc2<F>,
    tol: Tolerance<F>,
) -> (F, Segment2<F>) {
    if let Some(&p) = intersect_segment_arc(s, arc, tol).first() {
        return (F::zero(), Segment2::new(p, p));
    }
    let (foot, _) = s.closest_point(arc.center);
    shortest([
        point_to_arc(foot, arc, tol),
        point_to_arc(s.start, arc, tol),
        point_to_arc(s.end, arc, tol),
        flip(point_to_segment(arc.start_point(), s)),
        flip(point_to_segment(arc.end_point(), s)),
    ])
}

pub fn arc_to_arc<F: Float>(a: &Arc2<F>, b: &Arc2<F>, tol: Tolerance<F>) -> (F, Segment2<F>) {
    if let Some(&p) = intersect_arcs(a, b, tol).first() {
        return (F::zero(), Segment2::new(p, p));
    }

    let mut candidates = vec![
        point_to_arc(a.start_point(), b, tol),
        point_to_arc(a.end_point(), b, tol),
        flip(point_to_arc(b.start_point(), a, tol)),
        flip(point_to_arc(b.end_point(), a, tol)),
    ];

    // Extreme points of each circle along the line of centers
    if let Some(v) = (b.center - a.center).normalize() {
        for p in [a.center + v * a.radius, a.center - v * a.radius] {
            if a.contains(p, tol) {
                candidates.push(point_to_arc(p, b, tol));
            }
        }
        for q in [b.center + v * b.radius, b.center - v * b.radius] {
            if b.contains(q, tol) {
                candidates.push(flip(point_to_arc(q, a, tol)));
            }
        }
    }
    shortest(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn tol() -> Tolerance<f64> {
        Tolerance::new(1e-6)
    }

    #[test]
    fn test_point_to_arc() {
        let arc: Arc2<f64> = Arc2::new(Point2::new(0.0, 0.0), 1.0, 0.0, PI);
        let (d, seg) = point_to_arc(Point2::new(0.0, 3.0), &arc, tol());
        assert_relative_eq!(d, 2.0, epsilon = 1e-12);
        assert_relative_eq!(seg.end.y, 1.0, epsilon = 1e-12);

        // Projection misses the arc, nearest endpoint wins
        let (d, seg) = point_to_arc(Point2::new(2.0, -1.0), &arc, tol());
        assert_relative_eq!(d, 2.0f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(seg.end.x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_segment_to_segment() {
        let a: Segment2<f64> = Segment2::from_coords(0.0, 0.0, 4.0, 0.0);
        let b = Segment2::from_coords(2.0, 1.0, 2.0, 3.0);
        let (d, seg) = segment_to_segment(&a, &b, tol());
        assert_relative_eq!(d, 1.0, epsilon = 1e-12);
        assert_eq!(seg.start, Point2::new(2.0, 0.0));
        assert_eq!(seg.end, Point2::new(2.0, 1.0));

        let c = Segment2::from_coords(2.0, -1.0, 2.0, 3.0);
        assert_eq!(segment_to_segment(&a, &c, tol()).0, 0.0);
    }

    #[test]
    fn test_segment_to_arc() {
        let arc: Arc2<f64> = Arc2::new(Point2::new(0.0, 0.0), 1.0, 0.0, PI);
        let s = Segment2::from_coords(-5.0, 2.0, 5.0, 2.0);
        let (d, seg) = segment_to_arc(&s, &arc, tol());
        assert_relative_eq!(d, 1.0, epsilon = 1e-12);
        assert_relative_eq!(seg.start.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(seg.end.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_arc_to_arc() {
        let a: Arc2<f64> = Arc2::new(Point2::new(0.0, 0.0), 1.0, -FRAC_PI_2, FRAC_PI_2);
        let b = Arc2::new(Point2::new(4.0, 0.0), 1.0, FRAC_PI_2, 3.0 * FRAC_PI_2);
        let (d, seg) = arc_to_arc(&a, &b, tol());
        assert_relative_eq!(d, 2.0, epsilon = 1e-12);
        assert_relative_eq!(seg.start.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(seg.end.x, 3.0, epsilon = 1e-12);
    }
}
