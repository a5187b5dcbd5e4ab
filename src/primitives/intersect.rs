//! Intersections between segments and arcs.
//!
//! Every function returns the distinct intersection points of two edge
//! shapes. Overlapping collinear segments and arcs on a shared circle report
//! the endpoints of their common part.
//!
//! # Example
//!
//! ```
//! use planum::primitives::{intersect_segments, Segment2};
//! use planum::Tolerance;
//!
//! let a = Segment2::from_coords(0.0_f64, 0.0, 10.0, 10.0);
//! let b = Segment2::from_coords(0.0, 10.0, 10.0, 0.0);
//! let points = intersect_segments(&a, &b, Tolerance::default());
//! assert_eq!(points.len(), 1);
//! assert!((points[0].x - 5.0).abs() < 1e-9);
//! ```

use super::{Arc2, Circle2, Point2, Segment2};
use crate::tolerance::Tolerance;
use num_traits::Float;

fn push_unique<F: Float>(points: &mut Vec<Point2<F>>, p: Point2<F>, tol: Tolerance<F>) {
    if !points.iter().any(|q| tol.points_eq(*q, p)) {
        points.push(p);
    }
}

#[inline]
fn in_segment_box<F: Float>(p: Point2<F>, s: &Segment2<F>, tol: Tolerance<F>) -> bool {
    s.bounding_box().inflate(tol.eps).contains_point(p)
}

/// Intersects two segments.
pub fn intersect_segments<F: Float>(
    a: &Segment2<F>,
    b: &Segment2<F>,
    tol: Tolerance<F>,
) -> Vec<Point2<F>> {
    let mut points = Vec::new();
    if !a.bounding_box().inflate(tol.eps).intersects(b.bounding_box()) {
        return points;
    }

    if tol.points_eq(a.start, a.end) {
        if b.contains(a.start, tol) {
            points.push(a.start);
        }
        return points;
    }
    if tol.points_eq(b.start, b.end) {
        if a.contains(b.start, tol) {
            points.push(b.start);
        }
        return points;
    }

    let d1 = a.direction();
    let d2 = b.direction();
    let (n1, n2) = match (d1.normalize(), d2.normalize()) {
        (Some(n1), Some(n2)) => (n1, n2),
        _ => return points,
    };

    if tol.eq_zero(n1.cross(n2)) {
        // Parallel: either on one line or never meeting
        if !tol.eq_zero(n1.cross(b.start - a.start)) {
            return points;
        }
        if b.contains(a.start, tol) {
            push_unique(&mut points, a.start, tol);
        }
        if b.contains(a.end, tol) {
            push_unique(&mut points, a.end, tol);
        }
        if a.contains(b.start, tol) {
            push_unique(&mut points, b.start, tol);
        }
        if a.contains(b.end, tol) {
            push_unique(&mut points, b.end, tol);
        }
        return points;
    }

    let t = (b.start - a.start).cross(d2) / d1.cross(d2);
    let p = a.start + d1 * t;
    if in_segment_box(p, a, tol) && in_segment_box(p, b, tol) {
        points.push(p);
    }
    points
}

/// Intersects a segment with an arc.
pub fn intersect_segment_arc<F: Float>(
    s: &Segment2<F>,
    arc: &Arc2<F>,
    tol: Tolerance<F>,
) -> Vec<Point2<F>> {
    let mut points = Vec::new();
    if !s.bounding_box().inflate(tol.eps).intersects(arc.bounding_box()) {
        return points;
    }

    if tol.points_eq(s.start, s.end) {
        if arc.contains(s.start, tol) {
            points.push(s.start);
        }
        return points;
    }

    let circle = Circle2::new(arc.center, arc.radius);
    for p in circle.intersect_line(s.start, s.direction(), tol) {
        if s.contains(p, tol) && arc.contains(p, tol) {
            push_unique(&mut points, p, tol);
        }
    }
    points
}

/// Intersects two arcs.
pub fn intersect_arcs<F: Float>(a: &Arc2<F>, b: &Arc2<F>, tol: Tolerance<F>) -> Vec<Point2<F>> {
    let mut points = Vec::new();
    if !a.bounding_box().inflate(tol.eps).intersects(b.bounding_box()) {
        return points;
    }

    if tol.points_eq(a.center, b.center) && tol.eq(a.radius, b.radius) {
        for p in [a.start_point(), a.end_point()] {
            if b.contains(p, tol) {
                push_unique(&mut points, p, tol);
            }
        }
        for p in [b.start_point(), b.end_point()] {
            if a.contains(p, tol) {
                push_unique(&mut points, p, tol);
            }
        }
        return points;
    }

    let c1 = Circle2::new(a.center, a.radius);
    let c2 = Circle2::new(b.center, b.radius);
    for p in c1.intersect_circle(&c2, tol) {
        if a.contains(p, tol) && b.contains(p, tol) {
            push_unique(&mut points, p, tol);
        }
    }
    points
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
    fn test_segments_crossing() {
        let a: Segment2<f64> = Segment2::from_coords(0.0, 0.0, 4.0, 0.0);
        let b = Segment2::from_coords(2.0, -1.0, 2.0, 1.0);
        let pts = intersect_segments(&a, &b, tol());
        assert_eq!(pts.len(), 1);
        assert_relative_eq!(pts[0].x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(pts[0].y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_segments_touching_at_endpoint() {
        let a: Segment2<f64> = Segment2::from_coords(0.0, 0.0, 4.0, 0.0);
        let b = Segment2::from_coords(4.0, 0.0, 4.0, 3.0);
        let pts = intersect_segments(&a, &b, tol());
        assert_eq!(pts.len(), 1);
        assert_relative_eq!(pts[0].x, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_segments_disjoint_and_parallel() {
        let a: Segment2<f64> = Segment2::from_coords(0.0, 0.0, 4.0, 0.0);
        assert!(intersect_segments(&a, &Segment2::from_coords(5.0, -1.0, 5.0, 1.0), tol()).is_empty());
        assert!(intersect_segments(&a, &Segment2::from_coords(0.0, 1.0, 4.0, 1.0), tol()).is_empty());
    }

    #[test]
    fn test_segments_collinear_overlap() {
        let a: Segment2<f64> = Segment2::from_coords(0.0, 0.0, 4.0, 0.0);
        let b = Segment2::from_coords(6.0, 0.0, 2.0, 0.0);
        let pts = intersect_segments(&a, &b, tol());
        assert_eq!(pts, vec![Point2::new(4.0, 0.0), Point2::new(2.0, 0.0)]);

        // Identical segments report both ends once
        let same = intersect_segments(&a, &a, tol());
        assert_eq!(same.len(), 2);
    }

    #[test]
    fn test_zero_length_segment() {
        let a: Segment2<f64> = Segment2::from_coords(2.0, 0.0, 2.0, 0.0);
        let b = Segment2::from_coords(0.0, 0.0, 4.0, 0.0);
        assert_eq!(intersect_segments(&a, &b, tol()), vec![Point2::new(2.0, 0.0)]);
        assert_eq!(intersect_segments(&b, &a, tol()), vec![Point2::new(2.0, 0.0)]);
    }

    #[test]
    fn test_segment_arc() {
        let arc: Arc2<f64> = Arc2::new(Point2::new(0.0, 0.0), 1.0, 0.0, PI);
        let s = Segment2::from_coords(-2.0, 0.5, 2.0, 0.5);
        let pts = intersect_segment_arc(&s, &arc, tol());
        assert_eq!(pts.len(), 2);
        for p in &pts {
            assert_relative_eq!(p.y, 0.5, epsilon = 1e-12);
        }

        // Below the upper half circle
        let below = Segment2::from_coords(-2.0, -0.5, 2.0, -0.5);
        assert!(intersect_segment_arc(&below, &arc, tol()).is_empty());

        // Tangent at the top
        let top = Segment2::from_coords(-2.0, 1.0, 2.0, 1.0);
        let pts = intersect_segment_arc(&top, &arc, tol());
        assert_eq!(pts.len(), 1);
        assert_relative_eq!(pts[0].x, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_arcs_on_different_circles() {
        let a: Arc2<f64> = Arc2::new(Point2::new(0.0, 0.0), 5.0, 0.0, FRAC_PI_2);
        let b = Arc2::new(Point2::new(8.0, 0.0), 5.0, PI, FRAC_PI_2);
        let pts = intersect_arcs(&a, &b, tol());
        assert_eq!(pts.len(), 1);
        assert_relative_eq!(pts[0].x, 4.0, epsilon = 1e-10);
        assert_relative_eq!(pts[0].y, 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_arcs_on_same_circle() {
        let a: Arc2<f64> = Arc2::new(Point2::new(0.0, 0.0), 1.0, 0.0, PI);
        let b = Arc2::new(Point2::new(0.0, 0.0), 1.0, FRAC_PI_2, 3.0 * FRAC_PI_2);
        let pts = intersect_arcs(&a, &b, tol());
        assert_eq!(pts.len(), 2);
        assert!(pts.iter().any(|p| tol().points_eq(*p, Point2::new(-1.0, 0.0))));
        assert!(pts.iter().any(|p| tol().points_eq(*p, Point2::new(0.0, 1.0))));
    }
}
