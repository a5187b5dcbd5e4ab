//! 2D circle type.

use super::{Arc2, Point2, Vec2};
use crate::bounds::Aabb2;
use crate::tolerance::Tolerance;
use num_traits::Float;

/// A 2D circle defined by center and radius.
///
/// Circles are not edge shapes themselves. They enter a polygon as a single
/// full-sweep [`Arc2`].
///
/// # Example
///
/// ```
/// use planum::primitives::{Circle2, Point2};
///
/// let circle: Circle2<f64> = Circle2::new(Point2::new(0.0, 0.0), 1.0);
/// assert!(circle.contains(Point2::new(0.5, 0.0)));
/// assert!(!circle.contains(Point2::new(2.0, 0.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle2<F> {
    /// Center point of the circle
    pub center: Point2<F>,
    /// Radius of the circle (must be non-negative)
    pub radius: F,
}

impl<F: Float> Circle2<F> {
    #[inline]
    pub fn new(center: Point2<F>, radius: F) -> Self {
        Self { center, radius }
    }

    #[inline]
    pub fn from_coords(cx: F, cy: F, radius: F) -> Self {
        Self {
            center: Point2::new(cx, cy),
            radius,
        }
    }

    #[inline]
    pub fn area(&self) -> F {
        F::from(std::f64::consts::PI).unwrap() * self.radius * self.radius
    }

    /// Checks if a point is inside the circle (including boundary).
    #[inline]
    pub fn contains(&self, point: Point2<F>) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }

    #[inline]
    pub fn bounding_box(&self) -> Aabb2<F> {
        Aabb2::from_point(self.center).inflate(self.radius)
    }

    /// The circle as one closed arc, counter-clockwise or clockwise.
    pub fn to_arc(&self, ccw: bool) -> Arc2<F> {
        let arc = Arc2::full_circle(self.center, self.radius);
        if ccw {
            arc
        } else {
            arc.reversed()
        }
    }

    /// Intersects the circle with the infinite line through `origin` along
    /// `direction`.
    ///
    /// A tangent line yields one point. A degenerate direction yields none.
    pub fn intersect_line(
        &self,
        origin: Point2<F>,
        direction: Vec2<F>,
        tol: Tolerance<F>,
    ) -> Vec<Point2<F>> {
        let dir = match direction.normalize() {
            Some(d) => d,
            None => return Vec::new(),
        };

        // Foot of the perpendicular from the center onto the line
        let foot = origin + dir * (self.center - origin).dot(dir);
        let dist = self.center.distance(foot);

        if tol.eq(dist, self.radius) {
            vec![foot]
        } else if dist < self.radius {
            let h = (self.radius * self.radius - dist * dist).sqrt();
            vec![foot - dir * h, foot + dir * h]
        } else {
            Vec::new()
        }
    }

    /// Intersects two circles.
    ///
    /// Concentric circles never report points, even when they coincide.
    pub fn intersect_circle(&self, other: &Circle2<F>, tol: Tolerance<F>) -> Vec<Point2<F>> {
        let d = self.center.distance(other.center);
        let r1 = self.radius;
        let r2 = other.radius;

        if tol.eq_zero(d) || tol.gt(d, r1 + r2) || tol.lt(d, (r1 - r2).abs()) {
            return Vec::new();
        }

        let v = (other.center - self.center) / d;

        if tol.eq(d, r1 + r2) {
            return vec![self.center + v * r1];
        }
        if tol.eq(d, (r1 - r2).abs()) {
            // Internal tangency: the contact lies on the far side of the
            // smaller circle's center.
            return if r1 >= r2 {
                vec![self.center + v * r1]
            } else {
                vec![self.center - v * r1]
            };
        }

        let two = F::one() + F::one();
        let a = (r1 * r1 - r2 * r2 + d * d) / (two * d);
        let h = (r1 * r1 - a * a).max(F::zero()).sqrt();
        let mid = self.center + v * a;
        let perp = v.perpendicular();

        vec![mid + perp * h, mid - perp * h]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tol() -> Tolerance<f64> {
        Tolerance::new(1e-6)
    }

    #[test]
    fn test_area_and_box() {
        let c: Circle2<f64> = Circle2::from_coords(1.0, 2.0, 2.0);
        assert_relative_eq!(c.area(), 4.0 * std::f64::consts::PI, epsilon = 1e-10);
        assert_eq!(c.bounding_box(), Aabb2::from_coords(-1.0, 0.0, 3.0, 4.0));
    }

    #[test]
    fn test_to_arc() {
        let c: Circle2<f64> = Circle2::from_coords(0.0, 0.0, 1.0);
        let ccw = c.to_arc(true);
        let cw = c.to_arc(false);
        assert!(ccw.is_ccw());
        assert!(!cw.is_ccw());
        assert_relative_eq!(ccw.start_point().x, -1.0, epsilon = 1e-12);
        assert_relative_eq!(cw.length(), std::f64::consts::TAU, epsilon = 1e-12);
    }

    #[test]
    fn test_intersect_line() {
        let c: Circle2<f64> = Circle2::from_coords(0.0, 0.0, 5.0);
        let pts = c.intersect_line(Point2::new(-10.0, 3.0), Vec2::new(1.0, 0.0), tol());
        assert_eq!(pts.len(), 2);
        assert_relative_eq!(pts[0].x, -4.0, epsilon = 1e-10);
        assert_relative_eq!(pts[1].x, 4.0, epsilon = 1e-10);

        let tangent = c.intersect_line(Point2::new(-10.0, 5.0), Vec2::new(1.0, 0.0), tol());
        assert_eq!(tangent.len(), 1);
        assert_relative_eq!(tangent[0].x, 0.0, epsilon = 1e-10);

        assert!(c
            .intersect_line(Point2::new(-10.0, 6.0), Vec2::new(1.0, 0.0), tol())
            .is_empty());
    }

    #[test]
    fn test_intersect_circle_two_points() {
        let a: Circle2<f64> = Circle2::from_coords(0.0, 0.0, 5.0);
        let b = Circle2::from_coords(8.0, 0.0, 5.0);
        let pts = a.intersect_circle(&b, tol());
        assert_eq!(pts.len(), 2);
        for p in pts {
            assert_relative_eq!(p.x, 4.0, epsilon = 1e-10);
            assert_relative_eq!(p.y.abs(), 3.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_intersect_circle_tangent() {
        let a: Circle2<f64> = Circle2::from_coords(0.0, 0.0, 1.0);
        let outer = Circle2::from_coords(2.0, 0.0, 1.0);
        assert_eq!(a.intersect_circle(&outer, tol()), vec![Point2::new(1.0, 0.0)]);

        // Small circle touching the big one from inside
        let big: Circle2<f64> = Circle2::from_coords(0.0, 0.0, 3.0);
        let small = Circle2::from_coords(2.0, 0.0, 1.0);
        assert_eq!(big.intersect_circle(&small, tol()), vec![Point2::new(3.0, 0.0)]);
        assert_eq!(small.intersect_circle(&big, tol()), vec![Point2::new(3.0, 0.0)]);
    }

    #[test]
    fn test_intersect_circle_none() {
        let a: Circle2<f64> = Circle2::from_coords(0.0, 0.0, 1.0);
        assert!(a.intersect_circle(&Circle2::from_coords(5.0, 0.0, 1.0), tol()).is_empty());
        assert!(a.intersect_circle(&Circle2::from_coords(0.0, 0.0, 1.0), tol()).is_empty());
        assert!(a.intersect_circle(&Circle2::from_coords(0.1, 0.0, 0.2), tol()).is_empty());
    }
}
