//! Circular arc type.
//!
//! An arc is a piece of a circle swept from `start_angle` to `end_angle`.
//! The sign of the sweep gives the direction of travel.

use super::shape::Split;
use super::{Point2, Vec2};
use crate::bounds::Aabb2;
use crate::tolerance::Tolerance;
use num_traits::Float;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// A 2D circular arc defined by center, radius, and angular range.
///
/// Angles are in radians, measured counter-clockwise from the positive x-axis.
/// The arc runs counter-clockwise when `end_angle > start_angle` and clockwise
/// otherwise. A sweep of `±2π` is a full circle.
///
/// # Example
///
/// ```
/// use planum::primitives::{Arc2, Point2};
/// use std::f64::consts::PI;
///
/// let arc = Arc2::new(Point2::new(0.0, 0.0), 1.0, 0.0, PI);
/// assert!(arc.is_ccw());
/// assert!((arc.length() - PI).abs() < 1e-12);
/// assert!((arc.middle().y - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc2<F> {
    /// Center of the arc's circle.
    pub center: Point2<F>,
    /// Radius of the arc.
    pub radius: F,
    /// Start angle in radians.
    pub start_angle: F,
    /// End angle in radians.
    pub end_angle: F,
}

impl<F: Float> Arc2<F> {
    #[inline]
    pub fn new(center: Point2<F>, radius: F, start_angle: F, end_angle: F) -> Self {
        Self {
            center,
            radius,
            start_angle,
            end_angle,
        }
    }

    /// Full counter-clockwise circle starting and ending at its leftmost point.
    #[inline]
    pub fn full_circle(center: Point2<F>, radius: F) -> Self {
        let pi = F::from(PI).unwrap();
        Self::new(center, radius, pi, pi + pi + pi)
    }

    /// Creates an arc from start point, end point, and bulge factor.
    ///
    /// Bulge is the tangent of 1/4 of the arc's subtended angle.
    /// Positive bulge = counter-clockwise arc, negative = clockwise.
    /// Returns `None` for a zero bulge or a zero-length chord.
    pub fn from_bulge(start: Point2<F>, end: Point2<F>, bulge: F) -> Option<Self> {
        if bulge.abs() <= F::epsilon() {
            return None;
        }

        let two = F::one() + F::one();
        let four = two + two;

        let chord = end - start;
        let chord_len = chord.magnitude();
        if chord_len <= F::epsilon() {
            return None;
        }

        let sagitta = bulge * chord_len / two;
        let radius = (chord_len * chord_len / four + sagitta * sagitta) / (two * sagitta.abs());

        // Center sits on the chord bisector, on the side opposite the bulge
        // for arcs shorter than a half circle.
        let mid = start.midpoint(end);
        let offset = (radius - sagitta.abs()) * bulge.signum();
        let center = mid + chord.perpendicular() * (offset / chord_len);

        let start_angle = (start - center).slope();
        let sweep = four * bulge.atan();
        Some(Self::new(center, radius, start_angle, start_angle + sweep))
    }

    #[inline]
    pub fn point_at_angle(&self, angle: F) -> Point2<F> {
        self.center + Vec2::from_angle(angle) * self.radius
    }

    #[inline]
    pub fn start_point(&self) -> Point2<F> {
        self.point_at_angle(self.start_angle)
    }

    #[inline]
    pub fn end_point(&self) -> Point2<F> {
        self.point_at_angle(self.end_angle)
    }

    /// Returns the signed sweep angle (positive = counter-clockwise).
    #[inline]
    pub fn sweep_angle(&self) -> F {
        self.end_angle - self.start_angle
    }

    #[inline]
    pub fn is_ccw(&self) -> bool {
        self.sweep_angle() >= F::zero()
    }

    #[inline]
    pub fn length(&self) -> F {
        self.radius * self.sweep_angle().abs()
    }

    /// Point halfway along the arc.
    #[inline]
    pub fn middle(&self) -> Point2<F> {
        let two = F::one() + F::one();
        self.point_at_angle(self.start_angle + self.sweep_angle() / two)
    }

    /// Same arc traversed in the opposite direction.
    #[inline]
    pub fn reversed(&self) -> Self {
        Self::new(self.center, self.radius, self.end_angle, self.start_angle)
    }

    /// Angle travelled from the start, in the arc's own direction, to reach
    /// the polar angle of `p`. Always in `[0, 2π)`.
    pub fn angle_offset(&self, p: Point2<F>) -> F {
        let tau = F::from(TAU).unwrap();
        let polar = (p - self.center).slope();
        let raw = if self.is_ccw() {
            polar - self.start_angle
        } else {
            self.start_angle - polar
        };
        let wrapped = raw % tau;
        if wrapped < F::zero() {
            wrapped + tau
        } else {
            wrapped
        }
    }

    /// Arc length from the start to the projection of `p`.
    #[inline]
    pub fn coord(&self, p: Point2<F>) -> F {
        self.angle_offset(p) * self.radius
    }

    /// Returns `true` if `p` lies on the arc within tolerance.
    pub fn contains(&self, p: Point2<F>, tol: Tolerance<F>) -> bool {
        if !tol.eq(self.center.distance(p), self.radius) {
            return false;
        }
        if tol.points_eq(p, self.start_point()) || tol.points_eq(p, self.end_point()) {
            return true;
        }
        tol.le(self.coord(p), self.length())
    }

    /// Splits the arc at `p`, which is assumed to lie on it.
    pub fn split(&self, p: Point2<F>, tol: Tolerance<F>) -> Split<Self> {
        if tol.points_eq(p, self.start_point()) {
            return Split::AtStart;
        }
        if tol.points_eq(p, self.end_point()) {
            return Split::AtEnd;
        }
        let offset = self.angle_offset(p);
        let mid = if self.is_ccw() {
            self.start_angle + offset
        } else {
            self.start_angle - offset
        };
        Split::Pieces(
            Self::new(self.center, self.radius, self.start_angle, mid),
            Self::new(self.center, self.radius, mid, self.end_angle),
        )
    }

    /// Tight bounding box: endpoints plus every axis extreme the arc passes.
    pub fn bounding_box(&self) -> Aabb2<F> {
        let quarter = F::from(FRAC_PI_2).unwrap();
        let lo = self.start_angle.min(self.end_angle);
        let hi = self.start_angle.max(self.end_angle);

        let mut aabb = Aabb2::from_corners(self.start_point(), self.end_point());
        let mut k = (lo / quarter).ceil();
        while k * quarter <= hi {
            aabb = aabb.expand_to_include(self.point_at_angle(k * quarter));
            k = k + F::one();
        }
        aabb
    }

    /// Unit tangent at the start, in the direction of travel.
    pub fn tangent_in_start(&self) -> Vec2<F> {
        let radial = Vec2::from_angle(self.start_angle);
        if self.is_ccw() {
            radial.perpendicular()
        } else {
            radial.perpendicular_cw()
        }
    }

    /// Unit tangent at the end, pointing back along the arc.
    pub fn tangent_in_end(&self) -> Vec2<F> {
        let radial = Vec2::from_angle(self.end_angle);
        if self.is_ccw() {
            radial.perpendicular_cw()
        } else {
            radial.perpendicular()
        }
    }

    /// Contribution of this arc to the signed area of a closed ring: the
    /// chord's shoelace term plus the circular segment between chord and arc.
    pub fn signed_area_term(&self) -> F {
        let two = F::one() + F::one();
        let theta = self.sweep_angle();
        let chord = self.start_point().to_vec().cross(self.end_point().to_vec()) / two;
        chord + self.radius * self.radius / two * (theta - theta.sin())
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
    fn test_endpoints_and_length() {
        let arc: Arc2<f64> = Arc2::new(Point2::new(0.0, 0.0), 2.0, 0.0, FRAC_PI_2);
        assert_relative_eq!(arc.start_point().x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(arc.end_point().y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(arc.length(), PI, epsilon = 1e-12);
        assert!(arc.is_ccw());
        assert!(!arc.reversed().is_ccw());
    }

    #[test]
    fn test_from_bulge_semicircle() {
        let arc = Arc2::from_bulge(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0), 1.0).unwrap();
        assert_relative_eq!(arc.radius, 1.0, epsilon = 1e-10);
        assert_relative_eq!(arc.center.x, 1.0, epsilon = 1e-10);
        assert_relative_eq!(arc.center.y, 0.0, epsilon = 1e-10);
        assert_relative_eq!(arc.end_point().x, 2.0, epsilon = 1e-10);
        assert!(arc.is_ccw());
        // A CCW arc from (0,0) to (2,0) passes below the chord.
        assert_relative_eq!(arc.middle().y, -1.0, epsilon = 1e-10);

        assert!(Arc2::from_bulge(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0), 0.0).is_none());
    }

    #[test]
    fn test_contains() {
        let arc: Arc2<f64> = Arc2::new(Point2::new(0.0, 0.0), 1.0, 0.0, FRAC_PI_2);
        assert!(arc.contains(Point2::new(1.0, 0.0), tol()));
        assert!(arc.contains(Point2::new(0.0, 1.0), tol()));
        let diag = 0.5f64.sqrt();
        assert!(arc.contains(Point2::new(diag, diag), tol()));
        assert!(!arc.contains(Point2::new(-diag, diag), tol()));
        assert!(!arc.contains(Point2::new(0.5, 0.5), tol()));

        // Same geometry traversed clockwise
        let cw = arc.reversed();
        assert!(cw.contains(Point2::new(diag, diag), tol()));
        assert!(!cw.contains(Point2::new(-diag, -diag), tol()));
    }

    #[test]
    fn test_full_circle_contains_everything_on_circle() {
        let arc: Arc2<f64> = Arc2::full_circle(Point2::new(1.0, 1.0), 2.0);
        for i in 0..16 {
            let angle = i as f64 * TAU / 16.0;
            let p = Point2::new(1.0 + 2.0 * angle.cos(), 1.0 + 2.0 * angle.sin());
            assert!(arc.contains(p, tol()));
        }
        assert_relative_eq!(arc.length(), 4.0 * PI, epsilon = 1e-12);
    }

    #[test]
    fn test_split() {
        let arc: Arc2<f64> = Arc2::new(Point2::new(0.0, 0.0), 1.0, 0.0, PI);
        match arc.split(Point2::new(0.0, 1.0), tol()) {
            Split::Pieces(a, b) => {
                assert_relative_eq!(a.end_angle, FRAC_PI_2, epsilon = 1e-12);
                assert_relative_eq!(b.start_angle, FRAC_PI_2, epsilon = 1e-12);
                assert_relative_eq!(a.length() + b.length(), arc.length(), epsilon = 1e-12);
            }
            other => panic!("unexpected split {:?}", other),
        }
        assert_eq!(arc.split(Point2::new(1.0, 0.0), tol()), Split::AtStart);
        assert_eq!(arc.split(Point2::new(-1.0, 0.0), tol()), Split::AtEnd);

        let cw: Arc2<f64> = Arc2::new(Point2::new(0.0, 0.0), 1.0, 0.0, -PI);
        match cw.split(Point2::new(0.0, -1.0), tol()) {
            Split::Pieces(a, _) => assert_relative_eq!(a.end_angle, -FRAC_PI_2, epsilon = 1e-12),
            other => panic!("unexpected split {:?}", other),
        }
    }

    #[test]
    fn test_bounding_box() {
        let arc: Arc2<f64> = Arc2::new(Point2::new(0.0, 0.0), 1.0, -FRAC_PI_2 / 2.0, PI);
        let aabb = arc.bounding_box();
        assert_relative_eq!(aabb.max.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(aabb.max.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(aabb.min.x, -1.0, epsilon = 1e-12);
        assert_relative_eq!(aabb.min.y, -(0.5f64.sqrt()), epsilon = 1e-12);

        let full: Arc2<f64> = Arc2::full_circle(Point2::new(0.0, 0.0), 3.0);
        let aabb = full.bounding_box();
        assert_relative_eq!(aabb.min.y, -3.0, epsilon = 1e-12);
        assert_relative_eq!(aabb.max.x, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tangents() {
        let arc: Arc2<f64> = Arc2::new(Point2::new(0.0, 0.0), 1.0, 0.0, FRAC_PI_2);
        let t0 = arc.tangent_in_start();
        assert_relative_eq!(t0.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(t0.y, 1.0, epsilon = 1e-12);
        // At (0,1), travelling back toward (1,0) heads in +x.
        let t1 = arc.tangent_in_end();
        assert_relative_eq!(t1.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(t1.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_signed_area_of_full_circle() {
        let arc: Arc2<f64> = Arc2::full_circle(Point2::new(5.0, -2.0), 2.0);
        assert_relative_eq!(arc.signed_area_term(), 4.0 * PI, epsilon = 1e-10);
        assert_relative_eq!(arc.reversed().signed_area_term(), -4.0 * PI, epsilon = 1e-10);
    }
}
