//! 2D line segment type.

use super::{Point2, Vec2};
use crate::bounds::Aabb2;
use crate::tolerance::Tolerance;
use num_traits::Float;

/// A 2D line segment defined by two endpoints.
///
/// Generic over floating-point types (`f32` or `f64`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment2<F> {
    pub start: Point2<F>,
    pub end: Point2<F>,
}

impl<F: Float> Segment2<F> {
    /// Creates a new segment from two points.
    #[inline]
    pub fn new(start: Point2<F>, end: Point2<F>) -> Self {
        Self { start, end }
    }

    /// Creates a segment from coordinate pairs.
    #[inline]
    pub fn from_coords(x1: F, y1: F, x2: F, y2: F) -> Self {
        Self {
            start: Point2::new(x1, y1),
            end: Point2::new(x2, y2),
        }
    }

    /// Returns the direction vector from start to end.
    #[inline]
    pub fn direction(self) -> Vec2<F> {
        self.end - self.start
    }

    #[inline]
    pub fn length_squared(self) -> F {
        self.start.distance_squared(self.end)
    }

    #[inline]
    pub fn length(self) -> F {
        self.start.distance(self.end)
    }

    #[inline]
    pub fn midpoint(self) -> Point2<F> {
        self.start.midpoint(self.end)
    }

    /// Returns the point at parameter `t` along the segment.
    ///
    /// `t = 0` is `start`, `t = 1` is `end`.
    #[inline]
    pub fn point_at(self, t: F) -> Point2<F> {
        self.start.lerp(self.end, t)
    }

    /// Returns the reversed segment (start and end swapped).
    #[inline]
    pub fn reversed(self) -> Self {
        Self {
            start: self.end,
            end: self.start,
        }
    }

    #[inline]
    pub fn bounding_box(self) -> Aabb2<F> {
        Aabb2::from_corners(self.start, self.end)
    }

    /// Computes the closest point on the segment to the given point.
    ///
    /// Returns a tuple of (closest_point, parameter_t) where t is in [0, 1].
    pub fn closest_point(self, p: Point2<F>) -> (Point2<F>, F) {
        let v = self.direction();
        let len_sq = v.magnitude_squared();

        if len_sq <= F::epsilon() {
            return (self.start, F::zero());
        }

        let t = (p - self.start).dot(v) / len_sq;
        let t_clamped = t.max(F::zero()).min(F::one());

        (self.point_at(t_clamped), t_clamped)
    }

    #[inline]
    pub fn distance_squared_to_point(self, p: Point2<F>) -> F {
        let (closest, _) = self.closest_point(p);
        p.distance_squared(closest)
    }

    #[inline]
    pub fn distance_to_point(self, p: Point2<F>) -> F {
        self.distance_squared_to_point(p).sqrt()
    }

    /// Returns `true` if the segment is degenerate (start equals end within epsilon).
    #[inline]
    pub fn is_degenerate(self, eps: F) -> bool {
        self.length_squared() <= eps * eps
    }

    /// Returns `true` if `p` lies on the segment within tolerance.
    #[inline]
    pub fn contains(self, p: Point2<F>, tol: Tolerance<F>) -> bool {
        self.distance_to_point(p) < tol.eps
    }

    /// Distance from `start` to the projection of `p` onto the segment.
    #[inline]
    pub fn coord(self, p: Point2<F>) -> F {
        let (closest, _) = self.closest_point(p);
        self.start.distance(closest)
    }

    /// Unit direction at `start`, or zero for a degenerate segment.
    #[inline]
    pub fn tangent_in_start(self) -> Vec2<F> {
        self.direction().normalize().unwrap_or_else(Vec2::zero)
    }

    /// Unit direction at `end` pointing back toward `start`.
    #[inline]
    pub fn tangent_in_end(self) -> Vec2<F> {
        -self.tangent_in_start()
    }

    /// Shoelace contribution of this segment to the signed area of a closed ring.
    #[inline]
    pub fn signed_area_term(self) -> F {
        let two = F::one() + F::one();
        self.start.to_vec().cross(self.end.to_vec()) / two
    }
}

impl<F: Float> From<(Point2<F>, Point2<F>)> for Segment2<F> {
    fn from((start, end): (Point2<F>, Point2<F>)) -> Self {
        Self::new(start, end)
    }
}
