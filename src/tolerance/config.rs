//! Tolerance configuration threaded through every comparison.

use crate::primitives::Point2;
use num_traits::Float;

/// Default comparison tolerance.
pub const DEFAULT_EPS: f64 = 1e-6;

/// Default multiple of `eps` within which a near miss between two boundaries
/// is promoted to an intersection point during conflict repair.
pub const DEFAULT_SNAP_FACTOR: f64 = 10.0;

/// Floating-point comparison settings.
///
/// Two values are equal when they differ by less than `eps`. The value is
/// `Copy` and is passed explicitly to every operation that compares
/// coordinates, so several tolerances can coexist in one process.
///
/// # Example
///
/// ```
/// use planum::Tolerance;
///
/// let tol: Tolerance<f64> = Tolerance::default();
/// assert!(tol.eq(1.0, 1.0 + 1e-9));
/// assert!(tol.lt(1.0, 1.1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance<F> {
    /// Absolute comparison tolerance.
    pub eps: F,
    /// Multiplier applied to `eps` when searching for a missed crossing.
    pub snap_factor: F,
}

impl<F: Float> Tolerance<F> {
    /// Creates a tolerance with the given `eps` and the default snap factor.
    #[inline]
    pub fn new(eps: F) -> Self {
        Self {
            eps,
            snap_factor: F::from(DEFAULT_SNAP_FACTOR).unwrap(),
        }
    }

    /// Returns a copy with a different snap factor.
    #[inline]
    pub fn with_snap_factor(self, snap_factor: F) -> Self {
        Self {
            snap_factor,
            ..self
        }
    }

    /// Distance under which a near miss counts as a crossing.
    #[inline]
    pub fn snap_distance(self) -> F {
        self.eps * self.snap_factor
    }

    #[inline]
    pub fn eq(self, a: F, b: F) -> bool {
        (a - b).abs() < self.eps
    }

    #[inline]
    pub fn eq_zero(self, a: F) -> bool {
        a.abs() < self.eps
    }

    #[inline]
    pub fn lt(self, a: F, b: F) -> bool {
        a < b - self.eps
    }

    #[inline]
    pub fn le(self, a: F, b: F) -> bool {
        a <= b + self.eps
    }

    #[inline]
    pub fn gt(self, a: F, b: F) -> bool {
        a > b + self.eps
    }

    #[inline]
    pub fn ge(self, a: F, b: F) -> bool {
        a >= b - self.eps
    }

    /// Component-wise point equality.
    #[inline]
    pub fn points_eq(self, p: Point2<F>, q: Point2<F>) -> bool {
        self.eq(p.x, q.x) && self.eq(p.y, q.y)
    }
}

impl<F: Float> Default for Tolerance<F> {
    fn default() -> Self {
        Self::new(F::from(DEFAULT_EPS).unwrap())
    }
}
