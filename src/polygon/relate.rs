//! Interior/boundary/exterior relation matrix between two shapes.
//!
//! Polygon pairs are related through the boolean operations. A segment or
//! arc is split where it meets the other shape and each piece is classified
//! separately; its two endpoints form its boundary.

use super::boolean::{calculate_intersections, inner_clip, intersect, outer_clip, subtract};
use super::{ray_shoot, Edge, Inclusion, Polygon};
use crate::bounds::Aabb2;
use crate::error::BooleanError;
use crate::primitives::{Arc2, Circle2, EdgeShape, Point2, Segment2, Split};
use crate::tolerance::Tolerance;
use log::debug;
use num_traits::Float;
use std::borrow::Cow;
use std::cmp::Ordering;

/// Any shape that can be related to another.
#[derive(Debug, Clone)]
pub enum Shape<F> {
    Segment(Segment2<F>),
    Arc(Arc2<F>),
    Circle(Circle2<F>),
    Box(Aabb2<F>),
    Polygon(Polygon<F>),
}

/// One entry of a relation matrix cell.
#[derive(Debug, Clone)]
pub enum Geometry<F> {
    Point(Point2<F>),
    Shape(EdgeShape<F>),
    Polygon(Polygon<F>),
}

impl<F: Float> Geometry<F> {
    /// Only a polygon without faces is empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Polygon(p) => p.is_empty(),
            _ => false,
        }
    }
}

/// Row or column of the relation matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    Interior,
    Boundary,
    Exterior,
}

/// 3×3 matrix of the parts two shapes share.
///
/// Rows are parts of the first shape, columns parts of the second. A cell
/// that was not computed is `None` and counts as empty.
#[derive(Debug, Clone)]
pub struct De9im<F> {
    cells: [[Option<Vec<Geometry<F>>>; 3]; 3],
}

impl<F: Float> Default for De9im<F> {
    fn default() -> Self {
        Self { cells: Default::default() }
    }
}

impl<F: Float> De9im<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of a cell, `None` if it was left unset.
    pub fn get(&self, row: Part, col: Part) -> Option<&[Geometry<F>]> {
        self.cells[row as usize][col as usize].as_deref()
    }

    pub fn set(&mut self, row: Part, col: Part, value: Vec<Geometry<F>>) {
        self.cells[row as usize][col as usize] = Some(value);
    }

    /// Whether a cell is unset or holds nothing but empty geometry.
    pub fn is_empty(&self, row: Part, col: Part) -> bool {
        self.get(row, col)
            .map_or(true, |cell| cell.iter().all(Geometry::is_empty))
    }

    /// Matrix with the roles of the two shapes swapped.
    pub fn transpose(self) -> Self {
        let mut cells: [[Option<Vec<Geometry<F>>>; 3]; 3] = Default::default();
        for (r, row) in self.cells.into_iter().enumerate() {
            for (c, cell) in row.into_iter().enumerate() {
                cells[c][r] = cell;
            }
        }
        Self { cells }
    }

    fn any(&self, cells: &[(Part, Part)]) -> bool {
        cells.iter().any(|&(r, c)| !self.is_empty(r, c))
    }

    fn none(&self, cells: &[(Part, Part)]) -> bool {
        !self.any(cells)
    }

    /// Both shapes cover the same points: they meet, and neither has any
    /// part in the other's exterior.
    pub fn equal(&self) -> bool {
        use Part::*;
        self.any(&[(Interior, Interior), (Boundary, Boundary)])
            && self.none(&[(Interior, Exterior), (Boundary, Exterior), (Exterior, Interior), (Exterior, Boundary)])
    }

    /// Some interior or boundary point is shared.
    pub fn intersects(&self) -> bool {
        use Part::*;
        self.any(&[(Interior, Interior), (Interior, Boundary), (Boundary, Interior), (Boundary, Boundary)])
    }

    /// The shapes meet only on their boundaries.
    pub fn touch(&self) -> bool {
        use Part::*;
        self.is_empty(Interior, Interior)
            && self.any(&[(Interior, Boundary), (Boundary, Interior), (Boundary, Boundary)])
    }

    #[inline]
    pub fn disjoint(&self) -> bool {
        !self.intersects()
    }

    /// First shape lies in the second's interior.
    pub fn inside(&self) -> bool {
        use Part::*;
        !self.is_empty(Interior, Interior) && self.none(&[(Interior, Exterior), (Boundary, Exterior)])
    }

    /// First shape lies in the second, boundary allowed.
    pub fn covered(&self) -> bool {
        use Part::*;
        self.intersects() && self.none(&[(Interior, Exterior), (Boundary, Exterior)])
    }
}

enum Operand<'a, F: Float> {
    Curve(EdgeShape<F>),
    Area(Cow<'a, Polygon<F>>),
}

impl<F: Float> Shape<F> {
    fn operand(&self) -> Operand<'_, F> {
        match self {
            Shape::Segment(s) => Operand::Curve(EdgeShape::Segment(*s)),
            Shape::Arc(a) => Operand::Curve(EdgeShape::Arc(*a)),
            Shape::Circle(c) => Operand::Area(Cow::Owned(Polygon::from_circle(*c))),
            Shape::Box(b) => Operand::Area(Cow::Owned(Polygon::from_box(*b))),
            Shape::Polygon(p) => Operand::Area(Cow::Borrowed(p)),
        }
    }
}

/// Computes the relation matrix of `a` against `b`.
///
/// # Example
///
/// ```
/// use planum::bounds::Aabb2;
/// use planum::polygon::{relate, Shape};
/// use planum::Tolerance;
///
/// let a = Shape::Box(Aabb2::from_coords(0.0, 0.0, 10.0, 10.0));
/// let b = Shape::Box(Aabb2::from_coords(10.0, 0.0, 20.0, 10.0));
/// let m = relate(&a, &b, Tolerance::default()).unwrap();
/// assert!(m.touch());
/// assert!(!m.disjoint());
/// ```
pub fn relate<F: Float>(a: &Shape<F>, b: &Shape<F>, tol: Tolerance<F>) -> Result<De9im<F>, BooleanError> {
    match (a.operand(), b.operand()) {
        (Operand::Area(p), Operand::Area(q)) => relate_polygons(&p, &q, tol),
        (Operand::Curve(s), Operand::Area(p)) => Ok(relate_curve_polygon(&s, &p, tol)),
        (Operand::Area(p), Operand::Curve(s)) => Ok(relate_curve_polygon(&s, &p, tol).transpose()),
        (Operand::Curve(s), Operand::Curve(t)) => Ok(relate_curves(&s, &t, tol)),
    }
}

/// Whether `a` and `b` cover the same points.
///
/// # Arguments
///
/// * `a`, `b` - Shapes to compare; a circle or box counts as the polygon it
///   bounds
/// * `tol` - Tolerance for the underlying boolean operations
///
/// # Returns
///
/// `Ok(true)` when the shapes are equal. Errors from the boolean operations
/// are passed on.
///
/// # Example
///
/// ```
/// use planum::bounds::Aabb2;
/// use planum::polygon::{equal, Polygon, Shape};
/// use planum::Tolerance;
///
/// let aabb = Aabb2::from_coords(0.0_f64, 0.0, 4.0, 3.0);
/// let a = Shape::Box(aabb);
/// let b = Shape::Polygon(Polygon::from_points(&aabb.corners()));
/// assert!(equal(&a, &b, Tolerance::default()).unwrap());
/// ```
pub fn equal<F: Float>(a: &Shape<F>, b: &Shape<F>, tol: Tolerance<F>) -> Result<bool, BooleanError> {
    relate(a, b, tol).map(|m| m.equal())
}

/// Whether `a` and `b` share any point. The negation of [`disjoint`].
pub fn intersects<F: Float>(a: &Shape<F>, b: &Shape<F>, tol: Tolerance<F>) -> Result<bool, BooleanError> {
    relate(a, b, tol).map(|m| m.intersects())
}

/// Whether `a` and `b` meet on their boundaries without their interiors
/// overlapping.
///
/// # Example
///
/// ```
/// use planum::bounds::Aabb2;
/// use planum::polygon::{touch, Shape};
/// use planum::Tolerance;
///
/// let a = Shape::Box(Aabb2::from_coords(0.0_f64, 0.0, 1.0, 1.0));
/// let b = Shape::Box(Aabb2::from_coords(1.0, 0.0, 2.0, 1.0));
/// assert!(touch(&a, &b, Tolerance::default()).unwrap());
/// ```
pub fn touch<F: Float>(a: &Shape<F>, b: &Shape<F>, tol: Tolerance<F>) -> Result<bool, BooleanError> {
    relate(a, b, tol).map(|m| m.touch())
}

/// Whether `a` and `b` have no point in common.
pub fn disjoint<F: Float>(a: &Shape<F>, b: &Shape<F>, tol: Tolerance<F>) -> Result<bool, BooleanError> {
    relate(a, b, tol).map(|m| m.disjoint())
}

/// Whether `a` lies in the interior of `b`. See [`De9im::inside`].
pub fn inside<F: Float>(a: &Shape<F>, b: &Shape<F>, tol: Tolerance<F>) -> Result<bool, BooleanError> {
    relate(a, b, tol).map(|m| m.inside())
}

/// Whether `a` lies in `b`, touching its boundary allowed.
pub fn covered<F: Float>(a: &Shape<F>, b: &Shape<F>, tol: Tolerance<F>) -> Result<bool, BooleanError> {
    relate(a, b, tol).map(|m| m.covered())
}

/// `b` lies in the interior of `a`.
pub fn contain<F: Float>(a: &Shape<F>, b: &Shape<F>, tol: Tolerance<F>) -> Result<bool, BooleanError> {
    inside(b, a, tol)
}

/// `b` lies in `a`, boundary allowed.
pub fn cover<F: Float>(a: &Shape<F>, b: &Shape<F>, tol: Tolerance<F>) -> Result<bool, BooleanError> {
    covered(b, a, tol)
}

fn relate_polygons<F: Float>(a: &Polygon<F>, b: &Polygon<F>, tol: Tolerance<F>) -> Result<De9im<F>, BooleanError> {
    use Part::*;
    let shapes = |v: Vec<EdgeShape<F>>| v.into_iter().map(Geometry::Shape).collect();
    let mut m = De9im::new();

    m.set(Interior, Interior, vec![Geometry::Polygon(intersect(a, b, tol)?)]);
    let (a_in_b, b_in_a) = inner_clip(a, b, tol)?;
    m.set(Boundary, Interior, shapes(a_in_b));
    m.set(Interior, Boundary, shapes(b_in_a));
    m.set(Interior, Exterior, vec![Geometry::Polygon(subtract(a, b, tol)?)]);

    let (touching, _) = calculate_intersections(a, b, tol);
    m.set(Boundary, Boundary, touching.into_iter().map(Geometry::Point).collect());
    m.set(Boundary, Exterior, shapes(outer_clip(a, b, tol)?));

    m.set(Exterior, Interior, vec![Geometry::Polygon(subtract(b, a, tol)?)]);
    m.set(Exterior, Boundary, shapes(outer_clip(b, a, tol)?));
    debug!("related polygons of {} and {} faces", a.num_faces(), b.num_faces());
    Ok(m)
}

/// Distinct points in the order `shape` passes them.
fn order_along<F: Float>(shape: &EdgeShape<F>, mut points: Vec<Point2<F>>, tol: Tolerance<F>) -> Vec<Point2<F>> {
    points.sort_by(|p, q| shape.coord(*p).partial_cmp(&shape.coord(*q)).unwrap_or(Ordering::Equal));
    points.dedup_by(|p, q| tol.points_eq(*p, *q));
    points
}

/// Cuts `shape` at points lying on it, given in travel order.
fn split_at<F: Float>(shape: &EdgeShape<F>, points: &[Point2<F>], tol: Tolerance<F>) -> Vec<EdgeShape<F>> {
    let mut pieces = Vec::with_capacity(points.len() + 1);
    let mut rest = *shape;
    for &p in points {
        if let Split::Pieces(head, tail) = rest.split(p, tol) {
            pieces.push(head);
            rest = tail;
        }
    }
    pieces.push(rest);
    pieces
}

fn relate_curve_polygon<F: Float>(shape: &EdgeShape<F>, poly: &Polygon<F>, tol: Tolerance<F>) -> De9im<F> {
    use Part::*;
    let crossings = poly
        .edge_set
        .search(&shape.bounding_box())
        .into_iter()
        .flat_map(|id| shape.intersect(&poly.edges[id].shape, tol))
        .collect();
    let crossings = order_along(shape, crossings, tol);

    let pieces: Vec<(EdgeShape<F>, Inclusion)> = split_at(shape, &crossings, tol)
        .into_iter()
        .map(|piece| {
            let mut edge = Edge::new(piece);
            let bv = edge.set_inclusion(poly, tol);
            (piece, bv)
        })
        .collect();
    let with = |bv: Inclusion| {
        pieces
            .iter()
            .filter(|(_, b)| *b == bv)
            .map(|(s, _)| Geometry::Shape(*s))
            .collect()
    };
    let ends = |bv: Inclusion| {
        [shape.start(), shape.end()]
            .into_iter()
            .filter(|&p| ray_shoot(poly, p, tol) == bv)
            .map(Geometry::Point)
            .collect()
    };

    let mut m = De9im::new();
    m.set(Interior, Interior, with(Inclusion::Inside));
    m.set(
        Interior,
        Boundary,
        pieces
            .iter()
            .skip(1)
            .map(|(s, bv)| match bv {
                Inclusion::Boundary => Geometry::Shape(*s),
                _ => Geometry::Point(s.start()),
            })
            .collect(),
    );
    m.set(Interior, Exterior, with(Inclusion::Outside));
    m.set(Boundary, Interior, ends(Inclusion::Inside));
    m.set(Boundary, Boundary, ends(Inclusion::Boundary));
    m.set(Boundary, Exterior, ends(Inclusion::Outside));
    m.set(Exterior, Interior, vec![Geometry::Polygon(poly.clone())]);
    m
}

fn relate_curves<F: Float>(a: &EdgeShape<F>, b: &EdgeShape<F>, tol: Tolerance<F>) -> De9im<F> {
    use Part::*;
    let is_end = |s: &EdgeShape<F>, p: Point2<F>| tol.points_eq(p, s.start()) || tol.points_eq(p, s.end());
    let crossings = a.intersect(b, tol);

    let along_a = order_along(a, crossings.clone(), tol);
    let along_b = order_along(b, crossings, tol);
    let (on_b, off_b): (Vec<_>, Vec<_>) = split_at(a, &along_a, tol)
        .into_iter()
        .partition(|piece| b.contains(piece.middle(), tol));
    let off_a = split_at(b, &along_b, tol)
        .into_iter()
        .filter(|piece| !a.contains(piece.middle(), tol));

    let mut m = De9im::new();
    m.set(
        Interior,
        Interior,
        on_b.into_iter()
            .map(Geometry::Shape)
            .chain(
                along_a
                    .iter()
                    .filter(|&&p| !is_end(a, p) && !is_end(b, p))
                    .map(|&p| Geometry::Point(p)),
            )
            .collect(),
    );
    m.set(
        Interior,
        Boundary,
        along_a
            .iter()
            .filter(|&&p| !is_end(a, p) && is_end(b, p))
            .map(|&p| Geometry::Point(p))
            .collect(),
    );
    m.set(Interior, Exterior, off_b.into_iter().map(Geometry::Shape).collect());

    let a_ends = [a.start(), a.end()];
    let ends_of_a = |keep: &dyn Fn(Point2<F>) -> bool| {
        a_ends.iter().copied().filter(|&p| keep(p)).map(Geometry::Point).collect()
    };
    m.set(Boundary, Interior, ends_of_a(&|p| b.contains(p, tol) && !is_end(b, p)));
    m.set(Boundary, Boundary, ends_of_a(&|p| is_end(b, p)));
    m.set(Boundary, Exterior, ends_of_a(&|p| !b.contains(p, tol)));

    m.set(Exterior, Interior, off_a.map(Geometry::Shape).collect());
    m.set(
        Exterior,
        Boundary,
        [b.start(), b.end()]
            .into_iter()
            .filter(|&p| !a.contains(p, tol))
            .map(Geometry::Point)
            .collect(),
    );
    m
}
