//! The half-edge polygon: arenas of edges and faces plus their spatial
//! indices.

use super::{Edge, EdgeId, Face, FaceId, FaceRef, Inclusion};
use crate::bounds::Aabb2;
use crate::error::BooleanError;
use crate::primitives::{Arc2, Circle2, EdgeShape, Point2, Segment2, Split};
use crate::spatial::PlanarSet;
use crate::tolerance::Tolerance;
use log::warn;
use num_traits::Float;
use slotmap::SlotMap;

/// A planar subdivision made of one or more closed faces.
///
/// Edges are held in an arena and addressed by [`EdgeId`]; rings are cycles
/// of those handles. Every live edge is also registered in an edge index
/// and every face in a face index, both keyed by bounding box. Faces may be
/// islands or holes; the winding of each ring tells them apart and nothing
/// here enforces a convention.
///
/// Cloning keeps every handle valid in the copy.
#[derive(Debug, Clone)]
pub struct Polygon<F> {
    pub(crate) edges: SlotMap<EdgeId, Edge<F>>,
    pub(crate) faces: SlotMap<FaceId, Face>,
    pub(crate) edge_set: PlanarSet<EdgeId, F>,
    pub(crate) face_set: PlanarSet<FaceId, F>,
}

impl<F: Float> Default for Polygon<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> Polygon<F> {
    /// Creates an empty polygon.
    pub fn new() -> Self {
        Self {
            edges: SlotMap::with_key(),
            faces: SlotMap::with_key(),
            edge_set: PlanarSet::new(),
            face_set: PlanarSet::new(),
        }
    }

    /// One face of segments joining consecutive points, closed back to the
    /// first point.
    pub fn from_points(points: &[Point2<F>]) -> Self {
        let mut polygon = Self::new();
        polygon.add_face(points);
        polygon
    }

    /// One face per point loop.
    pub fn from_faces<P: AsRef<[Point2<F>]>>(loops: &[P]) -> Self {
        let mut polygon = Self::new();
        for points in loops {
            polygon.add_face(points.as_ref());
        }
        polygon
    }

    /// One face from a closed chain of shapes, each ending where the next
    /// one starts.
    pub fn from_shapes(shapes: Vec<EdgeShape<F>>) -> Self {
        let mut polygon = Self::new();
        polygon.add_face_from_shapes(shapes);
        polygon
    }

    /// One face made of a single counter-clockwise full-circle arc.
    pub fn from_circle(circle: Circle2<F>) -> Self {
        Self::from_shapes(vec![EdgeShape::Arc(Arc2::full_circle(circle.center, circle.radius))])
    }

    /// The box as a counter-clockwise face.
    pub fn from_box(aabb: Aabb2<F>) -> Self {
        Self::from_points(&aabb.corners())
    }

    /// Adds a face of segments through `points`. Consecutive duplicate
    /// points are skipped. Returns `None` if no segment remains.
    pub fn add_face(&mut self, points: &[Point2<F>]) -> Option<FaceId> {
        let n = points.len();
        let shapes = (0..n)
            .map(|i| Segment2::new(points[i], points[(i + 1) % n]))
            .filter(|s| s.start != s.end)
            .map(EdgeShape::Segment)
            .collect();
        self.add_face_from_shapes(shapes)
    }

    /// Adds a face from a closed chain of shapes.
    pub fn add_face_from_shapes(&mut self, shapes: Vec<EdgeShape<F>>) -> Option<FaceId> {
        if shapes.is_empty() {
            return None;
        }
        let ids: Vec<EdgeId> = shapes.into_iter().map(|s| self.insert_edge(Edge::new(s))).collect();
        let n = ids.len();
        for (i, &id) in ids.iter().enumerate() {
            let edge = &mut self.edges[id];
            edge.next = ids[(i + 1) % n];
            edge.prev = ids[(i + n - 1) % n];
        }
        let face = Face {
            first: ids[0],
            last: ids[n - 1],
        };
        let face_id = self.faces.insert(face);
        self.adopt_ring(face_id, &ids);
        Some(face_id)
    }

    /// Turns an already linked chain of edges into a face. `last.next` is
    /// set to `first` to close the ring.
    pub(crate) fn add_face_from_ring(
        &mut self,
        first: EdgeId,
        last: EdgeId,
    ) -> Result<FaceId, BooleanError> {
        let cap = self.edges.len();
        let mut ids = Vec::new();
        let mut cur = first;
        loop {
            let Some(edge) = self.edges.get(cur) else {
                warn!("ring from {:?} runs into a removed edge", first);
                return Err(BooleanError::InfiniteLoop { edges: cap });
            };
            ids.push(cur);
            if cur == last {
                break;
            }
            if ids.len() >= cap {
                warn!("ring from {:?} does not reach {:?}", first, last);
                return Err(BooleanError::InfiniteLoop { edges: cap });
            }
            cur = edge.next;
        }
        self.edges[last].next = first;
        self.edges[first].prev = last;
        let face_id = self.faces.insert(Face { first, last });
        self.adopt_ring(face_id, &ids);
        Ok(face_id)
    }

    /// Points the ring's edges at `face_id`, numbers their arc lengths and
    /// indexes the face.
    fn adopt_ring(&mut self, face_id: FaceId, ids: &[EdgeId]) {
        let mut arc_length = F::zero();
        let mut aabb: Option<Aabb2<F>> = None;
        for &id in ids {
            let edge = &mut self.edges[id];
            edge.face = Some(face_id);
            edge.arc_length = arc_length;
            arc_length = arc_length + edge.length();
            let b = edge.bounding_box();
            aabb = Some(aabb.map_or(b, |a| a.union(b)));
        }
        if let Some(aabb) = aabb {
            self.face_set.add(face_id, aabb);
        }
    }

    pub(crate) fn insert_edge(&mut self, edge: Edge<F>) -> EdgeId {
        let aabb = edge.bounding_box();
        let id = self.edges.insert(edge);
        self.edge_set.add(id, aabb);
        id
    }

    /// Edge handles of the ring starting at `first`, in `next` order.
    pub(crate) fn ring(&self, first: EdgeId) -> Result<Vec<EdgeId>, BooleanError> {
        let cap = self.edges.len();
        let mut ids = Vec::new();
        let mut cur = first;
        loop {
            let Some(edge) = self.edges.get(cur) else {
                warn!("ring from {:?} runs into a removed edge", first);
                return Err(BooleanError::InfiniteLoop { edges: cap });
            };
            ids.push(cur);
            if ids.len() > cap {
                warn!("ring from {:?} does not close", first);
                return Err(BooleanError::InfiniteLoop { edges: cap });
            }
            cur = edge.next;
            if cur == first {
                return Ok(ids);
            }
        }
    }

    #[inline]
    pub fn face(&self, id: FaceId) -> Option<FaceRef<'_, F>> {
        self.faces.get(id).map(|&face| FaceRef {
            polygon: self,
            id,
            face,
        })
    }

    /// Every face, in arena order. Islands and holes alike.
    pub fn faces(&self) -> impl Iterator<Item = FaceRef<'_, F>> + '_ {
        self.faces.iter().map(move |(id, &face)| FaceRef {
            polygon: self,
            id,
            face,
        })
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> Option<&Edge<F>> {
        self.edges.get(id)
    }

    /// Every edge with its handle, in arena order rather than ring order.
    /// Use [`FaceRef::edges`] to walk a ring.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge<F>)> + '_ {
        self.edges.iter()
    }

    /// Number of faces, holes included.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Absolute value of the summed signed face areas, so holes wound
    /// against their island subtract.
    pub fn area(&self) -> F {
        self.faces()
            .fold(F::zero(), |acc, f| acc + f.signed_area())
            .abs()
    }

    /// Total length of all edges, hole boundaries included.
    pub fn perimeter(&self) -> F {
        self.edges.values().fold(F::zero(), |acc, e| acc + e.length())
    }

    pub fn bounding_box(&self) -> Option<Aabb2<F>> {
        self.edge_set.bounds()
    }

    /// Start point of every edge, face by face.
    pub fn vertices(&self) -> Vec<Point2<F>> {
        self.faces()
            .flat_map(|f| f.edges().map(|(_, e)| e.start()).collect::<Vec<_>>())
            .collect()
    }

    /// True if `point` is inside or on the boundary.
    pub fn contains(&self, point: Point2<F>, tol: Tolerance<F>) -> bool {
        super::ray_shoot(self, point, tol) != Inclusion::Outside
    }

    /// True if every face ring is closed and simple.
    pub fn is_valid(&self, tol: Tolerance<F>) -> bool {
        self.faces().all(|f| f.is_closed() && f.is_simple(tol))
    }

    /// Edges whose box overlaps `query`.
    pub fn edges_in(&self, query: &Aabb2<F>) -> Vec<EdgeId> {
        self.edge_set.search(query)
    }

    /// Faces whose box overlaps `query`.
    pub fn faces_in(&self, query: &Aabb2<F>) -> Vec<FaceId> {
        self.face_set.search(query)
    }

    /// First edge (in index order) whose shape passes through `point`.
    pub fn find_edge_by_point(&self, point: Point2<F>, tol: Tolerance<F>) -> Option<EdgeId> {
        let query = Aabb2::from_point(point).inflate(tol.eps);
        self.edge_set
            .search(&query)
            .into_iter()
            .find(|&id| self.edges[id].shape.contains(point, tol))
    }

    /// Reverses the winding of every face.
    pub fn reverse(&mut self) {
        let face_ids: Vec<FaceId> = self.faces.keys().collect();
        for face_id in face_ids {
            let face = self.faces[face_id];
            let Ok(ids) = self.ring(face.first) else {
                continue;
            };
            for &id in &ids {
                let edge = &mut self.edges[id];
                edge.shape = edge.shape.reversed();
                std::mem::swap(&mut edge.next, &mut edge.prev);
            }
            self.faces[face_id] = Face {
                first: face.last,
                last: face.first,
            };
            self.renumber(face_id);
        }
    }

    pub fn reversed(&self) -> Self {
        let mut polygon = self.clone();
        polygon.reverse();
        polygon
    }

    /// Recomputes arc lengths along a face, starting from zero at `first`.
    pub(crate) fn renumber(&mut self, face_id: FaceId) {
        let Some(&face) = self.faces.get(face_id) else {
            return;
        };
        let Ok(ids) = self.ring(face.first) else {
            return;
        };
        let mut arc_length = F::zero();
        for id in ids {
            let edge = &mut self.edges[id];
            edge.arc_length = arc_length;
            arc_length = arc_length + edge.length();
        }
    }

    /// Splits `edge_id` at `point`, which must lie on it, and returns the
    /// edge that now ends at `point`.
    ///
    /// When `point` is interior a new edge takes the first piece and is
    /// linked in front of `edge_id`, which keeps its handle and shrinks to
    /// the second piece. Arc lengths of both pieces stay consistent with the
    /// face numbering. A point at either end splits nothing.
    pub fn add_vertex(&mut self, point: Point2<F>, edge_id: EdgeId, tol: Tolerance<F>) -> EdgeId {
        let edge = &self.edges[edge_id];
        let (first, second) = match edge.shape.split(point, tol) {
            Split::AtStart => return edge.prev,
            Split::AtEnd => return edge_id,
            Split::Pieces(a, b) => (a, b),
        };
        let (prev, face, arc_length) = (edge.prev, edge.face, edge.arc_length);

        let mut head = Edge::new(first);
        head.prev = prev;
        head.next = edge_id;
        head.face = face;
        head.arc_length = arc_length;
        let head_id = self.insert_edge(head);

        self.edge_set.remove(edge_id);
        let tail = &mut self.edges[edge_id];
        tail.shape = second;
        tail.prev = head_id;
        tail.arc_length = arc_length + first.length();
        self.edge_set.add(edge_id, second.bounding_box());

        if let Some(p) = self.edges.get_mut(prev) {
            p.next = head_id;
        }
        if let Some(face) = face.and_then(|f| self.faces.get_mut(f)) {
            if face.first == edge_id {
                face.first = head_id;
            }
        }
        head_id
    }

    /// Unlinks an edge from its ring and drops it. A face left without
    /// edges is deleted.
    pub fn remove_edge(&mut self, edge_id: EdgeId) {
        let Some(edge) = self.edges.remove(edge_id) else {
            return;
        };
        self.edge_set.remove(edge_id);

        let alone = edge.next == edge_id;
        if !alone {
            if let Some(p) = self.edges.get_mut(edge.prev) {
                p.next = edge.next;
            }
            if let Some(n) = self.edges.get_mut(edge.next) {
                n.prev = edge.prev;
            }
        }

        let Some(face_id) = edge.face else {
            return;
        };
        let Some(face) = self.faces.get_mut(face_id) else {
            return;
        };
        if alone || (face.first == edge_id && face.last == edge_id) {
            self.faces.remove(face_id);
            self.face_set.remove(face_id);
            return;
        }
        if face.first == edge_id {
            face.first = edge.next;
        }
        if face.last == edge_id {
            face.last = edge.prev;
        }
    }

    /// Removes the edges from `from` to `to` inclusive, following `next`.
    /// The rest of the ring is closed over the gap. If the chain is the
    /// whole ring the face goes too.
    pub fn remove_chain(&mut self, face_id: FaceId, from: EdgeId, to: EdgeId) {
        let Some(edge_to) = self.edges.get(to) else {
            return;
        };
        if edge_to.next == from {
            self.delete_face(face_id);
            return;
        }

        let cap = self.edges.len();
        let mut chain = Vec::new();
        let mut cur = from;
        loop {
            let Some(edge) = self.edges.get(cur) else {
                break;
            };
            chain.push(cur);
            if cur == to || chain.len() >= cap {
                break;
            }
            cur = edge.next;
        }
        for id in chain {
            self.remove_edge(id);
        }
        self.refresh_face(face_id);
    }

    /// Removes a face together with every edge of its ring.
    pub fn delete_face(&mut self, face_id: FaceId) {
        let Some(face) = self.faces.remove(face_id) else {
            return;
        };
        self.face_set.remove(face_id);

        let cap = self.edges.len();
        let mut cur = face.first;
        for _ in 0..cap {
            let Some(edge) = self.edges.remove(cur) else {
                break;
            };
            self.edge_set.remove(cur);
            cur = edge.next;
            if cur == face.first {
                break;
            }
        }
    }

    /// Forgets a face but leaves its edges in place for relinking.
    pub(crate) fn detach_face(&mut self, face_id: FaceId) {
        if self.faces.remove(face_id).is_some() {
            self.face_set.remove(face_id);
        }
    }

    /// True if the edge exists and belongs to a live face.
    pub(crate) fn has_live_face(&self, edge_id: EdgeId) -> bool {
        self.edges
            .get(edge_id)
            .and_then(|e| e.face)
            .is_some_and(|f| self.faces.contains_key(f))
    }

    /// Re-indexes a face under the current box of its ring.
    pub(crate) fn refresh_face(&mut self, face_id: FaceId) {
        let Some(aabb) = self.face(face_id).and_then(|f| f.bounding_box()) else {
            return;
        };
        self.face_set.update(face_id, aabb);
    }
}
