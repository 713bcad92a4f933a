use crate::quadedge::Edge;
use crate::{Point, Subdivision};

/// A face of the subdivision, viewed through one of its three bounding edges.
///
/// Triangles are not stored; a `Triangle` is a borrowed view derived on
/// demand and is only meaningful while the subdivision is not mutated. The
/// representative edge fixes an orientation: the face is the left face of
/// `edge`, walked by `lnext`.
#[derive(Clone, Copy)]
pub struct Triangle<'a> {
    sub: &'a Subdivision,
    edge: Edge,
}

impl<'a> Triangle<'a> {
    pub(crate) fn new(sub: &'a Subdivision, edge: Edge) -> Self {
        Self { sub, edge }
    }

    /// The representative edge this view was derived from.
    pub fn first_edge(&self) -> Edge {
        self.edge
    }

    /// The three bounding edges in CCW face order, starting at the
    /// representative.
    pub fn edges(&self) -> [Edge; 3] {
        let e1 = self.sub.lnext(self.edge);
        let e2 = self.sub.lnext(e1);
        [self.edge, e1, e2]
    }

    /// The three corner points in CCW face order.
    pub fn points(&self) -> [Point; 3] {
        let [e0, e1, e2] = self.edges();
        [self.sub.org(e0), self.sub.org(e1), self.sub.org(e2)]
    }

    /// The corner not touching the representative edge.
    pub fn opposite_vertex(&self) -> Point {
        self.sub.dest(self.sub.lnext(self.edge))
    }

    /// The face on the other side of `shared`, entered through it, so the
    /// result's [Triangle::opposite_vertex] is the newly exposed corner.
    pub fn opposite(&self, shared: Edge) -> Triangle<'a> {
        Triangle::new(self.sub, shared.sym())
    }

    /// The edge of this face whose reverse bounds `other`, if the two faces
    /// are adjacent.
    pub fn shared_edge(&self, other: &Triangle<'_>) -> Option<Edge> {
        let other_edges = other.edges();
        self.edges()
            .iter()
            .copied()
            .find(|e| other_edges.contains(&e.sym()))
    }

    /// True when any corner is one of the subdivision's frame points.
    pub fn touches_frame(&self) -> bool {
        self.points().iter().any(|&p| self.sub.is_frame_vertex(p))
    }
}
