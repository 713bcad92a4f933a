use std::fmt;

use crate::idx::{Idx, VecExt};
use crate::Point;

/// A directed-edge handle: an arena slot plus a rotation (0-3) within it.
///
/// Handles are plain values; they stay valid as long as the underlying quad is
/// alive and are never dereferenced unchecked after deletion (the slot is
/// tombstoned, not reused until explicitly recycled). The rotation operators
/// below are pure handle arithmetic and need no arena access.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    quad: Idx<Quad>,
    rot: u8,
}

impl Edge {
    fn new(quad: Idx<Quad>, rot: u8) -> Self {
        Self { quad, rot }
    }

    pub(crate) fn quad(self) -> Idx<Quad> {
        self.quad
    }

    /// Rotate 90 degrees counterclockwise onto the dual edge.
    pub fn rot(self) -> Edge {
        Edge::new(self.quad, (self.rot + 1) & 3)
    }

    /// Rotate 90 degrees clockwise onto the dual edge.
    pub fn inv_rot(self) -> Edge {
        Edge::new(self.quad, (self.rot + 3) & 3)
    }

    /// The same undirected edge, pointing the other way.
    pub fn sym(self) -> Edge {
        Edge::new(self.quad, (self.rot + 2) & 3)
    }

    /// True for the two primal (point-carrying) directions of the quad.
    pub fn is_primal(self) -> bool {
        self.rot & 1 == 0
    }
}

impl fmt::Debug for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}.{}", self.quad.usize(), self.rot)
    }
}

/// One undirected mesh edge: four directed edges created and destroyed as a
/// unit. The origin points of the two primal directions live in `points`;
/// dual directions carry no geometry.
pub(crate) struct Quad {
    next: [Edge; 4],
    points: [Point; 2],
    alive: bool,
}

/// Arena of quads. Deleted slots are tombstoned and recycled through a free
/// list, so an `Edge` held across a deletion can be detected as dead instead
/// of silently reading another edge's links.
pub(crate) struct EdgePool {
    quads: Vec<Quad>,
    free: Vec<Idx<Quad>>,
    live: usize,
}

impl EdgePool {
    pub fn new() -> Self {
        Self {
            quads: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    pub fn live_count(&self) -> usize {
        self.live
    }

    pub fn is_alive(&self, e: Edge) -> bool {
        self.quads[e.quad()].alive
    }

    /// Allocates an isolated edge from `org` to `dest`: its left and right
    /// faces coincide and its origin rings contain only itself.
    pub fn make_edge(&mut self, org: Point, dest: Point) -> Edge {
        let qi = match self.free.pop() {
            Some(qi) => qi,
            None => {
                // Placeholder links, overwritten below once the index is known
                let placeholder = Edge::new(Idx::new(self.quads.len()), 0);
                self.quads.push_get_index(Quad {
                    next: [placeholder; 4],
                    points: [org, dest],
                    alive: false,
                })
            }
        };

        let e0 = Edge::new(qi, 0);
        self.quads[qi] = Quad {
            next: [e0, e0.inv_rot(), e0.sym(), e0.rot()],
            points: [org, dest],
            alive: true,
        };
        self.live += 1;
        e0
    }

    #[inline]
    pub fn onext(&self, e: Edge) -> Edge {
        debug_assert!(self.quads[e.quad()].alive, "onext through dead edge {:?}", e);
        self.quads[e.quad()].next[e.rot as usize]
    }

    #[inline]
    fn set_onext(&mut self, e: Edge, next: Edge) {
        self.quads[e.quad()].next[e.rot as usize] = next;
    }

    #[inline]
    pub fn oprev(&self, e: Edge) -> Edge {
        self.onext(e.rot()).rot()
    }

    #[inline]
    pub fn lnext(&self, e: Edge) -> Edge {
        self.onext(e.inv_rot()).rot()
    }

    #[inline]
    pub fn lprev(&self, e: Edge) -> Edge {
        self.onext(e).sym()
    }

    #[inline]
    pub fn rnext(&self, e: Edge) -> Edge {
        self.onext(e.rot()).inv_rot()
    }

    #[inline]
    pub fn rprev(&self, e: Edge) -> Edge {
        self.onext(e.sym())
    }

    #[inline]
    pub fn dnext(&self, e: Edge) -> Edge {
        self.onext(e.sym()).sym()
    }

    #[inline]
    pub fn dprev(&self, e: Edge) -> Edge {
        self.onext(e.inv_rot()).inv_rot()
    }

    #[inline]
    pub fn org(&self, e: Edge) -> Point {
        debug_assert!(e.is_primal(), "dual edge {:?} has no origin point", e);
        self.quads[e.quad()].points[(e.rot >> 1) as usize]
    }

    #[inline]
    pub fn dest(&self, e: Edge) -> Point {
        self.org(e.sym())
    }

    pub fn set_endpoints(&mut self, e: Edge, org: Point, dest: Point) {
        debug_assert!(e.is_primal());
        let quad = &mut self.quads[e.quad()];
        quad.points[(e.rot >> 1) as usize] = org;
        quad.points[(e.sym().rot >> 1) as usize] = dest;
    }

    /// The fundamental topology editor: exchanges the `onext` successors of
    /// `a` and `b` and of their duals, which either merges two origin rings
    /// into one or splits one ring in two. Splice is its own inverse and
    /// never fails; callers are responsible for only splicing edges whose
    /// origins coincide (or are about to).
    pub fn splice(&mut self, a: Edge, b: Edge) {
        let alpha = self.onext(a).rot();
        let beta = self.onext(b).rot();

        let a_next = self.onext(a);
        let b_next = self.onext(b);
        let alpha_next = self.onext(alpha);
        let beta_next = self.onext(beta);

        self.set_onext(a, b_next);
        self.set_onext(b, a_next);
        self.set_onext(alpha, beta_next);
        self.set_onext(beta, alpha_next);
    }

    /// Adds an edge from `a.dest()` to `b.org()` such that the new edge, `a`
    /// and `b` share a left face.
    pub fn connect(&mut self, a: Edge, b: Edge) -> Edge {
        let org = self.dest(a);
        let dest = self.org(b);
        let a_lnext = self.lnext(a);
        let e = self.make_edge(org, dest);
        self.splice(e, a_lnext);
        self.splice(e.sym(), b);
        e
    }

    /// Splices the edge out of both endpoint rings and tombstones its quad.
    /// The caller must repoint any retained references (e.g. a subdivision's
    /// starting edge) before or immediately after.
    pub fn delete_edge(&mut self, e: Edge) {
        let oprev = self.oprev(e);
        let sym_oprev = self.oprev(e.sym());
        self.splice(e, oprev);
        self.splice(e.sym(), sym_oprev);

        let quad = &mut self.quads[e.quad()];
        debug_assert!(quad.alive, "double delete of {:?}", e);
        quad.alive = false;
        self.free.push(e.quad());
        self.live -= 1;
    }

    /// Rotates `e` inside the quadrilateral formed by its two adjacent
    /// triangles, replacing one diagonal with the other. Both faces must be
    /// triangles.
    pub fn swap(&mut self, e: Edge) {
        let a = self.oprev(e);
        let b = self.oprev(e.sym());

        self.splice(e, a);
        self.splice(e.sym(), b);

        let a_lnext = self.lnext(a);
        let b_lnext = self.lnext(b);
        self.splice(e, a_lnext);
        self.splice(e.sym(), b_lnext);

        let org = self.dest(a);
        let dest = self.dest(b);
        self.set_endpoints(e, org, dest);
    }

    /// One primal edge per live quad, in slot order.
    pub fn primal_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.quads.iter().enumerate().filter_map(|(i, quad)| {
            if quad.alive {
                Some(Edge::new(Idx::new(i), 0))
            } else {
                None
            }
        })
    }
}
