use std::cmp;
use std::collections::{HashMap, HashSet};
use std::fmt;

use rand::Rng;

use crate::cancel::{BatchRun, CancelFlag};
use crate::errors::TriangulationError;
use crate::math;
use crate::observer::MeshObserver;
use crate::point::{Point, PointKey};
use crate::quadedge::{Edge, EdgePool};
use crate::triangle::Triangle;

/// Default coordinate tolerance for geometric coincidence during site
/// insertion. Structural comparisons (ring lookups, index keys, idempotence
/// checks) are always exact and ignore this.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

// Keeps the locate bound from tripping on nearly-empty meshes.
const LOCATE_BOUND_FLOOR: usize = 64;

/// Returned by walk callbacks: `Stop` ends the walk early, which is a normal
/// outcome rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkControl {
    Continue,
    Stop,
}

/// One structural-invariant violation found by [Subdivision::validate].
pub struct Violation {
    message: String,
}

impl Violation {
    fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl fmt::Debug for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Violation({})", self.message)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Builds a frame triangle that strictly contains the axis-aligned extent
/// `min..max`, with generous padding so that no input site ever lands on a
/// frame edge.
pub fn frame_for_extent(min: Point, max: Point) -> [Point; 3] {
    let dx = (max.x() - min.x()).max(1.0);
    let dy = (max.y() - min.y()).max(1.0);
    let cx = (min.x() + max.x()) / 2.0;
    let cy = (min.y() + max.y()) / 2.0;
    let pad = 10.0 * (dx + dy);
    [
        Point::new(cx - 3.0 * pad, cy - pad),
        Point::new(cx + 3.0 * pad, cy - pad),
        Point::new(cx, cy + 3.0 * pad),
    ]
}

/// A planar triangulation of the inserted sites plus an enclosing frame
/// triangle, maintained Delaunay through incremental site insertion and
/// bent where required by inserted constraint edges.
///
/// All mutation requires `&mut self`; walks and queries are only meaningful
/// on a quiescent mesh, which the borrow rules enforce.
pub struct Subdivision {
    pub(crate) pool: EdgePool,
    pub(crate) starting_edge: Edge,
    frame: [Point; 3],
    site_count: usize,
    tolerance: f64,
    // Auxiliary point -> outgoing-edge map kept in sync through every
    // connect/delete/swap. Never trusted blindly: lookups re-verify against
    // the mesh and fall back to a direct walk.
    pub(crate) vertex_index: HashMap<PointKey, Edge>,
}

impl Subdivision {
    /// Creates the initial subdivision from a frame triangle that must
    /// strictly contain every site inserted later (see [frame_for_extent]).
    /// Winding order of the frame points is normalized internally.
    pub fn new(a: Point, b: Point, c: Point) -> Self {
        Self::with_tolerance(a, b, c, DEFAULT_TOLERANCE)
    }

    pub fn with_tolerance(a: Point, b: Point, c: Point, tolerance: f64) -> Self {
        let (a, b, c) = if math::is_ccw(a, b, c) { (a, b, c) } else { (a, c, b) };

        let mut pool = EdgePool::new();
        let ea = pool.make_edge(a, b);
        let eb = pool.make_edge(b, c);
        pool.splice(ea.sym(), eb);
        let ec = pool.connect(eb, ea);

        let mut vertex_index = HashMap::new();
        vertex_index.insert(a.key(), ea);
        vertex_index.insert(b.key(), eb);
        vertex_index.insert(c.key(), ec);

        Self {
            pool,
            starting_edge: ea,
            frame: [a, b, c],
            site_count: 0,
            tolerance,
            vertex_index,
        }
    }

    pub fn frame(&self) -> [Point; 3] {
        self.frame
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Number of successfully inserted sites (frame points excluded).
    pub fn site_count(&self) -> usize {
        self.site_count
    }

    /// An arbitrary live edge, usable as the entry point for walks.
    pub fn starting_edge(&self) -> Edge {
        self.starting_edge
    }

    pub fn is_frame_vertex(&self, p: Point) -> bool {
        self.frame.contains(&p)
    }

    /// True for edges joining two frame points. These bound the outer face
    /// and are never removed.
    pub fn is_hard_frame_edge(&self, e: Edge) -> bool {
        self.is_frame_vertex(self.org(e)) && self.is_frame_vertex(self.dest(e))
    }

    // ─── edge accessors (delegating to the pool) ───

    pub fn org(&self, e: Edge) -> Point {
        self.pool.org(e)
    }

    pub fn dest(&self, e: Edge) -> Point {
        self.pool.dest(e)
    }

    pub fn onext(&self, e: Edge) -> Edge {
        self.pool.onext(e)
    }

    pub fn oprev(&self, e: Edge) -> Edge {
        self.pool.oprev(e)
    }

    pub fn lnext(&self, e: Edge) -> Edge {
        self.pool.lnext(e)
    }

    pub fn lprev(&self, e: Edge) -> Edge {
        self.pool.lprev(e)
    }

    pub fn rnext(&self, e: Edge) -> Edge {
        self.pool.rnext(e)
    }

    pub fn rprev(&self, e: Edge) -> Edge {
        self.pool.rprev(e)
    }

    pub fn dnext(&self, e: Edge) -> Edge {
        self.pool.dnext(e)
    }

    pub fn dprev(&self, e: Edge) -> Edge {
        self.pool.dprev(e)
    }

    /// The face left of `e`, as a borrowed view.
    pub fn triangle(&self, e: Edge) -> Triangle<'_> {
        Triangle::new(self, e)
    }

    pub(crate) fn right_of_edge(&self, p: Point, e: Edge) -> bool {
        math::right_of(p, self.org(e), self.dest(e))
    }

    // ─── point location ───

    /// Walks from the starting edge toward `x`, returning an edge of the
    /// triangle containing (or bounding) `x`. If `x` is a mesh vertex the
    /// returned edge has it as origin or destination.
    ///
    /// The walk is bounded; on exhaustion an exhaustive scan of every live
    /// edge runs the same predicate, and only if that also fails is the
    /// failure surfaced — as an internal-consistency error, since it cannot
    /// happen on a structurally valid mesh.
    pub fn locate(&self, x: Point) -> Result<Edge, TriangulationError> {
        let mut e = self.starting_edge;
        if !self.pool.is_alive(e) {
            return Err(TriangulationError::internal(format!(
                "starting edge {:?} is dead",
                e
            )));
        }

        let bound = 2 * cmp::max(self.site_count, LOCATE_BOUND_FLOOR);
        let mut rng = rand::thread_rng();
        for _ in 0..bound {
            if x == self.org(e) || x == self.dest(e) {
                return Ok(e);
            }
            if self.right_of_edge(x, e) {
                e = e.sym();
                continue;
            }
            // Two admissible continuations; testing them in random order
            // avoids cycling through degenerate configurations.
            let onext_first: bool = rng.gen();
            if onext_first {
                if !self.right_of_edge(x, self.onext(e)) {
                    e = self.onext(e);
                } else if !self.right_of_edge(x, self.dprev(e)) {
                    e = self.dprev(e);
                } else {
                    return Ok(e);
                }
            } else {
                if !self.right_of_edge(x, self.dprev(e)) {
                    e = self.dprev(e);
                } else if !self.right_of_edge(x, self.onext(e)) {
                    e = self.onext(e);
                } else {
                    return Ok(e);
                }
            }
        }

        self.locate_exhaustive(x)
    }

    fn locate_exhaustive(&self, x: Point) -> Result<Edge, TriangulationError> {
        for e0 in self.pool.primal_edges() {
            for &e in &[e0, e0.sym()] {
                if x == self.org(e) || x == self.dest(e) {
                    return Ok(e);
                }
                if !self.right_of_edge(x, e)
                    && !self.right_of_edge(x, self.onext(e))
                    && !self.right_of_edge(x, self.dprev(e))
                {
                    return Ok(e);
                }
            }
        }
        Err(TriangulationError::internal(format!(
            "locate failed for {} even with exhaustive search",
            x
        )))
    }

    // ─── site insertion ───

    /// Inserts a site, restoring the Delaunay property around it. Returns
    /// `Ok(false)` without touching the mesh when the site coincides (within
    /// tolerance) with an existing vertex. A failed call leaves the mesh
    /// exactly as it was.
    pub fn insert_site(&mut self, x: Point) -> Result<bool, TriangulationError> {
        self.insert_site_with(x, &mut ())
    }

    pub fn insert_site_with(
        &mut self,
        x: Point,
        observer: &mut dyn MeshObserver,
    ) -> Result<bool, TriangulationError> {
        let mut e = self.locate(x)?;

        // Any corner of the located triangle may be the near-duplicate, not
        // just the endpoints of the returned edge.
        let apex = self.dest(self.lnext(e));
        if x.coincident(self.org(e), self.tolerance)
            || x.coincident(self.dest(e), self.tolerance)
            || x.coincident(apex, self.tolerance)
        {
            return Ok(false);
        }

        let tol_sq = self.tolerance * self.tolerance;
        if math::distance_squared_to_segment(x, self.org(e), self.dest(e)) <= tol_sq
            && !self.is_hard_frame_edge(e)
        {
            // The site falls on the located edge: absorb that edge into the
            // two adjacent triangles and fan from the enclosing quadrilateral.
            let t = self.oprev(e);
            self.remove_edge(e);
            e = t;
        }

        // Connect the new site to every vertex of the enclosing polygon.
        let fan_org = self.org(e);
        let mut base = self.pool.make_edge(fan_org, x);
        self.vertex_index.insert(x.key(), base.sym());
        self.pool.splice(base, e);
        let first = base;
        loop {
            base = self.pool.connect(e, base.sym());
            e = self.oprev(base);
            if self.lnext(e) == first {
                break;
            }
        }

        // Delaunay repair: walk the suspect edges opposite the new site,
        // flipping any that fail the in-circle test.
        loop {
            let t = self.oprev(e);
            if self.right_of_edge(self.dest(t), e)
                && math::in_circle(self.org(e), self.dest(t), self.dest(e), x)
            {
                let old = [self.org(e), self.dest(e)];
                self.swap_edge(e);
                let new = [self.org(e), self.dest(e)];
                observer.edge_flipped(self, old, new);
                e = self.oprev(e);
            } else if self.onext(e) == first {
                break;
            } else {
                e = self.lprev(self.onext(e));
            }
        }

        // Later insertions tend to be nearby; walking from the new fan is
        // cheaper than from wherever the starting edge happened to be.
        self.starting_edge = first;

        self.site_count += 1;
        observer.site_inserted(self, x);
        Ok(true)
    }

    /// Inserts sites one at a time, checking the cancellation flag between
    /// insertions.
    pub fn insert_sites(
        &mut self,
        sites: &[Point],
        cancel: &CancelFlag,
    ) -> Result<BatchRun, TriangulationError> {
        self.insert_sites_with(sites, cancel, &mut ())
    }

    pub fn insert_sites_with(
        &mut self,
        sites: &[Point],
        cancel: &CancelFlag,
        observer: &mut dyn MeshObserver,
    ) -> Result<BatchRun, TriangulationError> {
        for (i, &site) in sites.iter().enumerate() {
            if cancel.is_cancelled() {
                return Ok(BatchRun { completed: i, cancelled: true });
            }
            self.insert_site_with(site, observer)?;
        }
        Ok(BatchRun { completed: sites.len(), cancelled: false })
    }

    // ─── structure maintenance shared by site and constraint insertion ───

    /// Deletes an edge, repointing the starting edge and the vertex index
    /// away from the dying quad first.
    pub(crate) fn remove_edge(&mut self, e: Edge) {
        for &dir in &[e, e.sym()] {
            let key = self.org(dir).key();
            if let Some(&indexed) = self.vertex_index.get(&key) {
                if indexed.quad() == e.quad() {
                    let alt = self.onext(dir);
                    if alt.quad() == e.quad() {
                        self.vertex_index.remove(&key);
                    } else {
                        self.vertex_index.insert(key, alt);
                    }
                }
            }
        }

        if self.starting_edge.quad() == e.quad() {
            let fallback = self.oprev(e);
            debug_assert!(fallback.quad() != e.quad(), "deleting an isolated starting edge");
            self.starting_edge = fallback;
        }

        self.pool.delete_edge(e);
    }

    /// Flips an edge, repointing vertex-index entries that reference it:
    /// after the swap its quad carries different endpoints.
    pub(crate) fn swap_edge(&mut self, e: Edge) {
        for &dir in &[e, e.sym()] {
            let key = self.org(dir).key();
            if let Some(&indexed) = self.vertex_index.get(&key) {
                if indexed.quad() == e.quad() {
                    let alt = self.onext(dir);
                    if alt.quad() == e.quad() {
                        self.vertex_index.remove(&key);
                    } else {
                        self.vertex_index.insert(key, alt);
                    }
                }
            }
        }
        self.pool.swap(e);
    }

    /// Some live edge whose origin is exactly `p`, via the index when it is
    /// fresh, by direct walk when it is not.
    pub(crate) fn edge_at(&self, p: Point) -> Option<Edge> {
        if let Some(&e) = self.vertex_index.get(&p.key()) {
            if self.pool.is_alive(e) && self.org(e) == p {
                return Some(e);
            }
        }
        for e in self.pool.primal_edges() {
            if self.org(e) == p {
                return Some(e);
            }
            if self.dest(e) == p {
                return Some(e.sym());
            }
        }
        None
    }

    /// True when the origin ring of `start` contains an edge whose
    /// destination is exactly `dest`.
    pub(crate) fn ring_contains(&self, start: Edge, dest: Point) -> bool {
        let bound = self.pool.live_count() * 4 + 1;
        let mut e = start;
        for _ in 0..bound {
            if self.dest(e) == dest {
                return true;
            }
            e = self.onext(e);
            if e == start {
                return false;
            }
        }
        false
    }

    // ─── walks and extraction ───

    /// Visits every live undirected edge once as an (origin, destination)
    /// point pair. The callback may return [WalkControl::Stop] to end the
    /// walk early.
    pub fn walk_all_edges<F>(&self, mut f: F)
    where
        F: FnMut(Point, Point) -> WalkControl,
    {
        for e in self.pool.primal_edges() {
            if let WalkControl::Stop = f(self.org(e), self.dest(e)) {
                return;
            }
        }
    }

    /// Visits every face once as its three corner points in CCW face order.
    /// The outer face (bounded by the frame) is included.
    pub fn walk_all_triangle_edges<F>(&self, mut f: F)
    where
        F: FnMut([Point; 3]) -> WalkControl,
    {
        let mut visited: HashSet<Edge> = HashSet::new();
        for e0 in self.pool.primal_edges() {
            for &e in &[e0, e0.sym()] {
                if visited.contains(&e) {
                    continue;
                }
                let e1 = self.lnext(e);
                let e2 = self.lnext(e1);
                visited.insert(e);
                visited.insert(e1);
                visited.insert(e2);
                if self.lnext(e2) != e {
                    // Not a triangle; validate() reports this, walks skip it.
                    continue;
                }
                if let WalkControl::Stop = f([self.org(e), self.org(e1), self.org(e2)]) {
                    return;
                }
            }
        }
    }

    /// All triangles of the mesh. With `include_frame` false (the normal
    /// mode for consumers) every triangle touching a frame vertex is
    /// dropped, leaving exactly the triangulation of the input geometry.
    pub fn triangles(&self, include_frame: bool) -> Vec<[Point; 3]> {
        let mut result = Vec::new();
        self.walk_all_triangle_edges(|tri| {
            if include_frame || !tri.iter().any(|&p| self.is_frame_vertex(p)) {
                result.push(tri);
            }
            WalkControl::Continue
        });
        result
    }

    // ─── validation ───

    /// Checks the structural invariants and reports every violation found.
    /// Intended for tests and debugging, not the runtime happy path.
    pub fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();

        if !self.pool.is_alive(self.starting_edge) {
            violations.push(Violation::new(format!(
                "starting edge {:?} references a dead quad",
                self.starting_edge
            )));
        }

        let ring_bound = self.pool.live_count() * 4 + 1;
        let mut ring_seen: HashSet<Edge> = HashSet::new();

        for e0 in self.pool.primal_edges() {
            for &e in &[e0, e0.sym()] {
                let org = self.org(e);
                if !org.x().is_finite() || !org.y().is_finite() {
                    violations.push(Violation::new(format!(
                        "edge {:?} has non-finite origin {:?}",
                        e, org
                    )));
                    continue;
                }

                let next = self.onext(e);
                if !self.pool.is_alive(next) {
                    violations.push(Violation::new(format!(
                        "edge {:?} has dead onext {:?}",
                        e, next
                    )));
                    continue;
                }
                if self.org(next) != org {
                    violations.push(Violation::new(format!(
                        "onext of {:?} moves origin from {} to {}",
                        e,
                        org,
                        self.org(next)
                    )));
                }

                if self.lnext(self.lnext(self.lnext(e))) != e {
                    violations.push(Violation::new(format!(
                        "left face of {:?} is not a triangle",
                        e
                    )));
                }

                if ring_seen.contains(&e) {
                    continue;
                }
                let mut ring = Vec::new();
                let mut cur = e;
                let mut closed = false;
                for _ in 0..ring_bound {
                    ring_seen.insert(cur);
                    ring.push(self.dest(cur));
                    cur = self.onext(cur);
                    if cur == e {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    violations.push(Violation::new(format!(
                        "origin ring at {} does not close",
                        org
                    )));
                    continue;
                }

                let mut dest_keys = HashSet::new();
                for d in &ring {
                    if !dest_keys.insert(d.key()) {
                        violations.push(Violation::new(format!(
                            "origin ring at {} has duplicate destination {}",
                            org, d
                        )));
                    }
                }

                if ring.len() >= 2 {
                    let angles: Vec<f64> = ring
                        .iter()
                        .map(|d| (d.y() - org.y()).atan2(d.x() - org.x()))
                        .collect();
                    let mut descents = 0;
                    for i in 0..angles.len() {
                        if angles[(i + 1) % angles.len()] <= angles[i] {
                            descents += 1;
                        }
                    }
                    if descents != 1 {
                        violations.push(Violation::new(format!(
                            "origin ring at {} is not in CCW angular order",
                            org
                        )));
                    }
                }
            }
        }

        violations
    }
}
