use crate::cancel::CancelFlag;
use crate::errors::TriangulationError;
use crate::observer::MeshObserver;
use crate::point::{Point, Vertex};
use crate::subdivision::{frame_for_extent, Subdivision, DEFAULT_TOLERANCE};

/// The typical consumer pipeline in one place: collect sites and constraint
/// segments, then build a constrained subdivision from them — frame derived
/// from the site extent, sites deduplicated at tolerance, constraints
/// inserted longest-first (a churn heuristic, not a correctness requirement).
pub struct Triangulator {
    sites: Vec<Point>,
    constraints: Vec<(Point, Point)>,
    tolerance: f64,
}

impl Default for Triangulator {
    fn default() -> Self {
        Self::new()
    }
}

/// The outcome of [Triangulator::triangulate_with]: the (possibly partial)
/// subdivision plus whether the run was cancelled.
pub struct TriangulatorRun {
    pub subdivision: Subdivision,
    pub cancelled: bool,
}

impl Triangulator {
    pub fn new() -> Self {
        Self {
            sites: Vec::new(),
            constraints: Vec::new(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance, ..Self::new() }
    }

    /// Queues a site. Returns false (and queues nothing) for coordinates
    /// without a finite `f64` representation.
    pub fn add_site<V: Vertex>(&mut self, v: &V) -> bool {
        match Point::from_vertex(v) {
            Some(p) => {
                self.sites.push(p);
                true
            }
            None => false,
        }
    }

    /// Queues a constraint segment; its endpoints are queued as sites too.
    pub fn add_constraint<V: Vertex>(&mut self, a: &V, b: &V) -> bool {
        match (Point::from_vertex(a), Point::from_vertex(b)) {
            (Some(a), Some(b)) => {
                self.sites.push(a);
                self.sites.push(b);
                self.constraints.push((a, b));
                true
            }
            _ => false,
        }
    }

    pub fn triangulate(&self) -> Result<Subdivision, TriangulationError> {
        let run = self.triangulate_with(&CancelFlag::new(), &mut ())?;
        Ok(run.subdivision)
    }

    pub fn triangulate_with(
        &self,
        cancel: &CancelFlag,
        observer: &mut dyn MeshObserver,
    ) -> Result<TriangulatorRun, TriangulationError> {
        let sites = self.deduplicated_sites();

        let (min, max) = extent(&sites);
        let [a, b, c] = frame_for_extent(min, max);
        let mut subdivision = Subdivision::with_tolerance(a, b, c, self.tolerance);

        let run = subdivision.insert_sites_with(&sites, cancel, observer)?;
        if run.cancelled {
            return Ok(TriangulatorRun { subdivision, cancelled: true });
        }

        // Deduplication may have replaced a constraint endpoint with the
        // nearby site that was kept instead; snap endpoints to the kept set.
        let snap = |q: Point| {
            sites
                .iter()
                .copied()
                .find(|kept| q.coincident(*kept, self.tolerance))
                .unwrap_or(q)
        };
        let mut constraints: Vec<(Point, Point)> = self
            .constraints
            .iter()
            .map(|&(a, b)| (snap(a), snap(b)))
            .collect();

        // Longer constraints first: structural edges go in before the short
        // ones that would otherwise be repeatedly cut and retriangulated.
        constraints.sort_by(|(a1, b1), (a2, b2)| {
            let l1 = a1.distance_squared(*b1);
            let l2 = a2.distance_squared(*b2);
            l2.partial_cmp(&l1).unwrap_or(std::cmp::Ordering::Equal)
        });

        let run = subdivision.insert_constraints_with(&constraints, cancel, observer)?;
        Ok(TriangulatorRun { subdivision, cancelled: run.cancelled })
    }

    /// Lexicographic sort plus a linear sweep dropping points within
    /// tolerance of an already-kept point.
    fn deduplicated_sites(&self) -> Vec<Point> {
        let mut sites = self.sites.clone();
        sites.sort_by(|p, q| {
            (p.x(), p.y())
                .partial_cmp(&(q.x(), q.y()))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let mut kept: Vec<Point> = Vec::with_capacity(sites.len());
        for site in sites {
            if let Some(&last) = kept.last() {
                if site.coincident(last, self.tolerance) {
                    continue;
                }
            }
            kept.push(site);
        }
        kept
    }
}

fn extent(sites: &[Point]) -> (Point, Point) {
    let mut min = (f64::MAX, f64::MAX);
    let mut max = (f64::MIN, f64::MIN);
    for p in sites {
        min.0 = min.0.min(p.x());
        min.1 = min.1.min(p.y());
        max.0 = max.0.max(p.x());
        max.1 = max.1.max(p.y());
    }
    if sites.is_empty() {
        (Point::new(0.0, 0.0), Point::new(1.0, 1.0))
    } else {
        (Point::new(min.0, min.1), Point::new(max.0, max.1))
    }
}
