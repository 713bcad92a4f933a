use crate::{Point, Subdivision};

/// Receives notifications at the step boundaries of the mutating algorithms.
///
/// An observer is always passed explicitly to the `_with` entry points; the
/// plain entry points use `()`, the no-op observer. All methods default to
/// doing nothing, so implementations override only what they need.
pub trait MeshObserver {
    /// A site was inserted and the surrounding mesh re-satisfies the Delaunay
    /// condition.
    fn site_inserted(&mut self, _subdivision: &Subdivision, _site: Point) { }

    /// An edge was flipped during Delaunay repair.
    fn edge_flipped(&mut self, _subdivision: &Subdivision, _old: [Point; 2], _new: [Point; 2]) { }

    /// A constraint segment is now present in the mesh.
    fn constraint_inserted(&mut self, _subdivision: &Subdivision, _start: Point, _end: Point) { }

    /// A retriangulation edge could not be placed after the deferral retry
    /// and was dropped. The remaining inserted edges make it redundant.
    fn constraint_edge_dropped(&mut self, _subdivision: &Subdivision, _start: Point, _end: Point) { }
}

impl MeshObserver for () { }
