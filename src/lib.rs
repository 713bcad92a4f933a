mod idx;
mod point;
mod math;
mod quadedge;
mod triangle;
mod subdivision;
mod pseudopolygon;
mod constraint;
mod triangulator;
mod observer;
mod cancel;
mod errors;

#[cfg(feature = "debugging")]
pub mod debug;

#[cfg(any(test, feature = "benchmarking"))]
pub mod tests;

pub use errors::{InternalError, TriangulationError};
pub use point::{Classification, Point, PointKey, Vertex};
pub use quadedge::Edge;
pub use subdivision::{frame_for_extent, Subdivision, Violation, WalkControl, DEFAULT_TOLERANCE};
pub use triangle::Triangle;
pub use pseudopolygon::triangulate_pseudo_polygon;
pub use observer::MeshObserver;
pub use cancel::{BatchRun, CancelFlag};
pub use triangulator::{Triangulator, TriangulatorRun};

pub use num_traits::real::Real;
