use smallvec::{smallvec, SmallVec};

use crate::errors::TriangulationError;
use crate::math;
use crate::Point;

/// Triangulates a pseudo-polygon: an ordered chain of vertices implicitly
/// closed by an edge from the last point back to the first. That base edge is
/// assumed to already exist and is never part of the output.
///
/// Returns the point-pair edges of the triangulation (chain edges included —
/// callers skip any that already exist in the mesh). For each sub-chain the
/// apex is the Delaunay-optimal vertex: the first candidate whose
/// circumcircle with the base contains no other candidate. Colinear
/// candidates can never be an apex; when nothing else remains the chain is
/// untriangulatable and [TriangulationError::AllPointsColinear] is returned.
///
/// Runs on an explicit work stack; chain length only grows the stack, not
/// the call depth.
pub fn triangulate_pseudo_polygon(
    chain: &[Point],
) -> Result<Vec<[Point; 2]>, TriangulationError> {
    if chain.len() < 2 {
        return Err(TriangulationError::InvalidPseudoPolygonSize(chain.len()));
    }

    let mut edges = Vec::new();
    let mut stack: SmallVec<[(usize, usize); 16]> = smallvec![(0, chain.len() - 1)];

    while let Some((lo, hi)) = stack.pop() {
        if hi - lo < 2 {
            continue;
        }
        let apex = select_apex(chain, lo, hi)?;
        edges.push([chain[lo], chain[apex]]);
        edges.push([chain[apex], chain[hi]]);
        stack.push((lo, apex));
        stack.push((apex, hi));
    }

    Ok(edges)
}

/// Scans the interior candidates of `chain[lo..=hi]` for the first one whose
/// circumcircle with the sub-chain base is empty of all other candidates.
fn select_apex(chain: &[Point], lo: usize, hi: usize) -> Result<usize, TriangulationError> {
    let start = chain[lo];
    let end = chain[hi];

    'candidates: for ci in lo + 1..hi {
        let c = chain[ci];
        if c.classify(start, end).is_colinear() {
            continue;
        }
        for di in lo + 1..hi {
            if di == ci {
                continue;
            }
            if math::in_circle_any(start, end, c, chain[di]) {
                continue 'candidates;
            }
        }
        return Ok(ci);
    }

    Err(TriangulationError::AllPointsColinear)
}
