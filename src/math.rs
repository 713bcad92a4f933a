use crate::Point;

/// 2D cross product of (b - a) and (c - a); positive when `c` is to the left
/// of the directed line a -> b.
#[inline]
pub(crate) fn cross(a: Point, b: Point, c: Point) -> f64 {
    (b.x() - a.x()) * (c.y() - a.y()) - (b.y() - a.y()) * (c.x() - a.x())
}

/// True if (a, b, c) wind counterclockwise (strictly).
#[inline]
pub(crate) fn is_ccw(a: Point, b: Point, c: Point) -> bool {
    cross(a, b, c) > 0.0
}

/// True if `p` is strictly right of the directed segment a -> b.
#[inline]
pub(crate) fn right_of(p: Point, a: Point, b: Point) -> bool {
    cross(a, b, p) < 0.0
}

/// True iff `d` lies strictly inside the circle through `a`, `b`, `c`.
///
/// Sign convention requires (a, b, c) in CCW order; use [in_circle_any] when
/// the orientation of the triple is not known.
pub(crate) fn in_circle(a: Point, b: Point, c: Point, d: Point) -> bool {
    // 3x3 cofactor expansion of the lifted-paraboloid determinant
    //   | ax-dx  ay-dy  (ax-dx)^2 + (ay-dy)^2 |
    //   | bx-dx  by-dy  (bx-dx)^2 + (by-dy)^2 |
    //   | cx-dx  cy-dy  (cx-dx)^2 + (cy-dy)^2 |
    let adx = a.x() - d.x();
    let ady = a.y() - d.y();
    let bdx = b.x() - d.x();
    let bdy = b.y() - d.y();
    let cdx = c.x() - d.x();
    let cdy = c.y() - d.y();

    let alift = adx * adx + ady * ady;
    let blift = bdx * bdx + bdy * bdy;
    let clift = cdx * cdx + cdy * cdy;

    let det = alift * (bdx * cdy - cdx * bdy)
        - blift * (adx * cdy - cdx * ady)
        + clift * (adx * bdy - bdx * ady);
    det > 0.0
}

/// [in_circle] with the (a, b, c) orientation normalized first. Degenerate
/// (colinear) triples contain no interior points.
pub(crate) fn in_circle_any(a: Point, b: Point, c: Point, d: Point) -> bool {
    let orientation = cross(a, b, c);
    if orientation > 0.0 {
        in_circle(a, b, c, d)
    } else if orientation < 0.0 {
        in_circle(a, c, b, d)
    } else {
        false
    }
}

/// Squared distance from `p` to the closed segment a -> b.
pub(crate) fn distance_squared_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let abx = b.x() - a.x();
    let aby = b.y() - a.y();
    let apx = p.x() - a.x();
    let apy = p.y() - a.y();
    let len_sq = abx * abx + aby * aby;
    if len_sq == 0.0 {
        return apx * apx + apy * apy;
    }
    let t = ((apx * abx + apy * aby) / len_sq).clamp(0.0, 1.0);
    let cx = a.x() + t * abx;
    let cy = a.y() + t * aby;
    let dx = p.x() - cx;
    let dy = p.y() - cy;
    dx * dx + dy * dy
}

/// True iff segments a -> b and c -> d properly cross: each segment's
/// endpoints lie on strictly opposite sides of the other. Shared endpoints
/// and colinear overlaps do not count.
pub(crate) fn segments_cross(a: Point, b: Point, c: Point, d: Point) -> bool {
    let d1 = cross(a, b, c);
    let d2 = cross(a, b, d);
    let d3 = cross(c, d, a);
    let d4 = cross(c, d, b);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}
