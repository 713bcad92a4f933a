use std::collections::HashSet;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{frame_for_extent, math, Point, PointKey, Subdivision, WalkControl};

pub fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// Builds a subdivision whose frame is derived from the extent of `points`,
/// with all of them inserted as sites.
pub fn subdivision_for(points: &[Point]) -> Subdivision {
    let mut min = p(f64::MAX, f64::MAX);
    let mut max = p(f64::MIN, f64::MIN);
    for q in points {
        min = p(min.x().min(q.x()), min.y().min(q.y()));
        max = p(max.x().max(q.x()), max.y().max(q.y()));
    }
    let [a, b, c] = frame_for_extent(min, max);
    let mut subdivision = Subdivision::new(a, b, c);
    for &site in points {
        subdivision.insert_site(site).expect("site insertion failed");
    }
    subdivision
}

pub fn regular_polygon(n: usize, radius: f64) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let theta = std::f64::consts::PI * 2.0 * (i as f64) / (n as f64);
            let (sin, cos) = theta.sin_cos();
            p(cos * radius, sin * radius)
        })
        .collect()
}

/// Deterministic pseudo-random site cloud.
pub fn random_points(n: usize, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| p(rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0)))
        .collect()
}

pub fn assert_valid(subdivision: &Subdivision) {
    let violations = subdivision.validate();
    assert!(
        violations.is_empty(),
        "subdivision has {} violation(s): {:?}",
        violations.len(),
        violations
    );
}

/// All live undirected edges as normalized key pairs.
pub fn edge_set(subdivision: &Subdivision) -> HashSet<(PointKey, PointKey)> {
    let mut edges = HashSet::new();
    subdivision.walk_all_edges(|a, b| {
        edges.insert(normalized(a, b));
        WalkControl::Continue
    });
    edges
}

pub fn has_edge(subdivision: &Subdivision, a: Point, b: Point) -> bool {
    edge_set(subdivision).contains(&normalized(a, b))
}

fn normalized(a: Point, b: Point) -> (PointKey, PointKey) {
    let (ka, kb) = (a.key(), b.key());
    if ka <= kb {
        (ka, kb)
    } else {
        (kb, ka)
    }
}

/// Checks the Delaunay property: no mesh vertex lies strictly inside the
/// circumcircle of any interior face. The outer face (the CW-wound frame
/// triple) is skipped — its "circumcircle" encloses the whole mesh.
pub fn delaunay_holds(subdivision: &Subdivision) -> bool {
    let mut vertices: HashSet<PointKey> = HashSet::new();
    let mut points = Vec::new();
    subdivision.walk_all_edges(|a, b| {
        for q in [a, b] {
            if vertices.insert(q.key()) {
                points.push(q);
            }
        }
        WalkControl::Continue
    });

    let mut ok = true;
    subdivision.walk_all_triangle_edges(|[a, b, c]| {
        if math::is_ccw(a, b, c) {
            for &v in &points {
                if v == a || v == b || v == c {
                    continue;
                }
                if math::in_circle(a, b, c, v) {
                    ok = false;
                    return WalkControl::Stop;
                }
            }
        }
        WalkControl::Continue
    });
    ok
}

/// True when no two distinct edges of the mesh properly cross.
pub fn no_crossing_edges(subdivision: &Subdivision) -> bool {
    let mut pairs: Vec<(Point, Point)> = Vec::new();
    subdivision.walk_all_edges(|a, b| {
        pairs.push((a, b));
        WalkControl::Continue
    });
    for (i, &(a, b)) in pairs.iter().enumerate() {
        for &(c, d) in &pairs[i + 1..] {
            if math::segments_cross(a, b, c, d) {
                return false;
            }
        }
    }
    true
}
