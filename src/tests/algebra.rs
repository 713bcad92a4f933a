use proptest::prelude::*;

use super::util::{self, p};
use crate::quadedge::EdgePool;

#[test]
fn rotation_group() {
    let mut pool = EdgePool::new();
    let e = pool.make_edge(p(0.0, 0.0), p(1.0, 0.0));

    assert_eq!(e.rot().rot().rot().rot(), e);
    assert_eq!(e.sym().sym(), e);
    assert_eq!(e.rot().sym(), e.sym().rot());
    assert_eq!(e.inv_rot(), e.rot().rot().rot());
    assert_eq!(e.rot().inv_rot(), e);
    assert!(e.is_primal());
    assert!(!e.rot().is_primal());
}

#[test]
fn make_edge_is_isolated() {
    let mut pool = EdgePool::new();
    let e = pool.make_edge(p(0.0, 0.0), p(1.0, 0.0));

    assert_eq!(pool.onext(e), e);
    assert_eq!(pool.onext(e.sym()), e.sym());
    assert_eq!(pool.org(e), p(0.0, 0.0));
    assert_eq!(pool.dest(e), p(1.0, 0.0));
    // An isolated edge bounds a single face on both sides
    assert_eq!(pool.lnext(e), e.sym());
    assert_eq!(pool.lnext(e.sym()), e);
}

#[test]
fn splice_is_involution() {
    let mut pool = EdgePool::new();
    let origin = p(0.0, 0.0);
    let a = pool.make_edge(origin, p(1.0, 0.0));
    let b = pool.make_edge(origin, p(0.0, 1.0));

    pool.splice(a, b);
    assert_eq!(pool.onext(a), b);
    assert_eq!(pool.onext(b), a);

    pool.splice(a, b);
    assert_eq!(pool.onext(a), a);
    assert_eq!(pool.onext(b), b);
}

#[test]
fn connect_closes_triangle() {
    let mut pool = EdgePool::new();
    let a = p(0.0, 0.0);
    let b = p(10.0, 0.0);
    let c = p(5.0, 8.0);

    let ea = pool.make_edge(a, b);
    let eb = pool.make_edge(b, c);
    pool.splice(ea.sym(), eb);
    let ec = pool.connect(eb, ea);

    assert_eq!(pool.org(ec), c);
    assert_eq!(pool.dest(ec), a);
    assert_eq!(pool.lnext(ea), eb);
    assert_eq!(pool.lnext(eb), ec);
    assert_eq!(pool.lnext(ec), ea);
}

#[test]
fn delete_tombstones_and_recycles() {
    let mut pool = EdgePool::new();
    let a = pool.make_edge(p(0.0, 0.0), p(1.0, 0.0));
    let b = pool.make_edge(p(2.0, 0.0), p(3.0, 0.0));
    assert_eq!(pool.live_count(), 2);

    pool.delete_edge(a);
    assert_eq!(pool.live_count(), 1);
    assert!(!pool.is_alive(a));
    assert!(pool.is_alive(b));

    // The freed slot is reused by the next allocation
    let c = pool.make_edge(p(4.0, 0.0), p(5.0, 0.0));
    assert_eq!(c.quad(), a.quad());
    assert!(pool.is_alive(c));
    assert_eq!(pool.live_count(), 2);
}

proptest! {
    #[test]
    fn algebra_laws_hold_on_random_meshes(
        coords in prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 3..30)
    ) {
        let points: Vec<_> = coords.into_iter().map(|(x, y)| p(x, y)).collect();
        let subdivision = util::subdivision_for(&points);

        let edges: Vec<_> = subdivision.pool.primal_edges().collect();
        for e0 in edges {
            for &e in &[e0, e0.sym()] {
                prop_assert_eq!(e.sym().sym(), e);
                prop_assert_eq!(e.rot().rot().rot().rot(), e);
                prop_assert_eq!(e.rot().sym(), e.sym().rot());
                // The onext ring never changes origin
                prop_assert_eq!(subdivision.org(subdivision.onext(e)), subdivision.org(e));
                // The next/prev operators invert each other around every ring
                prop_assert_eq!(subdivision.oprev(subdivision.onext(e)), e);
                prop_assert_eq!(subdivision.lnext(subdivision.lprev(e)), e);
                prop_assert_eq!(subdivision.rprev(subdivision.rnext(e)), e);
                prop_assert_eq!(subdivision.dnext(subdivision.dprev(e)), e);
            }
        }
    }
}
