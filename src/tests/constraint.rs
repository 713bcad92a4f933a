use super::util::{self, p};
use crate::{
    CancelFlag, MeshObserver, Point, Subdivision, Triangulator, TriangulationError, WalkControl,
};

fn unit_square() -> Subdivision {
    util::subdivision_for(&[p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)])
}

#[test]
fn diagonal_constraint_in_square() {
    let mut subdivision = unit_square();
    // A square's Delaunay triangulation has one diagonal; force the other
    // if necessary by asking for (0,0)-(1,1) explicitly.
    subdivision.insert_constraint(p(0.0, 0.0), p(1.0, 1.0)).unwrap();

    assert!(util::has_edge(&subdivision, p(0.0, 0.0), p(1.0, 1.0)));
    assert_eq!(subdivision.triangles(false).len(), 2);
    util::assert_valid(&subdivision);
}

#[test]
fn constraint_is_idempotent() {
    let mut subdivision = unit_square();
    subdivision.insert_constraint(p(0.0, 0.0), p(1.0, 1.0)).unwrap();
    let before = util::edge_set(&subdivision);

    subdivision.insert_constraint(p(0.0, 0.0), p(1.0, 1.0)).unwrap();
    assert_eq!(util::edge_set(&subdivision), before);
    util::assert_valid(&subdivision);
}

#[test]
fn existing_edge_constraint_is_a_no_op() {
    let mut subdivision = unit_square();
    let before = util::edge_set(&subdivision);

    // Boundary edges already exist in the Delaunay triangulation
    subdivision.insert_constraint(p(0.0, 0.0), p(1.0, 0.0)).unwrap();
    assert_eq!(util::edge_set(&subdivision), before);
}

#[test]
fn constraint_across_interior_sites() {
    // A column of sites between the constraint endpoints forces a real
    // cavity walk with both chains populated.
    let mut points = vec![p(-10.0, 0.0), p(10.0, 0.0)];
    for i in 0..5 {
        let x = -6.0 + 3.0 * i as f64;
        points.push(p(x, 7.0));
        points.push(p(x, -6.5));
    }
    let mut subdivision = util::subdivision_for(&points);

    subdivision.insert_constraint(p(-10.0, 0.0), p(10.0, 0.0)).unwrap();

    assert!(util::has_edge(&subdivision, p(-10.0, 0.0), p(10.0, 0.0)));
    assert!(util::no_crossing_edges(&subdivision));
    util::assert_valid(&subdivision);
}

#[test]
fn constraint_ring_lookup() {
    let mut subdivision = util::subdivision_for(&util::random_points(40, 23));
    let start = p(-90.0, -90.0);
    let end = p(90.0, 90.0);
    subdivision.insert_site(start).unwrap();
    subdivision.insert_site(end).unwrap();

    subdivision.insert_constraint(start, end).unwrap();

    // The ONext ring at the start vertex now contains an edge to the end
    let e = subdivision.edge_at(start).unwrap();
    assert!(subdivision.ring_contains(e, end));
    util::assert_valid(&subdivision);
}

#[test]
fn constraint_through_colinear_vertex_splits() {
    // The vertex at (3, 0) sits exactly on the constraint segment but is not
    // adjacent to its start, so the crossing walk discovers it mid-cavity
    // and the constraint is inserted as two sub-segments around it.
    let mut subdivision = util::subdivision_for(&[
        p(-10.0, 0.0),
        p(0.0, 5.0),
        p(0.0, -5.0),
        p(3.0, 0.0),
        p(10.0, 0.0),
    ]);
    subdivision.insert_constraint(p(-10.0, 0.0), p(10.0, 0.0)).unwrap();

    assert!(util::has_edge(&subdivision, p(-10.0, 0.0), p(3.0, 0.0)));
    assert!(util::has_edge(&subdivision, p(3.0, 0.0), p(10.0, 0.0)));
    assert!(util::no_crossing_edges(&subdivision));
    util::assert_valid(&subdivision);
}

#[test]
fn unknown_vertices_are_rejected() {
    let mut subdivision = unit_square();
    let before = util::edge_set(&subdivision);

    let err = subdivision
        .insert_constraint(p(0.5, 0.5), p(1.0, 1.0))
        .unwrap_err();
    assert!(matches!(err, TriangulationError::UnknownVertex(_)));

    let err = subdivision
        .insert_constraint(p(0.0, 0.0), p(2.0, 2.0))
        .unwrap_err();
    assert!(matches!(err, TriangulationError::UnknownVertex(_)));

    // Failed calls leave the mesh untouched
    assert_eq!(util::edge_set(&subdivision), before);
}

#[test]
fn batch_constraints_respect_cancellation() {
    let mut subdivision = unit_square();
    let constraints = [(p(0.0, 0.0), p(1.0, 1.0))];

    let cancel = CancelFlag::new();
    cancel.cancel();
    let run = subdivision.insert_constraints(&constraints, &cancel).unwrap();
    assert_eq!(run.completed, 0);
    assert!(run.cancelled);
    assert!(!util::has_edge(&subdivision, p(0.0, 0.0), p(1.0, 1.0)));

    let cancel = CancelFlag::new();
    let run = subdivision.insert_constraints(&constraints, &cancel).unwrap();
    assert_eq!(run.completed, 1);
    assert!(!run.cancelled);
    assert!(util::has_edge(&subdivision, p(0.0, 0.0), p(1.0, 1.0)));
}

#[test]
fn observer_sees_constraints() {
    #[derive(Default)]
    struct Events {
        constraints: usize,
        dropped: usize,
    }
    impl MeshObserver for Events {
        fn constraint_inserted(&mut self, _s: &Subdivision, _a: Point, _b: Point) {
            self.constraints += 1;
        }
        fn constraint_edge_dropped(&mut self, _s: &Subdivision, _a: Point, _b: Point) {
            self.dropped += 1;
        }
    }

    let mut subdivision = unit_square();
    let mut events = Events::default();
    subdivision
        .insert_constraint_with(p(0.0, 0.0), p(1.0, 1.0), &mut events)
        .unwrap();
    assert_eq!(events.constraints, 1);
    assert_eq!(events.dropped, 0);
}

#[test]
fn triangulator_pipeline() {
    let mut triangulator = Triangulator::new();
    for q in [[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0], [2.0, 2.1]] {
        assert!(triangulator.add_site(&q));
    }
    triangulator.add_constraint(&[0.0, 0.0], &[4.0, 4.0]);
    assert!(!triangulator.add_site(&[f64::NAN, 0.0]));

    let subdivision = triangulator.triangulate().unwrap();
    assert!(util::has_edge(&subdivision, p(0.0, 0.0), p(4.0, 4.0)));
    assert!(util::no_crossing_edges(&subdivision));
    util::assert_valid(&subdivision);

    // Every input site survives as a mesh vertex
    for q in [p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 4.0)] {
        assert!(subdivision.edge_at(q).is_some());
    }
}

#[test]
fn triangulator_deduplicates_and_cancels() {
    let mut triangulator = Triangulator::new();
    for _ in 0..3 {
        triangulator.add_site(&[1.0, 1.0]);
    }
    triangulator.add_site(&[2.0, 2.0]);
    triangulator.add_site(&[1.0, 2.0]);

    let subdivision = triangulator.triangulate().unwrap();
    assert_eq!(subdivision.site_count(), 3);

    let cancel = CancelFlag::new();
    cancel.cancel();
    let run = triangulator.triangulate_with(&cancel, &mut ()).unwrap();
    assert!(run.cancelled);
}

#[test]
fn mesh_stays_walkable_during_constraint_heavy_use() {
    // A fan of constraints from one hub, longest first like the
    // triangulator would order them.
    let mut points = vec![p(0.0, 0.0)];
    points.extend(util::regular_polygon(12, 40.0));
    let mut subdivision = util::subdivision_for(&points);

    for q in util::regular_polygon(12, 40.0) {
        subdivision.insert_constraint(p(0.0, 0.0), q).unwrap();
        assert!(util::has_edge(&subdivision, p(0.0, 0.0), q));
    }

    let mut edge_count = 0;
    subdivision.walk_all_edges(|_, _| {
        edge_count += 1;
        WalkControl::Continue
    });
    assert!(edge_count > 12);
    util::assert_valid(&subdivision);
}
