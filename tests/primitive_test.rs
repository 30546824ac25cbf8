//! Tests for primitive B-Rep solid constructors.

use shapegen::error::KernelError;
use shapegen::math::Point2;
use shapegen::primitive::*;
use shapegen::topo::*;

fn counts(store: &TopoStore, solid: SolidId) -> (usize, usize, usize) {
    (
        store.solid_vertices(solid).len(),
        store.solid_edges(solid).len(),
        store.solid_face_count(solid),
    )
}

fn assert_valid(store: &TopoStore, solid: SolidId, label: &str) {
    let result = validate_solid(store, solid);
    assert!(result.valid, "{label} topology should be valid: {:?}", result.errors);
}

#[test]
fn box_counts_and_validity() {
    let mut store = TopoStore::new();
    let solid = make_box(&mut store, 5.0, 3.0, 8.0).unwrap();
    assert_eq!(counts(&store, solid), (8, 12, 6));
    assert_valid(&store, solid, "box");
}

#[test]
fn box_vertex_positions() {
    let mut store = TopoStore::new();
    let solid = make_box(&mut store, 5.0, 3.0, 8.0).unwrap();
    for vid in store.solid_vertices(solid) {
        let p = store.vertex(vid).point;
        assert!((p.x.abs() - 5.0).abs() < 1e-12, "box vertex x should be ±5: {p}");
        assert!((p.y.abs() - 3.0).abs() < 1e-12);
        assert!((p.z.abs() - 8.0).abs() < 1e-12);
    }
}

#[test]
fn sphere_counts_and_validity() {
    let mut store = TopoStore::new();
    let solid = make_sphere(&mut store, 10.0).unwrap();
    assert_eq!(counts(&store, solid), (2, 2, 2));
    assert_valid(&store, solid, "sphere");
}

#[test]
fn cylinder_counts_and_validity() {
    let mut store = TopoStore::new();
    let solid = make_cylinder(&mut store, 5.0, 10.0).unwrap();
    assert_eq!(counts(&store, solid), (4, 6, 4));
    assert_valid(&store, solid, "cylinder");
}

#[test]
fn cone_counts_and_validity() {
    let mut store = TopoStore::new();
    let solid = make_cone(&mut store, 5.0, 0.0, 10.0).unwrap();
    assert_eq!(counts(&store, solid), (3, 4, 3));
    assert_valid(&store, solid, "cone");
}

#[test]
fn frustum_counts_and_validity() {
    let mut store = TopoStore::new();
    let solid = make_cone(&mut store, 5.0, 2.0, 10.0).unwrap();
    assert_eq!(counts(&store, solid), (4, 6, 4));
    assert_valid(&store, solid, "frustum");
}

#[test]
fn several_solids_share_one_store() {
    let mut store = TopoStore::new();
    let a = make_box(&mut store, 1.0, 1.0, 1.0).unwrap();
    let b = make_sphere(&mut store, 1.0).unwrap();
    assert_valid(&store, a, "box");
    assert_valid(&store, b, "sphere");
    assert_eq!(counts(&store, b), (2, 2, 2));
}

#[test]
fn degenerate_dimensions_are_rejected() {
    let mut store = TopoStore::new();
    for result in [
        make_box(&mut store, 0.0, 1.0, 1.0),
        make_sphere(&mut store, -2.0),
        make_cylinder(&mut store, 1.0, f64::INFINITY),
        make_cone(&mut store, 1.0, 0.0, 0.0),
    ] {
        assert!(matches!(result, Err(KernelError::InvalidDimension { .. })));
    }
}

#[test]
fn revolved_rectangle_matches_cylinder_topology() {
    let mut store = TopoStore::new();
    let profile = [
        Point2::new(0.0, 0.0),
        Point2::new(3.0, 0.0),
        Point2::new(3.0, 7.0),
        Point2::new(0.0, 7.0),
    ];
    let solid = make_revolved(&mut store, &profile).unwrap();
    assert_eq!(counts(&store, solid), (4, 6, 4));
    assert_valid(&store, solid, "revolved rectangle");
}

#[test]
fn revolved_triangle_matches_cone_topology() {
    let mut store = TopoStore::new();
    let profile = [
        Point2::new(0.0, 0.0),
        Point2::new(0.0, 4.0),
        Point2::new(2.0, 0.0),
    ];
    let solid = make_revolved(&mut store, &profile).unwrap();
    assert_eq!(counts(&store, solid), (3, 4, 3));
    assert_valid(&store, solid, "revolved triangle");
}

#[test]
fn revolved_stepped_profile_is_valid() {
    // A shaft with a shoulder: the step becomes two half-annulus faces.
    let mut store = TopoStore::new();
    let profile = [
        Point2::new(0.0, 0.0),
        Point2::new(4.0, 0.0),
        Point2::new(4.0, 2.0),
        Point2::new(2.0, 2.0),
        Point2::new(2.0, 6.0),
        Point2::new(0.0, 6.0),
    ];
    let solid = make_revolved(&mut store, &profile).unwrap();
    assert_valid(&store, solid, "stepped shaft");
    let (v, e, f) = counts(&store, solid);
    assert_eq!(v as i64 - e as i64 + f as i64, 2);
    assert_eq!(f, 8);
}

#[test]
fn ring_profile_is_rejected() {
    let mut store = TopoStore::new();
    let profile = [
        Point2::new(1.0, 0.0),
        Point2::new(2.0, 0.0),
        Point2::new(2.0, 1.0),
        Point2::new(1.0, 1.0),
    ];
    assert!(matches!(
        make_revolved(&mut store, &profile),
        Err(KernelError::InvalidProfile(_))
    ));
}

#[test]
fn profile_crossing_axis_is_rejected() {
    let mut store = TopoStore::new();
    let profile = [
        Point2::new(0.0, 0.0),
        Point2::new(2.0, 0.0),
        Point2::new(-1.0, 3.0),
        Point2::new(0.0, 3.0),
    ];
    assert!(make_revolved(&mut store, &profile).is_err());
}
