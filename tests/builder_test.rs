//! Tests for the shape builder: parameter handling and cone strategies.

use approx::assert_relative_eq;
use shapegen::tessellate::tessellate_solid;
use shapegen::topo::validate_solid;
use shapegen::{build, build_with, BuildOptions, ConeStrategy, Error, Model, Parameters, TessSettings};

fn full_parameters() -> Parameters {
    Parameters::default()
        .with_size(10.0)
        .with_radius(5.0)
        .with_height(10.0)
}

/// Signed volume of the tessellation, via the divergence theorem.
fn mesh_volume(model: &Model) -> f64 {
    let mesh = tessellate_solid(model.store(), model.solid(), &TessSettings::default());
    (0..mesh.triangle_count())
        .map(|i| {
            let [a, b, c] = mesh.triangle(i);
            a.dot(&b.cross(&c)) / 6.0
        })
        .sum()
}

#[test]
fn every_shape_builds_a_valid_solid() {
    for name in ["cube", "sphere", "cylinder", "cone"] {
        let model = build(name, &full_parameters()).unwrap();
        assert_eq!(model.kind().name(), name);
        let result = validate_solid(model.store(), model.solid());
        assert!(result.valid, "{name}: {:?}", result.errors);
    }
}

#[test]
fn missing_parameter_for_every_shape() {
    for (name, parameter) in [
        ("cube", "size"),
        ("sphere", "size"),
        ("cylinder", "radius"),
        ("cone", "radius"),
    ] {
        match build(name, &Parameters::default()) {
            Err(Error::MissingParameter { shape, parameter: p }) => {
                assert_eq!(shape, name);
                assert_eq!(p, parameter);
            }
            other => panic!("{name}: expected MissingParameter, got {other:?}"),
        }
    }
}

#[test]
fn cone_without_height() {
    let params = Parameters::default().with_radius(5.0);
    assert!(matches!(
        build("cone", &params),
        Err(Error::MissingParameter {
            shape: "cone",
            parameter: "height"
        })
    ));
}

#[test]
fn unknown_shape() {
    match build("pyramid", &full_parameters()) {
        Err(Error::UnknownShape(id)) => assert_eq!(id, "pyramid"),
        other => panic!("expected UnknownShape, got {other:?}"),
    }
}

#[test]
fn cube_is_centered_with_edge_size() {
    let model = build("cube", &Parameters::default().with_size(4.0)).unwrap();
    for vid in model.store().solid_vertices(model.solid()) {
        let p = model.store().vertex(vid).point;
        assert_relative_eq!(p.x.abs(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(p.y.abs(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(p.z.abs(), 2.0, epsilon = 1e-12);
    }
    assert_relative_eq!(mesh_volume(&model), 64.0, epsilon = 1e-9);
}

#[test]
fn sphere_size_is_the_diameter() {
    let model = build("sphere", &Parameters::default().with_size(10.0)).unwrap();
    for vid in model.store().solid_vertices(model.solid()) {
        let p = model.store().vertex(vid).point;
        assert_relative_eq!(p.coords.norm(), 5.0, epsilon = 1e-12);
    }
    let exact = 4.0 / 3.0 * std::f64::consts::PI * 125.0;
    assert_relative_eq!(mesh_volume(&model), exact, max_relative = 0.03);
}

#[test]
fn cylinder_is_centered_on_the_origin() {
    let params = Parameters::default().with_radius(2.0).with_height(5.0);
    let model = build("cylinder", &params).unwrap();
    for vid in model.store().solid_vertices(model.solid()) {
        let p = model.store().vertex(vid).point;
        assert_relative_eq!(p.z.abs(), 2.5, epsilon = 1e-12);
        assert_relative_eq!(p.x.abs(), 2.0, epsilon = 1e-12);
    }
}

#[test]
fn cylinder_volume() {
    let params = Parameters::default().with_radius(2.0).with_height(5.0);
    let model = build("cylinder", &params).unwrap();
    let exact = std::f64::consts::PI * 4.0 * 5.0;
    assert_relative_eq!(mesh_volume(&model), exact, max_relative = 0.03);
}

#[test]
fn cone_strategies_agree() {
    let params = Parameters::default().with_radius(5.0).with_height(10.0);
    let primitive = build("cone", &params).unwrap();
    let revolved = build_with(
        "cone",
        &params,
        &BuildOptions {
            cone_strategy: ConeStrategy::Revolve,
        },
    )
    .unwrap();

    assert_eq!(primitive.vertex_count(), 3);
    assert_eq!(primitive.edge_count(), 4);
    assert_eq!(primitive.face_count(), 3);
    assert_eq!(revolved.vertex_count(), primitive.vertex_count());
    assert_eq!(revolved.edge_count(), primitive.edge_count());
    assert_eq!(revolved.face_count(), primitive.face_count());

    let settings = TessSettings::default();
    let a = tessellate_solid(primitive.store(), primitive.solid(), &settings)
        .bounds()
        .unwrap();
    let b = tessellate_solid(revolved.store(), revolved.solid(), &settings)
        .bounds()
        .unwrap();
    for i in 0..3 {
        assert_relative_eq!(a.min[i], b.min[i], epsilon = 1e-9);
        assert_relative_eq!(a.max[i], b.max[i], epsilon = 1e-9);
    }
    assert_relative_eq!(a.min.x, -5.0, epsilon = 1e-9);
    assert_relative_eq!(a.max.x, 5.0, epsilon = 1e-9);
    assert_relative_eq!(a.min.z, 0.0, epsilon = 1e-9);
    assert_relative_eq!(a.max.z, 10.0, epsilon = 1e-9);

    let exact = std::f64::consts::PI * 25.0 * 10.0 / 3.0;
    assert_relative_eq!(mesh_volume(&primitive), exact, max_relative = 0.03);
    assert_relative_eq!(mesh_volume(&revolved), exact, max_relative = 0.03);
}

#[test]
fn apex_sits_on_the_axis_at_height() {
    let params = Parameters::default().with_radius(3.0).with_height(7.0);
    let model = build("cone", &params).unwrap();
    let apex = model
        .store()
        .solid_vertices(model.solid())
        .into_iter()
        .map(|v| model.store().vertex(v).point)
        .find(|p| p.z > 1.0)
        .unwrap();
    assert_relative_eq!(apex.x, 0.0, epsilon = 1e-12);
    assert_relative_eq!(apex.y, 0.0, epsilon = 1e-12);
    assert_relative_eq!(apex.z, 7.0, epsilon = 1e-12);
}
