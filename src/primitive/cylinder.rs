//! Cylinder primitive.
//!
//! Each rim is split into two half-circle arcs, and two vertical seam lines
//! split the barrel into front and back halves:
//! 4 vertices, 6 edges (4 arcs + 2 seams), 4 faces (2 barrel + 2 caps).
//! Euler: V(4) - E(6) + F(4) = 2

use super::check_positive;
use crate::curve::Curve3;
use crate::error::KernelResult;
use crate::math::{Point3, Vector3};
use crate::surface::Surface;
use crate::topo::*;
use std::f64::consts::{PI, TAU};

/// Create a cylinder on the Z axis, extending from z=0 to z=height.
pub fn make_cylinder(store: &mut TopoStore, radius: f64, height: f64) -> KernelResult<SolidId> {
    check_positive("height", height)?;
    make_cylinder_between(store, radius, 0.0, height)
}

/// Create a cylinder on the Z axis spanning `z0..z1`.
pub fn make_cylinder_between(store: &mut TopoStore, radius: f64, z0: f64, z1: f64) -> KernelResult<SolidId> {
    check_positive("radius", radius)?;
    check_positive("height", z1 - z0)?;

    // Seam vertices on both rims
    let v_b0 = store.add_vertex(Point3::new(radius, 0.0, z0));
    let v_b1 = store.add_vertex(Point3::new(-radius, 0.0, z0));
    let v_t0 = store.add_vertex(Point3::new(radius, 0.0, z1));
    let v_t1 = store.add_vertex(Point3::new(-radius, 0.0, z1));

    let (e_b_front, e_b_back) = add_rim(store, z0, radius, v_b0, v_b1);
    let (e_t_front, e_t_back) = add_rim(store, z1, radius, v_t0, v_t1);

    let e_seam0 = store.add_line_edge(v_b0, v_t0);
    let e_seam1 = store.add_line_edge(v_b1, v_t1);

    let bottom = store.add_face_with_wire(
        Surface::Plane {
            origin: Point3::new(0.0, 0.0, z0),
            normal: -Vector3::z(),
        },
        &[(e_b_back, false), (e_b_front, false)],
        true,
    );

    let top = store.add_face_with_wire(
        Surface::Plane {
            origin: Point3::new(0.0, 0.0, z1),
            normal: Vector3::z(),
        },
        &[(e_t_front, true), (e_t_back, true)],
        true,
    );

    let barrel = Surface::Cylinder {
        origin: Point3::new(0.0, 0.0, z0),
        axis: Vector3::z(),
        radius,
    };

    // Front barrel: bottom_front → seam1 → top_front_rev → seam0_rev
    let barrel_front = store.add_face_with_wire(
        barrel.clone(),
        &[(e_b_front, true), (e_seam1, true), (e_t_front, false), (e_seam0, false)],
        true,
    );

    // Back barrel: bottom_back → seam0 → top_back_rev → seam1_rev
    let barrel_back = store.add_face_with_wire(
        barrel,
        &[(e_b_back, true), (e_seam0, true), (e_t_back, false), (e_seam1, false)],
        true,
    );

    Ok(store.add_solid(vec![bottom, top, barrel_front, barrel_back]))
}

/// Add the two half-circle arcs of a rim at height `z`: front (+Y side) from
/// `v0` to `v1`, back (-Y side) from `v1` to `v0`.
pub(crate) fn add_rim(
    store: &mut TopoStore,
    z: f64,
    radius: f64,
    v0: VertexId,
    v1: VertexId,
) -> (EdgeId, EdgeId) {
    let front = store.add_edge(Edge {
        curve: Curve3::circle_z(z, radius),
        t_start: 0.0,
        t_end: PI,
        start: v0,
        end: v1,
    });
    let back = store.add_edge(Edge {
        curve: Curve3::circle_z(z, radius),
        t_start: PI,
        t_end: TAU,
        start: v1,
        end: v0,
    });
    (front, back)
}
