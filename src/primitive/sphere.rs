//! Sphere primitive.
//!
//! Two hemisphere faces share the equator, which is split into two half-circle
//! arcs between a pair of antipodal vertices on the X axis.
//! Euler: V(2) - E(2) + F(2) = 2

use super::check_positive;
use crate::curve::Curve3;
use crate::error::KernelResult;
use crate::math::Point3;
use crate::surface::Surface;
use crate::topo::*;
use std::f64::consts::{PI, TAU};

/// Create a sphere centered at the origin with the given radius.
///
/// The upper hemisphere's wire runs counter-clockwise around +Z; the lower
/// hemisphere traverses the same arcs in reverse.
pub fn make_sphere(store: &mut TopoStore, radius: f64) -> KernelResult<SolidId> {
    check_positive("radius", radius)?;

    let v0 = store.add_vertex(Point3::new(radius, 0.0, 0.0));
    let v1 = store.add_vertex(Point3::new(-radius, 0.0, 0.0));

    let e_front = store.add_edge(Edge {
        curve: Curve3::circle_z(0.0, radius),
        t_start: 0.0,
        t_end: PI,
        start: v0,
        end: v1,
    });
    let e_back = store.add_edge(Edge {
        curve: Curve3::circle_z(0.0, radius),
        t_start: PI,
        t_end: TAU,
        start: v1,
        end: v0,
    });

    let surface = Surface::Sphere {
        center: Point3::origin(),
        radius,
    };

    let upper = store.add_face_with_wire(surface.clone(), &[(e_front, true), (e_back, true)], true);
    let lower = store.add_face_with_wire(surface, &[(e_back, false), (e_front, false)], true);

    Ok(store.add_solid(vec![upper, lower]))
}
