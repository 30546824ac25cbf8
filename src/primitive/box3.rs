//! Box primitive: 6 planar faces, 12 edges, 8 vertices.
//!
//! Creates an axis-aligned box centered at the origin with half-extents (hx, hy, hz).
//! Euler: V(8) - E(12) + F(6) = 2

use super::check_positive;
use crate::error::KernelResult;
use crate::math::{Point3, Vector3};
use crate::surface::Surface;
use crate::topo::*;

/// Create an axis-aligned box centered at the origin.
///
/// `hx`, `hy`, `hz` are the half-extents along each axis.
pub fn make_box(store: &mut TopoStore, hx: f64, hy: f64, hz: f64) -> KernelResult<SolidId> {
    check_positive("hx", hx)?;
    check_positive("hy", hy)?;
    check_positive("hz", hz)?;

    let v = [
        store.add_vertex(Point3::new(-hx, -hy, -hz)), // 0: ---
        store.add_vertex(Point3::new( hx, -hy, -hz)), // 1: +--
        store.add_vertex(Point3::new( hx,  hy, -hz)), // 2: ++-
        store.add_vertex(Point3::new(-hx,  hy, -hz)), // 3: -+-
        store.add_vertex(Point3::new(-hx, -hy,  hz)), // 4: --+
        store.add_vertex(Point3::new( hx, -hy,  hz)), // 5: +-+
        store.add_vertex(Point3::new( hx,  hy,  hz)), // 6: +++
        store.add_vertex(Point3::new(-hx,  hy,  hz)), // 7: -++
    ];

    // Bottom ring (z = -hz)
    let e0 = store.add_line_edge(v[0], v[1]);
    let e1 = store.add_line_edge(v[1], v[2]);
    let e2 = store.add_line_edge(v[2], v[3]);
    let e3 = store.add_line_edge(v[3], v[0]);

    // Top ring (z = +hz)
    let e4 = store.add_line_edge(v[4], v[5]);
    let e5 = store.add_line_edge(v[5], v[6]);
    let e6 = store.add_line_edge(v[6], v[7]);
    let e7 = store.add_line_edge(v[7], v[4]);

    // Verticals
    let e8 = store.add_line_edge(v[0], v[4]);
    let e9 = store.add_line_edge(v[1], v[5]);
    let e10 = store.add_line_edge(v[2], v[6]);
    let e11 = store.add_line_edge(v[3], v[7]);

    let plane = |origin: Point3, normal: Vector3| Surface::Plane { origin, normal };

    // Bottom: ring reversed so it runs CCW seen from -Z.
    let bottom = store.add_face_with_wire(
        plane(Point3::new(0.0, 0.0, -hz), -Vector3::z()),
        &[(e3, false), (e2, false), (e1, false), (e0, false)],
        true,
    );
    let top = store.add_face_with_wire(
        plane(Point3::new(0.0, 0.0, hz), Vector3::z()),
        &[(e4, true), (e5, true), (e6, true), (e7, true)],
        true,
    );
    let front = store.add_face_with_wire(
        plane(Point3::new(0.0, -hy, 0.0), -Vector3::y()),
        &[(e0, true), (e9, true), (e4, false), (e8, false)],
        true,
    );
    let back = store.add_face_with_wire(
        plane(Point3::new(0.0, hy, 0.0), Vector3::y()),
        &[(e2, true), (e11, true), (e6, false), (e10, false)],
        true,
    );
    let right = store.add_face_with_wire(
        plane(Point3::new(hx, 0.0, 0.0), Vector3::x()),
        &[(e1, true), (e10, true), (e5, false), (e9, false)],
        true,
    );
    let left = store.add_face_with_wire(
        plane(Point3::new(-hx, 0.0, 0.0), -Vector3::x()),
        &[(e3, true), (e8, true), (e7, false), (e11, false)],
        true,
    );

    Ok(store.add_solid(vec![bottom, top, front, back, right, left]))
}
