//! Cone and frustum primitive.
//!
//! A frustum has the cylinder's topology: 4 vertices, 6 edges, 4 faces.
//! A pointed cone (`r2 == 0`) collapses the top rim into the apex vertex:
//! V(3) - E(4) + F(3) = 2

use super::cylinder::add_rim;
use super::{check_positive, normal_agrees};
use crate::error::{KernelError, KernelResult};
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::surface::Surface;
use crate::topo::*;

/// Create a cone on the Z axis with its base at z=0.
///
/// `r1` is the bottom radius, `r2` the top radius. `r2 == 0` builds a pointed
/// cone with its apex at `(0, 0, height)`; otherwise a frustum.
pub fn make_cone(store: &mut TopoStore, r1: f64, r2: f64, height: f64) -> KernelResult<SolidId> {
    check_positive("radius", r1)?;
    check_positive("height", height)?;
    if !r2.is_finite() || r2 < 0.0 {
        return Err(KernelError::InvalidDimension {
            name: "top radius",
            value: r2,
        });
    }

    let lateral = lateral_surface(r1, r2, height);
    let outward = normal_agrees(
        &lateral,
        &Point3::new((r1 + r2) * 0.5, 0.0, height * 0.5),
        &Vector3::new(height, 0.0, r1 - r2),
    );

    let v_b0 = store.add_vertex(Point3::new(r1, 0.0, 0.0));
    let v_b1 = store.add_vertex(Point3::new(-r1, 0.0, 0.0));
    let (e_b_front, e_b_back) = add_rim(store, 0.0, r1, v_b0, v_b1);

    let bottom = store.add_face_with_wire(
        Surface::Plane {
            origin: Point3::origin(),
            normal: -Vector3::z(),
        },
        &[(e_b_back, false), (e_b_front, false)],
        true,
    );

    if r2 < TOLERANCE {
        let v_apex = store.add_vertex(Point3::new(0.0, 0.0, height));
        let e_seam0 = store.add_line_edge(v_b0, v_apex);
        let e_seam1 = store.add_line_edge(v_b1, v_apex);

        let front = store.add_face_with_wire(
            lateral.clone(),
            &[(e_b_front, true), (e_seam1, true), (e_seam0, false)],
            outward,
        );
        let back = store.add_face_with_wire(
            lateral,
            &[(e_b_back, true), (e_seam0, true), (e_seam1, false)],
            outward,
        );
        return Ok(store.add_solid(vec![bottom, front, back]));
    }

    let v_t0 = store.add_vertex(Point3::new(r2, 0.0, height));
    let v_t1 = store.add_vertex(Point3::new(-r2, 0.0, height));
    let (e_t_front, e_t_back) = add_rim(store, height, r2, v_t0, v_t1);
    let e_seam0 = store.add_line_edge(v_b0, v_t0);
    let e_seam1 = store.add_line_edge(v_b1, v_t1);

    let top = store.add_face_with_wire(
        Surface::Plane {
            origin: Point3::new(0.0, 0.0, height),
            normal: Vector3::z(),
        },
        &[(e_t_front, true), (e_t_back, true)],
        true,
    );
    let front = store.add_face_with_wire(
        lateral.clone(),
        &[(e_b_front, true), (e_seam1, true), (e_t_front, false), (e_seam0, false)],
        outward,
    );
    let back = store.add_face_with_wire(
        lateral,
        &[(e_b_back, true), (e_seam0, true), (e_t_back, false), (e_seam1, false)],
        outward,
    );

    Ok(store.add_solid(vec![bottom, top, front, back]))
}

/// The surface swept by the slant line from `(r1, 0)` to `(r2, height)`.
fn lateral_surface(r1: f64, r2: f64, height: f64) -> Surface {
    // Equal radii would put the apex at infinity.
    if (r1 - r2).abs() < 1e-10 {
        return Surface::Cylinder {
            origin: Point3::origin(),
            axis: Vector3::z(),
            radius: r1,
        };
    }

    // Apex where the slant lines converge; the axis points from it toward the base.
    let apex_z = r1 * height / (r1 - r2);
    let axis = if r1 > r2 { -Vector3::z() } else { Vector3::z() };
    Surface::Cone {
        apex: Point3::new(0.0, 0.0, apex_z),
        axis,
        half_angle: ((r1 - r2).abs() / height).atan(),
    }
}
