//! Surface types for the B-Rep kernel.
//!
//! Each `Face` in the topology carries one `Surface` as its geometric carrier.
//! The surface provides evaluation, derivatives, and normals in parametric space.

use crate::math::{plane_frame, Point3, Vector3};

/// A geometric surface. Carried by topology `Face` entities.
#[derive(Clone, Debug)]
pub enum Surface {
    Plane {
        origin: Point3,
        normal: Vector3,
    },
    Cylinder {
        origin: Point3,
        axis: Vector3,
        radius: f64,
    },
    Cone {
        apex: Point3,
        axis: Vector3,
        half_angle: f64,
    },
    Sphere {
        center: Point3,
        radius: f64,
    },
}

impl Surface {
    /// Evaluate the surface at parameters `(u, v)`.
    ///
    /// Parameter conventions (`e1`, `e2` from [`plane_frame`] of the axis):
    /// - **Plane:** `S(u,v) = origin + u*e1 + v*e2`
    /// - **Cylinder:** `S(u,v) = origin + radius*(cos(u)*e1 + sin(u)*e2) + v*axis`
    /// - **Cone:** `S(u,v) = apex + v*sin(half_angle)*(cos(u)*e1 + sin(u)*e2) + v*cos(half_angle)*axis`
    /// - **Sphere:** `S(u,v) = center + radius*(cos(v)*(cos(u)*e1 + sin(u)*e2) + sin(v)*Z)`
    pub fn evaluate(&self, u: f64, v: f64) -> Point3 {
        match self {
            Surface::Plane { origin, normal } => {
                let (e1, e2) = plane_frame(normal);
                origin + e1 * u + e2 * v
            }
            Surface::Cylinder {
                origin,
                axis,
                radius,
            } => {
                let (e1, e2) = plane_frame(axis);
                origin + (e1 * u.cos() + e2 * u.sin()) * *radius + axis.normalize() * v
            }
            Surface::Cone {
                apex,
                axis,
                half_angle,
            } => {
                let (e1, e2) = plane_frame(axis);
                let a = axis.normalize();
                let r = v * half_angle.sin();
                let h = v * half_angle.cos();
                apex + (e1 * u.cos() + e2 * u.sin()) * r + a * h
            }
            Surface::Sphere { center, radius } => {
                let a = Vector3::z();
                let (e1, e2) = plane_frame(&a);
                center
                    + (e1 * u.cos() + e2 * u.sin()) * (v.cos() * *radius)
                    + a * (v.sin() * *radius)
            }
        }
    }

    /// Partial derivative with respect to `u`.
    pub fn derivative_u(&self, u: f64, v: f64) -> Vector3 {
        match self {
            Surface::Plane { normal, .. } => plane_frame(normal).0,
            Surface::Cylinder { axis, radius, .. } => {
                let (e1, e2) = plane_frame(axis);
                (-e1 * u.sin() + e2 * u.cos()) * *radius
            }
            Surface::Cone {
                axis, half_angle, ..
            } => {
                let (e1, e2) = plane_frame(axis);
                let r = v * half_angle.sin();
                (-e1 * u.sin() + e2 * u.cos()) * r
            }
            Surface::Sphere { radius, .. } => {
                let (e1, e2) = plane_frame(&Vector3::z());
                (-e1 * u.sin() + e2 * u.cos()) * (v.cos() * *radius)
            }
        }
    }

    /// Partial derivative with respect to `v`.
    pub fn derivative_v(&self, u: f64, v: f64) -> Vector3 {
        match self {
            Surface::Plane { normal, .. } => plane_frame(normal).1,
            Surface::Cylinder { axis, .. } => axis.normalize(),
            Surface::Cone {
                axis, half_angle, ..
            } => {
                let (e1, e2) = plane_frame(axis);
                let a = axis.normalize();
                (e1 * u.cos() + e2 * u.sin()) * half_angle.sin() + a * half_angle.cos()
            }
            Surface::Sphere { radius, .. } => {
                let a = Vector3::z();
                let (e1, e2) = plane_frame(&a);
                (e1 * u.cos() + e2 * u.sin()) * (-v.sin() * *radius) + a * (v.cos() * *radius)
            }
        }
    }

    /// Unit surface normal `du × dv` at parameters `(u, v)`.
    pub fn normal(&self, u: f64, v: f64) -> Vector3 {
        let n = self.derivative_u(u, v).cross(&self.derivative_v(u, v));
        let len = n.norm();
        if len > 1e-15 {
            return n / len;
        }
        // Singular points: sphere poles and the cone apex.
        match self {
            Surface::Sphere { .. } => {
                if v > 0.0 {
                    Vector3::z()
                } else {
                    -Vector3::z()
                }
            }
            Surface::Cone { .. } => {
                // The normal direction is constant along a generatrix.
                let n = self.derivative_u(u, 1.0).cross(&self.derivative_v(u, 1.0));
                if n.norm() > 1e-15 {
                    n.normalize()
                } else {
                    Vector3::z()
                }
            }
            _ => Vector3::z(),
        }
    }

    /// Find the parameters `(u, v)` of the given 3D point (point inversion).
    ///
    /// Points on a rotation axis have no defined `u`; 0 is returned.
    pub fn closest_parameters(&self, point: &Point3) -> (f64, f64) {
        match self {
            Surface::Plane { origin, normal } => {
                let (e1, e2) = plane_frame(normal);
                let d = point - origin;
                (d.dot(&e1), d.dot(&e2))
            }
            Surface::Cylinder { origin, axis, .. } => {
                let a = axis.normalize();
                let d = point - origin;
                let v = d.dot(&a);
                let proj = d - a * v;
                let (e1, e2) = plane_frame(axis);
                (proj.dot(&e2).atan2(proj.dot(&e1)), v)
            }
            Surface::Cone {
                apex,
                axis,
                half_angle,
            } => {
                let a = axis.normalize();
                let d = point - apex;
                let d_axial = d.dot(&a);
                let d_radial = d - a * d_axial;
                let cos_a = half_angle.cos();
                let v = if cos_a.abs() > 1e-15 {
                    d_axial / cos_a
                } else {
                    d_radial.norm()
                };
                let (e1, e2) = plane_frame(axis);
                (d_radial.dot(&e2).atan2(d_radial.dot(&e1)), v)
            }
            Surface::Sphere { center, .. } => {
                let d = point - center;
                let a = Vector3::z();
                let (e1, e2) = plane_frame(&a);
                let xy = d - a * d.dot(&a);
                let u = xy.dot(&e2).atan2(xy.dot(&e1));
                let v = d.dot(&a).atan2(xy.norm());
                (u, v)
            }
        }
    }

    /// Radius of the parallel circle at `v`, measured from the rotation axis.
    /// Planes have no parallels and report 0.
    pub fn parallel_radius(&self, v: f64) -> f64 {
        match self {
            Surface::Plane { .. } => 0.0,
            Surface::Cylinder { radius, .. } => *radius,
            Surface::Cone { half_angle, .. } => (v * half_angle.sin()).abs(),
            Surface::Sphere { radius, .. } => radius * v.cos(),
        }
    }
}
