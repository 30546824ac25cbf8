//! 3D curve types carried by topology edges.

use crate::math::{Point3, Vector3};

/// A geometric curve in 3D space. Carried by topology `Edge` entities.
#[derive(Clone, Debug)]
pub enum Curve3 {
    /// `C(t) = origin + t * dir`.
    Line { origin: Point3, dir: Vector3 },
    /// `C(t) = center + radius * (cos(t) * ref_dir + sin(t) * (axis × ref_dir))`.
    ///
    /// `ref_dir` is a unit vector perpendicular to `axis`; it fixes where `t = 0` lies.
    Circle {
        center: Point3,
        axis: Vector3,
        ref_dir: Vector3,
        radius: f64,
    },
}

impl Curve3 {
    /// Circle around the Z axis at height `z`, with `t = 0` on +X.
    pub fn circle_z(z: f64, radius: f64) -> Self {
        Curve3::Circle {
            center: Point3::new(0.0, 0.0, z),
            axis: Vector3::z(),
            ref_dir: Vector3::x(),
            radius,
        }
    }

    /// Straight line through `a` (t = 0) and `b` (t = 1).
    pub fn segment(a: Point3, b: Point3) -> Self {
        Curve3::Line { origin: a, dir: b - a }
    }

    /// Evaluate the curve at parameter `t`.
    pub fn evaluate(&self, t: f64) -> Point3 {
        match self {
            Curve3::Line { origin, dir } => origin + dir * t,
            Curve3::Circle {
                center,
                axis,
                ref_dir,
                radius,
            } => {
                let (x, y) = circle_frame(axis, ref_dir);
                center + (x * t.cos() + y * t.sin()) * *radius
            }
        }
    }

    /// First derivative (tangent direction, not necessarily unit length).
    pub fn derivative(&self, t: f64) -> Vector3 {
        match self {
            Curve3::Line { dir, .. } => *dir,
            Curve3::Circle {
                axis,
                ref_dir,
                radius,
                ..
            } => {
                let (x, y) = circle_frame(axis, ref_dir);
                (-x * t.sin() + y * t.cos()) * *radius
            }
        }
    }

    /// Find the parameter closest to the given point (point inversion).
    pub fn closest_parameter(&self, point: &Point3) -> f64 {
        match self {
            Curve3::Line { origin, dir } => {
                let d = point - origin;
                d.dot(dir) / dir.dot(dir)
            }
            Curve3::Circle {
                center,
                axis,
                ref_dir,
                ..
            } => {
                let (x, y) = circle_frame(axis, ref_dir);
                let d = point - center;
                let t = d.dot(&y).atan2(d.dot(&x));
                if t < 0.0 {
                    t + std::f64::consts::TAU
                } else {
                    t
                }
            }
        }
    }
}

/// In-plane frame of a circle: `x = ref_dir`, `y = axis × ref_dir`.
pub fn circle_frame(axis: &Vector3, ref_dir: &Vector3) -> (Vector3, Vector3) {
    let a = axis.normalize();
    let x = ref_dir.normalize();
    (x, a.cross(&x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn line_evaluate() {
        let line = Curve3::Line {
            origin: Point3::new(1.0, 0.0, 0.0),
            dir: Vector3::new(2.0, 0.0, 0.0),
        };
        let p = line.evaluate(0.5);
        assert!((p - Point3::new(2.0, 0.0, 0.0)).norm() < 1e-14);
    }

    #[test]
    fn segment_endpoints() {
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(-4.0, 0.5, 9.0);
        let seg = Curve3::segment(a, b);
        assert!((seg.evaluate(0.0) - a).norm() < 1e-14);
        assert!((seg.evaluate(1.0) - b).norm() < 1e-14);
    }

    #[test]
    fn circle_starts_on_ref_dir() {
        let circle = Curve3::circle_z(2.0, 5.0);
        let p = circle.evaluate(0.0);
        assert!((p - Point3::new(5.0, 0.0, 2.0)).norm() < 1e-12);
        let q = circle.evaluate(FRAC_PI_2);
        assert!((q - Point3::new(0.0, 5.0, 2.0)).norm() < 1e-12);
        let r = circle.evaluate(PI);
        assert!((r - Point3::new(-5.0, 0.0, 2.0)).norm() < 1e-12);
    }

    #[test]
    fn circle_tangent_perpendicular_to_radius() {
        let circle = Curve3::circle_z(0.0, 3.0);
        for i in 1..20 {
            let t = 2.0 * PI * i as f64 / 20.0;
            let p = circle.evaluate(t);
            let d = circle.derivative(t);
            let dot = p.coords.dot(&d);
            assert!(dot.abs() < 1e-10, "Tangent should be perpendicular at t={t}");
        }
    }

    #[test]
    fn circle_closest_parameter_roundtrip() {
        let circle = Curve3::circle_z(1.0, 4.0);
        for t in [0.0, 0.7, PI, 4.5] {
            let p = circle.evaluate(t);
            assert!((circle.closest_parameter(&p) - t).abs() < 1e-10);
        }
    }
}
