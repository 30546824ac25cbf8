//! Linear algebra type aliases and geometric tolerances.

pub type Point3 = nalgebra::Point3<f64>;
pub type Point2 = nalgebra::Point2<f64>;
pub type Vector3 = nalgebra::Vector3<f64>;

/// Geometric tolerance for point coincidence tests (distance in model units).
pub const TOLERANCE: f64 = 1e-9;

/// Compute an orthonormal frame (e1, e2) in the plane perpendicular to `n`.
///
/// `e1 × e2` points along `n`, so a loop that is counter-clockwise in
/// (e1, e2) coordinates winds counter-clockwise around `n`.
pub fn plane_frame(n: &Vector3) -> (Vector3, Vector3) {
    let a = n.normalize();
    let seed = if a.x.abs() < 0.9 {
        Vector3::new(1.0, 0.0, 0.0)
    } else {
        Vector3::new(0.0, 1.0, 0.0)
    };
    let e1 = a.cross(&seed).normalize();
    let e2 = a.cross(&e1);
    (e1, e2)
}
