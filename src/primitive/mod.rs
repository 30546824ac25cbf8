//! Primitive solid constructors.
//!
//! Each function builds a complete B-Rep solid (topology + geometry) in a `TopoStore`.
//! Dimensions must be finite and positive; anything else is refused with
//! [`KernelError::InvalidDimension`].

mod box3;
mod cone;
mod cylinder;
mod revolve;
mod sphere;

pub use box3::make_box;
pub use cone::make_cone;
pub use cylinder::{make_cylinder, make_cylinder_between};
pub use revolve::make_revolved;
pub use sphere::make_sphere;

use crate::error::{KernelError, KernelResult};
use crate::math::{Point3, Vector3};
use crate::surface::Surface;

fn check_positive(name: &'static str, value: f64) -> KernelResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(KernelError::InvalidDimension { name, value })
    }
}

/// Whether the surface normal at `point` agrees with the expected outward direction.
fn normal_agrees(surface: &Surface, point: &Point3, outward_dir: &Vector3) -> bool {
    let (u, v) = surface.closest_parameters(point);
    surface.normal(u, v).dot(outward_dir) > 0.0
}
