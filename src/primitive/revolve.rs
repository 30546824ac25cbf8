//! Solid of revolution from a closed planar profile.
//!
//! The profile lives in the (x, z) half-plane `x >= 0` and is swept a full
//! turn around the Z axis. Every off-axis profile point becomes a rim of two
//! half-circle arcs. Every profile segment that leaves the axis becomes either
//! a single disk face (horizontal, one end on the axis) or a front/back pair
//! of faces split by two seam lines in the XZ plane.

use super::cylinder::add_rim;
use super::normal_agrees;
use crate::error::{KernelError, KernelResult};
use crate::math::{Point2, Point3, Vector3, TOLERANCE};
use crate::surface::Surface;
use crate::topo::*;
use std::collections::HashMap;

/// Rim of an off-axis profile point, or the single vertex of an on-axis point.
#[derive(Clone, Copy)]
enum Station {
    Axis(VertexId),
    Rim {
        v0: VertexId,
        v1: VertexId,
        front: EdgeId,
        back: EdgeId,
    },
}

/// Revolve a closed profile (x = radius, y = height) around the Z axis.
///
/// The profile must be a simple polygon with `x >= 0`, touching the axis along
/// exactly one segment. A repeated closing point is accepted. Either winding
/// is accepted.
pub fn make_revolved(store: &mut TopoStore, profile: &[Point2]) -> KernelResult<SolidId> {
    let pts = normalize_profile(profile)?;
    let n = pts.len();
    let on_axis = |p: &Point2| p.x == 0.0;

    let mut stations: HashMap<usize, Station> = HashMap::new();
    let mut faces = Vec::new();

    for i in 0..n {
        let (ia, ib) = (i, (i + 1) % n);
        let (a, b) = (pts[ia], pts[ib]);
        if on_axis(&a) && on_axis(&b) {
            continue;
        }

        let dx = b.x - a.x;
        let dz = b.y - a.y;
        let surface = segment_surface(&a, &b);
        let outward = normal_agrees(
            &surface,
            &Point3::new((a.x + b.x) * 0.5, 0.0, (a.y + b.y) * 0.5),
            &Vector3::new(dz, 0.0, -dx),
        );

        // Disks need no seams and no vertex on the axis.
        if dz.abs() < TOLERANCE && (on_axis(&a) || on_axis(&b)) {
            let (rim, leaving_axis) = if on_axis(&a) { (ib, true) } else { (ia, false) };
            if let Station::Rim { front, back, .. } =
                station(store, &mut stations, rim, &pts[rim])
            {
                let wire = if leaving_axis {
                    [(back, false), (front, false)]
                } else {
                    [(front, true), (back, true)]
                };
                faces.push(store.add_face_with_wire(surface, &wire, outward));
            }
            continue;
        }

        let sa = station(store, &mut stations, ia, &a);
        let sb = station(store, &mut stations, ib, &b);
        let (a0, a1) = station_vertices(&sa);
        let (b0, b1) = station_vertices(&sb);
        let seam0 = store.add_line_edge(a0, b0);
        let seam1 = store.add_line_edge(a1, b1);

        let mut front_wire = Vec::with_capacity(4);
        let mut back_wire = Vec::with_capacity(4);
        if let Station::Rim { front, back, .. } = sa {
            front_wire.push((front, true));
            back_wire.push((back, true));
        }
        front_wire.push((seam1, true));
        back_wire.push((seam0, true));
        if let Station::Rim { front, back, .. } = sb {
            front_wire.push((front, false));
            back_wire.push((back, false));
        }
        front_wire.push((seam0, false));
        back_wire.push((seam1, false));

        faces.push(store.add_face_with_wire(surface.clone(), &front_wire, outward));
        faces.push(store.add_face_with_wire(surface, &back_wire, outward));
    }

    Ok(store.add_solid(faces))
}

/// Validate the profile and bring it to a canonical form: counter-clockwise
/// in (x, z), no closing duplicate, no interior points of the axis run, and
/// axis points snapped to exactly `x = 0`.
fn normalize_profile(profile: &[Point2]) -> KernelResult<Vec<Point2>> {
    let invalid = |msg: &str| KernelError::InvalidProfile(msg.to_string());

    if profile.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(invalid("non-finite coordinate"));
    }
    if profile.iter().any(|p| p.x < -TOLERANCE) {
        return Err(invalid("profile crosses the revolution axis"));
    }

    let mut pts: Vec<Point2> = profile
        .iter()
        .map(|p| if p.x < TOLERANCE { Point2::new(0.0, p.y) } else { *p })
        .collect();
    if pts.len() > 1 && (pts[0] - pts[pts.len() - 1]).norm() < TOLERANCE {
        pts.pop();
    }
    if pts.len() < 3 {
        return Err(invalid("at least three points are required"));
    }
    for i in 0..pts.len() {
        if (pts[(i + 1) % pts.len()] - pts[i]).norm() < TOLERANCE {
            return Err(invalid("zero-length segment"));
        }
    }

    if self_intersects(&pts) {
        return Err(invalid("profile intersects itself"));
    }

    let area = signed_area(&pts);
    if area.abs() < TOLERANCE {
        return Err(invalid("profile encloses no area"));
    }
    if area < 0.0 {
        pts.reverse();
    }

    // Collapse the axis run to a single segment.
    let on_axis = |p: &Point2| p.x == 0.0;
    let n = pts.len();
    let keep: Vec<bool> = (0..n)
        .map(|i| !(on_axis(&pts[(i + n - 1) % n]) && on_axis(&pts[i]) && on_axis(&pts[(i + 1) % n])))
        .collect();
    let pts: Vec<Point2> = pts
        .into_iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(p))
        .collect();
    let n = pts.len();

    let axis_segments = (0..n)
        .filter(|&i| on_axis(&pts[i]) && on_axis(&pts[(i + 1) % n]))
        .count();
    if axis_segments != 1 {
        return Err(invalid("profile must touch the axis along exactly one segment"));
    }
    let isolated = (0..n).any(|i| {
        on_axis(&pts[i]) && !on_axis(&pts[(i + n - 1) % n]) && !on_axis(&pts[(i + 1) % n])
    });
    if isolated {
        return Err(invalid("profile touches the axis at an isolated point"));
    }

    Ok(pts)
}

fn signed_area(pts: &[Point2]) -> f64 {
    let n = pts.len();
    let mut area = 0.0;
    for i in 0..n {
        let (p, q) = (pts[i], pts[(i + 1) % n]);
        area += p.x * q.y - q.x * p.y;
    }
    area * 0.5
}

/// True if two non-adjacent segments of the closed polyline touch or cross.
fn self_intersects(pts: &[Point2]) -> bool {
    let n = pts.len();
    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            if segments_touch(&pts[i], &pts[(i + 1) % n], &pts[j], &pts[(j + 1) % n]) {
                return true;
            }
        }
    }
    false
}

fn segments_touch(p1: &Point2, p2: &Point2, q1: &Point2, q2: &Point2) -> bool {
    let orient = |a: &Point2, b: &Point2, c: &Point2| {
        let v = (b - a).perp(&(c - a));
        if v.abs() < TOLERANCE {
            0
        } else if v > 0.0 {
            1
        } else {
            -1
        }
    };
    let within = |a: &Point2, b: &Point2, c: &Point2| {
        c.x >= a.x.min(b.x) - TOLERANCE
            && c.x <= a.x.max(b.x) + TOLERANCE
            && c.y >= a.y.min(b.y) - TOLERANCE
            && c.y <= a.y.max(b.y) + TOLERANCE
    };

    let (d1, d2) = (orient(q1, q2, p1), orient(q1, q2, p2));
    let (d3, d4) = (orient(p1, p2, q1), orient(p1, p2, q2));
    if d1 * d2 < 0 && d3 * d4 < 0 {
        return true;
    }
    (d1 == 0 && within(q1, q2, p1))
        || (d2 == 0 && within(q1, q2, p2))
        || (d3 == 0 && within(p1, p2, q1))
        || (d4 == 0 && within(p1, p2, q2))
}

/// Create the station for profile point `index` on first use.
fn station(
    store: &mut TopoStore,
    stations: &mut HashMap<usize, Station>,
    index: usize,
    p: &Point2,
) -> Station {
    *stations.entry(index).or_insert_with(|| {
        if p.x == 0.0 {
            Station::Axis(store.add_vertex(Point3::new(0.0, 0.0, p.y)))
        } else {
            let v0 = store.add_vertex(Point3::new(p.x, 0.0, p.y));
            let v1 = store.add_vertex(Point3::new(-p.x, 0.0, p.y));
            let (front, back) = add_rim(store, p.y, p.x, v0, v1);
            Station::Rim { v0, v1, front, back }
        }
    })
}

/// Seam endpoints on the +X and -X sides of a station.
fn station_vertices(s: &Station) -> (VertexId, VertexId) {
    match *s {
        Station::Axis(v) => (v, v),
        Station::Rim { v0, v1, .. } => (v0, v1),
    }
}

/// Surface swept by the profile segment `a → b`.
fn segment_surface(a: &Point2, b: &Point2) -> Surface {
    let dx = b.x - a.x;
    let dz = b.y - a.y;

    if dz.abs() < TOLERANCE {
        return Surface::Plane {
            origin: Point3::new(0.0, 0.0, a.y),
            normal: Vector3::new(0.0, 0.0, -dx.signum()),
        };
    }
    if dx.abs() < TOLERANCE {
        return Surface::Cylinder {
            origin: Point3::origin(),
            axis: Vector3::z(),
            radius: a.x,
        };
    }

    let apex_z = a.y - a.x * dz / dx;
    let mid_z = (a.y + b.y) * 0.5;
    let axis = if mid_z > apex_z { Vector3::z() } else { -Vector3::z() };
    Surface::Cone {
        apex: Point3::new(0.0, 0.0, apex_z),
        axis,
        half_angle: (dx.abs() / dz.abs()).atan(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clockwise_profile_is_reversed() {
        let cw = [
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 2.0),
            Point2::new(1.0, 0.0),
        ];
        let pts = normalize_profile(&cw).unwrap();
        assert!(signed_area(&pts) > 0.0);
    }

    #[test]
    fn closing_duplicate_and_axis_run_are_collapsed() {
        let profile = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 2.0),
            Point2::new(0.0, 2.0),
            Point2::new(0.0, 1.0),
            Point2::new(0.0, 0.0),
        ];
        let pts = normalize_profile(&profile).unwrap();
        assert_eq!(pts.len(), 4);
    }

    #[test]
    fn profile_off_the_axis_is_rejected() {
        let ring = [
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(1.0, 1.0),
        ];
        assert!(matches!(
            normalize_profile(&ring),
            Err(KernelError::InvalidProfile(_))
        ));
    }

    #[test]
    fn bow_tie_is_rejected() {
        let profile = [
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 2.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
        ];
        assert!(matches!(
            normalize_profile(&profile),
            Err(KernelError::InvalidProfile(msg)) if msg.contains("intersects")
        ));
    }

    #[test]
    fn negative_radius_is_rejected() {
        let profile = [
            Point2::new(0.0, 0.0),
            Point2::new(-1.0, 0.0),
            Point2::new(0.0, 1.0),
        ];
        assert!(normalize_profile(&profile).is_err());
    }

    #[test]
    fn segment_surfaces() {
        let disk = segment_surface(&Point2::new(0.0, 0.0), &Point2::new(2.0, 0.0));
        assert!(matches!(disk, Surface::Plane { normal, .. } if normal.z < 0.0));

        let wall = segment_surface(&Point2::new(2.0, 0.0), &Point2::new(2.0, 3.0));
        assert!(matches!(wall, Surface::Cylinder { radius, .. } if (radius - 2.0).abs() < 1e-12));

        let slant = segment_surface(&Point2::new(2.0, 0.0), &Point2::new(0.0, 4.0));
        let Surface::Cone { apex, axis, .. } = slant else {
            panic!("expected a conical surface");
        };
        assert!((apex.z - 4.0).abs() < 1e-12);
        assert!(axis.z < 0.0);
    }
}
