//! Boundary-first tessellation of B-Rep faces and solids.
//!
//! Every edge is sampled once, from the edge alone, and each face that uses
//! it reuses those samples. Neighbouring faces therefore meet at identical
//! points and the concatenated mesh is closed.
//!
//! Two strategies based on surface type:
//! - **Planar faces**: wire boundary → ear-clip triangulation.
//!   Correctly handles triangles, circles, half-annuli, arbitrary polygons.
//! - **Curved faces**: rows of constant `v` joined by triangle strips
//!   (see [`strips`]).
//!
//! Faces are tessellated in parallel and concatenated in shell order.

mod strips;

use crate::curve::Curve3;
use crate::math::{Point3, Vector3};
use crate::surface::Surface;
use crate::topo::*;
use crate::types::{TessSettings, TriangleMesh};
use rayon::prelude::*;
use std::f64::consts::TAU;
use tracing::debug;

/// Upper bound on segments around a full circle, whatever its radius.
pub const MAX_SEGMENTS_PER_TURN: usize = 720;

/// Upper bound on segments along one seam line.
pub const MAX_LINE_SEGMENTS: usize = 128;

/// Tessellate an entire solid into a single triangle mesh.
pub fn tessellate_solid(store: &TopoStore, solid_id: SolidId, settings: &TessSettings) -> TriangleMesh {
    let faces = store.solid_faces(solid_id);
    let parts: Vec<TriangleMesh> = faces
        .par_iter()
        .map(|&face_id| tessellate_face(store, face_id, settings))
        .collect();

    let mut mesh = TriangleMesh::default();
    for part in parts {
        mesh.append(part);
    }
    debug!(
        faces = faces.len(),
        triangles = mesh.triangle_count(),
        "tessellated solid"
    );
    mesh
}

/// Tessellate a single face. Zero-area triangles are dropped.
pub fn tessellate_face(store: &TopoStore, face_id: FaceId, settings: &TessSettings) -> TriangleMesh {
    let face = store.face(face_id);
    let (verts, normals, indices) = if matches!(&face.surface, Surface::Plane { .. }) {
        tessellate_planar_face(store, face_id, &face.surface, face.outward, settings)
    } else {
        strips::tessellate_curved_face(store, face_id, &face.surface, face.outward, settings)
    };

    let indices = indices
        .chunks_exact(3)
        .filter(|tri| {
            let (a, b, c) = (
                verts[tri[0] as usize],
                verts[tri[1] as usize],
                verts[tri[2] as usize],
            );
            (b - a).cross(&(c - a)).norm() > 1e-18
        })
        .flatten()
        .copied()
        .collect();

    TriangleMesh {
        vertices: verts,
        normals,
        indices,
    }
}

// ─── Planar face tessellation (ear clipping) ────────────────────────────────

/// Tessellate a planar face by discretizing its wire boundary and ear-clipping.
fn tessellate_planar_face(
    store: &TopoStore,
    face_id: FaceId,
    surface: &Surface,
    outward: bool,
    settings: &TessSettings,
) -> (Vec<Vector3>, Vec<Vector3>, Vec<u32>) {
    let boundary_3d = wire_points(store, face_id, true, settings);
    if boundary_3d.len() < 3 {
        return (vec![], vec![], vec![]);
    }

    // Project to (u,v)
    let boundary_uv: Vec<(f64, f64)> = boundary_3d
        .iter()
        .map(|pt| surface.closest_parameters(pt))
        .collect();

    // Constant normal for the plane
    let mut normal = surface.normal(boundary_uv[0].0, boundary_uv[0].1);
    if !outward {
        normal = -normal;
    }

    let verts: Vec<Vector3> = boundary_3d.iter().map(|pt| pt.coords).collect();
    let normals = vec![normal; verts.len()];
    let indices = ear_clip(&boundary_uv, outward);

    (verts, normals, indices)
}

// ─── Edge sampling ──────────────────────────────────────────────────────────

/// A face's outer wire as a closed loop of points in wire order, each point once.
fn wire_points(store: &TopoStore, face_id: FaceId, planar: bool, settings: &TessSettings) -> Vec<Point3> {
    let face = store.face(face_id);
    let mut pts = Vec::new();

    for ce_id in store.wire_coedges(face.outer_wire) {
        let ce = store.coedge(ce_id);
        let edge = store.edge(ce.edge);
        let mut run = edge_points(store, edge, edge_segments(edge, planar, settings));
        if !ce.forward {
            run.reverse();
        }
        // The last point is the next coedge's first.
        run.pop();
        pts.extend(run);
    }

    pts
}

/// `segments + 1` points along an edge in curve direction. The ends are the
/// edge's vertex points.
fn edge_points(store: &TopoStore, edge: &Edge, segments: usize) -> Vec<Point3> {
    let segments = segments.max(1);
    let mut pts: Vec<Point3> = (0..=segments)
        .map(|i| {
            let t = edge.t_start + (edge.t_end - edge.t_start) * i as f64 / segments as f64;
            edge.curve.evaluate(t)
        })
        .collect();
    pts[0] = store.vertex(edge.start).point;
    pts[segments] = store.vertex(edge.end).point;
    pts
}

/// How many segments an edge is split into. Circles depend on the edge
/// only. Lines stay whole on planar faces and are split by length on curved
/// ones; a line edge always joins two faces of the same kind.
fn edge_segments(edge: &Edge, planar: bool, settings: &TessSettings) -> usize {
    match &edge.curve {
        Curve3::Circle { radius, .. } => arc_segments(*radius, (edge.t_end - edge.t_start).abs(), settings),
        Curve3::Line { .. } if planar => 1,
        Curve3::Line { dir, .. } => line_segments(dir.norm() * (edge.t_end - edge.t_start).abs(), settings),
    }
}

/// Segments for an arc of `span` radians: at least `min_subdivisions` per
/// full turn (and 4 per arc), at most [`MAX_SEGMENTS_PER_TURN`].
fn arc_segments(radius: f64, span: f64, settings: &TessSettings) -> usize {
    let turns = span / TAU;
    let cap = ((MAX_SEGMENTS_PER_TURN as f64 * turns).ceil() as usize).max(4);
    let floor = ((settings.min_subdivisions as f64 * turns).ceil() as usize).clamp(4, cap);
    arc_subdivision_count(radius, span, settings).clamp(floor, cap)
}

fn line_segments(length: f64, settings: &TessSettings) -> usize {
    if settings.max_edge_length <= 0.0 {
        return 1;
    }
    ((length / settings.max_edge_length).ceil() as usize).clamp(1, MAX_LINE_SEGMENTS)
}

/// Number of segments for an arc of `span` radians so that both the chord
/// deviation and the segment length stay within the settings.
fn arc_subdivision_count(radius: f64, span: f64, settings: &TessSettings) -> usize {
    if radius < 1e-15 || settings.chord_tolerance <= 0.0 {
        return 8;
    }
    let ratio = (settings.chord_tolerance / radius).min(1.0);
    let max_angle = 2.0 * (1.0 - ratio).acos();
    if max_angle < 1e-10 {
        return 64;
    }
    let by_chord = (span / max_angle).ceil() as usize;
    let by_length = if settings.max_edge_length > 0.0 {
        (span * radius / settings.max_edge_length).ceil() as usize
    } else {
        0
    };
    by_chord.max(by_length).max(1)
}

/// Twice the signed area of a loop projected onto the XY plane.
fn xy_winding(pts: &[Point3]) -> f64 {
    let n = pts.len();
    (0..n)
        .map(|i| {
            let (p, q) = (pts[i], pts[(i + 1) % n]);
            p.x * q.y - q.x * p.y
        })
        .sum()
}

// ─── Ear clipping triangulation ─────────────────────────────────────────────

fn ear_clip(polygon: &[(f64, f64)], outward: bool) -> Vec<u32> {
    let n = polygon.len();
    if n < 3 {
        return vec![];
    }

    let ccw = signed_area(polygon) > 0.0;

    // Winding must account for both the 2D polygon orientation and the
    // outward flag: keep order when they agree, reverse when they disagree.
    let keep_order = outward == ccw;

    if n == 3 {
        return if keep_order { vec![0, 1, 2] } else { vec![0, 2, 1] };
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut result = Vec::with_capacity((n - 2) * 3);

    let mut safety = n * n;
    while indices.len() > 3 && safety > 0 {
        safety -= 1;
        let len = indices.len();
        let mut found_ear = false;

        for i in 0..len {
            let prev = indices[(i + len - 1) % len];
            let curr = indices[i];
            let next = indices[(i + 1) % len];

            if is_ear(polygon, &indices, prev, curr, next, ccw) {
                if keep_order {
                    result.extend_from_slice(&[prev as u32, curr as u32, next as u32]);
                } else {
                    result.extend_from_slice(&[prev as u32, next as u32, curr as u32]);
                }
                indices.remove(i);
                found_ear = true;
                break;
            }
        }

        if !found_ear {
            break;
        }
    }

    if indices.len() == 3 {
        let (a, b, c) = (indices[0], indices[1], indices[2]);
        if keep_order {
            result.extend_from_slice(&[a as u32, b as u32, c as u32]);
        } else {
            result.extend_from_slice(&[a as u32, c as u32, b as u32]);
        }
    }

    result
}

fn signed_area(polygon: &[(f64, f64)]) -> f64 {
    let n = polygon.len();
    let mut area = 0.0;
    for i in 0..n {
        let (x1, y1) = polygon[i];
        let (x2, y2) = polygon[(i + 1) % n];
        area += x1 * y2 - x2 * y1;
    }
    area * 0.5
}

fn is_ear(polygon: &[(f64, f64)], indices: &[usize], prev: usize, curr: usize, next: usize, ccw: bool) -> bool {
    let a = polygon[prev];
    let b = polygon[curr];
    let c = polygon[next];

    let cross = (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0);
    if (ccw && cross <= 0.0) || (!ccw && cross >= 0.0) {
        return false;
    }

    indices
        .iter()
        .filter(|&&idx| idx != prev && idx != curr && idx != next)
        .all(|&idx| !point_in_triangle(polygon[idx], a, b, c))
}

fn point_in_triangle(p: (f64, f64), a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> bool {
    let d1 = (p.0 - b.0) * (a.1 - b.1) - (a.0 - b.0) * (p.1 - b.1);
    let d2 = (p.0 - c.0) * (b.1 - c.1) - (b.0 - c.0) * (p.1 - c.1);
    let d3 = (p.0 - a.0) * (c.1 - a.1) - (c.0 - a.0) * (p.1 - a.1);
    let has_neg = (d1 < 0.0) || (d2 < 0.0) || (d3 < 0.0);
    let has_pos = (d1 > 0.0) || (d2 > 0.0) || (d3 > 0.0);
    !(has_neg && has_pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn ear_clip_square() {
        let square = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let tris = ear_clip(&square, true);
        assert_eq!(tris.len(), 6);
    }

    #[test]
    fn ear_clip_reverses_clockwise_loops() {
        let cw = [(0.0, 0.0), (0.0, 1.0), (1.0, 0.0)];
        assert_eq!(ear_clip(&cw, true), vec![0, 2, 1]);
    }

    #[test]
    fn ear_clip_concave_half_annulus() {
        let mut poly = Vec::new();
        for i in 0..=8 {
            let t = PI * i as f64 / 8.0;
            poly.push((2.0 * t.cos(), 2.0 * t.sin()));
        }
        for i in (0..=8).rev() {
            let t = PI * i as f64 / 8.0;
            poly.push((t.cos(), t.sin()));
        }
        let tris = ear_clip(&poly, true);
        assert_eq!(tris.len(), (poly.len() - 2) * 3);
    }

    #[test]
    fn arc_count_respects_max_edge_length() {
        let settings = TessSettings {
            chord_tolerance: 10.0,
            max_edge_length: 1.0,
            min_subdivisions: 2,
        };
        assert_eq!(arc_subdivision_count(10.0, PI, &settings), 32);
    }

    #[test]
    fn arc_segments_are_capped_for_huge_radii() {
        let settings = TessSettings::default();
        assert_eq!(arc_segments(1e6, PI, &settings), MAX_SEGMENTS_PER_TURN / 2);
        assert_eq!(arc_segments(1e6, FRAC_PI_2, &settings), MAX_SEGMENTS_PER_TURN / 4);
        assert_eq!(line_segments(1e9, &settings), MAX_LINE_SEGMENTS);
    }

    #[test]
    fn arc_segments_honour_min_subdivisions_per_turn() {
        let settings = TessSettings {
            chord_tolerance: 100.0,
            max_edge_length: 100.0,
            min_subdivisions: 16,
        };
        assert_eq!(arc_segments(1.0, PI, &settings), 8);
        assert_eq!(arc_segments(1.0, FRAC_PI_2, &settings), 4);
    }
}
