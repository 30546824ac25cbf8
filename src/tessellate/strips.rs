//! Curved faces as rows of constant `v` joined by triangle strips.
//!
//! The boundary rows are the face's arcs and the first and last column are its
//! seam lines, both taken from the shared edge samples. Interior rows choose
//! their own segment count from the radius of the parallel they lie on, so a
//! sphere gets fewer points near its poles. Strips between rows of different
//! lengths are zipped by `u`, which never leaves a T-junction.

use super::{arc_segments, edge_points, edge_segments, wire_points, xy_winding};
use crate::curve::Curve3;
use crate::math::{Point3, Vector3};
use crate::surface::Surface;
use crate::topo::*;
use crate::types::TessSettings;
use std::f64::consts::{FRAC_PI_2, TAU};

type FaceMesh = (Vec<Vector3>, Vec<Vector3>, Vec<u32>);

/// An arc of the face boundary, ordered by increasing `u`.
struct Rail {
    v: f64,
    u: Vec<f64>,
    points: Vec<Point3>,
    start: VertexId,
    end: VertexId,
}

impl Rail {
    fn new(surface: &Surface, edge: &Edge, mut points: Vec<Point3>) -> Self {
        let n = points.len() - 1;
        let t_mid = (edge.t_start + edge.t_end) * 0.5;
        let (u_mid, v) = surface.closest_parameters(&edge.curve.evaluate(t_mid));
        // u runs along the curve or against it depending on the surface axis.
        let sign = if edge.curve.derivative(t_mid).dot(&surface.derivative_u(u_mid, v)) >= 0.0 {
            1.0
        } else {
            -1.0
        };
        let mut u: Vec<f64> = (0..=n)
            .map(|i| {
                let t = edge.t_start + (edge.t_end - edge.t_start) * i as f64 / n as f64;
                u_mid + sign * (t - t_mid)
            })
            .collect();

        let (mut start, mut end) = (edge.start, edge.end);
        if u[n] < u[0] {
            u.reverse();
            points.reverse();
            std::mem::swap(&mut start, &mut end);
        }
        Rail {
            v,
            u,
            points,
            start,
            end,
        }
    }

    /// Shift by whole turns so the rail starts as close as possible to `u0`.
    fn align(&mut self, u0: f64) {
        let shift = ((u0 - self.u[0]) / TAU).round() * TAU;
        for u in &mut self.u {
            *u += shift;
        }
    }
}

/// A seam line of the face boundary, ordered by increasing `v`.
struct Seam {
    points: Vec<Point3>,
    low: VertexId,
    high: VertexId,
}

impl Seam {
    fn new(surface: &Surface, edge: &Edge, mut points: Vec<Point3>) -> Self {
        let v_first = surface.closest_parameters(&points[0]).1;
        let v_last = surface.closest_parameters(&points[points.len() - 1]).1;
        let (mut low, mut high) = (edge.start, edge.end);
        if v_last < v_first {
            points.reverse();
            std::mem::swap(&mut low, &mut high);
        }
        Seam { points, low, high }
    }
}

/// Mesh vertices of one face, with normals from the surface.
struct Patch<'a> {
    surface: &'a Surface,
    outward: bool,
    verts: Vec<Vector3>,
    normals: Vec<Vector3>,
}

impl<'a> Patch<'a> {
    fn push(&mut self, point: Point3, u: f64, v: f64) -> u32 {
        let mut n = self.surface.normal(u, v);
        if !self.outward {
            n = -n;
        }
        let idx = self.verts.len() as u32;
        self.verts.push(point.coords);
        self.normals.push(n);
        idx
    }

    fn push_eval(&mut self, u: f64, v: f64) -> u32 {
        let point = self.surface.evaluate(u, v);
        self.push(point, u, v)
    }

    fn rail_row(&mut self, rail: &Rail) -> Row {
        let indices = rail
            .points
            .iter()
            .zip(&rail.u)
            .map(|(p, &u)| self.push(*p, u, rail.v))
            .collect();
        Row {
            indices,
            u: rail.u.clone(),
        }
    }

    fn point_row(&mut self, point: Point3, u: f64, v: f64) -> Row {
        Row {
            indices: vec![self.push(point, u, v)],
            u: vec![u],
        }
    }
}

/// Vertex indices of one row with their `u`, increasing.
struct Row {
    indices: Vec<u32>,
    u: Vec<f64>,
}

pub(super) fn tessellate_curved_face(
    store: &TopoStore,
    face_id: FaceId,
    surface: &Surface,
    outward: bool,
    settings: &TessSettings,
) -> FaceMesh {
    let mut rails = Vec::new();
    let mut seams = Vec::new();
    for ce_id in store.wire_coedges(store.face(face_id).outer_wire) {
        let edge = store.edge(store.coedge(ce_id).edge);
        let points = edge_points(store, edge, edge_segments(edge, false, settings));
        match edge.curve {
            Curve3::Circle { .. } => rails.push(Rail::new(surface, edge, points)),
            Curve3::Line { .. } => seams.push(Seam::new(surface, edge, points)),
        }
    }
    if rails.is_empty() {
        return (vec![], vec![], vec![]);
    }

    let mut patch = Patch {
        surface,
        outward,
        verts: Vec::new(),
        normals: Vec::new(),
    };
    let rows = if seams.is_empty() {
        closed_rows(store, face_id, &mut patch, rails, settings)
    } else {
        open_rows(&mut patch, rails, &seams, settings)
    };

    let mut tris = Vec::new();
    for pair in rows.windows(2) {
        stitch(&pair[0], &pair[1], outward, &mut tris);
    }
    let indices = tris.into_iter().flatten().collect();
    (patch.verts, patch.normals, indices)
}

/// A band between two seams: one or two rails, or one rail and an apex
/// where both seams meet.
fn open_rows(patch: &mut Patch, mut rails: Vec<Rail>, seams: &[Seam], settings: &TessSettings) -> Vec<Row> {
    let u_lo = rails[0].u[0];
    for rail in &mut rails {
        rail.align(u_lo);
    }
    let (start, end) = (rails[0].start, rails[0].end);
    let touches = |s: &&Seam, v: VertexId| s.low == v || s.high == v;
    let (Some(left), Some(right)) = (
        seams.iter().find(|s| touches(s, start)),
        seams.iter().find(|s| touches(s, end)),
    ) else {
        return Vec::new();
    };

    let u_hi = rails[0].u[rails[0].u.len() - 1];
    let span = u_hi - u_lo;
    let nv = left.points.len() - 1;
    let v_lo = patch.surface.closest_parameters(&left.points[0]).1;
    let v_hi = patch.surface.closest_parameters(&left.points[nv]).1;
    let nearest = |v: f64| {
        rails
            .iter()
            .min_by(|a, b| (a.v - v).abs().total_cmp(&(b.v - v).abs()))
    };

    let mut rows = Vec::with_capacity(nv + 1);
    for i in 0..=nv {
        let v = v_lo + (v_hi - v_lo) * i as f64 / nv as f64;
        let row = if i == 0 && left.low == right.low {
            patch.point_row(left.points[0], u_lo, v_lo)
        } else if i == nv && left.high == right.high {
            patch.point_row(left.points[nv], u_lo, v_hi)
        } else if i == 0 || i == nv {
            match nearest(v) {
                Some(rail) => patch.rail_row(rail),
                None => return Vec::new(),
            }
        } else {
            let n = arc_segments(patch.surface.parallel_radius(v), span, settings);
            let mut row = Row {
                indices: Vec::with_capacity(n + 1),
                u: Vec::with_capacity(n + 1),
            };
            for j in 0..=n {
                let u = u_lo + span * j as f64 / n as f64;
                let idx = if j == 0 {
                    patch.push(left.points[i], u, v)
                } else if j == n {
                    match right.points.get(i) {
                        Some(p) => patch.push(*p, u, v),
                        None => patch.push_eval(u, v),
                    }
                } else {
                    patch.push_eval(u, v)
                };
                row.indices.push(idx);
                row.u.push(u);
            }
            row
        };
        rows.push(row);
    }
    rows
}

/// A sphere cap: rails chained into one closed parallel, and a pole.
fn closed_rows(
    store: &TopoStore,
    face_id: FaceId,
    patch: &mut Patch,
    mut rails: Vec<Rail>,
    settings: &TessSettings,
) -> Vec<Row> {
    let radius = match patch.surface {
        Surface::Sphere { radius, .. } => *radius,
        _ => return Vec::new(),
    };

    // Chain the rails end to start into one loop of increasing u.
    let first = rails.remove(0);
    let u_lo = first.u[0];
    let v_rim = first.v;
    let mut chain = first;
    while let Some(pos) = rails.iter().position(|r| r.start == chain.end) {
        let mut next = rails.remove(pos);
        next.align(chain.u[chain.u.len() - 1]);
        chain.points.extend(next.points.drain(1..));
        chain.u.extend(next.u.drain(1..));
        chain.end = next.end;
    }

    // The cap holds the +Z pole when its wire runs counter-clockwise seen from +Z.
    let boundary = wire_points(store, face_id, false, settings);
    let pole = if xy_winding(&boundary) > 0.0 {
        FRAC_PI_2
    } else {
        -FRAC_PI_2
    };
    let nv = arc_segments(radius, (pole - v_rim).abs(), settings);

    let mut rows = Vec::with_capacity(nv + 1);
    for i in 0..=nv {
        let v = v_rim + (pole - v_rim) * i as f64 / nv as f64;
        let row = if i == 0 {
            let mut row = patch.rail_row(&chain);
            // The loop closes on its first vertex.
            if chain.end == chain.start {
                let head = row.indices[0];
                if let Some(last) = row.indices.last_mut() {
                    *last = head;
                }
            }
            row
        } else if i == nv {
            patch.point_row(patch.surface.evaluate(u_lo, pole), u_lo, pole)
        } else {
            parallel_row(patch, u_lo, v, settings)
        };
        rows.push(row);
    }

    // Rows must run from low to high v.
    if pole < v_rim {
        rows.reverse();
    }
    rows
}

/// A full parallel at `v`, closing on its first vertex.
fn parallel_row(patch: &mut Patch, u_lo: f64, v: f64, settings: &TessSettings) -> Row {
    let n = arc_segments(patch.surface.parallel_radius(v), TAU, settings).max(3);
    let mut row = Row {
        indices: Vec::with_capacity(n + 1),
        u: Vec::with_capacity(n + 1),
    };
    for j in 0..n {
        let u = u_lo + TAU * j as f64 / n as f64;
        row.indices.push(patch.push_eval(u, v));
        row.u.push(u);
    }
    row.indices.push(row.indices[0]);
    row.u.push(u_lo + TAU);
    row
}

/// Triangulate the strip between two rows, `lower` at the smaller `v`.
/// Triangles are counter-clockwise in (u, v), which faces along the surface
/// normal.
fn stitch(lower: &Row, upper: &Row, outward: bool, tris: &mut Vec<[u32; 3]>) {
    let (na, nb) = (lower.indices.len() - 1, upper.indices.len() - 1);
    let (mut i, mut j) = (0, 0);
    while i < na || j < nb {
        let advance_lower = j == nb || (i < na && lower.u[i + 1] <= upper.u[j + 1]);
        let tri = if advance_lower {
            i += 1;
            [lower.indices[i - 1], lower.indices[i], upper.indices[j]]
        } else {
            j += 1;
            [lower.indices[i], upper.indices[j], upper.indices[j - 1]]
        };
        tris.push(if outward { tri } else { [tri[0], tri[2], tri[1]] });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(indices: &[u32], u: &[f64]) -> Row {
        Row {
            indices: indices.to_vec(),
            u: u.to_vec(),
        }
    }

    #[test]
    fn stitch_rows_of_different_lengths() {
        let lower = row(&[0, 1, 2, 3], &[0.0, 1.0, 2.0, 3.0]);
        let upper = row(&[4, 5], &[0.0, 3.0]);
        let mut tris = Vec::new();
        stitch(&lower, &upper, true, &mut tris);

        // One triangle per segment of either row.
        assert_eq!(tris.len(), 3 + 1);
        assert_eq!(tris[0], [0, 1, 4]);
        assert!(tris.contains(&[3, 5, 4]));
    }

    #[test]
    fn stitch_to_a_single_point() {
        let lower = row(&[7], &[0.0]);
        let upper = row(&[0, 1, 2], &[0.0, 1.0, 2.0]);
        let mut tris = Vec::new();
        stitch(&lower, &upper, true, &mut tris);
        assert_eq!(tris, vec![[7, 1, 0], [7, 2, 1]]);

        let mut flipped = Vec::new();
        stitch(&lower, &upper, false, &mut flipped);
        assert_eq!(flipped, vec![[7, 0, 1], [7, 1, 2]]);
    }

    #[test]
    fn every_strip_edge_is_shared_or_on_a_row() {
        let lower = row(&[0, 1, 2, 3, 4], &[0.0, 0.5, 1.0, 1.5, 2.0]);
        let upper = row(&[5, 6, 7], &[0.0, 1.0, 2.0]);
        let mut tris = Vec::new();
        stitch(&lower, &upper, true, &mut tris);

        let mut uses = std::collections::HashMap::new();
        for t in &tris {
            for (a, b) in [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])] {
                *uses.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
        // Interior edges are used twice; row edges and the two end rungs once.
        let once = uses.values().filter(|&&n| n == 1).count();
        assert_eq!(once, 4 + 2 + 2);
        assert!(uses.values().all(|&n| n == 1 || n == 2));
    }
}
