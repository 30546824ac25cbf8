//! OCCT "CASCADE Topology V1" text export.
//!
//! The file holds geometry tables (2D curves, 3D curves, surfaces) followed by
//! the topology as a flat list of TShapes. Sub-shapes are written before the
//! shapes that use them and are referenced by reverse position, so the solid,
//! written last, is `+1`.
//!
//! Every coedge gets an exact parameter-space curve on its face's surface, in
//! OCCT parameterization:
//! - Plane: `P(u,v) = O + u X + v Y`
//! - Cylinder: `P(u,v) = O + R (cos u X + sin u Y) + v Z`
//! - Cone (placed at the apex, radius 0): `P(u,v) = O + v sin a (cos u X + sin u Y) + v cos a Z`
//! - Sphere: `P(u,v) = O + R cos v (cos u X + sin u Y) + R sin v Z`

use crate::curve::{circle_frame, Curve3};
use crate::math::{plane_frame, Point3, Vector3};
use crate::surface::Surface;
use crate::topo::*;
use std::collections::HashMap;
use std::f64::consts::{PI, TAU};
use std::io::{self, Write};

const TOLERANCE: &str = "1e-07";

/// Write a solid in OCCT BREP text format.
pub fn write_brep<W: Write>(store: &TopoStore, solid_id: SolidId, writer: &mut W) -> io::Result<()> {
    let faces = store.solid_faces(solid_id);
    let edges = store.solid_edges(solid_id);
    let vertices = store.solid_vertices(solid_id);

    let frames: Vec<SurfaceFrame> = faces
        .iter()
        .map(|&f| SurfaceFrame::new(store, f))
        .collect();

    // One parameter-space curve per (face, edge) use, in face order.
    let mut pcurves: Vec<Curve2d> = Vec::new();
    let mut edge_uses: HashMap<EdgeId, Vec<(usize, usize)>> = HashMap::new();
    for (fi, &face_id) in faces.iter().enumerate() {
        for ce_id in store.wire_coedges(store.face(face_id).outer_wire) {
            let edge_id = store.coedge(ce_id).edge;
            let pc = frames[fi].pcurve(store.edge(edge_id));
            pcurves.push(pc);
            edge_uses.entry(edge_id).or_default().push((pcurves.len(), fi + 1));
        }
    }

    writeln!(writer, "DBRep_DrawableShape")?;
    writeln!(writer)?;
    writeln!(writer, "CASCADE Topology V1, (c) Matra-Datavision")?;
    writeln!(writer, "Locations 0")?;

    writeln!(writer, "Curve2ds {}", pcurves.len())?;
    for pc in &pcurves {
        match pc {
            Curve2d::Line { origin, dir } => {
                writeln!(writer, "1 {} {} {} {}", origin.0, origin.1, dir.0, dir.1)?
            }
            Curve2d::Circle {
                center,
                x,
                y,
                radius,
            } => writeln!(
                writer,
                "2 {} {} {} {} {} {} {}",
                center.0, center.1, x.0, x.1, y.0, y.1, radius
            )?,
        }
    }

    writeln!(writer, "Curves {}", edges.len())?;
    for &edge_id in &edges {
        match &store.edge(edge_id).curve {
            Curve3::Line { origin, dir } => {
                let d = dir.normalize();
                writeln!(writer, "1 {} {} {} {} {} {}", origin.x, origin.y, origin.z, d.x, d.y, d.z)?;
            }
            Curve3::Circle {
                center,
                axis,
                ref_dir,
                radius,
            } => {
                let (x, y) = circle_frame(axis, ref_dir);
                let n = axis.normalize();
                writeln!(
                    writer,
                    "2 {} {} {} {} {} {} {} {} {} {} {} {} {}",
                    center.x, center.y, center.z, n.x, n.y, n.z, x.x, x.y, x.z, y.x, y.y, y.z, radius
                )?;
            }
        }
    }

    writeln!(writer, "Polygon3D 0")?;
    writeln!(writer, "PolygonOnTriangulations 0")?;

    writeln!(writer, "Surfaces {}", frames.len())?;
    for frame in &frames {
        frame.write_record(writer)?;
    }
    writeln!(writer, "Triangulations 0")?;
    writeln!(writer)?;

    // TShapes: vertices, edges, wires, faces, shell, solid.
    let total = vertices.len() + edges.len() + 2 * faces.len() + 2;
    writeln!(writer, "TShapes {total}")?;
    let mut written = 0usize;
    let mut next_index = || {
        written += 1;
        total - written + 1
    };

    let mut vertex_index: HashMap<VertexId, usize> = HashMap::new();
    for &vid in &vertices {
        let p = store.vertex(vid).point;
        writeln!(writer, "Ve")?;
        writeln!(writer, "{TOLERANCE}")?;
        writeln!(writer, "{} {} {}", p.x, p.y, p.z)?;
        writeln!(writer, "0 0")?;
        writeln!(writer)?;
        writeln!(writer, "0101101")?;
        writeln!(writer, "*")?;
        vertex_index.insert(vid, next_index());
    }

    let mut edge_index: HashMap<EdgeId, usize> = HashMap::new();
    for (ci, &edge_id) in edges.iter().enumerate() {
        let edge = store.edge(edge_id);
        let (first, last) = edge_range(edge);
        writeln!(writer, "Ed")?;
        writeln!(writer, " {TOLERANCE} 1 1 0")?;
        writeln!(writer, "1  {} 0 {} {}", ci + 1, first, last)?;
        for &(pc, surf) in edge_uses.get(&edge_id).map(Vec::as_slice).unwrap_or_default() {
            writeln!(writer, "2  {pc} {surf} 0 {first} {last}")?;
        }
        writeln!(writer, "0")?;
        writeln!(writer)?;
        writeln!(writer, "0101000")?;
        writeln!(
            writer,
            "+{} 0 -{} 0 *",
            shape_ref(&vertex_index, &edge.start)?,
            shape_ref(&vertex_index, &edge.end)?
        )?;
        edge_index.insert(edge_id, next_index());
    }

    let mut wire_index = Vec::with_capacity(faces.len());
    for &face_id in faces {
        writeln!(writer, "Wi")?;
        writeln!(writer)?;
        writeln!(writer, "0101100")?;
        let mut refs = String::new();
        for ce_id in store.wire_coedges(store.face(face_id).outer_wire) {
            let ce = store.coedge(ce_id);
            let sign = if ce.forward { '+' } else { '-' };
            refs.push_str(&format!("{sign}{} 0 ", shape_ref(&edge_index, &ce.edge)?));
        }
        writeln!(writer, "{refs}*")?;
        wire_index.push(next_index());
    }

    // Wires run counter-clockwise around the outward normal; a face whose
    // surface normal points inward carries its wire reversed.
    let mut face_refs = String::new();
    for (fi, &face_id) in faces.iter().enumerate() {
        let outward = store.face(face_id).outward;
        let sign = if outward { '+' } else { '-' };
        writeln!(writer, "Fa")?;
        writeln!(writer, "0  {TOLERANCE} {} 0", fi + 1)?;
        writeln!(writer)?;
        writeln!(writer, "0101000")?;
        writeln!(writer, "{sign}{} 0 *", wire_index[fi])?;
        face_refs.push_str(&format!("{sign}{} 0 ", next_index()));
    }

    writeln!(writer, "Sh")?;
    writeln!(writer)?;
    writeln!(writer, "0101100")?;
    writeln!(writer, "{face_refs}*")?;
    let shell = next_index();

    writeln!(writer, "So")?;
    writeln!(writer)?;
    writeln!(writer, "0100000")?;
    writeln!(writer, "+{shell} 0 *")?;
    let solid = next_index();

    writeln!(writer)?;
    writeln!(writer, "+{solid} 0")?;
    Ok(())
}

fn shape_ref<K: Eq + std::hash::Hash + std::fmt::Debug>(map: &HashMap<K, usize>, key: &K) -> io::Result<usize> {
    map.get(key).copied().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{key:?} referenced before it was written"),
        )
    })
}

/// Parameter range of an edge on its written 3D curve. Lines are written
/// with a unit direction, so their range is in arc length.
fn edge_range(edge: &Edge) -> (f64, f64) {
    match &edge.curve {
        Curve3::Line { dir, .. } => (edge.t_start * dir.norm(), edge.t_end * dir.norm()),
        Curve3::Circle { .. } => (edge.t_start, edge.t_end),
    }
}

enum Curve2d {
    Line {
        origin: (f64, f64),
        dir: (f64, f64),
    },
    Circle {
        center: (f64, f64),
        x: (f64, f64),
        y: (f64, f64),
        radius: f64,
    },
}

/// A face surface placed in an OCCT axis system, plus the window its
/// periodic `u` values are brought into.
struct SurfaceFrame<'a> {
    surface: &'a Surface,
    origin: Point3,
    x: Vector3,
    y: Vector3,
    z: Vector3,
    u_center: f64,
}

impl<'a> SurfaceFrame<'a> {
    fn new(store: &'a TopoStore, face_id: FaceId) -> Self {
        let surface = &store.face(face_id).surface;
        let (origin, z) = match surface {
            Surface::Plane { origin, normal } => (*origin, normal.normalize()),
            Surface::Cylinder { origin, axis, .. } => (*origin, axis.normalize()),
            Surface::Cone { apex, axis, .. } => (*apex, axis.normalize()),
            Surface::Sphere { center, .. } => (*center, Vector3::z()),
        };
        let x = match surface {
            Surface::Plane { .. } => plane_frame(&z).0,
            _ => {
                // Prefer +X as the reference direction so rim arcs start at u = 0.
                let px = Vector3::x() - z * z.x;
                if px.norm() > 1e-6 {
                    px.normalize()
                } else {
                    plane_frame(&z).0
                }
            }
        };
        let mut frame = SurfaceFrame {
            surface,
            origin,
            x,
            y: z.cross(&x),
            z,
            u_center: PI,
        };

        // Periodic faces here never span more than one turn; centre the window
        // on the first arc so seam lines land on the correct side.
        if !matches!(surface, Surface::Plane { .. } | Surface::Sphere { .. }) {
            let coedges = store.wire_coedges(store.face(face_id).outer_wire);
            let sample = coedges
                .iter()
                .map(|&c| store.edge(store.coedge(c).edge))
                .find(|e| matches!(e.curve, Curve3::Circle { .. }))
                .or_else(|| coedges.first().map(|&c| store.edge(store.coedge(c).edge)));
            if let Some(edge) = sample {
                let mid = edge.curve.evaluate((edge.t_start + edge.t_end) * 0.5);
                frame.u_center = frame.uv(&mid).0;
            }
        }
        frame
    }

    fn is_periodic(&self) -> bool {
        !matches!(self.surface, Surface::Plane { .. })
    }

    /// Parameters of a point on the surface.
    fn uv(&self, p: &Point3) -> (f64, f64) {
        let d = p - self.origin;
        let (dx, dy, dz) = (d.dot(&self.x), d.dot(&self.y), d.dot(&self.z));
        match self.surface {
            Surface::Plane { .. } => (dx, dy),
            Surface::Cylinder { .. } => (dy.atan2(dx), dz),
            Surface::Cone { half_angle, .. } => (dy.atan2(dx), dz / half_angle.cos()),
            Surface::Sphere { radius, .. } => (dy.atan2(dx), (dz / radius).clamp(-1.0, 1.0).asin()),
        }
    }

    /// Shift a periodic `u` into the face window.
    fn wrap(&self, u: f64) -> f64 {
        if !self.is_periodic() {
            return u;
        }
        let lo = self.u_center - PI;
        lo + (u - lo).rem_euclid(TAU)
    }

    fn pcurve(&self, edge: &Edge) -> Curve2d {
        match &edge.curve {
            Curve3::Line { origin, dir } => {
                let len = dir.norm();
                let a = self.uv(origin);
                let b = self.uv(&(origin + dir));
                let (u_a, u_b) = match self.surface {
                    Surface::Plane { .. } => (a.0, b.0),
                    // Generatrices keep a constant u; the midpoint avoids the apex.
                    _ => {
                        let u = self.wrap(self.uv(&(origin + dir * 0.5)).0);
                        (u, u)
                    }
                };
                Curve2d::Line {
                    origin: (u_a, a.1),
                    dir: ((u_b - u_a) / len, (b.1 - a.1) / len),
                }
            }
            Curve3::Circle {
                center,
                axis,
                ref_dir,
                radius,
            } => {
                let (cx, cy) = circle_frame(axis, ref_dir);
                if let Surface::Plane { .. } = self.surface {
                    let c = self.uv(center);
                    return Curve2d::Circle {
                        center: c,
                        x: (cx.dot(&self.x), cx.dot(&self.y)),
                        y: (cy.dot(&self.x), cy.dot(&self.y)),
                        radius: *radius,
                    };
                }
                // Coaxial circle: a horizontal line in (u, v).
                let s = if axis.dot(&self.z) >= 0.0 { 1.0 } else { -1.0 };
                let t_mid = (edge.t_start + edge.t_end) * 0.5;
                let (u_mid, v) = self.uv(&edge.curve.evaluate(t_mid));
                let u_mid = self.wrap(u_mid);
                Curve2d::Line {
                    origin: (u_mid - s * t_mid, v),
                    dir: (s, 0.0),
                }
            }
        }
    }

    fn write_record<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let (o, x, y, z) = (self.origin, self.x, self.y, self.z);
        let placement = format!(
            "{} {} {} {} {} {} {} {} {} {} {} {}",
            o.x, o.y, o.z, z.x, z.y, z.z, x.x, x.y, x.z, y.x, y.y, y.z
        );
        match self.surface {
            Surface::Plane { .. } => writeln!(writer, "1 {placement}"),
            Surface::Cylinder { radius, .. } => writeln!(writer, "2 {placement} {radius}"),
            Surface::Cone { half_angle, .. } => writeln!(writer, "3 {placement} 0 {half_angle}"),
            Surface::Sphere { radius, .. } => writeln!(writer, "4 {placement} {radius}"),
        }
    }
}
