//! STEP AP214 export.
//!
//! Maps B-Rep topology and geometry directly to STEP entities without tessellation.
//!
//! Entity mapping:
//! - `Vertex` → `VERTEX_POINT` + `CARTESIAN_POINT`
//! - `Edge` → `EDGE_CURVE` + curve entity
//! - `Face` → `ADVANCED_FACE` + `FACE_OUTER_BOUND` + surface entity
//! - `Solid` → `MANIFOLD_SOLID_BREP` + `CLOSED_SHELL`
//!
//! Surface mapping:
//! - `Plane` → `PLANE` + `AXIS2_PLACEMENT_3D`
//! - `Cylinder` → `CYLINDRICAL_SURFACE`
//! - `Cone` → `CONICAL_SURFACE` (placed at the apex, radius 0)
//! - `Sphere` → `SPHERICAL_SURFACE`

use super::{lookup, real};
use crate::curve::{circle_frame, Curve3};
use crate::math::{plane_frame, Point3, Vector3};
use crate::surface::Surface;
use crate::topo::*;
use std::collections::HashMap;
use std::io::{self, Write};

/// Write a solid as STEP AP214 to the given writer.
///
/// `name` becomes the product and representation name.
pub fn write_step<W: Write>(store: &TopoStore, solid_id: SolidId, name: &str, writer: &mut W) -> io::Result<()> {
    let mut eid = EntityCounter::default();
    let name = name.replace('\'', "''");

    writeln!(writer, "ISO-10303-21;")?;
    writeln!(writer, "HEADER;")?;
    writeln!(writer, "FILE_DESCRIPTION(('shapegen B-Rep export'),'2;1');")?;
    writeln!(writer, "FILE_NAME('{name}.step','2000-01-01T00:00:00',(''),(''),")?;
    writeln!(writer, "  'shapegen','shapegen','');")?;
    writeln!(writer, "FILE_SCHEMA(('AUTOMOTIVE_DESIGN {{ 1 0 10303 214 1 1 1 1 }}'));")?;
    writeln!(writer, "ENDSEC;")?;
    writeln!(writer, "DATA;")?;

    let mut vertex_entities: HashMap<VertexId, u64> = HashMap::new();
    for vid in store.solid_vertices(solid_id) {
        let pt_eid = write_point(writer, &store.vertex(vid).point, &mut eid)?;
        let vx_eid = eid.next();
        writeln!(writer, "#{vx_eid}=VERTEX_POINT('',#{pt_eid});")?;
        vertex_entities.insert(vid, vx_eid);
    }

    let mut edge_entities: HashMap<EdgeId, u64> = HashMap::new();
    for edge_id in store.solid_edges(solid_id) {
        let edge = store.edge(edge_id);
        let curve_eid = write_curve_entity(writer, &edge.curve, &mut eid)?;
        let v_start = lookup(&vertex_entities, &edge.start)?;
        let v_end = lookup(&vertex_entities, &edge.end)?;

        // Edges always run with increasing curve parameter.
        let ec_eid = eid.next();
        writeln!(writer, "#{ec_eid}=EDGE_CURVE('',#{v_start},#{v_end},#{curve_eid},.T.);")?;
        edge_entities.insert(edge_id, ec_eid);
    }

    let mut face_entities: Vec<u64> = Vec::new();
    for &face_id in store.solid_faces(solid_id) {
        let face = store.face(face_id);
        let surf_eid = write_surface_entity(writer, &face.surface, &mut eid)?;

        let mut oriented_edges = Vec::new();
        for ce_id in store.wire_coedges(face.outer_wire) {
            let ce = store.coedge(ce_id);
            let ec_eid = lookup(&edge_entities, &ce.edge)?;
            let oe_eid = eid.next();
            writeln!(writer, "#{oe_eid}=ORIENTED_EDGE('',*,*,#{ec_eid},{});", flag(ce.forward))?;
            oriented_edges.push(oe_eid);
        }

        let loop_eid = eid.next();
        writeln!(writer, "#{loop_eid}=EDGE_LOOP('',({}));", refs(&oriented_edges))?;

        let bound_eid = eid.next();
        writeln!(writer, "#{bound_eid}=FACE_OUTER_BOUND('',#{loop_eid},.T.);")?;

        let face_eid = eid.next();
        writeln!(
            writer,
            "#{face_eid}=ADVANCED_FACE('',(#{bound_eid}),#{surf_eid},{});",
            flag(face.outward)
        )?;
        face_entities.push(face_eid);
    }

    let shell_eid = eid.next();
    writeln!(writer, "#{shell_eid}=CLOSED_SHELL('',({}));", refs(&face_entities))?;

    let brep_eid = eid.next();
    writeln!(writer, "#{brep_eid}=MANIFOLD_SOLID_BREP('{name}',#{shell_eid});")?;

    // ─── Product context (required for STEP readers to find geometry) ───

    let len_unit = eid.next();
    writeln!(writer, "#{len_unit}=(LENGTH_UNIT()NAMED_UNIT(*)SI_UNIT(.MILLI.,.METRE.));")?;

    let angle_unit = eid.next();
    writeln!(writer, "#{angle_unit}=(NAMED_UNIT(*)PLANE_ANGLE_UNIT()SI_UNIT($,.RADIAN.));")?;

    let solid_angle_unit = eid.next();
    writeln!(writer, "#{solid_angle_unit}=(NAMED_UNIT(*)SI_UNIT($,.STERADIAN.)SOLID_ANGLE_UNIT());")?;

    let uncertainty = eid.next();
    writeln!(writer, "#{uncertainty}=UNCERTAINTY_MEASURE_WITH_UNIT(LENGTH_MEASURE(1.E-07),#{len_unit},'distance_accuracy_value','confusion accuracy');")?;

    let rep_context = eid.next();
    writeln!(writer, "#{rep_context}=(GEOMETRIC_REPRESENTATION_CONTEXT(3)GLOBAL_UNCERTAINTY_ASSIGNED_CONTEXT((#{uncertainty}))GLOBAL_UNIT_ASSIGNED_CONTEXT((#{len_unit},#{angle_unit},#{solid_angle_unit}))REPRESENTATION_CONTEXT('Context3D','3D Context with 1e-7 uncertainty'));")?;

    let shape_rep = eid.next();
    writeln!(writer, "#{shape_rep}=ADVANCED_BREP_SHAPE_REPRESENTATION('{name}',(#{brep_eid}),#{rep_context});")?;

    let app_ctx = eid.next();
    writeln!(writer, "#{app_ctx}=APPLICATION_CONTEXT('core data for automotive mechanical design processes');")?;

    let app_proto = eid.next();
    writeln!(writer, "#{app_proto}=APPLICATION_PROTOCOL_DEFINITION('international standard','automotive_design',2000,#{app_ctx});")?;

    let prod_ctx = eid.next();
    writeln!(writer, "#{prod_ctx}=PRODUCT_CONTEXT('',#{app_ctx},'mechanical');")?;

    let product = eid.next();
    writeln!(writer, "#{product}=PRODUCT('{name}','{name}','',(#{prod_ctx}));")?;

    let pdf = eid.next();
    writeln!(writer, "#{pdf}=PRODUCT_DEFINITION_FORMATION('','',#{product});")?;

    let pdc = eid.next();
    writeln!(writer, "#{pdc}=PRODUCT_DEFINITION_CONTEXT('part definition',#{app_ctx},'design');")?;

    let prod_def = eid.next();
    writeln!(writer, "#{prod_def}=PRODUCT_DEFINITION('design','',#{pdf},#{pdc});")?;

    let pds = eid.next();
    writeln!(writer, "#{pds}=PRODUCT_DEFINITION_SHAPE('','',#{prod_def});")?;

    let sdr = eid.next();
    writeln!(writer, "#{sdr}=SHAPE_DEFINITION_REPRESENTATION(#{pds},#{shape_rep});")?;

    writeln!(writer, "ENDSEC;")?;
    writeln!(writer, "END-ISO-10303-21;")?;

    Ok(())
}

#[derive(Default)]
struct EntityCounter(u64);

impl EntityCounter {
    fn next(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }
}

fn flag(value: bool) -> &'static str {
    if value {
        ".T."
    } else {
        ".F."
    }
}

fn refs(ids: &[u64]) -> String {
    ids.iter().map(|e| format!("#{e}")).collect::<Vec<_>>().join(",")
}

fn write_point<W: Write>(writer: &mut W, p: &Point3, eid: &mut EntityCounter) -> io::Result<u64> {
    let pt_eid = eid.next();
    writeln!(
        writer,
        "#{pt_eid}=CARTESIAN_POINT('',({},{},{}));",
        real(p.x),
        real(p.y),
        real(p.z)
    )?;
    Ok(pt_eid)
}

fn write_direction<W: Write>(writer: &mut W, d: &Vector3, eid: &mut EntityCounter) -> io::Result<u64> {
    let d = d.normalize();
    let dir_eid = eid.next();
    writeln!(
        writer,
        "#{dir_eid}=DIRECTION('',({},{},{}));",
        real(d.x),
        real(d.y),
        real(d.z)
    )?;
    Ok(dir_eid)
}

fn write_curve_entity<W: Write>(writer: &mut W, curve: &Curve3, eid: &mut EntityCounter) -> io::Result<u64> {
    match curve {
        Curve3::Line { origin, dir } => {
            let pt_eid = write_point(writer, origin, eid)?;
            let dir_eid = write_direction(writer, dir, eid)?;
            let vec_eid = eid.next();
            writeln!(writer, "#{vec_eid}=VECTOR('',#{dir_eid},{});", real(dir.norm()))?;
            let line_eid = eid.next();
            writeln!(writer, "#{line_eid}=LINE('',#{pt_eid},#{vec_eid});")?;
            Ok(line_eid)
        }
        Curve3::Circle {
            center,
            axis,
            ref_dir,
            radius,
        } => {
            let (x, _) = circle_frame(axis, ref_dir);
            let placement_eid = write_axis2_placement(writer, center, axis, &x, eid)?;
            let circ_eid = eid.next();
            writeln!(writer, "#{circ_eid}=CIRCLE('',#{placement_eid},{});", real(*radius))?;
            Ok(circ_eid)
        }
    }
}

fn write_surface_entity<W: Write>(writer: &mut W, surface: &Surface, eid: &mut EntityCounter) -> io::Result<u64> {
    match surface {
        Surface::Plane { origin, normal } => {
            let placement_eid = write_axis2_placement(writer, origin, normal, &plane_frame(normal).0, eid)?;
            let plane_eid = eid.next();
            writeln!(writer, "#{plane_eid}=PLANE('',#{placement_eid});")?;
            Ok(plane_eid)
        }
        Surface::Cylinder { origin, axis, radius } => {
            let placement_eid = write_axis2_placement(writer, origin, axis, &plane_frame(axis).0, eid)?;
            let cyl_eid = eid.next();
            writeln!(writer, "#{cyl_eid}=CYLINDRICAL_SURFACE('',#{placement_eid},{});", real(*radius))?;
            Ok(cyl_eid)
        }
        Surface::Cone {
            apex,
            axis,
            half_angle,
        } => {
            let placement_eid = write_axis2_placement(writer, apex, axis, &plane_frame(axis).0, eid)?;
            let cone_eid = eid.next();
            writeln!(
                writer,
                "#{cone_eid}=CONICAL_SURFACE('',#{placement_eid},0.,{});",
                real(*half_angle)
            )?;
            Ok(cone_eid)
        }
        Surface::Sphere { center, radius } => {
            let axis = Vector3::z();
            let placement_eid = write_axis2_placement(writer, center, &axis, &plane_frame(&axis).0, eid)?;
            let sph_eid = eid.next();
            writeln!(writer, "#{sph_eid}=SPHERICAL_SURFACE('',#{placement_eid},{});", real(*radius))?;
            Ok(sph_eid)
        }
    }
}

fn write_axis2_placement<W: Write>(
    writer: &mut W,
    origin: &Point3,
    axis: &Vector3,
    ref_dir: &Vector3,
    eid: &mut EntityCounter,
) -> io::Result<u64> {
    let pt_eid = write_point(writer, origin, eid)?;
    let dir_eid = write_direction(writer, axis, eid)?;
    let ref_eid = write_direction(writer, ref_dir, eid)?;

    let placement_eid = eid.next();
    writeln!(writer, "#{placement_eid}=AXIS2_PLACEMENT_3D('',#{pt_eid},#{dir_eid},#{ref_eid});")?;
    Ok(placement_eid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{make_box, make_cone, make_cylinder, make_sphere};

    fn step_text(build: impl FnOnce(&mut TopoStore) -> SolidId) -> String {
        let mut store = TopoStore::new();
        let solid = build(&mut store);
        let mut buf = Vec::new();
        write_step(&store, solid, "part", &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn step_box_contains_entities() {
        let text = step_text(|s| make_box(s, 2.5, 1.5, 4.0).unwrap());

        assert!(text.starts_with("ISO-10303-21;"));
        assert!(text.contains("MANIFOLD_SOLID_BREP('part'"));
        assert!(text.contains("CLOSED_SHELL"));
        assert!(text.contains("PLANE("));
        assert!(text.trim_end().ends_with("END-ISO-10303-21;"));

        let face_count = text.lines().filter(|l| l.contains("ADVANCED_FACE")).count();
        assert_eq!(face_count, 6, "Box should have 6 ADVANCED_FACE entities");
        let edge_count = text.lines().filter(|l| l.contains("EDGE_CURVE")).count();
        assert_eq!(edge_count, 12);
    }

    #[test]
    fn step_curved_surfaces() {
        let sphere = step_text(|s| make_sphere(s, 5.0).unwrap());
        assert!(sphere.contains("SPHERICAL_SURFACE"));

        let cylinder = step_text(|s| make_cylinder(s, 5.0, 20.0).unwrap());
        assert!(cylinder.contains("CYLINDRICAL_SURFACE"));
        assert!(cylinder.contains("CIRCLE("));

        let cone = step_text(|s| make_cone(s, 5.0, 0.0, 10.0).unwrap());
        assert!(cone.contains("CONICAL_SURFACE"));
    }

    #[test]
    fn entity_references_are_defined_before_use() {
        let text = step_text(|s| make_cylinder(s, 1.0, 2.0).unwrap());
        let mut defined = std::collections::HashSet::new();
        for line in text.lines().filter(|l| l.starts_with('#')) {
            let (id, body) = line.split_once('=').unwrap();
            for part in body.split('#').skip(1) {
                let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
                assert!(defined.contains(&format!("#{digits}")), "{line}");
            }
            defined.insert(id.to_string());
        }
    }
}
