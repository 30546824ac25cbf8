//! Binary STL export.
//!
//! Writes a standard 80-byte header + triangle facets in little-endian binary format.
//! Each triangle stores a facet normal followed by three vertex positions.

use crate::math::Vector3;
use crate::types::TriangleMesh;
use std::io::{self, Write};

const HEADER: &[u8] = b"Binary STL written by shapegen";

/// Write a `TriangleMesh` as a binary STL to the given writer.
pub fn write_stl<W: Write>(mesh: &TriangleMesh, writer: &mut W) -> io::Result<()> {
    let mut header = [0u8; 80];
    header[..HEADER.len()].copy_from_slice(HEADER);
    writer.write_all(&header)?;

    let n_tris = u32::try_from(mesh.triangle_count())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "too many triangles for STL"))?;
    writer.write_all(&n_tris.to_le_bytes())?;

    // Each triangle: normal (3×f32) + 3 vertices (3×3×f32) + attribute (u16)
    for tri in 0..mesh.triangle_count() {
        let [v0, v1, v2] = mesh.triangle(tri);
        let n = (v1 - v0).cross(&(v2 - v0));
        let len = n.norm();
        let n = if len > 1e-15 { n / len } else { Vector3::z() };

        for v in [n, v0, v1, v2] {
            write_vec3(writer, &v)?;
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }

    Ok(())
}

fn write_vec3<W: Write>(writer: &mut W, v: &Vector3) -> io::Result<()> {
    writer.write_all(&(v.x as f32).to_le_bytes())?;
    writer.write_all(&(v.y as f32).to_le_bytes())?;
    writer.write_all(&(v.z as f32).to_le_bytes())
}
