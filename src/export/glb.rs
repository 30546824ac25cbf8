//! GLB (binary glTF 2.0) export.
//!
//! Layout:
//! ```text
//! [magic "glTF"][version 2][total length]              12-byte header
//! [json length][type "JSON"][json, space padded]       JSON chunk
//! [bin length][type "BIN\0"][positions|normals|indices, zero padded]
//! ```
//! One buffer with three views: f32 VEC3 positions, f32 VEC3 normals and
//! u32 scalar indices. One mesh, one node, one scene.

use crate::types::TriangleMesh;
use serde_json::json;
use std::io::{self, Write};

const GLB_MAGIC: u32 = 0x4654_6C67;
const GLB_VERSION: u32 = 2;
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

const FLOAT: u32 = 5126;
const UNSIGNED_INT: u32 = 5125;
const ARRAY_BUFFER: u32 = 34962;
const ELEMENT_ARRAY_BUFFER: u32 = 34963;
const TRIANGLES: u32 = 4;

/// Write an indexed triangle mesh as a GLB container.
pub fn write_glb<W: Write>(mesh: &TriangleMesh, writer: &mut W) -> io::Result<()> {
    if mesh.is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "mesh has no triangles"));
    }
    let bounds = mesh
        .bounds()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "mesh has no vertices"))?;

    let mut bin = Vec::with_capacity(mesh.vertices.len() * 24 + mesh.indices.len() * 4);
    for v in &mesh.vertices {
        for c in [v.x, v.y, v.z] {
            bin.extend_from_slice(&(c as f32).to_le_bytes());
        }
    }
    let normals_offset = bin.len();
    for n in &mesh.normals {
        for c in [n.x, n.y, n.z] {
            bin.extend_from_slice(&(c as f32).to_le_bytes());
        }
    }
    let indices_offset = bin.len();
    for &i in &mesh.indices {
        bin.extend_from_slice(&i.to_le_bytes());
    }
    let bin_len = bin.len();
    pad(&mut bin, 0);

    let document = json!({
        "asset": { "version": "2.0", "generator": concat!("shapegen ", env!("CARGO_PKG_VERSION")) },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "mesh": 0 }],
        "meshes": [{
            "primitives": [{
                "attributes": { "POSITION": 0, "NORMAL": 1 },
                "indices": 2,
                "mode": TRIANGLES,
            }]
        }],
        "accessors": [
            {
                "bufferView": 0,
                "componentType": FLOAT,
                "count": mesh.vertices.len(),
                "type": "VEC3",
                "min": [bounds.min.x as f32, bounds.min.y as f32, bounds.min.z as f32],
                "max": [bounds.max.x as f32, bounds.max.y as f32, bounds.max.z as f32],
            },
            {
                "bufferView": 1,
                "componentType": FLOAT,
                "count": mesh.normals.len(),
                "type": "VEC3",
            },
            {
                "bufferView": 2,
                "componentType": UNSIGNED_INT,
                "count": mesh.indices.len(),
                "type": "SCALAR",
            },
        ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": normals_offset, "target": ARRAY_BUFFER },
            { "buffer": 0, "byteOffset": normals_offset, "byteLength": indices_offset - normals_offset, "target": ARRAY_BUFFER },
            { "buffer": 0, "byteOffset": indices_offset, "byteLength": bin_len - indices_offset, "target": ELEMENT_ARRAY_BUFFER },
        ],
        "buffers": [{ "byteLength": bin_len }],
    });
    let mut json_bytes = serde_json::to_vec(&document)?;
    pad(&mut json_bytes, b' ');

    let total = 12 + 8 + json_bytes.len() + 8 + bin.len();
    let total = u32::try_from(total)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "mesh too large for GLB"))?;

    writer.write_all(&GLB_MAGIC.to_le_bytes())?;
    writer.write_all(&GLB_VERSION.to_le_bytes())?;
    writer.write_all(&total.to_le_bytes())?;

    writer.write_all(&(json_bytes.len() as u32).to_le_bytes())?;
    writer.write_all(&CHUNK_JSON.to_le_bytes())?;
    writer.write_all(&json_bytes)?;

    writer.write_all(&(bin.len() as u32).to_le_bytes())?;
    writer.write_all(&CHUNK_BIN.to_le_bytes())?;
    writer.write_all(&bin)?;
    Ok(())
}

/// Pad to a 4-byte boundary.
fn pad(bytes: &mut Vec<u8>, fill: u8) {
    while bytes.len() % 4 != 0 {
        bytes.push(fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector3;

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
    }

    fn triangle() -> TriangleMesh {
        TriangleMesh {
            vertices: vec![Vector3::zeros(), Vector3::x(), Vector3::new(0.0, 2.0, 0.5)],
            normals: vec![Vector3::z(); 3],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn header_and_chunks() {
        let mut glb = Vec::new();
        write_glb(&triangle(), &mut glb).unwrap();

        assert_eq!(&glb[..4], b"glTF");
        assert_eq!(u32_at(&glb, 4), 2);
        assert_eq!(u32_at(&glb, 8) as usize, glb.len());

        let json_len = u32_at(&glb, 12) as usize;
        assert_eq!(json_len % 4, 0);
        assert_eq!(&glb[16..20], b"JSON");

        let bin_header = 20 + json_len;
        assert_eq!(&glb[bin_header + 4..bin_header + 8], b"BIN\0");
        let bin_len = u32_at(&glb, bin_header) as usize;
        // 3 positions + 3 normals (36 bytes each) + 3 indices
        assert_eq!(bin_len, 36 + 36 + 12);
        assert_eq!(glb.len(), bin_header + 8 + bin_len);
    }

    #[test]
    fn json_chunk_describes_the_mesh() {
        let mut glb = Vec::new();
        write_glb(&triangle(), &mut glb).unwrap();
        let json_len = u32_at(&glb, 12) as usize;
        let doc: serde_json::Value = serde_json::from_slice(&glb[20..20 + json_len]).unwrap();

        assert_eq!(doc["asset"]["version"], "2.0");
        assert_eq!(doc["accessors"][0]["count"], 3);
        assert_eq!(doc["accessors"][0]["max"][1], 2.0);
        assert_eq!(doc["accessors"][2]["componentType"], UNSIGNED_INT);
        assert_eq!(doc["buffers"][0]["byteLength"], 84);
    }

    #[test]
    fn empty_mesh_is_rejected() {
        let mut glb = Vec::new();
        assert!(write_glb(&TriangleMesh::default(), &mut glb).is_err());
    }
}
