//! Reading triangle meshes back from STL and welding shared corners.
//!
//! STL stores every facet with its own three corners. Mesh formats with
//! indexed geometry (GLB) want those corners merged into shared vertices.

use crate::error::{Error, Result};
use crate::math::Vector3;
use std::collections::HashMap;

pub use crate::types::TriangleMesh;

/// Corners closer than this (model units) are merged by [`weld`].
pub const WELD_TOLERANCE: f64 = 1e-6;

/// Parse a binary or ASCII STL stream into triangle soup (three vertices per facet).
pub fn read_stl(bytes: &[u8]) -> Result<Vec<[Vector3; 3]>> {
    if is_binary_stl(bytes) {
        read_binary_stl(bytes)
    } else if bytes.trim_ascii_start().starts_with(b"solid") {
        read_ascii_stl(bytes)
    } else {
        Err(Error::ConversionFailure("not an STL stream".to_string()))
    }
}

/// A binary STL is exactly `84 + 50 * count` bytes long.
fn is_binary_stl(bytes: &[u8]) -> bool {
    if bytes.len() < 84 {
        return false;
    }
    let count = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]) as usize;
    count
        .checked_mul(50)
        .and_then(|n| n.checked_add(84))
        .is_some_and(|n| n == bytes.len())
}

fn read_binary_stl(bytes: &[u8]) -> Result<Vec<[Vector3; 3]>> {
    let f32_at = |offset: usize| {
        f32::from_le_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
        ]) as f64
    };
    let vec_at = |offset: usize| Vector3::new(f32_at(offset), f32_at(offset + 4), f32_at(offset + 8));

    let facets: Vec<[Vector3; 3]> = bytes[84..]
        .chunks_exact(50)
        .enumerate()
        .map(|(i, _)| {
            // Skip the 12-byte facet normal; it is recomputed from the corners.
            let base = 84 + i * 50 + 12;
            [vec_at(base), vec_at(base + 12), vec_at(base + 24)]
        })
        .collect();
    check_finite(&facets)?;
    Ok(facets)
}

fn read_ascii_stl(bytes: &[u8]) -> Result<Vec<[Vector3; 3]>> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| Error::ConversionFailure(format!("ASCII STL is not UTF-8: {e}")))?;

    let mut facets = Vec::new();
    let mut corners: Vec<Vector3> = Vec::with_capacity(3);
    for (line_no, line) in text.lines().enumerate() {
        let mut words = line.split_whitespace();
        match words.next() {
            Some("vertex") => {
                let coords: Vec<f64> = words
                    .map(str::parse)
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|e| {
                        Error::ConversionFailure(format!("line {}: bad vertex: {e}", line_no + 1))
                    })?;
                if coords.len() != 3 {
                    return Err(Error::ConversionFailure(format!(
                        "line {}: vertex needs 3 coordinates",
                        line_no + 1
                    )));
                }
                corners.push(Vector3::new(coords[0], coords[1], coords[2]));
            }
            Some("endfacet") => {
                if corners.len() != 3 {
                    return Err(Error::ConversionFailure(format!(
                        "line {}: facet has {} vertices",
                        line_no + 1,
                        corners.len()
                    )));
                }
                facets.push([corners[0], corners[1], corners[2]]);
                corners.clear();
            }
            _ => {}
        }
    }
    check_finite(&facets)?;
    Ok(facets)
}

fn check_finite(facets: &[[Vector3; 3]]) -> Result<()> {
    if facets.iter().flatten().all(|v| v.iter().all(|c| c.is_finite())) {
        Ok(())
    } else {
        Err(Error::ConversionFailure("STL contains non-finite coordinates".to_string()))
    }
}

/// Corners whose facets meet at a sharper angle than this stay separate
/// vertices, so hard edges keep flat shading.
pub const CREASE_ANGLE: f64 = std::f64::consts::FRAC_PI_6;

/// Merge coincident corners into shared vertices and compute area-weighted
/// vertex normals. Facets that collapse after merging are dropped.
///
/// A corner only joins an existing vertex whose normal is within
/// `crease_angle` of the facet's; pass `PI` to merge by position alone.
pub fn weld(facets: &[[Vector3; 3]], tolerance: f64, crease_angle: f64) -> TriangleMesh {
    let cos_crease = crease_angle.cos();
    let mut lookup: HashMap<[i64; 3], Vec<u32>> = HashMap::new();
    let mut mesh = TriangleMesh::default();
    let key = |v: &Vector3| {
        [
            (v.x / tolerance).round() as i64,
            (v.y / tolerance).round() as i64,
            (v.z / tolerance).round() as i64,
        ]
    };

    for &facet in facets {
        let keys = facet.map(|corner| key(&corner));
        if keys[0] == keys[1] || keys[1] == keys[2] || keys[2] == keys[0] {
            continue;
        }

        // Unnormalized cross product weights each facet by its area.
        let [a, b, c] = facet;
        let n = (b - a).cross(&(c - a));
        let unit = n.try_normalize(1e-30);

        let mut ids = [0u32; 3];
        for (id, (corner, k)) in ids.iter_mut().zip(facet.into_iter().zip(keys)) {
            let candidates = lookup.entry(k).or_default();
            let shared = candidates.iter().copied().find(|&i| {
                match (unit, mesh.normals[i as usize].try_normalize(1e-30)) {
                    (Some(f), Some(v)) => f.dot(&v) >= cos_crease,
                    _ => true,
                }
            });
            *id = match shared {
                Some(i) => i,
                None => {
                    let i = mesh.vertices.len() as u32;
                    mesh.vertices.push(corner);
                    mesh.normals.push(Vector3::zeros());
                    candidates.push(i);
                    i
                }
            };
        }

        for i in ids {
            mesh.normals[i as usize] += n;
        }
        mesh.indices.extend_from_slice(&ids);
    }

    for n in &mut mesh.normals {
        let len = n.norm();
        *n = if len > 1e-15 { *n / len } else { Vector3::z() };
    }
    mesh
}

/// Parse STL bytes and weld them into an indexed mesh.
pub fn mesh_from_stl(bytes: &[u8]) -> Result<TriangleMesh> {
    let facets = read_stl(bytes)?;
    if facets.is_empty() {
        return Err(Error::ConversionFailure("STL contains no facets".to_string()));
    }
    let mesh = weld(&facets, WELD_TOLERANCE, CREASE_ANGLE);
    if mesh.is_empty() {
        return Err(Error::ConversionFailure("all STL facets are degenerate".to_string()));
    }
    Ok(mesh)
}
