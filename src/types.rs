use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// A triangle mesh produced by tessellating a solid or reading an STL stream.
#[derive(Clone, Debug, Default)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Vector3<f64>>,
    /// Per-vertex normals (unit length).
    pub normals: Vec<Vector3<f64>>,
    /// Triangle indices (every 3 consecutive values form one triangle).
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Corner positions of triangle `i`.
    pub fn triangle(&self, i: usize) -> [Vector3<f64>; 3] {
        let idx = &self.indices[i * 3..i * 3 + 3];
        [
            self.vertices[idx[0] as usize],
            self.vertices[idx[1] as usize],
            self.vertices[idx[2] as usize],
        ]
    }

    /// Axis-aligned bounds of all vertices, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<BBox3> {
        let first = *self.vertices.first()?;
        let mut bbox = BBox3::new(first, first);
        for v in &self.vertices[1..] {
            bbox.min = bbox.min.inf(v);
            bbox.max = bbox.max.sup(v);
        }
        Some(bbox)
    }

    /// Append another mesh, offsetting its indices.
    pub fn append(&mut self, other: TriangleMesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.normals.extend(other.normals);
        self.indices.extend(other.indices.into_iter().map(|i| base + i));
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox3 {
    pub min: Vector3<f64>,
    pub max: Vector3<f64>,
}

impl BBox3 {
    pub fn new(min: Vector3<f64>, max: Vector3<f64>) -> Self {
        Self { min, max }
    }
}

/// Tessellation quality for mesh-based formats (STL, GLB).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TessSettings {
    /// Maximum distance between a chord and the true surface.
    pub chord_tolerance: f64,
    /// Target segment length along arcs and seam lines. Segment counts are
    /// capped, so very large shapes end up with longer segments.
    pub max_edge_length: f64,
    /// Minimum segments around a full circle. Arcs get their share of it.
    pub min_subdivisions: u32,
}

impl Default for TessSettings {
    fn default() -> Self {
        Self {
            chord_tolerance: 0.01,
            max_edge_length: 2.0,
            min_subdivisions: 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_of_two_points() {
        let mesh = TriangleMesh {
            vertices: vec![Vector3::new(1.0, -2.0, 3.0), Vector3::new(-1.0, 4.0, 0.0)],
            normals: vec![Vector3::z(); 2],
            indices: vec![],
        };
        let bbox = mesh.bounds().unwrap();
        assert_eq!(bbox.min, Vector3::new(-1.0, -2.0, 0.0));
        assert_eq!(bbox.max, Vector3::new(1.0, 4.0, 3.0));
        assert!(TriangleMesh::default().bounds().is_none());
    }

    #[test]
    fn append_offsets_indices() {
        let tri = || TriangleMesh {
            vertices: vec![Vector3::zeros(), Vector3::x(), Vector3::y()],
            normals: vec![Vector3::z(); 3],
            indices: vec![0, 1, 2],
        };
        let mut mesh = tri();
        mesh.append(tri());
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn partial_settings_fill_defaults() {
        let settings: TessSettings = toml::from_str("chord_tolerance = 0.5").unwrap();
        assert_eq!(settings.chord_tolerance, 0.5);
        assert_eq!(settings.min_subdivisions, TessSettings::default().min_subdivisions);
    }
}
