//! Arena-based topology store.
//!
//! All topology entities live in the `TopoStore`. Entities reference each other
//! via typed indices (e.g., `VertexId`, `EdgeId`). This avoids Rc/Arc reference
//! cycles in the inherently cyclic topology graph.

use super::types::*;
use crate::curve::Curve3;
use crate::math::Point3;
use crate::surface::Surface;

/// Arena-based storage for all topology entities.
#[derive(Clone, Debug, Default)]
pub struct TopoStore {
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
    pub coedges: Vec<CoEdge>,
    pub wires: Vec<Wire>,
    pub faces: Vec<Face>,
    pub shells: Vec<Shell>,
    pub solids: Vec<Solid>,
}

impl TopoStore {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Add entities ---

    pub fn add_vertex(&mut self, point: Point3) -> VertexId {
        let id = VertexId(self.vertices.len());
        self.vertices.push(Vertex { point });
        id
    }

    pub fn add_edge(&mut self, edge: Edge) -> EdgeId {
        let id = EdgeId(self.edges.len());
        self.edges.push(edge);
        id
    }

    /// Add a straight edge between two existing vertices.
    pub fn add_line_edge(&mut self, start: VertexId, end: VertexId) -> EdgeId {
        let p0 = self.vertex(start).point;
        let p1 = self.vertex(end).point;
        self.add_edge(Edge {
            curve: Curve3::segment(p0, p1),
            t_start: 0.0,
            t_end: 1.0,
            start,
            end,
        })
    }

    /// Add a face bounded by a single wire.
    ///
    /// `edge_dirs` lists the wire's (EdgeId, forward) pairs in loop order.
    pub fn add_face_with_wire(
        &mut self,
        surface: Surface,
        edge_dirs: &[(EdgeId, bool)],
        outward: bool,
    ) -> FaceId {
        // Pre-allocate the face so coedges can reference it
        let face_id = FaceId(self.faces.len());
        self.faces.push(Face {
            surface,
            outer_wire: WireId(0),
            outward,
        });

        let first = self.coedges.len();
        let n = edge_dirs.len();
        for (i, &(edge, forward)) in edge_dirs.iter().enumerate() {
            self.coedges.push(CoEdge {
                edge,
                forward,
                next: CoEdgeId(first + (i + 1) % n),
                face: face_id,
            });
        }

        let wire = WireId(self.wires.len());
        self.wires.push(Wire {
            first_coedge: CoEdgeId(first),
        });
        self.faces[face_id.0].outer_wire = wire;
        face_id
    }

    pub fn add_shell(&mut self, shell: Shell) -> ShellId {
        let id = ShellId(self.shells.len());
        self.shells.push(shell);
        id
    }

    /// Close a set of faces into a shell and wrap it in a solid.
    pub fn add_solid(&mut self, faces: Vec<FaceId>) -> SolidId {
        let outer_shell = self.add_shell(Shell { faces });
        let id = SolidId(self.solids.len());
        self.solids.push(Solid { outer_shell });
        id
    }

    // --- Get entities ---

    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0]
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    pub fn coedge(&self, id: CoEdgeId) -> &CoEdge {
        &self.coedges[id.0]
    }

    pub fn wire(&self, id: WireId) -> &Wire {
        &self.wires[id.0]
    }

    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id.0]
    }

    pub fn shell(&self, id: ShellId) -> &Shell {
        &self.shells[id.0]
    }

    pub fn solid(&self, id: SolidId) -> &Solid {
        &self.solids[id.0]
    }

    // --- Traversal helpers ---

    /// All coedges in a wire loop, in loop order.
    pub fn wire_coedges(&self, wire_id: WireId) -> Vec<CoEdgeId> {
        let first = self.wire(wire_id).first_coedge;
        let mut result = vec![first];
        let mut current = self.coedge(first).next;
        while current != first {
            result.push(current);
            current = self.coedge(current).next;
        }
        result
    }

    /// Faces of a solid's outer shell.
    pub fn solid_faces(&self, solid_id: SolidId) -> &[FaceId] {
        let shell = self.solid(solid_id).outer_shell;
        &self.shell(shell).faces
    }

    /// Collect all unique edges referenced by a solid, in first-use order.
    pub fn solid_edges(&self, solid_id: SolidId) -> Vec<EdgeId> {
        let mut edges = Vec::new();
        for &face_id in self.solid_faces(solid_id) {
            for coedge_id in self.wire_coedges(self.face(face_id).outer_wire) {
                let edge_id = self.coedge(coedge_id).edge;
                if !edges.contains(&edge_id) {
                    edges.push(edge_id);
                }
            }
        }
        edges
    }

    /// Collect all unique vertices referenced by a solid, in first-use order.
    pub fn solid_vertices(&self, solid_id: SolidId) -> Vec<VertexId> {
        let mut verts = Vec::new();
        for edge_id in self.solid_edges(solid_id) {
            let edge = self.edge(edge_id);
            for v in [edge.start, edge.end] {
                if !verts.contains(&v) {
                    verts.push(v);
                }
            }
        }
        verts
    }

    /// Count faces in a solid's outer shell.
    pub fn solid_face_count(&self, solid_id: SolidId) -> usize {
        self.solid_faces(solid_id).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector3;

    #[test]
    fn face_wire_is_circular() {
        let mut store = TopoStore::new();
        let a = store.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = store.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = store.add_vertex(Point3::new(0.0, 1.0, 0.0));
        let ab = store.add_line_edge(a, b);
        let bc = store.add_line_edge(b, c);
        let ca = store.add_line_edge(c, a);
        let face = store.add_face_with_wire(
            Surface::Plane {
                origin: Point3::origin(),
                normal: Vector3::z(),
            },
            &[(ab, true), (bc, true), (ca, true)],
            true,
        );

        let coedges = store.wire_coedges(store.face(face).outer_wire);
        assert_eq!(coedges.len(), 3);
        assert_eq!(store.coedge(coedges[2]).next, coedges[0]);
        assert!(coedges.iter().all(|&c| store.coedge(c).face == face));
    }
}
