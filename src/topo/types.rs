//! Topology entity types and typed index handles.

use crate::curve::Curve3;
use crate::math::Point3;
use crate::surface::Surface;

/// Declare an index handle into one of the `TopoStore` arenas.
macro_rules! handle {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
            pub struct $name(pub usize);
        )*
    };
}

handle! {
    VertexId,
    EdgeId,
    CoEdgeId,
    WireId,
    FaceId,
    ShellId,
    /// Handle of a solid; the entry point for export and validation.
    SolidId,
}

// --- Topology entities ---

#[derive(Clone, Debug)]
pub struct Vertex {
    pub point: Point3,
}

/// A topological edge: a bounded curve segment between two vertices.
///
/// The geometric carrier is `curve` parameterized from `t_start` to `t_end`,
/// with `curve(t_start)` at `start` and `curve(t_end)` at `end`.
#[derive(Clone, Debug)]
pub struct Edge {
    pub curve: Curve3,
    pub t_start: f64,
    pub t_end: f64,
    pub start: VertexId,
    pub end: VertexId,
}

/// An oriented half-edge. Each manifold Edge has exactly two CoEdges
/// with opposite orientations, one per adjacent Face.
///
/// CoEdges form a circular linked list around the wire boundary of a face.
#[derive(Clone, Debug)]
pub struct CoEdge {
    pub edge: EdgeId,
    /// True if the coedge traverses the edge from start→end; false for end→start.
    pub forward: bool,
    /// Next coedge in the wire loop.
    pub next: CoEdgeId,
    /// The face this coedge belongs to.
    pub face: FaceId,
}

/// The boundary loop of a face, counter-clockwise seen from outside the solid.
#[derive(Clone, Debug)]
pub struct Wire {
    /// Any coedge in the loop (entry point for traversal).
    pub first_coedge: CoEdgeId,
}

/// A bounded region on a surface. Faces of this kernel never have holes:
/// annular regions are split into halves by seam edges.
#[derive(Clone, Debug)]
pub struct Face {
    pub surface: Surface,
    pub outer_wire: WireId,
    /// True if the face normal agrees with the surface normal; false if reversed.
    pub outward: bool,
}

#[derive(Clone, Debug)]
pub struct Shell {
    pub faces: Vec<FaceId>,
}

/// A solid bounded by one closed shell; cavities are not modelled.
#[derive(Clone, Debug)]
pub struct Solid {
    pub outer_shell: ShellId,
}
