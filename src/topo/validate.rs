//! Topology validation for B-Rep solids.
//!
//! Checks invariants that must hold for a valid manifold solid:
//! - Every edge has exactly 2 coedges (manifold condition)
//! - Paired coedges run in opposite directions
//! - Every wire is closed and its coedges chain end-to-start
//! - Euler formula: V - E + F = 2 (for genus-0 solids)

use super::store::TopoStore;
use super::types::*;
use std::collections::HashMap;

/// Result of topology validation.
#[derive(Debug)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Validate that a solid satisfies B-Rep invariants.
pub fn validate_solid(store: &TopoStore, solid_id: SolidId) -> ValidationResult {
    let mut errors = Vec::new();
    let faces = store.solid_faces(solid_id);

    // Wires must be closed before they can be walked.
    for &face_id in faces {
        let face = store.face(face_id);
        if !is_wire_closed(store, face.outer_wire) {
            errors.push(format!(
                "Face {:?}: outer wire {:?} is not closed",
                face_id, face.outer_wire
            ));
        }
    }
    if !errors.is_empty() {
        return ValidationResult {
            valid: false,
            errors,
        };
    }

    let mut edge_orientations: HashMap<EdgeId, Vec<bool>> = HashMap::new();
    for &face_id in faces {
        let coedges = store.wire_coedges(store.face(face_id).outer_wire);
        for (i, &coedge_id) in coedges.iter().enumerate() {
            let coedge = store.coedge(coedge_id);
            edge_orientations
                .entry(coedge.edge)
                .or_default()
                .push(coedge.forward);

            let next = store.coedge(coedges[(i + 1) % coedges.len()]);
            if coedge_end(store, coedge) != coedge_start(store, next) {
                errors.push(format!(
                    "Face {:?}: coedge {:?} does not end where the next one starts",
                    face_id, coedge_id
                ));
            }
        }
    }

    for (&edge_id, orients) in &edge_orientations {
        if orients.len() != 2 {
            errors.push(format!(
                "Edge {:?} has {} coedges (expected 2 for manifold)",
                edge_id,
                orients.len()
            ));
        } else if orients[0] == orients[1] {
            errors.push(format!(
                "Edge {:?}: both coedges have same orientation (should be opposite for manifold)",
                edge_id
            ));
        }
    }

    let v = store.solid_vertices(solid_id).len() as i64;
    let e = store.solid_edges(solid_id).len() as i64;
    let f = store.solid_face_count(solid_id) as i64;
    let euler = v - e + f;
    if euler != 2 {
        errors.push(format!(
            "Euler formula V-E+F = {v}-{e}+{f} = {euler} (expected 2 for genus-0)"
        ));
    }

    ValidationResult {
        valid: errors.is_empty(),
        errors,
    }
}

fn coedge_start(store: &TopoStore, coedge: &CoEdge) -> VertexId {
    let edge = store.edge(coedge.edge);
    if coedge.forward {
        edge.start
    } else {
        edge.end
    }
}

fn coedge_end(store: &TopoStore, coedge: &CoEdge) -> VertexId {
    let edge = store.edge(coedge.edge);
    if coedge.forward {
        edge.end
    } else {
        edge.start
    }
}

/// Check that a wire forms a closed loop (the linked list returns to the start).
fn is_wire_closed(store: &TopoStore, wire_id: WireId) -> bool {
    let first = store.wire(wire_id).first_coedge;
    let mut current = store.coedge(first).next;
    let max_iter = store.coedges.len();
    let mut count = 1;

    while current != first {
        if count > max_iter {
            return false;
        }
        current = store.coedge(current).next;
        count += 1;
    }
    true
}
