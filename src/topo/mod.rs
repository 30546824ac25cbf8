//! Boundary topology of the kernel's solids.
//!
//! Vertices, edges, coedges, wires, faces, shells and solids live in flat
//! arenas inside a [`TopoStore`] and point at each other through typed
//! handles, so the cyclic face/edge graph needs no shared ownership.
//! [`validate_solid`] checks that a shell is closed and manifold.

pub mod store;
pub mod types;
pub mod validate;

pub use store::TopoStore;
pub use types::*;
pub use validate::{validate_solid, ValidationResult};
