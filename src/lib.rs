//! Parametric primitive solids exported to CAD and mesh formats.
//!
//! A shape identifier plus its parameters is turned into a boundary
//! representation solid by a small arena-based B-Rep kernel, then written as
//! STL, STEP, BREP, IGES or GLB.
//!
//! ```rust,no_run
//! use shapegen::{build, Exporter, ExportFormat, Parameters};
//!
//! let cone = build("cone", &Parameters::default().with_radius(5.0).with_height(10.0)).unwrap();
//! let glb = Exporter::default().export_to_base64(&cone, ExportFormat::Glb).unwrap();
//! println!("{glb}");
//! ```

pub mod builder;
pub mod catalogue;
pub mod curve;
pub mod error;
pub mod export;
pub mod exporter;
pub mod format;
pub mod math;
pub mod mesh;
pub mod primitive;
pub mod settings;
pub mod surface;
pub mod tessellate;
pub mod topo;
pub mod types;

pub use builder::{build, build_with, BuildOptions, ConeStrategy, Model, Primitive};
pub use catalogue::{list_shapes, Parameters, ShapeKind, ShapeSpec};
pub use error::{Error, KernelError, Result};
pub use export::ExportFormat;
pub use exporter::{unique_output_path, Exporter};
pub use format::{format_catalogue, format_catalogue_named, CatalogueFormat};
pub use settings::Settings;
pub use types::{BBox3, TessSettings, TriangleMesh};
