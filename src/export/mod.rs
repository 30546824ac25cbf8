//! Export writers for B-Rep shapes.
//!
//! Provides writers for common CAD and mesh interchange formats:
//! - **STL**: Binary triangle mesh (tessellation-based)
//! - **STEP AP214**: Exact B-Rep geometry (no tessellation needed)
//! - **BREP**: OCCT "CASCADE Topology V1" text format with 2D parameter curves
//! - **IGES**: Wireframe of every edge (lines and circular arcs)
//! - **GLB**: glTF 2.0 binary container around an indexed triangle mesh

pub mod brep;
pub mod glb;
pub mod iges;
pub mod step;
pub mod stl;

pub use brep::write_brep;
pub use glb::write_glb;
pub use iges::write_iges;
pub use step::write_step;
pub use stl::write_stl;

use crate::error::{Error, KernelResult};
use crate::tessellate::tessellate_solid;
use crate::topo::{SolidId, TopoStore};
use crate::types::TessSettings;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::io::{self, Write};
use std::str::FromStr;

/// Output formats a solid can be serialized to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Stl,
    Step,
    Brep,
    Iges,
    Glb,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Stl,
        ExportFormat::Step,
        ExportFormat::Brep,
        ExportFormat::Iges,
        ExportFormat::Glb,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ExportFormat::Stl => "stl",
            ExportFormat::Step => "step",
            ExportFormat::Brep => "brep",
            ExportFormat::Iges => "iges",
            ExportFormat::Glb => "glb",
        }
    }

    /// Format for a file-mode output path. Only STEP (`.step`, `.stp`) and
    /// STL (`.stl`) files are written directly.
    pub fn from_extension(ext: &str) -> Result<Self, Error> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "step" | "stp" => Ok(ExportFormat::Step),
            "stl" => Ok(ExportFormat::Stl),
            _ => Err(Error::UnsupportedFormat(ext.to_string())),
        }
    }

    /// Whether the format is written by a kernel writer (everything but GLB).
    pub fn is_native(self) -> bool {
        !matches!(self, ExportFormat::Glb)
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExportFormat::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnsupportedFormat(s.to_string()))
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Serialize a solid with one of the kernel writers.
///
/// GLB is not a kernel format; it is built from an STL round trip by the exporter.
pub fn write_native<W: Write>(
    store: &TopoStore,
    solid: SolidId,
    format: ExportFormat,
    name: &str,
    tess: &TessSettings,
    writer: &mut W,
) -> KernelResult<()> {
    match format {
        ExportFormat::Stl => write_stl(&tessellate_solid(store, solid, tess), writer)?,
        ExportFormat::Step => write_step(store, solid, name, writer)?,
        ExportFormat::Brep => write_brep(store, solid, writer)?,
        ExportFormat::Iges => write_iges(store, solid, name, writer)?,
        ExportFormat::Glb => {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "GLB has no kernel writer; convert from STL",
            )
            .into())
        }
    }
    Ok(())
}

/// Decimal real with at most nine fractional digits and always a decimal
/// point (`5.`, `-0.25`), as STEP and IGES expect.
pub(crate) fn real(value: f64) -> String {
    let s = format!("{value:.9}");
    let s = s.trim_end_matches('0');
    match s {
        "-0." => "0.".to_string(),
        _ => s.to_string(),
    }
}

/// Entity id of an already written item.
pub(crate) fn lookup<K: Eq + Hash + fmt::Debug>(map: &HashMap<K, u64>, key: &K) -> io::Result<u64> {
    map.get(key).copied().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{key:?} referenced before it was written"),
        )
    })
}
