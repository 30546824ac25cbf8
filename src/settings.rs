//! Runtime configuration, read from an optional TOML file.
//!
//! ```toml
//! output_dir = "out"
//! cone_strategy = "revolve"
//!
//! [tessellation]
//! chord_tolerance = 0.005
//! ```
//!
//! Every key is optional; missing keys keep their defaults.

use crate::builder::ConeStrategy;
use crate::error::{Error, Result};
use crate::types::TessSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Folder that file-mode output is written into.
    pub output_dir: PathBuf,
    pub tessellation: TessSettings,
    pub cone_strategy: ConeStrategy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("examples"),
            tessellation: TessSettings::default(),
            cone_strategy: ConeStrategy::default(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Settings(format!("failed to read {}: {e}", path.display())))?;
        let settings = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), ?settings, "settings loaded");
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let settings: Self = toml::from_str(content)
            .map_err(|e| Error::Settings(format!("invalid TOML: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Tessellation limits must be usable by the mesher.
    pub fn validate(&self) -> Result<()> {
        let tess = &self.tessellation;
        if !(tess.chord_tolerance.is_finite() && tess.chord_tolerance > 0.0) {
            return Err(Error::Settings(
                "tessellation.chord_tolerance must be > 0".to_string(),
            ));
        }
        if !(tess.max_edge_length.is_finite() && tess.max_edge_length > 0.0) {
            return Err(Error::Settings(
                "tessellation.max_edge_length must be > 0".to_string(),
            ));
        }
        if tess.min_subdivisions == 0 {
            return Err(Error::Settings(
                "tessellation.min_subdivisions must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}
