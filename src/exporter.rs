//! Serializing built models: to a file, to bytes, or to base64 text.
//!
//! Byte export goes through a scoped temporary file so every format takes the
//! same path as file export. GLB is not written by the kernel; it is produced
//! from the STL bytes by reading them back into an indexed mesh.

use crate::builder::Model;
use crate::error::{Error, Result};
use crate::export::{write_glb, write_native, ExportFormat};
use crate::mesh::mesh_from_stl;
use crate::types::TessSettings;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Writes models in any [`ExportFormat`].
#[derive(Clone, Debug, Default)]
pub struct Exporter {
    tessellation: TessSettings,
    temp_dir: Option<PathBuf>,
}

impl Exporter {
    pub fn new(tessellation: TessSettings) -> Self {
        Self {
            tessellation,
            temp_dir: None,
        }
    }

    /// Create scratch files for byte export in `dir` instead of the system temp directory.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Write `model` to `path`, picking the format from its extension.
    ///
    /// Only `.step`, `.stp` and `.stl` are accepted. Missing parent
    /// directories are created.
    pub fn export_to_file(&self, model: &Model, path: &Path) -> Result<()> {
        let format = format_for_path(path)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_model(model, format, &mut writer)?;
        writer.flush()?;
        info!(path = %path.display(), %format, "model written");
        Ok(())
    }

    /// Serialize `model` and return the raw bytes.
    pub fn export_to_bytes(&self, model: &Model, format: ExportFormat) -> Result<Vec<u8>> {
        if !format.is_native() {
            let stl = self.native_bytes(model, ExportFormat::Stl)?;
            let mesh = mesh_from_stl(&stl)?;
            let mut glb = Vec::new();
            write_glb(&mesh, &mut glb).map_err(|e| Error::ConversionFailure(e.to_string()))?;
            debug!(
                triangles = mesh.triangle_count(),
                bytes = glb.len(),
                "converted STL to GLB"
            );
            return Ok(glb);
        }
        self.native_bytes(model, format)
    }

    /// Serialize `model` and encode it as standard base64 with padding.
    pub fn export_to_base64(&self, model: &Model, format: ExportFormat) -> Result<String> {
        let bytes = self.export_to_bytes(model, format)?;
        Ok(STANDARD.encode(bytes))
    }

    /// Write `model` into `folder` as `file_name`, adding `_N` to the stem if
    /// the name is taken. Returns the path actually written.
    ///
    /// The name is picked by probing the folder, so two writers racing on the
    /// same folder can still collide.
    pub fn save_model(&self, model: &Model, folder: &Path, file_name: &str) -> Result<PathBuf> {
        let name = Path::new(file_name);
        format_for_path(name)?;
        let base = name
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::UnsupportedFormat(file_name.to_string()))?;
        let ext = name
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::UnsupportedFormat(file_name.to_string()))?;

        fs::create_dir_all(folder)?;
        let path = unique_output_path(folder, base, ext);
        self.export_to_file(model, &path)?;
        Ok(path)
    }

    fn native_bytes(&self, model: &Model, format: ExportFormat) -> Result<Vec<u8>> {
        let mut builder = tempfile::Builder::new();
        let suffix = format!(".{}", format.name());
        builder.prefix("shapegen-").suffix(&suffix);
        let mut temp = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        debug!(path = %temp.path().display(), %format, "writing scratch file");
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            self.write_model(model, format, &mut writer)?;
            writer.flush()?;
        }
        let bytes = fs::read(temp.path())?;
        temp.close()?;
        Ok(bytes)
    }

    fn write_model<W: Write>(&self, model: &Model, format: ExportFormat, writer: &mut W) -> Result<()> {
        write_native(
            model.store(),
            model.solid(),
            format,
            model.kind().name(),
            &self.tessellation,
            writer,
        )?;
        Ok(())
    }
}

/// `folder/base.ext` if free, otherwise the first free `folder/base_N.ext` with N ≥ 1.
pub fn unique_output_path(folder: &Path, base: &str, ext: &str) -> PathBuf {
    let candidate = folder.join(format!("{base}.{ext}"));
    if !candidate.exists() {
        return candidate;
    }
    (1u64..)
        .map(|n| folder.join(format!("{base}_{n}.{ext}")))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

fn format_for_path(path: &Path) -> Result<ExportFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ExportFormat::from_extension(ext),
        None => Err(Error::UnsupportedFormat(path.display().to_string())),
    }
}
