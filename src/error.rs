//! Error types for shape generation and export.
//!
//! `Error` is the user-facing taxonomy. Failures that originate inside the
//! B-Rep kernel are carried unchanged as `KernelError`.

use std::io;
use thiserror::Error;

/// Errors that can occur while building or exporting a shape.
#[derive(Error, Debug)]
pub enum Error {
    /// The shape identifier is not in the catalogue.
    #[error("Unknown shape: {0}")]
    UnknownShape(String),

    /// A required parameter was not supplied.
    #[error("Shape '{shape}' requires parameter '{parameter}'")]
    MissingParameter {
        shape: &'static str,
        parameter: &'static str,
    },

    /// The requested output format or file extension is not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Mesh conversion for GLB output failed.
    #[error("Mesh conversion failed: {0}")]
    ConversionFailure(String),

    /// The geometry kernel rejected a construction or export.
    #[error(transparent)]
    Kernel(#[from] KernelError),

    /// I/O error outside the kernel writers (temp files, output folder).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The settings file could not be read or parsed.
    #[error("Settings error: {0}")]
    Settings(String),
}

/// Errors raised by the B-Rep kernel: primitive construction and format writers.
#[derive(Error, Debug)]
pub enum KernelError {
    /// A dimension is zero, negative or not finite.
    #[error("Invalid dimension '{name}': {value}")]
    InvalidDimension { name: &'static str, value: f64 },

    /// A revolve profile cannot be turned into a closed solid.
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    /// A constructed solid failed topology validation.
    #[error("Invalid topology: {}", .0.join("; "))]
    InvalidTopology(Vec<String>),

    /// A format writer failed.
    #[error("Export failed: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for shape operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for kernel operations.
pub type KernelResult<T> = std::result::Result<T, KernelError>;
