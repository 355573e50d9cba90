//! Error Types
//!
//! This module defines the error types used throughout the toolkit.
//!
//! # Overview
//!
//! The main error type [`CinderError`] covers every failure mode of the core:
//! - GPU resource creation and command failures
//! - Shader compilation and program linking
//! - Asset parsing, missing files and unsupported image formats
//! - Invalid geometry or model assembly input
//!
//! None of these are recoverable inside the toolkit. Each is logged where the
//! driver produced diagnostic text and then handed to the caller, who decides
//! whether the failure halts rendering.
//!
//! ```rust,ignore
//! use cinder::errors::{CinderError, Result};
//!
//! fn load() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::gpu::ShaderStage;

/// The main error type for the toolkit.
#[derive(Error, Debug)]
pub enum CinderError {
    // ========================================================================
    // GPU Errors
    // ========================================================================
    /// The backend returned an invalid handle for a new object.
    #[error("Failed to create {resource}: {reason}")]
    ResourceCreation {
        /// Kind of object being created (buffer, texture, ...)
        resource: &'static str,
        /// Backend supplied reason
        reason: String,
    },

    /// A GPU command raised an error flag.
    #[error("GPU error 0x{code:04X} during {op}")]
    Gpu {
        /// Name of the command that failed
        op: &'static str,
        /// Raw backend error code
        code: u32,
    },

    // ========================================================================
    // Shader Errors
    // ========================================================================
    /// A shader stage failed to compile.
    #[error("Shader compilation error ({stage:?}): {log}")]
    ShaderCompile {
        /// Stage that failed
        stage: ShaderStage,
        /// Driver info log
        log: String,
    },

    /// The program failed to link.
    #[error("Shader program linking error: {0}")]
    ProgramLink(String),

    // ========================================================================
    // Asset Errors
    // ========================================================================
    /// A file could not be read through the file reader.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// The asset document is malformed.
    #[error("Failed to parse {path}: {reason}")]
    AssetParse {
        /// Document path
        path: String,
        /// What went wrong
        reason: String,
    },

    /// Image bytes could not be decoded.
    #[error("Image decode error: {0}")]
    ImageDecode(String),

    /// Pixel layout the toolkit cannot upload.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    // ========================================================================
    // Object Model Errors
    // ========================================================================
    /// Mesh input arrays are inconsistent.
    #[error("Invalid mesh data: {0}")]
    InvalidMesh(String),

    /// Model assembly input is inconsistent.
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Settings document could not be deserialized.
    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),
}

impl From<image::ImageError> for CinderError {
    fn from(err: image::ImageError) -> Self {
        CinderError::ImageDecode(err.to_string())
    }
}

/// Alias for `Result<T, CinderError>`.
pub type Result<T> = std::result::Result<T, CinderError>;
