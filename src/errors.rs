//! Error Types
//!
//! This module defines the error types used throughout the viewer core.
//!
//! # Overview
//!
//! The main error type [`ViewerError`] covers whole-resource failures:
//! - Model (glTF) loading and decoding errors
//! - Environment map loading errors
//! - Configuration errors
//!
//! Per-node problems found while composing a scene are *not* errors. They are
//! collected as [`BuildWarning`](crate::compose::BuildWarning) values in the
//! scene's build report and the build carries on.
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, ViewerError>`.
//!
//! ```rust,ignore
//! use lustre::errors::Result;
//!
//! fn load_settings() -> Result<()> {
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for the viewer core.
#[derive(Error, Debug)]
pub enum ViewerError {
    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// The model asset could not be loaded or decoded.
    #[error("Failed to load model '{path}': {reason}")]
    AssetLoadFailed {
        /// Path that was requested
        path: PathBuf,
        /// Human readable cause
        reason: String,
    },

    /// The environment map could not be loaded or decoded.
    #[error("Failed to load environment map '{path}': {reason}")]
    EnvironmentLoadFailed {
        /// Path that was requested
        path: PathBuf,
        /// Human readable cause
        reason: String,
    },

    /// A node key did not resolve inside its asset graph.
    #[error("Node not found in asset graph: {0}")]
    NodeNotFound(String),

    /// glTF parsing error.
    #[cfg(feature = "gltf")]
    #[error("glTF error: {0}")]
    GltfError(String),

    /// Geometry data is inconsistent (missing positions, index out of range).
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    // ========================================================================
    // Transform Errors
    // ========================================================================
    /// The parent chain of a node is cyclic or dangling.
    ///
    /// Scene composition downgrades this to a warning; it only surfaces as an
    /// error from the strict world-matrix query.
    #[error("Transform propagation failed for '{node}': {reason}")]
    TransformPropagationFailed {
        /// Name of the node whose world matrix was requested
        node: String,
        /// What went wrong during the walk
        reason: String,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid color literal in a material profile.
    #[error("Invalid color '{0}': expected #RRGGBB or a known color name")]
    InvalidColor(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Image decoding error.
    #[error("Image decode error: {0}")]
    ImageDecodeError(String),
}

// ============================================================================
// Convenient conversion implementations
// ============================================================================

impl From<image::ImageError> for ViewerError {
    fn from(err: image::ImageError) -> Self {
        ViewerError::ImageDecodeError(err.to_string())
    }
}

#[cfg(feature = "gltf")]
impl From<gltf::Error> for ViewerError {
    fn from(err: gltf::Error) -> Self {
        ViewerError::GltfError(err.to_string())
    }
}

/// Alias for `Result<T, ViewerError>`.
pub type Result<T> = std::result::Result<T, ViewerError>;
