// SPDX-License-Identifier: MIT
//
// Unified error types for Kartenwerk.

use thiserror::Error;

/// Top-level error type for all Kartenwerk operations.
#[derive(Debug, Error)]
pub enum KartenwerkError {
    // -- Image / tone pipeline errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("image decode failed for {filename}: {reason}")]
    ImageDecode { filename: String, reason: String },

    // -- Card rendering errors --
    #[error("font loading failed: {0}")]
    FontError(String),

    #[error("card face rendering failed: {0}")]
    RenderError(String),

    // -- Document output errors --
    #[error("PDF assembly failed: {0}")]
    PdfError(String),

    // -- Intake errors --
    #[error("metadata extraction failed: {0}")]
    MetadataError(String),

    #[error("label cache error: {0}")]
    CacheError(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, KartenwerkError>;
