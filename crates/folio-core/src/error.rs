// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Folio.
//
// Two layers: `DecodeError` is per image and never aborts a batch on its own;
// `FolioError` is what a whole call returns when it cannot produce a document.

use thiserror::Error;

/// Why a single image could not be rasterised.
///
/// Recorded against the failing item; the batch carries on with the next one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("declared media type {0:?} is not an image type")]
    UnsupportedMediaType(String),

    #[error("declared media type {declared:?} does not match the content ({detected})")]
    MediaTypeMismatch { declared: String, detected: String },

    #[error("image data could not be decoded: {0}")]
    Corrupt(String),

    #[error("image decoded to zero dimensions ({width}x{height})")]
    ZeroDimension { width: u32, height: u32 },

    #[error("re-encoding to JPEG failed: {0}")]
    Encode(String),
}

/// Top-level error type for all Folio operations.
#[derive(Debug, Error)]
pub enum FolioError {
    // -- Call-level conversion errors --
    #[error("no images were supplied")]
    EmptyBatch,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("none of the {attempted} images could be converted")]
    TotalFailure { attempted: usize },

    #[error("document assembly failed: {0}")]
    Assembly(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FolioError>;
