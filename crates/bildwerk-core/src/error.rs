// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Bildwerk.

use thiserror::Error;

/// Top-level error type for all Bildwerk operations.
#[derive(Debug, Error)]
pub enum BildwerkError {
    // -- Image I/O --
    #[error("failed to decode image {path}: {reason}")]
    ImageDecode { path: String, reason: String },

    #[error("failed to encode image {path}: {reason}")]
    ImageEncode { path: String, reason: String },

    // -- Processing --
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("no feature descriptors found")]
    NoFeatures,

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BildwerkError>;
