//! # Error Types
//!
//! This module defines error types used throughout the laurea library.

use thiserror::Error;

/// Main error type for laurea operations
#[derive(Debug, Error)]
pub enum LaureaError {
    /// User input rejected before any side effect (empty name, bad color, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// A second required field or asset placeholder of the same kind
    #[error("Duplicate element: {0}")]
    DuplicateElement(String),

    /// Malformed persisted template document
    #[error("Parse error: {0}")]
    Parse(String),

    /// Asset loading or decoding failure (upload, fetch, data URI)
    #[error("Asset error: {0}")]
    Asset(String),

    /// Persistence collaborator failure (save/load round-trip)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Export pipeline failure (rasterization, PDF encoding)
    #[error("Export error: {0}")]
    Export(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
