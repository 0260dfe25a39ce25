// In: src/error.rs

//! This module defines the single, unified error type for the entire pindah library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PindahError {
    // =========================================================================
    // === Precondition Violations (rejected before any kernel runs)
    // =========================================================================
    #[error("Unsupported data type for this operation: {0}")]
    UnsupportedType(String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Malformed group map: {0}")]
    MalformedGroupMap(String),

    #[error("Index out of bounds: {0}")]
    OutOfBounds(String),

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the Arrow library, raised by the bridge layer.
    #[error("Arrow operation failed: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),

    /// An error from the Serde JSON library, raised while parsing a boundary config.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// An error from a safe byte-casting operation failing.
    #[error("Byte slice casting error: {0}")]
    PodCast(String), // Manual `From` impl is needed as bytemuck::PodCastError doesn't impl Error

    /// An error for Python FFI (Foreign Function Interface) operations.
    #[error("FFI operation failed: {0}")]
    FfiError(String), // PyErr doesn't impl Error, so we can't use #[from] here.
}

// =============================================================================
// === Manual `From` Implementations ===
// =============================================================================

impl From<bytemuck::PodCastError> for PindahError {
    fn from(err: bytemuck::PodCastError) -> Self {
        PindahError::PodCast(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<pyo3::PyErr> for PindahError {
    fn from(err: pyo3::PyErr) -> Self {
        PindahError::FfiError(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<PindahError> for pyo3::PyErr {
    fn from(err: PindahError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
