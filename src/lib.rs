//! This file is the root of the `pindah_table` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of our library (`scatter`, `kernels`,
//!     etc.) so the Rust compiler knows they exist.
//! 2.  Defining the `#[pymodule]` which acts as the main entry point when the
//!     compiled library is imported into Python.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
mod observability; // Make macros available throughout the crate

pub mod bridge;
pub mod config;
pub mod kernels;
pub mod partition;
pub mod scatter;
pub mod table;
pub mod types;

mod context;
mod error;
#[cfg(feature = "python")]
mod ffi;
mod null_handling;
mod utils;

// --- Re-exports of the types that appear in public signatures ---
pub use context::ExecContext;
pub use error::PindahError;
pub use null_handling::ValidityMask;
pub use table::{Column, Scalar, Table};
pub use types::{PindahDataType, RowIndex, UNMODIFIED_ROW};

//==================================================================================
// 2. Python Module Definition
//==================================================================================
#[cfg(feature = "python")]
use pyo3::prelude::*;

/// The `pindah_table` Python module, containing all exposed Rust functions.
#[cfg(feature = "python")]
#[pymodule]
fn pindah_table(py: Python, m: &PyModule) -> PyResult<()> {
    // --- Stateless relocation API ---
    m.add_function(wrap_pyfunction!(ffi::scatter_py, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::groups_to_tables_py, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::scatter_to_tables_py, m)?)?;

    // --- Expose the custom error type ---
    m.add(
        "PindahError",
        py.get_type::<pyo3::exceptions::PyValueError>(),
    )?;

    // --- Expose version string as a module attribute ---
    m.add("__version__", VERSION)?;

    // --- Turn on logging for kernel/orchestrator diagnostics ---
    m.add_function(wrap_pyfunction!(ffi::enable_verbose_logging_py, m)?)?;

    Ok(())
}
