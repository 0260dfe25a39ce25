//! The Python-facing FFI layer. All `#[pyfunction]` wrappers live in
//! `python.rs`; this module only re-exports them for registration in the
//! crate's `#[pymodule]`.

pub mod python;

pub use python::{
    enable_verbose_logging_py, groups_to_tables_py, scatter_py, scatter_to_tables_py,
};
