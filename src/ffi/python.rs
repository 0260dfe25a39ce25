// In: src/ffi/python.rs

use std::sync::{Arc, Once};

use arrow::array::{make_array, ArrayData, RecordBatch};
use arrow::pyarrow::PyArrowType;
use log::LevelFilter;
use pyo3::prelude::*;

use crate::bridge;
use crate::config::PindahConfig;
use crate::context::ExecContext;
use crate::error::PindahError;

//==================================================================================
// I. Shared Helpers
//==================================================================================

/// Builds the engine's execution context from an optional JSON config document
/// supplied by the Python caller; absent config means defaults.
fn context_from_json(config_json: Option<&str>) -> Result<ExecContext, PindahError> {
    let config = match config_json {
        Some(text) => serde_json::from_str::<PindahConfig>(text)?,
        None => PindahConfig::default(),
    };
    Ok(ExecContext::new(Arc::new(config)))
}

//==================================================================================
// II. Stateless Relocation API
//==================================================================================

/// Scatters `source`'s rows into a fresh copy of `target`.
///
/// `scatter_map` is a null-free pyarrow `int32` array with one destination row
/// per source row. Returns a new RecordBatch; the inputs are never mutated.
#[pyfunction]
#[pyo3(signature = (source, scatter_map, target, config_json = None))]
pub fn scatter_py(
    py: Python,
    source: PyArrowType<RecordBatch>,
    scatter_map: PyArrowType<ArrayData>,
    target: PyArrowType<RecordBatch>,
    config_json: Option<&str>,
) -> PyResult<PyArrowType<RecordBatch>> {
    let ctx = context_from_json(config_json)?;
    let map = make_array(scatter_map.0);
    let result = py.allow_threads(|| {
        bridge::scatter_record_batch(&ctx, &source.0, map.as_ref(), &target.0)
    })?;
    Ok(PyArrowType(result))
}

/// Partitions `batch` by arbitrary `int32` group ids. Returns the sub-batches
/// in ascending id order plus the id array itself, in the same order.
#[pyfunction]
#[pyo3(signature = (batch, group_map, config_json = None))]
pub fn groups_to_tables_py(
    py: Python,
    batch: PyArrowType<RecordBatch>,
    group_map: PyArrowType<ArrayData>,
    config_json: Option<&str>,
) -> PyResult<(Vec<PyArrowType<RecordBatch>>, PyArrowType<ArrayData>)> {
    let ctx = context_from_json(config_json)?;
    let map = make_array(group_map.0);
    let (batches, ids) = py.allow_threads(|| {
        bridge::groups_to_record_batches(&ctx, &batch.0, map.as_ref())
    })?;
    Ok((
        batches.into_iter().map(PyArrowType).collect(),
        PyArrowType(ids.to_data()),
    ))
}

/// Partitions `batch` by a dense, non-negative `int32` group enumeration;
/// group ids that never occur yield empty sub-batches.
#[pyfunction]
#[pyo3(signature = (batch, group_map, config_json = None))]
pub fn scatter_to_tables_py(
    py: Python,
    batch: PyArrowType<RecordBatch>,
    group_map: PyArrowType<ArrayData>,
    config_json: Option<&str>,
) -> PyResult<Vec<PyArrowType<RecordBatch>>> {
    let ctx = context_from_json(config_json)?;
    let map = make_array(group_map.0);
    let batches = py.allow_threads(|| {
        bridge::scatter_to_record_batches(&ctx, &batch.0, map.as_ref())
    })?;
    Ok(batches.into_iter().map(PyArrowType).collect())
}

//==================================================================================
// III. Diagnostics
//==================================================================================

/// Turns on debug-level logging for the engine. Safe to call repeatedly; the
/// logger is only installed once per process.
#[pyfunction]
pub fn enable_verbose_logging_py() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        env_logger::Builder::from_default_env()
            .filter_level(LevelFilter::Debug)
            .init();
    });
}
