// In: src/bridge/stateless_api.rs

//! The stateless, Arrow-facing public API. Each function marshals Arrow data
//! into the pure engine types, runs the engine under the caller's
//! `ExecContext`, and marshals the result back out.

use arrow::array::{Array, ArrayRef, RecordBatch};

use crate::bridge::arrow_impl;
use crate::context::ExecContext;
use crate::error::PindahError;
use crate::partition;
use crate::scatter;

/// Scatters `source`'s rows into a fresh copy of `target`, by Arrow batches.
///
/// The scatter map must be a null-free `Int32` array of one entry per source
/// row. The result carries `target`'s schema, with field nullability widened
/// where scattering promoted a column's nullability.
pub fn scatter_record_batch(
    ctx: &ExecContext,
    source: &RecordBatch,
    scatter_map: &dyn Array,
    target: &RecordBatch,
) -> Result<RecordBatch, PindahError> {
    // 1. Marshall the data from the Arrow world into our pure internal format.
    let source_table = arrow_impl::record_batch_to_table(source)?;
    let target_table = arrow_impl::record_batch_to_table(target)?;
    let map = arrow_impl::array_to_index_vec(scatter_map)?;

    // 2. Call the pure engine.
    let result = scatter::scatter(ctx, &source_table, &map, &target_table)?;

    // 3. The bridge finishes the job.
    arrow_impl::table_to_record_batch(&result, &target.schema())
}

/// Partitions `batch` by arbitrary group ids; sub-batches come back in
/// ascending id order together with the id column itself.
pub fn groups_to_record_batches(
    ctx: &ExecContext,
    batch: &RecordBatch,
    group_map: &dyn Array,
) -> Result<(Vec<RecordBatch>, ArrayRef), PindahError> {
    let table = arrow_impl::record_batch_to_table(batch)?;
    let map_column = arrow_impl::array_to_column(group_map)?;

    let grouped = partition::groups_to_tables(ctx, &table, &map_column)?;

    let batches = grouped
        .tables
        .iter()
        .map(|t| arrow_impl::table_to_record_batch(t, &batch.schema()))
        .collect::<Result<Vec<_>, _>>()?;
    let ids = arrow_impl::column_to_array(&grouped.group_ids)?;
    Ok((batches, ids))
}

/// Partitions `batch` by a dense non-negative group enumeration
/// (`0..=max`); ids that never occur yield empty sub-batches.
pub fn scatter_to_record_batches(
    ctx: &ExecContext,
    batch: &RecordBatch,
    group_map: &dyn Array,
) -> Result<Vec<RecordBatch>, PindahError> {
    let table = arrow_impl::record_batch_to_table(batch)?;
    let map_column = arrow_impl::array_to_column(group_map)?;

    let tables = partition::scatter_to_tables(ctx, &table, &map_column)?;

    tables
        .iter()
        .map(|t| arrow_impl::table_to_record_batch(t, &batch.schema()))
        .collect()
}
