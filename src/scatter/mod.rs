//! This module contains the top-level scatter orchestrators.
//!
//! Both entry points follow the same shape: validate every precondition up
//! front, deep-copy the target so the caller never observes partial mutation,
//! promote nullability lazily, then hand the actual data movement to the
//! kernels. Table-to-table scatter is expressed as map inversion followed by a
//! copy-preserving gather; scalar scatter is a constant broadcast plus
//! validity marking, per column.
//!
//! The asymmetry with plain gather is deliberate and load-bearing: scatter
//! never touches a destination row whose source mapping is absent or out of
//! range, while overwrite-mode gather (the compaction path) rewrites every row
//! it produces.

use log::debug;
use rayon::prelude::*;

use crate::config::ExecutionMode;
use crate::context::ExecContext;
use crate::error::PindahError;
use crate::kernels::broadcast::broadcast_into_column;
use crate::kernels::dictionary::reconcile_dictionaries;
use crate::kernels::gather::gather;
use crate::kernels::invert::invert_scatter_map;
use crate::kernels::mark::mark_rows;
use crate::table::{Column, Scalar, Table};
use crate::types::RowIndex;


//==================================================================================
// 1. Table-to-Table Scatter
//==================================================================================

/// Scatters `source`'s rows into a fresh copy of `target`.
///
/// `scatter_map[i]` names the destination row for source row `i`. Destination
/// rows the map never names keep their original value and validity bit;
/// out-of-range destinations are silently dropped (an out-of-range destination
/// is simply never modified). Duplicate destinations keep an
/// implementation-defined one of the colliding source rows; see
/// [`crate::kernels::invert`].
///
/// # Errors
/// Column-count, per-column dtype, and map-length mismatches are rejected
/// before any buffer is copied or written.
pub fn scatter(
    ctx: &ExecContext,
    source: &Table,
    scatter_map: &[RowIndex],
    target: &Table,
) -> Result<Table, PindahError> {
    check_matching_layout(source, target)?;

    // 1. Zero source rows: nothing can move; the result is the target as-is.
    if source.num_rows() == 0 {
        return Ok(target.deep_copy());
    }
    if scatter_map.len() != source.num_rows() {
        return Err(PindahError::ShapeMismatch(format!(
            "scatter map has {} entries for {} source rows",
            scatter_map.len(),
            source.num_rows()
        )));
    }

    // 2. The caller's target is read for shape only; all writes land in a copy.
    let mut output = target.deep_copy();

    // 3. Lazy nullability promotion: a destination column only grows a mask
    //    once a null could actually be scattered into it.
    let mut masks_promoted = 0usize;
    for (src_col, out_col) in source.columns().iter().zip(output.columns_mut()) {
        if src_col.is_nullable() && !out_col.is_nullable() {
            out_col.ensure_validity();
            masks_promoted += 1;
        }
    }

    // 4. Dictionary columns must agree on one encoding before keys can move.
    let reconciled = reconcile_source(source, &mut output)?;
    let gather_source = reconciled.as_ref().unwrap_or(source);

    // 5. Scatter-as-inverted-gather: build the gather map, then let the
    //    bounds-checked, copy-preserving gather do the per-column copies.
    let gather_map = invert_scatter_map(ctx, scatter_map, output.num_rows());
    gather(ctx, gather_source, &gather_map, &mut output, true, false)?;

    debug!(
        "scatter moved {} source rows into {} destination rows ({} masks promoted)",
        source.num_rows(),
        output.num_rows(),
        masks_promoted
    );
    log_metric!(
        "event" = "scatter",
        "source_rows" = &source.num_rows(),
        "dest_rows" = &output.num_rows(),
        "masks_promoted" = &masks_promoted,
    );

    Ok(output)
}

/// Shared layout validation: equal column counts, pairwise-equal dtypes, and
/// (for dictionary columns) equal value dtypes.
fn check_matching_layout(source: &Table, target: &Table) -> Result<(), PindahError> {
    if source.num_columns() != target.num_columns() {
        return Err(PindahError::ShapeMismatch(format!(
            "source has {} columns, target {}",
            source.num_columns(),
            target.num_columns()
        )));
    }
    for (i, (src_col, tgt_col)) in source.columns().iter().zip(target.columns()).enumerate() {
        if src_col.dtype() != tgt_col.dtype() {
            return Err(PindahError::TypeMismatch(format!(
                "column {}: source is {}, target is {}",
                i,
                src_col.dtype(),
                tgt_col.dtype()
            )));
        }
        if let (Some(src_dict), Some(tgt_dict)) = (src_col.dictionary(), tgt_col.dictionary()) {
            if src_dict.dtype() != tgt_dict.dtype() {
                return Err(PindahError::TypeMismatch(format!(
                    "column {}: dictionary values are {} vs {}",
                    i,
                    src_dict.dtype(),
                    tgt_dict.dtype()
                )));
            }
        }
    }
    Ok(())
}

/// Reconciles every dictionary column pair. Returns a replacement source table
/// (remapped keys, merged dictionaries) when any column needed it; plain
/// columns are deep-copied unchanged so the gather sees one coherent table.
fn reconcile_source(source: &Table, output: &mut Table) -> Result<Option<Table>, PindahError> {
    if !source.columns().iter().any(|c| c.dtype().is_dictionary()) {
        return Ok(None);
    }

    let mut columns = Vec::with_capacity(source.num_columns());
    for (src_col, out_col) in source.columns().iter().zip(output.columns_mut()) {
        if src_col.dtype().is_dictionary() {
            columns.push(reconcile_dictionaries(src_col, out_col)?);
        } else {
            columns.push(src_col.deep_copy());
        }
    }
    Table::new(columns).map(Some)
}

//==================================================================================
// 2. Scalar Scatter
//==================================================================================

/// Broadcasts one scalar per column into every destination row named by
/// `scatter_map`, in a fresh copy of `target`.
///
/// Out-of-range map entries are dropped up front (scatter semantics: such
/// destinations are never modified). A null scalar aimed at a non-nullable
/// column first promotes that column's nullability. Per column, the value
/// write and the validity write touch disjoint memory; distinct columns run
/// concurrently on the worker pool.
///
/// # Errors
/// Scalar count must equal the column count, each scalar's dtype must equal
/// its column's dtype exactly, and dictionary scalars are unsupported:
/// callers pre-resolve categoricals to a plain representation.
pub fn scatter_scalars(
    ctx: &ExecContext,
    scalars: &[Scalar],
    scatter_map: &[RowIndex],
    target: &Table,
) -> Result<Table, PindahError> {
    if scalars.len() != target.num_columns() {
        return Err(PindahError::ShapeMismatch(format!(
            "{} scalars for {} columns",
            scalars.len(),
            target.num_columns()
        )));
    }
    for (i, (scalar, col)) in scalars.iter().zip(target.columns()).enumerate() {
        if scalar.dtype().is_dictionary() {
            return Err(PindahError::UnsupportedType(format!(
                "column {}: dictionary scalars cannot be scattered",
                i
            )));
        }
        if scalar.dtype() != col.dtype() {
            return Err(PindahError::TypeMismatch(format!(
                "column {}: {} scalar into a {} column",
                i,
                scalar.dtype(),
                col.dtype()
            )));
        }
    }

    let mut output = target.deep_copy();
    let dest_rows = output.num_rows();
    let in_range: Vec<RowIndex> = scatter_map
        .iter()
        .copied()
        .filter(|&row| row >= 0 && (row as usize) < dest_rows)
        .collect();

    for (scalar, out_col) in scalars.iter().zip(output.columns_mut()) {
        if !scalar.is_valid() && !out_col.is_nullable() {
            out_col.ensure_validity();
        }
    }

    let write_column = |(out_col, scalar): (&mut Column, &Scalar)| -> Result<(), PindahError> {
        broadcast_into_column(out_col, &in_range, scalar)?;
        // The validity write runs only when a mask exists; a valid scalar
        // into a non-nullable column has nothing to mark.
        if let Some(mask) = out_col.validity_mut() {
            mark_rows(ctx, mask, &in_range, scalar.is_valid());
        }
        Ok(())
    };

    let concurrent_columns = matches!(ctx.config().execution_mode, ExecutionMode::Parallel)
        && output.num_columns() > 1;
    if concurrent_columns {
        output
            .columns_mut()
            .par_iter_mut()
            .zip(scalars.par_iter())
            .try_for_each(write_column)?;
    } else {
        output
            .columns_mut()
            .iter_mut()
            .zip(scalars.iter())
            .try_for_each(write_column)?;
    }

    debug!(
        "scalar scatter broadcast {} columns into {} of {} destination rows",
        scalars.len(),
        in_range.len(),
        dest_rows
    );

    Ok(output)
}
