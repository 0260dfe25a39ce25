//! This module contains the row-selection collaborator: compaction of the rows
//! whose mask bit is set into a new, densely-packed table, preserving original
//! row order.
//!
//! The partition engine drives this once per group. Internally it is index
//! collection followed by an overwrite-mode gather: every produced row is
//! targeted, so nothing here depends on the copy-preserving sentinel.

use bitvec::prelude::*;

use crate::context::ExecContext;
use crate::error::PindahError;
use crate::kernels::gather::gather;
use crate::null_handling::ValidityMask;
use crate::table::{Column, Table};
use crate::types::RowIndex;

//==================================================================================
// 1. Public API
//==================================================================================

/// Builds a new table containing exactly the rows of `table` whose bit in
/// `mask` is set, in their original order.
///
/// # Errors
/// `ShapeMismatch` when the mask length differs from the table's row count.
pub fn select_rows(
    ctx: &ExecContext,
    table: &Table,
    mask: &BitSlice,
) -> Result<Table, PindahError> {
    if mask.len() != table.num_rows() {
        return Err(PindahError::ShapeMismatch(format!(
            "selection mask covers {} rows but table has {}",
            mask.len(),
            table.num_rows()
        )));
    }

    let indices: Vec<RowIndex> = mask.iter_ones().map(|row| row as RowIndex).collect();

    let mut out_columns = Vec::with_capacity(table.num_columns());
    for src_col in table.columns() {
        out_columns.push(empty_like(src_col, indices.len())?);
    }
    let mut out = Table::new(out_columns)?;

    gather(ctx, table, &indices, &mut out, true, false)?;
    Ok(out)
}

/// Allocates a zeroed column shaped like `src` with `rows` rows: same dtype,
/// an all-valid mask when the source is nullable, and the same dictionary.
fn empty_like(src: &Column, rows: usize) -> Result<Column, PindahError> {
    let data = vec![0u8; rows * src.dtype().size_bytes()];
    let validity = src.is_nullable().then(|| ValidityMask::all_valid(rows));
    match src.dictionary() {
        Some(values) => Column::new_dictionary(data, validity, values.deep_copy()),
        None => Column::new(src.dtype(), data, validity),
    }
}

//==================================================================================
// 2. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PindahDataType;

    fn sample_table() -> Table {
        Table::new(vec![
            Column::from_slice(PindahDataType::Int32, &[10i32, 20, 30, 40]).unwrap(),
            Column::from_slice_nullable(
                PindahDataType::Float64,
                &[1.0f64, 2.0, 3.0, 4.0],
                &[true, false, true, false],
            )
            .unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_select_preserves_row_order() {
        let ctx = ExecContext::default();
        let table = sample_table();
        let mask = bitvec![1, 0, 1, 1];

        let out = select_rows(&ctx, &table, &mask).unwrap();
        assert_eq!(out.num_rows(), 3);
        assert_eq!(out.column(0).typed::<i32>().unwrap(), &[10, 30, 40]);
        assert_eq!(out.column(1).typed::<f64>().unwrap(), &[1.0, 3.0, 4.0]);
        assert!(out.column(1).is_valid_row(0));
        assert!(out.column(1).is_valid_row(1));
        assert!(!out.column(1).is_valid_row(2));
    }

    #[test]
    fn test_empty_selection_yields_zero_rows() {
        let ctx = ExecContext::default();
        let table = sample_table();
        let mask = bitvec![0, 0, 0, 0];

        let out = select_rows(&ctx, &table, &mask).unwrap();
        assert_eq!(out.num_rows(), 0);
        assert_eq!(out.num_columns(), 2);
    }

    #[test]
    fn test_mask_length_mismatch_rejected() {
        let ctx = ExecContext::default();
        let table = sample_table();
        let mask = bitvec![1, 0];
        assert!(matches!(
            select_rows(&ctx, &table, &mask),
            Err(PindahError::ShapeMismatch(_))
        ));
    }
}
