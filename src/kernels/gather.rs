//! This module contains the gather collaborator: per-column element copy from
//! source rows to destination positions, driven by a gather map.
//!
//! The map may be shorter than the destination; rows beyond it are untouched.
//! A negative entry is the "leave this destination row unchanged" sentinel;
//! this copy-preserving mode is what makes scatter-as-inverted-gather work.
//! Entries at or beyond the source row count are a bounds error when
//! `bounds_check` is set, or become null writes when `nullify_out_of_bounds`
//! is set.

use rayon::prelude::*;

use crate::context::ExecContext;
use crate::error::PindahError;
use crate::kernels::with_element_type;
use crate::null_handling::bitmap::{clear_bit_safe, set_bit_safe};
use crate::table::{Column, Table};
use crate::types::RowIndex;

//==================================================================================
// 1. Public API
//==================================================================================

/// Gathers rows of `source` into `out` according to `gather_map`.
///
/// Preconditions checked here, before any buffer is written:
/// - `source` and `out` have the same column count and pairwise-equal dtypes;
/// - the map is no longer than the destination;
/// - under `bounds_check`, no entry reaches past the source rows (unless
///   `nullify_out_of_bounds` turns such entries into null writes instead);
/// - a nullable source column requires a nullable destination column (the
///   scatter orchestrator promotes nullability before calling in).
pub fn gather(
    ctx: &ExecContext,
    source: &Table,
    gather_map: &[RowIndex],
    out: &mut Table,
    bounds_check: bool,
    nullify_out_of_bounds: bool,
) -> Result<(), PindahError> {
    if source.num_columns() != out.num_columns() {
        return Err(PindahError::ShapeMismatch(format!(
            "gather source has {} columns, destination {}",
            source.num_columns(),
            out.num_columns()
        )));
    }
    if gather_map.len() > out.num_rows() {
        return Err(PindahError::ShapeMismatch(format!(
            "gather map names {} rows but destination has {}",
            gather_map.len(),
            out.num_rows()
        )));
    }

    let src_rows = source.num_rows();
    let has_oob = gather_map.iter().any(|&g| g as i64 >= src_rows as i64);
    if has_oob && bounds_check && !nullify_out_of_bounds {
        return Err(PindahError::OutOfBounds(format!(
            "gather map entry reaches past {} source rows",
            src_rows
        )));
    }

    for (src_col, out_col) in source.columns().iter().zip(out.columns()) {
        if src_col.dtype() != out_col.dtype() {
            return Err(PindahError::TypeMismatch(format!(
                "gather between {} and {} columns",
                src_col.dtype(),
                out_col.dtype()
            )));
        }
        if src_col.is_nullable() && !out_col.is_nullable() {
            return Err(PindahError::TypeMismatch(
                "nullable source column requires a nullable destination column".to_string(),
            ));
        }
        if has_oob && nullify_out_of_bounds && !out_col.is_nullable() {
            return Err(PindahError::TypeMismatch(
                "nullify_out_of_bounds requires a nullable destination column".to_string(),
            ));
        }
    }

    for (src_col, out_col) in source.columns().iter().zip(out.columns_mut()) {
        with_element_type!(src_col.dtype(), T => gather_column::<T>(
            ctx,
            src_col,
            gather_map,
            out_col,
            nullify_out_of_bounds,
        ))?;
    }

    Ok(())
}

//==================================================================================
// 2. Generic Core Logic
//==================================================================================

/// One column's gather: value phase over the data buffer, then a validity
/// phase over the mask. The phases touch disjoint memory; each one joins
/// before the next observes its results.
fn gather_column<T: crate::kernels::ElementValue>(
    ctx: &ExecContext,
    src: &Column,
    gather_map: &[RowIndex],
    out: &mut Column,
    nullify_out_of_bounds: bool,
) -> Result<(), PindahError> {
    let src_rows = src.num_rows();
    let src_vals = src.typed::<T>()?;

    // Value phase. Destination rows are distinct by construction (one slot per
    // map entry), so plain disjoint mutation is enough here.
    {
        let out_vals = &mut out.typed_mut::<T>()?[..gather_map.len()];
        let copy_row = |dest_row: usize, slot: &mut T| {
            let g = gather_map[dest_row];
            if g >= 0 && (g as usize) < src_rows {
                *slot = src_vals[g as usize];
            }
        };

        if ctx.parallel_over(gather_map.len()) {
            out_vals
                .par_iter_mut()
                .enumerate()
                .for_each(|(dest_row, slot)| copy_row(dest_row, slot));
        } else {
            for (dest_row, slot) in out_vals.iter_mut().enumerate() {
                copy_row(dest_row, slot);
            }
        }
    }

    // Validity phase. Bits of one word are shared between rows, so updates go
    // through the atomic primitives.
    if let Some(mask) = out.validity_mut() {
        let words = mask.atomic_words();
        let mark_row = |dest_row: usize| {
            let g = gather_map[dest_row];
            if g < 0 {
                // Sentinel: destination keeps its existing value and bit.
            } else if (g as usize) < src_rows {
                if src.is_valid_row(g as usize) {
                    set_bit_safe(words, dest_row);
                } else {
                    clear_bit_safe(words, dest_row);
                }
            } else if nullify_out_of_bounds {
                clear_bit_safe(words, dest_row);
            }
        };

        if ctx.parallel_over(gather_map.len()) {
            (0..gather_map.len()).into_par_iter().for_each(mark_row);
        } else {
            (0..gather_map.len()).for_each(mark_row);
        }
    }

    Ok(())
}

//==================================================================================
// 3. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PindahDataType, UNMODIFIED_ROW};

    fn source_table() -> Table {
        Table::new(vec![Column::from_slice_nullable(
            PindahDataType::Int32,
            &[10i32, 20, 30],
            &[true, false, true],
        )
        .unwrap()])
        .unwrap()
    }

    fn dest_table() -> Table {
        Table::new(vec![Column::from_slice_nullable(
            PindahDataType::Int32,
            &[1i32, 2, 3, 4],
            &[true, true, true, true],
        )
        .unwrap()])
        .unwrap()
    }

    #[test]
    fn test_sentinel_preserves_destination_rows() {
        let ctx = ExecContext::default();
        let source = source_table();
        let mut out = dest_table();

        gather(
            &ctx,
            &source,
            &[2, UNMODIFIED_ROW, 0, UNMODIFIED_ROW],
            &mut out,
            true,
            false,
        )
        .unwrap();

        let col = out.column(0);
        assert_eq!(col.typed::<i32>().unwrap(), &[30, 2, 10, 4]);
        assert!(col.is_valid_row(1) && col.is_valid_row(3));
    }

    #[test]
    fn test_null_rows_propagate_from_source() {
        let ctx = ExecContext::default();
        let source = source_table();
        let mut out = dest_table();

        gather(&ctx, &source, &[1, 1, 1, 1], &mut out, true, false).unwrap();
        let col = out.column(0);
        assert_eq!(col.validity().unwrap().count_valid(), 0);
    }

    #[test]
    fn test_bounds_check_rejects_overreach() {
        let ctx = ExecContext::default();
        let source = source_table();
        let mut out = dest_table();

        let result = gather(&ctx, &source, &[3, 0, 0, 0], &mut out, true, false);
        assert!(matches!(result, Err(PindahError::OutOfBounds(_))));
        // The precondition fired before any write.
        assert_eq!(out.column(0).typed::<i32>().unwrap(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_nullify_out_of_bounds_writes_null() {
        let ctx = ExecContext::default();
        let source = source_table();
        let mut out = dest_table();

        gather(&ctx, &source, &[3, 0, 0, 0], &mut out, true, true).unwrap();
        let col = out.column(0);
        assert!(!col.is_valid_row(0));
        assert_eq!(&col.typed::<i32>().unwrap()[1..], &[10, 10, 10]);
    }

    #[test]
    fn test_short_map_leaves_tail_untouched() {
        let ctx = ExecContext::default();
        let source = source_table();
        let mut out = dest_table();

        gather(&ctx, &source, &[0], &mut out, true, false).unwrap();
        assert_eq!(out.column(0).typed::<i32>().unwrap(), &[10, 2, 3, 4]);
    }

    #[test]
    fn test_nullable_source_needs_nullable_destination() {
        let ctx = ExecContext::default();
        let source = source_table();
        let mut out = Table::new(vec![Column::from_slice(
            PindahDataType::Int32,
            &[1i32, 2, 3, 4],
        )
        .unwrap()])
        .unwrap();

        let result = gather(&ctx, &source, &[0, 0, 0, 0], &mut out, true, false);
        assert!(matches!(result, Err(PindahError::TypeMismatch(_))));
    }
}
