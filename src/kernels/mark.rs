//! This module contains the validity-marking kernel: it sets or clears
//! destination validity bits for exactly the rows named by a scatter map.
//!
//! Entries are assumed already bounds-validated by the calling orchestrator.
//! Two map entries can land in the same bitmask word, so every bit update is
//! an atomic read-modify-write; concurrent marking is lost-update-free.

use rayon::prelude::*;

use crate::context::ExecContext;
use crate::null_handling::bitmap::{clear_bit_safe, set_bit_safe, ValidityMask};
use crate::types::RowIndex;

//==================================================================================
// 1. Public API
//==================================================================================

/// Sets (`valid == true`) or clears (`valid == false`) the mask bits at the
/// rows named by `scatter_map`.
pub fn mark_rows(ctx: &ExecContext, mask: &mut ValidityMask, scatter_map: &[RowIndex], valid: bool) {
    debug_assert!(scatter_map
        .iter()
        .all(|&row| row >= 0 && (row as usize) < mask.num_rows()));

    let words = mask.atomic_words();
    let mark = |row: RowIndex| {
        if valid {
            set_bit_safe(words, row as usize);
        } else {
            clear_bit_safe(words, row as usize);
        }
    };

    if ctx.parallel_over(scatter_map.len()) {
        scatter_map.par_iter().copied().for_each(mark);
    } else {
        scatter_map.iter().copied().for_each(mark);
    }
}

//==================================================================================
// 2. Unit Tests
//==================================================================================
