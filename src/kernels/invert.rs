//! This module contains the pure, stateless kernel that converts a scatter map
//! (source row -> destination row) into a gather map (destination row ->
//! source row).
//!
//! This inversion is the central trick that lets scatter reuse the gather
//! primitive: the inverted map is handed to a copy-preserving gather, and
//! every destination row the scatter map never names keeps its sentinel entry
//! and therefore its existing content.
//!
//! Duplicate destinations in the scatter map are a race by construction. The
//! kernel routes every write through a relaxed atomic store, so the surviving
//! entry is an implementation-defined choice among the colliding source rows
//! (defined behavior, not UB). This weak guarantee is deliberate: making it
//! deterministic would need compare-and-swap with a tie-break on every write.

use std::sync::atomic::Ordering;

use rayon::prelude::*;

use crate::context::ExecContext;
use crate::types::{RowIndex, UNMODIFIED_ROW};
use crate::utils::as_atomic_i32;

//==================================================================================
// 1. Public API
//==================================================================================

/// Inverts `scatter_map` into a gather map of length `dest_rows`.
///
/// Every entry starts as [`UNMODIFIED_ROW`]. For each source row `i`,
/// `gather_map[scatter_map[i]] = i`, but only when `scatter_map[i]` lies in
/// `[0, dest_rows)`; out-of-range destinations (including negatives) are
/// dropped, matching scatter semantics where an out-of-range destination is
/// simply never modified.
pub fn invert_scatter_map(
    ctx: &ExecContext,
    scatter_map: &[RowIndex],
    dest_rows: usize,
) -> Vec<RowIndex> {
    let mut gather_map = vec![UNMODIFIED_ROW; dest_rows];
    let slots = as_atomic_i32(&mut gather_map);

    let write = |src_row: usize, dest: RowIndex| {
        if dest >= 0 && (dest as usize) < dest_rows {
            slots[dest as usize].store(src_row as RowIndex, Ordering::Relaxed);
        }
    };

    if ctx.parallel_over(scatter_map.len()) {
        scatter_map
            .par_iter()
            .enumerate()
            .for_each(|(src_row, &dest)| write(src_row, dest));
    } else {
        for (src_row, &dest) in scatter_map.iter().enumerate() {
            write(src_row, dest);
        }
    }

    gather_map
}

//==================================================================================
// 2. Unit Tests
//==================================================================================
