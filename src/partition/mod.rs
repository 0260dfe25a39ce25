//! This module contains the row-partitioning engine: splitting a table's rows
//! into disjoint sub-tables keyed by a per-row group identifier.
//!
//! Two entry points share one primitive (equality mask + row compaction):
//! `groups_to_tables` discovers arbitrary group ids by sort+dedup and emits
//! sub-tables in ascending id order; `scatter_to_tables` trusts the caller
//! that ids are a dense non-negative enumeration and sizes the output as
//! `max + 1`, so sparse ids simply yield empty sub-tables.

use bitvec::prelude::*;
use log::debug;

use crate::context::ExecContext;
use crate::error::PindahError;
use crate::kernels::compact::select_rows;
use crate::kernels::reduce;
use crate::table::{Column, Table};
use crate::types::PindahDataType;

//==================================================================================
// 1. Public API
//==================================================================================

/// The result of [`groups_to_tables`]: one sub-table per distinct group id,
/// plus a column enumerating those ids in the same (ascending) order.
#[derive(Debug)]
pub struct GroupedTables {
    pub tables: Vec<Table>,
    pub group_ids: Column,
}

/// Partitions `table` by the distinct values of `group_map`.
///
/// Ids may be arbitrary `i32` values; they are discovered by copying, sorting,
/// and deduplicating the map, which also fixes the output order: ascending raw
/// id value, not first occurrence. Each sub-table holds exactly the rows whose
/// map entry equals its id, in original row order.
///
/// Empty inputs (empty table or map, or a table with zero columns) yield an
/// empty result without error. A map with the wrong dtype, null entries, or
/// the wrong length is a precondition violation.
pub fn groups_to_tables(
    ctx: &ExecContext,
    table: &Table,
    group_map: &Column,
) -> Result<GroupedTables, PindahError> {
    if !validate_group_map(table, group_map)? {
        return Ok(GroupedTables {
            tables: Vec::new(),
            group_ids: Column::from_slice::<i32>(PindahDataType::Int32, &[])?,
        });
    }

    let keys = group_map.typed::<i32>()?;
    let mut distinct: Vec<i32> = keys.to_vec();
    distinct.sort_unstable();
    distinct.dedup();

    debug!(
        "groups_to_tables found {} distinct ids over {} rows",
        distinct.len(),
        keys.len()
    );
    log_metric!(
        "event" = "groups_to_tables",
        "rows" = &keys.len(),
        "groups" = &distinct.len(),
    );

    let tables = distinct
        .iter()
        .map(|&id| extract_group(ctx, table, keys, id))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GroupedTables {
        tables,
        group_ids: Column::from_slice(PindahDataType::Int32, &distinct)?,
    })
}

/// Partitions `table` by a dense non-negative group enumeration.
///
/// The group count is `max + 1`, taken from the reduction collaborator, and
/// groups `0..=max` are emitted directly; ids that never occur produce empty
/// sub-tables. Use this when the caller already knows ids form a dense
/// enumeration; negative ids violate that contract and are rejected.
pub fn scatter_to_tables(
    ctx: &ExecContext,
    table: &Table,
    group_map: &Column,
) -> Result<Vec<Table>, PindahError> {
    if !validate_group_map(table, group_map)? {
        return Ok(Vec::new());
    }

    let keys = group_map.typed::<i32>()?;
    if keys.iter().any(|&id| id < 0) {
        return Err(PindahError::MalformedGroupMap(
            "scatter_to_tables requires non-negative group ids".to_string(),
        ));
    }

    // The reduction collaborator sizes the dense group count. The map is
    // non-empty and null-free here, so the scalar is always valid.
    let max_id = reduce::max(group_map)?.typed::<i32>()?;

    debug!(
        "scatter_to_tables emitting {} dense groups over {} rows",
        max_id + 1,
        keys.len()
    );

    (0..=max_id)
        .map(|id| extract_group(ctx, table, keys, id))
        .collect()
}

//==================================================================================
// 2. Shared Primitive & Validation
//==================================================================================

/// The shared partition primitive: equality mask over the map, then row
/// compaction in original order.
fn extract_group(
    ctx: &ExecContext,
    table: &Table,
    keys: &[i32],
    id: i32,
) -> Result<Table, PindahError> {
    let mut mask = BitVec::<usize, Lsb0>::with_capacity(keys.len());
    for &key in keys {
        mask.push(key == id);
    }
    select_rows(ctx, table, &mask)
}

/// Returns `Ok(false)` when the inputs are legally empty (permissive no-op),
/// `Ok(true)` when partitioning should proceed, and an error for a malformed
/// map: wrong dtype, null entries, or a length that differs from the table's
/// row count.
fn validate_group_map(table: &Table, group_map: &Column) -> Result<bool, PindahError> {
    if group_map.dtype() != PindahDataType::Int32 {
        return Err(PindahError::UnsupportedType(format!(
            "group map must be Int32, got {}",
            group_map.dtype()
        )));
    }
    if table.num_columns() == 0 || table.num_rows() == 0 || group_map.num_rows() == 0 {
        return Ok(false);
    }
    if group_map.num_rows() != table.num_rows() {
        return Err(PindahError::MalformedGroupMap(format!(
            "map covers {} rows but table has {}",
            group_map.num_rows(),
            table.num_rows()
        )));
    }
    if let Some(mask) = group_map.validity() {
        if mask.count_valid() != mask.num_rows() {
            return Err(PindahError::MalformedGroupMap(
                "map contains null entries".to_string(),
            ));
        }
    }
    Ok(true)
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
