// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the sole Arrow-facing API of the pindah library. It provides a
// stable, user-friendly interface that completely encapsulates the pure,
// Arrow-agnostic relocation engine. It is the authoritative boundary between the
// outside world (Arrow data) and the internal kernels.
//
// Data Flow (table-to-table scatter):
//
//   1. [Stateless API (scatter_record_batch)]  -> Receives `RecordBatch`es + map array
//         |
//         `-> a. Calls `arrow_impl` to convert RecordBatch -> `table::Table`
//         |
//         `-> b. Calls the pure engine (`scatter::scatter`) under an `ExecContext`
//
//   2. [Engine] -> Returns `Result<Table, PindahError>`
//         |
//         `-> `arrow_impl` converts the result back to a `RecordBatch` carrying
//             the target's schema (nullability widened where promoted)
//
// The partition entry points follow the same shape, returning one RecordBatch
// per group.
//
// ====================================================================================
pub(crate) mod arrow_impl;
pub mod stateless_api;

// --- Low-Level Stateless API (for FFI and testing) ---
pub use stateless_api::{
    groups_to_record_batches, scatter_record_batch, scatter_to_record_batches,
};

#[cfg(test)]
mod tests;
