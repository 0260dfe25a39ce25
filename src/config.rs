// In: src/config.rs

//! The single source of truth for all pindah engine configuration.
//!
//! This module defines the unified `PindahConfig` struct, which is designed to be
//! created once at the application boundary (e.g., from a user's JSON document or
//! Python dictionary) and then passed down through the system via a shared,
//! read-only `Arc<PindahConfig>` inside an [`crate::context::ExecContext`].

use serde::{Deserialize, Serialize};

//==================================================================================
// I. Core Configuration Enums & Structs
//==================================================================================

/// Defines how kernels are scheduled.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// **Default:** kernels run on the rayon worker pool once a buffer is large
    /// enough to amortize the fork/join cost; small buffers stay serial.
    #[default]
    Parallel,

    /// Every kernel runs single-threaded. Useful for debugging and for hosts
    /// that already saturate their cores above this library.
    Serial,
}

/// The single, unified configuration for the pindah relocation engine.
/// This struct is created once and shared throughout the system via an `Arc`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "snake_case")]
pub struct PindahConfig {
    /// How kernels are scheduled.
    #[serde(default)]
    pub execution_mode: ExecutionMode,

    /// The minimum number of rows (or map entries) a kernel must touch before
    /// it is worth going parallel. Ignored under `ExecutionMode::Serial`.
    #[serde(default = "default_min_parallel_rows")]
    pub min_parallel_rows: usize,
}

// Default implementation to make constructing the config easier.
impl Default for PindahConfig {
    fn default() -> Self {
        Self {
            execution_mode: ExecutionMode::default(),
            min_parallel_rows: default_min_parallel_rows(),
        }
    }
}

/// Helper for `serde` to provide a default for `min_parallel_rows`.
fn default_min_parallel_rows() -> usize {
    16_384
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_json_with_defaults() {
        let cfg: PindahConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.execution_mode, ExecutionMode::Parallel);
        assert_eq!(cfg.min_parallel_rows, 16_384);

        let cfg: PindahConfig =
            serde_json::from_str(r#"{"execution_mode": "serial", "min_parallel_rows": 64}"#)
                .unwrap();
        assert_eq!(cfg.execution_mode, ExecutionMode::Serial);
        assert_eq!(cfg.min_parallel_rows, 64);
    }
}
