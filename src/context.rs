//! This module defines the scoped execution handle passed into every engine
//! operation.
//!
//! The original design ran its kernels on ambient, process-global execution
//! streams. Here that context is an explicit value: an `ExecContext` is created
//! at the boundary (or once per independent sub-operation), carries the shared
//! `Arc<PindahConfig>`, and is released when the operation's scope ends. No
//! kernel reads global state.

use std::sync::Arc;

use crate::config::{ExecutionMode, PindahConfig};

/// A scoped execution handle: configuration plus the decision of when a kernel
/// may fan out onto the rayon pool.
#[derive(Debug, Clone)]
pub struct ExecContext {
    config: Arc<PindahConfig>,
}

impl ExecContext {
    pub fn new(config: Arc<PindahConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PindahConfig {
        &self.config
    }

    /// Whether a kernel touching `len` rows (or map entries) should run on the
    /// worker pool. Small buffers stay serial: the fork/join overhead would
    /// dominate the copy.
    pub fn parallel_over(&self, len: usize) -> bool {
        match self.config.execution_mode {
            ExecutionMode::Serial => false,
            ExecutionMode::Parallel => len >= self.config.min_parallel_rows,
        }
    }
}

impl Default for ExecContext {
    fn default() -> Self {
        Self::new(Arc::new(PindahConfig::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_mode_never_goes_parallel() {
        let ctx = ExecContext::new(Arc::new(PindahConfig {
            execution_mode: ExecutionMode::Serial,
            min_parallel_rows: 1,
        }));
        assert!(!ctx.parallel_over(usize::MAX));
    }

    #[test]
    fn test_parallel_mode_respects_threshold() {
        let ctx = ExecContext::new(Arc::new(PindahConfig {
            execution_mode: ExecutionMode::Parallel,
            min_parallel_rows: 100,
        }));
        assert!(!ctx.parallel_over(99));
        assert!(ctx.parallel_over(100));
    }
}
