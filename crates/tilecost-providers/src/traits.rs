//! Provider interfaces.
//!
//! Invariants:
//! - Implementations are deterministic for the same input.
//! - Failures are reported as cycle error codes, never as panics.
//! - Implementations are `Send + Sync` so one instance can serve many
//!   evaluations at once.

use std::collections::BTreeSet;
use std::sync::Arc;

use tilecost_core::types::{MemoryLocation, VpuDevice};
use tilecost_core::workload::{DpuWorkload, ShaveWorkload};
use tilecost_core::CycleCount;

/// Estimates the cycles one DPU workload takes.
pub trait DpuCostProvider: Send + Sync {
    fn dpu_cost(&self, workload: &DpuWorkload) -> CycleCount;
}

/// Estimates the cycles of one DMA transfer.
pub trait DmaCostProvider: Send + Sync {
    /// Cycles to move `bytes` from `from` to `to`, written to
    /// `output_write_tiles` destinations.
    fn dma_cost(
        &self,
        device: VpuDevice,
        bytes: u64,
        from: MemoryLocation,
        to: MemoryLocation,
        output_write_tiles: u32,
    ) -> CycleCount;
}

/// A single SHAVE kernel model bound to a device.
pub trait ShaveOpExecutor: Send + Sync {
    fn name(&self) -> &str;

    fn device(&self) -> VpuDevice;

    /// Cycles for `workload` (in DPU cycles).
    fn dpu_cycles(&self, workload: &ShaveWorkload) -> CycleCount;
}

/// Estimates SHAVE kernels.
pub trait ShaveCostProvider: Send + Sync {
    /// Cycles for `workload`. On success, implementations that know where the
    /// estimate came from write that source name into `source`.
    fn get_cost(&self, workload: &ShaveWorkload, source: Option<&mut String>) -> CycleCount;

    /// Largest parameter list any supported kernel accepts.
    fn get_max_num_params(&self) -> usize;

    fn get_shave_supported_ops(&self, device: VpuDevice) -> BTreeSet<String>;

    fn get_shave_instance(&self, name: &str, device: VpuDevice) -> Option<Arc<dyn ShaveOpExecutor>>;
}
