//! Per-tile provenance of a layer evaluation.

use serde::{Deserialize, Serialize};

use tilecost_core::workload::DpuWorkload;
use tilecost_core::{CycleCount, DpuLayer};

/// One intra-tile candidate with its scheduled cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DpuWorkloadsWithCycles {
    pub cycles: CycleCount,
    pub workloads: Vec<DpuWorkload>,
}

/// What happened on one tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSplitInfo {
    /// The winning candidate.
    pub best_intra_tile_split: DpuWorkloadsWithCycles,
    /// Every candidate explored, in search order, errors included.
    pub all_intra_tile_splits: Vec<DpuWorkloadsWithCycles>,
    /// The per-tile layer the candidates were cut from.
    pub inter_tile_split_layer: DpuLayer,
}

impl LayerSplitInfo {
    pub fn cycles(&self) -> CycleCount {
        self.best_intra_tile_split.cycles
    }

    pub fn workload_count(&self) -> usize {
        self.best_intra_tile_split.workloads.len()
    }
}
