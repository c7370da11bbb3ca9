//! The layer: the unit of tiling.
//!
//! A `DpuLayer` is a workload with layer-level meaning (memory footprints,
//! the full tensor a tile strategy partitions). Splitting never mutates a
//! layer; it produces new per-tile layers.

use serde::{Deserialize, Serialize};
use std::ops::Deref;

use crate::types::Operation;
use crate::workload::DpuWorkload;

/// Bytes of the per-output-channel weight table.
const WEIGHT_TABLE_BYTES_PER_CHANNEL: u64 = 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DpuLayer(DpuWorkload);

impl DpuLayer {
    pub fn new(workload: DpuWorkload) -> Self {
        Self(workload)
    }

    pub fn workload(&self) -> &DpuWorkload {
        &self.0
    }

    pub fn into_workload(self) -> DpuWorkload {
        self.0
    }

    /// Build a new layer from a modified copy of this one.
    pub fn derive_with(&self, f: impl FnOnce(&mut DpuWorkload)) -> Self {
        let mut wl = self.0.clone();
        f(&mut wl);
        Self(wl)
    }

    pub fn input_footprint(&self) -> u64 {
        self.0.input.size()
    }

    /// Input bytes held in this tile's CMX. Input halo rows live in the
    /// neighbouring tile and are read from there.
    pub fn resident_input_footprint(&self) -> u64 {
        let input = &self.0.input;
        let row_bytes = u64::from(input.width())
            * u64::from(input.channels())
            * u64::from(input.batches())
            * input.dtype.bytes();
        let halo_rows = u64::from(self.0.halo.input.vertical());
        input.size().saturating_sub(halo_rows * row_bytes)
    }

    pub fn output_footprint(&self) -> u64 {
        self.0.output.size()
    }

    /// Weights plus weight table, in bytes.
    pub fn weight_footprint(&self) -> u64 {
        let wl = &self.0;
        let out_ch = u64::from(wl.output.channels());
        let table = out_ch * WEIGHT_TABLE_BYTES_PER_CHANNEL;
        match wl.op {
            Operation::Eltwise => 0,
            Operation::Maxpool => table,
            op => {
                let kernel_area = u64::from(wl.kernels[0]) * u64::from(wl.kernels[1]);
                let depth = if op.reduces_input_channels() {
                    u64::from(wl.input.channels())
                } else {
                    1
                };
                out_ch * kernel_area * depth * wl.weights_dtype().bytes() + table
            }
        }
    }

    /// Total bytes the layer needs resident in on-chip memory.
    pub fn footprint(&self) -> u64 {
        self.resident_input_footprint() + self.output_footprint() + self.weight_footprint()
    }
}

impl Deref for DpuLayer {
    type Target = DpuWorkload;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<DpuWorkload> for DpuLayer {
    fn from(wl: DpuWorkload) -> Self {
        Self(wl)
    }
}
