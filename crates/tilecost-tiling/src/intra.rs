//! Intra-tile workload search.
//!
//! A tile runs on `n_dpu` DPUs, so its layer is cut again into workloads.
//! The search enumerates a bounded set of cuts (execution mode x split count
//! x axis), keeping only those the hardware accepts.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use tilecost_core::cycles::{ERROR_INVALID_INPUT_PARAMETERS, ERROR_TILE_OUTPUT};
use tilecost_core::device::{DeviceProfile, MAX_Z_TILES};
use tilecost_core::types::{ExecutionMode, Operation};
use tilecost_core::workload::DpuWorkload;
use tilecost_core::{DpuLayer, Error, Result};

use crate::partition::{chunks, input_window};

/// Workload depths tried besides multiples of the DPU count.
const Z_SPLIT_SIZES: [u32; 3] = [16, 32, 64];
/// Smallest workload depth; bounds how many Z cuts make sense.
const MIN_Z: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitAxis {
    /// Cut along output channels.
    Z,
    /// Cut along output rows.
    H,
}

/// One admissible way to run a tile as a set of DPU workloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntraTileCandidate {
    pub execution_mode: ExecutionMode,
    pub axis: SplitAxis,
    pub workloads: Vec<DpuWorkload>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntraTileSearch {
    max_workloads: u32,
}

impl IntraTileSearch {
    pub fn new(max_workloads: u32) -> Self {
        Self {
            max_workloads: max_workloads.max(1),
        }
    }

    pub fn max_workloads(&self) -> u32 {
        self.max_workloads
    }

    /// Execution modes worth trying for a tile.
    pub fn execution_modes(tile: &DpuWorkload) -> Vec<ExecutionMode> {
        if tile.device.is_legacy_grid() {
            if tile.input.dtype.is_float() {
                return vec![ExecutionMode::VectorFp16];
            }
            let w = tile.output.width();
            let h = tile.output.height();
            let vector_cells = u64::from(w.div_ceil(16)) * u64::from(h);
            let matrix_cells = u64::from(w.div_ceil(4)) * u64::from(h.div_ceil(4));
            let mode = if vector_cells <= matrix_cells {
                ExecutionMode::Vector
            } else {
                ExecutionMode::Matrix
            };
            return vec![mode];
        }

        match tile.op {
            Operation::Convolution => vec![
                ExecutionMode::Cuboid16x16,
                ExecutionMode::Cuboid8x16,
                ExecutionMode::Cuboid4x16,
            ],
            Operation::Eltwise => vec![ExecutionMode::Cuboid8x16],
            _ => vec![ExecutionMode::Cuboid16x16],
        }
    }

    /// Split counts tried for a tile with `channels` output channels.
    ///
    /// `{1}`, multiples of `n_dpu` and `ceil(channels / z)` for each Z size,
    /// all capped at `min(max_workloads, ceil(channels / 16))`.
    pub fn split_counts(&self, channels: u32, n_dpu: u32) -> Vec<u32> {
        let cap = self.max_workloads.min(channels.div_ceil(MIN_Z)).max(1);
        let mut pool = BTreeSet::from([1u32]);
        if n_dpu > 0 {
            pool.extend((1..=cap / n_dpu).map(|k| k * n_dpu));
        }
        pool.extend(
            Z_SPLIT_SIZES
                .iter()
                .map(|z| channels.div_ceil(*z))
                .filter(|n| (1..=cap).contains(n)),
        );
        pool.into_iter().collect()
    }

    /// All admissible candidates for `tile`, in deterministic order
    /// (execution mode, then split count ascending, Z before H).
    ///
    /// Fails with `ERROR_TILE_OUTPUT` when nothing is admissible.
    pub fn candidates(&self, tile: &DpuLayer, n_dpu: u32) -> Result<Vec<IntraTileCandidate>> {
        if n_dpu == 0 {
            return Err(Error::Cycles(ERROR_INVALID_INPUT_PARAMETERS));
        }
        let profile = DeviceProfile::of(tile.device);
        let max_z_only = profile.requires_max_z_tile(tile.op);
        let counts = self.split_counts(tile.output.channels(), n_dpu);

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for mode in Self::execution_modes(tile) {
            for &n in &counts {
                if let Some((step, wls)) = self.split_z(tile, mode, n, profile, max_z_only) {
                    if seen.insert((mode, SplitAxis::Z, step)) {
                        out.push(IntraTileCandidate {
                            execution_mode: mode,
                            axis: SplitAxis::Z,
                            workloads: wls,
                        });
                    }
                }
                if max_z_only {
                    continue;
                }
                if let Some((step, wls)) = self.split_h(tile, mode, n) {
                    if seen.insert((mode, SplitAxis::H, step)) {
                        out.push(IntraTileCandidate {
                            execution_mode: mode,
                            axis: SplitAxis::H,
                            workloads: wls,
                        });
                    }
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            op = %tile.op,
            channels = tile.output.channels(),
            ceiling = self.max_workloads,
            candidates = out.len(),
            "intra-tile search"
        );

        if out.is_empty() {
            return Err(Error::Cycles(ERROR_TILE_OUTPUT));
        }
        Ok(out)
    }

    fn split_z(
        &self,
        tile: &DpuLayer,
        mode: ExecutionMode,
        n: u32,
        profile: &DeviceProfile,
        max_z_only: bool,
    ) -> Option<(u32, Vec<DpuWorkload>)> {
        let parts = chunks(tile.output.channels(), n, profile.channel_alignment);
        let step = parts.first()?.1;
        if parts.len() as u32 > self.max_workloads {
            return None;
        }
        let admissible = parts.iter().all(|(_, ch)| {
            ch % profile.channel_alignment == 0 && (!max_z_only || MAX_Z_TILES.contains(ch))
        });
        if !admissible {
            return None;
        }

        let wls = parts
            .into_iter()
            .map(|(c0, ch)| {
                let mut wl = tile.workload().clone();
                wl.execution_mode = mode;
                wl.output = wl.output.with_channels(ch);
                if !wl.op.reduces_input_channels() {
                    wl.input = wl.input.with_channels(ch);
                }
                wl.offsets[2] += c0;
                wl
            })
            .collect();
        Some((step, wls))
    }

    fn split_h(&self, tile: &DpuLayer, mode: ExecutionMode, n: u32) -> Option<(u32, Vec<DpuWorkload>)> {
        if n < 2 {
            return None;
        }
        let grid_h = mode.grid()[1];
        let parts = chunks(tile.output.height(), n, grid_h);
        if parts.len() < 2 || parts.len() as u32 > self.max_workloads {
            return None;
        }
        let step = parts[0].1;
        let last = parts.len() - 1;
        let ky = tile.kernels[1];
        let sy = tile.strides[1];
        let h_in = tile.input.height();

        let wls = parts
            .into_iter()
            .enumerate()
            .map(|(i, (o0, rows))| {
                let w = input_window(o0, o0 + rows, h_in, ky, sy, tile.padding.top);
                let mut wl = tile.workload().clone();
                wl.execution_mode = mode;
                wl.output = wl.output.with_height(rows);
                wl.input = wl.input.with_height(w.len());
                wl.padding.top = w.pad_lo;
                wl.padding.bottom = w.pad_hi;
                wl.offsets[1] += o0;
                wl.sep = wl.sep.rescaled_height(w.len(), h_in);
                // tile halo only applies to the outer rows
                if i != 0 {
                    wl.halo.input.top = 0;
                    wl.halo.output.top = 0;
                }
                if i != last {
                    wl.halo.input.bottom = 0;
                    wl.halo.output.bottom = 0;
                }
                wl
            })
            .collect();
        Some((step, wls))
    }
}

impl Default for IntraTileSearch {
    fn default() -> Self {
        Self::new(tilecost_core::config::DEFAULT_MAX_WORKLOADS_PER_INTRA_TILE_SPLIT)
    }
}
