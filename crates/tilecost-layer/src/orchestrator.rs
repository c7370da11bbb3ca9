//! Layer cost orchestrator.
//!
//! One evaluation walks
//! `StrategySplit → IntraTileSearch → Pricing → Aggregate → Done | Failed`:
//!
//! - `StrategySplit`: validate the layer and strategy, split across tiles.
//! - `IntraTileSearch` + `Pricing`: per tile, check CMX fit, enumerate
//!   candidates and schedule each on the tile's DPUs; keep the cheapest.
//! - `Aggregate`: tiles run in parallel, so the layer costs the slowest tile,
//!   then weights prefetch and input/output DMA are folded in.
//!
//! Any failure is a cycle error code. Geometry errors abort at once;
//! a candidate that fails to price only loses, unless every candidate of a
//! tile fails.

use std::sync::Arc;

use tilecost_core::cycles::{
    cost_adder, dpu_schedule, is_error_code, ERROR_INVALID_INPUT_PARAMETERS, ERROR_TILE_OUTPUT,
};
use tilecost_core::device::DeviceProfile;
use tilecost_core::types::MemoryLocation;
use tilecost_core::workload::ShaveWorkload;
use tilecost_core::{CostModelConfig, CycleCount, DpuLayer, TilingStrategy};
use tilecost_providers::{
    check_fits_cmx, default_shave_chain, DmaCostProvider, DpuCostProvider, ShaveCostProvider,
    TheoreticalDmaProvider, TheoreticalDpuProvider,
};
use tilecost_tiling::{IntraTileCandidate, IntraTileSearch, TileSplit};

use crate::error::{Error, Result};
use crate::metrics::{cycles_field, emit_span};
use crate::split_info::{DpuWorkloadsWithCycles, LayerSplitInfo};

/// Evaluates layers against a fixed set of providers and tunables.
///
/// Evaluation borrows the model immutably; reconfiguration needs `&mut`.
#[derive(Clone)]
pub struct LayerCostModel {
    config: CostModelConfig,
    dpu: Arc<dyn DpuCostProvider>,
    dma: Arc<dyn DmaCostProvider>,
    shave: Arc<dyn ShaveCostProvider>,
}

impl Default for LayerCostModel {
    fn default() -> Self {
        Self {
            config: CostModelConfig::default(),
            dpu: Arc::new(TheoreticalDpuProvider::new()),
            dma: Arc::new(TheoreticalDmaProvider::new()),
            shave: Arc::new(default_shave_chain()),
        }
    }
}

impl std::fmt::Debug for LayerCostModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerCostModel")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl LayerCostModel {
    /// Model with the theoretical providers and default tunables.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CostModelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn with_dpu_provider(mut self, dpu: Arc<dyn DpuCostProvider>) -> Self {
        self.dpu = dpu;
        self
    }

    pub fn with_dma_provider(mut self, dma: Arc<dyn DmaCostProvider>) -> Self {
        self.dma = dma;
        self
    }

    pub fn with_shave_provider(mut self, shave: Arc<dyn ShaveCostProvider>) -> Self {
        self.shave = shave;
        self
    }

    pub fn config(&self) -> &CostModelConfig {
        &self.config
    }

    pub fn shave_provider(&self) -> &Arc<dyn ShaveCostProvider> {
        &self.shave
    }

    pub fn set_max_workloads_per_intra_tile_split(&mut self, n: u32) -> Result<()> {
        if n == 0 {
            return Err(Error::Config(
                "max_workloads_per_intra_tile_split must be at least 1".into(),
            ));
        }
        self.config.max_workloads_per_intra_tile_split = n;
        Ok(())
    }

    pub fn set_runtime_overhead(&mut self, cycles: u32) {
        self.config.runtime_overhead = cycles;
    }

    /// Cost of `layer` split by `strategy` over `n_tiles` tiles of `n_dpu` DPUs.
    ///
    /// `detailed_split` is cleared and, on success, receives one entry per tile.
    #[allow(clippy::too_many_arguments)]
    pub fn layer(
        &self,
        layer: &DpuLayer,
        strategy: TilingStrategy,
        n_dpu: u32,
        n_tiles: u32,
        input_fetching: bool,
        output_spilling: bool,
        prefetching: bool,
        detailed_split: &mut Vec<LayerSplitInfo>,
    ) -> CycleCount {
        detailed_split.clear();
        let tiles = match layer.split_across_tiles(strategy, n_tiles) {
            Ok(tiles) => tiles,
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(%strategy, n_tiles, error = %e, "split failed");
                return e.cycles();
            }
        };
        self.layers_pre_split(
            &tiles,
            n_dpu,
            input_fetching,
            output_spilling,
            prefetching,
            detailed_split,
        )
    }

    /// Cost of layers already split across tiles, one per tile.
    ///
    /// Produces the same numbers as `layer` for the same tiles.
    pub fn layers_pre_split(
        &self,
        tiles: &[DpuLayer],
        n_dpu: u32,
        input_fetching: bool,
        output_spilling: bool,
        prefetching: bool,
        detailed_split: &mut Vec<LayerSplitInfo>,
    ) -> CycleCount {
        detailed_split.clear();
        if tiles.is_empty() || n_dpu == 0 {
            return ERROR_INVALID_INPUT_PARAMETERS;
        }

        let mut infos = Vec::with_capacity(tiles.len());
        for tile in tiles {
            match self.tile(tile, n_dpu) {
                Ok(info) => infos.push(info),
                Err(code) => return code,
            }
        }

        let compute = infos.iter().map(LayerSplitInfo::cycles).max().unwrap_or(0);
        let mut cost = compute;

        let prefetch = self.max_dma(tiles, |t| {
            (t.weight_footprint(), MemoryLocation::Dram, MemoryLocation::Cmx, t.output_write_tiles)
        });
        if !prefetching {
            cost = if is_error_code(prefetch) {
                prefetch
            } else {
                cost.max(prefetch)
            };
        }
        if input_fetching {
            let fetch = self.max_dma(tiles, |t| {
                (t.input_footprint(), MemoryLocation::Dram, MemoryLocation::Cmx, 1)
            });
            cost = cost_adder(cost, fetch);
        }
        if output_spilling {
            let spill = self.max_dma(tiles, |t| {
                (t.output_footprint(), MemoryLocation::Cmx, MemoryLocation::Dram, 1)
            });
            cost = cost_adder(cost, spill);
        }

        emit_span(
            "layer_cost",
            &[
                ("tiles", tiles.len().to_string()),
                ("compute", cycles_field(compute)),
                ("prefetch", cycles_field(prefetch)),
                ("total", cycles_field(cost)),
            ],
        );

        *detailed_split = infos;
        cost
    }

    /// Try every strategy valid on the layer's device and keep the cheapest.
    ///
    /// Errors lose to any legal cost; ties keep the earlier strategy. When
    /// nothing is legal the first error is returned with `TilingStrategy::None`.
    #[allow(clippy::too_many_arguments)]
    pub fn layer_best_strategy(
        &self,
        layer: &DpuLayer,
        n_dpu: u32,
        n_tiles: u32,
        input_fetching: bool,
        output_spilling: bool,
        prefetching: bool,
        detailed_split: &mut Vec<LayerSplitInfo>,
    ) -> (TilingStrategy, CycleCount) {
        detailed_split.clear();
        let mut best: Option<(TilingStrategy, CycleCount, Vec<LayerSplitInfo>)> = None;
        let mut first_error: Option<CycleCount> = None;

        for &strategy in DeviceProfile::of(layer.device).valid_strategies() {
            let mut split = Vec::new();
            let cost = self.layer(
                layer,
                strategy,
                n_dpu,
                n_tiles,
                input_fetching,
                output_spilling,
                prefetching,
                &mut split,
            );

            #[cfg(feature = "tracing")]
            tracing::debug!(%strategy, cost, "strategy evaluated");

            if is_error_code(cost) {
                first_error.get_or_insert(cost);
                continue;
            }
            if best.as_ref().map_or(true, |(_, c, _)| cost < *c) {
                best = Some((strategy, cost, split));
            }
        }

        match best {
            Some((strategy, cost, split)) => {
                *detailed_split = split;
                (strategy, cost)
            }
            None => (TilingStrategy::None, first_error.unwrap_or(ERROR_TILE_OUTPUT)),
        }
    }

    /// Cost of a SHAVE kernel spread over `n_shv` SHAVEs on each of `n_tiles`
    /// tiles, plus the DMA of the per-tile share of its tensors.
    pub fn shave_layer(
        &self,
        workload: &ShaveWorkload,
        n_shv: u32,
        n_tiles: u32,
        input_fetching: bool,
        output_spilling: bool,
    ) -> CycleCount {
        if n_shv == 0 || n_tiles == 0 {
            return ERROR_INVALID_INPUT_PARAMETERS;
        }
        let total = self.shave.get_cost(workload, None);
        if is_error_code(total) {
            return total;
        }
        let Some(workers) = n_shv.checked_mul(n_tiles) else {
            return ERROR_INVALID_INPUT_PARAMETERS;
        };
        let mut cost = total.div_ceil(workers);

        if input_fetching {
            let bytes: u64 = workload.inputs.iter().map(|t| t.size()).sum();
            let fetch = self.dma.dma_cost(
                workload.device,
                bytes.div_ceil(u64::from(n_tiles)),
                MemoryLocation::Dram,
                MemoryLocation::Cmx,
                1,
            );
            cost = cost_adder(cost, fetch);
        }
        if output_spilling {
            let bytes: u64 = workload.outputs.iter().map(|t| t.size()).sum();
            let spill = self.dma.dma_cost(
                workload.device,
                bytes.div_ceil(u64::from(n_tiles)),
                MemoryLocation::Cmx,
                MemoryLocation::Dram,
                1,
            );
            cost = cost_adder(cost, spill);
        }
        cost
    }

    /// Cycles to bring the weights of the slowest tile into CMX.
    pub fn weights_prefetch(&self, layer: &DpuLayer, strategy: TilingStrategy, n_tiles: u32) -> CycleCount {
        match layer.split_across_tiles(strategy, n_tiles) {
            Ok(tiles) => self.max_dma(&tiles, |t| {
                (t.weight_footprint(), MemoryLocation::Dram, MemoryLocation::Cmx, t.output_write_tiles)
            }),
            Err(e) => e.cycles(),
        }
    }

    /// Largest per-tile CMX footprint in bytes.
    pub fn memory_footprint(&self, layer: &DpuLayer, strategy: TilingStrategy, n_tiles: u32) -> Result<u64> {
        let tiles = layer.split_across_tiles(strategy, n_tiles)?;
        Ok(tiles.iter().map(|t| t.footprint()).max().unwrap_or(0))
    }

    fn search(&self) -> IntraTileSearch {
        IntraTileSearch::new(self.config.max_workloads_per_intra_tile_split)
    }

    fn tile(&self, tile: &DpuLayer, n_dpu: u32) -> std::result::Result<LayerSplitInfo, CycleCount> {
        if self.config.check_memory {
            check_fits_cmx(tile).map_err(|e| e.cycles())?;
        }
        let candidates = self.search().candidates(tile, n_dpu).map_err(|e| e.cycles())?;
        let costs = self.price_candidates(&candidates, n_dpu);

        // lowest index wins on ties
        let mut best: Option<usize> = None;
        for (i, &c) in costs.iter().enumerate() {
            if !is_error_code(c) && best.map_or(true, |b| c < costs[b]) {
                best = Some(i);
            }
        }
        let Some(best) = best else {
            return Err(costs.first().copied().unwrap_or(ERROR_TILE_OUTPUT));
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(
            candidates = candidates.len(),
            best,
            cycles = costs[best],
            mode = ?candidates[best].execution_mode,
            "tile priced"
        );

        let all: Vec<DpuWorkloadsWithCycles> = candidates
            .into_iter()
            .zip(costs)
            .map(|(c, cycles)| DpuWorkloadsWithCycles {
                cycles,
                workloads: c.workloads,
            })
            .collect();

        Ok(LayerSplitInfo {
            best_intra_tile_split: all[best].clone(),
            all_intra_tile_splits: all,
            inter_tile_split_layer: tile.clone(),
        })
    }

    fn price(&self, candidate: &IntraTileCandidate, n_dpu: u32) -> CycleCount {
        let costs: Vec<CycleCount> = candidate
            .workloads
            .iter()
            .map(|w| self.dpu.dpu_cost(w))
            .collect();
        dpu_schedule(n_dpu as usize, &costs, self.config.runtime_overhead)
    }

    /// Candidate costs in candidate order, on the rayon pool when enabled.
    fn price_candidates(&self, candidates: &[IntraTileCandidate], n_dpu: u32) -> Vec<CycleCount> {
        #[cfg(feature = "parallel")]
        if self.config.parallel_candidates {
            use rayon::prelude::*;
            return candidates.par_iter().map(|c| self.price(c, n_dpu)).collect();
        }
        candidates.iter().map(|c| self.price(c, n_dpu)).collect()
    }

    /// Largest DMA cost over tiles; the first error wins.
    fn max_dma<F>(&self, tiles: &[DpuLayer], transfer: F) -> CycleCount
    where
        F: Fn(&DpuLayer) -> (u64, MemoryLocation, MemoryLocation, u32),
    {
        let mut worst = 0;
        for t in tiles {
            let (bytes, from, to, owt) = transfer(t);
            let c = self.dma.dma_cost(t.device, bytes, from, to, owt);
            if is_error_code(c) {
                return c;
            }
            worst = worst.max(c);
        }
        worst
    }
}
