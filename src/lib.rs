#![forbid(unsafe_code)]
//! tilecost: cycle cost estimation for DPU layers split across compute tiles.
//!
//! Facade over the workspace crates:
//! - `tilecost_core`: cycle arithmetic, data model, device profiles, config.
//! - `tilecost_tiling`: inter-tile split, validation, intra-tile search.
//! - `tilecost_providers`: DPU, DMA and SHAVE cost providers.
//! - `tilecost_layer`: the orchestrator that prices a whole layer.

pub use tilecost_core;
pub use tilecost_layer;
pub use tilecost_providers;
pub use tilecost_tiling;

pub use tilecost_core::{CostModelConfig, CycleCount, DpuLayer, TilingStrategy};
pub use tilecost_layer::{LayerCostModel, LayerSplitInfo};
