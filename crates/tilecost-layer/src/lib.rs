#![forbid(unsafe_code)]
//! tilecost-layer: the layer cost orchestrator.
//!
//! Responsibilities:
//! - Drive split → intra-tile search → pricing → aggregation for one layer.
//! - Keep full provenance of every tile (`LayerSplitInfo`).
//! - Pick the cheapest strategy, price SHAVE layers, weights prefetch and
//!   memory footprint.
//! - Fingerprint split provenance for deterministic audits.
//!
//! Providers are pluggable; the default model uses the theoretical ones from
//! `tilecost-providers`.

pub mod error;
pub mod fingerprint;
pub mod metrics;
pub mod orchestrator;
pub mod split_info;

pub use error::{Error, Result};
pub use fingerprint::split_fingerprint;
pub use orchestrator::LayerCostModel;
pub use split_info::{DpuWorkloadsWithCycles, LayerSplitInfo};
