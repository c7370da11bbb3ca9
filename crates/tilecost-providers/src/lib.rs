#![forbid(unsafe_code)]
//! tilecost-providers: cost estimators behind narrow traits.
//!
//! Responsibilities:
//! - Provider interfaces for DPU workloads, DMA transfers and SHAVE kernels.
//! - Deterministic theoretical DPU and DMA providers.
//! - SHAVE math providers (current and legacy tables) and the priority chain
//!   that falls back from one to the next.
//! - The on-chip memory fit check applied to every tile before pricing.
//!
//! Every provider answers in the cycle domain: failures are error codes,
//! never panics.

pub mod dma;
pub mod dpu;
pub mod memory;
pub mod shave;
pub mod traits;

pub use dma::TheoreticalDmaProvider;
pub use dpu::TheoreticalDpuProvider;
pub use memory::check_fits_cmx;
pub use shave::{default_shave_chain, PriorityShaveCostProvider, ShaveMathProvider, ShaveModelTag};
pub use traits::{DmaCostProvider, DpuCostProvider, ShaveCostProvider, ShaveOpExecutor};
