#![forbid(unsafe_code)]
//! tilecost-core: shared vocabulary of the tiling cost engine.
//!
//! Responsibilities:
//! - Cycle arithmetic with in-band error codes (`cycles`).
//! - Tensor, workload, halo, SEP and layer value types.
//! - Device capability table and tiling strategy identifiers.
//! - Configuration, error types and stable hashing.
//!
//! **No splitting, no pricing** here. Those live in `tilecost-tiling` and
//! `tilecost-providers`.

pub mod config;
pub mod cycles;
pub mod device;
pub mod error;
pub mod halo;
pub mod hash;
pub mod layer;
pub mod prelude;
pub mod sep;
pub mod strategy;
pub mod tensor;
pub mod types;
pub mod workload;

pub use config::CostModelConfig;
pub use cycles::CycleCount;
pub use error::{Error, Result};
pub use layer::DpuLayer;
pub use strategy::TilingStrategy;
