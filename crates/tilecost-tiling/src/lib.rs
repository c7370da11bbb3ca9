#![forbid(unsafe_code)]
//! tilecost-tiling: from one layer to per-tile layers to DPU workloads.
//!
//! Responsibilities:
//! - Validate a layer against its geometry and the requested strategy.
//! - Split a layer across tiles (SOH-Overlapped, SOH-HaloRead, SOK,
//!   SOK-No-Broadcast, SOHO-K-Switch, SOW), recomputing padding, halo and SEP.
//! - Enumerate bounded, aligned intra-tile workload candidates.
//! - Provide debug-time verification helpers for split results.
//!
//! **No pricing** here. Costs come from `tilecost-providers`.

pub mod intra;
pub mod splitter;
pub mod validator;
pub mod verify;

mod partition;

pub use intra::{IntraTileCandidate, IntraTileSearch, SplitAxis};
pub use splitter::TileSplit;
pub use validator::{validate_layer, validate_strategy};
