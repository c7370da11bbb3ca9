//! Deterministic digest of split provenance.

use tilecost_core::hash::{hash_serde, Hash256};

use crate::error::Result;
use crate::split_info::LayerSplitInfo;

/// blake3 digest of the serialized per-tile provenance.
///
/// Identical evaluations always produce identical fingerprints, so two runs
/// (or a sequential and a parallel run) can be compared cheaply.
pub fn split_fingerprint(infos: &[LayerSplitInfo]) -> Result<Hash256> {
    Ok(hash_serde(&infos)?)
}
