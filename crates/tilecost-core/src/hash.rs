//! blake3 digests of layers and split provenance.
//!
//! Values are streamed through their JSON encoding straight into the hasher,
//! so two structurally equal values always share a digest.

use blake3::Hasher;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::layer::DpuLayer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Leading 16 hex digits, for log lines and terminal output.
    pub fn short(&self) -> String {
        self.0[..8].iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<blake3::Hash> for Hash256 {
    fn from(h: blake3::Hash) -> Self {
        Self(*h.as_bytes())
    }
}

pub fn hash_bytes(bytes: &[u8]) -> Hash256 {
    blake3::hash(bytes).into()
}

/// Digest of any serializable value.
pub fn hash_serde<T: Serialize>(v: &T) -> Result<Hash256> {
    let mut hasher = Hasher::new();
    serde_json::to_writer(&mut hasher, v).map_err(|e| Error::Hash(e.to_string()))?;
    Ok(hasher.finalize().into())
}

/// Identity of a layer description: equal layers hash equal.
pub fn hash_layer(layer: &DpuLayer) -> Result<Hash256> {
    hash_serde(layer)
}
