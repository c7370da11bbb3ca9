//! Halo bookkeeping for height-split tiles that exchange borders.

use serde::{Deserialize, Serialize};

/// Halo amount per side, in elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HaloSides {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
    pub front: u32,
    pub back: u32,
}

impl HaloSides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Rows added on the height axis.
    pub fn vertical(&self) -> u32 {
        self.top + self.bottom
    }
}

/// Halo descriptor of a workload.
///
/// `input` is what the tile borrows from neighbours; `output` is what the
/// tile's output contributes to neighbours. Tile `i`'s `output.bottom` must
/// equal tile `i + 1`'s `input.top` (and symmetrically for the other side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HaloWorkload {
    #[serde(default)]
    pub input: HaloSides,
    #[serde(default)]
    pub output: HaloSides,
}

impl HaloWorkload {
    pub fn is_empty(&self) -> bool {
        self.input.is_empty() && self.output.is_empty()
    }
}
