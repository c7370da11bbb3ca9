//! Storage-element-pointer (SEP) descriptor for indirectly addressed inputs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SepMode {
    pub enabled: bool,
    /// Pointer table shape `[width, height, channels, batch]`.
    #[serde(default)]
    pub storage_elements_pointers: [u32; 4],
    /// Shape of the tensor the pointers address.
    #[serde(default)]
    pub actual_activators_input: [u32; 4],
    #[serde(default)]
    pub no_sparse_map: bool,
}

impl SepMode {
    /// Rescale both shapes on the height axis to a tile that reads
    /// `tile_rows` of the layer's `layer_rows` input rows.
    ///
    /// `new_h = ceil(h * tile_rows / layer_rows)`. Disabled descriptors are
    /// returned unchanged.
    pub fn rescaled_height(&self, tile_rows: u32, layer_rows: u32) -> Self {
        if !self.enabled || layer_rows == 0 {
            return *self;
        }
        let scale = |h: u32| -> u32 {
            let num = u64::from(h) * u64::from(tile_rows);
            num.div_ceil(u64::from(layer_rows)) as u32
        };
        let mut out = *self;
        out.storage_elements_pointers[1] = scale(self.storage_elements_pointers[1]);
        out.actual_activators_input[1] = scale(self.actual_activators_input[1]);
        out
    }
}
