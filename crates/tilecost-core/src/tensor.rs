//! Activation tensor descriptor.

use serde::{Deserialize, Serialize};

use crate::types::DataType;

/// `[width, height, channels, batch]` plus element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VpuTensor {
    pub shape: [u32; 4],
    #[serde(default)]
    pub dtype: DataType,
}

impl VpuTensor {
    pub const fn new(width: u32, height: u32, channels: u32, batch: u32, dtype: DataType) -> Self {
        Self {
            shape: [width, height, channels, batch],
            dtype,
        }
    }

    pub fn width(&self) -> u32 {
        self.shape[0]
    }
    pub fn height(&self) -> u32 {
        self.shape[1]
    }
    pub fn channels(&self) -> u32 {
        self.shape[2]
    }
    pub fn batches(&self) -> u32 {
        self.shape[3]
    }

    /// Number of elements.
    pub fn volume(&self) -> u64 {
        self.shape.iter().map(|&d| u64::from(d)).product()
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.volume() * self.dtype.bytes()
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.shape[0] = width;
        self
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.shape[1] = height;
        self
    }

    pub fn with_channels(mut self, channels: u32) -> Self {
        self.shape[2] = channels;
        self
    }

    pub fn is_positive(&self) -> bool {
        self.shape.iter().all(|&d| d > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tensor_size_follows_dtype() {
        let t = VpuTensor::new(16, 8, 32, 1, DataType::Float16);
        assert_eq!(t.volume(), 16 * 8 * 32);
        assert_eq!(t.size(), 16 * 8 * 32 * 2);
        assert_eq!(t.with_height(4).height(), 4);
        assert!(t.is_positive());
        assert!(!t.with_channels(0).is_positive());
    }
}
