//! Closed enumerations describing devices, operations and hardware modes.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VpuDevice {
    #[serde(rename = "VPU_2_0")]
    Vpu2_0,
    #[serde(rename = "VPU_2_1")]
    Vpu2_1,
    #[serde(rename = "VPU_2_7")]
    Vpu2_7,
    #[serde(rename = "VPU_4_0")]
    Vpu4_0,
}

impl VpuDevice {
    pub const ALL: [VpuDevice; 4] = [
        VpuDevice::Vpu2_0,
        VpuDevice::Vpu2_1,
        VpuDevice::Vpu2_7,
        VpuDevice::Vpu4_0,
    ];

    /// Devices of the 2.0/2.1 generation use the VECTOR/MATRIX grids.
    pub fn is_legacy_grid(self) -> bool {
        matches!(self, VpuDevice::Vpu2_0 | VpuDevice::Vpu2_1)
    }
}

impl fmt::Display for VpuDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VpuDevice::Vpu2_0 => "VPU_2_0",
            VpuDevice::Vpu2_1 => "VPU_2_1",
            VpuDevice::Vpu2_7 => "VPU_2_7",
            VpuDevice::Vpu4_0 => "VPU_4_0",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    Convolution,
    DwConvolution,
    CmConvolution,
    Eltwise,
    Maxpool,
    Avepool,
}

impl Operation {
    /// Operations whose weights span the full input channel depth.
    pub fn reduces_input_channels(self) -> bool {
        matches!(self, Operation::Convolution | Operation::CmConvolution)
    }

    pub fn is_pool(self) -> bool {
        matches!(self, Operation::Maxpool | Operation::Avepool)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operation::Convolution => "CONVOLUTION",
            Operation::DwConvolution => "DW_CONVOLUTION",
            Operation::CmConvolution => "CM_CONVOLUTION",
            Operation::Eltwise => "ELTWISE",
            Operation::Maxpool => "MAXPOOL",
            Operation::Avepool => "AVEPOOL",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    #[default]
    Uint8,
    Int8,
    Float16,
    Bfloat16,
    Float32,
    Int32,
}

impl DataType {
    pub fn bytes(self) -> u64 {
        match self {
            DataType::Uint8 | DataType::Int8 => 1,
            DataType::Float16 | DataType::Bfloat16 => 2,
            DataType::Float32 | DataType::Int32 => 4,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, DataType::Float16 | DataType::Bfloat16 | DataType::Float32)
    }
}

/// MPE grid the DPU uses to walk the output tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionMode {
    Vector,
    Matrix,
    VectorFp16,
    #[serde(rename = "CUBOID_16x16")]
    Cuboid16x16,
    #[serde(rename = "CUBOID_8x16")]
    Cuboid8x16,
    #[serde(rename = "CUBOID_4x16")]
    Cuboid4x16,
}

impl ExecutionMode {
    /// Grid size as `[width, height, channels]`.
    pub fn grid(self) -> [u32; 3] {
        match self {
            ExecutionMode::Vector => [16, 1, 16],
            ExecutionMode::Matrix => [4, 4, 16],
            ExecutionMode::VectorFp16 => [4, 1, 16],
            ExecutionMode::Cuboid16x16 => [4, 4, 16],
            ExecutionMode::Cuboid8x16 => [2, 4, 16],
            ExecutionMode::Cuboid4x16 => [1, 4, 16],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivationFunction {
    #[default]
    None,
    Relu,
    Lrelu,
    Add,
    Sub,
    Mult,
}

/// Inter-tile sharing recorded on a workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IsiStrategy {
    #[default]
    Clustering,
    SplitOverH,
    SplitOverK,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Swizzling {
    #[default]
    #[serde(rename = "KEY_0")]
    Key0,
    #[serde(rename = "KEY_1")]
    Key1,
    #[serde(rename = "KEY_2")]
    Key2,
    #[serde(rename = "KEY_3")]
    Key3,
    #[serde(rename = "KEY_4")]
    Key4,
    #[serde(rename = "KEY_5")]
    Key5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemoryLocation {
    Dram,
    Cmx,
}
