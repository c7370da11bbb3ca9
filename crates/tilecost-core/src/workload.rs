//! Concrete hardware operations: one DPU workload or one SHAVE kernel call.

use serde::{Deserialize, Serialize};

use crate::halo::HaloWorkload;
use crate::sep::SepMode;
use crate::tensor::VpuTensor;
use crate::types::{
    ActivationFunction, DataType, ExecutionMode, IsiStrategy, Operation, Swizzling, VpuDevice,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Padding {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl Padding {
    pub const fn new(top: u32, bottom: u32, left: u32, right: u32) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    pub const fn zero() -> Self {
        Self::new(0, 0, 0, 0)
    }
}

fn one() -> u32 {
    1
}

/// One operation executed by a DPU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DpuWorkload {
    pub device: VpuDevice,
    pub op: Operation,
    pub input: VpuTensor,
    pub output: VpuTensor,
    /// `[width, height]`
    pub kernels: [u32; 2],
    /// `[width, height]`
    pub strides: [u32; 2],
    #[serde(default)]
    pub padding: Padding,
    pub execution_mode: ExecutionMode,
    #[serde(default)]
    pub activation_function: ActivationFunction,
    #[serde(default)]
    pub act_sparsity: f32,
    #[serde(default)]
    pub weight_sparsity: f32,
    #[serde(default)]
    pub input_sparsity_enabled: bool,
    #[serde(default)]
    pub weight_sparsity_enabled: bool,
    #[serde(default)]
    pub input_swizzling: [Swizzling; 2],
    #[serde(default)]
    pub output_swizzling: Swizzling,
    /// Broadcast fan-out of the output. Always at least 1.
    #[serde(default = "one")]
    pub output_write_tiles: u32,
    /// Offsets of this workload inside its layer, `[width, height, channels, batch]`.
    #[serde(default)]
    pub offsets: [u32; 4],
    #[serde(default)]
    pub isi_strategy: IsiStrategy,
    #[serde(default)]
    pub weight_type: Option<DataType>,
    #[serde(default)]
    pub halo: HaloWorkload,
    #[serde(default)]
    pub sep: SepMode,
}

impl DpuWorkload {
    pub fn new(
        device: VpuDevice,
        op: Operation,
        input: VpuTensor,
        output: VpuTensor,
        kernels: [u32; 2],
        strides: [u32; 2],
        padding: Padding,
    ) -> Self {
        let execution_mode = if device.is_legacy_grid() {
            ExecutionMode::Vector
        } else {
            ExecutionMode::Cuboid16x16
        };
        Self {
            device,
            op,
            input,
            output,
            kernels,
            strides,
            padding,
            execution_mode,
            activation_function: ActivationFunction::None,
            act_sparsity: 0.0,
            weight_sparsity: 0.0,
            input_sparsity_enabled: false,
            weight_sparsity_enabled: false,
            input_swizzling: [Swizzling::Key0; 2],
            output_swizzling: Swizzling::Key0,
            output_write_tiles: 1,
            offsets: [0; 4],
            isi_strategy: IsiStrategy::Clustering,
            weight_type: None,
            halo: HaloWorkload::default(),
            sep: SepMode::default(),
        }
    }

    pub fn with_execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.execution_mode = mode;
        self
    }

    pub fn with_output_write_tiles(mut self, owt: u32) -> Self {
        self.output_write_tiles = owt;
        self
    }

    pub fn with_isi_strategy(mut self, isi: IsiStrategy) -> Self {
        self.isi_strategy = isi;
        self
    }

    pub fn with_sep(mut self, sep: SepMode) -> Self {
        self.sep = sep;
        self
    }

    pub fn with_weight_sparsity(mut self, ratio: f32) -> Self {
        self.weight_sparsity = ratio;
        self.weight_sparsity_enabled = ratio > 0.0;
        self
    }

    /// Element type of the weights (defaults to the input type).
    pub fn weights_dtype(&self) -> DataType {
        self.weight_type.unwrap_or(self.input.dtype)
    }
}

/// One SHAVE (software kernel) invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaveWorkload {
    /// Kernel name, e.g. `"sigmoid"`.
    pub name: String,
    pub device: VpuDevice,
    #[serde(default)]
    pub inputs: Vec<VpuTensor>,
    #[serde(default)]
    pub outputs: Vec<VpuTensor>,
    #[serde(default)]
    pub params: Vec<f32>,
}

impl ShaveWorkload {
    pub fn new(name: impl Into<String>, device: VpuDevice, input: VpuTensor, output: VpuTensor) -> Self {
        Self {
            name: name.into(),
            device,
            inputs: vec![input],
            outputs: vec![output],
            params: Vec::new(),
        }
    }

    pub fn with_params(mut self, params: Vec<f32>) -> Self {
        self.params = params;
        self
    }
}
