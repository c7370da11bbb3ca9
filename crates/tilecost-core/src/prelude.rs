//! Convenient re-exports for downstream crates.

pub use crate::config::CostModelConfig;
pub use crate::cycles::{cost_adder, dpu_schedule, is_error_code, to_cycles, CycleCount, ToCycles};
pub use crate::device::DeviceProfile;
pub use crate::error::{Error, Result};
pub use crate::halo::{HaloSides, HaloWorkload};
pub use crate::layer::DpuLayer;
pub use crate::sep::SepMode;
pub use crate::strategy::TilingStrategy;
pub use crate::tensor::VpuTensor;
pub use crate::types::{
    ActivationFunction, DataType, ExecutionMode, IsiStrategy, MemoryLocation, Operation, Swizzling,
    VpuDevice,
};
pub use crate::workload::{DpuWorkload, Padding, ShaveWorkload};
