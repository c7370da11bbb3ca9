//! Theoretical DPU provider: a MAC/PPE throughput bound.

use tilecost_core::cycles::{to_cycles, ERROR_INVALID_INPUT_CONFIGURATION};
use tilecost_core::device::DeviceProfile;
use tilecost_core::types::Operation;
use tilecost_core::workload::DpuWorkload;
use tilecost_core::CycleCount;

use crate::traits::DpuCostProvider;

/// Closed-form DPU estimate.
///
/// Convolutions are MAC-bound over the output padded to the execution-mode
/// grid. Elementwise ops are PPE-bound over the input volume, at half rate
/// when the output is broadcast. Enabled weight sparsity scales the MAC work.
#[derive(Debug, Clone, Copy, Default)]
pub struct TheoreticalDpuProvider;

impl TheoreticalDpuProvider {
    pub fn new() -> Self {
        Self
    }

    /// Output volume rounded up to whole grid cells on every axis.
    pub fn grid_padded_output(workload: &DpuWorkload) -> u64 {
        let [gw, gh, gz] = workload.execution_mode.grid();
        let out = &workload.output;
        let pad = |v: u32, g: u32| u64::from(v.div_ceil(g) * g);
        pad(out.width(), gw) * pad(out.height(), gh) * pad(out.channels(), gz) * u64::from(out.batches())
    }

    fn raw_cycles(workload: &DpuWorkload, profile: &DeviceProfile) -> f64 {
        if workload.op == Operation::Eltwise {
            let mt = if workload.output_write_tiles > 1 { 2 } else { 1 };
            let lanes = (profile.nr_ppe / mt).max(1);
            return workload.input.volume().div_ceil(u64::from(lanes)) as f64;
        }

        let kernel_area = u64::from(workload.kernels[0]) * u64::from(workload.kernels[1]);
        let mut work = kernel_area * Self::grid_padded_output(workload);
        let macs = if workload.op.reduces_input_channels() {
            work *= u64::from(workload.input.channels());
            profile.nr_macs
        } else {
            profile.nr_macs / profile.input_channels_mac
        };

        let mut cycles = work as f64 / f64::from(macs.max(1));
        if workload.weight_sparsity_enabled {
            cycles *= 1.0 - f64::from(workload.weight_sparsity.clamp(0.0, 1.0));
        }
        cycles.ceil()
    }
}

impl DpuCostProvider for TheoreticalDpuProvider {
    fn dpu_cost(&self, workload: &DpuWorkload) -> CycleCount {
        if !workload.input.is_positive() || !workload.output.is_positive() {
            return ERROR_INVALID_INPUT_CONFIGURATION;
        }
        let profile = DeviceProfile::of(workload.device);
        to_cycles(Self::raw_cycles(workload, profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilecost_core::prelude::*;

    fn wl(op: Operation, owt: u32) -> DpuWorkload {
        DpuWorkload::new(
            VpuDevice::Vpu2_7,
            op,
            VpuTensor::new(16, 16, 64, 1, DataType::Uint8),
            VpuTensor::new(16, 16, 64, 1, DataType::Uint8),
            [3, 3],
            [1, 1],
            Padding::new(1, 1, 1, 1),
        )
        .with_output_write_tiles(owt)
    }

    #[test]
    fn test_conv_is_mac_bound() {
        let p = TheoreticalDpuProvider::new();
        // 9 * 16*16*64 * 64 / 2048
        assert_eq!(p.dpu_cost(&wl(Operation::Convolution, 1)), 4608);
        // depthwise: 9 * 16*16*64 / (2048 / 8)
        assert_eq!(p.dpu_cost(&wl(Operation::DwConvolution, 1)), 576);
    }

    #[test]
    fn test_eltwise_is_ppe_bound() {
        let p = TheoreticalDpuProvider::new();
        let e = wl(Operation::Eltwise, 1);
        assert_eq!(p.dpu_cost(&e), 16 * 16 * 64 / 64);
        assert_eq!(p.dpu_cost(&wl(Operation::Eltwise, 2)), 16 * 16 * 64 / 32);
    }

    #[test]
    fn test_grid_padding_charges_partial_cells() {
        let narrow = wl(Operation::Convolution, 1).with_execution_mode(ExecutionMode::Cuboid16x16);
        let mut w = narrow.clone();
        w.output = w.output.with_width(13);
        w.input = w.input.with_width(13);
        assert_eq!(TheoreticalDpuProvider::grid_padded_output(&w), 16 * 16 * 64);
        let w4 = w.with_execution_mode(ExecutionMode::Cuboid4x16);
        assert_eq!(TheoreticalDpuProvider::grid_padded_output(&w4), 13 * 16 * 64);
    }

    #[test]
    fn test_weight_sparsity_scales_work() {
        let p = TheoreticalDpuProvider::new();
        let sparse = wl(Operation::Convolution, 1).with_weight_sparsity(0.5);
        assert_eq!(p.dpu_cost(&sparse), 2304);
    }

    #[test]
    fn test_degenerate_shape_is_error() {
        let mut w = wl(Operation::Convolution, 1);
        w.output = w.output.with_channels(0);
        assert_eq!(
            TheoreticalDpuProvider::new().dpu_cost(&w),
            ERROR_INVALID_INPUT_CONFIGURATION
        );
    }
}
