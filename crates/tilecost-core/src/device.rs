//! Device capability table.
//!
//! Every number the splitter, the intra-tile search and the theoretical
//! providers need about the hardware comes from here, so nothing downstream
//! hard-codes an alignment or a memory size.

use serde::Serialize;

use crate::strategy::TilingStrategy;
use crate::types::{Operation, VpuDevice};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceProfile {
    pub device: VpuDevice,
    /// Output channel granularity of a DPU workload.
    pub channel_alignment: u32,
    /// On-chip memory available to one tile, in bytes.
    pub cmx_bytes: u64,
    pub dpus_per_tile: u32,
    pub dpu_freq_mhz: u32,
    pub cmx_freq_mhz: u32,
    pub cmx_word_bytes: u32,
    pub dram_bandwidth_mbps: u32,
    pub dram_latency_ns: u32,
    pub nr_macs: u32,
    pub nr_ppe: u32,
    pub input_channels_mac: u32,
}

const KIB: u64 = 1024;

static VPU_2_0: DeviceProfile = DeviceProfile {
    device: VpuDevice::Vpu2_0,
    channel_alignment: 16,
    cmx_bytes: 1024 * KIB,
    dpus_per_tile: 5,
    dpu_freq_mhz: 700,
    cmx_freq_mhz: 700,
    cmx_word_bytes: 16,
    dram_bandwidth_mbps: 20_000,
    dram_latency_ns: 0,
    nr_macs: 256,
    nr_ppe: 16,
    input_channels_mac: 1,
};

static VPU_2_1: DeviceProfile = DeviceProfile {
    device: VpuDevice::Vpu2_1,
    channel_alignment: 16,
    cmx_bytes: 1024 * KIB,
    dpus_per_tile: 5,
    dpu_freq_mhz: 850,
    cmx_freq_mhz: 850,
    cmx_word_bytes: 16,
    dram_bandwidth_mbps: 20_000,
    dram_latency_ns: 0,
    nr_macs: 256,
    nr_ppe: 16,
    input_channels_mac: 1,
};

static VPU_2_7: DeviceProfile = DeviceProfile {
    device: VpuDevice::Vpu2_7,
    channel_alignment: 16,
    cmx_bytes: 2048 * KIB,
    dpus_per_tile: 1,
    dpu_freq_mhz: 1300,
    cmx_freq_mhz: 975,
    cmx_word_bytes: 16,
    dram_bandwidth_mbps: 27_000,
    dram_latency_ns: 956,
    nr_macs: 2048,
    nr_ppe: 64,
    input_channels_mac: 8,
};

static VPU_4_0: DeviceProfile = DeviceProfile {
    device: VpuDevice::Vpu4_0,
    channel_alignment: 16,
    cmx_bytes: 1536 * KIB,
    dpus_per_tile: 1,
    dpu_freq_mhz: 1700,
    cmx_freq_mhz: 971,
    cmx_word_bytes: 32,
    dram_bandwidth_mbps: 136_000,
    dram_latency_ns: 300,
    nr_macs: 2048,
    nr_ppe: 64,
    input_channels_mac: 8,
};

/// Z tile sizes allowed for operations that cap the workload depth.
pub const MAX_Z_TILES: [u32; 3] = [16, 32, 64];

impl DeviceProfile {
    pub fn of(device: VpuDevice) -> &'static DeviceProfile {
        match device {
            VpuDevice::Vpu2_0 => &VPU_2_0,
            VpuDevice::Vpu2_1 => &VPU_2_1,
            VpuDevice::Vpu2_7 => &VPU_2_7,
            VpuDevice::Vpu4_0 => &VPU_4_0,
        }
    }

    /// DRAM access latency converted to DPU cycles.
    pub fn dram_latency_cycles(&self) -> u32 {
        let cycles = u64::from(self.dram_latency_ns) * u64::from(self.dpu_freq_mhz) / 1000;
        cycles as u32
    }

    /// Operations whose workloads may only carry 16, 32 or 64 output channels.
    pub fn requires_max_z_tile(&self, op: Operation) -> bool {
        !self.device.is_legacy_grid()
            && matches!(
                op,
                Operation::CmConvolution
                    | Operation::DwConvolution
                    | Operation::Maxpool
                    | Operation::Avepool
            )
    }

    /// Strategies the best-strategy search tries on this device.
    pub fn valid_strategies(&self) -> &'static [TilingStrategy] {
        match self.device {
            VpuDevice::Vpu2_0 | VpuDevice::Vpu2_1 => &[
                TilingStrategy::None,
                TilingStrategy::SohOverlapped,
                TilingStrategy::Sok,
            ],
            VpuDevice::Vpu2_7 => &[
                TilingStrategy::None,
                TilingStrategy::SohOverlapped,
                TilingStrategy::SohHaloRead,
                TilingStrategy::Sok,
                TilingStrategy::SokNoBroadcast,
                TilingStrategy::SohoKSwitch,
            ],
            VpuDevice::Vpu4_0 => &[
                TilingStrategy::None,
                TilingStrategy::SohOverlapped,
                TilingStrategy::Sok,
                TilingStrategy::SokNoBroadcast,
                TilingStrategy::SohoKSwitch,
                TilingStrategy::Sow,
            ],
        }
    }

    /// Whether `strategy` can be applied to `op` on this device at all.
    ///
    /// HaloRead is 2.7 only and needs a spatial kernel op. SOW is 4.0 only
    /// and excludes channel-major convolution. The 2.0 grid broadcasts SOK
    /// but has neither the no-broadcast variant nor the K switch.
    pub fn supports(&self, strategy: TilingStrategy, op: Operation) -> bool {
        match strategy {
            TilingStrategy::None | TilingStrategy::SohOverlapped | TilingStrategy::Sok => true,
            TilingStrategy::SokNoBroadcast | TilingStrategy::SohoKSwitch => {
                !self.device.is_legacy_grid()
            }
            TilingStrategy::SohHaloRead => {
                self.device == VpuDevice::Vpu2_7 && op != Operation::Eltwise
            }
            TilingStrategy::Sow => {
                self.device == VpuDevice::Vpu4_0 && op != Operation::CmConvolution
            }
        }
    }
}
