//! Theoretical DMA provider: fixed latency plus a bandwidth term.

use tilecost_core::cycles::{cost_adder, to_cycles, ERROR_INVALID_INPUT_PARAMETERS};
use tilecost_core::device::DeviceProfile;
use tilecost_core::types::{MemoryLocation, VpuDevice};
use tilecost_core::CycleCount;

use crate::traits::DmaCostProvider;

#[derive(Debug, Clone, Copy, Default)]
pub struct TheoreticalDmaProvider;

impl TheoreticalDmaProvider {
    pub fn new() -> Self {
        Self
    }
}

impl DmaCostProvider for TheoreticalDmaProvider {
    /// DRAM moves cost `latency + ceil(bytes * dpu_MHz / DRAM_MBps)` per
    /// destination; CMX to CMX moves are bound by the CMX word width and clock.
    fn dma_cost(
        &self,
        device: VpuDevice,
        bytes: u64,
        from: MemoryLocation,
        to: MemoryLocation,
        output_write_tiles: u32,
    ) -> CycleCount {
        if output_write_tiles == 0 {
            return ERROR_INVALID_INPUT_PARAMETERS;
        }
        if bytes == 0 {
            return 0;
        }
        let p = DeviceProfile::of(device);
        let dpu_mhz = u64::from(p.dpu_freq_mhz);

        let (latency, transfer) = if from == MemoryLocation::Dram || to == MemoryLocation::Dram {
            let transfer = bytes.saturating_mul(dpu_mhz).div_ceil(u64::from(p.dram_bandwidth_mbps.max(1)));
            (p.dram_latency_cycles(), transfer)
        } else {
            let words = bytes.div_ceil(u64::from(p.cmx_word_bytes.max(1)));
            let transfer = words.saturating_mul(dpu_mhz).div_ceil(u64::from(p.cmx_freq_mhz.max(1)));
            (0, transfer)
        };

        let transfer = transfer.saturating_mul(u64::from(output_write_tiles));
        cost_adder(latency, to_cycles(transfer))
    }
}
