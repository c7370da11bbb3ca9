//! SHAVE kernel formula tables.
//!
//! Each kernel is a first-degree model over SIMD steps:
//! `cycles = ceil(elements / vector_size) * slope + intercept`, in DPU cycles.
//! The current table uses lowercase kernel names; the legacy table keeps the
//! capitalized names of the older kernel library.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::Serialize;

use tilecost_core::cycles::to_cycles;
use tilecost_core::types::VpuDevice;
use tilecost_core::CycleCount;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShaveFormula {
    /// Elements processed per SIMD step.
    pub vector_size: u32,
    /// Cycles per step.
    pub slope: f32,
    /// Fixed cycles per call.
    pub intercept: f32,
    pub max_params: usize,
}

impl ShaveFormula {
    pub fn cycles(&self, elements: u64) -> CycleCount {
        let steps = elements.div_ceil(u64::from(self.vector_size.max(1)));
        to_cycles(steps as f64 * f64::from(self.slope) + f64::from(self.intercept))
    }
}

pub(crate) type ShaveTable = BTreeMap<VpuDevice, BTreeMap<&'static str, ShaveFormula>>;

/// `(name, slope, intercept, max_params)`
type Row = (&'static str, f32, f32, usize);

fn simd_width(device: VpuDevice) -> u32 {
    match device {
        VpuDevice::Vpu2_0 | VpuDevice::Vpu2_1 => 8,
        VpuDevice::Vpu2_7 => 16,
        VpuDevice::Vpu4_0 => 32,
    }
}

fn build(devices: &[VpuDevice], rows: &[Row]) -> ShaveTable {
    devices
        .iter()
        .map(|&d| {
            let kernels = rows
                .iter()
                .map(|&(name, slope, intercept, max_params)| {
                    let f = ShaveFormula {
                        vector_size: simd_width(d),
                        slope,
                        intercept,
                        max_params,
                    };
                    (name, f)
                })
                .collect();
            (d, kernels)
        })
        .collect()
}

const CURRENT_ROWS: &[Row] = &[
    ("relu", 0.6, 550.0, 0),
    ("lrelu", 0.8, 570.0, 1),
    ("clamp", 0.7, 560.0, 2),
    ("sigmoid", 1.9, 720.0, 0),
    ("tanh", 2.1, 740.0, 0),
    ("gelu", 3.4, 900.0, 0),
    ("swish", 2.6, 800.0, 1),
    ("hswish", 1.2, 600.0, 0),
    ("exp", 1.8, 700.0, 0),
    ("sqrt", 1.5, 650.0, 0),
    ("add", 0.9, 600.0, 0),
    ("multiply", 0.9, 600.0, 0),
    ("softmax", 4.2, 1500.0, 1),
    ("mvn", 5.0, 1800.0, 3),
    ("normalizel2", 3.8, 1400.0, 2),
];

const LEGACY_ROWS: &[Row] = &[
    ("Sigmoid", 2.4, 1000.0, 0),
    ("HardSigmoid", 1.4, 900.0, 2),
    ("Tanh", 2.6, 1020.0, 0),
    ("Elu", 2.2, 980.0, 1),
    ("Mish", 3.9, 1200.0, 0),
    ("Swish", 3.0, 1100.0, 1),
    ("HSwish", 1.6, 950.0, 0),
    ("SoftPlus", 3.1, 1150.0, 0),
    ("Gelu", 4.0, 1250.0, 0),
];

pub(crate) static CURRENT: Lazy<ShaveTable> =
    Lazy::new(|| build(&[VpuDevice::Vpu2_7, VpuDevice::Vpu4_0], CURRENT_ROWS));

pub(crate) static LEGACY: Lazy<ShaveTable> = Lazy::new(|| build(&VpuDevice::ALL, LEGACY_ROWS));
