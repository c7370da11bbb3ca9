use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use tilecost_core::cycles::{
    is_error_code, ERROR_SHAVE_INVALID_INPUT, ERROR_SHAVE_OPERATOR_MISSING, ERROR_SHAVE_PARAMS,
};
use tilecost_core::types::VpuDevice;
use tilecost_core::workload::ShaveWorkload;
use tilecost_core::CycleCount;

use super::tables::{ShaveFormula, ShaveTable, CURRENT, LEGACY};
use crate::traits::{ShaveCostProvider, ShaveOpExecutor};

/// Which formula table a `ShaveMathProvider` reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShaveModelTag {
    Current,
    Legacy,
}

impl ShaveModelTag {
    /// Source name reported for estimates from this table.
    pub fn source_name(self) -> &'static str {
        match self {
            ShaveModelTag::Current => "shave_2",
            ShaveModelTag::Legacy => "shave_1",
        }
    }

    fn table(self) -> &'static ShaveTable {
        match self {
            ShaveModelTag::Current => &*CURRENT,
            ShaveModelTag::Legacy => &*LEGACY,
        }
    }
}

/// Table-driven SHAVE provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaveMathProvider {
    tag: ShaveModelTag,
}

impl ShaveMathProvider {
    pub fn new(tag: ShaveModelTag) -> Self {
        Self { tag }
    }

    pub fn tag(&self) -> ShaveModelTag {
        self.tag
    }

    fn kernels(&self, device: VpuDevice) -> Option<&'static BTreeMap<&'static str, ShaveFormula>> {
        self.tag.table().get(&device)
    }

    fn formula(&self, name: &str, device: VpuDevice) -> Option<ShaveFormula> {
        self.kernels(device)?.get(name).copied()
    }
}

fn evaluate(formula: &ShaveFormula, workload: &ShaveWorkload) -> CycleCount {
    if workload.params.len() > formula.max_params {
        return ERROR_SHAVE_PARAMS;
    }
    match workload.outputs.first() {
        Some(out) => formula.cycles(out.volume()),
        None => ERROR_SHAVE_INVALID_INPUT,
    }
}

impl ShaveCostProvider for ShaveMathProvider {
    fn get_cost(&self, workload: &ShaveWorkload, source: Option<&mut String>) -> CycleCount {
        let Some(formula) = self.formula(&workload.name, workload.device) else {
            return ERROR_SHAVE_OPERATOR_MISSING;
        };
        let cycles = evaluate(&formula, workload);
        if !is_error_code(cycles) {
            if let Some(s) = source {
                *s = self.tag.source_name().to_string();
            }
        }
        cycles
    }

    fn get_max_num_params(&self) -> usize {
        self.tag
            .table()
            .values()
            .flat_map(|kernels| kernels.values())
            .map(|f| f.max_params)
            .max()
            .unwrap_or(0)
    }

    fn get_shave_supported_ops(&self, device: VpuDevice) -> BTreeSet<String> {
        self.kernels(device)
            .map(|k| k.keys().map(|n| n.to_string()).collect())
            .unwrap_or_default()
    }

    fn get_shave_instance(&self, name: &str, device: VpuDevice) -> Option<Arc<dyn ShaveOpExecutor>> {
        let formula = self.formula(name, device)?;
        Some(Arc::new(FormulaExecutor {
            name: name.to_string(),
            device,
            formula,
        }))
    }
}

/// One kernel of a formula table, bound to its device.
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaExecutor {
    name: String,
    device: VpuDevice,
    formula: ShaveFormula,
}

impl FormulaExecutor {
    pub fn formula(&self) -> &ShaveFormula {
        &self.formula
    }
}

impl ShaveOpExecutor for FormulaExecutor {
    fn name(&self) -> &str {
        &self.name
    }

    fn device(&self) -> VpuDevice {
        self.device
    }

    fn dpu_cycles(&self, workload: &ShaveWorkload) -> CycleCount {
        evaluate(&self.formula, workload)
    }
}
