use std::collections::BTreeSet;
use std::sync::Arc;

use tilecost_core::cycles::{is_error_code, ERROR_SHAVE_OPERATOR_MISSING};
use tilecost_core::types::VpuDevice;
use tilecost_core::workload::ShaveWorkload;
use tilecost_core::CycleCount;

use crate::traits::{ShaveCostProvider, ShaveOpExecutor};

/// Source reported when no provider could price a workload.
pub const UNKNOWN_SOURCE: &str = "unknown";

/// Ordered fallback over several SHAVE providers.
///
/// `None` slots are skipped. The first provider returning a legal cost wins.
#[derive(Clone, Default)]
pub struct PriorityShaveCostProvider {
    providers: Vec<Option<Arc<dyn ShaveCostProvider>>>,
}

impl PriorityShaveCostProvider {
    pub fn new(providers: Vec<Option<Arc<dyn ShaveCostProvider>>>) -> Self {
        Self { providers }
    }

    pub fn push(&mut self, provider: Option<Arc<dyn ShaveCostProvider>>) {
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    fn active(&self) -> impl Iterator<Item = &Arc<dyn ShaveCostProvider>> {
        self.providers.iter().flatten()
    }
}

impl std::fmt::Debug for PriorityShaveCostProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriorityShaveCostProvider")
            .field("slots", &self.providers.len())
            .field("active", &self.active().count())
            .finish()
    }
}

impl ShaveCostProvider for PriorityShaveCostProvider {
    /// When every provider fails the last error is returned
    /// (`ERROR_SHAVE_OPERATOR_MISSING` if none was tried) and the source is
    /// `"unknown"`.
    fn get_cost(&self, workload: &ShaveWorkload, source: Option<&mut String>) -> CycleCount {
        let mut last_error = ERROR_SHAVE_OPERATOR_MISSING;
        for provider in self.active() {
            let mut name = String::new();
            let cycles = provider.get_cost(workload, Some(&mut name));
            if !is_error_code(cycles) {
                if let Some(s) = source {
                    *s = if name.is_empty() {
                        UNKNOWN_SOURCE.to_string()
                    } else {
                        name
                    };
                }
                return cycles;
            }
            last_error = cycles;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(kernel = %workload.name, device = %workload.device, code = last_error, "no shave provider");

        if let Some(s) = source {
            *s = UNKNOWN_SOURCE.to_string();
        }
        last_error
    }

    fn get_max_num_params(&self) -> usize {
        self.active().map(|p| p.get_max_num_params()).max().unwrap_or(0)
    }

    fn get_shave_supported_ops(&self, device: VpuDevice) -> BTreeSet<String> {
        self.active()
            .flat_map(|p| p.get_shave_supported_ops(device))
            .collect()
    }

    fn get_shave_instance(&self, name: &str, device: VpuDevice) -> Option<Arc<dyn ShaveOpExecutor>> {
        self.active().find_map(|p| p.get_shave_instance(name, device))
    }
}
