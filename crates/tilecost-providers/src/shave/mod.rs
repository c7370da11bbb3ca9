//! SHAVE (software kernel) cost providers.

mod math;
mod priority;
pub mod tables;

pub use math::{FormulaExecutor, ShaveMathProvider, ShaveModelTag};
pub use priority::{PriorityShaveCostProvider, UNKNOWN_SOURCE};

use std::sync::Arc;

use crate::traits::ShaveCostProvider;

/// The default chain: current kernel library first, legacy second.
pub fn default_shave_chain() -> PriorityShaveCostProvider {
    let current: Arc<dyn ShaveCostProvider> = Arc::new(ShaveMathProvider::new(ShaveModelTag::Current));
    let legacy: Arc<dyn ShaveCostProvider> = Arc::new(ShaveMathProvider::new(ShaveModelTag::Legacy));
    PriorityShaveCostProvider::new(vec![Some(current), Some(legacy)])
}
