//! Tracing hooks for cost evaluations.
//!
//! Without the `tracing` feature these compile to nothing.

use tilecost_core::cycles::{is_error_code, to_error_text};
use tilecost_core::CycleCount;

/// Record one evaluation step with its named values.
#[cfg(feature = "tracing")]
pub fn emit_span(event: &str, key_values: &[(&str, String)]) {
    let span = tracing::trace_span!("tilecost", event);
    let _enter = span.enter();
    for (k, v) in key_values {
        tracing::trace!(%k, %v, "value");
    }
}

#[cfg(not(feature = "tracing"))]
pub fn emit_span(_event: &str, _key_values: &[(&str, String)]) {}

/// Cycle value as a log field: the number, or the error name.
pub fn cycles_field(v: CycleCount) -> String {
    if is_error_code(v) {
        to_error_text(v).to_string()
    } else {
        v.to_string()
    }
}
