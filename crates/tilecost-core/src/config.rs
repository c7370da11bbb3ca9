//! Cost model configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default ceiling on the number of workloads in one intra-tile split.
pub const DEFAULT_MAX_WORKLOADS_PER_INTRA_TILE_SPLIT: u32 = 128;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostModelConfig {
    /// Maximum workloads a single intra-tile split may contain. Raising it
    /// admits awkward channel counts at the price of a larger search.
    pub max_workloads_per_intra_tile_split: u32,

    /// Fixed cycles charged per workload when scheduling on the DPUs of a tile.
    pub runtime_overhead: u32,

    /// Reject tiles whose footprint exceeds CMX before any pricing.
    pub check_memory: bool,

    /// Price intra-tile candidates on the rayon pool (requires the
    /// `parallel` feature of `tilecost-layer`; ignored otherwise).
    pub parallel_candidates: bool,
}

impl Default for CostModelConfig {
    fn default() -> Self {
        Self {
            max_workloads_per_intra_tile_split: DEFAULT_MAX_WORKLOADS_PER_INTRA_TILE_SPLIT,
            runtime_overhead: 0,
            check_memory: true,
            parallel_candidates: false,
        }
    }
}

impl CostModelConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `TILECOST_MAX_WORKLOADS_PER_SPLIT`: intra-tile split ceiling
    /// - `TILECOST_RUNTIME_OVERHEAD`: per-workload overhead in cycles
    /// - `TILECOST_CHECK_MEMORY`: `true`/`false` (or `1`/`0`)
    /// - `TILECOST_PARALLEL_CANDIDATES`: `true`/`false` (or `1`/`0`)
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("TILECOST_MAX_WORKLOADS_PER_SPLIT") {
            if let Ok(v) = s.parse::<u32>() {
                cfg.max_workloads_per_intra_tile_split = v;
            }
        }

        if let Ok(s) = std::env::var("TILECOST_RUNTIME_OVERHEAD") {
            if let Ok(v) = s.parse::<u32>() {
                cfg.runtime_overhead = v;
            }
        }

        if let Ok(s) = std::env::var("TILECOST_CHECK_MEMORY") {
            if let Some(v) = parse_flag(&s) {
                cfg.check_memory = v;
            }
        }

        if let Ok(s) = std::env::var("TILECOST_PARALLEL_CANDIDATES") {
            if let Some(v) = parse_flag(&s) {
                cfg.parallel_candidates = v;
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_workloads_per_intra_tile_split == 0 {
            return Err(Error::Config(
                "max_workloads_per_intra_tile_split must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = CostModelConfig::default();
        assert_eq!(cfg.max_workloads_per_intra_tile_split, 128);
        assert!(cfg.check_memory);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_from_env_overrides() {
        std::env::set_var("TILECOST_MAX_WORKLOADS_PER_SPLIT", "64");
        std::env::set_var("TILECOST_CHECK_MEMORY", "off");
        let cfg = CostModelConfig::from_env();
        std::env::remove_var("TILECOST_MAX_WORKLOADS_PER_SPLIT");
        std::env::remove_var("TILECOST_CHECK_MEMORY");

        assert_eq!(cfg.max_workloads_per_intra_tile_split, 64);
        assert!(!cfg.check_memory);
        assert_eq!(cfg.runtime_overhead, 0);
    }

    #[test]
    fn test_zero_ceiling_rejected() {
        let cfg = CostModelConfig {
            max_workloads_per_intra_tile_split: 0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_partial_yaml_like_json_uses_defaults() {
        let cfg: CostModelConfig =
            serde_json::from_str(r#"{"runtime_overhead": 25}"#).expect("parse config");
        assert_eq!(cfg.runtime_overhead, 25);
        assert_eq!(cfg.max_workloads_per_intra_tile_split, 128);
    }
}
