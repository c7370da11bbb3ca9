//! Request documents read by the CLI.
//!
//! YAML is a superset of JSON, so one parser serves both file kinds.

use serde::Deserialize;

use tilecost_core::workload::{DpuWorkload, ShaveWorkload};
use tilecost_core::{CostModelConfig, DpuLayer, TilingStrategy};

fn one() -> u32 {
    1
}

fn yes() -> bool {
    true
}

/// Tunable overrides; unset fields keep the environment/default value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    pub max_workloads_per_intra_tile_split: Option<u32>,
    pub runtime_overhead: Option<u32>,
    pub check_memory: Option<bool>,
    pub parallel_candidates: Option<bool>,
}

impl ConfigOverrides {
    pub fn apply(&self, cfg: &mut CostModelConfig) {
        if let Some(v) = self.max_workloads_per_intra_tile_split {
            cfg.max_workloads_per_intra_tile_split = v;
        }
        if let Some(v) = self.runtime_overhead {
            cfg.runtime_overhead = v;
        }
        if let Some(v) = self.check_memory {
            cfg.check_memory = v;
        }
        if let Some(v) = self.parallel_candidates {
            cfg.parallel_candidates = v;
        }
    }
}

/// A DPU layer plus how to run it.
#[derive(Debug, Clone, Deserialize)]
pub struct LayerRequest {
    pub layer: DpuWorkload,
    #[serde(default)]
    pub strategy: Option<TilingStrategy>,
    #[serde(default = "one")]
    pub n_dpu: u32,
    #[serde(default = "one")]
    pub n_tiles: u32,
    #[serde(default)]
    pub input_fetching: bool,
    #[serde(default)]
    pub output_spilling: bool,
    #[serde(default = "yes")]
    pub prefetching: bool,
    #[serde(default)]
    pub config: ConfigOverrides,
}

impl LayerRequest {
    pub fn dpu_layer(&self) -> DpuLayer {
        DpuLayer::new(self.layer.clone())
    }
}

/// A SHAVE kernel plus how many SHAVEs/tiles share it.
#[derive(Debug, Clone, Deserialize)]
pub struct ShaveRequest {
    pub shave: ShaveWorkload,
    #[serde(default = "one")]
    pub n_shv: u32,
    #[serde(default = "one")]
    pub n_tiles: u32,
    #[serde(default)]
    pub input_fetching: bool,
    #[serde(default)]
    pub output_spilling: bool,
}

pub fn parse_layer_request(text: &str) -> Result<LayerRequest, serde_yaml::Error> {
    serde_yaml::from_str(text)
}

pub fn parse_shave_request(text: &str) -> Result<ShaveRequest, serde_yaml::Error> {
    serde_yaml::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilecost_core::types::{Operation, VpuDevice};

    const LAYER_YAML: &str = r#"
layer:
  device: VPU_2_7
  op: CONVOLUTION
  input: { shape: [16, 16, 64, 1], dtype: UINT8 }
  output: { shape: [16, 16, 64, 1], dtype: UINT8 }
  kernels: [3, 3]
  strides: [1, 1]
  padding: { top: 1, bottom: 1, left: 1, right: 1 }
  execution_mode: CUBOID_16x16
strategy: soho
n_tiles: 2
config:
  max_workloads_per_intra_tile_split: 64
"#;

    #[test]
    fn test_parse_layer_yaml() {
        let req = parse_layer_request(LAYER_YAML).expect("parse");
        assert_eq!(req.layer.device, VpuDevice::Vpu2_7);
        assert_eq!(req.layer.op, Operation::Convolution);
        assert_eq!(req.strategy, Some(TilingStrategy::SohOverlapped));
        assert_eq!(req.n_dpu, 1);
        assert_eq!(req.n_tiles, 2);
        assert!(req.prefetching);

        let mut cfg = CostModelConfig::default();
        req.config.apply(&mut cfg);
        assert_eq!(cfg.max_workloads_per_intra_tile_split, 64);
        assert!(cfg.check_memory);
    }

    #[test]
    fn test_parse_json_shave() {
        let json = r#"{
            "shave": {
                "name": "relu",
                "device": "VPU_4_0",
                "inputs": [{"shape": [1, 50, 50, 1], "dtype": "FLOAT16"}],
                "outputs": [{"shape": [1, 50, 50, 1], "dtype": "FLOAT16"}]
            },
            "n_shv": 4
        }"#;
        let req = parse_shave_request(json).expect("parse");
        assert_eq!(req.shave.name, "relu");
        assert_eq!(req.n_shv, 4);
        assert_eq!(req.n_tiles, 1);
    }

    #[test]
    fn test_unknown_override_rejected() {
        let bad = LAYER_YAML.replace("max_workloads_per_intra_tile_split", "max_workloads");
        assert!(parse_layer_request(&bad).is_err());
    }
}
