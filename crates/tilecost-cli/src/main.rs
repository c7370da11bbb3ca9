//! tilecost CLI: evaluate DPU layers and SHAVE kernels from request files.

mod request;

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use tilecost_core::cycles::{is_error_code, to_error_text};
use tilecost_core::hash::hash_layer;
use tilecost_core::types::VpuDevice;
use tilecost_core::{CostModelConfig, CycleCount, DpuLayer, TilingStrategy};
use tilecost_layer::{split_fingerprint, LayerCostModel, LayerSplitInfo};
use tilecost_providers::ShaveCostProvider;
use tilecost_tiling::{validate_layer, validate_strategy};

use request::{parse_layer_request, parse_shave_request, ConfigOverrides, LayerRequest};

#[derive(Parser)]
#[command(name = "tilecost")]
#[command(about = "Cycle cost estimation for multi-tile VPU layers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cost a layer under one tiling strategy
    Eval {
        /// Path to the layer request (YAML or JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Tiling strategy (overrides the request)
        #[arg(short, long)]
        strategy: Option<String>,

        /// Intra-tile split ceiling (overrides config)
        #[arg(long)]
        max_workloads: Option<u32>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Try every strategy valid on the device and report the cheapest
    Best {
        /// Path to the layer request (YAML or JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Intra-tile split ceiling (overrides config)
        #[arg(long)]
        max_workloads: Option<u32>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Cost a SHAVE kernel
    Shave {
        /// Path to the SHAVE request (YAML or JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List SHAVE kernels known for a device
    ShaveOps {
        /// Device name, e.g. VPU_2_7
        #[arg(short, long)]
        device: String,
    },

    /// Check layer geometry (and the strategy, when the request names one)
    Validate {
        /// Path to the layer request (YAML or JSON)
        #[arg(short, long)]
        file: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Eval {
            file,
            strategy,
            max_workloads,
            json,
        } => {
            if let Err(e) = eval_layer(&file, strategy.as_deref(), max_workloads, json) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Best {
            file,
            max_workloads,
            json,
        } => {
            if let Err(e) = best_strategy(&file, max_workloads, json) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Shave { file, json } => {
            if let Err(e) = eval_shave(&file, json) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::ShaveOps { device } => {
            if let Err(e) = list_shave_ops(&device) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Validate { file } => {
            if let Err(e) = validate_request(&file) {
                eprintln!("Validation failed: {}", e);
                std::process::exit(1);
            }
            println!("✓ Layer is valid");
        }
    }
}

#[derive(Debug, Serialize)]
struct TileReport {
    cycles: CycleCount,
    workloads: usize,
    execution_mode: String,
    input_shape: [u32; 4],
    output_shape: [u32; 4],
}

#[derive(Debug, Serialize)]
struct LayerReport {
    layer: String,
    strategy: TilingStrategy,
    cycles: CycleCount,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
    tiles: Vec<TileReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fingerprint: Option<String>,
}

impl LayerReport {
    fn new(
        layer: &DpuLayer,
        strategy: TilingStrategy,
        cycles: CycleCount,
        split: &[LayerSplitInfo],
    ) -> Self {
        let tiles = split
            .iter()
            .map(|info| TileReport {
                cycles: info.cycles(),
                workloads: info.workload_count(),
                execution_mode: info
                    .best_intra_tile_split
                    .workloads
                    .first()
                    .map(|wl| format!("{:?}", wl.execution_mode))
                    .unwrap_or_default(),
                input_shape: info.inter_tile_split_layer.input.shape,
                output_shape: info.inter_tile_split_layer.output.shape,
            })
            .collect();
        let fingerprint = if split.is_empty() {
            None
        } else {
            split_fingerprint(split).ok().map(|h| h.to_hex())
        };
        Self {
            layer: hash_layer(layer).map(|h| h.short()).unwrap_or_default(),
            strategy,
            cycles,
            error: is_error_code(cycles).then(|| to_error_text(cycles)),
            tiles,
            fingerprint,
        }
    }

    fn print(&self) {
        println!("Layer {}", self.layer);
        match self.error {
            Some(code) => println!("✗ {}: {} ({})", self.strategy, code, self.cycles),
            None => println!("✓ {}: {} cycles", self.strategy, self.cycles),
        }
        for (i, tile) in self.tiles.iter().enumerate() {
            println!(
                "  tile {}: {} cycles, {} workloads ({}), in {:?} -> out {:?}",
                i, tile.cycles, tile.workloads, tile.execution_mode, tile.input_shape, tile.output_shape
            );
        }
        if let Some(fp) = &self.fingerprint {
            println!("  Split hash: {}", fp);
        }
    }
}

fn build_model(
    overrides: &ConfigOverrides,
    max_workloads: Option<u32>,
) -> Result<LayerCostModel, Box<dyn std::error::Error>> {
    let mut config = CostModelConfig::from_env();
    overrides.apply(&mut config);
    if let Some(n) = max_workloads {
        config.max_workloads_per_intra_tile_split = n;
    }
    Ok(LayerCostModel::with_config(config)?)
}

fn read_layer_request(path: &PathBuf) -> Result<LayerRequest, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    Ok(parse_layer_request(&text)?)
}

fn emit(report: &LayerReport, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        report.print();
    }
    Ok(())
}

fn eval_layer(
    path: &PathBuf,
    strategy: Option<&str>,
    max_workloads: Option<u32>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let req = read_layer_request(path)?;
    let strategy = match strategy {
        Some(s) => s.parse::<TilingStrategy>()?,
        None => req.strategy.unwrap_or(TilingStrategy::None),
    };
    let model = build_model(&req.config, max_workloads)?;

    let layer = req.dpu_layer();
    let mut split = Vec::new();
    let cycles = model.layer(
        &layer,
        strategy,
        req.n_dpu,
        req.n_tiles,
        req.input_fetching,
        req.output_spilling,
        req.prefetching,
        &mut split,
    );
    emit(&LayerReport::new(&layer, strategy, cycles, &split), json)
}

fn best_strategy(
    path: &PathBuf,
    max_workloads: Option<u32>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let req = read_layer_request(path)?;
    let model = build_model(&req.config, max_workloads)?;

    let layer = req.dpu_layer();
    let mut split = Vec::new();
    let (strategy, cycles) = model.layer_best_strategy(
        &layer,
        req.n_dpu,
        req.n_tiles,
        req.input_fetching,
        req.output_spilling,
        req.prefetching,
        &mut split,
    );
    emit(&LayerReport::new(&layer, strategy, cycles, &split), json)
}

#[derive(Debug, Serialize)]
struct ShaveReport {
    name: String,
    device: VpuDevice,
    cycles: CycleCount,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
    source: String,
}

fn eval_shave(path: &PathBuf, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    let req = parse_shave_request(&text)?;
    let model = LayerCostModel::with_config(CostModelConfig::from_env())?;

    let mut source = String::new();
    model.shave_provider().get_cost(&req.shave, Some(&mut source));
    let cycles = model.shave_layer(
        &req.shave,
        req.n_shv,
        req.n_tiles,
        req.input_fetching,
        req.output_spilling,
    );

    let report = ShaveReport {
        name: req.shave.name.clone(),
        device: req.shave.device,
        cycles,
        error: is_error_code(cycles).then(|| to_error_text(cycles)),
        source,
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        match report.error {
            Some(code) => println!("✗ {} on {}: {}", report.name, report.device, code),
            None => println!(
                "✓ {} on {}: {} cycles (via {})",
                report.name, report.device, report.cycles, report.source
            ),
        }
    }
    Ok(())
}

fn parse_device(name: &str) -> Result<VpuDevice, String> {
    let norm = name.trim().replace('.', "_");
    VpuDevice::ALL
        .into_iter()
        .find(|d| d.to_string().eq_ignore_ascii_case(&norm))
        .ok_or_else(|| format!("unknown device '{}'", name))
}

fn list_shave_ops(device: &str) -> Result<(), Box<dyn std::error::Error>> {
    let device = parse_device(device)?;
    let model = LayerCostModel::new();
    let ops = model.shave_provider().get_shave_supported_ops(device);
    println!("SHAVE kernels on {} ({}):", device, ops.len());
    for op in ops {
        println!("  {}", op);
    }
    Ok(())
}

fn validate_request(path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let req = read_layer_request(path)?;
    let layer = req.dpu_layer();
    validate_layer(&layer)?;
    if let Some(strategy) = req.strategy {
        validate_strategy(&layer, strategy, req.n_tiles)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilecost_core::prelude::{DataType, DpuWorkload, Operation, Padding, VpuTensor};

    #[test]
    fn test_parse_device_accepts_dotted_names() {
        assert_eq!(parse_device("VPU_2_7").expect("device"), VpuDevice::Vpu2_7);
        assert_eq!(parse_device("vpu_4.0").expect("device"), VpuDevice::Vpu4_0);
        assert!(parse_device("VPU_3_0").is_err());
    }

    #[test]
    fn test_report_marks_errors() {
        let layer = DpuLayer::new(DpuWorkload::new(
            VpuDevice::Vpu2_7,
            Operation::Convolution,
            VpuTensor::new(8, 8, 16, 1, DataType::Uint8),
            VpuTensor::new(8, 8, 16, 1, DataType::Uint8),
            [1, 1],
            [1, 1],
            Padding::zero(),
        ));
        let report = LayerReport::new(
            &layer,
            TilingStrategy::Sok,
            tilecost_core::cycles::ERROR_INVALID_INPUT_PARAMETERS,
            &[],
        );
        assert_eq!(report.error, Some("ERROR_INVALID_INPUT_PARAMETERS"));
        assert!(report.tiles.is_empty());
        assert!(report.fingerprint.is_none());
        assert_eq!(report.layer.len(), 16);
    }

    #[test]
    fn test_max_workloads_flag_wins_over_request() {
        let overrides = ConfigOverrides {
            max_workloads_per_intra_tile_split: Some(64),
            ..ConfigOverrides::default()
        };
        let model = build_model(&overrides, Some(50)).expect("model");
        assert_eq!(model.config().max_workloads_per_intra_tile_split, 50);
        assert!(build_model(&overrides, Some(0)).is_err());
    }
}
