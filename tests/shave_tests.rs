//! SHAVE providers: formula tables and the priority chain.

use std::sync::Arc;

use tilecost_core::cycles::{ERROR_SHAVE_INVALID_INPUT, ERROR_SHAVE_OPERATOR_MISSING};
use tilecost_core::prelude::*;
use tilecost_providers::shave::UNKNOWN_SOURCE;
use tilecost_providers::{
    default_shave_chain, PriorityShaveCostProvider, ShaveCostProvider, ShaveMathProvider,
    ShaveModelTag, ShaveOpExecutor,
};

fn kernel(name: &str, device: VpuDevice) -> ShaveWorkload {
    let t = VpuTensor::new(1, 64, 64, 1, DataType::Float16);
    ShaveWorkload::new(name, device, t, t)
}

fn chain_of(tags: &[ShaveModelTag]) -> PriorityShaveCostProvider {
    let providers = tags
        .iter()
        .map(|&tag| {
            let p: Arc<dyn ShaveCostProvider> = Arc::new(ShaveMathProvider::new(tag));
            Some(p)
        })
        .collect();
    PriorityShaveCostProvider::new(providers)
}

#[test]
fn test_chain_supports_union_of_providers() {
    let current = ShaveMathProvider::new(ShaveModelTag::Current);
    let legacy = ShaveMathProvider::new(ShaveModelTag::Legacy);
    let chain = chain_of(&[ShaveModelTag::Current, ShaveModelTag::Legacy]);

    for device in [VpuDevice::Vpu2_7, VpuDevice::Vpu4_0] {
        let mut expected = current.get_shave_supported_ops(device);
        expected.extend(legacy.get_shave_supported_ops(device));
        assert_eq!(chain.get_shave_supported_ops(device), expected);
        assert!(expected.contains("relu"));
        assert!(expected.contains("Sigmoid"));
    }
    assert_eq!(
        chain.get_max_num_params(),
        current.get_max_num_params().max(legacy.get_max_num_params())
    );
}

#[test]
fn test_unknown_kernel_reports_unknown_source() {
    let chain = chain_of(&[ShaveModelTag::Current, ShaveModelTag::Legacy]);
    let mut source = String::from("stale");
    let cycles = chain.get_cost(&kernel("C", VpuDevice::Vpu2_7), Some(&mut source));
    assert_eq!(cycles, ERROR_SHAVE_OPERATOR_MISSING);
    assert_eq!(source, UNKNOWN_SOURCE);
}

#[test]
fn test_priority_order_decides_source() {
    let mut source = String::new();
    let chain = default_shave_chain();
    chain.get_cost(&kernel("relu", VpuDevice::Vpu4_0), Some(&mut source));
    assert_eq!(source, ShaveModelTag::Current.source_name());
    chain.get_cost(&kernel("Tanh", VpuDevice::Vpu4_0), Some(&mut source));
    assert_eq!(source, ShaveModelTag::Legacy.source_name());

    // legacy generation only has the capitalized kernels
    let relu_20 = chain.get_cost(&kernel("relu", VpuDevice::Vpu2_0), Some(&mut source));
    assert_eq!(relu_20, ERROR_SHAVE_OPERATOR_MISSING);
    assert!(!is_error_code(chain.get_cost(&kernel("Sigmoid", VpuDevice::Vpu2_0), None)));
}

#[test]
fn test_absent_slots_are_skipped() {
    let legacy: Arc<dyn ShaveCostProvider> = Arc::new(ShaveMathProvider::new(ShaveModelTag::Legacy));
    let chain = PriorityShaveCostProvider::new(vec![None, Some(legacy), None]);
    assert_eq!(chain.len(), 3);
    let wl = kernel("Gelu", VpuDevice::Vpu2_7);
    assert_eq!(
        chain.get_cost(&wl, None),
        ShaveMathProvider::new(ShaveModelTag::Legacy).get_cost(&wl, None)
    );
}

#[test]
fn test_instance_agrees_with_provider() {
    let chain = default_shave_chain();
    let wl = kernel("sigmoid", VpuDevice::Vpu2_7);
    let exec = chain
        .get_shave_instance("sigmoid", VpuDevice::Vpu2_7)
        .expect("sigmoid on 2.7");
    assert_eq!(exec.name(), "sigmoid");
    assert_eq!(exec.device(), VpuDevice::Vpu2_7);
    assert_eq!(exec.dpu_cycles(&wl), chain.get_cost(&wl, None));
    assert!(chain.get_shave_instance("sigmoid", VpuDevice::Vpu2_0).is_none());
}

#[test]
fn test_cost_grows_with_volume() {
    let p = ShaveMathProvider::new(ShaveModelTag::Current);
    let small = p.get_cost(&kernel("exp", VpuDevice::Vpu2_7), None);
    let t = VpuTensor::new(1, 128, 128, 1, DataType::Float16);
    let big = p.get_cost(&ShaveWorkload::new("exp", VpuDevice::Vpu2_7, t, t), None);
    assert!(!is_error_code(small));
    assert!(big > small);

    let mut no_output = kernel("exp", VpuDevice::Vpu2_7);
    no_output.outputs.clear();
    assert_eq!(p.get_cost(&no_output, None), ERROR_SHAVE_INVALID_INPUT);
}
