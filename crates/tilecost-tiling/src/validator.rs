//! Layer and strategy legality checks, run before any geometry is computed.

use tilecost_core::cycles::{
    ERROR_INVALID_INPUT_PARAMETERS, ERROR_INVALID_LAYER_CONFIGURATION, ERROR_TILE_OUTPUT,
};
use tilecost_core::device::DeviceProfile;
use tilecost_core::{DpuLayer, Error, Result, TilingStrategy};

fn invalid(_why: &str) -> Error {
    #[cfg(feature = "tracing")]
    tracing::debug!(reason = _why, "layer rejected");
    Error::Cycles(ERROR_INVALID_LAYER_CONFIGURATION)
}

/// Expected output extent of one spatial axis, `None` when the kernel does
/// not fit the padded input.
fn output_extent(input: u32, pad_lo: u32, pad_hi: u32, k: u32, s: u32) -> Option<u32> {
    let padded = input + pad_lo + pad_hi;
    if s == 0 || padded < k {
        return None;
    }
    Some((padded - k) / s + 1)
}

/// Check that a layer describes a well-formed operation.
///
/// Shapes must be positive, padding at most half the kernel, output extents
/// consistent with input/kernel/stride/padding and output channels aligned
/// to the device granularity. Any violation is
/// `ERROR_INVALID_LAYER_CONFIGURATION`.
pub fn validate_layer(layer: &DpuLayer) -> Result<()> {
    let profile = DeviceProfile::of(layer.device);
    let [kx, ky] = layer.kernels;
    let [sx, sy] = layer.strides;
    let pad = layer.padding;

    if !layer.input.is_positive() || !layer.output.is_positive() {
        return Err(invalid("non-positive tensor shape"));
    }
    if kx == 0 || ky == 0 || sx == 0 || sy == 0 {
        return Err(invalid("zero kernel or stride"));
    }
    if layer.output_write_tiles == 0 {
        return Err(invalid("output_write_tiles must be at least 1"));
    }
    if pad.top > ky / 2 || pad.bottom > ky / 2 || pad.left > kx / 2 || pad.right > kx / 2 {
        return Err(invalid("padding larger than half the kernel"));
    }

    let out_w = output_extent(layer.input.width(), pad.left, pad.right, kx, sx);
    let out_h = output_extent(layer.input.height(), pad.top, pad.bottom, ky, sy);
    if out_w != Some(layer.output.width()) || out_h != Some(layer.output.height()) {
        return Err(invalid("output extent inconsistent with kernel/stride/padding"));
    }
    if layer.input.batches() != layer.output.batches() {
        return Err(invalid("batch mismatch"));
    }
    if !layer.op.reduces_input_channels() && layer.input.channels() != layer.output.channels() {
        return Err(invalid("channel-preserving op changes channel count"));
    }
    if layer.output.channels() % profile.channel_alignment != 0 {
        return Err(invalid("output channels not aligned"));
    }
    Ok(())
}

/// Check that `strategy` over `n_tiles` is applicable to `layer`.
///
/// A zero tile count is rejected before anything else with
/// `ERROR_INVALID_INPUT_PARAMETERS`.
pub fn validate_strategy(layer: &DpuLayer, strategy: TilingStrategy, n_tiles: u32) -> Result<()> {
    if n_tiles == 0 {
        return Err(Error::Cycles(ERROR_INVALID_INPUT_PARAMETERS));
    }

    let profile = DeviceProfile::of(layer.device);
    if !profile.supports(strategy, layer.op) {
        let code = if strategy == TilingStrategy::Sow {
            ERROR_TILE_OUTPUT
        } else {
            ERROR_INVALID_LAYER_CONFIGURATION
        };
        return Err(Error::Cycles(code));
    }

    validate_layer(layer)?;

    if strategy.is_height_split() && layer.output.height() < n_tiles {
        return Err(invalid("fewer output rows than tiles"));
    }
    if strategy.is_width_split() && layer.output.width() < n_tiles {
        return Err(invalid("fewer output columns than tiles"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilecost_core::prelude::*;

    fn conv(device: VpuDevice, h_in: u32, h_out: u32) -> DpuLayer {
        DpuLayer::new(DpuWorkload::new(
            device,
            Operation::Convolution,
            VpuTensor::new(16, h_in, 32, 1, DataType::Uint8),
            VpuTensor::new(16, h_out, 64, 1, DataType::Uint8),
            [3, 3],
            [1, 1],
            Padding::new(1, 1, 1, 1),
        ))
    }

    #[test]
    fn test_valid_layer_passes() {
        assert!(validate_layer(&conv(VpuDevice::Vpu2_7, 16, 16)).is_ok());
    }

    #[test]
    fn test_inconsistent_output_rejected() {
        let err = validate_layer(&conv(VpuDevice::Vpu2_7, 16, 15)).expect_err("bad height");
        assert_eq!(err.cycles(), ERROR_INVALID_LAYER_CONFIGURATION);
    }

    #[test]
    fn test_excess_padding_rejected() {
        let l = conv(VpuDevice::Vpu2_7, 16, 16).derive_with(|wl| {
            wl.padding = Padding::new(2, 0, 1, 1);
        });
        assert!(validate_layer(&l).is_err());
    }

    #[test]
    fn test_unaligned_channels_rejected() {
        let l = conv(VpuDevice::Vpu2_7, 16, 16).derive_with(|wl| {
            wl.output = wl.output.with_channels(40);
        });
        assert_eq!(
            validate_layer(&l).expect_err("unaligned").cycles(),
            ERROR_INVALID_LAYER_CONFIGURATION
        );
    }

    #[test]
    fn test_zero_tiles_first() {
        // even an invalid layer reports the tile count first
        let l = conv(VpuDevice::Vpu2_7, 16, 15);
        for s in TilingStrategy::ALL {
            assert_eq!(
                validate_strategy(&l, s, 0).expect_err("zero tiles").cycles(),
                ERROR_INVALID_INPUT_PARAMETERS
            );
        }
    }

    #[test]
    fn test_unsupported_strategies() {
        let l20 = conv(VpuDevice::Vpu2_0, 16, 16);
        assert!(validate_strategy(&l20, TilingStrategy::Sok, 2).is_ok());
        assert_eq!(
            validate_strategy(&l20, TilingStrategy::SokNoBroadcast, 2)
                .expect_err("sok-nb")
                .cycles(),
            ERROR_INVALID_LAYER_CONFIGURATION
        );
        assert_eq!(
            validate_strategy(&l20, TilingStrategy::Sow, 2).expect_err("sow").cycles(),
            ERROR_TILE_OUTPUT
        );
        let l40 = conv(VpuDevice::Vpu4_0, 16, 16);
        assert_eq!(
            validate_strategy(&l40, TilingStrategy::SohHaloRead, 2)
                .expect_err("halo read")
                .cycles(),
            ERROR_INVALID_LAYER_CONFIGURATION
        );
        assert!(validate_strategy(&l40, TilingStrategy::SohOverlapped, 2).is_ok());
    }

    #[test]
    fn test_height_split_needs_rows() {
        let l = conv(VpuDevice::Vpu2_7, 2, 2);
        assert!(validate_strategy(&l, TilingStrategy::SohOverlapped, 2).is_ok());
        assert!(validate_strategy(&l, TilingStrategy::SohOverlapped, 3).is_err());
        // channel split does not care about height
        assert!(validate_strategy(&l, TilingStrategy::Sok, 3).is_ok());
    }
}
