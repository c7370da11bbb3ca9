//! Debug-time verification helpers for split results.
//!
//! These functions are intended for tests and debug builds to catch
//! geometry mistakes early. They panic with a descriptive message.

use tilecost_core::{DpuLayer, TilingStrategy};

use crate::intra::{IntraTileCandidate, SplitAxis};

/// Verify that per-tile outputs add back up to the layer output along the
/// split axis.
pub fn assert_output_covered(layer: &DpuLayer, strategy: TilingStrategy, tiles: &[DpuLayer]) {
    let (axis, name) = if strategy.is_height_split() {
        (1, "rows")
    } else if strategy.is_width_split() {
        (0, "columns")
    } else if strategy.is_channel_split() {
        (2, "channels")
    } else {
        assert_eq!(tiles.len(), 1, "clustering must produce a single tile");
        return;
    };
    let total: u32 = tiles.iter().map(|t| t.output.shape[axis]).sum();
    assert_eq!(
        total, layer.output.shape[axis],
        "{strategy}: tile {name} sum to {total}, layer has {}",
        layer.output.shape[axis]
    );
}

/// Verify that each tile's output halo mirrors its neighbour's input halo.
pub fn assert_halo_symmetric(tiles: &[DpuLayer]) {
    for (i, pair) in tiles.windows(2).enumerate() {
        let (upper, lower) = (&pair[0], &pair[1]);
        assert_eq!(
            upper.halo.output.bottom,
            lower.halo.input.top,
            "tile {i} output bottom halo != tile {} input top halo",
            i + 1
        );
        assert_eq!(
            lower.halo.output.top,
            upper.halo.input.bottom,
            "tile {} output top halo != tile {i} input bottom halo",
            i + 1
        );
    }
}

/// Verify that every tile carries channels in multiples of `align`.
pub fn assert_channels_aligned(tiles: &[DpuLayer], align: u32) {
    for (i, t) in tiles.iter().enumerate() {
        assert!(
            t.output.channels() % align == 0,
            "tile {i} has {} output channels, not a multiple of {align}",
            t.output.channels()
        );
    }
}

/// Verify that a candidate's workloads exactly cover its tile.
pub fn assert_candidate_covers(tile: &DpuLayer, candidate: &IntraTileCandidate) {
    let (got, want) = match candidate.axis {
        SplitAxis::Z => (
            candidate.workloads.iter().map(|w| w.output.channels()).sum::<u32>(),
            tile.output.channels(),
        ),
        SplitAxis::H => (
            candidate.workloads.iter().map(|w| w.output.height()).sum::<u32>(),
            tile.output.height(),
        ),
    };
    assert_eq!(got, want, "{:?} candidate covers {got} of {want}", candidate.axis);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intra::IntraTileSearch;
    use crate::splitter::TileSplit;
    use tilecost_core::prelude::*;

    #[test]
    fn test_helpers_accept_real_splits() {
        let l = DpuLayer::new(DpuWorkload::new(
            VpuDevice::Vpu2_7,
            Operation::Convolution,
            VpuTensor::new(32, 32, 32, 1, DataType::Uint8),
            VpuTensor::new(32, 32, 64, 1, DataType::Uint8),
            [3, 3],
            [1, 1],
            Padding::new(1, 1, 1, 1),
        ));
        for s in [
            TilingStrategy::None,
            TilingStrategy::SohOverlapped,
            TilingStrategy::SohHaloRead,
            TilingStrategy::Sok,
        ] {
            let tiles = l.split_across_tiles(s, 3).expect("split");
            assert_output_covered(&l, s, &tiles);
            assert_halo_symmetric(&tiles);
            assert_channels_aligned(&tiles, 16);
            for t in &tiles {
                for c in IntraTileSearch::default().candidates(t, 1).expect("candidates") {
                    assert_candidate_covers(t, &c);
                }
            }
        }
    }

    #[test]
    #[should_panic(expected = "input top halo")]
    fn test_asymmetric_halo_detected() {
        let l = DpuLayer::new(DpuWorkload::new(
            VpuDevice::Vpu2_7,
            Operation::Eltwise,
            VpuTensor::new(8, 8, 16, 1, DataType::Uint8),
            VpuTensor::new(8, 8, 16, 1, DataType::Uint8),
            [1, 1],
            [1, 1],
            Padding::zero(),
        ));
        let upper = l.derive_with(|wl| wl.halo.output.bottom = 1);
        assert_halo_symmetric(&[upper, l]);
    }
}
