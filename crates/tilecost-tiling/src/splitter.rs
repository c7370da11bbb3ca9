//! Inter-tile splitting.
//!
//! Every strategy is a pure function from one layer to an ordered list of
//! per-tile layers. The source layer is never mutated; each tile owns its
//! own tensors, padding, halo and SEP descriptor.

use tilecost_core::device::DeviceProfile;
use tilecost_core::halo::HaloWorkload;
use tilecost_core::types::IsiStrategy;
use tilecost_core::{DpuLayer, Result, TilingStrategy};

use crate::partition::{chunks, input_window, AxisWindow};
use crate::validator::validate_strategy;

/// Split a layer into one layer per compute tile.
pub trait TileSplit {
    /// Per-tile layers for `strategy` over `n_tiles` tiles, in tile order.
    ///
    /// Illegal requests fail with a cycle error code
    /// (`tilecost_core::Error::Cycles`) before any geometry is computed.
    fn split_across_tiles(&self, strategy: TilingStrategy, n_tiles: u32) -> Result<Vec<DpuLayer>>;
}

impl TileSplit for DpuLayer {
    fn split_across_tiles(&self, strategy: TilingStrategy, n_tiles: u32) -> Result<Vec<DpuLayer>> {
        validate_strategy(self, strategy, n_tiles)?;

        let tiles = match strategy {
            TilingStrategy::None => vec![self.clone()],
            TilingStrategy::SohOverlapped => split_height_overlapped(self, n_tiles),
            TilingStrategy::SohHaloRead => split_height_halo(self, n_tiles),
            TilingStrategy::SohoKSwitch => split_height_overlapped(self, n_tiles)
                .into_iter()
                .map(|t| t.derive_with(|wl| wl.output_write_tiles = n_tiles))
                .collect(),
            TilingStrategy::Sok => split_channels(self, n_tiles, true),
            TilingStrategy::SokNoBroadcast => split_channels(self, n_tiles, false),
            TilingStrategy::Sow => split_width(self, n_tiles),
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(
            strategy = %strategy,
            requested = n_tiles,
            produced = tiles.len(),
            op = %self.op,
            "split across tiles"
        );

        Ok(tiles)
    }
}

/// Output row ranges and the input windows they read.
fn height_windows(layer: &DpuLayer, n_tiles: u32) -> Vec<(u32, u32, AxisWindow)> {
    let ky = layer.kernels[1];
    let sy = layer.strides[1];
    let h_in = layer.input.height();
    chunks(layer.output.height(), n_tiles, 1)
        .into_iter()
        .map(|(o0, rows)| (o0, rows, input_window(o0, o0 + rows, h_in, ky, sy, layer.padding.top)))
        .collect()
}

fn height_tile(layer: &DpuLayer, o0: u32, rows: u32, w: &AxisWindow) -> DpuLayer {
    let layer_rows = layer.input.height();
    layer.derive_with(|wl| {
        wl.output = wl.output.with_height(rows);
        wl.input = wl.input.with_height(w.len());
        wl.padding.top = w.pad_lo;
        wl.padding.bottom = w.pad_hi;
        wl.offsets[1] += o0;
        wl.sep = wl.sep.rescaled_height(w.len(), layer_rows);
    })
}

fn split_height_overlapped(layer: &DpuLayer, n_tiles: u32) -> Vec<DpuLayer> {
    height_windows(layer, n_tiles)
        .iter()
        .map(|(o0, rows, w)| height_tile(layer, *o0, *rows, w))
        .collect()
}

/// Height split where neighbours read each other's border rows.
///
/// The boundary between tile `i` and `i + 1` sits at
/// `o_split * s - pad_top + k / 2`, pulled into the rows both tiles read.
/// Rows above the boundary belong to tile `i`; the rest of each window is
/// halo borrowed from the neighbour, mirrored as that neighbour's output halo.
fn split_height_halo(layer: &DpuLayer, n_tiles: u32) -> Vec<DpuLayer> {
    let windows = height_windows(layer, n_tiles);
    let ky = i64::from(layer.kernels[1]);
    let sy = i64::from(layer.strides[1]);
    let pt = i64::from(layer.padding.top);

    let boundaries: Vec<u32> = windows
        .windows(2)
        .map(|pair| {
            let (_, _, upper) = pair[0];
            let (o_split, _, lower) = pair[1];
            let lo = i64::from(lower.start.min(upper.end));
            let hi = i64::from(lower.start.max(upper.end));
            let b = i64::from(o_split) * sy - pt + ky / 2;
            b.max(lo).min(hi) as u32
        })
        .collect();

    let mut halos = vec![HaloWorkload::default(); windows.len()];
    for (i, b) in boundaries.iter().copied().enumerate() {
        let upper = windows[i].2;
        let lower = windows[i + 1].2;
        let borrowed_down = upper.end.saturating_sub(b);
        let borrowed_up = b.saturating_sub(lower.start);

        halos[i].input.bottom = borrowed_down;
        halos[i + 1].input.top = borrowed_up;
        halos[i].output.bottom = borrowed_up;
        halos[i + 1].output.top = borrowed_down;
    }

    windows
        .iter()
        .zip(halos)
        .map(|((o0, rows, w), halo)| {
            height_tile(layer, *o0, *rows, w).derive_with(|wl| {
                wl.halo = halo;
                wl.isi_strategy = IsiStrategy::SplitOverH;
            })
        })
        .collect()
}

fn split_channels(layer: &DpuLayer, n_tiles: u32, broadcast: bool) -> Vec<DpuLayer> {
    let align = DeviceProfile::of(layer.device).channel_alignment;
    let parts = chunks(layer.output.channels(), n_tiles, align);
    let produced = parts.len() as u32;

    parts
        .into_iter()
        .map(|(c0, ch)| {
            layer.derive_with(|wl| {
                wl.output = wl.output.with_channels(ch);
                if !wl.op.reduces_input_channels() {
                    wl.input = wl.input.with_channels(ch);
                }
                wl.offsets[2] += c0;
                if broadcast {
                    wl.isi_strategy = IsiStrategy::SplitOverK;
                    wl.output_write_tiles = produced;
                } else {
                    wl.isi_strategy = IsiStrategy::Clustering;
                    wl.output_write_tiles = 1;
                }
            })
        })
        .collect()
}

fn split_width(layer: &DpuLayer, n_tiles: u32) -> Vec<DpuLayer> {
    let kx = layer.kernels[0];
    let sx = layer.strides[0];
    let w_in = layer.input.width();

    chunks(layer.output.width(), n_tiles, 1)
        .into_iter()
        .map(|(o0, cols)| {
            let w = input_window(o0, o0 + cols, w_in, kx, sx, layer.padding.left);
            layer.derive_with(|wl| {
                wl.output = wl.output.with_width(cols);
                wl.input = wl.input.with_width(w.len());
                wl.padding.left = w.pad_lo;
                wl.padding.right = w.pad_hi;
                wl.offsets[0] += o0;
            })
        })
        .collect()
}
