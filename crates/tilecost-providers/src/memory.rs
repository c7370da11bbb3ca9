//! On-chip memory fit check.

use tilecost_core::cycles::ERROR_INPUT_TOO_BIG;
use tilecost_core::device::DeviceProfile;
use tilecost_core::{DpuLayer, Error, Result};

/// Fail with `ERROR_INPUT_TOO_BIG` when the tile's input, output and weights
/// do not fit the device CMX together.
pub fn check_fits_cmx(tile: &DpuLayer) -> Result<()> {
    let headroom = cmx_headroom(tile);
    if headroom < 0 {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            need = tile.footprint(),
            over_by = -headroom,
            halo_rows = tile.halo.input.vertical(),
            op = %tile.op,
            "tile does not fit CMX"
        );
        return Err(Error::Cycles(ERROR_INPUT_TOO_BIG));
    }
    Ok(())
}

/// Bytes left in CMX after placing the tile (negative when it does not fit).
pub fn cmx_headroom(tile: &DpuLayer) -> i64 {
    let cmx = DeviceProfile::of(tile.device).cmx_bytes as i64;
    cmx - tile.footprint() as i64
}
