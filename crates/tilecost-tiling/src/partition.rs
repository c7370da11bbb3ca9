//! Shared 1-D partition arithmetic for the splitter and the intra-tile search.

/// Round `v` up to a multiple of `m` (`m == 0` leaves `v` unchanged).
pub(crate) fn round_up(v: u32, m: u32) -> u32 {
    if m == 0 {
        v
    } else {
        v.div_ceil(m) * m
    }
}

/// Cut `total` into consecutive `(offset, len)` chunks of
/// `round_up(ceil(total / n), granule)`, the last one taking what is left.
///
/// Earlier chunks are never smaller than later ones and no chunk is empty,
/// so fewer than `n` chunks may come back.
pub(crate) fn chunks(total: u32, n: u32, granule: u32) -> Vec<(u32, u32)> {
    if n == 0 || total == 0 {
        return Vec::new();
    }
    let step = round_up(total.div_ceil(n), granule).max(1);
    let mut out = Vec::with_capacity(total.div_ceil(step) as usize);
    let mut offset = 0;
    while offset < total {
        let len = step.min(total - offset);
        out.push((offset, len));
        offset += len;
    }
    out
}

/// Input rows (or columns) read by a range of output rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AxisWindow {
    /// First input element read, in unpadded coordinates.
    pub start: u32,
    /// One past the last input element read.
    pub end: u32,
    /// Padding the window still needs before `start`.
    pub pad_lo: u32,
    /// Padding the window still needs after `end`.
    pub pad_hi: u32,
}

impl AxisWindow {
    pub fn len(&self) -> u32 {
        self.end - self.start
    }
}

/// Window of the input axis that output range `[o0, o1)` reads, given kernel
/// `k`, stride `s` and the layer's leading padding `pad_lo`.
///
/// In padded space the range is `[o0*s - pad_lo, (o1-1)*s + k - pad_lo)`.
/// Whatever falls outside `[0, in_len)` becomes local padding.
pub(crate) fn input_window(o0: u32, o1: u32, in_len: u32, k: u32, s: u32, pad_lo: u32) -> AxisWindow {
    let start = i64::from(o0) * i64::from(s) - i64::from(pad_lo);
    let end = (i64::from(o1) - 1) * i64::from(s) + i64::from(k) - i64::from(pad_lo);
    let in_len = i64::from(in_len);

    let pad_lo = (-start).max(0);
    let pad_hi = (end - in_len).max(0);
    let start = start.clamp(0, in_len);
    let end = end.clamp(start, in_len);

    AxisWindow {
        start: start as u32,
        end: end as u32,
        pad_lo: pad_lo as u32,
        pad_hi: pad_hi as u32,
    }
}
