// ---------------------------------------------------------------------------
// Area-average downscaling for RGB888 (3 bytes/px).
//
// Each destination pixel maps to a half-open source rectangle whose edges are
// truncated from f32 multiples of the scale factor. Regions tile the source
// without gaps but may differ in size by one pixel; that unevenness is part
// of the output contract. Channel sums use u32 and divide with truncation.
// ---------------------------------------------------------------------------

use core::ops::Range;

use crate::ThumbError;

const BPP: usize = 3;

// ===========================================================================
// Scale and region geometry
// ===========================================================================

/// Source-per-destination ratio on each axis, both strictly greater than 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactor {
    pub x: f32,
    pub y: f32,
}

/// Half-open source rectangle `[x_start, x_end) × [y_start, y_end)` feeding
/// one destination pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRegion {
    pub x_start: usize,
    pub x_end: usize,
    pub y_start: usize,
    pub y_end: usize,
}

impl SourceRegion {
    #[inline]
    pub fn width(&self) -> usize {
        self.x_end.saturating_sub(self.x_start)
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.y_end.saturating_sub(self.y_start)
    }

    /// Number of source pixels averaged into the destination pixel.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width() * self.height()
    }
}

impl ScaleFactor {
    /// Derive the scale for a strict downscale from `src` to `dst`.
    ///
    /// Fails with [`ThumbError::InvalidDimensions`] when any dimension is
    /// zero, when `dst` is not strictly smaller on both axes, or when the
    /// largest possible region could overflow a `u32` channel sum.
    pub fn new(
        src_width: usize,
        src_height: usize,
        dst_width: usize,
        dst_height: usize,
    ) -> Result<Self, ThumbError> {
        if src_width == 0 || src_height == 0 || dst_width == 0 || dst_height == 0 {
            return Err(ThumbError::InvalidDimensions);
        }
        if dst_width >= src_width || dst_height >= src_height {
            return Err(ThumbError::InvalidDimensions);
        }
        let x = src_width as f32 / dst_width as f32;
        let y = src_height as f32 / dst_height as f32;
        // Huge, nearly equal sizes can round to exactly 1.0 in f32.
        if !(x > 1.0 && y > 1.0) {
            return Err(ThumbError::InvalidDimensions);
        }
        check_accumulator_bound(src_width, src_height, dst_width, dst_height)?;
        Ok(Self { x, y })
    }

    /// Source rectangle for destination pixel `(x, y)`, end edges clamped to
    /// the source size.
    #[inline]
    pub fn region(&self, x: usize, y: usize, src_width: usize, src_height: usize) -> SourceRegion {
        SourceRegion {
            x_start: (x as f32 * self.x) as usize,
            x_end: (((x + 1) as f32 * self.x) as usize).min(src_width),
            y_start: (y as f32 * self.y) as usize,
            y_end: (((y + 1) as f32 * self.y) as usize).min(src_height),
        }
    }
}

/// Regions are at most `ceil(src / dst) + 1` wide on each axis (the `+ 1`
/// absorbs f32 truncation). Reject geometries whose worst-case sum of 255s
/// would not fit in the u32 accumulator.
fn check_accumulator_bound(sw: usize, sh: usize, dw: usize, dh: usize) -> Result<(), ThumbError> {
    let max_w = (sw.div_ceil(dw) + 1).min(sw) as u64;
    let max_h = (sh.div_ceil(dh) + 1).min(sh) as u64;
    let worst = max_w
        .checked_mul(max_h)
        .and_then(|n| n.checked_mul(u8::MAX as u64))
        .ok_or(ThumbError::InvalidDimensions)?;
    if worst > u32::MAX as u64 {
        return Err(ThumbError::InvalidDimensions);
    }
    Ok(())
}

// ===========================================================================
// Validation helpers
// ===========================================================================

#[inline]
fn check_contiguous(len: usize, width: usize, height: usize) -> Result<(), ThumbError> {
    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(BPP))
        .ok_or(ThumbError::InvalidBufferSize)?;
    if len != expected {
        return Err(ThumbError::InvalidBufferSize);
    }
    Ok(())
}

#[inline]
fn check_strided(len: usize, width: usize, height: usize, stride: usize) -> Result<(), ThumbError> {
    let row_bytes = width.checked_mul(BPP).ok_or(ThumbError::InvalidBufferSize)?;
    if row_bytes > stride {
        return Err(ThumbError::InvalidBufferSize);
    }
    let total = (height.saturating_sub(1))
        .checked_mul(stride)
        .ok_or(ThumbError::InvalidBufferSize)?
        .checked_add(row_bytes)
        .ok_or(ThumbError::InvalidBufferSize)?;
    if len < total {
        return Err(ThumbError::InvalidBufferSize);
    }
    Ok(())
}

// ===========================================================================
// Kernel
// ===========================================================================

/// Source image geometry shared by every row of one call.
#[derive(Clone, Copy)]
struct Source<'a> {
    buf: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
}

/// Average one destination pixel. Returns `DegenerateRegion` for an empty
/// rectangle instead of dividing by zero.
#[inline]
fn average_region(src: Source<'_>, region: SourceRegion) -> Result<[u8; 3], ThumbError> {
    let count = region.pixel_count() as u32;
    if count == 0 {
        return Err(ThumbError::DegenerateRegion);
    }
    let mut sum = [0u32; 3];
    for sy in region.y_start..region.y_end {
        let row = &src.buf[sy * src.stride..][region.x_start * BPP..region.x_end * BPP];
        for px in row.chunks_exact(BPP) {
            sum[0] += px[0] as u32;
            sum[1] += px[1] as u32;
            sum[2] += px[2] as u32;
        }
    }
    Ok([
        (sum[0] / count) as u8,
        (sum[1] / count) as u8,
        (sum[2] / count) as u8,
    ])
}

/// Fill destination rows `rows` into `dst`, whose first row is `rows.start`.
fn downscale_rows(
    src: Source<'_>,
    scale: ScaleFactor,
    dst: &mut [u8],
    dst_width: usize,
    dst_stride: usize,
    rows: Range<usize>,
) -> Result<(), ThumbError> {
    for (i, y) in rows.enumerate() {
        let out_row = &mut dst[i * dst_stride..][..dst_width * BPP];
        for (x, out) in out_row.chunks_exact_mut(BPP).enumerate() {
            let region = scale.region(x, y, src.width, src.height);
            out.copy_from_slice(&average_region(src, region)?);
        }
    }
    Ok(())
}

fn log_rejected(err: &ThumbError, sw: usize, sh: usize, dw: usize, dh: usize) {
    log::debug!("downscale {sw}x{sh} -> {dw}x{dh} rejected: {err}");
}

// ===========================================================================
// Public API
// ===========================================================================

/// Downscale a contiguous RGB888 image into a smaller contiguous RGB888 image.
///
/// Each output channel is the truncated mean of its source rectangle
/// (a mean of 2.5 stores 2). `src` must hold exactly `src_width × src_height × 3`
/// bytes and `dst` exactly `dst_width × dst_height × 3`. The destination must
/// be strictly smaller than the source on both axes.
///
/// On error the destination contents are unspecified.
pub fn downscale_area_average(
    src: &[u8],
    src_width: usize,
    src_height: usize,
    dst: &mut [u8],
    dst_width: usize,
    dst_height: usize,
) -> Result<(), ThumbError> {
    let scale = ScaleFactor::new(src_width, src_height, dst_width, dst_height)
        .and_then(|scale| {
            check_contiguous(src.len(), src_width, src_height)?;
            check_contiguous(dst.len(), dst_width, dst_height)?;
            Ok(scale)
        })
        .inspect_err(|e| log_rejected(e, src_width, src_height, dst_width, dst_height))?;
    let source = Source {
        buf: src,
        width: src_width,
        height: src_height,
        stride: src_width * BPP,
    };
    downscale_rows(source, scale, dst, dst_width, dst_width * BPP, 0..dst_height)
}

/// Downscale between strided RGB888 buffers.
///
/// `src_stride` / `dst_stride` are the distances in bytes between the start
/// of consecutive rows and must be ≥ `width × 3`. Padding bytes between rows
/// are never read or written.
#[allow(clippy::too_many_arguments)]
pub fn downscale_area_average_strided(
    src: &[u8],
    src_width: usize,
    src_height: usize,
    src_stride: usize,
    dst: &mut [u8],
    dst_width: usize,
    dst_height: usize,
    dst_stride: usize,
) -> Result<(), ThumbError> {
    let scale = ScaleFactor::new(src_width, src_height, dst_width, dst_height)
        .and_then(|scale| {
            check_strided(src.len(), src_width, src_height, src_stride)?;
            check_strided(dst.len(), dst_width, dst_height, dst_stride)?;
            Ok(scale)
        })
        .inspect_err(|e| log_rejected(e, src_width, src_height, dst_width, dst_height))?;
    let source = Source {
        buf: src,
        width: src_width,
        height: src_height,
        stride: src_stride,
    };
    downscale_rows(source, scale, dst, dst_width, dst_stride, 0..dst_height)
}

/// Compute a horizontal band of the destination image.
///
/// `dst_rows` holds whole contiguous destination rows starting at
/// `first_row`; its length must be a non-zero multiple of `dst_width × 3` and
/// the band must end within `dst_height`. Bands are independent, so callers
/// can hand disjoint bands of one destination to different threads. The
/// result is byte-identical to the matching rows of
/// [`downscale_area_average`].
pub fn downscale_area_average_rows(
    src: &[u8],
    src_width: usize,
    src_height: usize,
    dst_rows: &mut [u8],
    dst_width: usize,
    dst_height: usize,
    first_row: usize,
) -> Result<(), ThumbError> {
    let scale = ScaleFactor::new(src_width, src_height, dst_width, dst_height)
        .and_then(|scale| {
            check_contiguous(src.len(), src_width, src_height)?;
            let row_bytes = dst_width * BPP;
            if dst_rows.is_empty() || !dst_rows.len().is_multiple_of(row_bytes) {
                return Err(ThumbError::InvalidBufferSize);
            }
            let last = first_row
                .checked_add(dst_rows.len() / row_bytes)
                .ok_or(ThumbError::InvalidBufferSize)?;
            if last > dst_height {
                return Err(ThumbError::InvalidBufferSize);
            }
            Ok(scale)
        })
        .inspect_err(|e| log_rejected(e, src_width, src_height, dst_width, dst_height))?;
    let n_rows = dst_rows.len() / (dst_width * BPP);
    let source = Source {
        buf: src,
        width: src_width,
        height: src_height,
        stride: src_width * BPP,
    };
    downscale_rows(
        source,
        scale,
        dst_rows,
        dst_width,
        dst_width * BPP,
        first_row..first_row + n_rows,
    )
}

/// Row-parallel [`downscale_area_average`] on the rayon pool.
///
/// Output is byte-identical to the single-threaded call.
#[cfg(feature = "rayon")]
pub fn downscale_area_average_par(
    src: &[u8],
    src_width: usize,
    src_height: usize,
    dst: &mut [u8],
    dst_width: usize,
    dst_height: usize,
) -> Result<(), ThumbError> {
    use rayon::prelude::*;

    let scale = ScaleFactor::new(src_width, src_height, dst_width, dst_height)
        .and_then(|scale| {
            check_contiguous(src.len(), src_width, src_height)?;
            check_contiguous(dst.len(), dst_width, dst_height)?;
            Ok(scale)
        })
        .inspect_err(|e| log_rejected(e, src_width, src_height, dst_width, dst_height))?;
    let source = Source {
        buf: src,
        width: src_width,
        height: src_height,
        stride: src_width * BPP,
    };
    let row_bytes = dst_width * BPP;
    dst.par_chunks_mut(row_bytes)
        .enumerate()
        .try_for_each(|(y, row)| downscale_rows(source, scale, row, dst_width, row_bytes, y..y + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn gradient(w: usize, h: usize) -> Vec<u8> {
        (0..w * h * BPP).map(|i| (i * 7 % 251) as u8).collect()
    }

    #[test]
    fn regions_five_to_three() {
        let scale = ScaleFactor::new(5, 5, 3, 3).unwrap();
        let r00 = scale.region(0, 0, 5, 5);
        assert_eq!((r00.x_start, r00.x_end, r00.y_start, r00.y_end), (0, 1, 0, 1));
        assert_eq!(r00.pixel_count(), 1);
        let r10 = scale.region(1, 0, 5, 5);
        assert_eq!((r10.x_start, r10.x_end), (1, 3));
        assert_eq!(r10.pixel_count(), 2);
        let r22 = scale.region(2, 2, 5, 5);
        assert_eq!((r22.x_start, r22.x_end, r22.y_start, r22.y_end), (3, 5, 3, 5));
    }

    #[test]
    fn regions_tile_without_gaps() {
        for &(sw, dw) in &[(5, 3), (7, 2), (640, 200), (201, 200), (1000, 3)] {
            let scale = ScaleFactor::new(sw, sw, dw, dw).unwrap();
            let mut next = 0;
            for x in 0..dw {
                let r = scale.region(x, 0, sw, sw);
                assert_eq!(r.x_start, next, "gap at x={x} {sw}->{dw}");
                assert!(r.width() >= 1, "empty column x={x} {sw}->{dw}");
                next = r.x_end;
            }
            assert_eq!(next, sw, "last region must reach the edge {sw}->{dw}");
        }
    }

    #[test]
    fn scale_rejects_non_downscale() {
        assert_eq!(ScaleFactor::new(4, 4, 4, 2), Err(ThumbError::InvalidDimensions));
        assert_eq!(ScaleFactor::new(4, 4, 2, 4), Err(ThumbError::InvalidDimensions));
        assert_eq!(ScaleFactor::new(4, 4, 8, 2), Err(ThumbError::InvalidDimensions));
        assert_eq!(ScaleFactor::new(4, 4, 0, 2), Err(ThumbError::InvalidDimensions));
        assert_eq!(ScaleFactor::new(0, 4, 1, 2), Err(ThumbError::InvalidDimensions));
        assert!(ScaleFactor::new(4, 4, 2, 2).is_ok());
    }

    #[test]
    fn scale_rejects_accumulator_overflow() {
        // One 5000×5000 region: 25M × 255 does not fit in u32.
        assert_eq!(
            ScaleFactor::new(5000, 5000, 1, 1),
            Err(ThumbError::InvalidDimensions)
        );
        // 4096×4096 into 1×1 still fits: 16.7M × 255 < 2^32.
        assert!(ScaleFactor::new(4096, 4096, 1, 1).is_ok());
    }

    #[test]
    fn buffer_size_checked_before_write() {
        let src = gradient(4, 4);
        let mut dst = vec![0xAAu8; 2 * 2 * 3 + 1];
        assert_eq!(
            downscale_area_average(&src, 4, 4, &mut dst, 2, 2),
            Err(ThumbError::InvalidBufferSize)
        );
        assert!(dst.iter().all(|&b| b == 0xAA));
        let mut dst = vec![0u8; 12];
        assert_eq!(
            downscale_area_average(&src[..src.len() - 3], 4, 4, &mut dst, 2, 2),
            Err(ThumbError::InvalidBufferSize)
        );
    }

    #[test]
    fn strided_matches_contiguous() {
        let (sw, sh, dw, dh) = (13, 9, 5, 4);
        let src = gradient(sw, sh);
        let mut expected = vec![0u8; dw * dh * 3];
        downscale_area_average(&src, sw, sh, &mut expected, dw, dh).unwrap();

        let ss = sw * 3 + 5;
        let ds = dw * 3 + 7;
        let mut padded = vec![0xEEu8; ss * sh];
        for y in 0..sh {
            padded[y * ss..][..sw * 3].copy_from_slice(&src[y * sw * 3..][..sw * 3]);
        }
        let mut dst = vec![0xCCu8; ds * dh];
        downscale_area_average_strided(&padded, sw, sh, ss, &mut dst, dw, dh, ds).unwrap();
        for y in 0..dh {
            assert_eq!(&dst[y * ds..][..dw * 3], &expected[y * dw * 3..][..dw * 3], "row {y}");
            assert!(dst[y * ds + dw * 3..(y + 1) * ds].iter().all(|&b| b == 0xCC));
        }
    }

    #[test]
    fn strided_rejects_short_stride() {
        let src = gradient(4, 4);
        let mut dst = vec![0u8; 12];
        assert_eq!(
            downscale_area_average_strided(&src, 4, 4, 11, &mut dst, 2, 2, 6),
            Err(ThumbError::InvalidBufferSize)
        );
    }

    #[test]
    fn bands_match_full_image() {
        let (sw, sh, dw, dh) = (31, 27, 7, 6);
        let src = gradient(sw, sh);
        let mut full = vec![0u8; dw * dh * 3];
        downscale_area_average(&src, sw, sh, &mut full, dw, dh).unwrap();

        let row = dw * 3;
        let mut banded = vec![0u8; dw * dh * 3];
        let (top, bottom) = banded.split_at_mut(row * 4);
        downscale_area_average_rows(&src, sw, sh, top, dw, dh, 0).unwrap();
        downscale_area_average_rows(&src, sw, sh, bottom, dw, dh, 4).unwrap();
        assert_eq!(banded, full);
    }

    #[test]
    fn band_past_last_row_rejected() {
        let src = gradient(8, 8);
        let mut band = vec![0u8; 4 * 3 * 2];
        assert_eq!(
            downscale_area_average_rows(&src, 8, 8, &mut band, 4, 4, 3),
            Err(ThumbError::InvalidBufferSize)
        );
        let mut ragged = vec![0u8; 4 * 3 + 1];
        assert_eq!(
            downscale_area_average_rows(&src, 8, 8, &mut ragged, 4, 4, 0),
            Err(ThumbError::InvalidBufferSize)
        );
    }

    #[test]
    fn empty_region_reported() {
        let src = gradient(4, 4);
        let source = Source {
            buf: &src,
            width: 4,
            height: 4,
            stride: 12,
        };
        let region = SourceRegion {
            x_start: 2,
            x_end: 2,
            y_start: 0,
            y_end: 1,
        };
        assert_eq!(average_region(source, region), Err(ThumbError::DegenerateRegion));
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn parallel_matches_serial() {
        let (sw, sh, dw, dh) = (300, 211, 40, 30);
        let src = gradient(sw, sh);
        let mut serial = vec![0u8; dw * dh * 3];
        let mut parallel = vec![0u8; dw * dh * 3];
        downscale_area_average(&src, sw, sh, &mut serial, dw, dh).unwrap();
        downscale_area_average_par(&src, sw, sh, &mut parallel, dw, dh).unwrap();
        assert_eq!(serial, parallel);
    }
}
