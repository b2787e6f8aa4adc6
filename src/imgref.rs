//! Whole-image operations on [`imgref`] views.
//!
//! Views may be strided; padding pixels past each row's width are never read
//! or written. No allocation — caller owns all buffers.
//!
//! ```rust
//! use rgb::Rgb;
//! use ::imgref::{ImgVec, ImgRefMut};
//! use thumb565::imgref;
//!
//! let src = ImgVec::new(vec![Rgb::new(255u8, 0, 128); 8 * 8], 8, 8);
//! let mut scratch_buf = vec![Rgb::default(); 4 * 4];
//! let mut out_buf = vec![0u16; 4 * 4];
//! imgref::thumbnail(
//!     src.as_ref(),
//!     ImgRefMut::new(&mut scratch_buf, 4, 4),
//!     ImgRefMut::new(&mut out_buf, 4, 4),
//! )
//! .unwrap();
//! assert_eq!(out_buf[0], thumb565::pack_rgb565(255, 0, 128));
//! ```

use imgref::{ImgRef, ImgRefMut};
use rgb::Rgb;

use crate::ThumbError;

fn check_dims(sw: usize, sh: usize, dw: usize, dh: usize) -> Result<(), ThumbError> {
    if sw != dw || sh != dh {
        log::debug!("imgref: {sw}x{sh} view paired with {dw}x{dh}");
        Err(ThumbError::InvalidBufferSize)
    } else {
        Ok(())
    }
}

/// Area-average downscale from one view into a smaller one.
///
/// The destination's width and height are the target size.
pub fn downscale(
    src: ImgRef<'_, Rgb<u8>>,
    mut dst: ImgRefMut<'_, Rgb<u8>>,
) -> Result<(), ThumbError> {
    let (dw, dh, ds) = (dst.width(), dst.height(), dst.stride());
    downscale_into(src, dst.buf_mut(), dw, dh, ds)
}

fn downscale_into(
    src: ImgRef<'_, Rgb<u8>>,
    dst: &mut [Rgb<u8>],
    dst_width: usize,
    dst_height: usize,
    dst_stride: usize,
) -> Result<(), ThumbError> {
    let s: &[Rgb<u8>] = src.buf();
    crate::downscale_area_average_strided(
        bytemuck::cast_slice(s),
        src.width(),
        src.height(),
        src.stride() * 3,
        bytemuck::cast_slice_mut(dst),
        dst_width,
        dst_height,
        dst_stride * 3,
    )
}

/// Pack an `Rgb<u8>` view into an RGB565 view of the same size.
pub fn convert_rgb_to_rgb565(
    src: ImgRef<'_, Rgb<u8>>,
    mut dst: ImgRefMut<'_, u16>,
) -> Result<(), ThumbError> {
    check_dims(src.width(), src.height(), dst.width(), dst.height())?;
    let ds = dst.stride();
    let s: &[Rgb<u8>] = src.buf();
    crate::rgb888_to_rgb565_strided(
        bytemuck::cast_slice(s),
        dst.buf_mut(),
        src.width(),
        src.height(),
        src.stride() * 3,
        ds,
    )
}

/// Thumbnail pipeline on views: downscale `src` into `scratch`, then pack
/// `scratch` into `out`.
///
/// `scratch` and `out` must have the same dimensions, which set the target
/// size. A source of exactly that size is copied into `scratch`; a smaller
/// one is [`ThumbError::InvalidDimensions`].
pub fn thumbnail(
    src: ImgRef<'_, Rgb<u8>>,
    mut scratch: ImgRefMut<'_, Rgb<u8>>,
    out: ImgRefMut<'_, u16>,
) -> Result<(), ThumbError> {
    let (tw, th, ts) = (scratch.width(), scratch.height(), scratch.stride());
    check_dims(tw, th, out.width(), out.height())?;
    if src.width() == tw && src.height() == th {
        for (src_row, dst_row) in src.rows().zip(scratch.rows_mut()) {
            dst_row.copy_from_slice(src_row);
        }
    } else if src.width() < tw || src.height() < th {
        log::debug!(
            "thumbnail: source {}x{} smaller than {tw}x{th}",
            src.width(),
            src.height()
        );
        return Err(ThumbError::InvalidDimensions);
    }
    let buf: &mut [Rgb<u8>] = scratch.buf_mut();
    if src.width() != tw || src.height() != th {
        downscale_into(src, buf, tw, th, ts)?;
    }
    convert_rgb_to_rgb565(ImgRef::new_stride(&*buf, tw, th, ts), out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
