//! Fixed-size thumbnail pipeline: downscale, then pack to RGB565.
//!
//! The default geometry is the 200×200 cover-art thumbnail. All buffers are
//! owned by the caller; the pipeline never allocates.
//!
//! ```rust
//! use thumb565::thumbnail::{self, ThumbnailSize};
//!
//! let cover = vec![0x80u8; 600 * 600 * 3];
//! let mut scratch = vec![0u8; thumbnail::RGB888_BUFFER_SIZE];
//! let mut out = vec![0u16; thumbnail::RGB565_PIXELS];
//! thumbnail::make_thumbnail(&cover, 600, 600, ThumbnailSize::DEFAULT, &mut scratch, &mut out)
//!     .unwrap();
//! assert!(out.iter().all(|&v| v == thumb565::pack_rgb565(0x80, 0x80, 0x80)));
//! ```

use crate::{ThumbError, downscale_area_average, rgb888_to_rgb565};

/// Thumbnail width in pixels.
pub const TARGET_WIDTH: usize = 200;
/// Thumbnail height in pixels.
pub const TARGET_HEIGHT: usize = 200;
/// Pixels in a default thumbnail.
pub const RGB565_PIXELS: usize = TARGET_WIDTH * TARGET_HEIGHT;
/// Bytes in a default RGB888 thumbnail.
pub const RGB888_BUFFER_SIZE: usize = RGB565_PIXELS * 3;
/// Bytes in a default RGB565 thumbnail as sent to the display.
pub const RGB565_BUFFER_SIZE: usize = RGB565_PIXELS * 2;

/// Output geometry of [`make_thumbnail`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThumbnailSize {
    pub width: usize,
    pub height: usize,
}

impl ThumbnailSize {
    /// 200×200.
    pub const DEFAULT: Self = Self {
        width: TARGET_WIDTH,
        height: TARGET_HEIGHT,
    };

    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    #[inline]
    pub const fn pixels(&self) -> usize {
        self.width * self.height
    }

    /// Length in bytes of the RGB888 scratch buffer.
    #[inline]
    pub const fn rgb888_len(&self) -> usize {
        self.pixels() * 3
    }

    /// Length in `u16` words of the RGB565 output buffer.
    #[inline]
    pub const fn rgb565_len(&self) -> usize {
        self.pixels()
    }
}

impl Default for ThumbnailSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Build an RGB565 thumbnail from a decoded RGB888 image.
///
/// The source is area-averaged into `scratch_rgb888` (exactly
/// `size.rgb888_len()` bytes), which is then packed into `out_rgb565`
/// (exactly `size.rgb565_len()` words). A source already at the target size
/// is copied into the scratch buffer unchanged. A source smaller than the
/// target on either axis is rejected with [`ThumbError::InvalidDimensions`].
pub fn make_thumbnail(
    src: &[u8],
    src_width: usize,
    src_height: usize,
    size: ThumbnailSize,
    scratch_rgb888: &mut [u8],
    out_rgb565: &mut [u16],
) -> Result<(), ThumbError> {
    if src_width == size.width && src_height == size.height {
        if size.pixels() == 0 {
            return Err(ThumbError::InvalidDimensions);
        }
        if src.len() != size.rgb888_len() || scratch_rgb888.len() != size.rgb888_len() {
            log::debug!(
                "thumbnail {}x{}: {} source / {} scratch bytes",
                size.width,
                size.height,
                src.len(),
                scratch_rgb888.len()
            );
            return Err(ThumbError::InvalidBufferSize);
        }
        // Check the output before touching scratch.
        if out_rgb565.len() != size.rgb565_len() {
            return Err(ThumbError::InvalidBufferSize);
        }
        scratch_rgb888.copy_from_slice(src);
    } else {
        if src_width < size.width || src_height < size.height {
            log::debug!(
                "thumbnail: source {src_width}x{src_height} smaller than {}x{}",
                size.width,
                size.height
            );
            return Err(ThumbError::InvalidDimensions);
        }
        // Equal on one axis is still a non-downscale; downscale rejects it.
        if out_rgb565.len() != size.rgb565_len() {
            return Err(ThumbError::InvalidBufferSize);
        }
        downscale_area_average(
            src,
            src_width,
            src_height,
            scratch_rgb888,
            size.width,
            size.height,
        )?;
    }
    rgb888_to_rgb565(scratch_rgb888, out_rgb565)
}
