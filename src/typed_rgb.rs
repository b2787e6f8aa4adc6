//! Typed wrappers over the byte API using [`rgb`] crate pixels via bytemuck.
//!
//! `Rgb<u8>` slices are reinterpreted as bytes without copying, so every
//! function here produces exactly the bytes of its byte-slice counterpart.
//!
//! ```rust
//! use rgb::Rgb;
//! use thumb565::typed_rgb;
//!
//! let src = vec![Rgb::new(200u8, 100, 50); 4 * 4];
//! let mut small = vec![Rgb::default(); 2 * 2];
//! typed_rgb::downscale_rgb(&src, 4, 4, &mut small, 2, 2).unwrap();
//!
//! let mut packed = vec![0u16; 2 * 2];
//! typed_rgb::rgb_to_rgb565(&small, &mut packed).unwrap();
//! ```

use rgb::Rgb;

use crate::{Rgb565Strategy, ThumbError};

/// Area-average downscale of `Rgb<u8>` pixels.
///
/// See [`crate::downscale_area_average`]; lengths here are in pixels.
pub fn downscale_rgb(
    src: &[Rgb<u8>],
    src_width: usize,
    src_height: usize,
    dst: &mut [Rgb<u8>],
    dst_width: usize,
    dst_height: usize,
) -> Result<(), ThumbError> {
    let src_bytes: &[u8] = bytemuck::cast_slice(src);
    let dst_bytes: &mut [u8] = bytemuck::cast_slice_mut(dst);
    crate::downscale_area_average(src_bytes, src_width, src_height, dst_bytes, dst_width, dst_height)
}

/// Pack `Rgb<u8>` pixels into RGB565 words. `dst.len()` must equal `src.len()`.
pub fn rgb_to_rgb565(src: &[Rgb<u8>], dst: &mut [u16]) -> Result<(), ThumbError> {
    rgb_to_rgb565_with(Rgb565Strategy::default(), src, dst)
}

/// [`rgb_to_rgb565`] with an explicit strategy.
pub fn rgb_to_rgb565_with(
    strategy: Rgb565Strategy,
    src: &[Rgb<u8>],
    dst: &mut [u16],
) -> Result<(), ThumbError> {
    let src_bytes: &[u8] = bytemuck::cast_slice(src);
    crate::rgb888_to_rgb565_with(strategy, src_bytes, dst)
}

/// Per-pixel [`crate::pack_rgb565`] for a typed pixel.
#[inline]
pub const fn pack_rgb(px: Rgb<u8>) -> u16 {
    crate::pack_rgb565(px.r, px.g, px.b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{vec, vec::Vec};

    #[test]
    fn test_downscale_block_average() {
        // 2×2 → 1×1
        let src = vec![
            Rgb::new(10u8, 20, 30),
            Rgb::new(20, 30, 40),
            Rgb::new(30, 40, 50),
            Rgb::new(40, 50, 60),
        ];
        let mut dst = vec![Rgb::default(); 1];
        downscale_rgb(&src, 2, 2, &mut dst, 1, 1).unwrap();
        assert_eq!(dst[0], Rgb::new(25, 35, 45));
    }

    #[test]
    fn test_rgb565_primaries() {
        let src = vec![
            Rgb::new(255u8, 0, 0),
            Rgb::new(0, 255, 0),
            Rgb::new(0, 0, 255),
            Rgb::new(255, 255, 255),
        ];
        let mut dst = vec![0u16; 4];
        rgb_to_rgb565(&src, &mut dst).unwrap();
        assert_eq!(dst, [0xF800, 0x07E0, 0x001F, 0xFFFF]);
        assert_eq!(pack_rgb(src[3]), 0xFFFF);
    }

    #[test]
    fn test_strategies_agree() {
        let src: Vec<Rgb<u8>> = (0..37u8)
            .map(|i| Rgb::new(i.wrapping_mul(7), i.wrapping_mul(11), i.wrapping_mul(13)))
            .collect();
        let mut scalar = vec![0u16; src.len()];
        rgb_to_rgb565_with(Rgb565Strategy::Scalar, &src, &mut scalar).unwrap();
        for strategy in [Rgb565Strategy::Lanes8, Rgb565Strategy::Lanes16] {
            let mut dst = vec![0u16; src.len()];
            rgb_to_rgb565_with(strategy, &src, &mut dst).unwrap();
            assert_eq!(dst, scalar, "{strategy:?}");
        }
    }

    #[test]
    fn test_size_mismatch_returns_error() {
        let src = vec![Rgb::new(1u8, 2, 3); 3];
        let mut dst = vec![0u16; 2]; // wrong size
        assert_eq!(
            rgb_to_rgb565(&src, &mut dst),
            Err(ThumbError::InvalidBufferSize)
        );
        let square = vec![Rgb::new(1u8, 2, 3); 4];
        let mut small = vec![Rgb::default(); 2];
        assert_eq!(
            downscale_rgb(&square, 2, 2, &mut small, 1, 1),
            Err(ThumbError::InvalidBufferSize)
        );
    }
}
