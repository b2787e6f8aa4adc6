//! # thumb565
//!
//! Shrink a decoded RGB888 bitmap into a small fixed-size thumbnail and pack
//! it as RGB565 for memory-constrained displays.
//!
//! Two stages, both pure functions over caller-owned buffers:
//!
//! 1. [`downscale_area_average`] — exact area-average downscaling. Every
//!    destination pixel is the truncated mean of the source rectangle it
//!    covers.
//! 2. [`rgb888_to_rgb565`] — per-pixel 8-8-8 → 5-6-5 packing with
//!    round-to-nearest bias and clamping. SIMD-accelerated on x86-64 AVX2,
//!    ARM NEON and WASM SIMD128, with automatic fallback to scalar code.
//!    Every tier produces bit-identical output.
//!
//! [`thumbnail::make_thumbnail`] chains the two for the common case.
//!
//! ```rust
//! use thumb565::{downscale_area_average, rgb888_to_rgb565};
//!
//! let src = vec![100u8; 8 * 8 * 3];
//! let mut small = vec![0u8; 4 * 4 * 3];
//! downscale_area_average(&src, 8, 8, &mut small, 4, 4).unwrap();
//!
//! let mut packed = vec![0u16; 4 * 4];
//! rgb888_to_rgb565(&small, &mut packed).unwrap();
//! assert_eq!(packed[0], thumb565::pack_rgb565(100, 100, 100));
//! ```
//!
//! ## Feature flags
//!
//! - **`rgb`** — Type-safe wrappers using [`rgb`] crate pixel types
//!   (`Rgb<u8>`) via bytemuck.
//! - **`imgref`** — Whole-image operations on [`imgref`] views. Implies `rgb`.
//! - **`rayon`** — Row-parallel downscaling on the rayon thread pool.

#![no_std]
#![forbid(unsafe_code)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

mod downscale;
mod rgb565;
pub mod thumbnail;

pub use downscale::*;
pub use rgb565::*;

#[cfg(feature = "rgb")]
pub mod typed_rgb;

#[cfg(feature = "imgref")]
pub mod imgref;

/// Why a kernel refused to run.
///
/// Every variant is a caller contract violation; none are transient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ThumbError {
    /// The destination is not strictly smaller than the source on both axes,
    /// a dimension is zero, or the scale is too large to accumulate in `u32`.
    InvalidDimensions,
    /// A destination pixel mapped to an empty source rectangle.
    DegenerateRegion,
    /// A buffer length (or stride) does not match its declared geometry.
    InvalidBufferSize,
}

impl core::fmt::Display for ThumbError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ThumbError::InvalidDimensions => {
                f.write_str("destination must be strictly smaller than source on both axes")
            }
            ThumbError::DegenerateRegion => f.write_str("source region has zero area"),
            ThumbError::InvalidBufferSize => {
                f.write_str("buffer length does not match image dimensions")
            }
        }
    }
}

impl core::error::Error for ThumbError {}
