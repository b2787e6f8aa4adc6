// ---------------------------------------------------------------------------
// RGB888 → RGB565 packing with SIMD dispatch.
//
// Architecture: #[rite] row functions contain the SIMD loops and finish any
// remainder with the scalar row. #[arcane] wrappers are the incant! targets
// for contiguous (single call) and strided (loop over rows, single dispatch).
// ---------------------------------------------------------------------------

use crate::ThumbError;
use archmage::incant;

mod scalar;
use scalar::*;

#[cfg(target_arch = "x86_64")]
mod avx2;
#[cfg(target_arch = "x86_64")]
use avx2::*;

#[cfg(target_arch = "aarch64")]
mod neon;
#[cfg(target_arch = "aarch64")]
use neon::*;

#[cfg(target_arch = "wasm32")]
mod wasm;
#[cfg(target_arch = "wasm32")]
use wasm::*;


// ===========================================================================
// Per-pixel reference
// ===========================================================================

/// Pack one RGB888 pixel into RGB565 (`RRRRRGGGGGGBBBBB`).
///
/// Each channel gets half of its dropped range added before the shift, then
/// clamps: `255 + 4 >> 3` is 32, one past the 5-bit maximum.
#[inline(always)]
pub const fn pack_rgb565(r: u8, g: u8, b: u8) -> u16 {
    let mut r5 = (r as u16 + 4) >> 3;
    let mut g6 = (g as u16 + 2) >> 2;
    let mut b5 = (b as u16 + 4) >> 3;
    if r5 > 31 {
        r5 = 31;
    }
    if g6 > 63 {
        g6 = 63;
    }
    if b5 > 31 {
        b5 = 31;
    }
    (r5 << 11) | (g6 << 5) | b5
}

/// Split an RGB565 word into its raw `[r5, g6, b5]` fields (not rescaled).
#[inline]
pub const fn unpack_rgb565(v: u16) -> [u8; 3] {
    [(v >> 11) as u8, ((v >> 5) & 0x3F) as u8, (v & 0x1F) as u8]
}

// ===========================================================================
// Strategy
// ===========================================================================

/// How [`rgb888_to_rgb565_with`] walks the image.
///
/// All strategies produce identical output. The vector strategies use the
/// best SIMD tier the CPU offers and drop to scalar when none is available;
/// pixels past the last full vector step are finished one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rgb565Strategy {
    /// One pixel at a time. The reference every other strategy must match.
    Scalar,
    /// 8 pixels per vector step.
    Lanes8,
    /// 16 pixels per vector step, then 8, then scalar.
    #[default]
    Lanes16,
}

impl Rgb565Strategy {
    /// Pixels consumed per vector step (1 for scalar).
    pub const fn lanes(self) -> usize {
        match self {
            Rgb565Strategy::Scalar => 1,
            Rgb565Strategy::Lanes8 => 8,
            Rgb565Strategy::Lanes16 => 16,
        }
    }
}

// ===========================================================================
// Validation helpers
// ===========================================================================

#[inline]
fn check_copy(src_len: usize, dst_len: usize) -> Result<(), ThumbError> {
    if src_len == 0 || !src_len.is_multiple_of(3) || dst_len != src_len / 3 {
        log::debug!("rgb565: {src_len} source bytes do not fill {dst_len} words");
        return Err(ThumbError::InvalidBufferSize);
    }
    Ok(())
}

#[inline]
fn check_strided(len: usize, width: usize, height: usize, stride: usize, per_px: usize) -> Result<(), ThumbError> {
    if width == 0 || height == 0 {
        return Err(ThumbError::InvalidBufferSize);
    }
    let row = width.checked_mul(per_px).ok_or(ThumbError::InvalidBufferSize)?;
    if row > stride {
        return Err(ThumbError::InvalidBufferSize);
    }
    let total = (height - 1)
        .checked_mul(stride)
        .ok_or(ThumbError::InvalidBufferSize)?
        .checked_add(row)
        .ok_or(ThumbError::InvalidBufferSize)?;
    if len < total {
        return Err(ThumbError::InvalidBufferSize);
    }
    Ok(())
}

// ===========================================================================
// Public API
// ===========================================================================

/// RGB888 (3 bytes/px) → RGB565 (one native-endian `u16` per pixel).
///
/// `dst` must hold exactly `src.len() / 3` words. Uses
/// [`Rgb565Strategy::Lanes16`] on the best available SIMD tier.
pub fn rgb888_to_rgb565(src: &[u8], dst: &mut [u16]) -> Result<(), ThumbError> {
    rgb888_to_rgb565_with(Rgb565Strategy::Lanes16, src, dst)
}

/// [`rgb888_to_rgb565`] with an explicit execution strategy.
pub fn rgb888_to_rgb565_with(
    strategy: Rgb565Strategy,
    src: &[u8],
    dst: &mut [u16],
) -> Result<(), ThumbError> {
    check_copy(src.len(), dst.len())?;
    log::trace!("rgb565: {} px, {strategy:?}", dst.len());
    match strategy {
        Rgb565Strategy::Scalar => rgb565_row(src, dst),
        Rgb565Strategy::Lanes8 => {
            incant!(rgb565_x8_impl(src, dst), [v3, arm_v2, wasm128, scalar])
        }
        Rgb565Strategy::Lanes16 => {
            incant!(rgb565_x16_impl(src, dst), [v3, arm_v2, wasm128, scalar])
        }
    }
    Ok(())
}

/// RGB888 → RGB565 between strided buffers.
///
/// `src_stride` is in bytes and must be ≥ `width × 3`; `dst_stride` is in
/// `u16` words and must be ≥ `width`. Padding between rows is never read or
/// written.
pub fn rgb888_to_rgb565_strided(
    src: &[u8],
    dst: &mut [u16],
    width: usize,
    height: usize,
    src_stride: usize,
    dst_stride: usize,
) -> Result<(), ThumbError> {
    check_strided(src.len(), width, height, src_stride, 3)?;
    check_strided(dst.len(), width, height, dst_stride, 1)?;
    incant!(
        rgb565_x16_strided(src, dst, width, height, src_stride, dst_stride),
        [v3, arm_v2, wasm128, scalar]
    );
    Ok(())
}
