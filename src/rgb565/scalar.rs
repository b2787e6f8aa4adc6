use archmage::prelude::*;

use super::pack_rgb565;

// ===========================================================================
// Scalar row implementation (also the tail of every SIMD row)
// ===========================================================================

#[inline]
pub(super) fn rgb565_row(src: &[u8], dst: &mut [u16]) {
    for (px, d) in src.chunks_exact(3).zip(dst.iter_mut()) {
        *d = pack_rgb565(px[0], px[1], px[2]);
    }
}

// ===========================================================================
// Scalar wrappers (dispatch targets for incant!)
// ===========================================================================

pub(super) fn rgb565_x8_impl_scalar(_t: ScalarToken, s: &[u8], d: &mut [u16]) {
    rgb565_row(s, d);
}
pub(super) fn rgb565_x16_impl_scalar(_t: ScalarToken, s: &[u8], d: &mut [u16]) {
    rgb565_row(s, d);
}

pub(super) fn rgb565_x16_strided_scalar(
    _t: ScalarToken,
    src: &[u8],
    dst: &mut [u16],
    w: usize,
    h: usize,
    ss: usize,
    ds: usize,
) {
    for y in 0..h {
        rgb565_row(&src[y * ss..][..w * 3], &mut dst[y * ds..][..w]);
    }
}
