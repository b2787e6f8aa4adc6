use core::arch::aarch64::{
    uint8x16_t, uint8x16x2_t, uint16x8_t, vaddq_u16, vdupq_n_u16, vminq_u16, vorrq_u16,
    vqtbl2q_u8, vreinterpretq_u16_u8, vshlq_n_u16, vshrq_n_u16,
};

use archmage::prelude::*;
use safe_unaligned_simd::aarch64::{vld1q_u8, vst1q_u16};

use super::scalar::rgb565_row;

// ===========================================================================
// Table lookups
// ===========================================================================

// 8 pixels = 24 bytes, loaded as two overlapping registers: bytes 0..16 and
// 8..24. Indices 16..32 address the second register (byte 8 + i - 16).
// 0xFF is out of range and yields the zero high byte of each u16 lane.
const R_TO_U16_TBL: [u8; 16] = [0, 0xFF, 3, 0xFF, 6, 0xFF, 9, 0xFF, 12, 0xFF, 15, 0xFF, 26, 0xFF, 29, 0xFF];
const G_TO_U16_TBL: [u8; 16] = [1, 0xFF, 4, 0xFF, 7, 0xFF, 10, 0xFF, 13, 0xFF, 24, 0xFF, 27, 0xFF, 30, 0xFF];
const B_TO_U16_TBL: [u8; 16] = [2, 0xFF, 5, 0xFF, 8, 0xFF, 11, 0xFF, 14, 0xFF, 25, 0xFF, 28, 0xFF, 31, 0xFF];

#[derive(Clone, Copy)]
struct Rgb565ConstsNeon {
    r: uint8x16_t,
    g: uint8x16_t,
    b: uint8x16_t,
    four: uint16x8_t,
    two: uint16x8_t,
    max5: uint16x8_t,
    max6: uint16x8_t,
}

#[rite]
fn consts_arm_v2(_token: Arm64V2Token) -> Rgb565ConstsNeon {
    Rgb565ConstsNeon {
        r: vld1q_u8(&R_TO_U16_TBL),
        g: vld1q_u8(&G_TO_U16_TBL),
        b: vld1q_u8(&B_TO_U16_TBL),
        four: vdupq_n_u16(4),
        two: vdupq_n_u16(2),
        max5: vdupq_n_u16(31),
        max6: vdupq_n_u16(63),
    }
}

#[rite]
fn pack8_arm_v2(_token: Arm64V2Token, k: &Rgb565ConstsNeon, rgb: &[u8; 24]) -> uint16x8_t {
    let lo: &[u8; 16] = rgb[..16].try_into().unwrap();
    let hi: &[u8; 16] = rgb[8..].try_into().unwrap();
    let table = uint8x16x2_t(vld1q_u8(lo), vld1q_u8(hi));
    let r = vreinterpretq_u16_u8(vqtbl2q_u8(table, k.r));
    let g = vreinterpretq_u16_u8(vqtbl2q_u8(table, k.g));
    let b = vreinterpretq_u16_u8(vqtbl2q_u8(table, k.b));

    let r5 = vminq_u16(vshrq_n_u16::<3>(vaddq_u16(r, k.four)), k.max5);
    let g6 = vminq_u16(vshrq_n_u16::<2>(vaddq_u16(g, k.two)), k.max6);
    let b5 = vminq_u16(vshrq_n_u16::<3>(vaddq_u16(b, k.four)), k.max5);

    vorrq_u16(vorrq_u16(vshlq_n_u16::<11>(r5), vshlq_n_u16::<5>(g6)), b5)
}

// ===========================================================================
// ARM NEON — rite row implementations
// ===========================================================================

#[rite]
pub(super) fn rgb565_x8_row_arm_v2(token: Arm64V2Token, src: &[u8], dst: &mut [u16]) {
    let k = consts_arm_v2(token);
    let (slen, dlen) = (src.len(), dst.len());
    let (mut is, mut id) = (0, 0);
    while is + 24 <= slen && id + 8 <= dlen {
        let s: &[u8; 24] = src[is..is + 24].try_into().unwrap();
        let d: &mut [u16; 8] = (&mut dst[id..id + 8]).try_into().unwrap();
        vst1q_u16(d, pack8_arm_v2(token, &k, s));
        is += 24;
        id += 8;
    }
    rgb565_row(&src[is..], &mut dst[id..]);
}

#[rite]
pub(super) fn rgb565_x16_row_arm_v2(token: Arm64V2Token, src: &[u8], dst: &mut [u16]) {
    let k = consts_arm_v2(token);
    let (slen, dlen) = (src.len(), dst.len());
    let (mut is, mut id) = (0, 0);
    while is + 48 <= slen && id + 16 <= dlen {
        let s0: &[u8; 24] = src[is..is + 24].try_into().unwrap();
        let s1: &[u8; 24] = src[is + 24..is + 48].try_into().unwrap();
        let lo = pack8_arm_v2(token, &k, s0);
        let hi = pack8_arm_v2(token, &k, s1);
        let d0: &mut [u16; 8] = (&mut dst[id..id + 8]).try_into().unwrap();
        vst1q_u16(d0, lo);
        let d1: &mut [u16; 8] = (&mut dst[id + 8..id + 16]).try_into().unwrap();
        vst1q_u16(d1, hi);
        is += 48;
        id += 16;
    }
    rgb565_x8_row_arm_v2(token, &src[is..], &mut dst[id..]);
}

// ===========================================================================
// ARM arcane wrappers
// ===========================================================================

#[arcane]
pub(super) fn rgb565_x8_impl_arm_v2(t: Arm64V2Token, s: &[u8], d: &mut [u16]) {
    rgb565_x8_row_arm_v2(t, s, d);
}
#[arcane]
pub(super) fn rgb565_x16_impl_arm_v2(t: Arm64V2Token, s: &[u8], d: &mut [u16]) {
    rgb565_x16_row_arm_v2(t, s, d);
}

#[arcane]
pub(super) fn rgb565_x16_strided_arm_v2(
    t: Arm64V2Token,
    src: &[u8],
    dst: &mut [u16],
    w: usize,
    h: usize,
    ss: usize,
    ds: usize,
) {
    for y in 0..h {
        rgb565_x16_row_arm_v2(t, &src[y * ss..][..w * 3], &mut dst[y * ds..][..w]);
    }
}
