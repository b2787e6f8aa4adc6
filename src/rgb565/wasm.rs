use core::arch::wasm32::{
    i8x16, i8x16_swizzle, u16x8_add, u16x8_min, u16x8_shl, u16x8_shr, u16x8_splat, v128, v128_or,
};

use archmage::prelude::*;
use safe_unaligned_simd::wasm32::{v128_load, v128_store};

use super::scalar::rgb565_row;

// ===========================================================================
// WASM SIMD128 — swizzle masks
// ===========================================================================

// 8 pixels = 24 bytes, loaded as bytes 0..16 (lo) and 8..24 (hi). Each
// channel is the OR of a swizzle from lo (pixels 0-5) and from hi
// (pixels 5-7). -128 is out of range and yields zero.
#[derive(Clone, Copy)]
struct Rgb565ConstsWasm {
    r_lo: v128,
    r_hi: v128,
    g_lo: v128,
    g_hi: v128,
    b_lo: v128,
    b_hi: v128,
}

#[rite]
fn consts_wasm128(_token: Wasm128Token) -> Rgb565ConstsWasm {
    const X: i8 = -128;
    Rgb565ConstsWasm {
        r_lo: i8x16(0, X, 3, X, 6, X, 9, X, 12, X, 15, X, X, X, X, X),
        r_hi: i8x16(X, X, X, X, X, X, X, X, X, X, X, X, 10, X, 13, X),
        g_lo: i8x16(1, X, 4, X, 7, X, 10, X, 13, X, X, X, X, X, X, X),
        g_hi: i8x16(X, X, X, X, X, X, X, X, X, X, 8, X, 11, X, 14, X),
        b_lo: i8x16(2, X, 5, X, 8, X, 11, X, 14, X, X, X, X, X, X, X),
        b_hi: i8x16(X, X, X, X, X, X, X, X, X, X, 9, X, 12, X, 15, X),
    }
}

#[rite]
fn pack8_wasm128(_token: Wasm128Token, k: &Rgb565ConstsWasm, rgb: &[u8; 24]) -> v128 {
    let lo_bytes: &[u8; 16] = rgb[..16].try_into().unwrap();
    let hi_bytes: &[u8; 16] = rgb[8..].try_into().unwrap();
    let lo = v128_load(lo_bytes);
    let hi = v128_load(hi_bytes);
    let r = v128_or(i8x16_swizzle(lo, k.r_lo), i8x16_swizzle(hi, k.r_hi));
    let g = v128_or(i8x16_swizzle(lo, k.g_lo), i8x16_swizzle(hi, k.g_hi));
    let b = v128_or(i8x16_swizzle(lo, k.b_lo), i8x16_swizzle(hi, k.b_hi));

    let r5 = u16x8_min(u16x8_shr(u16x8_add(r, u16x8_splat(4)), 3), u16x8_splat(31));
    let g6 = u16x8_min(u16x8_shr(u16x8_add(g, u16x8_splat(2)), 2), u16x8_splat(63));
    let b5 = u16x8_min(u16x8_shr(u16x8_add(b, u16x8_splat(4)), 3), u16x8_splat(31));

    v128_or(v128_or(u16x8_shl(r5, 11), u16x8_shl(g6, 5)), b5)
}

// ===========================================================================
// WASM SIMD128 — rite row implementations
// ===========================================================================

#[rite]
pub(super) fn rgb565_x8_row_wasm128(token: Wasm128Token, src: &[u8], dst: &mut [u16]) {
    let k = consts_wasm128(token);
    let (slen, dlen) = (src.len(), dst.len());
    let (mut is, mut id) = (0, 0);
    while is + 24 <= slen && id + 8 <= dlen {
        let s: &[u8; 24] = src[is..is + 24].try_into().unwrap();
        let d: &mut [u16; 8] = (&mut dst[id..id + 8]).try_into().unwrap();
        v128_store(d, pack8_wasm128(token, &k, s));
        is += 24;
        id += 8;
    }
    rgb565_row(&src[is..], &mut dst[id..]);
}

#[rite]
pub(super) fn rgb565_x16_row_wasm128(token: Wasm128Token, src: &[u8], dst: &mut [u16]) {
    let k = consts_wasm128(token);
    let (slen, dlen) = (src.len(), dst.len());
    let (mut is, mut id) = (0, 0);
    while is + 48 <= slen && id + 16 <= dlen {
        let s0: &[u8; 24] = src[is..is + 24].try_into().unwrap();
        let s1: &[u8; 24] = src[is + 24..is + 48].try_into().unwrap();
        let lo = pack8_wasm128(token, &k, s0);
        let hi = pack8_wasm128(token, &k, s1);
        let d0: &mut [u16; 8] = (&mut dst[id..id + 8]).try_into().unwrap();
        v128_store(d0, lo);
        let d1: &mut [u16; 8] = (&mut dst[id + 8..id + 16]).try_into().unwrap();
        v128_store(d1, hi);
        is += 48;
        id += 16;
    }
    rgb565_x8_row_wasm128(token, &src[is..], &mut dst[id..]);
}

// ===========================================================================
// WASM arcane wrappers
// ===========================================================================

#[arcane]
pub(super) fn rgb565_x8_impl_wasm128(t: Wasm128Token, s: &[u8], d: &mut [u16]) {
    rgb565_x8_row_wasm128(t, s, d);
}
#[arcane]
pub(super) fn rgb565_x16_impl_wasm128(t: Wasm128Token, s: &[u8], d: &mut [u16]) {
    rgb565_x16_row_wasm128(t, s, d);
}

#[arcane]
pub(super) fn rgb565_x16_strided_wasm128(
    t: Wasm128Token,
    src: &[u8],
    dst: &mut [u16],
    w: usize,
    h: usize,
    ss: usize,
    ds: usize,
) {
    for y in 0..h {
        rgb565_x16_row_wasm128(t, &src[y * ss..][..w * 3], &mut dst[y * ds..][..w]);
    }
}
