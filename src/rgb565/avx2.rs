use core::arch::x86_64::__m256i;

use archmage::prelude::*;
use safe_unaligned_simd::x86_64::{_mm_storeu_si128, _mm256_loadu_si256, _mm256_storeu_si256};

use super::scalar::rgb565_row;

// ===========================================================================
// SIMD constants
// ===========================================================================

// vpermd: dwords 0-3 to the low lane, 3-6 to the high lane, so each lane
// starts with 4 whole pixels (12 bytes).
const RGB_ALIGN_PERM_AVX: [i8; 32] = [
    0, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0, 3, 0, 0, 0, 4, 0, 0, 0, 5, 0, 0, 0, 6, 0, 0, 0,
];

// Zero-extend one channel of 4 pixels per lane into u32.
const R_TO_U32_SHUF_AVX: [i8; 32] = [
    0, -128, -128, -128, 3, -128, -128, -128, 6, -128, -128, -128, 9, -128, -128, -128, 0, -128,
    -128, -128, 3, -128, -128, -128, 6, -128, -128, -128, 9, -128, -128, -128,
];

const G_TO_U32_SHUF_AVX: [i8; 32] = [
    1, -128, -128, -128, 4, -128, -128, -128, 7, -128, -128, -128, 10, -128, -128, -128, 1, -128,
    -128, -128, 4, -128, -128, -128, 7, -128, -128, -128, 10, -128, -128, -128,
];

const B_TO_U32_SHUF_AVX: [i8; 32] = [
    2, -128, -128, -128, 5, -128, -128, -128, 8, -128, -128, -128, 11, -128, -128, -128, 2, -128,
    -128, -128, 5, -128, -128, -128, 8, -128, -128, -128, 11, -128, -128, -128,
];

// vpermq: after packus the qwords hold [p0-3, x, p4-7, x]; gather 0,2,1,3.
const QWORD_ORDER: i32 = 0b11_01_10_00;

#[derive(Clone, Copy)]
struct Rgb565ConstsV3 {
    perm: __m256i,
    r: __m256i,
    g: __m256i,
    b: __m256i,
    four: __m256i,
    two: __m256i,
    max5: __m256i,
    max6: __m256i,
}

#[rite]
fn consts_v3(_token: X64V3Token) -> Rgb565ConstsV3 {
    Rgb565ConstsV3 {
        perm: _mm256_loadu_si256(&RGB_ALIGN_PERM_AVX),
        r: _mm256_loadu_si256(&R_TO_U32_SHUF_AVX),
        g: _mm256_loadu_si256(&G_TO_U32_SHUF_AVX),
        b: _mm256_loadu_si256(&B_TO_U32_SHUF_AVX),
        four: _mm256_set1_epi32(4),
        two: _mm256_set1_epi32(2),
        max5: _mm256_set1_epi32(31),
        max6: _mm256_set1_epi32(63),
    }
}

/// 8 pixels from the first 24 of 32 bytes → 8 packed words in u32 lanes,
/// pixel order preserved across the two 128-bit lanes.
#[rite]
fn pack8_v3(_token: X64V3Token, k: &Rgb565ConstsV3, rgb: &[u8; 32]) -> __m256i {
    let v = _mm256_loadu_si256(rgb);
    let aligned = _mm256_permutevar8x32_epi32(v, k.perm);
    let r = _mm256_shuffle_epi8(aligned, k.r);
    let g = _mm256_shuffle_epi8(aligned, k.g);
    let b = _mm256_shuffle_epi8(aligned, k.b);

    let r5 = _mm256_min_epu32(_mm256_srli_epi32::<3>(_mm256_add_epi32(r, k.four)), k.max5);
    let g6 = _mm256_min_epu32(_mm256_srli_epi32::<2>(_mm256_add_epi32(g, k.two)), k.max6);
    let b5 = _mm256_min_epu32(_mm256_srli_epi32::<3>(_mm256_add_epi32(b, k.four)), k.max5);

    _mm256_or_si256(
        _mm256_or_si256(_mm256_slli_epi32::<11>(r5), _mm256_slli_epi32::<5>(g6)),
        b5,
    )
}

// ===========================================================================
// x86-64 AVX2 — rite row implementations
// ===========================================================================

// Each step reads 32 bytes but consumes 24, so the last partial group
// always goes to the scalar tail.
#[rite]
pub(super) fn rgb565_x8_row_v3(token: X64V3Token, src: &[u8], dst: &mut [u16]) {
    let k = consts_v3(token);
    let (slen, dlen) = (src.len(), dst.len());
    let (mut is, mut id) = (0, 0);
    while is + 32 <= slen && id + 8 <= dlen {
        let s: &[u8; 32] = src[is..is + 32].try_into().unwrap();
        let packed = pack8_v3(token, &k, s);
        let words = _mm256_permute4x64_epi64::<QWORD_ORDER>(_mm256_packus_epi32(packed, packed));
        let d: &mut [u16; 8] = (&mut dst[id..id + 8]).try_into().unwrap();
        _mm_storeu_si128(d, _mm256_castsi256_si128(words));
        is += 24;
        id += 8;
    }
    rgb565_row(&src[is..], &mut dst[id..]);
}

#[rite]
pub(super) fn rgb565_x16_row_v3(token: X64V3Token, src: &[u8], dst: &mut [u16]) {
    let k = consts_v3(token);
    let (slen, dlen) = (src.len(), dst.len());
    let (mut is, mut id) = (0, 0);
    while is + 56 <= slen && id + 16 <= dlen {
        let lo: &[u8; 32] = src[is..is + 32].try_into().unwrap();
        let hi: &[u8; 32] = src[is + 24..is + 56].try_into().unwrap();
        let a = pack8_v3(token, &k, lo);
        let b = pack8_v3(token, &k, hi);
        // packus interleaves by lane: [a0-3, b0-3 | a4-7, b4-7]
        let words = _mm256_permute4x64_epi64::<QWORD_ORDER>(_mm256_packus_epi32(a, b));
        let d: &mut [u16; 16] = (&mut dst[id..id + 16]).try_into().unwrap();
        _mm256_storeu_si256(d, words);
        is += 48;
        id += 16;
    }
    rgb565_x8_row_v3(token, &src[is..], &mut dst[id..]);
}

// ===========================================================================
// x86-64 arcane wrappers
// ===========================================================================

#[arcane]
pub(super) fn rgb565_x8_impl_v3(t: X64V3Token, s: &[u8], d: &mut [u16]) {
    rgb565_x8_row_v3(t, s, d);
}
#[arcane]
pub(super) fn rgb565_x16_impl_v3(t: X64V3Token, s: &[u8], d: &mut [u16]) {
    rgb565_x16_row_v3(t, s, d);
}

#[arcane]
pub(super) fn rgb565_x16_strided_v3(
    t: X64V3Token,
    src: &[u8],
    dst: &mut [u16],
    w: usize,
    h: usize,
    ss: usize,
    ds: usize,
) {
    for y in 0..h {
        rgb565_x16_row_v3(t, &src[y * ss..][..w * 3], &mut dst[y * ds..][..w]);
    }
}
