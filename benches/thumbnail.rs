use archmage::SimdToken;
use criterion::{BenchmarkGroup, Criterion, Throughput, measurement::WallTime};
use thumb565::{Rgb565Strategy, ThumbError};

// === SIMD tier detection ===

fn probe<T: SimdToken>() -> &'static str {
    if T::summon().is_some() {
        "available"
    } else {
        "not available"
    }
}

fn print_simd_info() {
    eprintln!("=== SIMD Tier Detection ===");
    #[cfg(target_arch = "x86_64")]
    {
        eprintln!(
            "  AVX2+FMA (x86-64-v3):    {}",
            probe::<archmage::X64V3Token>()
        );
    }
    #[cfg(target_arch = "aarch64")]
    {
        eprintln!(
            "  Arm64-v2:                {}",
            probe::<archmage::Arm64V2Token>()
        );
    }
    #[cfg(target_arch = "wasm32")]
    {
        eprintln!(
            "  WASM SIMD128:            {}",
            probe::<archmage::Wasm128Token>()
        );
    }
    eprintln!("  Scalar:                  always available");
    eprintln!("===========================");
}

// === Scalar disable/enable via archmage ===

fn disable_all_simd() {
    let _ = archmage::dangerously_disable_tokens_except_wasm(true);
}

fn enable_all_simd() {
    let _ = archmage::dangerously_disable_tokens_except_wasm(false);
}

// === Naive scalar baselines ===

fn naive_downscale(src: &[u8], sw: usize, sh: usize, dst: &mut [u8], dw: usize, dh: usize) {
    for y in 0..dh {
        let (y0, y1) = (y * sh / dh, ((y + 1) * sh / dh).min(sh));
        for x in 0..dw {
            let (x0, x1) = (x * sw / dw, ((x + 1) * sw / dw).min(sw));
            let mut sum = [0u32; 3];
            for sy in y0..y1 {
                for px in src[(sy * sw + x0) * 3..(sy * sw + x1) * 3].chunks_exact(3) {
                    sum[0] += px[0] as u32;
                    sum[1] += px[1] as u32;
                    sum[2] += px[2] as u32;
                }
            }
            let n = ((y1 - y0) * (x1 - x0)) as u32;
            let d = &mut dst[(y * dw + x) * 3..][..3];
            d[0] = (sum[0] / n) as u8;
            d[1] = (sum[1] / n) as u8;
            d[2] = (sum[2] / n) as u8;
        }
    }
}

fn naive_rgb565(src: &[u8], dst: &mut [u16]) {
    for (s, d) in src.chunks_exact(3).zip(dst.iter_mut()) {
        let r = ((s[0] as u16 + 4) >> 3).min(31);
        let g = ((s[1] as u16 + 2) >> 2).min(63);
        let b = ((s[2] as u16 + 4) >> 3).min(31);
        *d = (r << 11) | (g << 5) | b;
    }
}

// === Benchmark helpers ===

const SRC_W: usize = 1920;
const SRC_H: usize = 1080;
const DST_W: usize = 200;
const DST_H: usize = 200;

/// Benchmark a pack with 3 variants: thumb565 (best SIMD), thumb565_scalar, naive.
fn bench_pack(
    group: &mut BenchmarkGroup<WallTime>,
    strategy: Rgb565Strategy,
    src: &[u8],
) {
    let pack = |src: &[u8], dst: &mut [u16]| -> Result<(), ThumbError> {
        thumb565::rgb888_to_rgb565_with(strategy, src, dst)
    };
    let n = src.len() / 3;

    group.bench_function("thumb565", |b| {
        let mut dst = vec![0u16; n];
        b.iter(|| pack(src, &mut dst).unwrap());
    });

    disable_all_simd();
    group.bench_function("thumb565_scalar", |b| {
        let mut dst = vec![0u16; n];
        b.iter(|| pack(src, &mut dst).unwrap());
    });
    enable_all_simd();

    group.bench_function("naive", |b| {
        let mut dst = vec![0u16; n];
        b.iter(|| naive_rgb565(src, &mut dst));
    });
}

// === Benchmark groups ===

fn bench_downscale(c: &mut Criterion) {
    let mut group = c.benchmark_group("downscale_1080p_to_200");
    let n = SRC_W * SRC_H * 3;
    group.throughput(Throughput::Bytes(n as u64));
    let src: Vec<u8> = (0..n).map(|i| (i % 251) as u8).collect();

    group.bench_function("thumb565", |b| {
        let mut dst = vec![0u8; DST_W * DST_H * 3];
        b.iter(|| {
            thumb565::downscale_area_average(&src, SRC_W, SRC_H, &mut dst, DST_W, DST_H).unwrap()
        });
    });

    #[cfg(feature = "rayon")]
    group.bench_function("thumb565_par", |b| {
        let mut dst = vec![0u8; DST_W * DST_H * 3];
        b.iter(|| {
            thumb565::downscale_area_average_par(&src, SRC_W, SRC_H, &mut dst, DST_W, DST_H)
                .unwrap()
        });
    });

    group.bench_function("naive", |b| {
        let mut dst = vec![0u8; DST_W * DST_H * 3];
        b.iter(|| naive_downscale(&src, SRC_W, SRC_H, &mut dst, DST_W, DST_H));
    });
    group.finish();
}

fn bench_rgb565(c: &mut Criterion) {
    let n = DST_W * DST_H * 3;
    let src: Vec<u8> = (0..n).map(|i| (i % 251) as u8).collect();
    for (name, strategy) in [
        ("rgb565_lanes16", Rgb565Strategy::Lanes16),
        ("rgb565_lanes8", Rgb565Strategy::Lanes8),
        ("rgb565_scalar", Rgb565Strategy::Scalar),
    ] {
        let mut group = c.benchmark_group(name);
        group.throughput(Throughput::Bytes(n as u64));
        bench_pack(&mut group, strategy, &src);
        group.finish();
    }
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("thumbnail_1080p");
    let n = SRC_W * SRC_H * 3;
    group.throughput(Throughput::Bytes(n as u64));
    let src: Vec<u8> = (0..n).map(|i| (i % 251) as u8).collect();
    group.bench_function("thumb565", |b| {
        let mut scratch = vec![0u8; thumb565::thumbnail::RGB888_BUFFER_SIZE];
        let mut out = vec![0u16; thumb565::thumbnail::RGB565_PIXELS];
        b.iter(|| {
            thumb565::thumbnail::make_thumbnail(
                &src,
                SRC_W,
                SRC_H,
                thumb565::thumbnail::ThumbnailSize::DEFAULT,
                &mut scratch,
                &mut out,
            )
            .unwrap()
        });
    });
    group.finish();
}

// === Custom main for tier detection before criterion runs ===

fn main() {
    print_simd_info();

    let mut criterion = Criterion::default().configure_from_args();
    bench_downscale(&mut criterion);
    bench_rgb565(&mut criterion);
    bench_pipeline(&mut criterion);
    criterion.final_summary();
}
