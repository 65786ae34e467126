//! Backend Comparison Benchmark
//!
//! Compares the runtime dispatcher against each pinned kernel, with the
//! RustCrypto `aes`/`ctr` stack as an external baseline. Validates the cost
//! of the fallback paths.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use aes::Aes128;
use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use ctr::cipher::{KeyIvInit, StreamCipher};
use std::hint::black_box;
use turbine::{encrypt_range, expand_key, Backend, CtrParams};

type Aes128Ctr = ctr::Ctr128BE<Aes128>;

const KEY: [u8; 16] = *b"benchmark-key-00";
const IV: [u8; 16] = *b"benchnon\0\0\0\0\0\0\0\0";

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_backends(c: &mut Criterion) {
    let mut group = c.benchmark_group("Turbine Backends");
    let schedule = expand_key(&KEY);
    let params = CtrParams::from_iv(&IV);

    // Scenarios:
    // - Small (7B): dispatch overhead vs short-path
    // - Medium (1KB): L1 cache hot-path
    // - Large (256KB): bulk throughput (VAES saturation)
    let sizes = [7, 1024, 256 * 1024];

    for size in sizes {
        let input = vec![0u8; size];
        let mut out = vec![0u8; size];
        group.throughput(Throughput::Bytes(size as u64));

        // 1. Auto dispatch (production path)
        group.bench_function(format!("Auto (Default) - {size} bytes"), |b| {
            let mut buf = input.clone();
            b.iter(|| turbine::apply_keystream(&schedule, &params, black_box(&mut buf)));
        });

        // 2. VAES - explicit wide kernel
        if is_x86_feature_detected!("avx512f") && is_x86_feature_detected!("vaes") {
            group.bench_function(format!("VAES Wide - {size} bytes"), |b| {
                b.iter(|| {
                    encrypt_range(
                        &schedule,
                        &params,
                        black_box(&input),
                        &mut out,
                        1,
                        Backend::Vaes,
                    )
                    .unwrap()
                });
            });
        }

        // 3. AES-NI - explicit single-block kernel
        if is_x86_feature_detected!("aes") {
            group.bench_function(format!("AES-NI Native - {size} bytes"), |b| {
                b.iter(|| {
                    encrypt_range(
                        &schedule,
                        &params,
                        black_box(&input),
                        &mut out,
                        1,
                        Backend::AesNi,
                    )
                    .unwrap()
                });
            });
        }

        // 4. Scalar tables - no SIMD, quantifies the hardware speedup
        group.bench_function(format!("Scalar Tables - {size} bytes"), |b| {
            b.iter(|| {
                encrypt_range(
                    &schedule,
                    &params,
                    black_box(&input),
                    &mut out,
                    1,
                    Backend::Scalar,
                )
                .unwrap()
            });
        });

        // 5. RustCrypto baseline (same mode, independent implementation)
        group.bench_function(format!("RustCrypto aes+ctr - {size} bytes"), |b| {
            let mut buf = input.clone();
            b.iter(|| {
                let mut cipher = Aes128Ctr::new(&KEY.into(), &IV.into());
                cipher.apply_keystream(black_box(&mut buf));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_backends);
criterion_main!(benches);
