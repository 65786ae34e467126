//! Turbine Comprehensive Criterion Benchmark
//!
//! Statistically rigorous keystream throughput measurements across input
//! sizes, lane counts and streaming chunk schedules.

#![allow(clippy::pedantic, clippy::nursery)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use rand::prelude::*;
use std::hint::black_box;
use turbine::{apply_keystream, expand_key, CtrParams, CtrStream};

const KB: usize = 1024;
const MB: usize = 1024 * 1024;

const KEY: [u8; 16] = *b"benchmark-key-00";

fn params() -> CtrParams {
    CtrParams::new(*b"benchnon", 0)
}

// =============================================================================
// BENCHMARK 1: LATENCY
// =============================================================================

/// Hot path latency for small payloads (packets, records).
fn bench_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("1-Latency");
    let schedule = expand_key(&KEY);

    let sizes = [
        (16, "16B"),
        (64, "64B"),
        (256, "256B"),
        (KB, "1KB"),
        (4 * KB, "4KB"),
    ];

    for (size, name) in sizes {
        let mut input = vec![0u8; size];
        rand::rng().fill(&mut input[..]);
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(
            criterion::BenchmarkId::from_parameter(name),
            &input,
            |b, data| {
                let mut buf = data.clone();
                b.iter(|| apply_keystream(&schedule, &params(), black_box(&mut buf)));
            },
        );
    }
    group.finish();
}

// =============================================================================
// BENCHMARK 2: BULK THROUGHPUT
// =============================================================================

/// Throughput on bulk buffers (file encryption, disk images).
fn bench_bulk(c: &mut Criterion) {
    let mut group = c.benchmark_group("2-Bulk");
    group.sample_size(50);
    let schedule = expand_key(&KEY);

    let sizes = [
        (64 * KB, "64KB"),
        (512 * KB, "512KB"),
        (MB, "1MB"),
        (16 * MB, "16MB"),
        (64 * MB, "64MB"),
    ];

    for (size, name) in sizes {
        let mut input = vec![0u8; size];
        rand::rng().fill(&mut input[..]);
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(
            criterion::BenchmarkId::from_parameter(name),
            &input,
            |b, data| {
                let mut buf = data.clone();
                b.iter(|| apply_keystream(&schedule, &params(), black_box(&mut buf)));
            },
        );
    }
    group.finish();
}

// =============================================================================
// BENCHMARK 3: LANE SCALING
// =============================================================================

/// Multi-core scaling efficiency (1 to N lanes over a fixed buffer).
#[cfg(feature = "multithread")]
fn bench_lane_scaling(c: &mut Criterion) {
    use turbine::{encrypt_range, Backend};

    let mut group = c.benchmark_group("3-Lane-Scaling");
    group.sample_size(50);
    let schedule = expand_key(&KEY);

    let size = 16 * MB;
    let mut input = vec![0u8; size];
    rand::rng().fill(&mut input[..]);
    group.throughput(Throughput::Bytes(size as u64));

    let max_threads = num_cpus::get();
    let lane_counts: Vec<usize> = [1, 2, 4, 8, 16, 32]
        .iter()
        .copied()
        .filter(|&t| t <= max_threads)
        .collect();

    let backend = if is_x86_feature_detected!("aes") {
        Backend::AesNi
    } else {
        Backend::Scalar
    };

    for lanes in lane_counts {
        group.bench_with_input(
            criterion::BenchmarkId::from_parameter(format!("{}lanes", lanes)),
            &lanes,
            |b, &lanes| {
                let mut out = vec![0u8; size];
                b.iter(|| {
                    encrypt_range(
                        &schedule,
                        &params(),
                        black_box(&input),
                        &mut out,
                        lanes,
                        backend,
                    )
                    .unwrap()
                });
            },
        );
    }
    group.finish();
}

// =============================================================================
// BENCHMARK 4: STREAMING
// =============================================================================

/// Throughput for incremental chunked processing (network streams).
fn bench_streaming(c: &mut Criterion) {
    let mut group = c.benchmark_group("4-Streaming");
    group.sample_size(50);

    let test_cases = [
        (MB, 4 * KB, "1MB-4KB-chunks"),
        (MB, 64 * KB, "1MB-64KB-chunks"),
        (16 * MB, 64 * KB, "16MB-64KB-chunks"),
        (16 * MB, 256 * KB, "16MB-256KB-chunks"),
    ];

    for (total_size, chunk_size, name) in test_cases {
        let mut input = vec![0u8; total_size];
        rand::rng().fill(&mut input[..]);
        group.throughput(Throughput::Bytes(total_size as u64));

        group.bench_with_input(
            criterion::BenchmarkId::from_parameter(name),
            &(input, chunk_size),
            |b, (data, chunk_sz)| {
                let mut buf = data.clone();
                b.iter(|| {
                    let mut stream = CtrStream::new(&KEY, params());
                    for chunk in buf.chunks_mut(*chunk_sz) {
                        stream.apply_keystream(black_box(chunk));
                    }
                })
            },
        );
    }
    group.finish();
}

// =============================================================================
// MAIN
// =============================================================================

criterion_group!(benches, bench_latency, bench_bulk, bench_streaming,);

#[cfg(feature = "multithread")]
criterion_group!(benches_multithread, bench_lane_scaling,);

#[cfg(feature = "multithread")]
criterion_main!(benches, benches_multithread);

#[cfg(not(feature = "multithread"))]
criterion_main!(benches);
