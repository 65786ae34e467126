//! Bench Command
//!
//! Quick in-process throughput measurement. Each supported backend encrypts
//! the same random buffer; outputs are cross-checked against the scalar
//! result before any number is printed.

use anyhow::Result;
use rand::prelude::*;
use std::time::Instant;
use turbine::{encrypt_range, expand_key, Backend, CtrParams};

use super::BackendArg;

const WARMUP_ITERS: usize = 2;
const TIMED_ITERS: usize = 5;

// =============================================================================
// BENCH
// =============================================================================

fn supported(backend: Backend) -> bool {
    match backend {
        Backend::Scalar => true,
        Backend::AesNi => is_x86_feature_detected!("aes"),
        Backend::Vaes => {
            is_x86_feature_detected!("avx512f") && is_x86_feature_detected!("vaes")
        }
    }
}

/// Time each requested backend over a `size_mib` buffer and print GiB/s.
pub fn bench_mode(size_mib: usize, lanes: Option<usize>, which: BackendArg) -> Result<()> {
    let lanes = lanes.unwrap_or_else(rayon::current_num_threads);
    let size = size_mib * 1024 * 1024;

    let mut rng = rand::rng();
    let mut key = [0u8; 16];
    rng.fill(&mut key[..]);
    let mut nonce = [0u8; 8];
    rng.fill(&mut nonce[..]);
    let schedule = expand_key(&key);
    let params = CtrParams::new(nonce, 0);

    let mut plaintext = vec![0u8; size];
    rng.fill(&mut plaintext[..]);
    let mut out = vec![0u8; size];

    // Correctness anchor for the hardware backends.
    let mut reference = vec![0u8; size];
    encrypt_range(&schedule, &params, &plaintext, &mut reference, 1, Backend::Scalar)?;

    let candidates = match which.pick() {
        Some(backend) => vec![backend],
        None => vec![Backend::Scalar, Backend::AesNi, Backend::Vaes],
    };

    println!(
        "turbine bench: {size_mib} MiB, {lanes} lanes, auto backend = {}",
        turbine::active_backend()
    );

    for backend in candidates {
        if !supported(backend) {
            println!("{backend:>14}: not supported on this CPU");
            continue;
        }

        for _ in 0..WARMUP_ITERS {
            encrypt_range(&schedule, &params, &plaintext, &mut out, lanes, backend)?;
        }

        let start = Instant::now();
        for _ in 0..TIMED_ITERS {
            encrypt_range(&schedule, &params, &plaintext, &mut out, lanes, backend)?;
        }
        let elapsed = start.elapsed();

        if out != reference {
            anyhow::bail!("{backend} output does not match the scalar reference");
        }

        let gib = (size * TIMED_ITERS) as f64 / (1024.0 * 1024.0 * 1024.0);
        println!(
            "{backend:>14}: {:.2} GiB/s",
            gib / elapsed.as_secs_f64()
        );
    }

    Ok(())
}
