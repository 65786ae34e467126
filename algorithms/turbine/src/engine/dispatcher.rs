//! Hardware Dispatcher
//!
//! Validates backend preconditions once, at selection time, and hands out a
//! kernel function pointer. Kernels themselves never re-check features.

use crate::ctr::CtrParams;
use crate::kernels;
use crate::schedule::KeySchedule;
use crate::types::{Backend, CpuFeatureError, KernelFn};

// =============================================================================
// FEATURE DETECTION
// =============================================================================

/// Whether the AES-NI single-block backend can run on this host.
#[must_use]
pub fn aesni_supported() -> bool {
    // 1. Runtime detection (std-only)
    #[cfg(all(feature = "std", any(target_arch = "x86", target_arch = "x86_64")))]
    {
        if is_x86_feature_detected!("aes") && is_x86_feature_detected!("sse2") {
            return true;
        }
    }

    // 2. Compile-time detection (no_std)
    #[cfg(all(
        not(feature = "std"),
        any(target_arch = "x86", target_arch = "x86_64")
    ))]
    {
        if cfg!(all(target_feature = "aes", target_feature = "sse2")) {
            return true;
        }
    }

    false
}

/// Whether the VAES wide backend can run on this host.
#[must_use]
pub fn vaes_supported() -> bool {
    #[cfg(all(feature = "std", any(target_arch = "x86", target_arch = "x86_64")))]
    {
        if is_x86_feature_detected!("avx512f")
            && is_x86_feature_detected!("vaes")
            && is_x86_feature_detected!("aes")
            && is_x86_feature_detected!("sse2")
        {
            return true;
        }
    }

    #[cfg(all(
        not(feature = "std"),
        any(target_arch = "x86", target_arch = "x86_64")
    ))]
    {
        if cfg!(all(
            target_feature = "avx512f",
            target_feature = "vaes",
            target_feature = "aes",
            target_feature = "sse2"
        )) {
            return true;
        }
    }

    false
}

// =============================================================================
// DISPATCHER
// =============================================================================

/// The fastest backend supported by this host (VAES > AES-NI > scalar).
#[must_use]
pub fn best_backend() -> Backend {
    if vaes_supported() {
        return Backend::Vaes;
    }
    if aesni_supported() {
        return Backend::AesNi;
    }
    Backend::Scalar
}

/// The kernel for `backend`, after validating its hardware precondition.
///
/// # Errors
/// Returns [`CpuFeatureError`] when a native backend is requested on a host
/// lacking the corresponding instructions.
pub fn kernel_for(backend: Backend) -> Result<KernelFn, CpuFeatureError> {
    match backend {
        Backend::Scalar => Ok(scalar_wrapper),
        Backend::AesNi => {
            if aesni_supported() {
                Ok(aesni_wrapper)
            } else {
                Err(CpuFeatureError::new("aes+sse2"))
            }
        }
        Backend::Vaes => {
            if vaes_supported() {
                Ok(vaes_wrapper)
            } else {
                Err(CpuFeatureError::new("avx512f+vaes"))
            }
        }
    }
}

/// The kernel of the fastest supported backend; never fails (scalar is
/// always available).
#[must_use]
pub fn best_kernel() -> KernelFn {
    match best_backend() {
        Backend::Vaes => vaes_wrapper,
        Backend::AesNi => aesni_wrapper,
        Backend::Scalar => scalar_wrapper,
    }
}

/// Returns the name of the active hardware backend.
#[must_use]
pub fn get_active_backend_name() -> &'static str {
    best_backend().name()
}

// =============================================================================
// WRAPPERS
// =============================================================================

fn scalar_wrapper(schedule: &KeySchedule, params: &CtrParams, start_block: u64, buf: &mut [u8]) {
    kernels::portable::apply_keystream(schedule, params, start_block, buf);
}

#[allow(unsafe_code)]
#[allow(unused_variables)]
fn aesni_wrapper(schedule: &KeySchedule, params: &CtrParams, start_block: u64, buf: &mut [u8]) {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    // SAFETY: Only reachable through `kernel_for`/`best_kernel` after AES +
    // SSE2 validation.
    unsafe {
        kernels::aesni::apply_keystream(schedule, params, start_block, buf);
    }
    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
    unreachable!("CPUID escape");
}

#[allow(unsafe_code)]
#[allow(unused_variables)]
fn vaes_wrapper(schedule: &KeySchedule, params: &CtrParams, start_block: u64, buf: &mut [u8]) {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    // SAFETY: Only reachable through `kernel_for`/`best_kernel` after
    // AVX-512F + VAES + AES + SSE2 validation.
    unsafe {
        kernels::avx512::apply_keystream(schedule, params, start_block, buf);
    }
    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
    unreachable!("CPUID escape");
}
