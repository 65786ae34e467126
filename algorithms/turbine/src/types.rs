//! Shared types used across the turbine library.

use crate::ctr::CtrParams;
use crate::schedule::KeySchedule;
use core::fmt;
#[cfg(feature = "std")]
use std::error;

// =============================================================================
// KERNEL INTERFACE
// =============================================================================

/// Unified kernel signature: apply the CTR keystream in place to `buf`,
/// whose first byte belongs to global block index `start_block`.
///
/// All backends (portable tables, AES-NI, VAES) implement this same
/// signature so the dispatcher and the work partitioner can swap them
/// freely.
pub type KernelFn = fn(&KeySchedule, &CtrParams, u64, &mut [u8]);

// =============================================================================
// BACKEND SELECTION
// =============================================================================

/// Execution backend for the round transform.
///
/// Every backend computes the identical keystream; the choice only affects
/// how the rounds are executed. The native variants require hardware support,
/// checked once at dispatch time — never per block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Table-driven scalar implementation; runs everywhere.
    Scalar,
    /// AES-NI single-block rounds (`_mm_aesenc_si128`).
    AesNi,
    /// VAES 4-lane wide rounds (`_mm512_aesenc_epi128`).
    Vaes,
}

impl Backend {
    /// The fastest backend supported by this host (VAES > AES-NI > scalar).
    #[must_use]
    pub fn detect() -> Self {
        crate::engine::dispatcher::best_backend()
    }

    /// Human-readable backend name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Scalar => "scalar-table",
            Self::AesNi => "aes-ni",
            Self::Vaes => "vaes-wide",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Error for unsupported CPU features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuFeatureError {
    missing: &'static str,
}

impl CpuFeatureError {
    /// Create a new `CpuFeatureError` describing the missing CPU feature.
    pub(crate) const fn new(missing: &'static str) -> Self {
        Self { missing }
    }

    /// The CPU feature the requested backend needs.
    #[must_use]
    pub const fn missing(self) -> &'static str {
        self.missing
    }
}

impl fmt::Display for CpuFeatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CPU feature '{}' required by the requested backend; \
             select Backend::Scalar or use Backend auto-detection",
            self.missing
        )
    }
}

#[cfg(feature = "std")]
impl error::Error for CpuFeatureError {}

/// Caller-contract violations surfaced before any encryption begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// The requested backend is not supported on this host.
    CpuFeature(CpuFeatureError),
    /// Output buffer length does not match the input buffer length.
    LengthMismatch {
        /// Required output length (equal to the input length).
        expected: usize,
        /// Actual output length supplied by the caller.
        actual: usize,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CpuFeature(e) => e.fmt(f),
            Self::LengthMismatch { expected, actual } => write!(
                f,
                "output buffer length mismatch: expected {expected} bytes, got {actual}"
            ),
        }
    }
}

impl From<CpuFeatureError> for EngineError {
    fn from(e: CpuFeatureError) -> Self {
        Self::CpuFeature(e)
    }
}

#[cfg(feature = "std")]
impl error::Error for EngineError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::CpuFeature(e) => Some(e),
            Self::LengthMismatch { .. } => None,
        }
    }
}
