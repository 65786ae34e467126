#![cfg_attr(not(feature = "std"), no_std)]

//! # Turbine
//!
//! Parallel AES-128-CTR bulk encryption engine.
//!
//! One keystream, three interchangeable round-transform backends (scalar
//! tables, AES-NI, 4-lane VAES) and two composable parallelism axes (threads
//! via the `multithread` feature, SIMD lanes inside a thread). Every
//! backend and every lane count produces byte-identical output for a fixed
//! (key, nonce, base-counter, plaintext) tuple.
//!
//! # Usage
//! ```rust
//! use turbine::{decrypt_range, encrypt_range, expand_key, Backend, CtrParams};
//!
//! // 1. Derive the round-key schedule once per session.
//! let schedule = expand_key(b"an example key!!");
//! let params = CtrParams::new(*b"unique!!", 0);
//!
//! // 2. Encrypt across 4 lanes.
//! let plaintext = b"the quick brown fox jumps over the lazy dog";
//! let mut ciphertext = vec![0u8; plaintext.len()];
//! encrypt_range(&schedule, &params, plaintext, &mut ciphertext, 4, Backend::Scalar)?;
//!
//! // 3. Decryption is the same keystream XOR; lane count is irrelevant.
//! let mut recovered = vec![0u8; plaintext.len()];
//! decrypt_range(&schedule, &params, &ciphertext, &mut recovered, 1, Backend::Scalar)?;
//! assert_eq!(&recovered[..], &plaintext[..]);
//! # Ok::<(), turbine::EngineError>(())
//! ```

// =============================================================================
// MODULES
// =============================================================================

mod ctr;
mod engine;
#[doc(hidden)]
pub mod kernels; // Public for test/bench use only
mod oneshot;
mod schedule;
mod streaming;
pub(crate) mod types;

// =============================================================================
// EXPORTS
// =============================================================================

pub use ctr::{counter_block, CtrParams};
pub use oneshot::{apply_keystream, decrypt_range, encrypt_range, expand_key};
pub use schedule::KeySchedule;
pub use streaming::CtrStream;
pub use types::{Backend, CpuFeatureError, EngineError};

/// Returns the name of the hardware backend auto-dispatch would use.
#[must_use]
pub fn active_backend() -> &'static str {
    engine::get_active_backend_name()
}
