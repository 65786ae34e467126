//! Public API Layer
//!
//! The two boundary operations — key expansion and counter-addressed range
//! encryption — plus auto-dispatching convenience wrappers. CTR mode makes
//! encryption and decryption the same keystream XOR, so the decrypt entry
//! points are aliases kept for call-site readability.

use crate::ctr::CtrParams;
use crate::engine::{dispatcher, parallel};
use crate::kernels::constants::KEY_SIZE;
use crate::schedule::KeySchedule;
use crate::types::{Backend, EngineError};

// =============================================================================
// BOUNDARY OPERATIONS
// =============================================================================

/// Expand a 128-bit key into the round-key schedule (boundary operation 1).
///
/// Derive once per session; the schedule is immutable and safely shared
/// read-only by any number of lanes.
#[must_use]
pub fn expand_key(key: &[u8; KEY_SIZE]) -> KeySchedule {
    KeySchedule::expand(key)
}

/// Encrypt `plaintext` into `ciphertext` (boundary operation 2).
///
/// Blocks are addressed globally: byte `p` of the output depends only on its
/// block index and intra-block offset, never on lane count, dispatch order
/// or backend. `lanes` is the number of independent execution lanes (0 is
/// treated as 1); `backend` selects the round-transform implementation.
///
/// # Errors
/// All failures are caller-contract violations surfaced before any
/// encryption begins: a length mismatch between the buffers, or a native
/// backend requested on hardware without the corresponding instructions.
pub fn encrypt_range(
    schedule: &KeySchedule,
    params: &CtrParams,
    plaintext: &[u8],
    ciphertext: &mut [u8],
    lanes: usize,
    backend: Backend,
) -> Result<(), EngineError> {
    if ciphertext.len() != plaintext.len() {
        return Err(EngineError::LengthMismatch {
            expected: plaintext.len(),
            actual: ciphertext.len(),
        });
    }
    let kernel = dispatcher::kernel_for(backend)?;
    ciphertext.copy_from_slice(plaintext);
    parallel::run(kernel, schedule, params, 0, ciphertext, lanes);
    Ok(())
}

/// Decrypt `ciphertext` into `plaintext`. Identical to [`encrypt_range`]
/// (CTR symmetry).
///
/// # Errors
/// Same contract as [`encrypt_range`].
pub fn decrypt_range(
    schedule: &KeySchedule,
    params: &CtrParams,
    ciphertext: &[u8],
    plaintext: &mut [u8],
    lanes: usize,
    backend: Backend,
) -> Result<(), EngineError> {
    encrypt_range(schedule, params, ciphertext, plaintext, lanes, backend)
}

// =============================================================================
// AUTO DISPATCH
// =============================================================================

/// Apply the CTR keystream to `buf` in place using the fastest supported
/// backend and an automatic lane count. Infallible: the scalar backend is
/// always available.
pub fn apply_keystream(schedule: &KeySchedule, params: &CtrParams, buf: &mut [u8]) {
    let kernel = dispatcher::best_kernel();
    let lanes = parallel::default_lanes(buf.len());
    parallel::run(kernel, schedule, params, 0, buf, lanes);
}
