//! Counter-Block Construction
//!
//! Maps (nonce, base counter, block index) to the 128-bit block fed to the
//! round transform. The mapping is pure: any lane can rebuild any counter
//! block from the global block index alone, so processing order never
//! influences the keystream.

use crate::kernels::constants::{BLOCK_SIZE, NONCE_SIZE};

// =============================================================================
// CTR PARAMETERS
// =============================================================================

/// Per-session CTR parameters: an 8-byte nonce plus a 64-bit base counter.
///
/// Together they form the session IV. Reusing the same (key, nonce, base
/// counter) triple for two different plaintexts breaks CTR security; the
/// engine does not detect reuse, that contract is the caller's.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CtrParams {
    /// Session nonce, constant across the whole encryption session.
    pub nonce: [u8; NONCE_SIZE],
    /// Counter value of block index 0.
    pub base_counter: u64,
}

impl CtrParams {
    /// Build parameters from a nonce and a base counter value.
    #[must_use]
    pub const fn new(nonce: [u8; NONCE_SIZE], base_counter: u64) -> Self {
        Self {
            nonce,
            base_counter,
        }
    }

    /// Split a 16-byte IV into nonce (first 8 bytes) and big-endian base
    /// counter (last 8 bytes).
    #[must_use]
    pub fn from_iv(iv: &[u8; BLOCK_SIZE]) -> Self {
        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&iv[..NONCE_SIZE]);
        let mut counter = [0u8; 8];
        counter.copy_from_slice(&iv[NONCE_SIZE..]);
        Self {
            nonce,
            base_counter: u64::from_be_bytes(counter),
        }
    }
}

// =============================================================================
// COUNTER BLOCK
// =============================================================================

/// Construct the counter block for `block_index`:
/// `nonce || big_endian(base_counter + block_index)`.
///
/// The addition wraps at 2^64; sessions longer than 2^64 blocks are out of
/// scope and not detected.
#[must_use]
pub fn counter_block(params: &CtrParams, block_index: u64) -> [u8; BLOCK_SIZE] {
    let mut block = [0u8; BLOCK_SIZE];
    block[..NONCE_SIZE].copy_from_slice(&params.nonce);
    block[NONCE_SIZE..]
        .copy_from_slice(&params.base_counter.wrapping_add(block_index).to_be_bytes());
    block
}

/// XOR `keystream` into `buf` (up to `buf.len()` bytes; a short `buf`
/// consumes only a keystream prefix).
pub(crate) fn xor_bytes(buf: &mut [u8], keystream: &[u8; BLOCK_SIZE]) {
    for (b, k) in buf.iter_mut().zip(keystream.iter()) {
        *b ^= k;
    }
}
