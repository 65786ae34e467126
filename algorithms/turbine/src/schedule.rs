//! Key Schedule Expansion
//!
//! Expands a 128-bit key into the 11 round keys used by every backend.
//! The schedule is derived once, before any lane is dispatched, and is only
//! ever shared read-only afterwards.

use crate::kernels::constants::{BLOCK_SIZE, KEY_SIZE, NUM_ROUND_KEYS, RCON, SBOX};
use subtle::ConstantTimeEq;

// =============================================================================
// KEY SCHEDULE
// =============================================================================

/// Expanded AES-128 key schedule: 11 round keys of 16 bytes each.
///
/// Immutable after [`expand`](Self::expand). The flat round-major byte layout
/// feeds the table-driven kernel directly; the native kernels load the same
/// bytes into 128-bit registers, so both encodings carry identical key
/// material.
#[derive(Clone)]
pub struct KeySchedule {
    rk: [[u8; BLOCK_SIZE]; NUM_ROUND_KEYS],
}

impl KeySchedule {
    /// Expand a 128-bit key into the full round-key schedule.
    ///
    /// Word recurrence per FIPS-197: `w[i] = w[i-4] ^ t`, where `t` is
    /// `w[i-1]` except on round boundaries, where the previous word is
    /// rotated, substituted through the S-box and combined with the round
    /// constant.
    #[must_use]
    pub fn expand(key: &[u8; KEY_SIZE]) -> Self {
        let mut w = [0u32; NUM_ROUND_KEYS * 4];
        for (i, word) in key.chunks_exact(4).enumerate() {
            w[i] = u32::from_be_bytes([word[0], word[1], word[2], word[3]]);
        }

        for i in 4..w.len() {
            let mut t = w[i - 1];
            if i % 4 == 0 {
                t = sub_word(t.rotate_left(8)) ^ (u32::from(RCON[i / 4]) << 24);
            }
            w[i] = w[i - 4] ^ t;
        }

        let mut rk = [[0u8; BLOCK_SIZE]; NUM_ROUND_KEYS];
        for (round, key_bytes) in rk.iter_mut().enumerate() {
            for col in 0..4 {
                key_bytes[col * 4..col * 4 + 4].copy_from_slice(&w[round * 4 + col].to_be_bytes());
            }
        }
        Self { rk }
    }

    /// The 16-byte round key for round `round` (0 = initial whitening key).
    ///
    /// # Panics
    /// Panics if `round > 10`.
    #[must_use]
    pub fn round_key(&self, round: usize) -> &[u8; BLOCK_SIZE] {
        &self.rk[round]
    }

    /// All 11 round keys in order.
    #[must_use]
    pub const fn rounds(&self) -> &[[u8; BLOCK_SIZE]; NUM_ROUND_KEYS] {
        &self.rk
    }

    /// The schedule as one flat 176-byte round-major slice.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8] {
        self.rk.as_flattened()
    }
}

/// Apply the S-box to each byte of a 32-bit word.
fn sub_word(w: u32) -> u32 {
    let b = w.to_be_bytes();
    u32::from_be_bytes([
        SBOX[usize::from(b[0])],
        SBOX[usize::from(b[1])],
        SBOX[usize::from(b[2])],
        SBOX[usize::from(b[3])],
    ])
}

// Key material comparison must not be timing-dependent.
impl PartialEq for KeySchedule {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes().ct_eq(other.as_bytes()).into()
    }
}

impl Eq for KeySchedule {}

impl core::fmt::Debug for KeySchedule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // Never leak key material through Debug output.
        f.write_str("KeySchedule(..)")
    }
}
