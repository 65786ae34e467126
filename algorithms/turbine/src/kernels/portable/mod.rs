//! Portable Kernel
//!
//! Table-driven scalar implementation of the round transform. Runs on any
//! target and serves as the reference the hardware kernels must match
//! bit-for-bit.
//!
//! The 16-byte state is kept in input order, which is column-major for the
//! 4x4 AES state matrix: byte `i` sits at row `i % 4`, column `i / 4`. All
//! four sub-transforms index it that way, so no transposition is needed on
//! the way in or out.

use crate::ctr::{counter_block, xor_bytes, CtrParams};
use crate::kernels::constants::{BLOCK_SIZE, MUL2, MUL3, ROUNDS, SBOX};
use crate::schedule::KeySchedule;

// =============================================================================
// ROUND SUB-TRANSFORMS
// =============================================================================

fn add_round_key(state: &mut [u8; BLOCK_SIZE], round_key: &[u8; BLOCK_SIZE]) {
    for (s, k) in state.iter_mut().zip(round_key.iter()) {
        *s ^= k;
    }
}

fn sub_bytes(state: &mut [u8; BLOCK_SIZE]) {
    for s in state.iter_mut() {
        *s = SBOX[usize::from(*s)];
    }
}

/// Row `r` rotates left by `r` positions. Row r, column c lives at `r + 4c`.
fn shift_rows(state: &mut [u8; BLOCK_SIZE]) {
    let src = *state;
    for row in 1..4 {
        for col in 0..4 {
            state[row + 4 * col] = src[row + 4 * ((col + row) % 4)];
        }
    }
}

/// Each output byte of a column is a fixed GF(2^8) linear combination of the
/// column's four input bytes, via the precomputed x2/x3 tables.
fn mix_columns(state: &mut [u8; BLOCK_SIZE]) {
    for col in state.chunks_exact_mut(4) {
        let (a0, a1, a2, a3) = (col[0], col[1], col[2], col[3]);
        col[0] = MUL2[usize::from(a0)] ^ MUL3[usize::from(a1)] ^ a2 ^ a3;
        col[1] = a0 ^ MUL2[usize::from(a1)] ^ MUL3[usize::from(a2)] ^ a3;
        col[2] = a0 ^ a1 ^ MUL2[usize::from(a2)] ^ MUL3[usize::from(a3)];
        col[3] = MUL3[usize::from(a0)] ^ a1 ^ a2 ^ MUL2[usize::from(a3)];
    }
}

// =============================================================================
// BLOCK ENCRYPTION
// =============================================================================

/// Encrypt one 16-byte block: whitening XOR, nine full rounds, one final
/// round without column mixing. 160 table lookups and 160 XORs, no data
/// dependent branches.
#[must_use]
pub fn encrypt_block(schedule: &KeySchedule, block: &[u8; BLOCK_SIZE]) -> [u8; BLOCK_SIZE] {
    let mut state = *block;
    add_round_key(&mut state, schedule.round_key(0));
    for round in 1..ROUNDS {
        sub_bytes(&mut state);
        shift_rows(&mut state);
        mix_columns(&mut state);
        add_round_key(&mut state, schedule.round_key(round));
    }
    sub_bytes(&mut state);
    shift_rows(&mut state);
    add_round_key(&mut state, schedule.round_key(ROUNDS));
    state
}

// =============================================================================
// KEYSTREAM KERNEL
// =============================================================================

/// Apply the CTR keystream to `buf` in place, starting at global block index
/// `start_block`. A trailing partial block consumes a keystream prefix.
pub fn apply_keystream(
    schedule: &KeySchedule,
    params: &CtrParams,
    start_block: u64,
    buf: &mut [u8],
) {
    let mut idx = start_block;
    for chunk in buf.chunks_mut(BLOCK_SIZE) {
        let keystream = encrypt_block(schedule, &counter_block(params, idx));
        xor_bytes(chunk, &keystream);
        idx = idx.wrapping_add(1);
    }
}
