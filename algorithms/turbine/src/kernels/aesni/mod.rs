//! AES-NI Kernel
//!
//! Single-block hardware path: one `_mm_aesenc_si128` per round instead of
//! 16 table lookups. Must produce byte-identical keystream to the portable
//! kernel for every input; the cross-backend tests pin that contract.

#![allow(clippy::missing_safety_doc)]

use crate::ctr::{counter_block, xor_bytes, CtrParams};
use crate::kernels::constants::{BLOCK_SIZE, KEY_SIZE, NUM_ROUND_KEYS, ROUNDS};
use crate::schedule::KeySchedule;

#[cfg(target_arch = "x86")]
use core::arch::x86::{
    __m128i, _mm_aesenc_si128, _mm_aesenclast_si128, _mm_aeskeygenassist_si128, _mm_loadu_si128,
    _mm_setzero_si128, _mm_shuffle_epi32, _mm_slli_si128, _mm_storeu_si128, _mm_xor_si128,
};
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::{
    __m128i, _mm_aesenc_si128, _mm_aesenclast_si128, _mm_aeskeygenassist_si128, _mm_loadu_si128,
    _mm_setzero_si128, _mm_shuffle_epi32, _mm_slli_si128, _mm_storeu_si128, _mm_xor_si128,
};

// =============================================================================
// SCHEDULE ENCODING
// =============================================================================

/// Load the expanded schedule into eleven 128-bit registers.
///
/// Same key material as [`KeySchedule::as_bytes`], re-encoded for the
/// register-based round instructions.
// SAFETY: Requires AES + SSE2 (validated by the dispatcher before any kernel
// call). Unaligned loads only.
#[target_feature(enable = "aes")]
#[target_feature(enable = "sse2")]
#[allow(unsafe_code)]
pub unsafe fn load_schedule(schedule: &KeySchedule) -> [__m128i; NUM_ROUND_KEYS] {
    let mut keys = [_mm_setzero_si128(); NUM_ROUND_KEYS];
    for (reg, bytes) in keys.iter_mut().zip(schedule.rounds().iter()) {
        *reg = _mm_loadu_si128(bytes.as_ptr().cast());
    }
    keys
}

/// Native key expansion via `_mm_aeskeygenassist_si128`.
///
/// Must derive the exact same schedule as [`KeySchedule::expand`]; kept as an
/// independent derivation so the two encodings can be checked against each
/// other.
// SAFETY: Requires AES + SSE2 (validated by the caller / dispatcher).
#[target_feature(enable = "aes")]
#[target_feature(enable = "sse2")]
#[allow(unsafe_code)]
pub unsafe fn expand_key(key: &[u8; KEY_SIZE]) -> [__m128i; NUM_ROUND_KEYS] {
    #[inline]
    #[target_feature(enable = "sse2")]
    unsafe fn assist(mut state: __m128i, gen: __m128i) -> __m128i {
        let gen = _mm_shuffle_epi32::<0xff>(gen);
        let mut shifted = _mm_slli_si128::<4>(state);
        state = _mm_xor_si128(state, shifted);
        shifted = _mm_slli_si128::<4>(shifted);
        state = _mm_xor_si128(state, shifted);
        shifted = _mm_slli_si128::<4>(shifted);
        state = _mm_xor_si128(state, shifted);
        _mm_xor_si128(state, gen)
    }

    let mut keys = [_mm_setzero_si128(); NUM_ROUND_KEYS];
    keys[0] = _mm_loadu_si128(key.as_ptr().cast());
    keys[1] = assist(keys[0], _mm_aeskeygenassist_si128::<0x01>(keys[0]));
    keys[2] = assist(keys[1], _mm_aeskeygenassist_si128::<0x02>(keys[1]));
    keys[3] = assist(keys[2], _mm_aeskeygenassist_si128::<0x04>(keys[2]));
    keys[4] = assist(keys[3], _mm_aeskeygenassist_si128::<0x08>(keys[3]));
    keys[5] = assist(keys[4], _mm_aeskeygenassist_si128::<0x10>(keys[4]));
    keys[6] = assist(keys[5], _mm_aeskeygenassist_si128::<0x20>(keys[5]));
    keys[7] = assist(keys[6], _mm_aeskeygenassist_si128::<0x40>(keys[6]));
    keys[8] = assist(keys[7], _mm_aeskeygenassist_si128::<0x80>(keys[7]));
    keys[9] = assist(keys[8], _mm_aeskeygenassist_si128::<0x1b>(keys[8]));
    keys[10] = assist(keys[9], _mm_aeskeygenassist_si128::<0x36>(keys[9]));
    keys
}

/// Store a register-encoded schedule back to round-major bytes.
// SAFETY: Requires SSE2 (validated by the caller / dispatcher).
#[target_feature(enable = "sse2")]
#[allow(unsafe_code)]
pub unsafe fn schedule_to_bytes(
    keys: &[__m128i; NUM_ROUND_KEYS],
) -> [[u8; BLOCK_SIZE]; NUM_ROUND_KEYS] {
    let mut bytes = [[0u8; BLOCK_SIZE]; NUM_ROUND_KEYS];
    for (out, reg) in bytes.iter_mut().zip(keys.iter()) {
        _mm_storeu_si128(out.as_mut_ptr().cast(), *reg);
    }
    bytes
}

// =============================================================================
// BLOCK ENCRYPTION
// =============================================================================

/// One whitening XOR, nine full rounds, one final round. The hardware round
/// folds substitution, row rotation, column mixing and key XOR into a single
/// instruction.
// SAFETY: Requires AES + SSE2 (validated by the dispatcher).
#[inline]
#[target_feature(enable = "aes")]
#[target_feature(enable = "sse2")]
#[allow(unsafe_code)]
unsafe fn encrypt_block(keys: &[__m128i; NUM_ROUND_KEYS], block: __m128i) -> __m128i {
    let mut state = _mm_xor_si128(block, keys[0]);
    for key in &keys[1..ROUNDS] {
        state = _mm_aesenc_si128(state, *key);
    }
    _mm_aesenclast_si128(state, keys[ROUNDS])
}

// =============================================================================
// KEYSTREAM KERNEL
// =============================================================================

/// Apply the CTR keystream to `buf` in place, starting at global block index
/// `start_block`.
// SAFETY: Requires AES + SSE2 (validated by the dispatcher before the kernel
// pointer is handed out). All loads/stores are unaligned.
#[target_feature(enable = "aes")]
#[target_feature(enable = "sse2")]
#[allow(unsafe_code)]
pub unsafe fn apply_keystream(
    schedule: &KeySchedule,
    params: &CtrParams,
    start_block: u64,
    buf: &mut [u8],
) {
    let keys = load_schedule(schedule);
    let mut idx = start_block;

    let mut chunks = buf.chunks_exact_mut(BLOCK_SIZE);
    for chunk in &mut chunks {
        let ctr = counter_block(params, idx);
        let keystream = encrypt_block(&keys, _mm_loadu_si128(ctr.as_ptr().cast()));
        let data = _mm_loadu_si128(chunk.as_ptr().cast());
        _mm_storeu_si128(chunk.as_mut_ptr().cast(), _mm_xor_si128(data, keystream));
        idx = idx.wrapping_add(1);
    }

    let tail = chunks.into_remainder();
    if !tail.is_empty() {
        let ctr = counter_block(params, idx);
        let keystream = encrypt_block(&keys, _mm_loadu_si128(ctr.as_ptr().cast()));
        let mut keystream_bytes = [0u8; BLOCK_SIZE];
        _mm_storeu_si128(keystream_bytes.as_mut_ptr().cast(), keystream);
        xor_bytes(tail, &keystream_bytes);
    }
}
