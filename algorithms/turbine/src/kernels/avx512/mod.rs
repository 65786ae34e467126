//! VAES Wide Kernel
//!
//! Four independent 128-bit blocks packed into one ZMM register, one
//! `_mm512_aesenc_epi128` per round for all four lanes. Each lane encrypts
//! its own counter block and never observes another lane's data; per lane the
//! result is bit-identical to the single-block paths.

use crate::ctr::{counter_block, CtrParams};
use crate::kernels::aesni;
use crate::kernels::constants::{BLOCK_SIZE, NUM_ROUND_KEYS, ROUNDS, WIDE_BLOCKS};
use crate::schedule::KeySchedule;

#[cfg(target_arch = "x86")]
use core::arch::x86::{
    _mm512_aesenc_epi128, _mm512_aesenclast_epi128, _mm512_broadcast_i32x4, _mm512_loadu_si512,
    _mm512_setzero_si512, _mm512_storeu_si512, _mm512_xor_si512,
};
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::{
    _mm512_aesenc_epi128, _mm512_aesenclast_epi128, _mm512_broadcast_i32x4, _mm512_loadu_si512,
    _mm512_setzero_si512, _mm512_storeu_si512, _mm512_xor_si512,
};

/// Bytes per wide group (4 blocks).
const GROUP_SIZE: usize = WIDE_BLOCKS * BLOCK_SIZE;

// =============================================================================
// KEYSTREAM KERNEL
// =============================================================================

/// Apply the CTR keystream to `buf` in place, starting at global block index
/// `start_block`. Full 4-block groups run through the wide path; the
/// remainder (< 4 blocks) falls back to the AES-NI single-block path so the
/// group width never shows up in the output.
// SAFETY: Requires AVX-512F + VAES + AES + SSE2 (validated by the dispatcher
// before the kernel pointer is handed out). All loads/stores are unaligned.
#[target_feature(enable = "avx512f")]
#[target_feature(enable = "vaes")]
#[target_feature(enable = "aes")]
#[target_feature(enable = "sse2")]
#[allow(unsafe_code)]
pub unsafe fn apply_keystream(
    schedule: &KeySchedule,
    params: &CtrParams,
    start_block: u64,
    buf: &mut [u8],
) {
    // Broadcast each 128-bit round key across the four lanes once.
    let narrow = aesni::load_schedule(schedule);
    let mut keys = [_mm512_setzero_si512(); NUM_ROUND_KEYS];
    for (wide, reg) in keys.iter_mut().zip(narrow.iter()) {
        *wide = _mm512_broadcast_i32x4(*reg);
    }

    let mut idx = start_block;
    let mut groups = buf.chunks_exact_mut(GROUP_SIZE);
    for group in &mut groups {
        let mut counters = [0u8; GROUP_SIZE];
        for (lane, slot) in counters.chunks_exact_mut(BLOCK_SIZE).enumerate() {
            slot.copy_from_slice(&counter_block(params, idx.wrapping_add(lane as u64)));
        }

        let mut state = _mm512_loadu_si512(counters.as_ptr().cast());
        state = _mm512_xor_si512(state, keys[0]);
        for key in &keys[1..ROUNDS] {
            state = _mm512_aesenc_epi128(state, *key);
        }
        let keystream = _mm512_aesenclast_epi128(state, keys[ROUNDS]);

        let data = _mm512_loadu_si512(group.as_ptr().cast());
        _mm512_storeu_si512(group.as_mut_ptr().cast(), _mm512_xor_si512(data, keystream));
        idx = idx.wrapping_add(WIDE_BLOCKS as u64);
    }

    let tail = groups.into_remainder();
    if !tail.is_empty() {
        aesni::apply_keystream(schedule, params, idx, tail);
    }
}
