//! Known-Answer Tests
//!
//! Pins the engine to the published AES-128 references: the FIPS-197 cipher
//! example, the NIST SP 800-38A CTR vector, and the FIPS-197 key-expansion
//! walkthrough. A keystream bug cannot hide from these.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use turbine::{counter_block, encrypt_range, expand_key, Backend, CtrParams};

/// FIPS-197 appendix B key.
const FIPS_KEY: [u8; 16] = [
    0x2b, 0x7e, 0x15, 0x16, 0x28, 0xae, 0xd2, 0xa6, 0xab, 0xf7, 0x15, 0x88, 0x09, 0xcf, 0x4f, 0x3c,
];

// =============================================================================
// FIPS-197 SINGLE BLOCK
// =============================================================================

/// Encrypting an all-zero input with a counter block equal to the FIPS-197
/// plaintext yields the raw block-cipher output, so the CTR path doubles as
/// an ECB known-answer test on every backend.
fn fips197_via_ctr(backend: Backend) {
    // Counter block = 3243f6a8885a308d313198a2e0370734 (FIPS-197 plaintext).
    let params = CtrParams::new(
        [0x32, 0x43, 0xf6, 0xa8, 0x88, 0x5a, 0x30, 0x8d],
        0x3131_98a2_e037_0734,
    );
    let schedule = expand_key(&FIPS_KEY);

    let mut out = [0u8; 16];
    encrypt_range(&schedule, &params, &[0u8; 16], &mut out, 1, backend).unwrap();

    assert_eq!(
        hex::encode(out),
        "3925841d02dc09fbdc118597196a0b32",
        "FIPS-197 block mismatch on backend {backend}",
    );
}

#[test]
fn test_fips197_scalar() {
    fips197_via_ctr(Backend::Scalar);
}

#[test]
fn test_fips197_aesni() {
    if !is_x86_feature_detected!("aes") {
        println!("Skipping: AES-NI not supported.");
        return;
    }
    fips197_via_ctr(Backend::AesNi);
}

#[test]
fn test_fips197_vaes() {
    if !(is_x86_feature_detected!("avx512f") && is_x86_feature_detected!("vaes")) {
        println!("Skipping: VAES not supported.");
        return;
    }
    fips197_via_ctr(Backend::Vaes);
}

#[test]
fn test_fips197_block_transform() {
    let schedule = expand_key(&FIPS_KEY);
    let plaintext: [u8; 16] = hex::decode("3243f6a8885a308d313198a2e0370734")
        .unwrap()
        .try_into()
        .unwrap();
    let ciphertext = turbine::kernels::portable::encrypt_block(&schedule, &plaintext);
    assert_eq!(hex::encode(ciphertext), "3925841d02dc09fbdc118597196a0b32");
}

#[test]
fn test_reference_session_keystream() {
    // Session nonce 0123456789abcdef, base counter 0: the first keystream
    // block is the block-cipher output for counter block
    // 0123456789abcdef0000000000000000, on every available backend.
    let params = CtrParams::new([0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef], 0);
    let schedule = expand_key(&FIPS_KEY);

    let expected = turbine::kernels::portable::encrypt_block(&schedule, &counter_block(&params, 0));

    let backends: &[(Backend, bool)] = &[
        (Backend::Scalar, true),
        (Backend::AesNi, is_x86_feature_detected!("aes")),
        (
            Backend::Vaes,
            is_x86_feature_detected!("avx512f") && is_x86_feature_detected!("vaes"),
        ),
    ];
    for &(backend, available) in backends {
        if !available {
            continue;
        }
        let mut out = [0u8; 16];
        encrypt_range(&schedule, &params, &[0u8; 16], &mut out, 1, backend).unwrap();
        assert_eq!(out, expected, "backend {backend} keystream mismatch");
    }
}

// =============================================================================
// NIST SP 800-38A CTR
// =============================================================================

#[test]
fn test_sp800_38a_ctr_f51() {
    // Initial counter block f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff.
    let params = CtrParams::new(
        [0xf0, 0xf1, 0xf2, 0xf3, 0xf4, 0xf5, 0xf6, 0xf7],
        0xf8f9_fafb_fcfd_feff,
    );
    let schedule = expand_key(&FIPS_KEY);

    let plaintext = hex::decode(concat!(
        "6bc1bee22e409f96e93d7e117393172a",
        "ae2d8a571e03ac9c9eb76fac45af8e51",
        "30c81c46a35ce411e5fbc1191a0a52ef",
        "f69f2445df4f9b17ad2b417be66c3710",
    ))
    .unwrap();
    let expected = concat!(
        "874d6191b620e3261bef6864990db6ce",
        "9806f66b7970fdff8617187bb9fffdff",
        "5ae4df3edbd5d35e5b4f09020db03eab",
        "1e031dda2fbe03d1792170a0f3009cee",
    );

    let mut ciphertext = vec![0u8; plaintext.len()];
    encrypt_range(
        &schedule,
        &params,
        &plaintext,
        &mut ciphertext,
        1,
        Backend::Scalar,
    )
    .unwrap();
    assert_eq!(hex::encode(&ciphertext), expected);

    // The same vector through the auto-dispatched in-place path.
    let mut buf = plaintext.clone();
    turbine::apply_keystream(&schedule, &params, &mut buf);
    assert_eq!(hex::encode(&buf), expected);
}

// =============================================================================
// KEY SCHEDULE
// =============================================================================

#[test]
fn test_key_expansion_fips197() {
    let schedule = expand_key(&FIPS_KEY);

    // Round 0 is the key itself.
    assert_eq!(schedule.round_key(0), &FIPS_KEY);
    // FIPS-197 appendix A.1, rounds 1 and 10.
    assert_eq!(
        hex::encode(schedule.round_key(1)),
        "a0fafe1788542cb123a339392a6c7605"
    );
    assert_eq!(
        hex::encode(schedule.round_key(10)),
        "d014f9a8c9ee2589e13f0cc8b6630ca6"
    );
}

#[test]
fn test_key_schedule_deterministic() {
    let a = expand_key(&FIPS_KEY);
    let b = expand_key(&FIPS_KEY);
    assert_eq!(a, b);
    assert_eq!(a.as_bytes(), b.as_bytes());
}

#[test]
fn test_key_schedule_avalanche() {
    // One flipped key bit disturbs a large share of the schedule, but the
    // word recurrence diffuses slowly out of a low-order flip: early rounds
    // carry it into only a few words. Statistical smoke test, not an exact
    // bound; the later round keys alone must be fully scrambled.
    let mut flipped = FIPS_KEY;
    flipped[0] ^= 0x01;

    let a = expand_key(&FIPS_KEY);
    let b = expand_key(&flipped);

    let differing = a
        .as_bytes()
        .iter()
        .zip(b.as_bytes().iter())
        .filter(|(x, y)| x != y)
        .count();
    assert!(
        differing > 60,
        "only {differing} of 176 schedule bytes changed"
    );

    // Diffusion is complete by the last two round keys: every byte differs
    // with overwhelming probability, allow a couple of chance collisions.
    let tail_differing = a.as_bytes()[144..]
        .iter()
        .zip(b.as_bytes()[144..].iter())
        .filter(|(x, y)| x != y)
        .count();
    assert!(
        tail_differing > 28,
        "only {tail_differing} of 32 tail schedule bytes changed"
    );
}

// =============================================================================
// COUNTER CONSTRUCTION
// =============================================================================

#[test]
fn test_counter_block_layout() {
    let params = CtrParams::new(*b"\x01\x23\x45\x67\x89\xab\xcd\xef", 0);
    let block = counter_block(&params, 0);
    assert_eq!(&block[..8], &[0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef]);
    assert_eq!(&block[8..], &[0u8; 8]);

    let block = counter_block(&params, 0x0102_0304_0506_0708);
    assert_eq!(&block[8..], &[1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn test_counter_wraparound() {
    let params = CtrParams::new([0xaa; 8], u64::MAX);
    assert_eq!(&counter_block(&params, 0)[8..], &[0xff; 8]);
    // base + 1 wraps to zero in the low 8 bytes; the nonce is untouched.
    let wrapped = counter_block(&params, 1);
    assert_eq!(&wrapped[..8], &[0xaa; 8]);
    assert_eq!(&wrapped[8..], &[0u8; 8]);
}

#[test]
fn test_params_from_iv() {
    let iv: [u8; 16] = hex::decode("f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff")
        .unwrap()
        .try_into()
        .unwrap();
    let params = CtrParams::from_iv(&iv);
    assert_eq!(params.nonce, [0xf0, 0xf1, 0xf2, 0xf3, 0xf4, 0xf5, 0xf6, 0xf7]);
    assert_eq!(params.base_counter, 0xf8f9_fafb_fcfd_feff);
}
