//! Execution Kernels
//!
//! Backend-specific implementations of the CTR keystream transform. Every
//! kernel applies the identical function; they differ only in how the round
//! transform is expressed (lookup tables, AES-NI registers, VAES lanes).

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod aesni;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod avx512;
pub mod constants;
pub mod portable;
