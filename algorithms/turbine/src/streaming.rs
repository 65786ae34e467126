//! Streaming Keystream Application
//!
//! [`CtrStream`] tracks an absolute byte position inside the keystream so a
//! session can be processed in arbitrary chunks, or seeked: CTR blocks are
//! independently computable, so random access costs nothing.

#![allow(clippy::cast_possible_truncation)]

use crate::ctr::{counter_block, CtrParams};
use crate::engine::{dispatcher, parallel};
use crate::kernels::constants::{BLOCK_SIZE, KEY_SIZE};
use crate::kernels::portable;
use crate::schedule::KeySchedule;
use crate::types::{Backend, CpuFeatureError, KernelFn};

// =============================================================================
// CTR STREAM
// =============================================================================

/// Incremental CTR cipher over one (key, nonce, base-counter) session.
///
/// Splitting the data into chunks, or seeking between applications, never
/// changes the output: byte `p` of the stream is always XORed with keystream
/// byte `p % 16` of block `p / 16`.
#[derive(Clone)]
pub struct CtrStream {
    schedule: KeySchedule,
    params: CtrParams,
    kernel: KernelFn,
    pos: u64,
}

impl CtrStream {
    /// Create a stream using the fastest supported backend.
    #[must_use]
    pub fn new(key: &[u8; KEY_SIZE], params: CtrParams) -> Self {
        Self {
            schedule: KeySchedule::expand(key),
            params,
            kernel: dispatcher::best_kernel(),
            pos: 0,
        }
    }

    /// Create a stream pinned to an explicit backend.
    ///
    /// # Errors
    /// Returns [`CpuFeatureError`] if the backend's hardware precondition
    /// does not hold on this host.
    pub fn with_backend(
        key: &[u8; KEY_SIZE],
        params: CtrParams,
        backend: Backend,
    ) -> Result<Self, CpuFeatureError> {
        Ok(Self {
            schedule: KeySchedule::expand(key),
            params,
            kernel: dispatcher::kernel_for(backend)?,
            pos: 0,
        })
    }

    /// XOR the keystream at the current position into `buf`, in place, and
    /// advance the position by `buf.len()` bytes.
    pub fn apply_keystream(&mut self, buf: &mut [u8]) {
        let mut buf = buf;

        // Unaligned head: the position sits mid-block, so the first bytes
        // consume the tail of that block's keystream.
        let offset = (self.pos % BLOCK_SIZE as u64) as usize;
        if offset != 0 && !buf.is_empty() {
            let block = counter_block(&self.params, self.pos / BLOCK_SIZE as u64);
            let keystream = portable::encrypt_block(&self.schedule, &block);
            let take = buf.len().min(BLOCK_SIZE - offset);
            let (head, rest) = buf.split_at_mut(take);
            for (b, k) in head.iter_mut().zip(keystream[offset..].iter()) {
                *b ^= k;
            }
            self.pos = self.pos.wrapping_add(take as u64);
            buf = rest;
        }

        if buf.is_empty() {
            return;
        }

        (self.kernel)(
            &self.schedule,
            &self.params,
            self.pos / BLOCK_SIZE as u64,
            buf,
        );
        self.pos = self.pos.wrapping_add(buf.len() as u64);
    }

    /// Move to an absolute byte position in the keystream.
    pub fn seek(&mut self, pos: u64) {
        self.pos = pos;
    }

    /// Current absolute byte position in the keystream.
    #[must_use]
    pub const fn position(&self) -> u64 {
        self.pos
    }

    /// Apply the keystream across multiple lanes (thread-parallel when the
    /// `multithread` feature is enabled). Position advances as with
    /// [`apply_keystream`]; the output is identical for every lane count.
    pub fn apply_keystream_parallel(&mut self, buf: &mut [u8], lanes: usize) {
        let mut buf = buf;

        // Mid-block position: settle the head first, then fan out.
        let offset = (self.pos % BLOCK_SIZE as u64) as usize;
        if offset != 0 && !buf.is_empty() {
            let take = buf.len().min(BLOCK_SIZE - offset);
            let (head, rest) = buf.split_at_mut(take);
            self.apply_keystream(head);
            buf = rest;
        }

        if buf.is_empty() {
            return;
        }

        parallel::run(
            self.kernel,
            &self.schedule,
            &self.params,
            self.pos / BLOCK_SIZE as u64,
            buf,
            lanes,
        );
        self.pos = self.pos.wrapping_add(buf.len() as u64);
    }
}
