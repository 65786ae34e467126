//! Work Partitioner
//!
//! Splits a block range into contiguous, disjoint per-lane sub-ranges and
//! dispatches them. Lanes share only the read-only key schedule; each lane
//! owns its output sub-slice outright, so the hot path needs no locks and no
//! atomics. The only synchronization point is the implicit join at the end
//! of dispatch.

#![allow(clippy::cast_possible_truncation)]

use crate::ctr::CtrParams;
use crate::kernels::constants::BLOCK_SIZE;
use crate::schedule::KeySchedule;
use crate::types::KernelFn;

/// Preferred bytes per lane before it is worth fanning out to more threads
/// (256 KB, L2-cache friendly).
pub const LANE_CHUNK: usize = 256 * 1024;

// =============================================================================
// PARTITIONING
// =============================================================================

/// Blocks assigned to lane `lane` out of `lanes`, for `total` blocks:
/// `total / lanes` each, with the remainder spread one block at a time over
/// the leading lanes.
fn lane_blocks(total: u64, lanes: u64, lane: u64) -> u64 {
    total / lanes + u64::from(lane < total % lanes)
}

/// A lane's unit of work: a global start index plus the exclusive slice it
/// writes. Handing the slice to the lane transfers ownership of that output
/// region; no two tasks overlap.
#[cfg(feature = "multithread")]
struct LaneTask<'a> {
    start_block: u64,
    buf: &'a mut [u8],
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Run `kernel` over `buf` across `lanes` independent lanes.
///
/// Output is byte-identical for every lane count: each lane derives its
/// counter blocks from global indices, never from a locally incremented
/// counter.
pub fn run(
    kernel: KernelFn,
    schedule: &KeySchedule,
    params: &CtrParams,
    base_block: u64,
    buf: &mut [u8],
    lanes: usize,
) {
    let lanes = lanes.max(1) as u64;
    let total_blocks = (buf.len() as u64).div_ceil(BLOCK_SIZE as u64);

    if lanes <= 1 || total_blocks <= 1 {
        kernel(schedule, params, base_block, buf);
        return;
    }

    #[cfg(feature = "multithread")]
    {
        use rayon::prelude::*;

        let mut tasks = Vec::with_capacity(lanes as usize);
        let mut rest = buf;
        let mut start_block = base_block;
        for lane in 0..lanes {
            let blocks = lane_blocks(total_blocks, lanes, lane);
            if blocks == 0 {
                break;
            }
            let bytes = rest.len().min(blocks as usize * BLOCK_SIZE);
            let (head, tail) = rest.split_at_mut(bytes);
            tasks.push(LaneTask {
                start_block,
                buf: head,
            });
            rest = tail;
            start_block = start_block.wrapping_add(blocks);
        }

        tasks
            .into_par_iter()
            .for_each(|task| kernel(schedule, params, task.start_block, task.buf));
    }

    #[cfg(not(feature = "multithread"))]
    {
        // Same partition, run serially; the output must not depend on which
        // topology executed it.
        let mut rest = buf;
        let mut start_block = base_block;
        for lane in 0..lanes {
            let blocks = lane_blocks(total_blocks, lanes, lane);
            if blocks == 0 {
                break;
            }
            let bytes = rest.len().min(blocks as usize * BLOCK_SIZE);
            let (head, tail) = rest.split_at_mut(bytes);
            kernel(schedule, params, start_block, head);
            rest = tail;
            start_block = start_block.wrapping_add(blocks);
        }
    }
}

/// Lane count for auto-dispatch: one lane per `LANE_CHUNK` bytes, capped at
/// the thread-pool width.
#[must_use]
pub fn default_lanes(len: usize) -> usize {
    #[cfg(feature = "multithread")]
    {
        let wanted = len.div_ceil(LANE_CHUNK).max(1);
        wanted.min(rayon::current_num_threads())
    }
    #[cfg(not(feature = "multithread"))]
    {
        let _ = len;
        1
    }
}
