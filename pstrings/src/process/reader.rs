//! Chunked reads of a region's memory
//!
//! A region can be gigabytes large, so it is read in transfers of at most
//! [`TRANSFER_SIZE`] bytes into a reused buffer. Every transfer is reported
//! as one [`ChunkEvent`]. The cursor always advances by the requested
//! length, whatever the read returned, so later chunks keep their addresses.
//! The consumer can end the region early by breaking from its callback.

use std::ops::ControlFlow;

use crate::config::TRANSFER_SIZE;
use crate::domain::{Pid, ReadError, Region};

use super::tracer::MemoryHandle;

/// Outcome of one transfer
#[derive(Debug)]
pub enum ChunkEvent<'a> {
    /// Bytes read at `base`. `complete` is false for a short read, in which
    /// case the bytes after the returned data were not obtained.
    Data { base: u64, bytes: &'a [u8], complete: bool },
    /// The read returned nothing for `[base, base + len)`.
    Empty { base: u64, len: u64 },
    /// The read failed; the chunk is skipped.
    Failed(ReadError),
}

/// Per-region transfer counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReadStats {
    pub chunks: usize,
    pub bytes: u64,
    pub short: usize,
    pub failed: usize,
}

/// Read `region` chunk by chunk through `memory`, using `buffer` for
/// the transfers.
///
/// `buffer` is grown to [`TRANSFER_SIZE`] if it is smaller. Failed reads
/// are not retried. No further chunk is read once `on_chunk` returns
/// [`ControlFlow::Break`].
pub fn read_region<M, F>(
    memory: &M,
    buffer: &mut Vec<u8>,
    pid: Pid,
    region: &Region,
    mut on_chunk: F,
) -> ReadStats
where
    M: MemoryHandle + ?Sized,
    F: FnMut(ChunkEvent<'_>) -> ControlFlow<()>,
{
    if buffer.len() < TRANSFER_SIZE {
        buffer.resize(TRANSFER_SIZE, 0);
    }

    let mut stats = ReadStats::default();
    let mut cursor = region.start;

    while cursor < region.end {
        let len = (region.end - cursor).min(TRANSFER_SIZE as u64);
        #[allow(clippy::cast_possible_truncation)] // len <= TRANSFER_SIZE
        let dest = &mut buffer[..len as usize];

        stats.chunks += 1;
        let flow = match memory.read_at(dest, cursor) {
            Ok(0) => {
                stats.short += 1;
                on_chunk(ChunkEvent::Empty { base: cursor, len })
            }
            Ok(n) => {
                let complete = n as u64 == len;
                if !complete {
                    stats.short += 1;
                }
                stats.bytes += n as u64;
                on_chunk(ChunkEvent::Data { base: cursor, bytes: &dest[..n], complete })
            }
            Err(source) => {
                stats.failed += 1;
                on_chunk(ChunkEvent::Failed(ReadError {
                    pid,
                    start: cursor,
                    end: cursor + len,
                    source,
                }))
            }
        };

        if flow.is_break() {
            break;
        }
        cursor += len;
    }

    stats
}
