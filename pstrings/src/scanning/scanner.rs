//! Printable-run detection
//!
//! A region is scanned as a sequence of chunks. The run that is still open
//! when a chunk ends is carried in [`ScanState`] and continued by the next
//! chunk, so chunking never splits a string. [`finish`] closes the run at the
//! end of the region (or wherever the address stream stops being contiguous).
//!
//! The scanner reports every maximal run; length and density limits are the
//! quality filter's job.

use super::charset::ByteClass;

/// A maximal run of printable bytes at an absolute address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run<'a> {
    pub address: u64,
    pub bytes: &'a [u8],
}

/// Run-in-progress carried from one chunk to the next
///
/// Holds the start address of the open run and the bytes seen so far in
/// earlier chunks. Empty between runs.
#[derive(Debug, Default)]
pub struct ScanState {
    start: u64,
    carried: Vec<u8>,
}

impl ScanState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Scan one chunk whose first byte lives at `base`.
///
/// Every run closed by a non-printable byte in this chunk is passed to
/// `on_run`, in address order. A run reaching the end of the chunk is kept
/// open in `state`.
///
/// The open run is copied into `state` as it grows and has no size limit:
/// a region that is printable from end to end is carried whole, however
/// many transfers it spans.
pub fn scan_chunk<F>(chunk: &[u8], base: u64, state: &mut ScanState, class: &ByteClass, mut on_run: F)
where
    F: FnMut(Run<'_>),
{
    // Offset where the run inside this chunk began
    let mut run_begin: Option<usize> = if state.carried.is_empty() { None } else { Some(0) };

    for (offset, &byte) in chunk.iter().enumerate() {
        if class.is_printable(byte) {
            if run_begin.is_none() {
                run_begin = Some(offset);
            }
            continue;
        }

        let Some(begin) = run_begin.take() else {
            continue;
        };

        if state.carried.is_empty() {
            on_run(Run { address: base + begin as u64, bytes: &chunk[begin..offset] });
        } else {
            state.carried.extend_from_slice(&chunk[begin..offset]);
            on_run(Run { address: state.start, bytes: &state.carried });
            state.carried.clear();
        }
    }

    if let Some(begin) = run_begin {
        if state.carried.is_empty() {
            state.start = base + begin as u64;
        }
        state.carried.extend_from_slice(&chunk[begin..]);
    }
}

/// Close the open run, as if a non-printable byte followed the last chunk.
pub fn finish<F>(state: &mut ScanState, mut on_run: F)
where
    F: FnMut(Run<'_>),
{
    if !state.carried.is_empty() {
        on_run(Run { address: state.start, bytes: &state.carried });
        state.carried.clear();
    }
}
