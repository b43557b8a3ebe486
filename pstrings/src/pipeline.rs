//! Attach-scan-filter-emit pipeline
//!
//! Targets are scanned one after another. For each target:
//!
//! ```text
//! Attachment::attach ─▶ regions (filtered) ─▶ read_region (chunks)
//!        │                                          │
//!        │                               scan_chunk / finish (runs)
//!        │                                          │
//!        │                            QualityFilter ─▶ Emitter
//!        ▼
//!   detach on drop
//! ```
//!
//! A failing target is recorded and skipped. A failing chunk is reported and
//! skipped. Only a broken output stream stops the whole run.

use std::io::{self, Write};
use std::ops::ControlFlow;

use log::{debug, error, info, warn};

use crate::config::SelectionCriteria;
use crate::domain::{AttachError, Pid, ScanError};
use crate::output::{Emitter, OutputRecord};
use crate::preflight;
use crate::process::{Attachment, ChunkEvent, Tracer};
use crate::scanning::{finish, scan_chunk, QualityFilter, Run, ScanState};

/// Counters for one scanned target
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TargetStats {
    pub regions: usize,
    pub chunks: usize,
    pub failed_reads: usize,
    pub short_reads: usize,
    pub bytes: u64,
    pub records: u64,
}

/// Outcome of a whole invocation
#[derive(Debug, Default)]
pub struct ScanSummary {
    pub scanned: Vec<(Pid, TargetStats)>,
    pub failed: Vec<(Pid, ScanError)>,
}

impl ScanSummary {
    /// True if every target was attached and scanned.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    #[must_use]
    pub fn records(&self) -> u64 {
        self.scanned.iter().map(|(_, stats)| stats.records).sum()
    }
}

/// Scan every target in order.
///
/// # Errors
/// Only output failures are returned; per-target failures are collected in
/// the summary.
pub fn scan_targets<T, W>(
    tracer: &T,
    criteria: &SelectionCriteria,
    targets: &[Pid],
    emitter: &mut Emitter<W>,
) -> io::Result<ScanSummary>
where
    T: Tracer,
    W: Write,
{
    let mut summary = ScanSummary::default();

    for &pid in targets {
        match scan_target(tracer, pid, criteria, emitter) {
            Ok(stats) => {
                info!(
                    "Process {pid}: {} regions, {} chunks ({} unreadable, {} short), {} bytes, {} strings",
                    stats.regions,
                    stats.chunks,
                    stats.failed_reads,
                    stats.short_reads,
                    stats.bytes,
                    stats.records
                );
                summary.scanned.push((pid, stats));
            }
            Err(ScanError::Output(e)) => return Err(e),
            Err(e) => {
                error!("{e}");
                if matches!(e, ScanError::Attach(AttachError::AttachDenied { .. })) {
                    if let Some(hint) = preflight::ptrace_denied_hint() {
                        error!("{hint}");
                    }
                }
                summary.failed.push((pid, e));
            }
        }
    }

    Ok(summary)
}

/// Attach to one target, emit its accepted strings and detach.
///
/// # Errors
/// [`ScanError::Attach`] or [`ScanError::MapsUnavailable`] if the target
/// cannot be inspected, [`ScanError::Output`] if writing fails. The target
/// is detached in every case.
pub fn scan_target<T, W>(
    tracer: &T,
    pid: Pid,
    criteria: &SelectionCriteria,
    emitter: &mut Emitter<W>,
) -> Result<TargetStats, ScanError>
where
    T: Tracer,
    W: Write,
{
    let mut attachment = Attachment::attach(tracer, pid)?;
    let mut regions = attachment.regions(criteria.permissions())?;

    let filter = QualityFilter::new(criteria);
    let charset = criteria.charset();
    let records_before = emitter.records();
    let mut stats = TargetStats::default();
    let mut state = ScanState::new();

    for region in regions.by_ref() {
        debug!("Scanning {region} ({} bytes) of process {pid}", region.size());
        stats.regions += 1;

        let mut sink = RegionSink {
            emitter: &mut *emitter,
            filter: &filter,
            pid,
            label: &region.label,
            written: Ok(()),
        };

        let read = attachment.read_region(&region, |event| {
            match event {
                ChunkEvent::Data { base, bytes, complete } => {
                    scan_chunk(bytes, base, &mut state, charset, |run| sink.push(run));
                    // Bytes after a short read were not obtained
                    if !complete {
                        finish(&mut state, |run| sink.push(run));
                    }
                }
                ChunkEvent::Empty { .. } => finish(&mut state, |run| sink.push(run)),
                ChunkEvent::Failed(err) => {
                    warn!("{err}");
                    finish(&mut state, |run| sink.push(run));
                }
            }
            sink.flow()
        });
        finish(&mut state, |run| sink.push(run));

        stats.chunks += read.chunks;
        stats.failed_reads += read.failed;
        stats.short_reads += read.short;
        stats.bytes += read.bytes;
        sink.written?;
    }

    if regions.skipped() > 0 {
        debug!("Skipped {} unparsable map lines of process {pid}", regions.skipped());
    }

    emitter.flush()?;
    attachment.release();

    stats.records = emitter.records() - records_before;
    Ok(stats)
}

/// Emits the accepted runs of one region and keeps the first write error.
struct RegionSink<'s, W: Write> {
    emitter: &'s mut Emitter<W>,
    filter: &'s QualityFilter<'s>,
    pid: Pid,
    label: &'s [u8],
    written: io::Result<()>,
}

impl<W: Write> RegionSink<'_, W> {
    fn push(&mut self, run: Run<'_>) {
        if self.written.is_ok() && self.filter.accept(run.bytes) {
            self.written = self.emitter.emit(&OutputRecord {
                pid: self.pid,
                label: self.label,
                address: run.address,
                bytes: run.bytes,
            });
        }
    }

    /// Stop reading once output is broken.
    fn flow(&self) -> ControlFlow<()> {
        if self.written.is_ok() {
            ControlFlow::Continue(())
        } else {
            ControlFlow::Break(())
        }
    }
}
