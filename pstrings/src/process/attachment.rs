//! Scoped attachment to a target process
//!
//! An [`Attachment`] exists only while the target is traced and stopped.
//! Creating one performs the whole setup (attach, wait for the stop, open the
//! memory handle, allocate the transfer buffer) and undoes the steps already
//! taken if a later one fails. Dropping it closes the handle and detaches,
//! so every exit path of a scan, including `?` and panics, lets the target
//! run again.

use std::ops::ControlFlow;

use log::{debug, warn};

use crate::config::{PermissionPattern, TRANSFER_SIZE};
use crate::domain::{AttachError, Pid, Region, ScanError};

use super::memory_maps::Regions;
use super::reader::{read_region, ChunkEvent, ReadStats};
use super::tracer::Tracer;

/// A traced, stopped target with its memory open for reading
pub struct Attachment<'t, T: Tracer> {
    tracer: &'t T,
    pid: Pid,
    memory: Option<T::Memory>,
    buffer: Vec<u8>,
}

impl<'t, T: Tracer> Attachment<'t, T> {
    /// Attach to `pid` and wait until it has stopped.
    ///
    /// # Errors
    /// - [`AttachError::AttachDenied`] / [`AttachError::TargetNotFound`] /
    ///   [`AttachError::AttachFailed`] if the attach request fails; nothing
    ///   needs undoing then.
    /// - [`AttachError::WaitFailed`] or [`AttachError::MemoryUnavailable`]
    ///   after a successful attach; the target is detached before returning.
    pub fn attach(tracer: &'t T, pid: Pid) -> Result<Self, AttachError> {
        tracer.attach(pid).map_err(|source| AttachError::from_attach(pid, source))?;

        // From here on the guard owns the trace and detaches on early return
        let mut attachment = Self { tracer, pid, memory: None, buffer: Vec::new() };

        tracer
            .wait_stopped(pid)
            .map_err(|source| AttachError::WaitFailed { pid, source })?;

        let memory = tracer
            .open_memory(pid)
            .map_err(|source| AttachError::MemoryUnavailable { pid, source })?;

        attachment.memory = Some(memory);
        attachment.buffer = vec![0; TRANSFER_SIZE];
        debug!("Attached to process {pid}");
        Ok(attachment)
    }

    #[must_use]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Regions of the target whose permissions match `pattern`, in map order.
    ///
    /// # Errors
    /// [`ScanError::MapsUnavailable`] if the map cannot be opened.
    pub fn regions(&self, pattern: &PermissionPattern) -> Result<Regions<T::Maps>, ScanError> {
        let reader = self
            .tracer
            .open_maps(self.pid)
            .map_err(|source| ScanError::MapsUnavailable { pid: self.pid, source })?;
        Ok(Regions::new(reader, self.pid, pattern.clone()))
    }

    /// Stream the memory of `region` through `on_chunk` until the region
    /// ends or `on_chunk` breaks.
    pub fn read_region<F>(&mut self, region: &Region, on_chunk: F) -> ReadStats
    where
        F: FnMut(ChunkEvent<'_>) -> ControlFlow<()>,
    {
        match &self.memory {
            Some(memory) => read_region(memory, &mut self.buffer, self.pid, region, on_chunk),
            None => ReadStats::default(),
        }
    }

    /// Close the memory handle and detach. Equivalent to dropping the guard.
    pub fn release(self) {
        drop(self);
    }
}

impl<T: Tracer> Drop for Attachment<'_, T> {
    fn drop(&mut self) {
        // Handle first, then let the target continue
        drop(self.memory.take());
        match self.tracer.detach(self.pid) {
            Ok(()) => debug!("Detached from process {}", self.pid),
            Err(e) => warn!("Failed to detach from process {}: {e}", self.pid),
        }
    }
}
