//! Scripted [`Tracer`] for tests
//!
//! Serves memory from in-process segments and a map from a string, records
//! every primitive call and memory read, and fails chosen steps with chosen errnos.

use std::cell::RefCell;
use std::io::{self, Cursor};
use std::rc::Rc;

use super::tracer::{MemoryHandle, Tracer};
use crate::domain::Pid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Attach,
    Wait,
    OpenMemory,
    OpenMaps,
    Detach,
}

type CallLog = Rc<RefCell<Vec<(Pid, &'static str)>>>;

pub struct MockTracer {
    segments: Rc<Vec<(u64, Vec<u8>)>>,
    unreadable: Vec<(u64, u64)>,
    maps: String,
    failures: Vec<(Option<Pid>, Step, i32)>,
    calls: CallLog,
}

impl MockTracer {
    /// Memory made of `(address, bytes)` segments, region map `maps`.
    pub fn new(segments: Vec<(u64, Vec<u8>)>, maps: &str) -> Self {
        Self {
            segments: Rc::new(segments),
            unreadable: Vec::new(),
            maps: maps.to_string(),
            failures: Vec::new(),
            calls: CallLog::default(),
        }
    }

    /// Fail `step` with `errno` for every target.
    pub fn failing(mut self, step: Step, errno: i32) -> Self {
        self.failures.push((None, step, errno));
        self
    }

    /// Fail `step` with `errno` for one target only.
    pub fn failing_for(mut self, pid: Pid, step: Step, errno: i32) -> Self {
        self.failures.push((Some(pid), step, errno));
        self
    }

    /// Reads starting inside `[start, end)` fail with `EIO`.
    pub fn unreadable(mut self, start: u64, end: u64) -> Self {
        self.unreadable.push((start, end));
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().iter().map(|(_, call)| *call).collect()
    }

    pub fn calls_for(&self, pid: Pid) -> Vec<&'static str> {
        self.calls.borrow().iter().filter(|(p, _)| *p == pid).map(|(_, call)| *call).collect()
    }

    pub fn detach_count(&self) -> usize {
        self.calls().iter().filter(|call| **call == "detach").count()
    }

    pub fn read_count(&self) -> usize {
        self.calls().iter().filter(|call| **call == "read").count()
    }

    fn step(&self, pid: Pid, step: Step, name: &'static str) -> io::Result<()> {
        self.calls.borrow_mut().push((pid, name));
        let failure = self
            .failures
            .iter()
            .find(|(target, s, _)| *s == step && target.map_or(true, |t| t == pid));
        match failure {
            Some((_, _, errno)) => Err(io::Error::from_raw_os_error(*errno)),
            None => Ok(()),
        }
    }
}

pub struct MockMemory {
    pid: Pid,
    segments: Rc<Vec<(u64, Vec<u8>)>>,
    unreadable: Vec<(u64, u64)>,
    calls: CallLog,
}

impl MemoryHandle for MockMemory {
    fn read_at(&self, buf: &mut [u8], address: u64) -> io::Result<usize> {
        self.calls.borrow_mut().push((self.pid, "read"));
        if self.unreadable.iter().any(|&(s, e)| address >= s && address < e) {
            return Err(io::Error::from_raw_os_error(libc::EIO));
        }

        // Copy the contiguous bytes available at `address`
        let Some((start, data)) = self
            .segments
            .iter()
            .find(|(start, data)| address >= *start && address < start + data.len() as u64)
        else {
            return Ok(0);
        };

        let offset = usize::try_from(address - start).unwrap_or(usize::MAX);
        let n = buf.len().min(data.len() - offset);
        buf[..n].copy_from_slice(&data[offset..offset + n]);
        Ok(n)
    }
}

impl Drop for MockMemory {
    fn drop(&mut self) {
        self.calls.borrow_mut().push((self.pid, "close_memory"));
    }
}

impl Tracer for MockTracer {
    type Memory = MockMemory;
    type Maps = Cursor<Vec<u8>>;

    fn attach(&self, pid: Pid) -> io::Result<()> {
        self.step(pid, Step::Attach, "attach")
    }

    fn wait_stopped(&self, pid: Pid) -> io::Result<()> {
        self.step(pid, Step::Wait, "wait")
    }

    fn open_memory(&self, pid: Pid) -> io::Result<MockMemory> {
        self.step(pid, Step::OpenMemory, "open_memory")?;
        Ok(MockMemory {
            pid,
            segments: Rc::clone(&self.segments),
            unreadable: self.unreadable.clone(),
            calls: Rc::clone(&self.calls),
        })
    }

    fn open_maps(&self, pid: Pid) -> io::Result<Cursor<Vec<u8>>> {
        self.step(pid, Step::OpenMaps, "open_maps")?;
        Ok(Cursor::new(self.maps.clone().into_bytes()))
    }

    fn detach(&self, pid: Pid) -> io::Result<()> {
        self.step(pid, Step::Detach, "detach")
    }
}
