//! Operating-system primitives for inspecting another process
//!
//! [`Tracer`] is the seam between the scan pipeline and the kernel. [`Ptrace`]
//! is the real implementation on top of `ptrace(2)`, `waitpid(2)` and the
//! `/proc/<pid>/{mem,maps}` files.

#![allow(unsafe_code)] // ptrace() and waitpid() are FFI

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::os::unix::fs::FileExt;

use crate::domain::Pid;

/// Positioned reads from a foreign address space
pub trait MemoryHandle {
    /// Read up to `buf.len()` bytes at absolute `address`.
    ///
    /// May return fewer bytes than requested, including zero.
    ///
    /// # Errors
    /// Any I/O error from the underlying read, e.g. `EIO` for unmapped pages.
    fn read_at(&self, buf: &mut [u8], address: u64) -> io::Result<usize>;
}

impl MemoryHandle for File {
    fn read_at(&self, buf: &mut [u8], address: u64) -> io::Result<usize> {
        FileExt::read_at(self, buf, address)
    }
}

/// Attach, stop, inspect and detach a target process
pub trait Tracer {
    type Memory: MemoryHandle;
    type Maps: BufRead;

    /// Request a debugger attach. The target is sent a stop.
    ///
    /// # Errors
    /// The OS error, with its errno intact for classification.
    fn attach(&self, pid: Pid) -> io::Result<()>;

    /// Block until the attached target has stopped.
    ///
    /// # Errors
    /// Fails if waiting fails or the target ended instead of stopping.
    fn wait_stopped(&self, pid: Pid) -> io::Result<()>;

    /// Open the target's memory for reading.
    ///
    /// # Errors
    /// Fails if the memory file cannot be opened.
    fn open_memory(&self, pid: Pid) -> io::Result<Self::Memory>;

    /// Open the textual region map of the target.
    ///
    /// # Errors
    /// Fails if the map file cannot be opened.
    fn open_maps(&self, pid: Pid) -> io::Result<Self::Maps>;

    /// Detach from the target, letting it continue.
    ///
    /// # Errors
    /// The OS error from the detach request.
    fn detach(&self, pid: Pid) -> io::Result<()>;
}

/// [`Tracer`] backed by `ptrace(2)` and procfs
#[derive(Debug, Clone, Copy, Default)]
pub struct Ptrace;

impl Tracer for Ptrace {
    type Memory = File;
    type Maps = BufReader<File>;

    fn attach(&self, pid: Pid) -> io::Result<()> {
        // SAFETY: PTRACE_ATTACH ignores the addr and data arguments.
        let rc = unsafe {
            libc::ptrace(
                libc::PTRACE_ATTACH,
                libc::pid_t::from(pid),
                std::ptr::null_mut::<libc::c_void>(),
                std::ptr::null_mut::<libc::c_void>(),
            )
        };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn wait_stopped(&self, pid: Pid) -> io::Result<()> {
        let mut status: libc::c_int = 0;
        loop {
            // SAFETY: `status` is a valid out-pointer for the duration of the call.
            let rc = unsafe { libc::waitpid(libc::pid_t::from(pid), &mut status, libc::__WALL) };
            if rc >= 0 {
                break;
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }

        if libc::WIFSTOPPED(status) {
            Ok(())
        } else {
            Err(io::Error::other(format!("process {pid} terminated instead of stopping")))
        }
    }

    fn open_memory(&self, pid: Pid) -> io::Result<File> {
        File::open(pid.proc_path("mem"))
    }

    fn open_maps(&self, pid: Pid) -> io::Result<BufReader<File>> {
        File::open(pid.proc_path("maps")).map(BufReader::new)
    }

    fn detach(&self, pid: Pid) -> io::Result<()> {
        // SAFETY: PTRACE_DETACH with a null data argument resumes without a signal.
        let rc = unsafe {
            libc::ptrace(
                libc::PTRACE_DETACH,
                libc::pid_t::from(pid),
                std::ptr::null_mut::<libc::c_void>(),
                std::ptr::null_mut::<libc::c_void>(),
            )
        };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}
