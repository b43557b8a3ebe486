//! Structured error types for pstrings
//!
//! Using thiserror for automatic Display implementation and error chaining.
//! The variants follow how far a failure reaches: a `ConfigError` stops the
//! whole invocation, an `AttachError`/`ScanError` skips one target and a
//! `ReadError` skips one chunk.

use super::types::Pid;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("minimum length must be between 1 and {max}, got {value}")]
    InvalidMinLength { value: usize, max: usize },

    #[error("invalid alphanumeric percentage '{0}' (expected a number from 0 to 100)")]
    InvalidDensity(String),

    #[error("cannot set locale '{0}'")]
    UnknownLocale(String),

    #[error("invalid pid '{0}'")]
    InvalidPid(String),

    #[error("--all conflicts with --read-only and --executable")]
    ConflictingRegionFlags,
}

#[derive(Error, Debug)]
pub enum AttachError {
    #[error("permission denied attaching to process {pid}: {source}")]
    AttachDenied {
        pid: Pid,
        #[source]
        source: io::Error,
    },

    #[error("process {0} not found")]
    TargetNotFound(Pid),

    #[error("ptrace attach to process {pid} failed: {source}")]
    AttachFailed {
        pid: Pid,
        #[source]
        source: io::Error,
    },

    #[error("waiting for process {pid} to stop failed: {source}")]
    WaitFailed {
        pid: Pid,
        #[source]
        source: io::Error,
    },

    #[error("cannot open memory of process {pid}: {source}")]
    MemoryUnavailable {
        pid: Pid,
        #[source]
        source: io::Error,
    },
}

impl AttachError {
    /// Classify a failed attach request by its errno.
    #[must_use]
    pub fn from_attach(pid: Pid, source: io::Error) -> Self {
        match source.raw_os_error() {
            Some(libc::EPERM) => AttachError::AttachDenied { pid, source },
            Some(libc::ESRCH) => AttachError::TargetNotFound(pid),
            _ => AttachError::AttachFailed { pid, source },
        }
    }
}

/// A chunk of target memory that could not be read.
#[derive(Error, Debug)]
#[error("cannot read {start:x}-{end:x} of process {pid}: {source}")]
pub struct ReadError {
    pub pid: Pid,
    pub start: u64,
    pub end: u64,
    #[source]
    pub source: io::Error,
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error(transparent)]
    Attach(#[from] AttachError),

    #[error("cannot read memory map of process {pid}: {source}")]
    MapsUnavailable {
        pid: Pid,
        #[source]
        source: io::Error,
    },

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_error_classification() {
        let denied = AttachError::from_attach(Pid(7), io::Error::from_raw_os_error(libc::EPERM));
        assert!(matches!(denied, AttachError::AttachDenied { .. }));

        let missing = AttachError::from_attach(Pid(7), io::Error::from_raw_os_error(libc::ESRCH));
        assert!(matches!(missing, AttachError::TargetNotFound(Pid(7))));
        assert_eq!(missing.to_string(), "process 7 not found");

        let busy = AttachError::from_attach(Pid(7), io::Error::from_raw_os_error(libc::EBUSY));
        assert!(matches!(busy, AttachError::AttachFailed { pid: Pid(7), .. }));
    }

    #[test]
    fn test_read_error_display() {
        let err = ReadError {
            pid: Pid(99),
            start: 0x7f00_0000,
            end: 0x7f10_0000,
            source: io::Error::from_raw_os_error(libc::EIO),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("cannot read 7f000000-7f100000 of process 99"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidMinLength { value: 0, max: 1 << 20 };
        assert!(err.to_string().contains("between 1 and 1048576"));
    }
}
