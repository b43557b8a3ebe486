//! Domain types providing compile-time safety and self-documentation

use std::fmt;

use super::errors::ConfigError;

/// Label given to regions that have no backing path in the map.
pub const ANON_LABEL: &[u8] = b"anon";

/// Process ID of a scan target
///
/// Always positive. Constructed from user input with [`Pid::parse`], which
/// accepts the same spellings as `strtoul(s, NULL, 0)`: decimal, `0x` hex
/// and leading-zero octal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pid(pub i32);

impl Pid {
    /// Parse a pid argument.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidPid`] for empty input, trailing garbage,
    /// zero, or values that do not fit a `pid_t`.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidPid(text.to_string());
        let trimmed = text.trim();

        let (digits, radix) = if let Some(hex) =
            trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X"))
        {
            (hex, 16)
        } else if trimmed.len() > 1 && trimmed.starts_with('0') {
            (&trimmed[1..], 8)
        } else {
            (trimmed, 10)
        };

        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return Err(invalid());
        }

        match i32::from_str_radix(digits, radix) {
            Ok(pid) if pid > 0 => Ok(Pid(pid)),
            _ => Err(invalid()),
        }
    }

    /// Path of a per-process file under `/proc`.
    #[must_use]
    pub fn proc_path(self, file: &str) -> String {
        format!("/proc/{}/{file}", self.0)
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Pid> for libc::pid_t {
    fn from(pid: Pid) -> Self {
        pid.0
    }
}

/// One mapping from `/proc/<pid>/maps`
///
/// A snapshot taken while the map was read. The target may remap memory
/// afterwards; reads against a stale region simply fail or come back short.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub start: u64,
    pub end: u64,
    /// Permission token as printed by the kernel, e.g. `rw-p`
    pub perms: String,
    /// Backing path, pseudo-path like `[heap]`, or [`ANON_LABEL`].
    ///
    /// Kept as the raw bytes of the map line: paths need not be UTF-8.
    pub label: Vec<u8>,
}

impl Region {
    #[must_use]
    pub fn size(&self) -> u64 {
        self.end - self.start
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:x}-{:x} {} {}",
            self.start,
            self.end,
            self.perms,
            String::from_utf8_lossy(&self.label)
        )
    }
}
