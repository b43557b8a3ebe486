//! CLI argument definitions

use clap::Parser;

use crate::config::{Annotations, PermissionPattern, SelectionCriteria, DEFAULT_MIN_LENGTH};
use crate::domain::{ConfigError, Pid};
use crate::scanning::ByteClass;

#[derive(Parser, Debug)]
#[command(
    name = "pstrings",
    version,
    about = "Display strings in the memory of running processes",
    after_help = "\
The target is stopped (ptrace) while its memory is scanned.

EXAMPLES:
    sudo pstrings 1234                       Strings from writable data of PID 1234
    sudo pstrings -pmo 1234 5678             Prefix pid, mapping and address
    sudo pstrings -a -n 8 -f 60 1234         All mappings, 8+ chars, 60% alphanumeric"
)]
#[allow(clippy::struct_excessive_bools)]
pub struct Args {
    /// Process IDs to scan (decimal, 0x hex or 0 octal)
    #[arg(value_name = "PID", required = true)]
    pub pids: Vec<String>,

    /// Only display strings of at least this many characters
    #[arg(short = 'n', long, value_name = "MINLENGTH", default_value_t = DEFAULT_MIN_LENGTH)]
    pub min_length: usize,

    /// Include read-only mappings
    #[arg(short = 'r', long)]
    pub read_only: bool,

    /// Include executable mappings
    #[arg(short = 'x', long)]
    pub executable: bool,

    /// Include all mappings
    #[arg(short = 'a', long, conflicts_with_all = ["read_only", "executable"])]
    pub all: bool,

    /// Prefix each string with its address in the process
    #[arg(short = 'o', long)]
    pub address: bool,

    /// Prefix each string with the pid
    #[arg(short = 'p', long)]
    pub pid: bool,

    /// Prefix each string with the mapping name
    #[arg(short = 'm', long)]
    pub mapping: bool,

    /// Only display strings with at least PERCENT alphanumeric characters
    #[arg(short = 'f', long = "filter", value_name = "PERCENT")]
    pub density: Option<f64>,

    /// Use LOCALE to decide which bytes are printable (8-bit only)
    #[arg(short = 'l', long, value_name = "LOCALE")]
    pub locale: Option<String>,
}

impl Args {
    /// Selection criteria described by the flags.
    ///
    /// # Errors
    /// Any [`ConfigError`] from validating the values or loading the locale.
    pub fn selection(&self) -> Result<SelectionCriteria, ConfigError> {
        let permissions = PermissionPattern::from_flags(self.read_only, self.executable, self.all)?;
        let charset = match &self.locale {
            Some(name) => ByteClass::from_locale(name)?,
            None => ByteClass::ascii(),
        };

        SelectionCriteria::builder()
            .min_length(self.min_length)
            .permissions(permissions)
            .density(self.density)
            .charset(charset)
            .build()
    }

    #[must_use]
    pub fn annotations(&self) -> Annotations {
        Annotations { pid: self.pid, label: self.mapping, address: self.address }
    }

    /// Parse the target pids, in the order given.
    ///
    /// # Errors
    /// [`ConfigError::InvalidPid`] for the first malformed pid.
    pub fn targets(&self) -> Result<Vec<Pid>, ConfigError> {
        self.pids.iter().map(|pid| Pid::parse(pid)).collect()
    }
}
