//! Output records
//!
//! One line per accepted string. Enabled annotations come first, each
//! followed by a colon, in the fixed order pid, mapping label, address:
//!
//! ```text
//! 4242:[heap]:55d0c1f5e010:GET /index.html HTTP/1.1
//! ```

use std::io::{self, Write};

use crate::config::Annotations;
use crate::domain::Pid;

/// An accepted run with its origin
#[derive(Debug, Clone, Copy)]
pub struct OutputRecord<'a> {
    pub pid: Pid,
    pub label: &'a [u8],
    pub address: u64,
    pub bytes: &'a [u8],
}

/// Writes [`OutputRecord`]s to a byte stream
pub struct Emitter<W: Write> {
    out: W,
    annotations: Annotations,
    records: u64,
}

impl<W: Write> Emitter<W> {
    pub fn new(out: W, annotations: Annotations) -> Self {
        Self { out, annotations, records: 0 }
    }

    /// Write one record.
    ///
    /// # Errors
    /// Any error from the underlying writer.
    pub fn emit(&mut self, record: &OutputRecord<'_>) -> io::Result<()> {
        if self.annotations.pid {
            write!(self.out, "{}:", record.pid)?;
        }
        if self.annotations.label {
            let label = record.label.split(|b| *b == b'\n').next().unwrap_or_default();
            self.out.write_all(label)?;
            self.out.write_all(b":")?;
        }
        if self.annotations.address {
            write!(self.out, "{:x}:", record.address)?;
        }
        self.out.write_all(record.bytes)?;
        self.out.write_all(b"\n")?;
        self.records += 1;
        Ok(())
    }

    /// Number of records written so far.
    #[must_use]
    pub fn records(&self) -> u64 {
        self.records
    }

    /// # Errors
    /// Any error from the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
