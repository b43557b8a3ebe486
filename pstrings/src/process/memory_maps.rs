//! Region enumeration from `/proc/<pid>/maps`
//!
//! Line format: `start-end perms offset dev inode [pathname]`, e.g.
//!
//! ```text
//! 7f3c1a000000-7f3c1a021000 rw-p 00000000 00:00 0
//! 7f3c1b2d4000-7f3c1b2d8000 rw-p 001d4000 08:01 1314 /usr/lib/libc.so.6
//! ```
//!
//! The file belongs to the kernel and can change while it is read. Lines
//! without a hex range and permission token are treated as absent rather
//! than as errors.

use std::io::BufRead;

use log::warn;

use crate::config::PermissionPattern;
use crate::domain::{Pid, Region, ANON_LABEL};

/// Number of fields before the pathname.
const FIELDS_BEFORE_PATH: usize = 5;

/// Parse one map line. Returns `None` for lines that do not carry a usable
/// `start-end perms` prefix.
#[must_use]
pub fn parse_region_line(line: &[u8]) -> Option<Region> {
    let mut fields = line.split(u8::is_ascii_whitespace).filter(|field| !field.is_empty());
    let (start, end) = std::str::from_utf8(fields.next()?).ok()?.split_once('-')?;
    let start = u64::from_str_radix(start, 16).ok()?;
    let end = u64::from_str_radix(end, 16).ok()?;
    let perms = std::str::from_utf8(fields.next()?).ok()?;

    if start >= end {
        return None;
    }

    Some(Region {
        start,
        end,
        perms: perms.to_string(),
        label: label_field(line),
    })
}

fn is_blank(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t')
}

fn skip_blanks(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| !is_blank(*b)).unwrap_or(bytes.len());
    &bytes[start..]
}

/// Everything after the fifth field, without the line terminator.
fn label_field(line: &[u8]) -> Vec<u8> {
    let mut rest = skip_blanks(line);
    for _ in 0..FIELDS_BEFORE_PATH {
        let field_end = rest.iter().position(|b| is_blank(*b)).unwrap_or(rest.len());
        rest = skip_blanks(&rest[field_end..]);
    }

    let end = rest.iter().rposition(|b| !matches!(b, b'\n' | b'\r')).map_or(0, |last| last + 1);
    if end == 0 {
        ANON_LABEL.to_vec()
    } else {
        rest[..end].to_vec()
    }
}

/// Lazy, single-pass iterator over the regions selected by a permission
/// pattern
pub struct Regions<R> {
    reader: R,
    pid: Pid,
    pattern: PermissionPattern,
    line: Vec<u8>,
    skipped: usize,
    done: bool,
}

impl<R: BufRead> Regions<R> {
    pub fn new(reader: R, pid: Pid, pattern: PermissionPattern) -> Self {
        Self {
            reader,
            pid,
            pattern,
            line: Vec::new(),
            skipped: 0,
            done: false,
        }
    }

    /// Lines dropped so far because they did not parse.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<R: BufRead> Iterator for Regions<R> {
    type Item = Region;

    fn next(&mut self) -> Option<Region> {
        while !self.done {
            self.line.clear();
            match self.reader.read_until(b'\n', &mut self.line) {
                Ok(0) => self.done = true,
                Ok(_) => match parse_region_line(&self.line) {
                    Some(region) if self.pattern.matches(&region.perms) => return Some(region),
                    Some(_) => {}
                    None => self.skipped += 1,
                },
                Err(e) => {
                    warn!("Stopped reading memory map of process {}: {e}", self.pid);
                    self.done = true;
                }
            }
        }
        None
    }
}
