//! Single-byte character classification
//!
//! Decides which byte values count as "printable" and "alphanumeric". The
//! default matches the C locale. A named `LC_CTYPE` locale can widen the
//! printable set for 8-bit encodings such as `de_DE.ISO-8859-1`; the table is
//! sampled once and the process locale is restored afterwards, so scanning
//! never consults global state.

#![allow(unsafe_code)] // setlocale() and the ctype functions are FFI

use std::ffi::{CStr, CString};

use crate::domain::ConfigError;

const PRINT: u8 = 1 << 0;
const ALNUM: u8 = 1 << 1;

/// Lookup table with one class mask per byte value
#[derive(Clone, PartialEq, Eq)]
pub struct ByteClass {
    table: [u8; 256],
    locale: Option<String>,
}

impl ByteClass {
    /// ASCII classification: `0x20..=0x7e` printable, `[0-9A-Za-z]` alphanumeric.
    #[must_use]
    pub fn ascii() -> Self {
        let mut table = [0u8; 256];
        for byte in 0..=u8::MAX {
            let mut class = 0;
            if byte == b' ' || byte.is_ascii_graphic() {
                class |= PRINT;
            }
            if byte.is_ascii_alphanumeric() {
                class |= ALNUM;
            }
            table[usize::from(byte)] = class;
        }
        Self { table, locale: None }
    }

    /// Sample `isprint`/`isalnum` under the named `LC_CTYPE` locale.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownLocale`] if the C library cannot load it.
    pub fn from_locale(name: &str) -> Result<Self, ConfigError> {
        let unknown = || ConfigError::UnknownLocale(name.to_string());
        let requested = CString::new(name).map_err(|_| unknown())?;

        // SAFETY: a null locale pointer only queries the current setting. The
        // returned string is copied before any further setlocale call.
        let previous = unsafe {
            let current = libc::setlocale(libc::LC_CTYPE, std::ptr::null());
            (!current.is_null()).then(|| CStr::from_ptr(current).to_owned())
        };

        // SAFETY: `requested` is a valid NUL-terminated string.
        let applied = unsafe { libc::setlocale(libc::LC_CTYPE, requested.as_ptr()) };
        if applied.is_null() {
            return Err(unknown());
        }

        let mut table = [0u8; 256];
        for (value, class) in (0..).zip(table.iter_mut()) {
            // SAFETY: ctype functions accept every value representable as unsigned char.
            unsafe {
                if libc::isprint(value) != 0 {
                    *class |= PRINT;
                }
                if libc::isalnum(value) != 0 {
                    *class |= ALNUM;
                }
            }
        }

        if let Some(previous) = previous {
            // SAFETY: `previous` is the NUL-terminated name returned above.
            unsafe {
                libc::setlocale(libc::LC_CTYPE, previous.as_ptr());
            }
        }

        Ok(Self { table, locale: Some(name.to_string()) })
    }

    #[inline]
    #[must_use]
    pub fn is_printable(&self, byte: u8) -> bool {
        self.table[usize::from(byte)] & PRINT != 0
    }

    #[inline]
    #[must_use]
    pub fn is_alphanumeric(&self, byte: u8) -> bool {
        self.table[usize::from(byte)] & ALNUM != 0
    }

    /// Name of the locale the table was sampled from, `None` for ASCII.
    #[must_use]
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }
}

impl Default for ByteClass {
    fn default() -> Self {
        Self::ascii()
    }
}

impl std::fmt::Debug for ByteClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let printable = self.table.iter().filter(|c| *c & PRINT != 0).count();
        f.debug_struct("ByteClass")
            .field("locale", &self.locale.as_deref().unwrap_or("ascii"))
            .field("printable", &printable)
            .finish()
    }
}
