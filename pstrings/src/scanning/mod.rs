//! Turning raw memory into accepted strings
//!
//! - `charset`: which bytes are printable / alphanumeric (ASCII or a locale)
//! - `scanner`: maximal printable runs, carried across chunk boundaries
//! - `quality`: minimum length and alphanumeric density

pub mod charset;
pub mod quality;
pub mod scanner;

pub use charset::ByteClass;
pub use quality::QualityFilter;
pub use scanner::{finish, scan_chunk, Run, ScanState};
