//! Access to a foreign process
//!
//! - `tracer`: OS primitives (ptrace attach/detach, `/proc/<pid>/mem`, `/proc/<pid>/maps`)
//! - `attachment`: scoped attach that always detaches
//! - `memory_maps`: tolerant, permission-filtered region enumeration
//! - `reader`: bounded chunked reads of one region

pub mod attachment;
pub mod memory_maps;
pub mod reader;
pub mod tracer;

#[cfg(test)]
pub(crate) mod testing;

pub use attachment::Attachment;
pub use memory_maps::{parse_region_line, Regions};
pub use reader::{read_region, ChunkEvent, ReadStats};
pub use tracer::{MemoryHandle, Ptrace, Tracer};
