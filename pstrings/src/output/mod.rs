//! Result stream formatting

pub mod emitter;

pub use emitter::{Emitter, OutputRecord};
