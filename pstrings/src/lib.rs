//! # pstrings - Strings from the memory of running processes
//!
//! pstrings attaches to live processes with ptrace, walks the memory regions
//! listed in `/proc/<pid>/maps`, and prints the runs of printable bytes it
//! finds there, the way `strings(1)` does for files.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │     CLI      │──▶│  Attachment  │──▶│   Scanner    │──▶│   Emitter    │
//! │ (criteria)   │   │ maps + mem   │   │ runs across  │   │  annotated   │
//! │              │   │ 1 MiB chunks │   │   chunks     │   │   records    │
//! └──────────────┘   └──────────────┘   └──────┬───────┘   └──────────────┘
//!                                              │
//!                                       ┌──────▼───────┐
//!                                       │ QualityFilter│
//!                                       │ length/alnum │
//!                                       └──────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`cli`]: Command-line arguments and their conversion into criteria
//! - [`config`]: Selection criteria, permission patterns, annotations
//! - [`domain`]: Core types (Pid, Region) and error enums
//! - [`process`]: Tracing, region enumeration, chunked memory reads
//!   - `tracer`: the [`process::Tracer`] seam over ptrace and `/proc`
//!   - `attachment`: scoped attach guard, detaches exactly once
//!   - `memory_maps`: tolerant `/proc/<pid>/maps` parsing
//!   - `reader`: chunked reads that report short and failed transfers
//! - [`scanning`]: Byte classes, run detection, quality filtering
//! - [`output`]: Record formatting
//! - [`pipeline`]: Per-target orchestration and the run summary
//! - [`preflight`]: Hints for denied attaches (Yama, privileges)
//!
//! ## Typical Usage
//!
//! ```bash
//! # Strings from the writable, non-executable data of a process
//! sudo pstrings 1234
//!
//! # Everything, with pid, mapping and address on each line
//! sudo pstrings -a -pmo 1234
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod output;
pub mod pipeline;
pub mod preflight;
pub mod process;
pub mod scanning;
