#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod record;
pub mod trim;

#[cfg(feature = "std")]
pub mod trace_line;

pub use record::{Location, Marker, Payload, TraceRecord, LINE_ENDING};
pub use trim::{basename, trim, trimmed_len, PathMode, TrimmedLiteral};

/// Linker section holding trimmed file literals when `progmem` placement is on.
pub const LITERAL_SECTION_NAME: &str = ".serialtrace_strings";
