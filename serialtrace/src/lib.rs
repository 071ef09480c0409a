#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub use serialtrace_core::{Location, Marker, PathMode, Payload, TraceRecord, LINE_ENDING};
pub use serialtrace_macros::traced;

pub mod config;
mod globals;
mod init;
mod location;
mod macros;
pub mod port;
mod tracer;

pub use globals::{uninstall, PortRef, PortSlot};
pub use init::{initialize, initialize_default, install};
#[cfg(feature = "std")]
pub use port::StdPort;
pub use port::{IoPort, Port};
pub use tracer::{emit, write_line, write_text, Tracer};

#[doc(hidden)]
pub mod __private {
    pub use crate::location::{function_path, type_name_of};
    pub use serialtrace_core::trim::trimmed_len;
    pub use serialtrace_core::TrimmedLiteral;
}
