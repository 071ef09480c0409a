pub mod stream_parser;

pub use serialtrace_core::trace_line::TraceLine;
pub use stream_parser::{StreamItem, StreamParser};
