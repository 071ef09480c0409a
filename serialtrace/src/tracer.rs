use core::fmt::{self, Write};

use serialtrace_core::{Location, Marker, TraceRecord, LINE_ENDING};

use crate::globals::with_port;
use crate::port::PortWriter;

/// Writes `record` and a line terminator to the installed port, then flushes.
///
/// The port is held for the whole line, so a nested trace from a `Display`
/// impl or an interrupt handler is dropped instead of splitting it. Without
/// an installed port the record is dropped.
pub fn emit(record: &TraceRecord<'_>) {
    with_port(|port| {
        let _ = write!(PortWriter(&mut *port), "{}", record);
        port.write_str(LINE_ENDING);
        port.flush();
    });
}

/// Raw text, no location and no flush.
pub fn write_text(args: fmt::Arguments<'_>) {
    with_port(|port| {
        let _ = PortWriter(port).write_fmt(args);
    });
}

/// Raw text followed by a line terminator, no location and no flush.
pub fn write_line(args: fmt::Arguments<'_>) {
    with_port(|port| {
        let _ = PortWriter(&mut *port).write_fmt(args);
        port.write_str(LINE_ENDING);
    });
}

/// Entry/exit tracer planted by `#[traced]`.
///
/// Emits the entry trace on construction and, if asked, an `exit` trace from
/// the same location when dropped.
pub struct Tracer {
    exit: Option<(Marker, Location)>,
}

impl Tracer {
    pub fn enter(marker: Marker, location: Location, trace_exit: bool) -> Tracer {
        emit(&TraceRecord::here(marker, location));

        Tracer {
            exit: trace_exit.then_some((marker, location)),
        }
    }
}

impl Drop for Tracer {
    fn drop(&mut self) {
        if let Some((marker, location)) = self.exit {
            emit(&TraceRecord::labeled(marker, location, "exit", None));
        }
    }
}
