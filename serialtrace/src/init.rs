use crate::config;
use crate::globals::{self, PortRef};

/// Starts `port` at `baud`, waits for it to report ready, then makes it the
/// trace output.
///
/// The wait has no timeout: without a monitor attached it may spin forever.
/// Meant for the very start of an attended debugging session.
pub fn initialize(port: PortRef, baud: u32) {
    port.begin(baud);
    while !port.is_ready() {
        core::hint::spin_loop();
    }
    globals::install(port);
}

/// [`initialize`] at [`config::DEFAULT_BAUD`].
pub fn initialize_default(port: PortRef) {
    initialize(port, config::DEFAULT_BAUD);
}

/// Makes an already started `port` the trace output, returning the previous one.
pub fn install(port: PortRef) -> Option<PortRef> {
    globals::install(port)
}
