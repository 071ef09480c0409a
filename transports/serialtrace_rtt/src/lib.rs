#![no_std]
use rtt_target::UpChannel;
use serialtrace::{Port, PortSlot};

pub use rtt_target;

/// Trace output over an RTT up channel.
///
/// RTT has no line speed and no link state, so `begin` is ignored and the
/// port is always ready. Whether a full buffer blocks or drops is decided by
/// the channel mode.
pub struct RttPort {
    channel: UpChannel,
}

impl RttPort {
    pub fn new(channel: UpChannel) -> Self {
        RttPort { channel }
    }
}

impl Port for RttPort {
    fn begin(&mut self, _baud: u32) {}

    fn is_ready(&mut self) -> bool {
        true
    }

    fn write_str(&mut self, s: &str) {
        self.channel.write(s.as_bytes());
    }

    // Writes land in the target-side ring buffer directly; the probe drains it.
    fn flush(&mut self) {}
}

static RTT_PORT: PortSlot<RttPort> = PortSlot::new();

/// Makes `channel` the trace output. Later calls are ignored.
pub fn init(channel: UpChannel) {
    if let Some(port) = RTT_PORT.init(RttPort::new(channel)) {
        serialtrace::install(port);
    }
}
