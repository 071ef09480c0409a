use core::fmt;

/// A serial-like output stream trace lines are written to.
///
/// Implementations wrap whatever the target provides (a UART driver, an RTT
/// channel, stdout). Write failures are the implementation's business: the
/// tracer never retries or reports them.
pub trait Port {
    /// Starts the stream at `baud`. Transports without a line speed ignore it.
    fn begin(&mut self, baud: u32);

    /// Whether the other side is ready to receive.
    fn is_ready(&mut self) -> bool;

    fn write_str(&mut self, s: &str);

    /// Blocks until everything written so far has left the device.
    fn flush(&mut self);
}

/// [`Port`] over any blocking [`embedded_io::Write`], e.g. a HAL UART.
///
/// Baud rate is fixed when the peripheral is constructed, so `begin` does
/// nothing and the port always reports ready.
pub struct IoPort<W> {
    inner: W,
}

impl<W> IoPort<W> {
    pub const fn new(inner: W) -> Self {
        IoPort { inner }
    }

    pub fn inner_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: embedded_io::Write> Port for IoPort<W> {
    fn begin(&mut self, _baud: u32) {}

    fn is_ready(&mut self) -> bool {
        true
    }

    fn write_str(&mut self, s: &str) {
        let _ = self.inner.write_all(s.as_bytes());
    }

    fn flush(&mut self) {
        let _ = self.inner.flush();
    }
}

/// [`Port`] over a [`std::io::Write`], for host builds and simulators.
#[cfg(feature = "std")]
pub struct StdPort<W> {
    inner: W,
}

#[cfg(feature = "std")]
impl<W: std::io::Write> StdPort<W> {
    pub fn new(inner: W) -> Self {
        StdPort { inner }
    }
}

#[cfg(feature = "std")]
impl StdPort<std::io::Stderr> {
    pub fn stderr() -> Self {
        StdPort::new(std::io::stderr())
    }
}

#[cfg(feature = "std")]
impl<W: std::io::Write> Port for StdPort<W> {
    fn begin(&mut self, _baud: u32) {}

    fn is_ready(&mut self) -> bool {
        true
    }

    fn write_str(&mut self, s: &str) {
        let _ = self.inner.write_all(s.as_bytes());
    }

    fn flush(&mut self) {
        let _ = self.inner.flush();
    }
}

/// Lets `core::fmt` machinery render straight into a port.
pub(crate) struct PortWriter<'a>(pub(crate) &'a mut dyn Port);

impl fmt::Write for PortWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_str(s);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use core::convert::Infallible;

    #[derive(Default)]
    struct Sink {
        bytes: Vec<u8>,
        flushes: usize,
    }

    impl embedded_io::ErrorType for Sink {
        type Error = Infallible;
    }

    impl embedded_io::Write for Sink {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            self.bytes.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn io_port_forwards_writes_and_flushes() {
        let mut port = IoPort::new(Sink::default());
        port.begin(9600);
        assert!(port.is_ready());

        port.write_str("    main.c:42: loop");
        port.write_str("\r\n");
        port.flush();

        let sink = port.into_inner();
        assert_eq!(sink.bytes, b"    main.c:42: loop\r\n");
        assert_eq!(sink.flushes, 1);
    }

    #[test]
    fn port_writer_formats() {
        use core::fmt::Write;

        let mut port = IoPort::new(Sink::default());
        write!(PortWriter(&mut port), "x = {}", 7).unwrap();
        assert_eq!(port.inner_mut().bytes, b"x = 7");
    }
}
