#![cfg(not(feature = "enable"))]

use std::sync::atomic::{AtomicUsize, Ordering};

use serialtrace::Port;

static WRITES: AtomicUsize = AtomicUsize::new(0);

struct Counting;

impl Port for Counting {
    fn begin(&mut self, _baud: u32) {}

    fn is_ready(&mut self) -> bool {
        true
    }

    fn write_str(&mut self, _s: &str) {
        WRITES.fetch_add(1, Ordering::SeqCst);
    }

    fn flush(&mut self) {
        WRITES.fetch_add(1, Ordering::SeqCst);
    }
}

#[serialtrace::traced(exit)]
fn untouched(v: u8) -> u8 {
    v + 1
}

#[test]
fn macros_compile_to_nothing() {
    serialtrace::install(Box::leak(Box::new(Counting)));

    let x = 7;
    serialtrace::trace!();
    serialtrace::debug!("x is {}", x);
    serialtrace::dump!(x, x + 1);
    serialtrace::throw!("boom");
    serialtrace::throw_dump!("boom", x);
    serialtrace::serial_print!("raw");
    serialtrace::serial_println!("raw");
    assert_eq!(untouched(1), 2);

    assert_eq!(WRITES.load(Ordering::SeqCst), 0);
    assert!(!serialtrace::config::ENABLED);
}
