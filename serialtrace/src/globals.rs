use core::cell::{Cell, RefCell, UnsafeCell};
use core::mem::MaybeUninit;

use critical_section::Mutex;

use crate::port::Port;

pub type PortRef = &'static mut (dyn Port + Send);

struct Slot {
    port: Option<PortRef>,
    /// The port is checked out by a writer.
    busy: bool,
    /// `install`/`uninstall` ran while the port was checked out; the
    /// checked-out port is not put back.
    replaced: bool,
}

static PORT: Mutex<RefCell<Slot>> = Mutex::new(RefCell::new(Slot {
    port: None,
    busy: false,
    replaced: false,
}));

pub(crate) fn install(port: PortRef) -> Option<PortRef> {
    critical_section::with(|cs| {
        let mut slot = PORT.borrow_ref_mut(cs);
        let busy = slot.busy;
        slot.replaced |= busy;
        slot.port.replace(port)
    })
}

/// Detaches the global port, returning it. Tracing stays silent until a new
/// one is installed.
///
/// Called while a trace line is being written, the line still completes and
/// the port is detached afterwards. The port in use is not returned then.
pub fn uninstall() -> Option<PortRef> {
    critical_section::with(|cs| {
        let mut slot = PORT.borrow_ref_mut(cs);
        let busy = slot.busy;
        slot.replaced |= busy;
        slot.port.take()
    })
}

/// Returns a checked-out port to the slot, also on unwind.
struct Checkout {
    port: Option<PortRef>,
}

impl Drop for Checkout {
    fn drop(&mut self) {
        critical_section::with(|cs| {
            let mut slot = PORT.borrow_ref_mut(cs);
            slot.busy = false;
            if !core::mem::take(&mut slot.replaced) {
                slot.port = self.port.take();
            }
        })
    }
}

/// Runs `f` on the installed port.
///
/// The port is checked out under a short critical section and `f` runs with
/// interrupts enabled. Returns `None` when no port is installed, or when the
/// port is already checked out (a `Display` impl that traces itself, or an
/// interrupt handler tracing over the main loop).
pub(crate) fn with_port<R>(f: impl FnOnce(&mut dyn Port) -> R) -> Option<R> {
    let port = critical_section::with(|cs| {
        let mut slot = PORT.borrow_ref_mut(cs);
        if slot.busy {
            return None;
        }
        let port = slot.port.take()?;
        slot.busy = true;
        Some(port)
    })?;

    let mut checkout = Checkout { port: Some(port) };
    let port = checkout.port.as_mut()?;
    Some(f(&mut **port))
}

/// Single-assignment storage that gives a port the `'static` lifetime the
/// global slot requires, without an allocator.
///
/// ```ignore
/// static UART: PortSlot<IoPort<Uart0>> = PortSlot::new();
///
/// let port = UART.init(IoPort::new(uart)).unwrap();
/// serialtrace::initialize(port, 115_200);
/// ```
pub struct PortSlot<P> {
    taken: Mutex<Cell<bool>>,
    port: UnsafeCell<MaybeUninit<P>>,
}

// SAFETY: `port` is written once, guarded by `taken`, and only the single
// resulting `&'static mut` ever touches it afterwards.
unsafe impl<P: Send> Sync for PortSlot<P> {}

impl<P> PortSlot<P> {
    pub const fn new() -> Self {
        PortSlot {
            taken: Mutex::new(Cell::new(false)),
            port: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    /// Moves `port` into the slot. Returns `None` if the slot was already
    /// initialized, in which case `port` is dropped.
    pub fn init(&'static self, port: P) -> Option<&'static mut P> {
        let already_taken = critical_section::with(|cs| self.taken.borrow(cs).replace(true));
        if already_taken {
            return None;
        }

        // SAFETY: `taken` flipped from false to true above, exactly once.
        let slot = unsafe { &mut *self.port.get() };
        Some(slot.write(port))
    }
}

impl<P> Default for PortSlot<P> {
    fn default() -> Self {
        Self::new()
    }
}
