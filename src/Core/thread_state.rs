// Per-thread state touched by a dispatch: the DPI awareness context and the
// lead bytes of a narrow character still waiting for its trail bytes.

use std::cell::{Cell, RefCell};

/// A DPI awareness context handle. The negative constants mirror the
/// pseudo-handles the windowing system hands out.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DpiAwarenessContext(pub isize);

impl DpiAwarenessContext {
    pub const UNAWARE: Self = Self(-1);
    pub const SYSTEM_AWARE: Self = Self(-2);
    pub const PER_MONITOR_AWARE: Self = Self(-3);
    pub const PER_MONITOR_AWARE_V2: Self = Self(-4);
    pub const UNAWARE_GDISCALED: Self = Self(-5);
}

impl Default for DpiAwarenessContext {
    fn default() -> Self {
        Self::UNAWARE
    }
}

thread_local! {
    static DPI_CONTEXT: Cell<DpiAwarenessContext> = const { Cell::new(DpiAwarenessContext::UNAWARE) };
    static PENDING_CHAR: RefCell<Vec<u8>> = const { RefCell::new(Vec::new()) };
}

/// Current thread's DPI awareness context.
pub fn thread_dpi_awareness_context() -> DpiAwarenessContext {
    DPI_CONTEXT.with(Cell::get)
}

/// Install `context` for the current thread, returning the previous one.
pub fn set_thread_dpi_awareness_context(context: DpiAwarenessContext) -> DpiAwarenessContext {
    DPI_CONTEXT.with(|c| c.replace(context))
}

/// Switches the thread DPI context for a scope.
///
/// The previous context comes back when the guard drops, which also happens
/// while unwinding out of a panicking window procedure.
#[must_use = "the previous context is restored when the guard drops"]
pub struct DpiContextGuard {
    previous: DpiAwarenessContext,
}

impl DpiContextGuard {
    pub fn enter(context: DpiAwarenessContext) -> Self {
        Self {
            previous: set_thread_dpi_awareness_context(context),
        }
    }

    /// Context that will be restored.
    pub fn previous(&self) -> DpiAwarenessContext {
        self.previous
    }
}

impl Drop for DpiContextGuard {
    fn drop(&mut self) {
        set_thread_dpi_awareness_context(self.previous);
    }
}

/// Append `byte` to the pending narrow character and return the whole
/// sequence once `needed(first_byte)` bytes have been collected. Returns
/// `None` while more bytes are expected.
pub(crate) fn push_pending_char(byte: u8, needed: impl Fn(u8) -> usize) -> Option<Vec<u8>> {
    PENDING_CHAR.with(|pending| {
        let mut pending = pending.borrow_mut();
        pending.push(byte);
        if pending.len() < needed(pending[0]) {
            return None;
        }
        Some(std::mem::take(&mut *pending))
    })
}

/// Drop any partially collected narrow character on this thread.
pub fn clear_pending_char() {
    PENDING_CHAR.with(|pending| pending.borrow_mut().clear());
}
