// Callback invocation.
//
// Every window procedure call in the crate goes through `ProcCallback`. The
// native shims below are the only places a raw `WndProc` is called.

use super::host::WindowHost;
use crate::Core::thread_state::DpiContextGuard;
use crate::Message::descriptor::message_name;
use crate::Message::{Hwnd, LParam, LResult, WParam, WndProc};

/// Target of a translated call.
///
/// `result` receives the message result; the return value is the
/// procedure's own return value. The two differ only for dialog procedures.
pub trait ProcCallback {
    fn call(
        &mut self,
        hwnd: Hwnd,
        msg: u32,
        wparam: WParam,
        lparam: LParam,
        result: &mut LResult,
    ) -> LResult;
}

impl<F> ProcCallback for F
where
    F: FnMut(Hwnd, u32, WParam, LParam, &mut LResult) -> LResult,
{
    fn call(
        &mut self,
        hwnd: Hwnd,
        msg: u32,
        wparam: WParam,
        lparam: LParam,
        result: &mut LResult,
    ) -> LResult {
        self(hwnd, msg, wparam, lparam, result)
    }
}

/// Calls a native window procedure.
#[derive(Copy, Clone)]
pub struct WindowProcCall {
    proc: WndProc,
}

impl WindowProcCall {
    /// # Safety
    /// `proc` must be sound to call with any parameters this layer passes,
    /// including pointers into scratch buffers valid only for the call.
    pub unsafe fn new(proc: WndProc) -> Self {
        Self { proc }
    }

    pub fn proc(&self) -> WndProc {
        self.proc
    }
}

impl ProcCallback for WindowProcCall {
    fn call(
        &mut self,
        hwnd: Hwnd,
        msg: u32,
        wparam: WParam,
        lparam: LParam,
        result: &mut LResult,
    ) -> LResult {
        log::trace!(
            target: "relay",
            "Call window proc {:p} (hwnd={:#x},msg={},wp={:08x},lp={:08x})",
            self.proc as *const (),
            hwnd.0,
            message_name(msg),
            wparam,
            lparam
        );

        // SAFETY: upheld by the contract of `WindowProcCall::new`.
        *result = unsafe { (self.proc)(hwnd, msg, wparam, lparam) };

        log::trace!(
            target: "relay",
            "Ret  window proc {:p} (hwnd={:#x},msg={},wp={:08x},lp={:08x}) retval={:08x}",
            self.proc as *const (),
            hwnd.0,
            message_name(msg),
            wparam,
            lparam,
            *result
        );
        *result
    }
}

/// Calls a native dialog procedure. The procedure returns whether it handled
/// the message; the message result is read back from the host.
pub struct DialogProcCall<'h> {
    proc: WndProc,
    host: &'h dyn WindowHost,
}

impl<'h> DialogProcCall<'h> {
    /// # Safety
    /// Same contract as [`WindowProcCall::new`].
    pub unsafe fn new(proc: WndProc, host: &'h dyn WindowHost) -> Self {
        Self { proc, host }
    }
}

impl ProcCallback for DialogProcCall<'_> {
    fn call(
        &mut self,
        hwnd: Hwnd,
        msg: u32,
        wparam: WParam,
        lparam: LParam,
        result: &mut LResult,
    ) -> LResult {
        log::trace!(
            target: "relay",
            "Call dialog proc {:p} (hwnd={:#x},msg={},wp={:08x},lp={:08x})",
            self.proc as *const (),
            hwnd.0,
            message_name(msg),
            wparam,
            lparam
        );

        let _dpi = DpiContextGuard::enter(self.host.dpi_awareness(hwnd));
        // SAFETY: upheld by the contract of `DialogProcCall::new`.
        let ret = unsafe { (self.proc)(hwnd, msg, wparam, lparam) };
        *result = self.host.dialog_result(hwnd);

        log::trace!(
            target: "relay",
            "Ret  dialog proc {:p} (hwnd={:#x},msg={}) retval={:08x} result={:08x}",
            self.proc as *const (),
            hwnd.0,
            message_name(msg),
            ret,
            *result
        );
        ret
    }
}
