// Dispatch core.
//
// Received -> (unpacked) -> translated or direct -> invoked -> returned.
// The DPI context of the call is installed by a guard for the whole
// invocation, so it comes back on every path out, including unwinding.

use super::params::{DispatchBuilder, DispatchParams};
use super::reply::ReplyChannel;
use crate::Core::codepage::{self, Codepage, Utf8Codepage};
use crate::Core::error::{MarshalError, Result};
use crate::Core::thread_state::DpiContextGuard;
use crate::Message::descriptor::lookup;
use crate::Message::{Hwnd, LParam, LResult, WParam, WndProc};
use crate::Translate::{
    CharMapping, DialogProcCall, NullHost, ProcCallback, Translator, WindowHost, WindowProcCall,
};
use crate::Unpack::{unpack_message, MessageBuffer};
use std::mem::size_of;
use std::sync::Arc;

/// Buffer handed to the unpacker when a remote call brings no payload.
pub const PACKED_STACK_BYTES: usize = 128;

/// Entry point for delivering messages to window and dialog procedures.
pub struct Marshaler {
    pub(crate) translator: Translator,
}

/// Configures a [`Marshaler`]. Defaults to UTF-8 for strings and
/// characters and a host that knows no windows.
pub struct MarshalerBuilder {
    codepage: Arc<dyn Codepage>,
    input_codepage: Option<Arc<dyn Codepage>>,
    host: Arc<dyn WindowHost>,
}

impl Default for MarshalerBuilder {
    fn default() -> Self {
        Self {
            codepage: Arc::new(Utf8Codepage),
            input_codepage: None,
            host: Arc::new(NullHost),
        }
    }
}

impl MarshalerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Codepage for strings. Also used for characters unless
    /// [`with_input_codepage`](Self::with_input_codepage) is set.
    pub fn with_codepage(mut self, codepage: Arc<dyn Codepage>) -> Self {
        self.codepage = codepage;
        self
    }

    /// Select one of the built-in codepages by identifier.
    pub fn with_codepage_id(self, id: u32) -> Result<Self> {
        let codepage = codepage::by_id(id).ok_or(MarshalError::InvalidArgument("unknown codepage"))?;
        Ok(self.with_codepage(Arc::from(codepage)))
    }

    pub fn with_input_codepage(mut self, codepage: Arc<dyn Codepage>) -> Self {
        self.input_codepage = Some(codepage);
        self
    }

    pub fn with_host(mut self, host: Arc<dyn WindowHost>) -> Self {
        self.host = host;
        self
    }

    pub fn build(self) -> Marshaler {
        let input_codepage = self
            .input_codepage
            .unwrap_or_else(|| Arc::clone(&self.codepage));
        Marshaler {
            translator: Translator::new(self.codepage, input_codepage, self.host),
        }
    }
}

impl Marshaler {
    pub fn builder() -> MarshalerBuilder {
        MarshalerBuilder::new()
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Deliver `callback` the message, translating when the caller and the
    /// callback use different encodings. Returns the message result.
    ///
    /// # Safety
    /// Pointer parameters must be valid for the message kind, as for
    /// [`Translator::call_proc_a_to_w`].
    #[allow(clippy::too_many_arguments)]
    pub unsafe fn deliver(
        &self,
        callback: &mut dyn ProcCallback,
        hwnd: Hwnd,
        msg: u32,
        wparam: WParam,
        lparam: LParam,
        ansi: bool,
        ansi_dst: bool,
        mapping: CharMapping,
        result: &mut LResult,
    ) -> LResult {
        match (ansi, ansi_dst) {
            (true, false) => self
                .translator
                .call_proc_a_to_w(callback, hwnd, msg, wparam, lparam, result, mapping),
            (false, true) => self
                .translator
                .call_proc_w_to_a(callback, hwnd, msg, wparam, lparam, result),
            _ => callback.call(hwnd, msg, wparam, lparam, result),
        }
    }

    /// Run one call described by `params` and return its result.
    ///
    /// # Safety
    /// `params.procedure` must be sound to call, and pointer parameters must
    /// be valid for the message kind.
    pub unsafe fn dispatch(&self, params: &DispatchParams) -> LResult {
        let mut proc = WindowProcCall::new(params.procedure);
        self.dispatch_to(params, &mut proc)
    }

    /// As [`Marshaler::dispatch`], delivering to `callback` instead of
    /// `params.procedure`.
    ///
    /// # Safety
    /// Pointer parameters must be valid for the message kind.
    pub unsafe fn dispatch_to(
        &self,
        params: &DispatchParams,
        callback: &mut dyn ProcCallback,
    ) -> LResult {
        let _dpi = DpiContextGuard::enter(params.dpi_awareness);
        let mut result = 0;
        self.deliver(
            callback,
            params.hwnd,
            params.msg,
            params.wparam,
            params.lparam,
            params.ansi,
            params.ansi_dst,
            params.mapping,
            &mut result,
        );
        result
    }

    /// Run a call received from the transport and answer through `channel`.
    ///
    /// Remote calls that need unpacking are fixed up against `payload`
    /// first; if that fails the procedure is not called, nothing is sent
    /// and the error is returned. Unpacked messages whose kind carries its
    /// buffer back reply with the result followed by the buffer; everything
    /// else replies with the bare result.
    ///
    /// # Safety
    /// As [`Marshaler::dispatch`]. For local calls the pointer parameters
    /// must be valid in this process.
    pub unsafe fn call_packed(
        &self,
        params: &DispatchParams,
        payload: &[u8],
        channel: &mut dyn ReplyChannel,
    ) -> Result<()> {
        if params.is_local || !params.needs_unpack {
            if params.is_local && params.needs_unpack {
                log::debug!(
                    "local call to {} marked for unpacking; delivering as is",
                    lookup(params.msg).name
                );
            }
            channel.return_direct(self.dispatch(params));
            return Ok(());
        }

        let mut params = *params;
        let mut buffer = if payload.is_empty() {
            MessageBuffer::with_len(PACKED_STACK_BYTES)
        } else {
            MessageBuffer::from_bytes(payload)
        };
        unpack_message(
            params.hwnd,
            params.msg,
            &mut params.wparam,
            &mut params.lparam,
            &mut buffer,
            params.ansi,
        )?;

        let result = self.dispatch(&params);

        if lookup(params.msg).replies_with_buffer {
            let msg_size = if payload.is_empty() { 0 } else { buffer.len() };
            let mut reply = Vec::with_capacity(size_of::<LResult>() + msg_size);
            reply.extend_from_slice(&result.to_ne_bytes());
            reply.extend_from_slice(&buffer.as_bytes()[..msg_size]);
            channel.return_via_channel(&reply, true);
        } else {
            channel.return_direct(result);
        }
        Ok(())
    }

    /// Call a window procedure with narrow parameters.
    ///
    /// # Safety
    /// As [`Marshaler::dispatch`].
    pub unsafe fn call_window_proc_a(
        &self,
        proc: WndProc,
        proc_ansi: bool,
        hwnd: Hwnd,
        msg: u32,
        wparam: WParam,
        lparam: LParam,
    ) -> LResult {
        let params = DispatchBuilder::new(hwnd, msg, proc)
            .with_wparam(wparam)
            .with_lparam(lparam)
            .with_ansi(true)
            .with_ansi_dst(proc_ansi)
            .with_dpi_awareness(self.translator.host.dpi_awareness(hwnd))
            .build();
        self.dispatch(&params)
    }

    /// Call a window procedure with wide parameters.
    ///
    /// # Safety
    /// As [`Marshaler::dispatch`].
    pub unsafe fn call_window_proc_w(
        &self,
        proc: WndProc,
        proc_ansi: bool,
        hwnd: Hwnd,
        msg: u32,
        wparam: WParam,
        lparam: LParam,
    ) -> LResult {
        let params = DispatchBuilder::new(hwnd, msg, proc)
            .with_wparam(wparam)
            .with_lparam(lparam)
            .with_ansi(false)
            .with_ansi_dst(proc_ansi)
            .with_dpi_awareness(self.translator.host.dpi_awareness(hwnd))
            .build();
        self.dispatch(&params)
    }

    /// Call a dialog procedure with narrow parameters. Returns whether the
    /// procedure handled the message; the message result stays with the host.
    ///
    /// # Safety
    /// As [`Marshaler::dispatch`].
    pub unsafe fn call_dialog_proc_a(
        &self,
        proc: WndProc,
        proc_ansi: bool,
        hwnd: Hwnd,
        msg: u32,
        wparam: WParam,
        lparam: LParam,
    ) -> LResult {
        self.call_dialog_proc(proc, true, proc_ansi, hwnd, msg, wparam, lparam)
    }

    /// Call a dialog procedure with wide parameters.
    ///
    /// # Safety
    /// As [`Marshaler::dispatch`].
    pub unsafe fn call_dialog_proc_w(
        &self,
        proc: WndProc,
        proc_ansi: bool,
        hwnd: Hwnd,
        msg: u32,
        wparam: WParam,
        lparam: LParam,
    ) -> LResult {
        self.call_dialog_proc(proc, false, proc_ansi, hwnd, msg, wparam, lparam)
    }

    #[allow(clippy::too_many_arguments)]
    unsafe fn call_dialog_proc(
        &self,
        proc: WndProc,
        ansi: bool,
        proc_ansi: bool,
        hwnd: Hwnd,
        msg: u32,
        wparam: WParam,
        lparam: LParam,
    ) -> LResult {
        let mut result = 0;
        let mut dialog = DialogProcCall::new(proc, &*self.translator.host);
        self.deliver(
            &mut dialog,
            hwnd,
            msg,
            wparam,
            lparam,
            ansi,
            proc_ansi,
            CharMapping::default(),
            &mut result,
        )
    }
}
