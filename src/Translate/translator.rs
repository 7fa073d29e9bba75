// Cross-encoding translator.
//
// `call_proc_a_to_w` and `call_proc_w_to_a` look the message up in the shape
// table and hand it to the branch for its text policy. Branches live in
// a_to_w.rs and w_to_a.rs; each one acquires its scratch buffer, invokes the
// callback at most the number of times its policy allows, writes results back
// into the caller's buffers and lets the scratch buffer drop.

use super::host::WindowHost;
use super::proc::ProcCallback;
use crate::Core::codepage::Codepage;
use crate::Core::error::{MarshalError, Result};
use crate::Core::stats::STATS;
use crate::Message::descriptor::{lookup, MessageDescriptor, TextPolicy};
use crate::Message::ids::*;
use crate::Message::{Hwnd, LParam, LResult, WParam};
use std::sync::Arc;

/// How narrow `WM_CHAR` bytes become wide characters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CharMapping {
    /// Lead bytes are held per thread until the character is complete.
    #[default]
    Buffered,
    /// Every byte is converted on its own.
    NoMapping,
}

/// Translates message parameters between the narrow and wide encodings.
pub struct Translator {
    pub(crate) codepage: Arc<dyn Codepage>,
    pub(crate) input_codepage: Arc<dyn Codepage>,
    pub(crate) host: Arc<dyn WindowHost>,
}

/// One message on its way to a callback.
pub(crate) struct Invocation<'a> {
    callback: &'a mut dyn ProcCallback,
    pub(crate) hwnd: Hwnd,
    pub(crate) msg: u32,
    pub(crate) wparam: WParam,
    pub(crate) lparam: LParam,
    pub(crate) result: &'a mut LResult,
}

impl Invocation<'_> {
    /// Deliver the parameters unchanged.
    pub(crate) fn forward(&mut self) -> LResult {
        self.call_with(self.wparam, self.lparam)
    }

    /// Deliver the message with substituted parameters.
    pub(crate) fn call_with(&mut self, wparam: WParam, lparam: LParam) -> LResult {
        self.callback
            .call(self.hwnd, self.msg, wparam, lparam, self.result)
    }

    /// Deliver a different message through the same callback; its result
    /// goes to `result` rather than the caller's.
    pub(crate) fn call_other(
        &mut self,
        msg: u32,
        wparam: WParam,
        lparam: LParam,
        result: &mut LResult,
    ) -> LResult {
        self.callback.call(self.hwnd, msg, wparam, lparam, result)
    }
}

/// Bytes needed for `units` code units of `unit_size` bytes each.
pub(crate) fn scratch_bytes(units: usize, unit_size: usize) -> Result<usize> {
    units
        .checked_mul(unit_size)
        .ok_or(MarshalError::Allocation {
            requested: usize::MAX,
        })
}

/// Non-negative result as a count, negative results as zero.
pub(crate) fn result_len(result: LResult) -> usize {
    usize::try_from(result).unwrap_or(0)
}

/// Record a writeback that did not fit.
pub(crate) fn note_truncation(needed: usize, written: usize) {
    if needed > written {
        STATS.record_truncation();
    }
}

impl Translator {
    pub fn new(
        codepage: Arc<dyn Codepage>,
        input_codepage: Arc<dyn Codepage>,
        host: Arc<dyn WindowHost>,
    ) -> Self {
        Self {
            codepage,
            input_codepage,
            host,
        }
    }

    /// Codepage used for strings.
    pub fn codepage(&self) -> &dyn Codepage {
        &*self.codepage
    }

    /// Codepage used for character messages.
    pub fn input_codepage(&self) -> &dyn Codepage {
        &*self.input_codepage
    }

    pub fn host(&self) -> &dyn WindowHost {
        &*self.host
    }

    /// Deliver a narrow message to a wide callback.
    ///
    /// # Safety
    /// Pointer parameters must be valid for the message kind: strings
    /// NUL-terminated, output buffers at least as large as the capacity the
    /// message declares, records fully readable.
    #[allow(clippy::too_many_arguments)]
    pub unsafe fn call_proc_a_to_w(
        &self,
        callback: &mut dyn ProcCallback,
        hwnd: Hwnd,
        msg: u32,
        wparam: WParam,
        lparam: LParam,
        result: &mut LResult,
        mapping: CharMapping,
    ) -> LResult {
        let desc = lookup(msg);
        log::trace!(
            target: "msg",
            "A->W (hwnd={:#x},msg={},wp={:08x},lp={:08x})",
            hwnd.0,
            desc.name,
            wparam,
            lparam
        );

        let mut call = Invocation {
            callback,
            hwnd,
            msg,
            wparam,
            lparam,
            result,
        };
        let outcome = match desc.text {
            TextPolicy::Opaque => Ok(call.forward()),
            TextPolicy::CreateStruct => self.create_struct_a_to_w(&mut call),
            TextPolicy::MdiCreateStruct => self.mdi_create_struct_a_to_w(&mut call),
            TextPolicy::InputString { list } => self.input_string_a_to_w(&mut call, list),
            TextPolicy::OutputText => self.output_text_a_to_w(&mut call),
            TextPolicy::ListOutputText => Ok(self.list_output_text_a_to_w(&mut call)),
            TextPolicy::TextLength { get_text } => self.text_length_a_to_w(&mut call, get_text),
            TextPolicy::GetLine => self.get_line_a_to_w(&mut call),
            TextPolicy::DialogCode => Ok(self.dialog_code_a_to_w(&mut call)),
            TextPolicy::Char(kind) => Ok(self.char_a_to_w(&mut call, kind, mapping)),
            TextPolicy::Unsupported => Ok(self.unsupported(&desc)),
        };
        outcome.unwrap_or_else(|err| self.skipped(&desc, err))
    }

    /// Deliver a wide message to a narrow callback.
    ///
    /// # Safety
    /// As [`Translator::call_proc_a_to_w`].
    pub unsafe fn call_proc_w_to_a(
        &self,
        callback: &mut dyn ProcCallback,
        hwnd: Hwnd,
        msg: u32,
        wparam: WParam,
        lparam: LParam,
        result: &mut LResult,
    ) -> LResult {
        let desc = lookup(msg);
        log::trace!(
            target: "msg",
            "W->A (hwnd={:#x},msg={},wp={:08x},lp={:08x})",
            hwnd.0,
            desc.name,
            wparam,
            lparam
        );

        let mut call = Invocation {
            callback,
            hwnd,
            msg,
            wparam,
            lparam,
            result,
        };
        let outcome = match desc.text {
            TextPolicy::Opaque => Ok(call.forward()),
            TextPolicy::CreateStruct => self.create_struct_w_to_a(&mut call),
            TextPolicy::MdiCreateStruct => self.mdi_create_struct_w_to_a(&mut call),
            TextPolicy::InputString { list } => self.input_string_w_to_a(&mut call, list),
            TextPolicy::OutputText => self.output_text_w_to_a(&mut call),
            TextPolicy::ListOutputText => Ok(self.list_output_text_w_to_a(&mut call)),
            TextPolicy::TextLength { get_text } => self.text_length_w_to_a(&mut call, get_text),
            TextPolicy::GetLine => self.get_line_w_to_a(&mut call),
            TextPolicy::DialogCode => Ok(self.dialog_code_w_to_a(&mut call)),
            TextPolicy::Char(kind) => Ok(self.char_w_to_a(&mut call, kind)),
            TextPolicy::Unsupported => Ok(self.unsupported(&desc)),
        };
        outcome.unwrap_or_else(|err| self.skipped(&desc, err))
    }

    /// Whether a list or combo box message carries a string pointer, which
    /// depends on the control's owner-draw and has-strings styles.
    pub(crate) fn list_has_strings(&self, hwnd: Hwnd, msg: u32) -> bool {
        let style = self.host.style(hwnd);
        if msg <= CB_MSGMAX {
            style & (CBS_OWNERDRAWFIXED | CBS_OWNERDRAWVARIABLE) == 0 || style & CBS_HASSTRINGS != 0
        } else {
            style & (LBS_OWNERDRAWFIXED | LBS_OWNERDRAWVARIABLE) == 0 || style & LBS_HASSTRINGS != 0
        }
    }

    fn unsupported(&self, desc: &MessageDescriptor) -> LResult {
        STATS.record_unsupported();
        log::warn!(
            "message {} ({:#06x}) needs translation, please report",
            desc.name,
            desc.id
        );
        0
    }

    fn skipped(&self, desc: &MessageDescriptor, err: MarshalError) -> LResult {
        log::debug!(target: "msg", "{} not delivered: {err}", desc.name);
        0
    }
}
