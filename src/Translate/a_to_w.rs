// Narrow caller, wide callback.

use super::chars::packed_narrow_bytes;
use super::strings::{narrow_with_nul, until_nul};
use super::translator::{
    note_truncation, result_len, scratch_bytes, CharMapping, Invocation, Translator,
};
use crate::Core::alloc::{ScratchBuffer, StackBuffer, SCRATCH_STATIC_BYTES};
use crate::Core::error::{MarshalError, Result};
use crate::Message::descriptor::CharKind;
use crate::Message::ids::{WM_GETTEXT, WS_EX_MDICHILD};
use crate::Message::layout::{
    hiword, is_int_resource, list_text_bytes, make_wparam, CreateStruct, MdiCreateStruct, Msg,
    LIST_TEXT_UNITS,
};
use crate::Message::{LParam, LResult, WParam};
use std::ffi::c_void;
use std::mem::size_of;
use std::slice;

const WIDE: usize = size_of::<u16>();

/// Narrow string behind `ptr`, or `None` for null and resource identifiers.
unsafe fn narrow_field<'a>(ptr: *const c_void) -> Option<&'a [u8]> {
    if is_int_resource(ptr) {
        None
    } else {
        Some(narrow_with_nul(ptr as *const u8))
    }
}

impl Translator {
    fn wide_len_of(&self, s: Option<&[u8]>) -> usize {
        s.map_or(0, |s| self.codepage.wide_len(s))
    }

    pub(crate) unsafe fn create_struct_a_to_w(&self, call: &mut Invocation<'_>) -> Result<LResult> {
        let src = &*(call.lparam as *const CreateStruct);
        let mut cs = *src;

        let class = narrow_field(src.class);
        let name = narrow_field(src.name);
        let class_len = self.wide_len_of(class);
        let name_len = self.wide_len_of(name);
        let total = class_len
            .checked_add(name_len)
            .ok_or(MarshalError::Allocation { requested: usize::MAX })?;

        let mut stack = StackBuffer::<SCRATCH_STATIC_BYTES>::new();
        let mut scratch = ScratchBuffer::acquire(&mut stack, scratch_bytes(total, WIDE)?)?;
        let (class_dst, rest) = scratch.as_wide_mut().split_at_mut(class_len);
        let name_dst = &mut rest[..name_len];

        if let Some(class) = class {
            self.codepage.to_wide(class_dst, class);
            cs.class = class_dst.as_ptr() as *const c_void;
        }
        if let Some(name) = name {
            self.codepage.to_wide(name_dst, name);
            cs.name = name_dst.as_ptr() as *const c_void;
        }

        let mut mdi_cs: MdiCreateStruct;
        if self.host.ex_style(call.hwnd) & WS_EX_MDICHILD != 0 && !src.create_params.is_null() {
            mdi_cs = *(src.create_params as *const MdiCreateStruct);
            mdi_cs.title = cs.name;
            mdi_cs.class = cs.class;
            cs.create_params = &mut mdi_cs as *mut MdiCreateStruct as *mut c_void;
        }

        Ok(call.call_with(call.wparam, &mut cs as *mut CreateStruct as LParam))
    }

    pub(crate) unsafe fn mdi_create_struct_a_to_w(
        &self,
        call: &mut Invocation<'_>,
    ) -> Result<LResult> {
        let src = &*(call.lparam as *const MdiCreateStruct);
        let mut cs = *src;

        let title = narrow_field(src.title);
        let class = narrow_field(src.class);
        let title_len = self.wide_len_of(title);
        let class_len = self.wide_len_of(class);
        let total = title_len
            .checked_add(class_len)
            .ok_or(MarshalError::Allocation { requested: usize::MAX })?;

        let mut stack = StackBuffer::<SCRATCH_STATIC_BYTES>::new();
        let mut scratch = ScratchBuffer::acquire(&mut stack, scratch_bytes(total, WIDE)?)?;
        let (title_dst, rest) = scratch.as_wide_mut().split_at_mut(title_len);
        let class_dst = &mut rest[..class_len];

        if let Some(title) = title {
            self.codepage.to_wide(title_dst, title);
            cs.title = title_dst.as_ptr() as *const c_void;
        }
        if let Some(class) = class {
            self.codepage.to_wide(class_dst, class);
            cs.class = class_dst.as_ptr() as *const c_void;
        }

        Ok(call.call_with(call.wparam, &mut cs as *mut MdiCreateStruct as LParam))
    }

    pub(crate) unsafe fn input_string_a_to_w(
        &self,
        call: &mut Invocation<'_>,
        list: bool,
    ) -> Result<LResult> {
        if call.lparam == 0 || (list && !self.list_has_strings(call.hwnd, call.msg)) {
            return Ok(call.forward());
        }

        let src = narrow_with_nul(call.lparam as *const u8);
        let len = self.codepage.wide_len(src);
        let mut stack = StackBuffer::<SCRATCH_STATIC_BYTES>::new();
        let mut scratch = ScratchBuffer::acquire(&mut stack, scratch_bytes(len, WIDE)?)?;
        let dst = &mut scratch.as_wide_mut()[..len];
        self.codepage.to_wide(dst, src);

        Ok(call.call_with(call.wparam, dst.as_ptr() as LParam))
    }

    /// `wparam` is the caller's capacity in narrow units, terminator included.
    pub(crate) unsafe fn output_text_a_to_w(&self, call: &mut Invocation<'_>) -> Result<LResult> {
        if call.lparam == 0 {
            return Ok(call.forward());
        }
        let cap = call.wparam;
        let mut stack = StackBuffer::<SCRATCH_STATIC_BYTES>::new();
        let mut scratch = ScratchBuffer::acquire(&mut stack, scratch_bytes(cap, WIDE)?)?;
        let ret = call.call_with(cap, scratch.as_wide_ptr() as LParam);

        if cap != 0 {
            let dst = slice::from_raw_parts_mut(call.lparam as *mut u8, cap);
            let mut len = 0;
            if *call.result != 0 {
                let produced = &scratch.as_wide_mut()[..result_len(*call.result).min(cap)];
                len = self.codepage.to_narrow(&mut dst[..cap - 1], produced);
                note_truncation(self.codepage.narrow_len(produced), len);
            }
            dst[len] = 0;
            *call.result = len as LResult;
        }
        Ok(ret)
    }

    /// Item text goes into a fixed buffer; the caller's buffer is unsized and
    /// receives the converted text plus terminator, never more than
    /// [`list_text_bytes`] bytes.
    pub(crate) unsafe fn list_output_text_a_to_w(&self, call: &mut Invocation<'_>) -> LResult {
        if call.lparam == 0 || !self.list_has_strings(call.hwnd, call.msg) {
            return call.forward();
        }

        let mut buffer = [0u16; LIST_TEXT_UNITS];
        let ret = call.call_with(call.wparam, buffer.as_mut_ptr() as LParam);
        if *call.result >= 0 {
            let text = until_nul(&buffer);
            let full = self.codepage.narrow_len(text);
            let need = full.min(list_text_bytes(true) - 1);
            let dst = slice::from_raw_parts_mut(call.lparam as *mut u8, need + 1);
            let len = self.codepage.to_narrow(&mut dst[..need], text);
            note_truncation(full, len);
            dst[len] = 0;
            *call.result = len as LResult;
        }
        ret
    }

    /// Ask for the wide length, then fetch the text to measure it narrow.
    pub(crate) unsafe fn text_length_a_to_w(
        &self,
        call: &mut Invocation<'_>,
        get_text: u32,
    ) -> Result<LResult> {
        let ret = call.forward();
        if *call.result < 0 {
            return Ok(ret);
        }

        let units = result_len(*call.result) + 1;
        let wparam = if get_text == WM_GETTEXT { units } else { call.wparam };
        // The wide length is never reported back.
        *call.result = 0;
        let mut stack = StackBuffer::<SCRATCH_STATIC_BYTES>::new();
        let mut scratch = ScratchBuffer::acquire(&mut stack, scratch_bytes(units, WIDE)?)?;

        let mut fetched = 0;
        call.call_other(get_text, wparam, scratch.as_wide_ptr() as LParam, &mut fetched);
        let text = &scratch.as_wide_mut()[..result_len(fetched).min(units)];
        *call.result = self.codepage.narrow_len(text) as LResult;
        Ok(ret)
    }

    /// The first word of the buffer holds its capacity; the callback reads it
    /// from the scratch buffer in wide units.
    pub(crate) unsafe fn get_line_a_to_w(&self, call: &mut Invocation<'_>) -> Result<LResult> {
        let cap = (call.lparam as *const u16).read_unaligned() as usize;
        let mut stack = StackBuffer::<SCRATCH_STATIC_BYTES>::new();
        let need = scratch_bytes(cap, WIDE)?.max(WIDE);
        let mut scratch = ScratchBuffer::acquire(&mut stack, need)?;
        scratch.as_wide_mut()[0] = cap as u16;

        let ret = call.call_with(call.wparam, scratch.as_wide_ptr() as LParam);
        if *call.result != 0 {
            let produced = &scratch.as_wide_mut()[..result_len(*call.result).min(cap)];
            let dst = slice::from_raw_parts_mut(call.lparam as *mut u8, cap);
            let len = self.codepage.to_narrow(dst, produced);
            note_truncation(self.codepage.narrow_len(produced), len);
            if len < cap {
                dst[len] = 0;
            }
            *call.result = len as LResult;
        }
        Ok(ret)
    }

    pub(crate) unsafe fn dialog_code_a_to_w(&self, call: &mut Invocation<'_>) -> LResult {
        if call.lparam == 0 {
            return call.forward();
        }
        let mut msg = *(call.lparam as *const Msg);
        if !self.map_wparam_a_to_w(msg.message, &mut msg.wparam, CharMapping::NoMapping) {
            return 0;
        }
        call.call_with(call.wparam, &mut msg as *mut Msg as LParam)
    }

    /// `WM_CHAR` produces one call per wide unit; the other character
    /// messages carry exactly one unit.
    pub(crate) fn char_a_to_w(
        &self,
        call: &mut Invocation<'_>,
        kind: CharKind,
        mapping: CharMapping,
    ) -> LResult {
        if kind != CharKind::Char {
            let mut wparam: WParam = call.wparam;
            if !self.map_wparam_a_to_w(call.msg, &mut wparam, mapping) {
                return 0;
            }
            return call.call_with(wparam, call.lparam);
        }

        let Some((units, n)) = self.char_units_a_to_w(call.wparam, mapping) else {
            log::trace!(
                target: "msg",
                "holding lead byte {:#04x} until the character completes",
                packed_narrow_bytes(call.wparam).0[0]
            );
            return 0;
        };
        let hi = hiword(call.wparam);
        let mut ret = 0;
        for &unit in &units[..n] {
            ret = call.call_with(make_wparam(unit, hi), call.lparam);
        }
        ret
    }
}
