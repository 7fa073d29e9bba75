// Wide caller, narrow callback.

use super::strings::{until_nul, wide_with_nul};
use super::translator::{note_truncation, result_len, scratch_bytes, Invocation, Translator};
use crate::Core::alloc::{ScratchBuffer, StackBuffer, SCRATCH_STATIC_BYTES};
use crate::Core::error::{MarshalError, Result};
use crate::Message::descriptor::{lookup, CharKind, TextPolicy};
use crate::Message::ids::{WM_GETTEXT, WS_EX_MDICHILD};
use crate::Message::layout::{
    is_int_resource, list_text_bytes, loword, CreateStruct, MdiCreateStruct, Msg, LIST_TEXT_UNITS,
};
use crate::Message::{LParam, LResult, WParam};
use std::ffi::c_void;
use std::mem::size_of;
use std::slice;

const WIDE: usize = size_of::<u16>();

/// Marker a wide window name starts with when it carries a resource ordinal.
const NAME_ORDINAL_MARKER: u16 = 0xFFFF;

/// Wide string behind `ptr`, or `None` for null and resource identifiers.
unsafe fn wide_field<'a>(ptr: *const c_void) -> Option<&'a [u16]> {
    if is_int_resource(ptr) {
        None
    } else {
        Some(wide_with_nul(ptr as *const u16))
    }
}

/// Narrow capacity of a character message: `WM_IME_CHAR` may carry a
/// double-byte character, the rest one byte.
fn char_capacity(kind: CharKind) -> usize {
    match kind {
        CharKind::Ime => 2,
        CharKind::Char | CharKind::Packed => 1,
    }
}

impl Translator {
    fn narrow_len_of(&self, s: Option<&[u16]>) -> usize {
        s.map_or(0, |s| self.codepage.narrow_len(s))
    }

    pub(crate) unsafe fn create_struct_w_to_a(&self, call: &mut Invocation<'_>) -> Result<LResult> {
        let src = &*(call.lparam as *const CreateStruct);
        let mut cs = *src;
        let ordinal_name: [u8; 4];

        let class = wide_field(src.class);
        let mut name = None;
        if !is_int_resource(src.name) {
            let ptr = src.name as *const u16;
            if *ptr == NAME_ORDINAL_MARKER {
                let id = *ptr.add(1);
                ordinal_name = [0xFF, id as u8, (id >> 8) as u8, 0];
                cs.name = ordinal_name.as_ptr() as *const c_void;
            } else {
                name = Some(wide_with_nul(ptr));
            }
        }

        let class_len = self.narrow_len_of(class);
        let name_len = self.narrow_len_of(name);
        let total = class_len
            .checked_add(name_len)
            .ok_or(MarshalError::Allocation { requested: usize::MAX })?;

        let mut stack = StackBuffer::<SCRATCH_STATIC_BYTES>::new();
        let mut scratch = ScratchBuffer::acquire(&mut stack, total)?;
        let (class_dst, rest) = scratch.as_bytes_mut().split_at_mut(class_len);
        let name_dst = &mut rest[..name_len];

        if let Some(class) = class {
            self.codepage.to_narrow(class_dst, class);
            cs.class = class_dst.as_ptr() as *const c_void;
        }
        if let Some(name) = name {
            self.codepage.to_narrow(name_dst, name);
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

    pub(crate) unsafe fn mdi_create_struct_w_to_a(
        &self,
        call: &mut Invocation<'_>,
    ) -> Result<LResult> {
        let src = &*(call.lparam as *const MdiCreateStruct);
        let mut cs = *src;

        let title = wide_field(src.title);
        let class = wide_field(src.class);
        let title_len = self.narrow_len_of(title);
        let class_len = self.narrow_len_of(class);
        let total = title_len
            .checked_add(class_len)
            .ok_or(MarshalError::Allocation { requested: usize::MAX })?;

        let mut stack = StackBuffer::<SCRATCH_STATIC_BYTES>::new();
        let mut scratch = ScratchBuffer::acquire(&mut stack, total)?;
        let (title_dst, rest) = scratch.as_bytes_mut().split_at_mut(title_len);
        let class_dst = &mut rest[..class_len];

        if let Some(title) = title {
            self.codepage.to_narrow(title_dst, title);
            cs.title = title_dst.as_ptr() as *const c_void;
        }
        if let Some(class) = class {
            self.codepage.to_narrow(class_dst, class);
            cs.class = class_dst.as_ptr() as *const c_void;
        }

        Ok(call.call_with(call.wparam, &mut cs as *mut MdiCreateStruct as LParam))
    }

    pub(crate) unsafe fn input_string_w_to_a(
        &self,
        call: &mut Invocation<'_>,
        list: bool,
    ) -> Result<LResult> {
        if call.lparam == 0 || (list && !self.list_has_strings(call.hwnd, call.msg)) {
            return Ok(call.forward());
        }

        let src = wide_with_nul(call.lparam as *const u16);
        let len = self.codepage.narrow_len(src);
        let mut stack = StackBuffer::<SCRATCH_STATIC_BYTES>::new();
        let mut scratch = ScratchBuffer::acquire(&mut stack, len)?;
        let dst = &mut scratch.as_bytes_mut()[..len];
        self.codepage.to_narrow(dst, src);

        Ok(call.call_with(call.wparam, dst.as_ptr() as LParam))
    }

    /// `wparam` is the caller's capacity in wide units. The narrow callback
    /// is offered that capacity expanded by the codepage's widest character,
    /// so a text that fits the caller is never cut short on the narrow side.
    pub(crate) unsafe fn output_text_w_to_a(&self, call: &mut Invocation<'_>) -> Result<LResult> {
        if call.lparam == 0 {
            return Ok(call.forward());
        }
        let cap = call.wparam;
        let narrow_cap = scratch_bytes(cap, self.codepage.max_narrow_per_wide())?;
        let mut stack = StackBuffer::<SCRATCH_STATIC_BYTES>::new();
        let mut scratch = ScratchBuffer::acquire(&mut stack, narrow_cap)?;
        let ret = call.call_with(narrow_cap, scratch.as_mut_ptr() as LParam);

        if cap != 0 {
            let dst = slice::from_raw_parts_mut(call.lparam as *mut u16, cap);
            let mut len = 0;
            if *call.result != 0 {
                let produced = &scratch.as_bytes_mut()[..result_len(*call.result).min(narrow_cap)];
                len = self.codepage.to_wide(&mut dst[..cap - 1], produced);
                note_truncation(self.codepage.wide_len(produced), len);
            }
            dst[len] = 0;
            *call.result = len as LResult;
        }
        Ok(ret)
    }

    pub(crate) unsafe fn list_output_text_w_to_a(&self, call: &mut Invocation<'_>) -> LResult {
        if call.lparam == 0 || !self.list_has_strings(call.hwnd, call.msg) {
            return call.forward();
        }

        let mut buffer = [0u8; LIST_TEXT_UNITS];
        let ret = call.call_with(call.wparam, buffer.as_mut_ptr() as LParam);
        if *call.result >= 0 {
            let text = until_nul(&buffer);
            let full = self.codepage.wide_len(text);
            let need = full.min(list_text_bytes(false) / WIDE - 1);
            let dst = slice::from_raw_parts_mut(call.lparam as *mut u16, need + 1);
            let len = self.codepage.to_wide(&mut dst[..need], text);
            note_truncation(full, len);
            dst[len] = 0;
            *call.result = len as LResult;
        }
        ret
    }

    /// Ask for the narrow length, then fetch the text to measure it wide.
    pub(crate) unsafe fn text_length_w_to_a(
        &self,
        call: &mut Invocation<'_>,
        get_text: u32,
    ) -> Result<LResult> {
        let ret = call.forward();
        if *call.result < 0 {
            return Ok(ret);
        }

        let bytes = result_len(*call.result) + 1;
        let wparam = if get_text == WM_GETTEXT { bytes } else { call.wparam };
        // The narrow length is never reported back.
        *call.result = 0;
        let mut stack = StackBuffer::<SCRATCH_STATIC_BYTES>::new();
        let mut scratch = ScratchBuffer::acquire(&mut stack, bytes)?;

        let mut fetched = 0;
        call.call_other(get_text, wparam, scratch.as_mut_ptr() as LParam, &mut fetched);
        let text = &scratch.as_bytes_mut()[..result_len(fetched).min(bytes)];
        *call.result = self.codepage.wide_len(text) as LResult;
        Ok(ret)
    }

    /// The caller's capacity is in wide units; the narrow callback sees the
    /// same capacity expanded to bytes.
    pub(crate) unsafe fn get_line_w_to_a(&self, call: &mut Invocation<'_>) -> Result<LResult> {
        let cap = (call.lparam as *const u16).read_unaligned() as usize;
        let narrow_cap = scratch_bytes(cap, self.codepage.max_narrow_per_wide())?
            .min(u16::MAX as usize);
        let mut stack = StackBuffer::<SCRATCH_STATIC_BYTES>::new();
        let mut scratch = ScratchBuffer::acquire(&mut stack, narrow_cap.max(2))?;
        (scratch.as_mut_ptr() as *mut u16).write_unaligned(narrow_cap as u16);

        let ret = call.call_with(call.wparam, scratch.as_mut_ptr() as LParam);
        if *call.result != 0 {
            let produced = &scratch.as_bytes_mut()[..result_len(*call.result).min(narrow_cap)];
            let dst = slice::from_raw_parts_mut(call.lparam as *mut u16, cap);
            let len = self.codepage.to_wide(dst, produced);
            note_truncation(self.codepage.wide_len(produced), len);
            if len < cap {
                dst[len] = 0;
            }
            *call.result = len as LResult;
        }
        Ok(ret)
    }

    pub(crate) unsafe fn dialog_code_w_to_a(&self, call: &mut Invocation<'_>) -> LResult {
        if call.lparam == 0 {
            return call.forward();
        }
        let mut msg = *(call.lparam as *const Msg);
        if let TextPolicy::Char(kind) = lookup(msg.message).text {
            msg.wparam = self.map_wparam_char_w_to_a(msg.wparam, char_capacity(kind));
        }
        call.call_with(call.wparam, &mut msg as *mut Msg as LParam)
    }

    /// `WM_CHAR` is delivered once per narrow byte, each byte alone in
    /// wparam. Other character messages pack into the low word.
    pub(crate) fn char_w_to_a(&self, call: &mut Invocation<'_>, kind: CharKind) -> LResult {
        if kind != CharKind::Char {
            let wparam = self.map_wparam_char_w_to_a(call.wparam, char_capacity(kind));
            return call.call_with(wparam, call.lparam);
        }

        let mut bytes = [0u8; 4];
        let n = self.wide_char_to_narrow(loword(call.wparam), &mut bytes);
        let mut ret = 0;
        for &byte in &bytes[..n] {
            ret = call.call_with(byte as WParam, call.lparam);
        }
        ret
    }
}
