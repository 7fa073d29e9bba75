use crate::Core::alloc::{ScratchBuffer, StackBuffer};
use crate::Dispatch::{DispatchParams, Marshaler};
use crate::Message::descriptor::message_name;
use crate::Unpack::MessageBuffer;
use std::fmt;

/// Debug function for ScratchBuffer
///
/// Shows where the buffer lives and how much of it is usable, never the
/// contents (they may be half-written during a call).
pub fn debug_scratch_buffer(buffer: &ScratchBuffer<'_>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ScratchBuffer")
        .field("addr", &format_args!("0x{:x}", buffer.addr()))
        .field("len", &buffer.len())
        .field("backing", &if buffer.is_static() { "stack" } else { "heap" })
        .finish()
}

/// Debug function for StackBuffer
pub fn debug_stack_buffer<const N: usize>(buffer: &StackBuffer<N>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StackBuffer")
        .field("addr", &format_args!("{:p}", buffer.as_ptr()))
        .field("capacity", &N)
        .finish()
}

/// Debug function for MessageBuffer
///
/// Prints at most the first 16 bytes.
pub fn debug_message_buffer(buffer: &MessageBuffer, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let bytes = buffer.as_bytes();
    let head = &bytes[..bytes.len().min(16)];
    f.debug_struct("MessageBuffer")
        .field("len", &buffer.len())
        .field("head", &format_args!("{:02x?}", head))
        .finish()
}

/// Debug function for DispatchParams
///
/// The message is shown by name; the procedure by address only.
pub fn debug_dispatch_params(params: &DispatchParams, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("DispatchParams")
        .field("hwnd", &format_args!("0x{:x}", params.hwnd.0))
        .field("msg", &format_args!("{} (0x{:04x})", message_name(params.msg), params.msg))
        .field("wparam", &format_args!("0x{:08x}", params.wparam))
        .field("lparam", &format_args!("0x{:08x}", params.lparam))
        .field("ansi", &params.ansi)
        .field("ansi_dst", &params.ansi_dst)
        .field("is_local", &params.is_local)
        .field("needs_unpack", &params.needs_unpack)
        .field("mapping", &params.mapping)
        .field("dpi_awareness", &params.dpi_awareness)
        .field("procedure", &format_args!("{:p}", params.procedure as *const ()))
        .finish()
}

/// Debug function for Marshaler
pub fn debug_marshaler(marshaler: &Marshaler, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let translator = marshaler.translator();
    f.debug_struct("Marshaler")
        .field("codepage", &translator.codepage().id())
        .field("input_codepage", &translator.input_codepage().id())
        .field("host", &"<opaque>")
        .finish()
}
