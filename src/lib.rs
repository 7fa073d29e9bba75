// Module naming follows project convention (PascalCase component groups)
#[allow(non_snake_case)]
pub mod Core {
    pub mod alloc;
    pub mod codepage;
    pub mod error;
    pub mod stats;
    pub mod thread_state;
    pub use alloc::{ScratchBuffer, StackBuffer, SCRATCH_STATIC_BYTES};
    pub use codepage::{Codepage, Latin1Codepage, Utf8Codepage};
    pub use error::{MarshalError, Result};
    pub use thread_state::{DpiAwarenessContext, DpiContextGuard};
}
#[allow(non_snake_case)]
pub mod Message {
    pub mod descriptor;
    pub mod ids;
    pub mod layout;
    pub use descriptor::{lookup, CharKind, MessageDescriptor, TextPolicy, UnpackRule};
    pub use layout::{Hwnd, LParam, LResult, WParam, WndProc}; // re-export for stable path
}
#[allow(non_snake_case)]
pub mod Translate {
    mod a_to_w;
    mod chars;
    pub mod host;
    pub mod proc;
    mod strings;
    pub mod translator;
    mod w_to_a;
    pub use host::{NullHost, WindowHost, WindowInfo, WindowTable};
    pub use proc::{DialogProcCall, ProcCallback, WindowProcCall};
    pub use translator::{CharMapping, Translator};
}
#[allow(non_snake_case)]
pub mod Unpack {
    pub mod buffer;
    mod debug;
    pub mod unpacker;
    pub use buffer::{MessageBuffer, MAX_GROWN_BYTES};
    pub use unpacker::unpack_message;
}
#[allow(non_snake_case)]
pub mod Dispatch {
    mod debug;
    pub mod marshaler;
    pub mod params;
    pub mod reply;
    pub use marshaler::{Marshaler, MarshalerBuilder, PACKED_STACK_BYTES};
    pub use params::{DispatchBuilder, DispatchParams};
    pub use reply::{RecordedReply, Reply, ReplyChannel};
}
#[allow(non_snake_case)]
pub mod Debug {
    pub mod StructDebug;
}
pub mod ffi;
