use crate::Core::thread_state::DpiAwarenessContext;
use crate::Message::{Hwnd, LParam, WParam, WndProc};
use crate::Translate::CharMapping;

/// One call as handed over by the transport layer. Consumed by a single
/// dispatch.
#[derive(Copy, Clone)]
pub struct DispatchParams {
    pub hwnd: Hwnd,
    pub msg: u32,
    pub wparam: WParam,
    pub lparam: LParam,
    /// The caller's parameters are narrow.
    pub ansi: bool,
    /// The procedure expects narrow parameters.
    pub ansi_dst: bool,
    /// Caller and procedure share an address space.
    pub is_local: bool,
    /// The parameters refer to a flattened payload from another process.
    pub needs_unpack: bool,
    pub mapping: CharMapping,
    pub dpi_awareness: DpiAwarenessContext,
    pub procedure: WndProc,
}

/// Builds [`DispatchParams`]. Defaults: wide to wide, local, no unpacking,
/// buffered character mapping, unaware DPI context.
pub struct DispatchBuilder {
    params: DispatchParams,
}

impl DispatchBuilder {
    pub fn new(hwnd: Hwnd, msg: u32, procedure: WndProc) -> Self {
        Self {
            params: DispatchParams {
                hwnd,
                msg,
                wparam: 0,
                lparam: 0,
                ansi: false,
                ansi_dst: false,
                is_local: true,
                needs_unpack: false,
                mapping: CharMapping::default(),
                dpi_awareness: DpiAwarenessContext::default(),
                procedure,
            },
        }
    }

    pub fn with_wparam(mut self, wparam: WParam) -> Self {
        self.params.wparam = wparam;
        self
    }

    pub fn with_lparam(mut self, lparam: LParam) -> Self {
        self.params.lparam = lparam;
        self
    }

    /// Encoding of the caller (`true` = narrow).
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.params.ansi = ansi;
        self
    }

    /// Encoding the procedure expects (`true` = narrow).
    pub fn with_ansi_dst(mut self, ansi_dst: bool) -> Self {
        self.params.ansi_dst = ansi_dst;
        self
    }

    /// Mark the call as coming from another process with a flattened
    /// payload to unpack.
    pub fn with_remote_payload(mut self) -> Self {
        self.params.is_local = false;
        self.params.needs_unpack = true;
        self
    }

    pub fn with_local(mut self, is_local: bool) -> Self {
        self.params.is_local = is_local;
        self
    }

    pub fn with_needs_unpack(mut self, needs_unpack: bool) -> Self {
        self.params.needs_unpack = needs_unpack;
        self
    }

    pub fn with_mapping(mut self, mapping: CharMapping) -> Self {
        self.params.mapping = mapping;
        self
    }

    pub fn with_dpi_awareness(mut self, context: DpiAwarenessContext) -> Self {
        self.params.dpi_awareness = context;
        self
    }

    pub fn build(self) -> DispatchParams {
        self.params
    }
}
