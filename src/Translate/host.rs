// Window queries the translators need from the windowing system.

use crate::Core::thread_state::DpiAwarenessContext;
use crate::Message::{Hwnd, LResult};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Read-only view of window state owned by the windowing system.
pub trait WindowHost: Send + Sync {
    /// Window style bits.
    fn style(&self, hwnd: Hwnd) -> u32;

    /// Extended window style bits.
    fn ex_style(&self, hwnd: Hwnd) -> u32;

    /// Message result a dialog procedure stored for its window.
    fn dialog_result(&self, _hwnd: Hwnd) -> LResult {
        0
    }

    /// DPI awareness context the window was created under.
    fn dpi_awareness(&self, _hwnd: Hwnd) -> DpiAwarenessContext {
        DpiAwarenessContext::default()
    }
}

/// Host that knows no windows: every style is zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHost;

impl WindowHost for NullHost {
    fn style(&self, _hwnd: Hwnd) -> u32 {
        0
    }

    fn ex_style(&self, _hwnd: Hwnd) -> u32 {
        0
    }
}

/// Per-window state recorded in a [`WindowTable`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WindowInfo {
    pub style: u32,
    pub ex_style: u32,
    pub dialog_result: LResult,
    pub dpi_awareness: DpiAwarenessContext,
}

/// In-process host backed by a table the embedder keeps up to date.
#[derive(Debug, Default)]
pub struct WindowTable {
    windows: RwLock<HashMap<Hwnd, WindowInfo>>,
}

impl WindowTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the state for `hwnd`.
    pub fn insert(&self, hwnd: Hwnd, info: WindowInfo) {
        self.windows.write().insert(hwnd, info);
    }

    /// Update an existing entry in place (creating a default one first).
    pub fn update(&self, hwnd: Hwnd, f: impl FnOnce(&mut WindowInfo)) {
        f(self.windows.write().entry(hwnd).or_default());
    }

    pub fn remove(&self, hwnd: Hwnd) -> Option<WindowInfo> {
        self.windows.write().remove(&hwnd)
    }

    pub fn get(&self, hwnd: Hwnd) -> Option<WindowInfo> {
        self.windows.read().get(&hwnd).copied()
    }
}

impl WindowHost for WindowTable {
    fn style(&self, hwnd: Hwnd) -> u32 {
        self.get(hwnd).map_or(0, |w| w.style)
    }

    fn ex_style(&self, hwnd: Hwnd) -> u32 {
        self.get(hwnd).map_or(0, |w| w.ex_style)
    }

    fn dialog_result(&self, hwnd: Hwnd) -> LResult {
        self.get(hwnd).map_or(0, |w| w.dialog_result)
    }

    fn dpi_awareness(&self, hwnd: Hwnd) -> DpiAwarenessContext {
        self.get(hwnd).map(|w| w.dpi_awareness).unwrap_or_default()
    }
}
