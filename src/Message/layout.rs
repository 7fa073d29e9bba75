use crate::Core::codepage::MAX_NARROW_PER_WIDE;
use std::ffi::c_void;

/// Window handle. Opaque to this layer; only compared and forwarded.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Hwnd(pub usize);

/// First message parameter (machine word, unsigned).
pub type WParam = usize;
/// Second message parameter (machine word, signed).
pub type LParam = isize;
/// Window procedure result.
pub type LResult = isize;

/// A native window procedure. The only calling convention this layer uses.
pub type WndProc = unsafe extern "C" fn(Hwnd, u32, WParam, LParam) -> LResult;

/// True when `ptr` is a 16-bit resource identifier rather than an address.
#[inline]
pub fn is_int_resource<T>(ptr: *const T) -> bool {
    (ptr as usize) >> 16 == 0
}

#[inline]
pub fn loword(v: usize) -> u16 {
    (v & 0xFFFF) as u16
}

#[inline]
pub fn hiword(v: usize) -> u16 {
    ((v >> 16) & 0xFFFF) as u16
}

#[inline]
pub fn make_wparam(lo: u16, hi: u16) -> WParam {
    (lo as usize) | ((hi as usize) << 16)
}

/// Creation parameters delivered with `WM_NCCREATE` / `WM_CREATE`.
///
/// The narrow and wide variants share this layout; only the character type
/// behind `name` and `class` differs, so one record serves both directions.
#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct CreateStruct {
    /// Application data. For MDI children this points at an [`MdiCreateStruct`].
    pub create_params: *mut c_void,
    pub instance: usize,
    pub menu: usize,
    pub parent: Hwnd,
    pub cy: i32,
    pub cx: i32,
    pub y: i32,
    pub x: i32,
    pub style: i32,
    /// Window name, or a resource identifier.
    pub name: *const c_void,
    /// Class name, or a class atom.
    pub class: *const c_void,
    pub ex_style: u32,
}

/// MDI child creation parameters (`WM_MDICREATE`, and embedded in a
/// [`CreateStruct`] for MDI children).
#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct MdiCreateStruct {
    pub class: *const c_void,
    pub title: *const c_void,
    pub owner: usize,
    pub x: i32,
    pub y: i32,
    pub cx: i32,
    pub cy: i32,
    pub style: u32,
    pub lparam: LParam,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

/// A queued message, as embedded in `WM_GETDLGCODE`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default)]
pub struct Msg {
    pub hwnd: Hwnd,
    pub message: u32,
    pub wparam: WParam,
    pub lparam: LParam,
    pub time: u32,
    pub pt: Point,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default)]
pub struct WindowPos {
    pub hwnd: Hwnd,
    pub insert_after: Hwnd,
    pub x: i32,
    pub y: i32,
    pub cx: i32,
    pub cy: i32,
    pub flags: u32,
}

/// `WM_NCCALCSIZE` payload when wparam is non-zero. Flattened, the
/// [`WindowPos`] follows the header directly.
#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct NcCalcSizeParams {
    pub rgrc: [Rect; 3],
    pub lppos: *mut WindowPos,
}

/// `WM_COPYDATA` payload. Flattened, the data bytes follow the header.
#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct CopyDataStruct {
    pub data: usize,
    pub cb_data: u32,
    pub lp_data: *mut c_void,
}

/// Leading header of every device broadcast record.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default)]
pub struct DevBroadcastHdr {
    pub size: u32,
    pub device_type: u32,
    pub reserved: u32,
}

/// `WM_MEASUREITEM` payload.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default)]
pub struct MeasureItemStruct {
    pub ctl_type: u32,
    pub ctl_id: u32,
    pub item_id: u32,
    pub item_width: u32,
    pub item_height: u32,
    pub item_data: usize,
}

/// `WM_DELETEITEM` payload.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default)]
pub struct DeleteItemStruct {
    pub ctl_type: u32,
    pub ctl_id: u32,
    pub item_id: u32,
    pub hwnd_item: Hwnd,
    pub item_data: usize,
}

/// `WM_COMPAREITEM` payload.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default)]
pub struct CompareItemStruct {
    pub ctl_type: u32,
    pub ctl_id: u32,
    pub hwnd_item: Hwnd,
    pub item_id1: u32,
    pub item_data1: usize,
    pub item_id2: u32,
    pub item_data2: usize,
    pub locale_id: u32,
}

/// `WM_DRAWITEM` payload.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default)]
pub struct DrawItemStruct {
    pub ctl_type: u32,
    pub ctl_id: u32,
    pub item_id: u32,
    pub item_action: u32,
    pub item_state: u32,
    pub hwnd_item: Hwnd,
    pub hdc: usize,
    pub rc_item: Rect,
    pub item_data: usize,
}

/// `WM_HELP` payload.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default)]
pub struct HelpInfo {
    pub cb_size: u32,
    pub context_type: i32,
    pub ctrl_id: i32,
    pub item_handle: usize,
    pub context_id: usize,
    pub mouse_pos: Point,
}

/// `SBM_SETSCROLLINFO` / `SBM_GETSCROLLINFO` payload.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default)]
pub struct ScrollInfo {
    pub cb_size: u32,
    pub mask: u32,
    pub min: i32,
    pub max: i32,
    pub page: u32,
    pub pos: i32,
    pub track_pos: i32,
}

/// `SBM_GETSCROLLBARINFO` payload.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default)]
pub struct ScrollBarInfo {
    pub cb_size: u32,
    pub rc_scroll_bar: Rect,
    pub dxy_line_button: i32,
    pub xy_thumb_top: i32,
    pub xy_thumb_bottom: i32,
    pub reserved: i32,
    pub rgstate: [u32; 6],
}

/// `WM_NEXTMENU` payload.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default)]
pub struct MdiNextMenu {
    pub hmenu_in: usize,
    pub hmenu_next: usize,
    pub hwnd_next: Hwnd,
}

/// Units in the fixed buffer list and combo boxes write item text into.
pub const LIST_TEXT_UNITS: usize = 512;

/// Bytes an unsized list item buffer holds in the given encoding,
/// terminator included. Narrow buffers allow for the widest codepage.
pub const fn list_text_bytes(ansi: bool) -> usize {
    if ansi {
        LIST_TEXT_UNITS * MAX_NARROW_PER_WIDE
    } else {
        LIST_TEXT_UNITS * 2
    }
}
