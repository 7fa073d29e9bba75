use crate::Core::error::MarshalError;
use crate::Core::stats::{self, StatsSnapshot};
use crate::Core::thread_state::DpiAwarenessContext;
use crate::Dispatch::{DispatchBuilder, Marshaler, RecordedReply, Reply};
use crate::Message::{Hwnd, LParam, LResult, WParam, WndProc};
use crate::Translate::{WindowInfo, WindowTable};
use std::mem::size_of;
use std::ptr;
use std::sync::Arc;

// Error codes
pub const WINMSG_SUCCESS: i32 = 0;
pub const WINMSG_ERROR_NULL_POINTER: i32 = -1;
pub const WINMSG_ERROR_INVALID_ARG: i32 = -2;
pub const WINMSG_ERROR_ALLOCATION_FAILED: i32 = -3;
pub const WINMSG_ERROR_UNSUPPORTED: i32 = -4;
pub const WINMSG_ERROR_NOT_TRANSFERABLE: i32 = -5;
pub const WINMSG_ERROR_SIZE_VALIDATION: i32 = -6;
pub const WINMSG_ERROR_BUFFER_TOO_SMALL: i32 = -7;

/// Handle to a marshaler instance (opaque pointer)
pub struct MarshalerHandle {
    inner: Marshaler,
    windows: Arc<WindowTable>,
}

fn error_code(err: &MarshalError) -> i32 {
    match err {
        MarshalError::Allocation { .. } => WINMSG_ERROR_ALLOCATION_FAILED,
        MarshalError::UnsupportedMessage { .. } => WINMSG_ERROR_UNSUPPORTED,
        MarshalError::NotTransferable { .. } => WINMSG_ERROR_NOT_TRANSFERABLE,
        MarshalError::SizeValidation { .. } => WINMSG_ERROR_SIZE_VALIDATION,
        MarshalError::InvalidArgument(_) => WINMSG_ERROR_INVALID_ARG,
    }
}

// -----------------------------------------------------------------------------
// Marshaler API
// -----------------------------------------------------------------------------

/// Create a new marshaler.
///
/// # Arguments
/// * `codepage` - Narrow codepage identifier (65001 or 28591), 0 for UTF-8.
///
/// # Returns
/// * Pointer to `MarshalerHandle`, or NULL on failure.
#[no_mangle]
pub extern "C" fn winmsg_marshaler_new(codepage: u32) -> *mut MarshalerHandle {
    let windows = Arc::new(WindowTable::new());
    let mut builder = Marshaler::builder().with_host(windows.clone());
    if codepage != 0 {
        builder = match builder.with_codepage_id(codepage) {
            Ok(builder) => builder,
            Err(e) => {
                log::error!("FFI Error: Failed to build marshaler: {}", e);
                return ptr::null_mut();
            }
        };
    }

    let handle = Box::new(MarshalerHandle {
        inner: builder.build(),
        windows,
    });
    Box::into_raw(handle)
}

/// Free a marshaler handle.
#[no_mangle]
pub extern "C" fn winmsg_marshaler_free(handle: *mut MarshalerHandle) {
    if !handle.is_null() {
        unsafe {
            let _ = Box::from_raw(handle); // Dropped automatically
        }
    }
}

/// Record the state of a window the marshaler needs to know about.
///
/// # Returns
/// * 0 on success, negative error code otherwise.
#[no_mangle]
pub extern "C" fn winmsg_set_window_info(
    handle: *mut MarshalerHandle,
    hwnd: usize,
    style: u32,
    ex_style: u32,
    dialog_result: LResult,
    dpi_awareness: isize,
) -> i32 {
    if handle.is_null() {
        return WINMSG_ERROR_NULL_POINTER;
    }

    let windows = unsafe { &(*handle).windows };
    windows.insert(
        Hwnd(hwnd),
        WindowInfo {
            style,
            ex_style,
            dialog_result,
            dpi_awareness: DpiAwarenessContext(dpi_awareness),
        },
    );
    WINMSG_SUCCESS
}

/// Forget a window.
#[no_mangle]
pub extern "C" fn winmsg_remove_window(handle: *mut MarshalerHandle, hwnd: usize) -> i32 {
    if handle.is_null() {
        return WINMSG_ERROR_NULL_POINTER;
    }

    let windows = unsafe { &(*handle).windows };
    windows.remove(Hwnd(hwnd));
    WINMSG_SUCCESS
}

/// Call a window procedure, translating between encodings as needed.
///
/// # Arguments
/// * `ansi` - Caller's parameters are narrow.
/// * `ansi_dst` - The procedure expects narrow parameters.
/// * `out_result` - Receives the message result.
///
/// # Returns
/// * 0 on success, negative error code otherwise.
///
/// # Safety
/// `proc` must be callable with the translated parameters, and pointer
/// parameters must be valid for the message kind.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn winmsg_call_window_proc(
    handle: *mut MarshalerHandle,
    proc: Option<WndProc>,
    hwnd: usize,
    msg: u32,
    wparam: WParam,
    lparam: LParam,
    ansi: bool,
    ansi_dst: bool,
    out_result: *mut LResult,
) -> i32 {
    if handle.is_null() || out_result.is_null() {
        return WINMSG_ERROR_NULL_POINTER;
    }
    let Some(proc) = proc else {
        return WINMSG_ERROR_NULL_POINTER;
    };

    let handle = &*handle;
    let hwnd = Hwnd(hwnd);
    let params = DispatchBuilder::new(hwnd, msg, proc)
        .with_wparam(wparam)
        .with_lparam(lparam)
        .with_ansi(ansi)
        .with_ansi_dst(ansi_dst)
        .with_dpi_awareness(handle.windows.get(hwnd).map(|w| w.dpi_awareness).unwrap_or_default())
        .build();

    *out_result = handle.inner.dispatch(&params);
    WINMSG_SUCCESS
}

/// Run a call received from another process.
///
/// The reply is written to `out_buf`: the result (pointer-sized, native
/// byte order), followed by the message buffer when the message carries it
/// back. `out_direct` tells which form was used.
///
/// # Arguments
/// * `payload` / `payload_len` - Flattened message payload; may be empty.
/// * `out_len` - Input: size of `out_buf`, Output: size of the reply.
///
/// # Returns
/// * 0 on success.
/// * WINMSG_ERROR_BUFFER_TOO_SMALL if `out_buf` cannot hold the reply;
///   `out_len` then holds the required size. The call has already run.
/// * Another negative code if unpacking failed; the procedure was not called.
///
/// # Safety
/// As [`winmsg_call_window_proc`]; `payload` must be readable for
/// `payload_len` bytes and `out_buf` writable for `*out_len` bytes.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn winmsg_call_packed(
    handle: *mut MarshalerHandle,
    proc: Option<WndProc>,
    hwnd: usize,
    msg: u32,
    wparam: WParam,
    lparam: LParam,
    ansi: bool,
    ansi_dst: bool,
    payload: *const u8,
    payload_len: usize,
    out_buf: *mut u8,
    out_len: *mut usize,
    out_direct: *mut bool,
) -> i32 {
    if handle.is_null() || out_len.is_null() || out_direct.is_null() {
        return WINMSG_ERROR_NULL_POINTER;
    }
    if payload.is_null() && payload_len != 0 {
        return WINMSG_ERROR_NULL_POINTER;
    }
    let Some(proc) = proc else {
        return WINMSG_ERROR_NULL_POINTER;
    };

    let handle = &*handle;
    let hwnd = Hwnd(hwnd);
    let payload = if payload_len == 0 {
        &[][..]
    } else {
        std::slice::from_raw_parts(payload, payload_len)
    };
    let params = DispatchBuilder::new(hwnd, msg, proc)
        .with_wparam(wparam)
        .with_lparam(lparam)
        .with_ansi(ansi)
        .with_ansi_dst(ansi_dst)
        .with_remote_payload()
        .with_dpi_awareness(handle.windows.get(hwnd).map(|w| w.dpi_awareness).unwrap_or_default())
        .build();

    let mut channel = RecordedReply::default();
    if let Err(e) = handle.inner.call_packed(&params, payload, &mut channel) {
        log::error!("FFI Error: Failed to unpack message: {}", e);
        return error_code(&e);
    }

    let (bytes, direct) = match &channel.reply {
        Reply::Direct(result) => (result.to_ne_bytes().to_vec(), true),
        Reply::Channel { bytes, .. } => (bytes.clone(), false),
        Reply::Pending => return WINMSG_ERROR_INVALID_ARG,
    };
    debug_assert!(bytes.len() >= size_of::<LResult>());

    let max_len = *out_len;
    *out_len = bytes.len();
    *out_direct = direct;
    if bytes.len() > max_len || out_buf.is_null() {
        return WINMSG_ERROR_BUFFER_TOO_SMALL;
    }
    ptr::copy_nonoverlapping(bytes.as_ptr(), out_buf, bytes.len());
    WINMSG_SUCCESS
}

/// Copy the process-wide counters into `out`.
#[no_mangle]
pub extern "C" fn winmsg_stats(out: *mut StatsSnapshot) -> i32 {
    if out.is_null() {
        return WINMSG_ERROR_NULL_POINTER;
    }
    unsafe { *out = stats::snapshot() };
    WINMSG_SUCCESS
}
