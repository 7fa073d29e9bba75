// Cross-process unpacking.
//
// A message sent from another process arrives flattened: the fixed-size
// record first, then the strings or data it pointed to, in field order.
// Unpacking turns those relative positions into pointers into the received
// buffer and points lparam at it. The buffer must not be resized after a
// successful unpack.

use super::buffer::MessageBuffer;
use crate::Core::error::{MarshalError, Result};
use crate::Core::stats::STATS;
use crate::Message::descriptor::{lookup, MessageDescriptor, UnpackRule};
use crate::Message::ids::DBT_BROADCAST_BIT;
use crate::Message::layout::{
    is_int_resource, list_text_bytes, CopyDataStruct, CreateStruct, DevBroadcastHdr,
    MdiCreateStruct, NcCalcSizeParams, Rect, WindowPos,
};
use crate::Message::{Hwnd, LParam, WParam};
use std::ffi::c_void;
use std::mem::size_of;

/// Size of the flag `WM_MDIGETACTIVE` writes through lparam.
const BOOL_SIZE: usize = 4;

/// Byte length of the NUL-terminated string at the start of `bytes`,
/// terminator included.
fn string_size(bytes: &[u8], ansi: bool) -> Option<usize> {
    if ansi {
        bytes.iter().position(|&b| b == 0).map(|n| n + 1)
    } else {
        bytes
            .chunks_exact(2)
            .position(|unit| unit == [0, 0])
            .map(|n| (n + 1) * 2)
    }
}

fn require(msg: u32, buffer: &MessageBuffer, required: usize) -> Result<()> {
    if buffer.len() >= required {
        return Ok(());
    }
    STATS.record_size_failure();
    log::debug!(
        "unpack of {} rejected: {} bytes received, {} required",
        lookup(msg).name,
        buffer.len(),
        required
    );
    Err(MarshalError::SizeValidation {
        msg,
        required,
        actual: buffer.len(),
    })
}

fn unterminated(msg: u32, buffer: &MessageBuffer, ansi: bool) -> MarshalError {
    STATS.record_size_failure();
    log::debug!("unpack of {} rejected: string runs past the buffer", lookup(msg).name);
    MarshalError::SizeValidation {
        msg,
        required: buffer.len() + if ansi { 1 } else { 2 },
        actual: buffer.len(),
    }
}

/// Bytes taken by `count` units of `unit` bytes, as declared by the sender.
fn declared_bytes(count: usize, unit: usize) -> Result<usize> {
    count
        .checked_mul(unit)
        .ok_or(MarshalError::Allocation { requested: usize::MAX })
}

/// Grow `buffer` to `len` bytes for the callee to write into.
fn grow(msg: u32, buffer: &mut MessageBuffer, len: usize) -> Result<()> {
    buffer.ensure_len(len).map(|_| ()).map_err(|err| {
        log::debug!("unpack of {} rejected: {err}", lookup(msg).name);
        err
    })
}

fn unsupported(hwnd: Hwnd, desc: &MessageDescriptor) -> MarshalError {
    STATS.record_unsupported();
    log::warn!(
        "msg {:x} ({}) not supported yet (hwnd={:#x})",
        desc.id,
        desc.name,
        hwnd.0
    );
    MarshalError::UnsupportedMessage {
        msg: desc.id,
        name: desc.name,
    }
}

/// Point each present string field at its copy after the header, in the
/// order given. Fields holding resource identifiers take no space.
unsafe fn relocate_strings(
    msg: u32,
    buffer: &mut MessageBuffer,
    header: usize,
    fields: &mut [&mut *const c_void],
    ansi: bool,
) -> Result<()> {
    let base = buffer.as_mut_ptr();
    let mut offset = header;
    for field in fields.iter_mut() {
        if is_int_resource(**field) {
            continue;
        }
        let size = string_size(&buffer.as_bytes()[offset..], ansi)
            .ok_or_else(|| unterminated(msg, buffer, ansi))?;
        **field = base.add(offset) as *const c_void;
        offset += size;
    }
    Ok(())
}

/// Fix up `buffer`, received from another process, so the message can be
/// delivered locally. On success `lparam` (and for some messages `wparam`)
/// points into `buffer`; messages that need no unpacking are left alone.
pub fn unpack_message(
    hwnd: Hwnd,
    msg: u32,
    wparam: &mut WParam,
    lparam: &mut LParam,
    buffer: &mut MessageBuffer,
    ansi: bool,
) -> Result<()> {
    let desc = lookup(msg);
    let char_size = if ansi { 1 } else { 2 };

    let min_size = match desc.unpack {
        UnpackRule::None => return Ok(()),
        UnpackRule::InBuffer { min_size } => min_size,
        UnpackRule::InString => {
            if string_size(buffer.as_bytes(), ansi).is_none() {
                return Err(unterminated(msg, buffer, ansi));
            }
            0
        }
        UnpackRule::OutputText => {
            grow(msg, buffer, declared_bytes(*wparam, char_size)?)?;
            0
        }
        UnpackRule::ListOutputText => {
            grow(msg, buffer, list_text_bytes(ansi))?;
            0
        }
        UnpackRule::IntArray { output } => {
            let need = declared_bytes(*wparam, size_of::<u32>())?;
            if output {
                grow(msg, buffer, need)?;
            }
            need
        }
        UnpackRule::GetLine => {
            require(msg, buffer, 2)?;
            let cap = u16::from_ne_bytes([buffer.as_bytes()[0], buffer.as_bytes()[1]]) as usize;
            grow(msg, buffer, (cap * char_size).max(2))?;
            0
        }
        UnpackRule::CreateStruct => {
            let header = size_of::<CreateStruct>();
            require(msg, buffer, header)?;
            // SAFETY: the buffer is word aligned and holds a full record.
            unsafe {
                let cs = &*(buffer.as_ptr() as *const CreateStruct);
                let (mut name, mut class) = (cs.name, cs.class);
                relocate_strings(msg, buffer, header, &mut [&mut name, &mut class], ansi)?;
                let cs = &mut *(buffer.as_mut_ptr() as *mut CreateStruct);
                cs.name = name;
                cs.class = class;
            }
            0
        }
        UnpackRule::MdiCreateStruct => {
            let header = size_of::<MdiCreateStruct>();
            require(msg, buffer, header)?;
            // SAFETY: as above.
            unsafe {
                let mcs = &*(buffer.as_ptr() as *const MdiCreateStruct);
                let (mut class, mut title) = (mcs.class, mcs.title);
                relocate_strings(msg, buffer, header, &mut [&mut class, &mut title], ansi)?;
                let mcs = &mut *(buffer.as_mut_ptr() as *mut MdiCreateStruct);
                mcs.class = class;
                mcs.title = title;
            }
            0
        }
        UnpackRule::NcCalcSize => {
            if *wparam != 0 {
                let header = size_of::<NcCalcSizeParams>();
                require(msg, buffer, header + size_of::<WindowPos>())?;
                // SAFETY: the record and its trailing WindowPos are in bounds.
                unsafe {
                    let base = buffer.as_mut_ptr();
                    let ncp = &mut *(base as *mut NcCalcSizeParams);
                    ncp.lppos = base.add(header) as *mut WindowPos;
                }
                0
            } else {
                size_of::<Rect>()
            }
        }
        UnpackRule::CopyData => {
            let header = size_of::<CopyDataStruct>();
            require(msg, buffer, header)?;
            // SAFETY: the header is in bounds; the data is checked below.
            unsafe {
                let cds = *(buffer.as_ptr() as *const CopyDataStruct);
                if !cds.lp_data.is_null() {
                    require(msg, buffer, header + cds.cb_data as usize)?;
                    let base = buffer.as_mut_ptr();
                    (*(base as *mut CopyDataStruct)).lp_data = base.add(header) as *mut c_void;
                }
            }
            0
        }
        UnpackRule::PairedOutput => {
            grow(msg, buffer, 2 * size_of::<u32>())?;
            let ptr = buffer.as_mut_ptr();
            *wparam = ptr as WParam;
            *lparam = ptr.wrapping_add(size_of::<u32>()) as LParam;
            return Ok(());
        }
        UnpackRule::MdiGetActive => {
            if *lparam == 0 {
                return Ok(());
            }
            grow(msg, buffer, BOOL_SIZE)?;
            0
        }
        UnpackRule::DeviceChange => {
            if *wparam & DBT_BROADCAST_BIT == 0 {
                return Ok(());
            }
            size_of::<DevBroadcastHdr>()
        }
        UnpackRule::NotTransferable => {
            STATS.record_not_transferable();
            log::debug!("{} cannot be sent across processes", desc.name);
            return Err(MarshalError::NotTransferable {
                msg,
                name: desc.name,
            });
        }
        UnpackRule::NcPaint => {
            if *wparam <= 1 {
                return Ok(());
            }
            return Err(unsupported(hwnd, &desc));
        }
        UnpackRule::Paint => {
            if *wparam == 0 {
                return Ok(());
            }
            return Err(unsupported(hwnd, &desc));
        }
        UnpackRule::Unsupported => return Err(unsupported(hwnd, &desc)),
    };

    require(msg, buffer, min_size)?;
    *lparam = buffer.as_mut_ptr() as LParam;
    Ok(())
}
