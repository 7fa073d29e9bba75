// Message shape table.
//
// Maps a message id to the rules the translators and the unpacker interpret.
// Adding a message kind means adding an entry here (and, for a new policy,
// one match arm in each engine); the dispatch core never changes.

use super::ids::*;
use super::layout::{
    CompareItemStruct, DeleteItemStruct, DrawItemStruct, HelpInfo, MdiNextMenu,
    MeasureItemStruct, Msg, Rect, ScrollBarInfo, ScrollInfo, WindowPos,
};
use lazy_static::lazy_static;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::mem::size_of;

/// How a character parameter is packed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CharKind {
    /// `WM_CHAR`: one invocation per destination code unit.
    Char,
    /// `WM_IME_CHAR`: up to two narrow units packed lead-first in the low word.
    Ime,
    /// Other char-carrying messages: one narrow unit, or two packed.
    Packed,
}

/// Cross-encoding translation policy.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TextPolicy {
    /// Parameters pass through unchanged.
    Opaque,
    /// Creation record with class and window name; may embed an MDI record.
    CreateStruct,
    /// MDI creation record with title and class.
    MdiCreateStruct,
    /// One input string in lparam. `list` restricts translation to list and
    /// combo boxes that store strings.
    InputString { list: bool },
    /// Caller capacity in wparam, output buffer in lparam.
    OutputText,
    /// List/combo item text written into an unsized buffer.
    ListOutputText,
    /// Length query answered by materialising the text with `get_text`.
    TextLength { get_text: u32 },
    /// Output buffer whose first 16-bit word is its capacity.
    GetLine,
    /// Embedded `Msg` record whose char parameter is translated.
    DialogCode,
    /// Character carried in wparam.
    Char(CharKind),
    /// No translation defined; the call is skipped.
    Unsupported,
}

/// Cross-process unpacking rule.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnpackRule {
    /// Nothing to unpack; parameters are left alone.
    None,
    /// lparam becomes the buffer, which must hold `min_size` bytes.
    InBuffer { min_size: usize },
    /// NUL-terminated string that must end inside the buffer.
    InString,
    /// Output text buffer sized by the wparam capacity; grown on demand.
    OutputText,
    /// Unsized list item buffer; grown to hold a full item.
    ListOutputText,
    /// wparam counts the 32-bit entries in lparam. Output arrays are grown,
    /// input arrays must be complete.
    IntArray { output: bool },
    /// Capacity-prefixed line buffer; grown to the declared capacity.
    GetLine,
    /// `CreateStruct` followed by name then class.
    CreateStruct,
    /// `MdiCreateStruct` followed by class then title.
    MdiCreateStruct,
    /// `NcCalcSizeParams` followed by its `WindowPos` when wparam is set.
    NcCalcSize,
    /// `CopyDataStruct` followed by its data.
    CopyData,
    /// Two consecutive 32-bit outputs, one per parameter.
    PairedOutput,
    /// Optional 32-bit output flag in lparam.
    MdiGetActive,
    /// Broadcast header only for events with the broadcast bit.
    DeviceChange,
    /// Plain when wparam is zero, otherwise carries a device context.
    Paint,
    /// Plain when wparam is 0 or 1, otherwise carries a region handle.
    NcPaint,
    /// Can never cross a process boundary.
    NotTransferable,
    /// Carries handles or pointers this layer cannot relocate.
    Unsupported,
}

/// Static classification of one message.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MessageDescriptor {
    pub id: u32,
    pub name: &'static str,
    pub text: TextPolicy,
    pub unpack: UnpackRule,
    /// Cross-process replies carry the message buffer back to the sender.
    pub replies_with_buffer: bool,
}

impl MessageDescriptor {
    pub const fn new(
        id: u32,
        name: &'static str,
        text: TextPolicy,
        unpack: UnpackRule,
        replies_with_buffer: bool,
    ) -> Self {
        Self {
            id,
            name,
            text,
            unpack,
            replies_with_buffer,
        }
    }

    /// Descriptor used for ids missing from the table.
    pub const fn opaque(id: u32) -> Self {
        Self::new(id, "WM_?", TextPolicy::Opaque, UnpackRule::None, false)
    }
}

const fn in_buffer(min_size: usize) -> UnpackRule {
    UnpackRule::InBuffer { min_size }
}

const RECT_SIZE: usize = size_of::<Rect>();
/// MINMAXINFO: five points.
const MINMAXINFO_SIZE: usize = 5 * 8;
/// STYLESTRUCT: old and new style.
const STYLESTRUCT_SIZE: usize = 8;

macro_rules! desc {
    ($id:ident, $text:expr, $unpack:expr, $reply:expr) => {
        MessageDescriptor::new($id, stringify!($id), $text, $unpack, $reply)
    };
}

fn builtin_descriptors() -> Vec<MessageDescriptor> {
    use TextPolicy as T;
    use UnpackRule as U;

    let list_string = T::InputString { list: true };
    let input_string = T::InputString { list: false };
    let in_string = U::InString;

    vec![
        // creation records
        desc!(WM_NCCREATE, T::CreateStruct, U::CreateStruct, true),
        desc!(WM_CREATE, T::CreateStruct, U::CreateStruct, true),
        desc!(WM_MDICREATE, T::MdiCreateStruct, U::MdiCreateStruct, true),
        // text in / out
        desc!(WM_GETTEXT, T::OutputText, U::OutputText, true),
        desc!(WM_ASKCBFORMATNAME, T::OutputText, U::OutputText, true),
        desc!(WM_SETTEXT, input_string, in_string, true),
        desc!(WM_WININICHANGE, input_string, in_string, true),
        desc!(WM_DEVMODECHANGE, input_string, in_string, true),
        desc!(CB_DIR, input_string, in_string, true),
        desc!(LB_DIR, input_string, in_string, true),
        desc!(LB_ADDFILE, input_string, in_string, true),
        desc!(EM_REPLACESEL, input_string, in_string, true),
        desc!(LB_ADDSTRING, list_string, in_string, true),
        desc!(LB_INSERTSTRING, list_string, in_string, true),
        desc!(LB_FINDSTRING, list_string, in_string, true),
        desc!(LB_FINDSTRINGEXACT, list_string, in_string, true),
        desc!(LB_SELECTSTRING, list_string, in_string, true),
        desc!(CB_ADDSTRING, list_string, in_string, true),
        desc!(CB_INSERTSTRING, list_string, in_string, true),
        desc!(CB_FINDSTRING, list_string, in_string, true),
        desc!(CB_FINDSTRINGEXACT, list_string, in_string, true),
        desc!(CB_SELECTSTRING, list_string, in_string, true),
        desc!(LB_GETTEXT, T::ListOutputText, U::ListOutputText, true),
        desc!(CB_GETLBTEXT, T::ListOutputText, U::ListOutputText, true),
        desc!(EM_GETLINE, T::GetLine, U::GetLine, true),
        desc!(WM_GETDLGCODE, T::DialogCode, in_buffer(size_of::<Msg>()), true),
        // lengths
        desc!(WM_GETTEXTLENGTH, T::TextLength { get_text: WM_GETTEXT }, U::None, false),
        desc!(CB_GETLBTEXTLEN, T::TextLength { get_text: CB_GETLBTEXT }, U::None, false),
        desc!(LB_GETTEXTLEN, T::TextLength { get_text: LB_GETTEXT }, U::None, false),
        // characters
        desc!(WM_CHAR, T::Char(CharKind::Char), U::None, false),
        desc!(WM_IME_CHAR, T::Char(CharKind::Ime), U::None, false),
        desc!(WM_CHARTOITEM, T::Char(CharKind::Packed), U::None, false),
        desc!(WM_MENUCHAR, T::Char(CharKind::Packed), U::None, false),
        desc!(WM_DEADCHAR, T::Char(CharKind::Packed), U::None, false),
        desc!(WM_SYSCHAR, T::Char(CharKind::Packed), U::None, false),
        desc!(WM_SYSDEADCHAR, T::Char(CharKind::Packed), U::None, false),
        desc!(EM_SETPASSWORDCHAR, T::Char(CharKind::Packed), U::None, false),
        // structures relocated across processes
        desc!(WM_NCCALCSIZE, T::Opaque, U::NcCalcSize, true),
        desc!(WM_COPYDATA, T::Opaque, U::CopyData, true),
        desc!(EM_GETSEL, T::Opaque, U::PairedOutput, true),
        desc!(SBM_GETRANGE, T::Opaque, U::PairedOutput, true),
        desc!(CB_GETEDITSEL, T::Opaque, U::PairedOutput, true),
        desc!(WM_GETMINMAXINFO, T::Opaque, in_buffer(MINMAXINFO_SIZE), true),
        desc!(WM_MEASUREITEM, T::Opaque, in_buffer(size_of::<MeasureItemStruct>()), true),
        desc!(WM_DELETEITEM, T::Opaque, in_buffer(size_of::<DeleteItemStruct>()), true),
        desc!(WM_COMPAREITEM, T::Opaque, in_buffer(size_of::<CompareItemStruct>()), true),
        desc!(WM_WINDOWPOSCHANGING, T::Opaque, in_buffer(size_of::<WindowPos>()), true),
        desc!(WM_WINDOWPOSCHANGED, T::Opaque, in_buffer(size_of::<WindowPos>()), true),
        desc!(WM_HELP, T::Opaque, in_buffer(size_of::<HelpInfo>()), true),
        desc!(WM_STYLECHANGING, T::Opaque, in_buffer(STYLESTRUCT_SIZE), true),
        desc!(WM_STYLECHANGED, T::Opaque, in_buffer(STYLESTRUCT_SIZE), true),
        desc!(SBM_SETSCROLLINFO, T::Opaque, in_buffer(size_of::<ScrollInfo>()), true),
        desc!(SBM_GETSCROLLINFO, T::Opaque, in_buffer(size_of::<ScrollInfo>()), true),
        desc!(SBM_GETSCROLLBARINFO, T::Opaque, in_buffer(size_of::<ScrollBarInfo>()), true),
        desc!(EM_GETRECT, T::Opaque, in_buffer(RECT_SIZE), true),
        desc!(EM_SETRECT, T::Opaque, in_buffer(RECT_SIZE), true),
        desc!(EM_SETRECTNP, T::Opaque, in_buffer(RECT_SIZE), true),
        desc!(LB_GETITEMRECT, T::Opaque, in_buffer(RECT_SIZE), true),
        desc!(CB_GETDROPPEDCONTROLRECT, T::Opaque, in_buffer(RECT_SIZE), true),
        desc!(EM_SETTABSTOPS, T::Opaque, U::IntArray { output: false }, true),
        desc!(LB_SETTABSTOPS, T::Opaque, U::IntArray { output: false }, true),
        desc!(LB_GETSELITEMS, T::Opaque, U::IntArray { output: true }, true),
        desc!(WM_NEXTMENU, T::Opaque, in_buffer(size_of::<MdiNextMenu>()), true),
        desc!(WM_SIZING, T::Opaque, in_buffer(RECT_SIZE), true),
        desc!(WM_MOVING, T::Opaque, in_buffer(RECT_SIZE), true),
        desc!(WM_DRAWITEM, T::Opaque, in_buffer(size_of::<DrawItemStruct>()), false),
        desc!(WM_MDIGETACTIVE, T::Opaque, U::MdiGetActive, false),
        desc!(WM_DEVICECHANGE, T::Opaque, U::DeviceChange, false),
        // never transferable
        desc!(WM_NOTIFY, T::Opaque, U::NotTransferable, false),
        desc!(WM_NCPAINT, T::Opaque, U::NcPaint, false),
        desc!(WM_PAINT, T::Opaque, U::Paint, false),
        // handles: fonts, device contexts, icons, global memory, pointers
        desc!(WM_SETFONT, T::Opaque, U::Unsupported, false),
        desc!(WM_GETFONT, T::Opaque, U::Unsupported, false),
        desc!(WM_ERASEBKGND, T::Opaque, U::Unsupported, false),
        desc!(WM_ICONERASEBKGND, T::Opaque, U::Unsupported, false),
        desc!(WM_CTLCOLORMSGBOX, T::Opaque, U::Unsupported, false),
        desc!(WM_CTLCOLOREDIT, T::Opaque, U::Unsupported, false),
        desc!(WM_CTLCOLORLISTBOX, T::Opaque, U::Unsupported, false),
        desc!(WM_CTLCOLORBTN, T::Opaque, U::Unsupported, false),
        desc!(WM_CTLCOLORDLG, T::Opaque, U::Unsupported, false),
        desc!(WM_CTLCOLORSCROLLBAR, T::Opaque, U::Unsupported, false),
        desc!(WM_CTLCOLORSTATIC, T::Opaque, U::Unsupported, false),
        desc!(WM_PRINT, T::Opaque, U::Unsupported, false),
        desc!(WM_PRINTCLIENT, T::Opaque, U::Unsupported, false),
        desc!(WM_PAINTCLIPBOARD, T::Unsupported, U::Unsupported, false),
        desc!(WM_SIZECLIPBOARD, T::Unsupported, U::Unsupported, false),
        desc!(WM_GETICON, T::Opaque, U::Unsupported, false),
        desc!(WM_SETICON, T::Opaque, U::Unsupported, false),
        desc!(WM_QUERYDRAGICON, T::Opaque, U::Unsupported, false),
        desc!(WM_QUERYPARKICON, T::Opaque, U::Unsupported, false),
        desc!(WM_DROPOBJECT, T::Opaque, U::Unsupported, false),
        desc!(WM_QUERYDROPOBJECT, T::Opaque, U::Unsupported, false),
        desc!(WM_DRAGLOOP, T::Opaque, U::Unsupported, false),
        desc!(WM_DRAGSELECT, T::Opaque, U::Unsupported, false),
        desc!(WM_DRAGMOVE, T::Opaque, U::Unsupported, false),
    ]
}

lazy_static! {
    static ref DESCRIPTORS: RwLock<HashMap<u32, MessageDescriptor>> = RwLock::new(
        builtin_descriptors()
            .into_iter()
            .map(|d| (d.id, d))
            .collect()
    );
}

/// Descriptor for `msg`; unknown ids are opaque.
pub fn lookup(msg: u32) -> MessageDescriptor {
    DESCRIPTORS
        .read()
        .get(&msg)
        .copied()
        .unwrap_or(MessageDescriptor::opaque(msg))
}

/// Diagnostic name for `msg`.
pub fn message_name(msg: u32) -> &'static str {
    lookup(msg).name
}

/// Add or replace an entry. Returns the entry it replaced.
pub fn register_descriptor(descriptor: MessageDescriptor) -> Option<MessageDescriptor> {
    DESCRIPTORS.write().insert(descriptor.id, descriptor)
}

/// Number of entries currently in the table.
pub fn descriptor_count() -> usize {
    DESCRIPTORS.read().len()
}
