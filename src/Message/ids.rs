// ── Window message identifiers ────────────────────────────────────────────────
//
// Only the messages the marshaling layer classifies are listed; everything
// else is opaque and passes through untouched.

// ── Window lifetime / text ──────────────────────────────────────────────────

pub const WM_CREATE: u32 = 0x0001;
pub const WM_SETTEXT: u32 = 0x000C;
pub const WM_GETTEXT: u32 = 0x000D;
pub const WM_GETTEXTLENGTH: u32 = 0x000E;
pub const WM_PAINT: u32 = 0x000F;
pub const WM_ERASEBKGND: u32 = 0x0014;
pub const WM_WININICHANGE: u32 = 0x001A;
pub const WM_DEVMODECHANGE: u32 = 0x001B;
pub const WM_GETMINMAXINFO: u32 = 0x0024;
pub const WM_ICONERASEBKGND: u32 = 0x0027;
pub const WM_DRAWITEM: u32 = 0x002B;
pub const WM_MEASUREITEM: u32 = 0x002C;
pub const WM_DELETEITEM: u32 = 0x002D;
pub const WM_CHARTOITEM: u32 = 0x002F;
pub const WM_SETFONT: u32 = 0x0030;
pub const WM_GETFONT: u32 = 0x0031;
pub const WM_QUERYPARKICON: u32 = 0x0036;
pub const WM_QUERYDRAGICON: u32 = 0x0037;
pub const WM_COMPAREITEM: u32 = 0x0039;
pub const WM_WINDOWPOSCHANGING: u32 = 0x0046;
pub const WM_WINDOWPOSCHANGED: u32 = 0x0047;
pub const WM_COPYDATA: u32 = 0x004A;
pub const WM_NOTIFY: u32 = 0x004E;
pub const WM_HELP: u32 = 0x0053;
pub const WM_STYLECHANGING: u32 = 0x007C;
pub const WM_STYLECHANGED: u32 = 0x007D;
pub const WM_GETICON: u32 = 0x007F;
pub const WM_SETICON: u32 = 0x0080;
pub const WM_NCCREATE: u32 = 0x0081;
pub const WM_NCCALCSIZE: u32 = 0x0083;
pub const WM_NCPAINT: u32 = 0x0085;
pub const WM_GETDLGCODE: u32 = 0x0087;

// ── Edit control ────────────────────────────────────────────────────────────

pub const EM_GETSEL: u32 = 0x00B0;
pub const EM_GETRECT: u32 = 0x00B2;
pub const EM_SETRECT: u32 = 0x00B3;
pub const EM_SETRECTNP: u32 = 0x00B4;
pub const EM_REPLACESEL: u32 = 0x00C2;
pub const EM_GETLINE: u32 = 0x00C4;
pub const EM_SETTABSTOPS: u32 = 0x00CB;
pub const EM_SETPASSWORDCHAR: u32 = 0x00CC;

// ── Scroll bar ──────────────────────────────────────────────────────────────

pub const SBM_GETRANGE: u32 = 0x00E3;
pub const SBM_SETSCROLLINFO: u32 = 0x00E9;
pub const SBM_GETSCROLLINFO: u32 = 0x00EA;
pub const SBM_GETSCROLLBARINFO: u32 = 0x00EB;

// ── Keyboard ────────────────────────────────────────────────────────────────

pub const WM_CHAR: u32 = 0x0102;
pub const WM_DEADCHAR: u32 = 0x0103;
pub const WM_SYSCHAR: u32 = 0x0106;
pub const WM_SYSDEADCHAR: u32 = 0x0107;
pub const WM_MENUCHAR: u32 = 0x0120;
pub const WM_IME_CHAR: u32 = 0x0286;

// ── Control colours ─────────────────────────────────────────────────────────

pub const WM_CTLCOLORMSGBOX: u32 = 0x0132;
pub const WM_CTLCOLOREDIT: u32 = 0x0133;
pub const WM_CTLCOLORLISTBOX: u32 = 0x0134;
pub const WM_CTLCOLORBTN: u32 = 0x0135;
pub const WM_CTLCOLORDLG: u32 = 0x0136;
pub const WM_CTLCOLORSCROLLBAR: u32 = 0x0137;
pub const WM_CTLCOLORSTATIC: u32 = 0x0138;

// ── Combo box ───────────────────────────────────────────────────────────────

pub const CB_GETEDITSEL: u32 = 0x0140;
pub const CB_ADDSTRING: u32 = 0x0143;
pub const CB_DIR: u32 = 0x0145;
pub const CB_GETLBTEXT: u32 = 0x0148;
pub const CB_GETLBTEXTLEN: u32 = 0x0149;
pub const CB_INSERTSTRING: u32 = 0x014A;
pub const CB_FINDSTRING: u32 = 0x014C;
pub const CB_SELECTSTRING: u32 = 0x014D;
pub const CB_GETDROPPEDCONTROLRECT: u32 = 0x0152;
pub const CB_FINDSTRINGEXACT: u32 = 0x0158;
/// Highest combo box message; list box messages sit above it.
pub const CB_MSGMAX: u32 = 0x0165;

// ── List box ────────────────────────────────────────────────────────────────

pub const LB_ADDSTRING: u32 = 0x0180;
pub const LB_INSERTSTRING: u32 = 0x0181;
pub const LB_GETTEXT: u32 = 0x0189;
pub const LB_GETTEXTLEN: u32 = 0x018A;
pub const LB_SELECTSTRING: u32 = 0x018C;
pub const LB_DIR: u32 = 0x018D;
pub const LB_FINDSTRING: u32 = 0x018F;
pub const LB_GETSELITEMS: u32 = 0x0191;
pub const LB_SETTABSTOPS: u32 = 0x0192;
pub const LB_ADDFILE: u32 = 0x0196;
pub const LB_GETITEMRECT: u32 = 0x0198;
pub const LB_FINDSTRINGEXACT: u32 = 0x01A2;

// ── Menus, sizing, devices ──────────────────────────────────────────────────

pub const WM_NEXTMENU: u32 = 0x0213;
pub const WM_SIZING: u32 = 0x0214;
pub const WM_MOVING: u32 = 0x0216;
pub const WM_DEVICECHANGE: u32 = 0x0219;

// ── MDI ─────────────────────────────────────────────────────────────────────

pub const WM_MDICREATE: u32 = 0x0220;
pub const WM_MDIGETACTIVE: u32 = 0x0229;

// ── Drag and drop (pointer-carrying) ────────────────────────────────────────

pub const WM_DROPOBJECT: u32 = 0x022A;
pub const WM_QUERYDROPOBJECT: u32 = 0x022B;
pub const WM_DRAGLOOP: u32 = 0x022D;
pub const WM_DRAGSELECT: u32 = 0x022E;
pub const WM_DRAGMOVE: u32 = 0x022F;

// ── Clipboard / printing ────────────────────────────────────────────────────

pub const WM_PRINT: u32 = 0x0317;
pub const WM_PRINTCLIENT: u32 = 0x0318;
pub const WM_PAINTCLIPBOARD: u32 = 0x0309;
pub const WM_SIZECLIPBOARD: u32 = 0x030B;
pub const WM_ASKCBFORMATNAME: u32 = 0x030C;

// ── Styles consulted while translating ──────────────────────────────────────

/// Extended style of an MDI child; its creation record embeds an MDI record.
pub const WS_EX_MDICHILD: u32 = 0x0000_0040;

pub const CBS_OWNERDRAWFIXED: u32 = 0x0010;
pub const CBS_OWNERDRAWVARIABLE: u32 = 0x0020;
pub const CBS_HASSTRINGS: u32 = 0x0200;

pub const LBS_OWNERDRAWFIXED: u32 = 0x0010;
pub const LBS_OWNERDRAWVARIABLE: u32 = 0x0020;
pub const LBS_HASSTRINGS: u32 = 0x0040;

/// `WM_DEVICECHANGE` events at or above this bit carry a broadcast header.
pub const DBT_BROADCAST_BIT: usize = 0x8000;
