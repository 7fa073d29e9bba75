// Cross-encoding translator tests.
//
// The callbacks below stand in for window procedures: `WideEdit` keeps its
// text as UTF-16, `NarrowEdit` as bytes. Tests that read or bump the
// process-wide counters run serially.

use std::cell::{Cell, RefCell};
use std::ffi::c_void;
use std::ptr;
use std::sync::Arc;
use winmsg_marshal::Core::codepage::{Codepage, Latin1Codepage, Utf8Codepage};
use winmsg_marshal::Core::stats;
use winmsg_marshal::Message::ids::*;
use winmsg_marshal::Message::layout::{
    list_text_bytes, CreateStruct, MdiCreateStruct, Msg, LIST_TEXT_UNITS,
};
use winmsg_marshal::Message::{Hwnd, LParam, LResult, WParam};
use winmsg_marshal::Translate::{
    CharMapping, NullHost, ProcCallback, Translator, WindowInfo, WindowTable,
};

const HWND: Hwnd = Hwnd(0x1234);
const WM_USER: u32 = 0x0400;
const LB_ERR: LResult = -1;

fn utf8_translator() -> Translator {
    Translator::new(Arc::new(Utf8Codepage), Arc::new(Utf8Codepage), Arc::new(NullHost))
}

fn latin1_translator() -> Translator {
    Translator::new(Arc::new(Latin1Codepage), Arc::new(Latin1Codepage), Arc::new(NullHost))
}

unsafe fn read_wide(ptr: LParam) -> Vec<u16> {
    let p = ptr as *const u16;
    let mut n = 0;
    while *p.add(n) != 0 {
        n += 1;
    }
    std::slice::from_raw_parts(p, n).to_vec()
}

unsafe fn read_narrow(ptr: LParam) -> Vec<u8> {
    let p = ptr as *const u8;
    let mut n = 0;
    while *p.add(n) != 0 {
        n += 1;
    }
    std::slice::from_raw_parts(p, n).to_vec()
}

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

fn wide_z(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(Some(0)).collect()
}

fn narrow_z(s: &str) -> Vec<u8> {
    s.bytes().chain(Some(0)).collect()
}

/// Edit control storing UTF-16 text.
#[derive(Default)]
struct WideEdit {
    text: Vec<u16>,
    calls: usize,
}

impl ProcCallback for WideEdit {
    fn call(&mut self, _: Hwnd, msg: u32, wparam: WParam, lparam: LParam, result: &mut LResult) -> LResult {
        self.calls += 1;
        *result = unsafe {
            match msg {
                WM_SETTEXT => {
                    self.text = read_wide(lparam);
                    1
                }
                WM_GETTEXT => {
                    if wparam == 0 {
                        0
                    } else {
                        let n = self.text.len().min(wparam - 1);
                        let dst = lparam as *mut u16;
                        ptr::copy_nonoverlapping(self.text.as_ptr(), dst, n);
                        *dst.add(n) = 0;
                        n as LResult
                    }
                }
                WM_GETTEXTLENGTH => self.text.len() as LResult,
                _ => 0,
            }
        };
        *result
    }
}

/// Edit control storing narrow text.
#[derive(Default)]
struct NarrowEdit {
    text: Vec<u8>,
    calls: usize,
}

impl ProcCallback for NarrowEdit {
    fn call(&mut self, _: Hwnd, msg: u32, wparam: WParam, lparam: LParam, result: &mut LResult) -> LResult {
        self.calls += 1;
        *result = unsafe {
            match msg {
                WM_SETTEXT => {
                    self.text = read_narrow(lparam);
                    1
                }
                WM_GETTEXT => {
                    if wparam == 0 {
                        0
                    } else {
                        let n = self.text.len().min(wparam - 1);
                        let dst = lparam as *mut u8;
                        ptr::copy_nonoverlapping(self.text.as_ptr(), dst, n);
                        *dst.add(n) = 0;
                        n as LResult
                    }
                }
                WM_GETTEXTLENGTH => self.text.len() as LResult,
                _ => 0,
            }
        };
        *result
    }
}

fn random_text(alphabet: &[char], max_len: usize) -> String {
    let len = fastrand::usize(0..=max_len);
    (0..len).map(|_| alphabet[fastrand::usize(..alphabet.len())]).collect()
}

const ALPHABET: &[char] = &['a', 'Z', '0', ' ', '\u{e9}', '\u{df}', '\u{20ac}', '\u{4e2d}', '\u{1F600}'];
const BMP_ALPHABET: &[char] = &['a', 'Z', '0', ' ', '\u{e9}', '\u{df}', '\u{20ac}', '\u{4e2d}'];

#[test]
#[serial_test::serial]
fn test_set_text_end_to_end() {
    let tr = utf8_translator();
    let before = stats::snapshot();
    let text = narrow_z("ab");
    let mut seen = Vec::new();
    let mut callback = |_: Hwnd, msg: u32, _: WParam, lparam: LParam, result: &mut LResult| -> LResult {
        assert_eq!(msg, WM_SETTEXT);
        // three units: 'a', 'b' and the terminator
        let units = unsafe { std::slice::from_raw_parts(lparam as *const u16, 3) };
        seen = units.to_vec();
        *result = 1;
        1
    };

    let mut result = 0;
    let ret = unsafe {
        tr.call_proc_a_to_w(
            &mut callback,
            HWND,
            WM_SETTEXT,
            0,
            text.as_ptr() as LParam,
            &mut result,
            CharMapping::default(),
        )
    };

    assert_eq!(ret, 1);
    assert_eq!(result, 1);
    assert_eq!(seen, vec![0x61, 0x62, 0]);
    assert_eq!(stats::snapshot().heap_outstanding(), before.heap_outstanding());
}

#[test]
#[serial_test::serial]
fn test_long_string_escalates_and_releases() {
    let tr = utf8_translator();
    let before = stats::snapshot();
    let long: String = "x".repeat(2000);
    let text = narrow_z(&long);
    let mut edit = WideEdit::default();

    let mut result = 0;
    unsafe {
        tr.call_proc_a_to_w(
            &mut edit,
            HWND,
            WM_SETTEXT,
            0,
            text.as_ptr() as LParam,
            &mut result,
            CharMapping::default(),
        );
    }

    let after = stats::snapshot();
    assert_eq!(edit.text.len(), 2000);
    assert_eq!(after.heap_acquired - before.heap_acquired, 1);
    assert_eq!(after.heap_outstanding(), before.heap_outstanding());
}

#[test]
#[serial_test::parallel]
fn test_round_trip_narrow_caller() {
    let tr = utf8_translator();
    for _ in 0..200 {
        let s = random_text(ALPHABET, 40);
        let mut edit = WideEdit::default();
        let input = narrow_z(&s);
        let mut result = 0;
        unsafe {
            tr.call_proc_a_to_w(&mut edit, HWND, WM_SETTEXT, 0, input.as_ptr() as LParam, &mut result, CharMapping::default());
        }
        assert_eq!(edit.text, wide(&s));

        let cap = s.len() + 1;
        let mut out = vec![0xCCu8; cap];
        unsafe {
            tr.call_proc_a_to_w(&mut edit, HWND, WM_GETTEXT, cap, out.as_mut_ptr() as LParam, &mut result, CharMapping::default());
        }
        assert_eq!(result as usize, s.len(), "text {s:?}");
        assert_eq!(&out[..s.len()], s.as_bytes());
        assert_eq!(out[s.len()], 0);
    }
}

#[test]
#[serial_test::parallel]
fn test_round_trip_wide_caller() {
    let tr = utf8_translator();
    for _ in 0..200 {
        let s = random_text(ALPHABET, 40);
        let mut edit = NarrowEdit::default();
        let input = wide_z(&s);
        let mut result = 0;
        unsafe {
            tr.call_proc_w_to_a(&mut edit, HWND, WM_SETTEXT, 0, input.as_ptr() as LParam, &mut result);
        }
        assert_eq!(edit.text, s.as_bytes());

        let units = wide(&s);
        let cap = units.len() + 1;
        let mut out = vec![0xCCCCu16; cap];
        unsafe {
            tr.call_proc_w_to_a(&mut edit, HWND, WM_GETTEXT, cap, out.as_mut_ptr() as LParam, &mut result);
        }
        assert_eq!(result as usize, units.len(), "text {s:?}");
        assert_eq!(&out[..units.len()], &units[..]);
        assert_eq!(out[units.len()], 0);
    }
}

#[test]
#[serial_test::parallel]
fn test_text_length_is_measured_after_transcoding() {
    let tr = utf8_translator();
    let s = "h\u{e9}llo\u{20ac}";
    let mut result = 0;

    let mut wide_edit = WideEdit {
        text: wide(s),
        calls: 0,
    };
    unsafe {
        tr.call_proc_a_to_w(&mut wide_edit, HWND, WM_GETTEXTLENGTH, 0, 0, &mut result, CharMapping::default());
    }
    assert_eq!(result, 9);
    assert_eq!(result as usize, s.len());
    // length query plus the synthesised get-text
    assert_eq!(wide_edit.calls, 2);

    let mut narrow_edit = NarrowEdit {
        text: s.as_bytes().to_vec(),
        calls: 0,
    };
    unsafe {
        tr.call_proc_w_to_a(&mut narrow_edit, HWND, WM_GETTEXTLENGTH, 0, 0, &mut result);
    }
    assert_eq!(result, 6);
    assert_eq!(narrow_edit.calls, 2);
}

#[test]
#[serial_test::serial]
fn test_get_text_buffer_safety_narrow_caller() {
    let tr = utf8_translator();
    for cap in 0..16usize {
        for _ in 0..20 {
            let s = random_text(BMP_ALPHABET, 12);
            let mut edit = WideEdit {
                text: wide(&s),
                calls: 0,
            };
            let mut out = vec![0xCCu8; cap + 8];
            let mut result = -1;
            unsafe {
                tr.call_proc_a_to_w(&mut edit, HWND, WM_GETTEXT, cap, out.as_mut_ptr() as LParam, &mut result, CharMapping::default());
            }

            assert!(out[cap..].iter().all(|&b| b == 0xCC), "overrun at cap {cap} for {s:?}");
            if cap == 0 {
                continue;
            }
            let len = result as usize;
            assert!(len < cap);
            assert_eq!(out[len], 0);
            let got = std::str::from_utf8(&out[..len]).expect("cut inside a character");
            assert!(s.starts_with(got));
        }
    }
}

#[test]
#[serial_test::serial]
fn test_get_text_buffer_safety_wide_caller() {
    let tr = utf8_translator();
    for cap in 0..16usize {
        for _ in 0..20 {
            let s = random_text(BMP_ALPHABET, 12);
            let mut edit = NarrowEdit {
                text: s.as_bytes().to_vec(),
                calls: 0,
            };
            let mut out = vec![0xCCCCu16; cap + 8];
            let mut result = -1;
            unsafe {
                tr.call_proc_w_to_a(&mut edit, HWND, WM_GETTEXT, cap, out.as_mut_ptr() as LParam, &mut result);
            }

            assert!(out[cap..].iter().all(|&u| u == 0xCCCC), "overrun at cap {cap} for {s:?}");
            if cap == 0 {
                continue;
            }
            let len = result as usize;
            assert!(len < cap);
            assert_eq!(out[len], 0);
            assert!(wide(&s).starts_with(&out[..len]));
        }
    }
}

#[test]
#[serial_test::serial]
fn test_truncated_writeback_is_counted() {
    let tr = utf8_translator();
    let before = stats::snapshot();
    let mut edit = NarrowEdit {
        text: b"abcdef".to_vec(),
        calls: 0,
    };
    // a wide caller offering four units; the narrow callback can fill more
    let mut out = [0xCCCCu16; 4];
    let mut result = 0;
    unsafe {
        tr.call_proc_w_to_a(&mut edit, HWND, WM_GETTEXT, 4, out.as_mut_ptr() as LParam, &mut result);
    }
    assert_eq!(result, 3);
    assert_eq!(out, [0x61, 0x62, 0x63, 0]);
    assert_eq!(stats::snapshot().truncations - before.truncations, 1);
}

#[test]
#[serial_test::parallel]
fn test_create_struct_skips_absent_fields() {
    let tr = utf8_translator();
    let class_atom = 0xC123usize as *const c_void;
    let name = narrow_z("Main");
    let cs = CreateStruct {
        create_params: ptr::null_mut(),
        instance: 0,
        menu: 0,
        parent: Hwnd(0),
        cy: 10,
        cx: 20,
        y: 30,
        x: 40,
        style: 0,
        name: name.as_ptr() as *const c_void,
        class: class_atom,
        ex_style: 0,
    };

    let mut seen = None;
    let mut callback = |_: Hwnd, _: u32, _: WParam, lparam: LParam, _: &mut LResult| -> LResult {
        let got = unsafe { *(lparam as *const CreateStruct) };
        seen = Some((got.class, unsafe { read_wide(got.name as LParam) }, got.cx));
        0
    };
    let mut result = 0;
    unsafe {
        tr.call_proc_a_to_w(&mut callback, HWND, WM_CREATE, 0, &cs as *const _ as LParam, &mut result, CharMapping::default());
    }

    let (class, name_w, cx) = seen.unwrap();
    assert_eq!(class, class_atom);
    assert_eq!(name_w, wide("Main"));
    assert_eq!(cx, 20);
}

#[test]
#[serial_test::parallel]
fn test_create_struct_patches_mdi_child_record() {
    let host = Arc::new(WindowTable::new());
    host.insert(
        HWND,
        WindowInfo {
            ex_style: WS_EX_MDICHILD,
            ..Default::default()
        },
    );
    let tr = Translator::new(Arc::new(Utf8Codepage), Arc::new(Utf8Codepage), host);

    let class = narrow_z("Child");
    let name = narrow_z("Doc 1");
    let mut mdi = MdiCreateStruct {
        class: class.as_ptr() as *const c_void,
        title: name.as_ptr() as *const c_void,
        owner: 0,
        x: 1,
        y: 2,
        cx: 3,
        cy: 4,
        style: 0,
        lparam: 77,
    };
    let cs = CreateStruct {
        create_params: &mut mdi as *mut MdiCreateStruct as *mut c_void,
        instance: 0,
        menu: 0,
        parent: Hwnd(0),
        cy: 0,
        cx: 0,
        y: 0,
        x: 0,
        style: 0,
        name: name.as_ptr() as *const c_void,
        class: class.as_ptr() as *const c_void,
        ex_style: WS_EX_MDICHILD,
    };

    let mut checked = false;
    let mut callback = |_: Hwnd, _: u32, _: WParam, lparam: LParam, _: &mut LResult| -> LResult { unsafe {
        let got = *(lparam as *const CreateStruct);
        let inner = *(got.create_params as *const MdiCreateStruct);
        assert_ne!(got.create_params, cs.create_params);
        assert_eq!(inner.title, got.name);
        assert_eq!(inner.class, got.class);
        assert_eq!(read_wide(inner.title as LParam), wide("Doc 1"));
        assert_eq!(read_wide(inner.class as LParam), wide("Child"));
        assert_eq!(inner.lparam, 77);
        checked = true;
        0
    }};
    let mut result = 0;
    unsafe {
        tr.call_proc_a_to_w(&mut callback, HWND, WM_NCCREATE, 0, &cs as *const _ as LParam, &mut result, CharMapping::default());
    }
    assert!(checked);
    // the caller's record is left alone
    assert_eq!(mdi.title, name.as_ptr() as *const c_void);
}

#[test]
#[serial_test::parallel]
fn test_create_struct_ordinal_name_wide_to_narrow() {
    let tr = utf8_translator();
    let name = [0xFFFFu16, 0x0102, 0];
    let class = wide_z("Dlg");
    let cs = CreateStruct {
        create_params: ptr::null_mut(),
        instance: 0,
        menu: 0,
        parent: Hwnd(0),
        cy: 0,
        cx: 0,
        y: 0,
        x: 0,
        style: 0,
        name: name.as_ptr() as *const c_void,
        class: class.as_ptr() as *const c_void,
        ex_style: 0,
    };

    let mut seen = None;
    let mut callback = |_: Hwnd, _: u32, _: WParam, lparam: LParam, _: &mut LResult| -> LResult { unsafe {
        let got = *(lparam as *const CreateStruct);
        let name = std::slice::from_raw_parts(got.name as *const u8, 4).to_vec();
        seen = Some((name, read_narrow(got.class as LParam)));
        0
    }};
    let mut result = 0;
    unsafe {
        tr.call_proc_w_to_a(&mut callback, HWND, WM_CREATE, 0, &cs as *const _ as LParam, &mut result);
    }
    let (name, class) = seen.unwrap();
    assert_eq!(name, vec![0xFF, 0x02, 0x01, 0]);
    assert_eq!(class, b"Dlg");
}

#[test]
#[serial_test::parallel]
fn test_mdi_create_both_directions() {
    let tr = utf8_translator();
    let title = narrow_z("T\u{e9}");
    let class = narrow_z("C");
    let mcs = MdiCreateStruct {
        class: class.as_ptr() as *const c_void,
        title: title.as_ptr() as *const c_void,
        owner: 0,
        x: 0,
        y: 0,
        cx: 0,
        cy: 0,
        style: 0,
        lparam: 0,
    };
    let mut seen = None;
    let mut callback = |_: Hwnd, _: u32, _: WParam, lparam: LParam, _: &mut LResult| -> LResult { unsafe {
        let got = *(lparam as *const MdiCreateStruct);
        // title is laid out first, the class right behind it
        assert_eq!(got.class as usize, got.title as usize + 3 * 2);
        seen = Some((read_wide(got.title as LParam), read_wide(got.class as LParam)));
        0
    }};
    let mut result = 0;
    unsafe {
        tr.call_proc_a_to_w(&mut callback, HWND, WM_MDICREATE, 0, &mcs as *const _ as LParam, &mut result, CharMapping::default());
    }
    assert_eq!(seen.unwrap(), (wide("T\u{e9}"), wide("C")));

    let title_w = wide_z("T\u{e9}");
    let mcs_w = MdiCreateStruct {
        class: 0x0042usize as *const c_void,
        title: title_w.as_ptr() as *const c_void,
        ..mcs
    };
    let mut seen = None;
    let mut callback = |_: Hwnd, _: u32, _: WParam, lparam: LParam, _: &mut LResult| -> LResult { unsafe {
        let got = *(lparam as *const MdiCreateStruct);
        seen = Some((read_narrow(got.title as LParam), got.class as usize));
        0
    }};
    unsafe {
        tr.call_proc_w_to_a(&mut callback, HWND, WM_MDICREATE, 0, &mcs_w as *const _ as LParam, &mut result);
    }
    assert_eq!(seen.unwrap(), ("T\u{e9}".as_bytes().to_vec(), 0x42));
}

#[test]
#[serial_test::parallel]
fn test_null_string_passes_through() {
    let tr = utf8_translator();
    let mut seen = None;
    let mut callback = |_: Hwnd, _: u32, _: WParam, lparam: LParam, _: &mut LResult| -> LResult {
        seen = Some(lparam);
        5
    };
    let mut result = 0;
    let ret = unsafe { tr.call_proc_a_to_w(&mut callback, HWND, WM_SETTEXT, 0, 0, &mut result, CharMapping::default()) };
    assert_eq!(ret, 5);
    assert_eq!(seen, Some(0));
}

#[test]
#[serial_test::parallel]
fn test_list_strings_follow_control_style() {
    let host = Arc::new(WindowTable::new());
    let tr = Translator::new(Arc::new(Utf8Codepage), Arc::new(Utf8Codepage), host.clone());
    let item = narrow_z("item");

    // plain list box: the string is translated
    let seen = Cell::new(None);
    let mut callback = |_: Hwnd, _: u32, _: WParam, lparam: LParam, _: &mut LResult| -> LResult {
        seen.set(Some(lparam));
        0
    };
    let mut result = 0;
    unsafe {
        tr.call_proc_a_to_w(&mut callback, HWND, LB_ADDSTRING, 0, item.as_ptr() as LParam, &mut result, CharMapping::default());
    }
    assert_ne!(seen.get(), Some(item.as_ptr() as LParam));

    // owner-drawn without has-strings: lparam is item data
    host.insert(
        HWND,
        WindowInfo {
            style: LBS_OWNERDRAWFIXED,
            ..Default::default()
        },
    );
    unsafe {
        tr.call_proc_a_to_w(&mut callback, HWND, LB_ADDSTRING, 0, item.as_ptr() as LParam, &mut result, CharMapping::default());
    }
    assert_eq!(seen.get(), Some(item.as_ptr() as LParam));

    // owner-drawn with has-strings: translated again
    host.update(HWND, |w| w.style |= LBS_HASSTRINGS);
    unsafe {
        tr.call_proc_a_to_w(&mut callback, HWND, LB_ADDSTRING, 0, item.as_ptr() as LParam, &mut result, CharMapping::default());
    }
    assert_ne!(seen.get(), Some(item.as_ptr() as LParam));
}

#[test]
#[serial_test::parallel]
fn test_list_item_text_into_unsized_buffer() {
    let tr = utf8_translator();
    let mut callback = |_: Hwnd, msg: u32, _: WParam, lparam: LParam, result: &mut LResult| -> LResult { unsafe {
        assert_eq!(msg, LB_GETTEXT);
        let text = wide_z("\u{e9}t\u{e9}");
        ptr::copy_nonoverlapping(text.as_ptr(), lparam as *mut u16, text.len());
        *result = 3;
        3
    }};
    let mut out = [0xCCu8; 16];
    let mut result = 0;
    unsafe {
        tr.call_proc_a_to_w(&mut callback, HWND, LB_GETTEXT, 0, out.as_mut_ptr() as LParam, &mut result, CharMapping::default());
    }
    assert_eq!(result, 5);
    assert_eq!(&out[..6], "\u{e9}t\u{e9}\0".as_bytes());
    assert_eq!(out[6], 0xCC);
}

#[test]
#[serial_test::parallel]
fn test_list_item_error_leaves_buffer() {
    let tr = utf8_translator();
    let mut callback = |_: Hwnd, _: u32, _: WParam, _: LParam, result: &mut LResult| -> LResult {
        *result = LB_ERR;
        LB_ERR
    };
    let mut out = [0xCCu16; 4];
    let mut result = 0;
    unsafe {
        tr.call_proc_w_to_a(&mut callback, HWND, CB_GETLBTEXT, 0, out.as_mut_ptr() as LParam, &mut result);
    }
    assert_eq!(result, LB_ERR);
    assert_eq!(out, [0xCC; 4]);
}

#[test]
#[serial_test::serial]
fn test_list_item_text_clamped_to_list_buffer() {
    let tr = utf8_translator();
    let before = stats::snapshot();

    // every wide unit expands to three bytes; the full item overflows by one
    let mut wide_list = |_: Hwnd, _: u32, _: WParam, lparam: LParam, result: &mut LResult| -> LResult { unsafe {
        let dst = std::slice::from_raw_parts_mut(lparam as *mut u16, LIST_TEXT_UNITS);
        dst.fill(0x20AC);
        *result = LIST_TEXT_UNITS as LResult;
        *result
    }};
    let cap = list_text_bytes(true);
    let mut out = vec![0xCCu8; cap + 8];
    let mut result = 0;
    unsafe {
        tr.call_proc_a_to_w(&mut wide_list, HWND, LB_GETTEXT, 0, out.as_mut_ptr() as LParam, &mut result, CharMapping::default());
    }
    println!("narrow item: {result} bytes into a {cap} byte buffer");
    assert_eq!(result, 1533);
    assert_eq!(out[1533], 0);
    assert!(out[cap..].iter().all(|&b| b == 0xCC));

    // an unterminated narrow item fills the whole fixed buffer
    let mut narrow_list = |_: Hwnd, _: u32, _: WParam, lparam: LParam, result: &mut LResult| -> LResult { unsafe {
        ptr::write_bytes(lparam as *mut u8, b'a', LIST_TEXT_UNITS);
        *result = LIST_TEXT_UNITS as LResult;
        *result
    }};
    let units = list_text_bytes(false) / 2;
    let mut out = vec![0xCCCCu16; units + 4];
    unsafe {
        tr.call_proc_w_to_a(&mut narrow_list, HWND, CB_GETLBTEXT, 0, out.as_mut_ptr() as LParam, &mut result);
    }
    assert_eq!(result as usize, units - 1);
    assert_eq!(out[units - 1], 0);
    assert!(out[units..].iter().all(|&u| u == 0xCCCC));
    assert_eq!(stats::snapshot().truncations - before.truncations, 2);
}

#[test]
#[serial_test::parallel]
fn test_unmeasurable_length_reports_zero() {
    let tr = utf8_translator();
    let fetched = Cell::new(false);
    let mut callback = |_: Hwnd, msg: u32, _: WParam, _: LParam, result: &mut LResult| -> LResult {
        if msg == WM_GETTEXTLENGTH {
            *result = LResult::MAX;
        } else {
            fetched.set(true);
        }
        *result
    };

    // the scratch buffer for the synthesised get-text cannot be provided
    let mut result = -1;
    unsafe {
        tr.call_proc_a_to_w(&mut callback, HWND, WM_GETTEXTLENGTH, 0, 0, &mut result, CharMapping::default());
    }
    assert_eq!(result, 0);

    result = -1;
    unsafe {
        tr.call_proc_w_to_a(&mut callback, HWND, WM_GETTEXTLENGTH, 0, 0, &mut result);
    }
    assert_eq!(result, 0);
    assert!(!fetched.get());
}

#[test]
#[serial_test::serial]
fn test_get_line_capacity_word() {
    let tr = utf8_translator();

    // narrow caller: ten bytes, capacity in the first word
    let mut buf = [0u8; 10];
    buf[..2].copy_from_slice(&10u16.to_ne_bytes());
    let mut callback = |_: Hwnd, _: u32, _: WParam, lparam: LParam, result: &mut LResult| -> LResult { unsafe {
        let line = lparam as *mut u16;
        assert_eq!(*line, 10);
        let text = wide("hello");
        ptr::copy_nonoverlapping(text.as_ptr(), line, text.len());
        *result = 5;
        5
    }};
    let mut result = 0;
    unsafe {
        tr.call_proc_a_to_w(&mut callback, HWND, EM_GETLINE, 0, buf.as_mut_ptr() as LParam, &mut result, CharMapping::default());
    }
    assert_eq!(result, 5);
    assert_eq!(&buf[..6], b"hello\0");

    // wide caller: four units; the narrow side sees the byte capacity
    let mut buf = [4u16, 0, 0, 0];
    let mut seen_cap = 0;
    let mut callback = |_: Hwnd, _: u32, _: WParam, lparam: LParam, result: &mut LResult| -> LResult { unsafe {
        let line = lparam as *mut u8;
        seen_cap = (line as *const u16).read_unaligned();
        ptr::copy_nonoverlapping(b"abcdef".as_ptr(), line, 6);
        *result = 6;
        6
    }};
    unsafe {
        tr.call_proc_w_to_a(&mut callback, HWND, EM_GETLINE, 0, buf.as_mut_ptr() as LParam, &mut result);
    }
    assert_eq!(seen_cap as usize, 4 * Utf8Codepage.max_narrow_per_wide());
    assert_eq!(result, 4);
    // filled to capacity: no terminator
    assert_eq!(buf, [0x61, 0x62, 0x63, 0x64]);
}

#[test]
#[serial_test::parallel]
fn test_dialog_code_translates_embedded_char() {
    let tr = latin1_translator();
    let caller_msg = Msg {
        hwnd: HWND,
        message: WM_CHAR,
        wparam: 0xE9,
        ..Default::default()
    };
    let seen = Cell::new(None);
    let mut callback = |_: Hwnd, _: u32, _: WParam, lparam: LParam, _: &mut LResult| -> LResult { unsafe {
        assert_ne!(lparam, &caller_msg as *const Msg as LParam);
        seen.set(Some((*(lparam as *const Msg)).wparam));
        0
    }};
    let mut result = 0;
    unsafe {
        tr.call_proc_a_to_w(&mut callback, HWND, WM_GETDLGCODE, 0, &caller_msg as *const _ as LParam, &mut result, CharMapping::default());
    }
    assert_eq!(seen.get(), Some(0xE9));

    let wide_msg = Msg {
        hwnd: HWND,
        message: WM_CHAR,
        wparam: 0x20AC,
        ..Default::default()
    };
    unsafe {
        tr.call_proc_w_to_a(&mut callback, HWND, WM_GETDLGCODE, 0, &wide_msg as *const _ as LParam, &mut result);
    }
    // the euro sign has no Latin-1 form
    assert_eq!(seen.get(), Some(b'?' as WParam));
}

#[test]
#[serial_test::parallel]
fn test_wm_char_one_call_per_narrow_byte() {
    let calls = RefCell::new(Vec::new());
    let mut callback = |_: Hwnd, _: u32, wparam: WParam, _: LParam, _: &mut LResult| -> LResult {
        calls.borrow_mut().push(wparam);
        0
    };
    let mut result = 0;
    unsafe {
        utf8_translator().call_proc_w_to_a(&mut callback, HWND, WM_CHAR, 0x00E9, 1, &mut result);
    }
    assert_eq!(*calls.borrow(), vec![0xC3, 0xA9]);

    calls.borrow_mut().clear();
    unsafe {
        latin1_translator().call_proc_w_to_a(&mut callback, HWND, WM_CHAR, 0x00E9, 1, &mut result);
    }
    assert_eq!(*calls.borrow(), vec![0xE9]);
}

#[test]
#[serial_test::parallel]
fn test_wm_char_buffers_lead_bytes() {
    let tr = utf8_translator();
    let calls = RefCell::new(Vec::new());
    let mut callback = |_: Hwnd, _: u32, wparam: WParam, _: LParam, _: &mut LResult| -> LResult {
        calls.borrow_mut().push(wparam);
        0
    };
    let mut result = 0;
    for byte in "\u{20AC}".bytes() {
        unsafe {
            tr.call_proc_a_to_w(&mut callback, HWND, WM_CHAR, byte as WParam, 1, &mut result, CharMapping::Buffered);
        }
    }
    assert_eq!(*calls.borrow(), vec![0x20AC]);

    // supplementary characters arrive as two wide calls
    calls.borrow_mut().clear();
    for byte in "\u{1F600}".bytes() {
        unsafe {
            tr.call_proc_a_to_w(&mut callback, HWND, WM_CHAR, byte as WParam, 1, &mut result, CharMapping::Buffered);
        }
    }
    assert_eq!(*calls.borrow(), vec![0xD83D, 0xDE00]);
}

#[test]
#[serial_test::parallel]
fn test_packed_char_messages() {
    let tr = utf8_translator();
    let mut seen = Vec::new();
    let mut callback = |_: Hwnd, _: u32, wparam: WParam, _: LParam, _: &mut LResult| -> LResult {
        seen.push(wparam);
        0
    };
    let mut result = 0;
    unsafe {
        // double-byte IME character keeps its high word
        tr.call_proc_w_to_a(&mut callback, HWND, WM_IME_CHAR, 0x0005_00E9, 0, &mut result);
        // one-byte messages cannot carry it
        tr.call_proc_w_to_a(&mut callback, HWND, WM_SYSCHAR, 0x00E9, 0, &mut result);
        // and back again
        tr.call_proc_a_to_w(&mut callback, HWND, WM_IME_CHAR, 0x0005_C3A9, 0, &mut result, CharMapping::default());
        tr.call_proc_a_to_w(&mut callback, HWND, WM_DEADCHAR, 0x61, 0, &mut result, CharMapping::default());
    }
    assert_eq!(seen, vec![0x0005_C3A9, b'?' as WParam, 0x0005_00E9, 0x61]);
}

#[test]
#[serial_test::serial]
fn test_unsupported_message_is_skipped() {
    let tr = utf8_translator();
    let before = stats::snapshot();
    let mut called = false;
    let mut callback = |_: Hwnd, _: u32, _: WParam, _: LParam, _: &mut LResult| -> LResult {
        called = true;
        1
    };
    let mut result = 0;
    let ret = unsafe { tr.call_proc_a_to_w(&mut callback, HWND, WM_PAINTCLIPBOARD, 0, 0, &mut result, CharMapping::default()) };
    assert!(!called);
    assert_eq!(ret, 0);
    assert_eq!(stats::snapshot().unsupported - before.unsupported, 1);
}

#[test]
#[serial_test::parallel]
fn test_oversized_capacity_skips_callback() {
    let tr = utf8_translator();
    let mut called = false;
    let mut callback = |_: Hwnd, _: u32, _: WParam, _: LParam, _: &mut LResult| -> LResult {
        called = true;
        1
    };
    let mut out = [0u8; 4];
    let mut result = 0;
    let ret = unsafe {
        tr.call_proc_a_to_w(&mut callback, HWND, WM_GETTEXT, usize::MAX, out.as_mut_ptr() as LParam, &mut result, CharMapping::default())
    };
    assert!(!called);
    assert_eq!(ret, 0);
}

#[test]
#[serial_test::parallel]
fn test_opaque_message_untouched() {
    let tr = utf8_translator();
    let mut seen = None;
    let mut callback = |_: Hwnd, msg: u32, wparam: WParam, lparam: LParam, result: &mut LResult| -> LResult {
        seen = Some((msg, wparam, lparam));
        *result = 9;
        9
    };
    let mut result = 0;
    let ret = unsafe { tr.call_proc_w_to_a(&mut callback, HWND, WM_USER + 5, 0xDEAD, -7, &mut result) };
    assert_eq!(seen, Some((WM_USER + 5, 0xDEAD, -7)));
    assert_eq!((ret, result), (9, 9));
}
