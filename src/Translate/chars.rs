// Character parameters.
//
// A narrow character travels in the low word of wparam, either as a single
// byte or as a lead/trail pair packed `lead << 8 | trail`. A wide character is
// one UTF-16 unit in the low word. The high word is never touched.

use super::translator::{CharMapping, Translator};
use crate::Core::thread_state::push_pending_char;
use crate::Message::descriptor::{lookup, CharKind, TextPolicy};
use crate::Message::layout::{hiword, loword, make_wparam};
use crate::Message::WParam;

/// Wide units produced for one narrow character (at most a surrogate pair).
pub(crate) type WideChar = ([u16; 2], usize);

/// Split the packed low word into narrow bytes, lead byte first.
pub(crate) fn packed_narrow_bytes(wparam: WParam) -> ([u8; 2], usize) {
    let lo = loword(wparam);
    let lead = (lo >> 8) as u8;
    let trail = (lo & 0xFF) as u8;
    if lead != 0 {
        ([lead, trail], 2)
    } else {
        ([trail, 0], 1)
    }
}

impl Translator {
    fn narrow_char_to_wide(&self, bytes: &[u8]) -> WideChar {
        let mut wch = [0u16; 2];
        let n = self.input_codepage.to_wide(&mut wch, bytes);
        (wch, n)
    }

    /// Wide units for the character in `wparam`.
    ///
    /// With [`CharMapping::Buffered`] a lone lead byte is parked in thread
    /// state and `None` is returned until its trail bytes arrive.
    pub(crate) fn char_units_a_to_w(&self, wparam: WParam, mapping: CharMapping) -> Option<WideChar> {
        let (bytes, n) = packed_narrow_bytes(wparam);
        if n == 2 || mapping == CharMapping::NoMapping {
            return Some(self.narrow_char_to_wide(&bytes[..n]));
        }
        let seq = push_pending_char(bytes[0], |lead| self.input_codepage.char_len(lead))?;
        Some(self.narrow_char_to_wide(&seq))
    }

    /// Replace the narrow character in `wparam` with its first wide unit.
    /// Returns false when the call has to wait for more bytes.
    pub(crate) fn map_wparam_a_to_w(&self, msg: u32, wparam: &mut WParam, mapping: CharMapping) -> bool {
        let (wch, n) = match lookup(msg).text {
            TextPolicy::Char(CharKind::Char) => match self.char_units_a_to_w(*wparam, mapping) {
                Some(units) => units,
                None => return false,
            },
            TextPolicy::Char(_) => {
                let (bytes, len) = packed_narrow_bytes(*wparam);
                self.narrow_char_to_wide(&bytes[..len])
            }
            _ => return true,
        };
        let unit = if n > 0 { wch[0] } else { 0 };
        *wparam = make_wparam(unit, hiword(*wparam));
        true
    }

    /// Narrow units for one wide unit, written into `out`.
    pub(crate) fn wide_char_to_narrow(&self, wch: u16, out: &mut [u8]) -> usize {
        self.input_codepage.to_narrow(out, &[wch])
    }

    /// Replace the wide character in `wparam` with at most `cap` (1 or 2)
    /// narrow units, packed lead first. Characters that do not fit become `?`.
    pub(crate) fn map_wparam_char_w_to_a(&self, wparam: WParam, cap: usize) -> WParam {
        let mut ch = [0u8; 2];
        let cap = cap.clamp(1, 2);
        let lo = match self.wide_char_to_narrow(loword(wparam), &mut ch[..cap]) {
            2 => ((ch[0] as u16) << 8) | ch[1] as u16,
            1 => ch[0] as u16,
            _ => b'?' as u16,
        };
        make_wparam(lo, hiword(wparam))
    }
}
