// Codepage conversion primitives.
//
// The marshaling layer treats conversion as a given service: it asks for the
// size of a converted run, then converts into a buffer it sized itself.
// Narrow sizes are in bytes, wide sizes in 16-bit code units. Terminators are
// ordinary units here; callers decide whether to include them.

use std::borrow::Cow;

/// Code page identifier for UTF-8.
pub const CP_UTF8: u32 = 65001;
/// Code page identifier for ISO 8859-1.
pub const CP_LATIN1: u32 = 28591;

/// Largest `max_narrow_per_wide` among the codepages [`by_id`] returns.
pub const MAX_NARROW_PER_WIDE: usize = 3;

/// A narrow/wide conversion pair.
pub trait Codepage: Send + Sync {
    /// Numeric code page identifier.
    fn id(&self) -> u32;

    /// Wide units produced by converting all of `src`.
    fn wide_len(&self, src: &[u8]) -> usize;

    /// Narrow bytes produced by converting all of `src`.
    fn narrow_len(&self, src: &[u16]) -> usize;

    /// Convert `src` into `dst`, stopping at the last whole character that
    /// fits. Returns the number of wide units written.
    fn to_wide(&self, dst: &mut [u16], src: &[u8]) -> usize;

    /// Convert `src` into `dst`, stopping at the last whole character that
    /// fits. Returns the number of bytes written.
    fn to_narrow(&self, dst: &mut [u8], src: &[u16]) -> usize;

    /// Length in bytes of the narrow character that starts with `lead`.
    fn char_len(&self, lead: u8) -> usize;

    /// Most narrow bytes one wide unit can expand to.
    fn max_narrow_per_wide(&self) -> usize {
        2
    }
}

/// Look up one of the built-in code pages by identifier.
pub fn by_id(id: u32) -> Option<Box<dyn Codepage>> {
    match id {
        CP_UTF8 => Some(Box::new(Utf8Codepage)),
        CP_LATIN1 => Some(Box::new(Latin1Codepage)),
        _ => None,
    }
}

/// UTF-8 narrow encoding. Invalid sequences decode to U+FFFD, unpaired
/// surrogates encode as U+FFFD.
#[derive(Debug, Default, Clone, Copy)]
pub struct Utf8Codepage;

fn decode_narrow(src: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(src)
}

fn decode_wide(src: &[u16]) -> impl Iterator<Item = char> + '_ {
    char::decode_utf16(src.iter().copied()).map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
}

impl Codepage for Utf8Codepage {
    fn id(&self) -> u32 {
        CP_UTF8
    }

    fn wide_len(&self, src: &[u8]) -> usize {
        decode_narrow(src).chars().map(char::len_utf16).sum()
    }

    fn narrow_len(&self, src: &[u16]) -> usize {
        decode_wide(src).map(char::len_utf8).sum()
    }

    fn to_wide(&self, dst: &mut [u16], src: &[u8]) -> usize {
        let mut written = 0;
        for c in decode_narrow(src).chars() {
            let n = c.len_utf16();
            if written + n > dst.len() {
                break;
            }
            c.encode_utf16(&mut dst[written..written + n]);
            written += n;
        }
        written
    }

    fn to_narrow(&self, dst: &mut [u8], src: &[u16]) -> usize {
        let mut written = 0;
        for c in decode_wide(src) {
            let n = c.len_utf8();
            if written + n > dst.len() {
                break;
            }
            c.encode_utf8(&mut dst[written..written + n]);
            written += n;
        }
        written
    }

    fn char_len(&self, lead: u8) -> usize {
        match lead {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        }
    }

    fn max_narrow_per_wide(&self) -> usize {
        3
    }
}

/// ISO 8859-1: one byte per unit, units above 0xFF become `?`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Latin1Codepage;

impl Codepage for Latin1Codepage {
    fn id(&self) -> u32 {
        CP_LATIN1
    }

    fn wide_len(&self, src: &[u8]) -> usize {
        src.len()
    }

    fn narrow_len(&self, src: &[u16]) -> usize {
        src.len()
    }

    fn to_wide(&self, dst: &mut [u16], src: &[u8]) -> usize {
        let n = dst.len().min(src.len());
        for (d, &s) in dst.iter_mut().zip(&src[..n]) {
            *d = s as u16;
        }
        n
    }

    fn to_narrow(&self, dst: &mut [u8], src: &[u16]) -> usize {
        let n = dst.len().min(src.len());
        for (d, &s) in dst.iter_mut().zip(&src[..n]) {
            *d = u8::try_from(s).unwrap_or(b'?');
        }
        n
    }

    fn char_len(&self, _lead: u8) -> usize {
        1
    }

    fn max_narrow_per_wide(&self) -> usize {
        1
    }
}
