// Raw string helpers for pointers carried in message parameters.

use std::slice;

/// Length of a NUL-terminated narrow string, terminator excluded.
///
/// # Safety
/// `ptr` must point to a readable NUL-terminated byte string.
pub(crate) unsafe fn strlen(ptr: *const u8) -> usize {
    libc::strlen(ptr as *const libc::c_char)
}

/// Length of a NUL-terminated wide string, terminator excluded.
///
/// # Safety
/// `ptr` must point to a readable NUL-terminated `u16` string.
pub(crate) unsafe fn wcslen(ptr: *const u16) -> usize {
    let mut n = 0;
    while *ptr.add(n) != 0 {
        n += 1;
    }
    n
}

/// Narrow string including its terminator.
///
/// # Safety
/// As [`strlen`]; the returned slice must not outlive the string.
pub(crate) unsafe fn narrow_with_nul<'a>(ptr: *const u8) -> &'a [u8] {
    slice::from_raw_parts(ptr, strlen(ptr) + 1)
}

/// Wide string including its terminator.
///
/// # Safety
/// As [`wcslen`]; the returned slice must not outlive the string.
pub(crate) unsafe fn wide_with_nul<'a>(ptr: *const u16) -> &'a [u16] {
    slice::from_raw_parts(ptr, wcslen(ptr) + 1)
}

/// Content of `buf` up to (not including) the first NUL, or all of it.
pub(crate) fn until_nul<T: Copy + Default + PartialEq>(buf: &[T]) -> &[T] {
    let end = buf.iter().position(|c| *c == T::default()).unwrap_or(buf.len());
    &buf[..end]
}
