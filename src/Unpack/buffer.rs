use crate::Core::error::{MarshalError, Result};
use std::slice;

/// Largest size a received buffer is grown to on the sender's say-so.
pub const MAX_GROWN_BYTES: usize = 1 << 24;

/// Received message payload.
///
/// Backed by 64-bit words so the fixed-size records at the front of a
/// payload can be read in place. Growing the buffer may move it; pointers
/// into it are only taken after the last resize.
#[derive(Clone, Default)]
pub struct MessageBuffer {
    words: Vec<u64>,
    len: usize,
}

impl MessageBuffer {
    /// Zero-filled buffer of `len` bytes.
    pub fn with_len(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(8)],
            len,
        }
    }

    /// Copy of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut buffer = Self::with_len(bytes.len());
        buffer.as_bytes_mut().copy_from_slice(bytes);
        buffer
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.words.as_ptr() as *const u8
    }

    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.words.as_mut_ptr() as *mut u8
    }

    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: words holds at least len initialised bytes.
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len) }
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let len = self.len;
        // SAFETY: as above, uniquely borrowed.
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), len) }
    }

    /// Grow to at least `len` bytes, zero-filling the new tail. Returns
    /// whether the buffer grew. Requests past [`MAX_GROWN_BYTES`], or that
    /// the allocator refuses, leave the buffer as it was.
    pub fn ensure_len(&mut self, len: usize) -> Result<bool> {
        if len <= self.len {
            return Ok(false);
        }
        if len > MAX_GROWN_BYTES {
            return Err(MarshalError::Allocation { requested: len });
        }
        let words = len.div_ceil(8);
        self.words
            .try_reserve_exact(words.saturating_sub(self.words.len()))
            .map_err(|_| MarshalError::Allocation { requested: len })?;
        self.words.resize(words, 0);
        self.len = len;
        Ok(true)
    }
}
