use super::*;

/// Read-only accessors for ScratchBuffer, used by the translators and the
/// debug formatter.
impl ScratchBuffer<'_> {
    /// Usable length in bytes. The full stack capacity when static, the
    /// requested size when on the heap.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True when the buffer aliases the caller's stack storage.
    pub fn is_static(&self) -> bool {
        !self.heap
    }

    /// Address of the first byte, without requiring a mutable borrow.
    pub fn addr(&self) -> usize {
        self.ptr.as_ptr() as usize
    }
}
