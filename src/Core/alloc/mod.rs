use crate::Core::error::{MarshalError, Result};
use crate::Core::stats::STATS;
use std::marker::PhantomData;
use std::ptr::NonNull;
mod debug;
mod getters;

/// Capacity, in bytes, of the stack buffers the translators reserve.
/// Covers 512 wide units or 1024 narrow units.
pub const SCRATCH_STATIC_BYTES: usize = 1024;

/// Fixed-size, stack-resident backing store tried before the heap.
///
/// Aligned to 16 so the same storage can be viewed as wide units or as a
/// `#[repr(C)]` record without extra checks.
#[repr(C, align(16))]
pub struct StackBuffer<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> StackBuffer<N> {
    /// Capacity in bytes.
    pub const CAPACITY: usize = N;

    pub const fn new() -> Self {
        Self { bytes: [0; N] }
    }

    /// Address of the first byte, for identity checks against a scratch buffer.
    pub fn as_ptr(&self) -> *const u8 {
        self.bytes.as_ptr()
    }
}

impl<const N: usize> Default for StackBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// A call-scoped temporary buffer.
///
/// Either aliases the caller's [`StackBuffer`] (no allocation) or owns a heap
/// block of exactly the requested size. Dropping the value is the release
/// step: heap blocks are freed, the stack buffer is left alone. Every early
/// return in a translation branch therefore releases without extra code.
pub struct ScratchBuffer<'a> {
    ptr: NonNull<u8>,
    len: usize,
    heap: bool,
    _stack: PhantomData<&'a mut [u8]>,
}

impl<'a> ScratchBuffer<'a> {
    /// Return `stack` when `need` fits in it, otherwise a zeroed heap block of
    /// `need` bytes.
    pub fn acquire<const N: usize>(stack: &'a mut StackBuffer<N>, need: usize) -> Result<Self> {
        if need <= N {
            return Ok(Self {
                ptr: NonNull::from(&mut stack.bytes).cast::<u8>(),
                len: N,
                heap: false,
                _stack: PhantomData,
            });
        }

        // calloc so the block can be handed out as an initialised slice.
        let raw = unsafe { libc::calloc(1, need) } as *mut u8;
        let ptr = NonNull::new(raw).ok_or(MarshalError::Allocation { requested: need })?;
        STATS.record_heap_acquire();
        log::debug!("scratch buffer escalated to heap: {need} bytes (stack holds {N})");

        Ok(Self {
            ptr,
            len: need,
            heap: true,
            _stack: PhantomData,
        })
    }

    /// Explicit release. Equivalent to dropping the buffer.
    pub fn release(self) {
        drop(self)
    }

    /// Raw pointer to the first byte.
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Raw pointer viewed as wide units.
    pub fn as_wide_ptr(&mut self) -> *mut u16 {
        self.ptr.as_ptr() as *mut u16
    }

    /// The whole usable region as bytes.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        // SAFETY: ptr is valid for len initialised bytes for 'a and is
        // uniquely borrowed through &mut self.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// The whole usable region as wide units (trailing odd byte dropped).
    pub fn as_wide_mut(&mut self) -> &mut [u16] {
        // SAFETY: both backings are at least 2-aligned (align(16) stack
        // storage, malloc'd heap) and initialised.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr() as *mut u16, self.len / 2) }
    }
}

impl Drop for ScratchBuffer<'_> {
    fn drop(&mut self) {
        if self.heap {
            unsafe { libc::free(self.ptr.as_ptr() as *mut libc::c_void) };
            STATS.record_heap_release();
        }
    }
}
