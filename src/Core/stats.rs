// Process-wide diagnostic counters.
//
// Each counter sits on its own cache line; translations running on
// different threads bump them without contending.

use crossbeam_utils::CachePadded;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for events the marshaling layer wants to surface without failing.
pub struct MarshalStats {
    heap_acquired: CachePadded<AtomicU64>,
    heap_released: CachePadded<AtomicU64>,
    unsupported: CachePadded<AtomicU64>,
    not_transferable: CachePadded<AtomicU64>,
    size_failures: CachePadded<AtomicU64>,
    truncations: CachePadded<AtomicU64>,
}

/// Point-in-time copy of [`MarshalStats`].
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub heap_acquired: u64,
    pub heap_released: u64,
    pub unsupported: u64,
    pub not_transferable: u64,
    pub size_failures: u64,
    pub truncations: u64,
}

impl StatsSnapshot {
    /// Heap scratch buffers acquired but not yet released.
    pub fn heap_outstanding(&self) -> u64 {
        self.heap_acquired.saturating_sub(self.heap_released)
    }
}

impl MarshalStats {
    const fn new() -> Self {
        Self {
            heap_acquired: CachePadded::new(AtomicU64::new(0)),
            heap_released: CachePadded::new(AtomicU64::new(0)),
            unsupported: CachePadded::new(AtomicU64::new(0)),
            not_transferable: CachePadded::new(AtomicU64::new(0)),
            size_failures: CachePadded::new(AtomicU64::new(0)),
            truncations: CachePadded::new(AtomicU64::new(0)),
        }
    }

    pub(crate) fn record_heap_acquire(&self) {
        self.heap_acquired.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_heap_release(&self) {
        self.heap_released.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unsupported(&self) {
        self.unsupported.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_not_transferable(&self) {
        self.not_transferable.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_size_failure(&self) {
        self.size_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_truncation(&self) {
        self.truncations.fetch_add(1, Ordering::Relaxed);
    }

    /// Load every counter with relaxed ordering; values are for monitoring only.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            heap_acquired: self.heap_acquired.load(Ordering::Relaxed),
            heap_released: self.heap_released.load(Ordering::Relaxed),
            unsupported: self.unsupported.load(Ordering::Relaxed),
            not_transferable: self.not_transferable.load(Ordering::Relaxed),
            size_failures: self.size_failures.load(Ordering::Relaxed),
            truncations: self.truncations.load(Ordering::Relaxed),
        }
    }
}

/// The single process-wide instance.
pub static STATS: MarshalStats = MarshalStats::new();

/// Shorthand for `STATS.snapshot()`.
pub fn snapshot() -> StatsSnapshot {
    STATS.snapshot()
}
