// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! EventBuffer
//!
//! A contiguous region of `capacity` bytes split by the committed offset:
//! - bytes before `committed` are finalized event data, visible to retirement
//! - bytes at or after `committed` are scratch space owned by the lease holder
//!
//! # Invariants
//! - `committed <= capacity`
//! - At most one [`BufferLease`] exists at a time; holding it is the
//!   `acquired` state. Writers and retirement both go through the lease.
//! - The region is never resized in place. Growth is a swap to a new buffer.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::lease::BufferLease;
use super::BufferId;

pub struct EventBuffer {
    id: BufferId,
    capacity: usize,
    pub(crate) committed: AtomicUsize,
    pub(crate) region: Arc<Mutex<Box<[u8]>>>,
}

impl EventBuffer {
    fn new(id: BufferId, capacity: usize) -> Self {
        Self {
            id,
            capacity,
            committed: AtomicUsize::new(0),
            region: Arc::new(Mutex::new(vec![0u8; capacity].into_boxed_slice())),
        }
    }
}

/// Shared handle to an [`EventBuffer`].
///
/// Cloning is an `Arc` clone. Handles carry no access rights; the region can
/// only be touched through a lease.
#[derive(Clone)]
pub struct BufferHandle {
    inner: Arc<EventBuffer>,
}

impl BufferHandle {
    pub fn new(capacity: usize) -> Self {
        Self::with_id(BufferId::next(), capacity)
    }

    pub fn with_id(id: BufferId, capacity: usize) -> Self {
        Self {
            inner: Arc::new(EventBuffer::new(id, capacity)),
        }
    }

    pub fn id(&self) -> BufferId {
        self.inner.id
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Committed offset. Readable without a lease.
    pub fn committed(&self) -> usize {
        self.inner.committed.load(Ordering::Acquire)
    }

    pub fn is_acquired(&self) -> bool {
        self.inner.region.is_locked()
    }

    /// Single non-blocking attempt to take the lease.
    pub fn try_acquire(&self) -> Option<BufferLease> {
        let region = self.inner.region.try_lock_arc()?;
        Some(BufferLease::new(self.clone(), region))
    }

    /// Retries [`try_acquire`](Self::try_acquire) up to `spin_limit` times.
    /// Never parks the thread.
    pub fn acquire(&self, spin_limit: u32) -> Option<BufferLease> {
        let mut attempts = 0;
        loop {
            if let Some(lease) = self.try_acquire() {
                return Some(lease);
            }
            attempts += 1;
            if attempts >= spin_limit.max(1) {
                return None;
            }
            std::hint::spin_loop();
        }
    }

    /// Copy of the committed bytes, or `None` while the buffer is leased.
    pub fn snapshot_committed(&self) -> Option<Vec<u8>> {
        let lease = self.try_acquire()?;
        Some(lease.committed_bytes().to_vec())
    }

    pub fn ptr_eq(&self, other: &BufferHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Non-owning reference that does not keep the region alive.
    pub fn downgrade(&self) -> WeakBufferHandle {
        WeakBufferHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub(crate) fn inner(&self) -> &EventBuffer {
        &self.inner
    }
}

/// Weak counterpart of [`BufferHandle`]. The region is freed once the last
/// strong handle (writer, retired queue, or lease) is gone.
#[derive(Clone)]
pub struct WeakBufferHandle {
    inner: Weak<EventBuffer>,
}

impl WeakBufferHandle {
    pub fn upgrade(&self) -> Option<BufferHandle> {
        self.inner.upgrade().map(|inner| BufferHandle { inner })
    }

    pub fn is_live(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl core::fmt::Debug for BufferHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BufferHandle")
            .field("id", &self.id())
            .field("capacity", &self.capacity())
            .field("committed", &self.committed())
            .field("acquired", &self.is_acquired())
            .finish()
    }
}
