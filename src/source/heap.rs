// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Growable source that allocates a fresh buffer on every overflow.
//!
//! The `max_total_bytes` budget covers live buffers only. A swapped-out
//! buffer stops counting once retirement has drained it and every handle to
//! it is gone.

use crate::buffer::{BufferHandle, BufferLease, WeakBufferHandle};
use crate::config::BufferConfig;

use super::{carry_forward, required_capacity, BufferSource, RetiredQueue};

pub struct HeapBufferSource {
    buffer_size: usize,
    max_total_bytes: Option<usize>,
    live: Vec<(WeakBufferHandle, usize)>,
    retired: RetiredQueue,
}

impl HeapBufferSource {
    pub fn new(config: &BufferConfig) -> Self {
        Self::with_retired(config, RetiredQueue::new())
    }

    pub fn with_retired(config: &BufferConfig, retired: RetiredQueue) -> Self {
        Self {
            buffer_size: config.buffer_size,
            max_total_bytes: config.max_total_bytes,
            live: Vec::new(),
            retired,
        }
    }

    /// Allocates a buffer of the configured size, charged to the budget.
    /// Used for a writer's first buffer.
    pub fn allocate(&mut self) -> Option<BufferHandle> {
        self.allocate_with_capacity(self.buffer_size)
    }

    fn allocate_with_capacity(&mut self, capacity: usize) -> Option<BufferHandle> {
        self.live.retain(|(buffer, _)| buffer.is_live());
        if let Some(limit) = self.max_total_bytes {
            let allocated = self.allocated_bytes();
            if allocated + capacity > limit {
                tracing::debug!(
                    "Heap source budget exhausted: {} allocated, {} requested, limit {}",
                    allocated,
                    capacity,
                    limit
                );
                return None;
            }
        }
        let buffer = BufferHandle::new(capacity);
        self.live.push((buffer.downgrade(), capacity));
        Some(buffer)
    }

    /// Capacity of the buffers from this source that are still alive.
    pub fn allocated_bytes(&self) -> usize {
        self.live
            .iter()
            .filter(|(buffer, _)| buffer.is_live())
            .map(|(_, capacity)| capacity)
            .sum()
    }

    pub fn retired(&self) -> &RetiredQueue {
        &self.retired
    }
}

impl BufferSource for HeapBufferSource {
    fn flush(&mut self, current: &BufferHandle, pending: &[u8], requested: usize) -> Option<BufferLease> {
        let capacity = self.buffer_size.max(required_capacity(pending.len(), requested));
        let fresh = self.allocate_with_capacity(capacity)?;
        let mut lease = fresh.try_acquire()?;
        carry_forward(&mut lease, pending);
        self.retired.push(current.clone());
        tracing::trace!(
            "Swapped {} for {} ({} pending bytes carried)",
            current.id(),
            fresh.id(),
            pending.len()
        );
        Some(lease)
    }
}
