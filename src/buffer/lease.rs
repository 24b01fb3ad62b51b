// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Scoped exclusive access to a buffer region.

use std::sync::atomic::Ordering;

use parking_lot::lock_api::ArcMutexGuard;
use parking_lot::RawMutex;

use super::event_buffer::BufferHandle;

/// Owned lease over a buffer. Dropping it releases the buffer on every exit
/// path, including abandoned transactions.
pub struct BufferLease {
    handle: BufferHandle,
    region: ArcMutexGuard<RawMutex, Box<[u8]>>,
}

impl BufferLease {
    pub(crate) fn new(handle: BufferHandle, region: ArcMutexGuard<RawMutex, Box<[u8]>>) -> Self {
        Self { handle, region }
    }

    pub fn handle(&self) -> &BufferHandle {
        &self.handle
    }

    pub fn capacity(&self) -> usize {
        self.region.len()
    }

    pub fn committed(&self) -> usize {
        self.handle.committed()
    }

    pub fn region(&self) -> &[u8] {
        &self.region
    }

    pub fn region_mut(&mut self) -> &mut [u8] {
        &mut self.region
    }

    pub fn committed_bytes(&self) -> &[u8] {
        &self.region[..self.committed()]
    }

    /// Advances the committed boundary to `pos`.
    pub fn publish(&self, pos: usize) {
        debug_assert!(pos <= self.capacity(), "publish past capacity");
        debug_assert!(pos >= self.committed(), "committed offset moved backwards");
        self.handle.inner().committed.store(pos, Ordering::Release);
    }

    /// Drops all committed data. Used by retirement after copying it out.
    pub fn reset(&mut self) {
        self.handle.inner().committed.store(0, Ordering::Release);
    }
}
