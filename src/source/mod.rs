// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Buffer sources: where a writer gets a replacement buffer when the current
//! one cannot hold its in-flight event.
//!
//! # Contract
//! [`BufferSource::flush`] is handed the writer's current buffer, the bytes of
//! the pending (uncommitted) transaction and the size of the write that did
//! not fit. It must either:
//! - return a lease on a buffer with at least
//!   `pending.len() + requested + SAFETY_CUSHION` bytes of capacity, nothing
//!   committed, and `pending` already copied to its base, or
//! - return `None` when no memory is available. The current buffer then stays
//!   with the writer untouched.
//!
//! On success the source takes over the old buffer (typically handing it to
//! retirement); its committed bytes are not the writer's concern anymore.

pub mod heap;
pub mod pool;
pub mod retired;

pub use heap::HeapBufferSource;
pub use pool::{BufferPool, PooledBufferSource};
pub use retired::RetiredQueue;

use crate::buffer::{BufferHandle, BufferLease};
use crate::config::SAFETY_CUSHION;

pub trait BufferSource {
    fn flush(&mut self, current: &BufferHandle, pending: &[u8], requested: usize) -> Option<BufferLease>;
}

impl<S: BufferSource + ?Sized> BufferSource for &mut S {
    fn flush(&mut self, current: &BufferHandle, pending: &[u8], requested: usize) -> Option<BufferLease> {
        (**self).flush(current, pending, requested)
    }
}

impl<S: BufferSource + ?Sized> BufferSource for Box<S> {
    fn flush(&mut self, current: &BufferHandle, pending: &[u8], requested: usize) -> Option<BufferLease> {
        (**self).flush(current, pending, requested)
    }
}

/// Source with no backing memory. Every overflow drops the event.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExhaustedSource;

impl BufferSource for ExhaustedSource {
    fn flush(&mut self, _current: &BufferHandle, _pending: &[u8], _requested: usize) -> Option<BufferLease> {
        None
    }
}

/// Capacity a replacement buffer needs for the contract to hold.
#[inline]
pub fn required_capacity(pending: usize, requested: usize) -> usize {
    pending + requested + SAFETY_CUSHION
}

/// Copies `pending` to the base of a freshly leased buffer.
pub(crate) fn carry_forward(lease: &mut BufferLease, pending: &[u8]) {
    debug_assert_eq!(lease.committed(), 0, "replacement buffer holds committed data");
    lease.region_mut()[..pending.len()].copy_from_slice(pending);
}
