// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Fixed pool of pre-carved buffers.
//!
//! No allocation after construction: overflow takes a free buffer, retired
//! buffers come back through [`BufferPool::recycle`] once drained.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::buffer::{BufferHandle, BufferLease};
use crate::config::BufferConfig;

use super::{carry_forward, required_capacity, BufferSource, RetiredQueue};

/// Shared free list plus the queue of buffers waiting for retirement.
#[derive(Clone)]
pub struct BufferPool {
    free: Arc<Mutex<VecDeque<BufferHandle>>>,
    retired: RetiredQueue,
    buffer_size: usize,
}

impl BufferPool {
    pub fn new(config: &BufferConfig) -> Self {
        let free = (0..config.pool_buffers)
            .map(|_| BufferHandle::new(config.buffer_size))
            .collect();
        Self {
            free: Arc::new(Mutex::new(free)),
            retired: RetiredQueue::new(),
            buffer_size: config.buffer_size,
        }
    }

    pub fn take(&self) -> Option<BufferHandle> {
        self.free.lock().pop_front()
    }

    /// Returns a drained buffer to the free list. Fails while the buffer is
    /// leased or still holds committed data.
    pub fn recycle(&self, buffer: BufferHandle) -> bool {
        if buffer.committed() != 0 || buffer.is_acquired() {
            tracing::warn!("Refusing to recycle {}: not drained", buffer.id());
            return false;
        }
        self.free.lock().push_back(buffer);
        true
    }

    pub fn free_count(&self) -> usize {
        self.free.lock().len()
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn retired(&self) -> &RetiredQueue {
        &self.retired
    }
}

pub struct PooledBufferSource {
    pool: BufferPool,
}

impl PooledBufferSource {
    pub fn new(pool: BufferPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &BufferPool {
        &self.pool
    }
}

impl BufferSource for PooledBufferSource {
    fn flush(&mut self, current: &BufferHandle, pending: &[u8], requested: usize) -> Option<BufferLease> {
        let needed = required_capacity(pending.len(), requested);
        if needed > self.pool.buffer_size {
            tracing::debug!("Event needs {} bytes, pool buffers hold {}", needed, self.pool.buffer_size);
            return None;
        }
        let Some(fresh) = self.pool.take() else {
            tracing::debug!("Buffer pool exhausted");
            return None;
        };
        let Some(mut lease) = fresh.try_acquire() else {
            self.pool.free.lock().push_back(fresh);
            return None;
        };
        carry_forward(&mut lease, pending);
        self.pool.retired.push(current.clone());
        Some(lease)
    }
}
