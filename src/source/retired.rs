// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Hand-off queue between buffer sources and retirement.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::buffer::BufferHandle;

/// FIFO of buffers swapped out by writers. Clones share the same queue.
#[derive(Clone, Default)]
pub struct RetiredQueue {
    inner: Arc<Mutex<VecDeque<BufferHandle>>>,
}

impl RetiredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, buffer: BufferHandle) {
        self.inner.lock().push_back(buffer);
    }

    pub fn pop(&self) -> Option<BufferHandle> {
        self.inner.lock().pop_front()
    }

    /// Puts a buffer back at the head, e.g. when it was still leased.
    pub fn requeue(&self, buffer: BufferHandle) {
        self.inner.lock().push_front(buffer);
    }

    pub fn take_all(&self) -> Vec<BufferHandle> {
        self.inner.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
