// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Event buffers: fixed-size regions with a committed boundary and an
//! exclusivity lease shared between writers and retirement.

pub mod event_buffer;
pub mod lease;

pub use event_buffer::{BufferHandle, EventBuffer, WeakBufferHandle};
pub use lease::BufferLease;

use core::sync::atomic::{AtomicU64, Ordering};

static NEXT_BUFFER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique buffer identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BufferId(pub u64);

impl BufferId {
    pub fn next() -> Self {
        BufferId(NEXT_BUFFER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl core::fmt::Display for BufferId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "buf#{}", self.0)
    }
}
