// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Retirement
//!
//! Drains committed bytes out of buffers so they can be reused. A buffer is
//! only touched while its lease is free; a writer mid-transaction makes the
//! attempt report [`RetireOutcome::Busy`] instead of waiting.
//!
//! Persisting segments is left to the caller.

use crc64fast::Digest;

use crate::buffer::{BufferHandle, BufferId};
use crate::source::{BufferPool, RetiredQueue};

/// Committed bytes copied out of one buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetiredSegment {
    pub buffer: BufferId,
    pub bytes: Vec<u8>,
    pub checksum: u64,
}

impl RetiredSegment {
    pub fn new(buffer: BufferId, bytes: Vec<u8>) -> Self {
        let checksum = checksum(&bytes);
        Self {
            buffer,
            bytes,
            checksum,
        }
    }

    pub fn verify(&self) -> bool {
        checksum(&self.bytes) == self.checksum
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn checksum(bytes: &[u8]) -> u64 {
    let mut digest = Digest::new();
    digest.write(bytes);
    digest.sum64()
}

#[derive(Debug, PartialEq, Eq)]
pub enum RetireOutcome {
    /// A writer holds the buffer.
    Busy,
    /// Nothing committed.
    Empty,
    Retired(RetiredSegment),
}

#[derive(Debug, Default)]
pub struct Retirer {
    segments: u64,
    bytes: u64,
    busy: u64,
}

impl Retirer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies out and clears the committed region of `buffer` if no writer
    /// holds it.
    pub fn try_retire(&mut self, buffer: &BufferHandle) -> RetireOutcome {
        let Some(mut lease) = buffer.try_acquire() else {
            self.busy += 1;
            tracing::trace!("{} is leased; retirement deferred", buffer.id());
            return RetireOutcome::Busy;
        };
        if lease.committed() == 0 {
            return RetireOutcome::Empty;
        }
        let segment = RetiredSegment::new(buffer.id(), lease.committed_bytes().to_vec());
        lease.reset();

        self.segments += 1;
        self.bytes += segment.len() as u64;
        metrics::increment_counter!("tracebuf_segments_retired_total");
        tracing::debug!("Retired {} bytes from {}", segment.len(), buffer.id());
        RetireOutcome::Retired(segment)
    }

    /// Drains every queued buffer that is free. Leased ones stay queued.
    pub fn drain_queue(&mut self, queue: &RetiredQueue) -> Vec<RetiredSegment> {
        self.drain_with(queue, |_| {})
    }

    /// Like [`drain_queue`](Self::drain_queue), returning drained buffers to
    /// `pool`.
    pub fn drain_into_pool(&mut self, queue: &RetiredQueue, pool: &BufferPool) -> Vec<RetiredSegment> {
        self.drain_with(queue, |buffer| {
            pool.recycle(buffer);
        })
    }

    fn drain_with<F>(&mut self, queue: &RetiredQueue, mut release: F) -> Vec<RetiredSegment>
    where
        F: FnMut(BufferHandle),
    {
        let mut segments = Vec::new();
        let mut deferred = Vec::new();
        for buffer in queue.take_all() {
            match self.try_retire(&buffer) {
                RetireOutcome::Busy => deferred.push(buffer),
                RetireOutcome::Empty => release(buffer),
                RetireOutcome::Retired(segment) => {
                    segments.push(segment);
                    release(buffer);
                }
            }
        }
        for buffer in deferred.into_iter().rev() {
            queue.requeue(buffer);
        }
        segments
    }

    pub fn segments_retired(&self) -> u64 {
        self.segments
    }

    pub fn bytes_retired(&self) -> u64 {
        self.bytes
    }

    pub fn busy_attempts(&self) -> u64 {
        self.busy
    }
}
