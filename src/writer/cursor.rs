// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! WriteCursor: one writer's position inside its current buffer.
//!
//! # Invariants
//! - `start <= current <= end` while valid
//! - `end == None` marks a poisoned transaction; encoder calls are no-ops
//!   until the next `begin_event_write`
//! - Between transactions `start` equals the last offset this writer
//!   committed, and no lease is held

use crate::buffer::{BufferHandle, BufferLease};
use crate::config::{BufferConfig, SAFETY_CUSHION};
use crate::source::BufferSource;

use super::transaction::{DropReason, HeaderClass, TxOutcome, TxState};

/// Per-writer counters. Plain integers: the cursor is never shared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriterStats {
    pub committed_events: u64,
    pub committed_bytes: u64,
    pub dropped_empty: u64,
    pub dropped_too_large: u64,
    pub dropped_no_memory: u64,
    pub dropped_contended: u64,
    pub flushes: u64,
}

impl WriterStats {
    pub fn dropped(&self) -> u64 {
        self.dropped_too_large + self.dropped_no_memory + self.dropped_contended
    }

    pub(crate) fn record(&mut self, outcome: TxOutcome) {
        match outcome {
            TxOutcome::Committed(n) => {
                self.committed_events += 1;
                self.committed_bytes += n as u64;
            }
            TxOutcome::Abandoned(DropReason::Empty) => self.dropped_empty += 1,
            TxOutcome::Abandoned(DropReason::TooLarge) => self.dropped_too_large += 1,
            TxOutcome::Abandoned(DropReason::NoMemory) => self.dropped_no_memory += 1,
            TxOutcome::Abandoned(DropReason::Contended) => self.dropped_contended += 1,
        }
    }
}

pub struct WriteCursor<S> {
    pub(super) buffer: BufferHandle,
    pub(super) lease: Option<BufferLease>,
    pub(super) start: usize,
    pub(super) current: usize,
    pub(super) end: Option<usize>,
    pub(super) state: TxState,
    pub(super) class: HeaderClass,
    pub(super) poison: Option<DropReason>,
    pub(super) spin_limit: u32,
    pub(super) stats: WriterStats,
    pub(super) source: S,
}

impl<S: BufferSource> WriteCursor<S> {
    pub fn new(buffer: BufferHandle, source: S) -> Self {
        Self::with_config(buffer, source, &BufferConfig::default())
    }

    pub fn with_config(buffer: BufferHandle, source: S, config: &BufferConfig) -> Self {
        let start = buffer.committed();
        let end = Some(buffer.capacity());
        Self {
            buffer,
            lease: None,
            start,
            current: start,
            end,
            state: TxState::Idle,
            class: HeaderClass::Small,
            poison: None,
            spin_limit: config.acquire_spin_limit,
            stats: WriterStats::default(),
            source,
        }
    }

    pub fn buffer(&self) -> &BufferHandle {
        &self.buffer
    }

    pub fn start_pos(&self) -> usize {
        self.start
    }

    pub fn current_pos(&self) -> usize {
        self.current
    }

    pub fn end_pos(&self) -> Option<usize> {
        self.end
    }

    pub fn is_valid(&self) -> bool {
        self.end.is_some()
    }

    /// Bytes written by the open transaction, header included.
    pub fn used_bytes(&self) -> usize {
        self.current - self.start
    }

    pub fn state(&self) -> TxState {
        self.state
    }

    pub fn stats(&self) -> &WriterStats {
        &self.stats
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Makes room for `requested` more bytes plus the safety cushion,
    /// swapping buffers through the source if needed. Returns `false` when
    /// the cursor is (or just became) invalid.
    pub fn ensure_size(&mut self, requested: usize) -> bool {
        let Some(end) = self.end else {
            return false;
        };
        if self.lease.is_none() {
            self.poison_with(DropReason::NoMemory);
            return false;
        }
        if end - self.current >= requested + SAFETY_CUSHION {
            return true;
        }
        self.overflow(requested)
    }

    fn overflow(&mut self, requested: usize) -> bool {
        let used = self.used_bytes();
        let Some(old) = self.lease.take() else {
            self.poison_with(DropReason::NoMemory);
            return false;
        };
        let replacement = {
            let pending = &old.region()[self.start..self.current];
            self.source.flush(&self.buffer, pending, requested)
        };
        drop(old);

        let Some(lease) = replacement else {
            tracing::debug!(
                "No buffer available for {} pending + {} requested bytes; dropping event",
                used,
                requested
            );
            self.poison_with(DropReason::NoMemory);
            return false;
        };
        if lease.capacity() < used + requested + SAFETY_CUSHION || lease.committed() != 0 {
            tracing::warn!(
                "Buffer source returned {} with capacity {} and {} committed bytes; dropping event",
                lease.handle().id(),
                lease.capacity(),
                lease.committed()
            );
            self.poison_with(DropReason::NoMemory);
            return false;
        }

        tracing::trace!("Writer moved from {} to {}", self.buffer.id(), lease.handle().id());
        metrics::increment_counter!("tracebuf_buffer_flushes_total");
        self.stats.flushes += 1;
        self.buffer = lease.handle().clone();
        self.start = 0;
        self.current = used;
        self.end = Some(lease.capacity());
        self.lease = Some(lease);
        true
    }

    pub(super) fn poison_with(&mut self, reason: DropReason) {
        self.end = None;
        self.poison.get_or_insert(reason);
    }

    /// Writable bytes from `current` to `end`. Empty when no lease is held.
    pub(super) fn tail_mut(&mut self) -> &mut [u8] {
        let (current, end) = (self.current, self.end.unwrap_or(self.current));
        match self.lease.as_mut() {
            Some(lease) => &mut lease.region_mut()[current..end],
            None => &mut [],
        }
    }

    pub(super) fn advance(&mut self, n: usize) {
        self.current += n;
        if self.state == TxState::Reserved {
            self.state = TxState::Writing;
        }
    }
}
