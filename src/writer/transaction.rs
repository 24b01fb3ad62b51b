// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Transaction protocol: reserve a size header, write the payload, then
//! patch the header with the true size and publish, or drop the event.
//!
//! ```text
//! Idle → Reserved → Writing → Committed
//!                           ↘ Abandoned
//! ```
//! `Committed` and `Abandoned` are resting states; the next begin leaves
//! them like `Idle`.

use crate::config::{LARGE_HEADER_SIZE, PADDED_MAX, SMALL_HEADER_MAX, SMALL_HEADER_SIZE};
use crate::encode::padded;
use crate::source::BufferSource;

use super::cursor::WriteCursor;

/// Size header width chosen when an event is begun.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderClass {
    /// 1-byte header, total event size at most 127 bytes.
    Small,
    /// 4-byte padded header, total event size at most 2^29 - 1 bytes.
    Large,
}

impl HeaderClass {
    pub fn from_large(is_large: bool) -> Self {
        if is_large {
            HeaderClass::Large
        } else {
            HeaderClass::Small
        }
    }

    pub fn header_len(&self) -> usize {
        match self {
            HeaderClass::Small => SMALL_HEADER_SIZE,
            HeaderClass::Large => LARGE_HEADER_SIZE,
        }
    }

    pub fn max_event_size(&self) -> usize {
        match self {
            HeaderClass::Small => SMALL_HEADER_MAX,
            HeaderClass::Large => PADDED_MAX,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxState {
    Idle,
    Reserved,
    Writing,
    Committed,
    Abandoned,
}

impl TxState {
    pub fn is_open(&self) -> bool {
        matches!(self, TxState::Reserved | TxState::Writing)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropReason {
    /// Only the reserved header was written.
    Empty,
    /// The event outgrew its header class.
    TooLarge,
    /// Overflow found no replacement buffer.
    NoMemory,
    /// The buffer stayed leased by retirement past the spin limit.
    Contended,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::Empty => "empty",
            DropReason::TooLarge => "too_large",
            DropReason::NoMemory => "no_memory",
            DropReason::Contended => "contended",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxOutcome {
    Committed(usize),
    Abandoned(DropReason),
}

impl TxOutcome {
    pub fn bytes(&self) -> usize {
        match self {
            TxOutcome::Committed(n) => *n,
            TxOutcome::Abandoned(_) => 0,
        }
    }
}

impl<S: BufferSource> WriteCursor<S> {
    /// Opens a transaction. Nesting is a programming error.
    pub fn begin_event_write(&mut self, class: HeaderClass) {
        debug_assert!(!self.state.is_open(), "begin_event_write inside an open transaction");
        debug_assert_eq!(self.used_bytes(), 0, "begin_event_write with uncommitted bytes");

        self.class = class;
        self.poison = None;
        self.state = TxState::Reserved;

        let Some(lease) = self.buffer.acquire(self.spin_limit) else {
            tracing::debug!("{} stayed leased past the spin limit; dropping event", self.buffer.id());
            self.current = self.start;
            self.poison_with(DropReason::Contended);
            return;
        };

        let committed = lease.committed();
        if committed != self.start {
            tracing::trace!(
                "{} moved from {} to {} since the last commit; resyncing",
                self.buffer.id(),
                self.start,
                committed
            );
        }
        self.start = committed;
        self.current = committed;
        self.end = Some(lease.capacity());
        self.lease = Some(lease);

        let header = class.header_len();
        if self.ensure_size(header) {
            self.current += header;
        }
    }

    /// Same as [`begin_event_write`](Self::begin_event_write) with a flag.
    pub fn begin(&mut self, is_large: bool) {
        self.begin_event_write(HeaderClass::from_large(is_large));
    }

    /// Closes the transaction and returns the bytes committed, 0 if the
    /// event was dropped. The lease is released on every path.
    pub fn end_event_write(&mut self) -> usize {
        debug_assert!(self.state.is_open(), "end_event_write without begin_event_write");

        let outcome = match self.end {
            None => TxOutcome::Abandoned(self.poison.take().unwrap_or(DropReason::NoMemory)),
            Some(_) => self.settle(),
        };

        match outcome {
            TxOutcome::Committed(_) => self.commit(),
            TxOutcome::Abandoned(reason) => {
                self.current = self.start;
                if reason != DropReason::Empty {
                    tracing::trace!("Event dropped: {}", reason.as_str());
                    metrics::increment_counter!("tracebuf_events_dropped_total", "reason" => reason.as_str());
                }
            }
        }

        self.lease = None;
        self.stats.record(outcome);
        self.state = match outcome {
            TxOutcome::Committed(_) => TxState::Committed,
            TxOutcome::Abandoned(_) => TxState::Abandoned,
        };
        outcome.bytes()
    }

    /// [`end_event_write`](Self::end_event_write) for callers that pass the
    /// header class again at the end.
    pub fn end_event_write_as(&mut self, class: HeaderClass) -> usize {
        debug_assert_eq!(self.class, class, "header class differs from begin_event_write");
        self.end_event_write()
    }

    /// Runs `body` inside a transaction and returns the bytes committed.
    pub fn write_event<F>(&mut self, class: HeaderClass, body: F) -> usize
    where
        F: FnOnce(&mut Self),
    {
        self.begin_event_write(class);
        body(self);
        self.end_event_write()
    }

    /// Decides the fate of a valid transaction and patches the header when
    /// it survives.
    fn settle(&mut self) -> TxOutcome {
        let written = self.used_bytes();
        let header = self.class.header_len();
        if written > self.class.max_event_size() {
            return TxOutcome::Abandoned(DropReason::TooLarge);
        }
        if written <= header {
            return TxOutcome::Abandoned(DropReason::Empty);
        }

        let start = self.start;
        let class = self.class;
        let Some(lease) = self.lease.as_mut() else {
            return TxOutcome::Abandoned(DropReason::NoMemory);
        };
        let region = lease.region_mut();
        match class {
            HeaderClass::Small => region[start] = written as u8,
            HeaderClass::Large => padded::encode_padded_u32(&mut region[start..start + header], written as u32),
        }
        TxOutcome::Committed(written)
    }

    /// Publishes `[start, current)` and starts the next transaction where
    /// this one ended.
    fn commit(&mut self) {
        let Some(lease) = self.lease.as_ref() else {
            return;
        };
        debug_assert_eq!(lease.committed(), self.start, "buffer advanced under an open transaction");
        debug_assert_eq!(Some(lease.capacity()), self.end, "buffer capacity changed under the writer");
        lease.publish(self.current);
        self.start = self.current;
    }
}
