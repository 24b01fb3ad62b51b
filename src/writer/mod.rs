// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Event writer: a per-writer cursor and the transaction protocol on top of it.
//!
//! # Protocol
//! ```text
//! begin_event_write(class)       lease buffer, reserve 1 or 4 header bytes
//! ↓
//! write_*(...)                   encode payload; overflow swaps buffers
//! ↓
//! end_event_write()              patch header, publish committed offset
//!                                or rewind and drop the event
//! ```
//!
//! Nothing on this path returns an error or blocks. Every failure is a
//! dropped event; committed data is never left half-written.

pub mod cursor;
pub mod primitives;
pub mod transaction;

pub use cursor::{WriteCursor, WriterStats};
pub use transaction::{DropReason, HeaderClass, TxOutcome, TxState};
