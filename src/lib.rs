// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! tracebuf: allocation-free event buffer writer for tracing and telemetry.
//!
//! Writers serialize events straight into fixed buffers through a
//! [`WriteCursor`]. Each event is a transaction: a size header is reserved,
//! the payload is varint-encoded behind it, and the header is patched once
//! the size is known. The event is then published by advancing the buffer's
//! committed offset, or dropped without a trace.
//!
//! When a buffer fills up mid-event, a [`BufferSource`] supplies a
//! replacement with the pending bytes carried over. A [`Retirer`] drains
//! committed data from buffers no writer currently holds.

pub mod buffer;
pub mod config;
pub mod encode;
pub mod error;
pub mod ids;
pub mod reader;
pub mod retire;
pub mod source;
pub mod writer;

pub use buffer::{BufferHandle, BufferId, BufferLease};
pub use config::BufferConfig;
pub use error::{ConfigError, DecodeError};
pub use ids::{IdResolver, ThreadRef, TypeRef};
pub use reader::{EventReader, EventRecord, PayloadReader};
pub use retire::{RetireOutcome, RetiredSegment, Retirer};
pub use source::{BufferSource, HeapBufferSource, PooledBufferSource};
pub use writer::{HeaderClass, TxState, WriteCursor};

#[cfg(test)]
pub mod tests;
