// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Configuration constants and buffer sizing.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Extra free byte every space check demands beyond the requested width.
/// A varint of an N-byte value takes at most N + 1 bytes.
pub const SAFETY_CUSHION: usize = 1;

/// Size header reserved for ordinary events.
pub const SMALL_HEADER_SIZE: usize = 1;

/// Size header reserved for large events (padded varint).
pub const LARGE_HEADER_SIZE: usize = 4;

/// Largest total event size (header included) a 1-byte header can carry.
pub const SMALL_HEADER_MAX: usize = 127;

/// Largest total event size a 4-byte padded header can carry.
pub const PADDED_MAX: usize = (1 << 29) - 1;

/// Upper bound on the encoded length of any 64-bit varint.
pub const MAX_VARINT_LEN: usize = 9;

/// Capacity of buffers created by the default sources.
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Number of buffers a pool carves out by default.
pub const DEFAULT_POOL_BUFFERS: usize = 8;

/// Bounded number of lease attempts a writer makes before dropping its event.
pub const ACQUIRE_SPIN_LIMIT: u32 = 1024;

/// Sizing for the buffer sources shipped with this crate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    pub buffer_size: usize,
    pub pool_buffers: usize,
    /// Allocation budget for [`HeapBufferSource`](crate::source::HeapBufferSource).
    /// `None` means unbounded.
    pub max_total_bytes: Option<usize>,
    pub acquire_spin_limit: u32,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            pool_buffers: DEFAULT_POOL_BUFFERS,
            max_total_bytes: None,
            acquire_spin_limit: ACQUIRE_SPIN_LIMIT,
        }
    }
}

impl BufferConfig {
    /// Smallest buffer that can still hold a large header plus one payload byte.
    pub const MIN_BUFFER_SIZE: usize = LARGE_HEADER_SIZE + 1 + SAFETY_CUSHION;

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_size < Self::MIN_BUFFER_SIZE {
            return Err(ConfigError::BufferTooSmall {
                size: self.buffer_size,
                minimum: Self::MIN_BUFFER_SIZE,
            });
        }
        if self.pool_buffers == 0 {
            return Err(ConfigError::EmptyPool);
        }
        Ok(())
    }
}
