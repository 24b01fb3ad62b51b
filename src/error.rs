// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.
//!
//! The write path never returns errors: every failure there degrades to a
//! dropped event. These types only cover the reader and configuration.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Truncated data at offset {offset}")]
    Truncated { offset: usize },

    #[error("Varint at offset {offset} does not fit the requested width")]
    VarintOverflow { offset: usize },

    #[error("Invalid event size header at offset {offset}")]
    InvalidHeader { offset: usize },

    #[error("Unknown text encoding tag {tag} at offset {offset}")]
    InvalidTextTag { tag: u8, offset: usize },

    #[error("Invalid UTF-8 text at offset {offset}")]
    InvalidText { offset: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Buffer size {size} is below the minimum of {minimum} bytes")]
    BufferTooSmall { size: usize, minimum: usize },

    #[error("Buffer pool must contain at least one buffer")]
    EmptyPool,
}

pub type Result<T> = std::result::Result<T, DecodeError>;
