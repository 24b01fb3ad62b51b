// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Fixed-width 4-byte varint used for patch-back size headers.
//!
//! Bytes 0..3 each carry 7 bits with the continuation bit forced on, byte 3
//! carries the remaining high bits. A reserved 4-byte slot can therefore be
//! overwritten with the final size without moving the payload behind it.

use crate::config::{LARGE_HEADER_SIZE, PADDED_MAX};

const CONTINUATION: u8 = 0x80;
const PAYLOAD_MASK: u32 = 0x7f;

/// Writes `value` into exactly the first 4 bytes of `dst`.
#[inline]
pub fn encode_padded_u32(dst: &mut [u8], value: u32) {
    debug_assert!(value as usize <= PADDED_MAX, "padded value exceeds 29 bits");
    dst[0] = (value & PAYLOAD_MASK) as u8 | CONTINUATION;
    dst[1] = ((value >> 7) & PAYLOAD_MASK) as u8 | CONTINUATION;
    dst[2] = ((value >> 14) & PAYLOAD_MASK) as u8 | CONTINUATION;
    dst[3] = (value >> 21) as u8;
}

/// Reads a padded value. `None` if fewer than 4 bytes remain or a
/// continuation bit is missing.
pub fn decode_padded_u32(src: &[u8]) -> Option<u32> {
    let bytes = src.get(..LARGE_HEADER_SIZE)?;
    if bytes[..3].iter().any(|b| b & CONTINUATION == 0) {
        return None;
    }
    Some(
        (bytes[0] as u32 & PAYLOAD_MASK)
            | (bytes[1] as u32 & PAYLOAD_MASK) << 7
            | (bytes[2] as u32 & PAYLOAD_MASK) << 14
            | (bytes[3] as u32) << 21,
    )
}
