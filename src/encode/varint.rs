// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Compressed unsigned integers.
//!
//! Up to eight bytes carry 7 payload bits each, low bits first, with the high
//! bit set while more bytes follow. If bits remain after 56 have been
//! emitted, a ninth byte carries the top 8 bits verbatim with no continuation
//! marker. Any `u64` fits in 9 bytes and values below 128 take one.

use crate::config::MAX_VARINT_LEN;

const CONTINUATION: u8 = 0x80;
const PAYLOAD_MASK: u64 = 0x7f;
const GROUPS: usize = MAX_VARINT_LEN - 1;

/// Number of bytes [`encode_u64`] emits for `value`.
#[inline]
pub fn encoded_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(7).clamp(1, MAX_VARINT_LEN)
}

/// Writes `value` at the front of `dst` and returns the byte count.
///
/// Panics if `dst` is shorter than [`encoded_len`]; callers check space first.
#[inline]
pub fn encode_u64(dst: &mut [u8], value: u64) -> usize {
    let mut rest = value;
    for (i, slot) in dst.iter_mut().take(GROUPS).enumerate() {
        if rest <= PAYLOAD_MASK {
            *slot = rest as u8;
            return i + 1;
        }
        *slot = (rest & PAYLOAD_MASK) as u8 | CONTINUATION;
        rest >>= 7;
    }
    dst[GROUPS] = rest as u8;
    MAX_VARINT_LEN
}

/// Reads a varint from the front of `src`. Returns the value and bytes
/// consumed, or `None` if `src` ends mid-value.
pub fn decode_u64(src: &[u8]) -> Option<(u64, usize)> {
    let mut value = 0u64;
    for i in 0..GROUPS {
        let byte = *src.get(i)?;
        value |= (byte as u64 & PAYLOAD_MASK) << (7 * i);
        if byte & CONTINUATION == 0 {
            return Some((value, i + 1));
        }
    }
    let last = *src.get(GROUPS)?;
    value |= (last as u64) << (7 * GROUPS);
    Some((value, MAX_VARINT_LEN))
}
