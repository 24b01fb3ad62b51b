// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Text encoding.
//!
//! One tag byte followed by an optional body:
//! - `0`: null, no body
//! - `1`: empty string, no body
//! - `3`: UTF-8, varint byte length then the bytes
//!
//! Truncation to a caller-supplied maximum happens on a char boundary so the
//! body is always valid UTF-8.

use super::varint;

pub const TAG_NULL: u8 = 0;
pub const TAG_EMPTY: u8 = 1;
pub const TAG_UTF8: u8 = 3;

/// Longest prefix of `s` that is at most `max_len` bytes and ends on a char
/// boundary.
pub fn truncate_to_boundary(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut cut = max_len;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    &s[..cut]
}

/// Exact encoded size of `text`.
pub fn encoded_len(text: Option<&str>) -> usize {
    match text {
        None => 1,
        Some("") => 1,
        Some(s) => 1 + varint::encoded_len(s.len() as u64) + s.len(),
    }
}

/// Writes `text` at the front of `dst` and returns the byte count. `dst` must
/// hold at least [`encoded_len`] bytes.
pub fn encode(dst: &mut [u8], text: Option<&str>) -> usize {
    match text {
        None => {
            dst[0] = TAG_NULL;
            1
        }
        Some("") => {
            dst[0] = TAG_EMPTY;
            1
        }
        Some(s) => {
            dst[0] = TAG_UTF8;
            let n = 1 + varint::encode_u64(&mut dst[1..], s.len() as u64);
            dst[n..n + s.len()].copy_from_slice(s.as_bytes());
            n + s.len()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncation_respects_char_boundary() {
        // 'é' is two bytes
        assert_eq!(truncate_to_boundary("héllo", 2), "h");
        assert_eq!(truncate_to_boundary("héllo", 3), "hé");
        assert_eq!(truncate_to_boundary("abc", 10), "abc");
        assert_eq!(truncate_to_boundary("abc", 0), "");
    }

    #[test]
    fn test_encode_layout() {
        let mut buf = [0u8; 16];
        assert_eq!(encode(&mut buf, None), 1);
        assert_eq!(buf[0], TAG_NULL);

        assert_eq!(encode(&mut buf, Some("")), 1);
        assert_eq!(buf[0], TAG_EMPTY);

        let n = encode(&mut buf, Some("hi"));
        assert_eq!(n, encoded_len(Some("hi")));
        assert_eq!(&buf[..n], &[TAG_UTF8, 2, b'h', b'i']);
    }
}
