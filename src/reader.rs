// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Reader for committed event data.
//!
//! # Wire format
//! ```text
//! [size-header][payload...][size-header][payload...]...
//! ```
//! The size counts the header itself. A first byte with the high bit clear
//! is a 1-byte header; a set high bit starts a 4-byte padded header. Field
//! boundaries inside the payload come from the schema shared by writer and
//! reader; [`PayloadReader`] mirrors the writer's primitives.

use crate::config::{LARGE_HEADER_SIZE, SMALL_HEADER_SIZE};
use crate::encode::{padded, text, varint};
use crate::error::{DecodeError, Result};
use crate::ids::{ThreadRef, TypeRef};

/// One committed event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventRecord<'a> {
    /// Offset of the header within the scanned bytes.
    pub offset: usize,
    /// Total size, header included.
    pub size: usize,
    pub header_len: usize,
    pub payload: &'a [u8],
}

impl<'a> EventRecord<'a> {
    pub fn is_large(&self) -> bool {
        self.header_len == LARGE_HEADER_SIZE
    }

    pub fn payload_reader(&self) -> PayloadReader<'a> {
        PayloadReader::at(self.payload, self.offset + self.header_len)
    }
}

/// Iterates events in a committed region. Stops after the first error.
pub struct EventReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> EventReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    fn read_record(&self) -> Result<EventRecord<'a>> {
        let offset = self.offset;
        let rest = &self.bytes[offset..];
        let (size, header_len) = match rest[0] & 0x80 {
            0 => (rest[0] as usize, SMALL_HEADER_SIZE),
            _ => {
                let size = padded::decode_padded_u32(rest).ok_or(DecodeError::InvalidHeader { offset })?;
                (size as usize, LARGE_HEADER_SIZE)
            }
        };
        if size <= header_len {
            return Err(DecodeError::InvalidHeader { offset });
        }
        if size > rest.len() {
            return Err(DecodeError::Truncated { offset });
        }
        Ok(EventRecord {
            offset,
            size,
            header_len,
            payload: &rest[header_len..size],
        })
    }
}

impl<'a> Iterator for EventReader<'a> {
    type Item = Result<EventRecord<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.bytes.len() {
            return None;
        }
        match self.read_record() {
            Ok(record) => {
                self.offset += record.size;
                Some(Ok(record))
            }
            Err(e) => {
                self.offset = self.bytes.len();
                Some(Err(e))
            }
        }
    }
}

/// Decodes writer primitives from a payload.
pub struct PayloadReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> PayloadReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self::at(bytes, 0)
    }

    /// `base` is only used to report absolute offsets in errors.
    pub fn at(bytes: &'a [u8], base: usize) -> Self {
        Self { bytes, pos: 0, base }
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn offset(&self) -> usize {
        self.base + self.pos
    }

    fn byte(&mut self) -> Result<u8> {
        let b = *self
            .bytes
            .get(self.pos)
            .ok_or(DecodeError::Truncated { offset: self.offset() })?;
        self.pos += 1;
        Ok(b)
    }

    fn varint(&mut self, max: u64) -> Result<u64> {
        let offset = self.offset();
        let (value, n) = varint::decode_u64(&self.bytes[self.pos..]).ok_or(DecodeError::Truncated { offset })?;
        if value > max {
            return Err(DecodeError::VarintOverflow { offset });
        }
        self.pos += n;
        Ok(value)
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.byte()? != 0)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.byte()
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.byte()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(self.varint(u16::MAX as u64)? as u16)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_u16()? as i16)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(self.varint(u32::MAX as u64)? as u32)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.varint(u64::MAX)
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(self.read_u64()? as i64)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    pub fn read_bytes_raw(&mut self, len: usize) -> Result<&'a [u8]> {
        let offset = self.offset();
        let end = self.pos.checked_add(len).ok_or(DecodeError::Truncated { offset })?;
        let bytes = self.bytes.get(self.pos..end).ok_or(DecodeError::Truncated { offset })?;
        self.pos += len;
        Ok(bytes)
    }

    pub fn read_str(&mut self) -> Result<Option<&'a str>> {
        let offset = self.offset();
        match self.byte()? {
            text::TAG_NULL => Ok(None),
            text::TAG_EMPTY => Ok(Some("")),
            text::TAG_UTF8 => {
                let len = self.varint(usize::MAX as u64)? as usize;
                let body = self.read_bytes_raw(len)?;
                std::str::from_utf8(body)
                    .map(Some)
                    .map_err(|_| DecodeError::InvalidText { offset })
            }
            tag => Err(DecodeError::InvalidTextTag { tag, offset }),
        }
    }

    pub fn read_thread(&mut self) -> Result<ThreadRef> {
        Ok(ThreadRef(self.read_u64()?))
    }

    pub fn read_type(&mut self) -> Result<TypeRef> {
        Ok(TypeRef(self.read_u64()?))
    }
}
