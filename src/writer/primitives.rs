// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Encoder routines on the cursor.
//!
//! Each routine asks for the value's natural width; the safety cushion in
//! `ensure_size` covers the one extra byte a varint may need. On an invalid
//! cursor every routine is a silent no-op.

use crate::encode::{i16_bits, i32_bits, i64_bits, text, varint};
use crate::ids::{IdResolver, ThreadRef, TypeRef};
use crate::source::BufferSource;

use super::cursor::WriteCursor;

impl<S: BufferSource> WriteCursor<S> {
    #[inline]
    fn put_byte(&mut self, byte: u8) {
        if !self.ensure_size(1) {
            return;
        }
        self.tail_mut()[0] = byte;
        self.advance(1);
    }

    #[inline]
    fn put_varint(&mut self, value: u64, width: usize) {
        if !self.ensure_size(width) {
            return;
        }
        let n = varint::encode_u64(self.tail_mut(), value);
        self.advance(n);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.put_byte(value as u8);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.put_byte(value);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.put_byte(value as u8);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.put_varint(value as u64, 2);
    }

    pub fn write_i16(&mut self, value: i16) {
        self.put_varint(i16_bits(value), 2);
    }

    pub fn write_u32(&mut self, value: u32) {
        self.put_varint(value as u64, 4);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.put_varint(i32_bits(value), 4);
    }

    pub fn write_u64(&mut self, value: u64) {
        self.put_varint(value, 8);
    }

    pub fn write_i64(&mut self, value: i64) {
        self.put_varint(i64_bits(value), 8);
    }

    pub fn write_f32(&mut self, value: f32) {
        self.put_varint(value.to_bits() as u64, 4);
    }

    pub fn write_f64(&mut self, value: f64) {
        self.put_varint(value.to_bits(), 8);
    }

    /// Copies `bytes` verbatim, no length prefix.
    pub fn write_bytes_raw(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        if !self.ensure_size(bytes.len()) {
            return;
        }
        self.tail_mut()[..bytes.len()].copy_from_slice(bytes);
        self.advance(bytes.len());
    }

    pub fn write_str(&mut self, value: Option<&str>) {
        self.write_str_bounded(value, usize::MAX);
    }

    /// Writes at most `max_len` bytes of `value`, cut on a char boundary.
    pub fn write_str_bounded(&mut self, value: Option<&str>, max_len: usize) {
        let value = value.map(|s| text::truncate_to_boundary(s, max_len));
        let len = text::encoded_len(value);
        if !self.ensure_size(len) {
            return;
        }
        let n = text::encode(self.tail_mut(), value);
        self.advance(n);
    }

    pub fn write_thread(&mut self, thread: ThreadRef) {
        self.write_u64(thread.0);
    }

    pub fn write_type(&mut self, ty: TypeRef) {
        self.write_u64(ty.0);
    }

    pub fn write_thread_handle<H, R>(&mut self, resolver: &R, handle: Option<&H>)
    where
        H: ?Sized,
        R: IdResolver<H>,
    {
        if !self.is_valid() {
            return;
        }
        let id = handle.map_or(0, |h| resolver.resolve(h));
        self.write_thread(ThreadRef(id));
    }

    pub fn write_type_handle<H, R>(&mut self, resolver: &R, handle: Option<&H>)
    where
        H: ?Sized,
        R: IdResolver<H>,
    {
        if !self.is_valid() {
            return;
        }
        let id = handle.map_or(0, |h| resolver.resolve(h));
        self.write_type(TypeRef(id));
    }
}
