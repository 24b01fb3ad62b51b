// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Stateless byte encoders shared by the writer and the reader.
//!
//! Primitive mapping:
//! - `bool`, `u8`, `i8`: one raw byte
//! - `u16`, `u32`, `u64`: varint
//! - `i16`, `i32`, `i64`: varint of the same-width two's-complement bit
//!   pattern, so `-1i32` costs 5 bytes rather than 9
//! - `f32`, `f64`: varint of `to_bits()`
//! - text: see [`text`]
//! - thread and type references: varint of the 64-bit id, 0 = none

pub mod padded;
pub mod text;
pub mod varint;

/// Zero-extends a signed value's bit pattern at its own width.
#[inline]
pub fn i16_bits(value: i16) -> u64 {
    value as u16 as u64
}

#[inline]
pub fn i32_bits(value: i32) -> u64 {
    value as u32 as u64
}

#[inline]
pub fn i64_bits(value: i64) -> u64 {
    value as u64
}
