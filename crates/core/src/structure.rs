//
// Copyright (c) 2026 ARXSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: arxseal — client-side envelope encryption SDK for the ARX key-management service.
//

//! Tagged-union value type for `encrypt_structure`/`decrypt_structure`.
//!
//! Each value is serialised as a one-byte type tag followed by a
//! fixed-width big-endian encoding, so the same byte layout survives the
//! round trip through the AEAD layer without relying on a `serde` schema
//! the caller doesn't control.

use crate::error::CryptoError;

#[derive(Debug, Clone, PartialEq)]
pub enum StructureValue {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    /// Unix-seconds timestamp.
    Time(u64),
    Text(String),
    Bytes(Vec<u8>),
}

const TAG_BOOL: u8 = 1;
const TAG_I8: u8 = 2;
const TAG_I16: u8 = 3;
const TAG_I32: u8 = 4;
const TAG_I64: u8 = 5;
const TAG_U8: u8 = 6;
const TAG_U16: u8 = 7;
const TAG_U32: u8 = 8;
const TAG_U64: u8 = 9;
const TAG_F32: u8 = 10;
const TAG_F64: u8 = 11;
const TAG_TIME: u8 = 12;
const TAG_TEXT: u8 = 13;
const TAG_BYTES: u8 = 14;

impl StructureValue {
    pub fn serialise(&self) -> Vec<u8> {
        match self {
            StructureValue::Bool(v) => prefixed(TAG_BOOL, &[*v as u8]),
            StructureValue::I8(v) => prefixed(TAG_I8, &v.to_be_bytes()),
            StructureValue::I16(v) => prefixed(TAG_I16, &v.to_be_bytes()),
            StructureValue::I32(v) => prefixed(TAG_I32, &v.to_be_bytes()),
            StructureValue::I64(v) => prefixed(TAG_I64, &v.to_be_bytes()),
            StructureValue::U8(v) => prefixed(TAG_U8, &v.to_be_bytes()),
            StructureValue::U16(v) => prefixed(TAG_U16, &v.to_be_bytes()),
            StructureValue::U32(v) => prefixed(TAG_U32, &v.to_be_bytes()),
            StructureValue::U64(v) => prefixed(TAG_U64, &v.to_be_bytes()),
            StructureValue::F32(v) => prefixed(TAG_F32, &v.to_be_bytes()),
            StructureValue::F64(v) => prefixed(TAG_F64, &v.to_be_bytes()),
            StructureValue::Time(v) => prefixed(TAG_TIME, &v.to_be_bytes()),
            StructureValue::Text(v) => prefixed(TAG_TEXT, v.as_bytes()),
            StructureValue::Bytes(v) => prefixed(TAG_BYTES, v),
        }
    }

    pub fn deserialise(buf: &[u8]) -> Result<Self, CryptoError> {
        if buf.is_empty() {
            return Err(CryptoError::InvalidCipherData);
        }
        let (tag, body) = (buf[0], &buf[1..]);
        match tag {
            TAG_BOOL => Ok(StructureValue::Bool(fixed::<1>(body)?[0] != 0)),
            TAG_I8 => Ok(StructureValue::I8(i8::from_be_bytes(fixed(body)?))),
            TAG_I16 => Ok(StructureValue::I16(i16::from_be_bytes(fixed(body)?))),
            TAG_I32 => Ok(StructureValue::I32(i32::from_be_bytes(fixed(body)?))),
            TAG_I64 => Ok(StructureValue::I64(i64::from_be_bytes(fixed(body)?))),
            TAG_U8 => Ok(StructureValue::U8(u8::from_be_bytes(fixed(body)?))),
            TAG_U16 => Ok(StructureValue::U16(u16::from_be_bytes(fixed(body)?))),
            TAG_U32 => Ok(StructureValue::U32(u32::from_be_bytes(fixed(body)?))),
            TAG_U64 => Ok(StructureValue::U64(u64::from_be_bytes(fixed(body)?))),
            TAG_F32 => Ok(StructureValue::F32(f32::from_be_bytes(fixed(body)?))),
            TAG_F64 => Ok(StructureValue::F64(f64::from_be_bytes(fixed(body)?))),
            TAG_TIME => Ok(StructureValue::Time(u64::from_be_bytes(fixed(body)?))),
            TAG_TEXT => std::str::from_utf8(body)
                .map(|s| StructureValue::Text(s.to_string()))
                .map_err(|_| CryptoError::InvalidCipherData),
            TAG_BYTES => Ok(StructureValue::Bytes(body.to_vec())),
            _ => Err(CryptoError::InvalidCipherData),
        }
    }
}

fn prefixed(tag: u8, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + body.len());
    out.push(tag);
    out.extend_from_slice(body);
    out
}

fn fixed<const N: usize>(body: &[u8]) -> Result<[u8; N], CryptoError> {
    body.try_into().map_err(|_| CryptoError::InvalidCipherData)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_variant() {
        let values = vec![
            StructureValue::Bool(true),
            StructureValue::Bool(false),
            StructureValue::I8(-5),
            StructureValue::I16(-1000),
            StructureValue::I32(-70000),
            StructureValue::I64(-1),
            StructureValue::U8(200),
            StructureValue::U16(40000),
            StructureValue::U32(4_000_000_000),
            StructureValue::U64(u64::MAX),
            StructureValue::F32(3.5),
            StructureValue::F64(2.71828),
            StructureValue::Time(1_753_600_000),
            StructureValue::Text("alice".to_string()),
            StructureValue::Bytes(vec![1, 2, 3]),
        ];
        for value in values {
            let bytes = value.serialise();
            assert_eq!(StructureValue::deserialise(&bytes).unwrap(), value);
        }
    }

    #[test]
    fn rejects_empty_buffer() {
        assert!(StructureValue::deserialise(&[]).is_err());
    }

    #[test]
    fn rejects_unknown_tag() {
        assert!(StructureValue::deserialise(&[255, 0, 0]).is_err());
    }

    #[test]
    fn rejects_truncated_fixed_width_body() {
        assert!(StructureValue::deserialise(&[TAG_U32, 0, 0]).is_err());
    }
}
