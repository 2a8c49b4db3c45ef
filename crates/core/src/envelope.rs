//
// Copyright (c) 2026 ARXSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: arxseal — client-side envelope encryption SDK for the ARX key-management service.
//

//! Binary envelope header and packet framing.
//!
//! Wire format: `u32_BE header_len | u8 version | u8 algo_tag | u8 edk_len |
//! edk_bytes[edk_len] | { u32_BE pkt_len | ciphertext[pkt_len] }*`.
//!
//! `header_len = 7 + edk_len` counts the *entire* frame, including its own
//! 4-byte length field: 4 (the length field) + 1 (version) + 1 (algo_tag) +
//! 1 (edk_len) + `edk_len` (edk bytes) = `7 + edk_len`. So a buffer holding a
//! serialised header is exactly `header_len` bytes long, and a reader that
//! has already consumed the 4-byte length prefix has `header_len - 4` bytes
//! of body left to read.

use std::io::{Read, Write};

use crate::error::CryptoError;
use crate::keys::AlgorithmId;

pub const CURRENT_VERSION: u8 = 0;

/// Parsed envelope header: the algorithm and encrypted data key a decrypt
/// call needs before it can touch any packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeHeader {
    pub version: u8,
    pub algorithm: AlgorithmId,
    pub edk: Vec<u8>,
}

impl EnvelopeHeader {
    pub fn new(algorithm: AlgorithmId, edk: Vec<u8>) -> Result<Self, CryptoError> {
        if edk.len() > u8::MAX as usize {
            return Err(CryptoError::InvalidCipherData);
        }
        Ok(EnvelopeHeader {
            version: CURRENT_VERSION,
            algorithm,
            edk,
        })
    }

    /// `u32_BE header_len | u8 version | u8 algo_tag | u8 edk_len | edk_bytes`.
    pub fn serialise(&self) -> Vec<u8> {
        let header_len = 7u32 + self.edk.len() as u32;
        let mut out = Vec::with_capacity(header_len as usize);
        out.extend_from_slice(&header_len.to_be_bytes());
        out.push(self.version);
        out.push(self.algorithm.wire_tag());
        out.push(self.edk.len() as u8);
        out.extend_from_slice(&self.edk);
        out
    }

    /// Parses a header from the front of `buffer`, returning the header and
    /// the number of bytes consumed. `header_len` (the leading `u32`) counts
    /// the whole frame, including its own 4-byte length prefix, so the
    /// number of bytes consumed is `header_len` itself, not `4 + header_len`.
    pub fn deserialise(buffer: &[u8]) -> Result<(usize, Self), CryptoError> {
        if buffer.len() < 7 {
            return Err(CryptoError::InvalidCipherData);
        }
        let header_len = u32::from_be_bytes(buffer[0..4].try_into().unwrap()) as usize;
        if buffer.len() < header_len || header_len < 7 {
            return Err(CryptoError::InvalidCipherData);
        }

        let version = buffer[4];
        let algo_tag = buffer[5];
        let edk_len = buffer[6] as usize;
        if 7 + edk_len != header_len {
            return Err(CryptoError::InvalidCipherData);
        }
        let edk = buffer[7..7 + edk_len].to_vec();
        let algorithm = AlgorithmId::try_from(algo_tag)?;

        Ok((
            header_len,
            EnvelopeHeader {
                version,
                algorithm,
                edk,
            },
        ))
    }

    pub fn write_to<W: Write>(&self, sink: &mut W) -> Result<(), CryptoError> {
        sink.write_all(&self.serialise())
            .map_err(|_| CryptoError::InvalidCipherData)
    }

    pub fn read_from<R: Read>(source: &mut R) -> Result<Self, CryptoError> {
        let mut len_buf = [0u8; 4];
        source
            .read_exact(&mut len_buf)
            .map_err(|_| CryptoError::InvalidCipherData)?;
        let header_len = u32::from_be_bytes(len_buf) as usize;
        if header_len < 7 {
            return Err(CryptoError::InvalidCipherData);
        }

        // `header_len` counts the whole frame including the 4-byte length
        // prefix already consumed above, so only `header_len - 4` bytes of
        // body remain to be read.
        let mut body = vec![0u8; header_len - 4];
        source
            .read_exact(&mut body)
            .map_err(|_| CryptoError::InvalidCipherData)?;

        let version = body[0];
        let algo_tag = body[1];
        let edk_len = body[2] as usize;
        if 3 + edk_len != body.len() {
            return Err(CryptoError::InvalidCipherData);
        }
        let edk = body[3..3 + edk_len].to_vec();
        let algorithm = AlgorithmId::try_from(algo_tag)?;

        Ok(EnvelopeHeader {
            version,
            algorithm,
            edk,
        })
    }
}

/// Writes `u32_BE length` followed by `bytes`.
pub fn write_packet<W: Write>(sink: &mut W, bytes: &[u8]) -> Result<(), CryptoError> {
    let len = u32::try_from(bytes.len()).map_err(|_| CryptoError::InvalidCipherData)?;
    sink.write_all(&len.to_be_bytes())
        .map_err(|_| CryptoError::InvalidCipherData)?;
    sink.write_all(bytes)
        .map_err(|_| CryptoError::InvalidCipherData)
}

/// Reads one length-prefixed packet. Returns `Ok(None)` if the source is at
/// EOF before the length prefix (the normal end-of-stream signal); any other
/// short read is a hard failure, using `read_exact` rather than a single
/// `read` call so a slow or chunked transport can't be mistaken for a
/// truncated envelope.
pub fn read_packet<R: Read>(source: &mut R) -> Result<Option<Vec<u8>>, CryptoError> {
    let mut len_buf = [0u8; 4];
    match read_exact_or_eof(source, &mut len_buf)? {
        false => return Ok(None),
        true => {}
    }
    let len = u32::from_be_bytes(len_buf) as usize;
    let mut body = vec![0u8; len];
    source
        .read_exact(&mut body)
        .map_err(|_| CryptoError::InvalidCipherData)?;
    Ok(Some(body))
}

/// Like `Read::read_exact`, but reports a zero-byte-read-at-start as a clean
/// EOF (`Ok(false)`) rather than an error, so callers can distinguish "no
/// more packets" from "truncated packet".
fn read_exact_or_eof<R: Read>(source: &mut R, buf: &mut [u8]) -> Result<bool, CryptoError> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = source
            .read(&mut buf[filled..])
            .map_err(|_| CryptoError::InvalidCipherData)?;
        if n == 0 {
            if filled == 0 {
                return Ok(false);
            }
            return Err(CryptoError::InvalidCipherData);
        }
        filled += n;
    }
    Ok(true)
}
