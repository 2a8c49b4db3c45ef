//
// Copyright (c) 2026 ARXSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: arxseal — client-side envelope encryption SDK for the ARX key-management service.
//

//! Chunked stream encryption/decryption.
//!
//! Each 32 KiB chunk of plaintext is sealed independently and emitted as one
//! packet; no packet counter is folded into the associated data, so a
//! reordered or truncated packet sequence is not detected by this layer
//! alone (see the streaming design note in SPEC_FULL.md §4.G).

use std::io::{Read, Write};

use crate::envelope::{read_packet, write_packet};
use crate::error::CryptoError;
use crate::primitives::{AeadSuite, RandomSource};

pub const CHUNK_SIZE: usize = 32 * 1024;

/// Reads `source` to EOF in `CHUNK_SIZE` chunks, sealing each with `suite`
/// and `associated_data`, writing one packet per chunk to `sink`. Returns
/// the number of packets emitted.
pub fn encrypt_stream<R: Read, W: Write>(
    source: &mut R,
    sink: &mut W,
    suite: &AeadSuite,
    rng: &RandomSource,
    associated_data: &[u8],
) -> Result<usize, CryptoError> {
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut packets = 0;
    loop {
        let n = read_chunk(source, &mut buf)?;
        if n == 0 {
            break;
        }
        let sealed = suite.encrypt(rng, &buf[..n], associated_data)?;
        write_packet(sink, &sealed)?;
        packets += 1;
        if n < CHUNK_SIZE {
            break;
        }
    }
    Ok(packets)
}

/// Reads packets from `source` until EOF, opening each with `suite` and
/// `associated_data`, writing the recovered plaintext to `sink` in order.
pub fn decrypt_stream<R: Read, W: Write>(
    source: &mut R,
    sink: &mut W,
    suite: &AeadSuite,
    associated_data: &[u8],
) -> Result<(), CryptoError> {
    while let Some(packet) = read_packet(source)? {
        let plaintext = suite.decrypt(&packet, associated_data)?;
        sink.write_all(&plaintext)
            .map_err(|_| CryptoError::InvalidCipherData)?;
    }
    Ok(())
}

/// Fills `buf` by repeated reads until either `buf` is full or the source
/// signals EOF (`read` returning 0). Returns the number of bytes filled.
fn read_chunk<R: Read>(source: &mut R, buf: &mut [u8]) -> Result<usize, CryptoError> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = source
            .read(&mut buf[filled..])
            .map_err(|_| CryptoError::InvalidCipherData)?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
