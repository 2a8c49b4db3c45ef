//
// Copyright (c) 2026 ARXSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: arxseal — client-side envelope encryption SDK for the ARX key-management service.
//

//! Cryptographically strong random source, backed by the OS RNG.
//!
//! Failure to read entropy is unrecoverable: the process cannot make forward
//! progress without it, so `OsRng` is allowed to panic rather than silently
//! return zeroed output.

use rand::rngs::OsRng;
use rand::RngCore;

/// Thread-safe source of cryptographically strong randomness.
///
/// Cloning is free — `RandomSource` carries no state, it's a handle to the
/// process-wide OS RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSource;

impl RandomSource {
    pub fn new() -> Self {
        Self
    }

    /// Fills and returns `n` cryptographically random bytes.
    pub fn bytes(&self, n: usize) -> Vec<u8> {
        let mut buf = vec![0u8; n];
        OsRng.fill_bytes(&mut buf);
        buf
    }

    /// Returns a random, non-cryptographic-identity `u32` (used only for
    /// `KeyId`, never for key material).
    pub fn u32(&self) -> u32 {
        OsRng.next_u32()
    }

    /// Returns a handle implementing `rand_core::CryptoRng + RngCore`, for
    /// primitives (RSA-OAEP) that need an RNG argument directly.
    pub fn reader(&self) -> OsRng {
        OsRng
    }
}
