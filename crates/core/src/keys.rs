//
// Copyright (c) 2026 ARXSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: arxseal — client-side envelope encryption SDK for the ARX key-management service.
//

//! Algorithm identity and key material.
//!
//! The upstream splits this into a key-factory interface, a key-operation
//! descriptor, and per-algorithm key types. That indirection earns its keep
//! over an open-ended algorithm set; here the set is closed by the wire
//! format (three AEAD algorithms, one wrapping algorithm), so it collapses
//! into a pair of `TryFrom<u8>` enums plus [`AeadSuite`] construction — see
//! the polymorphism design note in SPEC_FULL.md §9.

use crate::error::CryptoError;
use crate::primitives::{AeadSuite, CipherAlgorithm};

/// Wire tag for the reserved/unknown algorithm slot. Never a valid
/// `AlgorithmId`; deserialising this tag is always an error.
pub const UNKNOWN_ALGORITHM_TAG: u8 = 0;

/// Closed set of AEAD algorithms this crate understands, with their
/// canonical string name, one-byte wire tag, and required key size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmId {
    AesGcm128,
    AesGcm256,
    XChaCha20Poly1305,
}

impl AlgorithmId {
    pub fn canonical_name(&self) -> &'static str {
        match self {
            AlgorithmId::AesGcm128 => "aes-gcm-128",
            AlgorithmId::AesGcm256 => "aes-gcm-256",
            AlgorithmId::XChaCha20Poly1305 => "xcha-cha-20-poly-1305",
        }
    }

    pub fn wire_tag(&self) -> u8 {
        match self {
            AlgorithmId::AesGcm128 => 1,
            AlgorithmId::AesGcm256 => 2,
            AlgorithmId::XChaCha20Poly1305 => 3,
        }
    }

    pub fn key_size(&self) -> usize {
        match self {
            AlgorithmId::AesGcm128 => 16,
            AlgorithmId::AesGcm256 => 32,
            AlgorithmId::XChaCha20Poly1305 => 32,
        }
    }

    /// Maps to the cryptographic primitive this algorithm constructs.
    pub fn cipher_algorithm(&self) -> CipherAlgorithm {
        match self {
            AlgorithmId::AesGcm128 => CipherAlgorithm::Aes128Gcm,
            AlgorithmId::AesGcm256 => CipherAlgorithm::Aes256Gcm,
            AlgorithmId::XChaCha20Poly1305 => CipherAlgorithm::XChaCha20Poly1305,
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CryptoError> {
        match name {
            "aes-gcm-128" => Ok(AlgorithmId::AesGcm128),
            "aes-gcm-256" => Ok(AlgorithmId::AesGcm256),
            "xcha-cha-20-poly-1305" => Ok(AlgorithmId::XChaCha20Poly1305),
            other => Err(CryptoError::UnknownAlgorithm(other.to_string())),
        }
    }
}

impl TryFrom<u8> for AlgorithmId {
    type Error = CryptoError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            1 => Ok(AlgorithmId::AesGcm128),
            2 => Ok(AlgorithmId::AesGcm256),
            3 => Ok(AlgorithmId::XChaCha20Poly1305),
            other => Err(CryptoError::UnknownAlgorithm(format!(
                "unrecognised algorithm tag {other}"
            ))),
        }
    }
}

/// The sole recognised key-wrapping algorithm. Kept as a single-variant enum
/// (rather than a bare constant) so that an unrecognised value coming back
/// from the server has somewhere to fail explicitly rather than being
/// silently accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrappingAlgorithmId {
    RsaSsaPkcs12048Sha256F4,
}

impl WrappingAlgorithmId {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "RSA_SSA_PKCS1_2048_SHA256_F4" => Some(WrappingAlgorithmId::RsaSsaPkcs12048Sha256F4),
            _ => None,
        }
    }
}

/// Non-cryptographic identity for a `Key` instance — used only for logging
/// and diagnostics, never to derive key material.
pub type KeyId = u32;

/// Short-lived key material bound to one `AlgorithmId`. Created on a call
/// path from freshly-fetched bytes, used to build an `AeadSuite`, then
/// dropped. `key_material` is zeroized on drop.
pub struct Key {
    pub id: KeyId,
    pub algorithm: AlgorithmId,
    key_material: crate::secret::Secret<Vec<u8>>,
}

impl Key {
    /// Adopts `bytes` as the key material for `algorithm`, validating its
    /// length against the algorithm's required key size.
    pub fn from_bytes(
        rng: &crate::primitives::RandomSource,
        algorithm: AlgorithmId,
        bytes: Vec<u8>,
    ) -> Result<Self, CryptoError> {
        if bytes.len() != algorithm.key_size() {
            return Err(CryptoError::InvalidKeySize(format!(
                "{} requires a {}-byte key, got {}",
                algorithm.canonical_name(),
                algorithm.key_size(),
                bytes.len()
            )));
        }
        Ok(Key {
            id: rng.u32(),
            algorithm,
            key_material: crate::secret::Secret::new(bytes),
        })
    }

    /// Validates and constructs the AEAD primitive for this key.
    pub fn primitive(&self) -> Result<AeadSuite, CryptoError> {
        AeadSuite::new(self.algorithm.cipher_algorithm(), self.key_material.expose_secret())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::RandomSource;

    #[test]
    fn algorithm_round_trips_through_wire_tag() {
        for algo in [
            AlgorithmId::AesGcm128,
            AlgorithmId::AesGcm256,
            AlgorithmId::XChaCha20Poly1305,
        ] {
            let tag = algo.wire_tag();
            assert_eq!(AlgorithmId::try_from(tag).unwrap(), algo);
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert!(AlgorithmId::try_from(UNKNOWN_ALGORITHM_TAG).is_err());
        assert!(AlgorithmId::try_from(99u8).is_err());
    }

    #[test]
    fn key_rejects_wrong_size_material() {
        let rng = RandomSource::new();
        let err = Key::from_bytes(&rng, AlgorithmId::AesGcm128, vec![0u8; 5]);
        assert!(err.is_err());
    }

    #[test]
    fn key_builds_working_primitive() {
        let rng = RandomSource::new();
        let key = Key::from_bytes(&rng, AlgorithmId::AesGcm256, rng.bytes(32)).unwrap();
        let suite = key.primitive().unwrap();
        let ct = suite.encrypt(&rng, b"hi", b"").unwrap();
        assert_eq!(suite.decrypt(&ct, b"").unwrap(), b"hi");
    }
}
