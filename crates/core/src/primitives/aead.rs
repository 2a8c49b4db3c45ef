//
// Copyright (c) 2026 ARXSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: arxseal — client-side envelope encryption SDK for the ARX key-management service.
//

//! AES-GCM (128/256-bit) and XChaCha20-Poly1305 AEAD primitives.
//!
//! Each variant seals as `nonce || ciphertext || tag` and never accepts a
//! caller-supplied nonce: every `encrypt` call samples a fresh one from the
//! random source. This collapses the upstream's per-algorithm factory/key
//! indirection into one closed enum, per the polymorphism design note — the
//! set of algorithms is fixed by the wire format, so a tagged variant fits
//! better than an open trait object.

use aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes128Gcm, Aes256Gcm};
use chacha20poly1305::XChaCha20Poly1305;

use crate::error::CryptoError;
use crate::primitives::random::RandomSource;

const AES_GCM_NONCE_LEN: usize = 12;
const XCHACHA_NONCE_LEN: usize = 24;
const TAG_LEN: usize = 16;

/// Which AEAD construction to use. Distinct from `keys::AlgorithmId`: this
/// type only names the cryptographic primitive, not its wire tag or key-size
/// policy — those belong to the key-factory layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherAlgorithm {
    Aes128Gcm,
    Aes256Gcm,
    XChaCha20Poly1305,
}

/// A constructed AEAD primitive bound to one key. Short-lived: built on the
/// call path from a freshly-fetched data key, used once or a few times, then
/// dropped.
pub enum AeadSuite {
    Aes128Gcm(Box<Aes128Gcm>),
    Aes256Gcm(Box<Aes256Gcm>),
    XChaCha20Poly1305(Box<XChaCha20Poly1305>),
}

impl AeadSuite {
    /// Validates the key size for `algorithm` and constructs the primitive.
    pub fn new(algorithm: CipherAlgorithm, key: &[u8]) -> Result<Self, CryptoError> {
        match algorithm {
            CipherAlgorithm::Aes128Gcm => {
                validate_aes_key_size(key.len())?;
                if key.len() != 16 {
                    return Err(CryptoError::InvalidKeySize(format!(
                        "aes-gcm-128 requires a 16-byte key, got {}",
                        key.len()
                    )));
                }
                let cipher = Aes128Gcm::new_from_slice(key).map_err(|_| CryptoError::SealFailed)?;
                Ok(AeadSuite::Aes128Gcm(Box::new(cipher)))
            }
            CipherAlgorithm::Aes256Gcm => {
                validate_aes_key_size(key.len())?;
                if key.len() != 32 {
                    return Err(CryptoError::InvalidKeySize(format!(
                        "aes-gcm-256 requires a 32-byte key, got {}",
                        key.len()
                    )));
                }
                let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::SealFailed)?;
                Ok(AeadSuite::Aes256Gcm(Box::new(cipher)))
            }
            CipherAlgorithm::XChaCha20Poly1305 => {
                if key.len() != 32 {
                    return Err(CryptoError::InvalidKeySize(format!(
                        "xcha-cha-20-poly-1305 requires a 32-byte key, got {}",
                        key.len()
                    )));
                }
                let cipher =
                    XChaCha20Poly1305::new_from_slice(key).map_err(|_| CryptoError::SealFailed)?;
                Ok(AeadSuite::XChaCha20Poly1305(Box::new(cipher)))
            }
        }
    }

    /// Seals `plaintext` with `associated_data`, returning `nonce || ct || tag`.
    pub fn encrypt(
        &self,
        rng: &RandomSource,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        match self {
            AeadSuite::Aes128Gcm(cipher) => {
                let nonce_bytes = rng.bytes(AES_GCM_NONCE_LEN);
                let nonce = aes_gcm::Nonce::from_slice(&nonce_bytes);
                let ct = cipher
                    .encrypt(
                        nonce,
                        Payload {
                            msg: plaintext,
                            aad: associated_data,
                        },
                    )
                    .map_err(|_| CryptoError::SealFailed)?;
                Ok([nonce_bytes, ct].concat())
            }
            AeadSuite::Aes256Gcm(cipher) => {
                let nonce_bytes = rng.bytes(AES_GCM_NONCE_LEN);
                let nonce = aes_gcm::Nonce::from_slice(&nonce_bytes);
                let ct = cipher
                    .encrypt(
                        nonce,
                        Payload {
                            msg: plaintext,
                            aad: associated_data,
                        },
                    )
                    .map_err(|_| CryptoError::SealFailed)?;
                Ok([nonce_bytes, ct].concat())
            }
            AeadSuite::XChaCha20Poly1305(cipher) => {
                let nonce_bytes = rng.bytes(XCHACHA_NONCE_LEN);
                let nonce = chacha20poly1305::XNonce::from_slice(&nonce_bytes);
                let ct = cipher
                    .encrypt(
                        nonce,
                        Payload {
                            msg: plaintext,
                            aad: associated_data,
                        },
                    )
                    .map_err(|_| CryptoError::SealFailed)?;
                Ok([nonce_bytes, ct].concat())
            }
        }
    }

    /// Opens `ciphertext` (`nonce || ct || tag`) with `associated_data`.
    pub fn decrypt(
        &self,
        ciphertext: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        match self {
            AeadSuite::Aes128Gcm(cipher) => {
                let (nonce, body) = split_nonce(ciphertext, AES_GCM_NONCE_LEN)?;
                cipher
                    .decrypt(
                        aes_gcm::Nonce::from_slice(nonce),
                        Payload {
                            msg: body,
                            aad: associated_data,
                        },
                    )
                    .map_err(|_| CryptoError::OpenFailed)
            }
            AeadSuite::Aes256Gcm(cipher) => {
                let (nonce, body) = split_nonce(ciphertext, AES_GCM_NONCE_LEN)?;
                cipher
                    .decrypt(
                        aes_gcm::Nonce::from_slice(nonce),
                        Payload {
                            msg: body,
                            aad: associated_data,
                        },
                    )
                    .map_err(|_| CryptoError::OpenFailed)
            }
            AeadSuite::XChaCha20Poly1305(cipher) => {
                let (nonce, body) = split_nonce(ciphertext, XCHACHA_NONCE_LEN)?;
                cipher
                    .decrypt(
                        chacha20poly1305::XNonce::from_slice(nonce),
                        Payload {
                            msg: body,
                            aad: associated_data,
                        },
                    )
                    .map_err(|_| CryptoError::OpenFailed)
            }
        }
    }
}

fn split_nonce(ciphertext: &[u8], nonce_len: usize) -> Result<(&[u8], &[u8]), CryptoError> {
    if ciphertext.len() < nonce_len + TAG_LEN {
        return Err(CryptoError::OpenFailed);
    }
    Ok(ciphertext.split_at(nonce_len))
}

fn validate_aes_key_size(size: usize) -> Result<(), CryptoError> {
    match size {
        16 | 32 => Ok(()),
        other => Err(CryptoError::InvalidKeySize(format!(
            "want 16 or 32, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> RandomSource {
        RandomSource::new()
    }

    #[test]
    fn round_trips_for_every_algorithm() {
        let r = rng();
        for (algo, key_len) in [
            (CipherAlgorithm::Aes128Gcm, 16),
            (CipherAlgorithm::Aes256Gcm, 32),
            (CipherAlgorithm::XChaCha20Poly1305, 32),
        ] {
            let key = r.bytes(key_len);
            let suite = AeadSuite::new(algo, &key).unwrap();
            let ct = suite.encrypt(&r, b"hello world", b"ctx").unwrap();
            let pt = suite.decrypt(&ct, b"ctx").unwrap();
            assert_eq!(pt, b"hello world");
        }
    }

    #[test]
    fn wrong_associated_data_fails_to_open() {
        let r = rng();
        let key = r.bytes(32);
        let suite = AeadSuite::new(CipherAlgorithm::Aes256Gcm, &key).unwrap();
        let ct = suite.encrypt(&r, b"secret", b"ctx").unwrap();
        assert!(suite.decrypt(&ct, b"other").is_err());
    }

    #[test]
    fn flipped_bit_fails_to_open() {
        let r = rng();
        let key = r.bytes(32);
        let suite = AeadSuite::new(CipherAlgorithm::XChaCha20Poly1305, &key).unwrap();
        let mut ct = suite.encrypt(&r, b"secret data", b"").unwrap();
        let last = ct.len() - 1;
        ct[last] ^= 0x01;
        assert!(suite.decrypt(&ct, b"").is_err());
    }

    #[test]
    fn rejects_wrong_key_size() {
        assert!(AeadSuite::new(CipherAlgorithm::Aes128Gcm, &[0u8; 20]).is_err());
        assert!(AeadSuite::new(CipherAlgorithm::XChaCha20Poly1305, &[0u8; 16]).is_err());
    }

    #[test]
    fn empty_plaintext_round_trips() {
        let r = rng();
        let key = r.bytes(16);
        let suite = AeadSuite::new(CipherAlgorithm::Aes128Gcm, &key).unwrap();
        let ct = suite.encrypt(&r, b"", b"ctx").unwrap();
        assert_eq!(suite.decrypt(&ct, b"ctx").unwrap(), b"");
    }
}
