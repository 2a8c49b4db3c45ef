//
// Copyright (c) 2026 ARXSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: arxseal — client-side envelope encryption SDK for the ARX key-management service.
//

//! RSA-OAEP-SHA256 unwrap of a wrapped data key, using a PKCS#8-encrypted PEM
//! RSA private key passphrase-protected by the caller's `secret_key`.
//!
//! This is the only recognised wrapping algorithm
//! (`RSA_SSA_PKCS1_2048_SHA256_F4`); there is no dispatch table here because
//! the wire format admits exactly one.

use rsa::pkcs8::DecodePrivateKey;
use rsa::{Oaep, RsaPrivateKey};
use sha2::Sha256;

use crate::error::CryptoError;
use crate::primitives::random::RandomSource;

/// Unwraps `wdk` (the wrapped data key) using `epk` (a PEM-encoded,
/// PKCS#8-encrypted RSA private key) and `password` (the caller's
/// `secret_key`).
///
/// `fp` (the server-supplied key fingerprint) is accepted but not checked
/// against the unwrapped key's public half — the upstream SDK leaves this
/// check commented out and this crate preserves that behaviour rather than
/// silently changing wire/security semantics (see DESIGN.md, Open Question
/// 1). [`observed_fingerprint`] is provided for callers who want to assert
/// on it themselves.
pub fn unwrap_key(
    rng: &RandomSource,
    wdk: &[u8],
    epk: &[u8],
    _fp: &[u8],
    password: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let private_key = parse_encrypted_pkcs8_pem(epk, password)?;

    let padding = Oaep::new::<Sha256>();
    private_key
        .decrypt_with_rng(&mut rng.reader(), padding, wdk)
        .map_err(|_| CryptoError::InvalidKey)
}

/// Parses `epk` as a single PEM block containing a password-encrypted PKCS#8
/// RSA private key. Any trailing data after the first PEM block, or more
/// than one block, is rejected as an invalid wrapping key format.
fn parse_encrypted_pkcs8_pem(epk: &[u8], password: &[u8]) -> Result<RsaPrivateKey, CryptoError> {
    let pem_str =
        std::str::from_utf8(epk).map_err(|_| CryptoError::InvalidWrappingKeyFormat)?;

    if pem_str.matches("-----BEGIN").count() != 1 {
        return Err(CryptoError::InvalidWrappingKeyFormat);
    }

    RsaPrivateKey::from_pkcs8_encrypted_pem(pem_str, password)
        .map_err(|_| CryptoError::InvalidKey)
}

/// SHA-256 of the DER-encoded PKCS#1 public key derived from an unwrapped
/// private key — the fingerprint a stricter caller could compare against the
/// server-supplied `fp`. Not part of the default `unwrap_key` path.
#[doc(hidden)]
pub fn observed_fingerprint(private_key: &RsaPrivateKey) -> Result<[u8; 32], CryptoError> {
    use rsa::pkcs1::EncodeRsaPublicKey;
    use sha2::Digest;

    let der = private_key
        .to_public_key()
        .to_pkcs1_der()
        .map_err(|_| CryptoError::InvalidKey)?;
    let mut hasher = Sha256::new();
    hasher.update(der.as_bytes());
    Ok(hasher.finalize().into())
}
