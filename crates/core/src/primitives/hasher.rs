//
// Copyright (c) 2026 ARXSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: arxseal — client-side envelope encryption SDK for the ARX key-management service.
//

//! SHA-512 body digest and canonical HMAC-SHA-512 header signing.
//!
//! This is the client-side half of the ARX signed-request protocol (§4.B):
//! the server must re-derive the exact same digest/signature inputs, so the
//! canonicalisation rules here (sorted, lowercased, unseparated header
//! concatenation) are part of the wire contract, not an implementation detail.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::{Digest as _, Sha512};

type HmacSha512 = Hmac<Sha512>;

/// Anything that can be POSTed to ARX: a request body must be serialisable
/// to the exact JSON bytes that will be sent on the wire, since the digest
/// is computed over those bytes.
pub trait SignableRequest {
    fn to_json_bytes(&self) -> serde_json::Result<Vec<u8>>;
}

impl<T: serde::Serialize> SignableRequest for T {
    fn to_json_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Hasher;

impl Hasher {
    pub fn new() -> Self {
        Self
    }

    /// `"SHA512=" || base64(SHA512(body_json))`.
    pub fn digest(&self, body: &impl SignableRequest) -> serde_json::Result<String> {
        let content = body.to_json_bytes()?;
        let mut hasher = Sha512::new();
        hasher.update(&content);
        let sum = hasher.finalize();
        Ok(format!("SHA512={}", BASE64.encode(sum)))
    }

    /// Canonical HMAC-SHA-512 signature over the non-empty-valued headers,
    /// sorted lexicographically by name and concatenated without separators
    /// as `lowercase(name):value`.
    pub fn sign(&self, headers: &BTreeMap<String, String>, signing_key: &str) -> String {
        let mut mac =
            HmacSha512::new_from_slice(signing_key.as_bytes()).expect("HMAC accepts any key length");

        for (name, value) in headers.iter().filter(|(_, v)| !v.is_empty()) {
            mac.update(format!("{}:{}", name.to_lowercase(), value).as_bytes());
        }

        let sum = mac.finalize().into_bytes();
        format!("HMAC-SHA512={}", BASE64.encode(sum))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Empty {}

    #[test]
    fn digest_is_stable_for_same_body() {
        let hasher = Hasher::new();
        let a = hasher.digest(&Empty {}).unwrap();
        let b = hasher.digest(&Empty {}).unwrap();
        assert_eq!(a, b);
        assert!(a.starts_with("SHA512="));
    }

    #[test]
    fn sign_is_independent_of_insertion_order() {
        let hasher = Hasher::new();
        let mut a = BTreeMap::new();
        a.insert("ONQLAVE-API-KEY".to_string(), "k".to_string());
        a.insert("ONQLAVE-ARX".to_string(), "a".to_string());
        a.insert("ONQLAVE-HOST".to_string(), "h".to_string());

        let mut b = BTreeMap::new();
        b.insert("ONQLAVE-HOST".to_string(), "h".to_string());
        b.insert("ONQLAVE-ARX".to_string(), "a".to_string());
        b.insert("ONQLAVE-API-KEY".to_string(), "k".to_string());

        assert_eq!(hasher.sign(&a, "secret"), hasher.sign(&b, "secret"));
    }

    #[test]
    fn sign_ignores_empty_valued_headers() {
        let hasher = Hasher::new();
        let mut a = BTreeMap::new();
        a.insert("ONQLAVE-API-KEY".to_string(), "k".to_string());

        let mut b = a.clone();
        b.insert("ONQLAVE-EXTRA".to_string(), "".to_string());

        assert_eq!(hasher.sign(&a, "secret"), hasher.sign(&b, "secret"));
    }

    #[test]
    fn sign_has_expected_prefix() {
        let hasher = Hasher::new();
        let headers = BTreeMap::new();
        let sig = hasher.sign(&headers, "secret");
        assert!(sig.starts_with("HMAC-SHA512="));
    }

    #[test]
    fn sign_changes_with_key() {
        let hasher = Hasher::new();
        let mut headers = BTreeMap::new();
        headers.insert("ONQLAVE-API-KEY".to_string(), "k".to_string());
        assert_ne!(hasher.sign(&headers, "a"), hasher.sign(&headers, "b"));
    }
}
