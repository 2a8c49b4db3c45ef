//
// Copyright (c) 2026 ARXSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: arxseal — client-side envelope encryption SDK for the ARX key-management service.
//

//! Caller credentials for signing and unwrapping.
//!
//! `signing_key` and `secret_key` are held in [`crate::secret::Secret`] and
//! never appear in `Debug` output. Loading these from a file is a CLI-only
//! concern (`crates/cli/src/credential.rs`) — the core library never touches
//! the filesystem.

use crate::error::ArxError;
use crate::secret::Secret;

/// `{access_key, signing_key, secret_key}`. `access_key` identifies the
/// caller to ARX; `signing_key` is the HMAC-SHA-512 key; `secret_key` is the
/// PKCS#8 passphrase for the RSA private key ARX returns during unwrap.
#[derive(Clone)]
pub struct Credential {
    access_key: String,
    signing_key: Secret<String>,
    secret_key: Secret<String>,
}

impl Credential {
    /// All three fields must be non-empty.
    pub fn new(
        access_key: impl Into<String>,
        signing_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Result<Self, ArxError> {
        let access_key = access_key.into();
        let signing_key = signing_key.into();
        let secret_key = secret_key.into();

        if access_key.is_empty() || signing_key.is_empty() || secret_key.is_empty() {
            return Err(ArxError::invalid(
                "credential fields (access_key, signing_key, secret_key) must be non-empty",
            ));
        }

        Ok(Credential {
            access_key,
            signing_key: Secret::new(signing_key),
            secret_key: Secret::new(secret_key),
        })
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    pub fn signing_key(&self) -> &str {
        self.signing_key.expose_secret()
    }

    pub fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key", &self.access_key)
            .field("signing_key", &self.signing_key)
            .field("secret_key", &self.secret_key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_fields() {
        assert!(Credential::new("", "sk", "secret").is_err());
        assert!(Credential::new("ak", "", "secret").is_err());
        assert!(Credential::new("ak", "sk", "").is_err());
    }

    #[test]
    fn accepts_well_formed_credential() {
        let credential = Credential::new("ak", "sk", "secret").unwrap();
        assert_eq!(credential.access_key(), "ak");
        assert_eq!(credential.signing_key(), "sk");
        assert_eq!(credential.secret_key(), "secret");
    }

    #[test]
    fn debug_redacts_keys() {
        let credential = Credential::new("ak", "super-signing", "super-secret").unwrap();
        let output = format!("{credential:?}");
        assert!(output.contains("ak"));
        assert!(!output.contains("super-signing"));
        assert!(!output.contains("super-secret"));
    }
}
