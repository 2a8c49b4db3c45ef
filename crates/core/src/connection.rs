//
// Copyright (c) 2026 ARXSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: arxseal — client-side envelope encryption SDK for the ARX key-management service.
//

//! Signed-request connection: attaches the canonical ARX headers, digest,
//! and HMAC signature to a request body before handing it to the transport.

use std::collections::{BTreeMap, HashMap};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::credential::Credential;
use crate::error::KeyManagerError;
use crate::primitives::Hasher;
use crate::transport::{RetrySettings, Transport};

const HEADER_API_KEY: &str = "ONQLAVE-API-KEY";
const HEADER_ARX: &str = "ONQLAVE-ARX";
const HEADER_HOST: &str = "ONQLAVE-HOST";
const HEADER_USER_AGENT: &str = "User-Agent";
const HEADER_CONTEXT_LEN: &str = "ONQLAVE-CONTEXT-LEN";
const HEADER_DIGEST: &str = "ONQLAVE-DIGEST";
const HEADER_VERSION: &str = "ONQLAVE-VERSION";
const HEADER_CONTENT_TYPE: &str = "Content-Type";
const HEADER_REQUEST_TIME: &str = "ONQLAVE-REQUEST-TIME";
/// Misspelled on the wire; preserved verbatim for server compatibility.
const HEADER_SIGNATURE: &str = "ONQLAVE-SIGANTURE";

const USER_AGENT_VALUE: &str = "Onqlave/0.1";
const SDK_VERSION: &str = "0.1";

/// `{credential, retry, arx_url, arx_id}` — everything a signed call needs,
/// set once at facade construction and read-only thereafter.
#[derive(Clone)]
pub struct Configuration {
    pub credential: Credential,
    pub retry: RetrySettings,
    pub base_url: String,
    pub arx_id: String,
    /// Mirrors the upstream SDK's `WithDebug` option: raises the facade's
    /// own `tracing` events from `debug` to a more verbose level. Reading
    /// this is the caller's responsibility (e.g. the CLI driver folds it
    /// into its `tracing-subscriber` filter); the facade itself does not
    /// branch on it.
    pub debug: bool,
}

impl Configuration {
    /// Splits `endpoint` into `(base_url, arx_id)` at the final `/`.
    pub fn new(credential: Credential, retry: RetrySettings, endpoint: &str) -> Self {
        let (base_url, arx_id) = split_endpoint(endpoint);
        Configuration {
            credential,
            retry,
            base_url,
            arx_id,
            debug: false,
        }
    }

    /// Starts a [`ConfigurationBuilder`], the Rust-idiomatic counterpart to
    /// the upstream SDK's functional options (`WithCredential`, `WithArx`,
    /// `WithRetry`, `WithDebug`).
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }
}

fn split_endpoint(endpoint: &str) -> (String, String) {
    match endpoint.rfind('/') {
        Some(idx) => (endpoint[..idx].to_string(), endpoint[idx + 1..].to_string()),
        None => (endpoint.to_string(), String::new()),
    }
}

/// Builds a [`Configuration`] one field at a time, mirroring the upstream
/// SDK's `onqlaveencryption.Option` functional-options list
/// (`WithCredential`/`WithArx`/`WithRetry`/`WithDebug`) as a Rust builder.
#[derive(Default)]
pub struct ConfigurationBuilder {
    credential: Option<Credential>,
    retry: Option<RetrySettings>,
    arx: Option<String>,
    debug: bool,
}

impl ConfigurationBuilder {
    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    pub fn with_retry(mut self, retry: RetrySettings) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn with_arx(mut self, endpoint: impl Into<String>) -> Self {
        self.arx = Some(endpoint.into());
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Fails if `with_credential` or `with_arx` was never called — both are
    /// required to reach ARX at all.
    pub fn build(self) -> Result<Configuration, crate::error::ArxError> {
        let credential = self
            .credential
            .ok_or_else(|| crate::error::ArxError::invalid("missing credential (with_credential)"))?;
        let arx = self
            .arx
            .ok_or_else(|| crate::error::ArxError::invalid("missing arx endpoint (with_arx)"))?;
        let (base_url, arx_id) = split_endpoint(&arx);
        Ok(Configuration {
            credential,
            retry: self.retry.unwrap_or_default(),
            base_url,
            arx_id,
            debug: self.debug,
        })
    }
}

/// Signs and sends `body` to `{base_url}/{resource}`, returning the raw
/// response bytes.
pub struct Connection {
    config: Configuration,
    transport: Transport,
    hasher: Hasher,
}

impl Connection {
    pub fn new(config: Configuration) -> Self {
        let transport = Transport::new(config.retry);
        Connection {
            config,
            transport,
            hasher: Hasher::new(),
        }
    }

    pub async fn post(
        &self,
        resource: &str,
        body: &impl serde::Serialize,
    ) -> Result<Vec<u8>, KeyManagerError> {
        let content = serde_json::to_vec(body)?;
        let digest = self
            .hasher
            .digest(body)
            .map_err(KeyManagerError::Decode)?;

        let signing_set = self.signing_headers(content.len(), &digest);
        let signature = self
            .hasher
            .sign(&signing_set, self.config.credential.signing_key());

        let mut transport_headers: HashMap<String, String> = signing_set
            .into_iter()
            .collect();
        transport_headers.insert(HEADER_CONTENT_TYPE.to_string(), "application/json".to_string());
        transport_headers.insert(HEADER_REQUEST_TIME.to_string(), unix_seconds_now());
        transport_headers.insert(HEADER_SIGNATURE.to_string(), signature);

        let url = format!("{}/{}", self.config.base_url, resource);
        self.transport
            .post(&url, content, &transport_headers)
            .await
            .map_err(KeyManagerError::Transport)
    }

    /// The canonical signing set: excludes `Content-Type`, `Request-Time`,
    /// and `Signature` — those are appended only to the transport set.
    fn signing_headers(&self, content_len: usize, digest: &str) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        headers.insert(
            HEADER_API_KEY.to_string(),
            self.config.credential.access_key().to_string(),
        );
        headers.insert(HEADER_ARX.to_string(), self.config.arx_id.clone());
        headers.insert(HEADER_HOST.to_string(), self.config.base_url.clone());
        headers.insert(HEADER_USER_AGENT.to_string(), USER_AGENT_VALUE.to_string());
        headers.insert(HEADER_CONTEXT_LEN.to_string(), content_len.to_string());
        headers.insert(HEADER_DIGEST.to_string(), digest.to_string());
        headers.insert(HEADER_VERSION.to_string(), SDK_VERSION.to_string());
        headers
    }
}

fn unix_seconds_now() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_splits_at_final_slash() {
        let credential = Credential::new("ak", "sk", "secret").unwrap();
        let config = Configuration::new(
            credential,
            RetrySettings::default(),
            "https://arx.example.com/v1/arx-123",
        );
        assert_eq!(config.base_url, "https://arx.example.com/v1");
        assert_eq!(config.arx_id, "arx-123");
    }

    #[test]
    fn signing_set_excludes_transport_only_headers() {
        let credential = Credential::new("ak", "sk", "secret").unwrap();
        let config = Configuration::new(
            credential,
            RetrySettings::default(),
            "https://arx.example.com/arx-1",
        );
        let connection = Connection::new(config);
        let headers = connection.signing_headers(10, "SHA512=abc");
        assert!(!headers.contains_key(HEADER_CONTENT_TYPE));
        assert!(!headers.contains_key(HEADER_REQUEST_TIME));
        assert!(!headers.contains_key(HEADER_SIGNATURE));
        assert_eq!(headers.get(HEADER_CONTEXT_LEN).unwrap(), "10");
    }

    #[test]
    fn builder_assembles_configuration() {
        let credential = Credential::new("ak", "sk", "secret").unwrap();
        let config = Configuration::builder()
            .with_credential(credential)
            .with_arx("https://arx.example.com/arx-7")
            .with_retry(RetrySettings::default())
            .with_debug(true)
            .build()
            .unwrap();
        assert_eq!(config.arx_id, "arx-7");
        assert!(config.debug);
    }

    #[test]
    fn builder_requires_credential_and_arx() {
        assert!(Configuration::builder().build().is_err());
        assert!(Configuration::builder()
            .with_arx("https://arx.example.com/arx-1")
            .build()
            .is_err());
    }
}
