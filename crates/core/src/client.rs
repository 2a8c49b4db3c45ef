//
// Copyright (c) 2026 ARXSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: arxseal — client-side envelope encryption SDK for the ARX key-management service.
//

//! Key-manager client: calls `oe2/keymanager/{encrypt,decrypt}`, decodes the
//! base64-bearing response fields, and unwraps the returned wrapped data key.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::connection::Connection;
use crate::error::KeyManagerError;
use crate::keys::{AlgorithmId, WrappingAlgorithmId};
use crate::primitives::{unwrap_key, RandomSource};

const RESOURCE_ENCRYPT: &str = "oe2/keymanager/encrypt";
const RESOURCE_DECRYPT: &str = "oe2/keymanager/decrypt";

#[derive(Debug, Serialize)]
struct EncryptionOpenRequest {}

#[derive(Debug, Serialize)]
struct DecryptionOpenRequest {
    encrypted_data_key: String,
}

#[derive(Debug, Deserialize)]
struct WrappingKeyField {
    encrypted_private_key: String,
    key_fingerprint: String,
}

#[derive(Debug, Deserialize)]
struct SecurityModelField {
    algorithm: String,
    wrapping_algorithm: String,
}

#[derive(Debug, Deserialize)]
struct DataKeyField {
    #[serde(default)]
    encrypted_data_key: Option<String>,
    wrapped_data_key: String,
}

#[derive(Debug, Deserialize)]
struct KeyOpenResponse {
    wrapping_key: WrappingKeyField,
    security_model: SecurityModelField,
    data_key: DataKeyField,
}

/// Result of a successful key-open call: the algorithm the caller should
/// use, the encrypted data key (for embedding in an envelope header), and
/// the unwrapped plaintext data key.
pub struct OpenedKey {
    pub edk: Vec<u8>,
    pub dk: Vec<u8>,
    pub algorithm: AlgorithmId,
}

pub struct KeyManagerClient<'a> {
    connection: &'a Connection,
    rng: RandomSource,
    secret_key: String,
}

impl<'a> KeyManagerClient<'a> {
    pub fn new(connection: &'a Connection, secret_key: impl Into<String>) -> Self {
        KeyManagerClient {
            connection,
            rng: RandomSource::new(),
            secret_key: secret_key.into(),
        }
    }

    /// Fetches a fresh data key for encryption.
    pub async fn fetch_encryption_key(&self) -> Result<OpenedKey, KeyManagerError> {
        let bytes = self
            .connection
            .post(RESOURCE_ENCRYPT, &EncryptionOpenRequest {})
            .await?;
        let response: KeyOpenResponse = serde_json::from_slice(&bytes)?;
        let edk_b64 = response
            .data_key
            .encrypted_data_key
            .clone()
            .ok_or_else(|| KeyManagerError::InvalidBase64("missing encrypted_data_key".into()))?;
        let edk = decode_field("encrypted_data_key", &edk_b64)?;
        self.open(response, edk)
    }

    /// Presents `edk` back to ARX to recover the data key for decryption.
    pub async fn fetch_decryption_key(&self, edk: &[u8]) -> Result<Vec<u8>, KeyManagerError> {
        let request = DecryptionOpenRequest {
            encrypted_data_key: BASE64.encode(edk),
        };
        let bytes = self.connection.post(RESOURCE_DECRYPT, &request).await?;
        let response: KeyOpenResponse = serde_json::from_slice(&bytes)?;
        Ok(self.open(response, edk.to_vec())?.dk)
    }

    fn open(&self, response: KeyOpenResponse, edk: Vec<u8>) -> Result<OpenedKey, KeyManagerError> {
        let wrapping_algo = WrappingAlgorithmId::from_name(&response.security_model.wrapping_algorithm)
            .ok_or_else(|| {
                KeyManagerError::UnsupportedWrappingAlgorithm(
                    response.security_model.wrapping_algorithm.clone(),
                )
            })?;
        let WrappingAlgorithmId::RsaSsaPkcs12048Sha256F4 = wrapping_algo;

        let wdk = decode_field("wrapped_data_key", &response.data_key.wrapped_data_key)?;
        let epk = decode_field(
            "encrypted_private_key",
            &response.wrapping_key.encrypted_private_key,
        )?;
        let fp = decode_field("key_fingerprint", &response.wrapping_key.key_fingerprint)?;

        let dk = unwrap_key(&self.rng, &wdk, &epk, &fp, self.secret_key.as_bytes())?;
        let algorithm = AlgorithmId::from_name(&response.security_model.algorithm)?;

        Ok(OpenedKey { edk, dk, algorithm })
    }
}

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>, KeyManagerError> {
    BASE64
        .decode(value)
        .map_err(|_| KeyManagerError::InvalidBase64(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Configuration;
    use crate::credential::Credential;
    use crate::transport::RetrySettings;
    use rsa::pkcs8::{EncodePrivateKey, LineEnding};
    use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
    use sha2::Sha256;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn wrapped_key_fixture(secret_key: &str, data_key: &[u8]) -> (String, String, String) {
        let mut rng = rand::rngs::OsRng;
        let private_key = RsaPrivateKey::new(&mut rng, 2048).unwrap();
        let public_key = RsaPublicKey::from(&private_key);
        let epk_pem = private_key
            .to_pkcs8_encrypted_pem(&mut rng, secret_key.as_bytes(), LineEnding::LF)
            .unwrap();
        let wdk = public_key
            .encrypt(&mut rng, Oaep::new::<Sha256>(), data_key)
            .unwrap();
        (
            BASE64.encode(epk_pem.as_bytes()),
            BASE64.encode(wdk),
            BASE64.encode([0u8; 32]),
        )
    }

    #[tokio::test]
    async fn fetch_encryption_key_unwraps_data_key() {
        let secret_key = "caller-secret";
        let data_key = b"0123456789abcdef0123456789abcdef";
        let (epk_b64, wdk_b64, fp_b64) = wrapped_key_fixture(secret_key, data_key);

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oe2/keymanager/encrypt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "wrapping_key": {"encrypted_private_key": epk_b64, "key_fingerprint": fp_b64},
                "security_model": {"algorithm": "aes-gcm-256", "wrapping_algorithm": "RSA_SSA_PKCS1_2048_SHA256_F4"},
                "data_key": {"encrypted_data_key": BASE64.encode(b"edk-bytes"), "wrapped_data_key": wdk_b64}
            })))
            .mount(&server)
            .await;

        let credential = Credential::new("ak", "sk", secret_key).unwrap();
        let config = Configuration::new(credential, RetrySettings::default(), &format!("{}/arx-1", server.uri()));
        let connection = Connection::new(config);
        let client = KeyManagerClient::new(&connection, secret_key);

        let opened = client.fetch_encryption_key().await.unwrap();
        assert_eq!(opened.dk, data_key);
        assert_eq!(opened.algorithm, AlgorithmId::AesGcm256);
        assert_eq!(opened.edk, b"edk-bytes");
    }

    #[tokio::test]
    async fn rejects_unsupported_wrapping_algorithm() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oe2/keymanager/encrypt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "wrapping_key": {"encrypted_private_key": "", "key_fingerprint": ""},
                "security_model": {"algorithm": "aes-gcm-256", "wrapping_algorithm": "SOMETHING_ELSE"},
                "data_key": {"encrypted_data_key": BASE64.encode(b"edk"), "wrapped_data_key": ""}
            })))
            .mount(&server)
            .await;

        let credential = Credential::new("ak", "sk", "secret").unwrap();
        let config = Configuration::new(credential, RetrySettings::default(), &format!("{}/arx-1", server.uri()));
        let connection = Connection::new(config);
        let client = KeyManagerClient::new(&connection, "secret");

        assert!(client.fetch_encryption_key().await.is_err());
    }
}
