//
// Copyright (c) 2026 ARXSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: arxseal — client-side envelope encryption SDK for the ARX key-management service.
//

//! The encryption service facade: the one type most callers construct and
//! hold on to. Orchestrates buffer and streaming encrypt/decrypt and the
//! field-by-field structure cipher, calling down through `client` →
//! `connection` → `transport` for key material and `keys`/`envelope`/
//! `stream` for the local cryptography.
//!
//! Holds only immutable state after construction (`Connection`, the
//! credential's `secret_key`, a `RandomSource`), so it is `Clone` and safe to
//! share across concurrent tasks — no call leaves state behind in `self`.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use tracing::{debug, error, instrument};

use crate::connection::{Configuration, Connection};
use crate::client::KeyManagerClient;
use crate::envelope::EnvelopeHeader;
use crate::error::ArxError;
use crate::keys::Key;
use crate::primitives::RandomSource;
use crate::stream;
use crate::structure::StructureValue;

/// `{edk, embedded}` — the envelope header shared by every field, plus one
/// sealed ciphertext per field name. See SPEC_FULL.md §3 `SealedStructure`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedStructure {
    pub edk: Vec<u8>,
    pub embedded: BTreeMap<String, Vec<u8>>,
}

/// The client-side envelope-encryption SDK entry point.
///
/// Construct once per `Configuration` (one ARX endpoint + credential pair)
/// and reuse across calls; `Connection` pools its own `reqwest::Client`.
#[derive(Clone)]
pub struct EncryptionService {
    connection: std::sync::Arc<Connection>,
    secret_key: String,
    rng: RandomSource,
}

impl EncryptionService {
    pub fn new(config: Configuration) -> Self {
        let secret_key = config.credential.secret_key().to_string();
        EncryptionService {
            connection: std::sync::Arc::new(Connection::new(config)),
            secret_key,
            rng: RandomSource::new(),
        }
    }

    fn key_manager(&self) -> KeyManagerClient<'_> {
        KeyManagerClient::new(&self.connection, self.secret_key.clone())
    }

    /// Fetches a fresh data key, seals `plaintext` once, and returns a
    /// single-packet envelope: header followed by one ciphertext packet.
    #[instrument(skip(self, plaintext, associated_data))]
    pub async fn encrypt(
        &self,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, ArxError> {
        debug!("encrypt: fetching encryption key");
        let opened = self.key_manager().fetch_encryption_key().await?;
        let key = Key::from_bytes(&self.rng, opened.algorithm, opened.dk)?;
        let suite = key.primitive()?;

        let sealed = suite.encrypt(&self.rng, plaintext, associated_data)?;
        let header = EnvelopeHeader::new(opened.algorithm, opened.edk)?;

        let mut out = header.serialise();
        crate::envelope::write_packet(&mut out, &sealed)?;
        debug!(bytes = out.len(), "encrypt: succeeded");
        Ok(out)
    }

    /// Parses the envelope header, presents its EDK back to ARX, and opens
    /// the single packet that follows.
    #[instrument(skip(self, envelope, associated_data))]
    pub async fn decrypt(
        &self,
        envelope: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, ArxError> {
        let (consumed, header) = EnvelopeHeader::deserialise(envelope)
            .map_err(|e| ArxError::server("invalid envelope", e))?;
        debug!(algorithm = header.algorithm.canonical_name(), "decrypt: fetching decryption key");

        let dk = self.key_manager().fetch_decryption_key(&header.edk).await?;
        let key = Key::from_bytes(&self.rng, header.algorithm, dk)?;
        let suite = key.primitive()?;

        let mut cursor = std::io::Cursor::new(&envelope[consumed..]);
        let packet = crate::envelope::read_packet(&mut cursor)
            .map_err(|e| ArxError::server("invalid envelope", e))?
            .ok_or_else(|| ArxError::Server("envelope has no packet".to_string()))?;

        let plaintext = suite
            .decrypt(&packet, associated_data)
            .map_err(|e| ArxError::server("decrypt failed", e))?;
        debug!("decrypt: succeeded");
        Ok(plaintext)
    }

    /// Fetches an encryption key once, writes the header to `sink`, then
    /// seals `source` in 32 KiB chunks, one packet per chunk, until EOF.
    #[instrument(skip(self, source, sink, associated_data))]
    pub async fn encrypt_stream<R: Read, W: Write>(
        &self,
        source: &mut R,
        sink: &mut W,
        associated_data: &[u8],
    ) -> Result<(), ArxError> {
        let opened = self.key_manager().fetch_encryption_key().await?;
        let key = Key::from_bytes(&self.rng, opened.algorithm, opened.dk)?;
        let suite = key.primitive()?;

        let header = EnvelopeHeader::new(opened.algorithm, opened.edk)?;
        header
            .write_to(sink)
            .map_err(|e| ArxError::server("failed writing envelope header", e))?;

        let packets = stream::encrypt_stream(source, sink, &suite, &self.rng, associated_data)
            .map_err(|e| ArxError::server("stream encryption failed", e))?;
        debug!(packets, "encrypt_stream: succeeded");
        Ok(())
    }

    /// Reads the header from `source`, fetches the matching decryption key,
    /// then opens packets in order, writing plaintext to `sink` until EOF.
    #[instrument(skip(self, source, sink, associated_data))]
    pub async fn decrypt_stream<R: Read, W: Write>(
        &self,
        source: &mut R,
        sink: &mut W,
        associated_data: &[u8],
    ) -> Result<(), ArxError> {
        let header = EnvelopeHeader::read_from(source)
            .map_err(|e| ArxError::server("invalid envelope header", e))?;
        let dk = self.key_manager().fetch_decryption_key(&header.edk).await?;
        let key = Key::from_bytes(&self.rng, header.algorithm, dk)?;
        let suite = key.primitive()?;

        stream::decrypt_stream(source, sink, &suite, associated_data)
            .map_err(|e| ArxError::server("stream decryption failed", e))?;
        debug!("decrypt_stream: succeeded");
        Ok(())
    }

    /// Fetches one data key, then seals each `(name, value)` pair
    /// independently under that key, returning the shared header alongside
    /// a per-field ciphertext map.
    #[instrument(skip(self, fields))]
    pub async fn encrypt_structure(
        &self,
        fields: &BTreeMap<String, StructureValue>,
    ) -> Result<SealedStructure, ArxError> {
        let opened = self.key_manager().fetch_encryption_key().await?;
        let key = Key::from_bytes(&self.rng, opened.algorithm, opened.dk)?;
        let suite = key.primitive()?;
        let header = EnvelopeHeader::new(opened.algorithm, opened.edk)?;

        let mut embedded = BTreeMap::new();
        for (name, value) in fields {
            let serialised = value.serialise();
            let sealed = suite.encrypt(&self.rng, &serialised, name.as_bytes())?;
            embedded.insert(name.clone(), sealed);
        }

        debug!(fields = embedded.len(), "encrypt_structure: succeeded");
        Ok(SealedStructure {
            edk: header.serialise(),
            embedded,
        })
    }

    /// Parses the shared header from `structure.edk`, fetches the matching
    /// decryption key, and opens each field — each field's own name is the
    /// associated data that authenticated it during sealing.
    #[instrument(skip(self, structure))]
    pub async fn decrypt_structure(
        &self,
        structure: &SealedStructure,
    ) -> Result<BTreeMap<String, StructureValue>, ArxError> {
        let (_, header) = EnvelopeHeader::deserialise(&structure.edk)
            .map_err(|e| ArxError::server("invalid structure header", e))?;
        let dk = self.key_manager().fetch_decryption_key(&header.edk).await?;
        let key = Key::from_bytes(&self.rng, header.algorithm, dk)?;
        let suite = key.primitive()?;

        let mut fields = BTreeMap::new();
        for (name, sealed) in &structure.embedded {
            let plaintext = suite.decrypt(sealed, name.as_bytes()).map_err(|e| {
                error!(field = name.as_str(), "decrypt_structure: field open failed");
                ArxError::server("structure field open failed", e)
            })?;
            let value = StructureValue::deserialise(&plaintext)
                .map_err(|e| ArxError::server("structure field decode failed", e))?;
            fields.insert(name.clone(), value);
        }

        debug!(fields = fields.len(), "decrypt_structure: succeeded");
        Ok(fields)
    }
}
