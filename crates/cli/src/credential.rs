//
// Copyright (c) 2026 ARXSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: arxseal — client-side envelope encryption SDK for the ARX key-management service.
//

//! Loads caller credentials from a JSON file.
//!
//! For production use, keep credentials in a secret manager, not on disk —
//! this loader exists for demos and local testing, mirroring the upstream
//! example driver's `LoadCredentials` helper.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// One row of `credential.json`: a single ARX endpoint plus credential triple.
#[derive(Debug, Deserialize)]
pub struct CredentialEntry {
    #[serde(rename = "arx_url")]
    pub arx_url: String,
    pub access_key: String,
    #[serde(rename = "server_signing_key")]
    pub signing_key: String,
    #[serde(rename = "server_secret_key")]
    pub secret_key: String,
}

#[derive(Debug, Deserialize)]
struct CredentialFile {
    credentials: Vec<CredentialEntry>,
}

/// Reads and parses `path` as a `{"credentials": [...]}` JSON document.
pub fn load_credentials(path: impl AsRef<Path>) -> Result<Vec<CredentialEntry>> {
    let path = path.as_ref();
    let bytes = fs::read(path)
        .with_context(|| format!("reading credential file {}", path.display()))?;
    let parsed: CredentialFile = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing credential file {}", path.display()))?;
    Ok(parsed.credentials)
}
