//
// Copyright (c) 2026 ARXSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: arxseal — client-side envelope encryption SDK for the ARX key-management service.
//

//! Example driver for the arxseal SDK.
//!
//! Mirrors the upstream Go SDK's `examples/main.go`: load credentials from a
//! JSON file, run an encrypt/decrypt round trip and a streaming round trip
//! against each configured ARX endpoint. Unlike the upstream demo this runs
//! each cycle once and exits rather than looping forever across goroutines —
//! a CLI invocation, not a long-lived service.

mod credential;

use std::io::Cursor;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use arxseal_core::{Configuration, Credential, EncryptionService, RetrySettings};

/// Demo driver for the arxseal envelope-encryption SDK.
#[derive(Parser, Debug)]
#[command(author, version, about = "arxseal SDK example driver", long_about = None)]
struct Cli {
    /// Path to a JSON file containing `{"credentials": [...]}`.
    #[arg(long, value_name = "PATH", default_value = "credential.json")]
    credential_file: String,

    /// Number of retry attempts against ARX on transport error or 5xx.
    #[arg(long, default_value_t = 3)]
    retry_count: u32,

    /// Max wait between retry attempts, in milliseconds.
    #[arg(long, default_value_t = 2000)]
    retry_max_wait_ms: u64,

    /// Plaintext to run through the buffer encrypt/decrypt cycle.
    #[arg(long, default_value = "This is a test plaintext")]
    plaintext: String,

    /// Raises log verbosity, mirroring the upstream SDK's `WithDebug` option.
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .init();

    let entries = credential::load_credentials(&cli.credential_file)
        .context("loading credentials")?;
    if entries.is_empty() {
        warn!("credential file contained no entries, nothing to do");
        return Ok(());
    }

    let retry = RetrySettings {
        count: cli.retry_count,
        wait_time: Duration::from_millis(400),
        max_wait_time: Duration::from_millis(cli.retry_max_wait_ms),
    };

    for entry in entries {
        let credential = Credential::new(
            entry.access_key.clone(),
            entry.signing_key,
            entry.secret_key,
        )?;
        let config = Configuration::builder()
            .with_credential(credential)
            .with_arx(entry.arx_url)
            .with_retry(retry)
            .with_debug(cli.debug)
            .build()?;
        let service = EncryptionService::new(config);

        info!(access_key = entry.access_key.as_str(), "running encryption cycle");
        encryption_cycle(&service, &cli.plaintext).await?;

        info!(access_key = entry.access_key.as_str(), "running stream encryption cycle");
        encryption_cycle_stream(&service).await?;
    }

    Ok(())
}

async fn encryption_cycle(service: &EncryptionService, plaintext: &str) -> Result<()> {
    let cipher = service.encrypt(plaintext.as_bytes(), b"").await?;
    let recovered = service.decrypt(&cipher, b"").await?;
    anyhow::ensure!(
        recovered == plaintext.as_bytes(),
        "round trip produced different plaintext"
    );
    Ok(())
}

async fn encryption_cycle_stream(service: &EncryptionService) -> Result<()> {
    let plaintext = vec![0xABu8; 1024 * 1024];
    let mut source = Cursor::new(plaintext.clone());
    let mut cipher = Vec::new();
    service.encrypt_stream(&mut source, &mut cipher, b"").await?;

    let mut cipher_source = Cursor::new(cipher);
    let mut recovered = Vec::new();
    service
        .decrypt_stream(&mut cipher_source, &mut recovered, b"")
        .await?;

    anyhow::ensure!(recovered == plaintext, "stream round trip produced different plaintext");
    Ok(())
}
