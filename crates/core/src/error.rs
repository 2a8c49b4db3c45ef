//
// Copyright (c) 2026 ARXSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: arxseal — client-side envelope encryption SDK for the ARX key-management service.
//

//! Unified error hierarchy for the arxseal SDK.

use thiserror::Error;

/// Top-level error type returned by every public SDK call.
///
/// Variants map to the error kinds of the protocol, not to individual failure
/// sites: callers dispatch on `kind()`, not on which internal step failed.
#[derive(Error, Debug)]
pub enum ArxError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("server error: {0}")]
    Server(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("transport exhausted retries: {0}")]
    Transport(String),
}

impl ArxError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ArxError::InvalidInput(_) => ErrorKind::InvalidInput,
            ArxError::Server(_) => ErrorKind::Server,
            ArxError::RateLimited(_) => ErrorKind::RateLimited,
            ArxError::Transport(_) => ErrorKind::Transport,
        }
    }

    pub(crate) fn server(context: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        ArxError::Server(format!("{}: {}", context.into(), cause))
    }

    pub(crate) fn invalid(context: impl Into<String>) -> Self {
        ArxError::InvalidInput(context.into())
    }
}

/// Dispatch key for [`ArxError`]; coarser than the enum so callers can match
/// without depending on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    Server,
    RateLimited,
    Transport,
}

/// Errors from the cryptographic primitive layer (§4.C, §4.D).
///
/// These are never returned directly to callers; [`ArxError::Server`] or
/// [`ArxError::InvalidInput`] wraps them so that unwrap/open failures don't
/// leak which internal step failed (avoids oracle behaviour).
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("invalid key size: {0}")]
    InvalidKeySize(String),

    #[error("seal failed")]
    SealFailed,

    #[error("open failed")]
    OpenFailed,

    #[error("invalid wrapping key format")]
    InvalidWrappingKeyFormat,

    #[error("invalid key")]
    InvalidKey,

    #[error("invalid cipher data")]
    InvalidCipherData,

    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),
}

/// Errors from the HTTP transport layer (§4.H).
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("server responded {status}: {message}")]
    ServerStatus { status: u16, message: String },

    #[error("retries exhausted after {attempts} attempt(s)")]
    RetriesExhausted { attempts: u32 },
}

/// Errors from the key-manager client (§4.J).
#[derive(Error, Debug)]
pub enum KeyManagerError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("response decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unsupported wrapping algorithm: {0}")]
    UnsupportedWrappingAlgorithm(String),

    #[error("unwrap failed: {0}")]
    Unwrap(#[from] CryptoError),

    #[error("invalid base64 field: {0}")]
    InvalidBase64(String),
}

impl From<CryptoError> for ArxError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::InvalidKeySize(_) => ArxError::invalid(err.to_string()),
            _ => ArxError::Server(err.to_string()),
        }
    }
}

impl From<TransportError> for ArxError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::RateLimited(msg) => ArxError::RateLimited(msg),
            TransportError::RetriesExhausted { .. } => ArxError::Transport(err.to_string()),
            _ => ArxError::Server(err.to_string()),
        }
    }
}

impl From<KeyManagerError> for ArxError {
    fn from(err: KeyManagerError) -> Self {
        match err {
            KeyManagerError::Transport(t) => t.into(),
            _ => ArxError::Server(err.to_string()),
        }
    }
}
