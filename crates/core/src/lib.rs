//
// Copyright (c) 2026 ARXSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: arxseal — client-side envelope encryption SDK for the ARX key-management service.
//

//! Client-side envelope-encryption SDK for the ARX key-management service.
//!
//! For each encryption call the SDK fetches a fresh data key from ARX, seals
//! the plaintext locally with an AEAD primitive, and packages the
//! ciphertext with the encrypted data key in a self-describing binary
//! envelope ([`envelope::EnvelopeHeader`] + length-prefixed packets).
//! Decryption parses the envelope, presents the EDK back to ARX, unwraps the
//! returned data key with the caller's RSA secret, and opens the packet(s).
//!
//! [`service::EncryptionService`] is the entry point most callers want.
//! Everything else (`primitives`, `keys`, `envelope`, `stream`, `client`,
//! `connection`, `transport`) is exposed for callers who need to work below
//! the facade — e.g. inspecting an envelope header without a live ARX
//! connection.

pub mod client;
pub mod connection;
pub mod credential;
pub mod envelope;
pub mod error;
pub mod keys;
pub mod primitives;
pub mod secret;
pub mod service;
pub mod stream;
pub mod structure;
pub mod transport;

pub use connection::{Configuration, ConfigurationBuilder};
pub use credential::Credential;
pub use error::{ArxError, ErrorKind};
pub use service::{EncryptionService, SealedStructure};
pub use structure::StructureValue;
pub use transport::RetrySettings;
