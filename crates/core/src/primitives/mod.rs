//
// Copyright (c) 2026 ARXSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: arxseal — client-side envelope encryption SDK for the ARX key-management service.
//

//! Pure cryptographic primitives: random source, digest/signer, AEAD suites,
//! and the RSA-OAEP unwrap primitive. No I/O, no business logic, no key
//! management — those live in `keys`, `envelope`, `connection`, and `client`.

pub mod aead;
pub mod hasher;
pub mod random;
pub mod unwrap;

pub use aead::{AeadSuite, CipherAlgorithm};
pub use hasher::Hasher;
pub use random::RandomSource;
pub use unwrap::unwrap_key;
