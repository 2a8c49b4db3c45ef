//
// Copyright (c) 2026 ARXSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: arxseal — client-side envelope encryption SDK for the ARX key-management service.
//

//! Async HTTP transport with bounded retry.
//!
//! Retries on transport error or HTTP status ≥ 500, sleeping
//! `RetrySettings::max_wait_time` between attempts — not `wait_time`, which
//! is accepted for configuration compatibility but not read by the loop
//! (see DESIGN.md, Open Question 3).

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::error::TransportError;

/// Retry policy for [`Transport::post`].
#[derive(Debug, Clone, Copy)]
pub struct RetrySettings {
    pub count: u32,
    /// Reserved for wire/API compatibility with upstream configuration.
    /// Not read by the retry loop.
    pub wait_time: Duration,
    pub max_wait_time: Duration,
}

impl Default for RetrySettings {
    fn default() -> Self {
        RetrySettings {
            count: 3,
            wait_time: Duration::from_millis(400),
            max_wait_time: Duration::from_millis(2000),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Thin wrapper over a pooled `reqwest::Client`, carrying the retry policy.
#[derive(Debug, Clone)]
pub struct Transport {
    client: reqwest::Client,
    retry: RetrySettings,
}

impl Transport {
    pub fn new(retry: RetrySettings) -> Self {
        Transport {
            client: reqwest::Client::new(),
            retry,
        }
    }

    /// POSTs `body` (already-serialised JSON bytes) to `url` with `headers`
    /// attached verbatim, retrying on transport error or 5xx per policy.
    pub async fn post(
        &self,
        url: &str,
        body: Vec<u8>,
        headers: &HashMap<String, String>,
    ) -> Result<Vec<u8>, TransportError> {
        let mut last_err = None;

        for attempt in 1..=self.retry.count {
            let mut request = self.client.post(url).body(body.clone());
            for (name, value) in headers {
                request = request.header(name, value);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.as_u16() == 429 {
                        return Err(TransportError::RateLimited(format!(
                            "rate limited by {url}"
                        )));
                    }
                    if status.as_u16() >= 500 {
                        last_err = Some(TransportError::ServerStatus {
                            status: status.as_u16(),
                            message: format!("server error on attempt {attempt}"),
                        });
                        if attempt < self.retry.count {
                            tokio::time::sleep(self.retry.max_wait_time).await;
                        }
                        continue;
                    }
                    if status.as_u16() >= 400 {
                        let bytes = response.bytes().await.unwrap_or_default();
                        return Err(decode_error_body(status.as_u16(), &bytes));
                    }
                    return response
                        .bytes()
                        .await
                        .map(|b| b.to_vec())
                        .map_err(TransportError::Request);
                }
                Err(err) => {
                    last_err = Some(TransportError::Request(err));
                    if attempt < self.retry.count {
                        tokio::time::sleep(self.retry.max_wait_time).await;
                    }
                }
            }
        }

        Err(last_err.unwrap_or(TransportError::RetriesExhausted {
            attempts: self.retry.count,
        }))
    }
}

fn decode_error_body(status: u16, bytes: &[u8]) -> TransportError {
    match serde_json::from_slice::<ErrorBody>(bytes) {
        Ok(body) => TransportError::ServerStatus {
            status,
            message: body.error.message,
        },
        Err(err) => TransportError::ServerStatus {
            status,
            message: format!("undecodable error body: {err}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_retry() -> RetrySettings {
        RetrySettings {
            count: 3,
            wait_time: Duration::from_millis(1),
            max_wait_time: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn succeeds_on_first_200() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oe2/keymanager/encrypt"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
            .mount(&server)
            .await;

        let transport = Transport::new(fast_retry());
        let url = format!("{}/oe2/keymanager/encrypt", server.uri());
        let body = transport.post(&url, vec![], &HashMap::new()).await.unwrap();
        assert_eq!(body, b"ok");
    }

    #[tokio::test]
    async fn retries_until_success_within_count() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"recovered".to_vec()))
            .mount(&server)
            .await;

        let transport = Transport::new(fast_retry());
        let body = transport
            .post(&server.uri(), vec![], &HashMap::new())
            .await
            .unwrap();
        assert_eq!(body, b"recovered");
    }

    #[tokio::test]
    async fn fails_after_exhausting_retries() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let transport = Transport::new(fast_retry());
        let err = transport.post(&server.uri(), vec![], &HashMap::new()).await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn rate_limited_status_maps_to_rate_limited_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let transport = Transport::new(fast_retry());
        let err = transport
            .post(&server.uri(), vec![], &HashMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::RateLimited(_)));
    }

    #[tokio::test]
    async fn client_error_decodes_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"message": "bad request"}
            })))
            .mount(&server)
            .await;

        let transport = Transport::new(fast_retry());
        let err = transport
            .post(&server.uri(), vec![], &HashMap::new())
            .await
            .unwrap_err();
        match err {
            TransportError::ServerStatus { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "bad request");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
