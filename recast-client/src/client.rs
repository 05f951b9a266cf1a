// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! HTTP client for the remote resource endpoint.

use recast_core::{RecastError, Result};
use recast_stream::ColdSource;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client exposing the remote resource as a cold source.
pub struct ResourceClient {
    client: Client,
    base_url: String,
}

impl ResourceClient {
    /// Create a new client against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `RecastError::Transport` if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RecastError::transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Returns a cold source for GET `/resource`.
    ///
    /// Nothing is sent until the returned source is activated, and every
    /// activation performs exactly one request: no caching, retrying, or
    /// deduplication happens here. Sharing a single request among several
    /// subscribers is the job of the recast-stream broadcasters.
    pub fn fetch(&self) -> ColdSource<String> {
        let client = self.client.clone();
        let url = format!("{}/resource", self.base_url);
        ColdSource::deferred(move || {
            let client = client.clone();
            let url = url.clone();
            async move {
                debug!(%url, "issuing resource request");
                let response = client
                    .get(url.as_str())
                    .send()
                    .await
                    .map_err(|e| RecastError::transport(e.to_string()))?;
                let status = response.status();
                if !status.is_success() {
                    warn!(%url, status = status.as_u16(), "resource request failed");
                    return Err(RecastError::status(status.as_u16(), url));
                }
                response
                    .text()
                    .await
                    .map_err(|e| RecastError::transport(e.to_string()))
            }
        })
    }
}
