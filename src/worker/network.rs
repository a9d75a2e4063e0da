//! Network access for the cache controller.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use super::{CachedResponse, FetchRequest};
use crate::error::{Error, Result};

/// Performs live requests on behalf of the worker.
#[async_trait]
pub trait Network: Send + Sync {
    /// Fetches `request` and returns the full response.
    ///
    /// Non-success statuses are returned as responses, not errors. Only
    /// transport failures are errors.
    async fn fetch(&self, request: &FetchRequest) -> Result<CachedResponse>;
}

#[async_trait]
impl<T: Network + ?Sized> Network for Arc<T> {
    async fn fetch(&self, request: &FetchRequest) -> Result<CachedResponse> {
        self.as_ref().fetch(request).await
    }
}

/// Network backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpNetwork {
    client: reqwest::Client,
}

impl HttpNetwork {
    /// Creates a network with a pooled HTTP client.
    ///
    /// No request timeout is set; the client's defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(60))
            .tcp_keepalive(Duration::from_secs(30))
            .build()?;
        Ok(Self { client })
    }

    /// Creates a network around an existing client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: &FetchRequest) -> Result<CachedResponse> {
        let failed = |e: reqwest::Error| Error::Network {
            url: request.url.clone(),
            reason: e.to_string(),
        };

        let mut builder = self
            .client
            .request(request.method.clone(), request.url.as_str());
        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }
        let response = builder.send().await.map_err(failed)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    Bytes::copy_from_slice(value.as_bytes()),
                )
            })
            .collect();
        let body = response.bytes().await.map_err(failed)?;

        Ok(CachedResponse {
            status,
            headers,
            body,
        })
    }
}
