//! Network access for the cache layer.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use super::error::{CacheError, Result};
use super::types::{AssetRequest, AssetResponse, ResponseKind};

#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Performs `request` against the network.
    ///
    /// Non-2xx statuses are returned as responses; only transport failures
    /// are errors.
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse>;
}

/// [`AssetFetcher`] backed by `reqwest`.
pub struct HttpAssetFetcher {
    origin: String,
    http_client: reqwest::Client,
}

impl HttpAssetFetcher {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl AssetFetcher for HttpAssetFetcher {
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse> {
        let network_error = |error: reqwest::Error| CacheError::Network {
            url: request.url.clone(),
            reason: error.to_string(),
        };

        let response = self
            .http_client
            .request(request.method.clone(), &request.url)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let kind = if request.url.starts_with(&self.origin) {
            ResponseKind::Basic
        } else {
            ResponseKind::Cors
        };
        let body = response.bytes().await.map_err(network_error)?.to_vec();

        tracing::debug!(url = %request.url, status, bytes = body.len(), "fetched asset");

        Ok(AssetResponse {
            status,
            kind,
            content_type,
            body,
        })
    }
}
