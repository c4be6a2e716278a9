//! Request and response values handled by the cache layer.

use reqwest::Method;
use serde::{Deserialize, Serialize};

/// What the requester will do with the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestDestination {
    /// A page navigation; falls back to the cached app shell when offline.
    Document,
    Script,
    Style,
    Image,
    #[default]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    pub method: Method,
    pub url: String,
    pub destination: RequestDestination,
}

impl AssetRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            destination: RequestDestination::Other,
        }
    }

    pub fn document(url: impl Into<String>) -> Self {
        Self {
            destination: RequestDestination::Document,
            ..Self::get(url)
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }
}

/// Origin classification of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    /// Same-origin response; the only kind the cache stores.
    Basic,
    Cors,
    Opaque,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetResponse {
    pub status: u16,
    pub kind: ResponseKind,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub body: Vec<u8>,
}

impl AssetResponse {
    pub fn basic(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            kind: ResponseKind::Basic,
            content_type: None,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the runtime cache may keep this response.
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && self.kind == ResponseKind::Basic
    }
}
