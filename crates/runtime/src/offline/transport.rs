//! Server transport for queued actions and downloadable content.

use std::sync::Arc;
use std::time::Duration;

use arise_core::{SyncKind, Timestamp};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::action::OfflineAction;
use crate::repository::{KeyValueStore, RepositoryError, keys};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("device is offline")]
    Offline,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// JSON body posted for one queued action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    pub action_id: String,
    #[serde(rename = "type")]
    pub kind: SyncKind,
    pub data: serde_json::Value,
    pub timestamp: Timestamp,
}

impl From<&OfflineAction> for SyncRequest {
    fn from(action: &OfflineAction) -> Self {
        Self {
            action_id: action.id.clone(),
            kind: action.kind,
            data: action.payload.clone(),
            timestamp: action.timestamp,
        }
    }
}

/// Server path that accepts actions of `kind`.
pub const fn endpoint(kind: SyncKind) -> &'static str {
    match kind {
        SyncKind::ProgressUpdate => "/api/sync-progress",
        SyncKind::AchievementUnlock => "/api/sync-achievements",
        SyncKind::SkillUnlock => "/api/sync-skills",
        SyncKind::RewardClaim => "/api/sync-rewards",
    }
}

/// Remote API used by the sync queue and the offline library.
#[async_trait]
pub trait SyncApi: Send + Sync {
    /// Delivers one action. Any error counts as a failed attempt.
    async fn push(&self, request: &SyncRequest) -> Result<(), TransportError>;

    /// Fetches a JSON document such as `/api/lessons/<id>`.
    async fn get_json(&self, path: &str) -> Result<serde_json::Value, TransportError>;
}

/// [`SyncApi`] over HTTP.
///
/// The bearer token is read from [`keys::AUTH_TOKEN`] on every request so a
/// token stored after start-up is picked up without a restart.
pub struct HttpSyncApi {
    base_url: String,
    http_client: reqwest::Client,
    store: Arc<dyn KeyValueStore>,
}

impl HttpSyncApi {
    pub fn new(base_url: impl Into<String>, store: Arc<dyn KeyValueStore>) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("arise-runtime/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            http_client,
            store,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_token(&self) -> Result<String, TransportError> {
        Ok(self.store.get(keys::AUTH_TOKEN)?.unwrap_or_default())
    }
}

#[async_trait]
impl SyncApi for HttpSyncApi {
    async fn push(&self, request: &SyncRequest) -> Result<(), TransportError> {
        let url = self.url(endpoint(request.kind));
        let token = self.auth_token()?;

        tracing::debug!(action_id = %request.action_id, %url, "pushing offline action");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(token)
            .json(request)
            .send()
            .await
            .map_err(|source| TransportError::Http {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url,
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    async fn get_json(&self, path: &str) -> Result<serde_json::Value, TransportError> {
        let url = self.url(path);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|source| TransportError::Http {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url,
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|source| TransportError::Http { url, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryKeyValueStore;

    #[test]
    fn each_kind_has_its_own_endpoint() {
        assert_eq!(endpoint(SyncKind::ProgressUpdate), "/api/sync-progress");
        assert_eq!(endpoint(SyncKind::AchievementUnlock), "/api/sync-achievements");
        assert_eq!(endpoint(SyncKind::SkillUnlock), "/api/sync-skills");
        assert_eq!(endpoint(SyncKind::RewardClaim), "/api/sync-rewards");
    }

    #[test]
    fn request_body_uses_action_id_as_idempotency_key() {
        let action = OfflineAction::new(
            SyncKind::RewardClaim,
            serde_json::json!({ "rewardId": "badge_math" }),
            Timestamp::from_millis(42),
            3,
        );

        let body = serde_json::to_value(SyncRequest::from(&action)).unwrap();

        assert_eq!(body["actionId"], action.id.as_str());
        assert_eq!(body["type"], "reward_claim");
        assert_eq!(body["timestamp"], 42);
        assert!(body.get("retryCount").is_none());
    }

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
        let api = HttpSyncApi::new("https://arise.example/", store);

        assert_eq!(
            api.url("/api/sync-skills"),
            "https://arise.example/api/sync-skills"
        );
    }
}
