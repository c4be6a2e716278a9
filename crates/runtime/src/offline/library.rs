//! Lessons and mini-game assets downloaded for offline use.

use std::collections::BTreeMap;
use std::sync::Arc;

use arise_core::Timestamp;
use serde::{Deserialize, Serialize};

use super::transport::SyncApi;
use crate::api::Result;
use crate::repository::{KeyValueStore, KeyValueStoreExt, keys};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfflineLesson {
    pub id: String,
    pub title: String,
    pub content: serde_json::Value,
    pub downloaded_at: Timestamp,
}

/// Lesson body as served by `/api/lessons/<id>`.
#[derive(Deserialize)]
struct LessonDocument {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: serde_json::Value,
}

/// Completion report for a lesson, queued as a `progress_update` action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonProgress {
    pub lesson_id: String,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

type LessonIndex = BTreeMap<String, OfflineLesson>;

/// Download manager for lessons and game assets.
pub struct OfflineLibrary {
    store: Arc<dyn KeyValueStore>,
    api: Arc<dyn SyncApi>,
}

impl OfflineLibrary {
    pub fn new(store: Arc<dyn KeyValueStore>, api: Arc<dyn SyncApi>) -> Self {
        Self { store, api }
    }

    fn lessons(&self) -> Result<LessonIndex> {
        Ok(self.store.get_json(keys::LESSONS)?.unwrap_or_default())
    }

    /// Downloads a lesson and keeps it for offline reading.
    pub async fn download_lesson(&self, lesson_id: &str, now: Timestamp) -> Result<OfflineLesson> {
        let raw = self.api.get_json(&format!("/api/lessons/{lesson_id}")).await?;
        let document: LessonDocument = serde_json::from_value(raw)?;

        let lesson = OfflineLesson {
            id: document.id.unwrap_or_else(|| lesson_id.to_owned()),
            title: document.title,
            content: document.content,
            downloaded_at: now,
        };

        let mut lessons = self.lessons()?;
        lessons.insert(lesson_id.to_owned(), lesson.clone());
        self.store.set_json(keys::LESSONS, &lessons)?;

        tracing::info!(lesson_id, "lesson downloaded");
        Ok(lesson)
    }

    pub fn offline_lesson(&self, lesson_id: &str) -> Result<Option<OfflineLesson>> {
        Ok(self.lessons()?.remove(lesson_id))
    }

    pub fn is_lesson_downloaded(&self, lesson_id: &str) -> Result<bool> {
        Ok(self.lessons()?.contains_key(lesson_id))
    }

    pub fn downloaded_lessons(&self) -> Result<Vec<OfflineLesson>> {
        Ok(self.lessons()?.into_values().collect())
    }

    /// Deletes a downloaded lesson. Returns whether it was present.
    pub fn remove_lesson(&self, lesson_id: &str) -> Result<bool> {
        let mut lessons = self.lessons()?;
        let removed = lessons.remove(lesson_id).is_some();
        if removed {
            self.store.set_json(keys::LESSONS, &lessons)?;
        }
        Ok(removed)
    }

    /// Downloads the asset manifest of a mini-game type.
    pub async fn download_game_assets(&self, game_type: &str) -> Result<serde_json::Value> {
        let assets = self
            .api
            .get_json(&format!("/api/games/{game_type}/assets"))
            .await?;
        self.store.set_json(&keys::game_assets(game_type), &assets)?;

        tracing::info!(game_type, "game assets downloaded");
        Ok(assets)
    }

    pub fn offline_game_assets(&self, game_type: &str) -> Result<Option<serde_json::Value>> {
        Ok(self.store.get_json(&keys::game_assets(game_type))?)
    }
}
