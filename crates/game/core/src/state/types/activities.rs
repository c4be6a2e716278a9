//! Side activities: mini-games, seasonal festivals and AR models.

use std::collections::{BTreeMap, BTreeSet};

use crate::time::Timestamp;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct MiniGamesState {
    pub unlocked_games: BTreeSet<String>,
    pub high_scores: BTreeMap<String, u32>,
}

impl MiniGamesState {
    pub fn high_score(&self, game_id: &str) -> u32 {
        self.high_scores.get(game_id).copied().unwrap_or(0)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct FestivalsState {
    pub active_events: Vec<FestivalEvent>,
    pub completed_events: BTreeSet<String>,
    /// event id -> accumulated participation progress.
    pub event_progress: BTreeMap<String, u32>,
}

impl FestivalsState {
    pub fn event(&self, event_id: &str) -> Option<&FestivalEvent> {
        self.active_events.iter().find(|event| event.id == event_id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum FestivalKind {
    Diwali,
    Pongal,
    IndependenceDay,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FestivalEvent {
    pub id: String,
    pub name: String,
    pub kind: FestivalKind,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub description: String,
    pub is_active: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ArState {
    pub unlocked_models: BTreeSet<String>,
    pub model_progress: BTreeMap<String, u32>,
}
