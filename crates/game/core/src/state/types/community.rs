use std::collections::BTreeMap;

use crate::time::Timestamp;

/// Shared goals worked on by all learners.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CommunityState {
    pub active_challenges: Vec<CommunityChallenge>,
    /// challenge id -> this player's total contribution.
    pub user_progress: BTreeMap<String, u32>,
    pub leaderboard: Vec<LeaderboardEntry>,
}

impl CommunityState {
    pub fn challenge(&self, challenge_id: &str) -> Option<&CommunityChallenge> {
        self.active_challenges
            .iter()
            .find(|challenge| challenge.id == challenge_id)
    }

    pub(crate) fn challenge_mut(&mut self, challenge_id: &str) -> Option<&mut CommunityChallenge> {
        self.active_challenges
            .iter_mut()
            .find(|challenge| challenge.id == challenge_id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ChallengeKind {
    Weekly,
    Monthly,
    Special,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommunityChallenge {
    pub id: String,
    pub title: String,
    pub description: String,
    pub kind: ChallengeKind,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub target: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub current_progress: u32,
    pub is_active: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub name: String,
    pub score: u32,
    pub rank: u32,
}
