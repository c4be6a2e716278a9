//! Authoritative game state representation.
//!
//! This module owns the data structures for every progression system. Runtime
//! layers clone or query this state but mutate it exclusively through the
//! engine.
pub mod changes;
pub mod types;

pub use changes::{SnapshotKind, StateChanges};
pub use types::{
    ArState, ChallengeKind, CommunityChallenge, CommunityState, Crop, CropStage, FarmState,
    FestivalEvent, FestivalKind, FestivalsState, LeaderboardEntry, MiniGamesState, Quest,
    QuestKind, QuestRewards, RedemptionStatus, Reward, RewardKind, RewardsState, SkillsState,
    UserReward, VillageState,
};

/// Canonical snapshot of a player's game progress.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct GameState {
    /// Number of actions applied so far.
    pub nonce: u64,

    /// Sequential id allocator (monotonically increasing, never reused).
    next_id: u64,

    pub village: VillageState,
    pub skills: SkillsState,
    pub farm: FarmState,
    pub community: CommunityState,
    pub mini_games: MiniGamesState,
    pub festivals: FestivalsState,
    pub ar: ArState,
    pub rewards: RewardsState,
}

impl GameState {
    /// Creates a fresh state: village level 1, empty farm, no points.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a new unique record id such as `crop_7`.
    pub fn allocate_id(&mut self, prefix: &str) -> String {
        self.next_id = self.next_id.saturating_add(1);
        format!("{}_{}", prefix, self.next_id)
    }

    /// Returns the crop with the given id.
    pub fn crop(&self, crop_id: &str) -> Option<&Crop> {
        self.farm.crops.iter().find(|crop| crop.id == crop_id)
    }

    pub(crate) fn crop_mut(&mut self, crop_id: &str) -> Option<&mut Crop> {
        self.farm.crops.iter_mut().find(|crop| crop.id == crop_id)
    }
}
