pub mod activities;
pub mod community;
pub mod farm;
pub mod rewards;
pub mod skills;
pub mod village;

// Re-export per-system state
pub use activities::{ArState, FestivalEvent, FestivalKind, FestivalsState, MiniGamesState};
pub use community::{ChallengeKind, CommunityChallenge, CommunityState, LeaderboardEntry};
pub use farm::{Crop, CropStage, FarmState};
pub use rewards::{RedemptionStatus, Reward, RewardKind, RewardsState, UserReward};
pub use skills::SkillsState;
pub use village::{Quest, QuestKind, QuestRewards, VillageState};
