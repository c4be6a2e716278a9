//! Deterministic gameplay rules and state for the AriseEDU learning game.
//!
//! `arise-core` defines the canonical progression model (village quests,
//! skill tree, farm, community challenges, mini-games, festivals, AR models,
//! rewards) and exposes pure APIs that the runtime drives. All state mutation
//! flows through [`engine::GameEngine`]; nothing in this crate reads a clock
//! or touches storage, so time is always passed in as a [`Timestamp`].
pub mod action;
pub mod config;
pub mod engine;
pub mod env;
pub mod state;
pub mod time;
pub mod utils;

pub use action::{
    Action, ActionError, ActionOutput, ActionTransition, CheckLevelUpAction, CompleteQuestAction,
    ContributeToChallengeAction, DecayCropAction, HarvestCropAction, ParticipateInFestivalAction,
    PlantCropAction, RecordGameScoreAction, RedeemRewardAction, SyncKind, UnlockArModelAction,
    UnlockBuildingAction, UnlockSkillAction, UpdateCropGrowthAction, UpdateDailyStreakAction,
    WaterCropAction,
};
pub use config::GameConfig;
pub use engine::{ExecuteError, GameEngine, Outcome, TransitionPhase, TransitionPhaseError};
pub use env::{GameEnv, SkillCategory, SkillDefinition, SkillOracle};
pub use state::{
    ArState, ChallengeKind, CommunityChallenge, CommunityState, Crop, CropStage, FarmState,
    FestivalEvent, FestivalKind, FestivalsState, GameState, LeaderboardEntry, MiniGamesState,
    Quest, QuestKind, QuestRewards, RedemptionStatus, Reward, RewardKind, RewardsState,
    SkillsState, SnapshotKind, StateChanges, UserReward, VillageState,
};
pub use time::Timestamp;
