//! Action domain.
//!
//! Every mutation of [`GameState`](crate::state::GameState) is expressed as an
//! [`Action`] value. Each variant wraps a concrete transition struct that
//! implements [`ActionTransition`]; the engine routes the enum to the matching
//! transition.
//!
//! # Module Structure
//!
//! - `village`: buildings and quests
//! - `skills`: skill tree purchases
//! - `farm`: planting, watering, decay, harvest and growth ticks
//! - `community`: community challenge contributions
//! - `activities`: mini-game scores, festivals and AR models
//! - `rewards`: reward store redemptions
//! - `progression`: daily streak and village level-ups
mod activities;
mod community;
mod error;
mod farm;
mod progression;
mod rewards;
mod skills;
mod transition;
mod village;

pub use activities::{ParticipateInFestivalAction, RecordGameScoreAction, UnlockArModelAction};
pub use community::ContributeToChallengeAction;
pub use error::ActionError;
pub use farm::{
    DecayCropAction, HarvestCropAction, PlantCropAction, UpdateCropGrowthAction, WaterCropAction,
};
pub use progression::{CheckLevelUpAction, UpdateDailyStreakAction};
pub use rewards::RedeemRewardAction;
pub use skills::UnlockSkillAction;
pub use transition::ActionTransition;
pub use village::{CompleteQuestAction, UnlockBuildingAction};

use crate::time::Timestamp;

/// Canonical game action.
#[derive(Clone, Debug, PartialEq, Eq, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "action", rename_all = "snake_case")
)]
pub enum Action {
    UnlockBuilding(UnlockBuildingAction),
    CompleteQuest(CompleteQuestAction),
    UnlockSkill(UnlockSkillAction),
    PlantCrop(PlantCropAction),
    WaterCrop(WaterCropAction),
    DecayCrop(DecayCropAction),
    HarvestCrop(HarvestCropAction),
    UpdateCropGrowth(UpdateCropGrowthAction),
    ContributeToChallenge(ContributeToChallengeAction),
    RecordGameScore(RecordGameScoreAction),
    ParticipateInFestival(ParticipateInFestivalAction),
    UnlockArModel(UnlockArModelAction),
    RedeemReward(RedeemRewardAction),
    UpdateDailyStreak(UpdateDailyStreakAction),
    CheckLevelUp(CheckLevelUpAction),
}

impl Action {
    pub fn unlock_building(building_id: impl Into<String>) -> Self {
        Self::UnlockBuilding(UnlockBuildingAction::new(building_id))
    }

    pub fn complete_quest(quest_id: impl Into<String>) -> Self {
        Self::CompleteQuest(CompleteQuestAction::new(quest_id))
    }

    pub fn unlock_skill(skill_id: impl Into<String>) -> Self {
        Self::UnlockSkill(UnlockSkillAction::new(skill_id))
    }

    pub fn plant_crop(
        subject_id: impl Into<String>,
        crop_type: impl Into<String>,
        planted_at: Timestamp,
    ) -> Self {
        Self::PlantCrop(PlantCropAction::new(subject_id, crop_type, planted_at))
    }

    pub fn water_crop(crop_id: impl Into<String>) -> Self {
        Self::WaterCrop(WaterCropAction::new(crop_id))
    }

    pub fn decay_crop(crop_id: impl Into<String>, amount: u8) -> Self {
        Self::DecayCrop(DecayCropAction::new(crop_id, amount))
    }

    pub fn harvest_crop(crop_id: impl Into<String>) -> Self {
        Self::HarvestCrop(HarvestCropAction::new(crop_id))
    }

    pub fn update_crop_growth(now: Timestamp) -> Self {
        Self::UpdateCropGrowth(UpdateCropGrowthAction::new(now))
    }

    pub fn contribute_to_challenge(challenge_id: impl Into<String>, contribution: u32) -> Self {
        Self::ContributeToChallenge(ContributeToChallengeAction::new(challenge_id, contribution))
    }

    pub fn record_game_score(game_id: impl Into<String>, score: u32) -> Self {
        Self::RecordGameScore(RecordGameScoreAction::new(game_id, score))
    }

    pub fn participate_in_festival(event_id: impl Into<String>, progress: u32) -> Self {
        Self::ParticipateInFestival(ParticipateInFestivalAction::new(event_id, progress))
    }

    pub fn unlock_ar_model(model_id: impl Into<String>) -> Self {
        Self::UnlockArModel(UnlockArModelAction::new(model_id))
    }

    pub fn redeem_reward(
        reward_id: impl Into<String>,
        user_id: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        Self::RedeemReward(RedeemRewardAction::new(reward_id, user_id, now))
    }

    pub fn update_daily_streak(now: Timestamp) -> Self {
        Self::UpdateDailyStreak(UpdateDailyStreakAction::new(now))
    }

    pub fn check_level_up() -> Self {
        Self::CheckLevelUp(CheckLevelUpAction::default())
    }

    /// Snake-case action name, used in logs and error messages.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Offline action category the server must be told about, if any.
    ///
    /// Local bookkeeping (planting, watering, decay, growth ticks, streaks)
    /// never leaves the device.
    pub fn sync_kind(&self) -> Option<SyncKind> {
        match self {
            Self::CompleteQuest(_)
            | Self::RecordGameScore(_)
            | Self::ContributeToChallenge(_)
            | Self::ParticipateInFestival(_)
            | Self::HarvestCrop(_) => Some(SyncKind::ProgressUpdate),
            Self::UnlockBuilding(_) | Self::UnlockArModel(_) | Self::CheckLevelUp(_) => {
                Some(SyncKind::AchievementUnlock)
            }
            Self::UnlockSkill(_) => Some(SyncKind::SkillUnlock),
            Self::RedeemReward(_) => Some(SyncKind::RewardClaim),
            Self::PlantCrop(_)
            | Self::WaterCrop(_)
            | Self::DecayCrop(_)
            | Self::UpdateCropGrowth(_)
            | Self::UpdateDailyStreak(_) => None,
        }
    }
}

/// Category of an offline action, which selects the sync endpoint.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum SyncKind {
    ProgressUpdate,
    AchievementUnlock,
    SkillUnlock,
    RewardClaim,
}

/// Action-specific result of a successful execution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum ActionOutput {
    #[default]
    None,
    QuestCompleted {
        quest_id: String,
        unlocked_building: Option<String>,
    },
    CropPlanted {
        crop_id: String,
    },
    Harvested {
        value: u32,
    },
    SkillUnlocked {
        skill_id: String,
        level: u32,
    },
    RewardRedeemed {
        user_reward_id: String,
    },
    LevelUp {
        level: u32,
        skill_points_awarded: u32,
    },
    GrowthUpdated {
        ready: usize,
        withered: usize,
    },
    ScoreRecorded {
        new_high_score: bool,
        points_awarded: u32,
    },
    StreakUpdated {
        streak: u32,
    },
}
