//! Action validation errors.
//!
//! Most of these describe unmet preconditions. The runtime treats them as
//! ignored mutations rather than failures.

/// Errors raised by action transitions.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionError {
    #[error("building {0} is already unlocked")]
    BuildingAlreadyUnlocked(String),

    #[error("quest {0} not found")]
    QuestNotFound(String),

    #[error("quest {0} is already completed")]
    QuestAlreadyCompleted(String),

    #[error("skill {skill_id} needs {required} skill points, {available} available")]
    InsufficientSkillPoints {
        skill_id: String,
        required: u32,
        available: u32,
    },

    #[error("skill {skill_id} is already at max level {max_level}")]
    SkillAtMaxLevel { skill_id: String, max_level: u32 },

    #[error("crop {0} not found")]
    CropNotFound(String),

    #[error("crop {0} has withered")]
    CropWithered(String),

    #[error("challenge {0} not found")]
    ChallengeNotFound(String),

    #[error("challenge {0} is not active")]
    ChallengeInactive(String),

    #[error("festival event {0} not found")]
    FestivalNotFound(String),

    #[error("festival event {0} is not active")]
    FestivalInactive(String),

    #[error("AR model {0} is already unlocked")]
    ArModelAlreadyUnlocked(String),

    #[error("reward {0} not found")]
    RewardNotFound(String),

    #[error("reward {0} is not available")]
    RewardUnavailable(String),

    #[error("reward costs {required} points, {available} available")]
    InsufficientPoints { required: u32, available: u32 },

    #[error("no level gained at {points} points (level {level})")]
    NoLevelGained { points: u32, level: u32 },

    /// A post-condition failed; the engine rolls the state back.
    #[error("invariant violated: {0}")]
    InvariantViolated(String),
}
