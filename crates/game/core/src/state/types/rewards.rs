use crate::time::Timestamp;

/// Point balance and the reward store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct RewardsState {
    pub points: u32,
    pub available_rewards: Vec<Reward>,
    /// Redemption history, oldest first.
    pub user_rewards: Vec<UserReward>,
}

impl RewardsState {
    pub fn reward(&self, reward_id: &str) -> Option<&Reward> {
        self.available_rewards
            .iter()
            .find(|reward| reward.id == reward_id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum RewardKind {
    Certificate,
    Badge,
    Physical,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reward {
    pub id: String,
    pub name: String,
    pub kind: RewardKind,
    pub description: String,
    pub points_cost: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub image_url: Option<String>,
    pub is_available: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum RedemptionStatus {
    Pending,
    Approved,
    Shipped,
}

/// A reward the player has redeemed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserReward {
    pub id: String,
    pub user_id: String,
    pub reward_id: String,
    pub redeemed_at: Timestamp,
    pub status: RedemptionStatus,
}
