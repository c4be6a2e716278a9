use crate::env::GameEnv;
use crate::state::{GameState, RedemptionStatus, UserReward};
use crate::time::Timestamp;

use super::{ActionError, ActionOutput, ActionTransition};

/// Spends points on an item from the reward store.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RedeemRewardAction {
    pub reward_id: String,
    pub user_id: String,
    pub now: Timestamp,
}

impl RedeemRewardAction {
    pub fn new(reward_id: impl Into<String>, user_id: impl Into<String>, now: Timestamp) -> Self {
        Self {
            reward_id: reward_id.into(),
            user_id: user_id.into(),
            now,
        }
    }
}

impl ActionTransition for RedeemRewardAction {
    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), ActionError> {
        let reward = state
            .rewards
            .reward(&self.reward_id)
            .ok_or_else(|| ActionError::RewardNotFound(self.reward_id.clone()))?;
        if !reward.is_available {
            return Err(ActionError::RewardUnavailable(self.reward_id.clone()));
        }
        if state.rewards.points < reward.points_cost {
            return Err(ActionError::InsufficientPoints {
                required: reward.points_cost,
                available: state.rewards.points,
            });
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, _env: &GameEnv<'_>) -> Result<ActionOutput, ActionError> {
        let cost = state
            .rewards
            .reward(&self.reward_id)
            .map(|reward| reward.points_cost)
            .ok_or_else(|| ActionError::RewardNotFound(self.reward_id.clone()))?;
        state.rewards.points -= cost;

        let user_reward_id = state.allocate_id("user_reward");
        state.rewards.user_rewards.push(UserReward {
            id: user_reward_id.clone(),
            user_id: self.user_id.clone(),
            reward_id: self.reward_id.clone(),
            redeemed_at: self.now,
            status: RedemptionStatus::Pending,
        });

        Ok(ActionOutput::RewardRedeemed { user_reward_id })
    }
}
