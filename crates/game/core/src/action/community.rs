use crate::env::GameEnv;
use crate::state::GameState;

use super::{ActionError, ActionOutput, ActionTransition};

/// Adds the player's contribution to an active community challenge.
///
/// Shared progress saturates at the challenge target; the player's own
/// contribution keeps accumulating.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContributeToChallengeAction {
    pub challenge_id: String,
    pub contribution: u32,
}

impl ContributeToChallengeAction {
    pub fn new(challenge_id: impl Into<String>, contribution: u32) -> Self {
        Self {
            challenge_id: challenge_id.into(),
            contribution,
        }
    }
}

impl ActionTransition for ContributeToChallengeAction {
    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), ActionError> {
        let challenge = state
            .community
            .challenge(&self.challenge_id)
            .ok_or_else(|| ActionError::ChallengeNotFound(self.challenge_id.clone()))?;
        if !challenge.is_active {
            return Err(ActionError::ChallengeInactive(self.challenge_id.clone()));
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, _env: &GameEnv<'_>) -> Result<ActionOutput, ActionError> {
        let challenge = state
            .community
            .challenge_mut(&self.challenge_id)
            .ok_or_else(|| ActionError::ChallengeNotFound(self.challenge_id.clone()))?;
        challenge.current_progress = challenge
            .current_progress
            .saturating_add(self.contribution)
            .min(challenge.target);

        let mine = state
            .community
            .user_progress
            .entry(self.challenge_id.clone())
            .or_insert(0);
        *mine = mine.saturating_add(self.contribution);

        Ok(ActionOutput::None)
    }

    fn post_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), ActionError> {
        match state.community.challenge(&self.challenge_id) {
            Some(challenge) if challenge.current_progress > challenge.target => {
                Err(ActionError::InvariantViolated(format!(
                    "challenge {} progress above target",
                    challenge.id
                )))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ChallengeKind, CommunityChallenge};
    use crate::time::Timestamp;

    fn challenge(is_active: bool) -> CommunityChallenge {
        CommunityChallenge {
            id: "plant-trees".into(),
            title: "Plant 100 trees".into(),
            description: "Together".into(),
            kind: ChallengeKind::Weekly,
            start_date: Timestamp::ZERO,
            end_date: Timestamp::ZERO.plus_hours(24 * 7),
            target: 100,
            current_progress: 90,
            is_active,
        }
    }

    #[test]
    fn shared_progress_stops_at_target() {
        let mut state = GameState::new();
        state.community.active_challenges.push(challenge(true));
        let env = GameEnv::default();

        let action = ContributeToChallengeAction::new("plant-trees", 25);
        action.pre_validate(&state, &env).unwrap();
        action.apply(&mut state, &env).unwrap();
        action.apply(&mut state, &env).unwrap();

        assert_eq!(
            state.community.challenge("plant-trees").unwrap().current_progress,
            100
        );
        assert_eq!(state.community.user_progress["plant-trees"], 50);
    }

    #[test]
    fn inactive_challenge_is_rejected() {
        let mut state = GameState::new();
        state.community.active_challenges.push(challenge(false));

        let result =
            ContributeToChallengeAction::new("plant-trees", 5).pre_validate(&state, &GameEnv::default());

        assert_eq!(
            result,
            Err(ActionError::ChallengeInactive("plant-trees".into()))
        );
    }
}
