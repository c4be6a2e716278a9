//! Action transition dispatch and execution logic.

use crate::action::{Action, ActionOutput, ActionTransition};
use crate::env::GameEnv;
use crate::state::GameState;

use super::errors::{TransitionPhase, TransitionPhaseError};

/// Executes a transition through the three-phase pipeline and returns the output.
///
/// Phases:
/// 1. `pre_validate` - Check preconditions before mutation
/// 2. `apply` - Mutate the game state and return the output
/// 3. `post_validate` - Verify postconditions after mutation
#[inline]
fn drive_transition<T>(
    transition: &T,
    state: &mut GameState,
    env: &GameEnv<'_>,
) -> Result<ActionOutput, TransitionPhaseError>
where
    T: ActionTransition,
{
    transition
        .pre_validate(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    let output = transition
        .apply(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;

    transition
        .post_validate(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))?;

    Ok(output)
}

macro_rules! dispatch_transition {
    ($action:expr, $state:expr, $env:expr, [$($variant:ident),+ $(,)?]) => {
        match $action {
            $(Action::$variant(transition) => drive_transition(transition, $state, $env),)+
        }
    };
}

/// Routes an action to its transition.
pub(super) fn execute_transition(
    action: &Action,
    state: &mut GameState,
    env: &GameEnv<'_>,
) -> Result<ActionOutput, TransitionPhaseError> {
    dispatch_transition!(
        action,
        state,
        env,
        [
            UnlockBuilding,
            CompleteQuest,
            UnlockSkill,
            PlantCrop,
            WaterCrop,
            DecayCrop,
            HarvestCrop,
            UpdateCropGrowth,
            ContributeToChallenge,
            RecordGameScore,
            ParticipateInFestival,
            UnlockArModel,
            RedeemReward,
            UpdateDailyStreak,
            CheckLevelUp,
        ]
    )
}
