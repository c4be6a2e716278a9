use crate::env::GameEnv;
use crate::state::GameState;

use super::{ActionError, ActionOutput, ActionTransition};

/// Records a finished mini-game round.
///
/// Every round earns `score / 10` points, whether or not it beats the
/// high score.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordGameScoreAction {
    pub game_id: String,
    pub score: u32,
}

impl RecordGameScoreAction {
    pub fn new(game_id: impl Into<String>, score: u32) -> Self {
        Self {
            game_id: game_id.into(),
            score,
        }
    }
}

impl ActionTransition for RecordGameScoreAction {
    fn apply(&self, state: &mut GameState, _env: &GameEnv<'_>) -> Result<ActionOutput, ActionError> {
        let new_high_score = self.score > state.mini_games.high_score(&self.game_id);
        if new_high_score {
            state
                .mini_games
                .high_scores
                .insert(self.game_id.clone(), self.score);
        }

        let points_awarded = self.score / 10;
        state.rewards.points = state.rewards.points.saturating_add(points_awarded);

        Ok(ActionOutput::ScoreRecorded {
            new_high_score,
            points_awarded,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParticipateInFestivalAction {
    pub event_id: String,
    pub progress: u32,
}

impl ParticipateInFestivalAction {
    pub fn new(event_id: impl Into<String>, progress: u32) -> Self {
        Self {
            event_id: event_id.into(),
            progress,
        }
    }
}

impl ActionTransition for ParticipateInFestivalAction {
    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), ActionError> {
        let event = state
            .festivals
            .event(&self.event_id)
            .ok_or_else(|| ActionError::FestivalNotFound(self.event_id.clone()))?;
        if !event.is_active {
            return Err(ActionError::FestivalInactive(self.event_id.clone()));
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, _env: &GameEnv<'_>) -> Result<ActionOutput, ActionError> {
        let progress = state
            .festivals
            .event_progress
            .entry(self.event_id.clone())
            .or_insert(0);
        *progress = progress.saturating_add(self.progress);
        Ok(ActionOutput::None)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnlockArModelAction {
    pub model_id: String,
}

impl UnlockArModelAction {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
        }
    }
}

impl ActionTransition for UnlockArModelAction {
    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), ActionError> {
        if state.ar.unlocked_models.contains(&self.model_id) {
            return Err(ActionError::ArModelAlreadyUnlocked(self.model_id.clone()));
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, _env: &GameEnv<'_>) -> Result<ActionOutput, ActionError> {
        state.ar.unlocked_models.insert(self.model_id.clone());
        Ok(ActionOutput::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{FestivalEvent, FestivalKind};
    use crate::time::Timestamp;

    #[test]
    fn lower_scores_still_earn_points() {
        let mut state = GameState::new();
        let env = GameEnv::default();

        let first = RecordGameScoreAction::new("math-race", 120)
            .apply(&mut state, &env)
            .unwrap();
        let second = RecordGameScoreAction::new("math-race", 45)
            .apply(&mut state, &env)
            .unwrap();

        assert_eq!(
            first,
            ActionOutput::ScoreRecorded {
                new_high_score: true,
                points_awarded: 12,
            }
        );
        assert_eq!(
            second,
            ActionOutput::ScoreRecorded {
                new_high_score: false,
                points_awarded: 4,
            }
        );
        assert_eq!(state.mini_games.high_score("math-race"), 120);
        assert_eq!(state.rewards.points, 16);
    }

    #[test]
    fn festival_progress_accumulates_for_active_events() {
        let mut state = GameState::new();
        state.festivals.active_events.push(FestivalEvent {
            id: "diwali-2024".into(),
            name: "Diwali".into(),
            kind: FestivalKind::Diwali,
            start_date: Timestamp::ZERO,
            end_date: Timestamp::ZERO.plus_hours(72),
            description: "Festival of lights".into(),
            is_active: true,
        });
        let env = GameEnv::default();
        let action = ParticipateInFestivalAction::new("diwali-2024", 3);

        action.pre_validate(&state, &env).unwrap();
        action.apply(&mut state, &env).unwrap();
        action.apply(&mut state, &env).unwrap();

        assert_eq!(state.festivals.event_progress["diwali-2024"], 6);
        assert_eq!(
            ParticipateInFestivalAction::new("holi", 1).pre_validate(&state, &env),
            Err(ActionError::FestivalNotFound("holi".into()))
        );
    }
}
