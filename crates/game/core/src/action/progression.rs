use crate::env::GameEnv;
use crate::state::GameState;
use crate::time::Timestamp;

use super::{ActionError, ActionOutput, ActionTransition};

/// Counts today's visit towards the daily streak.
///
/// Days are UTC calendar days. Coming back the next day extends the streak
/// and a longer gap resets it to one. A second visit on the same day only
/// refreshes `last_active_date`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpdateDailyStreakAction {
    pub now: Timestamp,
}

impl UpdateDailyStreakAction {
    pub fn new(now: Timestamp) -> Self {
        Self { now }
    }
}

impl ActionTransition for UpdateDailyStreakAction {
    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<ActionOutput, ActionError> {
        let farm = &mut state.farm;
        match self.now.calendar_days_since(farm.last_active_date) {
            0 => {}
            1 => {
                farm.daily_streak = (farm.daily_streak + 1).min(env.config().max_daily_streak);
            }
            _ => farm.daily_streak = 1,
        }
        farm.last_active_date = self.now;

        Ok(ActionOutput::StreakUpdated {
            streak: farm.daily_streak,
        })
    }
}

/// Raises the village level to match the point total.
///
/// One level-up grants `level_up_skill_points` once, even when the point
/// total jumps several levels at a time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheckLevelUpAction {}

impl ActionTransition for CheckLevelUpAction {
    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), ActionError> {
        let level = env.config().level_for_points(state.rewards.points);
        if level <= state.village.level {
            return Err(ActionError::NoLevelGained {
                points: state.rewards.points,
                level: state.village.level,
            });
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<ActionOutput, ActionError> {
        let config = env.config();
        let level = config.level_for_points(state.rewards.points);
        let skill_points_awarded = config.level_up_skill_points;

        state.village.level = level;
        state.skills.skill_points = state
            .skills
            .skill_points
            .saturating_add(skill_points_awarded);

        Ok(ActionOutput::LevelUp {
            level,
            skill_points_awarded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn streak_at(state: &mut GameState, now: Timestamp) -> u32 {
        match UpdateDailyStreakAction::new(now)
            .apply(state, &GameEnv::default())
            .unwrap()
        {
            ActionOutput::StreakUpdated { streak } => streak,
            other => panic!("unexpected output {other:?}"),
        }
    }

    #[test]
    fn consecutive_days_extend_the_streak() {
        let mut state = GameState::new();
        let day = |n: u64| Timestamp(n * Timestamp::DAY_MS + Timestamp::HOUR_MS);

        assert_eq!(streak_at(&mut state, day(1000)), 1);
        assert_eq!(streak_at(&mut state, day(1001)), 2);
        assert_eq!(streak_at(&mut state, day(1001).plus_hours(3)), 2);
        assert_eq!(streak_at(&mut state, day(1002)), 3);
        assert_eq!(streak_at(&mut state, day(1005)), 1);
    }

    #[test]
    fn visit_after_midnight_counts_as_next_day() {
        let mut state = GameState::new();
        let evening = Timestamp(1000 * Timestamp::DAY_MS).plus_hours(23);

        assert_eq!(streak_at(&mut state, evening), 1);
        assert_eq!(streak_at(&mut state, evening.plus_hours(2)), 2);
        assert_eq!(streak_at(&mut state, evening.plus_hours(20)), 2);
    }

    #[test]
    fn streak_is_capped() {
        let mut state = GameState::new();
        state.farm.daily_streak = 30;
        state.farm.last_active_date = Timestamp(0);

        assert_eq!(streak_at(&mut state, Timestamp(Timestamp::DAY_MS)), 30);
    }

    #[test]
    fn level_up_awards_skill_points_once() {
        let mut state = GameState::new();
        state.rewards.points = 250;
        let env = GameEnv::default();
        let action = CheckLevelUpAction::default();

        action.pre_validate(&state, &env).unwrap();
        let output = action.apply(&mut state, &env).unwrap();

        assert_eq!(
            output,
            ActionOutput::LevelUp {
                level: 3,
                skill_points_awarded: 2,
            }
        );
        assert_eq!(state.village.level, 3);
        assert_eq!(state.skills.skill_points, 2);
        assert!(action.pre_validate(&state, &env).is_err());
    }
}
