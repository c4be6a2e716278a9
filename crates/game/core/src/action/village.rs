use crate::env::GameEnv;
use crate::state::{GameState, QuestRewards};

use super::{ActionError, ActionOutput, ActionTransition};

/// Adds a building to the village map.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnlockBuildingAction {
    pub building_id: String,
}

impl UnlockBuildingAction {
    pub fn new(building_id: impl Into<String>) -> Self {
        Self {
            building_id: building_id.into(),
        }
    }
}

impl ActionTransition for UnlockBuildingAction {
    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), ActionError> {
        if state.village.is_unlocked(&self.building_id) {
            return Err(ActionError::BuildingAlreadyUnlocked(
                self.building_id.clone(),
            ));
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, _env: &GameEnv<'_>) -> Result<ActionOutput, ActionError> {
        state
            .village
            .unlocked_buildings
            .insert(self.building_id.clone());
        Ok(ActionOutput::None)
    }
}

/// Marks a quest completed and pays out its rewards.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompleteQuestAction {
    pub quest_id: String,
}

impl CompleteQuestAction {
    pub fn new(quest_id: impl Into<String>) -> Self {
        Self {
            quest_id: quest_id.into(),
        }
    }
}

impl ActionTransition for CompleteQuestAction {
    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), ActionError> {
        let quest = state
            .village
            .quest(&self.quest_id)
            .ok_or_else(|| ActionError::QuestNotFound(self.quest_id.clone()))?;

        if quest.is_completed {
            return Err(ActionError::QuestAlreadyCompleted(self.quest_id.clone()));
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, _env: &GameEnv<'_>) -> Result<ActionOutput, ActionError> {
        let quest = state
            .village
            .quest_mut(&self.quest_id)
            .ok_or_else(|| ActionError::QuestNotFound(self.quest_id.clone()))?;
        quest.is_completed = true;
        let rewards = quest.rewards.clone();

        state
            .village
            .completed_quests
            .insert(self.quest_id.clone());

        let unlocked_building = grant_quest_rewards(state, &rewards);

        Ok(ActionOutput::QuestCompleted {
            quest_id: self.quest_id.clone(),
            unlocked_building,
        })
    }

    fn post_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), ActionError> {
        if !state.village.completed_quests.contains(&self.quest_id) {
            return Err(ActionError::InvariantViolated(format!(
                "completed quest {} missing from completed_quests",
                self.quest_id
            )));
        }
        Ok(())
    }
}

/// Returns the building newly unlocked by the rewards, if any.
fn grant_quest_rewards(state: &mut GameState, rewards: &QuestRewards) -> Option<String> {
    state.skills.skill_points = state.skills.skill_points.saturating_add(rewards.skill_points);
    state.rewards.points = state.rewards.points.saturating_add(rewards.points);

    let building = rewards.unlock_building.as_ref()?;
    state
        .village
        .unlocked_buildings
        .insert(building.clone())
        .then(|| building.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Quest, QuestKind, VillageState};

    fn quest(id: &str, rewards: QuestRewards) -> Quest {
        Quest {
            id: id.into(),
            building_id: "school".into(),
            title: "Counting".into(),
            description: "Count to ten".into(),
            kind: QuestKind::Lesson,
            order: 1,
            rewards,
            is_completed: false,
        }
    }

    #[test]
    fn completing_a_quest_pays_out_rewards() {
        let mut state = GameState::new();
        state.village = VillageState::with_quests(vec![quest(
            "q1",
            QuestRewards {
                skill_points: 2,
                points: 30,
                unlock_building: Some("library".into()),
            },
        )]);
        let env = GameEnv::default();
        let action = CompleteQuestAction::new("q1");

        action.pre_validate(&state, &env).unwrap();
        let output = action.apply(&mut state, &env).unwrap();

        assert_eq!(
            output,
            ActionOutput::QuestCompleted {
                quest_id: "q1".into(),
                unlocked_building: Some("library".into()),
            }
        );
        assert_eq!(state.skills.skill_points, 2);
        assert_eq!(state.rewards.points, 30);
        assert!(state.village.is_unlocked("library"));
        assert!(state.village.quest("q1").unwrap().is_completed);
    }

    #[test]
    fn completed_quest_is_rejected() {
        let mut state = GameState::new();
        let mut done = quest("q1", QuestRewards::default());
        done.is_completed = true;
        state.village = VillageState::with_quests(vec![done]);

        let result = CompleteQuestAction::new("q1").pre_validate(&state, &GameEnv::default());

        assert_eq!(result, Err(ActionError::QuestAlreadyCompleted("q1".into())));
    }

    #[test]
    fn unknown_quest_is_rejected() {
        let state = GameState::new();

        let result = CompleteQuestAction::new("nope").pre_validate(&state, &GameEnv::default());

        assert_eq!(result, Err(ActionError::QuestNotFound("nope".into())));
    }
}
