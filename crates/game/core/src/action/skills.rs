use crate::env::GameEnv;
use crate::state::GameState;

use super::{ActionError, ActionOutput, ActionTransition};

/// Spends skill points to raise a skill by one level.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnlockSkillAction {
    pub skill_id: String,
}

impl UnlockSkillAction {
    pub fn new(skill_id: impl Into<String>) -> Self {
        Self {
            skill_id: skill_id.into(),
        }
    }
}

impl ActionTransition for UnlockSkillAction {
    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), ActionError> {
        let required = env.skill_cost(&self.skill_id);
        let available = state.skills.skill_points;
        if available < required {
            return Err(ActionError::InsufficientSkillPoints {
                skill_id: self.skill_id.clone(),
                required,
                available,
            });
        }

        match env.max_level(&self.skill_id) {
            Some(max_level) if state.skills.level(&self.skill_id) >= max_level => {
                Err(ActionError::SkillAtMaxLevel {
                    skill_id: self.skill_id.clone(),
                    max_level,
                })
            }
            _ => Ok(()),
        }
    }

    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<ActionOutput, ActionError> {
        let cost = env.skill_cost(&self.skill_id);
        let level = state
            .skills
            .unlocked_skills
            .entry(self.skill_id.clone())
            .or_insert(0);
        *level += 1;
        let level = *level;
        state.skills.skill_points -= cost;

        Ok(ActionOutput::SkillUnlocked {
            skill_id: self.skill_id.clone(),
            level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::env::{SkillCategory, SkillDefinition, SkillOracle};

    struct Catalog(Vec<SkillDefinition>);

    impl SkillOracle for Catalog {
        fn skill(&self, skill_id: &str) -> Option<&SkillDefinition> {
            self.0.iter().find(|skill| skill.id == skill_id)
        }
    }

    #[test]
    fn unknown_skills_cost_one_point() {
        let mut state = GameState::new();
        state.skills.skill_points = 1;
        let env = GameEnv::default();
        let action = UnlockSkillAction::new("fractions");

        action.pre_validate(&state, &env).unwrap();
        let output = action.apply(&mut state, &env).unwrap();

        assert_eq!(
            output,
            ActionOutput::SkillUnlocked {
                skill_id: "fractions".into(),
                level: 1,
            }
        );
        assert_eq!(state.skills.skill_points, 0);
        assert!(action.pre_validate(&state, &env).is_err());
    }

    #[test]
    fn catalog_cost_and_cap_apply() {
        let config = GameConfig::default();
        let catalog = Catalog(vec![SkillDefinition {
            id: "algebra".into(),
            name: "Algebra".into(),
            category: SkillCategory::Math,
            cost: 3,
            max_level: Some(1),
        }]);
        let env = GameEnv::new(&config).with_skills(&catalog);
        let mut state = GameState::new();
        state.skills.skill_points = 2;
        let action = UnlockSkillAction::new("algebra");

        assert!(matches!(
            action.pre_validate(&state, &env),
            Err(ActionError::InsufficientSkillPoints { required: 3, .. })
        ));

        state.skills.skill_points = 10;
        action.apply(&mut state, &env).unwrap();

        assert_eq!(state.skills.skill_points, 7);
        assert_eq!(
            action.pre_validate(&state, &env),
            Err(ActionError::SkillAtMaxLevel {
                skill_id: "algebra".into(),
                max_level: 1,
            })
        );
    }
}
