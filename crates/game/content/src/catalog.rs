//! In-memory content catalogs.

use std::collections::HashMap;

use arise_core::{
    CommunityChallenge, FestivalEvent, GameConfig, GameState, Quest, Reward, SkillDefinition,
    SkillOracle, VillageState,
};

/// Skill definitions indexed by id.
#[derive(Clone, Debug, Default)]
pub struct SkillCatalog {
    skills: HashMap<String, SkillDefinition>,
    order: Vec<String>,
}

impl SkillCatalog {
    pub fn new(definitions: Vec<SkillDefinition>) -> Self {
        let order = definitions.iter().map(|skill| skill.id.clone()).collect();
        let skills = definitions
            .into_iter()
            .map(|skill| (skill.id.clone(), skill))
            .collect();
        Self { skills, order }
    }

    /// Skill ids in catalog order.
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillDefinition> {
        self.order.iter().filter_map(|id| self.skills.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl SkillOracle for SkillCatalog {
    fn skill(&self, skill_id: &str) -> Option<&SkillDefinition> {
        self.skills.get(skill_id)
    }
}

/// Everything needed to start a new game.
#[derive(Clone, Debug, Default)]
pub struct GameContent {
    pub config: GameConfig,
    pub quests: Vec<Quest>,
    pub rewards: Vec<Reward>,
    pub skills: SkillCatalog,
    pub challenges: Vec<CommunityChallenge>,
    pub festivals: Vec<FestivalEvent>,
}

impl GameContent {
    /// Builds a fresh state seeded with the catalogs.
    pub fn initial_state(&self) -> GameState {
        let mut state = GameState::new();
        state.village = VillageState::with_quests(self.quests.clone());
        state.skills.available_skills = self.skills.ids().to_vec();
        state.rewards.available_rewards = self.rewards.clone();
        state.community.active_challenges = self.challenges.clone();
        state.festivals.active_events = self.festivals.clone();
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arise_core::SkillCategory;

    fn skill(id: &str, cost: u32) -> SkillDefinition {
        SkillDefinition {
            id: id.into(),
            name: id.to_uppercase(),
            category: SkillCategory::Math,
            cost,
            max_level: Some(5),
        }
    }

    #[test]
    fn catalog_keeps_file_order() {
        let catalog = SkillCatalog::new(vec![skill("geometry", 2), skill("algebra", 1)]);

        assert_eq!(catalog.ids(), ["geometry", "algebra"]);
        assert_eq!(catalog.skill("algebra").map(|s| s.cost), Some(1));
        assert!(catalog.skill("poetry").is_none());
    }

    #[test]
    fn initial_state_lists_catalog_skills() {
        let content = GameContent {
            skills: SkillCatalog::new(vec![skill("algebra", 1)]),
            ..GameContent::default()
        };

        let state = content.initial_state();

        assert_eq!(state.skills.available_skills, vec!["algebra".to_string()]);
        assert_eq!(state.village.level, 1);
    }
}
