//! Read-only rule data consulted by the action pipeline.
//!
//! [`GameEnv`] bundles the tunable [`GameConfig`] with optional oracles so the
//! engine never depends on how content was loaded.
mod skills;

pub use skills::{SkillCategory, SkillDefinition, SkillOracle};

use crate::config::GameConfig;

static DEFAULT_CONFIG: GameConfig = GameConfig::new();

/// Aggregates the configuration and oracles required by the reducer.
#[derive(Clone, Copy)]
pub struct GameEnv<'a> {
    config: &'a GameConfig,
    skills: Option<&'a dyn SkillOracle>,
}

impl<'a> GameEnv<'a> {
    pub fn new(config: &'a GameConfig) -> Self {
        Self {
            config,
            skills: None,
        }
    }

    pub fn with_skills(mut self, skills: &'a dyn SkillOracle) -> Self {
        self.skills = Some(skills);
        self
    }

    pub fn config(&self) -> &'a GameConfig {
        self.config
    }

    /// Cost of raising `skill_id` by one level.
    ///
    /// Falls back to [`GameConfig::default_skill_cost`] for skills the catalog
    /// does not know.
    pub fn skill_cost(&self, skill_id: &str) -> u32 {
        self.skills
            .and_then(|oracle| oracle.skill(skill_id))
            .map(|skill| skill.cost)
            .unwrap_or(self.config.default_skill_cost)
    }

    /// Highest level `skill_id` may reach, if capped.
    pub fn max_level(&self, skill_id: &str) -> Option<u32> {
        self.skills
            .and_then(|oracle| oracle.skill(skill_id))
            .and_then(|skill| skill.max_level)
    }
}

impl Default for GameEnv<'static> {
    fn default() -> Self {
        Self::new(&DEFAULT_CONFIG)
    }
}

impl std::fmt::Debug for GameEnv<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEnv")
            .field("config", self.config)
            .field("skills", &self.skills.is_some())
            .finish()
    }
}
