use std::collections::BTreeMap;

/// Skill tree progress.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SkillsState {
    /// Currency spent to raise skill levels.
    pub skill_points: u32,
    /// skill id -> current level (absent means level 0).
    pub unlocked_skills: BTreeMap<String, u32>,
    pub available_skills: Vec<String>,
}

impl SkillsState {
    pub fn level(&self, skill_id: &str) -> u32 {
        self.unlocked_skills.get(skill_id).copied().unwrap_or(0)
    }
}
