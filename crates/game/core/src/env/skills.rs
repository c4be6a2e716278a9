//! Skill tree oracle.

/// Subject area a skill belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum SkillCategory {
    Math,
    Science,
    Language,
    #[default]
    General,
}

/// Static definition of a skill in the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDefinition {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: SkillCategory,
    /// Skill points charged per level.
    pub cost: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_level: Option<u32>,
}

/// Oracle providing skill definitions.
///
/// Skills missing from the oracle cost the configured default and have no
/// level cap.
pub trait SkillOracle: Send + Sync {
    fn skill(&self, skill_id: &str) -> Option<&SkillDefinition>;
}
