//! Village map progress: buildings and the quests attached to them.

use std::collections::BTreeSet;

/// Village progression state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct VillageState {
    /// Village level, always at least 1.
    pub level: u32,
    pub unlocked_buildings: BTreeSet<String>,
    /// Quests offered to the player, in display order.
    pub current_quests: Vec<Quest>,
    pub completed_quests: BTreeSet<String>,
}

impl VillageState {
    pub fn with_quests(mut quests: Vec<Quest>) -> Self {
        quests.sort_by_key(|quest| quest.order);
        Self {
            current_quests: quests,
            ..Self::default()
        }
    }

    pub fn quest(&self, quest_id: &str) -> Option<&Quest> {
        self.current_quests.iter().find(|quest| quest.id == quest_id)
    }

    pub(crate) fn quest_mut(&mut self, quest_id: &str) -> Option<&mut Quest> {
        self.current_quests
            .iter_mut()
            .find(|quest| quest.id == quest_id)
    }

    pub fn is_unlocked(&self, building_id: &str) -> bool {
        self.unlocked_buildings.contains(building_id)
    }
}

impl Default for VillageState {
    fn default() -> Self {
        Self {
            level: 1,
            unlocked_buildings: BTreeSet::new(),
            current_quests: Vec::new(),
            completed_quests: BTreeSet::new(),
        }
    }
}

/// What the player has to do to finish a quest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum QuestKind {
    Lesson,
    Quiz,
    MiniGame,
}

/// Rewards granted when a quest is completed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct QuestRewards {
    pub skill_points: u32,
    pub points: u32,
    pub unlock_building: Option<String>,
}

/// A unit of village progression tied to a building.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quest {
    pub id: String,
    pub building_id: String,
    pub title: String,
    pub description: String,
    pub kind: QuestKind,
    pub order: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rewards: QuestRewards,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_completed: bool,
}
