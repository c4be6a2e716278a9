//! RON catalog loaders.

use std::path::Path;

use arise_core::{CommunityChallenge, FestivalEvent, Quest, Reward, SkillDefinition};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::catalog::SkillCatalog;
use crate::loaders::{LoadResult, read_file};

/// Quest catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestCatalog {
    pub quests: Vec<Quest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardCatalog {
    pub rewards: Vec<Reward>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCatalogFile {
    pub skills: Vec<SkillDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeCatalog {
    pub challenges: Vec<CommunityChallenge>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FestivalCatalog {
    pub festivals: Vec<FestivalEvent>,
}

/// Loader for the RON content catalogs.
pub struct CatalogLoader;

impl CatalogLoader {
    pub fn load_quests(path: &Path) -> LoadResult<Vec<Quest>> {
        Self::load::<QuestCatalog>(path, "quest").map(|catalog| catalog.quests)
    }

    pub fn load_rewards(path: &Path) -> LoadResult<Vec<Reward>> {
        Self::load::<RewardCatalog>(path, "reward").map(|catalog| catalog.rewards)
    }

    pub fn load_skills(path: &Path) -> LoadResult<SkillCatalog> {
        Self::load::<SkillCatalogFile>(path, "skill").map(|catalog| SkillCatalog::new(catalog.skills))
    }

    pub fn load_challenges(path: &Path) -> LoadResult<Vec<CommunityChallenge>> {
        Self::load::<ChallengeCatalog>(path, "challenge").map(|catalog| catalog.challenges)
    }

    pub fn load_festivals(path: &Path) -> LoadResult<Vec<FestivalEvent>> {
        Self::load::<FestivalCatalog>(path, "festival").map(|catalog| catalog.festivals)
    }

    fn load<T: DeserializeOwned>(path: &Path, what: &str) -> LoadResult<T> {
        let content = read_file(path)?;
        ron::from_str(&content).map_err(|e| {
            anyhow::anyhow!(
                "Failed to parse {} catalog RON at {}: {}",
                what,
                path.display(),
                e
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arise_core::QuestKind;
    use std::io::Write;

    #[test]
    fn parses_quest_catalog() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"(
                quests: [
                    (
                        id: "count-1",
                        building_id: "school",
                        title: "Counting",
                        description: "Count the mangoes",
                        kind: quiz,
                        order: 2,
                        rewards: (points: 50, unlock_building: Some("library")),
                    ),
                ],
            )"#
        )
        .unwrap();

        let quests = CatalogLoader::load_quests(file.path()).unwrap();

        assert_eq!(quests.len(), 1);
        assert_eq!(quests[0].kind, QuestKind::Quiz);
        assert_eq!(quests[0].rewards.points, 50);
        assert_eq!(quests[0].rewards.skill_points, 0);
        assert!(!quests[0].is_completed);
    }

    #[test]
    fn reports_the_failing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "(skills: [ (id: 3) ])").unwrap();

        let error = CatalogLoader::load_skills(file.path()).unwrap_err();

        assert!(error.to_string().contains("skill catalog"));
    }
}
