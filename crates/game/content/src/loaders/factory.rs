//! Content factory for building catalogs from data files.

use std::path::{Path, PathBuf};

use arise_core::{GameConfig, GameState};

use crate::catalog::GameContent;
use crate::i18n::{Language, Translator};
use crate::loaders::{CatalogLoader, ConfigLoader, DictionaryLoader, LoadResult};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── quests.ron
/// ├── rewards.ron
/// ├── skills.ron
/// ├── challenges.ron
/// ├── festivals.ron
/// └── i18n/
///     ├── en.toml
///     └── hi.toml
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Content shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Load game configuration from `config.toml`, or defaults if absent.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load every catalog.
    pub fn load_content(&self) -> LoadResult<GameContent> {
        let content = GameContent {
            config: self.load_config()?,
            quests: CatalogLoader::load_quests(&self.data_dir.join("quests.ron"))?,
            rewards: CatalogLoader::load_rewards(&self.data_dir.join("rewards.ron"))?,
            skills: CatalogLoader::load_skills(&self.data_dir.join("skills.ron"))?,
            challenges: CatalogLoader::load_challenges(&self.data_dir.join("challenges.ron"))?,
            festivals: CatalogLoader::load_festivals(&self.data_dir.join("festivals.ron"))?,
        };
        tracing::debug!(
            quests = content.quests.len(),
            rewards = content.rewards.len(),
            skills = content.skills.len(),
            "loaded content catalogs"
        );
        Ok(content)
    }

    /// Fresh game state seeded with the catalogs.
    pub fn initial_state(&self) -> LoadResult<GameState> {
        Ok(self.load_content()?.initial_state())
    }

    /// Translator with every dictionary found under `i18n/`.
    pub fn load_translator(&self, language: Language) -> LoadResult<Translator> {
        DictionaryLoader::load_translator(&self.data_dir.join("i18n"), language)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arise_core::SkillOracle;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn bundled_content_seeds_a_playable_state() {
        let factory = ContentFactory::bundled();
        let content = factory.load_content().unwrap();
        let state = content.initial_state();

        assert!(!state.village.current_quests.is_empty());
        assert!(!state.rewards.available_rewards.is_empty());
        assert!(!state.skills.available_skills.is_empty());
        for skill_id in &state.skills.available_skills {
            assert!(content.skills.skill(skill_id).is_some());
        }
        let orders: Vec<_> = state.village.current_quests.iter().map(|q| q.order).collect();
        let mut sorted = orders.clone();
        sorted.sort();
        assert_eq!(orders, sorted);
    }

    #[test]
    fn bundled_dictionaries_cover_english_and_hindi() {
        let translator = ContentFactory::bundled()
            .load_translator(Language::Hindi)
            .unwrap();

        assert_eq!(translator.t("nav.quiz"), "क्विज़");
        assert_eq!(translator.t_in("nav.quiz", Language::Tamil), "Quiz");
    }
}
