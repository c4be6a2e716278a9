//! Data-driven content definitions and loaders.
//!
//! This crate houses the static learning content the game is seeded with and
//! provides loaders for RON/TOML data files:
//! - Village quests, skills, rewards, community challenges and festivals (RON)
//! - Game configuration (TOML)
//! - Translation dictionaries for the supported languages (TOML)
//!
//! Catalogs seed a fresh [`arise_core::GameState`]; the skill catalog also
//! serves as the engine's [`arise_core::SkillOracle`].

pub mod catalog;
pub mod i18n;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{GameContent, SkillCatalog};
pub use i18n::{Dictionary, Language, LanguageConfig, Translator, format_number};

#[cfg(feature = "loaders")]
pub use loaders::{CatalogLoader, ConfigLoader, ContentFactory, DictionaryLoader, LoadResult};
