//! Translation dictionary loader.
//!
//! Dictionaries are TOML files grouped by screen:
//!
//! ```toml
//! [nav]
//! dashboard = "Dashboard"
//! ```
//!
//! which flatten to dotted keys such as `nav.dashboard`.

use std::path::Path;

use strum::IntoEnumIterator;

use crate::i18n::{Dictionary, Language, Translator};
use crate::loaders::{LoadResult, read_file};

pub struct DictionaryLoader;

impl DictionaryLoader {
    pub fn load(path: &Path) -> LoadResult<Dictionary> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse dictionary {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<Dictionary> {
        let table: toml::Table = toml::from_str(content)?;
        let mut dictionary = Dictionary::new();
        flatten("", &table, &mut dictionary);
        Ok(dictionary)
    }

    /// Loads `<dir>/<code>.toml` for every language that has one.
    ///
    /// Languages without a dictionary fall back to English at lookup time.
    pub fn load_translator(dir: &Path, language: Language) -> LoadResult<Translator> {
        let mut translator = Translator::new(language);
        for candidate in Language::iter() {
            let path = dir.join(format!("{}.toml", candidate.code()));
            if !path.exists() {
                tracing::debug!(language = %candidate, "no dictionary, using fallback");
                continue;
            }
            translator.insert_dictionary(candidate, Self::load(&path)?);
        }
        Ok(translator)
    }
}

fn flatten(prefix: &str, table: &toml::Table, out: &mut Dictionary) {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::Table(nested) => flatten(&full_key, nested, out),
            toml::Value::String(text) => {
                out.insert(full_key, text.clone());
            }
            other => {
                out.insert(full_key, other.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_sections_into_dotted_keys() {
        let dictionary = DictionaryLoader::parse(
            r#"
            [nav]
            dashboard = "Dashboard"

            [game.farm]
            water = "Water"
            "#,
        )
        .unwrap();

        assert_eq!(dictionary["nav.dashboard"], "Dashboard");
        assert_eq!(dictionary["game.farm.water"], "Water");
    }

    #[test]
    fn builds_translator_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("en.toml"), "[common]\nok = \"OK\"\n").unwrap();
        std::fs::write(dir.path().join("hi.toml"), "[common]\nyes = \"हाँ\"\n").unwrap();

        let translator = DictionaryLoader::load_translator(dir.path(), Language::Hindi).unwrap();

        assert_eq!(translator.t("common.yes"), "हाँ");
        assert_eq!(translator.t("common.ok"), "OK");
    }
}
