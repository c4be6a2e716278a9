//! Languages, translation lookup and locale-aware number formatting.

use std::collections::HashMap;

/// Flat translation table: dotted key (`nav.dashboard`) to text.
pub type Dictionary = HashMap<String, String>;

/// Supported interface languages, identified by ISO 639-1 code.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Language {
    #[default]
    #[strum(serialize = "en")]
    #[cfg_attr(feature = "serde", serde(rename = "en"))]
    English,
    #[strum(serialize = "hi")]
    #[cfg_attr(feature = "serde", serde(rename = "hi"))]
    Hindi,
    #[strum(serialize = "ta")]
    #[cfg_attr(feature = "serde", serde(rename = "ta"))]
    Tamil,
    #[strum(serialize = "te")]
    #[cfg_attr(feature = "serde", serde(rename = "te"))]
    Telugu,
    #[strum(serialize = "bn")]
    #[cfg_attr(feature = "serde", serde(rename = "bn"))]
    Bengali,
    #[strum(serialize = "mr")]
    #[cfg_attr(feature = "serde", serde(rename = "mr"))]
    Marathi,
    #[strum(serialize = "gu")]
    #[cfg_attr(feature = "serde", serde(rename = "gu"))]
    Gujarati,
    #[strum(serialize = "kn")]
    #[cfg_attr(feature = "serde", serde(rename = "kn"))]
    Kannada,
    #[strum(serialize = "ml")]
    #[cfg_attr(feature = "serde", serde(rename = "ml"))]
    Malayalam,
    #[strum(serialize = "or")]
    #[cfg_attr(feature = "serde", serde(rename = "or"))]
    Odia,
    #[strum(serialize = "pa")]
    #[cfg_attr(feature = "serde", serde(rename = "pa"))]
    Punjabi,
    #[strum(serialize = "as")]
    #[cfg_attr(feature = "serde", serde(rename = "as"))]
    Assamese,
}

/// Display metadata for a language.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LanguageConfig {
    pub code: Language,
    pub name: &'static str,
    pub native_name: &'static str,
    pub rtl: bool,
}

impl Language {
    pub const fn config(self) -> LanguageConfig {
        let (name, native_name) = match self {
            Self::English => ("English", "English"),
            Self::Hindi => ("Hindi", "हिन्दी"),
            Self::Tamil => ("Tamil", "தமிழ்"),
            Self::Telugu => ("Telugu", "తెలుగు"),
            Self::Bengali => ("Bengali", "বাংলা"),
            Self::Marathi => ("Marathi", "मराठी"),
            Self::Gujarati => ("Gujarati", "ગુજરાતી"),
            Self::Kannada => ("Kannada", "ಕನ್ನಡ"),
            Self::Malayalam => ("Malayalam", "മലയാളം"),
            Self::Odia => ("Odia", "ଓଡ଼ିଆ"),
            Self::Punjabi => ("Punjabi", "ਪੰਜਾਬੀ"),
            Self::Assamese => ("Assamese", "অসমীয়া"),
        };
        LanguageConfig {
            code: self,
            name,
            native_name,
            rtl: false,
        }
    }

    pub fn code(self) -> &'static str {
        self.into()
    }
}

/// Translation lookup over per-language dictionaries.
///
/// Lookups fall back to English, then to the key itself.
#[derive(Clone, Debug, Default)]
pub struct Translator {
    language: Language,
    dictionaries: HashMap<Language, Dictionary>,
}

impl Translator {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            dictionaries: HashMap::new(),
        }
    }

    pub fn with_dictionary(mut self, language: Language, dictionary: Dictionary) -> Self {
        self.insert_dictionary(language, dictionary);
        self
    }

    pub fn insert_dictionary(&mut self, language: Language, dictionary: Dictionary) {
        self.dictionaries.insert(language, dictionary);
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Translates `key` into the active language.
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.t_in(key, self.language)
    }

    /// Translates `key` into `language`.
    pub fn t_in<'a>(&'a self, key: &'a str, language: Language) -> &'a str {
        if let Some(text) = self.lookup(language, key) {
            return text;
        }

        tracing::warn!(key, language = %language, "translation missing");
        self.lookup(Language::English, key).unwrap_or(key)
    }

    fn lookup(&self, language: Language, key: &str) -> Option<&str> {
        self.dictionaries
            .get(&language)
            .and_then(|dictionary| dictionary.get(key))
            .map(String::as_str)
    }
}

/// Formats an integer with the digit grouping of `language`.
///
/// Hindi uses Indian grouping (`12,34,567`); every other language uses
/// Western thousands grouping (`1,234,567`).
pub fn format_number(value: i64, language: Language) -> String {
    let digits = value.unsigned_abs().to_string();
    let grouped = match language {
        Language::Hindi => group_indian(&digits),
        _ => group_from_right(&digits, 3),
    };

    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_owned();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    format!("{},{}", group_from_right(head, 2), tail)
}

fn group_from_right(digits: &str, size: usize) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / size);
    let first = match digits.len() % size {
        0 => size,
        rem => rem,
    };
    for (index, ch) in digits.chars().enumerate() {
        if index >= first && (index - first) % size == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
