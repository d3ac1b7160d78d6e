//! Localized labels and relative-time translation.
//!
//! A translations file maps locale codes to label tables:
//!
//! ```json
//! {
//!   "fr": {
//!     "comment": "commentaire",
//!     "comments": "commentaires",
//!     "time_units": { "d": "j", "w": "sem" },
//!     "phrases": { "now": "maintenant" }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Labels for one locale. Missing labels fall back to the default locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// Relative-time unit suffixes, e.g. `"d" -> "j"`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub time_units: BTreeMap<String, String>,
    /// Whole relative-time strings, e.g. `"now" -> "maintenant"`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub phrases: BTreeMap<String, String>,
}

impl Labels {
    fn english() -> &'static Labels {
        static ENGLISH: OnceLock<Labels> = OnceLock::new();
        ENGLISH.get_or_init(|| Labels {
            comment: Some("comment".to_string()),
            comments: Some("comments".to_string()),
            ..Default::default()
        })
    }

    fn comment_label(&self, count: u64) -> Option<&str> {
        if count == 1 {
            self.comment.as_deref()
        } else {
            self.comments.as_deref()
        }
    }
}

pub const DEFAULT_LANGUAGE: &str = "en";

/// Label tables keyed by locale code, with an explicit default locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translations {
    /// Locale consulted when the active one lacks a label
    #[serde(default = "default_language")]
    pub default_language: String,
    #[serde(flatten)]
    pub locales: BTreeMap<String, Labels>,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl Default for Translations {
    fn default() -> Self {
        let mut locales = BTreeMap::new();
        locales.insert(DEFAULT_LANGUAGE.to_string(), Labels::english().clone());
        Self {
            default_language: default_language(),
            locales,
        }
    }
}

impl Translations {
    /// Parse a translations file, layered over the built-in defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: Translations = serde_json::from_str(json)
            .map_err(|e| Error::ConfigError(format!("Invalid translations: {}", e)))?;
        let mut merged = Translations::default();
        merged.default_language = parsed.default_language;
        merged.locales.extend(parsed.locales);
        Ok(merged)
    }

    pub fn locale(&self, language: &str) -> Option<&Labels> {
        self.locales.get(language)
    }

    /// `"<count> <label>"` with the singular label only for exactly one.
    pub fn comment_count(&self, language: &str, count: u64) -> String {
        let label = [language, self.default_language.as_str()]
            .iter()
            .filter_map(|lang| self.locale(lang))
            .chain(std::iter::once(Labels::english()))
            .find_map(|labels| labels.comment_label(count))
            .unwrap_or_default();
        format!("{} {}", count, label)
    }
}

/// Localizes a raw relative-time string such as `"2d"`.
pub trait TimeTranslator: Send + Sync {
    fn translate(&self, raw: &str, language: &str, translations: &Translations) -> String;
}

/// Translator driven entirely by the label tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelTimeTranslator;

impl TimeTranslator for LabelTimeTranslator {
    fn translate(&self, raw: &str, language: &str, translations: &Translations) -> String {
        let Some(labels) = translations.locale(language) else {
            return raw.to_string();
        };
        if let Some(phrase) = labels.phrases.get(&raw.to_lowercase()) {
            return phrase.clone();
        }

        let digits = raw.chars().take_while(char::is_ascii_digit).count();
        if digits == 0 {
            return raw.to_string();
        }
        let (number, unit) = raw.split_at(digits);
        match labels.time_units.get(unit.trim()) {
            Some(localized) => format!("{}{}", number, localized),
            None => raw.to_string(),
        }
    }
}
