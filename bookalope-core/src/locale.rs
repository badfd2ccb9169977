//! Locale identifiers for the bookflow language field
//!
//! A locale is a BCP 47 language identifier written the way the Bookalope
//! server stores it: subtags joined by `_`, e.g. `en_US`, `zh_Hant_TW` or
//! `ca_ES_VALENCIA`. The language subtag must be a registered ISO 639-1 or
//! ISO 639-3 code. Script, region and variant subtags are checked for their
//! form only, so a region such as `ZZ` passes.

use crate::error::ValidationError;
use isolang::Language;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use unic_langid::LanguageIdentifier;

fn is_known_language(code: &str) -> bool {
    match code.len() {
        2 => Language::from_639_1(code).is_some(),
        // "und" is the BCP 47 placeholder for a missing language
        3 => code != "und" && Language::from_639_3(code).is_some(),
        _ => false,
    }
}

/// A validated locale identifier in canonical form.
///
/// Accepts `_` or `-` as separator and any letter case on input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    canonical: String,
    language: String,
    script: Option<String>,
    region: Option<String>,
    variants: Vec<String>,
}

impl Locale {
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::Locale(s.to_string());
        let trimmed = s.trim();

        // Mixed separators ("en-Latn_US") are not a locale
        if trimmed.is_empty() || (trimmed.contains('_') && trimmed.contains('-')) {
            return Err(invalid());
        }

        let id: LanguageIdentifier = trimmed.parse().map_err(|_| invalid())?;
        let language = id.language.as_str().to_string();
        if !is_known_language(&language) {
            return Err(invalid());
        }

        let script = id.script.as_ref().map(|script| script.as_str().to_string());
        let region = id.region.as_ref().map(|region| region.as_str().to_string());
        let variants: Vec<String> = id
            .variants()
            .map(|variant| variant.as_str().to_ascii_uppercase())
            .collect();

        let canonical = std::iter::once(language.as_str())
            .chain(script.as_deref())
            .chain(region.as_deref())
            .chain(variants.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("_");

        Ok(Self {
            canonical,
            language,
            script,
            region,
            variants,
        })
    }

    /// The language subtag, e.g. `en`
    pub fn language(&self) -> &str {
        &self.language
    }

    /// The script subtag, e.g. `Hant`, if present
    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    /// The region subtag, e.g. `US`, if present
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    pub fn as_str(&self) -> &str {
        &self.canonical
    }
}

impl FromStr for Locale {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.canonical
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}
