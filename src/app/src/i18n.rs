//! Locale selection
//!
//! The core only decides which locale is active. Translation tables, the
//! `lang` attribute and local storage stay with the shell, which reads the
//! active locale from the view model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Locales the UI ships translations for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    De,
    En,
}

pub const SUPPORTED_LOCALES: [Locale; 2] = [Locale::De, Locale::En];

impl Locale {
    pub fn code(self) -> &'static str {
        match self {
            Self::De => "de",
            Self::En => "en",
        }
    }

    /// Exact match against the supported codes, `en-US` is not `en`
    pub fn from_code(code: &str) -> Option<Self> {
        SUPPORTED_LOCALES
            .into_iter()
            .find(|locale| locale.code() == code)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

pub fn supported_languages() -> Vec<&'static str> {
    SUPPORTED_LOCALES.iter().map(|l| l.code()).collect()
}

pub fn is_locale_supported(locale: &str) -> bool {
    Locale::from_code(locale).is_some()
}

/// Stored locale, if there is one and it is still supported
pub fn persisted_locale(stored: Option<&str>) -> Option<Locale> {
    stored.and_then(Locale::from_code)
}
