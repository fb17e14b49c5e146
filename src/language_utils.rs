use anyhow::{Result, anyhow};
use isolang::Language;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language utilities for the supported target languages
///
/// Translation and speech are offered for a fixed set of Indian regional
/// languages. Codes are ISO 639-1; names and ISO 639-3 codes come from
/// `isolang`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TargetLanguage {
    #[default]
    #[serde(rename = "ta")]
    Tamil,
    #[serde(rename = "kn")]
    Kannada,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "te")]
    Telugu,
    #[serde(rename = "ml")]
    Malayalam,
}

impl TargetLanguage {
    /// All supported languages, in selector order
    pub const ALL: [TargetLanguage; 5] = [
        Self::Tamil,
        Self::Kannada,
        Self::Hindi,
        Self::Telugu,
        Self::Malayalam,
    ];

    /// ISO 639-1 code, as sent to translation and speech providers
    pub fn code(&self) -> &'static str {
        match self {
            Self::Tamil => "ta",
            Self::Kannada => "kn",
            Self::Hindi => "hi",
            Self::Telugu => "te",
            Self::Malayalam => "ml",
        }
    }

    fn iso(&self) -> Option<Language> {
        Language::from_639_1(self.code())
    }

    /// English name of the language (e.g. "Tamil")
    pub fn english_name(&self) -> &'static str {
        match self.iso() {
            Some(lang) => lang.to_name(),
            None => self.code(),
        }
    }

    /// Name of the language in its own script, when known
    pub fn native_name(&self) -> Option<&'static str> {
        self.iso().and_then(|lang| lang.to_autonym())
    }

    /// ISO 639-3 code (e.g. "tam")
    pub fn part3_code(&self) -> String {
        match self.iso() {
            Some(lang) => lang.to_639_3().to_string(),
            None => self.code().to_string(),
        }
    }

    /// Comma-separated list of supported codes, for error messages
    pub fn supported_codes() -> String {
        Self::ALL
            .iter()
            .map(|l| l.code())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for TargetLanguage {
    type Err = anyhow::Error;

    /// Accepts ISO 639-1 or 639-3 codes and English names, case-insensitively
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();

        let iso = match normalized.len() {
            2 => Language::from_639_1(&normalized),
            3 => Language::from_639_3(&normalized),
            _ => None,
        };

        Self::ALL
            .iter()
            .copied()
            .find(|lang| match iso {
                Some(iso) => lang.iso() == Some(iso),
                None => lang.english_name().eq_ignore_ascii_case(&normalized),
            })
            .ok_or_else(|| {
                anyhow!(
                    "Unsupported target language: {} (supported: {})",
                    s,
                    Self::supported_codes()
                )
            })
    }
}

/// Get the English name of any ISO 639-1/639-3 code, used for source languages
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = code.trim().to_lowercase();
    let lang = match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => Language::from_639_3(&normalized),
        _ => None,
    };

    lang.map(|l| l.to_name().to_string())
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}
