/*!
 * Tests for configuration loading and validation
 */

use anyhow::Result;
use eduspeak::app_config::{Config, SummarizationBackend, TranslationProvider, TranslationStrategy};
use eduspeak::language_utils::TargetLanguage;

use crate::common;

/// A missing config file is created with defaults
#[test]
fn test_loadOrCreate_withMissingFile_shouldCreateDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    assert_eq!(config.target_language, TargetLanguage::Tamil);
    assert_eq!(config.translation.provider, TranslationProvider::Gemini);
    Ok(())
}

/// Values in the file win over defaults
#[test]
fn test_loadOrCreate_withExistingFile_shouldReadValues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let json = br#"{
        "target_language": "ml",
        "summarization": { "backend": "llm", "max_tokens": 300 },
        "translation": {
            "provider": "ollama",
            "available_providers": [ { "type": "ollama", "model": "mistral", "endpoint": "localhost" } ]
        },
        "speech": { "slow": true },
        "log_level": "debug"
    }"#;
    let path = common::create_test_file(temp_dir.path(), "conf.json", json)?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.target_language, TargetLanguage::Malayalam);
    assert_eq!(config.summarization.backend, SummarizationBackend::Llm);
    assert_eq!(config.summarization.max_tokens, 300);
    assert_eq!(config.translation.strategy, TranslationStrategy::Llm);
    assert_eq!(config.translation.get_model(), "mistral");
    assert!(config.speech.slow);
    config.validate()?;
    Ok(())
}

/// Malformed JSON is an error, not silently replaced
#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", b"{ not json")?;

    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

/// Unsupported target languages are rejected when parsing
#[test]
fn test_deserialize_withUnsupportedTargetLanguage_shouldFail() {
    let result = serde_json::from_str::<Config>(r#"{ "target_language": "fr" }"#);
    assert!(result.is_err());
}

/// The source language must be a real ISO code
#[test]
fn test_validate_withUnknownSourceLanguage_shouldFail() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Ollama;
    config.source_language = "zz".to_string();
    assert!(config.validate().is_err());
}
