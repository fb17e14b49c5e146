/*!
 * Tests for the translation strategies
 */

use eduspeak::app_config::{Config, TranslationStrategy};
use eduspeak::language_utils::TargetLanguage;
use eduspeak::providers::mock::MockProvider;
use eduspeak::translation::{DirectTranslator, PromptedTranslator, TRANSLATION_FAILED, Translator, translator_from_config};

/// Every supported language is named in English in the prompt
#[tokio::test]
async fn test_promptedTranslator_shouldPromptForEachLanguage() {
    let model = MockProvider::working();
    let translator = PromptedTranslator::new(Box::new(model.clone()));

    for language in TargetLanguage::ALL {
        let outcome = translator.translate("Photosynthesis makes sugar.", language).await;
        let expected = format!(
            "[GENERATED] Translate the following English text to {}: Photosynthesis makes sugar.",
            language.english_name()
        );
        assert_eq!(outcome.into_value(), expected);
    }
    assert_eq!(model.call_count(), TargetLanguage::ALL.len());
}

/// Unreachable provider yields exactly the sentinel
#[tokio::test]
async fn test_translators_withUnreachableProvider_shouldReturnSentinel() {
    let translators: Vec<Box<dyn Translator>> = vec![
        Box::new(PromptedTranslator::new(Box::new(MockProvider::failing()))),
        Box::new(DirectTranslator::new(Box::new(MockProvider::failing()), "en")),
    ];

    for translator in translators {
        let outcome = translator.translate("Hello", TargetLanguage::Tamil).await;
        assert!(outcome.is_degraded(), "{} should degrade", translator.name());
        assert_eq!(outcome.value(), TRANSLATION_FAILED);
    }
}

/// Strategy is fixed by configuration
#[test]
fn test_translatorFromConfig_withDirectStrategy_shouldUseMachineTranslation() {
    let mut config = Config::default();
    config.translation.strategy = TranslationStrategy::Direct;
    config.translation.direct.api_key = "key".to_string();

    let translator = translator_from_config(&config).unwrap();
    assert_eq!(translator.name(), "Google Translate");
}
