/*!
 * Translation of the summary into the target language.
 *
 * Two strategies sit behind the `Translator` trait:
 * - `PromptedTranslator`: a general-purpose LLM is asked to translate
 * - `DirectTranslator`: a dedicated machine-translation service
 *
 * The strategy is picked once, from configuration, by
 * `translator_from_config`. Translators never return an error: a failed or
 * empty answer becomes `TRANSLATION_FAILED`, reported as a degraded outcome.
 */

use async_trait::async_trait;
use log::{debug, error, info};

use crate::app_config::{Config, TranslationProvider, TranslationStrategy};
use crate::errors::{ProviderError, StageError};
use crate::language_utils::TargetLanguage;
use crate::pipeline::StageOutcome;
use crate::providers::anthropic::Anthropic;
use crate::providers::gemini::Gemini;
use crate::providers::google_translate::GoogleTranslate;
use crate::providers::ollama::Ollama;
use crate::providers::{LanguageModel, MachineTranslation};

/// Text substituted for a translation that could not be produced
pub const TRANSLATION_FAILED: &str = "Translation failed.";

/// Renders text in a target language
#[async_trait]
pub trait Translator: Send + Sync + std::fmt::Debug {
    /// Translate `text` into `target`.
    ///
    /// Empty input translates to the empty string without a provider call.
    async fn translate(&self, text: &str, target: TargetLanguage) -> StageOutcome<String>;

    /// Backend name for logs
    fn name(&self) -> &str;
}

/// Trim a provider answer, treating an empty one as a failure
fn accept_translation(text: String, provider: &str) -> Result<String, ProviderError> {
    let text = text.trim();
    if text.is_empty() {
        Err(ProviderError::EmptyResponse(provider.to_string()))
    } else {
        Ok(text.to_string())
    }
}

fn finish(result: Result<String, ProviderError>, target: TargetLanguage) -> StageOutcome<String> {
    match result {
        Ok(translation) => {
            info!(
                "Translated into {} ({} characters)",
                target.english_name(),
                translation.chars().count()
            );
            StageOutcome::completed(translation)
        }
        Err(e) => {
            error!("Error translating text: {}", e);
            StageOutcome::degraded(TRANSLATION_FAILED.to_string(), StageError::Translation(e))
        }
    }
}

/// Translation by prompting a language model
#[derive(Debug)]
pub struct PromptedTranslator {
    model: Box<dyn LanguageModel>,
    temperature: f32,
}

impl PromptedTranslator {
    pub fn new(model: Box<dyn LanguageModel>) -> Self {
        Self {
            model,
            temperature: 0.0,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Translation prompt naming the target language in English
    pub fn build_prompt(text: &str, target: TargetLanguage) -> String {
        format!("Translate the following English text to {}: {}", target.english_name(), text)
    }
}

#[async_trait]
impl Translator for PromptedTranslator {
    async fn translate(&self, text: &str, target: TargetLanguage) -> StageOutcome<String> {
        if text.trim().is_empty() {
            return StageOutcome::completed(String::new());
        }

        debug!("Translating {} characters to {} with {}", text.chars().count(), target, self.model.name());
        let prompt = Self::build_prompt(text, target);
        let result = self
            .model
            .generate(&prompt, self.temperature)
            .await
            .and_then(|answer| accept_translation(answer, self.model.name()));
        finish(result, target)
    }

    fn name(&self) -> &str {
        self.model.name()
    }
}

/// Translation through a machine-translation service with explicit codes
#[derive(Debug)]
pub struct DirectTranslator {
    service: Box<dyn MachineTranslation>,
    source_language: String,
}

impl DirectTranslator {
    pub fn new(service: Box<dyn MachineTranslation>, source_language: impl Into<String>) -> Self {
        Self {
            service,
            source_language: source_language.into(),
        }
    }
}

#[async_trait]
impl Translator for DirectTranslator {
    async fn translate(&self, text: &str, target: TargetLanguage) -> StageOutcome<String> {
        if text.trim().is_empty() {
            return StageOutcome::completed(String::new());
        }

        debug!(
            "Translating {} characters {} -> {} with {}",
            text.chars().count(),
            self.source_language,
            target,
            self.service.name()
        );
        let result = self
            .service
            .translate(text, &self.source_language, target.code())
            .await
            .and_then(|answer| accept_translation(answer, self.service.name()));
        finish(result, target)
    }

    fn name(&self) -> &str {
        self.service.name()
    }
}

/// Build the client for the configured LLM provider
pub fn language_model_from_config(config: &Config) -> Result<Box<dyn LanguageModel>, ProviderError> {
    let translation = &config.translation;
    let model = translation.get_model();
    let endpoint = translation.get_endpoint();
    let timeout_secs = translation.get_timeout_secs();

    let client: Box<dyn LanguageModel> = match translation.provider {
        TranslationProvider::Gemini => Box::new(Gemini::new(translation.get_api_key(), endpoint, model, timeout_secs)),
        TranslationProvider::Anthropic => {
            Box::new(Anthropic::new(translation.get_api_key(), endpoint, model, timeout_secs))
        }
        TranslationProvider::Ollama => {
            let (max_retries, backoff_ms) = translation
                .get_active_provider_config()
                .map(|p| (p.max_retries, p.retry_backoff_ms))
                .unwrap_or((0, 1000));
            Box::new(Ollama::new(&endpoint, model, timeout_secs, max_retries, backoff_ms)?)
        }
    };
    Ok(client)
}

/// Build the translator for the configured strategy
pub fn translator_from_config(config: &Config) -> Result<Box<dyn Translator>, ProviderError> {
    let translation = &config.translation;
    let translator: Box<dyn Translator> = match translation.strategy {
        TranslationStrategy::Llm => Box::new(
            PromptedTranslator::new(language_model_from_config(config)?).with_temperature(translation.temperature),
        ),
        TranslationStrategy::Direct => Box::new(DirectTranslator::new(
            Box::new(GoogleTranslate::new(
                translation.direct.api_key.clone(),
                translation.direct.endpoint.clone(),
                translation.direct.timeout_secs,
            )),
            config.source_language.clone(),
        )),
    };
    debug!("Using {} translation via {}", translation.strategy, translator.name());
    Ok(translator)
}
