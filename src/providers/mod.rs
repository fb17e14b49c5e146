/*!
 * Provider implementations for the remote services the pipeline calls.
 *
 * This module contains client implementations for:
 * - Gemini: Google generative language API (LLM prompting)
 * - Ollama: Local LLM server
 * - Anthropic: Anthropic messages API
 * - Hugging Face: hosted summarization models
 * - Google Translate: Cloud Translation v2 (direct machine translation)
 * - Google TTS: translate_tts speech endpoint
 *
 * Each capability is a trait so the pipeline stages can hold any backend
 * behind a `Box<dyn ...>`; `mock` provides test doubles for all of them.
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Free-form text generation from a prompt
///
/// Implemented by every LLM client. Used by the prompted translation
/// strategy and the prompted summarization backend.
#[async_trait]
pub trait LanguageModel: Send + Sync + Debug {
    /// Generate a completion for `prompt`
    ///
    /// # Arguments
    /// * `prompt` - The full user prompt
    /// * `temperature` - Sampling temperature; 0.0 requests deterministic output
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The generated text, untrimmed
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, ProviderError>;

    /// Human readable provider name for logs
    fn name(&self) -> &str;
}

/// Length bounds for one abstractive summary, in model tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryLength {
    pub min_length: u32,
    pub max_length: u32,
}

impl Default for SummaryLength {
    fn default() -> Self {
        Self {
            min_length: 50,
            max_length: 150,
        }
    }
}

/// Length-bounded abstractive summarization of a single chunk
#[async_trait]
pub trait SummarizationModel: Send + Sync + Debug {
    /// Summarize `text` deterministically within `length`
    async fn summarize(&self, text: &str, length: SummaryLength) -> Result<String, ProviderError>;

    /// Human readable model name for logs
    fn name(&self) -> &str;
}

/// End-to-end machine translation with explicit language codes
#[async_trait]
pub trait MachineTranslation: Send + Sync + Debug {
    /// Translate `text` from `source_language` to `target_language` (ISO 639-1 codes)
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError>;

    /// Human readable provider name for logs
    fn name(&self) -> &str;
}

/// Text-to-speech producing MP3 bytes
#[async_trait]
pub trait SpeechBackend: Send + Sync + Debug {
    /// Synthesize `text` spoken in `language` (ISO 639-1 code)
    ///
    /// # Arguments
    /// * `slow` - Use the slow speaking rate instead of the normal one
    async fn synthesize(&self, text: &str, language: &str, slow: bool) -> Result<Vec<u8>, ProviderError>;

    /// Human readable provider name for logs
    fn name(&self) -> &str;
}

/// Map a non-success HTTP response to a `ProviderError`
pub(crate) async fn error_from_response(provider: &str, response: reqwest::Response) -> ProviderError {
    let status = response.status();
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to get error response text".to_string());
    log::error!("{} API error ({}): {}", provider, status, error_text);

    match status.as_u16() {
        401 | 403 => ProviderError::AuthenticationError(format!("{}: {}", provider, error_text)),
        code => ProviderError::ApiError {
            status_code: code,
            message: error_text,
        },
    }
}

pub mod anthropic;
pub mod gemini;
pub mod google_translate;
pub mod google_tts;
pub mod huggingface;
pub mod mock;
pub mod ollama;
