/*!
 * Mock provider implementations for testing.
 *
 * `MockProvider` implements every provider capability so pipeline stages
 * can be exercised without network access:
 * - `MockProvider::working()` - Always succeeds with deterministic output
 * - `MockProvider::intermittent(n)` - Fails every nth request
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::empty()` - Succeeds with empty output
 */

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::{LanguageModel, MachineTranslation, SpeechBackend, SummarizationModel, SummaryLength};

/// Leading bytes of every mock audio payload (an ID3 tag header)
pub const MOCK_AUDIO_HEADER: &[u8] = b"ID3";

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Returns empty output
    Empty,
}

/// Mock provider for testing stage behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Custom text generator for successful calls (optional)
    custom_response: Option<fn(&str) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            custom_response: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that returns empty output
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Set a custom text generator, applied to the call input
    pub fn with_custom_response(mut self, generator: fn(&str) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of calls made so far, across all capabilities and clones
    pub fn call_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Count the call and decide its fate; `Ok(None)` means "answer empty"
    fn next_call(&self, default: impl FnOnce() -> String) -> Result<Option<String>, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated provider failure".to_string(),
            }),
            MockBehavior::Intermittent { fail_every } if fail_every > 0 && count % fail_every == fail_every - 1 => {
                Err(ProviderError::ApiError {
                    status_code: 503,
                    message: format!("Simulated intermittent failure (request #{})", count + 1),
                })
            }
            MockBehavior::Empty => Ok(None),
            MockBehavior::Working | MockBehavior::Intermittent { .. } => Ok(Some(default())),
        }
    }

    fn respond(&self, input: &str, default: impl FnOnce() -> String) -> Result<String, ProviderError> {
        let custom = self.custom_response;
        let text = self.next_call(|| match custom {
            Some(generator) => generator(input),
            None => default(),
        })?;
        Ok(text.unwrap_or_default())
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl LanguageModel for MockProvider {
    async fn generate(&self, prompt: &str, _temperature: f32) -> Result<String, ProviderError> {
        self.respond(prompt, || format!("[GENERATED] {}", prompt))
    }

    fn name(&self) -> &str {
        "Mock"
    }
}

#[async_trait]
impl SummarizationModel for MockProvider {
    async fn summarize(&self, text: &str, length: SummaryLength) -> Result<String, ProviderError> {
        self.respond(text, || {
            let words: Vec<&str> = text.split_whitespace().take(length.max_length as usize).take(5).collect();
            format!("[SUMMARY] {}", words.join(" "))
        })
    }

    fn name(&self) -> &str {
        "Mock"
    }
}

#[async_trait]
impl MachineTranslation for MockProvider {
    async fn translate(
        &self,
        text: &str,
        _source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        self.respond(text, || format!("[TRANSLATED to {}] {}", target_language, text))
    }

    fn name(&self) -> &str {
        "Mock"
    }
}

#[async_trait]
impl SpeechBackend for MockProvider {
    async fn synthesize(&self, text: &str, language: &str, _slow: bool) -> Result<Vec<u8>, ProviderError> {
        let payload = self.respond(text, || format!("{}:{}", language, text))?;
        if payload.is_empty() {
            return Ok(Vec::new());
        }
        let mut audio = MOCK_AUDIO_HEADER.to_vec();
        audio.extend_from_slice(payload.as_bytes());
        Ok(audio)
    }

    fn name(&self) -> &str {
        "Mock"
    }
}
