/*!
 * Chunked abstractive summarization.
 *
 * The text is cut into word-bounded chunks (see `chunking`), each chunk is
 * summarized on its own, in order, and the chunk summaries are joined with
 * single spaces. Chunks share no context. If any chunk fails, the whole
 * stage falls back to the unsummarized text.
 */

use async_trait::async_trait;
use log::{debug, error, info};

use crate::app_config::{Config, SummarizationBackend};
use crate::chunking::{DEFAULT_MAX_TOKENS, chunk_text};
use crate::errors::{ProviderError, StageError};
use crate::pipeline::StageOutcome;
use crate::providers::huggingface::HuggingFace;
use crate::providers::{LanguageModel, SummarizationModel, SummaryLength};
use crate::translation::language_model_from_config;

/// Summarizes arbitrarily long text through a length-limited model
#[derive(Debug)]
pub struct Summarizer {
    model: Box<dyn SummarizationModel>,
    max_tokens: usize,
    length: SummaryLength,
}

impl Summarizer {
    /// Summarizer with the default chunk size and summary bounds
    pub fn new(model: Box<dyn SummarizationModel>) -> Self {
        Self {
            model,
            max_tokens: DEFAULT_MAX_TOKENS,
            length: SummaryLength::default(),
        }
    }

    /// Set the number of words per chunk
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens.max(1);
        self
    }

    /// Set the per-chunk summary bounds
    pub fn with_length(mut self, length: SummaryLength) -> Self {
        self.length = length;
        self
    }

    /// Build the summarizer described by `config`
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let settings = &config.summarization;
        let model: Box<dyn SummarizationModel> = match settings.backend {
            SummarizationBackend::HuggingFace => Box::new(HuggingFace::new(
                settings.api_key.clone(),
                settings.endpoint.clone(),
                settings.model.clone(),
                settings.timeout_secs,
            )),
            SummarizationBackend::Llm => Box::new(PromptedSummarizer::new(language_model_from_config(config)?)),
        };

        Ok(Self::new(model)
            .with_max_tokens(settings.max_tokens)
            .with_length(SummaryLength {
                min_length: settings.min_length,
                max_length: settings.max_length,
            }))
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Summarize `text`.
    ///
    /// Whitespace-only text summarizes to the empty string without a model
    /// call. On any model failure the original text is returned unchanged
    /// together with the error.
    pub async fn summarize(&self, text: &str) -> StageOutcome<String> {
        if text.trim().is_empty() {
            return StageOutcome::completed(String::new());
        }

        let chunks = chunk_text(text, self.max_tokens);
        debug!(
            "Summarizing {} chunk(s) of up to {} words with {}",
            chunks.len(),
            self.max_tokens,
            self.model.name()
        );

        let mut summaries = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            match self.model.summarize(&chunk.text, self.length).await {
                Ok(summary) => summaries.push(summary.trim().to_string()),
                Err(e) => {
                    error!("Error summarizing text (chunk {}/{}): {}", chunk.index + 1, chunks.len(), e);
                    return StageOutcome::degraded(text.to_string(), StageError::Summarization(e));
                }
            }
        }

        let summary = summaries.join(" ");
        info!(
            "Summarized {} chunk(s) into {} characters",
            chunks.len(),
            summary.chars().count()
        );
        StageOutcome::completed(summary)
    }
}

/// Summarization through a general-purpose language model
#[derive(Debug)]
pub struct PromptedSummarizer {
    model: Box<dyn LanguageModel>,
}

impl PromptedSummarizer {
    pub fn new(model: Box<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Prompt asking for a summary within the given word bounds
    pub fn build_prompt(text: &str, length: SummaryLength) -> String {
        format!(
            "Summarize the following text in {} to {} words. Reply with the summary only.\n\n{}",
            length.min_length, length.max_length, text
        )
    }
}

#[async_trait]
impl SummarizationModel for PromptedSummarizer {
    async fn summarize(&self, text: &str, length: SummaryLength) -> Result<String, ProviderError> {
        let summary = self.model.generate(&Self::build_prompt(text, length), 0.0).await?;
        let summary = summary.trim();
        if summary.is_empty() {
            return Err(ProviderError::EmptyResponse(self.model.name().to_string()));
        }
        Ok(summary.to_string())
    }

    fn name(&self) -> &str {
        self.model.name()
    }
}
