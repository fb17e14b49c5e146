use async_trait::async_trait;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{SpeechBackend, error_from_response};

/// The translate_tts endpoint rejects longer inputs
pub const MAX_BATCH_CHARS: usize = 100;

/// Sentence terminators, including the Devanagari danda
static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?।॥]+\s+").expect("valid sentence regex"));

/// Client for the Google Translate text-to-speech endpoint
#[derive(Debug)]
pub struct GoogleTts {
    /// HTTP client for API requests
    client: Client,
    /// translate_tts URL
    endpoint: String,
}

impl GoogleTts {
    /// Create a new speech client
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .user_agent("Mozilla/5.0 (X11; Linux x86_64)")
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
        }
    }

    fn api_url(&self) -> &str {
        if self.endpoint.is_empty() {
            "https://translate.google.com/translate_tts"
        } else {
            &self.endpoint
        }
    }

    /// Fetch the MP3 for a single batch of at most `MAX_BATCH_CHARS` characters
    async fn synthesize_batch(
        &self,
        batch: &str,
        language: &str,
        slow: bool,
        index: usize,
        total: usize,
    ) -> Result<Vec<u8>, ProviderError> {
        let text_len = batch.chars().count().to_string();
        let index = index.to_string();
        let total = total.to_string();
        let speed = if slow { "0.24" } else { "1" };

        let response = self
            .client
            .get(self.api_url())
            .query(&[
                ("ie", "UTF-8"),
                ("q", batch),
                ("tl", language),
                ("total", total.as_str()),
                ("idx", index.as_str()),
                ("textlen", text_len.as_str()),
                ("client", "tw-ob"),
                ("ttsspeed", speed),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response("Google TTS", response).await);
        }

        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(ProviderError::EmptyResponse("Google TTS".to_string()));
        }
        Ok(audio.to_vec())
    }
}

#[async_trait]
impl SpeechBackend for GoogleTts {
    async fn synthesize(&self, text: &str, language: &str, slow: bool) -> Result<Vec<u8>, ProviderError> {
        let batches = split_into_batches(text, MAX_BATCH_CHARS);
        if batches.is_empty() {
            return Err(ProviderError::RequestFailed("No text to speak".to_string()));
        }
        debug!("Speaking {} characters in {} batch(es)", text.chars().count(), batches.len());

        // MP3 frames concatenate into a playable stream
        let mut merged_audio = Vec::new();
        for (index, batch) in batches.iter().enumerate() {
            let audio = self
                .synthesize_batch(batch, language, slow, index, batches.len())
                .await?;
            merged_audio.extend(audio);
        }

        Ok(merged_audio)
    }

    fn name(&self) -> &str {
        "Google TTS"
    }
}

/// Split text into batches of at most `max_chars` characters.
///
/// Sentence boundaries are preferred; sentences that are too long are cut at
/// word boundaries and words that are still too long are cut by characters.
/// Lengths are counted in characters, not bytes.
pub fn split_into_batches(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut batches = Vec::new();
    let mut current = String::new();

    for sentence in sentences(text) {
        if sentence.trim().chars().count() <= max_chars {
            push_unit(&mut batches, &mut current, sentence, max_chars);
            continue;
        }

        for word in sentence.split_whitespace() {
            if word.chars().count() <= max_chars {
                push_unit(&mut batches, &mut current, word, max_chars);
            } else {
                let chars: Vec<char> = word.chars().collect();
                for piece in chars.chunks(max_chars) {
                    push_unit(&mut batches, &mut current, &piece.iter().collect::<String>(), max_chars);
                }
            }
        }
    }

    if !current.is_empty() {
        batches.push(current);
    }
    batches
}

fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut last_end = 0;
    for mat in SENTENCE_END.find_iter(text) {
        out.push(&text[last_end..mat.end()]);
        last_end = mat.end();
    }
    if last_end < text.len() {
        out.push(&text[last_end..]);
    }
    out
}

fn push_unit(batches: &mut Vec<String>, current: &mut String, unit: &str, max_chars: usize) {
    let unit = unit.trim();
    if unit.is_empty() {
        return;
    }

    let current_len = current.chars().count();
    let needed = if current.is_empty() {
        unit.chars().count()
    } else {
        current_len + 1 + unit.chars().count()
    };

    if needed > max_chars && !current.is_empty() {
        batches.push(std::mem::take(current));
    }
    if !current.is_empty() {
        current.push(' ');
    }
    current.push_str(unit);
}
