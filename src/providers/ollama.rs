use async_trait::async_trait;
use log::{error, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::errors::ProviderError;
use crate::providers::{LanguageModel, error_from_response};

/// Ollama client for interacting with a local Ollama server
#[derive(Debug)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Model used by `LanguageModel::generate`
    model: String,
    /// Maximum number of retry attempts on network and server errors
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

/// Generation options for the Ollama API
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation (default: 0.8)
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Model name
    #[serde(default)]
    pub model: String,
    /// Generated text
    pub response: String,
    /// Whether the generation is complete
    #[serde(default)]
    pub done: bool,
    /// Number of prompt tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u64>,
    /// Number of generated tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u64>,
}

impl GenerationRequest {
    /// Create a new non-streaming generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            options: None,
            stream: Some(false),
        }
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options.get_or_insert_with(GenerationOptions::default).temperature = Some(temperature);
        self
    }
}

/// Build `scheme://host:port` from an endpoint that may lack scheme or port
pub fn normalize_base_url(endpoint: &str, default_port: u16) -> Result<String, ProviderError> {
    let with_scheme = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("http://{}", endpoint)
    };

    let url = Url::parse(&with_scheme)
        .map_err(|e| ProviderError::RequestFailed(format!("Invalid Ollama endpoint {}: {}", endpoint, e)))?;
    let host = url
        .host_str()
        .ok_or_else(|| ProviderError::RequestFailed(format!("Invalid host in endpoint: {}", endpoint)))?;
    let port = url.port().unwrap_or(default_port);

    Ok(format!("{}://{}:{}", url.scheme(), host, port))
}

/// Longest wait between two attempts
const MAX_BACKOFF_MS: u64 = 60_000;

/// Exponential backoff for retry `attempt` (1-based), capped at one minute
pub fn backoff_delay_ms(base_ms: u64, attempt: u32) -> u64 {
    let factor = 1u64.checked_shl(attempt.saturating_sub(1)).unwrap_or(u64::MAX);
    base_ms.saturating_mul(factor).min(MAX_BACKOFF_MS)
}

impl Ollama {
    /// Default Ollama port
    pub const DEFAULT_PORT: u16 = 11434;

    /// Create a new Ollama client
    pub fn new(
        endpoint: &str,
        model: impl Into<String>,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            base_url: normalize_base_url(endpoint, Self::DEFAULT_PORT)?,
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                // Ollama speaks HTTP/1.1
                .http1_only()
                .build()
                .unwrap_or_default(),
            model: model.into(),
            max_retries,
            backoff_base_ms,
        })
    }

    /// Generate text from the Ollama API with retry logic
    pub async fn generate_with(&self, request: &GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);
        let mut attempt = 0;

        loop {
            let error = match self.client.post(&url).json(request).send().await {
                Ok(response) if response.status().is_success() => {
                    let body = response.text().await?;
                    return Self::parse_generation(&body);
                }
                Ok(response) if response.status().is_server_error() => {
                    error_from_response("Ollama", response).await
                }
                // Client errors are not retried
                Ok(response) => return Err(error_from_response("Ollama", response).await),
                Err(e) => ProviderError::from(e),
            };

            attempt += 1;
            if attempt > self.max_retries {
                return Err(error);
            }

            warn!("Ollama request failed: {} - attempt {}/{}", error, attempt, self.max_retries + 1);
            tokio::time::sleep(Duration::from_millis(backoff_delay_ms(self.backoff_base_ms, attempt))).await;
        }
    }

    /// Parse a generation body, accepting both a single object and JSONL stream chunks
    pub fn parse_generation(body: &str) -> Result<GenerationResponse, ProviderError> {
        if let Ok(response) = serde_json::from_str::<GenerationResponse>(body) {
            return Ok(response);
        }

        let chunks: Vec<GenerationResponse> = body
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect();

        if chunks.is_empty() {
            let preview: String = body.chars().take(500).collect();
            error!("Failed to parse Ollama API response. Raw response (first 500 chars): {}", preview);
            return Err(ProviderError::ParseError("Ollama response contains invalid JSON".to_string()));
        }

        let response = chunks.iter().map(|c| c.response.as_str()).collect::<String>();
        let last = chunks.last();
        Ok(GenerationResponse {
            model: last.map(|c| c.model.clone()).unwrap_or_default(),
            response,
            done: true,
            prompt_eval_count: last.and_then(|c| c.prompt_eval_count),
            eval_count: last.and_then(|c| c.eval_count),
        })
    }
}

#[async_trait]
impl LanguageModel for Ollama {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, ProviderError> {
        let request = GenerationRequest::new(&self.model, prompt).temperature(temperature);
        Ok(self.generate_with(&request).await?.response)
    }

    fn name(&self) -> &str {
        "Ollama"
    }
}
