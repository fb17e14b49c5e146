use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{SummarizationModel, SummaryLength, error_from_response};

/// Client for summarization models hosted on the Hugging Face inference API
#[derive(Debug)]
pub struct HuggingFace {
    /// HTTP client for API requests
    client: Client,
    /// Access token; anonymous requests are sent when empty
    api_key: String,
    /// Inference endpoint (defaults to the public API)
    endpoint: String,
    /// Model id, e.g. "facebook/bart-large-cnn"
    model: String,
}

/// Summarization request body
#[derive(Debug, Serialize)]
pub struct SummarizationRequest {
    /// Text to summarize
    inputs: String,
    /// Generation parameters
    parameters: SummarizationParameters,
}

/// Generation parameters for the summarization pipeline
#[derive(Debug, Serialize)]
pub struct SummarizationParameters {
    max_length: u32,
    min_length: u32,
    do_sample: bool,
}

/// One element of the summarization response array
#[derive(Debug, Deserialize)]
pub struct SummarizationOutput {
    pub summary_text: String,
}

impl SummarizationRequest {
    /// Create a deterministic (no sampling) request within `length`
    pub fn new(inputs: impl Into<String>, length: SummaryLength) -> Self {
        Self {
            inputs: inputs.into(),
            parameters: SummarizationParameters {
                max_length: length.max_length,
                min_length: length.min_length,
                do_sample: false,
            },
        }
    }
}

impl HuggingFace {
    /// Create a new inference client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    fn api_url(&self) -> String {
        let base = if self.endpoint.is_empty() {
            "https://api-inference.huggingface.co"
        } else {
            self.endpoint.trim_end_matches('/')
        };
        format!("{}/models/{}", base, self.model)
    }

    /// Run the summarization pipeline on a single input
    pub async fn complete(&self, request: &SummarizationRequest) -> Result<Vec<SummarizationOutput>, ProviderError> {
        let mut builder = self.client.post(self.api_url()).json(request);
        if !self.api_key.is_empty() {
            builder = builder.bearer_auth(&self.api_key);
        }

        let response = builder.send().await?;
        if !response.status().is_success() {
            return Err(error_from_response("Hugging Face", response).await);
        }

        let body = response.text().await?;
        Self::parse_outputs(&body)
    }

    /// Parse a response body; the API reports some failures as `{"error": ...}` with a 200
    pub fn parse_outputs(body: &str) -> Result<Vec<SummarizationOutput>, ProviderError> {
        if let Ok(outputs) = serde_json::from_str::<Vec<SummarizationOutput>>(body) {
            return Ok(outputs);
        }

        let value: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| ProviderError::ParseError(format!("Hugging Face: {}", e)))?;
        match value.get("error").and_then(|e| e.as_str()) {
            Some(message) => Err(ProviderError::ApiError {
                status_code: 200,
                message: message.to_string(),
            }),
            None => Err(ProviderError::ParseError(format!(
                "Hugging Face: unexpected response shape: {}",
                body.chars().take(200).collect::<String>()
            ))),
        }
    }
}

#[async_trait]
impl SummarizationModel for HuggingFace {
    async fn summarize(&self, text: &str, length: SummaryLength) -> Result<String, ProviderError> {
        let request = SummarizationRequest::new(text, length);
        let outputs = self.complete(&request).await?;
        debug!("{} returned {} summary candidate(s)", self.model, outputs.len());

        outputs
            .into_iter()
            .next()
            .map(|o| o.summary_text)
            .ok_or_else(|| ProviderError::EmptyResponse(format!("Hugging Face model {}", self.model)))
    }

    fn name(&self) -> &str {
        &self.model
    }
}
