use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{MachineTranslation, error_from_response};

/// Client for the Google Cloud Translation v2 REST API
#[derive(Debug)]
pub struct GoogleTranslate {
    /// HTTP client for API requests
    client: Client,
    /// API key, sent as the `key` query parameter
    api_key: String,
    /// API endpoint URL (defaults to the public API)
    endpoint: String,
}

/// translate request body
#[derive(Debug, Serialize)]
pub struct TranslateRequest<'a> {
    q: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    target: &'a str,
    format: &'static str,
}

/// translate response body
#[derive(Debug, Deserialize)]
pub struct TranslateResponse {
    pub data: TranslateData,
}

#[derive(Debug, Deserialize)]
pub struct TranslateData {
    #[serde(default)]
    pub translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub translated_text: String,
    #[serde(default)]
    pub detected_source_language: Option<String>,
}

impl<'a> TranslateRequest<'a> {
    /// Plain-text request; an empty source lets the service detect it
    pub fn new(text: &'a str, source_language: &'a str, target_language: &'a str) -> Self {
        Self {
            q: text,
            source: Some(source_language).filter(|s| !s.is_empty()),
            target: target_language,
            format: "text",
        }
    }
}

impl GoogleTranslate {
    /// Create a new Cloud Translation client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    fn api_url(&self) -> String {
        let base = if self.endpoint.is_empty() {
            "https://translation.googleapis.com"
        } else {
            self.endpoint.trim_end_matches('/')
        };
        format!("{}/language/translate/v2", base)
    }

    /// Send a translate request
    pub async fn complete(&self, request: &TranslateRequest<'_>) -> Result<TranslateResponse, ProviderError> {
        let response = self
            .client
            .post(self.api_url())
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response("Google Translate", response).await);
        }

        response
            .json::<TranslateResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Google Translate: {}", e)))
    }

    /// Extract the first translation from a response
    pub fn extract_text(response: &TranslateResponse) -> String {
        response
            .data
            .translations
            .first()
            .map(|t| t.translated_text.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl MachineTranslation for GoogleTranslate {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let request = TranslateRequest::new(text, source_language, target_language);
        let response = self.complete(&request).await?;
        Ok(Self::extract_text(&response))
    }

    fn name(&self) -> &str {
        "Google Translate"
    }
}
