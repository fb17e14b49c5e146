use anyhow::{anyhow, Context, Result};
use log::{warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::language_utils::TargetLanguage;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Language of the uploaded documents (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Language the summary is translated to and spoken in
    #[serde(default)]
    pub target_language: TargetLanguage,

    /// Summarization config
    #[serde(default)]
    pub summarization: SummarizationConfig,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Speech synthesis config
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Summarization model backend
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SummarizationBackend {
    /// Hosted abstractive summarization model (BART by default)
    #[default]
    HuggingFace,
    /// The active translation LLM, prompted to summarize
    Llm,
}

/// Summarization settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SummarizationConfig {
    #[serde(default)]
    pub backend: SummarizationBackend,

    /// Model identifier on the inference service
    #[serde(default = "default_summarization_model")]
    pub model: String,

    /// Inference service URL
    #[serde(default = "default_huggingface_endpoint")]
    pub endpoint: String,

    /// API token for the inference service
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Words per chunk sent to the model
    #[serde(default = "default_chunk_max_tokens")]
    pub max_tokens: usize,

    /// Lower bound for each chunk summary, in tokens
    #[serde(default = "default_summary_min_length")]
    pub min_length: u32,

    /// Upper bound for each chunk summary, in tokens
    #[serde(default = "default_summary_max_length")]
    pub max_length: u32,

    /// Request timeout in seconds
    #[serde(default = "default_summarization_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SummarizationConfig {
    fn default() -> Self {
        Self {
            backend: SummarizationBackend::default(),
            model: default_summarization_model(),
            endpoint: default_huggingface_endpoint(),
            api_key: String::new(),
            max_tokens: default_chunk_max_tokens(),
            min_length: default_summary_min_length(),
            max_length: default_summary_max_length(),
            timeout_secs: default_summarization_timeout_secs(),
        }
    }
}

/// How the summary is translated
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationStrategy {
    /// A general-purpose LLM is prompted to translate
    #[default]
    Llm,
    /// A dedicated machine-translation service
    Direct,
}

impl std::fmt::Display for TranslationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Llm => write!(f, "llm"),
            Self::Direct => write!(f, "direct"),
        }
    }
}

/// LLM provider used by the prompted strategies
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google Gemini
    #[default]
    Gemini,
    // @provider: Ollama
    Ollama,
    // @provider: Anthropic
    Anthropic,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Gemini => "Gemini",
            Self::Ollama => "Ollama",
            Self::Anthropic => "Anthropic",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Gemini => "gemini".to_string(),
            Self::Ollama => "ollama".to_string(),
            Self::Anthropic => "anthropic".to_string(),
        }
    }

    /// Whether the provider refuses requests without an API key
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Self::Ollama)
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            "anthropic" => Ok(Self::Anthropic),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Retries after a failed request (Ollama only)
    #[serde(default)]
    pub max_retries: u32,

    // @field: Base backoff between retries, doubled each attempt
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        let (model, endpoint) = match provider_type {
            TranslationProvider::Gemini => (default_gemini_model(), default_gemini_endpoint()),
            TranslationProvider::Ollama => (default_ollama_model(), default_ollama_endpoint()),
            TranslationProvider::Anthropic => (default_anthropic_model(), default_anthropic_endpoint()),
        };
        Self {
            provider_type: provider_type.to_lowercase_string(),
            model,
            api_key: String::new(),
            endpoint,
            timeout_secs: default_timeout_secs(),
            max_retries: 0,
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Settings for the direct machine-translation strategy
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DirectTranslationConfig {
    /// Cloud Translation API key
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service endpoint URL
    #[serde(default = "default_google_translate_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DirectTranslationConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_google_translate_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Prompted LLM or direct machine translation
    #[serde(default)]
    pub strategy: TranslationStrategy,

    /// LLM provider for the prompted strategy
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available LLM providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Direct machine-translation settings
    #[serde(default)]
    pub direct: DirectTranslationConfig,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

/// Speech synthesis settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpeechConfig {
    /// translate_tts URL
    #[serde(default = "default_tts_endpoint")]
    pub endpoint: String,

    /// Speak at the slow rate
    #[serde(default)]
    pub slow: bool,

    /// Request timeout in seconds, per batch
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            endpoint: default_tts_endpoint(),
            slow: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_summarization_timeout_secs() -> u64 {
    120 // cold model loads on the inference API are slow
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_temperature() -> f32 {
    0.0
}

fn default_chunk_max_tokens() -> usize {
    crate::chunking::DEFAULT_MAX_TOKENS
}

fn default_summary_min_length() -> u32 {
    50
}

fn default_summary_max_length() -> u32 {
    150
}

fn default_summarization_model() -> String {
    "facebook/bart-large-cnn".to_string()
}

fn default_huggingface_endpoint() -> String {
    "https://api-inference.huggingface.co".to_string()
}

fn default_gemini_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_anthropic_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_google_translate_endpoint() -> String {
    "https://translation.googleapis.com".to_string()
}

fn default_tts_endpoint() -> String {
    "https://translate.google.com/translate_tts".to_string()
}

fn default_gemini_model() -> String {
    "gemini-1.5-pro".to_string()
}

fn default_ollama_model() -> String {
    "llama3".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-haiku-20240307".to_string()
}

impl Config {
    /// Load the configuration from `path`, writing a default one first when
    /// the file does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path).with_context(|| format!("Failed to open config file: {:?}", path))?;
            let reader = BufReader::new(file);
            return serde_json::from_reader(reader).with_context(|| format!("Failed to parse config file: {:?}", path));
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json).with_context(|| format!("Failed to write config to file: {:?}", path))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let _source_name = crate::language_utils::get_language_name(&self.source_language)?;

        let summarization = &self.summarization;
        if summarization.max_tokens == 0 {
            return Err(anyhow!("Summarization chunk size must be at least one word"));
        }
        if summarization.min_length > summarization.max_length {
            return Err(anyhow!(
                "Summary min_length ({}) exceeds max_length ({})",
                summarization.min_length,
                summarization.max_length
            ));
        }
        if summarization.backend == SummarizationBackend::HuggingFace && summarization.api_key.is_empty() {
            warn!("No Hugging Face API token configured; anonymous requests are heavily rate limited");
        }

        let uses_llm = self.translation.strategy == TranslationStrategy::Llm
            || summarization.backend == SummarizationBackend::Llm;
        if uses_llm && self.translation.provider.requires_api_key() && self.translation.get_api_key().is_empty() {
            return Err(anyhow!(
                "API key is required for {} provider",
                self.translation.provider.display_name()
            ));
        }

        if self.translation.strategy == TranslationStrategy::Direct && self.translation.direct.api_key.is_empty() {
            return Err(anyhow!("API key is required for direct translation"));
        }

        if !(0.0..=2.0).contains(&self.translation.temperature) {
            return Err(anyhow!("Temperature must be between 0.0 and 2.0"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: TargetLanguage::default(),
            summarization: SummarizationConfig::default(),
            translation: TranslationConfig::default(),
            speech: SpeechConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter().find(|p| p.provider_type == provider_str)
    }

    /// Mutable access to the active provider configuration, created with
    /// defaults when missing
    pub fn active_provider_config_mut(&mut self) -> &mut ProviderConfig {
        let provider_str = self.provider.to_lowercase_string();
        match self.available_providers.iter().position(|p| p.provider_type == provider_str) {
            Some(index) => &mut self.available_providers[index],
            None => {
                self.available_providers.push(ProviderConfig::new(self.provider.clone()));
                let last = self.available_providers.len() - 1;
                &mut self.available_providers[last]
            }
        }
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        match self.provider {
            TranslationProvider::Gemini => default_gemini_model(),
            TranslationProvider::Ollama => default_ollama_model(),
            TranslationProvider::Anthropic => default_anthropic_model(),
        }
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.api_key.clone())
            .unwrap_or_default()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        match self.provider {
            TranslationProvider::Gemini => default_gemini_endpoint(),
            TranslationProvider::Ollama => default_ollama_endpoint(),
            TranslationProvider::Anthropic => default_anthropic_endpoint(),
        }
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        self.get_active_provider_config()
            .map(|p| p.timeout_secs)
            .unwrap_or_else(default_timeout_secs)
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            strategy: TranslationStrategy::default(),
            provider: TranslationProvider::default(),
            available_providers: vec![
                ProviderConfig::new(TranslationProvider::Gemini),
                ProviderConfig::new(TranslationProvider::Ollama),
                ProviderConfig::new(TranslationProvider::Anthropic),
            ],
            direct: DirectTranslationConfig::default(),
            temperature: default_temperature(),
        }
    }
}
