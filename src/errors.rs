/*!
 * Error types for the eduspeak application.
 *
 * Provider and extraction failures are ordinary `Result` errors. Pipeline
 * stages never propagate them: they fold them into a `StageError` carried
 * next to a fallback value (see `pipeline::StageOutcome`).
 */

use thiserror::Error;

/// Errors that can occur when working with remote model/translation/speech APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The API answered successfully but without usable content
    #[error("Empty response from {0}")]
    EmptyResponse(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors raised while turning a document into text
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The document could not be opened or decoded
    #[error("failed to open document: {0}")]
    Open(String),

    /// A page could not be converted to text
    #[error("failed to extract text: {0}")]
    Extraction(String),

    /// The document has no pages
    #[error("document has no pages")]
    NoPages,

    /// The document was readable but contained no text
    #[error("document contains no extractable text")]
    NoText,

    /// No PDF backend was compiled into this build
    #[error("PDF support is not available in this build")]
    Unsupported,
}

/// A diagnostic reported by a pipeline stage that recovered from a failure
#[derive(Error, Debug)]
pub enum StageError {
    /// Document unreadable or empty; ends the pipeline
    #[error("Error extracting text: {0}")]
    Extraction(#[from] ExtractionError),

    /// Summarization model failed; text passed through unsummarized
    #[error("Error summarizing text: {0}")]
    Summarization(ProviderError),

    /// Translation provider failed or answered empty; sentinel returned
    #[error("Error translating text: {0}")]
    Translation(ProviderError),

    /// Audio generation failed; no audio produced
    #[error("Error generating speech: {0}")]
    Synthesis(String),
}
