/*!
 * # EduSpeak - spoken summaries of documents
 *
 * A Rust library that turns a PDF into a short spoken summary in an Indian
 * regional language.
 *
 * ## Features
 *
 * - Extract the text of PDF documents (MuPDF)
 * - Summarize long text chunk by chunk with a length-bounded model
 * - Translate the summary into Tamil, Kannada, Hindi, Telugu or Malayalam:
 *   - by prompting an LLM (Gemini, Ollama, Anthropic)
 *   - or with Google Cloud Translation
 * - Speak the translation as MP3
 * - Keep going when a stage fails: every stage substitutes a fallback value
 *   and reports what went wrong
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `extraction`: PDF to text
 * - `chunking`: Word-bounded text chunking
 * - `summarization`: Chunked summarization
 * - `translation`: Translation strategies
 * - `speech`: Speech synthesis and the audio artifact
 * - `pipeline`: Stage sequencing, outcomes and progress reporting
 * - `app_controller`: File and folder processing for the CLI
 * - `file_utils`: File system operations
 * - `language_utils`: Supported target languages
 * - `providers`: Clients for the remote services
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![cfg_attr(test, allow(non_snake_case))]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod chunking;
pub mod errors;
pub mod extraction;
pub mod file_utils;
pub mod language_utils;
pub mod pipeline;
pub mod providers;
pub mod speech;
pub mod summarization;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use chunking::{TextChunk, chunk_text};
pub use errors::{ExtractionError, ProviderError, StageError};
pub use extraction::{Document, Extractor};
pub use language_utils::TargetLanguage;
pub use pipeline::{Pipeline, PipelineReport, PipelineReporter, PipelineState, StageOutcome};
pub use speech::AudioArtifact;
pub use translation::{TRANSLATION_FAILED, Translator};
