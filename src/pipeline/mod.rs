/*!
 * Document-to-speech pipeline.
 *
 * The pipeline runs its stages strictly in order:
 * 1. **Extraction**: PDF bytes to plain text
 * 2. **Summarization**: chunked abstractive summary
 * 3. **Translation**: summary rendered in the target language
 * 4. **Synthesis**: translated text spoken as MP3
 *
 * A failing stage degrades to a fallback value and the run continues; only
 * extraction producing no text aborts it.
 */

pub mod orchestrator;
pub mod outcome;
pub mod reporter;

pub use orchestrator::{Pipeline, PipelineReport, PipelineState, Stage};
pub use outcome::StageOutcome;
pub use reporter::{NoopReporter, PipelineReporter};
