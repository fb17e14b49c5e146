/*!
 * Pipeline orchestrator.
 *
 * Owns one instance of every stage and runs a document through them:
 * `Idle → Extracting → (Aborted) → Summarizing → Translating →
 * Synthesizing → Done`. Each stage is attempted exactly once.
 */

use log::{info, warn};
use std::fmt;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::errors::{ProviderError, StageError};
use crate::extraction::{Document, Extractor};
use crate::language_utils::TargetLanguage;
use crate::speech::{AudioArtifact, SpeechSynthesizer};
use crate::summarization::Summarizer;
use crate::translation::{Translator, translator_from_config};

use super::outcome::StageOutcome;
use super::reporter::PipelineReporter;

/// Stages of the pipeline, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Extraction,
    Summarization,
    Translation,
    Synthesis,
}

impl Stage {
    /// Progress message shown while the stage runs
    pub fn description(&self) -> &'static str {
        match self {
            Self::Extraction => "Extracting text from document",
            Self::Summarization => "Summarizing text",
            Self::Translation => "Translating summary",
            Self::Synthesis => "Generating speech",
        }
    }

    /// State the pipeline is in while the stage runs
    pub fn state(&self) -> PipelineState {
        match self {
            Self::Extraction => PipelineState::Extracting,
            Self::Summarization => PipelineState::Summarizing,
            Self::Translation => PipelineState::Translating,
            Self::Synthesis => PipelineState::Synthesizing,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Extraction => "Extraction",
            Self::Summarization => "Summarization",
            Self::Translation => "Translation",
            Self::Synthesis => "Synthesis",
        };
        write!(f, "{}", name)
    }
}

/// Position of a pipeline run in its state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    Extracting,
    /// Terminal: extraction produced no text
    Aborted,
    Summarizing,
    Translating,
    Synthesizing,
    /// Terminal: every stage ran, audio may be absent
    Done,
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Aborted | Self::Done)
    }
}

/// Everything a pipeline run produced
#[derive(Debug)]
pub struct PipelineReport {
    /// Terminal state reached
    pub state: PipelineState,

    /// Every state entered, in order, starting with `Idle`
    pub transitions: Vec<PipelineState>,

    /// Characters of extracted text
    pub extracted_chars: usize,

    /// Summary, or the unsummarized text when summarization failed
    pub summary: Option<String>,

    /// Translated summary or the failure sentinel
    pub translation: Option<String>,

    /// Spoken translation
    pub audio: Option<AudioArtifact>,

    /// Errors stages recovered from, in stage order
    pub diagnostics: Vec<(Stage, StageError)>,

    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl PipelineReport {
    fn new() -> Self {
        Self {
            state: PipelineState::Idle,
            transitions: vec![PipelineState::Idle],
            extracted_chars: 0,
            summary: None,
            translation: None,
            audio: None,
            diagnostics: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    fn enter(&mut self, state: PipelineState) {
        self.state = state;
        self.transitions.push(state);
    }

    pub fn is_aborted(&self) -> bool {
        self.state == PipelineState::Aborted
    }

    /// Whether any stage fell back to a degraded value
    pub fn is_degraded(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Diagnostic reported by `stage`, if any
    pub fn diagnostic(&self, stage: Stage) -> Option<&StageError> {
        self.diagnostics.iter().find(|(s, _)| *s == stage).map(|(_, e)| e)
    }

    /// One-line description of the run
    pub fn summary_line(&self) -> String {
        let mut parts = vec![format!("{:?} in {:.2}s", self.state, self.duration.as_secs_f32())];

        if self.extracted_chars > 0 {
            parts.push(format!("Extracted: {} chars", self.extracted_chars));
        }
        if let Some(ref audio) = self.audio {
            parts.push(format!("Audio: {} bytes", audio.len()));
        }
        if self.is_degraded() {
            let stages: Vec<String> = self.diagnostics.iter().map(|(s, _)| s.to_string()).collect();
            parts.push(format!("Degraded: {}", stages.join(", ")));
        }

        parts.join(" | ")
    }
}

/// The document-to-speech pipeline
#[derive(Debug)]
pub struct Pipeline {
    extractor: Extractor,
    summarizer: Summarizer,
    translator: Box<dyn Translator>,
    synthesizer: SpeechSynthesizer,
}

impl Pipeline {
    pub fn new(
        extractor: Extractor,
        summarizer: Summarizer,
        translator: Box<dyn Translator>,
        synthesizer: SpeechSynthesizer,
    ) -> Self {
        Self {
            extractor,
            summarizer,
            translator,
            synthesizer,
        }
    }

    /// Build every stage from `config`
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        Ok(Self::new(
            Extractor::with_default_backend(),
            Summarizer::from_config(config)?,
            translator_from_config(config)?,
            SpeechSynthesizer::from_config(config),
        ))
    }

    /// Run `document` through every stage for `target`
    pub async fn run(
        &self,
        document: Document,
        target: TargetLanguage,
        reporter: &dyn PipelineReporter,
    ) -> PipelineReport {
        let start_time = Instant::now();
        let mut report = PipelineReport::new();
        info!("Processing {} into {}", document.name(), target.english_name());

        let text = Self::record(&mut report, reporter, Stage::Extraction, || {
            self.extractor.extract(document)
        });
        if text.is_empty() {
            warn!("No text extracted, aborting");
            report.enter(PipelineState::Aborted);
            report.duration = start_time.elapsed();
            return report;
        }
        report.extracted_chars = text.chars().count();

        Self::begin(&mut report, reporter, Stage::Summarization);
        let outcome = self.summarizer.summarize(&text).await;
        let summary = Self::finish(&mut report, reporter, Stage::Summarization, outcome);
        report.summary = Some(summary.clone());

        Self::begin(&mut report, reporter, Stage::Translation);
        let outcome = self.translator.translate(&summary, target).await;
        let translation = Self::finish(&mut report, reporter, Stage::Translation, outcome);
        report.translation = Some(translation.clone());

        Self::begin(&mut report, reporter, Stage::Synthesis);
        let outcome = self.synthesizer.synthesize(&translation, target).await;
        report.audio = Self::finish(&mut report, reporter, Stage::Synthesis, outcome);

        report.enter(PipelineState::Done);
        report.duration = start_time.elapsed();
        info!("Pipeline finished: {}", report.summary_line());
        report
    }

    fn begin(report: &mut PipelineReport, reporter: &dyn PipelineReporter, stage: Stage) {
        report.enter(stage.state());
        reporter.on_stage_start(stage);
    }

    fn finish<T>(
        report: &mut PipelineReport,
        reporter: &dyn PipelineReporter,
        stage: Stage,
        outcome: StageOutcome<T>,
    ) -> T {
        let (value, error) = outcome.into_parts();
        if let Some(error) = error {
            reporter.on_error(stage, &error);
            report.diagnostics.push((stage, error));
        }
        reporter.on_stage_complete(stage);
        value
    }

    fn record<T>(
        report: &mut PipelineReport,
        reporter: &dyn PipelineReporter,
        stage: Stage,
        run: impl FnOnce() -> StageOutcome<T>,
    ) -> T {
        Self::begin(report, reporter, stage);
        let outcome = run();
        Self::finish(report, reporter, stage, outcome)
    }
}
