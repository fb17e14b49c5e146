/*!
 * End-to-end pipeline scenarios with mock providers
 */

use std::sync::Mutex;

use eduspeak::errors::{ExtractionError, StageError};
use eduspeak::extraction::Document;
use eduspeak::language_utils::TargetLanguage;
use eduspeak::pipeline::{NoopReporter, PipelineReporter, PipelineState, Stage};
use eduspeak::providers::mock::{MOCK_AUDIO_HEADER, MockProvider};
use eduspeak::translation::TRANSLATION_FAILED;

use crate::common::{self, FakePdf, MockStages, UnreadablePdf, numbered_words};

/// Reporter recording every event as text
#[derive(Default)]
struct RecordingReporter {
    events: Mutex<Vec<String>>,
}

impl RecordingReporter {
    fn events(&self) -> Vec<String> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    fn push(&self, event: String) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl PipelineReporter for RecordingReporter {
    fn on_stage_start(&self, stage: Stage) {
        self.push(format!("start {}", stage));
    }

    fn on_stage_complete(&self, stage: Stage) {
        self.push(format!("complete {}", stage));
    }

    fn on_error(&self, stage: Stage, _error: &StageError) {
        self.push(format!("error {}", stage));
    }
}

fn document() -> Document {
    Document::from_bytes("lecture.pdf", b"%PDF-1.7".to_vec())
}

/// Scenario A: ten words make one chunk, so one summarization call
#[tokio::test]
async fn test_pipeline_withTenWordDocument_shouldSummarizeSingleChunk() {
    common::init_logger();
    let stages = MockStages::working();
    let text = numbered_words(10);
    let pipeline = stages.pipeline(FakePdf::with_text(&text), 500);

    let report = pipeline.run(document(), TargetLanguage::Tamil, &NoopReporter).await;

    assert_eq!(report.state, PipelineState::Done);
    assert_eq!(stages.summarization.call_count(), 1);
    assert_eq!(report.summary.as_deref(), Some("[SUMMARY] w0 w1 w2 w3 w4"));
    assert!(!report.is_degraded());
}

/// Scenario B: 1200 words across pages make three chunks
#[tokio::test]
async fn test_pipeline_with1200WordDocument_shouldSummarizeThreeChunks() {
    common::init_logger();
    let stages = MockStages::working();
    let words: Vec<String> = numbered_words(1200).split(' ').map(str::to_string).collect();
    let pages = words.chunks(400).map(|page| page.join(" ")).collect();
    let pipeline = stages.pipeline(FakePdf::with_pages(pages), 500);

    let report = pipeline.run(document(), TargetLanguage::Kannada, &NoopReporter).await;

    assert_eq!(report.state, PipelineState::Done);
    assert_eq!(stages.summarization.call_count(), 3);
    assert_eq!(
        report.summary.as_deref(),
        Some("[SUMMARY] w0 w1 w2 w3 w4 [SUMMARY] w500 w501 w502 w503 w504 [SUMMARY] w1000 w1001 w1002 w1003 w1004")
    );
}

/// Scenario C: an unreadable document aborts before any model is called
#[tokio::test]
async fn test_pipeline_withUnreadableDocument_shouldAbort() {
    common::init_logger();
    for backend_is_empty in [true, false] {
        let stages = MockStages::working();
        let pipeline = if backend_is_empty {
            stages.pipeline(FakePdf::empty(), 500)
        } else {
            stages.pipeline(UnreadablePdf, 500)
        };
        let reporter = RecordingReporter::default();

        let report = pipeline.run(document(), TargetLanguage::Hindi, &reporter).await;

        assert_eq!(report.state, PipelineState::Aborted);
        assert!(report.summary.is_none());
        assert!(report.translation.is_none());
        assert!(report.audio.is_none());
        assert!(matches!(
            report.diagnostic(Stage::Extraction),
            Some(StageError::Extraction(ExtractionError::NoPages | ExtractionError::Open(_)))
        ));
        assert_eq!(stages.summarization.call_count(), 0);
        assert_eq!(stages.translation.call_count(), 0);
        assert_eq!(stages.speech.call_count(), 0);
        assert_eq!(
            reporter.events(),
            vec!["start Extraction", "error Extraction", "complete Extraction"]
        );
    }
}

/// Scenario D: translation down, the sentinel is spoken and the run finishes
#[tokio::test]
async fn test_pipeline_withUnreachableTranslator_shouldSpeakSentinel() {
    common::init_logger();
    let stages = MockStages {
        translation: MockProvider::failing(),
        ..MockStages::working()
    };
    let pipeline = stages.pipeline(FakePdf::with_text(&numbered_words(30)), 500);
    let reporter = RecordingReporter::default();

    let report = pipeline.run(document(), TargetLanguage::Telugu, &reporter).await;

    assert_eq!(report.state, PipelineState::Done);
    assert_eq!(report.translation.as_deref(), Some(TRANSLATION_FAILED));
    let audio = report.audio.as_ref().expect("sentinel should be spoken");
    assert_eq!(&audio.bytes()[MOCK_AUDIO_HEADER.len()..], b"te:Translation failed.");
    assert!(reporter.events().contains(&"error Translation".to_string()));
}

/// Synthesis failure still finishes the run, without audio
#[tokio::test]
async fn test_pipeline_withFailingSpeech_shouldFinishWithoutAudio() {
    common::init_logger();
    let stages = MockStages {
        speech: MockProvider::failing(),
        ..MockStages::working()
    };
    let pipeline = stages.pipeline(FakePdf::with_text("Cells divide by mitosis."), 500);

    let report = pipeline.run(document(), TargetLanguage::Malayalam, &NoopReporter).await;

    assert_eq!(report.state, PipelineState::Done);
    assert!(report.audio.is_none());
    assert!(report.translation.is_some());
    assert!(matches!(report.diagnostic(Stage::Synthesis), Some(StageError::Synthesis(_))));
}

/// Summarization failure forwards the full text to translation
#[tokio::test]
async fn test_pipeline_withFailingSummarizer_shouldTranslateFullText() {
    common::init_logger();
    let stages = MockStages {
        summarization: MockProvider::failing(),
        ..MockStages::working()
    };
    let text = "Water boils at one hundred degrees.";
    let pipeline = stages.pipeline(FakePdf::with_text(text), 500);

    let report = pipeline.run(document(), TargetLanguage::Tamil, &NoopReporter).await;

    assert_eq!(report.summary.as_deref(), Some(text));
    assert!(report.translation.as_deref().is_some_and(|t| t.ends_with(text)));
    assert_eq!(report.diagnostics.len(), 1);
}

/// Stages are reported strictly in order
#[tokio::test]
async fn test_pipeline_shouldReportStagesInOrder() {
    let stages = MockStages::working();
    let pipeline = stages.pipeline(FakePdf::with_text("One page of text."), 500);
    let reporter = RecordingReporter::default();

    pipeline.run(document(), TargetLanguage::Tamil, &reporter).await;

    assert_eq!(
        reporter.events(),
        vec![
            "start Extraction",
            "complete Extraction",
            "start Summarization",
            "complete Summarization",
            "start Translation",
            "complete Translation",
            "start Synthesis",
            "complete Synthesis",
        ]
    );
}
