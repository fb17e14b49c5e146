/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;
use std::fs;

use eduspeak::app_config::Config;
use eduspeak::app_controller::{Controller, DocumentStatus, FolderSummary};
use eduspeak::language_utils::TargetLanguage;
use eduspeak::providers::mock::MockProvider;

use crate::common::{self, FakePdf, MockStages};

fn hindi_config() -> Config {
    Config {
        target_language: TargetLanguage::Hindi,
        ..Config::default()
    }
}

fn controller(text: &str) -> Controller {
    let pipeline = MockStages::working().pipeline(FakePdf::with_text(text), 500);
    Controller::with_pipeline(hindi_config(), pipeline)
}

/// The controller builds its pipeline from the default configuration
#[test]
fn test_controller_withDefaultConfig_shouldInitialize() -> Result<()> {
    let controller = Controller::with_config(Config::default())?;
    assert_eq!(controller.config().target_language, TargetLanguage::Tamil);
    Ok(())
}

/// A processed file leaves a summary, a translation and the audio
#[tokio::test]
async fn test_run_withPdf_shouldWriteAllOutputs() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_pdf(temp_dir.path(), "biology.pdf")?;
    let output_dir = temp_dir.path().join("out");

    let status = controller("Plants convert light into chemical energy.")
        .run(input, output_dir.clone(), false)
        .await?;

    assert_eq!(
        status,
        DocumentStatus::Completed {
            degraded: false,
            audio: true
        }
    );
    let summary = fs::read_to_string(output_dir.join("biology.summary.txt"))?;
    assert!(summary.starts_with("[SUMMARY] Plants"));
    let translation = fs::read_to_string(output_dir.join("biology.hi.txt"))?;
    assert!(translation.contains("to Hindi"));
    let audio = fs::read(output_dir.join("biology.hi.mp3"))?;
    assert!(audio.starts_with(b"ID3"));
    Ok(())
}

/// Existing outputs are kept unless forced
#[tokio::test]
async fn test_run_withExistingTranslation_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_pdf(temp_dir.path(), "notes.pdf")?;
    let existing = common::create_test_file(temp_dir.path(), "notes.hi.txt", b"old")?;
    let controller = controller("Fresh text.");

    let status = controller
        .run(input.clone(), temp_dir.path().to_path_buf(), false)
        .await?;
    assert_eq!(status, DocumentStatus::Skipped);
    assert_eq!(fs::read_to_string(&existing)?, "old");

    let status = controller.run(input, temp_dir.path().to_path_buf(), true).await?;
    assert!(matches!(status, DocumentStatus::Completed { .. }));
    assert_ne!(fs::read_to_string(&existing)?, "old");
    Ok(())
}

/// A document without text writes nothing
#[tokio::test]
async fn test_run_withEmptyDocument_shouldAbortWithoutOutputs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_pdf(temp_dir.path(), "blank.pdf")?;
    let output_dir = temp_dir.path().join("out");
    let pipeline = MockStages::working().pipeline(FakePdf::empty(), 500);
    let controller = Controller::with_pipeline(hindi_config(), pipeline);

    let status = controller.run(input, output_dir.clone(), false).await?;

    assert_eq!(status, DocumentStatus::Aborted);
    assert!(!output_dir.exists());
    Ok(())
}

/// Missing input is an error
#[tokio::test]
async fn test_run_withMissingInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let result = controller("text")
        .run(temp_dir.path().join("missing.pdf"), temp_dir.path().to_path_buf(), false)
        .await;
    assert!(result.is_err());
    Ok(())
}

/// Folder mode gives each document its own output directory
#[tokio::test]
async fn test_runFolder_shouldProcessEveryPdfIntoOwnDirectory() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("docs");
    common::create_test_pdf(&input_dir, "one.pdf")?;
    common::create_test_pdf(&input_dir, "nested/two.pdf")?;
    common::create_test_file(&input_dir, "readme.txt", b"not a pdf")?;
    let output_root = temp_dir.path().join("out");

    let summary = controller("Shared text.")
        .run_folder(input_dir, output_root.clone(), false)
        .await?;

    assert_eq!(
        summary,
        FolderSummary {
            processed: 2,
            ..FolderSummary::default()
        }
    );
    assert!(output_root.join("one/one.hi.mp3").exists());
    assert!(output_root.join("nested/two/two.hi.txt").exists());
    Ok(())
}

/// Equal file names in different folders keep separate outputs
#[tokio::test]
async fn test_runFolder_withSameNameInSubfolders_shouldKeepBoth() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("docs");
    common::create_test_pdf(&input_dir, "week1/notes.pdf")?;
    common::create_test_pdf(&input_dir, "week2/notes.pdf")?;
    let output_root = temp_dir.path().join("out");

    let summary = controller("Weekly notes.")
        .run_folder(input_dir, output_root.clone(), false)
        .await?;

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.skipped, 0);
    for week in ["week1", "week2"] {
        let dir = output_root.join(week).join("notes");
        assert!(dir.join("notes.hi.txt").exists());
        assert!(dir.join("notes.hi.mp3").exists());
    }
    Ok(())
}

/// Audio is named per document, so a later failure cannot pass off another file's audio
#[tokio::test]
async fn test_run_withFailingSpeechAfterSuccess_shouldNotLeaveForeignAudio() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let first = common::create_test_pdf(temp_dir.path(), "a.pdf")?;
    let second = common::create_test_pdf(temp_dir.path(), "b.pdf")?;
    let output_dir = temp_dir.path().join("out");

    controller("Alpha text.").run(first, output_dir.clone(), false).await?;

    let silent = MockStages {
        speech: MockProvider::failing(),
        ..MockStages::working()
    };
    let controller = Controller::with_pipeline(hindi_config(), silent.pipeline(FakePdf::with_text("Beta text."), 500));
    let status = controller.run(second, output_dir.clone(), false).await?;

    assert_eq!(
        status,
        DocumentStatus::Completed {
            degraded: true,
            audio: false
        }
    );
    assert!(output_dir.join("b.hi.txt").exists());
    assert!(!output_dir.join("b.hi.mp3").exists());
    assert!(output_dir.join("a.hi.mp3").exists());
    Ok(())
}

/// A forced rerun without audio removes the audio of the earlier run
#[tokio::test]
async fn test_run_withForcedRerunWithoutAudio_shouldRemoveStaleAudio() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_pdf(temp_dir.path(), "lecture.pdf")?;
    let output_dir = temp_dir.path().join("out");

    controller("First version.").run(input.clone(), output_dir.clone(), false).await?;
    assert!(output_dir.join("lecture.hi.mp3").exists());

    let silent = MockStages {
        speech: MockProvider::failing(),
        ..MockStages::working()
    };
    let controller = Controller::with_pipeline(hindi_config(), silent.pipeline(FakePdf::with_text("Second version."), 500));
    controller.run(input, output_dir.clone(), true).await?;

    assert!(!output_dir.join("lecture.hi.mp3").exists());
    assert!(fs::read_to_string(output_dir.join("lecture.hi.txt"))?.contains("Second"));
    Ok(())
}

/// Folder mode refuses directories without PDFs
#[tokio::test]
async fn test_runFolder_withoutPdfs_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "notes.txt", b"text")?;

    let result = controller("text")
        .run_folder(temp_dir.path().to_path_buf(), temp_dir.path().join("out"), false)
        .await;
    assert!(result.is_err());
    Ok(())
}
