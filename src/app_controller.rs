use anyhow::{anyhow, Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::errors::StageError;
use crate::extraction::Document;
use crate::file_utils::FileManager;
use crate::pipeline::{Pipeline, PipelineReport, PipelineReporter, Stage};

// @module: Application controller for document processing

/// Number of stages shown on the progress bar
const STAGE_COUNT: u64 = 4;

/// What happened to one input document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentStatus {
    /// Outputs written; `degraded` when a stage fell back
    Completed { degraded: bool, audio: bool },
    /// No text could be extracted; nothing written
    Aborted,
    /// Outputs already existed
    Skipped,
}

/// Where the outputs of one document go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub summary: PathBuf,
    pub translation: PathBuf,
    pub audio: PathBuf,
}

/// Counts for a folder run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FolderSummary {
    pub processed: usize,
    pub skipped: usize,
    pub aborted: usize,
    pub errors: usize,
}

/// Progress bar reporter for one document
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Progress bar attached to `multi_progress`
    pub fn new(multi_progress: &MultiProgress, document_name: &str) -> Self {
        let bar = multi_progress.add(ProgressBar::new(STAGE_COUNT));
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {prefix:.bold} [{bar:20.cyan/blue}] {pos}/{len} {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] {prefix} {pos}/{len} {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style.progress_chars("█▓▒░"));
        bar.set_prefix(document_name.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }

    /// Reporter that draws nothing
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl PipelineReporter for ProgressReporter {
    fn on_stage_start(&self, stage: Stage) {
        self.bar.set_message(format!("{}...", stage.description()));
    }

    fn on_stage_complete(&self, stage: Stage) {
        debug!("{} complete", stage);
        self.bar.inc(1);
    }

    fn on_error(&self, stage: Stage, error: &StageError) {
        self.bar.suspend(|| warn!("{} degraded: {}", stage, error));
    }
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Stages built from the configuration
    pipeline: Pipeline,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let pipeline = Pipeline::from_config(&config).context("Failed to build the processing pipeline")?;
        Ok(Self { config, pipeline })
    }

    /// Controller around an already assembled pipeline
    pub fn with_pipeline(config: Config, pipeline: Pipeline) -> Self {
        Self { config, pipeline }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Output locations for `input_file` in `output_dir`
    pub fn output_paths(&self, input_file: &Path, output_dir: &Path) -> OutputPaths {
        OutputPaths {
            summary: FileManager::generate_output_path(input_file, output_dir, "summary", "txt"),
            translation: FileManager::generate_output_path(
                input_file,
                output_dir,
                self.config.target_language.code(),
                "txt",
            ),
            audio: FileManager::generate_output_path(
                input_file,
                output_dir,
                self.config.target_language.code(),
                "mp3",
            ),
        }
    }

    /// Process one PDF, writing its outputs to `output_dir`
    pub async fn run(&self, input_file: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<DocumentStatus> {
        let multi_progress = MultiProgress::new();
        let status = self
            .run_with_progress(&input_file, &output_dir, &multi_progress, force_overwrite)
            .await?;
        Ok(status)
    }

    async fn run_with_progress(
        &self,
        input_file: &Path,
        output_dir: &Path,
        multi_progress: &MultiProgress,
        force_overwrite: bool,
    ) -> Result<DocumentStatus> {
        if !input_file.is_file() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let paths = self.output_paths(input_file, output_dir);
        if paths.translation.exists() && !force_overwrite {
            warn!(
                "Skipping {:?}, translation already exists (use -f to force overwrite)",
                input_file
            );
            return Ok(DocumentStatus::Skipped);
        }

        if !FileManager::is_pdf(input_file) {
            warn!("{:?} does not look like a PDF, trying anyway", input_file);
        }

        let document = Document::from_path(input_file)?;
        let reporter = ProgressReporter::new(multi_progress, document.name());
        let report = self
            .pipeline
            .run(document, self.config.target_language, &reporter)
            .await;
        reporter.finish();

        self.handle_report(&report, &paths)
    }

    /// Write the outputs of a finished run
    pub fn handle_report(&self, report: &PipelineReport, paths: &OutputPaths) -> Result<DocumentStatus> {
        if !report.state.is_terminal() {
            return Err(anyhow!("Pipeline stopped before finishing: {:?}", report.state));
        }

        if report.is_aborted() {
            if let Some(error) = report.diagnostic(Stage::Extraction) {
                error!("{}", error);
            }
            return Ok(DocumentStatus::Aborted);
        }

        if let Some(summary) = &report.summary {
            FileManager::write_to_file(&paths.summary, summary)?;
        }
        if let Some(translation) = &report.translation {
            FileManager::write_to_file(&paths.translation, translation)?;
        }
        if let Some(audio) = &report.audio {
            FileManager::write_bytes(&paths.audio, audio.bytes())?;
            info!("Success: {}", paths.audio.display());
        } else {
            warn!("No audio generated for {}", paths.translation.display());
            if FileManager::remove_stale_file(&paths.audio)? {
                debug!("Removed audio of an earlier run: {}", paths.audio.display());
            }
        }

        info!(
            "Finished in {} ({})",
            Self::format_duration(report.duration),
            report.summary_line()
        );

        Ok(DocumentStatus::Completed {
            degraded: report.is_degraded(),
            audio: report.audio.is_some(),
        })
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }

    /// Process every PDF under `input_dir`, one after another.
    ///
    /// Each document gets its own subdirectory of `output_root` mirroring its
    /// path below `input_dir`, so equal file names in different folders stay apart.
    pub async fn run_folder(&self, input_dir: PathBuf, output_root: PathBuf, force_overwrite: bool) -> Result<FolderSummary> {
        let start_time = Instant::now();

        if !input_dir.is_dir() {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let pdf_files = FileManager::find_files(&input_dir, "pdf")?;
        if pdf_files.is_empty() {
            return Err(anyhow!("No PDF files found in directory: {:?}", input_dir));
        }

        let multi_progress = MultiProgress::new();
        let folder_pb = multi_progress.add(ProgressBar::new(pdf_files.len() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));

        let mut summary = FolderSummary::default();

        for pdf_file in &pdf_files {
            let relative = pdf_file.strip_prefix(&input_dir).unwrap_or(pdf_file.as_path());
            let display_name = relative.display().to_string();
            folder_pb.set_message(format!("Processing: {}", display_name));

            let output_dir = output_root.join(relative.with_extension(""));
            match self
                .run_with_progress(pdf_file, &output_dir, &multi_progress, force_overwrite)
                .await
            {
                Ok(DocumentStatus::Completed { .. }) => summary.processed += 1,
                Ok(DocumentStatus::Skipped) => summary.skipped += 1,
                Ok(DocumentStatus::Aborted) => summary.aborted += 1,
                Err(e) => {
                    error!("Error processing file {}: {:#}", display_name, e);
                    summary.errors += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        info!(
            "Folder processing completed in {}: {} processed, {} skipped, {} aborted, {} errors",
            Self::format_duration(start_time.elapsed()),
            summary.processed,
            summary.skipped,
            summary.aborted,
            summary.errors
        );

        Ok(summary)
    }
}
