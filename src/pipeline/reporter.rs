use crate::errors::StageError;
use crate::pipeline::Stage;

/// Observer of pipeline progress.
///
/// Called synchronously from the pipeline; implementations should return
/// quickly.
pub trait PipelineReporter: Send + Sync {
    /// A stage is about to run
    fn on_stage_start(&self, stage: Stage);

    /// A stage finished, degraded or not
    fn on_stage_complete(&self, stage: Stage);

    /// A stage recovered from `error`
    fn on_error(&self, stage: Stage, error: &StageError);
}

/// Reporter that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl PipelineReporter for NoopReporter {
    fn on_stage_start(&self, _stage: Stage) {}

    fn on_stage_complete(&self, _stage: Stage) {}

    fn on_error(&self, _stage: Stage, _error: &StageError) {}
}
