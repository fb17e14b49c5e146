use crate::errors::StageError;

/// Result of one pipeline stage.
///
/// Stages never fail outright. A stage that hit an error still hands the
/// next stage a well-formed value (its fallback) and carries the error along
/// as a diagnostic.
#[derive(Debug)]
pub enum StageOutcome<T> {
    /// The stage produced its real output
    Completed(T),
    /// The stage failed and substituted a fallback value
    Degraded {
        /// Fallback value of the stage's output type
        value: T,
        /// What went wrong
        error: StageError,
    },
}

impl<T> StageOutcome<T> {
    pub fn completed(value: T) -> Self {
        Self::Completed(value)
    }

    pub fn degraded(value: T, error: impl Into<StageError>) -> Self {
        Self::Degraded {
            value,
            error: error.into(),
        }
    }

    /// The output value, real or fallback
    pub fn value(&self) -> &T {
        match self {
            Self::Completed(value) | Self::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        self.into_parts().0
    }

    /// The diagnostic, if the stage degraded
    pub fn error(&self) -> Option<&StageError> {
        match self {
            Self::Completed(_) => None,
            Self::Degraded { error, .. } => Some(error),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    /// Split into the value and the optional diagnostic
    pub fn into_parts(self) -> (T, Option<StageError>) {
        match self {
            Self::Completed(value) => (value, None),
            Self::Degraded { value, error } => (value, Some(error)),
        }
    }
}
