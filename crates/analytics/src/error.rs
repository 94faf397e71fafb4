use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Metric '{metric}' is undefined: its denominator is zero")]
    DivisionUndefined { metric: String },

    #[error("Not enough data for {operation}: need at least {required} observations, got {actual}")]
    InsufficientData {
        operation: String,
        required: usize,
        actual: usize,
    },

    #[error("Input does not match the expected schema: {0}")]
    SchemaViolation(#[from] CoreError),

    #[error("Arithmetic overflow while computing '{0}'")]
    Overflow(String),
}

impl AnalyticsError {
    pub fn undefined(metric: impl Into<String>) -> Self {
        AnalyticsError::DivisionUndefined {
            metric: metric.into(),
        }
    }

    /// True for the recoverable "n/a" case a presentation layer usually renders.
    pub fn is_undefined(&self) -> bool {
        matches!(self, AnalyticsError::DivisionUndefined { .. })
    }
}
