use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Schema violation on field '{field}': {reason}")]
    SchemaViolation { field: String, reason: String },

    #[error("Statement '{statement}' has no line labeled '{label}'")]
    MissingLine { statement: String, label: String },

    #[error("Statement '{statement}' declares the line '{label}' more than once")]
    DuplicateLine { statement: String, label: String },

    #[error("No statement named '{0}' was supplied")]
    MissingStatement(String),

    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),
}

impl CoreError {
    pub fn schema(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::SchemaViolation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
