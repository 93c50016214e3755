use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegStressError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl RegStressError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        RegStressError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for RegStressError {
    fn from(e: serde_json::Error) -> Self {
        RegStressError::SerializationError(e.to_string())
    }
}
