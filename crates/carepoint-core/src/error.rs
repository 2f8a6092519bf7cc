use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("severity {0} is outside range [0, 5]")]
    SeverityOutOfRange(u8),

    #[error("duration must be a positive number, got {0}")]
    InvalidDuration(f64),

    #[error("unknown symptom id: {0}")]
    UnknownSymptom(u32),
}
