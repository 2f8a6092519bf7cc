use thiserror::Error;

use carepoint_core::error::CoreError;
use carepoint_records::error::RecordError;

#[derive(Debug, Error)]
pub enum FormError {
    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("invalid edit: {0}")]
    Edit(#[from] CoreError),

    #[error("could not load assessment {id}: {message}")]
    Load { id: i64, message: String },

    #[error("cannot {operation} while the form is {phase}")]
    WrongPhase {
        operation: &'static str,
        phase: &'static str,
    },
}
