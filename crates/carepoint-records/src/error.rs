use thiserror::Error;

use carepoint_core::error::CoreError;
use carepoint_core::models::assessment::Assessment;
use carepoint_storage::error::StorageError;

use crate::entity::EntityKind;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("{entity} {id} not found")]
    NotFound { entity: EntityKind, id: i64 },

    /// Raised before any service call is made.
    #[error("validation failed: {0}")]
    Validation(CoreError),

    #[error("{entity} service error: {message}")]
    Service { entity: EntityKind, message: String },

    /// Some records of a batch were stored and some were not.
    #[error("{} assessments saved, {} rejected", .saved.len(), .rejected.len())]
    PartialWriteFailure {
        saved: Vec<Assessment>,
        rejected: Vec<String>,
    },

    #[error("malformed {entity} record: {message}")]
    Decode { entity: EntityKind, message: String },

    #[error("could not encode {entity}: {source}")]
    Encode {
        entity: EntityKind,
        #[source]
        source: CoreError,
    },
}

impl RecordError {
    pub fn service(entity: EntityKind, message: impl Into<String>) -> Self {
        RecordError::Service {
            entity,
            message: message.into(),
        }
    }

    pub fn from_storage(entity: EntityKind, err: StorageError) -> Self {
        Self::service(entity, err.to_string())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, RecordError::Validation(_))
    }
}
