use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {key}")]
    NotFound { key: String },

    #[error("precondition failed for key: {key}")]
    PreconditionFailed { key: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("S3 GetObject error: {0}")]
    GetObject(String),

    #[error("S3 HeadObject error: {0}")]
    HeadObject(String),

    #[error("S3 PutObject error: {0}")]
    PutObject(String),

    #[error("S3 DeleteObject error: {0}")]
    DeleteObject(String),

    #[error("S3 ListObjects error: {0}")]
    ListObjects(String),

    #[error("could not allocate ids for {table}: sequence kept changing")]
    SequenceContention { table: String },

    #[error("record service unavailable: {0}")]
    Unavailable(String),
}
