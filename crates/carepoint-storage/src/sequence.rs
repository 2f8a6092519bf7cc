//! Per-table id sequences, kept as small JSON documents next to the records
//! and updated with conditional writes so two writers never hand out the same
//! id.

use aws_sdk_s3::Client;
use serde::{Deserialize, Serialize};

use carepoint_core::record_keys::{self, Table};

use crate::error::StorageError;
use crate::objects;

/// Highest id handed out so far for one table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    pub last_id: i64,
}

/// A sequence as read, with the ETag any update must match.
#[derive(Debug, Clone)]
pub struct Versioned {
    pub sequence: Sequence,
    pub etag: String,
}

/// `Ok(None)` when the table has never allocated an id.
pub async fn load(client: &Client, bucket: &str, table: Table) -> Result<Option<Versioned>, StorageError> {
    let key = record_keys::sequence(table);
    match objects::get_object(client, bucket, &key).await {
        Ok(output) => Ok(Some(Versioned {
            sequence: serde_json::from_slice(&output.body)?,
            etag: output.etag.unwrap_or_default(),
        })),
        Err(StorageError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Write the first sequence document for `table`. Fails with
/// `PreconditionFailed` if another writer got there first.
pub async fn create(
    client: &Client,
    bucket: &str,
    table: Table,
    sequence: Sequence,
) -> Result<(), StorageError> {
    let key = record_keys::sequence(table);
    let body = serde_json::to_vec(&sequence)?;
    objects::put_json_if_absent(client, bucket, &key, body).await?;
    Ok(())
}

/// Replace `current` with `next`. Fails with `PreconditionFailed` if the
/// document changed since it was read.
pub async fn advance(
    client: &Client,
    bucket: &str,
    table: Table,
    current: &Versioned,
    next: Sequence,
) -> Result<(), StorageError> {
    let key = record_keys::sequence(table);
    let body = serde_json::to_vec(&next)?;
    objects::put_json_if_match(client, bucket, &key, body, &current.etag).await?;
    Ok(())
}
