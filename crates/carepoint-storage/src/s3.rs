use aws_sdk_s3::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use carepoint_core::record_keys::{self, Table};

use crate::error::StorageError;
use crate::objects;
use crate::service::{
    BoxFuture, BulkResponse, ID_FIELD, RawRecord, RecordOutcome, RecordService, merge_record,
    record_id,
};
use crate::sequence::{self, Sequence};

/// Attempts at bumping a sequence document before giving up.
const MAX_SEQUENCE_ATTEMPTS: usize = 5;

/// Record service over an S3 bucket: one JSON object per record at
/// `{table}/{id}.json`, ids allocated from `_state/sequences/{table}.json`.
#[derive(Clone)]
pub struct S3RecordService {
    client: Client,
    bucket: String,
}

impl S3RecordService {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn list_records(&self, table: Table) -> Result<Vec<RawRecord>, StorageError> {
        let keys = objects::list_objects(&self.client, &self.bucket, &table.prefix()).await?;

        let mut records = Vec::with_capacity(keys.len());
        for key in &keys {
            if record_keys::parse_record_id(table, key).is_none() {
                continue;
            }
            match objects::get_object(&self.client, &self.bucket, key).await {
                Ok(output) => records.push(serde_json::from_slice(&output.body)?),
                // Deleted between list and get.
                Err(StorageError::NotFound { .. }) => {}
                Err(e) => return Err(e),
            }
        }

        debug!(%table, count = records.len(), "listed records");
        Ok(records)
    }

    async fn get_record(&self, table: Table, id: i64) -> Result<Option<RawRecord>, StorageError> {
        let key = record_keys::record(table, id);
        match objects::get_object(&self.client, &self.bucket, &key).await {
            Ok(output) => Ok(Some(serde_json::from_slice(&output.body)?)),
            Err(StorageError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn put_record(&self, table: Table, id: i64, record: &RawRecord) -> Result<(), StorageError> {
        let key = record_keys::record(table, id);
        let body = serde_json::to_vec(record)?;
        objects::put_json(&self.client, &self.bucket, &key, body).await?;
        Ok(())
    }

    /// Reserve `count` consecutive ids for `table`.
    async fn allocate_ids(&self, table: Table, count: i64) -> Result<Vec<i64>, StorageError> {
        for attempt in 1..=MAX_SEQUENCE_ATTEMPTS {
            let result = match sequence::load(&self.client, &self.bucket, table).await? {
                Some(current) => {
                    let previous = current.sequence.last_id;
                    let next = Sequence {
                        last_id: previous + count,
                    };
                    sequence::advance(&self.client, &self.bucket, table, &current, next)
                        .await
                        .map(|()| previous)
                }
                None => {
                    // First allocation for this table: continue after whatever is already stored.
                    let highest = self.highest_stored_id(table).await?;
                    let next = Sequence {
                        last_id: highest + count,
                    };
                    sequence::create(&self.client, &self.bucket, table, next)
                        .await
                        .map(|()| highest)
                }
            };

            match result {
                Ok(previous) => return Ok((previous + 1..=previous + count).collect()),
                Err(StorageError::PreconditionFailed { .. }) => {
                    debug!(%table, attempt, "sequence changed underneath us, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        warn!(%table, "gave up allocating ids after {MAX_SEQUENCE_ATTEMPTS} attempts");
        Err(StorageError::SequenceContention {
            table: table.to_string(),
        })
    }

    async fn highest_stored_id(&self, table: Table) -> Result<i64, StorageError> {
        let keys = objects::list_objects(&self.client, &self.bucket, &table.prefix()).await?;
        Ok(keys
            .iter()
            .filter_map(|k| record_keys::parse_record_id(table, k))
            .max()
            .unwrap_or(0))
    }

    async fn create_records(
        &self,
        table: Table,
        records: Vec<RawRecord>,
    ) -> Result<BulkResponse, StorageError> {
        if records.is_empty() {
            return Ok(BulkResponse::default());
        }
        let ids = self.allocate_ids(table, records.len() as i64).await?;

        let mut results = Vec::with_capacity(records.len());
        for (id, mut record) in ids.into_iter().zip(records) {
            record.insert(ID_FIELD.to_string(), Value::from(id));
            match self.put_record(table, id, &record).await {
                Ok(()) => {
                    info!(%table, id, "record created");
                    results.push(RecordOutcome::Saved(record));
                }
                Err(e) => {
                    warn!(%table, id, error = %e, "record create rejected");
                    results.push(RecordOutcome::Rejected {
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok(BulkResponse { results })
    }

    async fn update_records(
        &self,
        table: Table,
        records: Vec<RawRecord>,
    ) -> Result<BulkResponse, StorageError> {
        let mut results = Vec::with_capacity(records.len());
        for record in records {
            let outcome = match record_id(&record) {
                None => RecordOutcome::Rejected {
                    message: format!("record has no {ID_FIELD}"),
                },
                Some(id) => self.update_one(table, id, record).await,
            };
            results.push(outcome);
        }
        Ok(BulkResponse { results })
    }

    async fn update_one(&self, table: Table, id: i64, changes: RawRecord) -> RecordOutcome {
        let stored = match self.get_record(table, id).await {
            Ok(Some(stored)) => stored,
            Ok(None) => return RecordOutcome::Missing(id),
            Err(e) => {
                return RecordOutcome::Rejected {
                    message: e.to_string(),
                };
            }
        };

        let merged = merge_record(&stored, changes, id);
        match self.put_record(table, id, &merged).await {
            Ok(()) => {
                info!(%table, id, "record updated");
                RecordOutcome::Saved(merged)
            }
            Err(e) => RecordOutcome::Rejected {
                message: e.to_string(),
            },
        }
    }

    async fn delete_records(&self, table: Table, ids: Vec<i64>) -> Result<BulkResponse, StorageError> {
        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            let key = record_keys::record(table, id);
            let outcome = match objects::object_exists(&self.client, &self.bucket, &key).await {
                Ok(false) => RecordOutcome::Missing(id),
                Ok(true) => match objects::delete_object(&self.client, &self.bucket, &key).await {
                    Ok(()) => {
                        info!(%table, id, "record deleted");
                        RecordOutcome::Deleted(id)
                    }
                    Err(e) => RecordOutcome::Rejected {
                        message: e.to_string(),
                    },
                },
                Err(e) => RecordOutcome::Rejected {
                    message: e.to_string(),
                },
            };
            results.push(outcome);
        }
        Ok(BulkResponse { results })
    }
}

impl RecordService for S3RecordService {
    fn list(&self, table: Table) -> BoxFuture<'_, Result<Vec<RawRecord>, StorageError>> {
        Box::pin(self.list_records(table))
    }

    fn get(&self, table: Table, id: i64) -> BoxFuture<'_, Result<Option<RawRecord>, StorageError>> {
        Box::pin(self.get_record(table, id))
    }

    fn create(
        &self,
        table: Table,
        records: Vec<RawRecord>,
    ) -> BoxFuture<'_, Result<BulkResponse, StorageError>> {
        Box::pin(self.create_records(table, records))
    }

    fn update(
        &self,
        table: Table,
        records: Vec<RawRecord>,
    ) -> BoxFuture<'_, Result<BulkResponse, StorageError>> {
        Box::pin(self.update_records(table, records))
    }

    fn delete(&self, table: Table, ids: Vec<i64>) -> BoxFuture<'_, Result<BulkResponse, StorageError>> {
        Box::pin(self.delete_records(table, ids))
    }
}
