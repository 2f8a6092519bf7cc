use std::future::Future;
use std::pin::Pin;

use carepoint_core::record_keys::Table;
use serde_json::{Map, Value};

use crate::error::StorageError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A record as the service stores it: an untyped JSON object in which any
/// field may be absent or null. Typing happens at the client boundary.
pub type RawRecord = Map<String, Value>;

/// Field carrying the service-assigned record id.
pub const ID_FIELD: &str = "Id";

pub fn record_id(record: &RawRecord) -> Option<i64> {
    record.get(ID_FIELD).and_then(Value::as_i64)
}

/// Per-item result of a bulk write.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// The record as stored, including its `Id`.
    Saved(RawRecord),
    Deleted(i64),
    /// No record with this id exists.
    Missing(i64),
    Rejected { message: String },
}

impl RecordOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RecordOutcome::Saved(_) | RecordOutcome::Deleted(_))
    }
}

/// One outcome per submitted item, in submission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkResponse {
    pub results: Vec<RecordOutcome>,
}

impl BulkResponse {
    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(RecordOutcome::is_success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &RecordOutcome> {
        self.results.iter().filter(|r| !r.is_success())
    }
}

/// The external record service: list/get/create/update/delete over three
/// tables. Writes are batched and report per-item outcomes; an `Err` means
/// the call as a whole failed and nothing can be assumed about its effect.
pub trait RecordService: Send + Sync {
    fn list(&self, table: Table) -> BoxFuture<'_, Result<Vec<RawRecord>, StorageError>>;

    fn get(&self, table: Table, id: i64) -> BoxFuture<'_, Result<Option<RawRecord>, StorageError>>;

    /// Store new records. The service assigns each one an `Id`; any `Id`
    /// supplied by the caller is ignored.
    fn create(
        &self,
        table: Table,
        records: Vec<RawRecord>,
    ) -> BoxFuture<'_, Result<BulkResponse, StorageError>>;

    /// Merge each record over the stored record with the same `Id`.
    fn update(
        &self,
        table: Table,
        records: Vec<RawRecord>,
    ) -> BoxFuture<'_, Result<BulkResponse, StorageError>>;

    fn delete(&self, table: Table, ids: Vec<i64>) -> BoxFuture<'_, Result<BulkResponse, StorageError>>;
}

/// Overwrite the fields of `stored` with those in `changes`, keeping `id`.
pub fn merge_record(stored: &RawRecord, changes: RawRecord, id: i64) -> RawRecord {
    let mut merged = stored.clone();
    merged.extend(changes);
    merged.insert(ID_FIELD.to_string(), Value::from(id));
    merged
}
