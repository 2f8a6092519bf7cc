use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tracing::debug;

use carepoint_core::record_keys::Table;

use crate::error::StorageError;
use crate::service::{
    BoxFuture, BulkResponse, ID_FIELD, RawRecord, RecordOutcome, RecordService, merge_record,
    record_id,
};

/// Which trait method a recorded call went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

#[derive(Default)]
struct Tables {
    records: BTreeMap<Table, BTreeMap<i64, RawRecord>>,
    calls: Vec<(Operation, Table)>,
    reject: Option<(String, Value)>,
}

/// In-process record service with the same contract as the S3 backend.
///
/// Ids are `max + 1` per table. Every call is logged so callers can assert
/// on what reached the service; [`set_unavailable`](Self::set_unavailable)
/// and [`reject_where`](Self::reject_where) simulate outages and per-record
/// rejections.
#[derive(Default)]
pub struct MemoryRecordService {
    inner: Mutex<Tables>,
    unavailable: AtomicBool,
}

impl MemoryRecordService {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a record directly, bypassing call logging and failure switches.
    /// Uses the record's `Id` when present, otherwise assigns the next one.
    pub fn insert(&self, table: Table, mut record: RawRecord) -> i64 {
        let mut tables = self.lock();
        let rows = tables.records.entry(table).or_default();
        let id = record_id(&record).unwrap_or_else(|| next_id(rows));
        record.insert(ID_FIELD.to_string(), Value::from(id));
        rows.insert(id, record);
        id
    }

    pub fn snapshot(&self, table: Table) -> Vec<RawRecord> {
        self.lock()
            .records
            .get(&table)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Make every subsequent call fail as a whole.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Reject created or updated records whose `field` equals `value`.
    pub fn reject_where(&self, field: &str, value: impl Into<Value>) {
        self.lock().reject = Some((field.to_string(), value.into()));
    }

    pub fn calls(&self) -> Vec<(Operation, Table)> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self, op: Operation) -> usize {
        self.lock().calls.iter().filter(|(o, _)| *o == op).count()
    }

    fn begin(&self, op: Operation, table: Table) -> Result<MutexGuard<'_, Tables>, StorageError> {
        let mut tables = self.lock();
        tables.calls.push((op, table));
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("{op:?} {table}")));
        }
        Ok(tables)
    }

    fn list_now(&self, table: Table) -> Result<Vec<RawRecord>, StorageError> {
        let tables = self.begin(Operation::List, table)?;
        Ok(tables
            .records
            .get(&table)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default())
    }

    fn get_now(&self, table: Table, id: i64) -> Result<Option<RawRecord>, StorageError> {
        let tables = self.begin(Operation::Get, table)?;
        Ok(tables.records.get(&table).and_then(|rows| rows.get(&id)).cloned())
    }

    fn create_now(&self, table: Table, records: Vec<RawRecord>) -> Result<BulkResponse, StorageError> {
        let mut tables = self.begin(Operation::Create, table)?;
        let reject = tables.reject.clone();
        let rows = tables.records.entry(table).or_default();

        let mut results = Vec::with_capacity(records.len());
        for mut record in records {
            if let Some(message) = rejection(&reject, &record) {
                results.push(RecordOutcome::Rejected { message });
                continue;
            }
            let id = next_id(rows);
            record.insert(ID_FIELD.to_string(), Value::from(id));
            rows.insert(id, record.clone());
            debug!(%table, id, "record created");
            results.push(RecordOutcome::Saved(record));
        }
        Ok(BulkResponse { results })
    }

    fn update_now(&self, table: Table, records: Vec<RawRecord>) -> Result<BulkResponse, StorageError> {
        let mut tables = self.begin(Operation::Update, table)?;
        let reject = tables.reject.clone();
        let rows = tables.records.entry(table).or_default();

        let mut results = Vec::with_capacity(records.len());
        for record in records {
            let Some(id) = record_id(&record) else {
                results.push(RecordOutcome::Rejected {
                    message: format!("record has no {ID_FIELD}"),
                });
                continue;
            };
            if let Some(message) = rejection(&reject, &record) {
                results.push(RecordOutcome::Rejected { message });
                continue;
            }
            match rows.get_mut(&id) {
                None => results.push(RecordOutcome::Missing(id)),
                Some(stored) => {
                    *stored = merge_record(stored, record, id);
                    debug!(%table, id, "record updated");
                    results.push(RecordOutcome::Saved(stored.clone()));
                }
            }
        }
        Ok(BulkResponse { results })
    }

    fn delete_now(&self, table: Table, ids: Vec<i64>) -> Result<BulkResponse, StorageError> {
        let mut tables = self.begin(Operation::Delete, table)?;
        let rows = tables.records.entry(table).or_default();

        let results = ids
            .into_iter()
            .map(|id| match rows.remove(&id) {
                Some(_) => {
                    debug!(%table, id, "record deleted");
                    RecordOutcome::Deleted(id)
                }
                None => RecordOutcome::Missing(id),
            })
            .collect();
        Ok(BulkResponse { results })
    }
}

fn next_id(rows: &BTreeMap<i64, RawRecord>) -> i64 {
    rows.keys().next_back().map_or(1, |max| max + 1)
}

fn rejection(rule: &Option<(String, Value)>, record: &RawRecord) -> Option<String> {
    let (field, value) = rule.as_ref()?;
    (record.get(field) == Some(value)).then(|| format!("{field} rejected by service"))
}

impl RecordService for MemoryRecordService {
    fn list(&self, table: Table) -> BoxFuture<'_, Result<Vec<RawRecord>, StorageError>> {
        let result = self.list_now(table);
        Box::pin(async move { result })
    }

    fn get(&self, table: Table, id: i64) -> BoxFuture<'_, Result<Option<RawRecord>, StorageError>> {
        let result = self.get_now(table, id);
        Box::pin(async move { result })
    }

    fn create(
        &self,
        table: Table,
        records: Vec<RawRecord>,
    ) -> BoxFuture<'_, Result<BulkResponse, StorageError>> {
        let result = self.create_now(table, records);
        Box::pin(async move { result })
    }

    fn update(
        &self,
        table: Table,
        records: Vec<RawRecord>,
    ) -> BoxFuture<'_, Result<BulkResponse, StorageError>> {
        let result = self.update_now(table, records);
        Box::pin(async move { result })
    }

    fn delete(&self, table: Table, ids: Vec<i64>) -> BoxFuture<'_, Result<BulkResponse, StorageError>> {
        let result = self.delete_now(table, ids);
        Box::pin(async move { result })
    }
}
