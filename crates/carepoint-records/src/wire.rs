//! The record-service boundary: field names, and the explicit conversions
//! between loosely-shaped [`RawRecord`]s and typed models.
//!
//! Normalization never fails on an optional field. Absent, null or
//! unparseable values fall back to documented defaults:
//!
//! | field | default |
//! |---|---|
//! | text fields, `category`, `type` | `""` |
//! | `status` | Draft |
//! | timestamps | the `now` passed in |
//! | `symptoms` | empty |
//! | `usage` | none |
//!
//! Only a missing `Id` is an error, because nothing downstream can refer to
//! such a record.

use serde_json::Value;
use tracing::warn;

use carepoint_core::error::CoreError;
use carepoint_core::models::assessment::{Assessment, AssessmentDraft, AssessmentStatus};
use carepoint_core::models::protocol::Protocol;
use carepoint_core::models::reference::{Reference, ReferenceKind};
use carepoint_core::models::symptom::{self, MAX_SEVERITY, Symptom};
use carepoint_storage::service::{ID_FIELD, RawRecord, record_id};

use crate::entity::EntityKind;
use crate::error::RecordError;

pub mod field {
    pub const PATIENT_ID: &str = "patient_id";
    pub const CHIEF_COMPLAINT: &str = "chief_complaint";
    pub const SYMPTOMS: &str = "symptoms";
    pub const STATUS: &str = "status";
    pub const CREATED_AT: &str = "created_at";
    pub const UPDATED_AT: &str = "updated_at";
    pub const TITLE: &str = "title";
    pub const CATEGORY: &str = "category";
    pub const CONTENT: &str = "content";
    pub const LAST_UPDATED: &str = "last_updated";
    pub const TYPE: &str = "type";
    pub const DESCRIPTION: &str = "description";
    pub const USAGE: &str = "usage";
}

fn required_id(entity: EntityKind, record: &RawRecord) -> Result<i64, RecordError> {
    record_id(record).ok_or_else(|| RecordError::Decode {
        entity,
        message: format!("record has no integer {ID_FIELD}"),
    })
}

fn text(record: &RawRecord, name: &str) -> String {
    match record.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn optional_text(record: &RawRecord, name: &str) -> Option<String> {
    Some(text(record, name)).filter(|s| !s.is_empty())
}

fn timestamp(record: &RawRecord, name: &str, now: jiff::Timestamp) -> jiff::Timestamp {
    let Some(raw) = record.get(name).and_then(Value::as_str) else {
        return now;
    };
    raw.parse().unwrap_or_else(|e| {
        warn!(field = name, value = raw, error = %e, "unparseable timestamp, using now");
        now
    })
}

fn status(record: &RawRecord) -> AssessmentStatus {
    match record.get(field::STATUS).and_then(Value::as_str) {
        None => AssessmentStatus::default(),
        Some(label) => AssessmentStatus::from_label(label).unwrap_or_else(|| {
            warn!(status = label, "unknown assessment status, treating as Draft");
            AssessmentStatus::default()
        }),
    }
}

/// Symptoms travel as an encoded text blob; an already-decoded array is
/// accepted as well. Entries are decoded one at a time, so a bad entry only
/// drops itself.
fn symptoms(id: i64, record: &RawRecord) -> Vec<Symptom> {
    let entries = match record.get(field::SYMPTOMS) {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::String(blob)) if blob.trim().is_empty() => return Vec::new(),
        Some(Value::String(blob)) => match serde_json::from_str::<Vec<Value>>(blob) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(id, error = %e, "malformed symptoms blob, treating as empty");
                return Vec::new();
            }
        },
        Some(Value::Array(entries)) => entries.clone(),
        Some(other) => {
            warn!(id, kind = %other, "symptoms field is neither text nor a list, ignoring");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<Symptom>(entry) {
            Ok(mut s) => {
                s.severity = s.severity.min(MAX_SEVERITY);
                Some(s)
            }
            Err(e) => {
                warn!(id, index, error = %e, "dropping malformed symptom entry");
                None
            }
        })
        .collect()
}

pub fn normalize_assessment(
    record: &RawRecord,
    now: jiff::Timestamp,
) -> Result<Assessment, RecordError> {
    let id = required_id(EntityKind::Assessment, record)?;
    Ok(Assessment {
        id,
        patient_id: text(record, field::PATIENT_ID),
        chief_complaint: text(record, field::CHIEF_COMPLAINT),
        symptoms: symptoms(id, record),
        status: status(record),
        created_at: timestamp(record, field::CREATED_AT, now),
        updated_at: timestamp(record, field::UPDATED_AT, now),
    })
}

pub fn normalize_protocol(record: &RawRecord, now: jiff::Timestamp) -> Result<Protocol, RecordError> {
    Ok(Protocol {
        id: required_id(EntityKind::Protocol, record)?,
        title: text(record, field::TITLE),
        category: text(record, field::CATEGORY),
        content: text(record, field::CONTENT),
        last_updated: timestamp(record, field::LAST_UPDATED, now),
    })
}

pub fn normalize_reference(record: &RawRecord) -> Result<Reference, RecordError> {
    Ok(Reference {
        id: required_id(EntityKind::Reference, record)?,
        title: text(record, field::TITLE),
        kind: ReferenceKind::from(text(record, field::TYPE)),
        description: text(record, field::DESCRIPTION),
        usage: optional_text(record, field::USAGE),
    })
}

/// The writable fields of a draft, with `symptoms` encoded for transport.
///
/// `created_at` is only sent on create; updates leave the stored value alone.
pub fn assessment_record(
    draft: &AssessmentDraft,
    created_at: Option<jiff::Timestamp>,
    updated_at: jiff::Timestamp,
) -> Result<RawRecord, CoreError> {
    let mut record = RawRecord::new();
    record.insert(field::PATIENT_ID.into(), Value::from(draft.patient_id.as_str()));
    record.insert(
        field::CHIEF_COMPLAINT.into(),
        Value::from(draft.chief_complaint.as_str()),
    );
    record.insert(
        field::SYMPTOMS.into(),
        Value::from(symptom::encode_symptoms(&draft.symptoms)?),
    );
    record.insert(field::STATUS.into(), Value::from(draft.status.label()));
    if let Some(created_at) = created_at {
        record.insert(field::CREATED_AT.into(), Value::from(created_at.to_string()));
    }
    record.insert(field::UPDATED_AT.into(), Value::from(updated_at.to_string()));
    Ok(record)
}
