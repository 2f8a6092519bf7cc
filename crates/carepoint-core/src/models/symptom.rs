use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Highest severity on the 0–5 rating scale. 0 means "not present".
pub const MAX_SEVERITY: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum DurationUnit {
    Minutes,
    Hours,
    #[default]
    Days,
    Weeks,
    Months,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Onset {
    Sudden,
    Gradual,
    Intermittent,
    Constant,
}

/// One rated symptom inside an assessment. Never persisted on its own.
///
/// `id` is the 1-based position of the symptom in the static catalog, so the
/// binding between stored data and a catalog name is positional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Symptom {
    #[serde(alias = "Id")]
    pub id: u32,
    /// Rebuilt from the catalog on load; older blobs may omit it.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub severity: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default)]
    pub duration_unit: DurationUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onset: Option<Onset>,
    #[serde(default)]
    pub notes: String,
}

impl Symptom {
    /// A catalog-seeded symptom with severity 0 and no detail.
    pub fn unrated(id: u32, name: &str, category: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            category: category.to_string(),
            severity: 0,
            duration: None,
            duration_unit: DurationUnit::default(),
            onset: None,
            notes: String::new(),
        }
    }

    pub fn is_present(&self) -> bool {
        self.severity > 0
    }
}

pub fn check_severity(severity: u8) -> Result<u8, CoreError> {
    if severity > MAX_SEVERITY {
        return Err(CoreError::SeverityOutOfRange(severity));
    }
    Ok(severity)
}

/// `None` clears the duration; a value must be finite and strictly positive.
pub fn check_duration(duration: Option<f64>) -> Result<Option<f64>, CoreError> {
    match duration {
        Some(d) if !d.is_finite() || d <= 0.0 => Err(CoreError::InvalidDuration(d)),
        other => Ok(other),
    }
}

/// Encode a symptom sequence into the text blob the record service stores.
pub fn encode_symptoms(symptoms: &[Symptom]) -> Result<String, CoreError> {
    Ok(serde_json::to_string(symptoms)?)
}

/// Decode a blob produced by [`encode_symptoms`]. Order is preserved.
pub fn decode_symptoms(blob: &str) -> Result<Vec<Symptom>, CoreError> {
    if blob.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(blob)?)
}
