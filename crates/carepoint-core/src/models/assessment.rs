use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog;
use crate::error::CoreError;
use crate::models::symptom::{self, DurationUnit, Onset, Symptom};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum AssessmentStatus {
    #[default]
    Draft,
    #[serde(rename = "In Progress")]
    InProgress,
    Complete,
}

impl AssessmentStatus {
    pub const ALL: [AssessmentStatus; 3] = [
        AssessmentStatus::Draft,
        AssessmentStatus::InProgress,
        AssessmentStatus::Complete,
    ];

    /// The label used on the wire and in status filters.
    pub fn label(self) -> &'static str {
        match self {
            AssessmentStatus::Draft => "Draft",
            AssessmentStatus::InProgress => "In Progress",
            AssessmentStatus::Complete => "Complete",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    /// Draft when nothing is rated, InProgress as soon as any symptom is.
    ///
    /// Never yields `Complete`; that status is only ever set by hand.
    pub fn derive(symptoms: &[Symptom]) -> Self {
        if symptoms.iter().any(Symptom::is_present) {
            AssessmentStatus::InProgress
        } else {
            AssessmentStatus::Draft
        }
    }
}

impl fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A stored assessment. `id` and both timestamps are assigned at the store
/// boundary, never by the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Assessment {
    pub id: i64,
    pub patient_id: String,
    pub chief_complaint: String,
    pub symptoms: Vec<Symptom>,
    pub status: AssessmentStatus,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl Assessment {
    pub fn to_draft(&self) -> AssessmentDraft {
        AssessmentDraft {
            patient_id: self.patient_id.clone(),
            chief_complaint: self.chief_complaint.clone(),
            symptoms: self.symptoms.clone(),
            status: self.status,
        }
    }
}

/// The id-less shape of an assessment as edited and submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AssessmentDraft {
    pub patient_id: String,
    pub chief_complaint: String,
    pub symptoms: Vec<Symptom>,
    pub status: AssessmentStatus,
}

impl AssessmentDraft {
    /// An empty draft carrying the full catalog, every severity at 0.
    pub fn seeded() -> Self {
        Self {
            patient_id: String::new(),
            chief_complaint: String::new(),
            symptoms: catalog::seed_symptoms(),
            status: AssessmentStatus::Draft,
        }
    }

    pub fn derived_status(&self) -> AssessmentStatus {
        AssessmentStatus::derive(&self.symptoms)
    }

    /// Both required text fields must be non-empty after trimming.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.patient_id.trim().is_empty() {
            return Err(CoreError::MissingField("patient_id".to_string()));
        }
        if self.chief_complaint.trim().is_empty() {
            return Err(CoreError::MissingField("chief_complaint".to_string()));
        }
        Ok(())
    }

    pub fn symptom(&self, id: u32) -> Option<&Symptom> {
        self.symptoms.iter().find(|s| s.id == id)
    }

    fn symptom_mut(&mut self, id: u32) -> Result<&mut Symptom, CoreError> {
        self.symptoms
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(CoreError::UnknownSymptom(id))
    }

    pub fn set_severity(&mut self, id: u32, severity: u8) -> Result<(), CoreError> {
        let severity = symptom::check_severity(severity)?;
        self.symptom_mut(id)?.severity = severity;
        Ok(())
    }

    pub fn set_duration(
        &mut self,
        id: u32,
        duration: Option<f64>,
        unit: DurationUnit,
    ) -> Result<(), CoreError> {
        let duration = symptom::check_duration(duration)?;
        let symptom = self.symptom_mut(id)?;
        symptom.duration = duration;
        symptom.duration_unit = unit;
        Ok(())
    }

    pub fn set_onset(&mut self, id: u32, onset: Option<Onset>) -> Result<(), CoreError> {
        self.symptom_mut(id)?.onset = onset;
        Ok(())
    }

    pub fn set_notes(&mut self, id: u32, notes: String) -> Result<(), CoreError> {
        self.symptom_mut(id)?.notes = notes;
        Ok(())
    }
}
