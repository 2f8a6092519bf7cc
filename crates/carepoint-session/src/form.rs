//! The create/edit assessment form.
//!
//! A form is created in one of two modes. [`AssessmentForm::new`] starts a
//! fresh draft seeded with the whole symptom catalog and is immediately
//! editable. [`AssessmentForm::edit`] starts in [`FormPhase::Loading`] and
//! becomes editable once [`load`](AssessmentForm::load) succeeds.
//!
//! ```text
//! Loading ──ok──▶ Ready ──submit──▶ Submitting ──ok──▶ Submitted
//!    │              ▲                    │
//!   err             └───────err──────────┘
//!    ▼
//! LoadFailed ──retry──▶ Loading
//! ```
//!
//! Symptoms are bound to the catalog by position: the symptom with id `n` is
//! always catalog entry `n`. A loaded record is realigned onto the current
//! catalog, so every edit session shows the full list in catalog order.

use tracing::{debug, info};

use carepoint_core::catalog;
use carepoint_core::error::CoreError;
use carepoint_core::models::assessment::{Assessment, AssessmentDraft, AssessmentStatus};
use carepoint_core::models::symptom::{DurationUnit, Onset, Symptom};
use carepoint_records::assessments::AssessmentStore;
use carepoint_records::error::RecordError;
use carepoint_records::notify::Action;

use crate::error::FormError;
use crate::route::Route;

#[derive(Debug)]
pub enum FormPhase {
    Loading,
    LoadFailed(RecordError),
    Ready,
    Submitting,
    /// Terminal. Holds the assessment as stored.
    Submitted(Assessment),
}

impl FormPhase {
    pub fn name(&self) -> &'static str {
        match self {
            FormPhase::Loading => "loading",
            FormPhase::LoadFailed(_) => "load-failed",
            FormPhase::Ready => "ready",
            FormPhase::Submitting => "submitting",
            FormPhase::Submitted(_) => "submitted",
        }
    }
}

/// One user edit. Symptom edits are keyed by symptom id.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEdit {
    PatientId(String),
    ChiefComplaint(String),
    Severity {
        symptom_id: u32,
        severity: u8,
    },
    Duration {
        symptom_id: u32,
        duration: Option<f64>,
        unit: DurationUnit,
    },
    Onset {
        symptom_id: u32,
        onset: Option<Onset>,
    },
    Notes {
        symptom_id: u32,
        notes: String,
    },
}

/// Apply `edit` to a copy of `draft`. The input is never modified.
pub fn reduce(draft: &AssessmentDraft, edit: FormEdit) -> Result<AssessmentDraft, CoreError> {
    let mut next = draft.clone();
    match edit {
        FormEdit::PatientId(value) => next.patient_id = value,
        FormEdit::ChiefComplaint(value) => next.chief_complaint = value,
        FormEdit::Severity {
            symptom_id,
            severity,
        } => next.set_severity(symptom_id, severity)?,
        FormEdit::Duration {
            symptom_id,
            duration,
            unit,
        } => next.set_duration(symptom_id, duration, unit)?,
        FormEdit::Onset { symptom_id, onset } => next.set_onset(symptom_id, onset)?,
        FormEdit::Notes { symptom_id, notes } => next.set_notes(symptom_id, notes)?,
    }
    Ok(next)
}

pub struct AssessmentForm {
    store: AssessmentStore,
    editing: Option<i64>,
    draft: AssessmentDraft,
    phase: FormPhase,
    next_route: Option<Route>,
}

impl AssessmentForm {
    /// A blank form for a new assessment, ready to edit.
    pub fn new(store: AssessmentStore) -> Self {
        Self {
            store,
            editing: None,
            draft: AssessmentDraft::seeded(),
            phase: FormPhase::Ready,
            next_route: None,
        }
    }

    /// A form for an existing assessment. Call [`load`](Self::load) next.
    pub fn edit(store: AssessmentStore, id: i64) -> Self {
        Self {
            store,
            editing: Some(id),
            draft: AssessmentDraft::seeded(),
            phase: FormPhase::Loading,
            next_route: None,
        }
    }

    pub fn route(&self) -> Route {
        Route::AssessmentForm(self.editing)
    }

    pub fn editing(&self) -> Option<i64> {
        self.editing
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn draft(&self) -> &AssessmentDraft {
        &self.draft
    }

    /// Where the frontend should go next, once the form is done.
    pub fn next_route(&self) -> Option<Route> {
        self.next_route
    }

    /// The status the draft would be saved with.
    pub fn status(&self) -> AssessmentStatus {
        self.draft.derived_status()
    }

    /// The draft's symptoms grouped by catalog category, in catalog order.
    pub fn sections(&self) -> Vec<(&'static str, Vec<&Symptom>)> {
        catalog::grouped_by_category()
            .into_iter()
            .map(|(category, entries)| {
                let symptoms = entries
                    .iter()
                    .filter_map(|(id, _)| self.draft.symptom(*id))
                    .collect();
                (category, symptoms)
            })
            .collect()
    }

    fn wrong_phase(&self, operation: &'static str) -> FormError {
        FormError::WrongPhase {
            operation,
            phase: self.phase.name(),
        }
    }

    /// A dropped submit future leaves the phase at `Submitting`; that is
    /// as good as `Ready`.
    fn is_editable(&self) -> bool {
        matches!(self.phase, FormPhase::Ready | FormPhase::Submitting)
    }

    pub async fn load(&mut self) -> Result<(), FormError> {
        match self.editing {
            Some(id) if matches!(self.phase, FormPhase::Loading) => self.fetch(id).await,
            _ => Err(self.wrong_phase("load")),
        }
    }

    /// Re-attempt a failed load.
    pub async fn retry(&mut self) -> Result<(), FormError> {
        match self.editing {
            Some(id) if matches!(self.phase, FormPhase::LoadFailed(_)) => self.fetch(id).await,
            _ => Err(self.wrong_phase("retry")),
        }
    }

    async fn fetch(&mut self, id: i64) -> Result<(), FormError> {
        self.phase = FormPhase::Loading;
        match self.store.get(id).await {
            Ok(assessment) => {
                let mut draft = assessment.to_draft();
                draft.symptoms = catalog::align_to_catalog(&assessment.symptoms);
                self.draft = draft;
                self.phase = FormPhase::Ready;
                debug!(id, "assessment loaded into form");
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                self.phase = FormPhase::LoadFailed(e);
                Err(FormError::Load { id, message })
            }
        }
    }

    pub fn apply(&mut self, edit: FormEdit) -> Result<(), FormError> {
        if !self.is_editable() {
            return Err(self.wrong_phase("edit"));
        }
        self.draft = reduce(&self.draft, edit)?;
        Ok(())
    }

    /// Validate, then create or update.
    ///
    /// A validation failure leaves the form as it was without contacting the
    /// service. A service failure returns the form to `Ready` with the draft
    /// untouched, so the user can try again.
    pub async fn submit(&mut self) -> Result<Assessment, FormError> {
        if !self.is_editable() {
            return Err(self.wrong_phase("submit"));
        }
        self.phase = FormPhase::Ready;

        let action = match self.editing {
            Some(_) => Action::Update,
            None => Action::Create,
        };
        self.store.validate(action, &self.draft)?;

        let mut draft = self.draft.clone();
        draft.status = draft.derived_status();

        self.phase = FormPhase::Submitting;
        let result = match self.editing {
            Some(id) => self.store.update(id, &draft).await,
            None => self.store.create(&draft).await,
        };

        match result {
            Ok(saved) => {
                info!(id = saved.id, status = %saved.status, "assessment submitted");
                self.draft = draft;
                self.phase = FormPhase::Submitted(saved.clone());
                self.next_route = Some(Route::Assessments);
                Ok(saved)
            }
            Err(e) => {
                self.phase = FormPhase::Ready;
                Err(e.into())
            }
        }
    }

    /// Abandon the form. Nothing is saved.
    pub fn cancel(&mut self) -> Route {
        self.next_route = Some(Route::Assessments);
        Route::Assessments
    }
}
