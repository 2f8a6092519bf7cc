use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use carepoint_core::filter;
use carepoint_core::models::assessment::{Assessment, AssessmentDraft};
use carepoint_storage::service::{ID_FIELD, RecordOutcome, RecordService};

use crate::entity::EntityKind;
use crate::error::RecordError;
use crate::notify::{Action, Notice, Notifier};
use crate::wire;

const ENTITY: EntityKind = EntityKind::Assessment;

/// Read/write access to assessments.
#[derive(Clone)]
pub struct AssessmentStore {
    service: Arc<dyn RecordService>,
    notifier: Arc<dyn Notifier>,
}

impl AssessmentStore {
    pub fn new(service: Arc<dyn RecordService>, notifier: Arc<dyn Notifier>) -> Self {
        Self { service, notifier }
    }

    /// Hand a failure to the notifier and give it back to the caller.
    fn fail(&self, action: Action, error: RecordError) -> RecordError {
        self.notifier.notify(Notice::failure(action, ENTITY, &error));
        error
    }

    fn succeed(&self, action: Action) {
        self.notifier.notify(Notice::success(action, ENTITY));
    }

    /// Check the required fields of a draft without contacting the service.
    /// A failure is reported like any other.
    pub fn validate(&self, action: Action, draft: &AssessmentDraft) -> Result<(), RecordError> {
        draft
            .validate()
            .map_err(|e| self.fail(action, RecordError::Validation(e)))
    }

    /// All assessments, newest first.
    pub async fn list(&self) -> Result<Vec<Assessment>, RecordError> {
        let records = self
            .service
            .list(ENTITY.table())
            .await
            .map_err(|e| self.fail(Action::Load, RecordError::from_storage(ENTITY, e)))?;

        let now = jiff::Timestamp::now();
        let mut assessments = records
            .iter()
            .map(|r| wire::normalize_assessment(r, now))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| self.fail(Action::Load, e))?;
        filter::sort_newest_first(&mut assessments);

        debug!(count = assessments.len(), "loaded assessments");
        Ok(assessments)
    }

    pub async fn get(&self, id: i64) -> Result<Assessment, RecordError> {
        let record = self
            .service
            .get(ENTITY.table(), id)
            .await
            .map_err(|e| self.fail(Action::Load, RecordError::from_storage(ENTITY, e)))?
            .ok_or_else(|| self.fail(Action::Load, RecordError::NotFound { entity: ENTITY, id }))?;

        wire::normalize_assessment(&record, jiff::Timestamp::now())
            .map_err(|e| self.fail(Action::Load, e))
    }

    /// Store a new assessment. Both timestamps are set to the same instant;
    /// the service assigns the id.
    pub async fn create(&self, draft: &AssessmentDraft) -> Result<Assessment, RecordError> {
        self.validate(Action::Create, draft)?;

        let now = jiff::Timestamp::now();
        let record = wire::assessment_record(draft, Some(now), now)
            .map_err(|source| self.fail(Action::Create, RecordError::Encode { entity: ENTITY, source }))?;

        let response = self
            .service
            .create(ENTITY.table(), vec![record])
            .await
            .map_err(|e| self.fail(Action::Create, RecordError::from_storage(ENTITY, e)))?;

        let saved = match response.results.into_iter().next() {
            Some(RecordOutcome::Saved(saved)) => saved,
            Some(RecordOutcome::Rejected { message }) => {
                return Err(self.fail(Action::Create, RecordError::service(ENTITY, message)));
            }
            other => {
                let message = format!("unexpected create response: {other:?}");
                return Err(self.fail(Action::Create, RecordError::service(ENTITY, message)));
            }
        };

        let assessment =
            wire::normalize_assessment(&saved, now).map_err(|e| self.fail(Action::Create, e))?;
        info!(id = assessment.id, patient_id = %assessment.patient_id, "assessment created");
        self.succeed(Action::Create);
        Ok(assessment)
    }

    /// Store several new assessments in one call.
    ///
    /// When only some are stored the error is
    /// [`RecordError::PartialWriteFailure`], carrying the ones that were, so a
    /// caller can tell "none saved" apart from "some saved".
    pub async fn create_many(
        &self,
        drafts: &[AssessmentDraft],
    ) -> Result<Vec<Assessment>, RecordError> {
        for draft in drafts {
            self.validate(Action::Create, draft)?;
        }
        if drafts.is_empty() {
            return Ok(Vec::new());
        }

        let now = jiff::Timestamp::now();
        let records = drafts
            .iter()
            .map(|d| wire::assessment_record(d, Some(now), now))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| self.fail(Action::Create, RecordError::Encode { entity: ENTITY, source }))?;

        let response = self
            .service
            .create(ENTITY.table(), records)
            .await
            .map_err(|e| self.fail(Action::Create, RecordError::from_storage(ENTITY, e)))?;

        let mut saved = Vec::new();
        let mut rejected = Vec::new();
        for outcome in response.results {
            match outcome {
                RecordOutcome::Saved(record) => match wire::normalize_assessment(&record, now) {
                    Ok(a) => saved.push(a),
                    Err(e) => rejected.push(e.to_string()),
                },
                RecordOutcome::Rejected { message } => rejected.push(message),
                other => rejected.push(format!("unexpected create response: {other:?}")),
            }
        }

        if saved.is_empty() {
            let message = rejected.join("; ");
            return Err(self.fail(Action::Create, RecordError::service(ENTITY, message)));
        }
        if !rejected.is_empty() {
            info!(saved = saved.len(), rejected = rejected.len(), "assessment batch partially stored");
            return Err(self.fail(
                Action::Create,
                RecordError::PartialWriteFailure { saved, rejected },
            ));
        }

        info!(count = saved.len(), "assessments created");
        self.succeed(Action::Create);
        Ok(saved)
    }

    /// Replace the editable fields of an existing assessment. `updated_at`
    /// is refreshed; `created_at` is left as stored.
    pub async fn update(&self, id: i64, draft: &AssessmentDraft) -> Result<Assessment, RecordError> {
        self.validate(Action::Update, draft)?;

        let now = jiff::Timestamp::now();
        let mut record = wire::assessment_record(draft, None, now)
            .map_err(|source| self.fail(Action::Update, RecordError::Encode { entity: ENTITY, source }))?;
        record.insert(ID_FIELD.to_string(), Value::from(id));

        let response = self
            .service
            .update(ENTITY.table(), vec![record])
            .await
            .map_err(|e| self.fail(Action::Update, RecordError::from_storage(ENTITY, e)))?;

        let saved = match response.results.into_iter().next() {
            Some(RecordOutcome::Saved(saved)) => saved,
            Some(RecordOutcome::Missing(_)) => {
                return Err(self.fail(Action::Update, RecordError::NotFound { entity: ENTITY, id }));
            }
            Some(RecordOutcome::Rejected { message }) => {
                return Err(self.fail(Action::Update, RecordError::service(ENTITY, message)));
            }
            other => {
                let message = format!("unexpected update response: {other:?}");
                return Err(self.fail(Action::Update, RecordError::service(ENTITY, message)));
            }
        };

        let assessment =
            wire::normalize_assessment(&saved, now).map_err(|e| self.fail(Action::Update, e))?;
        info!(id, "assessment updated");
        self.succeed(Action::Update);
        Ok(assessment)
    }

    /// Delete an assessment. `Ok(true)` only when the service confirms it.
    pub async fn delete(&self, id: i64) -> Result<bool, RecordError> {
        let response = self
            .service
            .delete(ENTITY.table(), vec![id])
            .await
            .map_err(|e| self.fail(Action::Delete, RecordError::from_storage(ENTITY, e)))?;

        match response.results.into_iter().next() {
            Some(RecordOutcome::Deleted(_)) => {
                info!(id, "assessment deleted");
                self.succeed(Action::Delete);
                Ok(true)
            }
            Some(RecordOutcome::Missing(_)) => {
                Err(self.fail(Action::Delete, RecordError::NotFound { entity: ENTITY, id }))
            }
            Some(RecordOutcome::Rejected { message }) => {
                Err(self.fail(Action::Delete, RecordError::service(ENTITY, message)))
            }
            other => {
                warn!(id, response = ?other, "delete not confirmed by the service");
                let message = format!("delete of {id} was not confirmed");
                self.fail(Action::Delete, RecordError::service(ENTITY, message));
                Ok(false)
            }
        }
    }
}
