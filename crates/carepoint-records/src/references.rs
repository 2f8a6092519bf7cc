use std::sync::Arc;

use tracing::debug;

use carepoint_core::filter;
use carepoint_core::models::reference::{Reference, ReferenceKind};
use carepoint_storage::service::RecordService;

use crate::entity::EntityKind;
use crate::error::RecordError;
use crate::notify::{Action, Notice, Notifier};
use crate::wire;

const ENTITY: EntityKind = EntityKind::Reference;

/// Read-only access to medical reference tools.
#[derive(Clone)]
pub struct ReferenceStore {
    service: Arc<dyn RecordService>,
    notifier: Arc<dyn Notifier>,
}

impl ReferenceStore {
    pub fn new(service: Arc<dyn RecordService>, notifier: Arc<dyn Notifier>) -> Self {
        Self { service, notifier }
    }

    fn fail(&self, error: RecordError) -> RecordError {
        self.notifier
            .notify(Notice::failure(Action::Load, ENTITY, &error));
        error
    }

    pub async fn list(&self) -> Result<Vec<Reference>, RecordError> {
        let records = self
            .service
            .list(ENTITY.table())
            .await
            .map_err(|e| self.fail(RecordError::from_storage(ENTITY, e)))?;

        let mut references = records
            .iter()
            .map(wire::normalize_reference)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| self.fail(e))?;
        filter::sort_by_title(&mut references, |r| &r.title);

        debug!(count = references.len(), "loaded references");
        Ok(references)
    }

    pub async fn get(&self, id: i64) -> Result<Reference, RecordError> {
        let record = self
            .service
            .get(ENTITY.table(), id)
            .await
            .map_err(|e| self.fail(RecordError::from_storage(ENTITY, e)))?
            .ok_or_else(|| self.fail(RecordError::NotFound { entity: ENTITY, id }))?;

        wire::normalize_reference(&record).map_err(|e| self.fail(e))
    }

    pub async fn by_kind(&self, kind: &ReferenceKind) -> Result<Vec<Reference>, RecordError> {
        let mut references = self.list().await?;
        references.retain(|r| &r.kind == kind);
        Ok(references)
    }
}
