use std::sync::Arc;

use tracing::debug;

use carepoint_core::filter;
use carepoint_core::models::protocol::Protocol;
use carepoint_storage::service::RecordService;

use crate::entity::EntityKind;
use crate::error::RecordError;
use crate::notify::{Action, Notice, Notifier};
use crate::wire;

const ENTITY: EntityKind = EntityKind::Protocol;

/// Read-only access to clinical protocols.
#[derive(Clone)]
pub struct ProtocolStore {
    service: Arc<dyn RecordService>,
    notifier: Arc<dyn Notifier>,
}

impl ProtocolStore {
    pub fn new(service: Arc<dyn RecordService>, notifier: Arc<dyn Notifier>) -> Self {
        Self { service, notifier }
    }

    fn fail(&self, error: RecordError) -> RecordError {
        self.notifier
            .notify(Notice::failure(Action::Load, ENTITY, &error));
        error
    }

    /// All protocols, ordered by title.
    pub async fn list(&self) -> Result<Vec<Protocol>, RecordError> {
        let records = self
            .service
            .list(ENTITY.table())
            .await
            .map_err(|e| self.fail(RecordError::from_storage(ENTITY, e)))?;

        let now = jiff::Timestamp::now();
        let mut protocols = records
            .iter()
            .map(|r| wire::normalize_protocol(r, now))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| self.fail(e))?;
        filter::sort_by_title(&mut protocols, |p| &p.title);

        debug!(count = protocols.len(), "loaded protocols");
        Ok(protocols)
    }

    pub async fn get(&self, id: i64) -> Result<Protocol, RecordError> {
        let record = self
            .service
            .get(ENTITY.table(), id)
            .await
            .map_err(|e| self.fail(RecordError::from_storage(ENTITY, e)))?
            .ok_or_else(|| self.fail(RecordError::NotFound { entity: ENTITY, id }))?;

        wire::normalize_protocol(&record, jiff::Timestamp::now()).map_err(|e| self.fail(e))
    }

    /// Protocols whose category equals `category` exactly. An unknown
    /// category yields an empty list, not an error.
    pub async fn by_category(&self, category: &str) -> Result<Vec<Protocol>, RecordError> {
        let mut protocols = self.list().await?;
        protocols.retain(|p| p.category == category);
        Ok(protocols)
    }
}
