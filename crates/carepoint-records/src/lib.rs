//! carepoint-records
//!
//! Typed CRUD façade over a [`RecordService`]: one store per entity kind,
//! explicit normalization of loosely-shaped records, a typed error taxonomy,
//! and a notification sink that hears about every outcome.

use std::sync::Arc;

use carepoint_storage::service::RecordService;

pub mod assessments;
pub mod entity;
pub mod error;
pub mod notify;
pub mod protocols;
pub mod references;
pub mod wire;

use assessments::AssessmentStore;
use notify::Notifier;
use protocols::ProtocolStore;
use references::ReferenceStore;

/// The three stores, sharing one service and one notifier.
#[derive(Clone)]
pub struct Stores {
    pub assessments: AssessmentStore,
    pub protocols: ProtocolStore,
    pub references: ReferenceStore,
}

impl Stores {
    pub fn new(service: Arc<dyn RecordService>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            assessments: AssessmentStore::new(service.clone(), notifier.clone()),
            protocols: ProtocolStore::new(service.clone(), notifier.clone()),
            references: ReferenceStore::new(service, notifier),
        }
    }
}
