//! User-visible outcome notifications.
//!
//! Stores return every failure to their caller *and* hand a [`Notice`] to a
//! [`Notifier`]. The two channels are independent: a caller can match on the
//! returned error without caring how (or whether) the notice is rendered.

use std::sync::{Mutex, PoisonError};

use tracing::{info, warn};

use crate::entity::EntityKind;
use crate::error::RecordError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Load,
    Create,
    Update,
    Delete,
}

impl Action {
    fn verb(self) -> &'static str {
        match self {
            Action::Load => "load",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }

    fn past(self) -> &'static str {
        match self {
            Action::Load => "loaded",
            Action::Create => "created",
            Action::Update => "updated",
            Action::Delete => "deleted",
        }
    }
}

/// One distinguishable outcome of a store call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub outcome: Outcome,
    pub action: Action,
    pub entity: EntityKind,
    /// Short text suitable for a toast.
    pub message: String,
    /// The underlying error, for failures.
    pub detail: Option<String>,
}

impl Notice {
    pub fn success(action: Action, entity: EntityKind) -> Self {
        let noun = entity.noun();
        let mut message = format!("{noun} {} successfully", action.past());
        if let Some(first) = message.get_mut(..1) {
            first.make_ascii_uppercase();
        }
        Self {
            outcome: Outcome::Success,
            action,
            entity,
            message,
            detail: None,
        }
    }

    pub fn failure(action: Action, entity: EntityKind, error: &RecordError) -> Self {
        let message = match error {
            RecordError::Validation(_) => "Please fill in all required fields".to_string(),
            _ => format!("Failed to {} {}", action.verb(), entity.noun()),
        };
        Self {
            outcome: Outcome::Failure,
            action,
            entity,
            message,
            detail: Some(error.to_string()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.outcome == Outcome::Failure
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Sends notices to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.outcome {
            Outcome::Success => info!(entity = %notice.entity, "{}", notice.message),
            Outcome::Failure => warn!(
                entity = %notice.entity,
                detail = notice.detail.as_deref().unwrap_or_default(),
                "{}",
                notice.message
            ),
        }
    }
}

/// Keeps every notice in memory, in order.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn failures(&self) -> Vec<Notice> {
        self.notices().into_iter().filter(Notice::is_failure).collect()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}
