//! List screens: a loaded collection plus a free-text query and a category
//! selection. Filtering happens here, never in the store.

use tracing::{debug, warn};

use carepoint_core::filter::{self, ALL, Listable};
use carepoint_core::models::assessment::Assessment;
use carepoint_core::models::protocol::Protocol;
use carepoint_core::models::reference::Reference;
use carepoint_core::summary::AssessmentSummary;
use carepoint_records::assessments::AssessmentStore;
use carepoint_records::error::RecordError;
use carepoint_records::protocols::ProtocolStore;
use carepoint_records::references::ReferenceStore;

/// Filter state shared by every board.
#[derive(Debug, Clone)]
pub struct Board<T> {
    items: Vec<T>,
    query: String,
    category: String,
}

impl<T> Default for Board<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            query: String::new(),
            category: ALL.to_string(),
        }
    }
}

impl<T: Listable + Clone> Board<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn select_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
    }

    /// Items matching the current query and category, in load order.
    pub fn visible(&self) -> Vec<T> {
        filter::filter_listable(&self.items, &self.query, &self.category)
    }

    pub fn options(&self) -> Vec<String> {
        filter::category_options(&self.items, T::category)
    }

    pub fn counts(&self) -> Vec<(String, usize)> {
        filter::category_counts(&self.items, T::category)
    }

    fn replace(&mut self, items: Vec<T>) {
        self.items = items;
    }
}

pub struct AssessmentBoard {
    store: AssessmentStore,
    board: Board<Assessment>,
    stale: bool,
}

impl AssessmentBoard {
    pub fn new(store: AssessmentStore) -> Self {
        Self {
            store,
            board: Board::default(),
            stale: false,
        }
    }

    pub async fn load(&mut self) -> Result<(), RecordError> {
        let items = self.store.list().await?;
        self.board.replace(items);
        self.stale = false;
        Ok(())
    }

    pub fn items(&self) -> &[Assessment] {
        self.board.items()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.board.set_query(query);
    }

    /// Select a status label, or [`ALL`].
    pub fn select_category(&mut self, status: impl Into<String>) {
        self.board.select_category(status);
    }

    pub fn visible(&self) -> Vec<Assessment> {
        self.board.visible()
    }

    /// Status filter options: [`ALL`], then the statuses present in the
    /// loaded list in first-seen order.
    pub fn options(&self) -> Vec<String> {
        self.board.options()
    }

    pub fn counts(&self) -> Vec<(String, usize)> {
        self.board.counts()
    }

    pub fn summary(&self) -> AssessmentSummary {
        AssessmentSummary::of(self.board.items())
    }

    /// True when the list may have drifted from the service, after a delete
    /// whose follow-up reload failed.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Delete an assessment, then reload.
    ///
    /// Returns whether the service confirmed the delete. If the reload fails
    /// the entry is dropped locally, the rest keep their order, and the board
    /// is marked stale.
    pub async fn delete(&mut self, id: i64) -> Result<bool, RecordError> {
        if !self.store.delete(id).await? {
            return Ok(false);
        }

        match self.store.list().await {
            Ok(items) => {
                self.board.replace(items);
                self.stale = false;
            }
            Err(e) => {
                warn!(id, error = %e, "reload after delete failed, removing locally");
                self.board.items.retain(|a| a.id != id);
                self.stale = true;
            }
        }
        debug!(id, remaining = self.board.items.len(), "assessment removed from board");
        Ok(true)
    }
}

pub struct ProtocolBoard {
    store: ProtocolStore,
    board: Board<Protocol>,
}

impl ProtocolBoard {
    pub fn new(store: ProtocolStore) -> Self {
        Self {
            store,
            board: Board::default(),
        }
    }

    pub async fn load(&mut self) -> Result<(), RecordError> {
        let items = self.store.list().await?;
        self.board.replace(items);
        Ok(())
    }

    pub fn board(&self) -> &Board<Protocol> {
        &self.board
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.board.set_query(query);
    }

    pub fn select_category(&mut self, category: impl Into<String>) {
        self.board.select_category(category);
    }

    pub fn visible(&self) -> Vec<Protocol> {
        self.board.visible()
    }

    pub fn options(&self) -> Vec<String> {
        self.board.options()
    }

    pub fn counts(&self) -> Vec<(String, usize)> {
        self.board.counts()
    }
}

pub struct ReferenceBoard {
    store: ReferenceStore,
    board: Board<Reference>,
}

impl ReferenceBoard {
    pub fn new(store: ReferenceStore) -> Self {
        Self {
            store,
            board: Board::default(),
        }
    }

    pub async fn load(&mut self) -> Result<(), RecordError> {
        let items = self.store.list().await?;
        self.board.replace(items);
        Ok(())
    }

    pub fn board(&self) -> &Board<Reference> {
        &self.board
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.board.set_query(query);
    }

    /// Select a reference type label, or [`ALL`].
    pub fn select_category(&mut self, kind: impl Into<String>) {
        self.board.select_category(kind);
    }

    pub fn visible(&self) -> Vec<Reference> {
        self.board.visible()
    }

    pub fn options(&self) -> Vec<String> {
        self.board.options()
    }

    pub fn counts(&self) -> Vec<(String, usize)> {
        self.board.counts()
    }
}
