use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Number of content characters shown on a protocol card.
pub const EXCERPT_CHARS: usize = 150;

/// A clinical protocol. Owned entirely by the record service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Protocol {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub content: String,
    pub last_updated: jiff::Timestamp,
}

impl Protocol {
    /// The leading [`EXCERPT_CHARS`] characters of the content, with an
    /// ellipsis when anything was cut.
    pub fn excerpt(&self) -> String {
        let mut chars = self.content.chars();
        let head: String = chars.by_ref().take(EXCERPT_CHARS).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}
