//! Record tables and object key conventions.
//!
//! Pure string functions defining where records live in the bucket.

use std::fmt;

/// The three logical tables of the record service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Table {
    Assessments,
    Protocols,
    References,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Assessments => "assessments",
            Table::Protocols => "protocols",
            Table::References => "references",
        }
    }

    pub fn prefix(self) -> String {
        format!("{}/", self.name())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn record(table: Table, id: i64) -> String {
    format!("{}/{id}.json", table.name())
}

/// Recover the record id from a key produced by [`record`].
pub fn parse_record_id(table: Table, key: &str) -> Option<i64> {
    key.strip_prefix(&table.prefix())?
        .strip_suffix(".json")?
        .parse()
        .ok()
}

pub fn sequence(table: Table) -> String {
    format!("_state/sequences/{}.json", table.name())
}
