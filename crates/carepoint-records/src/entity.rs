use std::fmt;

use carepoint_core::record_keys::Table;

/// The kinds of record the stores deal in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Assessment,
    Protocol,
    Reference,
}

impl EntityKind {
    pub fn table(self) -> Table {
        match self {
            EntityKind::Assessment => Table::Assessments,
            EntityKind::Protocol => Table::Protocols,
            EntityKind::Reference => Table::References,
        }
    }

    pub fn noun(self) -> &'static str {
        match self {
            EntityKind::Assessment => "assessment",
            EntityKind::Protocol => "protocol",
            EntityKind::Reference => "reference",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}
