use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// What kind of tool a reference entry points at.
///
/// Serialized as its display label. Labels outside the known set are kept
/// verbatim in `Other`; an absent type is `Other("")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReferenceKind {
    Calculator,
    DrugReference,
    Guidelines,
    DiagnosticTool,
    Other(String),
}

impl ReferenceKind {
    pub fn label(&self) -> &str {
        match self {
            ReferenceKind::Calculator => "Calculator",
            ReferenceKind::DrugReference => "Drug Reference",
            ReferenceKind::Guidelines => "Guidelines",
            ReferenceKind::DiagnosticTool => "Diagnostic Tool",
            ReferenceKind::Other(label) => label,
        }
    }
}

impl From<String> for ReferenceKind {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Calculator" => ReferenceKind::Calculator,
            "Drug Reference" => ReferenceKind::DrugReference,
            "Guidelines" => ReferenceKind::Guidelines,
            "Diagnostic Tool" => ReferenceKind::DiagnosticTool,
            _ => ReferenceKind::Other(label),
        }
    }
}

impl From<ReferenceKind> for String {
    fn from(kind: ReferenceKind) -> Self {
        match kind {
            ReferenceKind::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A medical reference tool (calculator, drug monograph, guideline...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Reference {
    pub id: i64,
    pub title: String,
    #[ts(type = "string")]
    pub kind: ReferenceKind,
    pub description: String,
    pub usage: Option<String>,
}
