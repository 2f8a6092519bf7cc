//! Derived, read-only views shown alongside assessment lists.

use serde::Serialize;
use ts_rs::TS;

use crate::models::assessment::{Assessment, AssessmentStatus};
use crate::models::symptom::Symptom;

pub fn severity_label(severity: u8) -> &'static str {
    match severity {
        1 => "Mild",
        2 => "Moderate",
        3 => "Significant",
        4 => "Severe",
        5 => "Critical",
        _ => "None",
    }
}

/// Rated symptoms bucketed as mild (1–2), moderate (3) and severe (4+).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct SeverityBreakdown {
    pub mild: usize,
    pub moderate: usize,
    pub severe: usize,
}

impl SeverityBreakdown {
    pub fn of(symptoms: &[Symptom]) -> Self {
        let mut breakdown = Self::default();
        for s in symptoms {
            match s.severity {
                0 => {}
                1 | 2 => breakdown.mild += 1,
                3 => breakdown.moderate += 1,
                _ => breakdown.severe += 1,
            }
        }
        breakdown
    }

    /// Symptoms with any severity above 0.
    pub fn active(&self) -> usize {
        self.mild + self.moderate + self.severe
    }
}

/// Per-status totals for a collection of assessments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct AssessmentSummary {
    pub total: usize,
    pub draft: usize,
    pub in_progress: usize,
    pub complete: usize,
}

impl AssessmentSummary {
    pub fn of(assessments: &[Assessment]) -> Self {
        let mut summary = Self {
            total: assessments.len(),
            ..Self::default()
        };
        for a in assessments {
            match a.status {
                AssessmentStatus::Draft => summary.draft += 1,
                AssessmentStatus::InProgress => summary.in_progress += 1,
                AssessmentStatus::Complete => summary.complete += 1,
            }
        }
        summary
    }
}
