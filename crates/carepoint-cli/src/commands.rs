//! Command bodies. Each returns the text to print so that the binary stays a
//! thin dispatcher.

use carepoint_core::catalog;
use carepoint_core::models::assessment::Assessment;
use carepoint_core::models::protocol::Protocol;
use carepoint_core::models::reference::Reference;
use carepoint_core::models::symptom::Symptom;
use carepoint_core::summary::{SeverityBreakdown, severity_label};
use carepoint_records::Stores;
use carepoint_session::form::{AssessmentForm, FormEdit};
use carepoint_session::lists::{AssessmentBoard, ProtocolBoard, ReferenceBoard};

use crate::config::ConfigInfo;

/// Parse `NAME=N`, where NAME is a catalog symptom name (any case).
pub fn parse_severity(arg: &str) -> Result<(u32, u8), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=SEVERITY, got {arg:?}"))?;
    let id = catalog::id_for(name.trim()).ok_or_else(|| format!("unknown symptom {name:?}"))?;
    let severity = value
        .trim()
        .parse::<u8>()
        .map_err(|e| format!("bad severity {value:?}: {e}"))?;
    Ok((id, severity))
}

/// Join lines, each terminated by a newline.
fn lines(rows: impl IntoIterator<Item = String>) -> String {
    rows.into_iter().map(|row| row + "\n").collect()
}

pub fn catalog_text() -> String {
    lines(
        catalog::grouped_by_category()
            .into_iter()
            .flat_map(|(category, entries)| {
                std::iter::once(category.to_string()).chain(
                    entries
                        .into_iter()
                        .map(|(id, entry)| format!("  {id:>2}  {}", entry.name)),
                )
            }),
    )
}

pub fn config_text(info: &ConfigInfo) -> eyre::Result<String> {
    Ok(serde_json::to_string_pretty(info)?)
}

fn assessment_row(a: &Assessment) -> String {
    let active = SeverityBreakdown::of(&a.symptoms).active();
    format!(
        "#{:<5} {:<12} {:<12} {:>2} rated  {}  {}",
        a.id,
        a.patient_id,
        a.status.label(),
        active,
        a.created_at.strftime("%Y-%m-%d %H:%M"),
        a.chief_complaint,
    )
}

fn symptom_line(s: &Symptom) -> String {
    let mut line = format!(
        "    {:<22} {} ({})",
        s.name,
        s.severity,
        severity_label(s.severity)
    );
    if let Some(d) = s.duration {
        line.push_str(&format!(", {d} {:?}", s.duration_unit));
    }
    if let Some(onset) = s.onset {
        line.push_str(&format!(", {onset:?}"));
    }
    if !s.notes.is_empty() {
        line.push_str(&format!(" - {}", s.notes));
    }
    line
}

pub fn assessment_detail(a: &Assessment) -> String {
    let breakdown = SeverityBreakdown::of(&a.symptoms);
    let header = [
        format!("Assessment #{}", a.id),
        format!("  patient:   {}", a.patient_id),
        format!("  complaint: {}", a.chief_complaint),
        format!("  status:    {}", a.status),
        format!("  created:   {}", a.created_at),
        format!("  updated:   {}", a.updated_at),
        format!(
            "  severity:  {} mild, {} moderate, {} severe",
            breakdown.mild, breakdown.moderate, breakdown.severe
        ),
    ];
    let rated = a.symptoms.iter().filter(|s| s.is_present()).map(symptom_line);
    lines(header.into_iter().chain(rated))
}

pub async fn list_assessments(stores: &Stores, query: &str, status: &str) -> eyre::Result<String> {
    let mut board = AssessmentBoard::new(stores.assessments.clone());
    board.load().await?;
    board.set_query(query);
    board.select_category(status);

    let summary = board.summary();
    let totals = format!(
        "{} total: {} draft, {} in progress, {} complete",
        summary.total, summary.draft, summary.in_progress, summary.complete
    );
    let rows = board.visible().iter().map(assessment_row).collect::<Vec<_>>();
    Ok(lines(rows.into_iter().chain(std::iter::once(totals))))
}

pub async fn show_assessment(stores: &Stores, id: i64) -> eyre::Result<String> {
    let assessment = stores.assessments.get(id).await?;
    Ok(assessment_detail(&assessment))
}

/// Create an assessment through the same form model an interactive
/// frontend would use.
pub async fn new_assessment(
    stores: &Stores,
    patient_id: String,
    chief_complaint: String,
    severities: &[(u32, u8)],
) -> eyre::Result<String> {
    let mut form = AssessmentForm::new(stores.assessments.clone());
    form.apply(FormEdit::PatientId(patient_id))?;
    form.apply(FormEdit::ChiefComplaint(chief_complaint))?;
    for &(symptom_id, severity) in severities {
        form.apply(FormEdit::Severity {
            symptom_id,
            severity,
        })?;
    }

    let saved = form.submit().await?;
    Ok(assessment_detail(&saved))
}

pub async fn delete_assessment(stores: &Stores, id: i64) -> eyre::Result<String> {
    let mut board = AssessmentBoard::new(stores.assessments.clone());
    if !board.delete(id).await? {
        return Err(eyre::eyre!("delete of assessment {id} was not confirmed"));
    }
    Ok(format!("deleted assessment #{id}\n"))
}

fn protocol_row(p: &Protocol) -> String {
    format!(
        "#{:<5} {:<16} {}\n       {}",
        p.id,
        p.category,
        p.title,
        p.excerpt()
    )
}

pub async fn list_protocols(stores: &Stores, query: &str, category: &str) -> eyre::Result<String> {
    let mut board = ProtocolBoard::new(stores.protocols.clone());
    board.load().await?;
    board.set_query(query);
    board.select_category(category);

    let counts = board
        .counts()
        .into_iter()
        .map(|(category, n)| format!("{category}: {n}"))
        .collect::<Vec<_>>()
        .join(", ");
    let rows = board.visible().iter().map(protocol_row).collect::<Vec<_>>();
    Ok(lines(
        rows.into_iter()
            .chain(std::iter::once(format!("categories: {counts}"))),
    ))
}

fn reference_row(r: &Reference) -> String {
    let mut row = format!("#{:<5} {:<16} {}", r.id, r.kind, r.title);
    if !r.description.is_empty() {
        row.push_str(&format!("\n       {}", r.description));
    }
    if let Some(usage) = &r.usage {
        row.push_str(&format!("\n       usage: {usage}"));
    }
    row
}

pub async fn list_references(stores: &Stores, query: &str, kind: &str) -> eyre::Result<String> {
    let mut board = ReferenceBoard::new(stores.references.clone());
    board.load().await?;
    board.set_query(query);
    board.select_category(kind);

    Ok(lines(board.visible().iter().map(reference_row)))
}
