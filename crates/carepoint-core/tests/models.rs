use carepoint_core::error::CoreError;
use carepoint_core::models::assessment::{AssessmentDraft, AssessmentStatus};
use carepoint_core::models::protocol::Protocol;
use carepoint_core::models::reference::ReferenceKind;
use carepoint_core::models::symptom::{
    DurationUnit, Onset, Symptom, decode_symptoms, encode_symptoms,
};
use carepoint_core::record_keys::{self, Table};
use carepoint_core::summary::{AssessmentSummary, SeverityBreakdown, severity_label};

#[test]
fn seeded_draft_is_draft() {
    let draft = AssessmentDraft::seeded();
    assert_eq!(draft.symptoms.len(), 20);
    assert_eq!(draft.derived_status(), AssessmentStatus::Draft);
}

#[test]
fn status_depends_only_on_final_severities() {
    let mut draft = AssessmentDraft::seeded();
    draft.set_severity(5, 3).unwrap();
    assert_eq!(draft.derived_status(), AssessmentStatus::InProgress);

    draft.set_severity(9, 1).unwrap();
    draft.set_severity(5, 0).unwrap();
    assert_eq!(draft.derived_status(), AssessmentStatus::InProgress);

    draft.set_severity(9, 0).unwrap();
    assert_eq!(draft.derived_status(), AssessmentStatus::Draft);
}

#[test]
fn derive_never_yields_complete() {
    let mut draft = AssessmentDraft::seeded();
    for id in 1..=20 {
        draft.set_severity(id, 5).unwrap();
    }
    assert_eq!(draft.derived_status(), AssessmentStatus::InProgress);
}

#[test]
fn edits_reject_bad_input() {
    let mut draft = AssessmentDraft::seeded();
    assert!(matches!(
        draft.set_severity(1, 6),
        Err(CoreError::SeverityOutOfRange(6))
    ));
    assert!(matches!(
        draft.set_severity(21, 1),
        Err(CoreError::UnknownSymptom(21))
    ));
    assert!(matches!(
        draft.set_duration(1, Some(0.0), DurationUnit::Days),
        Err(CoreError::InvalidDuration(_))
    ));
    assert!(draft.set_duration(1, None, DurationUnit::Hours).is_ok());
    assert_eq!(draft.symptoms[0].duration_unit, DurationUnit::Hours);
}

#[test]
fn validation_trims_required_fields() {
    let mut draft = AssessmentDraft::seeded();
    assert!(matches!(draft.validate(), Err(CoreError::MissingField(f)) if f == "patient_id"));

    draft.patient_id = "P100".to_string();
    draft.chief_complaint = "   ".to_string();
    assert!(matches!(draft.validate(), Err(CoreError::MissingField(f)) if f == "chief_complaint"));

    draft.chief_complaint = "fatigue".to_string();
    assert!(draft.validate().is_ok());
}

#[test]
fn symptom_blob_round_trips() {
    let mut symptoms = AssessmentDraft::seeded().symptoms;
    symptoms[0].severity = 2;
    symptoms[0].duration = Some(1.5);
    symptoms[0].duration_unit = DurationUnit::Hours;
    symptoms[0].onset = Some(Onset::Sudden);
    symptoms[0].notes = "spiking \"high\" at night".to_string();
    symptoms[17].onset = Some(Onset::Intermittent);

    let blob = encode_symptoms(&symptoms).unwrap();
    let decoded = decode_symptoms(&blob).unwrap();
    assert_eq!(decoded, symptoms);
}

#[test]
fn decodes_legacy_blobs_with_capitalized_id() {
    let blob = r#"[{"Id":3,"name":"Nausea","category":"Gastrointestinal","severity":2,"notes":""}]"#;
    let decoded = decode_symptoms(blob).unwrap();
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].id, 3);
    assert_eq!(decoded[0].duration_unit, DurationUnit::Days);
    assert!(decoded[0].onset.is_none());
}

#[test]
fn sparse_entries_decode_with_defaults() {
    let decoded = decode_symptoms(r#"[{"Id":2,"severity":3},{"Id":5}]"#).unwrap();
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded[0].id, 2);
    assert_eq!(decoded[0].severity, 3);
    assert_eq!(decoded[0].name, "");
    assert_eq!(decoded[0].category, "");
    assert_eq!(decoded[1].severity, 0);
}

#[test]
fn empty_blob_decodes_to_nothing() {
    assert!(decode_symptoms("").unwrap().is_empty());
    assert!(decode_symptoms("not json").is_err());
}

#[test]
fn status_labels_round_trip() {
    for status in AssessmentStatus::ALL {
        assert_eq!(AssessmentStatus::from_label(status.label()), Some(status));
    }
    assert_eq!(
        serde_json::to_string(&AssessmentStatus::InProgress).unwrap(),
        "\"In Progress\""
    );
    assert_eq!(AssessmentStatus::from_label("in progress"), None);
}

#[test]
fn reference_kind_keeps_unknown_labels() {
    assert_eq!(ReferenceKind::from("Drug Reference".to_string()), ReferenceKind::DrugReference);
    let other = ReferenceKind::from("Imaging Atlas".to_string());
    assert_eq!(other.label(), "Imaging Atlas");
    assert_eq!(String::from(other), "Imaging Atlas");
}

#[test]
fn severity_breakdown_buckets() {
    let mut symptoms: Vec<Symptom> = AssessmentDraft::seeded().symptoms;
    for (i, severity) in [1u8, 2, 3, 4, 5, 0].into_iter().enumerate() {
        symptoms[i].severity = severity;
    }
    let breakdown = SeverityBreakdown::of(&symptoms);
    assert_eq!(breakdown.mild, 2);
    assert_eq!(breakdown.moderate, 1);
    assert_eq!(breakdown.severe, 2);
    assert_eq!(breakdown.active(), 5);

    assert_eq!(severity_label(0), "None");
    assert_eq!(severity_label(3), "Significant");
    assert_eq!(severity_label(5), "Critical");
}

#[test]
fn summary_counts_statuses() {
    let base = carepoint_core::models::assessment::Assessment {
        id: 1,
        patient_id: "P1".to_string(),
        chief_complaint: "c".to_string(),
        symptoms: Vec::new(),
        status: AssessmentStatus::Draft,
        created_at: jiff::Timestamp::UNIX_EPOCH,
        updated_at: jiff::Timestamp::UNIX_EPOCH,
    };
    let mut items = vec![base.clone(), base.clone(), base.clone()];
    items[1].status = AssessmentStatus::InProgress;
    items[2].status = AssessmentStatus::Complete;

    let summary = AssessmentSummary::of(&items);
    assert_eq!(summary.total, 3);
    assert_eq!(summary.draft, 1);
    assert_eq!(summary.in_progress, 1);
    assert_eq!(summary.complete, 1);
}

#[test]
fn protocol_excerpt_truncates_long_content() {
    let mut p = Protocol {
        id: 1,
        title: "t".to_string(),
        category: "c".to_string(),
        content: "x".repeat(150),
        last_updated: jiff::Timestamp::UNIX_EPOCH,
    };
    assert_eq!(p.excerpt(), "x".repeat(150));

    p.content = "é".repeat(151);
    let excerpt = p.excerpt();
    assert!(excerpt.ends_with("..."));
    assert_eq!(excerpt.chars().count(), 153);
}

#[test]
fn record_keys_round_trip() {
    let key = record_keys::record(Table::Assessments, 42);
    assert_eq!(key, "assessments/42.json");
    assert_eq!(record_keys::parse_record_id(Table::Assessments, &key), Some(42));
    assert_eq!(record_keys::parse_record_id(Table::Protocols, &key), None);
    assert_eq!(
        record_keys::sequence(Table::References),
        "_state/sequences/references.json"
    );
}
