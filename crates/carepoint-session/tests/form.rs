use std::sync::Arc;

use serde_json::{Value, json};

use carepoint_core::catalog;
use carepoint_core::models::assessment::AssessmentStatus;
use carepoint_core::models::symptom::{self, DurationUnit, Onset, Symptom};
use carepoint_core::record_keys::Table;
use carepoint_records::Stores;
use carepoint_records::notify::MemoryNotifier;
use carepoint_session::error::FormError;
use carepoint_session::form::{AssessmentForm, FormEdit, FormPhase, reduce};
use carepoint_session::route::Route;
use carepoint_storage::memory::{MemoryRecordService, Operation};
use carepoint_storage::service::RawRecord;

fn raw(value: Value) -> RawRecord {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn setup() -> (Arc<MemoryRecordService>, Arc<MemoryNotifier>, Stores) {
    let service = Arc::new(MemoryRecordService::new());
    let notifier = Arc::new(MemoryNotifier::new());
    let stores = Stores::new(service.clone(), notifier.clone());
    (service, notifier, stores)
}

fn fill(form: &mut AssessmentForm) {
    form.apply(FormEdit::PatientId("P-2001".into())).unwrap();
    form.apply(FormEdit::ChiefComplaint("Chest tightness".into()))
        .unwrap();
}

/// Seed assessment 42 whose stored symptoms rate Headache (2) and
/// Chest Pain (5), with stale names that the catalog should override.
fn seed_42(service: &MemoryRecordService) {
    let mut headache = Symptom::unrated(2, "headache (old)", "Misc");
    headache.severity = 3;
    headache.onset = Some(Onset::Gradual);
    let mut chest = Symptom::unrated(5, "Chest Pain", "Cardiovascular");
    chest.severity = 4;
    chest.duration = Some(2.0);
    chest.duration_unit = DurationUnit::Hours;
    let blob = symptom::encode_symptoms(&[headache, chest]).unwrap();

    service.insert(
        Table::Assessments,
        raw(json!({
            "Id": 42,
            "patient_id": "P-42",
            "chief_complaint": "Headache and chest pain",
            "symptoms": blob,
            "status": "In Progress",
            "created_at": "2024-05-01T09:00:00Z",
            "updated_at": "2024-05-01T09:00:00Z",
        })),
    );
}

#[test]
fn reduce_leaves_input_untouched() {
    let (_, _, stores) = setup();
    let form = AssessmentForm::new(stores.assessments);
    let before = form.draft().clone();

    let after = reduce(
        &before,
        FormEdit::Severity {
            symptom_id: 1,
            severity: 2,
        },
    )
    .unwrap();

    assert_eq!(before.symptom(1).unwrap().severity, 0);
    assert_eq!(after.symptom(1).unwrap().severity, 2);
}

#[test]
fn out_of_range_edits_are_rejected() {
    let (_, _, stores) = setup();
    let mut form = AssessmentForm::new(stores.assessments);

    let err = form
        .apply(FormEdit::Severity {
            symptom_id: 3,
            severity: 6,
        })
        .unwrap_err();
    assert!(matches!(err, FormError::Edit(_)));

    let err = form
        .apply(FormEdit::Notes {
            symptom_id: 21,
            notes: "?".into(),
        })
        .unwrap_err();
    assert!(matches!(err, FormError::Edit(_)));
    assert_eq!(form.draft().symptoms, catalog::seed_symptoms());
}

#[tokio::test]
async fn new_assessment_with_three_rated_symptoms() {
    let (service, _, stores) = setup();
    let mut form = AssessmentForm::new(stores.assessments.clone());

    assert!(matches!(form.phase(), FormPhase::Ready));
    assert_eq!(form.draft().symptoms.len(), 20);
    assert_eq!(form.status(), AssessmentStatus::Draft);

    fill(&mut form);
    for (symptom_id, severity) in [(1, 2), (6, 4), (13, 1)] {
        form.apply(FormEdit::Severity {
            symptom_id,
            severity,
        })
        .unwrap();
    }
    form.apply(FormEdit::Duration {
        symptom_id: 6,
        duration: Some(3.0),
        unit: DurationUnit::Days,
    })
    .unwrap();
    assert_eq!(form.status(), AssessmentStatus::InProgress);

    let saved = form.submit().await.unwrap();

    assert_eq!(saved.symptoms.len(), 20);
    assert_eq!(saved.status, AssessmentStatus::InProgress);
    assert_eq!(saved.symptoms.iter().filter(|s| s.is_present()).count(), 3);
    assert_eq!(saved.symptoms[5].duration, Some(3.0));
    assert!(matches!(form.phase(), FormPhase::Submitted(_)));
    assert_eq!(form.next_route(), Some(Route::Assessments));
    assert_eq!(service.call_count(Operation::Create), 1);

    let reloaded = stores.assessments.get(saved.id).await.unwrap();
    assert_eq!(reloaded.symptoms, saved.symptoms);
}

#[tokio::test]
async fn editing_realigns_stored_symptoms_onto_the_catalog() {
    let (service, _, stores) = setup();
    seed_42(&service);

    let mut form = AssessmentForm::edit(stores.assessments.clone(), 42);
    assert!(matches!(form.phase(), FormPhase::Loading));
    assert_eq!(form.route(), Route::AssessmentForm(Some(42)));
    form.load().await.unwrap();

    let draft = form.draft();
    assert_eq!(draft.patient_id, "P-42");
    assert_eq!(draft.symptoms.len(), 20);
    let headache = draft.symptom(2).unwrap();
    assert_eq!(headache.name, "Headache");
    assert_eq!(headache.category, "Neurological");
    assert_eq!(headache.severity, 3);
    assert_eq!(draft.symptom(5).unwrap().duration_unit, DurationUnit::Hours);
    assert_eq!(draft.symptom(1).unwrap().severity, 0);

    form.apply(FormEdit::Severity {
        symptom_id: 5,
        severity: 0,
    })
    .unwrap();
    form.apply(FormEdit::Severity {
        symptom_id: 2,
        severity: 0,
    })
    .unwrap();
    assert_eq!(form.status(), AssessmentStatus::Draft);

    let saved = form.submit().await.unwrap();
    assert_eq!(saved.id, 42);
    assert_eq!(saved.status, AssessmentStatus::Draft);
    assert_eq!(saved.created_at.to_string(), "2024-05-01T09:00:00Z");
    assert_eq!(service.call_count(Operation::Update), 1);
    assert_eq!(service.call_count(Operation::Create), 0);
}

#[tokio::test]
async fn sparse_stored_symptoms_survive_an_edit() {
    let (service, _, stores) = setup();
    service.insert(
        Table::Assessments,
        raw(json!({
            "Id": 43,
            "patient_id": "P-43",
            "chief_complaint": "Headache",
            "symptoms": r#"[{"Id":2,"severity":3},{"Id":5,"severity":4}]"#,
            "status": "In Progress",
        })),
    );

    let mut form = AssessmentForm::edit(stores.assessments.clone(), 43);
    form.load().await.unwrap();
    let headache = form.draft().symptom(2).unwrap();
    assert_eq!(headache.name, "Headache");
    assert_eq!(headache.severity, 3);
    assert_eq!(form.status(), AssessmentStatus::InProgress);

    let saved = form.submit().await.unwrap();
    assert_eq!(saved.status, AssessmentStatus::InProgress);
    let severities: Vec<(u32, u8)> = saved
        .symptoms
        .iter()
        .filter(|s| s.is_present())
        .map(|s| (s.id, s.severity))
        .collect();
    assert_eq!(severities, vec![(2, 3), (5, 4)]);
}

#[tokio::test]
async fn failed_load_can_be_retried() {
    let (service, _, stores) = setup();
    seed_42(&service);
    service.set_unavailable(true);

    let mut form = AssessmentForm::edit(stores.assessments, 42);
    let err = form.load().await.unwrap_err();
    assert!(matches!(err, FormError::Load { id: 42, .. }));
    assert!(matches!(form.phase(), FormPhase::LoadFailed(_)));

    let err = form.apply(FormEdit::PatientId("x".into())).unwrap_err();
    assert!(matches!(err, FormError::WrongPhase { .. }));

    service.set_unavailable(false);
    form.retry().await.unwrap();
    assert!(matches!(form.phase(), FormPhase::Ready));
    assert_eq!(form.draft().chief_complaint, "Headache and chest pain");

    let err = form.retry().await.unwrap_err();
    assert!(matches!(err, FormError::WrongPhase { .. }));
}

#[tokio::test]
async fn missing_fields_block_submit_without_a_service_call() {
    let (service, notifier, stores) = setup();
    let mut form = AssessmentForm::new(stores.assessments);
    form.apply(FormEdit::PatientId("P-1".into())).unwrap();

    let err = form.submit().await.unwrap_err();

    assert!(matches!(err, FormError::Record(ref e) if e.is_validation()));
    assert!(matches!(form.phase(), FormPhase::Ready));
    assert!(service.calls().is_empty());
    assert_eq!(
        notifier.failures()[0].message,
        "Please fill in all required fields"
    );
}

#[tokio::test]
async fn service_failure_returns_to_ready_with_draft_intact() {
    let (service, notifier, stores) = setup();
    let mut form = AssessmentForm::new(stores.assessments);
    fill(&mut form);
    form.apply(FormEdit::Severity {
        symptom_id: 7,
        severity: 3,
    })
    .unwrap();
    let before = form.draft().clone();

    service.set_unavailable(true);
    let err = form.submit().await.unwrap_err();

    assert!(matches!(err, FormError::Record(_)));
    assert!(matches!(form.phase(), FormPhase::Ready));
    assert_eq!(form.draft(), &before);
    assert_eq!(form.next_route(), None);
    assert_eq!(notifier.failures().len(), 1);

    service.set_unavailable(false);
    let saved = form.submit().await.unwrap();
    assert_eq!(saved.patient_id, "P-2001");
}

#[tokio::test]
async fn submitted_form_is_terminal() {
    let (_, _, stores) = setup();
    let mut form = AssessmentForm::new(stores.assessments);
    fill(&mut form);
    form.submit().await.unwrap();

    let err = form.submit().await.unwrap_err();
    assert!(matches!(err, FormError::WrongPhase { phase: "submitted", .. }));
}

#[test]
fn cancel_goes_back_to_the_list() {
    let (service, _, stores) = setup();
    let mut form = AssessmentForm::new(stores.assessments);
    assert_eq!(form.cancel(), Route::Assessments);
    assert_eq!(form.next_route(), Some(Route::Assessments));
    assert!(service.calls().is_empty());
}

#[test]
fn sections_follow_catalog_grouping() {
    let (_, _, stores) = setup();
    let form = AssessmentForm::new(stores.assessments);
    let sections = form.sections();

    assert_eq!(sections[0].0, "General");
    let total: usize = sections.iter().map(|(_, s)| s.len()).sum();
    assert_eq!(total, 20);
}
