use carepoint_core::filter::{
    ALL, category_counts, category_options, filter, filter_listable, sort_by_title,
    sort_newest_first,
};
use carepoint_core::models::assessment::{Assessment, AssessmentStatus};
use carepoint_core::models::protocol::Protocol;
use carepoint_core::models::reference::{Reference, ReferenceKind};

fn ts(secs: i64) -> jiff::Timestamp {
    jiff::Timestamp::from_second(1_700_000_000 + secs).unwrap()
}

fn assessment(id: i64, patient: &str, complaint: &str, status: AssessmentStatus) -> Assessment {
    Assessment {
        id,
        patient_id: patient.to_string(),
        chief_complaint: complaint.to_string(),
        symptoms: Vec::new(),
        status,
        created_at: ts(id),
        updated_at: ts(id),
    }
}

fn protocol(id: i64, title: &str, category: &str, content: &str) -> Protocol {
    Protocol {
        id,
        title: title.to_string(),
        category: category.to_string(),
        content: content.to_string(),
        last_updated: ts(0),
    }
}

fn reference(id: i64, title: &str, kind: ReferenceKind, description: &str) -> Reference {
    Reference {
        id,
        title: title.to_string(),
        kind,
        description: description.to_string(),
        usage: None,
    }
}

fn sample_assessments() -> Vec<Assessment> {
    vec![
        assessment(1, "P100", "Persistent fatigue", AssessmentStatus::Draft),
        assessment(2, "P200", "Chest pain on exertion", AssessmentStatus::InProgress),
        assessment(3, "Q300", "Migraine", AssessmentStatus::Complete),
        assessment(4, "P400", "fatigue and fever", AssessmentStatus::InProgress),
    ]
}

#[test]
fn empty_query_and_all_returns_input_unchanged() {
    let items = sample_assessments();
    assert_eq!(filter_listable(&items, "", ALL), items);
}

#[test]
fn query_matches_any_searchable_field_case_insensitively() {
    let items = sample_assessments();

    let by_complaint = filter_listable(&items, "FATIGUE", ALL);
    let ids: Vec<i64> = by_complaint.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![1, 4]);

    let by_patient = filter_listable(&items, "q3", ALL);
    assert_eq!(by_patient.len(), 1);
    assert_eq!(by_patient[0].id, 3);
}

#[test]
fn every_result_is_from_the_input_and_contains_the_query() {
    let items = sample_assessments();
    for query in ["p", "pain", "zzz", "fe"] {
        let result = filter_listable(&items, query, ALL);
        for a in &result {
            assert!(items.contains(a));
            let q = query.to_lowercase();
            assert!(
                a.patient_id.to_lowercase().contains(&q)
                    || a.chief_complaint.to_lowercase().contains(&q)
            );
        }
    }
}

#[test]
fn category_filter_is_exact_and_case_sensitive() {
    let items = sample_assessments();

    let in_progress = filter_listable(&items, "", "In Progress");
    assert_eq!(in_progress.len(), 2);
    assert!(in_progress.iter().all(|a| a.status == AssessmentStatus::InProgress));

    assert!(filter_listable(&items, "", "in progress").is_empty());
}

#[test]
fn query_and_category_compose_with_and() {
    let items = sample_assessments();
    let result = filter_listable(&items, "fatigue", "In Progress");
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].id, 4);
}

#[test]
fn filter_does_not_touch_input() {
    let items = sample_assessments();
    let before = items.clone();
    let _ = filter_listable(&items, "p", "Draft");
    assert_eq!(items, before);
}

#[test]
fn generic_filter_uses_supplied_selectors() {
    let items = sample_assessments();
    let result = filter(
        &items,
        "p2",
        |a| vec![a.patient_id.as_str()],
        |a| a.status.label(),
        ALL,
    );
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].id, 2);
}

#[test]
fn protocols_search_title_and_content() {
    let items = vec![
        protocol(1, "Sepsis Bundle", "Emergency", "Lactate, cultures, antibiotics"),
        protocol(2, "Stroke Pathway", "Neurology", "Door to needle in 60 minutes"),
        protocol(3, "Chest Pain", "Cardiology", "ECG within 10 minutes"),
    ];

    let minutes = filter_listable(&items, "minutes", ALL);
    assert_eq!(minutes.len(), 2);

    let neuro = filter_listable(&items, "minutes", "Neurology");
    assert_eq!(neuro.len(), 1);
    assert_eq!(neuro[0].title, "Stroke Pathway");
}

#[test]
fn options_are_first_seen_not_alphabetical() {
    let items = vec![
        protocol(1, "a", "Respiratory", ""),
        protocol(2, "b", "Cardiology", ""),
        protocol(3, "c", "Respiratory", ""),
        protocol(4, "d", "", ""),
        protocol(5, "e", "Emergency", ""),
    ];

    let options = category_options(&items, |p| p.category.as_str());
    assert_eq!(options, vec!["All", "Respiratory", "Cardiology", "", "Emergency"]);
}

#[test]
fn empty_category_is_its_own_bucket() {
    let items = vec![
        reference(1, "BMI", ReferenceKind::Calculator, "Body mass index"),
        reference(2, "Misc", ReferenceKind::Other(String::new()), "Unsorted"),
        reference(3, "Warfarin", ReferenceKind::DrugReference, "Dosing"),
        reference(4, "Other misc", ReferenceKind::Other(String::new()), "Unsorted"),
    ];

    let untyped = filter_listable(&items, "", "");
    assert_eq!(untyped.len(), 2);

    let counts = category_counts(&items, |r| r.kind.label());
    assert_eq!(
        counts,
        vec![
            ("Calculator".to_string(), 1),
            (String::new(), 2),
            ("Drug Reference".to_string(), 1),
        ]
    );
}

#[test]
fn newest_first_orders_by_created_at_descending() {
    let mut items = sample_assessments();
    sort_newest_first(&mut items);
    let ids: Vec<i64> = items.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![4, 3, 2, 1]);
}

#[test]
fn title_sort_ignores_case() {
    let mut items = vec![
        protocol(1, "stroke", "", ""),
        protocol(2, "Asthma", "", ""),
        protocol(3, "anaphylaxis", "", ""),
    ];
    sort_by_title(&mut items, |p| p.title.as_str());
    let titles: Vec<&str> = items.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["anaphylaxis", "Asthma", "stroke"]);
}
