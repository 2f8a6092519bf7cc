use carepoint_core::catalog::{
    align_to_catalog, catalog, entry_for, grouped_by_category, id_for, seed_symptoms,
};
use carepoint_core::models::symptom::{DurationUnit, Onset, Symptom};

#[test]
fn catalog_has_twenty_entries() {
    assert_eq!(catalog().len(), 20);
    assert_eq!(catalog()[0].name, "Fever");
    assert_eq!(catalog()[19].name, "Loss of Appetite");
}

#[test]
fn seeded_symptoms_mirror_catalog_positions() {
    let symptoms = seed_symptoms();
    assert_eq!(symptoms.len(), catalog().len());
    for (i, s) in symptoms.iter().enumerate() {
        assert_eq!(s.id as usize, i + 1);
        assert_eq!(s.name, catalog()[i].name);
        assert_eq!(s.category, catalog()[i].category);
        assert_eq!(s.severity, 0);
    }
}

#[test]
fn ids_are_one_based() {
    assert!(entry_for(0).is_none());
    assert_eq!(entry_for(1).unwrap().name, "Fever");
    assert_eq!(entry_for(20).unwrap().name, "Loss of Appetite");
    assert!(entry_for(21).is_none());
    assert_eq!(id_for("chest pain"), Some(5));
    assert_eq!(id_for("Hiccups"), None);
}

#[test]
fn groups_follow_first_seen_category_order() {
    let groups = grouped_by_category();
    let names: Vec<&str> = groups.iter().map(|(c, _)| *c).collect();
    assert_eq!(
        names,
        vec![
            "General",
            "Neurological",
            "Gastrointestinal",
            "Cardiovascular",
            "Respiratory",
            "Musculoskeletal",
            "Dermatological",
            "Psychological",
        ]
    );

    let general: Vec<u32> = groups[0].1.iter().map(|(id, _)| *id).collect();
    assert_eq!(general, vec![1, 13, 19, 20]);

    let total: usize = groups.iter().map(|(_, e)| e.len()).sum();
    assert_eq!(total, 20);
}

#[test]
fn alignment_is_positional() {
    let stored = vec![
        Symptom {
            id: 2,
            name: "Old name for slot two".to_string(),
            category: "Legacy".to_string(),
            severity: 4,
            duration: Some(3.0),
            duration_unit: DurationUnit::Weeks,
            onset: Some(Onset::Gradual),
            notes: "worse at night".to_string(),
        },
        Symptom::unrated(99, "Out of range", "Legacy"),
    ];

    let aligned = align_to_catalog(&stored);
    assert_eq!(aligned.len(), 20);

    let slot_two = &aligned[1];
    assert_eq!(slot_two.name, "Headache");
    assert_eq!(slot_two.category, "Neurological");
    assert_eq!(slot_two.severity, 4);
    assert_eq!(slot_two.duration, Some(3.0));
    assert_eq!(slot_two.notes, "worse at night");

    assert!(aligned.iter().filter(|s| s.id != 2).all(|s| s.severity == 0));
    assert!(aligned.iter().all(|s| s.id <= 20));
}
