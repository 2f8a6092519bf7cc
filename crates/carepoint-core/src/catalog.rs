//! The static symptom catalog.
//!
//! Every new assessment is seeded with one symptom per entry, in catalog
//! order. A symptom's id is its 1-based position here, so entries may only
//! ever be appended: reordering or renaming an entry silently rebinds stored
//! ratings to a different symptom.

use serde::Serialize;

use crate::models::symptom::Symptom;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub category: &'static str,
}

const fn entry(name: &'static str, category: &'static str) -> CatalogEntry {
    CatalogEntry { name, category }
}

static CATALOG: [CatalogEntry; 20] = [
    entry("Fever", "General"),
    entry("Headache", "Neurological"),
    entry("Nausea", "Gastrointestinal"),
    entry("Vomiting", "Gastrointestinal"),
    entry("Chest Pain", "Cardiovascular"),
    entry("Shortness of Breath", "Respiratory"),
    entry("Cough", "Respiratory"),
    entry("Sore Throat", "Respiratory"),
    entry("Abdominal Pain", "Gastrointestinal"),
    entry("Diarrhea", "Gastrointestinal"),
    entry("Constipation", "Gastrointestinal"),
    entry("Dizziness", "Neurological"),
    entry("Fatigue", "General"),
    entry("Joint Pain", "Musculoskeletal"),
    entry("Muscle Aches", "Musculoskeletal"),
    entry("Rash", "Dermatological"),
    entry("Back Pain", "Musculoskeletal"),
    entry("Anxiety", "Psychological"),
    entry("Sleep Issues", "General"),
    entry("Loss of Appetite", "General"),
];

pub fn catalog() -> &'static [CatalogEntry] {
    &CATALOG
}

/// Look up a catalog entry by symptom id (1-based).
pub fn entry_for(id: u32) -> Option<&'static CatalogEntry> {
    let index = usize::try_from(id).ok()?.checked_sub(1)?;
    CATALOG.get(index)
}

/// Look up a symptom id by catalog name.
pub fn id_for(name: &str) -> Option<u32> {
    CATALOG
        .iter()
        .position(|e| e.name.eq_ignore_ascii_case(name))
        .map(|i| i as u32 + 1)
}

/// One unrated symptom per catalog entry.
pub fn seed_symptoms() -> Vec<Symptom> {
    CATALOG
        .iter()
        .enumerate()
        .map(|(i, e)| Symptom::unrated(i as u32 + 1, e.name, e.category))
        .collect()
}

/// Catalog entries grouped by category. Categories appear in first-seen
/// order; entries keep catalog order and carry their symptom id.
pub fn grouped_by_category() -> Vec<(&'static str, Vec<(u32, &'static CatalogEntry)>)> {
    let mut groups: Vec<(&'static str, Vec<(u32, &'static CatalogEntry)>)> = Vec::new();
    for (i, e) in CATALOG.iter().enumerate() {
        let id = i as u32 + 1;
        match groups.iter_mut().find(|(category, _)| *category == e.category) {
            Some((_, entries)) => entries.push((id, e)),
            None => groups.push((e.category, vec![(id, e)])),
        }
    }
    groups
}

/// Rebind stored symptoms onto the catalog by position.
///
/// The result always has one entry per catalog slot. A stored symptom with
/// id `n` supplies the editable fields for slot `n`; its name and category
/// are replaced by the catalog's. Slots with no stored data are unrated, and
/// stored ids beyond the catalog are dropped.
pub fn align_to_catalog(stored: &[Symptom]) -> Vec<Symptom> {
    seed_symptoms()
        .into_iter()
        .map(|seed| match stored.iter().find(|s| s.id == seed.id) {
            Some(s) => Symptom {
                name: seed.name,
                category: seed.category,
                ..s.clone()
            },
            None => seed,
        })
        .collect()
}
