//! Client-side list filtering and ordering.
//!
//! Everything here is a pure function over an in-memory slice: inputs are
//! never mutated and every call returns a fresh collection.

use crate::models::assessment::Assessment;
use crate::models::protocol::Protocol;
use crate::models::reference::Reference;

/// The category value that disables category filtering.
pub const ALL: &str = "All";

/// A record that can be searched by free text and bucketed by one category.
pub trait Listable {
    /// Text fields the free-text query is matched against.
    fn search_fields(&self) -> Vec<&str>;

    /// The categorical value used by the category filter and option lists.
    fn category(&self) -> &str;
}

impl Listable for Assessment {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.patient_id.as_str(), self.chief_complaint.as_str()]
    }

    fn category(&self) -> &str {
        self.status.label()
    }
}

impl Listable for Protocol {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.content.as_str()]
    }

    fn category(&self) -> &str {
        &self.category
    }
}

impl Listable for Reference {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str()]
    }

    fn category(&self) -> &str {
        self.kind.label()
    }
}

/// Keep the items matching both the query and the category.
///
/// A non-empty `query` must occur, case-insensitively, in at least one of the
/// fields returned by `fields`. Unless `category_value` is [`ALL`], the value
/// returned by `category` must equal it exactly.
pub fn filter<T, F, C>(
    items: &[T],
    query: &str,
    fields: F,
    category: C,
    category_value: &str,
) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> Vec<&str>,
    C: Fn(&T) -> &str,
{
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|&item| {
            needle.is_empty()
                || fields(item)
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
        })
        .filter(|&item| category_value == ALL || category(item) == category_value)
        .cloned()
        .collect()
}

pub fn filter_listable<T>(items: &[T], query: &str, category_value: &str) -> Vec<T>
where
    T: Listable + Clone,
{
    filter(items, query, T::search_fields, T::category, category_value)
}

/// `["All"]` followed by every distinct category in first-seen order.
pub fn category_options<T, C>(items: &[T], category: C) -> Vec<String>
where
    C: Fn(&T) -> &str,
{
    let mut options = vec![ALL.to_string()];
    for item in items {
        let value = category(item);
        if !options[1..].iter().any(|o| o == value) {
            options.push(value.to_string());
        }
    }
    options
}

/// Number of items per distinct category, in first-seen order.
pub fn category_counts<T, C>(items: &[T], category: C) -> Vec<(String, usize)>
where
    C: Fn(&T) -> &str,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    for item in items {
        let value = category(item);
        match counts.iter_mut().find(|(c, _)| c == value) {
            Some((_, n)) => *n += 1,
            None => counts.push((value.to_string(), 1)),
        }
    }
    counts
}

/// Newest first by creation time.
pub fn sort_newest_first(assessments: &mut [Assessment]) {
    assessments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Ascending by title, ignoring case; exact title breaks ties.
pub fn sort_by_title<T, F>(items: &mut [T], title: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by(|a, b| {
        let (a, b) = (title(a), title(b));
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
}
