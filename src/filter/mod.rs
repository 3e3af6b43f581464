use crate::models::{Section, Topic};
use std::collections::HashMap;

/// Topics shown under `section` whose title contains `term` (case-insensitive).
///
/// Only the title is searched. An empty term matches every title. Input order
/// is preserved.
pub(crate) fn visible_topics(topics: &[Topic], section: Section, term: &str) -> Vec<Topic> {
    let needle = term.to_lowercase();
    topics
        .iter()
        .filter(|t| t.section() == section)
        .filter(|t| t.title().to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Number of topics per section, for the navigation badges.
pub(crate) fn section_counts(topics: &[Topic]) -> HashMap<Section, usize> {
    let mut counts = HashMap::new();
    for t in topics {
        *counts.entry(t.section()).or_insert(0) += 1;
    }
    counts
}
