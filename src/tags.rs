//! Tag extraction and filtering.
//!
//! Events carry raw (key, value) tag pairs; the host's tag registry may
//! have nicer display labels for either side. Extraction resolves both
//! through a [`TagLookup`], falling back to the raw strings, and the
//! filter decides which extracted tags make it into the message.

use std::collections::HashSet;

use crate::core::{Event, TagLookup};

/// A tag resolved for display: both sides are labels when the lookup
/// has them, raw strings otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayTag {
    pub key: String,
    pub value: String,
}

/// Resolves every tag on the event to its display form, preserving
/// event order. Empty when the event has no tags.
pub fn display_tags(event: &Event, lookup: &dyn TagLookup) -> Vec<DisplayTag> {
    let project = &event.group.project;
    event
        .tags
        .iter()
        .map(|(key, value)| DisplayTag {
            key: lookup
                .key_label(project, key)
                .unwrap_or_else(|| key.clone()),
            value: lookup
                .value_label(project, key, value)
                .unwrap_or_else(|| value.clone()),
        })
        .collect()
}

/// Applies the include/exclude filters to one display tag.
///
/// Matching is done on the lowercased display key and on its
/// standardized form, so `sentry:release` and `release` filter alike.
pub fn tag_passes_filters(
    tag: &DisplayTag,
    lookup: &dyn TagLookup,
    included: Option<&HashSet<String>>,
    excluded: Option<&HashSet<String>>,
) -> bool {
    let key = tag.key.to_lowercase();
    let std_key = lookup.standardize_key(&key);
    if let Some(included) = included {
        if !included.contains(&key) && !included.contains(&std_key) {
            return false;
        }
    }
    if let Some(excluded) = excluded {
        if excluded.contains(&key) || excluded.contains(&std_key) {
            return false;
        }
    }
    true
}
