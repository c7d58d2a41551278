// src/pipeline/filter.rs

//! Filter, sort and limit over fetched query index entries.
//!
//! Steps run in a fixed order and each one is skipped when its option is
//! unset, so active filters combine as a logical AND:
//!
//! 1. featured
//! 2. category
//! 3. tag (on the unparsed `tags` value)
//! 4. generic `field:value`
//! 5. excluded paths
//! 6. sort
//! 7. limit

use std::cmp::Ordering;
use std::collections::HashSet;

use serde_json::Value;

use crate::models::{IndexEntry, SortKey};

/// Options for [`apply`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    /// Keep only entries whose `feature` column is the string `"true"`
    pub featured: bool,
    pub category: Option<String>,
    pub tag: Option<String>,
    /// `field:value`
    pub filter: Option<String>,
    pub exclude_paths: HashSet<String>,
    pub sort_by: Option<SortKey>,
    /// 0 means no limit
    pub limit: usize,
}

/// Run the pipeline over `entries`.
pub fn apply(mut entries: Vec<IndexEntry>, options: &FilterOptions) -> Vec<IndexEntry> {
    if options.featured {
        // A boolean `true` does not count as featured.
        entries.retain(|e| e.field_equals("feature", "true"));
    }

    if let Some(category) = non_empty(&options.category) {
        entries.retain(|e| e.field_equals("category", category));
    }

    if let Some(tag) = non_empty(&options.tag) {
        entries.retain(|e| raw_tags_include(e.tags(), tag));
    }

    if let Some((field, value)) = non_empty(&options.filter).and_then(split_filter) {
        entries.retain(|e| e.field_equals(field, value));
    }

    if !options.exclude_paths.is_empty() {
        entries.retain(|e| {
            e.path()
                .is_none_or(|path| !options.exclude_paths.contains(path))
        });
    }

    match options.sort_by {
        Some(SortKey::Date) => {
            entries.sort_by_key(|e| std::cmp::Reverse(e.sort_timestamp()));
        }
        Some(SortKey::Title) => {
            entries.sort_by(|a, b| {
                compare_titles(a.title().unwrap_or_default(), b.title().unwrap_or_default())
            });
        }
        None => {}
    }

    if options.limit > 0 {
        entries.truncate(options.limit);
    }

    entries
}

/// Split `field:value` on the first colon, trimming both sides.
///
/// Returns `None` when either side is empty.
pub fn split_filter(filter: &str) -> Option<(&str, &str)> {
    let (field, value) = filter.split_once(':')?;
    let (field, value) = (field.trim(), value.trim());
    (!field.is_empty() && !value.is_empty()).then_some((field, value))
}

/// Locale-like title ordering: case-insensitive first, then exact.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Tag check on the unparsed column.
///
/// Arrays are checked for membership; strings are searched for the tag as a
/// substring, so a JSON-encoded or comma-separated string also matches.
pub fn raw_tags_include(tags: Option<&Value>, tag: &str) -> bool {
    match tags {
        Some(Value::Array(values)) => values.iter().any(|v| v.as_str() == Some(tag)),
        Some(Value::String(s)) => !s.is_empty() && s.contains(tag),
        _ => false,
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
