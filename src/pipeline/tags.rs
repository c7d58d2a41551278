// src/pipeline/tags.rs

//! Tag parsing, facet vocabulary and keyword search over collection items.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::models::Item;
use crate::pipeline::filter::compare_titles;
use crate::utils::value::to_text;

static WORD_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w").expect("valid word start regex"));

/// Read a `tags` value into a list of tags.
///
/// Accepts a real array, a JSON array encoded as a string, or a
/// comma-separated string. Never fails: broken JSON falls back to stripping
/// the brackets and splitting on commas.
pub fn parse_tags(tags: Option<&Value>) -> Vec<String> {
    match tags {
        Some(Value::Array(values)) => values.iter().map(to_text).collect(),
        Some(Value::String(s)) => parse_tag_string(s),
        _ => Vec::new(),
    }
}

fn parse_tag_string(tags: &str) -> Vec<String> {
    if tags.is_empty() {
        return Vec::new();
    }

    let trimmed = tags.trim();
    if trimmed.starts_with('[') && trimmed.ends_with(']') {
        match serde_json::from_str::<Vec<Value>>(trimmed) {
            Ok(values) => {
                return values
                    .iter()
                    .map(|v| to_text(v).trim().to_string())
                    .filter(|tag| !tag.is_empty())
                    .collect();
            }
            Err(e) => {
                log::debug!("Tags {trimmed:?} are not valid JSON ({e}), splitting manually");
                let inner = &trimmed[1..trimmed.len() - 1];
                return inner
                    .split(',')
                    .map(|tag| strip_quotes(tag.trim()).to_string())
                    .filter(|tag| !tag.is_empty())
                    .collect();
            }
        }
    }

    tags.split(',')
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Remove one leading and one trailing quote character.
fn strip_quotes(tag: &str) -> &str {
    let tag = tag.strip_prefix(['"', '\'']).unwrap_or(tag);
    tag.strip_suffix(['"', '\'']).unwrap_or(tag)
}

/// Tag as shown in meta lists and search text (hyphens become spaces).
pub fn display_tag(tag: &str) -> String {
    tag.replace('-', " ")
}

/// Tag as shown in the facet dropdown: spaced and title cased.
pub fn title_case_tag(tag: &str) -> String {
    WORD_START
        .replace_all(&display_tag(tag), |caps: &regex::Captures<'_>| caps[0].to_uppercase())
        .into_owned()
}

/// Unique tags over all items, sorted case-insensitively.
pub fn unique_tags(items: &[Item]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags: Vec<String> = items
        .iter()
        .flat_map(|item| parse_tags(item.tags.as_ref()))
        .filter(|tag| seen.insert(tag.clone()))
        .collect();
    tags.sort_by(|a, b| compare_titles(a, b));
    tags
}

/// Keep items carrying `tag` after parsing; an empty tag keeps everything.
pub fn filter_by_tag<'a>(items: &'a [Item], tag: &str) -> Vec<&'a Item> {
    items
        .iter()
        .filter(|item| tag.is_empty() || parse_tags(item.tags.as_ref()).iter().any(|t| t == tag))
        .collect()
}

/// Keep items containing every whitespace-separated term of `query`.
///
/// Terms are matched case-insensitively as substrings of the item's title,
/// description, author and display tags. A blank query keeps everything.
pub fn filter_by_search<'a>(items: Vec<&'a Item>, query: &str) -> Vec<&'a Item> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return items;
    }

    let terms: Vec<&str> = query.split_whitespace().collect();
    items
        .into_iter()
        .filter(|item| {
            let haystack = searchable_text(item);
            terms.iter().all(|term| haystack.contains(term))
        })
        .collect()
}

fn searchable_text(item: &Item) -> String {
    let mut parts = vec![
        item.title.clone(),
        item.description.clone(),
        item.author.clone(),
    ];
    parts.extend(parse_tags(item.tags.as_ref()).iter().map(|t| display_tag(t)));
    parts.join(" ").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(title: &str, tags: Value) -> Item {
        Item {
            path: format!("/news/{}", title.to_lowercase().replace(' ', "-")),
            title: title.to_string(),
            tags: Some(tags),
            ..Default::default()
        }
    }

    fn titles(items: &[&Item]) -> Vec<String> {
        items.iter().map(|i| i.title.clone()).collect()
    }

    #[test]
    fn test_parse_tags_equivalent_forms() {
        let expected = vec!["a".to_string(), "b".to_string()];
        assert_eq!(parse_tags(Some(&json!("[\"a\",\"b\"]"))), expected);
        assert_eq!(parse_tags(Some(&json!("a, b"))), expected);
        assert_eq!(parse_tags(Some(&json!(["a", "b"]))), expected);
    }

    #[test]
    fn test_parse_tags_broken_json() {
        assert_eq!(
            parse_tags(Some(&json!("['army', 'space-force']"))),
            vec!["army", "space-force"]
        );
        assert_eq!(parse_tags(Some(&json!("[a, \"b, ]"))), vec!["a", "b"]);
    }

    #[test]
    fn test_parse_tags_empty_and_missing() {
        assert!(parse_tags(None).is_empty());
        assert!(parse_tags(Some(&json!(""))).is_empty());
        assert!(parse_tags(Some(&json!(" , ,"))).is_empty());
        assert!(parse_tags(Some(&json!("[]"))).is_empty());
        assert!(parse_tags(Some(&json!(null))).is_empty());
    }

    #[test]
    fn test_title_case_tag() {
        assert_eq!(title_case_tag("humanitarian-missions"), "Humanitarian Missions");
        assert_eq!(display_tag("space-force"), "space force");
    }

    #[test]
    fn test_unique_tags_sorted() {
        let items = vec![
            item("One", json!(["a"])),
            item("Two", json!("a, b")),
            item("Three", json!("[\"b\"]")),
            item("Four", json!(["c"])),
            item("Five", json!([])),
        ];
        assert_eq!(unique_tags(&items), vec!["a", "b", "c"]);

        let mixed = vec![item("x", json!(["beta", "Alpha", "alpha"]))];
        assert_eq!(unique_tags(&mixed), vec!["Alpha", "alpha", "beta"]);
    }

    #[test]
    fn test_filter_by_tag_exact_after_parsing() {
        let items = vec![
            item("One", json!(["a"])),
            item("Two", json!("a, b")),
            item("Three", json!("[\"ab\"]")),
        ];
        assert_eq!(titles(&filter_by_tag(&items, "a")), vec!["One", "Two"]);
        assert_eq!(filter_by_tag(&items, "").len(), 3);
    }

    #[test]
    fn test_search_requires_every_term() {
        let mut dragon = item("Dragon Boat Race", json!(["water-sports"]));
        dragon.author = "Sgt. Rivera".into();
        let items = vec![
            dragon,
            item("Boat Maintenance", json!(["logistics"])),
            item("Field Day", json!(["sports"])),
        ];
        let all: Vec<&Item> = items.iter().collect();

        assert_eq!(titles(&filter_by_search(all.clone(), "boat")).len(), 2);
        assert_eq!(
            titles(&filter_by_search(all.clone(), "BOAT water")),
            vec!["Dragon Boat Race"]
        );
        assert_eq!(
            titles(&filter_by_search(all.clone(), "rivera")),
            vec!["Dragon Boat Race"]
        );
        // display tags replace hyphens
        assert_eq!(
            titles(&filter_by_search(all.clone(), "water sports")),
            vec!["Dragon Boat Race"]
        );
        assert_eq!(filter_by_search(all, "   ").len(), 3);
    }

    #[test]
    fn test_search_narrowing_is_monotonic() {
        let items = vec![
            item("Alpha Bravo", json!(["x"])),
            item("Alpha Charlie", json!(["y"])),
            item("Bravo Delta", json!(["x-y"])),
        ];
        let all: Vec<&Item> = items.iter().collect();
        let mut query = String::new();
        let mut previous = items.len();
        for term in ["alpha", "bravo", "x", "zulu"] {
            query.push(' ');
            query.push_str(term);
            let count = filter_by_search(all.clone(), &query).len();
            assert!(count <= previous, "adding {term} grew the result");
            previous = count;
        }
        assert_eq!(previous, 0);
    }
}
