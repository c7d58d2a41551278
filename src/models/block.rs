//! Block configuration read from authored key/value rows.

use serde::{Deserialize, Serialize};

/// Ordering applied by the filter pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Newest first by `releaseDate || date || lastModified`
    Date,
    /// Ascending by title
    Title,
}

impl SortKey {
    /// Read an authored `sortby` value; anything unknown leaves items unsorted.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "date" | "releaseDate" => Some(Self::Date),
            "title" => Some(Self::Title),
            _ => None,
        }
    }
}

/// Configuration of a collection block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Query index URL; `None` means the block lists authored rows
    pub source: Option<String>,
    /// 0 means no limit
    pub limit: usize,
    pub sort_by: Option<SortKey>,
    /// Items per page; 0 means no pagination
    pub pagination: usize,
    pub facets: bool,
    pub search: bool,
    pub category: Option<String>,
    pub tag: Option<String>,
    /// Generic `field:value` filter
    pub filter: Option<String>,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            source: None,
            limit: 0,
            sort_by: Some(SortKey::Date),
            pagination: 0,
            facets: false,
            search: false,
            category: None,
            tag: None,
            filter: None,
        }
    }
}

/// Presentation variant of a collection, from the block's classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionLayout {
    pub thumbnail: bool,
    pub calendar: bool,
    pub headings_only: bool,
    pub condensed: bool,
}

impl CollectionLayout {
    pub fn from_classes<'a>(classes: impl IntoIterator<Item = &'a str>) -> Self {
        let mut layout = Self::default();
        for class in classes {
            match class {
                "thumbnail" | "media" => layout.thumbnail = true,
                "calendar" => layout.calendar = true,
                "headings-only" => layout.headings_only = true,
                "condensed" => layout.condensed = true,
                _ => {}
            }
        }
        layout
    }
}

/// Configuration of the article feed blocks (cards, carousel).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    pub limit: usize,
    pub featured: bool,
    pub category: Option<String>,
    pub tag: Option<String>,
}

impl FeedConfig {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            featured: false,
            category: None,
            tag: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_parse() {
        assert_eq!(SortKey::parse("date"), Some(SortKey::Date));
        assert_eq!(SortKey::parse("releaseDate"), Some(SortKey::Date));
        assert_eq!(SortKey::parse("title"), Some(SortKey::Title));
        assert_eq!(SortKey::parse("Title"), None);
        assert_eq!(SortKey::parse(""), None);
    }

    #[test]
    fn test_layout_from_classes() {
        let layout = CollectionLayout::from_classes(["collection", "media", "condensed"]);
        assert!(layout.thumbnail);
        assert!(layout.condensed);
        assert!(!layout.calendar);
        assert!(!layout.headings_only);
    }
}
