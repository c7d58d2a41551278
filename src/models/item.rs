//! Query index entries and normalized collection items.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::value::{as_str, is_truthy, leading_int};

/// A query index document.
///
/// Chunked indexes also report `total`, `offset` and `limit`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryIndex {
    #[serde(default)]
    pub data: Vec<IndexEntry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// A raw row of a query index.
///
/// Rows are open objects: the generic `field:value` filter may address any
/// column, so fields are kept as they arrive and read through accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexEntry {
    fields: Map<String, Value>,
}

impl IndexEntry {
    /// Raw value of a column.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// String value of a column; non-string values read as `None`.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        as_str(self.get(field))
    }

    pub fn set(&mut self, field: &str, value: impl Into<Value>) {
        self.fields.insert(field.to_string(), value.into());
    }

    pub fn path(&self) -> Option<&str> {
        self.get_str("path")
    }

    pub fn title(&self) -> Option<&str> {
        self.get_str("title")
    }

    /// Unparsed `tags` column.
    pub fn tags(&self) -> Option<&Value> {
        self.get("tags")
    }

    /// First set value of `releaseDate`, `date`, `lastModified`.
    pub fn date_value(&self) -> Option<&Value> {
        ["releaseDate", "date", "lastModified"]
            .into_iter()
            .filter_map(|field| self.get(field))
            .find(|value| is_truthy(value))
    }

    /// Timestamp used for date ordering; unreadable dates order as `0`.
    pub fn sort_timestamp(&self) -> i64 {
        self.date_value().and_then(leading_int).unwrap_or(0)
    }

    /// Whether a string column equals `expected` exactly.
    pub fn field_equals(&self, field: &str, expected: &str) -> bool {
        self.get_str(field) == Some(expected)
    }
}

impl From<Value> for IndexEntry {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }
}

/// A collection item, normalized from an index entry or authored markup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub path: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub image_alt: String,
    /// Number or string timestamp (milliseconds)
    #[serde(default)]
    pub date: Option<Value>,
    #[serde(default)]
    pub author: String,
    /// Unparsed tags, see [`crate::pipeline::parse_tags`]
    #[serde(default)]
    pub tags: Option<Value>,
    /// Provenance label shown by the headings-only layout
    #[serde(default)]
    pub source: String,
}

impl Item {
    /// Normalize a query index entry.
    ///
    /// Normalize an index row. Rows with neither path nor title are kept and
    /// render with the fallback title.
    pub fn from_entry(entry: &IndexEntry) -> Self {
        let text = |field: &str| entry.get_str(field).unwrap_or_default().to_string();

        Self {
            path: text("path"),
            title: text("title"),
            description: text("description"),
            image: text("image"),
            image_alt: entry
                .get_str("imageAlt")
                .filter(|alt| !alt.is_empty())
                .or(entry.title())
                .unwrap_or_default()
                .to_string(),
            date: entry.date_value().cloned(),
            author: text("author"),
            tags: entry.tags().cloned(),
            source: text("source"),
        }
    }

    /// Items need at least a path or a title to be shown.
    pub fn is_displayable(&self) -> bool {
        !self.path.is_empty() || !self.title.is_empty()
    }

    /// Title with the display fallback applied.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "Untitled"
        } else {
            &self.title
        }
    }
}
