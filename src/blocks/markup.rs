// src/blocks/markup.rs

//! Block markup reader.
//!
//! Authored blocks arrive as a `div` named after the block, whose child
//! elements are rows and whose rows' child elements are cells. Everything is
//! read into owned values up front so decoration can await fetches freely.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::blocks::BlockKind;
use crate::error::{AppError, Result};
use crate::models::{CollectionConfig, FeedConfig, Item, SortKey};
use crate::utils::url::resolve;
use crate::utils::value::parse_leading_int;

/// Keys a two-cell collection row may configure.
const COLLECTION_KEYS: [&str; 9] = [
    "source",
    "limit",
    "category",
    "tag",
    "filter",
    "sortby",
    "pagination",
    "facets",
    "search",
];

/// An authored block found in a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSource {
    pub kind: BlockKind,
    /// All classes of the block element, block name included
    pub classes: Vec<String>,
    pub rows: Vec<RowSource>,
}

/// One row of a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSource {
    pub cells: Vec<CellSource>,
    /// Inner HTML of the row
    pub html: String,
}

/// One cell of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellSource {
    /// Trimmed text content
    pub text: String,
    /// `href` of the first link in the cell
    pub link: Option<String>,
}

/// Hero content authored by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeroContent {
    /// `<picture>` markup with eager image loading
    pub picture: String,
    pub headline: String,
    pub description: String,
    /// Call to action as `(href, label)`
    pub cta: Option<(String, String)>,
}

pub(crate) fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| AppError::selector(selector, format!("{e:?}")))
}

fn text_of(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn child_elements<'a>(element: &ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

impl BlockSource {
    /// Read a block element.
    ///
    /// Returns `None` when none of its classes names a supported block.
    pub fn from_element(element: &ElementRef<'_>) -> Result<Option<Self>> {
        let classes: Vec<String> = element.value().classes().map(str::to_string).collect();
        let Some(kind) = classes.iter().find_map(|c| BlockKind::from_name(c)) else {
            return Ok(None);
        };

        let link_sel = parse_selector("a[href]")?;
        let rows = child_elements(element)
            .map(|row| RowSource {
                cells: child_elements(&row)
                    .map(|cell| CellSource {
                        text: text_of(&cell),
                        link: cell
                            .select(&link_sel)
                            .next()
                            .and_then(|a| a.value().attr("href"))
                            .map(str::to_string),
                    })
                    .collect(),
                html: row.inner_html(),
            })
            .collect();

        Ok(Some(Self { kind, classes, rows }))
    }

    /// Read the first supported block of an HTML fragment.
    pub fn parse(fragment: &str) -> Result<Self> {
        let html = Html::parse_fragment(fragment);
        let div_sel = parse_selector("div")?;
        for element in html.select(&div_sel) {
            if let Some(block) = Self::from_element(&element)? {
                return Ok(block);
            }
        }
        Err(AppError::markup("no supported block in fragment"))
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Two-cell rows as `(lowercased key, value cell)`.
    fn key_values(&self) -> impl Iterator<Item = (String, &CellSource)> {
        self.rows.iter().filter_map(|row| match row.cells.as_slice() {
            [key, value] => Some((key.text.to_lowercase(), value)),
            _ => None,
        })
    }
}

/// Find every supported block of a page in document order.
pub fn find_blocks(document: &Html) -> Result<Vec<BlockSource>> {
    let names: Vec<String> = BlockKind::ALL
        .iter()
        .map(|kind| format!("div.{}", kind.class_name()))
        .collect();
    let block_sel = parse_selector(&names.join(", "))?;

    let mut blocks = Vec::new();
    for element in document.select(&block_sel) {
        if let Some(block) = BlockSource::from_element(&element)? {
            blocks.push(block);
        }
    }
    Ok(blocks)
}

/// Values of the page's `article:tag` metadata, empty ones skipped.
pub fn article_tags(document: &Html) -> Result<Vec<String>> {
    let meta_sel = parse_selector(r#"meta[property="article:tag"]"#)?;
    Ok(document
        .select(&meta_sel)
        .filter_map(|meta| meta.value().attr("content"))
        .filter(|content| !content.is_empty())
        .map(str::to_string)
        .collect())
}

fn is_true(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

/// Integer reading of a count; missing, unreadable and negative are 0.
fn count(value: &str) -> usize {
    parse_leading_int(value)
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0)
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Split a collection block into its configuration and content rows.
///
/// A `source` cell holding a link uses the link target, resolved against the
/// page URL.
pub fn read_collection_config<'a>(
    block: &'a BlockSource,
    page_url: &Url,
) -> (CollectionConfig, Vec<&'a RowSource>) {
    let mut config = CollectionConfig::default();
    let mut content = Vec::new();

    for row in &block.rows {
        let [key_cell, value_cell] = row.cells.as_slice() else {
            content.push(row);
            continue;
        };
        let key = key_cell.text.to_lowercase();
        if !COLLECTION_KEYS.contains(&key.as_str()) {
            content.push(row);
            continue;
        }

        let value = value_cell.text.as_str();
        match key.as_str() {
            "source" => {
                config.source = match &value_cell.link {
                    Some(href) => Some(resolve(page_url, href)),
                    None => non_empty(value),
                }
            }
            "limit" => config.limit = count(value),
            "pagination" => config.pagination = count(value),
            "facets" => config.facets = is_true(value),
            "search" => config.search = is_true(value),
            "sortby" => config.sort_by = SortKey::parse(value),
            "category" => config.category = non_empty(value),
            "tag" => config.tag = non_empty(value),
            "filter" => config.filter = non_empty(value),
            _ => {}
        }
    }

    (config, content)
}

/// Read an authored content row into an item.
///
/// Title and path come from the first link, the image from the first image,
/// the description from the last plain paragraph that is not the title, and
/// the author from the first `em`.
pub fn parse_static_row(row: &RowSource, page_url: &Url) -> Result<Item> {
    let fragment = Html::parse_fragment(&row.html);
    let link_sel = parse_selector("a")?;
    let img_sel = parse_selector("img")?;
    let p_sel = parse_selector("p")?;
    let picture_sel = parse_selector("picture")?;
    let em_sel = parse_selector("em")?;

    let mut item = Item::default();

    if let Some(link) = fragment.select(&link_sel).next() {
        item.path = link
            .value()
            .attr("href")
            .map(|href| resolve(page_url, href))
            .unwrap_or_default();
        item.title = text_of(&link);
    }

    if let Some(img) = fragment.select(&img_sel).next() {
        item.image = img
            .value()
            .attr("src")
            .map(|src| resolve(page_url, src))
            .unwrap_or_default();
        item.image_alt = img
            .value()
            .attr("alt")
            .filter(|alt| !alt.is_empty())
            .unwrap_or(item.title.as_str())
            .to_string();
    }

    for p in fragment.select(&p_sel) {
        if p.select(&link_sel).next().is_some() || p.select(&picture_sel).next().is_some() {
            continue;
        }
        let text = text_of(&p);
        if !text.is_empty() && text != item.title {
            item.description = text;
        }
    }

    if let Some(em) = fragment.select(&em_sel).next() {
        item.author = text_of(&em);
    }

    Ok(item)
}

/// Read the `limit`/`featured`/`category`/`tag` rows of a feed block.
///
/// An unreadable or non-positive limit means no limit.
pub fn read_feed_config(block: &BlockSource, default_limit: usize) -> FeedConfig {
    let mut config = FeedConfig::with_limit(default_limit);
    for (key, value) in block.key_values() {
        let value = value.text.as_str();
        match key.as_str() {
            "limit" => config.limit = count(value),
            "featured" => config.featured = is_true(value),
            "category" => config.category = non_empty(value),
            "tag" => config.tag = non_empty(value),
            _ => {}
        }
    }
    config
}

/// Read hand-authored hero content.
///
/// Rows are picture, headline, description and an optional call to action.
/// Returns `None` unless the first row holds a `<picture>`.
pub fn read_hero_content(block: &BlockSource) -> Result<Option<HeroContent>> {
    let picture_sel = parse_selector("picture")?;
    let heading_sel = parse_selector("h1, h2, h3")?;
    let link_sel = parse_selector("a")?;

    let Some(first) = block.rows.first() else {
        return Ok(None);
    };
    let first = Html::parse_fragment(&first.html);
    let Some(picture) = first.select(&picture_sel).next() else {
        return Ok(None);
    };

    let row = |index: usize| block.rows.get(index).map(|r| Html::parse_fragment(&r.html));

    let headline = row(1)
        .map(|html| {
            html.select(&heading_sel)
                .next()
                .map(|h| h.text().collect::<String>())
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| html.root_element().text().collect::<String>().trim().to_string())
        })
        .unwrap_or_default();

    let description = row(2)
        .map(|html| html.root_element().text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let cta = row(3).and_then(|html| {
        html.select(&link_sel).next().map(|a| {
            (
                a.value().attr("href").unwrap_or_default().to_string(),
                text_of(&a),
            )
        })
    });

    Ok(Some(HeroContent {
        picture: eager_picture(&picture.html()),
        headline,
        description,
        cta,
    }))
}

/// Switch the picture's image to eager loading.
fn eager_picture(picture: &str) -> String {
    if picture.contains(r#"loading="lazy""#) {
        picture.replacen(r#"loading="lazy""#, r#"loading="eager""#, 1)
    } else if picture.contains("loading=") {
        picture.to_string()
    } else {
        picture.replacen("<img", r#"<img loading="eager""#, 1)
    }
}
