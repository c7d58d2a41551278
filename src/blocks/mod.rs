//! Block decoration.
//!
//! Each supported block reads its authored rows, gathers its items and
//! produces the markup that replaces the block's content:
//! - `collection`: filterable, searchable, paginated list
//! - `cards`: article cards or tiles
//! - `carousel`: article slides
//! - `hero`: authored or latest featured article
//! - `related`: articles sharing the page's tags

pub mod cards;
pub mod carousel;
pub mod collection;
pub mod hero;
pub mod markup;
pub mod related;
pub mod render;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Config, FeedConfig, SortKey};
use crate::page::PageContext;
use crate::pipeline::{Action, FilterOptions};
use crate::services::ArticleFetcher;
use crate::utils::html::escape;

pub use collection::{CollectionController, Rendered, SearchFocus};
pub use markup::BlockSource;

/// Blocks this crate decorates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    Collection,
    DynamicCards,
    DynamicCarousel,
    DynamicHero,
    RelatedArticles,
}

impl BlockKind {
    pub const ALL: [BlockKind; 5] = [
        BlockKind::Collection,
        BlockKind::DynamicCards,
        BlockKind::DynamicCarousel,
        BlockKind::DynamicHero,
        BlockKind::RelatedArticles,
    ];

    /// Class naming the block in page markup.
    pub fn class_name(&self) -> &'static str {
        match self {
            BlockKind::Collection => "collection",
            BlockKind::DynamicCards => "dynamic-cards",
            BlockKind::DynamicCarousel => "dynamic-carousel",
            BlockKind::DynamicHero => "dynamic-hero",
            BlockKind::RelatedArticles => "related-articles",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.class_name() == name)
    }
}

/// A block after decoration.
#[derive(Debug, Clone)]
pub struct DecoratedBlock {
    pub kind: BlockKind,
    pub classes: Vec<String>,
    /// Attributes set on the block element, e.g. the carousel id
    pub attributes: Vec<(String, String)>,
    /// Inner HTML
    pub html: String,
    /// Interactive state of a collection block
    pub collection: Option<CollectionController>,
}

impl DecoratedBlock {
    pub fn new(source: &BlockSource, html: impl Into<String>) -> Self {
        Self {
            kind: source.kind,
            classes: source.classes.clone(),
            attributes: Vec::new(),
            html: html.into(),
            collection: None,
        }
    }

    pub fn with_attribute(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.push((name.to_string(), value.into()));
        self
    }

    /// Forward an action to a collection block and refresh its markup.
    ///
    /// Returns `None` for other blocks.
    pub fn dispatch(&mut self, action: Action, focus: Option<SearchFocus>) -> Option<Rendered> {
        let rendered = self.collection.as_mut()?.dispatch(action, focus);
        self.html.clone_from(&rendered.html);
        Some(rendered)
    }

    /// The block element with its decorated content.
    pub fn outer_html(&self) -> String {
        let mut attrs = format!(r#" class="{}""#, escape(&self.classes.join(" ")));
        for (name, value) in &self.attributes {
            attrs.push_str(&format!(r#" {name}="{}""#, escape(value)));
        }
        format!("<div{attrs}>{}</div>", self.html)
    }
}

/// Pipeline options of a feed block on this page.
///
/// Newest first, skipping articles earlier blocks already show.
pub(crate) fn feed_options(config: &FeedConfig, shown: &HashSet<String>) -> FilterOptions {
    FilterOptions {
        featured: config.featured,
        category: config.category.clone(),
        tag: config.tag.clone(),
        exclude_paths: shown.clone(),
        sort_by: Some(SortKey::Date),
        limit: config.limit,
        ..Default::default()
    }
}

/// Decorate one block.
pub async fn decorate(
    block: &BlockSource,
    ctx: &mut PageContext,
    fetcher: &ArticleFetcher,
    config: &Config,
) -> Result<DecoratedBlock> {
    log::debug!("Decorating {} block", block.kind.class_name());
    match block.kind {
        BlockKind::Collection => {
            let controller =
                collection::decorate(block, ctx.url(), fetcher, &config.collection).await?;
            let mut decorated = DecoratedBlock::new(block, controller.render().html);
            decorated.collection = Some(controller);
            Ok(decorated)
        }
        BlockKind::DynamicCards => cards::decorate(block, ctx, fetcher, config.cards.limit).await,
        BlockKind::DynamicCarousel => {
            carousel::decorate(block, ctx, fetcher, config.carousel.limit).await
        }
        BlockKind::DynamicHero => hero::decorate(block, ctx, fetcher).await,
        BlockKind::RelatedArticles => related::decorate(block, ctx, fetcher).await,
    }
}
