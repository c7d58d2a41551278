// src/page.rs

//! Page-level decoration.
//!
//! A [`PageContext`] lives for one page load. Blocks are decorated in
//! document order and each one sees what earlier blocks registered: the
//! article paths already shown and the number of carousels created.

use std::collections::HashSet;

use scraper::Html;
use url::Url;

use crate::blocks::{self, DecoratedBlock, markup};
use crate::error::Result;
use crate::models::Config;
use crate::services::ArticleFetcher;

/// Shared state of the blocks of one page.
#[derive(Debug, Clone)]
pub struct PageContext {
    url: Url,
    tags: Vec<String>,
    shown_paths: HashSet<String>,
    carousels: usize,
}

impl PageContext {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            tags: Vec::new(),
            shown_paths: HashSet::new(),
            carousels: 0,
        }
    }

    /// Set the page's `article:tag` values.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Record an article path as shown on the page.
    pub fn register_shown(&mut self, path: &str) {
        if !path.is_empty() {
            self.shown_paths.insert(path.to_string());
        }
    }

    pub fn shown_paths(&self) -> &HashSet<String> {
        &self.shown_paths
    }

    /// Allocate the next carousel number, starting at 1.
    pub fn next_carousel_id(&mut self) -> usize {
        self.carousels += 1;
        self.carousels
    }
}

/// A page after decoration.
#[derive(Debug, Clone)]
pub struct DecoratedPage {
    pub context: PageContext,
    pub blocks: Vec<DecoratedBlock>,
}

impl DecoratedPage {
    /// The decorated blocks, one per line.
    pub fn to_html(&self) -> String {
        self.blocks
            .iter()
            .map(DecoratedBlock::outer_html)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Decorate every supported block of a page, in document order.
///
/// A block that fails to decorate is logged and left out.
pub async fn decorate_page(
    page_html: &str,
    page_url: Url,
    fetcher: &ArticleFetcher,
    config: &Config,
) -> Result<DecoratedPage> {
    let (tags, sources) = {
        let document = Html::parse_document(page_html);
        (markup::article_tags(&document)?, markup::find_blocks(&document)?)
    };
    log::info!("Found {} blocks on {page_url}", sources.len());

    let mut context = PageContext::new(page_url).with_tags(tags);
    let mut decorated = Vec::with_capacity(sources.len());
    for source in &sources {
        match blocks::decorate(source, &mut context, fetcher, config).await {
            Ok(block) => decorated.push(block),
            Err(e) => log::warn!("Failed to decorate {} block: {e}", source.kind.class_name()),
        }
    }

    Ok(DecoratedPage {
        context,
        blocks: decorated,
    })
}
