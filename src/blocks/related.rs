// src/blocks/related.rs

//! Related articles block: articles sharing a tag with the current page.

use std::collections::HashSet;

use crate::blocks::markup::BlockSource;
use crate::blocks::DecoratedBlock;
use crate::error::Result;
use crate::models::IndexEntry;
use crate::page::PageContext;
use crate::pipeline::FilterOptions;
use crate::pipeline::filter::raw_tags_include;
use crate::services::ArticleFetcher;
use crate::utils::html::escape;

/// Articles tagged with any of `page_tags`, in tag order.
///
/// The current page is skipped and each path appears once.
pub fn related<'a>(
    articles: &'a [IndexEntry],
    page_tags: &[String],
    current_path: &str,
) -> Vec<&'a IndexEntry> {
    let mut seen = HashSet::new();
    let mut matches = Vec::new();
    for tag in page_tags {
        for article in articles {
            if !raw_tags_include(article.tags(), tag) || article.path() == Some(current_path) {
                continue;
            }
            if seen.insert(article.path()) {
                matches.push(article);
            }
        }
    }
    matches
}

pub fn render(articles: &[&IndexEntry]) -> String {
    if articles.is_empty() {
        return "<ul><li>No related articles</li></ul>".to_string();
    }
    let items: String = articles
        .iter()
        .map(|a| {
            format!(
                r#"<li><a href="{}">{}</a><p class="description">{}</p></li>"#,
                escape(a.path().unwrap_or_default()),
                escape(a.title().unwrap_or_default()),
                escape(a.get_str("description").unwrap_or_default()),
            )
        })
        .collect();
    format!("<ul>{items}</ul>")
}

/// Decorate a related articles block from the site's news index.
pub async fn decorate(
    block: &BlockSource,
    ctx: &mut PageContext,
    fetcher: &ArticleFetcher,
) -> Result<DecoratedBlock> {
    let articles = fetcher
        .fetch_news_articles(&[], &FilterOptions::default())
        .await;
    let matches = related(&articles, ctx.tags(), ctx.path());
    Ok(DecoratedBlock::new(block, render(&matches)))
}
