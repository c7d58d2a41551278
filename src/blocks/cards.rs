// src/blocks/cards.rs

//! Dynamic cards block: latest articles as cards, or as a tile grid with the
//! `tiles` class.

use std::fmt::Write;

use crate::blocks::markup::{self, BlockSource};
use crate::blocks::render::{article_picture, read_more};
use crate::blocks::{DecoratedBlock, feed_options};
use crate::error::Result;
use crate::models::IndexEntry;
use crate::page::PageContext;
use crate::services::ArticleFetcher;
use crate::utils::html::escape;

/// Tile size by position: one large, two medium, then small.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileSize {
    Large,
    Medium,
    Small,
}

impl TileSize {
    pub fn for_position(index: usize) -> Self {
        match index {
            0 => TileSize::Large,
            1 | 2 => TileSize::Medium,
            _ => TileSize::Small,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            TileSize::Large => "large",
            TileSize::Medium => "medium",
            TileSize::Small => "small",
        }
    }
}

fn text<'a>(article: &'a IndexEntry, field: &str) -> &'a str {
    article.get_str(field).unwrap_or_default()
}

fn card(article: &IndexEntry) -> String {
    let title = text(article, "title");
    let path = text(article, "path");
    let mut html = format!(
        r#"<li><div class="cards-card-image">{}</div><div class="cards-card-body"><h3>{}</h3><p>{}</p>"#,
        article_picture(text(article, "image"), title, false),
        escape(title),
        escape(text(article, "description")),
    );
    if !path.is_empty() {
        html.push_str(&read_more(path, "button primary"));
    }
    html.push_str("</div></li>");
    html
}

fn tile(article: &IndexEntry, size: TileSize) -> String {
    let title = text(article, "title");
    let path = escape(text(article, "path"));
    let mut html = format!(
        r#"<article class="tile tile-{}" data-href="{path}"><div class="tile-background">{}</div><div class="tile-overlay"></div><div class="tile-content"><h3 class="tile-title">{}</h3>"#,
        size.as_str(),
        article_picture(text(article, "image"), title, size == TileSize::Large),
        escape(title),
    );
    if size != TileSize::Small {
        let _ = write!(
            html,
            r#"<p class="tile-description">{}</p>"#,
            escape(text(article, "description"))
        );
    }
    let _ = write!(
        html,
        r#"<div class="tile-link"><a href="{path}" class="usa-button">Read More</a></div></div></article>"#
    );
    html
}

/// Markup for the fetched articles.
pub fn render(articles: &[IndexEntry], tiles: bool) -> String {
    if articles.is_empty() {
        return "<p>No articles available</p>".to_string();
    }
    if tiles {
        let grid: String = articles
            .iter()
            .enumerate()
            .map(|(i, article)| tile(article, TileSize::for_position(i)))
            .collect();
        format!(r#"<div class="tiles-grid">{grid}</div>"#)
    } else {
        let list: String = articles.iter().map(card).collect();
        format!("<ul>{list}</ul>")
    }
}

/// Decorate a dynamic cards block and register the articles it shows.
pub async fn decorate(
    block: &BlockSource,
    ctx: &mut PageContext,
    fetcher: &ArticleFetcher,
    default_limit: usize,
) -> Result<DecoratedBlock> {
    let config = markup::read_feed_config(block, default_limit);
    let options = feed_options(&config, ctx.shown_paths());
    let articles = fetcher.fetch_news_articles(&[], &options).await;

    for article in &articles {
        ctx.register_shown(text(article, "path"));
    }

    Ok(DecoratedBlock::new(block, render(&articles, block.has_class("tiles"))))
}
