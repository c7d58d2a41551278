// src/blocks/hero.rs

//! Dynamic hero block.
//!
//! Uses hand-authored content when the first row holds a picture, otherwise
//! the most recent featured article.

use crate::blocks::markup::{self, BlockSource, HeroContent};
use crate::blocks::render::{read_more, sized_picture};
use crate::blocks::DecoratedBlock;
use crate::error::Result;
use crate::models::{IndexEntry, SortKey};
use crate::page::PageContext;
use crate::pipeline::FilterOptions;
use crate::services::ArticleFetcher;
use crate::utils::html::escape;

/// Markup for authored hero content.
pub fn render_manual(content: &HeroContent) -> String {
    let mut html = content.picture.clone();
    html.push_str(r#"<div class="dynamic-hero-content">"#);
    if !content.headline.is_empty() {
        html.push_str(&format!("<h1>{}</h1>", escape(&content.headline)));
    }
    if !content.description.is_empty() {
        html.push_str(&format!("<p>{}</p>", escape(&content.description)));
    }
    if let Some((href, label)) = &content.cta {
        html.push_str(&format!(
            r#"<p class="button-container"><a href="{}" class="usa-button">{}</a></p>"#,
            escape(href),
            escape(label)
        ));
    }
    html.push_str("</div>");
    html
}

/// Markup for a featured article, or the empty message.
pub fn render_article(article: Option<&IndexEntry>) -> String {
    let Some(article) = article else {
        return "<p>No featured article available</p>".to_string();
    };

    let title = article.title().unwrap_or_default();
    let path = article.path().unwrap_or_default();
    let mut html = sized_picture(article.get_str("image").unwrap_or_default(), title, true, 2000, 1000);
    html.push_str(&format!(
        r#"<div class="dynamic-hero-content"><h1>{}</h1><p>{}</p>"#,
        escape(title),
        escape(article.get_str("description").unwrap_or_default()),
    ));
    if !path.is_empty() {
        html.push_str(&read_more(path, "usa-button"));
    }
    html.push_str("</div>");
    html
}

/// Decorate a hero block and register the article it links to.
pub async fn decorate(
    block: &BlockSource,
    ctx: &mut PageContext,
    fetcher: &ArticleFetcher,
) -> Result<DecoratedBlock> {
    if let Some(content) = markup::read_hero_content(block)? {
        if let Some((href, _)) = &content.cta {
            ctx.register_shown(href);
        }
        return Ok(DecoratedBlock::new(block, render_manual(&content)));
    }

    let options = FilterOptions {
        featured: true,
        sort_by: Some(SortKey::Date),
        limit: 1,
        ..Default::default()
    };
    let articles = fetcher.fetch_news_articles(&[], &options).await;
    let article = articles.first();
    if let Some(path) = article.and_then(IndexEntry::path) {
        ctx.register_shown(path);
    }

    Ok(DecoratedBlock::new(block, render_article(article)))
}
