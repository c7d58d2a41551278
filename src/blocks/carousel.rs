// src/blocks/carousel.rs

//! Dynamic carousel block.
//!
//! Slides are rendered with the first one active. Carousels with more than
//! one slide also get slide indicators and previous/next buttons.

use std::fmt::Write;

use crate::blocks::markup::{self, BlockSource};
use crate::blocks::render::{article_picture, read_more};
use crate::blocks::{DecoratedBlock, feed_options};
use crate::error::Result;
use crate::models::IndexEntry;
use crate::page::PageContext;
use crate::services::ArticleFetcher;
use crate::utils::html::escape;

fn slide(article: &IndexEntry, index: usize, carousel_id: usize) -> String {
    let title = article.title().unwrap_or_default();
    let path = article.path().unwrap_or_default();
    let slide_id = format!("carousel-{carousel_id}-slide-{index}");
    let hidden = if index == 0 { "false" } else { "true" };

    let mut content = format!(
        r#"<h3 id="{slide_id}-title">{}</h3><p>{}</p>"#,
        escape(title),
        escape(article.get_str("description").unwrap_or_default()),
    );
    if !path.is_empty() {
        let button = read_more(path, "usa-button");
        if index == 0 {
            content.push_str(&button);
        } else {
            content.push_str(&button.replacen("<a ", r#"<a tabindex="-1" "#, 1));
        }
    }

    format!(
        r#"<li class="carousel-slide" id="{slide_id}" data-slide-index="{index}" aria-labelledby="{slide_id}-title" aria-hidden="{hidden}"><div class="carousel-slide-image">{}</div><div class="carousel-slide-content">{content}</div></li>"#,
        article_picture(article.get_str("image").unwrap_or_default(), title, false),
    )
}

fn indicators(count: usize) -> String {
    let mut html = String::from(
        r#"<nav aria-label="Carousel Slide Controls"><ol class="carousel-slide-indicators">"#,
    );
    for index in 0..count {
        let current = if index == 0 { r#" disabled aria-current="true""# } else { "" };
        let _ = write!(
            html,
            r#"<li class="carousel-slide-indicator" data-target-slide="{index}"><button type="button" aria-label="Show Slide {} of {count}"{current}></button></li>"#,
            index + 1
        );
    }
    html.push_str("</ol></nav>");
    html
}

/// Markup for the fetched articles.
pub fn render(articles: &[IndexEntry], carousel_id: usize) -> String {
    if articles.is_empty() {
        return "<p>No articles available</p>".to_string();
    }

    let single = articles.len() < 2;
    let mut html = String::from(r#"<div class="carousel-slides-container">"#);
    if !single {
        html.push_str(
            r#"<div class="carousel-navigation-buttons"><button type="button" class="slide-prev" aria-label="Previous Slide"></button><button type="button" class="slide-next" aria-label="Next Slide"></button></div>"#,
        );
    }
    html.push_str(r#"<ul class="carousel-slides">"#);
    for (index, article) in articles.iter().enumerate() {
        html.push_str(&slide(article, index, carousel_id));
    }
    html.push_str("</ul></div>");

    if !single {
        html.push_str(&indicators(articles.len()));
    }
    html
}

/// Decorate a dynamic carousel block and register the articles it shows.
pub async fn decorate(
    block: &BlockSource,
    ctx: &mut PageContext,
    fetcher: &ArticleFetcher,
    default_limit: usize,
) -> Result<DecoratedBlock> {
    let carousel_id = ctx.next_carousel_id();
    let config = markup::read_feed_config(block, default_limit);
    let options = feed_options(&config, ctx.shown_paths());
    let articles = fetcher.fetch_news_articles(&[], &options).await;

    for article in &articles {
        ctx.register_shown(article.path().unwrap_or_default());
    }

    let decorated = DecoratedBlock::new(block, render(&articles, carousel_id))
        .with_attribute("id", format!("carousel-{carousel_id}"));
    if articles.is_empty() {
        return Ok(decorated);
    }
    Ok(decorated
        .with_attribute("role", "region")
        .with_attribute("aria-roledescription", "Carousel")
        .with_attribute("data-active-slide", "0"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn articles(count: usize) -> Vec<IndexEntry> {
        (0..count)
            .map(|n| IndexEntry::from(json!({"path": format!("/news/{n}"), "title": format!("Slide {n}")})))
            .collect()
    }

    #[test]
    fn test_multiple_slides_have_controls() {
        let html = render(&articles(3), 2);
        assert!(html.contains(r#"id="carousel-2-slide-0""#));
        assert!(html.contains(r#"aria-labelledby="carousel-2-slide-2-title""#));
        assert!(html.contains("carousel-navigation-buttons"));
        assert_eq!(html.matches(r#"class="carousel-slide-indicator""#).count(), 3);
        assert!(html.contains(r#"aria-label="Show Slide 1 of 3" disabled aria-current="true""#));
        assert_eq!(html.matches(r#"aria-hidden="true""#).count(), 2);
        assert_eq!(html.matches(r#"tabindex="-1""#).count(), 2);
    }

    #[test]
    fn test_single_slide_has_no_controls() {
        let html = render(&articles(1), 1);
        assert!(!html.contains("carousel-navigation-buttons"));
        assert!(!html.contains("carousel-slide-indicators"));
        assert_eq!(html.matches("carousel-slide\"").count(), 1);
    }

    #[test]
    fn test_empty() {
        assert_eq!(render(&[], 1), "<p>No articles available</p>");
    }
}
