// src/blocks/render.rs

//! HTML builders for collection items, filter bar, pagination and article
//! images. Every text and attribute value goes through [`escape`].

use std::fmt::Write;

use crate::models::{CollectionLayout, Item};
use crate::pipeline::{PageLink, display_tag, page_window, parse_tags, title_case_tag};
use crate::utils::date::{format_calendar, format_iso_date, format_long};
use crate::utils::html::escape;
use crate::utils::url::is_external;
use crate::utils::value::is_truthy;

/// Filter bar contents.
#[derive(Debug, Clone, Default)]
pub struct FilterBar<'a> {
    pub tags: &'a [String],
    pub selected_tag: &'a str,
    pub search_query: &'a str,
    pub show_facets: bool,
    pub show_search: bool,
    /// Cursor offset when the search input should take focus
    pub focus: Option<usize>,
}

/// Build one `usa-collection__item`.
///
/// `page_host` decides which absolute links are marked external.
pub fn collection_item(item: &Item, layout: &CollectionLayout, page_host: &str) -> String {
    let mut html = String::from(r#"<li class="usa-collection__item">"#);
    let date = item.date.as_ref().filter(|d| is_truthy(d));

    if layout.calendar {
        if let Some(date) = date {
            let cal = format_calendar(date);
            let _ = write!(
                html,
                r#"<div class="usa-collection__calendar-date"><time datetime="{}"><span class="usa-collection__calendar-date-month">{}</span><span class="usa-collection__calendar-date-day">{}</span></time></div>"#,
                escape(&format_iso_date(date)),
                escape(&cal.month),
                escape(&cal.day),
            );
        }
    }

    if layout.thumbnail && !item.image.is_empty() {
        let alt = if item.image_alt.is_empty() { &item.title } else { &item.image_alt };
        let _ = write!(
            html,
            r#"<div class="usa-collection__img"><img src="{}" alt="{}" loading="lazy"></div>"#,
            escape(&item.image),
            escape(alt),
        );
    }

    html.push_str(r#"<div class="usa-collection__body"><h4 class="usa-collection__heading">"#);
    let title = escape(item.display_title());
    if item.path.is_empty() {
        html.push_str(&title);
    } else if is_external(&item.path, page_host) {
        let _ = write!(
            html,
            r#"<a class="usa-link usa-link--external" href="{}" rel="noopener noreferrer">{title}</a>"#,
            escape(&item.path),
        );
    } else {
        let _ = write!(html, r#"<a class="usa-link" href="{}">{title}</a>"#, escape(&item.path));
    }
    html.push_str("</h4>");

    if !layout.headings_only && !item.description.is_empty() {
        let _ = write!(
            html,
            r#"<p class="usa-collection__description">{}</p>"#,
            escape(&item.description)
        );
    }

    if !layout.headings_only && !layout.calendar {
        html.push_str(&meta_list(item, date));
    }

    if layout.headings_only && !item.source.is_empty() {
        let _ = write!(
            html,
            r#"<ul class="usa-collection__meta" aria-label="More information"><li class="usa-collection__meta-item">{}</li></ul>"#,
            escape(&item.source)
        );
    }

    html.push_str("</div></li>");
    html
}

/// Author, date and tags; empty when there is nothing to list.
fn meta_list(item: &Item, date: Option<&serde_json::Value>) -> String {
    let mut entries = Vec::new();

    if !item.author.is_empty() {
        entries.push(format!(
            r#"<li class="usa-collection__meta-item"><span>By {}</span></li>"#,
            escape(&item.author)
        ));
    }

    if let Some(date) = date {
        entries.push(format!(
            r#"<li class="usa-collection__meta-item"><time datetime="{}">{}</time></li>"#,
            escape(&format_iso_date(date)),
            escape(&format_long(date)),
        ));
    }

    for tag in parse_tags(item.tags.as_ref()) {
        entries.push(format!(
            r#"<li class="usa-collection__meta-item usa-tag">{}</li>"#,
            escape(&display_tag(&tag))
        ));
    }

    if entries.is_empty() {
        return String::new();
    }
    format!(
        r#"<ul class="usa-collection__meta" aria-label="More information">{}</ul>"#,
        entries.concat()
    )
}

/// Build the `usa-collection` list for one page of items.
pub fn collection_list(items: &[&Item], layout: &CollectionLayout, page_host: &str) -> String {
    let class = if layout.condensed {
        "usa-collection usa-collection--condensed"
    } else {
        "usa-collection"
    };
    let body: String = items
        .iter()
        .map(|item| collection_item(item, layout, page_host))
        .collect();
    format!(r#"<ul class="{class}">{body}</ul>"#)
}

/// Build the facet dropdown and search field.
///
/// The dropdown is left out when facets are off or there are no tags.
pub fn filter_bar(bar: &FilterBar<'_>) -> String {
    let mut html = String::from(r#"<div class="collection-filter">"#);

    if bar.show_facets && !bar.tags.is_empty() {
        html.push_str(
            r#"<div class="collection-filter__facet"><label class="collection-filter__label" for="collection-tag-filter">Filter by topic:</label><select class="collection-filter__select" id="collection-tag-filter">"#,
        );
        let selected = |on: bool| if on { " selected" } else { "" };
        let _ = write!(
            html,
            r#"<option value=""{}>All</option>"#,
            selected(bar.selected_tag.is_empty())
        );
        for tag in bar.tags {
            let _ = write!(
                html,
                r#"<option value="{}"{}>{}</option>"#,
                escape(tag),
                selected(tag == bar.selected_tag),
                escape(&title_case_tag(tag)),
            );
        }
        html.push_str("</select></div>");
    }

    if bar.show_search {
        html.push_str(
            r#"<div class="collection-filter__search"><label class="collection-filter__label" for="collection-search">Search:</label>"#,
        );
        let _ = write!(
            html,
            r#"<input type="text" class="collection-filter__input" id="collection-search" placeholder="Enter keywords..." value="{}""#,
            escape(bar.search_query)
        );
        if let Some(cursor) = bar.focus {
            let _ = write!(html, r#" autofocus data-selection-start="{cursor}""#);
        }
        html.push_str("></div>");
    }

    html.push_str("</div>");
    html
}

fn page_item(page: usize, current: usize) -> String {
    if page == current {
        format!(
            r##"<li class="usa-pagination__item usa-pagination__page-no"><a href="#" class="usa-pagination__button usa-current" aria-label="Page {page}" aria-current="page" data-page="{page}">{page}</a></li>"##
        )
    } else {
        format!(
            r##"<li class="usa-pagination__item usa-pagination__page-no"><a href="#" class="usa-pagination__button" aria-label="Page {page}" data-page="{page}">{page}</a></li>"##
        )
    }
}

/// Build the pagination nav for `current` out of `total` pages.
///
/// Arrow items are always present; their links only when there is a page
/// to move to.
pub fn pagination(current: usize, total: usize, max_visible: usize) -> String {
    let current = current.clamp(1, total.max(1));
    let mut html = String::from(
        r#"<nav class="usa-pagination" aria-label="Pagination"><ul class="usa-pagination__list">"#,
    );

    html.push_str(r#"<li class="usa-pagination__item usa-pagination__arrow">"#);
    if current > 1 {
        let _ = write!(
            html,
            r##"<a href="#" class="usa-pagination__link usa-pagination__previous-page" aria-label="Previous page" data-page="{}"><span class="usa-pagination__link-text">Previous</span></a>"##,
            current - 1
        );
    }
    html.push_str("</li>");

    for link in page_window(current, total, max_visible) {
        match link {
            PageLink::Page(page) => html.push_str(&page_item(page, current)),
            PageLink::Ellipsis => html.push_str(
                r#"<li class="usa-pagination__item usa-pagination__overflow" aria-hidden="true"><span>…</span></li>"#,
            ),
        }
    }

    html.push_str(r#"<li class="usa-pagination__item usa-pagination__arrow">"#);
    if current < total {
        let _ = write!(
            html,
            r##"<a href="#" class="usa-pagination__link usa-pagination__next-page" aria-label="Next page" data-page="{}"><span class="usa-pagination__link-text">Next</span></a>"##,
            current + 1
        );
    }
    html.push_str("</li></ul></nav>");
    html
}

/// Text for a page with no items, naming the active search and tag.
pub fn empty_text(search_query: &str, selected_tag: &str) -> String {
    match (search_query.is_empty(), selected_tag.is_empty()) {
        (false, false) => format!(
            r#"No items found matching "{search_query}" with tag "{}"."#,
            title_case_tag(selected_tag)
        ),
        (false, true) => format!(r#"No items found matching "{search_query}"."#),
        (true, false) => format!(r#"No items found with tag "{}"."#, title_case_tag(selected_tag)),
        (true, true) => "No items available.".to_string(),
    }
}

/// `<p class="usa-collection__empty">` with [`empty_text`].
pub fn empty_message(search_query: &str, selected_tag: &str) -> String {
    format!(
        r#"<p class="usa-collection__empty">{}</p>"#,
        escape(&empty_text(search_query, selected_tag))
    )
}

/// Responsive `<picture>` for an article image at 750x375.
pub fn article_picture(src: &str, alt: &str, eager: bool) -> String {
    sized_picture(src, alt, eager, 750, 375)
}

/// Responsive `<picture>` with webp and progressive jpeg renditions.
pub fn sized_picture(src: &str, alt: &str, eager: bool, width: u32, height: u32) -> String {
    let src = escape(src);
    let loading = if eager { "eager" } else { "lazy" };
    format!(
        r#"<picture><source type="image/webp" srcset="{src}?format=webply&amp;optimize=medium" media="(min-width: 600px)"><source type="image/webp" srcset="{src}?format=webply&amp;optimize=medium"><source type="image/jpeg" srcset="{src}?format=pjpg&amp;optimize=medium" media="(min-width: 600px)"><img loading="{loading}" alt="{}" src="{src}?format=pjpg&amp;optimize=medium" width="{width}" height="{height}"></picture>"#,
        escape(alt)
    )
}

/// `Read More` button in a `button-container` paragraph.
pub fn read_more(path: &str, class: &str) -> String {
    format!(
        r#"<p class="button-container"><a href="{}" class="{class}">Read More</a></p>"#,
        escape(path)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // 2024-01-05T12:00:00Z
    const JAN_5: i64 = 1_704_456_000_000;

    fn item() -> Item {
        Item {
            path: "/news/a".into(),
            title: "Alpha & Omega".into(),
            description: "First and last".into(),
            image: "/media/a.jpg".into(),
            image_alt: String::new(),
            date: Some(json!(JAN_5)),
            author: "Jane".into(),
            tags: Some(json!("space-force, training")),
            source: String::new(),
        }
    }

    #[test]
    fn test_default_item_has_meta() {
        let html = collection_item(&item(), &CollectionLayout::default(), "www.army.mil");
        assert!(html.contains(r#"<a class="usa-link" href="/news/a">Alpha &amp; Omega</a>"#));
        assert!(html.contains(r#"<p class="usa-collection__description">First and last</p>"#));
        assert!(html.contains("<span>By Jane</span>"));
        assert!(html.contains(r#"<time datetime="2024-01-05">January 5, 2024</time>"#));
        assert!(html.contains(r#"<li class="usa-collection__meta-item usa-tag">space force</li>"#));
        assert!(!html.contains("usa-collection__img"));
    }

    #[test]
    fn test_calendar_and_thumbnail() {
        let layout = CollectionLayout {
            thumbnail: true,
            calendar: true,
            ..Default::default()
        };
        let html = collection_item(&item(), &layout, "www.army.mil");
        assert!(html.contains(r#"<span class="usa-collection__calendar-date-month">JAN</span>"#));
        assert!(html.contains(r#"<img src="/media/a.jpg" alt="Alpha &amp; Omega" loading="lazy">"#));
        assert!(!html.contains("usa-collection__meta"));
    }

    #[test]
    fn test_headings_only() {
        let layout = CollectionLayout {
            headings_only: true,
            ..Default::default()
        };
        let html = collection_item(&item(), &layout, "www.army.mil");
        assert!(!html.contains("usa-collection__description"));
        assert!(!html.contains("usa-collection__meta"));
    }

    #[test]
    fn test_source_label_only_in_headings_only() {
        let mut sourced = item();
        sourced.source = "DVIDS".into();
        let source_li = r#"<li class="usa-collection__meta-item">DVIDS</li>"#;

        let html = collection_item(&sourced, &CollectionLayout::default(), "www.army.mil");
        assert!(!html.contains(source_li));

        let layout = CollectionLayout {
            headings_only: true,
            ..Default::default()
        };
        let html = collection_item(&sourced, &layout, "www.army.mil");
        assert!(html.contains(source_li));
        assert!(!html.contains("By Jane"));
    }

    #[test]
    fn test_pagination_clamps_current_page() {
        let html = pagination(15, 10, 7);
        assert!(html.contains(r#"aria-label="Page 10" aria-current="page""#));
        assert!(html.contains(r#"data-page="9"><span class="usa-pagination__link-text">Previous</span>"#));
        assert!(!html.contains("usa-pagination__next-page"));
    }

    #[test]
    fn test_external_link_and_untitled() {
        let mut external = item();
        external.path = "https://www.navy.mil/news/b".into();
        let html = collection_item(&external, &CollectionLayout::default(), "www.army.mil");
        assert!(html.contains("usa-link--external"));
        assert!(html.contains(r#"rel="noopener noreferrer""#));

        let bare = Item {
            path: String::new(),
            title: String::new(),
            ..Default::default()
        };
        let html = collection_item(&bare, &CollectionLayout::default(), "www.army.mil");
        assert!(html.contains(r#"<h4 class="usa-collection__heading">Untitled</h4>"#));
        assert!(!html.contains("usa-collection__meta"));
    }

    #[test]
    fn test_filter_bar() {
        let tags = vec!["space-force".to_string(), "training".to_string()];
        let html = filter_bar(&FilterBar {
            tags: &tags,
            selected_tag: "training",
            search_query: "\"boat\"",
            show_facets: true,
            show_search: true,
            focus: Some(3),
        });
        assert!(html.contains(r#"<option value="">All</option>"#));
        assert!(html.contains(r#"<option value="space-force">Space Force</option>"#));
        assert!(html.contains(r#"<option value="training" selected>Training</option>"#));
        assert!(html.contains(r#"value="&quot;boat&quot;" autofocus data-selection-start="3""#));
    }

    #[test]
    fn test_filter_bar_hides_empty_facets() {
        let html = filter_bar(&FilterBar {
            show_facets: true,
            show_search: true,
            ..Default::default()
        });
        assert!(!html.contains("collection-tag-filter"));
        assert!(html.contains("collection-search"));
    }

    #[test]
    fn test_pagination_markup() {
        let html = pagination(1, 10, 7);
        assert!(!html.contains("usa-pagination__previous-page"));
        assert!(html.contains(r#"data-page="2"><span class="usa-pagination__link-text">Next</span>"#));
        assert!(html.contains(r#"aria-label="Page 1" aria-current="page""#));
        assert_eq!(html.matches("usa-pagination__overflow").count(), 1);
        assert!(html.contains(r#"aria-label="Page 10""#));
        assert!(!html.contains(r#"aria-label="Page 8""#));
    }

    #[test]
    fn test_empty_text_variants() {
        assert_eq!(
            empty_text("boat", "space-force"),
            r#"No items found matching "boat" with tag "Space Force"."#
        );
        assert_eq!(empty_text("boat", ""), r#"No items found matching "boat"."#);
        assert_eq!(empty_text("", "training"), r#"No items found with tag "Training"."#);
        assert_eq!(empty_text("", ""), "No items available.");
    }

    #[test]
    fn test_article_picture() {
        let html = article_picture("/media/a.jpg", "A", false);
        assert!(html.contains(r#"srcset="/media/a.jpg?format=webply&amp;optimize=medium""#));
        assert!(html.contains(r#"<img loading="lazy" alt="A""#));
        assert!(html.contains(r#"width="750" height="375""#));
        assert!(sized_picture("/h.jpg", "H", true, 2000, 1000).contains(r#"loading="eager""#));
    }
}
