// src/blocks/collection.rs

//! Collection block.
//!
//! Lists authored rows (static mode) or the entries of a query index
//! (dynamic mode), with optional tag facet, keyword search and pagination.
//! Interaction goes through [`CollectionController::dispatch`], which
//! reduces the action into a new [`RenderState`] and renders it.

use url::Url;

use crate::blocks::markup::{self, BlockSource};
use crate::blocks::render::{self, FilterBar};
use crate::error::Result;
use crate::models::{CollectionConfig, CollectionLayout, CollectionSettings, Item};
use crate::pipeline::{
    Action, FilterOptions, PageSlice, RenderState, filter_by_search, filter_by_tag, paginate,
    reduce, unique_tags,
};
use crate::services::ArticleFetcher;

/// Focus snapshot of the search input, taken before a rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchFocus {
    /// Caret offset in characters
    pub cursor: usize,
}

/// Result of rendering a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Inner HTML of the block
    pub html: String,
    /// The page changed; bring the top of the block into view
    pub scroll_into_view: bool,
    /// Caret offset to restore in the rebuilt search input
    pub restore_focus: Option<usize>,
}

/// State and items of one decorated collection block.
#[derive(Debug, Clone)]
pub struct CollectionController {
    items: Vec<Item>,
    all_tags: Vec<String>,
    layout: CollectionLayout,
    config: CollectionConfig,
    max_visible_pages: usize,
    page_host: String,
    state: RenderState,
}

impl CollectionController {
    /// Take ownership of the collection's items.
    ///
    /// The facet vocabulary is computed here, once, from all items.
    pub fn new(
        items: Vec<Item>,
        layout: CollectionLayout,
        config: CollectionConfig,
        settings: &CollectionSettings,
        page_host: impl Into<String>,
    ) -> Self {
        let all_tags = if config.facets { unique_tags(&items) } else { Vec::new() };
        Self {
            items,
            all_tags,
            layout,
            config,
            max_visible_pages: settings.max_visible_pages,
            page_host: page_host.into(),
            state: RenderState::default(),
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn all_tags(&self) -> &[String] {
        &self.all_tags
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    /// Items matching the selected tag and search, and the current page.
    pub fn visible(&self) -> (Vec<&Item>, PageSlice) {
        let filtered = filter_by_tag(&self.items, &self.state.selected_tag);
        let filtered = filter_by_search(filtered, &self.state.search_query);
        let slice = paginate(filtered.len(), self.config.pagination, self.state.current_page);
        let page = filtered[slice.range.clone()].to_vec();
        (page, slice)
    }

    /// Render the current state.
    pub fn render(&self) -> Rendered {
        self.render_with(None, false)
    }

    /// Apply an action and render the result.
    ///
    /// `focus` is the search input's focus before the rebuild, if it had it.
    pub fn dispatch(&mut self, action: Action, focus: Option<SearchFocus>) -> Rendered {
        let previous_page = self.state.current_page;
        let is_page_change = matches!(action, Action::GoToPage(_));

        self.state = reduce(&self.state, action);
        let (_, slice) = self.visible();
        if slice.total_pages > 0 {
            self.state.current_page = slice.page;
        }

        let scroll = is_page_change && self.state.current_page != previous_page;
        self.render_with(focus, scroll)
    }

    fn render_with(&self, focus: Option<SearchFocus>, scroll_into_view: bool) -> Rendered {
        if self.items.is_empty() {
            return Rendered {
                html: render::empty_message("", ""),
                scroll_into_view: false,
                restore_focus: None,
            };
        }

        let (page_items, slice) = self.visible();
        let query = self.state.search_query.as_str();
        let tag = self.state.selected_tag.as_str();
        let restore_focus = focus
            .filter(|_| self.config.search)
            .map(|f| f.cursor.min(query.chars().count()));

        let mut html = String::new();
        if self.config.facets || self.config.search {
            html.push_str(&render::filter_bar(&FilterBar {
                tags: &self.all_tags,
                selected_tag: tag,
                search_query: query,
                show_facets: self.config.facets,
                show_search: self.config.search,
                focus: restore_focus,
            }));
        }

        if page_items.is_empty() {
            html.push_str(&render::empty_message(query, tag));
        } else {
            html.push_str(&render::collection_list(&page_items, &self.layout, &self.page_host));
            if self.config.pagination > 0 && slice.total_pages > 1 {
                html.push_str(&render::pagination(
                    slice.page,
                    slice.total_pages,
                    self.max_visible_pages,
                ));
            }
        }

        Rendered {
            html,
            scroll_into_view,
            restore_focus,
        }
    }
}

/// Read the block's items: the configured query index, else its content rows.
///
/// Items with neither a path nor a title are dropped.
pub async fn load_items(
    block: &BlockSource,
    config: &CollectionConfig,
    page_url: &Url,
    fetcher: &ArticleFetcher,
) -> Result<Vec<Item>> {
    let (_, content) = markup::read_collection_config(block, page_url);

    let items = match &config.source {
        Some(source) => {
            let entries = fetcher.fetch_all(std::slice::from_ref(source)).await;
            let options = FilterOptions {
                category: config.category.clone(),
                tag: config.tag.clone(),
                filter: config.filter.clone(),
                sort_by: config.sort_by,
                limit: config.limit,
                ..Default::default()
            };
            crate::pipeline::apply(entries, &options)
                .iter()
                .map(Item::from_entry)
                .collect()
        }
        None => {
            let mut items = Vec::with_capacity(content.len());
            for row in content {
                let item = markup::parse_static_row(row, page_url)?;
                if item.is_displayable() {
                    items.push(item);
                }
            }
            items
        }
    };

    log::debug!("Collection loaded {} items", items.len());
    Ok(items)
}

/// Decorate a collection block.
pub async fn decorate(
    block: &BlockSource,
    page_url: &Url,
    fetcher: &ArticleFetcher,
    settings: &CollectionSettings,
) -> Result<CollectionController> {
    let (config, _) = markup::read_collection_config(block, page_url);
    let layout = CollectionLayout::from_classes(block.classes.iter().map(String::as_str));
    let items = load_items(block, &config, page_url, fetcher).await?;
    let host = page_url.host_str().unwrap_or_default();

    Ok(CollectionController::new(items, layout, config, settings, host))
}
