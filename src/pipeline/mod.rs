//! In-memory processing of fetched items.
//!
//! - `filter`: featured/category/tag/field filters, exclusions, sort, limit
//! - `tags`: tag parsing, facet vocabulary and keyword search
//! - `pagination`: page slices and the page-number window
//! - `state`: collection render state and its reducer
//! - `debounce`: debounced search input

pub mod debounce;
pub mod filter;
pub mod pagination;
pub mod state;
pub mod tags;

pub use debounce::{SEARCH_DEBOUNCE, SearchInput, debounce_search, spawn_search_debouncer};
pub use filter::{FilterOptions, apply};
pub use pagination::{MAX_VISIBLE_PAGES, PageLink, PageSlice, page_window, paginate};
pub use state::{Action, RenderState, reduce};
pub use tags::{
    display_tag, filter_by_search, filter_by_tag, parse_tags, title_case_tag, unique_tags,
};
