// src/pipeline/state.rs

//! Collection render state and its reducer.
//!
//! Every interaction is an [`Action`]; [`reduce`] turns the current state
//! and the action into the next state without touching markup. Rendering
//! is a separate step driven by the returned state.

use serde::{Deserialize, Serialize};

/// Filter, search and page selection of one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderState {
    /// 1-indexed
    pub current_page: usize,
    /// Empty means no tag filter
    pub selected_tag: String,
    /// Empty means no search filter
    pub search_query: String,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            current_page: 1,
            selected_tag: String::new(),
            search_query: String::new(),
        }
    }
}

/// A user interaction with a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Facet dropdown changed; empty selects "All"
    SelectTag(String),
    /// Search text applied (after debounce or on Enter)
    Search(String),
    /// Page link clicked
    GoToPage(usize),
}

/// Compute the state following `action`.
///
/// Tag and search changes start over at page 1. Clicking the current page
/// (or a page below 1) leaves the state untouched.
pub fn reduce(state: &RenderState, action: Action) -> RenderState {
    match action {
        Action::SelectTag(tag) => RenderState {
            current_page: 1,
            selected_tag: tag,
            search_query: state.search_query.clone(),
        },
        Action::Search(query) => RenderState {
            current_page: 1,
            selected_tag: state.selected_tag.clone(),
            search_query: query,
        },
        Action::GoToPage(page) if page == 0 || page == state.current_page => state.clone(),
        Action::GoToPage(page) => RenderState {
            current_page: page,
            ..state.clone()
        },
    }
}
