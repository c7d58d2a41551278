// src/pipeline/pagination.rs

//! Page arithmetic and the page-number window.

use std::ops::Range;

/// Page links shown when the configuration does not say otherwise.
pub const MAX_VISIBLE_PAGES: usize = 7;

/// One entry of the page-number list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page(usize),
    Ellipsis,
}

/// The slice of a result list shown on one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSlice {
    /// 1-indexed page actually shown
    pub page: usize,
    pub total_pages: usize,
    pub range: Range<usize>,
}

/// Compute the page slice for `len` results.
///
/// `per_page == 0` shows everything on a single page. Pages outside
/// `1..=total_pages` are clamped.
pub fn paginate(len: usize, per_page: usize, page: usize) -> PageSlice {
    if per_page == 0 {
        return PageSlice {
            page: 1,
            total_pages: 1,
            range: 0..len,
        };
    }

    let total_pages = len.div_ceil(per_page);
    let page = page.clamp(1, total_pages.max(1));
    let start = ((page - 1) * per_page).min(len);
    let end = (start + per_page).min(len);

    PageSlice {
        page,
        total_pages,
        range: start..end,
    }
}

/// Page links for `current` out of `total` pages.
///
/// At most `max_visible` consecutive pages are listed, centered on the
/// current page and clamped to the valid range. The first and last page are
/// always reachable, with an ellipsis when the window does not touch them.
/// A `current` outside `1..=total` is clamped.
pub fn page_window(current: usize, total: usize, max_visible: usize) -> Vec<PageLink> {
    let max_visible = max_visible.max(1);
    let current = current.clamp(1, total.max(1));
    let mut start = 1;
    let mut end = total;

    if total > max_visible {
        let half = max_visible / 2;
        start = current.saturating_sub(half).max(1);
        end = (start + max_visible - 1).min(total);
        if end - start < max_visible - 1 {
            start = end.saturating_sub(max_visible - 1).max(1);
        }
    }

    let mut links = Vec::with_capacity(max_visible + 4);
    if start > 1 {
        links.push(PageLink::Page(1));
        if start > 2 {
            links.push(PageLink::Ellipsis);
        }
    }

    links.extend((start..=end).map(PageLink::Page));

    if end < total {
        if end + 1 < total {
            links.push(PageLink::Ellipsis);
        }
        links.push(PageLink::Page(total));
    }

    links
}
