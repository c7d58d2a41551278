// src/utils/url.rs

//! URL manipulation utilities.

use url::Url;

/// Whether a link is already absolute (`http://` or `https://`).
pub fn is_absolute(href: &str) -> bool {
    href.starts_with("http://") || href.starts_with("https://")
}

/// Anchor a possibly relative link at an origin.
///
/// Empty and absolute links are returned unchanged.
///
/// # Examples
/// ```
/// use newsroom::utils::url::resolve_against_origin;
///
/// assert_eq!(
///     resolve_against_origin("/news/a", "https://other.mil"),
///     "https://other.mil/news/a"
/// );
/// ```
pub fn resolve_against_origin(href: &str, origin: &str) -> String {
    if href.is_empty() || is_absolute(href) {
        return href.to_string();
    }
    if href.starts_with('/') {
        format!("{origin}{href}")
    } else {
        format!("{origin}/{href}")
    }
}

/// Serialized origin of a URL (`scheme://host[:port]`).
pub fn origin_of(url: &Url) -> String {
    url.origin().ascii_serialization()
}

/// Whether two URLs share an origin.
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.origin() == b.origin()
}

/// Resolve a link found in markup against the page URL.
pub fn resolve(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Whether a link leaves the site: absolute and not on the page's host.
pub fn is_external(href: &str, page_host: &str) -> bool {
    href.starts_with("http") && !href.contains(page_host)
}
