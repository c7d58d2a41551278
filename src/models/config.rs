//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client settings for query index requests
    #[serde(default)]
    pub http: HttpConfig,

    /// Site the blocks are decorated for
    #[serde(default)]
    pub site: SiteConfig,

    /// Collection block behavior
    #[serde(default)]
    pub collection: CollectionSettings,

    /// Dynamic cards block defaults
    #[serde(default)]
    pub cards: FeedDefaults,

    /// Dynamic carousel block defaults
    #[serde(default)]
    pub carousel: CarouselDefaults,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.http.chunk_size == 0 {
            return Err(AppError::validation("http.chunk_size must be > 0"));
        }
        let origin = self.site.origin_url()?;
        if origin.cannot_be_a_base() {
            return Err(AppError::validation("site.origin must be a base URL"));
        }
        if self.site.news_index.trim().is_empty() {
            return Err(AppError::validation("site.news_index is empty"));
        }
        if self.collection.max_visible_pages == 0 {
            return Err(AppError::validation(
                "collection.max_visible_pages must be > 0",
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            site: SiteConfig::default(),
            collection: CollectionSettings::default(),
            cards: FeedDefaults::default(),
            carousel: CarouselDefaults::default(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Entries requested per query index chunk
    #[serde(default = "defaults::chunk_size")]
    pub chunk_size: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            chunk_size: defaults::chunk_size(),
        }
    }
}

/// Site identity settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Origin the pages are served from (e.g. `https://www.example.mil`)
    #[serde(default = "defaults::origin")]
    pub origin: String,

    /// Default news query index path
    #[serde(default = "defaults::news_index")]
    pub news_index: String,
}

impl SiteConfig {
    /// Parse the configured origin.
    pub fn origin_url(&self) -> Result<Url> {
        Url::parse(&self.origin)
            .map_err(|e| AppError::config(format!("site.origin '{}': {e}", self.origin)))
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            origin: defaults::origin(),
            news_index: defaults::news_index(),
        }
    }
}

/// Collection block interaction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionSettings {
    /// Quiet period before a typed search is applied
    #[serde(default = "defaults::debounce_ms")]
    pub search_debounce_ms: u64,

    /// Page links shown before the window collapses into ellipses
    #[serde(default = "defaults::max_visible_pages")]
    pub max_visible_pages: usize,
}

impl CollectionSettings {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

impl Default for CollectionSettings {
    fn default() -> Self {
        Self {
            search_debounce_ms: defaults::debounce_ms(),
            max_visible_pages: defaults::max_visible_pages(),
        }
    }
}

/// Defaults for the dynamic cards block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedDefaults {
    /// Number of articles when the block sets no `limit`
    #[serde(default = "defaults::cards_limit")]
    pub limit: usize,
}

impl Default for FeedDefaults {
    fn default() -> Self {
        Self {
            limit: defaults::cards_limit(),
        }
    }
}

/// Defaults for the dynamic carousel block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselDefaults {
    /// Number of slides when the block sets no `limit`
    #[serde(default = "defaults::carousel_limit")]
    pub limit: usize,
}

impl Default for CarouselDefaults {
    fn default() -> Self {
        Self {
            limit: defaults::carousel_limit(),
        }
    }
}

mod defaults {
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; newsroom/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn chunk_size() -> usize {
        255
    }

    pub fn origin() -> String {
        "http://localhost:3000".into()
    }
    pub fn news_index() -> String {
        "/news/query-index.json".into()
    }

    pub fn debounce_ms() -> u64 {
        crate::pipeline::SEARCH_DEBOUNCE.as_millis() as u64
    }
    pub fn max_visible_pages() -> usize {
        crate::pipeline::MAX_VISIBLE_PAGES
    }

    pub fn cards_limit() -> usize {
        6
    }
    pub fn carousel_limit() -> usize {
        5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.collection.search_debounce_ms, 300);
        assert_eq!(config.cards.limit, 6);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [site]
            origin = "https://www.army.mil"

            [carousel]
            limit = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.site.origin, "https://www.army.mil");
        assert_eq!(config.site.news_index, "/news/query-index.json");
        assert_eq!(config.carousel.limit, 3);
        assert_eq!(config.http.chunk_size, 255);
    }

    #[test]
    fn test_missing_carousel_section_uses_carousel_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.carousel.limit, 5);
    }

    #[test]
    fn test_carousel_section_without_limit_keeps_carousel_default() {
        let config: Config = toml::from_str("[carousel]\n[cards]\n").unwrap();
        assert_eq!(config.carousel.limit, 5);
        assert_eq!(config.cards.limit, 6);
    }

    #[test]
    fn test_load_or_default_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http]\ntimeout_secs = 5").unwrap();

        let config = Config::load_or_default(file.path());
        assert_eq!(config.http.timeout_secs, 5);
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let config = Config::load_or_default("/nonexistent/config.toml");
        assert_eq!(config.http.timeout_secs, 30);
    }

    #[test]
    fn test_validate_rejects_bad_origin() {
        let mut config = Config::default();
        config.site.origin = "not a url".into();
        assert!(config.validate().is_err());
    }
}
