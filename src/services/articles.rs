// src/services/articles.rs

//! Article aggregation service.
//!
//! Fetches one or more query indexes concurrently, anchors cross-origin
//! links at their source origin, and concatenates the results in source
//! order. A failing source is logged and contributes nothing.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{HttpConfig, IndexEntry, QueryIndex};
use crate::pipeline::filter::{self, FilterOptions};
use crate::utils::http::create_async_client;
use crate::utils::url::{origin_of, resolve_against_origin, same_origin};

/// Where query index documents come from.
#[async_trait]
pub trait IndexSource: Send + Sync {
    /// Fetch every entry of the index at `url`.
    async fn fetch_index(&self, url: &Url) -> Result<Vec<IndexEntry>>;
}

/// Query indexes served over HTTP.
///
/// Requests the index in chunks of `chunk_size` entries (`offset`/`limit`
/// query parameters) for as long as the response reports a larger `total`.
/// URLs that already carry a `limit` parameter are fetched once as given.
pub struct HttpIndexSource {
    client: Client,
    chunk_size: usize,
}

impl HttpIndexSource {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        Ok(Self::with_client(create_async_client(config)?, config.chunk_size))
    }

    pub fn with_client(client: Client, chunk_size: usize) -> Self {
        Self {
            client,
            chunk_size: chunk_size.max(1),
        }
    }

    async fn fetch_chunk(&self, url: &Url) -> Result<QueryIndex> {
        log::debug!("Fetching query index chunk {url}");
        let response = self.client.get(url.as_str()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Status {
                source_url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl IndexSource for HttpIndexSource {
    async fn fetch_index(&self, url: &Url) -> Result<Vec<IndexEntry>> {
        if url.query_pairs().any(|(key, _)| key == "limit") {
            return Ok(self.fetch_chunk(url).await?.data);
        }

        let mut entries = Vec::new();
        loop {
            let chunk_url = chunk_url(url, entries.len(), self.chunk_size);
            let chunk = self.fetch_chunk(&chunk_url).await?;
            let received = chunk.data.len();
            entries.extend(chunk.data);

            match chunk.total {
                Some(total) if received > 0 && entries.len() < total => continue,
                _ => break,
            }
        }
        Ok(entries)
    }
}

/// Append `offset` and `limit` parameters to an index URL.
pub fn chunk_url(url: &Url, offset: usize, limit: usize) -> Url {
    let mut chunk = url.clone();
    chunk
        .query_pairs_mut()
        .append_pair("offset", &offset.to_string())
        .append_pair("limit", &limit.to_string());
    chunk
}

/// Query indexes held in memory, keyed by URL or by path.
///
/// Unknown URLs fail like a missing document unless a fallback is set.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndexSource {
    indexes: HashMap<String, Vec<IndexEntry>>,
    fallback: Option<Vec<IndexEntry>>,
}

impl MemoryIndexSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register entries for a full URL or a path such as `/news/query-index.json`.
    pub fn with_index(mut self, key: impl Into<String>, entries: Vec<IndexEntry>) -> Self {
        self.indexes.insert(key.into(), entries);
        self
    }

    /// Serve `entries` for any URL that is not registered.
    pub fn with_fallback(mut self, entries: Vec<IndexEntry>) -> Self {
        self.fallback = Some(entries);
        self
    }

    /// Read a query index JSON document from disk as the fallback index.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let index: QueryIndex = serde_json::from_str(&content)?;
        Ok(Self::new().with_fallback(index.data))
    }
}

#[async_trait]
impl IndexSource for MemoryIndexSource {
    async fn fetch_index(&self, url: &Url) -> Result<Vec<IndexEntry>> {
        self.indexes
            .get(url.as_str())
            .or_else(|| self.indexes.get(url.path()))
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or_else(|| AppError::fetch(url.as_str(), "no index registered"))
    }
}

/// Aggregates articles for the blocks of one site.
#[derive(Clone)]
pub struct ArticleFetcher {
    source: Arc<dyn IndexSource>,
    origin: Url,
    default_index: String,
}

impl ArticleFetcher {
    /// Create a fetcher for pages served from `origin`.
    pub fn new(source: Arc<dyn IndexSource>, origin: Url, default_index: impl Into<String>) -> Self {
        Self {
            source,
            origin,
            default_index: default_index.into(),
        }
    }

    /// Fetch one source; failures are logged and yield no entries.
    pub async fn fetch_from_source(&self, source: &str) -> Vec<IndexEntry> {
        let url = match self.origin.join(source) {
            Ok(url) => url,
            Err(e) => {
                log::warn!("Error fetching from {source}: invalid URL ({e})");
                return Vec::new();
            }
        };

        let mut entries = match self.source.fetch_index(&url).await {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Error fetching from {source}: {e}");
                return Vec::new();
            }
        };

        if !same_origin(&url, &self.origin) {
            let source_origin = origin_of(&url);
            for entry in &mut entries {
                anchor_links(entry, &source_origin);
            }
        }

        log::debug!("Fetched {} entries from {source}", entries.len());
        entries
    }

    /// Fetch all sources concurrently and concatenate them in order.
    pub async fn fetch_all(&self, sources: &[String]) -> Vec<IndexEntry> {
        let results = join_all(sources.iter().map(|s| self.fetch_from_source(s))).await;
        results.into_iter().flatten().collect()
    }

    /// Fetch news articles and run them through the filter pipeline.
    ///
    /// With no sources the site's default news index is used.
    pub async fn fetch_news_articles(
        &self,
        sources: &[String],
        options: &FilterOptions,
    ) -> Vec<IndexEntry> {
        let entries = if sources.is_empty() {
            self.fetch_all(std::slice::from_ref(&self.default_index)).await
        } else {
            self.fetch_all(sources).await
        };
        filter::apply(entries, options)
    }
}

/// Rewrite relative `path` and `image` links to absolute ones at `origin`.
fn anchor_links(entry: &mut IndexEntry, origin: &str) {
    for field in ["path", "image"] {
        if let Some(href) = entry.get_str(field) {
            let resolved = resolve_against_origin(href, origin);
            entry.set(field, resolved);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(value: serde_json::Value) -> IndexEntry {
        IndexEntry::from(value)
    }

    fn fetcher(source: MemoryIndexSource) -> ArticleFetcher {
        ArticleFetcher::new(
            Arc::new(source),
            Url::parse("https://www.army.mil").unwrap(),
            "/news/query-index.json",
        )
    }

    #[tokio::test]
    async fn test_cross_origin_links_are_anchored() {
        let source = MemoryIndexSource::new().with_index(
            "https://www.navy.mil/news/query-index.json",
            vec![entry(json!({"path": "/foo", "image": "media/a.png", "title": "Foo"}))],
        );
        let entries = fetcher(source)
            .fetch_from_source("https://www.navy.mil/news/query-index.json")
            .await;

        assert_eq!(entries[0].path(), Some("https://www.navy.mil/foo"));
        assert_eq!(entries[0].get_str("image"), Some("https://www.navy.mil/media/a.png"));
    }

    #[tokio::test]
    async fn test_same_origin_links_are_untouched() {
        let source = MemoryIndexSource::new().with_index(
            "/news/query-index.json",
            vec![entry(json!({"path": "/foo", "image": "/media/a.png"}))],
        );
        let entries = fetcher(source).fetch_from_source("/news/query-index.json").await;

        assert_eq!(entries[0].path(), Some("/foo"));
        assert_eq!(entries[0].get_str("image"), Some("/media/a.png"));
    }

    #[tokio::test]
    async fn test_absolute_links_survive_cross_origin() {
        let source = MemoryIndexSource::new().with_index(
            "https://www.navy.mil/index.json",
            vec![entry(json!({"path": "https://cdn.mil/x", "title": "No image"}))],
        );
        let entries = fetcher(source)
            .fetch_from_source("https://www.navy.mil/index.json")
            .await;

        assert_eq!(entries[0].path(), Some("https://cdn.mil/x"));
        assert_eq!(entries[0].get("image"), None);
    }

    #[tokio::test]
    async fn test_failed_source_yields_empty_and_others_survive() {
        let source = MemoryIndexSource::new()
            .with_index("/a.json", vec![entry(json!({"path": "/a1"})), entry(json!({"path": "/a2"}))])
            .with_index("/c.json", vec![entry(json!({"path": "/c1"}))]);
        let sources = vec!["/a.json".to_string(), "/missing.json".to_string(), "/c.json".to_string()];

        let entries = fetcher(source).fetch_all(&sources).await;
        let paths: Vec<_> = entries.iter().filter_map(IndexEntry::path).collect();
        assert_eq!(paths, vec!["/a1", "/a2", "/c1"]);
    }

    #[tokio::test]
    async fn test_news_articles_default_source_and_filters() {
        let source = MemoryIndexSource::new().with_index(
            "/news/query-index.json",
            vec![
                entry(json!({"path": "/news/old", "feature": "true", "releaseDate": "100"})),
                entry(json!({"path": "/news/new", "feature": "true", "releaseDate": "200"})),
                entry(json!({"path": "/news/plain", "releaseDate": "300"})),
            ],
        );
        let options = FilterOptions {
            featured: true,
            sort_by: Some(crate::models::SortKey::Date),
            limit: 1,
            ..Default::default()
        };

        let articles = fetcher(source).fetch_news_articles(&[], &options).await;
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].path(), Some("/news/new"));
    }

    #[test]
    fn test_chunk_url_keeps_existing_query() {
        let url = Url::parse("https://www.army.mil/news/query-index.json?sheet=press").unwrap();
        assert_eq!(
            chunk_url(&url, 255, 255).as_str(),
            "https://www.army.mil/news/query-index.json?sheet=press&offset=255&limit=255"
        );
    }

    #[test]
    fn test_memory_source_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("query-index.json");
        std::fs::write(&path, r#"{"data": [{"path": "/news/a"}]}"#).unwrap();

        let source = MemoryIndexSource::from_file(&path).unwrap();
        assert_eq!(source.fallback.map(|f| f.len()), Some(1));
    }

    /// Answer one connection per canned `(status, body)` response and
    /// return the request targets that were received.
    async fn serve(responses: Vec<(u16, String)>) -> (Url, tokio::task::JoinHandle<Vec<String>>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = Url::parse(&format!("http://{}/", listener.local_addr().unwrap())).unwrap();

        let server = tokio::spawn(async move {
            let mut targets = Vec::new();
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = socket.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                }
                let head = String::from_utf8_lossy(&request);
                targets.push(head.split_whitespace().nth(1).unwrap_or_default().to_string());

                let response = format!(
                    "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
            }
            targets
        });

        (base, server)
    }

    fn chunk(total: usize, paths: &[&str]) -> (u16, String) {
        let data: Vec<_> = paths.iter().map(|p| json!({"path": p})).collect();
        (200, json!({"total": total, "data": data}).to_string())
    }

    #[tokio::test]
    async fn test_http_source_follows_total_across_chunks() {
        let (base, server) = serve(vec![chunk(3, &["/a", "/b"]), chunk(3, &["/c"])]).await;
        let source = HttpIndexSource::with_client(Client::new(), 2);

        let entries = source
            .fetch_index(&base.join("news/query-index.json").unwrap())
            .await
            .unwrap();

        let paths: Vec<_> = entries.iter().filter_map(IndexEntry::path).collect();
        assert_eq!(paths, vec!["/a", "/b", "/c"]);
        assert_eq!(
            server.await.unwrap(),
            vec![
                "/news/query-index.json?offset=0&limit=2",
                "/news/query-index.json?offset=2&limit=2",
            ]
        );
    }

    #[tokio::test]
    async fn test_http_source_stops_on_empty_chunk() {
        let (base, server) = serve(vec![chunk(5, &["/a", "/b"]), chunk(5, &[])]).await;
        let source = HttpIndexSource::with_client(Client::new(), 2);

        let entries = source
            .fetch_index(&base.join("news/query-index.json").unwrap())
            .await
            .unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(server.await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_http_source_respects_explicit_limit() {
        let (base, server) = serve(vec![chunk(10, &["/a"])]).await;
        let source = HttpIndexSource::with_client(Client::new(), 2);

        let entries = source
            .fetch_index(&base.join("news/query-index.json?limit=1").unwrap())
            .await
            .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(server.await.unwrap(), vec!["/news/query-index.json?limit=1"]);
    }

    #[tokio::test]
    async fn test_http_error_status_yields_no_entries() {
        let (base, server) = serve(vec![
            (404, "not found".to_string()),
            (404, "not found".to_string()),
        ])
        .await;
        let source = Arc::new(HttpIndexSource::with_client(Client::new(), 2));

        let err = source
            .fetch_index(&base.join("missing.json").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Status { status: 404, .. }));

        let fetcher = ArticleFetcher::new(source, base, "/news/query-index.json");
        assert!(fetcher.fetch_from_source("/missing.json").await.is_empty());
        assert_eq!(server.await.unwrap().len(), 2);
    }
}
