//! Service layer.
//!
//! - Article aggregation across query indexes (`ArticleFetcher`)
//! - Index transports (`HttpIndexSource`, `MemoryIndexSource`)

mod articles;

pub use articles::{ArticleFetcher, HttpIndexSource, IndexSource, MemoryIndexSource, chunk_url};
