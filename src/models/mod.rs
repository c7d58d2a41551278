// src/models/mod.rs

//! Domain models shared by the fetch layer, pipeline and blocks.

mod block;
mod config;
mod item;

// Re-export all public types
pub use block::{CollectionConfig, CollectionLayout, FeedConfig, SortKey};
pub use config::{
    CarouselDefaults, CollectionSettings, Config, FeedDefaults, HttpConfig, SiteConfig,
};
pub use item::{IndexEntry, Item, QueryIndex};
