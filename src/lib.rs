// src/lib.rs

//! Newsroom block library
//!
//! Decorates the news blocks of a page: collections with facets, search and
//! pagination, article cards, carousels, heroes and related articles, fed
//! from one or more query indexes.

pub mod blocks;
pub mod error;
pub mod models;
pub mod page;
pub mod pipeline;
pub mod services;
pub mod utils;
