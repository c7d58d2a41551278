// src/error.rs

//! Unified error handling for block decoration.

use std::fmt;

use thiserror::Error;

/// Result type alias for newsroom operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Query index responded with a non-success status
    #[error("Failed to fetch from {source_url}: {status}")]
    Status { source_url: String, status: u16 },

    /// Query index could not be served
    #[error("Fetch error for {source_url}: {message}")]
    Fetch { source_url: String, message: String },

    /// Block markup could not be read
    #[error("Markup error: {0}")]
    Markup(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a fetch error for a query index URL.
    pub fn fetch(source_url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            source_url: source_url.into(),
            message: message.to_string(),
        }
    }

    /// Create a markup error.
    pub fn markup(message: impl Into<String>) -> Self {
        Self::Markup(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
