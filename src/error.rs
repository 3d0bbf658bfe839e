// src/error.rs

//! Unified error handling for the collector application.

use std::fmt;

use thiserror::Error;

/// Result type alias for collector operations.
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

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required environment variables are missing
    #[error("Missing required environment variables: {}", .missing.join(", "))]
    Env { missing: Vec<String> },

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Source fetch/extraction error
    #[error("Fetch error for {context}: {message}")]
    Fetch { context: String, message: String },

    /// Destination store error
    #[error("Publish error: {0}")]
    Publish(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a fetch error with source context.
    pub fn fetch(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a publish error.
    pub fn publish(message: impl Into<String>) -> Self {
        Self::Publish(message.into())
    }
}
