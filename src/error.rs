// src/error.rs

//! Unified error handling for the diploma digest.

use std::fmt;

use thiserror::Error;

/// Result type alias for digest operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Page fetch failed (transport error, bad status or empty body)
    #[error("Fetch error for {url}: {message}")]
    Fetch { url: String, message: String },

    /// Expected markup element missing from a portal page
    #[error("Parse error: {0}")]
    Parse(String),

    /// Document-to-markdown conversion failed
    #[error("Conversion error for {url}: {message}")]
    Conversion { url: String, message: String },

    /// Key-value store unreachable or returned a bad status
    #[error("Store error: {0}")]
    Store(String),

    /// Text-generation oracle failed
    #[error("Oracle error: {0}")]
    Oracle(String),

    /// Text-generation oracle answered with no text
    #[error("Oracle returned an empty response")]
    EmptyGeneration,

    /// Social feed rejected or failed the post
    #[error("Publish error: {0}")]
    Publish(String),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Required environment variable is not set
    #[error("Missing environment variable: {0}")]
    MissingEnv(String),
}

impl AppError {
    /// Create a fetch error for a URL.
    pub fn fetch(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a markup parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Create a conversion error for a document URL.
    pub fn conversion(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Conversion {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a store error.
    pub fn store(message: impl fmt::Display) -> Self {
        Self::Store(message.to_string())
    }

    /// Create an oracle error.
    pub fn oracle(message: impl fmt::Display) -> Self {
        Self::Oracle(message.to_string())
    }

    /// Create a publish error.
    pub fn publish(message: impl fmt::Display) -> Self {
        Self::Publish(message.to_string())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
