// src/models/mod.rs

//! Domain models for the diploma digest.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod credentials;
mod diploma;

// Re-export all public types
pub use config::{
    Config, ConverterConfig, HttpConfig, LoggingConfig, PortalConfig, PublisherConfig,
    StoreConfig, SummarizerConfig,
};
pub use credentials::{
    DOCLING_BASE_URL_VAR, GeminiCredentials, StoreCredentials, XCredentials,
    converter_base_url_override,
};
pub use diploma::{
    DOCUMENT_ORDER, DiplomaDocuments, DiplomaReference, DocumentLinks, DocumentReference,
    DocumentRole, PostContent,
};
