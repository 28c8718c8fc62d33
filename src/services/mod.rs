//! Service layer for the diploma digest.
//!
//! This module contains the business logic for:
//! - Portal crawling and dedup (`PortalCrawler`)
//! - Processed-marker persistence (`HttpStateStore`)
//! - PDF to markdown conversion (`DoclingConverter`)
//! - Post summarization (`Summarizer`, `GeminiClient`)
//! - Publishing (`Publisher`, `XClient`)

mod converter;
mod portal;
mod publisher;
mod store;
mod summarizer;

#[cfg(test)]
pub(crate) mod fakes;

pub use converter::{DoclingConverter, DocumentConverter};
pub use portal::{
    HttpPageSource, PageSource, PortalCrawler, STORE_ERROR_POLICY, StoreErrorPolicy,
    parse_diploma_href, parse_document_hrefs,
};
pub use publisher::{Publisher, SocialFeed, XClient, fit_to_limit, parse_created_id};
pub use store::{HttpStateStore, StateStore};
pub use summarizer::{
    API_ERROR_SENTINEL, EMPTY_RESPONSE_SENTINEL, GeminiClient, SUMMARY_FAILURE_POLICY,
    SummaryFailurePolicy, Summarizer, TextGenerator, build_prompt,
};
