// src/services/portal.rs

//! Parliament portal crawler service.
//!
//! Finds the latest approved diploma on the listing page, skips it when the
//! processed marker already points at it, and otherwise converts its two
//! source PDFs to markdown.
//!
//! One run moves through these states:
//!
//! ```text
//! Start -> LocatedLatest -> AlreadyProcessed -> Done
//!                        -> Novel -> DocumentsResolved -> ConversionFailed -> AbortedUnmarked
//!                                                      -> BothConverted -> Marked -> Done
//! ```
//!
//! Marking the diploma processed is the only durable side effect and happens
//! after both conversions succeed, so a failed run is retried next time.
//!
//! The marker is read and then written without any compare-and-set. Two
//! overlapping runs can both see "not processed" and both publish; the store
//! itself is never left inconsistent.

use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{
    Config, DiplomaDocuments, DiplomaReference, DocumentLinks, DocumentReference, PortalConfig,
};
use crate::services::{DocumentConverter, StateStore};
use crate::utils::{http, join_base, resolve};

/// Source of raw HTML pages.
pub trait PageSource {
    /// Fetch a page body. Transport errors and empty bodies are errors.
    fn fetch_page(&self, url: &str) -> Result<String>;
}

/// [`PageSource`] backed by a blocking HTTP client.
pub struct HttpPageSource<'a> {
    client: &'a Client,
}

impl<'a> HttpPageSource<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }
}

impl PageSource for HttpPageSource<'_> {
    fn fetch_page(&self, url: &str) -> Result<String> {
        http::fetch_text(self.client, url)
    }
}

/// What to assume when the processed marker cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorPolicy {
    /// Treat the diploma as new. Risks a duplicate post, never loses a diploma.
    Reprocess,
    /// Treat the diploma as done. Never duplicates, may skip a diploma forever.
    Skip,
}

/// Store read failures fail open.
pub const STORE_ERROR_POLICY: StoreErrorPolicy = StoreErrorPolicy::Reprocess;

impl StoreErrorPolicy {
    fn assume_processed(self) -> bool {
        matches!(self, StoreErrorPolicy::Skip)
    }
}

/// Service for discovering and extracting the latest approved diploma.
pub struct PortalCrawler<'a> {
    portal: &'a PortalConfig,
    store_key: &'a str,
    pages: &'a dyn PageSource,
    store: &'a dyn StateStore,
    converter: &'a dyn DocumentConverter,
}

impl<'a> PortalCrawler<'a> {
    /// Create a new crawler over the given collaborators.
    pub fn new(
        config: &'a Config,
        pages: &'a dyn PageSource,
        store: &'a dyn StateStore,
        converter: &'a dyn DocumentConverter,
    ) -> Self {
        Self {
            portal: &config.portal,
            store_key: &config.store.key,
            pages,
            store,
            converter,
        }
    }

    /// Fetch a page through the configured page source.
    pub fn fetch_page(&self, url: &str) -> Result<String> {
        self.pages.fetch_page(url)
    }

    /// Locate the latest approved diploma on the listing page.
    pub fn locate_latest_diploma(&self) -> Result<DiplomaReference> {
        log::info!("Getting latest approved diploma from {}", self.portal.listing_url);
        let html = self.fetch_page(&self.portal.listing_url)?;
        let href = parse_diploma_href(&html, &self.portal.diploma_link_title)?;
        Ok(DiplomaReference::new(join_base(&self.portal.base_url, &href)))
    }

    /// Whether the stored processed marker equals this diploma.
    ///
    /// Store read failures are logged and resolved by [`STORE_ERROR_POLICY`].
    pub fn is_already_processed(&self, diploma: &DiplomaReference) -> bool {
        match self.store.get(self.store_key) {
            Ok(Some(marker)) if marker == diploma.as_str() => {
                log::info!("Diploma already processed: {}", diploma);
                true
            }
            Ok(_) => false,
            Err(e) => {
                log::error!("Error checking diploma state: {}", e);
                STORE_ERROR_POLICY.assume_processed()
            }
        }
    }

    /// Resolve the diploma and context PDFs linked from a detail page.
    pub fn resolve_documents(&self, diploma: &DiplomaReference) -> Result<DocumentLinks> {
        let html = self.fetch_page(diploma.as_str())?;
        let hrefs = parse_document_hrefs(&html, &self.portal.document_link_title)?;
        let urls: Vec<String> = hrefs
            .iter()
            .map(|href| resolve(diploma.as_str(), href))
            .collect();

        DocumentLinks::from_positions(&urls).ok_or_else(|| {
            AppError::parse(format!(
                "expected 2 links titled '{}' on {}, found {}",
                self.portal.document_link_title,
                diploma,
                urls.len()
            ))
        })
    }

    /// Convert a source document to markdown.
    pub fn extract_text(&self, document: &DocumentReference) -> Result<String> {
        log::info!(
            "Converting {} document {} - this may take a while...",
            document.role.as_str(),
            document.url
        );
        let markdown = self
            .converter
            .convert(&document.url)
            .and_then(|markdown| {
                if markdown.trim().is_empty() {
                    Err(AppError::conversion(&document.url, "empty markdown"))
                } else {
                    Ok(markdown)
                }
            })
            .inspect_err(|e| log::error!("Error converting document to markdown: {}", e))?;
        log::info!("Document conversion completed ({} chars)", markdown.len());
        Ok(markdown)
    }

    /// Record the diploma as processed. Write failures are logged only.
    pub fn mark_processed(&self, diploma: &DiplomaReference) {
        if let Err(e) = self.store.set(self.store_key, diploma.as_str()) {
            log::error!("Error setting diploma state: {}", e);
        }
    }

    /// Run the full crawl workflow.
    ///
    /// Returns `None` when there is nothing new or the run failed; failures
    /// are logged and leave the diploma unmarked.
    pub fn run(&self) -> Option<DiplomaDocuments> {
        self.try_run().unwrap_or_else(|e| {
            log::error!("Error getting latest diploma documents: {}", e);
            None
        })
    }

    fn try_run(&self) -> Result<Option<DiplomaDocuments>> {
        let diploma = self.locate_latest_diploma()?;
        if self.is_already_processed(&diploma) {
            return Ok(None);
        }

        let links = self.resolve_documents(&diploma)?;

        // Convert both before bailing out so every failure is logged.
        let diploma_text = self.extract_text(&links.diploma);
        let context_text = self.extract_text(&links.context);
        let (diploma_text, context_text) = match (diploma_text, context_text) {
            (Ok(diploma_text), Ok(context_text)) => (diploma_text, context_text),
            (Err(e), _) | (_, Err(e)) => return Err(e),
        };

        self.mark_processed(&diploma);
        log::info!("Successfully processed diploma {}", diploma);

        Ok(Some(DiplomaDocuments {
            diploma_ref: diploma,
            diploma_text,
            context_text,
        }))
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::parse(format!("invalid selector '{s}': {e:?}")))
}

/// All anchors whose `title` attribute equals `title` exactly, in document order.
fn titled_anchors<'d>(document: &'d Html, title: &str) -> Result<Vec<ElementRef<'d>>> {
    let selector = parse_selector("a[title]")?;
    Ok(document
        .select(&selector)
        .filter(|anchor| anchor.value().attr("title") == Some(title))
        .collect())
}

/// The raw `href` attribute, unless it is missing or blank.
fn non_empty_href(anchor: &ElementRef<'_>) -> Option<String> {
    anchor
        .value()
        .attr("href")
        .filter(|href| !href.trim().is_empty())
        .map(str::to_string)
}

/// Extract the href of the first anchor titled `title`.
pub fn parse_diploma_href(html: &str, title: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let anchors = titled_anchors(&document, title)?;
    let anchor = anchors
        .first()
        .ok_or_else(|| AppError::parse(format!("no anchor titled '{title}' found")))?;
    non_empty_href(anchor)
        .ok_or_else(|| AppError::parse(format!("anchor titled '{title}' has no href")))
}

/// Extract the hrefs of every anchor titled `title`, in document order.
///
/// Anchors without an href are skipped.
pub fn parse_document_hrefs(html: &str, title: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    Ok(titled_anchors(&document, title)?
        .iter()
        .filter_map(non_empty_href)
        .collect())
}
