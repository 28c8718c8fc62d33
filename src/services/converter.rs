// src/services/converter.rs

//! Document-to-markdown conversion through a docling-serve instance.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::ConverterConfig;

const CONVERT_PATH: &str = "/v1alpha/convert/source";

/// Fetches a document by URL and returns it as markdown.
pub trait DocumentConverter {
    fn convert(&self, document_url: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ConvertRequest<'a> {
    options: ConvertOptions,
    http_sources: Vec<HttpSource<'a>>,
}

#[derive(Debug, Serialize)]
struct ConvertOptions {
    to_formats: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
struct HttpSource<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct ConvertResponse {
    #[serde(default)]
    document: Option<ConvertedDocument>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ConvertedDocument {
    #[serde(default)]
    md_content: Option<String>,
}

/// Pull the markdown out of a conversion reply.
pub fn parse_markdown(document_url: &str, body: &str) -> Result<String> {
    let response: ConvertResponse =
        serde_json::from_str(body).map_err(|e| AppError::conversion(document_url, e))?;

    if !response.errors.is_empty() {
        log::warn!(
            "Converter reported {} error(s) for {} (status {:?})",
            response.errors.len(),
            document_url,
            response.status
        );
    }

    response
        .document
        .and_then(|document| document.md_content)
        .filter(|markdown| !markdown.trim().is_empty())
        .ok_or_else(|| {
            AppError::conversion(
                document_url,
                format!(
                    "no markdown content (status {})",
                    response.status.as_deref().unwrap_or("unknown")
                ),
            )
        })
}

/// [`DocumentConverter`] calling docling-serve's source conversion endpoint.
pub struct DoclingConverter<'a> {
    client: &'a Client,
    endpoint: String,
    timeout: Duration,
}

impl<'a> DoclingConverter<'a> {
    pub fn new(client: &'a Client, base_url: &str, config: &ConverterConfig) -> Self {
        Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), CONVERT_PATH),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

impl DocumentConverter for DoclingConverter<'_> {
    fn convert(&self, document_url: &str) -> Result<String> {
        let request = ConvertRequest {
            options: ConvertOptions {
                to_formats: vec!["md"],
            },
            http_sources: vec![HttpSource { url: document_url }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .map_err(|e| AppError::conversion(document_url, e))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| AppError::conversion(document_url, e))?;
        if !status.is_success() {
            return Err(AppError::conversion(
                document_url,
                format!("converter returned {status}: {body}"),
            ));
        }

        parse_markdown(document_url, &body)
    }
}
