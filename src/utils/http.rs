// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};

use crate::error::{AppError, Result};
use crate::models::HttpConfig;

/// Create a configured blocking HTTP client.
pub fn create_client(config: &HttpConfig) -> Result<Client> {
    let mut builder = Client::builder().user_agent(&config.user_agent);
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

/// Fetch a page body as text.
///
/// Transport errors, non-success statuses and blank bodies all fail with
/// [`AppError::Fetch`].
pub fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let response = send(client.get(url), url)?;
    let text = response.text().map_err(|e| AppError::fetch(url, e))?;
    if text.trim().is_empty() {
        return Err(AppError::fetch(url, "empty response body"));
    }
    Ok(text)
}

/// Send a request, mapping transport failures and error statuses to [`AppError::Fetch`].
pub fn send(request: RequestBuilder, url: &str) -> Result<Response> {
    request
        .send()
        .and_then(Response::error_for_status)
        .map_err(|e| AppError::fetch(url, e))
}
