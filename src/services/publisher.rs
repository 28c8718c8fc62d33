// src/services/publisher.rs

//! Social feed publishing service.

use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{AppError, Result};
use crate::models::{PublisherConfig, XCredentials};
use crate::utils::oauth::{self, Nonce};

const ELLIPSIS: &str = "…";

/// A feed that accepts public status posts.
pub trait SocialFeed {
    /// Post `text` publicly.
    ///
    /// Returns the id of the created post when the feed reports one.
    fn create_post(&self, text: &str) -> Result<Option<String>>;
}

#[derive(Debug, Serialize)]
struct CreatePostRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreatePostResponse {
    data: CreatedPost,
}

#[derive(Debug, Deserialize)]
struct CreatedPost {
    id: String,
}

/// Read the created post id from a successful reply, if present.
pub fn parse_created_id(body: &str) -> Option<String> {
    serde_json::from_str::<CreatePostResponse>(body)
        .ok()
        .map(|created| created.data.id)
}

/// [`SocialFeed`] for the X API v2, authenticated with OAuth 1.0a user context.
pub struct XClient<'a> {
    client: &'a Client,
    credentials: XCredentials,
    endpoint: String,
}

impl<'a> XClient<'a> {
    pub fn new(client: &'a Client, credentials: XCredentials, config: &PublisherConfig) -> Self {
        Self {
            client,
            credentials,
            endpoint: format!("{}/tweets", config.api_base_url.trim_end_matches('/')),
        }
    }
}

impl SocialFeed for XClient<'_> {
    fn create_post(&self, text: &str) -> Result<Option<String>> {
        let authorization = oauth::authorization_header(
            &self.credentials,
            "POST",
            &self.endpoint,
            &[],
            &Nonce::generate(),
        )?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, authorization)
            .json(&CreatePostRequest { text })
            .send()
            .map_err(AppError::publish)?;

        let status = response.status();
        let body = response.text().map_err(AppError::publish)?;
        if !status.is_success() {
            return Err(AppError::publish(format!("{status}: {body}")));
        }

        let id = parse_created_id(&body);
        if id.is_none() {
            log::warn!("Post accepted with {} but reply had no id: {}", status, body);
        }
        Ok(id)
    }
}

/// Fit `text` into `max_chars` user-perceived characters.
///
/// Over-long text is cut on a grapheme boundary and ends with an ellipsis.
/// A limit of zero disables trimming.
pub fn fit_to_limit(text: &str, max_chars: usize) -> String {
    if max_chars == 0 || text.graphemes(true).count() <= max_chars {
        return text.to_string();
    }

    let kept: String = text.graphemes(true).take(max_chars - 1).collect();
    format!("{}{}", kept.trim_end(), ELLIPSIS)
}

/// Posts content to a social feed, logging and swallowing failures.
pub struct Publisher<'a> {
    feed: &'a dyn SocialFeed,
    max_chars: usize,
}

impl<'a> Publisher<'a> {
    pub fn new(feed: &'a dyn SocialFeed, config: &PublisherConfig) -> Self {
        Self {
            feed,
            max_chars: config.max_post_chars,
        }
    }

    /// Publish a post. Returns whether the feed accepted it.
    pub fn publish(&self, text: &str) -> bool {
        let text = fit_to_limit(text, self.max_chars);
        match self.feed.create_post(&text) {
            Ok(Some(id)) => {
                log::info!("Published post {}", id);
                true
            }
            Ok(None) => {
                log::info!("Published post");
                true
            }
            Err(e) => {
                log::error!("Error publishing post with text: {}. Error: {}", text, e);
                false
            }
        }
    }
}
