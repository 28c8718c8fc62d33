//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Parliament portal locations and link markers
    #[serde(default)]
    pub portal: PortalConfig,

    /// Shared HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Processed-marker store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Document conversion service settings
    #[serde(default)]
    pub converter: ConverterConfig,

    /// Text-generation settings
    #[serde(default)]
    pub summarizer: SummarizerConfig,

    /// Social feed settings
    #[serde(default)]
    pub publisher: PublisherConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::or_default(Self::load(&path), path)
    }

    /// Unwrap a load result, falling back to defaults with a warning.
    pub fn or_default(loaded: Result<Self>, path: impl AsRef<Path>) -> Self {
        match loaded {
            Ok(config) => {
                log::info!("Loaded configuration from {:?}", path.as_ref());
                config
            }
            Err(e) => {
                log::warn!(
                    "Config load failed from {:?}: {}. Using defaults.",
                    path.as_ref(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("portal.base_url", &self.portal.base_url),
            ("portal.listing_url", &self.portal.listing_url),
            ("converter.base_url", &self.converter.base_url),
            ("summarizer.api_base_url", &self.summarizer.api_base_url),
            ("publisher.api_base_url", &self.publisher.api_base_url),
        ] {
            url::Url::parse(value)
                .map_err(|e| AppError::validation(format!("{name} is not a valid URL: {e}")))?;
        }
        if self.portal.diploma_link_title.trim().is_empty() {
            return Err(AppError::validation("portal.diploma_link_title is empty"));
        }
        if self.portal.document_link_title.trim().is_empty() {
            return Err(AppError::validation("portal.document_link_title is empty"));
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == Some(0) {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.store.key.trim().is_empty() {
            return Err(AppError::validation("store.key is empty"));
        }
        if self.converter.timeout_secs == 0 {
            return Err(AppError::validation("converter.timeout_secs must be > 0"));
        }
        if self.summarizer.timeout_secs == 0 {
            return Err(AppError::validation("summarizer.timeout_secs must be > 0"));
        }
        if self.summarizer.model.trim().is_empty() {
            return Err(AppError::validation("summarizer.model is empty"));
        }
        Ok(())
    }
}

/// Where the portal lives and which link titles mark the anchors to follow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Prefix for relative links on the listing page
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Page listing the latest approved diplomas
    #[serde(default = "defaults::listing_url")]
    pub listing_url: String,

    /// `title` attribute of the latest-diploma anchor
    #[serde(default = "defaults::diploma_link_title")]
    pub diploma_link_title: String,

    /// `title` attribute of the PDF anchors on a detail page
    #[serde(default = "defaults::document_link_title")]
    pub document_link_title: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            listing_url: defaults::listing_url(),
            diploma_link_title: defaults::diploma_link_title(),
            document_link_title: defaults::document_link_title(),
        }
    }
}

/// HTTP client settings shared by the portal, store, oracle and feed clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds; the client default applies when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Key holding the last processed diploma URL
    #[serde(default = "defaults::store_key")]
    pub key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            key: defaults::store_key(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// docling-serve base URL (overridden by `DOCLING_BASE_URL`)
    #[serde(default = "defaults::converter_base_url")]
    pub base_url: String,

    /// PDF conversion is slow; this is deliberately generous
    #[serde(default = "defaults::converter_timeout")]
    pub timeout_secs: u64,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::converter_base_url(),
            timeout_secs: defaults::converter_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerConfig {
    /// Model identifier sent to the oracle
    #[serde(default = "defaults::model")]
    pub model: String,

    #[serde(default = "defaults::gemini_base_url")]
    pub api_base_url: String,

    /// Generation over two full documents is slow; applied per request
    #[serde(default = "defaults::summarizer_timeout")]
    pub timeout_secs: u64,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            model: defaults::model(),
            api_base_url: defaults::gemini_base_url(),
            timeout_secs: defaults::summarizer_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherConfig {
    #[serde(default = "defaults::x_base_url")]
    pub api_base_url: String,

    /// Posts longer than this many characters are trimmed; 0 disables trimming
    #[serde(default = "defaults::max_post_chars")]
    pub max_post_chars: usize,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            api_base_url: defaults::x_base_url(),
            max_post_chars: defaults::max_post_chars(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log filter when `RUST_LOG` is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    // Portal defaults
    pub fn base_url() -> String {
        "https://www.parlamento.pt".into()
    }
    pub fn listing_url() -> String {
        "https://www.parlamento.pt/Paginas/Ultimosdiplomasaprovados.aspx".into()
    }
    pub fn diploma_link_title() -> String {
        "Detalhe do Diploma Aprovado".into()
    }
    pub fn document_link_title() -> String {
        "Detalhe do documento (formato PDF)".into()
    }

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; diploma-digest/0.1)".into()
    }

    // Store defaults
    pub fn store_key() -> String {
        "latest_diploma".into()
    }

    // Converter defaults
    pub fn converter_base_url() -> String {
        "http://localhost:5001".into()
    }
    pub fn converter_timeout() -> u64 {
        900
    }

    // Summarizer defaults
    pub fn model() -> String {
        "gemini-2.5-pro".into()
    }
    pub fn gemini_base_url() -> String {
        "https://generativelanguage.googleapis.com/v1beta".into()
    }
    pub fn summarizer_timeout() -> u64 {
        300
    }

    // Publisher defaults
    pub fn x_base_url() -> String {
        "https://api.twitter.com/2".into()
    }
    pub fn max_post_chars() -> usize {
        280
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }
}
