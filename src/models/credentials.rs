//! Secrets sourced from the process environment.
//!
//! Each component has its own credential group so a missing variable only
//! stops the component that needs it. Every group can also be built from an
//! arbitrary lookup function, which keeps tests away from `std::env`.

use crate::error::{AppError, Result};

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String> {
    lookup(name)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::MissingEnv(name.to_string()))
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Key-value store endpoint and bearer token.
#[derive(Debug, Clone)]
pub struct StoreCredentials {
    pub base_url: String,
    pub bearer_token: String,
}

impl StoreCredentials {
    pub const BASE_URL_VAR: &'static str = "REDIS_BASE_URL";
    pub const TOKEN_VAR: &'static str = "REDIS_BEARER_KEY";

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            base_url: required(&lookup, Self::BASE_URL_VAR)?,
            bearer_token: required(&lookup, Self::TOKEN_VAR)?,
        })
    }
}

/// Gemini API key.
#[derive(Debug, Clone)]
pub struct GeminiCredentials {
    pub api_key: String,
}

impl GeminiCredentials {
    pub const API_KEY_VAR: &'static str = "GEMINI_API_KEY";

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            api_key: required(&lookup, Self::API_KEY_VAR)?,
        })
    }
}

/// OAuth 1.0a user-context credentials for the X API.
#[derive(Debug, Clone)]
pub struct XCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl XCredentials {
    pub const CONSUMER_KEY_VAR: &'static str = "X_CONSUMER_KEY";
    pub const CONSUMER_SECRET_VAR: &'static str = "X_CONSUMER_SECRET";
    pub const ACCESS_TOKEN_VAR: &'static str = "X_ACCESS_TOKEN";
    pub const ACCESS_TOKEN_SECRET_VAR: &'static str = "X_ACCESS_TOKEN_SECRET";

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            consumer_key: required(&lookup, Self::CONSUMER_KEY_VAR)?,
            consumer_secret: required(&lookup, Self::CONSUMER_SECRET_VAR)?,
            access_token: required(&lookup, Self::ACCESS_TOKEN_VAR)?,
            access_token_secret: required(&lookup, Self::ACCESS_TOKEN_SECRET_VAR)?,
        })
    }
}

/// Optional override for the converter base URL.
pub const DOCLING_BASE_URL_VAR: &str = "DOCLING_BASE_URL";

/// Read the converter base URL override, if set.
pub fn converter_base_url_override() -> Option<String> {
    env_lookup(DOCLING_BASE_URL_VAR).filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_store_credentials_present() {
        let creds = StoreCredentials::from_lookup(lookup(&[
            ("REDIS_BASE_URL", "https://kv.example.com"),
            ("REDIS_BEARER_KEY", "secret"),
        ]))
        .unwrap();
        assert_eq!(creds.base_url, "https://kv.example.com");
        assert_eq!(creds.bearer_token, "secret");
    }

    #[test]
    fn test_missing_variable_is_named() {
        let err = StoreCredentials::from_lookup(lookup(&[("REDIS_BASE_URL", "https://kv")]))
            .unwrap_err();
        assert!(matches!(err, AppError::MissingEnv(ref name) if name == "REDIS_BEARER_KEY"));
    }

    #[test]
    fn test_blank_variable_counts_as_missing() {
        let err = GeminiCredentials::from_lookup(lookup(&[("GEMINI_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, AppError::MissingEnv(_)));
    }

    #[test]
    fn test_x_credentials_need_all_four() {
        let partial = lookup(&[
            ("X_CONSUMER_KEY", "ck"),
            ("X_CONSUMER_SECRET", "cs"),
            ("X_ACCESS_TOKEN", "at"),
        ]);
        let err = XCredentials::from_lookup(partial).unwrap_err();
        assert!(matches!(err, AppError::MissingEnv(ref name) if name == "X_ACCESS_TOKEN_SECRET"));

        let full = lookup(&[
            ("X_CONSUMER_KEY", "ck"),
            ("X_CONSUMER_SECRET", "cs"),
            ("X_ACCESS_TOKEN", "at"),
            ("X_ACCESS_TOKEN_SECRET", "ats"),
        ]);
        assert_eq!(XCredentials::from_lookup(full).unwrap().access_token, "at");
    }
}
