// src/pipeline/run.rs

//! Production wiring: build clients from config and environment, then run.

use crate::error::Result;
use crate::models::{
    Config, GeminiCredentials, StoreCredentials, XCredentials, converter_base_url_override,
};
use crate::pipeline::{CycleOutcome, run_cycle};
use crate::services::{
    DoclingConverter, GeminiClient, HttpPageSource, HttpStateStore, PortalCrawler, Publisher,
    StateStore, Summarizer, XClient,
};
use crate::utils::http;

/// Run exactly one cycle against the real services.
///
/// Missing credentials are returned as errors before any network call.
/// Everything after that is absorbed by [`run_cycle`].
pub fn run_pipeline(config: &Config) -> Result<CycleOutcome> {
    let store_credentials = StoreCredentials::from_env()?;
    let gemini_credentials = GeminiCredentials::from_env()?;
    let x_credentials = XCredentials::from_env()?;

    let client = http::create_client(&config.http)?;
    let converter_base_url =
        converter_base_url_override().unwrap_or_else(|| config.converter.base_url.clone());

    let pages = HttpPageSource::new(&client);
    let store = HttpStateStore::new(&client, &store_credentials);
    let converter = DoclingConverter::new(&client, &converter_base_url, &config.converter);
    let gemini = GeminiClient::new(&client, &gemini_credentials, &config.summarizer);
    let feed = XClient::new(&client, x_credentials, &config.publisher);

    let crawler = PortalCrawler::new(config, &pages, &store, &converter);
    let summarizer = Summarizer::new(&gemini, &config.summarizer);
    let publisher = Publisher::new(&feed, &config.publisher);

    Ok(run_cycle(&crawler, &summarizer, &publisher))
}

/// Read the current processed marker from the store.
pub fn show_status(config: &Config) -> Result<Option<String>> {
    let credentials = StoreCredentials::from_env()?;
    let client = http::create_client(&config.http)?;
    HttpStateStore::new(&client, &credentials).get(&config.store.key)
}
