// src/lib.rs

//! Diploma digest library: crawl the parliament portal, summarize, publish.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
