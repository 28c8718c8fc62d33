// src/services/fakes.rs

//! In-memory collaborators for unit tests.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{AppError, Result};
use crate::services::{DocumentConverter, PageSource, SocialFeed, StateStore, TextGenerator};

/// Serves fixed HTML per URL; unknown URLs fail like a transport error.
#[derive(Default)]
pub struct FakePages {
    pages: HashMap<String, String>,
}

impl FakePages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }
}

impl PageSource for FakePages {
    fn fetch_page(&self, url: &str) -> Result<String> {
        self.pages
            .get(url)
            .filter(|html| !html.trim().is_empty())
            .cloned()
            .ok_or_else(|| AppError::fetch(url, "no fixture"))
    }
}

/// Single-slot store recording every successful write.
pub struct FakeStore {
    value: RefCell<Option<String>>,
    sets: RefCell<Vec<(String, String)>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl FakeStore {
    pub fn empty() -> Self {
        Self {
            value: RefCell::new(None),
            sets: RefCell::new(Vec::new()),
            fail_reads: false,
            fail_writes: false,
        }
    }

    pub fn with_marker(marker: &str) -> Self {
        let store = Self::empty();
        *store.value.borrow_mut() = Some(marker.to_string());
        store
    }

    pub fn unreachable() -> Self {
        Self {
            fail_reads: true,
            fail_writes: true,
            ..Self::empty()
        }
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn sets(&self) -> Vec<(String, String)> {
        self.sets.borrow().clone()
    }
}

impl StateStore for FakeStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        if self.fail_reads {
            return Err(AppError::store("connection refused"));
        }
        Ok(self.value.borrow().clone())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            return Err(AppError::store("status 500"));
        }
        *self.value.borrow_mut() = Some(value.to_string());
        self.sets
            .borrow_mut()
            .push((key.to_string(), value.to_string()));
        Ok(())
    }
}

/// Converts known URLs to fixed markdown; `None` entries fail.
#[derive(Default)]
pub struct FakeConverter {
    documents: HashMap<String, Option<String>>,
    calls: RefCell<Vec<String>>,
}

impl FakeConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, markdown: Option<&str>) -> Self {
        self.documents
            .insert(url.to_string(), markdown.map(str::to_string));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl DocumentConverter for FakeConverter {
    fn convert(&self, document_url: &str) -> Result<String> {
        self.calls.borrow_mut().push(document_url.to_string());
        self.documents
            .get(document_url)
            .cloned()
            .flatten()
            .ok_or_else(|| AppError::conversion(document_url, "conversion failed"))
    }
}

pub enum GeneratorReply {
    Text(String),
    Fail(String),
}

/// Oracle with a canned reply, recording `(model, prompt)` calls.
pub struct FakeGenerator {
    reply: GeneratorReply,
    calls: RefCell<Vec<(String, String)>>,
}

impl FakeGenerator {
    pub fn new(reply: GeneratorReply) -> Self {
        Self {
            reply,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.borrow().clone()
    }
}

impl TextGenerator for FakeGenerator {
    fn generate(&self, model: &str, prompt: &str) -> Result<String> {
        self.calls
            .borrow_mut()
            .push((model.to_string(), prompt.to_string()));
        match &self.reply {
            GeneratorReply::Text(text) => Ok(text.clone()),
            GeneratorReply::Fail(message) => Err(AppError::oracle(message)),
        }
    }
}

/// Feed recording every attempted post.
pub struct FakeFeed {
    posts: RefCell<Vec<String>>,
    reject: bool,
    report_id: bool,
}

impl FakeFeed {
    pub fn accepting() -> Self {
        Self {
            posts: RefCell::new(Vec::new()),
            reject: false,
            report_id: true,
        }
    }

    /// Accepts posts but, like an unparsable reply, reports no id.
    pub fn accepting_without_id() -> Self {
        Self {
            report_id: false,
            ..Self::accepting()
        }
    }

    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::accepting()
        }
    }

    pub fn posts(&self) -> Vec<String> {
        self.posts.borrow().clone()
    }
}

impl SocialFeed for FakeFeed {
    fn create_post(&self, text: &str) -> Result<Option<String>> {
        self.posts.borrow_mut().push(text.to_string());
        if self.reject {
            return Err(AppError::publish("403 Forbidden"));
        }
        Ok(self
            .report_id
            .then(|| self.posts.borrow().len().to_string()))
    }
}
