//! Diploma and document data structures.

use std::fmt;

/// Link to the detail page of the latest approved diploma.
///
/// The URL string is also the value persisted as the processed marker,
/// so it is compared by exact string equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiplomaReference(String);

impl DiplomaReference {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DiplomaReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a PDF linked from a diploma detail page contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentRole {
    /// The approved diploma text
    Diploma,
    /// The originating initiative text
    Context,
}

impl DocumentRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentRole::Diploma => "diploma",
            DocumentRole::Context => "context",
        }
    }
}

/// Roles assigned to the PDF links of a detail page, in document order.
///
/// The portal does not label the two PDFs differently, so the role is
/// taken from the link position alone.
pub const DOCUMENT_ORDER: [DocumentRole; 2] = [DocumentRole::Diploma, DocumentRole::Context];

/// Absolute URL of a downloadable source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentReference {
    pub role: DocumentRole,
    pub url: String,
}

/// The two source documents resolved for a diploma.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLinks {
    pub diploma: DocumentReference,
    pub context: DocumentReference,
}

impl DocumentLinks {
    /// Assign roles to the first links found, following [`DOCUMENT_ORDER`].
    ///
    /// Returns `None` when fewer links than roles are available.
    /// Extra links past the known roles are ignored.
    pub fn from_positions(urls: &[String]) -> Option<Self> {
        if urls.len() < DOCUMENT_ORDER.len() {
            return None;
        }

        let reference = |role: DocumentRole| {
            let position = DOCUMENT_ORDER.iter().position(|r| *r == role)?;
            Some(DocumentReference {
                role,
                url: urls.get(position)?.clone(),
            })
        };

        Some(Self {
            diploma: reference(DocumentRole::Diploma)?,
            context: reference(DocumentRole::Context)?,
        })
    }
}

/// Markdown texts extracted for a newly processed diploma.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiplomaDocuments {
    pub diploma_ref: DiplomaReference,
    /// Approved diploma text
    pub diploma_text: String,
    /// Original initiative text
    pub context_text: String,
}

/// Short text handed to the social feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostContent(pub String);

impl PostContent {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
