use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reference to one documentation page inside an outline section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub title: String,
    pub url: String,
    pub description: String,
}

/// A heading in the outline document together with the links listed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub level: usize,
    pub links: Vec<Link>,
    pub children: Vec<Section>,
}

/// Parsed form of an `llms.txt` outline document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    pub title: String,
    pub summary: String,
    pub sections: Vec<Section>,
}

/// One page record from an `llms-full.txt` export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatDocument {
    pub url: String,
    pub title: String,
    pub content: String,
}

/// The unit stored in the search index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDocument {
    pub id: String,
    pub title: String,
    pub content: String,
    pub description: String,
    pub url: String,
    pub category: String,
}

/// A ranked hit returned to callers.
///
/// `score` is only meaningful relative to other results of the same query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub content: String,
    pub description: String,
    pub url: String,
    pub category: String,
    /// Relevance score. Only comparable within one query.
    pub score: f32,
}

impl SearchResult {
    pub(crate) fn from_document(doc: IndexDocument, score: f32) -> Self {
        Self {
            id: doc.id,
            title: doc.title,
            content: doc.content,
            description: doc.description,
            url: doc.url,
            category: doc.category,
            score,
        }
    }
}

/// Search tuning knobs. Zero values fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Maximum number of results.
    pub limit: usize,
    /// Characters of content kept per result.
    pub max_content_length: usize,
}

impl SearchOptions {
    /// Default number of results.
    pub const DEFAULT_LIMIT: usize = 10;
    /// Default content truncation length, in characters.
    pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 500;

    pub(crate) const fn effective_limit(&self) -> usize {
        if self.limit == 0 {
            Self::DEFAULT_LIMIT
        } else {
            self.limit
        }
    }

    pub(crate) const fn effective_max_content_length(&self) -> usize {
        if self.max_content_length == 0 {
            Self::DEFAULT_MAX_CONTENT_LENGTH
        } else {
            self.max_content_length
        }
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            max_content_length: Self::DEFAULT_MAX_CONTENT_LENGTH,
        }
    }
}

/// An outline link flattened with its category path and identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    /// The link description from the outline.
    pub content: String,
    pub url: String,
    pub category: String,
}

/// Per-corpus revalidation record persisted next to the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMetadata {
    /// Validator the index was built from.
    pub etag: String,
    pub last_fetched: DateTime<Utc>,
    pub url: String,
}
