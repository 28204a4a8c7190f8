//! # ax-core
//!
//! Core functionality for ax: fetch `llms.txt` documentation corpora, index
//! them locally and serve ranked search and lookup by identifier.
//!
//! ## Architecture
//!
//! - **Fetching**: `GET` for content, conditional `HEAD` for revalidation
//! - **Parsing**: tree-sitter outline parser and flat-content parsers
//! - **Categories & identifiers**: category paths from the outline, stable
//!   16-hex-character document ids
//! - **Indexing**: Tantivy index with CJK-aware analyzers
//! - **Caching**: per-corpus `ETag` metadata next to the index directory
//! - **Orchestration**: [`Searcher`] per corpus, [`LazySearcher`] for
//!   on-demand construction
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ax_core::{Config, CorpusConfig, SearchOptions, Searcher};
//!
//! # async fn run() -> ax_core::Result<()> {
//! let config = Config::load()?;
//! let mut searcher = Searcher::new(CorpusConfig::docs(), &config)?;
//! searcher.ensure_index().await?;
//!
//! for hit in searcher.search("토스페이", &SearchOptions::default())? {
//!     println!("{:.2} {} ({})", hit.score, hit.title, hit.url);
//! }
//! # Ok(())
//! # }
//! ```

/// CJK-aware tokenizer and analyzers
pub mod analyzer;
/// Per-corpus cache metadata and index directory management
pub mod cache;
/// Outline-backed document catalog
pub mod catalog;
/// Category path derivation
pub mod category;
/// Configuration loading
pub mod config;
/// Built-in corpora and content formats
pub mod corpus;
/// Deterministic document identifiers
pub mod doc_id;
/// Error types and result aliases
pub mod error;
/// HTTP fetching with `ETag` revalidation
pub mod fetcher;
/// Flat-content export parsers
pub mod flat;
/// Search index implementation using Tantivy
pub mod index;
/// Lazily initialized searchers
pub mod lazy;
/// Tree-sitter based outline parser
pub mod outline;
/// Per-corpus search orchestration
pub mod searcher;
/// Core data types
pub mod types;

pub use cache::{CacheLayout, CacheManager, Staleness};
pub use catalog::OutlineCatalog;
pub use category::CategoryMap;
pub use config::Config;
pub use corpus::{ContentFormat, CorpusConfig};
pub use error::{Error, Result};
pub use fetcher::{FetchedContent, Fetcher, Revalidation};
pub use index::SearchIndex;
pub use lazy::{Lazy, LazySearcher};
pub use outline::OutlineParser;
pub use searcher::Searcher;
pub use types::{
    CacheMetadata, CatalogEntry, FlatDocument, IndexDocument, Link, Outline, SearchOptions,
    SearchResult, Section,
};
