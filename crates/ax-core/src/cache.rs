//! Per-corpus on-disk cache: one metadata JSON file and one index directory.
//!
//! The metadata file records the `ETag` the index was built from. Staleness
//! is decided by a conditional HEAD against the flat-content URL.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, warn};

use crate::fetcher::{Fetcher, Revalidation};
use crate::{CacheMetadata, Error, Result};

/// File and directory names a corpus uses under the cache root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLayout {
    /// Metadata JSON file name.
    pub metadata_file: String,
    /// Index directory name.
    pub index_dir: String,
}

impl CacheLayout {
    /// Names of the metadata file and index directory under the cache root.
    pub fn new(metadata_file: impl Into<String>, index_dir: impl Into<String>) -> Self {
        Self {
            metadata_file: metadata_file.into(),
            index_dir: index_dir.into(),
        }
    }
}

/// Result of comparing the cached `ETag` with the server's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Staleness {
    /// The server confirmed the cached copy (304).
    Unchanged {
        /// Validator echoed by the server, if any.
        etag: Option<String>,
    },
    /// The content may differ; `etag` is the server's current validator.
    Changed {
        /// New validator to record after the rebuild.
        etag: Option<String>,
    },
}

/// Cache bookkeeping for one corpus.
#[derive(Debug, Clone)]
pub struct CacheManager {
    metadata_path: PathBuf,
    index_path: PathBuf,
}

impl CacheManager {
    /// Create the manager, making sure `root` exists.
    pub fn new(root: &Path, layout: &CacheLayout) -> Result<Self> {
        fs::create_dir_all(root)
            .map_err(|e| Error::Storage(format!("Failed to create cache directory: {e}")))?;
        Ok(Self {
            metadata_path: root.join(&layout.metadata_file),
            index_path: root.join(&layout.index_dir),
        })
    }

    /// Directory holding the tantivy index.
    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// Path of the metadata JSON file.
    pub fn metadata_path(&self) -> &Path {
        &self.metadata_path
    }

    /// Whether an index directory is present. Says nothing about its health.
    pub fn index_exists(&self) -> bool {
        self.index_path.is_dir()
    }

    /// Stored metadata, if the file exists and parses.
    pub fn load_metadata(&self) -> Option<CacheMetadata> {
        let json = fs::read_to_string(&self.metadata_path).ok()?;
        match serde_json::from_str(&json) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                warn!(
                    "Ignoring unreadable cache metadata {}: {e}",
                    self.metadata_path.display()
                );
                None
            },
        }
    }

    /// The stored `ETag`. Missing or garbled metadata means none.
    pub fn cached_etag(&self) -> Option<String> {
        self.load_metadata()
            .map(|metadata| metadata.etag)
            .filter(|etag| !etag.is_empty())
    }

    /// Persist `etag` for `url`, replacing the metadata file atomically.
    pub fn save_etag(&self, url: &str, etag: &str) -> Result<()> {
        let metadata = CacheMetadata {
            etag: etag.to_string(),
            last_fetched: Utc::now(),
            url: url.to_string(),
        };
        let json = serde_json::to_string_pretty(&metadata)
            .map_err(|e| Error::Storage(format!("Failed to serialize metadata: {e}")))?;

        let tmp_path = self.metadata_path.with_extension("json.tmp");
        fs::write(&tmp_path, &json)
            .map_err(|e| Error::Storage(format!("Failed to write temp metadata: {e}")))?;

        #[cfg(target_os = "windows")]
        if self.metadata_path.exists() {
            fs::remove_file(&self.metadata_path)
                .map_err(|e| Error::Storage(format!("Failed to remove existing metadata: {e}")))?;
        }
        fs::rename(&tmp_path, &self.metadata_path)
            .map_err(|e| Error::Storage(format!("Failed to persist metadata: {e}")))?;

        debug!("Saved etag {} for {}", etag, url);
        Ok(())
    }

    /// Ask the server whether `url` changed since the cached `ETag`.
    pub async fn check_etag(&self, fetcher: &Fetcher, url: &str) -> Result<Staleness> {
        let cached = self.cached_etag();
        let staleness = match fetcher.revalidate(url, cached.as_deref()).await? {
            Revalidation::NotModified { etag } => Staleness::Unchanged { etag },
            Revalidation::Modified { etag } => {
                if etag.is_some() && etag == cached {
                    // Some servers ignore If-None-Match on HEAD.
                    Staleness::Unchanged { etag }
                } else {
                    Staleness::Changed { etag }
                }
            },
        };
        debug!("Staleness for {}: {:?}", url, staleness);
        Ok(staleness)
    }

    /// Remove the index directory if present.
    pub fn delete_index(&self) -> Result<()> {
        if self.index_path.exists() {
            fs::remove_dir_all(&self.index_path)
                .map_err(|e| Error::Storage(format!("Failed to delete index: {e}")))?;
            debug!("Deleted index at {}", self.index_path.display());
        }
        Ok(())
    }
}
