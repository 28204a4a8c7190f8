//! Per-corpus search orchestration.
//!
//! A [`Searcher`] ties one [`CorpusConfig`] to a [`Fetcher`], a
//! [`CacheManager`] and, once [`Searcher::ensure_index`] has run, an open
//! [`SearchIndex`].
//!
//! `ensure_index` keeps the on-disk index in step with the remote export:
//!
//! - no index directory: fetch, build, remember the `ETag`;
//! - `304` from a conditional HEAD: reuse the index without downloading;
//! - anything else from the HEAD: delete and rebuild;
//! - HEAD failure: keep serving the cached index if it still opens.
//!
//! A rebuild that cannot record its `ETag` fails.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::cache::{CacheManager, Staleness};
use crate::category::CategoryMap;
use crate::corpus::CorpusConfig;
use crate::fetcher::Fetcher;
use crate::index::SearchIndex;
use crate::outline::OutlineParser;
use crate::{Config, Error, Outline, Result, SearchOptions, SearchResult};

/// Marker appended to truncated result content.
pub const TRUNCATION_MARKER: &str = "...";

/// Search over one corpus, backed by a cached on-disk index.
pub struct Searcher {
    corpus: CorpusConfig,
    fetcher: Fetcher,
    cache: CacheManager,
    index: Option<SearchIndex>,
}

impl Searcher {
    /// Build a searcher using the timeouts and cache root from `config`.
    pub fn new(corpus: CorpusConfig, config: &Config) -> Result<Self> {
        let fetcher = Fetcher::with_timeouts(config.fetch.timeout(), config.fetch.head_timeout())?;
        Self::with_fetcher(corpus, fetcher, &config.paths.cache_root)
    }

    /// Build a searcher around an existing fetcher and cache root.
    pub fn with_fetcher(corpus: CorpusConfig, fetcher: Fetcher, cache_root: &Path) -> Result<Self> {
        let cache = CacheManager::new(cache_root, &corpus.cache)?;
        Ok(Self {
            corpus,
            fetcher,
            cache,
            index: None,
        })
    }

    /// The corpus this searcher serves.
    pub const fn corpus(&self) -> &CorpusConfig {
        &self.corpus
    }

    /// On-disk cache bookkeeping for the corpus.
    pub const fn cache(&self) -> &CacheManager {
        &self.cache
    }

    /// Whether an index is open for queries.
    pub const fn is_open(&self) -> bool {
        self.index.is_some()
    }

    /// Make sure a current index is open, rebuilding it when the remote
    /// content changed.
    #[tracing::instrument(skip(self), fields(corpus = %self.corpus.name))]
    pub async fn ensure_index(&mut self) -> Result<()> {
        if !self.cache.index_exists() {
            info!("No cached index, building");
            return self.rebuild_index().await;
        }

        let staleness = self
            .cache
            .check_etag(&self.fetcher, &self.corpus.content_url)
            .await;
        match staleness {
            Ok(Staleness::Unchanged { .. }) => match SearchIndex::open(self.cache.index_path()) {
                Ok(index) => {
                    debug!("Cached index is current");
                    self.index = Some(index);
                    Ok(())
                },
                Err(e) => {
                    warn!("Cached index is unreadable, rebuilding: {e}");
                    self.discard_index()?;
                    self.rebuild_index().await
                },
            },
            Ok(Staleness::Changed { etag }) => {
                info!("Remote content changed, rebuilding");
                self.discard_index()?;
                self.build_index(etag).await
            },
            Err(e) => {
                warn!("Revalidation failed: {e}");
                match SearchIndex::open(self.cache.index_path()) {
                    Ok(index) => {
                        info!("Serving cached index without revalidation");
                        self.index = Some(index);
                        Ok(())
                    },
                    Err(open_err) => {
                        warn!("Cached index is unreadable, rebuilding: {open_err}");
                        self.discard_index()?;
                        self.rebuild_index().await
                    },
                }
            },
        }
    }

    async fn rebuild_index(&mut self) -> Result<()> {
        let etag = match self.fetcher.revalidate(&self.corpus.content_url, None).await {
            Ok(revalidation) => revalidation.etag().map(str::to_string),
            Err(e) => {
                debug!("HEAD before rebuild failed: {e}");
                None
            },
        };
        self.build_index(etag).await
    }

    async fn build_index(&mut self, head_etag: Option<String>) -> Result<()> {
        let fetched = self.fetcher.fetch(&self.corpus.content_url).await?;
        let categories = self.load_categories().await;
        let documents = self.corpus.format.documents(&fetched.content, &categories);

        let index = SearchIndex::create(self.cache.index_path())?;
        if let Err(e) = index.index_documents(&documents) {
            drop(index);
            self.cache.delete_index()?;
            return Err(e);
        }
        info!(
            "Built index for {} with {} documents ({} categorized)",
            self.corpus.name,
            documents.len(),
            categories.len()
        );

        // Without a stored validator every later check would rebuild.
        if let Some(etag) = fetched.etag.or(head_etag) {
            self.cache.save_etag(&self.corpus.content_url, &etag)?;
        }
        self.index = Some(index);
        Ok(())
    }

    async fn load_categories(&self) -> CategoryMap {
        match self.fetch_outline().await {
            Ok(outline) => self.corpus.format.category_map(&outline),
            Err(e) => {
                warn!(
                    "Failed to load outline {}, indexing without categories: {e}",
                    self.corpus.outline_url
                );
                CategoryMap::new()
            },
        }
    }

    async fn fetch_outline(&self) -> Result<Outline> {
        let fetched = self.fetcher.fetch(&self.corpus.outline_url).await?;
        OutlineParser::new()?.parse(&fetched.content)
    }

    fn discard_index(&mut self) -> Result<()> {
        self.index = None;
        self.cache.delete_index()
    }

    fn open_index(&self) -> Result<&SearchIndex> {
        self.index
            .as_ref()
            .ok_or_else(|| Error::Index("index not open".into()))
    }

    /// Ranked search. Zero-valued options fall back to the defaults.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>> {
        let index = self.open_index()?;
        let max_content_length = options.effective_max_content_length();

        let results = index
            .search(query, options.effective_limit())?
            .into_iter()
            .map(|(document, score)| {
                let mut result = SearchResult::from_document(document, score);
                result.content = truncate_content(&result.content, max_content_length);
                result
            })
            .collect::<Vec<_>>();

        debug!("Search {:?} returned {} results", query, results.len());
        Ok(results)
    }

    /// Full document by identifier, with a zero score.
    pub fn get_document(&self, id: &str) -> Result<Option<SearchResult>> {
        Ok(self
            .open_index()?
            .get_by_id(id)?
            .map(|document| SearchResult::from_document(document, 0.0)))
    }

    /// Release the index handle. Later searches fail until `ensure_index`.
    pub fn close(&mut self) {
        self.index = None;
    }
}

/// Cut `text` to `max_chars` characters, appending [`TRUNCATION_MARKER`]
/// when anything was removed.
pub fn truncate_content(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &text[..cut]),
        None => text.to_string(),
    }
}
