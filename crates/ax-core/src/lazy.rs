//! Get-or-initialize holder for expensive values such as a [`Searcher`].
//!
//! The first caller of [`Lazy::get`] runs the initializer while holding an
//! async mutex, so concurrent callers wait for that single attempt instead
//! of racing. Only success is stored: after a failure the next call tries
//! again.

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::Mutex;
use tracing::debug;

use crate::corpus::CorpusConfig;
use crate::{Config, Result, Searcher};

type Init<T> = Box<dyn Fn() -> BoxFuture<'static, Result<T>> + Send + Sync>;

/// Lazily initialized shared value.
pub struct Lazy<T> {
    slot: Mutex<Option<Arc<T>>>,
    init: Init<T>,
}

/// A searcher whose index is built on first use.
pub type LazySearcher = Lazy<Searcher>;

impl<T: Send + Sync + 'static> Lazy<T> {
    /// Wrap `init`, which runs on the first successful [`Lazy::get`].
    pub fn new<F, Fut>(init: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            slot: Mutex::new(None),
            init: Box::new(move || init().boxed()),
        }
    }

    /// Return the value, initializing it if no earlier call succeeded.
    pub async fn get(&self) -> Result<Arc<T>> {
        let mut slot = self.slot.lock().await;
        if let Some(value) = slot.as_ref() {
            return Ok(Arc::clone(value));
        }

        debug!("Initializing lazy value");
        let value = Arc::new((self.init)().await?);
        *slot = Some(Arc::clone(&value));
        Ok(value)
    }

    /// Whether a value has been initialized.
    pub async fn is_initialized(&self) -> bool {
        self.slot.lock().await.is_some()
    }
}

impl Lazy<Searcher> {
    /// Searcher for `corpus` whose first `get` builds or revalidates the index.
    pub fn for_corpus(corpus: CorpusConfig, config: Config) -> Self {
        Self::new(move || {
            let corpus = corpus.clone();
            let config = config.clone();
            async move {
                let mut searcher = Searcher::new(corpus, &config)?;
                searcher.ensure_index().await?;
                Ok(searcher)
            }
        })
    }
}
