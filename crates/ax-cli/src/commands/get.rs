//! `ax get`

use anyhow::{Context, Result, anyhow};
use ax_core::corpus::EXAMPLES_URL;
use ax_core::{Config, Fetcher, OutlineCatalog, Searcher};

use crate::cli::GetTarget;
use crate::utils::print_json;

/// Print one document by identifier.
///
/// Indexed corpora print the stored document as JSON. Examples are resolved
/// through the examples outline and printed as raw markdown.
pub async fn execute(target: GetTarget, id: &str, config: &Config) -> Result<()> {
    let Some(corpus) = target.corpus() else {
        return get_example(id, config).await;
    };

    let mut searcher = Searcher::new(corpus.config(), config)?;
    searcher
        .ensure_index()
        .await
        .context("Failed to prepare the index")?;

    let document = searcher
        .get_document(id)?
        .ok_or_else(|| anyhow!("document not found: {id}"))?;
    searcher.close();

    print_json(&document)
}

async fn get_example(id: &str, config: &Config) -> Result<()> {
    let fetcher = Fetcher::with_timeouts(config.fetch.timeout(), config.fetch.head_timeout())?;
    let content = OutlineCatalog::new(fetcher)
        .get_document(EXAMPLES_URL, id)
        .await
        .context("Failed to load examples")?
        .ok_or_else(|| anyhow!("example not found: {id}"))?;

    println!("{content}");
    Ok(())
}
