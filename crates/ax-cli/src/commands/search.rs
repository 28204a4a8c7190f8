//! `ax search`

use anyhow::{Context, Result};
use ax_core::{Config, SearchResult, Searcher};
use serde::Serialize;

use crate::cli::CorpusArg;
use crate::utils::print_json;

#[derive(Serialize)]
struct SearchOutput<'a> {
    corpus: &'a str,
    query: &'a str,
    total: usize,
    results: Vec<SearchResult>,
}

/// Prepare the corpus index and print ranked results.
pub async fn execute(
    corpus: CorpusArg,
    query: &str,
    limit: Option<usize>,
    max_content_length: Option<usize>,
    config: &Config,
) -> Result<()> {
    let corpus_config = corpus.config();
    let name = corpus_config.name.clone();

    let mut searcher = Searcher::new(corpus_config, config)?;
    searcher
        .ensure_index()
        .await
        .with_context(|| format!("Failed to prepare the {name} index"))?;

    let mut options = config.search.options(limit);
    if let Some(max) = max_content_length {
        options.max_content_length = max;
    }

    let results = searcher
        .search(query, &options)
        .with_context(|| format!("Search failed for {query:?}"))?;
    searcher.close();

    print_json(&SearchOutput {
        corpus: &name,
        query,
        total: results.len(),
        results,
    })
}
