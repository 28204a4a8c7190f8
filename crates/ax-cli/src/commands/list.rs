//! `ax list`

use anyhow::{Context, Result};
use ax_core::corpus::EXAMPLES_URL;
use ax_core::{Config, Fetcher, OutlineCatalog};

use crate::cli::ListTarget;
use crate::utils::print_json;

/// Print every entry of the examples outline.
pub async fn execute(target: ListTarget, config: &Config) -> Result<()> {
    let url = match target {
        ListTarget::Examples => EXAMPLES_URL,
    };

    let fetcher = Fetcher::with_timeouts(config.fetch.timeout(), config.fetch.head_timeout())?;
    let entries = OutlineCatalog::new(fetcher)
        .entries(url)
        .await
        .with_context(|| format!("Failed to list {url}"))?;

    print_json(&entries)
}
