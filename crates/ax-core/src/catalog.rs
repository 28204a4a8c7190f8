//! Direct document access through an outline, without a search index.
//!
//! Each call re-fetches the outline so listings always reflect the remote
//! table of contents.

use tracing::debug;

use crate::category::CATEGORY_SEPARATOR;
use crate::fetcher::Fetcher;
use crate::outline::OutlineParser;
use crate::{CatalogEntry, Outline, Result, Section, doc_id};

/// Outline-backed catalog of documents.
#[derive(Clone)]
pub struct OutlineCatalog {
    fetcher: Fetcher,
}

impl OutlineCatalog {
    /// Catalog fetching outlines and documents through `fetcher`.
    pub const fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    /// Fetch `outline_url` and flatten it into catalog entries.
    pub async fn entries(&self, outline_url: &str) -> Result<Vec<CatalogEntry>> {
        let fetched = self.fetcher.fetch(outline_url).await?;
        let outline = OutlineParser::new()?.parse(&fetched.content)?;
        Ok(flatten(&outline))
    }

    /// Raw content of the entry with identifier `id`, or `None` if the
    /// outline has no such entry.
    pub async fn get_document(&self, outline_url: &str, id: &str) -> Result<Option<String>> {
        let entries = self.entries(outline_url).await?;
        let Some(entry) = entries.into_iter().find(|entry| entry.id == id) else {
            debug!("No entry {} in {}", id, outline_url);
            return Ok(None);
        };
        let fetched = self.fetcher.fetch(&entry.url).await?;
        Ok(Some(fetched.content))
    }
}

/// Flatten an outline depth-first into entries carrying their category path.
pub fn flatten(outline: &Outline) -> Vec<CatalogEntry> {
    let mut entries = Vec::new();
    for section in &outline.sections {
        flatten_section(section, "", &mut entries);
    }
    entries
}

fn flatten_section(section: &Section, parent: &str, entries: &mut Vec<CatalogEntry>) {
    let category = if parent.is_empty() {
        section.title.clone()
    } else {
        format!("{parent}{CATEGORY_SEPARATOR}{}", section.title)
    };

    entries.extend(section.links.iter().map(|link| CatalogEntry {
        id: doc_id::generate(&link.title, &link.url, &category),
        title: link.title.clone(),
        content: link.description.clone(),
        url: link.url.clone(),
        category: category.clone(),
    }));

    for child in &section.children {
        flatten_section(child, &category, entries);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn outline_text(base: &str) -> String {
        format!(
            "# Examples\n\n## Games\n\n- [Tetris]({base}/examples/tetris.md): Falling blocks\n\n### Puzzles\n\n- [Sudoku]({base}/examples/sudoku.md)\n"
        )
    }

    #[tokio::test]
    async fn entries_carry_category_and_id() -> anyhow::Result<()> {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/examples.md"))
            .respond_with(ResponseTemplate::new(200).set_body_string(outline_text(&mock_server.uri())))
            .mount(&mock_server)
            .await;

        let catalog = OutlineCatalog::new(Fetcher::new()?);
        let entries = catalog
            .entries(&format!("{}/examples.md", mock_server.uri()))
            .await?;

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Tetris");
        assert_eq!(entries[0].content, "Falling blocks");
        assert_eq!(entries[0].category, "Games");
        assert_eq!(entries[1].category, "Games > Puzzles");
        assert_eq!(
            entries[1].id,
            doc_id::generate("Sudoku", &entries[1].url, "Games > Puzzles")
        );
        Ok(())
    }

    #[tokio::test]
    async fn get_document_fetches_linked_content() -> anyhow::Result<()> {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/examples.md"))
            .respond_with(ResponseTemplate::new(200).set_body_string(outline_text(&mock_server.uri())))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/examples/sudoku.md"))
            .respond_with(ResponseTemplate::new(200).set_body_string("# Sudoku\n\nNine by nine."))
            .mount(&mock_server)
            .await;

        let catalog = OutlineCatalog::new(Fetcher::new()?);
        let outline_url = format!("{}/examples.md", mock_server.uri());
        let id = catalog.entries(&outline_url).await?[1].id.clone();

        let content = catalog.get_document(&outline_url, &id).await?;
        assert_eq!(content.as_deref(), Some("# Sudoku\n\nNine by nine."));

        assert_eq!(catalog.get_document(&outline_url, "0000000000000000").await?, None);
        Ok(())
    }
}
