//! Built-in documentation corpora and how their exports are turned into
//! index documents.

use crate::cache::CacheLayout;
use crate::category::{self, CategoryMap};
use crate::{FlatDocument, IndexDocument, Outline, doc_id, flat};

/// Host of the primary Apps-in-Toss developer documentation.
pub const DOCS_BASE_URL: &str = "https://developers-apps-in-toss.toss.im";
/// Host of the TDS component-library documentation.
pub const TDS_BASE_URL: &str = "https://tossmini-docs.toss.im";
/// Outline listing the example projects.
pub const EXAMPLES_URL: &str = "https://developers-apps-in-toss.toss.im/tutorials/examples.md";

/// Shape of a corpus's flat-content export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentFormat {
    /// `---` / `url:` frontmatter blocks; categories only from the outline.
    Frontmatter,
    /// `# Title (/path)` blocks; paths resolve against `base_url`, and pages
    /// missing from the outline get a category derived from their path.
    InlinePath {
        /// Origin that root-relative paths resolve against.
        base_url: String,
    },
}

impl ContentFormat {
    fn base_url(&self) -> &str {
        match self {
            Self::Frontmatter => "",
            Self::InlinePath { base_url } => base_url,
        }
    }

    /// Parse a flat-content export.
    pub fn parse(&self, content: &str) -> Vec<FlatDocument> {
        match self {
            Self::Frontmatter => flat::parse_frontmatter(content),
            Self::InlinePath { base_url } => flat::parse_inline_path(content, base_url),
        }
    }

    /// URL → category map for an outline, keyed the way [`Self::parse`] emits URLs.
    pub fn category_map(&self, outline: &Outline) -> CategoryMap {
        category::build_category_map(outline, self.base_url())
    }

    /// Category for one page.
    pub fn categorize(&self, url: &str, categories: &CategoryMap) -> String {
        if let Some(found) = categories.get(url) {
            return found.clone();
        }
        match self {
            Self::Frontmatter => String::new(),
            Self::InlinePath { base_url } => category::path_category(url, base_url),
        }
    }

    /// Parse `content` and produce categorized, identified index documents.
    pub fn documents(&self, content: &str, categories: &CategoryMap) -> Vec<IndexDocument> {
        self.parse(content)
            .into_iter()
            .map(|page| {
                let category = self.categorize(&page.url, categories);
                IndexDocument {
                    id: doc_id::generate(&page.title, &page.url, &category),
                    title: page.title,
                    content: page.content,
                    description: String::new(),
                    url: page.url,
                    category,
                }
            })
            .collect()
    }
}

/// Everything needed to fetch, index and cache one corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusConfig {
    /// Short name used in logs and output.
    pub name: String,
    /// `llms.txt`
    pub outline_url: String,
    /// `llms-full.txt`
    pub content_url: String,
    /// Shape of the flat-content export.
    pub format: ContentFormat,
    /// Where this corpus lives under the cache root.
    pub cache: CacheLayout,
}

impl CorpusConfig {
    /// Apps-in-Toss developer documentation.
    pub fn docs() -> Self {
        Self {
            name: "docs".into(),
            outline_url: format!("{DOCS_BASE_URL}/llms.txt"),
            content_url: format!("{DOCS_BASE_URL}/llms-full.txt"),
            format: ContentFormat::Frontmatter,
            cache: CacheLayout::new("cache-metadata.json", "search-index"),
        }
    }

    /// TDS React Native component library.
    pub fn tds_react_native() -> Self {
        Self::tds("tds-react-native", "tds-cache-metadata.json", "tds-search-index")
    }

    /// TDS Mobile (web) component library.
    pub fn tds_mobile() -> Self {
        Self::tds(
            "tds-mobile",
            "tds-mobile-cache-metadata.json",
            "tds-mobile-search-index",
        )
    }

    fn tds(name: &str, metadata_file: &str, index_dir: &str) -> Self {
        Self {
            name: name.into(),
            outline_url: format!("{TDS_BASE_URL}/{name}/llms.txt"),
            content_url: format!("{TDS_BASE_URL}/{name}/llms-full.txt"),
            format: ContentFormat::InlinePath {
                base_url: TDS_BASE_URL.into(),
            },
            cache: CacheLayout::new(metadata_file, index_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Link, Section};
    use pretty_assertions::assert_eq;

    fn outline_with(url: &str, section: &str) -> Outline {
        Outline {
            sections: vec![Section {
                title: section.into(),
                level: 2,
                links: vec![Link {
                    title: "t".into(),
                    url: url.into(),
                    description: String::new(),
                }],
                children: vec![],
            }],
            ..Outline::default()
        }
    }

    #[test]
    fn presets_use_distinct_cache_names() {
        let presets = [
            CorpusConfig::docs(),
            CorpusConfig::tds_react_native(),
            CorpusConfig::tds_mobile(),
        ];
        for (i, a) in presets.iter().enumerate() {
            for b in &presets[i + 1..] {
                assert_ne!(a.cache.metadata_file, b.cache.metadata_file);
                assert_ne!(a.cache.index_dir, b.cache.index_dir);
            }
        }
        assert_eq!(
            CorpusConfig::tds_mobile().content_url,
            "https://tossmini-docs.toss.im/tds-mobile/llms-full.txt"
        );
    }

    #[test]
    fn frontmatter_documents_take_outline_categories() {
        let format = ContentFormat::Frontmatter;
        let content = "---\nurl: https://a.dev/x\n---\n# X\nbody\n---\nurl: https://a.dev/y\n---\n# Y\n";
        let map = format.category_map(&outline_with("https://a.dev/x", "Guides"));

        let docs = format.documents(content, &map);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].category, "Guides");
        assert_eq!(docs[0].id, doc_id::generate("X", "https://a.dev/x", "Guides"));
        assert_eq!(docs[1].category, "", "no path fallback for primary docs");
        assert_eq!(docs[1].description, "");
    }

    #[test]
    fn inline_path_documents_fall_back_to_path_category() {
        let format = ContentFormat::InlinePath {
            base_url: TDS_BASE_URL.into(),
        };
        let content = "# Button (/tds-mobile/components/button/)\nbody\n---\n# Toast (/tds-mobile/hooks/use-toast/)\n";
        let map = format.category_map(&outline_with("/tds-mobile/components/button/", "Inputs"));

        let docs = format.documents(content, &map);
        assert_eq!(docs[0].category, "Inputs");
        assert_eq!(docs[1].category, "Tds Mobile > Hooks");
        assert_eq!(docs[1].url, "https://tossmini-docs.toss.im/tds-mobile/hooks/use-toast/");
    }
}
