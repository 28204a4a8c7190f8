use std::path::Path;

use tantivy::collector::TopDocs;
use tantivy::query::{
    BooleanQuery, BoostQuery, ConstScoreQuery, DisjunctionMaxQuery, FuzzyTermQuery, Occur,
    Query, RegexQuery, TermQuery,
};
use tantivy::schema::{
    Field, IndexRecordOption, STORED, STRING, Schema, TextFieldIndexing, TextOptions, Value,
};
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term, doc};
use tracing::{debug, info};

use crate::analyzer::{self, INDEX_ANALYZER};
use crate::{Error, IndexDocument, Result};

/// Memory budget handed to the index writer.
const WRITER_MEMORY_BYTES: usize = 50_000_000;

const TITLE_BOOST: f32 = 5.0;
const DESCRIPTION_BOOST: f32 = 1.5;
const CONTENT_BOOST: f32 = 1.0;
const CATEGORY_BOOST: f32 = 1.0;

/// Score of a near match. Kept below exact BM25 hits so a token that also
/// matches exactly scores the same as in a field without fuzziness.
const FUZZY_MATCH_SCORE: f32 = 0.01;

#[derive(Clone, Copy)]
struct Fields {
    id: Field,
    title: Field,
    content: Field,
    description: Field,
    url: Field,
    category: Field,
}

impl Fields {
    fn from_schema(schema: &Schema) -> Result<Self> {
        let get = |name: &str| {
            schema
                .get_field(name)
                .map_err(|_| Error::Index(format!("Missing {name} field")))
        };
        Ok(Self {
            id: get("id")?,
            title: get("title")?,
            content: get("content")?,
            description: get("description")?,
            url: get("url")?,
            category: get("category")?,
        })
    }
}

/// One per-field clause of the ranked query.
struct FieldMatch {
    field: Field,
    boost: f32,
    fuzzy: bool,
}

fn build_schema() -> Schema {
    let text = TextOptions::default()
        .set_indexing_options(
            TextFieldIndexing::default()
                .set_tokenizer(INDEX_ANALYZER)
                .set_index_option(IndexRecordOption::WithFreqsAndPositions),
        )
        .set_stored();

    let mut builder = Schema::builder();
    builder.add_text_field("id", STRING | STORED);
    builder.add_text_field("title", text.clone());
    builder.add_text_field("content", text.clone());
    builder.add_text_field("description", text.clone());
    builder.add_text_field("url", STRING | STORED);
    builder.add_text_field("category", text);
    builder.build()
}

/// Edit distance allowed for a query term of the given length.
fn fuzzy_distance(term: &str) -> u8 {
    match term.chars().count() {
        0..=2 => 0,
        3..=5 => 1,
        _ => 2,
    }
}

/// Persistent full-text index over one corpus.
pub struct SearchIndex {
    index: Index,
    fields: Fields,
    reader: IndexReader,
}

impl SearchIndex {
    /// Create a fresh index at `index_path`, replacing anything already there.
    pub fn create(index_path: &Path) -> Result<Self> {
        if index_path.exists() {
            std::fs::remove_dir_all(index_path)
                .map_err(|e| Error::Index(format!("Failed to remove old index: {e}")))?;
        }
        std::fs::create_dir_all(index_path)
            .map_err(|e| Error::Index(format!("Failed to create index directory: {e}")))?;

        let index = Index::create_in_dir(index_path, build_schema())
            .map_err(|e| Error::Index(format!("Failed to create index: {e}")))?;

        debug!("Created index at {}", index_path.display());
        Self::from_index(index)
    }

    /// Open an existing index. Fails on a missing directory or schema mismatch.
    pub fn open(index_path: &Path) -> Result<Self> {
        let index = Index::open_in_dir(index_path)
            .map_err(|e| Error::Index(format!("Failed to open index: {e}")))?;
        Self::from_index(index)
    }

    fn from_index(index: Index) -> Result<Self> {
        let fields = Fields::from_schema(&index.schema())?;
        analyzer::register(&index);

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| Error::Index(format!("Failed to create reader: {e}")))?;

        Ok(Self {
            index,
            fields,
            reader,
        })
    }

    /// Add all documents in one commit. On failure nothing is kept.
    pub fn index_documents(&self, documents: &[IndexDocument]) -> Result<()> {
        let mut writer: IndexWriter = self
            .index
            .writer(WRITER_MEMORY_BYTES)
            .map_err(|e| Error::Index(format!("Failed to create writer: {e}")))?;

        for document in documents {
            let added = writer.add_document(doc!(
                self.fields.id => document.id.as_str(),
                self.fields.title => document.title.as_str(),
                self.fields.content => document.content.as_str(),
                self.fields.description => document.description.as_str(),
                self.fields.url => document.url.as_str(),
                self.fields.category => document.category.as_str(),
            ));
            if let Err(e) = added {
                let _ = writer.rollback();
                return Err(Error::Index(format!("Failed to add document: {e}")));
            }
        }

        if let Err(e) = writer.commit() {
            let _ = writer.rollback();
            return Err(Error::Index(format!("Failed to commit: {e}")));
        }

        self.reader
            .reload()
            .map_err(|e| Error::Index(format!("Failed to reload reader: {e}")))?;

        info!("Indexed {} documents", documents.len());
        Ok(())
    }

    /// Ranked search over title, description, content and category.
    ///
    /// Returns hits in descending score order. A query that analyzes to no
    /// terms returns nothing.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<(IndexDocument, f32)>> {
        let terms = analyzer::query_terms(&self.index, query)?;
        if terms.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let query = self.build_query(&terms)?;
        let searcher = self.reader.searcher();
        let top_docs = searcher
            .search(&query, &TopDocs::with_limit(limit))
            .map_err(|e| Error::Index(format!("Search failed: {e}")))?;

        debug!("Query {:?} matched {} documents", terms, top_docs.len());

        top_docs
            .into_iter()
            .map(|(score, address)| {
                let doc: TantivyDocument = searcher
                    .doc(address)
                    .map_err(|e| Error::Index(format!("Failed to retrieve doc: {e}")))?;
                Ok((self.to_document(&doc), score))
            })
            .collect()
    }

    /// Exact lookup by identifier.
    pub fn get_by_id(&self, id: &str) -> Result<Option<IndexDocument>> {
        let query = TermQuery::new(
            Term::from_field_text(self.fields.id, id),
            IndexRecordOption::Basic,
        );
        let searcher = self.reader.searcher();
        let top_docs = searcher
            .search(&query, &TopDocs::with_limit(1))
            .map_err(|e| Error::Index(format!("Lookup failed: {e}")))?;

        let Some((_, address)) = top_docs.into_iter().next() else {
            return Ok(None);
        };
        let doc: TantivyDocument = searcher
            .doc(address)
            .map_err(|e| Error::Index(format!("Failed to retrieve doc: {e}")))?;
        Ok(Some(self.to_document(&doc)))
    }

    /// Number of documents visible to the reader.
    pub fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    fn field_matches(&self) -> [FieldMatch; 4] {
        [
            FieldMatch {
                field: self.fields.title,
                boost: TITLE_BOOST,
                fuzzy: false,
            },
            FieldMatch {
                field: self.fields.description,
                boost: DESCRIPTION_BOOST,
                fuzzy: true,
            },
            FieldMatch {
                field: self.fields.content,
                boost: CONTENT_BOOST,
                fuzzy: true,
            },
            FieldMatch {
                field: self.fields.category,
                boost: CATEGORY_BOOST,
                fuzzy: false,
            },
        ]
    }

    fn build_query(&self, terms: &[String]) -> Result<BooleanQuery> {
        let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
        for field_match in self.field_matches() {
            let field_query = field_query(&field_match, terms)?;
            clauses.push((
                Occur::Should,
                Box::new(BoostQuery::new(Box::new(field_query), field_match.boost)),
            ));
        }
        Ok(BooleanQuery::new(clauses))
    }

    fn to_document(&self, doc: &TantivyDocument) -> IndexDocument {
        let text = |field: Field| {
            doc.get_first(field)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };
        IndexDocument {
            id: text(self.fields.id),
            title: text(self.fields.title),
            content: text(self.fields.content),
            description: text(self.fields.description),
            url: text(self.fields.url),
            category: text(self.fields.category),
        }
    }
}

fn field_query(field_match: &FieldMatch, terms: &[String]) -> Result<BooleanQuery> {
    let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
    for text in terms {
        let term = Term::from_field_text(field_match.field, text);
        let exact: Box<dyn Query> =
            Box::new(TermQuery::new(term.clone(), IndexRecordOption::WithFreqs));

        let distance = fuzzy_distance(text);
        if !field_match.fuzzy || distance == 0 {
            clauses.push((Occur::Should, exact));
            continue;
        }

        // Exact and near matches are alternatives: best of the two, never summed.
        let near: Box<dyn Query> = Box::new(ConstScoreQuery::new(
            Box::new(prefixed_fuzzy_query(field_match.field, term, text, distance)?),
            FUZZY_MATCH_SCORE,
        ));
        clauses.push((
            Occur::Should,
            Box::new(DisjunctionMaxQuery::new(vec![exact, near])),
        ));
    }
    Ok(BooleanQuery::new(clauses))
}

/// Fuzzy match restricted to terms sharing the query term's first character.
fn prefixed_fuzzy_query(
    field: Field,
    term: Term,
    text: &str,
    distance: u8,
) -> Result<BooleanQuery> {
    let first = text.chars().next().map(String::from).unwrap_or_default();
    let prefix = RegexQuery::from_pattern(&format!("{}.*", regex::escape(&first)), field)
        .map_err(|e| Error::Index(format!("Invalid prefix pattern: {e}")))?;

    let fuzzy: Box<dyn Query> = Box::new(FuzzyTermQuery::new(term, distance, true));
    let prefix: Box<dyn Query> = Box::new(ConstScoreQuery::new(Box::new(prefix), 0.0));
    Ok(BooleanQuery::new(vec![(Occur::Must, fuzzy), (Occur::Must, prefix)]))
}
