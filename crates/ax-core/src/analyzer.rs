//! Text analysis for CJK-heavy documentation.
//!
//! Two analyzers are registered on every index:
//!
//! - [`INDEX_ANALYZER`]: [`CjkBigramTokenizer`] → lower-casing →
//!   [`EdgeNgramFilter`], so a query for `but` matches `button`.
//! - [`SEARCH_ANALYZER`]: the same tokenizer and lower-casing, without
//!   n-grams, used to turn a query string into terms.
//!
//! The tokenizer keeps runs of letters and digits as single tokens and turns
//! runs of CJK characters into overlapping bigrams (`토스페이` → `토스`,
//! `스페`, `페이`). A lone CJK character is emitted as-is.

use tantivy::Index;
use tantivy::tokenizer::{LowerCaser, TextAnalyzer, Token, TokenFilter, TokenStream, Tokenizer};

use crate::{Error, Result};

/// Analyzer name used for indexed text fields.
pub const INDEX_ANALYZER: &str = "ax_cjk_index";
/// Analyzer name used to tokenize queries.
pub const SEARCH_ANALYZER: &str = "ax_cjk_search";

/// Shortest prefix emitted by the edge n-gram filter.
pub const MIN_GRAM: usize = 1;
/// Longest prefix emitted by the edge n-gram filter.
pub const MAX_GRAM: usize = 10;

/// Register both analyzers on `index`. Must run after every create or open.
pub fn register(index: &Index) {
    index.tokenizers().register(INDEX_ANALYZER, index_analyzer());
    index.tokenizers().register(SEARCH_ANALYZER, search_analyzer());
}

/// Indexing analyzer: CJK bigrams, lower-casing, edge n-grams.
pub fn index_analyzer() -> TextAnalyzer {
    TextAnalyzer::builder(CjkBigramTokenizer)
        .filter(LowerCaser)
        .filter(EdgeNgramFilter::new(MIN_GRAM, MAX_GRAM))
        .build()
}

/// Query analyzer: CJK bigrams and lower-casing, no n-grams.
pub fn search_analyzer() -> TextAnalyzer {
    TextAnalyzer::builder(CjkBigramTokenizer)
        .filter(LowerCaser)
        .build()
}

/// Run the registered search analyzer over `text` and collect term texts.
pub fn query_terms(index: &Index, text: &str) -> Result<Vec<String>> {
    let mut analyzer = index
        .tokenizers()
        .get(SEARCH_ANALYZER)
        .ok_or_else(|| Error::Index(format!("Analyzer {SEARCH_ANALYZER} is not registered")))?;
    Ok(collect_terms(&mut analyzer, text))
}

pub(crate) fn collect_terms(analyzer: &mut TextAnalyzer, text: &str) -> Vec<String> {
    let mut stream = analyzer.token_stream(text);
    let mut terms = Vec::new();
    while stream.advance() {
        terms.push(stream.token().text.clone());
    }
    terms
}

/// Whether `c` belongs to a script that is written without spaces.
pub fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{1100}'..='\u{11FF}'     // Hangul Jamo
        | '\u{3040}'..='\u{309F}'   // Hiragana
        | '\u{30A0}'..='\u{30FF}'   // Katakana
        | '\u{3130}'..='\u{318F}'   // Hangul Compatibility Jamo
        | '\u{31F0}'..='\u{31FF}'   // Katakana Phonetic Extensions
        | '\u{3400}'..='\u{4DBF}'   // CJK Extension A
        | '\u{4E00}'..='\u{9FFF}'   // CJK Unified Ideographs
        | '\u{AC00}'..='\u{D7AF}'   // Hangul Syllables
        | '\u{F900}'..='\u{FAFF}'   // CJK Compatibility Ideographs
        | '\u{FF66}'..='\u{FF9F}'   // Halfwidth Katakana
        | '\u{20000}'..='\u{2A6DF}' // CJK Extension B
    )
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Word,
    Cjk,
    Separator,
}

fn classify(c: char) -> CharClass {
    if is_cjk(c) {
        CharClass::Cjk
    } else if c.is_alphanumeric() {
        CharClass::Word
    } else {
        CharClass::Separator
    }
}

/// Tokenizer emitting whole words and CJK bigrams.
#[derive(Clone, Copy, Debug, Default)]
pub struct CjkBigramTokenizer;

impl Tokenizer for CjkBigramTokenizer {
    type TokenStream<'a> = VecTokenStream;

    fn token_stream<'a>(&'a mut self, text: &'a str) -> VecTokenStream {
        VecTokenStream::new(segment(text))
    }
}

fn segment(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut run: Vec<(usize, char)> = Vec::new();
    let mut run_class = CharClass::Separator;

    for (offset, c) in text.char_indices() {
        let class = classify(c);
        if class != run_class {
            flush_run(text, &run, run_class, &mut tokens);
            run.clear();
            run_class = class;
        }
        if class != CharClass::Separator {
            run.push((offset, c));
        }
    }
    flush_run(text, &run, run_class, &mut tokens);
    tokens
}

fn flush_run(text: &str, run: &[(usize, char)], class: CharClass, tokens: &mut Vec<Token>) {
    let end_of = |&(offset, c): &(usize, char)| offset + c.len_utf8();

    match class {
        CharClass::Separator => {},
        CharClass::Word => {
            if let (Some(first), Some(last)) = (run.first(), run.last()) {
                push_token(text, first.0, end_of(last), tokens);
            }
        },
        CharClass::Cjk => match run {
            [] => {},
            [only] => push_token(text, only.0, end_of(only), tokens),
            _ => {
                for pair in run.windows(2) {
                    push_token(text, pair[0].0, end_of(&pair[1]), tokens);
                }
            },
        },
    }
}

fn push_token(text: &str, from: usize, to: usize, tokens: &mut Vec<Token>) {
    tokens.push(Token {
        offset_from: from,
        offset_to: to,
        position: tokens.len(),
        text: text[from..to].to_string(),
        position_length: 1,
    });
}

/// Token filter that replaces each token with its leading prefixes.
///
/// Prefixes of `min_gram..=max_gram` characters share the source token's
/// position. Tokens longer than `max_gram` also keep their full text so long
/// identifiers stay matchable as whole words.
#[derive(Clone, Copy, Debug)]
pub struct EdgeNgramFilter {
    min_gram: usize,
    max_gram: usize,
}

impl EdgeNgramFilter {
    /// Emit prefixes of `min_gram..=max_gram` characters.
    pub const fn new(min_gram: usize, max_gram: usize) -> Self {
        Self { min_gram, max_gram }
    }

    fn expand(&self, token: &Token, out: &mut Vec<Token>) {
        let char_count = token.text.chars().count();
        if char_count < self.min_gram {
            return;
        }

        let upper = char_count.min(self.max_gram);
        let boundaries = token
            .text
            .char_indices()
            .map(|(i, _)| i)
            .skip(1)
            .chain(std::iter::once(token.text.len()));

        for (grams, end) in (1..=upper).zip(boundaries) {
            if grams >= self.min_gram {
                out.push(Token {
                    text: token.text[..end].to_string(),
                    ..token.clone()
                });
            }
        }
        if char_count > self.max_gram {
            out.push(token.clone());
        }
    }
}

impl TokenFilter for EdgeNgramFilter {
    type Tokenizer<T: Tokenizer> = EdgeNgramTokenizer<T>;

    fn transform<T: Tokenizer>(self, tokenizer: T) -> EdgeNgramTokenizer<T> {
        EdgeNgramTokenizer {
            filter: self,
            inner: tokenizer,
        }
    }
}

/// Tokenizer produced by [`EdgeNgramFilter::transform`].
#[derive(Clone)]
pub struct EdgeNgramTokenizer<T> {
    filter: EdgeNgramFilter,
    inner: T,
}

impl<T: Tokenizer> Tokenizer for EdgeNgramTokenizer<T> {
    type TokenStream<'a> = VecTokenStream;

    fn token_stream<'a>(&'a mut self, text: &'a str) -> VecTokenStream {
        let mut source = self.inner.token_stream(text);
        let mut tokens = Vec::new();
        while source.advance() {
            self.filter.expand(source.token(), &mut tokens);
        }
        VecTokenStream::new(tokens)
    }
}

/// Token stream over a pre-computed token list.
pub struct VecTokenStream {
    tokens: Vec<Token>,
    index: usize,
    current: Token,
}

impl VecTokenStream {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            index: 0,
            current: Token::default(),
        }
    }
}

impl TokenStream for VecTokenStream {
    fn advance(&mut self) -> bool {
        match self.tokens.get_mut(self.index) {
            Some(token) => {
                self.current = std::mem::take(token);
                self.index += 1;
                true
            },
            None => false,
        }
    }

    fn token(&self) -> &Token {
        &self.current
    }

    fn token_mut(&mut self) -> &mut Token {
        &mut self.current
    }
}
