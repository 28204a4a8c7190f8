//! # CLI Structure and Argument Parsing
//!
//! ```bash
//! # Ranked search over an indexed corpus
//! ax search docs --query "토스페이"
//! ax search tds-rn --query button --limit 5
//!
//! # Retrieval by identifier
//! ax get docs --id 1a2b3c4d5e6f7a8b
//! ax get example --id 0f1e2d3c4b5a6978
//!
//! # Example projects (no index)
//! ax list examples
//! ```
//!
//! Results are printed as JSON on stdout. Logs go to stderr.

use ax_core::CorpusConfig;
use clap::{Parser, Subcommand, ValueEnum};

/// Main CLI structure for the `ax` command
#[derive(Parser, Clone, Debug)]
#[command(name = "ax")]
#[command(version)]
#[command(about = "ax - search Apps in Toss documentation", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Search an indexed corpus
    Search {
        /// Corpus to search
        #[arg(value_enum)]
        corpus: CorpusArg,

        /// Search query
        #[arg(long)]
        query: String,

        /// Maximum number of results (defaults to the configured limit)
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Truncate result content to this many characters
        #[arg(long)]
        max_content_length: Option<usize>,
    },

    /// Get a document or example by ID
    Get {
        #[arg(value_enum)]
        target: GetTarget,

        /// Document ID
        #[arg(long)]
        id: String,
    },

    /// List example projects without indexing
    List {
        #[arg(value_enum)]
        target: ListTarget,
    },
}

/// Indexed corpora.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CorpusArg {
    /// Apps in Toss developer documentation
    #[value(alias = "doc")]
    Docs,
    /// TDS React Native components
    TdsRn,
    /// TDS Mobile (web) components
    TdsWeb,
}

impl CorpusArg {
    pub fn config(self) -> CorpusConfig {
        match self {
            Self::Docs => CorpusConfig::docs(),
            Self::TdsRn => CorpusConfig::tds_react_native(),
            Self::TdsWeb => CorpusConfig::tds_mobile(),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GetTarget {
    #[value(alias = "doc")]
    Docs,
    TdsRn,
    TdsWeb,
    /// Example project from the examples outline
    Example,
}

impl GetTarget {
    /// The indexed corpus backing this target, if any.
    pub const fn corpus(self) -> Option<CorpusArg> {
        match self {
            Self::Docs => Some(CorpusArg::Docs),
            Self::TdsRn => Some(CorpusArg::TdsRn),
            Self::TdsWeb => Some(CorpusArg::TdsWeb),
            Self::Example => None,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListTarget {
    /// Example projects; ids resolve with `ax get example`
    Examples,
}
