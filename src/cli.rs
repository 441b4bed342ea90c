//! CLI mode implementation
//!
//! Argument definitions and input loading for the notes-search binary

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use notes_search::{FuzzyOptions, HighlightOptions};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// notes-search CLI
#[derive(Parser, Debug)]
#[command(name = "notes-search")]
#[command(about = "Query parsing, highlighting and typo suggestions for notes", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output (no short flag to avoid conflicts)
    #[arg(long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a query and print its structure
    Parse(ParseArgs),
    /// Highlight query matches in a single text
    Highlight(HighlightArgs),
    /// Suggest corrections for a query from past queries
    Suggest(SuggestArgs),
    /// Search a collection of notes
    Batch(BatchArgs),
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Raw query, e.g. `rust "error handling" title:notes`
    pub query: String,
}

#[derive(Args, Debug)]
pub struct HighlightArgs {
    /// Text to search
    #[arg(short = 't', long)]
    pub text: String,

    /// Search query
    #[arg(short = 'q', long)]
    pub query: String,

    #[command(flatten)]
    pub options: OptionArgs,
}

#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// Possibly mistyped query
    #[arg(short = 'q', long)]
    pub query: String,

    /// JSON file holding an array of previous queries
    #[arg(long)]
    pub history: PathBuf,

    /// Minimum confidence for a suggestion (default 0.6)
    #[arg(long)]
    pub min_confidence: Option<f64>,

    /// Maximum number of suggestions (default 2)
    #[arg(long)]
    pub max_suggestions: Option<usize>,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// JSON file holding an array of notes
    #[arg(short = 'n', long)]
    pub notes: PathBuf,

    /// Search query
    #[arg(short = 'q', long)]
    pub query: String,

    /// Abandon the search after this many milliseconds
    #[arg(long, default_value_t = 5000)]
    pub timeout_ms: u64,

    #[command(flatten)]
    pub options: OptionArgs,
}

/// Highlight options: an optional JSON file plus per-field overrides
#[derive(Args, Debug, Default)]
pub struct OptionArgs {
    /// JSON file with highlight options; missing fields take defaults
    #[arg(long = "options")]
    pub file: Option<PathBuf>,

    /// Maximum snippets per text
    #[arg(long)]
    pub max_snippets: Option<usize>,

    /// Target snippet length in bytes
    #[arg(long)]
    pub snippet_length: Option<usize>,

    /// Matches closer than this many bytes share a snippet
    #[arg(long)]
    pub context_window: Option<usize>,

    /// Match with exact case
    #[arg(long)]
    pub case_sensitive: bool,
}

impl OptionArgs {
    /// Build validated options: file (or defaults) first, then flags
    pub fn resolve(&self) -> Result<HighlightOptions> {
        let mut options = match &self.file {
            Some(path) => read_json::<HighlightOptions>(path)?,
            None => HighlightOptions::default(),
        };

        if let Some(max_snippets) = self.max_snippets {
            options = options.with_max_snippets(max_snippets);
        }
        if let Some(snippet_length) = self.snippet_length {
            options = options.with_snippet_length(snippet_length);
        }
        if let Some(context_window) = self.context_window {
            options = options.with_context_window(context_window);
        }
        if self.case_sensitive {
            options = options.with_case_sensitive(true);
        }

        options.validate()?;
        Ok(options)
    }
}

impl SuggestArgs {
    pub fn fuzzy_options(&self) -> FuzzyOptions {
        let mut options = FuzzyOptions::default();
        if let Some(min_confidence) = self.min_confidence {
            options = options.with_min_confidence(min_confidence);
        }
        if let Some(max_suggestions) = self.max_suggestions {
            options = options.with_max_suggestions(max_suggestions);
        }
        options
    }
}

/// Read and deserialize a JSON input file
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", path.display()))
}
