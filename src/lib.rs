//! notes-search: the search core of a note-taking client
//!
//! Turns a raw query and note text into match positions, bounded snippets
//! and render-ready highlight segments, and proposes typo corrections from
//! query history. Everything here is synchronous and pure; see [`worker`]
//! for running a batch with a deadline.

pub mod error;
pub mod note;
pub mod search;
pub mod utils;
pub mod worker;

pub use error::SearchError;
pub use note::{Note, NoteFormat};
pub use search::{
    BatchProcessor, BatchResult, FuzzyCorrector, FuzzyOptions, HighlightMatch, HighlightOptions,
    HighlightRenderer, MatchFinder, MatchKind, ParsedQuery, QueryParser, Segment, Snippet,
    SnippetBuilder, TypoCorrection,
};
