//! Search query parsing, matching, snippets and highlight segments
//!
//! Data flows parser → matcher → snippet → highlight; the fuzzy corrector
//! only looks at query strings, and the batch processor drives the first
//! stages across a note collection.

pub mod batch;
pub mod fuzzy;
pub mod highlight;
pub mod matcher;
pub mod options;
pub mod parser;
pub mod patterns;
pub mod snippet;

#[cfg(test)]
mod property_tests;

pub use batch::{BatchProcessor, BatchResult};
pub use fuzzy::{edit_distance, FuzzyCorrector, TypoCorrection};
pub use highlight::{HighlightRenderer, Segment};
pub use matcher::{HighlightMatch, MatchFinder, MatchKind};
pub use options::{FuzzyOptions, HighlightOptions};
pub use parser::{FieldSearch, Operator, ParsedQuery, QueryParser};
pub use patterns::{CompiledTerms, PatternCache};
pub use snippet::{Snippet, SnippetBuilder};
