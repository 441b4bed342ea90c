//! Explicit configuration records for matching, snippets and corrections
//!
//! Options are always passed by the caller; nothing in the engine reads
//! configuration from global state.

use crate::error::SearchError;
use serde::{Deserialize, Serialize};

/// Options controlling matching and snippet extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HighlightOptions {
    /// Maximum number of snippets emitted per text
    pub max_snippets: usize,
    /// Target snippet length in bytes
    pub snippet_length: usize,
    /// Matches closer than this many bytes share a snippet
    pub context_window: usize,
    /// Match terms with exact case
    pub case_sensitive: bool,
    /// Match terms only as escaped literals. Disabling this is for internal
    /// testing: terms are then tried as patterns first.
    pub enable_regex_safe: bool,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            max_snippets: 3,
            snippet_length: 150,
            context_window: 40,
            case_sensitive: false,
            enable_regex_safe: true,
        }
    }
}

impl HighlightOptions {
    pub fn with_max_snippets(mut self, max_snippets: usize) -> Self {
        self.max_snippets = max_snippets;
        self
    }

    pub fn with_snippet_length(mut self, snippet_length: usize) -> Self {
        self.snippet_length = snippet_length;
        self
    }

    pub fn with_context_window(mut self, context_window: usize) -> Self {
        self.context_window = context_window;
        self
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_regex_safe(mut self, enable_regex_safe: bool) -> Self {
        self.enable_regex_safe = enable_regex_safe;
        self
    }

    /// Reject option combinations that cannot produce useful output
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.snippet_length == 0 {
            return Err(SearchError::InvalidOptions(
                "snippetLength must be positive".to_string(),
            ));
        }
        if self.max_snippets == 0 {
            return Err(SearchError::InvalidOptions(
                "maxSnippets must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Options for "did you mean" suggestions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FuzzyOptions {
    /// Suggestions at or below this confidence are discarded
    pub min_confidence: f64,
    pub max_suggestions: usize,
}

impl Default for FuzzyOptions {
    fn default() -> Self {
        Self {
            min_confidence: 0.6,
            max_suggestions: 2,
        }
    }
}

impl FuzzyOptions {
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn with_max_suggestions(mut self, max_suggestions: usize) -> Self {
        self.max_suggestions = max_suggestions;
        self
    }
}
