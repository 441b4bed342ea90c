//! Error types for the fallible edges of the search engine
//!
//! The engine itself never fails: parsing, matching, snippet building and
//! rendering all return plain values. Errors only arise when options are
//! validated or when work runs on a background worker with a deadline.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Invalid options: {0}")]
    InvalidOptions(String),
    #[error("Search exceeded its {}ms deadline", .0.as_millis())]
    Timeout(Duration),
    #[error("Search worker failed: {0}")]
    Worker(String),
}

impl SearchError {
    /// Stable machine-readable code for callers that report errors outward
    pub fn code(&self) -> &'static str {
        match self {
            SearchError::InvalidOptions(_) => "invalid_options",
            SearchError::Timeout(_) => "timeout",
            SearchError::Worker(_) => "worker_failed",
        }
    }
}

impl From<tokio::task::JoinError> for SearchError {
    fn from(err: tokio::task::JoinError) -> Self {
        SearchError::Worker(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_error_display() {
        let error = SearchError::InvalidOptions("snippetLength must be positive".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid options: snippetLength must be positive"
        );

        let error = SearchError::Timeout(Duration::from_millis(250));
        assert_eq!(error.to_string(), "Search exceeded its 250ms deadline");

        let error = SearchError::Worker("task panicked".to_string());
        assert_eq!(error.to_string(), "Search worker failed: task panicked");
    }

    #[test]
    fn test_search_error_codes() {
        assert_eq!(
            SearchError::InvalidOptions(String::new()).code(),
            "invalid_options"
        );
        assert_eq!(SearchError::Timeout(Duration::ZERO).code(), "timeout");
        assert_eq!(SearchError::Worker(String::new()).code(), "worker_failed");
    }
}
