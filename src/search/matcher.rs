//! Match Finder
//!
//! Locates every occurrence of the query terms in a text. Terms are matched
//! as escaped literals, so adversarial input such as `(a+)+b` is just a
//! string to look for and matching stays linear in the text length.

use super::options::HighlightOptions;
use super::patterns::{CompiledTerms, PatternCache, DEFAULT_CACHE_CAPACITY};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which part of the query produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// Match of the first supplied term
    Primary,
    /// Match of any later term
    Secondary,
    /// Match from a field-restricted search
    Field,
}

/// A matched span in the source text. Offsets are UTF-8 byte offsets on
/// char boundaries, `end` exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightMatch {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: MatchKind,
    /// The matched text as it appears in the source
    pub term: String,
}

impl HighlightMatch {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// The part of this match inside `text[start..end]`, in window-local
    /// offsets. `start` and `end` must be char boundaries of `text`.
    pub(crate) fn clipped_to(&self, text: &str, start: usize, end: usize) -> Option<Self> {
        let clip_start = self.start.max(start);
        let clip_end = self.end.min(end);
        if clip_start >= clip_end {
            return None;
        }
        let term = if clip_start == self.start && clip_end == self.end {
            self.term.clone()
        } else {
            text[clip_start..clip_end].to_string()
        };
        Some(Self {
            start: clip_start - start,
            end: clip_end - start,
            kind: self.kind,
            term,
        })
    }
}

/// Tag the first non-blank term `Primary` and every later one `Secondary`.
/// Blank terms are skipped.
pub fn tag_query_terms<S: AsRef<str>>(terms: &[S]) -> impl Iterator<Item = (&str, MatchKind)> {
    terms
        .iter()
        .map(|term| term.as_ref())
        .filter(|term| !term.trim().is_empty())
        .enumerate()
        .map(|(i, term)| {
            let kind = if i == 0 {
                MatchKind::Primary
            } else {
                MatchKind::Secondary
            };
            (term, kind)
        })
}

/// Finds term matches, keeping compiled term sets in an owned LRU cache
pub struct MatchFinder {
    cache: PatternCache,
}

impl Default for MatchFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchFinder {
    pub fn new() -> Self {
        Self::with_cache_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Create a finder that keeps at most `capacity` compiled term sets
    pub fn with_cache_capacity(capacity: usize) -> Self {
        Self {
            cache: PatternCache::new(capacity),
        }
    }

    /// Find all matches of `terms` in `text`, ordered by start offset.
    ///
    /// The first non-blank term's matches are `Primary`, all others `Secondary`.
    /// Blank terms are ignored. Never fails; empty input yields no matches.
    pub fn find<S: AsRef<str>>(
        &mut self,
        text: &str,
        terms: &[S],
        options: &HighlightOptions,
    ) -> Vec<HighlightMatch> {
        if text.is_empty() || terms.is_empty() {
            return Vec::new();
        }

        self.compile(terms, options).find(text)
    }

    /// Compile `terms` with primary/secondary tagging for reuse across texts
    pub fn compile<S: AsRef<str>>(
        &mut self,
        terms: &[S],
        options: &HighlightOptions,
    ) -> Arc<CompiledTerms> {
        self.compile_tagged(tag_query_terms(terms), options)
    }

    /// Compile terms carrying explicit tags, e.g. query terms mixed with
    /// field-search values
    pub fn compile_tagged<I, S>(&mut self, terms: I, options: &HighlightOptions) -> Arc<CompiledTerms>
    where
        I: IntoIterator<Item = (S, MatchKind)>,
        S: AsRef<str>,
    {
        self.cache.get_or_compile(terms, options)
    }

    /// Number of term sets currently compiled
    pub fn cached_sets(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    const SAMPLE: &str = "Hello world! This is a test. Hello again, world.";

    #[test]
    fn test_case_insensitive_default() {
        let mut finder = MatchFinder::new();
        let matches = finder.find(SAMPLE, &["hello"], &HighlightOptions::default());

        assert_eq!(
            matches,
            vec![
                HighlightMatch {
                    start: 0,
                    end: 5,
                    kind: MatchKind::Primary,
                    term: "Hello".to_string()
                },
                HighlightMatch {
                    start: 29,
                    end: 34,
                    kind: MatchKind::Primary,
                    term: "Hello".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_case_sensitive() {
        let mut finder = MatchFinder::new();
        let options = HighlightOptions::default().with_case_sensitive(true);

        assert!(finder.find(SAMPLE, &["hello"], &options).is_empty());
        assert_eq!(finder.find(SAMPLE, &["Hello"], &options).len(), 2);
    }

    #[test]
    fn test_primary_and_secondary_tags_sorted_by_start() {
        let mut finder = MatchFinder::new();
        let matches = finder.find(SAMPLE, &["world", "hello"], &HighlightOptions::default());

        let summary: Vec<(usize, MatchKind)> = matches.iter().map(|m| (m.start, m.kind)).collect();
        assert_eq!(
            summary,
            vec![
                (0, MatchKind::Secondary),
                (6, MatchKind::Primary),
                (29, MatchKind::Secondary),
                (42, MatchKind::Primary),
            ]
        );
    }

    #[test]
    fn test_overlapping_terms_keep_discovery_order() {
        let mut finder = MatchFinder::new();
        let matches = finder.find("abcdef", &["bcd", "b", "cde"], &HighlightOptions::default());

        let summary: Vec<(usize, usize, &str)> =
            matches.iter().map(|m| (m.start, m.end, m.term.as_str())).collect();
        assert_eq!(summary, vec![(1, 4, "bcd"), (1, 2, "b"), (2, 5, "cde")]);
    }

    #[test]
    fn test_empty_inputs() {
        let mut finder = MatchFinder::new();
        let options = HighlightOptions::default();
        let no_terms: [&str; 0] = [];

        assert!(finder.find("", &["hello"], &options).is_empty());
        assert!(finder.find("hello", &no_terms, &options).is_empty());
        assert!(finder.find("hello", &["", "   "], &options).is_empty());
    }

    #[test]
    fn test_first_non_blank_term_is_primary() {
        let mut finder = MatchFinder::new();
        let matches = finder.find("hello world", &[" ", "hello", "", "world"], &HighlightOptions::default());
        let kinds: Vec<MatchKind> = matches.iter().map(|m| m.kind).collect();
        assert_eq!(kinds, vec![MatchKind::Primary, MatchKind::Secondary]);
    }

    #[test]
    fn test_clipped_to_window() {
        let text = "pre zzzz post";
        let m = HighlightMatch {
            start: 4,
            end: 8,
            kind: MatchKind::Primary,
            term: "zzzz".to_string(),
        };

        let whole = m.clipped_to(text, 2, 13).unwrap();
        assert_eq!((whole.start, whole.end, whole.term.as_str()), (2, 6, "zzzz"));

        let cut = m.clipped_to(text, 4, 6).unwrap();
        assert_eq!((cut.start, cut.end, cut.term.as_str()), (0, 2, "zz"));

        assert!(m.clipped_to(text, 8, 13).is_none());
    }

    #[test]
    fn test_terms_are_trimmed() {
        let mut finder = MatchFinder::new();
        let matches = finder.find("say hello", &["  hello\t"], &HighlightOptions::default());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].start, 4);
    }

    #[test]
    fn test_metacharacters_match_literally() {
        let mut finder = MatchFinder::new();
        let text = "cost is $5.00 (approx) [a+b]* done";
        let options = HighlightOptions::default();

        for term in ["$5.00", "(approx)", "[a+b]*", "."] {
            let matches = finder.find(text, &[term], &options);
            assert!(!matches.is_empty(), "term {:?} should match literally", term);
            for m in &matches {
                assert_eq!(&text[m.start..m.end], term);
            }
        }
        assert!(finder.find("cost 5000", &["5.00"], &options).is_empty());
    }

    #[test]
    fn test_redos_patterns_complete_quickly() {
        let mut finder = MatchFinder::new();
        let options = HighlightOptions::default();
        let text = "a".repeat(1024);

        for pattern in [
            "(?=.*a)(?=.*b)(?=.*c)(?=.*d)(?=.*e).*",
            "(a+)+b",
            "a{100000}",
        ] {
            let started = Instant::now();
            let matches = finder.find(&text, &[pattern], &options);
            let elapsed = started.elapsed();
            assert!(matches.is_empty());
            assert!(
                elapsed < Duration::from_millis(50),
                "{:?} took {:?}",
                pattern,
                elapsed
            );
        }
    }

    #[test]
    fn test_unicode_offsets_are_byte_offsets() {
        let mut finder = MatchFinder::new();
        let text = "Ünïcode café and CAFÉ";
        let matches = finder.find(text, &["café"], &HighlightOptions::default());

        assert_eq!(matches.len(), 2);
        for m in &matches {
            assert!(text.is_char_boundary(m.start) && text.is_char_boundary(m.end));
        }
        assert_eq!(matches[1].term, "CAFÉ");
    }

    #[test]
    fn test_determinism_and_cache_reuse() {
        let mut finder = MatchFinder::with_cache_capacity(8);
        let options = HighlightOptions::default();
        let first = finder.find(SAMPLE, &["o", "l"], &options);
        let second = finder.find(SAMPLE, &["o", "l"], &options);
        assert_eq!(first, second);
        assert_eq!(finder.cached_sets(), 1);
    }

    #[test]
    fn test_serialized_shape() {
        let m = HighlightMatch {
            start: 0,
            end: 5,
            kind: MatchKind::Field,
            term: "Hello".to_string(),
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"start": 0, "end": 5, "type": "field", "term": "Hello"})
        );
    }
}
