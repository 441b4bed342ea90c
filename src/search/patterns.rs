//! Compiled term sets and the bounded cache that owns them
//!
//! Terms are only ever compiled as escaped literals, so no user input reaches
//! a pattern compiler as a pattern. Both backends (the `regex` crate's finite
//! automata and `aho-corasick`) run in time linear in the haystack.

use super::matcher::{HighlightMatch, MatchKind};
use super::options::HighlightOptions;
use aho_corasick::{AhoCorasick, MatchKind as AcMatchKind};
use lru::LruCache;
use regex::{Regex, RegexBuilder};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Number of distinct term sets kept compiled
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Compiled size cap for escaped literals; very long terms fall back to aho-corasick
const LITERAL_SIZE_LIMIT: usize = 8 * (1 << 20);

/// Compiled size cap for raw patterns when literal-only matching is disabled
const RAW_PATTERN_SIZE_LIMIT: usize = 1 << 16;

enum TermMatcher {
    Regex(Regex),
    Literal(AhoCorasick),
}

impl TermMatcher {
    /// Leftmost non-overlapping, non-empty match spans
    fn spans(&self, text: &str) -> Vec<(usize, usize)> {
        match self {
            TermMatcher::Regex(re) => re
                .find_iter(text)
                .map(|m| (m.start(), m.end()))
                .filter(|(s, e)| s < e)
                .collect(),
            TermMatcher::Literal(ac) => ac
                .find_iter(text)
                .map(|m| (m.start(), m.end()))
                .filter(|(s, e)| s < e)
                .collect(),
        }
    }
}

struct CompiledTerm {
    kind: MatchKind,
    matcher: TermMatcher,
}

/// A term set compiled once and reusable against any number of texts
pub struct CompiledTerms {
    terms: Vec<CompiledTerm>,
}

impl CompiledTerms {
    fn compile(key: &TermSetKey) -> Self {
        let terms = key
            .terms
            .iter()
            .filter_map(|(term, kind)| {
                build_matcher(term, key.case_sensitive, key.regex_safe).map(|matcher| {
                    CompiledTerm {
                        kind: *kind,
                        matcher,
                    }
                })
            })
            .collect();

        Self { terms }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// All matches of every term, ordered by start. Ties keep discovery
    /// order: term order first, then position.
    pub fn find(&self, text: &str) -> Vec<HighlightMatch> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<HighlightMatch> = self
            .terms
            .iter()
            .flat_map(|compiled| {
                compiled
                    .matcher
                    .spans(text)
                    .into_iter()
                    .map(move |(start, end)| HighlightMatch {
                        start,
                        end,
                        kind: compiled.kind,
                        term: text[start..end].to_string(),
                    })
            })
            .collect();

        matches.sort_by_key(|m| m.start);
        matches
    }
}

fn build_matcher(term: &str, case_sensitive: bool, regex_safe: bool) -> Option<TermMatcher> {
    if !regex_safe {
        match RegexBuilder::new(term)
            .case_insensitive(!case_sensitive)
            .size_limit(RAW_PATTERN_SIZE_LIMIT)
            .build()
        {
            Ok(re) => return Some(TermMatcher::Regex(re)),
            Err(err) => debug!("Raw pattern {:?} rejected, matching literally: {}", term, err),
        }
    }

    if case_sensitive {
        return literal_matcher(term, false);
    }

    match RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .size_limit(LITERAL_SIZE_LIMIT)
        .build()
    {
        Ok(re) => Some(TermMatcher::Regex(re)),
        Err(err) => {
            warn!(
                "Term of {} bytes exceeds the literal pattern limit, using ASCII case folding: {}",
                term.len(),
                err
            );
            literal_matcher(term, true)
        }
    }
}

fn literal_matcher(term: &str, ascii_case_insensitive: bool) -> Option<TermMatcher> {
    match AhoCorasick::builder()
        .match_kind(AcMatchKind::LeftmostFirst)
        .ascii_case_insensitive(ascii_case_insensitive)
        .build([term])
    {
        Ok(ac) => Some(TermMatcher::Literal(ac)),
        Err(err) => {
            warn!("Dropping term of {} bytes: {}", term.len(), err);
            None
        }
    }
}

/// Identity of a compiled term set: trimmed terms with their tags plus the
/// options that change how they compile
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TermSetKey {
    terms: Vec<(String, MatchKind)>,
    case_sensitive: bool,
    regex_safe: bool,
}

/// Least-recently-used cache of compiled term sets. Each `MatchFinder` owns
/// one; there is no process-wide cache.
pub struct PatternCache {
    entries: LruCache<TermSetKey, Arc<CompiledTerms>>,
}

impl PatternCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Compile `terms` or return the cached compilation. Blank terms are
    /// skipped; surrounding whitespace is trimmed.
    pub fn get_or_compile<I, S>(&mut self, terms: I, options: &HighlightOptions) -> Arc<CompiledTerms>
    where
        I: IntoIterator<Item = (S, MatchKind)>,
        S: AsRef<str>,
    {
        let key = TermSetKey {
            terms: terms
                .into_iter()
                .filter_map(|(term, kind)| {
                    let trimmed = term.as_ref().trim();
                    (!trimmed.is_empty()).then(|| (trimmed.to_string(), kind))
                })
                .collect(),
            case_sensitive: options.case_sensitive,
            regex_safe: options.enable_regex_safe,
        };

        if let Some(compiled) = self.entries.get(&key) {
            trace!("Pattern cache hit for {} terms", key.terms.len());
            return Arc::clone(compiled);
        }

        trace!("Pattern cache miss for {} terms", key.terms.len());
        let compiled = Arc::new(CompiledTerms::compile(&key));
        if let Some((evicted, _)) = self.entries.push(key, Arc::clone(&compiled)) {
            debug!("Evicted compiled set of {} terms", evicted.terms.len());
        }
        compiled
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
