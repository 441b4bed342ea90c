//! Batch Processor
//!
//! Runs matching, snippet extraction and title highlighting over a note
//! collection. The query is parsed and compiled once and the compiled term
//! sets are shared by every note, so cost grows linearly with the
//! collection.

use super::matcher::{tag_query_terms, HighlightMatch, MatchFinder, MatchKind};
use super::options::HighlightOptions;
use super::parser::QueryParser;
use super::patterns::DEFAULT_CACHE_CAPACITY;
use super::snippet::{Snippet, SnippetBuilder};
use crate::note::Note;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;

/// Field names whose `field:value` searches apply to note titles
pub const TITLE_FIELDS: &[&str] = &["title"];
/// Field names whose `field:value` searches apply to note bodies
pub const BODY_FIELDS: &[&str] = &["content", "body"];

/// Per-note search output, keyed by note id. Every input note has an entry
/// in every map, matched or not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub snippets_by_note_id: HashMap<String, Vec<Snippet>>,
    pub title_highlights_by_note_id: HashMap<String, Vec<HighlightMatch>>,
    /// Title plus body matches, including any not shown in snippets
    pub match_counts_by_note_id: HashMap<String, usize>,
    /// Terms and phrases the notes were matched against
    pub query_terms: Vec<String>,
}

impl BatchResult {
    /// Ids of notes with at least one match
    pub fn matched_note_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .match_counts_by_note_id
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(id, _)| id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }
}

/// Applies one query to many notes
pub struct BatchProcessor {
    finder: MatchFinder,
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchProcessor {
    pub fn new() -> Self {
        Self::with_cache_capacity(DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_cache_capacity(capacity: usize) -> Self {
        Self {
            finder: MatchFinder::with_cache_capacity(capacity),
        }
    }

    /// Search `notes` for `query`
    pub fn process(&mut self, notes: &[Note], query: &str, options: &HighlightOptions) -> BatchResult {
        let started = Instant::now();

        let parsed = QueryParser::parse(query);
        let query_terms = parsed.search_terms();
        let title_values = parsed.field_values(TITLE_FIELDS);
        let body_values = parsed.field_values(BODY_FIELDS);

        let body_set = self.finder.compile_tagged(
            tag_query_terms(&query_terms)
                .chain(body_values.iter().map(|v| (v.as_str(), MatchKind::Field))),
            options,
        );
        let title_set = self.finder.compile_tagged(
            tag_query_terms(&query_terms)
                .chain(title_values.iter().map(|v| (v.as_str(), MatchKind::Field))),
            options,
        );

        let mut result = BatchResult {
            snippets_by_note_id: HashMap::with_capacity(notes.len()),
            title_highlights_by_note_id: HashMap::with_capacity(notes.len()),
            match_counts_by_note_id: HashMap::with_capacity(notes.len()),
            query_terms,
        };

        let mut matched_notes = 0usize;
        for note in notes {
            let body_matches = body_set.find(&note.content);
            let title_matches = note
                .display_title()
                .map(|title| title_set.find(title))
                .unwrap_or_default();

            let count = body_matches.len() + title_matches.len();
            if count > 0 {
                matched_notes += 1;
            }

            result.snippets_by_note_id.insert(
                note.id.clone(),
                SnippetBuilder::build(&note.content, &body_matches, options),
            );
            result
                .title_highlights_by_note_id
                .insert(note.id.clone(), title_matches);
            result.match_counts_by_note_id.insert(note.id.clone(), count);
        }

        debug!(
            "Processed {} notes for {:?}: {} matched in {:?}",
            notes.len(),
            query,
            matched_notes,
            started.elapsed()
        );

        result
    }
}
