//! Property-based tests using proptest.
//!
//! Invariants that must hold for any text, term list or match list:
//! render round-trips, matching is deterministic, snippets only ever
//! reference their own text, and nothing panics on odd input.

use super::fuzzy::{edit_distance, edit_distance_within, FuzzyCorrector};
use super::highlight::HighlightRenderer;
use super::matcher::{HighlightMatch, MatchFinder, MatchKind};
use super::options::{FuzzyOptions, HighlightOptions};
use super::parser::QueryParser;
use super::snippet::{SnippetBuilder, BOUNDARY_SLACK};
use proptest::prelude::*;

// ============================================================================
// STRATEGIES
// ============================================================================

/// Words mixing ASCII, diacritics, multi-byte scripts and metacharacters
fn word_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[a-zA-Z0-9]{1,8}").unwrap(),
        prop::sample::select(vec![
            "café".to_string(),
            "CAFÉ".to_string(),
            "naïve".to_string(),
            "తెలుగు".to_string(),
            "😊".to_string(),
            "(a+)+b".to_string(),
            "$5.00".to_string(),
            "[x]*".to_string(),
            "a.b".to_string(),
        ]),
    ]
}

fn text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(word_strategy(), 0..60).prop_map(|words| words.join(" "))
}

fn terms_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(word_strategy(), 0..4)
}

fn kind_strategy() -> impl Strategy<Value = MatchKind> {
    prop::sample::select(vec![MatchKind::Primary, MatchKind::Secondary, MatchKind::Field])
}

/// Arbitrary, possibly invalid, match lists: out of range, inverted, empty
fn raw_matches_strategy() -> impl Strategy<Value = Vec<HighlightMatch>> {
    prop::collection::vec((0usize..400, 0usize..400, kind_strategy()), 0..12).prop_map(|raw| {
        raw.into_iter()
            .map(|(start, end, kind)| HighlightMatch {
                start,
                end,
                kind,
                term: String::new(),
            })
            .collect()
    })
}

fn options_strategy() -> impl Strategy<Value = HighlightOptions> {
    (1usize..5, 1usize..200, 0usize..60, any::<bool>()).prop_map(
        |(max_snippets, snippet_length, context_window, case_sensitive)| {
            HighlightOptions::default()
                .with_max_snippets(max_snippets)
                .with_snippet_length(snippet_length)
                .with_context_window(context_window)
                .with_case_sensitive(case_sensitive)
        },
    )
}

fn joined(text: &str, matches: &[HighlightMatch]) -> String {
    HighlightRenderer::render(text, matches)
        .into_iter()
        .map(|s| s.text)
        .collect()
}

// ============================================================================
// MATCHING AND RENDERING
// ============================================================================

proptest! {
    /// Property: segments of found matches concatenate back to the text.
    #[test]
    fn prop_find_then_render_round_trips(text in text_strategy(), terms in terms_strategy()) {
        let matches = MatchFinder::new().find(&text, &terms, &HighlightOptions::default());
        prop_assert_eq!(joined(&text, &matches), text);
    }

    /// Property: matches are sorted, in range and on char boundaries.
    #[test]
    fn prop_matches_are_valid_spans(
        text in text_strategy(),
        terms in terms_strategy(),
        case_sensitive in any::<bool>(),
    ) {
        let options = HighlightOptions::default().with_case_sensitive(case_sensitive);
        let matches = MatchFinder::new().find(&text, &terms, &options);

        for pair in matches.windows(2) {
            prop_assert!(pair[0].start <= pair[1].start);
        }
        for m in &matches {
            prop_assert!(m.start < m.end && m.end <= text.len());
            prop_assert!(text.is_char_boundary(m.start) && text.is_char_boundary(m.end));
            prop_assert_eq!(&text[m.start..m.end], m.term.as_str());
        }
    }

    /// Property: case-sensitive matches are exact occurrences of a term.
    #[test]
    fn prop_case_sensitive_matches_are_exact(text in text_strategy(), terms in terms_strategy()) {
        let options = HighlightOptions::default().with_case_sensitive(true);
        let matches = MatchFinder::new().find(&text, &terms, &options);
        for m in &matches {
            prop_assert!(terms.iter().any(|t| t.trim() == m.term));
        }
    }

    /// Property: the same input always gives the same output, cached or not.
    #[test]
    fn prop_find_is_deterministic(text in text_strategy(), terms in terms_strategy()) {
        let options = HighlightOptions::default();
        let mut cached = MatchFinder::new();
        let first = cached.find(&text, &terms, &options);
        let second = cached.find(&text, &terms, &options);
        let fresh = MatchFinder::new().find(&text, &terms, &options);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&first, &fresh);
    }

    /// Property: any match list, however malformed, renders without panic
    /// and round-trips.
    #[test]
    fn prop_renderer_tolerates_arbitrary_matches(
        text in text_strategy(),
        matches in raw_matches_strategy(),
    ) {
        let segments = HighlightRenderer::render(&text, &matches);
        let rebuilt: String = segments.iter().map(|s| s.text.as_str()).collect();
        prop_assert_eq!(rebuilt, text);

        for segment in &segments {
            prop_assert_eq!(segment.is_highlight, !segment.kinds.is_empty());
            if segment.is_highlight {
                prop_assert!(!segment.text.is_empty());
            }
        }
    }
}

// ============================================================================
// SNIPPETS
// ============================================================================

proptest! {
    /// Property: snippets are excerpts of the text, capped in number and
    /// length, and every highlight points at its own term inside the snippet.
    #[test]
    fn prop_snippet_highlights_stay_in_bounds(
        text in text_strategy(),
        terms in terms_strategy(),
        options in options_strategy(),
    ) {
        let matches = MatchFinder::new().find(&text, &terms, &options);
        let snippets = SnippetBuilder::build(&text, &matches, &options);

        prop_assert!(snippets.len() <= options.max_snippets);
        prop_assert!(!snippets.is_empty());

        for snippet in &snippets {
            prop_assert!(snippet.text.len() <= options.snippet_length + 2 * BOUNDARY_SLACK);
            prop_assert!(text.contains(snippet.text.as_str()));
            if !snippet.has_more_before {
                prop_assert!(text.starts_with(snippet.text.as_str()));
            }
            if !snippet.has_more_after {
                prop_assert!(text.ends_with(snippet.text.as_str()));
            }
            for h in &snippet.highlights {
                prop_assert!(h.start < h.end && h.end <= snippet.text.len());
                prop_assert_eq!(&snippet.text[h.start..h.end], h.term.as_str());
            }
        }
    }

    /// Property: snippet building never panics on malformed matches.
    #[test]
    fn prop_snippets_tolerate_arbitrary_matches(
        text in text_strategy(),
        matches in raw_matches_strategy(),
        options in options_strategy(),
    ) {
        let snippets = SnippetBuilder::build(&text, &matches, &options);
        prop_assert!(snippets.len() <= options.max_snippets);
        for snippet in &snippets {
            prop_assert!(snippet.text.len() <= options.snippet_length + 2 * BOUNDARY_SLACK);
        }
    }
}

// ============================================================================
// PARSER AND FUZZY
// ============================================================================

proptest! {
    /// Property: parsing never panics and never yields empty components.
    #[test]
    fn prop_parser_components_non_empty(query in "[a-zA-Z:\" _()-]{0,40}") {
        let parsed = QueryParser::parse(&query);
        prop_assert!(parsed.terms.iter().all(|t| !t.is_empty()));
        prop_assert!(parsed.phrases.iter().all(|p| !p.is_empty() && p.trim() == p));
        for fs in &parsed.field_searches {
            prop_assert!(!fs.field.is_empty() && !fs.value.is_empty());
        }
    }

    /// Property: edit distance is symmetric and bounded by the longer length.
    #[test]
    fn prop_edit_distance_symmetric(a in "[a-dé]{0,10}", b in "[a-dé]{0,10}") {
        let d = edit_distance(&a, &b);
        prop_assert_eq!(d, edit_distance(&b, &a));
        prop_assert!(d <= a.chars().count().max(b.chars().count()));
        prop_assert_eq!(d == 0, a == b);
    }

    /// Property: the bounded variant agrees with the full distance.
    #[test]
    fn prop_bounded_distance_agrees(a in "[a-d]{0,10}", b in "[a-d]{0,10}", max in 0usize..4) {
        let d = edit_distance(&a, &b);
        let bounded = edit_distance_within(&a, &b, max);
        if d <= max {
            prop_assert_eq!(bounded, Some(d));
        } else {
            prop_assert_eq!(bounded, None);
        }
    }

    /// Property: suggestions respect the confidence floor and the cap.
    #[test]
    fn prop_suggestions_respect_options(
        query in "[a-e]{1,8}",
        history in prop::collection::vec("[a-e]{1,8}", 0..20),
    ) {
        let options = FuzzyOptions::default();
        let corrections = FuzzyCorrector::suggest(&query, &history, &options);

        prop_assert!(corrections.len() <= options.max_suggestions);
        for pair in corrections.windows(2) {
            prop_assert!(pair[0].confidence >= pair[1].confidence);
        }
        for c in &corrections {
            prop_assert!(c.confidence > options.min_confidence && c.confidence < 1.0);
            prop_assert!(c.candidate_query != query);
        }
    }
}
