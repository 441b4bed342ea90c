//! Snippet Builder
//!
//! Groups nearby matches and cuts a bounded window of context around each
//! group. Windows snap to word boundaries and avoid cutting through a
//! highlighted span, overshooting the length budget by at most
//! [`BOUNDARY_SLACK`] bytes at each edge to do so. A single match longer
//! than that is shown clipped to the window.

use super::matcher::HighlightMatch;
use super::options::HighlightOptions;
use crate::utils::{ceil_char_boundary, floor_char_boundary};
use serde::{Deserialize, Serialize};
use std::iter;
use unicode_segmentation::UnicodeSegmentation;

/// How far (in bytes) a window edge may move to land on a word boundary
/// or to take in a whole highlight
pub const BOUNDARY_SLACK: usize = 10;

/// A bounded excerpt of a text with its highlights in excerpt-local offsets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub text: String,
    pub highlights: Vec<HighlightMatch>,
    /// The excerpt does not start at the beginning of the source
    pub has_more_before: bool,
    /// The excerpt does not reach the end of the source
    pub has_more_after: bool,
}

/// Run of matches sharing one snippet
#[derive(Debug, Clone, Copy)]
struct Group {
    start: usize,
    end: usize,
}

pub struct SnippetBuilder;

impl SnippetBuilder {
    /// Build up to `max_snippets` snippets for `matches` in `text`.
    ///
    /// Without matches the result is a single leading excerpt. Groups past
    /// `max_snippets` are dropped.
    pub fn build(text: &str, matches: &[HighlightMatch], options: &HighlightOptions) -> Vec<Snippet> {
        let budget = options.snippet_length.max(1);

        let mut sorted: Vec<&HighlightMatch> =
            matches.iter().filter(|m| is_valid_match(text, m)).collect();
        sorted.sort_by_key(|m| m.start);

        if sorted.is_empty() {
            return if options.max_snippets == 0 {
                Vec::new()
            } else {
                vec![Self::leading(text, budget)]
            };
        }

        Self::group(&sorted, options.context_window)
            .into_iter()
            .take(options.max_snippets)
            .map(|group| Self::window(text, &sorted, group, budget, options.context_window))
            .collect()
    }

    /// Opening excerpt of `text` for texts without matches
    fn leading(text: &str, budget: usize) -> Snippet {
        if text.len() <= budget {
            return Snippet {
                text: text.to_string(),
                highlights: Vec::new(),
                has_more_before: false,
                has_more_after: false,
            };
        }

        let cut = floor_char_boundary(text, budget);
        // Only snap backwards so the excerpt never exceeds the budget
        let end = word_boundaries(text, cut.saturating_sub(BOUNDARY_SLACK), cut)
            .into_iter()
            .filter(|&b| b > 0)
            .max()
            .unwrap_or(cut);

        Snippet {
            text: text[..end].to_string(),
            highlights: Vec::new(),
            has_more_before: false,
            has_more_after: end < text.len(),
        }
    }

    /// Sweep matches in order, folding each into the open group when it
    /// starts within `context_window` bytes of the group's end
    fn group(sorted: &[&HighlightMatch], context_window: usize) -> Vec<Group> {
        let mut groups: Vec<Group> = Vec::new();

        for m in sorted {
            match groups.last_mut() {
                Some(open) if m.start <= open.end.saturating_add(context_window) => {
                    open.end = open.end.max(m.end);
                }
                _ => groups.push(Group {
                    start: m.start,
                    end: m.end,
                }),
            }
        }

        groups
    }

    fn window(
        text: &str,
        sorted: &[&HighlightMatch],
        group: Group,
        budget: usize,
        context_window: usize,
    ) -> Snippet {
        let len = text.len();
        let span = group.end - group.start;

        let (start, end) = if span >= budget {
            (group.start, floor_char_boundary(text, group.start + budget))
        } else {
            let room = budget - span;
            // A short lead-in, then the bulk of the room after the span,
            // then whatever is left over goes back before it
            let mut before = context_window.min(room / 2).min(group.start);
            let after = (room - before).min(len - group.end);
            before += (room - before - after).min(group.start - before);

            let start = ceil_char_boundary(text, group.start - before);
            let end = floor_char_boundary(text, group.end + after);
            (
                snap_start(text, start, group.start),
                snap_end(text, end, group.end),
            )
        };

        let (start, end) = keep_highlights_whole(sorted, start, end, max_window_len(budget));

        // A match that could not be kept whole is shown clipped to the window
        let highlights = sorted
            .iter()
            .filter_map(|m| m.clipped_to(text, start, end))
            .collect();

        Snippet {
            text: text[start..end].to_string(),
            highlights,
            has_more_before: start > 0,
            has_more_after: end < len,
        }
    }
}

fn is_valid_match(text: &str, m: &HighlightMatch) -> bool {
    m.start < m.end
        && m.end <= text.len()
        && text.is_char_boundary(m.start)
        && text.is_char_boundary(m.end)
}

/// UAX#29 word boundaries within `[lo, hi]`. Boundaries are computed over a
/// slightly wider region so the edges of the range see their neighbours.
fn word_boundaries(text: &str, lo: usize, hi: usize) -> Vec<usize> {
    let region_lo = floor_char_boundary(text, lo.saturating_sub(BOUNDARY_SLACK));
    let region_hi = ceil_char_boundary(text, hi.saturating_add(BOUNDARY_SLACK));

    text[region_lo..region_hi]
        .split_word_bound_indices()
        .map(|(i, _)| region_lo + i)
        .chain(iter::once(region_hi))
        .filter(|&b| b >= lo && b <= hi)
        // Region edges are only real boundaries at the ends of the text
        .filter(|&b| (b != region_lo || b == 0) && (b != region_hi || b == text.len()))
        .collect()
}

/// Move a window start onto the nearest word boundary, never past `limit`
fn snap_start(text: &str, start: usize, limit: usize) -> usize {
    if start == 0 {
        return start;
    }
    let candidates = word_boundaries(
        text,
        start.saturating_sub(BOUNDARY_SLACK),
        (start + BOUNDARY_SLACK).min(limit),
    );
    // Ties go to the later boundary, which shortens the window
    candidates
        .into_iter()
        .min_by_key(|&b| (b.abs_diff(start), usize::MAX - b))
        .unwrap_or(start)
}

/// Move a window end onto the nearest word boundary, never before `limit`
fn snap_end(text: &str, end: usize, limit: usize) -> usize {
    if end == text.len() {
        return end;
    }
    let candidates = word_boundaries(
        text,
        end.saturating_sub(BOUNDARY_SLACK).max(limit),
        end + BOUNDARY_SLACK,
    );
    // Ties go to the earlier boundary, which shortens the window
    candidates
        .into_iter()
        .min_by_key(|&b| (b.abs_diff(end), b))
        .unwrap_or(end)
}

/// Longest window a match snippet may have: the budget plus one slack for
/// each edge snapped outward
fn max_window_len(budget: usize) -> usize {
    budget + 2 * BOUNDARY_SLACK
}

/// Widen or narrow the window so no highlight is cut in half, without
/// growing it past `max_len`. A match that can neither be taken in nor cut
/// out is left straddling the edge.
fn keep_highlights_whole(
    sorted: &[&HighlightMatch],
    mut start: usize,
    mut end: usize,
    max_len: usize,
) -> (usize, usize) {
    for m in sorted {
        if m.start < start && start < m.end {
            start = if start - m.start <= BOUNDARY_SLACK && end - m.start <= max_len {
                m.start
            } else {
                m.end
            };
        }
    }

    // Extending the end can land inside a later overlapping match, so
    // repeat until stable; each pass moves `end` monotonically per match.
    for _ in 0..=sorted.len() {
        let mut changed = false;
        for m in sorted {
            if m.start < end && end < m.end {
                if m.end - end <= BOUNDARY_SLACK && m.end.saturating_sub(start) <= max_len {
                    end = m.end;
                    changed = true;
                } else if m.start > start {
                    end = m.start;
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }

    (start, end.max(start))
}
