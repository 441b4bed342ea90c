//! Highlight Renderer
//!
//! Turns a text and its matches into an ordered run of plain and highlighted
//! segments. The segments always concatenate back to the input text. No
//! markup is produced; styling is left to whoever displays the segments.
//!
//! Overlapping matches are unioned into a single highlighted segment that
//! carries every contributing match type, so a segment has a `types` list
//! rather than a single `type`. Matches that merely touch stay separate
//! segments.

use super::matcher::{HighlightMatch, MatchKind};
use crate::utils::{ceil_char_boundary, floor_char_boundary};
use serde::{Deserialize, Serialize};

/// A contiguous run of text, highlighted or plain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub text: String,
    pub is_highlight: bool,
    /// Match types covering this run in first-seen order; empty when plain.
    /// Serialized as `types`: a unioned run can carry more than one.
    #[serde(rename = "types", default, skip_serializing_if = "Vec::is_empty")]
    pub kinds: Vec<MatchKind>,
}

impl Segment {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            is_highlight: false,
            kinds: Vec::new(),
        }
    }

    fn highlighted(text: &str, kinds: Vec<MatchKind>) -> Self {
        Self {
            text: text.to_string(),
            is_highlight: true,
            kinds,
        }
    }

    /// The leading match type, if highlighted
    pub fn kind(&self) -> Option<MatchKind> {
        self.kinds.first().copied()
    }
}

/// Union of overlapping match spans
#[derive(Debug)]
struct Span {
    start: usize,
    end: usize,
    kinds: Vec<MatchKind>,
}

pub struct HighlightRenderer;

impl HighlightRenderer {
    /// Split `text` into segments around `matches`.
    ///
    /// Matches may arrive unsorted, overlapping, or even out of range; they
    /// are sorted, clamped to the text and snapped outward to char
    /// boundaries. Empty spans are dropped.
    pub fn render(text: &str, matches: &[HighlightMatch]) -> Vec<Segment> {
        let spans = Self::merge(text, matches);
        if spans.is_empty() {
            return vec![Segment::plain(text)];
        }

        let mut segments = Vec::with_capacity(spans.len() * 2 + 1);
        let mut cursor = 0usize;

        for span in spans {
            if cursor < span.start {
                segments.push(Segment::plain(&text[cursor..span.start]));
            }
            segments.push(Segment::highlighted(&text[span.start..span.end], span.kinds));
            cursor = span.end;
        }
        if cursor < text.len() {
            segments.push(Segment::plain(&text[cursor..]));
        }

        segments
    }

    fn merge(text: &str, matches: &[HighlightMatch]) -> Vec<Span> {
        let mut ranges: Vec<(usize, usize, MatchKind)> = matches
            .iter()
            .filter(|m| m.start < m.end)
            .filter_map(|m| {
                let start = floor_char_boundary(text, m.start);
                let end = ceil_char_boundary(text, m.end);
                (start < end).then_some((start, end, m.kind))
            })
            .collect();

        ranges.sort_by_key(|r| r.0);

        let mut merged: Vec<Span> = Vec::new();
        for (start, end, kind) in ranges {
            if let Some(last) = merged.last_mut() {
                if start < last.end {
                    // Overlap: extend the open span and record the extra type
                    if end > last.end {
                        last.end = end;
                    }
                    if !last.kinds.contains(&kind) {
                        last.kinds.push(kind);
                    }
                    continue;
                }
            }
            merged.push(Span {
                start,
                end,
                kinds: vec![kind],
            });
        }

        merged
    }
}
