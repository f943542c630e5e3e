//! Highlight markup for displayed cells.
//!
//! Highlighting works per cell while matching works per row, so a cell of a
//! matching row may come back without any marker: the row can have matched
//! through another cell, or through the numeric strategy whose hit is not a
//! literal occurrence. The formatter never changes the cell text itself.
//!
//! Text queries highlight every variant from [`Query::text_variants`] found
//! in the decimal-normalized cell, each on its own. Identical variants (a
//! query that is already lowercase and has no comma) therefore nest several
//! markers around the same text.
//!
//! Occurrences that touch (`"aaa"` searched for `"a"`) are rendered as one
//! continuous run of markers rather than one run per occurrence.

use regex::{Regex, RegexBuilder};
use std::ops::Range;

use crate::locale::Locale;
use crate::phone::{phone_runs, suffixes_overlap};
use crate::query::{Query, Strategy};

pub const HIGHLIGHT_OPEN: &str = "<span class=\"highlight\">";
pub const HIGHLIGHT_CLOSE: &str = "</span>";

/// Escape text for embedding in HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

struct Variant {
    text: String,
    pattern: Regex,
}

/// Formatter bound to one query.
pub struct HighlightFormatter<'q> {
    query: &'q Query,
    variants: Vec<Variant>,
}

impl<'q> HighlightFormatter<'q> {
    pub fn new(query: &'q Query) -> Self {
        let variants = match query.strategy() {
            Strategy::Phone => Vec::new(),
            Strategy::Text => query
                .text_variants()
                .into_iter()
                .filter(|v| !v.is_empty())
                .filter_map(|text| {
                    RegexBuilder::new(&regex::escape(&text))
                        .case_insensitive(true)
                        .build()
                        .ok()
                        .map(|pattern| Variant { text, pattern })
                })
                .collect(),
        };
        Self { query, variants }
    }

    /// Escaped cell text with highlight markers around matching parts.
    pub fn annotate(&self, cell: &str) -> String {
        if cell.is_empty() {
            return String::new();
        }
        if self.query.is_empty() {
            return escape_html(cell);
        }
        render(cell, &self.ranges(cell))
    }

    /// Byte ranges of `cell` to wrap, one entry per marker. Ranges may repeat.
    pub fn ranges(&self, cell: &str) -> Vec<Range<usize>> {
        match self.query.strategy() {
            Strategy::Phone => {
                let wanted = self.query.phone_suffix();
                phone_runs(cell)
                    .filter(|run| suffixes_overlap(run.suffix(), wanted))
                    .map(|run| run.span)
                    .collect()
            }
            Strategy::Text => {
                let normalized = Locale::invariant().normalize_decimal(cell);
                self.variants
                    .iter()
                    .filter(|v| normalized.contains(v.text.as_str()))
                    .flat_map(|v| v.pattern.find_iter(cell).map(|m| m.range()))
                    .collect()
            }
        }
    }
}

// Markers are emitted as balanced, properly nested spans: wherever the
// number of ranges covering the text changes, the difference is opened or
// closed. Repeated ranges become nested markers. Ranges that touch keep the
// same depth across the seam and so share one run of markers.
fn render(cell: &str, ranges: &[Range<usize>]) -> String {
    if ranges.is_empty() {
        return escape_html(cell);
    }
    let mut events: Vec<(usize, isize)> = ranges
        .iter()
        .flat_map(|r| [(r.start, 1), (r.end, -1)])
        .collect();
    events.sort_unstable_by_key(|&(at, _)| at);

    let mut out = String::with_capacity(cell.len() + ranges.len() * 32);
    let mut pending = events.iter().peekable();
    let mut depth = 0isize;
    let mut open = 0usize;
    let mut pos = 0usize;
    while pos < cell.len() {
        while let Some(&&(at, delta)) = pending.peek()
            && at <= pos
        {
            depth += delta;
            pending.next();
        }
        let next = pending
            .peek()
            .map_or(cell.len(), |&&(at, _)| at.min(cell.len()));
        let wanted = depth.max(0) as usize;
        for _ in wanted..open {
            out.push_str(HIGHLIGHT_CLOSE);
        }
        for _ in open..wanted {
            out.push_str(HIGHLIGHT_OPEN);
        }
        open = wanted;
        out.push_str(&escape_html(&cell[pos..next]));
        pos = next;
    }
    for _ in 0..open {
        out.push_str(HIGHLIGHT_CLOSE);
    }
    out
}
