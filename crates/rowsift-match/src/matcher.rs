//! Row matching.
//!
//! A row matches when any of its non-empty cells matches. Each cell is tried
//! with the numeric strategy first; then, depending on the query's
//! [`Strategy`], either phone suffix matching or substring matching.

use crate::locale::Locale;
use crate::phone::{phone_runs, suffixes_overlap};
use crate::query::{Query, Strategy};

/// Numbers closer than this compare equal.
pub const NUMERIC_TOLERANCE: f64 = 0.001;

/// How a cell matched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchKind {
    Numeric { difference: f64 },
    Phone,
    Substring,
}

/// The first matching cell of a row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchHit {
    pub column: usize,
    pub kind: MatchKind,
}

/// Matcher bound to one query; the derived query forms are computed once and
/// reused for every row of a scan.
#[derive(Debug, Clone)]
pub struct RowMatcher<'q> {
    query: &'q Query,
    locale: Locale,
    query_number: Option<f64>,
    raw_folded: String,
    normalized_folded: String,
}

impl<'q> RowMatcher<'q> {
    pub fn new(query: &'q Query) -> Self {
        let locale = Locale::invariant();
        Self {
            query,
            locale,
            query_number: locale.parse_decimal(query.normalized()),
            raw_folded: locale.fold_case(query.raw()),
            normalized_folded: locale.fold_case(query.normalized()),
        }
    }

    pub fn query(&self) -> &Query {
        self.query
    }

    pub fn matches<S: AsRef<str>>(&self, row: &[S]) -> bool {
        self.explain(row).is_some()
    }

    /// First hit of the row, scanning cells left to right.
    pub fn explain<S: AsRef<str>>(&self, row: &[S]) -> Option<MatchHit> {
        row.iter().enumerate().find_map(|(column, cell)| {
            self.match_cell(cell.as_ref())
                .map(|kind| MatchHit { column, kind })
        })
    }

    /// Match a single canonical cell. Empty cells never match.
    pub fn match_cell(&self, cell: &str) -> Option<MatchKind> {
        if cell.is_empty() {
            return None;
        }
        let normalized = self.locale.normalize_decimal(cell);

        if let (Some(q), Some(c)) = (self.query_number, self.locale.parse_decimal(&normalized)) {
            let difference = (c - q).abs();
            if difference < NUMERIC_TOLERANCE {
                return Some(MatchKind::Numeric { difference });
            }
        }

        match self.query.strategy() {
            Strategy::Phone => self.match_phone(cell).then_some(MatchKind::Phone),
            Strategy::Text => self
                .match_substring(cell, &normalized)
                .then_some(MatchKind::Substring),
        }
    }

    fn match_phone(&self, cell: &str) -> bool {
        let wanted = self.query.phone_suffix();
        phone_runs(cell).any(|run| suffixes_overlap(run.suffix(), wanted))
    }

    fn match_substring(&self, cell: &str, normalized: &str) -> bool {
        let cell_folded = self.locale.fold_case(cell);
        let normalized_folded = self.locale.fold_case(normalized);
        let needles = [self.raw_folded.as_str(), self.normalized_folded.as_str()];

        [cell_folded.as_str(), normalized_folded.as_str()]
            .iter()
            .any(|hay| needles.iter().any(|needle| hay.contains(needle)))
            || cell.contains(self.query.raw())
    }
}

/// One-shot convenience over [`RowMatcher`].
pub fn matches<S: AsRef<str>>(row: &[S], query: &Query) -> bool {
    RowMatcher::new(query).matches(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(cell: &str, query: &str) -> Option<MatchKind> {
        RowMatcher::new(&Query::new(query)).match_cell(cell)
    }

    #[test]
    fn numeric_tolerance() {
        assert!(matches!(
            hit("3.0005", "3"),
            Some(MatchKind::Numeric { .. })
        ));
        assert!(matches!(hit("100.50", "100,5"), Some(MatchKind::Numeric { .. })));
        assert_eq!(hit("3.002", "3.0005"), None);
        assert_eq!(hit("7", "8"), None);
    }

    #[test]
    fn tolerance_is_strictly_below_one_thousandth() {
        // 3.001 - 3.0005 = 0.0005, inside the window.
        assert!(matches!(
            hit("3.001", "3.0005"),
            Some(MatchKind::Numeric { .. })
        ));
        assert!(matches!(hit("3.0005", "3.001"), Some(MatchKind::Numeric { .. })));
        assert_eq!(hit("3.0017", "3.0005"), None);
    }

    #[test]
    fn numeric_runs_for_phone_queries_too() {
        let q = Query::new("1234567.0");
        assert!(q.is_phone());
        assert!(matches!(
            RowMatcher::new(&q).match_cell("1234567"),
            Some(MatchKind::Numeric { .. })
        ));
    }

    #[test]
    fn phone_suffixes() {
        assert_eq!(hit("+7 (495) 123-45-67", "84951234567"), Some(MatchKind::Phone));
        assert_eq!(hit("+7 (495) 123-45-67", "1234567"), Some(MatchKind::Phone));
        assert_eq!(hit("тел 123-45-67", "+7 495 123 45 67"), Some(MatchKind::Phone));
        assert_eq!(hit("+7 (495) 765-43-21", "84951234567"), None);
    }

    #[test]
    fn phone_queries_skip_substring_matching() {
        // Seven digits make this a phone query; the cell holds the literal
        // text but no run of seven digits.
        let q = Query::new("д.1, кв.234567");
        assert!(q.is_phone());
        assert_eq!(RowMatcher::new(&q).match_cell("д.1, кв.234567"), None);
    }

    #[test]
    fn substring_is_case_and_decimal_insensitive() {
        assert_eq!(hit("ООО Ромашка", "ромаш"), Some(MatchKind::Substring));
        assert_eq!(hit("12,5 кг", "12.5"), Some(MatchKind::Substring));
        assert_eq!(hit("12.5 кг", "12,5"), Some(MatchKind::Substring));
        assert_eq!(hit("ИП 2024", "ип"), Some(MatchKind::Substring));
        assert_eq!(hit("ООО Ромашка", "лютик"), None);
    }

    #[test]
    fn explain_reports_first_matching_column() {
        let q = Query::new("ромашка");
        let m = RowMatcher::new(&q);
        let row = ["", "ООО Лютик", "ООО Ромашка", "Ромашка-2"];
        assert_eq!(
            m.explain(&row),
            Some(MatchHit {
                column: 2,
                kind: MatchKind::Substring
            })
        );
    }

    #[test]
    fn all_empty_row_never_matches() {
        assert!(!matches(&["", "", ""], &Query::new("")));
        assert!(!matches::<&str>(&[], &Query::new("x")));
    }
}
