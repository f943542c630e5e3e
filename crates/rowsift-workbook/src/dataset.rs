use rowsift_common::RawCell;
use rowsift_match::normalize;
use serde::Serialize;

/// Fixed labels forced onto the first eight columns, whatever the file
/// says. Columns past the end keep the placeholder.
pub const CANONICAL_HEADERS: [&str; 8] = [
    "счет",
    "сумма",
    "дата запуска",
    "поставщик",
    "-",
    "-",
    "дата оплат",
    "заказчик",
];

pub const PLACEHOLDER_HEADER: &str = "-";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HeaderLabel {
    pub text: String,
    /// Set when the label was replaced by a canonical one.
    pub corrected: bool,
}

impl HeaderLabel {
    pub fn for_column(col: usize) -> Self {
        match CANONICAL_HEADERS.get(col) {
            Some(text) => Self {
                text: (*text).to_string(),
                corrected: true,
            },
            None => Self {
                text: PLACEHOLDER_HEADER.to_string(),
                corrected: false,
            },
        }
    }
}

/// A loaded table: header labels plus data rows of canonical strings.
///
/// Every row has exactly `width()` cells. Rows are addressed by their
/// position in `rows`, which is what the session calls the original index.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    headers: Vec<HeaderLabel>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Build from raw sheet rows: drop rows with no non-blank cell, take the
    /// first survivor as the header row and normalize the rest.
    pub fn from_raw_rows(raw: Vec<Vec<RawCell>>) -> Self {
        let kept: Vec<Vec<RawCell>> = raw
            .into_iter()
            .filter(|row| row.iter().any(|c| !c.is_blank()))
            .collect();
        let width = kept.iter().map(Vec::len).max().unwrap_or(0);
        if kept.is_empty() {
            return Self::default();
        }

        let headers = (0..width).map(HeaderLabel::for_column).collect();
        let rows = kept
            .iter()
            .skip(1)
            .map(|row| {
                (0..width)
                    .map(|col| row.get(col).map(|c| normalize(c, col)).unwrap_or_default())
                    .collect()
            })
            .collect();
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[HeaderLabel] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
