//! Display model of a result set.
//!
//! Hidden columns and column widths live in [`ViewConfig`], which the
//! session owns and passes in explicitly. [`ResultsView`] is a snapshot: it
//! is rebuilt after every search, deletion or view change.

use crate::dataset::Dataset;
use crate::search::MatchedRow;
use rowsift_match::{HighlightFormatter, Locale, Query, escape_html};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

/// Narrowest width a column can be resized to, in pixels.
pub const MIN_COLUMN_WIDTH: u32 = 30;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    hidden_columns: BTreeSet<usize>,
    column_widths: BTreeMap<usize, u32>,
}

impl ViewConfig {
    /// Returns false if the column was already hidden.
    pub fn hide_column(&mut self, col: usize) -> bool {
        self.hidden_columns.insert(col)
    }

    pub fn reset_hidden_columns(&mut self) {
        self.hidden_columns.clear();
    }

    pub fn is_visible(&self, col: usize) -> bool {
        !self.hidden_columns.contains(&col)
    }

    pub fn hidden_columns(&self) -> &BTreeSet<usize> {
        &self.hidden_columns
    }

    /// Record a width for `col`, clamped to [`MIN_COLUMN_WIDTH`]. Returns
    /// the stored width.
    pub fn set_column_width(&mut self, col: usize, width: u32) -> u32 {
        let width = width.max(MIN_COLUMN_WIDTH);
        self.column_widths.insert(col, width);
        width
    }

    pub fn column_width(&self, col: usize) -> Option<u32> {
        self.column_widths.get(&col).copied()
    }

    /// Indices of the visible columns among the first `width`.
    pub fn visible_columns(&self, width: usize) -> Vec<usize> {
        (0..width).filter(|c| self.is_visible(*c)).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HeaderView {
    pub column: usize,
    pub label: String,
    pub corrected: bool,
    pub width: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CellView {
    pub column: usize,
    pub text: String,
    /// Escaped text with highlight markers.
    pub markup: String,
    pub numeric: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RowView {
    /// Position in the displayed list; what row deletion addresses.
    pub display_index: usize,
    pub original_index: usize,
    pub cells: Vec<CellView>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ResultsView {
    pub headers: Vec<HeaderView>,
    pub rows: Vec<RowView>,
    /// Number of current results, including those past the display limit.
    pub total: usize,
    pub shown: usize,
}

impl ResultsView {
    pub fn build(
        dataset: &Dataset,
        results: &[MatchedRow],
        query: &Query,
        config: &ViewConfig,
        limit: usize,
    ) -> Self {
        let columns = config.visible_columns(dataset.width());
        let headers = columns
            .iter()
            .map(|&col| {
                let label = &dataset.headers()[col];
                HeaderView {
                    column: col,
                    label: label.text.clone(),
                    corrected: label.corrected,
                    width: config.column_width(col),
                }
            })
            .collect();

        let formatter = HighlightFormatter::new(query);
        let locale = Locale::invariant();
        let rows: Vec<RowView> = results
            .iter()
            .take(limit)
            .enumerate()
            .filter_map(|(display_index, m)| {
                let row = dataset.row(m.original_index)?;
                let cells = columns
                    .iter()
                    .map(|&col| {
                        let text = row.get(col).cloned().unwrap_or_default();
                        CellView {
                            column: col,
                            markup: formatter.annotate(&text),
                            numeric: locale.is_decimal(&locale.normalize_decimal(&text)),
                            text,
                        }
                    })
                    .collect();
                Some(RowView {
                    display_index,
                    original_index: m.original_index,
                    cells,
                })
            })
            .collect();

        Self {
            headers,
            shown: rows.len(),
            rows,
            total: results.len(),
        }
    }

    pub fn is_truncated(&self) -> bool {
        self.total > self.shown
    }

    pub fn status_line(&self) -> String {
        format!("Найдено совпадений: {}", self.total)
    }

    pub fn truncation_notice(&self) -> Option<String> {
        self.is_truncated()
            .then(|| format!("Показано {} из {} результатов", self.shown, self.total))
    }

    /// Render as an HTML table. An empty result renders the no-match notice.
    pub fn to_html(&self) -> String {
        if self.total == 0 {
            return "<div class=\"error\">Совпадений не найдено</div>".to_string();
        }
        let mut out = String::new();
        out.push_str("<table class=\"results-table\">\n<thead><tr>");
        for h in &self.headers {
            let class = if h.corrected { " class=\"corrected-header\"" } else { "" };
            let _ = write!(out, "<th data-col=\"{}\"{}>", h.column, width_style(h.width));
            let _ = write!(out, "<span{class}>{}</span></th>", escape_html(&h.label));
        }
        out.push_str("</tr></thead>\n<tbody>\n");
        for row in &self.rows {
            let _ = write!(out, "<tr data-row=\"{}\">", row.display_index);
            for (cell, h) in row.cells.iter().zip(&self.headers) {
                let class = if cell.numeric { "number-cell" } else { "" };
                let _ = write!(
                    out,
                    "<td{} class=\"{class}\">{}</td>",
                    width_style(h.width),
                    cell.markup
                );
            }
            out.push_str("</tr>\n");
        }
        out.push_str("</tbody>\n</table>\n");
        if let Some(notice) = self.truncation_notice() {
            let _ = writeln!(out, "<p class=\"success\">{notice}</p>");
        }
        out
    }
}

fn width_style(width: Option<u32>) -> String {
    width
        .map(|w| format!(" style=\"width: {w}px;\""))
        .unwrap_or_default()
}
