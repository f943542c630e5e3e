use crate::dataset::Dataset;
use crate::search::MatchedRow;
use crate::view::ViewConfig;

/// Name of the sheet written by an export.
pub const EXPORT_SHEET_NAME: &str = "Результаты поиска";

/// Default file name offered for an export.
pub const DEFAULT_EXPORT_FILE: &str = "результаты_поиска.xlsx";

/// Rows handed to the writer: visible header labels, then every current
/// result (not only the displayed ones) restricted to visible columns.
pub fn export_rows(dataset: &Dataset, results: &[MatchedRow], view: &ViewConfig) -> Vec<Vec<String>> {
    let columns = view.visible_columns(dataset.width());
    let mut out = Vec::with_capacity(results.len() + 1);
    out.push(
        columns
            .iter()
            .map(|&c| dataset.headers()[c].text.clone())
            .collect(),
    );
    out.extend(results.iter().filter_map(|m| {
        let row = dataset.row(m.original_index)?;
        Some(columns.iter().map(|&c| row[c].clone()).collect())
    }));
    out
}
