use crate::config::SessionConfig;
use crate::dataset::Dataset;
use crate::error::SessionError;
use crate::export::{EXPORT_SHEET_NAME, export_rows};
use crate::search::{MatchedRow, SearchProgress, Searcher, describe_hit};
use crate::traits::{SaveDestination, SpreadsheetReader, SpreadsheetWriter};
use crate::view::{ResultsView, ViewConfig};
use rowsift_common::RawCell;
use rowsift_match::Query;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn};

/// Counts reported by a finished search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSummary {
    pub total: usize,
    pub shown: usize,
}

/// State of one interactive search over a loaded dataset.
///
/// The dataset is immutable once loaded. Deleting a result row records its
/// original index; deleted rows stay out of every later search until a new
/// dataset is loaded.
pub struct Session {
    config: SessionConfig,
    dataset: Option<Arc<Dataset>>,
    deleted: BTreeSet<usize>,
    query: Option<Query>,
    results: Vec<MatchedRow>,
    view: ViewConfig,
    searcher: Arc<Searcher>,
    debug_log: Vec<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let searcher = Arc::new(Searcher::new(config.progress_interval));
        Self {
            config,
            dataset: None,
            deleted: BTreeSet::new(),
            query: None,
            results: Vec::new(),
            view: ViewConfig::default(),
            searcher,
            debug_log: Vec::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Shared handle to the scanner, whose guard rejects overlapping runs.
    pub fn searcher(&self) -> Arc<Searcher> {
        Arc::clone(&self.searcher)
    }

    fn reset(&mut self) {
        self.dataset = None;
        self.deleted.clear();
        self.query = None;
        self.results.clear();
        self.view = ViewConfig::default();
        self.debug_log.clear();
    }

    /// Replace the dataset with one built from `raw`.
    pub fn load_rows(&mut self, raw: Vec<Vec<RawCell>>) -> &Dataset {
        self.reset();
        let dataset = Arc::new(Dataset::from_raw_rows(raw));
        info!(rows = dataset.len(), columns = dataset.width(), "dataset loaded");
        &**self.dataset.insert(dataset)
    }

    /// Replace the dataset with the first sheet of `reader`. On failure the
    /// session is left without any dataset.
    pub fn load<R: SpreadsheetReader>(&mut self, reader: &mut R) -> Result<&Dataset, SessionError> {
        let _span = info_span!("load_dataset").entered();
        match reader.read_first_sheet() {
            Ok(raw) => Ok(self.load_rows(raw)),
            Err(e) => {
                warn!(error = %e, "failed to read sheet");
                self.reset();
                Err(SessionError::Load(Box::new(e)))
            }
        }
    }

    /// Load the file at `path`, picking the reader from its extension.
    pub fn load_path(&mut self, path: &Path) -> Result<&Dataset, SessionError> {
        let _span = info_span!("load_dataset", path = %path.display()).entered();
        match crate::backends::read_first_sheet(path) {
            Ok(raw) => Ok(self.load_rows(raw)),
            Err(e) => {
                warn!(error = %e, "failed to read file");
                self.reset();
                Err(SessionError::Load(Box::new(e)))
            }
        }
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_deref()
    }

    /// Run a search for `text` (trimmed) and replace the current results.
    ///
    /// Validation failures leave the previous results untouched.
    pub fn search(
        &mut self,
        text: &str,
        progress: &mut dyn SearchProgress,
    ) -> Result<SearchSummary, SessionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyQuery);
        }
        let dataset = match &self.dataset {
            Some(ds) if !ds.is_empty() => Arc::clone(ds),
            _ => return Err(SessionError::NoData),
        };

        let query = Query::new(text);
        let _span = info_span!("search", query = %text, strategy = ?query.strategy()).entered();
        let results = self.searcher.run(&dataset, &self.deleted, &query, progress)?;

        self.debug_log.clear();
        if self.config.debug {
            for m in &results {
                if let Some(row) = dataset.row(m.original_index) {
                    let line = describe_hit(row, &m.hit, &query);
                    debug!(row = m.original_index, column = m.hit.column, "{line}");
                    self.debug_log.push(line);
                }
            }
        }
        info!(matches = results.len(), "search finished");

        self.query = Some(query);
        self.results = results;
        Ok(SearchSummary {
            total: self.results.len(),
            shown: self.displayed_len(),
        })
    }

    pub fn query(&self) -> Option<&Query> {
        self.query.as_ref()
    }

    /// Current results in row order, including those past the display limit.
    pub fn results(&self) -> &[MatchedRow] {
        &self.results
    }

    pub fn displayed_len(&self) -> usize {
        self.results.len().min(self.config.display_limit)
    }

    /// Trace lines of the last search; empty unless debug mode is on.
    pub fn debug_log(&self) -> &[String] {
        &self.debug_log
    }

    /// Delete the displayed row at `display_index`: its original index is
    /// excluded from future searches and it leaves the current results.
    /// Returns the original index, or `None` for an index outside the
    /// displayed rows.
    pub fn delete_row(&mut self, display_index: usize) -> Option<usize> {
        if display_index >= self.displayed_len() {
            return None;
        }
        let removed = self.results.remove(display_index);
        self.deleted.insert(removed.original_index);
        debug!(display_index, original_index = removed.original_index, "row deleted");
        Some(removed.original_index)
    }

    pub fn deleted_rows(&self) -> &BTreeSet<usize> {
        &self.deleted
    }

    pub fn view_config(&self) -> &ViewConfig {
        &self.view
    }

    pub fn hide_column(&mut self, col: usize) -> bool {
        self.view.hide_column(col)
    }

    pub fn reset_hidden_columns(&mut self) {
        self.view.reset_hidden_columns();
    }

    pub fn set_column_width(&mut self, col: usize, width: u32) -> u32 {
        self.view.set_column_width(col, width)
    }

    /// Snapshot of what to display for the current results.
    pub fn view(&self) -> ResultsView {
        match (&self.dataset, &self.query) {
            (Some(ds), Some(query)) => ResultsView::build(
                ds,
                &self.results,
                query,
                &self.view,
                self.config.display_limit,
            ),
            _ => ResultsView::default(),
        }
    }

    /// Header plus result rows as they would be exported.
    pub fn export_rows(&self) -> Result<Vec<Vec<String>>, SessionError> {
        match &self.dataset {
            Some(ds) if !self.results.is_empty() => Ok(export_rows(ds, &self.results, &self.view)),
            _ => Err(SessionError::NothingToExport),
        }
    }

    /// Write the current results through `writer`. Results are kept on
    /// failure so the export can be retried.
    pub fn export<W: SpreadsheetWriter>(
        &self,
        writer: &mut W,
        dest: SaveDestination<'_>,
    ) -> Result<Option<Vec<u8>>, SessionError> {
        let rows = self.export_rows()?;
        let out = writer
            .write_rows(EXPORT_SHEET_NAME, &rows)
            .and_then(|_| writer.save_to(dest))
            .map_err(|e| {
                warn!(error = %e, "export failed");
                SessionError::Export(Box::new(e))
            })?;
        info!(rows = rows.len() - 1, "results exported");
        Ok(out)
    }

    /// Export to `path`: `.csv` writes CSV, anything else writes xlsx.
    #[cfg(all(feature = "csv", feature = "umya"))]
    pub fn export_to_path(&self, path: &Path) -> Result<(), SessionError> {
        use crate::backends::{CsvAdapter, FileFormat, UmyaAdapter};
        let dest = SaveDestination::Path(path);
        match FileFormat::from_path(path) {
            FileFormat::Csv => self.export(&mut CsvAdapter::new(), dest)?,
            FileFormat::Workbook => self.export(&mut UmyaAdapter::new(), dest)?,
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::NoProgress;

    fn text(s: &str) -> RawCell {
        RawCell::Text(s.to_string())
    }

    fn session_with(rows: &[[&str; 2]]) -> Session {
        let mut raw = vec![vec![text("A"), text("B")]];
        raw.extend(rows.iter().map(|r| r.iter().map(|s| text(s)).collect()));
        let mut session = Session::default();
        session.load_rows(raw);
        session
    }

    #[test]
    fn empty_query_and_missing_data_are_rejected() {
        let mut session = Session::default();
        assert!(matches!(
            session.search("  ", &mut NoProgress),
            Err(SessionError::EmptyQuery)
        ));
        assert!(matches!(
            session.search("x", &mut NoProgress),
            Err(SessionError::NoData)
        ));
        session.load_rows(vec![vec![text("header only")]]);
        assert!(matches!(
            session.search("x", &mut NoProgress),
            Err(SessionError::NoData)
        ));
    }

    #[test]
    fn deleted_row_stays_out_of_later_searches() {
        let mut session = session_with(&[["alpha", "1"], ["alpha", "2"], ["beta", "3"]]);
        let summary = session.search("alpha", &mut NoProgress).unwrap();
        assert_eq!(summary.total, 2);

        assert_eq!(session.delete_row(0), Some(0));
        let left: Vec<_> = session.results().iter().map(|m| m.original_index).collect();
        assert_eq!(left, vec![1]);

        session.search("alpha", &mut NoProgress).unwrap();
        let again: Vec<_> = session.results().iter().map(|m| m.original_index).collect();
        assert_eq!(again, vec![1]);
        assert!(session.deleted_rows().contains(&0));
    }

    #[test]
    fn delete_outside_displayed_rows_is_ignored() {
        let mut session = session_with(&[["alpha", "1"]]);
        session.search("alpha", &mut NoProgress).unwrap();
        assert_eq!(session.delete_row(5), None);
        assert!(session.deleted_rows().is_empty());
    }

    #[test]
    fn display_is_capped_but_total_is_not() {
        let config = SessionConfig {
            display_limit: 2,
            ..SessionConfig::default()
        };
        let mut session = Session::new(config);
        let mut raw = vec![vec![text("h")]];
        raw.extend((0..5).map(|i| vec![text(&format!("item {i}"))]));
        session.load_rows(raw);

        let summary = session.search("item", &mut NoProgress).unwrap();
        assert_eq!(summary, SearchSummary { total: 5, shown: 2 });
        let view = session.view();
        assert_eq!(view.rows.len(), 2);
        assert_eq!(
            view.truncation_notice().as_deref(),
            Some("Показано 2 из 5 результатов")
        );
        // Only displayed rows can be deleted.
        assert_eq!(session.delete_row(2), None);
        // Export is not capped.
        assert_eq!(session.export_rows().unwrap().len(), 6);
    }

    #[test]
    fn loading_resets_session_state() {
        let mut session = session_with(&[["alpha", "1"], ["beta", "2"]]);
        session.search("alpha", &mut NoProgress).unwrap();
        session.delete_row(0);
        session.hide_column(1);

        session.load_rows(vec![vec![text("h")], vec![text("alpha")]]);
        assert!(session.deleted_rows().is_empty());
        assert!(session.results().is_empty());
        assert!(session.view_config().hidden_columns().is_empty());
        assert!(session.query().is_none());
    }

    #[test]
    fn debug_mode_records_one_line_per_match() {
        let mut session = Session::new(SessionConfig {
            debug: true,
            ..SessionConfig::default()
        });
        session.load_rows(vec![
            vec![text("h")],
            vec![text("ООО Ромашка")],
            vec![text("3.0005")],
        ]);
        session.search("3", &mut NoProgress).unwrap();
        assert_eq!(session.debug_log().len(), 1);
        assert!(session.debug_log()[0].starts_with("Найдено числовое совпадение"));

        session.search("ромашка", &mut NoProgress).unwrap();
        assert_eq!(
            session.debug_log(),
            ["Найдено текстовое совпадение: \"ООО Ромашка\" содержит \"ромашка\"".to_string()]
        );
    }

    #[test]
    fn nothing_to_export_without_results() {
        let mut session = session_with(&[["alpha", "1"]]);
        assert!(matches!(
            session.export_rows(),
            Err(SessionError::NothingToExport)
        ));
        session.search("zzz", &mut NoProgress).unwrap();
        assert!(matches!(
            session.export_rows(),
            Err(SessionError::NothingToExport)
        ));
    }
}
