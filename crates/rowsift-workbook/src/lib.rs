//! Loading, searching and exporting spreadsheet data.
//!
//! A [`Session`] owns one immutable [`Dataset`] built from the first sheet of
//! a file, runs searches over it, tracks deleted rows and the view
//! configuration, and writes the current results back out through a
//! [`SpreadsheetWriter`].

pub mod backends;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod search;
pub mod session;
pub mod traits;
pub mod view;

pub use config::SessionConfig;
pub use dataset::{CANONICAL_HEADERS, Dataset, HeaderLabel};
pub use error::{IoError, SessionError};
pub use export::{DEFAULT_EXPORT_FILE, EXPORT_SHEET_NAME, export_rows};
pub use search::{MatchedRow, NoProgress, SearchProgress, Searcher};
pub use session::{SearchSummary, Session};
pub use traits::{SaveDestination, SpreadsheetReader, SpreadsheetWriter};
pub use view::{CellView, HeaderView, MIN_COLUMN_WIDTH, ResultsView, RowView, ViewConfig};

#[cfg(feature = "calamine")]
pub use backends::CalamineAdapter;
#[cfg(feature = "csv")]
pub use backends::{CsvAdapter, CsvReadOptions, CsvWriteOptions};
#[cfg(feature = "umya")]
pub use backends::UmyaAdapter;

pub use rowsift_common::RawCell;
pub use rowsift_match::Query;
