#[cfg(feature = "calamine")]
pub mod calamine;
#[cfg(feature = "csv")]
pub mod csv;
#[cfg(feature = "umya")]
pub mod umya;

#[cfg(feature = "calamine")]
pub use calamine::CalamineAdapter;
#[cfg(feature = "csv")]
pub use csv::{
    CsvAdapter, CsvNewline, CsvQuoteStyle, CsvReadOptions, CsvTrim, CsvTypeInference,
    CsvWriteOptions,
};
#[cfg(feature = "umya")]
pub use umya::UmyaAdapter;

use crate::error::IoError;
#[cfg(any(feature = "csv", feature = "calamine"))]
use crate::traits::SpreadsheetReader;
use rowsift_common::RawCell;
use std::path::Path;

/// File formats the loader can pick from an extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Workbook,
}

impl FileFormat {
    /// `.csv` and `.tsv` are delimited text; everything else goes to the
    /// workbook reader, which sniffs the container itself.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") | Some("tsv") => FileFormat::Csv,
            _ => FileFormat::Workbook,
        }
    }
}

/// Rows of the first sheet of the file at `path`.
pub fn read_first_sheet(path: &Path) -> Result<Vec<Vec<RawCell>>, IoError> {
    match FileFormat::from_path(path) {
        #[cfg(feature = "csv")]
        FileFormat::Csv => {
            let is_tsv = path
                .extension()
                .is_some_and(|e| e.eq_ignore_ascii_case("tsv"));
            let opts = CsvReadOptions {
                delimiter: if is_tsv { b'\t' } else { b',' },
                ..CsvReadOptions::default()
            };
            CsvAdapter::open_path_with_options(path, opts)?.read_first_sheet()
        }
        #[cfg(feature = "calamine")]
        FileFormat::Workbook => CalamineAdapter::open_path(path)?.read_first_sheet(),
        #[allow(unreachable_patterns)]
        other => Err(IoError::Unsupported {
            feature: format!("{other:?}"),
            context: "backend not compiled in".to_string(),
        }),
    }
}
