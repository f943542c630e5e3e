use rowsift_common::RawCell;
use std::io::Write;
use std::path::Path;

/// Where a writer should put its serialized output.
pub enum SaveDestination<'a> {
    Path(&'a Path),
    Writer(&'a mut dyn Write),
    /// Return the bytes instead of writing them anywhere.
    Bytes,
}

/// Source side of the spreadsheet codec: yields rows of raw cells.
///
/// Rows come back in sheet order. Adapters pad ragged rows as they see fit;
/// the dataset loader pads again to the widest row.
pub trait SpreadsheetReader {
    type Error: std::error::Error + Send + Sync + 'static;

    fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, Self::Error>
    where
        Self: Sized;

    fn open_bytes(data: Vec<u8>) -> Result<Self, Self::Error>
    where
        Self: Sized;

    fn sheet_names(&self) -> Result<Vec<String>, Self::Error>;

    fn read_rows(&mut self, sheet: &str) -> Result<Vec<Vec<RawCell>>, Self::Error>;

    /// Rows of the first sheet; an empty workbook yields no rows.
    fn read_first_sheet(&mut self) -> Result<Vec<Vec<RawCell>>, Self::Error> {
        match self.sheet_names()?.first() {
            Some(name) => {
                let name = name.clone();
                self.read_rows(&name)
            }
            None => Ok(Vec::new()),
        }
    }
}

/// Sink side of the spreadsheet codec: accepts rows of display strings.
pub trait SpreadsheetWriter {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Replace the contents of `sheet` with `rows`, creating it if needed.
    fn write_rows(&mut self, sheet: &str, rows: &[Vec<String>]) -> Result<(), Self::Error>;

    /// Serialize everything written so far. Returns the bytes only for
    /// [`SaveDestination::Bytes`].
    fn save_to(&mut self, dest: SaveDestination<'_>) -> Result<Option<Vec<u8>>, Self::Error>;
}
