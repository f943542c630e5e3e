use crate::error::IoError;
use crate::traits::SpreadsheetReader;
use calamine::{Data, Reader, Sheets, open_workbook_auto_from_rs};
use rowsift_common::RawCell;
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// Read-only adapter over calamine; accepts xlsx, xlsm, xls and ods.
///
/// The workbook is buffered in memory so paths and byte uploads share one
/// reader type.
pub struct CalamineAdapter {
    workbook: Sheets<Cursor<Vec<u8>>>,
}

impl CalamineAdapter {
    fn convert_value(data: &Data) -> RawCell {
        match data {
            Data::Empty => RawCell::Empty,
            Data::String(s) => RawCell::Text(s.clone()),
            Data::Float(f) => RawCell::Number(*f),
            Data::Int(i) => RawCell::Number(*i as f64),
            Data::Bool(b) => RawCell::Text(b.to_string()),
            Data::Error(e) => {
                let code = match e {
                    calamine::CellErrorType::Div0 => "#DIV/0!",
                    calamine::CellErrorType::NA => "#N/A",
                    calamine::CellErrorType::Name => "#NAME?",
                    calamine::CellErrorType::Null => "#NULL!",
                    calamine::CellErrorType::Num => "#NUM!",
                    calamine::CellErrorType::Ref => "#REF!",
                    calamine::CellErrorType::Value => "#VALUE!",
                    _ => "#VALUE!",
                };
                RawCell::Text(code.to_string())
            }
            // Date-formatted cells carry a 1900-system serial.
            Data::DateTime(dt) => RawCell::from_serial_number(dt.as_f64()),
            Data::DateTimeIso(s) => RawCell::Text(s.clone()),
            Data::DurationIso(s) => RawCell::Text(s.clone()),
        }
    }
}

impl SpreadsheetReader for CalamineAdapter {
    type Error = IoError;

    fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        let bytes = fs::read(path.as_ref())?;
        Self::open_bytes(bytes)
    }

    fn open_bytes(data: Vec<u8>) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        let workbook = open_workbook_auto_from_rs(Cursor::new(data))
            .map_err(|e| IoError::from_backend("calamine", e))?;
        Ok(Self { workbook })
    }

    fn sheet_names(&self) -> Result<Vec<String>, Self::Error> {
        Ok(self.workbook.sheet_names().to_vec())
    }

    fn read_rows(&mut self, sheet: &str) -> Result<Vec<Vec<RawCell>>, Self::Error> {
        let range = self
            .workbook
            .worksheet_range(sheet)
            .map_err(|e| IoError::from_backend("calamine", e))?;
        // The used range may start right of column A; keep columns aligned.
        let lead = range.start().map(|(_, c)| c as usize).unwrap_or(0);
        let rows = range
            .rows()
            .map(|row| {
                let mut out = vec![RawCell::Empty; lead];
                out.extend(row.iter().map(Self::convert_value));
                out
            })
            .collect();
        Ok(rows)
    }
}
