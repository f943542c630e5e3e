use crate::error::IoError;
use crate::traits::{SaveDestination, SpreadsheetWriter};
use umya_spreadsheet::Spreadsheet;

const DEFAULT_SHEET: &str = "Sheet1";

/// Write-only xlsx adapter over umya-spreadsheet.
pub struct UmyaAdapter {
    workbook: Spreadsheet,
    /// True until the first sheet is written; the default `Sheet1` is
    /// renamed instead of left behind empty.
    fresh: bool,
}

impl Default for UmyaAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl UmyaAdapter {
    pub fn new() -> Self {
        Self {
            workbook: umya_spreadsheet::new_file(),
            fresh: true,
        }
    }

    fn prepare_sheet(&mut self, sheet: &str) -> Result<(), IoError> {
        let wb = &mut self.workbook;
        if self.fresh {
            self.fresh = false;
            if let Some(ws) = wb.get_sheet_by_name_mut(DEFAULT_SHEET) {
                ws.set_name(sheet);
                return Ok(());
            }
        }
        if wb.get_sheet_by_name(sheet).is_some() {
            let _ = wb.remove_sheet_by_name(sheet);
        }
        wb.new_sheet(sheet)
            .map_err(|e| IoError::from_backend("umya", e))?;
        Ok(())
    }
}

impl SpreadsheetWriter for UmyaAdapter {
    type Error = IoError;

    fn write_rows(&mut self, sheet: &str, rows: &[Vec<String>]) -> Result<(), Self::Error> {
        self.prepare_sheet(sheet)?;
        let ws = self
            .workbook
            .get_sheet_by_name_mut(sheet)
            .ok_or_else(|| IoError::from_backend("umya", format!("sheet not found: {sheet}")))?;
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                // umya uses (col,row), 1-based
                ws.get_cell_mut(((c + 1) as u32, (r + 1) as u32))
                    .set_value_string(value.as_str());
            }
        }
        Ok(())
    }

    fn save_to(&mut self, dest: SaveDestination<'_>) -> Result<Option<Vec<u8>>, Self::Error> {
        match dest {
            SaveDestination::Path(p) => {
                umya_spreadsheet::writer::xlsx::write(&self.workbook, p)
                    .map_err(|e| IoError::from_backend("umya", e))?;
                Ok(None)
            }
            SaveDestination::Writer(w) => {
                umya_spreadsheet::writer::xlsx::write_writer(&self.workbook, w)
                    .map_err(|e| IoError::from_backend("umya", e))?;
                Ok(None)
            }
            SaveDestination::Bytes => {
                let mut buf: Vec<u8> = Vec::new();
                umya_spreadsheet::writer::xlsx::write_writer(&self.workbook, &mut buf)
                    .map_err(|e| IoError::from_backend("umya", e))?;
                Ok(Some(buf))
            }
        }
    }
}
