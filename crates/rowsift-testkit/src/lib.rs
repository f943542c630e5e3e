//! Fixture helpers for tests: temporary xlsx and csv files.
//!
//! Files are kept on disk after the helper returns (they live in the system
//! temp directory), so tests can hand the path to a reader without holding
//! a guard.

use std::io::Write;
use std::path::PathBuf;
use umya_spreadsheet::Spreadsheet;

fn keep_temp(suffix: &str, bytes: Option<&[u8]>) -> (std::fs::File, PathBuf) {
    let mut file = tempfile::Builder::new()
        .prefix("rowsift-fixture-")
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    if let Some(bytes) = bytes {
        file.write_all(bytes).expect("write temp file");
        file.flush().expect("flush temp file");
    }
    let (handle, path) = file.into_parts();
    let path = path.keep().expect("keep temp file");
    (handle, path)
}

/// Build an xlsx workbook with a single `Sheet1`, let `f` fill it, and
/// write it to a temp file.
pub fn build_workbook<F: FnOnce(&mut Spreadsheet)>(f: F) -> PathBuf {
    let mut book = umya_spreadsheet::new_file();
    f(&mut book);
    let (_handle, path) = keep_temp(".xlsx", None);
    umya_spreadsheet::writer::xlsx::write(&book, &path).expect("write workbook");
    path
}

/// Workbook whose `Sheet1` holds `rows` as text cells, starting at A1.
/// Empty strings leave the cell unset.
pub fn build_text_grid(rows: &[&[&str]]) -> PathBuf {
    build_workbook(|book| {
        let sh = book.get_sheet_by_name_mut("Sheet1").expect("default sheet");
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                sh.get_cell_mut(((c + 1) as u32, (r + 1) as u32))
                    .set_value_string(*value);
            }
        }
    })
}

/// Write `contents` to a temp file with the given extension (`".csv"`).
pub fn write_text_file(suffix: &str, contents: &str) -> PathBuf {
    let (_handle, path) = keep_temp(suffix, Some(contents.as_bytes()));
    path
}

/// A fresh path inside a new temp directory, for writers to create.
pub fn output_path(file_name: &str) -> PathBuf {
    let dir = tempfile::Builder::new()
        .prefix("rowsift-out-")
        .tempdir()
        .expect("create temp dir");
    dir.keep().join(file_name)
}

/// Read back the text of every cell of `sheet` in an xlsx file, as rows.
pub fn read_sheet_text(path: &std::path::Path, sheet: &str) -> Vec<Vec<String>> {
    let book = umya_spreadsheet::reader::xlsx::read(path).expect("read workbook");
    let ws = book.get_sheet_by_name(sheet).expect("sheet present");
    let (max_col, max_row) = ws.get_highest_column_and_row();
    (1..=max_row)
        .map(|r| {
            (1..=max_col)
                .map(|c| ws.get_value((c, r)))
                .collect()
        })
        .collect()
}
