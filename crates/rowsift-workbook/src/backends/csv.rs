use crate::error::IoError;
use crate::traits::{SaveDestination, SpreadsheetReader, SpreadsheetWriter};
use rowsift_common::RawCell;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CsvTrim {
    #[default]
    None,
    All,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CsvTypeInference {
    /// Do not infer: treat all non-empty fields as text.
    Off,
    /// Infer numbers when unambiguous.
    #[default]
    Basic,
    /// Like `Basic`, plus ISO `YYYY-MM-DD` dates.
    BasicWithDates,
}

#[derive(Clone, Debug)]
pub struct CsvReadOptions {
    /// Field delimiter as a single byte. Use `b'\t'` for TSV, `b';'` for
    /// exports from locales where the comma is the decimal separator.
    pub delimiter: u8,
    pub trim: CsvTrim,
    pub type_inference: CsvTypeInference,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: CsvTrim::None,
            type_inference: CsvTypeInference::Basic,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CsvNewline {
    #[default]
    Lf,
    Crlf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CsvQuoteStyle {
    #[default]
    Necessary,
    Always,
    Never,
    NonNumeric,
}

#[derive(Clone, Debug)]
pub struct CsvWriteOptions {
    pub delimiter: u8,
    pub newline: CsvNewline,
    pub quote_style: CsvQuoteStyle,
    /// Prefix the output with a UTF-8 byte order mark so spreadsheet
    /// applications pick the right encoding for Cyrillic text.
    pub bom: bool,
}

impl Default for CsvWriteOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            newline: CsvNewline::Lf,
            quote_style: CsvQuoteStyle::Necessary,
            bom: false,
        }
    }
}

/// CSV backend adapter.
///
/// A CSV file is a single-sheet workbook (default sheet name `Sheet1`).
/// Input must be UTF-8; a leading byte order mark is skipped.
pub struct CsvAdapter {
    sheet_name: String,
    rows: Vec<Vec<RawCell>>,
    written: Vec<Vec<String>>,
    read_options: CsvReadOptions,
    write_options: CsvWriteOptions,
}

impl Default for CsvAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvAdapter {
    pub fn new() -> Self {
        Self::new_with_options(CsvReadOptions::default(), CsvWriteOptions::default())
    }

    pub fn new_with_options(read_options: CsvReadOptions, write_options: CsvWriteOptions) -> Self {
        Self {
            sheet_name: "Sheet1".to_string(),
            rows: Vec::new(),
            written: Vec::new(),
            read_options,
            write_options,
        }
    }

    pub fn set_write_options(&mut self, opts: CsvWriteOptions) {
        self.write_options = opts;
    }

    pub fn open_path_with_options<P: AsRef<Path>>(
        path: P,
        read_options: CsvReadOptions,
    ) -> Result<Self, IoError> {
        let mut adapter = Self::new_with_options(read_options, CsvWriteOptions::default());
        let file = File::open(path.as_ref())?;
        let mut bytes = Vec::new();
        BufReader::new(file).read_to_end(&mut bytes)?;
        adapter.load_bytes(&bytes)?;
        Ok(adapter)
    }

    pub fn open_bytes_with_options(
        bytes: Vec<u8>,
        read_options: CsvReadOptions,
    ) -> Result<Self, IoError> {
        let mut adapter = Self::new_with_options(read_options, CsvWriteOptions::default());
        adapter.load_bytes(&bytes)?;
        Ok(adapter)
    }

    fn load_bytes(&mut self, bytes: &[u8]) -> Result<(), IoError> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        let mut rb = csv::ReaderBuilder::new();
        rb.delimiter(self.read_options.delimiter)
            .has_headers(false)
            // Ragged rows are padded by the dataset loader.
            .flexible(true);

        match self.read_options.trim {
            CsvTrim::None => rb.trim(csv::Trim::None),
            CsvTrim::All => rb.trim(csv::Trim::All),
        };

        let mut rdr = rb.from_reader(bytes);
        self.rows.clear();
        for rec in rdr.records() {
            let rec = rec.map_err(|e| IoError::from_backend("csv", e))?;
            let row = rec
                .iter()
                .map(|field| infer_field(field, self.read_options.type_inference))
                .collect();
            self.rows.push(row);
        }
        Ok(())
    }

    fn check_sheet(&self, sheet: &str) -> Result<(), IoError> {
        if sheet != self.sheet_name {
            return Err(IoError::Backend {
                backend: "csv".to_string(),
                message: format!("sheet not found: {sheet}"),
            });
        }
        Ok(())
    }
}

impl SpreadsheetReader for CsvAdapter {
    type Error = IoError;

    fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        Self::open_path_with_options(path, CsvReadOptions::default())
    }

    fn open_bytes(data: Vec<u8>) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        Self::open_bytes_with_options(data, CsvReadOptions::default())
    }

    fn sheet_names(&self) -> Result<Vec<String>, Self::Error> {
        Ok(vec![self.sheet_name.clone()])
    }

    fn read_rows(&mut self, sheet: &str) -> Result<Vec<Vec<RawCell>>, Self::Error> {
        self.check_sheet(sheet)?;
        Ok(self.rows.clone())
    }
}

impl SpreadsheetWriter for CsvAdapter {
    type Error = IoError;

    fn write_rows(&mut self, sheet: &str, rows: &[Vec<String>]) -> Result<(), Self::Error> {
        // One sheet per file: writing renames it.
        self.sheet_name = sheet.to_string();
        self.written = rows.to_vec();
        Ok(())
    }

    fn save_to(&mut self, dest: SaveDestination<'_>) -> Result<Option<Vec<u8>>, Self::Error> {
        let opts = self.write_options.clone();
        match dest {
            SaveDestination::Path(path) => {
                let mut file = File::create(path)?;
                write_rows_csv(&mut file, &opts, &self.written)?;
                Ok(None)
            }
            SaveDestination::Writer(writer) => {
                write_rows_csv(writer, &opts, &self.written)?;
                Ok(None)
            }
            SaveDestination::Bytes => {
                let mut buf: Vec<u8> = Vec::new();
                write_rows_csv(&mut buf, &opts, &self.written)?;
                Ok(Some(buf))
            }
        }
    }
}

fn write_rows_csv<W: Write + ?Sized>(
    writer: &mut W,
    opts: &CsvWriteOptions,
    rows: &[Vec<String>],
) -> Result<(), IoError> {
    if opts.bom {
        writer.write_all(UTF8_BOM)?;
    }
    let mut wb = csv::WriterBuilder::new();
    wb.delimiter(opts.delimiter)
        .terminator(csv_terminator(opts.newline))
        .quote_style(csv_quote_style(opts.quote_style))
        // Export rows are already padded to the visible column count.
        .flexible(true);
    let mut wtr = wb.from_writer(writer);
    for row in rows {
        wtr.write_record(row)
            .map_err(|e| IoError::from_backend("csv", e))?;
    }
    wtr.flush().map_err(|e| IoError::from_backend("csv", e))?;
    Ok(())
}

fn infer_field(field: &str, mode: CsvTypeInference) -> RawCell {
    if field.is_empty() {
        return RawCell::Empty;
    }
    if mode == CsvTypeInference::Off {
        return RawCell::Text(field.to_string());
    }

    if let Some(i) = parse_unambiguous_i64(field) {
        return RawCell::Number(i as f64);
    }
    if let Some(n) = parse_unambiguous_f64(field) {
        return RawCell::Number(n);
    }
    if mode == CsvTypeInference::BasicWithDates
        && let Ok(d) = chrono::NaiveDate::parse_from_str(field, "%Y-%m-%d")
    {
        return RawCell::Date(d);
    }
    RawCell::Text(field.to_string())
}

fn parse_unambiguous_i64(s: &str) -> Option<i64> {
    // Conservative: reject leading zeros (except exactly "0" or "-0").
    let (sign, digits) = match s.as_bytes().first()? {
        b'+' => (1i64, &s[1..]),
        b'-' => (-1i64, &s[1..]),
        _ => (1i64, s),
    };
    if digits.is_empty() {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let parsed: i64 = digits.parse().ok()?;
    Some(sign * parsed)
}

fn parse_unambiguous_f64(s: &str) -> Option<f64> {
    // Only consider float if it actually looks like one (contains '.' or exponent).
    if !(s.contains('.') || s.contains('e') || s.contains('E')) {
        return None;
    }
    // Reject leading zeros like "01.2" (conservative).
    let s2 = s.strip_prefix('+').unwrap_or(s);
    let s2 = s2.strip_prefix('-').unwrap_or(s2);
    if s2.len() > 1 && s2.starts_with('0') && !s2.starts_with("0.") {
        return None;
    }
    let n: f64 = s.parse().ok()?;
    if !n.is_finite() {
        return None;
    }
    Some(n)
}

fn csv_terminator(nl: CsvNewline) -> csv::Terminator {
    match nl {
        CsvNewline::Lf => csv::Terminator::Any(b'\n'),
        CsvNewline::Crlf => csv::Terminator::CRLF,
    }
}

fn csv_quote_style(q: CsvQuoteStyle) -> csv::QuoteStyle {
    match q {
        CsvQuoteStyle::Necessary => csv::QuoteStyle::Necessary,
        CsvQuoteStyle::Always => csv::QuoteStyle::Always,
        CsvQuoteStyle::Never => csv::QuoteStyle::Never,
        CsvQuoteStyle::NonNumeric => csv::QuoteStyle::NonNumeric,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inference_keeps_leading_zeros_as_text() {
        assert_eq!(
            infer_field("007", CsvTypeInference::Basic),
            RawCell::Text("007".into())
        );
        assert_eq!(infer_field("42", CsvTypeInference::Basic), RawCell::Number(42.0));
        assert_eq!(infer_field("0.5", CsvTypeInference::Basic), RawCell::Number(0.5));
        assert_eq!(
            infer_field("100,50", CsvTypeInference::Basic),
            RawCell::Text("100,50".into())
        );
    }

    #[test]
    fn inference_off_and_dates() {
        assert_eq!(
            infer_field("42", CsvTypeInference::Off),
            RawCell::Text("42".into())
        );
        assert_eq!(
            infer_field("2024-01-15", CsvTypeInference::BasicWithDates),
            RawCell::Date(chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        );
        assert_eq!(
            infer_field("2024-01-15", CsvTypeInference::Basic),
            RawCell::Text("2024-01-15".into())
        );
        assert_eq!(infer_field("", CsvTypeInference::Basic), RawCell::Empty);
    }

    #[test]
    fn bom_is_skipped() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("счет,сумма\n1,2\n".as_bytes());
        let mut adapter = CsvAdapter::open_bytes(bytes).unwrap();
        let rows = adapter.read_first_sheet().unwrap();
        assert_eq!(rows[0][0], RawCell::Text("счет".into()));
        assert_eq!(rows[1], vec![RawCell::Number(1.0), RawCell::Number(2.0)]);
    }
}
