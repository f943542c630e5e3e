use chrono::{Datelike, Duration as ChronoDur, NaiveDate};
use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/* ───────────────────── Excel date-serial utilities ───────────────────
Excel's serial date system:
  Serial 1  = 1900-01-01
  Serial 59 = 1900-02-28
  Serial 60 = 1900-02-29  (phantom – doesn't exist, but Excel thinks it does)
  Serial 61 = 1900-03-01
Base date = 1899-12-31 so that serial 1 = base + 1 day = 1900-01-01.
The fractional part carries the time of day and is dropped here.
------------------------------------------------------------------- */

/// Base date for the 1900 date system. Serial 1 = base + 1 day = 1900-01-01.
const EXCEL_EPOCH: NaiveDate = NaiveDate::from_ymd_opt(1899, 12, 31).unwrap();
const PHANTOM_LEAP_DAY: NaiveDate = NaiveDate::from_ymd_opt(1900, 2, 28).unwrap();

/// Calendar date of an Excel serial. Returns `None` for non-finite serials
/// and for serials outside chrono's representable range.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let days = serial.trunc() as i64;

    // Serial 60 is phantom 1900-02-29; map to 1900-02-28
    if days == 60 {
        return Some(PHANTOM_LEAP_DAY);
    }
    // serial < 60: offset = serial (no phantom day yet)
    // serial > 60: offset = serial - 1 (skip phantom day)
    let offset = if days < 60 { days } else { days - 1 };
    EXCEL_EPOCH.checked_add_signed(ChronoDur::try_days(offset)?)
}

/// A raw cell as handed over by a spreadsheet codec, before any
/// normalization. Codecs collapse richer value kinds onto these four.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawCell {
    #[default]
    Empty,
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl RawCell {
    /// Empty cells and whitespace-only text count as blank.
    pub fn is_blank(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            RawCell::Number(_) | RawCell::Date(_) => false,
        }
    }

    pub fn from_serial_number(serial: f64) -> Self {
        match serial_to_date(serial) {
            Some(d) => RawCell::Date(d),
            None => RawCell::Number(serial),
        }
    }
}

impl Display for RawCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawCell::Empty => Ok(()),
            RawCell::Number(n) => write!(f, "{n}"),
            RawCell::Date(d) => write!(f, "{:04}-{:02}-{:02}", d.year(), d.month(), d.day()),
            RawCell::Text(s) => f.write_str(s),
        }
    }
}

/// Conversion trait so tests and callers can build rows from primitives.
pub trait IntoRawCell {
    fn into_raw_cell(self) -> RawCell;
}

impl IntoRawCell for RawCell {
    fn into_raw_cell(self) -> RawCell {
        self
    }
}

impl IntoRawCell for f64 {
    fn into_raw_cell(self) -> RawCell {
        RawCell::Number(self)
    }
}

impl IntoRawCell for i64 {
    fn into_raw_cell(self) -> RawCell {
        RawCell::Number(self as f64)
    }
}

impl IntoRawCell for i32 {
    fn into_raw_cell(self) -> RawCell {
        RawCell::Number(self as f64)
    }
}

impl IntoRawCell for NaiveDate {
    fn into_raw_cell(self) -> RawCell {
        RawCell::Date(self)
    }
}

impl IntoRawCell for String {
    fn into_raw_cell(self) -> RawCell {
        RawCell::Text(self)
    }
}

impl IntoRawCell for &str {
    fn into_raw_cell(self) -> RawCell {
        RawCell::Text(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_roundtrip_skips_phantom_leap_day() {
        let d = NaiveDate::from_ymd_opt(2023, 3, 1).unwrap();
        assert_eq!(serial_to_date(44986.0), Some(d));
        assert_eq!(serial_to_date(44986.75), Some(d));
        assert_eq!(
            serial_to_date(60.0),
            NaiveDate::from_ymd_opt(1900, 2, 28)
        );
        assert_eq!(serial_to_date(1.0), NaiveDate::from_ymd_opt(1900, 1, 1));
    }

    #[test]
    fn non_finite_serial_stays_numeric() {
        assert_eq!(serial_to_date(f64::NAN), None);
        assert!(matches!(
            RawCell::from_serial_number(f64::INFINITY),
            RawCell::Number(_)
        ));
    }

    #[test]
    fn blank_detection() {
        assert!(RawCell::Empty.is_blank());
        assert!("   ".into_raw_cell().is_blank());
        assert!(!"x".into_raw_cell().is_blank());
        assert!(!0.into_raw_cell().is_blank());
    }
}
