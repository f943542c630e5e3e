//! Canonical display strings for raw cells.
//!
//! Rules run in order and the first one that applies wins:
//!
//! 1. blank cells become `""`;
//! 2. dates render as `DD.MM.YYYY`;
//! 3. numbers render without a trailing `.0` and with at most two decimals;
//! 4. text is repaired and reinterpreted:
//!    a. a digit run doubled back-to-back (`"12341234"`) collapses to one copy;
//!    b. an `ИП` year tag (`"ИП 2024"`) passes through untouched;
//!    c. anything [`try_parse_date`] accepts renders as a date;
//!    d. `"<digits>,<digits>"` gets a decimal dot;
//!    e. everything else is returned unchanged.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use rowsift_common::RawCell;

use crate::date::try_parse_date;

static IP_YEAR_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^ИП\s?[0-9]{4}$").expect("ip tag regex must compile"));
static COMMA_DECIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]+),([0-9]+)$").expect("comma decimal regex must compile")
});

/// Reduce one raw cell to its canonical display string.
///
/// The result depends only on `raw`; `_column` is carried so column-aware
/// rules can be added without changing callers.
pub fn normalize(raw: &RawCell, _column: usize) -> String {
    if raw.is_blank() {
        return String::new();
    }
    match raw {
        RawCell::Empty => String::new(),
        RawCell::Date(d) => format_date(*d),
        RawCell::Number(n) => format_number(*n),
        RawCell::Text(s) => normalize_text(s),
    }
}

fn normalize_text(s: &str) -> String {
    if let Some(half) = collapse_doubled_digits(s) {
        return half.to_string();
    }
    if is_ip_year_tag(s) {
        return s.to_string();
    }
    if let Some(d) = try_parse_date(s) {
        return format_date(d);
    }
    if let Some(caps) = COMMA_DECIMAL.captures(s) {
        return format!("{}.{}", &caps[1], &caps[2]);
    }
    s.to_string()
}

/// `DD.MM.YYYY`, zero padded.
pub fn format_date(d: NaiveDate) -> String {
    format!("{:02}.{:02}.{:04}", d.day(), d.month(), d.year())
}

/// Integers print bare; other values are rounded to two decimals and lose
/// trailing zeros (`3.10` → `"3.1"`, `2.999` → `"3"`).
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    let value = if n.fract() == 0.0 { n } else { round_to_cents(n) };
    if value == 0.0 {
        // Also folds -0.
        return "0".to_string();
    }
    value.to_string()
}

fn round_to_cents(n: f64) -> f64 {
    let scaled = n * 100.0;
    // Exact binary ties (odd multiples of 1/8) round away from zero;
    // `{:.2}` alone would send them to the even neighbour.
    if scaled.fract().abs() == 0.5 && (n * 8.0).fract() == 0.0 {
        return scaled.round() / 100.0;
    }
    format!("{n:.2}").parse::<f64>().unwrap_or(n)
}

/// The `ИП` + four-digit-year tag, case-insensitive, optional single space.
pub fn is_ip_year_tag(s: &str) -> bool {
    IP_YEAR_TAG.is_match(s)
}

// Upstream exports sometimes write a number twice into one cell.
fn collapse_doubled_digits(s: &str) -> Option<&str> {
    if s.is_empty() || s.len() % 2 != 0 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (head, tail) = s.split_at(s.len() / 2);
    (head == tail).then_some(head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowsift_common::IntoRawCell;

    fn norm<V: IntoRawCell>(v: V) -> String {
        normalize(&v.into_raw_cell(), 0)
    }

    #[test]
    fn blanks() {
        assert_eq!(normalize(&RawCell::Empty, 3), "");
        assert_eq!(norm(""), "");
        assert_eq!(norm(" \t "), "");
    }

    #[test]
    fn numbers() {
        assert_eq!(norm(42), "42");
        assert_eq!(norm(-7), "-7");
        assert_eq!(norm(3.10), "3.1");
        assert_eq!(norm(3.0), "3");
        assert_eq!(norm(3.005001), "3.01");
        assert_eq!(norm(2.999), "3");
        assert_eq!(norm(-0.001), "0");
        assert_eq!(norm(0.125), "0.13");
        assert_eq!(norm(1e21), "1000000000000000000000");
    }

    #[test]
    fn dates() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(norm(d), "05.03.2024");
        assert_eq!(norm("2024-03-05"), "05.03.2024");
        assert_eq!(
            norm("Tue Mar 05 2024 00:00:00 GMT+0300 (Москва, стандартное время)"),
            "05.03.2024"
        );
    }

    #[test]
    fn doubled_digits_collapse() {
        assert_eq!(norm("12341234"), "1234");
        assert_eq!(norm("77007700"), "7700");
        assert_eq!(norm("7701"), "7701");
        assert_eq!(norm("123123x"), "123123x");
        assert_eq!(norm("11"), "1");
    }

    #[test]
    fn ip_year_tags_pass_through() {
        for s in ["ИП2024", "ИП 2024", "ип 2024", "Ип2024"] {
            assert!(is_ip_year_tag(s), "{s}");
            assert_eq!(norm(s), s);
        }
        assert!(!is_ip_year_tag("ИП  2024"));
        assert!(!is_ip_year_tag("ИП 24"));
    }

    #[test]
    fn comma_decimals_get_a_dot() {
        assert_eq!(norm("100,50"), "100.50");
        assert_eq!(norm("12,5"), "12.5");
        assert_eq!(norm("1,2,3"), "1,2,3");
        assert_eq!(norm("-12,5"), "-12,5");
    }

    #[test]
    fn other_text_is_untouched() {
        assert_eq!(norm("ООО Ромашка"), "ООО Ромашка");
        assert_eq!(norm("  padded "), "  padded ");
        assert_eq!(norm("+7 (495) 123-45-67"), "+7 (495) 123-45-67");
    }
}
