//! Best-effort parsing of loosely formatted date strings.
//!
//! The parser accepts the calendar layouts that turn up in exported sheets
//! (ISO, RFC 2822/3339, dotted day-first, slashed month-first, JavaScript
//! `Date.toString()` output, month names with or without a time of day) and
//! nothing else: bare numbers and bare years are rejected so amounts and
//! phone numbers never become dates. Only the written date components are
//! kept; offsets, zone names and times are dropped.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Marker of a JavaScript-style timestamp tail (`... GMT+0300 (MSK)`).
const GMT_TOKEN: &str = "GMT";
/// Texts at most this long are parsed whole even when they mention GMT.
const GMT_MIN_LEN: usize = 20;
/// Zone names accepted as a trailing token, optionally followed by an offset.
const ZONE_TOKENS: &[&str] = &["GMT", "UTC"];

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%d %H:%M%z",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%Y.%m.%d %H:%M:%S%.f",
    "%Y.%m.%d %H:%M",
    "%d.%m.%Y %H:%M:%S%.f",
    "%d.%m.%Y %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%a %b %d %Y %H:%M:%S",
    "%a %b %d %Y %H:%M",
    "%b %d %Y %H:%M:%S",
    "%b %d %Y %H:%M",
    "%b %d, %Y %H:%M:%S",
    "%b %d, %Y %H:%M",
    "%d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M",
    "%a, %d %b %Y %H:%M:%S",
    "%a, %d %b %Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%d.%m.%Y",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%a %b %d %Y",
    "%a, %d %b %Y",
    "%b %d %Y",
    "%b %d, %Y",
    "%d %b %Y",
];

/// Parse `text` as a calendar date.
///
/// A text that mentions `GMT` and is longer than 20 UTF-16 units is cut at
/// the first `GMT` and only the trimmed head is parsed. Shorter texts may end
/// in a `GMT`/`UTC` token with an optional numeric offset, which is dropped.
pub fn try_parse_date(text: &str) -> Option<NaiveDate> {
    if let Some(pos) = text.find(GMT_TOKEN)
        && text.encode_utf16().count() > GMT_MIN_LEN
    {
        return parse_calendar(text[..pos].trim());
    }
    parse_calendar(strip_zone_tail(text.trim()))
}

// "Jan 15 2024 GMT", "2024-01-15 10:30 UTC+3" -> the part before the zone.
fn strip_zone_tail(s: &str) -> &str {
    for token in ZONE_TOKENS {
        let Some(pos) = s.rfind(token) else {
            continue;
        };
        let head = &s[..pos];
        let tail = &s[pos + token.len()..];
        if head.ends_with(char::is_whitespace) && is_offset(tail) {
            return head.trim_end();
        }
    }
    s
}

// Empty, or a signed offset such as `+3`, `+0300`, `-03:00`.
fn is_offset(tail: &str) -> bool {
    let Some(rest) = tail.strip_prefix(['+', '-']) else {
        return tail.is_empty();
    };
    let digits = rest.bytes().filter(u8::is_ascii_digit).count();
    (1..=4).contains(&digits) && rest.bytes().all(|b| b.is_ascii_digit() || b == b':')
}

fn parse_calendar(text: &str) -> Option<NaiveDate> {
    let s = text.trim();
    // Every accepted layout has at least a separator between day, month and year.
    if s.len() < 6 || !s.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return plausible(dt.naive_local().date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return plausible(dt.naive_local().date());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return plausible(dt.naive_local().date());
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return plausible(dt.date());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return plausible(d);
        }
    }
    None
}

// Rendered dates always carry a four-digit year; short years such as the
// `3` in "1.2.3" are version strings, not dates.
fn plausible(d: NaiveDate) -> Option<NaiveDate> {
    (1000..=9999).contains(&d.year()).then_some(d)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn iso_and_rfc_forms() {
        assert_eq!(try_parse_date("2024-01-15"), ymd(2024, 1, 15));
        assert_eq!(try_parse_date("2024-01-15T10:30:00"), ymd(2024, 1, 15));
        assert_eq!(try_parse_date("2024-01-15 10:30:00.250"), ymd(2024, 1, 15));
        // Written date wins over the offset: no shift to UTC.
        assert_eq!(try_parse_date("2024-01-15T23:30:00+03:00"), ymd(2024, 1, 15));
        assert_eq!(try_parse_date("2024-01-15T23:30:00.000Z"), ymd(2024, 1, 15));
        assert_eq!(
            try_parse_date("Mon, 15 Jan 2024 10:00:00 +0300"),
            ymd(2024, 1, 15)
        );
        // Space-separated date-times with an offset.
        assert_eq!(try_parse_date("2024-01-15 10:30:00+03:00"), ymd(2024, 1, 15));
        assert_eq!(try_parse_date("2024-01-15 23:30:00-0500"), ymd(2024, 1, 15));
        assert_eq!(try_parse_date("2024-01-15 10:30+03:00"), ymd(2024, 1, 15));
    }

    #[test]
    fn day_first_dots_and_month_first_slashes() {
        assert_eq!(try_parse_date("05.03.2024"), ymd(2024, 3, 5));
        assert_eq!(try_parse_date("5.3.2024"), ymd(2024, 3, 5));
        assert_eq!(try_parse_date("03/05/2024"), ymd(2024, 3, 5));
        // Impossible as month-first, falls back to day-first.
        assert_eq!(try_parse_date("25/12/2023"), ymd(2023, 12, 25));
    }

    #[test]
    fn month_names() {
        assert_eq!(try_parse_date("Jan 15 2024"), ymd(2024, 1, 15));
        assert_eq!(try_parse_date("January 15, 2024"), ymd(2024, 1, 15));
        assert_eq!(try_parse_date("15 March 2024"), ymd(2024, 3, 15));
    }

    #[test]
    fn month_names_with_time_of_day() {
        assert_eq!(try_parse_date("January 5, 2024 10:00"), ymd(2024, 1, 5));
        assert_eq!(try_parse_date("January 5, 2024 10:00:30"), ymd(2024, 1, 5));
        assert_eq!(try_parse_date("15 Jan 2024 10:00"), ymd(2024, 1, 15));
        assert_eq!(try_parse_date("Jan 15 2024 23:59"), ymd(2024, 1, 15));
        assert_eq!(try_parse_date("Mon Jan 15 2024 10:00"), ymd(2024, 1, 15));
    }

    #[test]
    fn javascript_timestamp_tail_is_cut_at_gmt() {
        assert_eq!(
            try_parse_date("Mon Jan 15 2024 00:00:00 GMT+0300 (Moscow Standard Time)"),
            ymd(2024, 1, 15)
        );
        assert_eq!(
            try_parse_date("Tue Feb 20 2024 GMT+0300"),
            ymd(2024, 2, 20)
        );
    }

    #[test]
    fn short_texts_drop_a_trailing_zone_token() {
        assert_eq!(try_parse_date("Jan 15 2024 GMT"), ymd(2024, 1, 15));
        assert_eq!(try_parse_date("Jan 15 2024 UTC"), ymd(2024, 1, 15));
        assert_eq!(try_parse_date("2024-01-15 UTC+3"), ymd(2024, 1, 15));
        assert_eq!(try_parse_date("2024-01-15 10:30 UTC"), ymd(2024, 1, 15));
        // The token must stand alone and carry nothing but an offset.
        assert_eq!(try_parse_date("Jan 15 2024GMT"), None);
        assert_eq!(try_parse_date("Jan 15 2024 GMT x"), None);
    }

    #[test]
    fn gmt_cut_applies_only_above_twenty_units() {
        let at_limit = "Jan 15 2024 GMT (MS)";
        assert_eq!(at_limit.encode_utf16().count(), 20);
        assert_eq!(try_parse_date(at_limit), None);

        let past_limit = "Jan 15 2024 GMT (MSK)";
        assert_eq!(past_limit.encode_utf16().count(), 21);
        assert_eq!(try_parse_date(past_limit), ymd(2024, 1, 15));
    }

    #[test]
    fn rejects_numbers_and_free_text() {
        for s in [
            "", "2024", "1234", "100,50", "12,5", "3.14", "84951234567", "+7 495 111-22-33",
            "ИП 2024", "ИП2024", "10:30", "1.2.3", "hello", "32.01.2024",
        ] {
            assert_eq!(try_parse_date(s), None, "{s:?}");
        }
    }
}
