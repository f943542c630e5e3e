use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?[0-9]*\.?[0-9]+$").expect("decimal regex must compile"));

/// Locale contract for matching.
///
/// Two locales are in play: decimal-dot and decimal-comma. Everything is
/// compared in the dot form:
///
/// - Only the first comma of a string is rewritten to a dot, so `"1,5"` and
///   `"1.5"` compare equal while `"1,234,5"` keeps its later commas.
/// - Numbers are recognised only in the plain `-?\d*\.?\d+` shape; no
///   thousands separators, no exponents, no surrounding whitespace.
/// - Case folding is Unicode lowercase so Cyrillic text folds as well.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct Locale;

impl Locale {
    pub const fn invariant() -> Self {
        Locale
    }

    /// Rewrite the first decimal comma to a dot.
    pub fn normalize_decimal<'a>(&self, s: &'a str) -> Cow<'a, str> {
        if s.contains(',') {
            Cow::Owned(s.replacen(',', ".", 1))
        } else {
            Cow::Borrowed(s)
        }
    }

    /// True when the text is a plain dot-decimal number.
    pub fn is_decimal(&self, s: &str) -> bool {
        DECIMAL.is_match(s)
    }

    /// Parse a plain dot-decimal number; `None` for anything else.
    pub fn parse_decimal(&self, s: &str) -> Option<f64> {
        if !self.is_decimal(s) {
            return None;
        }
        s.parse::<f64>().ok().filter(|n| n.is_finite())
    }

    /// Case folding for comparisons.
    pub fn fold_case(&self, s: &str) -> String {
        s.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_first_comma_is_rewritten() {
        let l = Locale::invariant();
        assert_eq!(l.normalize_decimal("12,5"), "12.5");
        assert_eq!(l.normalize_decimal("1,2,3"), "1.2,3");
        assert!(matches!(l.normalize_decimal("abc"), Cow::Borrowed("abc")));
    }

    #[test]
    fn decimal_shape() {
        let l = Locale::invariant();
        for ok in ["5", "-5", ".5", "-.5", "3.0005", "007"] {
            assert!(l.parse_decimal(ok).is_some(), "{ok}");
        }
        for bad in ["", "-", "5.", "1e3", " 5", "1.2.3", "+5", "12,5"] {
            assert!(l.parse_decimal(bad).is_none(), "{bad}");
        }
    }

    #[test]
    fn folds_cyrillic() {
        assert_eq!(Locale::invariant().fold_case("ИП Иванов"), "ип иванов");
    }
}
