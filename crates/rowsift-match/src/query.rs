use crate::locale::Locale;

/// Queries with at least this many digits are phone searches.
pub const PHONE_MIN_DIGITS: usize = 7;
/// Phone numbers are compared on their trailing digits only, so country and
/// trunk prefixes (`+7`, `8`) do not matter.
pub const PHONE_SUFFIX_LEN: usize = 10;

/// Which of the two mutually exclusive cell strategies a query uses.
///
/// Numeric comparison runs for every query; this only selects between phone
/// suffix matching and substring matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Phone,
    Text,
}

/// A user query together with the derived forms used by matching and
/// highlighting. The strategy is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    raw: String,
    normalized: String,
    digits: String,
    strategy: Strategy,
}

impl Query {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let normalized = Locale::invariant().normalize_decimal(&raw).into_owned();
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        let strategy = if digits.len() >= PHONE_MIN_DIGITS {
            Strategy::Phone
        } else {
            Strategy::Text
        };
        Self {
            raw,
            normalized,
            digits,
            strategy,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The query with its first decimal comma turned into a dot.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// ASCII digits of the query, in order.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn is_phone(&self) -> bool {
        self.strategy == Strategy::Phone
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Last [`PHONE_SUFFIX_LEN`] digits of the query.
    pub fn phone_suffix(&self) -> &str {
        digit_suffix(&self.digits)
    }

    /// Raw, normalized, raw lowercased, normalized lowercased.
    pub fn text_variants(&self) -> [String; 4] {
        let locale = Locale::invariant();
        [
            self.raw.clone(),
            self.normalized.clone(),
            locale.fold_case(&self.raw),
            locale.fold_case(&self.normalized),
        ]
    }
}

pub(crate) fn digit_suffix(digits: &str) -> &str {
    // ASCII digits only, so byte offsets are char offsets.
    &digits[digits.len().saturating_sub(PHONE_SUFFIX_LEN)..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_by_digit_count() {
        assert_eq!(Query::new("123-45-6").strategy(), Strategy::Text);
        assert_eq!(Query::new("123-45-67").strategy(), Strategy::Phone);
        assert_eq!(Query::new("ИП").strategy(), Strategy::Text);
        // Decimal amounts with many digits are phone searches too.
        assert!(Query::new("1234,567").is_phone());
    }

    #[test]
    fn derived_forms() {
        let q = Query::new("Сумма 12,5");
        assert_eq!(q.raw(), "Сумма 12,5");
        assert_eq!(q.normalized(), "Сумма 12.5");
        assert_eq!(q.digits(), "125");
        assert_eq!(
            q.text_variants(),
            [
                "Сумма 12,5".to_string(),
                "Сумма 12.5".to_string(),
                "сумма 12,5".to_string(),
                "сумма 12.5".to_string(),
            ]
        );
    }

    #[test]
    fn phone_suffix_keeps_last_ten_digits() {
        assert_eq!(Query::new("+7 (495) 123-45-67").phone_suffix(), "4951234567");
        assert_eq!(Query::new("1234567").phone_suffix(), "1234567");
    }
}
