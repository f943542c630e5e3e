use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

use crate::query::{PHONE_MIN_DIGITS, digit_suffix};

static PHONE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9+()\-\s]{7,}").expect("phone run regex must compile"));

/// A maximal stretch of phone-ish characters that holds enough digits to be
/// compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PhoneRun {
    pub span: Range<usize>,
    pub digits: String,
}

impl PhoneRun {
    pub fn suffix(&self) -> &str {
        digit_suffix(&self.digits)
    }
}

pub(crate) fn phone_runs(text: &str) -> impl Iterator<Item = PhoneRun> + '_ {
    PHONE_RUN.find_iter(text).filter_map(|m| {
        let digits: String = m.as_str().chars().filter(char::is_ascii_digit).collect();
        (digits.len() >= PHONE_MIN_DIGITS).then(|| PhoneRun {
            span: m.range(),
            digits,
        })
    })
}

/// Equal suffixes, or one contained in the other (a missing area code on
/// either side still matches).
pub(crate) fn suffixes_overlap(cell: &str, query: &str) -> bool {
    cell == query || cell.contains(query) || query.contains(cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_need_seven_digits() {
        let text = "тел. +7 (495) 123-45-67, доб. 12-34";
        let runs: Vec<_> = phone_runs(text).collect();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].digits, "74951234567");
        assert_eq!(runs[0].suffix(), "4951234567");
        assert_eq!(&text[runs[0].span.clone()], " +7 (495) 123-45-67");
    }

    #[test]
    fn short_runs_are_ignored() {
        // Seven characters but only five digits.
        assert_eq!(phone_runs("(12) 3-45").count(), 0);
    }

    #[test]
    fn overlap_is_symmetric() {
        assert!(suffixes_overlap("4951234567", "1234567"));
        assert!(suffixes_overlap("1234567", "4951234567"));
        assert!(!suffixes_overlap("4951234567", "4951234568"));
    }
}
