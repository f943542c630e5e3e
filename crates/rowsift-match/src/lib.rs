//! Normalization and matching engine.
//!
//! Raw cells are reduced to canonical display strings by [`normalize`], rows
//! of canonical strings are tested against a [`Query`] by [`RowMatcher`], and
//! [`HighlightFormatter`] marks the parts of a cell that explain a hit.
//! Matcher and highlighter dispatch on the same [`Strategy`] so the two never
//! disagree about whether a query is a phone search.

pub mod date;
pub mod highlight;
pub mod locale;
pub mod matcher;
pub mod normalize;
mod phone;
pub mod query;

pub use date::try_parse_date;
pub use highlight::{HIGHLIGHT_CLOSE, HIGHLIGHT_OPEN, HighlightFormatter, escape_html};
pub use locale::Locale;
pub use matcher::{MatchHit, MatchKind, NUMERIC_TOLERANCE, RowMatcher};
pub use normalize::{format_date, format_number, is_ip_year_tag, normalize};
pub use query::{PHONE_MIN_DIGITS, PHONE_SUFFIX_LEN, Query, Strategy};
