//! Field parsers for locale-formatted listing text.
//!
//! Every parser is pure and strict: the cleaned text must be an optional sign
//! followed by ASCII digits, otherwise the caller gets a [`MalformedNumber`]
//! carrying the raw input so selector drift can be diagnosed from the log.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Grouping characters removed from prices: comma, no-break space, and the
/// narrow no-break space used by the same locale.
const THOUSANDS_SEPARATORS: &[char] = &[',', '\u{00a0}', '\u{202f}'];

/// Currency markers accepted at the end of a price, longest first.
const CURRENCY_MARKERS: &[&str] = &["руб.", "руб", "р.", "₽", "$", "€", "£", "₸", "¥"];

static MAGNITUDE_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d\s*(?:k|m|к|тыс|млн)\b").expect("valid magnitude suffix regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed number {raw:?}: {reason}")]
pub struct MalformedNumber {
    /// The text exactly as it was scraped.
    pub raw: String,
    pub reason: String,
}

/// Parses a price such as `"12,500 ₽"` into whole currency units.
///
/// Thousands separators are removed anywhere in the text; a trailing currency
/// marker and the whitespace around it are stripped.
///
/// # Errors
///
/// Returns [`MalformedNumber`] if nothing numeric remains or the remainder
/// contains non-digit characters.
pub fn parse_price(text: &str) -> Result<i64, MalformedNumber> {
    let cleaned: String = text
        .chars()
        .filter(|c| !THOUSANDS_SEPARATORS.contains(c))
        .collect();
    parse_integer(text, strip_currency_marker(&cleaned))
}

/// Parses a discount badge such as `" 20% "` into a percentage.
///
/// A leading sign is kept as scraped, so `"-20%"` yields `-20`.
///
/// # Errors
///
/// Returns [`MalformedNumber`] if the text without `%` is not an integer.
pub fn parse_discount_percent(text: &str) -> Result<i32, MalformedNumber> {
    let cleaned = text.trim().trim_end_matches('%').trim();
    parse_integer(text, cleaned)
}

/// Parses a review counter by concatenating every ASCII digit in the text.
///
/// `"123 отзыва"` yields `123`. The rule is lossy: `"1.2K"` yields `12`.
/// Use [`normalize_reviews_text`] to detect inputs where that happens.
///
/// # Errors
///
/// Returns [`MalformedNumber`] if the text contains no digits or the digits
/// overflow `i64`.
pub fn parse_reviews_count(text: &str) -> Result<i64, MalformedNumber> {
    normalize_reviews_text(text).count(text)
}

/// Outcome of the digit-concatenation rule applied to a review counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewsText {
    /// Every ASCII digit of the input, in order.
    pub digits: String,
    /// Set when the concatenated value probably differs from what the page
    /// shows: the digits were split by other characters (`"1.2K"`,
    /// `"1 234"`) or the number carries a magnitude suffix (`"5K"`, `"3 тыс"`).
    pub needs_review: bool,
}

impl ReviewsText {
    /// Parses the concatenated digits. `raw` is the text this value was
    /// normalized from and is only used in the error.
    ///
    /// # Errors
    ///
    /// Same as [`parse_reviews_count`].
    pub fn count(&self, raw: &str) -> Result<i64, MalformedNumber> {
        parse_integer(raw, &self.digits)
    }
}

/// Applies the review-counter normalization rule without parsing.
#[must_use]
pub fn normalize_reviews_text(text: &str) -> ReviewsText {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();

    let first = text.find(|c: char| c.is_ascii_digit());
    let last = text.rfind(|c: char| c.is_ascii_digit());
    let split_run = match (first, last) {
        (Some(start), Some(end)) => !text[start..=end].chars().all(|c| c.is_ascii_digit()),
        _ => false,
    };

    ReviewsText {
        needs_review: split_run || MAGNITUDE_SUFFIX_RE.is_match(text),
        digits,
    }
}

fn strip_currency_marker(s: &str) -> &str {
    let mut rest = s.trim();
    loop {
        let before = rest.len();
        for marker in CURRENCY_MARKERS {
            if let Some(stripped) = rest.strip_suffix(marker) {
                rest = stripped.trim_end();
            }
        }
        if rest.len() == before {
            return rest;
        }
    }
}

fn parse_integer<T>(raw: &str, cleaned: &str) -> Result<T, MalformedNumber>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    let malformed = |reason: String| MalformedNumber {
        raw: raw.to_owned(),
        reason,
    };

    if cleaned.is_empty() {
        return Err(malformed("no digits".to_owned()));
    }

    let unsigned = cleaned.strip_prefix(['+', '-']).unwrap_or(cleaned);
    if let Some(bad) = unsigned.chars().find(|c| !c.is_ascii_digit()) {
        return Err(malformed(format!("unexpected character {bad:?}")));
    }

    cleaned.parse::<T>().map_err(|e| malformed(e.to_string()))
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
