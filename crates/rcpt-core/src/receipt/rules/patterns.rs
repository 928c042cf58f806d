//! Common regex patterns for receipt extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// Numeric token following a currency marker: Western (`1,234,567`) or
/// Indian (`1,25,000`) comma grouping, optional 1-2 digit decimal part.
pub const AMOUNT_NUMBER: &str =
    r"(\d{1,3}(?:,\d{3})+|\d{1,3}(?:,\d{2})+,\d{3}|\d+)(?:\.(\d{1,2}))?\b";

lazy_static! {
    // Rs., Rs, INR, ₹, $ followed by an amount
    pub static ref DEFAULT_AMOUNT: Regex = amount_pattern(&["Rs.", "Rs", "INR", "₹", "$"])
        .expect("default currency markers form a valid pattern");

    // DD/MM/YYYY, DD-MM-YY, DD.MM.YYYY
    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b(\d{1,2})[./\-](\d{1,2})[./\-](\d{4}|\d{2})\b"
    ).unwrap();

    // "Store: ...", "Merchant ...", "SHOP: ..."
    pub static ref MERCHANT_LINE: Regex = Regex::new(
        r"(?i)^(?:store|merchant|shop)\b\s*:?\s*(.*)$"
    ).unwrap();

    // Whole-word and in-word "total"
    pub static ref TOTAL_WORD: Regex = Regex::new(r"(?i)\btotal\b").unwrap();
    pub static ref TOTAL_ANYWHERE: Regex = Regex::new(r"(?i)total").unwrap();
}

/// Build the amount pattern for a set of currency markers.
///
/// Longer markers are tried first so `Rs.` wins over `Rs`. Markers that
/// start with a letter must begin at a word boundary, so `Mrs 20` is not
/// read as an amount.
pub fn amount_pattern<S: AsRef<str>>(markers: &[S]) -> Result<Regex, regex::Error> {
    let mut markers: Vec<&str> = markers
        .iter()
        .map(|m| m.as_ref().trim())
        .filter(|m| !m.is_empty())
        .collect();
    markers.sort_by_key(|m| std::cmp::Reverse(m.chars().count()));
    markers.dedup();

    let alternatives: Vec<String> = markers
        .iter()
        .map(|m| {
            let escaped = regex::escape(m);
            if m.starts_with(|c: char| c.is_alphanumeric()) {
                format!(r"\b{}", escaped)
            } else {
                escaped
            }
        })
        .collect();

    if alternatives.is_empty() {
        // Matches nothing.
        return Regex::new(r"[^\s\S]");
    }

    Regex::new(&format!(
        r"(?i)(?:{})\s*{}",
        alternatives.join("|"),
        AMOUNT_NUMBER
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longer_marker_wins() {
        let caps = DEFAULT_AMOUNT.captures("Total: Rs. 542.00").unwrap();
        assert_eq!(&caps[0], "Rs. 542.00");
        assert_eq!(&caps[1], "542");
        assert_eq!(&caps[2], "00");
    }

    #[test]
    fn test_digit_grouping() {
        let caps = DEFAULT_AMOUNT.captures("Total ₹1,25,000.50").unwrap();
        assert_eq!(&caps[1], "1,25,000");
        assert_eq!(&caps[2], "50");

        let caps = DEFAULT_AMOUNT.captures("Rs. 12,34,56,789").unwrap();
        assert_eq!(&caps[1], "12,34,56,789");

        let caps = DEFAULT_AMOUNT.captures("$1,234,567.89").unwrap();
        assert_eq!(&caps[1], "1,234,567");
    }

    #[test]
    fn test_marker_needs_word_boundary() {
        assert!(!DEFAULT_AMOUNT.is_match("Mrs 20 guests"));
        assert!(DEFAULT_AMOUNT.is_match("INR 20"));
    }

    #[test]
    fn test_empty_marker_set_matches_nothing() {
        let empty: [&str; 0] = [];
        let pattern = amount_pattern(&empty).unwrap();
        assert!(!pattern.is_match("Rs 100"));
    }

    #[test]
    fn test_merchant_line() {
        let caps = MERCHANT_LINE.captures("Store: SuperMart Grocers").unwrap();
        assert_eq!(&caps[1], "SuperMart Grocers");
        assert!(!MERCHANT_LINE.is_match("Shopping bag Rs 5"));
    }
}
