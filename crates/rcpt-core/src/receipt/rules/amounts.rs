//! Amount matching for receipts.

use regex::{Captures, Regex};
use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{amount_pattern, DEFAULT_AMOUNT, TOTAL_ANYWHERE, TOTAL_WORD};
use super::{ExtractionMatch, FieldExtractor};

/// An amount token found after a currency marker.
///
/// `value` is `None` when the numeric token does not parse; the builder
/// decides what that means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountToken {
    /// Digits as captured, e.g. `1,234.50`.
    pub raw: String,
    pub value: Option<Decimal>,
}

/// Currency-marked amount matcher.
pub struct AmountMatcher {
    pattern: Regex,
}

impl AmountMatcher {
    /// Matcher for the default markers (`Rs.`, `Rs`, `INR`, `₹`, `$`).
    pub fn new() -> Self {
        Self {
            pattern: DEFAULT_AMOUNT.clone(),
        }
    }

    /// Matcher for a custom set of currency markers.
    pub fn with_markers<S: AsRef<str>>(markers: &[S]) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: amount_pattern(markers)?,
        })
    }

    /// Find the authoritative amount on a receipt.
    ///
    /// Scans line by line. A currency-marked line containing `total` as a
    /// word is preferred, then one containing it inside a word (`Subtotal`),
    /// then the first currency-marked line.
    pub fn find_total(&self, text: &str) -> Option<ExtractionMatch<AmountToken>> {
        let mut first = None;
        let mut in_word_total = None;
        let mut offset = 0;

        for line in text.split_inclusive('\n') {
            if let Some(caps) = self.pattern.captures(line) {
                let found = to_match(&caps, line, offset);

                if TOTAL_WORD.is_match(line) {
                    return Some(found);
                }
                if in_word_total.is_none() && TOTAL_ANYWHERE.is_match(line) {
                    in_word_total = Some(found.clone());
                }
                if first.is_none() {
                    first = Some(found);
                }
            }
            offset += line.len();
        }

        in_word_total.or(first)
    }
}

impl Default for AmountMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountMatcher {
    type Output = ExtractionMatch<AmountToken>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.pattern.captures(text).map(|caps| to_match(&caps, text, 0))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.pattern
            .captures_iter(text)
            .map(|caps| to_match(&caps, text, 0))
            .collect()
    }
}

fn to_match(caps: &Captures<'_>, haystack: &str, offset: usize) -> ExtractionMatch<AmountToken> {
    let raw = match caps.get(2) {
        Some(fraction) => format!("{}.{}", &caps[1], fraction.as_str()),
        None => caps[1].to_string(),
    };

    let full = caps.get(0).map(|m| (m.start(), m.end(), m.as_str()));
    let (start, end, source) = full.unwrap_or((0, 0, ""));

    // A token cut short by the pattern (`542.005`, `1,2,3`) has no value.
    let value = if is_truncated(&haystack[end..]) {
        None
    } else {
        parse_amount(&raw)
    };

    ExtractionMatch::new(AmountToken { raw, value }, source)
        .with_position(offset + start, offset + end)
}

/// True when the text right after a token continues the number with a
/// separator and another digit.
fn is_truncated(rest: &str) -> bool {
    let mut chars = rest.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some('.' | ','), Some(c)) if c.is_ascii_digit()
    )
}

/// Parse a receipt amount such as `1,234.50` or `542`.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn total(text: &str) -> Option<Decimal> {
        AmountMatcher::new().find_total(text).and_then(|m| m.value.value)
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,234.50"), Some(dec("1234.50")));
        assert_eq!(parse_amount("542"), Some(dec("542")));
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_each_marker() {
        assert_eq!(total("₹250.50"), Some(dec("250.50")));
        assert_eq!(total("Paid Rs.99"), Some(dec("99")));
        assert_eq!(total("Amount INR 1,200.5"), Some(dec("1200.5")));
        assert_eq!(total("Due $ 7.25"), Some(dec("7.25")));
        assert_eq!(total("rs 40"), Some(dec("40")));
    }

    #[test]
    fn test_indian_grouping() {
        assert_eq!(total("Total ₹1,25,000.50"), Some(dec("125000.50")));
        assert_eq!(total("Total Rs. 1,00,000"), Some(dec("100000")));
        assert_eq!(total("Total INR 1,234,567.89"), Some(dec("1234567.89")));
    }

    #[test]
    fn test_truncated_token_has_no_value() {
        let found = AmountMatcher::new().find_total("Total Rs 542.005").unwrap();
        assert_eq!(found.value.raw, "542");
        assert_eq!(found.value.value, None);

        let found = AmountMatcher::new().find_total("Total Rs 1,2,3").unwrap();
        assert_eq!(found.value.value, None);
    }

    #[test]
    fn test_trailing_punctuation_is_not_truncation() {
        assert_eq!(total("Total Rs 55. Thanks"), Some(dec("55")));
        assert_eq!(total("Total Rs 55, paid"), Some(dec("55")));
    }

    #[test]
    fn test_first_match_without_total_line() {
        let text = "Tea Rs 20\nCoffee Rs 35";
        assert_eq!(total(text), Some(dec("20")));
    }

    #[test]
    fn test_total_line_preferred() {
        let text = "Tea Rs 20\nCoffee Rs 35\nTOTAL Rs 55.00\nCash Rs 100";
        assert_eq!(total(text), Some(dec("55.00")));
    }

    #[test]
    fn test_grand_total_beats_subtotal() {
        let text = "Subtotal: ₹500.00\nTax: ₹42.00\nGrand Total: ₹542.00";
        assert_eq!(total(text), Some(dec("542.00")));
    }

    #[test]
    fn test_subtotal_beats_plain_line() {
        let text = "Item ₹100\nSubtotal ₹120";
        assert_eq!(total(text), Some(dec("120")));
    }

    #[test]
    fn test_total_without_marker_is_ignored() {
        let text = "Total 55\nPaid Rs 60";
        assert_eq!(total(text), Some(dec("60")));
    }

    #[test]
    fn test_no_marker() {
        assert_eq!(AmountMatcher::new().find_total("Total 55.00\nThank you"), None);
    }

    #[test]
    fn test_position_relative_to_whole_text() {
        let text = "Hello\nTotal Rs 5";
        let found = AmountMatcher::new().find_total(text).unwrap();
        assert_eq!(found.source, "Rs 5");
        assert_eq!(found.position, Some((12, 16)));
    }

    #[test]
    fn test_custom_markers() {
        let matcher = AmountMatcher::with_markers(&["EUR", "€"]).unwrap();
        let found = matcher.find_total("Sum € 12.30").unwrap();
        assert_eq!(found.value.value, Some(dec("12.30")));
        assert!(matcher.find_total("Rs 100").is_none());
    }

    #[test]
    fn test_extract_all() {
        let found = AmountMatcher::new().extract_all("Rs 1 and $2 and INR 3");
        assert_eq!(found.len(), 3);
    }
}
