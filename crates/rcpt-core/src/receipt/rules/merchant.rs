//! Merchant name matching.

use super::patterns::MERCHANT_LINE;
use super::{ExtractionMatch, FieldExtractor};

/// Matches lines prefixed with `Store`, `Merchant` or `Shop`.
pub struct MerchantMatcher;

impl MerchantMatcher {
    pub fn new() -> Self {
        Self
    }

    fn match_line(line: &str) -> Option<String> {
        let caps = MERCHANT_LINE.captures(line.trim())?;
        let name = caps[1].trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }
}

impl Default for MerchantMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for MerchantMatcher {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        text.lines()
            .filter_map(|line| {
                Self::match_line(line).map(|name| ExtractionMatch::new(name, line.trim()))
            })
            .collect()
    }
}

/// Convenience wrapper returning the first merchant name.
pub fn match_merchant(text: &str) -> Option<String> {
    MerchantMatcher::new().extract(text).map(|m| m.value)
}
