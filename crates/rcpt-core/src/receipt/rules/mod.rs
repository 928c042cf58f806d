//! Rule-based field matchers for receipts.

pub mod amounts;
pub mod category;
pub mod dates;
pub mod merchant;
pub mod patterns;

pub use amounts::{AmountMatcher, parse_amount};
pub use category::CategoryMatcher;
pub use dates::{DateMatcher, match_date};
pub use merchant::{MerchantMatcher, match_merchant};

/// Trait for field matchers.
pub trait FieldExtractor {
    /// The type of value this matcher produces.
    type Output;

    /// Find the field in text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Find all occurrences of the field, in document order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A matched value with the source text it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
