//! Receipt field extraction module.

mod builder;
mod extractor;
mod normalize;
pub mod rules;

pub use builder::{MatchedFields, TransactionBuilder};
pub use extractor::ReceiptExtractor;
pub use normalize::normalize_lines;

use crate::error::Rejection;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, Rejection>;
