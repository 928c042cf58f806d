//! Error types for the rcpt-core library.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the rcpt library.
#[derive(Error, Debug)]
pub enum RcptError {
    /// The OCR collaborator failed; the scan is abandoned.
    #[error("scan failed: {0}")]
    Recognition(#[from] RecognitionError),

    /// Recognized text did not yield a usable transaction.
    #[error("extraction rejected: {0}")]
    Extraction(#[from] Rejection),

    /// The transaction store refused or failed the write.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Budget plan error.
    #[error("budget error: {0}")]
    Budget(#[from] BudgetError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning an image into recognized text.
#[derive(Error, Debug)]
pub enum RecognitionError {
    /// The uploaded payload was empty.
    #[error("image payload is empty")]
    EmptyImage,

    /// The uploaded payload exceeds the configured limit.
    #[error("image is {size} bytes, limit is {limit} bytes")]
    ImageTooLarge { size: usize, limit: usize },

    /// Payload could not be decoded as an image.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// The OCR engine reported an error.
    #[error("recognition engine failed: {0}")]
    Engine(String),

    /// Recognition did not finish in time.
    #[error("recognition timed out after {0}ms")]
    TimedOut(u64),

    /// The recognition task was cancelled or panicked.
    #[error("recognition was cancelled")]
    Cancelled,

    /// Recognition finished but produced no text.
    #[error("no text recognized")]
    NoText,

    /// Text payload is not valid UTF-8.
    #[error("recognized text is not valid UTF-8")]
    InvalidEncoding,
}

/// Reason a receipt could not be turned into a transaction candidate.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rejection {
    /// No currency-marked amount was found.
    #[error("missing-amount")]
    MissingAmount,

    /// An amount was found but is not a positive number.
    #[error("invalid-amount")]
    InvalidAmount,

    /// No date was found and the builder runs in strict mode.
    #[error("missing-date")]
    MissingDate,
}

impl Rejection {
    /// Stable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::MissingAmount => "missing-amount",
            Rejection::InvalidAmount => "invalid-amount",
            Rejection::MissingDate => "missing-date",
        }
    }
}

/// Errors related to transaction persistence.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record with this id belongs to the owner.
    #[error("transaction not found: {0}")]
    NotFound(String),

    /// The record failed validation.
    #[error("invalid {field}: {reason}")]
    Invalid { field: String, reason: String },

    /// Backing file could not be read or written.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backing file is not valid JSON.
    #[error("store data is corrupt: {0}")]
    Serde(#[from] serde_json::Error),

    /// A thread panicked while holding the store lock.
    #[error("store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        StoreError::Invalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors related to budget plans.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BudgetError {
    /// Category percentage outside 0..=100.
    #[error("percentage for {category} must be between 0 and 100, got {value}")]
    InvalidPercentage { category: String, value: String },

    /// Category percentages add up to more than 100.
    #[error("category allocations total {0}%, more than 100%")]
    OverAllocated(String),

    /// Category name already present in the plan.
    #[error("category already allocated: {0}")]
    DuplicateCategory(String),

    /// Negative total or goal.
    #[error("{0} must not be negative")]
    Negative(&'static str),

    /// Transaction belongs to a different owner than the plan.
    #[error("transaction owner {found} does not match budget owner {expected}")]
    OwnerMismatch { expected: String, found: String },
}

/// Result type for the rcpt library.
pub type Result<T> = std::result::Result<T, RcptError>;
