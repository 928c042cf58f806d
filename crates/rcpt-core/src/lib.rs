//! Core library for receipt scanning.
//!
//! This crate provides:
//! - An OCR seam with a pure-Rust ONNX recognizer
//! - Receipt field extraction (amount, date, merchant, category)
//! - Transaction models and owner-scoped stores
//! - Budget plans that scanned expenses are applied to

pub mod error;
pub mod models;
pub mod ocr;
pub mod receipt;
pub mod scan;
pub mod store;

pub use error::{BudgetError, RcptError, RecognitionError, Rejection, Result, StoreError};
pub use models::budget::{BudgetPlan, BudgetReport, BudgetStrategy};
pub use models::config::{DatePolicy, RcptConfig};
pub use models::transaction::{
    NewTransaction, OwnedCandidate, OwnerId, StoredTransaction, TransactionCandidate,
    TransactionKind,
};
pub use ocr::{PlainTextRecognizer, RecognizedText, Recognizer};
#[cfg(feature = "native")]
pub use ocr::PureOcrRecognizer;
pub use receipt::{normalize_lines, ReceiptExtractor, TransactionBuilder};
pub use scan::ScanService;
pub use store::{BudgetBook, JsonFileStore, MemoryStore, TransactionStore};
