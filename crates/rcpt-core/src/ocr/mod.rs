//! OCR collaborator seam: image bytes in, recognized text out.

#[cfg(feature = "native")]
mod pure_engine;

#[cfg(feature = "native")]
pub use pure_engine::PureOcrRecognizer;

use serde::{Deserialize, Serialize};

use crate::error::RecognitionError;

/// Raw text produced by a recognizer. Untrusted: may contain arbitrary
/// whitespace and noise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizedText {
    /// Recognized text, regions joined with newlines.
    pub text: String,

    /// Language the text was recognized as.
    pub language: String,
}

impl RecognizedText {
    pub fn new(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: language.into(),
        }
    }

    /// English text.
    pub fn english(text: impl Into<String>) -> Self {
        Self::new(text, "eng")
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// True when the text has no visible characters.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Converts a receipt image into text.
///
/// Implementations block; the scan service runs them on the blocking pool.
pub trait Recognizer: Send + Sync + 'static {
    /// Engine name, for logs.
    fn name(&self) -> &str;

    /// Recognize the text in an encoded image.
    fn recognize(&self, image: &[u8]) -> Result<RecognizedText, RecognitionError>;
}

/// Recognizer for payloads that are already text, such as OCR output saved
/// by another tool.
#[derive(Debug, Clone, Default)]
pub struct PlainTextRecognizer;

impl PlainTextRecognizer {
    pub fn new() -> Self {
        Self
    }
}

impl Recognizer for PlainTextRecognizer {
    fn name(&self) -> &str {
        "plain-text"
    }

    fn recognize(&self, image: &[u8]) -> Result<RecognizedText, RecognitionError> {
        let text = std::str::from_utf8(image).map_err(|_| RecognitionError::InvalidEncoding)?;
        Ok(RecognizedText::english(text.trim_start_matches('\u{feff}')))
    }
}
