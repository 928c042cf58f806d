//! Configuration structures for the scan pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for rcpt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RcptConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Receipt field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Transaction and budget storage.
    pub storage: StorageConfig,
}

/// OCR collaborator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Recognition language tag.
    pub language: String,

    /// Timeout for a single recognition call, in milliseconds.
    pub timeout_ms: u64,

    /// Largest accepted image payload, in bytes.
    pub max_image_bytes: usize,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            language: "eng".to_string(),
            timeout_ms: 30_000,
            max_image_bytes: 5 * 1024 * 1024,
        }
    }
}

impl OcrConfig {
    /// Get full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.model_dir.join(model_name)
    }
}

/// How the transaction builder treats a receipt without a date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePolicy {
    /// Missing dates default to the processing date.
    #[default]
    Lenient,
    /// Missing dates reject the candidate.
    Strict,
}

/// A keyword that maps receipt text to a category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryKeyword {
    pub keyword: String,
    pub label: String,
}

impl CategoryKeyword {
    pub fn new(keyword: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            label: label.into(),
        }
    }
}

/// Receipt field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Recognized currency markers.
    pub currency_markers: Vec<String>,

    /// Category keywords, checked in order.
    pub category_keywords: Vec<CategoryKeyword>,

    /// Category used when no keyword matches.
    pub fallback_category: String,

    /// Description used when the receipt has no text lines.
    pub placeholder_description: String,

    /// Missing-date policy.
    pub date_policy: DatePolicy,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            currency_markers: ["Rs.", "Rs", "INR", "₹", "$"]
                .into_iter()
                .map(String::from)
                .collect(),
            category_keywords: vec![
                CategoryKeyword::new("grocery", "Grocery"),
                CategoryKeyword::new("fuel", "Fuel"),
                CategoryKeyword::new("food", "Food"),
                CategoryKeyword::new("restaurant", "Restaurant"),
                CategoryKeyword::new("travel", "Travel"),
            ],
            fallback_category: "General".to_string(),
            placeholder_description: "Scanned from receipt".to_string(),
            date_policy: DatePolicy::Lenient,
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding `transactions.json` and `budgets.json`.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

impl StorageConfig {
    pub fn transactions_path(&self) -> PathBuf {
        self.data_dir.join("transactions.json")
    }

    pub fn budgets_path(&self) -> PathBuf {
        self.data_dir.join("budgets.json")
    }
}

impl RcptConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: RcptConfig =
            serde_json::from_str(r#"{"extraction": {"date_policy": "strict"}}"#).unwrap();

        assert_eq!(config.extraction.date_policy, DatePolicy::Strict);
        assert_eq!(config.extraction.fallback_category, "General");
        assert_eq!(config.ocr.max_image_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = RcptConfig::default();
        config.ocr.timeout_ms = 1_000;
        config.save(&path).unwrap();

        let loaded = RcptConfig::from_file(&path).unwrap();
        assert_eq!(loaded.ocr.timeout_ms, 1_000);
        assert_eq!(loaded.extraction.category_keywords.len(), 5);
    }
}
