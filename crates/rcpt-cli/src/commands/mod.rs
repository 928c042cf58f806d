//! Subcommands and the helpers they share.

pub mod batch;
pub mod budget;
pub mod config;
pub mod edit;
pub mod extract;
pub mod list;
pub mod output;
pub mod scan;

use std::path::{Path, PathBuf};

use tracing::debug;

use rcpt_core::error::RecognitionError;
use rcpt_core::models::config::RcptConfig;
use rcpt_core::{BudgetBook, PlainTextRecognizer, PureOcrRecognizer, RecognizedText, Recognizer};
use rcpt_core::{OwnerId, StoredTransaction};

/// Image extensions handed to the OCR engine.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "tiff", "tif", "bmp"];

/// Extensions treated as already-recognized text.
pub const TEXT_EXTENSIONS: &[&str] = &["txt"];

/// Load the config file given with `-c`, else the default config file if it
/// exists, else defaults. `data_dir` overrides `storage.data_dir`.
pub fn load_config(path: Option<&str>, data_dir: Option<PathBuf>) -> anyhow::Result<RcptConfig> {
    let mut config = match path {
        Some(path) => RcptConfig::from_file(Path::new(path))?,
        None => {
            let default_path = config::default_config_path();
            if default_path.exists() {
                debug!("Loading config from {}", default_path.display());
                RcptConfig::from_file(&default_path)?
            } else {
                RcptConfig::default()
            }
        }
    };

    if let Some(dir) = data_dir {
        config.storage.data_dir = dir;
    }

    Ok(config)
}

/// Lower-cased file extension.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Recognizer chosen by input file type.
pub enum FileRecognizer {
    Text(PlainTextRecognizer),
    Ocr(PureOcrRecognizer),
}

impl FileRecognizer {
    /// Pick a recognizer for `path`, loading OCR models only for images.
    pub fn for_path(
        path: &Path,
        config: &RcptConfig,
        model_dir: Option<&Path>,
    ) -> anyhow::Result<Self> {
        let extension = extension_of(path);

        if TEXT_EXTENSIONS.contains(&extension.as_str()) {
            return Ok(FileRecognizer::Text(PlainTextRecognizer::new()));
        }

        if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            return Ok(FileRecognizer::Ocr(load_ocr(config, model_dir)?));
        }

        anyhow::bail!("Unsupported file format: {}", extension)
    }
}

impl Recognizer for FileRecognizer {
    fn name(&self) -> &str {
        match self {
            FileRecognizer::Text(r) => r.name(),
            FileRecognizer::Ocr(r) => r.name(),
        }
    }

    fn recognize(&self, image: &[u8]) -> Result<RecognizedText, RecognitionError> {
        match self {
            FileRecognizer::Text(r) => r.recognize(image),
            FileRecognizer::Ocr(r) => r.recognize(image),
        }
    }
}

/// Load the OCR engine from the configured (or overridden) model directory.
pub fn load_ocr(config: &RcptConfig, model_dir: Option<&Path>) -> anyhow::Result<PureOcrRecognizer> {
    let mut ocr = config.ocr.clone();
    if let Some(dir) = model_dir {
        ocr.model_dir = dir.to_path_buf();
    }

    PureOcrRecognizer::from_config(&ocr).map_err(|e| {
        anyhow::anyhow!(
            "{}\n\nPlace {}, {} and {} in {} or pass --model-dir.",
            e,
            ocr.detection_model,
            ocr.recognition_model,
            ocr.dictionary,
            ocr.model_dir.display()
        )
    })
}

/// Apply stored transactions to the owner's budget plan, if there is one.
///
/// Returns the new running total.
pub fn apply_to_budget(
    config: &RcptConfig,
    owner: &OwnerId,
    transactions: &[StoredTransaction],
) -> anyhow::Result<Option<rust_decimal::Decimal>> {
    if transactions.is_empty() {
        return Ok(None);
    }

    let mut book = BudgetBook::load(config.storage.budgets_path())?;
    let Some(plan) = book.get_mut(owner) else {
        debug!("No budget plan for {}", owner);
        return Ok(None);
    };

    for transaction in transactions {
        plan.apply(transaction)?;
    }
    let total = plan.total_budget;
    book.save()?;

    Ok(Some(total))
}
