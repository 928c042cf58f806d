//! Scan service: recognize, extract and persist a receipt.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::error::{RecognitionError, Result};
use crate::models::config::{DatePolicy, OcrConfig};
use crate::models::transaction::{OwnedCandidate, OwnerId, StoredTransaction};
use crate::ocr::{RecognizedText, Recognizer};
use crate::receipt::ReceiptExtractor;
use crate::store::TransactionStore;

/// Orchestrates one receipt scan per call. Holds no per-scan state, so a
/// single service can serve concurrent scans.
pub struct ScanService<R: Recognizer, S: TransactionStore> {
    recognizer: Arc<R>,
    store: S,
    extractor: ReceiptExtractor,
    timeout: Duration,
    max_image_bytes: usize,
}

impl<R: Recognizer, S: TransactionStore> ScanService<R, S> {
    pub fn new(recognizer: R, store: S, extractor: ReceiptExtractor, config: &OcrConfig) -> Self {
        Self {
            recognizer: Arc::new(recognizer),
            store,
            extractor,
            timeout: Duration::from_millis(config.timeout_ms),
            max_image_bytes: config.max_image_bytes,
        }
    }

    /// Set the recognition timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the extractor's missing-date policy.
    pub fn with_date_policy(mut self, policy: DatePolicy) -> Self {
        self.extractor = self.extractor.with_date_policy(policy);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Scan a receipt image and store the resulting expense for `owner`.
    pub async fn scan(&self, owner: OwnerId, image: Vec<u8>) -> Result<StoredTransaction> {
        let start = Instant::now();
        let owned = self.preview_on(owner, image, Local::now().date_naive()).await?;

        let stored = self.store.insert(owned.into_new_transaction())?;

        info!(
            "Stored {} {} for {} in {}ms",
            stored.record.kind,
            stored.record.amount,
            stored.owner_id(),
            start.elapsed().as_millis()
        );
        Ok(stored)
    }

    /// Scan a receipt image without storing anything.
    pub async fn preview(&self, owner: OwnerId, image: Vec<u8>) -> Result<OwnedCandidate> {
        self.preview_on(owner, image, Local::now().date_naive()).await
    }

    /// Scan with an explicit processing date.
    pub async fn preview_on(
        &self,
        owner: OwnerId,
        image: Vec<u8>,
        today: NaiveDate,
    ) -> Result<OwnedCandidate> {
        let text = self.recognize(image).await?;
        Ok(self.extractor.extract_for(owner, text.as_str(), today)?)
    }

    /// Run the recognizer on the blocking pool under the timeout.
    pub async fn recognize(&self, image: Vec<u8>) -> Result<RecognizedText> {
        if image.is_empty() {
            return Err(RecognitionError::EmptyImage.into());
        }
        if image.len() > self.max_image_bytes {
            return Err(RecognitionError::ImageTooLarge {
                size: image.len(),
                limit: self.max_image_bytes,
            }
            .into());
        }

        let recognizer = Arc::clone(&self.recognizer);
        debug!(
            "Recognizing {} bytes with {}",
            image.len(),
            recognizer.name()
        );

        let task = tokio::task::spawn_blocking(move || recognizer.recognize(&image));
        let text = match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result?,
            Ok(Err(join_error)) => {
                warn!("Recognition task failed: {}", join_error);
                return Err(RecognitionError::Cancelled.into());
            }
            Err(_) => {
                let ms = self.timeout.as_millis() as u64;
                warn!("Recognition timed out after {}ms", ms);
                return Err(RecognitionError::TimedOut(ms).into());
            }
        };

        if text.is_blank() {
            return Err(RecognitionError::NoText.into());
        }
        Ok(text)
    }
}
