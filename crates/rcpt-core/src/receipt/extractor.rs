//! Receipt extractor combining normalization, field matchers and the builder.

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::error::RcptError;
use crate::models::config::{DatePolicy, ExtractionConfig};
use crate::models::transaction::{OwnedCandidate, OwnerId, TransactionCandidate};

use super::builder::{MatchedFields, TransactionBuilder};
use super::normalize::normalize_lines;
use super::rules::{
    amounts::AmountMatcher, category::CategoryMatcher, dates::DateMatcher,
    merchant::MerchantMatcher, FieldExtractor,
};
use super::Result;

/// Turns recognized receipt text into a transaction candidate.
///
/// Holds only compiled patterns and labels; safe to share across threads.
pub struct ReceiptExtractor {
    amounts: AmountMatcher,
    dates: DateMatcher,
    categories: CategoryMatcher,
    merchants: MerchantMatcher,
    builder: TransactionBuilder,
}

impl ReceiptExtractor {
    /// Lenient extractor with default markers and keywords.
    pub fn new() -> Self {
        Self {
            amounts: AmountMatcher::new(),
            dates: DateMatcher::new(),
            categories: CategoryMatcher::default(),
            merchants: MerchantMatcher::new(),
            builder: TransactionBuilder::new(),
        }
    }

    /// Extractor configured from [`ExtractionConfig`].
    pub fn from_config(config: &ExtractionConfig) -> std::result::Result<Self, RcptError> {
        let amounts = AmountMatcher::with_markers(&config.currency_markers)
            .map_err(|e| RcptError::Config(format!("invalid currency marker: {}", e)))?;

        Ok(Self {
            amounts,
            dates: DateMatcher::new(),
            categories: CategoryMatcher::new(&config.category_keywords),
            merchants: MerchantMatcher::new(),
            builder: TransactionBuilder::from_config(config),
        })
    }

    /// Override the missing-date policy.
    pub fn with_date_policy(mut self, policy: DatePolicy) -> Self {
        self.builder = self.builder.with_date_policy(policy);
        self
    }

    pub fn date_policy(&self) -> DatePolicy {
        self.builder.date_policy()
    }

    /// Run every field matcher over the text.
    pub fn match_fields(&self, text: &str) -> MatchedFields {
        let fields = MatchedFields {
            amount: self.amounts.find_total(text).map(|m| m.value),
            date: self.dates.extract(text).map(|m| m.value),
            merchant: self.merchants.extract(text).map(|m| m.value),
            category: self.categories.extract(text),
        };

        debug!(
            "Matched amount={:?} date={:?} merchant={:?} category={:?}",
            fields.amount.as_ref().map(|a| a.raw.as_str()),
            fields.date,
            fields.merchant,
            fields.category
        );

        fields
    }

    /// Extract a candidate, using `today` for a missing date.
    pub fn extract(&self, text: &str, today: NaiveDate) -> Result<TransactionCandidate> {
        let lines = normalize_lines(text);
        let fields = self.match_fields(text);

        self.builder.build(fields, &lines, today).inspect_err(|reason| {
            info!("Receipt rejected: {}", reason);
        })
    }

    /// Extract a candidate for `owner` using the local date.
    pub fn extract_now(&self, owner: OwnerId, text: &str) -> Result<OwnedCandidate> {
        self.extract_for(owner, text, Local::now().date_naive())
    }

    /// Extract a candidate and tag it with the user who initiated the scan.
    pub fn extract_for(
        &self,
        owner: OwnerId,
        text: &str,
        today: NaiveDate,
    ) -> Result<OwnedCandidate> {
        let candidate = self.extract(text, today)?;
        debug!(
            "Extracted {} {} for {}",
            candidate.kind(),
            candidate.amount(),
            owner
        );
        Ok(OwnedCandidate {
            owner_id: owner,
            candidate,
        })
    }
}

impl Default for ReceiptExtractor {
    fn default() -> Self {
        Self::new()
    }
}
