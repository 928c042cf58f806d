//! Assembles matched fields into a transaction candidate.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::Rejection;
use crate::models::config::{DatePolicy, ExtractionConfig};
use crate::models::transaction::{TransactionCandidate, TransactionKind};

use super::rules::amounts::AmountToken;

/// Fields found by the matchers for one receipt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchedFields {
    pub amount: Option<AmountToken>,
    pub date: Option<NaiveDate>,
    pub merchant: Option<String>,
    pub category: Option<String>,
}

/// Builds candidates from matched fields.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    date_policy: DatePolicy,
    fallback_category: String,
    placeholder_description: String,
}

impl TransactionBuilder {
    /// Lenient builder with the default fallback labels.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            date_policy: config.date_policy,
            fallback_category: config.fallback_category.clone(),
            placeholder_description: config.placeholder_description.clone(),
        }
    }

    /// Set the missing-date policy.
    pub fn with_date_policy(mut self, policy: DatePolicy) -> Self {
        self.date_policy = policy;
        self
    }

    pub fn date_policy(&self) -> DatePolicy {
        self.date_policy
    }

    /// Build a candidate. `today` is used when the receipt has no usable
    /// date and the policy is lenient.
    pub fn build(
        &self,
        fields: MatchedFields,
        lines: &[String],
        today: NaiveDate,
    ) -> Result<TransactionCandidate, Rejection> {
        let token = fields.amount.ok_or(Rejection::MissingAmount)?;
        let amount = token
            .value
            .filter(|v| *v > Decimal::ZERO)
            .ok_or(Rejection::InvalidAmount)?;

        let date = match (fields.date, self.date_policy) {
            (Some(date), _) => date,
            (None, DatePolicy::Lenient) => today,
            (None, DatePolicy::Strict) => return Err(Rejection::MissingDate),
        };

        let description = fields
            .merchant
            .or_else(|| lines.first().cloned())
            .unwrap_or_else(|| self.placeholder_description.clone());

        let category = fields
            .category
            .unwrap_or_else(|| self.fallback_category.clone());

        Ok(TransactionCandidate::new(
            TransactionKind::Expense,
            amount,
            date,
            description,
            category,
        ))
    }
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    fn token(raw: &str) -> Option<AmountToken> {
        Some(AmountToken {
            raw: raw.to_string(),
            value: Decimal::from_str(raw).ok(),
        })
    }

    #[test]
    fn test_missing_amount() {
        let result = TransactionBuilder::new().build(MatchedFields::default(), &[], today());
        assert_eq!(result, Err(Rejection::MissingAmount));
    }

    #[test]
    fn test_zero_amount_is_invalid() {
        let fields = MatchedFields {
            amount: token("0.00"),
            ..Default::default()
        };
        let result = TransactionBuilder::new().build(fields, &[], today());
        assert_eq!(result, Err(Rejection::InvalidAmount));
    }

    #[test]
    fn test_unparseable_amount_is_invalid() {
        let fields = MatchedFields {
            amount: Some(AmountToken {
                raw: "1.2.3".to_string(),
                value: None,
            }),
            ..Default::default()
        };
        let result = TransactionBuilder::new().build(fields, &[], today());
        assert_eq!(result, Err(Rejection::InvalidAmount));
    }

    #[test]
    fn test_lenient_defaults() {
        let fields = MatchedFields {
            amount: token("10"),
            ..Default::default()
        };
        let candidate = TransactionBuilder::new().build(fields, &[], today()).unwrap();

        assert_eq!(candidate.kind(), TransactionKind::Expense);
        assert_eq!(candidate.date(), today());
        assert_eq!(candidate.description(), "Scanned from receipt");
        assert_eq!(candidate.category(), "General");
    }

    #[test]
    fn test_description_falls_back_to_first_line() {
        let fields = MatchedFields {
            amount: token("10"),
            ..Default::default()
        };
        let lines = vec!["Corner Cafe".to_string(), "Rs 10".to_string()];
        let candidate = TransactionBuilder::new().build(fields, &lines, today()).unwrap();
        assert_eq!(candidate.description(), "Corner Cafe");
    }

    #[test]
    fn test_strict_requires_date() {
        let builder = TransactionBuilder::new().with_date_policy(DatePolicy::Strict);
        let fields = MatchedFields {
            amount: token("10"),
            ..Default::default()
        };
        assert_eq!(builder.build(fields.clone(), &[], today()), Err(Rejection::MissingDate));

        let dated = MatchedFields {
            date: NaiveDate::from_ymd_opt(2024, 8, 15),
            ..fields
        };
        let candidate = builder.build(dated, &[], today()).unwrap();
        assert_eq!(candidate.date(), NaiveDate::from_ymd_opt(2024, 8, 15).unwrap());
    }

    #[test]
    fn test_amount_checked_before_date() {
        let builder = TransactionBuilder::new().with_date_policy(DatePolicy::Strict);
        assert_eq!(
            builder.build(MatchedFields::default(), &[], today()),
            Err(Rejection::MissingAmount)
        );
    }
}
