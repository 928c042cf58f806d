//! Transaction data models.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

/// Identity of the authenticated user a transaction belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Direction of money flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    #[default]
    Expense,
    Income,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Expense => "expense",
            TransactionKind::Income => "income",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Repeat interval of a recurring transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurringInterval {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// A transaction extracted from a receipt, before persistence.
///
/// Fields are private: a candidate is only produced by the transaction
/// builder and cannot be altered afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionCandidate {
    kind: TransactionKind,
    amount: Decimal,
    date: NaiveDate,
    description: String,
    category: String,
}

impl TransactionCandidate {
    pub(crate) fn new(
        kind: TransactionKind,
        amount: Decimal,
        date: NaiveDate,
        description: String,
        category: String,
    ) -> Self {
        Self {
            kind,
            amount,
            date,
            description,
            category,
        }
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

/// A candidate tagged with the user who initiated the scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnedCandidate {
    pub owner_id: OwnerId,
    pub candidate: TransactionCandidate,
}

impl OwnedCandidate {
    /// Build the write handed to the transaction store.
    pub fn into_new_transaction(self) -> NewTransaction {
        let TransactionCandidate {
            kind,
            amount,
            date,
            description,
            category,
        } = self.candidate;

        NewTransaction {
            kind,
            amount,
            description,
            category,
            date,
            owner_id: self.owner_id,
            is_recurring: false,
            recurring_interval: None,
        }
    }
}

/// Write shape accepted by a transaction store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
    pub owner_id: OwnerId,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_interval: Option<RecurringInterval>,
}

impl NewTransaction {
    /// Check the record before it is written.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.amount <= Decimal::ZERO {
            return Err(StoreError::invalid("amount", "must be positive"));
        }
        if self.category.trim().is_empty() {
            return Err(StoreError::invalid("category", "is required"));
        }
        if self.owner_id.as_str().is_empty() {
            return Err(StoreError::invalid("owner_id", "is required"));
        }
        if self.is_recurring && self.recurring_interval.is_none() {
            return Err(StoreError::invalid(
                "recurring_interval",
                "is required for recurring transactions",
            ));
        }
        Ok(())
    }
}

/// A persisted transaction record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTransaction {
    pub id: Uuid,
    #[serde(flatten)]
    pub record: NewTransaction,
    pub created_at: DateTime<Utc>,
}

impl StoredTransaction {
    pub(crate) fn from_new(record: NewTransaction) -> Self {
        Self {
            id: Uuid::new_v4(),
            record,
            created_at: Utc::now(),
        }
    }

    pub fn owner_id(&self) -> &OwnerId {
        &self.record.owner_id
    }
}

/// Partial update of a stored transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionPatch {
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub is_recurring: Option<bool>,
    pub recurring_interval: Option<RecurringInterval>,
}

impl TransactionPatch {
    /// Apply the patch to a copy of `record`, validating the result.
    pub fn apply_to(&self, record: &NewTransaction) -> Result<NewTransaction, StoreError> {
        let mut updated = record.clone();
        if let Some(amount) = self.amount {
            updated.amount = amount;
        }
        if let Some(description) = &self.description {
            updated.description = description.clone();
        }
        if let Some(category) = &self.category {
            updated.category = category.clone();
        }
        if let Some(date) = self.date {
            updated.date = date;
        }
        if let Some(is_recurring) = self.is_recurring {
            updated.is_recurring = is_recurring;
            if !is_recurring {
                updated.recurring_interval = None;
            }
        }
        if self.recurring_interval.is_some() {
            updated.recurring_interval = self.recurring_interval;
        }
        updated.validate()?;
        Ok(updated)
    }
}
