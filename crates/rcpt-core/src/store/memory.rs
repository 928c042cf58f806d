//! In-memory transaction store.

use std::sync::Mutex;

use uuid::Uuid;

use crate::error::StoreError;
use crate::models::transaction::{NewTransaction, OwnerId, StoredTransaction, TransactionPatch};

use super::{owned_by, patch_in, Result, TransactionStore};

/// Transaction store that keeps records in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<StoredTransaction>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records across all owners.
    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TransactionStore for MemoryStore {
    fn insert(&self, record: NewTransaction) -> Result<StoredTransaction> {
        record.validate()?;
        let stored = StoredTransaction::from_new(record);
        self.records
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .push(stored.clone());
        Ok(stored)
    }

    fn list(&self, owner: &OwnerId) -> Result<Vec<StoredTransaction>> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(owned_by(&records, owner))
    }

    fn get(&self, owner: &OwnerId, id: Uuid) -> Result<StoredTransaction> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        records
            .iter()
            .find(|r| r.id == id && r.owner_id() == owner)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn update(
        &self,
        owner: &OwnerId,
        id: Uuid,
        patch: &TransactionPatch,
    ) -> Result<StoredTransaction> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        patch_in(&mut records, owner, id, patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::TransactionKind;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn record(owner: &str, day: u32) -> NewTransaction {
        NewTransaction {
            kind: TransactionKind::Expense,
            amount: Decimal::new(1000, 2),
            description: format!("day {}", day),
            category: "General".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 8, day).unwrap(),
            owner_id: OwnerId::new(owner),
            is_recurring: false,
            recurring_interval: None,
        }
    }

    #[test]
    fn test_list_is_owner_scoped_and_newest_first() {
        let store = MemoryStore::new();
        store.insert(record("u1", 1)).unwrap();
        store.insert(record("u1", 20)).unwrap();
        store.insert(record("u2", 5)).unwrap();

        let listed = store.list(&OwnerId::new("u1")).unwrap();
        let days: Vec<&str> = listed.iter().map(|t| t.record.description.as_str()).collect();
        assert_eq!(days, vec!["day 20", "day 1"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_insert_validates() {
        let store = MemoryStore::new();
        let mut bad = record("u1", 1);
        bad.amount = Decimal::ZERO;
        assert!(matches!(store.insert(bad), Err(StoreError::Invalid { .. })));
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_other_owner_not_found() {
        let store = MemoryStore::new();
        let stored = store.insert(record("u1", 1)).unwrap();

        let patch = TransactionPatch {
            category: Some("Food".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            store.update(&OwnerId::new("u2"), stored.id, &patch),
            Err(StoreError::NotFound(_))
        ));

        let updated = store.update(&OwnerId::new("u1"), stored.id, &patch).unwrap();
        assert_eq!(updated.record.category, "Food");
        assert_eq!(
            store.get(&OwnerId::new("u1"), stored.id).unwrap().record.category,
            "Food"
        );
    }
}
