//! Transaction persistence seam.

mod budget_book;
mod json_file;
mod memory;

pub use budget_book::BudgetBook;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use uuid::Uuid;

use crate::error::StoreError;
use crate::models::transaction::{NewTransaction, OwnerId, StoredTransaction, TransactionPatch};

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Durable storage for transaction records.
///
/// Every read and write is scoped to an owner; records of other owners are
/// reported as [`StoreError::NotFound`].
pub trait TransactionStore: Send + Sync {
    /// Validate and persist a new record.
    fn insert(&self, record: NewTransaction) -> Result<StoredTransaction>;

    /// All records of `owner`, newest date first.
    fn list(&self, owner: &OwnerId) -> Result<Vec<StoredTransaction>>;

    /// One record of `owner`.
    fn get(&self, owner: &OwnerId, id: Uuid) -> Result<StoredTransaction>;

    /// Apply a patch to one record of `owner`.
    fn update(&self, owner: &OwnerId, id: Uuid, patch: &TransactionPatch)
        -> Result<StoredTransaction>;
}

/// Records of `owner` sorted by date, newest first.
pub(crate) fn owned_by(records: &[StoredTransaction], owner: &OwnerId) -> Vec<StoredTransaction> {
    let mut owned: Vec<StoredTransaction> = records
        .iter()
        .filter(|r| r.owner_id() == owner)
        .cloned()
        .collect();
    owned.sort_by(|a, b| {
        b.record
            .date
            .cmp(&a.record.date)
            .then(b.created_at.cmp(&a.created_at))
    });
    owned
}

/// Patch the record `id` of `owner` in place.
pub(crate) fn patch_in(
    records: &mut [StoredTransaction],
    owner: &OwnerId,
    id: Uuid,
    patch: &TransactionPatch,
) -> Result<StoredTransaction> {
    let stored = records
        .iter_mut()
        .find(|r| r.id == id && r.owner_id() == owner)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

    stored.record = patch.apply_to(&stored.record)?;
    Ok(stored.clone())
}
