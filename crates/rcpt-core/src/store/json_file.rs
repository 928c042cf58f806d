//! Transaction store backed by a JSON file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::transaction::{NewTransaction, OwnerId, StoredTransaction, TransactionPatch};

use super::{owned_by, patch_in, Result, TransactionStore};

/// Stores all records as one JSON array, rewritten on every write.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open a store at `path`. The file is created on first write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<StoredTransaction>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, records: &[StoredTransaction]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, content)?;
        debug!("Wrote {} records to {}", records.len(), self.path.display());
        Ok(())
    }
}

impl TransactionStore for JsonFileStore {
    fn insert(&self, record: NewTransaction) -> Result<StoredTransaction> {
        record.validate()?;
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;

        let mut records = self.load()?;
        let stored = StoredTransaction::from_new(record);
        records.push(stored.clone());
        self.save(&records)?;
        Ok(stored)
    }

    fn list(&self, owner: &OwnerId) -> Result<Vec<StoredTransaction>> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(owned_by(&self.load()?, owner))
    }

    fn get(&self, owner: &OwnerId, id: Uuid) -> Result<StoredTransaction> {
        self.list(owner)?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn update(
        &self,
        owner: &OwnerId,
        id: Uuid,
        patch: &TransactionPatch,
    ) -> Result<StoredTransaction> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;

        let mut records = self.load()?;
        let updated = patch_in(&mut records, owner, id, patch)?;
        self.save(&records)?;
        Ok(updated)
    }
}
