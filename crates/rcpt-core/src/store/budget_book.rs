//! Budget plans keyed by owner, stored as a JSON object.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{RcptError, StoreError};
use crate::models::budget::BudgetPlan;
use crate::models::transaction::OwnerId;

/// File-backed map of owner to budget plan.
#[derive(Debug)]
pub struct BudgetBook {
    path: PathBuf,
    plans: BTreeMap<OwnerId, BudgetPlan>,
}

impl BudgetBook {
    /// Load the book at `path`; a missing file is an empty book.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, RcptError> {
        let path = path.into();
        let plans: BTreeMap<OwnerId, BudgetPlan> = if path.exists() {
            let content = fs::read_to_string(&path).map_err(StoreError::from)?;
            serde_json::from_str(&content).map_err(StoreError::from)?
        } else {
            BTreeMap::new()
        };

        for plan in plans.values() {
            plan.validate()?;
        }

        Ok(Self { path, plans })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, owner: &OwnerId) -> Option<&BudgetPlan> {
        self.plans.get(owner)
    }

    pub fn get_mut(&mut self, owner: &OwnerId) -> Option<&mut BudgetPlan> {
        self.plans.get_mut(owner)
    }

    /// Insert or replace the plan of its owner.
    pub fn put(&mut self, plan: BudgetPlan) -> Result<(), RcptError> {
        plan.validate()?;
        self.plans.insert(plan.owner_id.clone(), plan);
        Ok(())
    }

    /// Write the book back to disk.
    pub fn save(&self) -> Result<(), RcptError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&self.plans).map_err(StoreError::from)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::{NewTransaction, StoredTransaction, TransactionKind};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[test]
    fn test_put_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("budgets.json");

        let mut book = BudgetBook::load(&path).unwrap();
        assert!(book.get(&OwnerId::new("u1")).is_none());

        let mut plan = BudgetPlan::new(OwnerId::new("u1"), Decimal::new(50000, 0));
        plan.add_category("Food", Decimal::new(30, 0)).unwrap();
        book.put(plan.clone()).unwrap();
        book.save().unwrap();

        let loaded = BudgetBook::load(&path).unwrap();
        assert_eq!(loaded.get(&OwnerId::new("u1")), Some(&plan));
    }

    #[test]
    fn test_overspent_plan_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("budgets.json");
        let owner = OwnerId::new("u1");

        let mut book = BudgetBook::load(&path).unwrap();
        book.put(BudgetPlan::new(owner.clone(), Decimal::new(100, 0)))
            .unwrap();
        let overspend = StoredTransaction::from_new(NewTransaction {
            kind: TransactionKind::Expense,
            amount: Decimal::new(150, 0),
            description: String::new(),
            category: "Food".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 8, 15).unwrap(),
            owner_id: owner.clone(),
            is_recurring: false,
            recurring_interval: None,
        });
        book.get_mut(&owner).unwrap().apply(&overspend).unwrap();
        book.save().unwrap();

        let mut reloaded = BudgetBook::load(&path).unwrap();
        assert_eq!(
            reloaded.get(&owner).map(|p| p.total_budget),
            Some(Decimal::new(-50, 0))
        );

        // Further spending keeps working.
        reloaded.get_mut(&owner).unwrap().apply(&overspend).unwrap();
        reloaded.save().unwrap();
        let again = BudgetBook::load(&path).unwrap();
        assert_eq!(
            again.get(&owner).map(|p| p.total_budget),
            Some(Decimal::new(-200, 0))
        );
    }

    #[test]
    fn test_load_rejects_invalid_plan() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("budgets.json");
        fs::write(
            &path,
            r#"{"u1": {"owner_id": "u1", "total_budget": "100",
                "categories": [{"name": "A", "percentage": "80", "limit": "80"},
                               {"name": "B", "percentage": "30", "limit": "30"}]}}"#,
        )
        .unwrap();

        assert!(matches!(BudgetBook::load(&path), Err(RcptError::Budget(_))));
    }
}
