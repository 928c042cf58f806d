//! Budget plan: total budget, category allocations and savings goals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::BudgetError;
use super::transaction::{OwnerId, StoredTransaction, TransactionKind};

/// Budgeting strategy chosen by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetStrategy {
    #[serde(rename = "50/30/20")]
    FiftyThirtyTwenty,
    #[serde(rename = "Zero-based")]
    ZeroBased,
    #[serde(rename = "Envelope")]
    Envelope,
    #[default]
    #[serde(rename = "Custom")]
    Custom,
}

impl BudgetStrategy {
    /// Parse strategy from its display name.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "50/30/20" => Some(Self::FiftyThirtyTwenty),
            "zero-based" | "zero_based" | "zerobased" => Some(Self::ZeroBased),
            "envelope" => Some(Self::Envelope),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

/// Share of the total budget assigned to one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAllocation {
    pub name: String,
    /// Percentage of the total budget (0 - 100).
    pub percentage: Decimal,
    /// Spending limit derived from the percentage.
    pub limit: Decimal,
}

/// A user's budget configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetPlan {
    pub owner_id: OwnerId,
    pub total_budget: Decimal,
    #[serde(default)]
    pub categories: Vec<CategoryAllocation>,
    #[serde(default)]
    pub emergency_fund_goal: Decimal,
    #[serde(default)]
    pub monthly_savings_target: Decimal,
    #[serde(default)]
    pub strategy: BudgetStrategy,
    #[serde(default = "default_alerts")]
    pub alerts_enabled: bool,
}

fn default_alerts() -> bool {
    true
}

impl BudgetPlan {
    pub fn new(owner_id: OwnerId, total_budget: Decimal) -> Self {
        Self {
            owner_id,
            total_budget,
            categories: Vec::new(),
            emergency_fund_goal: Decimal::ZERO,
            monthly_savings_target: Decimal::ZERO,
            strategy: BudgetStrategy::Custom,
            alerts_enabled: true,
        }
    }

    /// Start a plan, refusing a negative starting total.
    ///
    /// The running total may later fall below zero through [`apply`].
    ///
    /// [`apply`]: BudgetPlan::apply
    pub fn try_new(owner_id: OwnerId, total_budget: Decimal) -> Result<Self, BudgetError> {
        if total_budget < Decimal::ZERO {
            return Err(BudgetError::Negative("total budget"));
        }
        Ok(Self::new(owner_id, total_budget))
    }

    /// Sum of all category percentages.
    pub fn allocated_percentage(&self) -> Decimal {
        self.categories.iter().map(|c| c.percentage).sum()
    }

    /// Allocate a share of the total budget to a category.
    pub fn add_category(
        &mut self,
        name: impl Into<String>,
        percentage: Decimal,
    ) -> Result<&CategoryAllocation, BudgetError> {
        let name = name.into();
        check_percentage(&name, percentage)?;

        if self.find_category(&name).is_some() {
            return Err(BudgetError::DuplicateCategory(name));
        }

        let total = self.allocated_percentage() + percentage;
        if total > Decimal::ONE_HUNDRED {
            return Err(BudgetError::OverAllocated(total.normalize().to_string()));
        }

        let limit = self.limit_for(percentage);
        self.categories.push(CategoryAllocation {
            name,
            percentage,
            limit,
        });
        Ok(&self.categories[self.categories.len() - 1])
    }

    /// Recompute every category limit from the current total.
    pub fn reallocate_limits(&mut self) {
        let total = self.total_budget;
        for category in &mut self.categories {
            category.limit = (total * category.percentage / Decimal::ONE_HUNDRED).round_dp(2);
        }
    }

    /// Check a plan loaded from storage.
    ///
    /// An overspent (negative) running total is valid.
    pub fn validate(&self) -> Result<(), BudgetError> {
        if self.emergency_fund_goal < Decimal::ZERO {
            return Err(BudgetError::Negative("emergency fund goal"));
        }
        if self.monthly_savings_target < Decimal::ZERO {
            return Err(BudgetError::Negative("monthly savings target"));
        }

        let mut seen: Vec<String> = Vec::new();
        for category in &self.categories {
            check_percentage(&category.name, category.percentage)?;
            let key = category.name.to_lowercase();
            if seen.contains(&key) {
                return Err(BudgetError::DuplicateCategory(category.name.clone()));
            }
            seen.push(key);
        }

        let total = self.allocated_percentage();
        if total > Decimal::ONE_HUNDRED {
            return Err(BudgetError::OverAllocated(total.normalize().to_string()));
        }
        Ok(())
    }

    /// Adjust the running total by a stored transaction.
    ///
    /// Expenses draw the total down, income tops it up.
    pub fn apply(&mut self, transaction: &StoredTransaction) -> Result<Decimal, BudgetError> {
        if transaction.owner_id() != &self.owner_id {
            return Err(BudgetError::OwnerMismatch {
                expected: self.owner_id.to_string(),
                found: transaction.owner_id().to_string(),
            });
        }

        match transaction.record.kind {
            TransactionKind::Expense => self.total_budget -= transaction.record.amount,
            TransactionKind::Income => self.total_budget += transaction.record.amount,
        }
        Ok(self.total_budget)
    }

    /// Compare spending in `transactions` with category limits.
    pub fn report(&self, transactions: &[StoredTransaction]) -> BudgetReport {
        let mut lines: Vec<CategorySpending> = self
            .categories
            .iter()
            .map(|c| CategorySpending {
                category: c.name.clone(),
                limit: c.limit,
                spent: Decimal::ZERO,
                remaining: c.limit,
                over_limit: false,
            })
            .collect();
        let mut unbudgeted = Decimal::ZERO;

        let expenses = transactions.iter().filter(|t| {
            t.owner_id() == &self.owner_id && t.record.kind == TransactionKind::Expense
        });

        for transaction in expenses {
            let category = transaction.record.category.to_lowercase();
            match lines
                .iter_mut()
                .find(|l| l.category.to_lowercase() == category)
            {
                Some(line) => line.spent += transaction.record.amount,
                None => unbudgeted += transaction.record.amount,
            }
        }

        for line in &mut lines {
            line.remaining = line.limit - line.spent;
            line.over_limit = line.spent > line.limit;
        }

        BudgetReport {
            owner_id: self.owner_id.clone(),
            total_budget: self.total_budget,
            categories: lines,
            unbudgeted,
        }
    }

    fn find_category(&self, name: &str) -> Option<&CategoryAllocation> {
        let name = name.to_lowercase();
        self.categories.iter().find(|c| c.name.to_lowercase() == name)
    }

    fn limit_for(&self, percentage: Decimal) -> Decimal {
        (self.total_budget * percentage / Decimal::ONE_HUNDRED).round_dp(2)
    }
}

fn check_percentage(name: &str, percentage: Decimal) -> Result<(), BudgetError> {
    if percentage < Decimal::ZERO || percentage > Decimal::ONE_HUNDRED {
        return Err(BudgetError::InvalidPercentage {
            category: name.to_string(),
            value: percentage.to_string(),
        });
    }
    Ok(())
}

/// Spending against one category limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySpending {
    pub category: String,
    pub limit: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub over_limit: bool,
}

/// Spending summary for a budget plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetReport {
    pub owner_id: OwnerId,
    pub total_budget: Decimal,
    pub categories: Vec<CategorySpending>,
    /// Expenses in categories the plan does not allocate.
    pub unbudgeted: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::NewTransaction;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn expense(owner: &str, category: &str, amount: &str) -> StoredTransaction {
        StoredTransaction::from_new(NewTransaction {
            kind: TransactionKind::Expense,
            amount: dec(amount),
            description: String::new(),
            category: category.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 8, 15).unwrap(),
            owner_id: OwnerId::new(owner),
            is_recurring: false,
            recurring_interval: None,
        })
    }

    #[test]
    fn test_add_category_computes_limit() {
        let mut plan = BudgetPlan::new(OwnerId::new("u1"), dec("50000"));
        let food = plan.add_category("Food", dec("30")).unwrap();
        assert_eq!(food.limit, dec("15000.00"));
    }

    #[test]
    fn test_over_allocation_rejected() {
        let mut plan = BudgetPlan::new(OwnerId::new("u1"), dec("1000"));
        plan.add_category("Rent", dec("70")).unwrap();
        assert_eq!(
            plan.add_category("Fun", dec("40")).unwrap_err(),
            BudgetError::OverAllocated("110".to_string())
        );
    }

    #[test]
    fn test_duplicate_category_is_case_insensitive() {
        let mut plan = BudgetPlan::new(OwnerId::new("u1"), dec("1000"));
        plan.add_category("Food", dec("10")).unwrap();
        assert!(matches!(
            plan.add_category("food", dec("10")),
            Err(BudgetError::DuplicateCategory(_))
        ));
    }

    #[test]
    fn test_invalid_percentage() {
        let mut plan = BudgetPlan::new(OwnerId::new("u1"), dec("1000"));
        assert!(matches!(
            plan.add_category("Food", dec("101")),
            Err(BudgetError::InvalidPercentage { .. })
        ));
    }

    #[test]
    fn test_apply_expense_and_income() {
        let mut plan = BudgetPlan::new(OwnerId::new("u1"), dec("1000"));
        plan.apply(&expense("u1", "Food", "250.50")).unwrap();
        assert_eq!(plan.total_budget, dec("749.50"));

        let mut income = expense("u1", "Salary", "100");
        income.record.kind = TransactionKind::Income;
        plan.apply(&income).unwrap();
        assert_eq!(plan.total_budget, dec("849.50"));
    }

    #[test]
    fn test_overspent_plan_stays_valid() {
        let mut plan = BudgetPlan::new(OwnerId::new("u1"), dec("100"));
        plan.add_category("Food", dec("50")).unwrap();
        plan.apply(&expense("u1", "Food", "150")).unwrap();

        assert_eq!(plan.total_budget, dec("-50"));
        assert_eq!(plan.validate(), Ok(()));
    }

    #[test]
    fn test_try_new_refuses_negative_total() {
        assert_eq!(
            BudgetPlan::try_new(OwnerId::new("u1"), dec("-1")).unwrap_err(),
            BudgetError::Negative("total budget")
        );
        assert!(BudgetPlan::try_new(OwnerId::new("u1"), Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_apply_refuses_other_owner() {
        let mut plan = BudgetPlan::new(OwnerId::new("u1"), dec("1000"));
        assert!(matches!(
            plan.apply(&expense("u2", "Food", "10")),
            Err(BudgetError::OwnerMismatch { .. })
        ));
        assert_eq!(plan.total_budget, dec("1000"));
    }

    #[test]
    fn test_report() {
        let mut plan = BudgetPlan::new(OwnerId::new("u1"), dec("1000"));
        plan.add_category("Food", dec("10")).unwrap();
        plan.add_category("Fuel", dec("20")).unwrap();

        let transactions = vec![
            expense("u1", "food", "80"),
            expense("u1", "Food", "40"),
            expense("u1", "General", "15"),
            expense("u2", "Fuel", "999"),
        ];
        let report = plan.report(&transactions);

        assert_eq!(report.categories[0].spent, dec("120"));
        assert_eq!(report.categories[0].remaining, dec("-20.00"));
        assert!(report.categories[0].over_limit);
        assert_eq!(report.categories[1].spent, Decimal::ZERO);
        assert!(!report.categories[1].over_limit);
        assert_eq!(report.unbudgeted, dec("15"));
    }

    #[test]
    fn test_strategy_serde_names() {
        let json = serde_json::to_string(&BudgetStrategy::FiftyThirtyTwenty).unwrap();
        assert_eq!(json, "\"50/30/20\"");
        assert_eq!(BudgetStrategy::from_str("Zero-based"), Some(BudgetStrategy::ZeroBased));
    }
}
