//! Budgets and spending aggregation.
//!
//! A budget caps the spending of one category. `spent` and `remaining` are
//! never persisted: [`aggregate`] derives them from the live transaction set
//! each time budgets are read, across all time. The `period` is recorded for
//! the client but does not bound the sum.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents, ResultEngine, Transaction};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPeriod {
    Weekly,
    Monthly,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub user_id: String,
    pub category: String,
    /// Spending limit.
    pub amount: MoneyCents,
    pub period: BudgetPeriod,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A budget together with its derived figures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetStatus {
    #[serde(flatten)]
    pub budget: Budget,
    pub spent: MoneyCents,
    pub remaining: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BudgetCmd {
    pub category: String,
    pub amount: MoneyCents,
    pub period: BudgetPeriod,
}

impl BudgetCmd {
    pub(crate) fn validate(&self) -> ResultEngine<()> {
        if !self.amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "budget amount must be greater than zero".to_string(),
            ));
        }
        if self.amount > MoneyCents::MAX {
            return Err(EngineError::InvalidAmount(format!(
                "amount exceeds {}",
                MoneyCents::MAX
            )));
        }
        if self.category.trim().is_empty() {
            return Err(EngineError::InvalidInput(
                "category must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn into_budget(
        self,
        id: String,
        user_id: &str,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Budget {
        Budget {
            id,
            user_id: user_id.to_string(),
            category: self.category.trim().to_string(),
            amount: self.amount,
            period: self.period,
            created_at,
            updated_at,
        }
    }
}

pub(crate) fn total_overflow() -> EngineError {
    EngineError::InvalidAmount("total out of range".to_string())
}

/// Total expense amount recorded against `category`.
pub fn spent_in_category(transactions: &[Transaction], category: &str) -> ResultEngine<MoneyCents> {
    transactions
        .iter()
        .filter(|tx| tx.is_expense() && tx.category == category)
        .try_fold(MoneyCents::ZERO, |acc, tx| {
            acc.checked_add(tx.amount).ok_or_else(total_overflow)
        })
}

/// Pairs every budget with `spent`/`remaining` computed from `transactions`.
///
/// Both lists must belong to the same user. Runs in
/// `O(budgets × transactions)`.
pub fn aggregate(
    budgets: Vec<Budget>,
    transactions: &[Transaction],
) -> ResultEngine<Vec<BudgetStatus>> {
    budgets
        .into_iter()
        .map(|budget| {
            let spent = spent_in_category(transactions, &budget.category)?;
            let remaining = budget.amount.checked_sub(spent).ok_or_else(total_overflow)?;
            Ok(BudgetStatus {
                budget,
                spent,
                remaining,
            })
        })
        .collect()
}
