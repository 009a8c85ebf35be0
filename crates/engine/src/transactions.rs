//! Transaction records.
//!
//! A `Transaction` is a single income or expense entry. The amount is always
//! non-negative; `kind` carries the direction.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

/// Stored and returned as-is, camelCased.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub amount: MoneyCents,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }
}

/// User supplied content of a transaction, used for both create and replace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionCmd {
    pub amount: MoneyCents,
    pub kind: TransactionKind,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
}

impl TransactionCmd {
    pub(crate) fn validate(&self) -> ResultEngine<()> {
        if self.amount.is_negative() {
            return Err(EngineError::InvalidAmount(
                "amount must not be negative".to_string(),
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

    pub(crate) fn into_transaction(
        self,
        id: String,
        user_id: &str,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Transaction {
        Transaction {
            id,
            user_id: user_id.to_string(),
            amount: self.amount,
            kind: self.kind,
            category: self.category.trim().to_string(),
            description: self.description.trim().to_string(),
            date: self.date,
            created_at,
            updated_at,
        }
    }
}
