//! Whole-account operations: export, import and account deletion.
//!
//! Import and deletion touch many keys. They run one key at a time with no
//! rollback, so a store failure midway leaves the account partially imported
//! or partially deleted. The error is returned to the caller and the progress
//! reached is logged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    Budget, BudgetCmd, ResultEngine, Transaction, TransactionCmd,
    keys::{EntityKind, entity_key, new_entity_id},
};

use super::Engine;

pub const EXPORT_VERSION: &str = "1.0";

/// Snapshot of everything a user owns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Export {
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

/// Number of entities affected by an import or an account deletion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccountCounts {
    pub transactions: usize,
    pub budgets: usize,
}

impl Engine {
    pub async fn export(&self, user_id: &str) -> ResultEngine<Export> {
        let transactions = self.list_transactions(user_id).await?;
        let budgets: Vec<Budget> = self.scan(EntityKind::Budget, user_id).await?;

        Ok(Export {
            transactions,
            budgets,
            export_date: Utc::now(),
            version: EXPORT_VERSION.to_string(),
        })
    }

    /// Writes every item as a new entity owned by `user_id`, with a fresh id.
    ///
    /// All items are validated before the first write.
    pub async fn import(
        &self,
        user_id: &str,
        transactions: Vec<TransactionCmd>,
        budgets: Vec<BudgetCmd>,
    ) -> ResultEngine<AccountCounts> {
        for cmd in &transactions {
            cmd.validate()?;
        }
        for cmd in &budgets {
            cmd.validate()?;
        }

        let mut counts = AccountCounts::default();
        let now = Utc::now();

        for cmd in transactions {
            let id = new_entity_id();
            let key = entity_key(EntityKind::Transaction, user_id, &id)?;
            let tx = cmd.into_transaction(id, user_id, now, now);
            if let Err(err) = self.save(&key, &tx).await {
                tracing::error!(user_id, ?counts, "import aborted: {err}");
                return Err(err);
            }
            self.expense_changed(&tx);
            counts.transactions += 1;
        }

        for cmd in budgets {
            let id = new_entity_id();
            let key = entity_key(EntityKind::Budget, user_id, &id)?;
            let budget = cmd.into_budget(id, user_id, now, now);
            if let Err(err) = self.save(&key, &budget).await {
                tracing::error!(user_id, ?counts, "import aborted: {err}");
                return Err(err);
            }
            counts.budgets += 1;
        }

        tracing::info!(user_id, ?counts, "import completed");
        Ok(counts)
    }

    /// Deletes every transaction and budget of `user_id`.
    ///
    /// The identity record itself is left to the identity provider.
    pub async fn delete_account(&self, user_id: &str) -> ResultEngine<AccountCounts> {
        let mut counts = AccountCounts::default();

        let txs: Vec<Transaction> = self.scan(EntityKind::Transaction, user_id).await?;
        for tx in txs {
            let key = entity_key(EntityKind::Transaction, user_id, &tx.id)?;
            if let Err(err) = self.store.delete(&key).await {
                tracing::error!(user_id, ?counts, "account deletion aborted: {err}");
                return Err(err.into());
            }
            counts.transactions += 1;
        }

        let budgets: Vec<Budget> = self.scan(EntityKind::Budget, user_id).await?;
        for budget in budgets {
            let key = entity_key(EntityKind::Budget, user_id, &budget.id)?;
            if let Err(err) = self.store.delete(&key).await {
                tracing::error!(user_id, ?counts, "account deletion aborted: {err}");
                return Err(err.into());
            }
            counts.budgets += 1;
        }

        tracing::info!(user_id, ?counts, "account data deleted");
        Ok(counts)
    }
}
