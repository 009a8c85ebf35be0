use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{MoneyCents, ResultEngine, TransactionKind, budgets::total_overflow};

use super::Engine;

/// Dashboard totals over every transaction of a user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_income: MoneyCents,
    pub total_expenses: MoneyCents,
    /// Income minus expenses.
    pub balance: MoneyCents,
    pub transaction_count: usize,
    pub expenses_by_category: BTreeMap<String, MoneyCents>,
}

impl Engine {
    pub async fn summary(&self, user_id: &str) -> ResultEngine<Summary> {
        let txs = self.list_transactions(user_id).await?;

        let mut summary = Summary {
            transaction_count: txs.len(),
            ..Summary::default()
        };
        for tx in &txs {
            match tx.kind {
                TransactionKind::Income => {
                    summary.total_income = summary
                        .total_income
                        .checked_add(tx.amount)
                        .ok_or_else(total_overflow)?;
                }
                TransactionKind::Expense => {
                    summary.total_expenses = summary
                        .total_expenses
                        .checked_add(tx.amount)
                        .ok_or_else(total_overflow)?;
                    let spent = summary
                        .expenses_by_category
                        .entry(tx.category.clone())
                        .or_default();
                    *spent = spent.checked_add(tx.amount).ok_or_else(total_overflow)?;
                }
            }
        }
        summary.balance = summary
            .total_income
            .checked_sub(summary.total_expenses)
            .ok_or_else(total_overflow)?;

        Ok(summary)
    }
}
