use chrono::Utc;

use crate::{
    Budget, BudgetCmd, BudgetStatus, ResultEngine, Transaction,
    budgets::aggregate,
    keys::{EntityKind, entity_key, new_entity_id},
};

use super::{Engine, not_found, owned_key};

impl Engine {
    /// Budgets of `user_id` with `spent`/`remaining` derived from the current
    /// transactions.
    pub async fn list_budgets(&self, user_id: &str) -> ResultEngine<Vec<BudgetStatus>> {
        let mut budgets: Vec<Budget> = self.scan(EntityKind::Budget, user_id).await?;
        budgets.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        let txs: Vec<Transaction> = self.scan(EntityKind::Transaction, user_id).await?;
        aggregate(budgets, &txs)
    }

    pub async fn create_budget(&self, user_id: &str, cmd: BudgetCmd) -> ResultEngine<Budget> {
        cmd.validate()?;
        let id = new_entity_id();
        let key = entity_key(EntityKind::Budget, user_id, &id)?;
        let now = Utc::now();
        let budget = cmd.into_budget(id, user_id, now, now);

        self.save(&key, &budget).await?;
        tracing::debug!(user_id, id = %budget.id, category = %budget.category, "budget created");
        Ok(budget)
    }

    pub async fn update_budget(
        &self,
        user_id: &str,
        id: &str,
        cmd: BudgetCmd,
    ) -> ResultEngine<Budget> {
        cmd.validate()?;
        let key = owned_key(EntityKind::Budget, user_id, id)?;
        let previous: Budget = self
            .load(&key)
            .await?
            .ok_or_else(|| not_found(EntityKind::Budget))?;

        let budget = cmd.into_budget(previous.id, user_id, previous.created_at, Utc::now());
        self.save(&key, &budget).await?;
        tracing::debug!(user_id, id, "budget updated");
        Ok(budget)
    }

    pub async fn delete_budget(&self, user_id: &str, id: &str) -> ResultEngine<()> {
        let key = owned_key(EntityKind::Budget, user_id, id)?;
        if self.load::<Budget>(&key).await?.is_none() {
            return Err(not_found(EntityKind::Budget));
        }

        self.store.delete(&key).await?;
        tracing::debug!(user_id, id, "budget deleted");
        Ok(())
    }
}
