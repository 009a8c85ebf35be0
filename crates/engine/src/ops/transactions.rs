use chrono::Utc;

use crate::{
    ResultEngine, Transaction, TransactionCmd,
    keys::{EntityKind, entity_key, new_entity_id},
};

use super::{Engine, not_found, owned_key};

impl Engine {
    /// Every transaction of `user_id`, newest date first.
    pub async fn list_transactions(&self, user_id: &str) -> ResultEngine<Vec<Transaction>> {
        let mut txs: Vec<Transaction> = self.scan(EntityKind::Transaction, user_id).await?;
        txs.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(txs)
    }

    pub async fn create_transaction(
        &self,
        user_id: &str,
        cmd: TransactionCmd,
    ) -> ResultEngine<Transaction> {
        cmd.validate()?;
        let id = new_entity_id();
        let key = entity_key(EntityKind::Transaction, user_id, &id)?;
        let now = Utc::now();
        let tx = cmd.into_transaction(id, user_id, now, now);

        self.save(&key, &tx).await?;
        tracing::debug!(user_id, id = %tx.id, kind = tx.kind.as_str(), "transaction created");
        self.expense_changed(&tx);
        Ok(tx)
    }

    /// Replaces the whole content of an existing transaction.
    ///
    /// `id` and `createdAt` are preserved, `updatedAt` is refreshed.
    pub async fn update_transaction(
        &self,
        user_id: &str,
        id: &str,
        cmd: TransactionCmd,
    ) -> ResultEngine<Transaction> {
        cmd.validate()?;
        let key = owned_key(EntityKind::Transaction, user_id, id)?;
        let previous: Transaction = self
            .load(&key)
            .await?
            .ok_or_else(|| not_found(EntityKind::Transaction))?;

        let tx = cmd.into_transaction(previous.id.clone(), user_id, previous.created_at, Utc::now());
        self.save(&key, &tx).await?;
        tracing::debug!(user_id, id, "transaction updated");
        self.expense_changed(&previous);
        self.expense_changed(&tx);
        Ok(tx)
    }

    pub async fn delete_transaction(&self, user_id: &str, id: &str) -> ResultEngine<()> {
        let key = owned_key(EntityKind::Transaction, user_id, id)?;
        let tx: Transaction = self
            .load(&key)
            .await?
            .ok_or_else(|| not_found(EntityKind::Transaction))?;

        self.store.delete(&key).await?;
        tracing::debug!(user_id, id, "transaction deleted");
        self.expense_changed(&tx);
        Ok(())
    }
}
