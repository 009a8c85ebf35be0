use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};

use crate::{
    EngineError, ResultEngine, Transaction,
    keys::{EntityKind, entity_key, user_prefix},
    store::KvStore,
};

mod account;
mod budgets;
mod summary;
mod transactions;

pub use account::{AccountCounts, EXPORT_VERSION, Export};
pub use summary::Summary;

/// Entry point of every user-facing operation.
///
/// Stateless apart from the injected store handle: each call reads what it
/// needs from the store and writes back one key at a time.
#[derive(Debug)]
pub struct Engine {
    store: Arc<dyn KvStore>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    async fn load<T: DeserializeOwned>(&self, key: &str) -> ResultEngine<Option<T>> {
        self.store
            .get(key)
            .await?
            .map(serde_json::from_value)
            .transpose()
            .map_err(Into::into)
    }

    async fn save<T: Serialize>(&self, key: &str, value: &T) -> ResultEngine<()> {
        self.store.set(key, serde_json::to_value(value)?).await?;
        Ok(())
    }

    async fn scan<T: DeserializeOwned>(
        &self,
        kind: EntityKind,
        user_id: &str,
    ) -> ResultEngine<Vec<T>> {
        let prefix = user_prefix(kind, user_id)?;
        self.store
            .scan_by_prefix(&prefix)
            .await?
            .into_iter()
            .map(|value| serde_json::from_value(value).map_err(Into::into))
            .collect()
    }

    /// Runs after an expense is written or removed.
    ///
    /// Persists nothing; spending notifications would hook in here.
    fn expense_changed(&self, tx: &Transaction) {
        if tx.is_expense() {
            tracing::debug!(
                user_id = %tx.user_id,
                category = %tx.category,
                "budget spending changed"
            );
        }
    }
}

fn not_found(kind: EntityKind) -> EngineError {
    EngineError::KeyNotFound(kind.label().to_string())
}

/// Key of an existing entity addressed by the caller. An id that could never
/// have been issued is reported as not found.
fn owned_key(kind: EntityKind, user_id: &str, id: &str) -> ResultEngine<String> {
    user_prefix(kind, user_id)?;
    entity_key(kind, user_id, id).map_err(|_| not_found(kind))
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    store: Option<Arc<dyn KvStore>>,
}

impl EngineBuilder {
    /// Pass the required key-value store
    pub fn store(mut self, store: Arc<dyn KvStore>) -> EngineBuilder {
        self.store = Some(store);
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> ResultEngine<Engine> {
        let store = self
            .store
            .ok_or_else(|| EngineError::InvalidInput("a store is required".to_string()))?;
        Ok(Engine { store })
    }
}
