//! Personal finance domain: transactions, budgets and the per-user keyspace
//! they are stored under.

pub use budgets::{Budget, BudgetCmd, BudgetPeriod, BudgetStatus, aggregate, spent_in_category};
pub use error::EngineError;
pub use keys::{EntityKind, entity_key, new_entity_id, user_prefix};
pub use kv_store::SqlStore;
pub use money::MoneyCents;
pub use ops::{AccountCounts, EXPORT_VERSION, Engine, EngineBuilder, Export, Summary};
pub use store::{KvStore, StoreError};
pub use transactions::{Transaction, TransactionCmd, TransactionKind};

mod budgets;
mod error;
mod keys;
mod kv_store;
mod money;
mod ops;
mod store;
mod transactions;

type ResultEngine<T> = Result<T, EngineError>;
