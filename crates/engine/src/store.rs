//! Key-value storage capability.
//!
//! The engine only needs four primitives from its datastore. Anything that
//! can provide them (the bundled [`SqlStore`], a managed KV service, a test
//! double) can back an [`Engine`].
//!
//! There is no multi-key atomicity: callers that touch several keys do so one
//! key at a time.
//!
//! [`SqlStore`]: crate::SqlStore
//! [`Engine`]: crate::Engine

use async_trait::async_trait;
use sea_orm::DbErr;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait KvStore: Send + Sync + std::fmt::Debug {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Inserts or overwrites `key`.
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Every value whose key starts with `prefix`, in no particular order.
    async fn scan_by_prefix(&self, prefix: &str) -> Result<Vec<Value>, StoreError>;
}
