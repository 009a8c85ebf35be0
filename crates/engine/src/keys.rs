//! Keyspace convention.
//!
//! Every stored entity lives under `kind:user_id:entity_id`. Scanning
//! `kind:user_id:` therefore enumerates exactly one user's entities of one
//! kind. Components may not be empty and may not contain the separator, which
//! keeps distinct `(kind, user, entity)` triples from ever mapping to the same
//! key.

use uuid::Uuid;

use crate::{EngineError, ResultEngine};

const SEPARATOR: char = ':';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Transaction,
    Budget,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transaction => "transaction",
            Self::Budget => "budget",
        }
    }

    /// Human readable label used in not-found messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Transaction => "Transaction",
            Self::Budget => "Budget",
        }
    }
}

fn component<'a>(value: &'a str, label: &str) -> ResultEngine<&'a str> {
    if value.is_empty() {
        return Err(EngineError::InvalidKey(format!("{label} must not be empty")));
    }
    if value.contains(SEPARATOR) {
        return Err(EngineError::InvalidKey(format!(
            "{label} must not contain '{SEPARATOR}'"
        )));
    }
    Ok(value)
}

/// Storage key of one entity.
pub fn entity_key(kind: EntityKind, user_id: &str, entity_id: &str) -> ResultEngine<String> {
    let user_id = component(user_id, "user id")?;
    let entity_id = component(entity_id, "entity id")?;
    Ok(format!(
        "{}{SEPARATOR}{user_id}{SEPARATOR}{entity_id}",
        kind.as_str()
    ))
}

/// Prefix shared by every key of `kind` owned by `user_id`.
pub fn user_prefix(kind: EntityKind, user_id: &str) -> ResultEngine<String> {
    let user_id = component(user_id, "user id")?;
    Ok(format!("{}{SEPARATOR}{user_id}{SEPARATOR}", kind.as_str()))
}

/// Fresh entity identifier: 128 random bits, hyphenated hex.
pub fn new_entity_id() -> String {
    Uuid::new_v4().to_string()
}
