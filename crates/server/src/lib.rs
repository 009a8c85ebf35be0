use api_types::ErrorResponse;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::IntoResponse,
};
use engine::EngineError;

pub use identity::{HttpIdentityProvider, IdentityError, IdentityProvider, IdentityUser};
pub use server::{ServerState, router, run_with_listener};

mod account;
mod budgets;
mod extract;
mod identity;
mod server;
mod statistics;
mod transactions;
mod user;

pub mod types {
    pub mod transaction {
        pub use api_types::transaction::{TransactionNew, TransactionType};
        pub use engine::Transaction;
    }

    pub mod budget {
        pub use api_types::budget::{BudgetNew, BudgetPeriod};
        pub use engine::{Budget, BudgetStatus};
    }

    pub mod data {
        pub use api_types::data::{DeleteAccountResponse, EntityCounts, ImportRequest, ImportResponse};
        pub use engine::Export;
    }

    pub mod user {
        pub use api_types::user::{Signup, SignupResponse, UserView};
    }

    pub mod stats {
        pub use engine::Summary;
    }
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Identity(IdentityError),
    Unauthorized,
    /// Failure of a collaborator; the detail is logged, never returned.
    Internal(String),
    Generic(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::InvalidAmount(_) | EngineError::InvalidKey(_) | EngineError::InvalidInput(_) => {
            StatusCode::BAD_REQUEST
        }
        EngineError::Storage(_) | EngineError::Serialization(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Storage(store_err) => {
            tracing::error!("storage error: {store_err}");
            "internal server error".to_string()
        }
        EngineError::Serialization(json_err) => {
            tracing::error!("unreadable record: {json_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

fn identity_error_response(err: IdentityError) -> (StatusCode, String) {
    match err {
        IdentityError::InvalidToken => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
        IdentityError::Rejected(message) => (StatusCode::BAD_REQUEST, message),
        other => {
            tracing::error!("identity provider failure: {other}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            )
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Identity(err) => identity_error_response(err),
            ServerError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ServerError::Internal(detail) => {
                tracing::error!("{detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<IdentityError> for ServerError {
    fn from(value: IdentityError) -> Self {
        Self::Identity(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Generic(value.body_text())
    }
}
