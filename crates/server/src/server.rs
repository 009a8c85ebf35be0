use axum::{
    Json, Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};
use api_types::health::Health;
use chrono::Utc;

use std::sync::Arc;

use crate::{
    IdentityError, IdentityProvider, ServerError, account, budgets, statistics, transactions, user,
};
use engine::Engine;

/// Handles shared by every request. Both collaborators are injected by the
/// caller; the server keeps no other state.
#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl ServerState {
    pub fn new(engine: Engine, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            engine: Arc::new(engine),
            identity,
        }
    }
}

/// Resolves the bearer token to a user id through the identity provider and
/// stores it as an [`user::AuthUser`] extension.
async fn auth(
    State(state): State<ServerState>,
    auth_header: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Ok(TypedHeader(Authorization(bearer))) = auth_header else {
        return Err(ServerError::Unauthorized);
    };
    if bearer.token().is_empty() {
        return Err(ServerError::Unauthorized);
    }

    let id = match state.identity.verify_token(bearer.token()).await {
        Ok(id) => id,
        Err(IdentityError::InvalidToken) => return Err(ServerError::Unauthorized),
        Err(err) => {
            return Err(ServerError::Internal(format!("token verification failed: {err}")));
        }
    };

    request.extensions_mut().insert(user::AuthUser { id });
    Ok(next.run(request).await)
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
    })
}

/// Every route, nested under `prefix` (`""` or `"/"` mounts at the root).
pub fn router(state: ServerState, prefix: &str) -> Router {
    let protected = Router::new()
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/transactions/{id}",
            put(transactions::update).delete(transactions::delete),
        )
        .route("/budgets", get(budgets::list).post(budgets::create))
        .route(
            "/budgets/{id}",
            put(budgets::update).delete(budgets::delete),
        )
        .route("/export", get(account::export))
        .route("/import", post(account::import))
        .route("/delete-account", delete(account::delete_account))
        .route("/summary", get(statistics::get_summary))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    let api = Router::new()
        .route("/health", get(health))
        .route("/signup", post(user::signup))
        .merge(protected)
        .with_state(state);

    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return api;
    }
    let prefix = if prefix.starts_with('/') {
        prefix.to_string()
    } else {
        format!("/{prefix}")
    };
    Router::new().nest(&prefix, api)
}

pub async fn run_with_listener(
    state: ServerState,
    prefix: &str,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}{}", addr, prefix);

    axum::serve(listener, router(state, prefix)).await
}
