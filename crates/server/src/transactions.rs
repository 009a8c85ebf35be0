//! Transactions API endpoints

use api_types::{
    Deleted,
    transaction::{TransactionNew, TransactionType},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{MoneyCents, Transaction, TransactionCmd, TransactionKind};

use crate::{ServerError, extract::ApiJson, server::ServerState, user::AuthUser};

fn map_kind(kind: TransactionType) -> TransactionKind {
    match kind {
        TransactionType::Income => TransactionKind::Income,
        TransactionType::Expense => TransactionKind::Expense,
    }
}

/// Coerces the wire body into an engine command.
pub(crate) fn transaction_cmd(payload: TransactionNew) -> Result<TransactionCmd, ServerError> {
    let amount: MoneyCents = payload.amount.to_string().parse()?;
    Ok(TransactionCmd {
        amount,
        kind: map_kind(payload.kind),
        category: payload.category,
        description: payload.description,
        date: payload.date,
    })
}

pub async fn list(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<Transaction>>, ServerError> {
    let txs = state.engine.list_transactions(&user.id).await?;
    Ok(Json(txs))
}

pub async fn create(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<TransactionNew>,
) -> Result<(StatusCode, Json<Transaction>), ServerError> {
    let tx = state
        .engine
        .create_transaction(&user.id, transaction_cmd(payload)?)
        .await?;
    Ok((StatusCode::CREATED, Json(tx)))
}

pub async fn update(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<TransactionNew>,
) -> Result<Json<Transaction>, ServerError> {
    let tx = state
        .engine
        .update_transaction(&user.id, &id, transaction_cmd(payload)?)
        .await?;
    Ok(Json(tx))
}

pub async fn delete(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, ServerError> {
    state.engine.delete_transaction(&user.id, &id).await?;
    Ok(Json(Deleted { success: true }))
}
