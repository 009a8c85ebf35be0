//! Export, import and account deletion endpoints.

use api_types::data::{DeleteAccountResponse, EntityCounts, ImportRequest, ImportResponse};
use axum::{Extension, Json, extract::State};
use engine::{AccountCounts, Export};

use crate::{
    ServerError, budgets::budget_cmd, extract::ApiJson, server::ServerState,
    transactions::transaction_cmd, user::AuthUser,
};

fn map_counts(counts: AccountCounts) -> EntityCounts {
    EntityCounts {
        transactions: counts.transactions,
        budgets: counts.budgets,
    }
}

pub async fn export(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Export>, ServerError> {
    let export = state.engine.export(&user.id).await?;
    Ok(Json(export))
}

/// Every item becomes a new entity owned by the caller.
pub async fn import(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<ImportRequest>,
) -> Result<Json<ImportResponse>, ServerError> {
    let transactions = payload
        .transactions
        .into_iter()
        .map(transaction_cmd)
        .collect::<Result<Vec<_>, _>>()?;
    let budgets = payload
        .budgets
        .into_iter()
        .map(budget_cmd)
        .collect::<Result<Vec<_>, _>>()?;

    let counts = state
        .engine
        .import(&user.id, transactions, budgets)
        .await?;

    Ok(Json(ImportResponse {
        success: true,
        imported: map_counts(counts),
    }))
}

/// Removes every transaction and budget of the caller. The identity itself
/// stays with the identity provider.
pub async fn delete_account(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<DeleteAccountResponse>, ServerError> {
    let counts = state.engine.delete_account(&user.id).await?;
    Ok(Json(DeleteAccountResponse {
        success: true,
        deleted: map_counts(counts),
    }))
}
