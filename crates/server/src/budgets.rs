//! Budgets API endpoints

use api_types::{
    Deleted,
    budget::{BudgetNew, BudgetPeriod as ApiPeriod},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Budget, BudgetCmd, BudgetPeriod, BudgetStatus, MoneyCents};

use crate::{ServerError, extract::ApiJson, server::ServerState, user::AuthUser};

fn map_period(period: ApiPeriod) -> BudgetPeriod {
    match period {
        ApiPeriod::Weekly => BudgetPeriod::Weekly,
        ApiPeriod::Monthly => BudgetPeriod::Monthly,
    }
}

pub(crate) fn budget_cmd(payload: BudgetNew) -> Result<BudgetCmd, ServerError> {
    let amount: MoneyCents = payload.amount.to_string().parse()?;
    Ok(BudgetCmd {
        category: payload.category,
        amount,
        period: map_period(payload.period),
    })
}

/// Budgets with `spent` and `remaining` derived from the caller's
/// transactions.
pub async fn list(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<BudgetStatus>>, ServerError> {
    let budgets = state.engine.list_budgets(&user.id).await?;
    Ok(Json(budgets))
}

pub async fn create(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<BudgetNew>,
) -> Result<(StatusCode, Json<Budget>), ServerError> {
    let budget = state
        .engine
        .create_budget(&user.id, budget_cmd(payload)?)
        .await?;
    Ok((StatusCode::CREATED, Json(budget)))
}

pub async fn update(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<BudgetNew>,
) -> Result<Json<Budget>, ServerError> {
    let budget = state
        .engine
        .update_budget(&user.id, &id, budget_cmd(payload)?)
        .await?;
    Ok(Json(budget))
}

pub async fn delete(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, ServerError> {
    state.engine.delete_budget(&user.id, &id).await?;
    Ok(Json(Deleted { success: true }))
}
