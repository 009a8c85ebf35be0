//! Statistics API endpoints

use axum::{Extension, Json, extract::State};
use engine::Summary;

use crate::{ServerError, server::ServerState, user::AuthUser};

/// Dashboard totals for the caller
pub async fn get_summary(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Summary>, ServerError> {
    let summary = state.engine.summary(&user.id).await?;
    Ok(Json(summary))
}
