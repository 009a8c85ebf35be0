//! Caller identity and account creation.

use api_types::user::{Signup, SignupResponse, UserView};
use axum::{Json, extract::State, http::StatusCode};

use crate::{ServerError, extract::ApiJson, server::ServerState};

/// Identity of the caller, inserted by the auth middleware.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
}

/// Creates an identity through the identity provider.
pub async fn signup(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<Signup>,
) -> Result<(StatusCode, Json<SignupResponse>), ServerError> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ServerError::Generic(
            "email and password are required".to_string(),
        ));
    }

    let user = state
        .identity
        .create_user(payload.email.trim(), &payload.password, payload.name.trim())
        .await?;
    tracing::info!(user_id = %user.id, "user signed up");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            user: UserView {
                id: user.id,
                email: user.email,
                name: user.name,
            },
        }),
    ))
}
