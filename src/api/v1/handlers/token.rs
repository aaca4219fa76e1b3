/*
 * Responsibility
 * - POST /api-token-auth: username + password -> access token
 * - wrong username and wrong password are indistinguishable to the client
 */
use axum::{Json, extract::State};
use validator::Validate;

use crate::{
    api::v1::{
        dto::token::{TokenRequest, TokenResponse},
        extractors::ApiJson,
    },
    error::AppError,
    services::auth::password::verify_password,
    state::AppState,
};

const INVALID_CREDENTIALS: &str = "Unable to log in with provided credentials.";

pub async fn obtain_token(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<TokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let req = req.normalized();
    req.validate()?;
    let (Some(username), Some(password)) = (req.username.into_value(), req.password.into_value())
    else {
        return Err(AppError::field("non_field_errors", INVALID_CREDENTIALS));
    };

    let user = state.repos.users.get_by_username(&username).await?;
    let Some(user) = user.filter(|u| verify_password(&password, &u.password_hash)) else {
        tracing::warn!(username = %username, "token request with invalid credentials");
        return Err(AppError::field("non_field_errors", INVALID_CREDENTIALS));
    };

    let token = state.auth.issue(user.id).map_err(|err| {
        tracing::error!(error = %err, user_id = user.id, "failed to sign access token");
        AppError::Internal
    })?;

    tracing::info!(
        user_id = user.id,
        expires_in = state.auth.ttl_seconds(),
        "access token issued"
    );
    Ok(Json(TokenResponse { token }))
}
