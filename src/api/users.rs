//! Registration and login endpoints.

use axum::{extract::State, Json};

use super::{success, ApiResult};
use crate::auth::issue_token;
use crate::errors::AppError;
use crate::models::{CreatedUser, LoginRequest, LoginResponse};
use crate::AppState;

/// POST /user/create - Create a random user.
pub async fn create_user(State(state): State<AppState>) -> ApiResult<CreatedUser> {
    let user = state.users.create_user().await?;
    success(user)
}

/// POST /login - Exchange credentials for a bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    // Validate required fields
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let user = state.users.login(&request.email, &request.password).await?;
    let token = issue_token(
        user.id,
        &user.name,
        &state.config.jwt_secret,
        state.config.token_ttl_hours,
    )?;

    success(LoginResponse { token })
}
