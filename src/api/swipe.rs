//! Swipe endpoint.

use axum::{extract::State, Extension, Json};

use super::{success, ApiResult};
use crate::auth::AuthUser;
use crate::models::{SwipeRequest, SwipeResponse};
use crate::AppState;

/// POST /swipe - Record the caller's decision on another user.
pub async fn swipe(
    State(state): State<AppState>,
    Extension(AuthUser(id)): Extension<AuthUser>,
    Json(request): Json<SwipeRequest>,
) -> ApiResult<SwipeResponse> {
    let matched = state.users.swipe(id, request.id, request.ok).await?;
    success(SwipeResponse::new(request.id, matched))
}
