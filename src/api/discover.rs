//! Discovery endpoint.

use axum::{
    extract::{Query, State},
    Extension,
};

use super::{success, ApiResult};
use crate::auth::AuthUser;
use crate::models::{DiscoverParams, DiscoverResponse};
use crate::AppState;

/// GET /discover - Nearby candidates for the caller.
pub async fn discover(
    State(state): State<AppState>,
    Extension(AuthUser(id)): Extension<AuthUser>,
    Query(params): Query<DiscoverParams>,
) -> ApiResult<DiscoverResponse> {
    let params = params.validate()?;

    let results = state
        .users
        .discover(
            id,
            params.min_age,
            params.max_age,
            &params.gender,
            params.ranked,
        )
        .await?;

    success(DiscoverResponse { results })
}
