//! Bearer-token authentication.
//!
//! Login issues an HS256 token; protected routes run [`jwt_auth_layer`], which
//! resolves the token to an [`AuthUser`] stored in the request extensions.

mod password;
mod token;

pub use password::*;
pub use token::*;

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::errors::AppError;

/// The authenticated caller of a protected route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub i32);

/// Token authentication layer function that takes the signing secret as a parameter.
pub async fn jwt_auth_layer(secret: Arc<str>, mut request: Request, next: Next) -> Response {
    let user_id = match bearer_token(request.headers()) {
        Some(token) => decode_token(token, &secret).and_then(|claims| claims.user_id()),
        None => Err(AppError::Unauthorized(
            "Missing bearer token".to_string(),
        )),
    };

    match user_id {
        Ok(id) => {
            request.extensions_mut().insert(AuthUser(id));
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
