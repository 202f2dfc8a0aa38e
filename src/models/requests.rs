//! Request and response bodies for the HTTP API.

use serde::{Deserialize, Serialize};

use super::{Profile, User};
use crate::errors::AppError;

/// Youngest age a discovery filter may ask for.
pub const MIN_AGE_FLOOR: i32 = 18;
/// Oldest age a discovery filter may ask for.
pub const MAX_AGE_CEILING: i32 = 100;

/// Request body for logging in.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// A freshly created user. The only place the plaintext password is ever exposed.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedUser {
    pub id: i32,
    pub email: String,
    pub password: String,
    pub name: String,
    pub gender: String,
    pub age: i32,
}

impl CreatedUser {
    pub fn new(user: &User, plaintext_password: String) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            password: plaintext_password,
            name: user.name.clone(),
            gender: user.gender.clone(),
            age: user.age.value,
        }
    }
}

/// Query string of `GET /discover`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoverParams {
    #[serde(default)]
    pub gender: String,
    #[serde(default, rename = "min-age")]
    pub min_age: i32,
    #[serde(default, rename = "max-age")]
    pub max_age: i32,
    #[serde(default)]
    pub ranked: bool,
}

impl DiscoverParams {
    /// Clamp the filters into their domain.
    ///
    /// Out-of-range ages are pulled to the nearest allowed value and unknown
    /// genders fall back to "any". Bounds that cross are rejected.
    pub fn validate(mut self) -> Result<Self, AppError> {
        if self.min_age > 0 && self.min_age < MIN_AGE_FLOOR {
            self.min_age = MIN_AGE_FLOOR;
        }
        if self.max_age > MAX_AGE_CEILING {
            self.max_age = MAX_AGE_CEILING;
        }
        if self.min_age < 0 || self.max_age < 0 {
            return Err(AppError::Validation(
                "Age bounds must not be negative".to_string(),
            ));
        }
        if self.min_age > 0 && self.max_age > 0 && self.min_age > self.max_age {
            return Err(AppError::Validation(format!(
                "min-age {} is greater than max-age {}",
                self.min_age, self.max_age
            )));
        }
        match self.gender.as_str() {
            "" | "male" | "female" => {}
            _ => self.gender.clear(),
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscoverResponse {
    pub results: Vec<Profile>,
}

/// Request body of `POST /swipe`.
#[derive(Debug, Clone, Deserialize)]
pub struct SwipeRequest {
    pub id: i32,
    pub ok: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeResponse {
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_id: Option<i32>,
}

impl SwipeResponse {
    pub fn new(target_id: i32, matched: bool) -> Self {
        Self {
            matched,
            matched_id: matched.then_some(target_id),
        }
    }
}
