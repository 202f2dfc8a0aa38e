//! User service: registration, login, discovery and swiping.
//!
//! All state lives in the [`ProfileStore`]; the service holds none between calls.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::{fake_user, rank, ProfileStore};
use crate::auth::{hash_password_blocking, verify_password_blocking};
use crate::errors::AppError;
use crate::models::{CreatedUser, DiscoverQuery, NewUser, Profile, Rank, Swipe, User};

/// Source of users for `create_user`.
pub type UserGenerator = Arc<dyn Fn() -> NewUser + Send + Sync>;

pub struct UserService {
    store: Arc<dyn ProfileStore>,
    generate: UserGenerator,
}

impl UserService {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self::with_generator(store, Arc::new(fake_user))
    }

    pub fn with_generator(store: Arc<dyn ProfileStore>, generate: UserGenerator) -> Self {
        Self { store, generate }
    }

    /// Generate and persist a new user.
    ///
    /// The plaintext password is returned once and only its hash is stored.
    pub async fn create_user(&self) -> Result<CreatedUser, AppError> {
        let mut new_user = (self.generate)();
        let password = std::mem::take(&mut new_user.password);
        new_user.password = hash_password_blocking(password.clone()).await?;

        let user = self.store.create_user(new_user).await.inspect_err(|e| {
            tracing::error!(error = %e, "create user");
        })?;

        tracing::info!(id = user.id, "user created");
        Ok(CreatedUser::new(&user, password))
    }

    /// Check credentials. Unknown emails and wrong passwords are indistinguishable.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AppError> {
        let user = match self.store.get_user_by_email(email).await {
            Ok(user) => user,
            Err(AppError::NotFound(_)) => return Err(AppError::InvalidCredentials),
            Err(e) => {
                tracing::error!(email, error = %e, "login get user by email");
                return Err(e);
            }
        };

        if !verify_password_blocking(password.to_string(), user.password.clone()).await? {
            return Err(AppError::InvalidCredentials);
        }
        Ok(user)
    }

    /// Candidate profiles for `id`, nearest first.
    ///
    /// `min_age`/`max_age` of 0 leave that side open and an empty `gender`
    /// matches any. With `ranked`, candidates resembling the users the
    /// requester liked are moved ahead of raw distance.
    pub async fn discover(
        &self,
        id: i32,
        min_age: i32,
        max_age: i32,
        gender: &str,
        ranked: bool,
    ) -> Result<Vec<Profile>, AppError> {
        let user = self.store.get_user(id).await.inspect_err(|e| {
            if !matches!(e, AppError::NotFound(_)) {
                tracing::error!(id, error = %e, "discover get user");
            }
        })?;

        let origin = user
            .location
            .as_ref()
            .map(|location| location.coordinates)
            .ok_or_else(|| AppError::Validation(format!("User {} has no location", id)))?;

        let excluded_ids = exclusion_set(&user);
        let rank = self.preference_rank(&user, ranked).await.inspect_err(|e| {
            tracing::error!(id, ranked, error = %e, "discover rank");
        })?;

        let query = DiscoverQuery {
            requester_id: id,
            min_age,
            max_age,
            gender: (!gender.is_empty()).then(|| gender.to_string()),
            excluded_ids,
            origin,
            rank,
        };

        self.store.discover(&query).await.inspect_err(|e| {
            tracing::error!(
                id,
                min_age,
                max_age,
                gender,
                excluded = ?query.excluded_ids,
                longitude = origin.longitude,
                latitude = origin.latitude,
                ranked,
                error = %e,
                "discover"
            );
        })
    }

    /// Rank over the users the requester liked, if ranking applies at all.
    async fn preference_rank(&self, user: &User, ranked: bool) -> Result<Option<Rank>, AppError> {
        if !ranked {
            return Ok(None);
        }
        let liked: Vec<i32> = user
            .liked_ids()
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if liked.is_empty() {
            return Ok(None);
        }
        let inputs = self.store.rank_inputs(&liked).await?;
        Ok(rank(&inputs))
    }

    /// Record `id`'s decision on `target_id` and report whether it completes a match.
    ///
    /// The reciprocal lookup is not synchronised with the write, so two users
    /// swiping on each other at the same instant may both see no match.
    pub async fn swipe(&self, id: i32, target_id: i32, ok: bool) -> Result<bool, AppError> {
        if id == target_id {
            return Err(AppError::Validation(
                "Users cannot swipe on themselves".to_string(),
            ));
        }

        for user_id in [id, target_id] {
            self.store.get_user(user_id).await.inspect_err(|e| {
                if !matches!(e, AppError::NotFound(_)) {
                    tracing::error!(id = user_id, error = %e, "swipe get user");
                }
            })?;
        }

        self.store
            .record_swipe(id, Swipe { id: target_id, ok })
            .await
            .inspect_err(|e| tracing::error!(id, target_id, error = %e, "swipe"))?;

        if !ok {
            return Ok(false);
        }

        let matched = self
            .store
            .is_reciprocal_match(id, target_id)
            .await
            .inspect_err(|e| tracing::error!(id, target_id, error = %e, "swipe match"))?;

        if matched {
            tracing::info!(id, target_id, "match");
        }
        Ok(matched)
    }
}

/// The requester plus everyone they have swiped on, sorted and deduplicated.
fn exclusion_set(user: &User) -> Vec<i32> {
    let mut ids: BTreeSet<i32> = user.swiped_ids().into_iter().collect();
    ids.insert(user.id);
    ids.into_iter().collect()
}
