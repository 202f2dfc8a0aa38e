//! User domain: the store boundary, discovery, swiping and preference ranking.

mod fake;
mod ranker;
mod service;

pub use fake::*;
pub use ranker::*;
pub use service::*;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::{DiscoverQuery, NewUser, Profile, RankInput, Swipe, User};

/// Persistence operations the user service depends on.
///
/// `get_user` and `get_user_by_email` report a missing user as
/// [`AppError::NotFound`]; every other failure is a storage error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Assign the next identifier from the user sequence and insert the user.
    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;

    async fn get_user(&self, id: i32) -> Result<User, AppError>;

    async fn get_user_by_email(&self, email: &str) -> Result<User, AppError>;

    /// Age and gender of every existing user in `ids`. Unknown ids are skipped.
    async fn rank_inputs(&self, ids: &[i32]) -> Result<Vec<RankInput>, AppError>;

    /// Nearest candidates to `query.origin` that pass the filters, ordered
    /// by rank preference (when present) and then distance.
    async fn discover(&self, query: &DiscoverQuery) -> Result<Vec<Profile>, AppError>;

    /// Append a swipe to `user_id`'s history. Exact repeats are ignored.
    async fn record_swipe(&self, user_id: i32, swipe: Swipe) -> Result<(), AppError>;

    /// Whether `target_id` has ever swiped positively on `user_id`.
    async fn is_reciprocal_match(&self, user_id: i32, target_id: i32) -> Result<bool, AppError>;
}
