//! SQLite implementation of the profile store.
//!
//! Uses prepared statements; identifiers come from an atomic counter row.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqlitePool};

use super::query::{distance_m, order_candidates, push_filters, Candidate, SQL_DISCOVER_BASE};
use crate::errors::AppError;
use crate::models::{
    Age, Coordinates, DiscoverQuery, Location, NewUser, Profile, RankInput, Swipe, User, POINT,
};
use crate::users::ProfileStore;

/// Counter row that sequences user identifiers.
const USERS_COUNTER: &str = "users";

const SQL_USER_COLUMNS: &str = "SELECT id, email, password, name, gender, age_value, dob, location_type, longitude, latitude FROM users";

/// Profile store backed by a SQLite pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Atomically increment the user sequence and return the new value.
    pub async fn next_id(&self) -> Result<i32, AppError> {
        let row = sqlx::query(
            "INSERT INTO counters (name, value) VALUES (?, 1) ON CONFLICT(name) DO UPDATE SET value = value + 1 RETURNING value",
        )
        .bind(USERS_COUNTER)
        .fetch_one(&self.pool)
        .await?;

        let value: i64 = row.get("value");
        i32::try_from(value)
            .map_err(|_| AppError::Internal("User id sequence exhausted".to_string()))
    }

    async fn swipes_of(&self, user_id: i32) -> Result<Vec<Swipe>, AppError> {
        let rows = sqlx::query("SELECT target_id, ok FROM swipes WHERE user_id = ? ORDER BY seq")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(swipe_from_row).collect())
    }

    async fn with_swipes(&self, row: Option<SqliteRow>, missing: String) -> Result<User, AppError> {
        let mut user = row
            .as_ref()
            .map(user_from_row)
            .ok_or(AppError::NotFound(missing))?;
        user.swipes = self.swipes_of(user.id).await?;
        Ok(user)
    }
}

#[async_trait]
impl ProfileStore for SqliteStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        // An id consumed here is never reused, even if the insert fails.
        let id = self.next_id().await?;
        let now = Utc::now().to_rfc3339();
        let (location_type, longitude, latitude) = match &user.location {
            Some(location) => (
                Some(location.kind.clone()),
                Some(location.coordinates.longitude),
                Some(location.coordinates.latitude),
            ),
            None => (None, None, None),
        };

        sqlx::query(
            "INSERT INTO users (id, email, password, name, gender, age_value, dob, location_type, longitude, latitude, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.name)
        .bind(&user.gender)
        .bind(user.age.value)
        .bind(user.age.dob)
        .bind(&location_type)
        .bind(longitude)
        .bind(latitude)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let duplicate = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if duplicate {
                AppError::Validation(format!("Email {} is already registered", user.email))
            } else {
                AppError::from(e)
            }
        })?;

        Ok(user.with_id(id))
    }

    async fn get_user(&self, id: i32) -> Result<User, AppError> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SQL_USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        self.with_swipes(row, format!("User {} not found", id)).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, AppError> {
        let row = sqlx::query(&format!("{} WHERE email = ?", SQL_USER_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        self.with_swipes(row, format!("User with email {} not found", email))
            .await
    }

    async fn rank_inputs(&self, ids: &[i32]) -> Result<Vec<RankInput>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new("SELECT age_value, gender FROM users WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let rows = builder.build().fetch_all(&self.pool).await?;
        Ok(rows
            .iter()
            .map(|row| RankInput {
                age: row.get("age_value"),
                gender: row.get("gender"),
            })
            .collect())
    }

    async fn discover(&self, query: &DiscoverQuery) -> Result<Vec<Profile>, AppError> {
        let mut builder = QueryBuilder::<Sqlite>::new(SQL_DISCOVER_BASE);
        push_filters(&mut builder, query);

        let rows = builder.build().fetch_all(&self.pool).await?;
        let mut candidates: Vec<Candidate> = rows
            .iter()
            .map(|row| candidate_from_row(row, query.origin))
            .collect();

        order_candidates(&mut candidates, query.rank.as_ref());
        Ok(candidates.into_iter().map(Candidate::into_profile).collect())
    }

    async fn record_swipe(&self, user_id: i32, swipe: Swipe) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT OR IGNORE INTO swipes (user_id, target_id, ok, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(swipe.id)
        .bind(swipe.ok as i32)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn is_reciprocal_match(&self, user_id: i32, target_id: i32) -> Result<bool, AppError> {
        if user_id == target_id {
            return Ok(false);
        }

        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM swipes WHERE user_id = ? AND target_id = ? AND ok = 1) AS matched",
        )
        .bind(target_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let matched: i32 = row.get("matched");
        Ok(matched != 0)
    }
}

// Helper functions for row conversion

fn user_from_row(row: &SqliteRow) -> User {
    let location_type: Option<String> = row.get("location_type");
    let longitude: Option<f64> = row.get("longitude");
    let latitude: Option<f64> = row.get("latitude");

    User {
        id: row.get("id"),
        email: row.get("email"),
        password: row.get("password"),
        name: row.get("name"),
        gender: row.get("gender"),
        age: Age {
            value: row.get("age_value"),
            dob: row.get("dob"),
        },
        location: longitude.zip(latitude).map(|(longitude, latitude)| Location {
            kind: location_type.unwrap_or_else(|| POINT.to_string()),
            coordinates: Coordinates {
                longitude,
                latitude,
            },
        }),
        swipes: Vec::new(),
    }
}

fn swipe_from_row(row: &SqliteRow) -> Swipe {
    let ok: i32 = row.get("ok");
    Swipe {
        id: row.get("target_id"),
        ok: ok != 0,
    }
}

fn candidate_from_row(row: &SqliteRow, origin: Coordinates) -> Candidate {
    let position = Coordinates {
        longitude: row.get("longitude"),
        latitude: row.get("latitude"),
    };
    Candidate {
        id: row.get("id"),
        name: row.get("name"),
        gender: row.get("gender"),
        age: row.get("age_value"),
        distance_m: distance_m(origin, position),
    }
}
