//! Discovery read models: profiles, preference rank and the store query.

use serde::Serialize;

use super::Coordinates;

/// A candidate as shown to the requester.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i32,
    pub name: String,
    pub gender: String,
    pub age: i32,
    /// Whole metres from the requester.
    pub distance_from_me: i32,
}

/// Preference signal derived from the users a requester liked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rank {
    pub avg_age: i32,
    /// `None` when the top two genders are tied.
    pub most_common_gender: Option<String>,
}

/// The parts of a liked user's record that feed the ranker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankInput {
    pub age: i32,
    pub gender: String,
}

/// A fully resolved discovery request as handed to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverQuery {
    pub requester_id: i32,
    /// Inclusive; 0 means unbounded.
    pub min_age: i32,
    /// Inclusive; 0 means unbounded.
    pub max_age: i32,
    pub gender: Option<String>,
    pub excluded_ids: Vec<i32>,
    pub origin: Coordinates,
    pub rank: Option<Rank>,
}
