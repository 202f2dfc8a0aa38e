//! Discovery query building: SQL filters, great-circle distance and ordering.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use sqlx::{QueryBuilder, Sqlite};

use crate::models::{Coordinates, DiscoverQuery, Profile, Rank};

/// Mean Earth radius in metres.
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Candidates with a location; the filters are appended with [`push_filters`].
pub const SQL_DISCOVER_BASE: &str = r#"
SELECT id, name, gender, age_value, longitude, latitude
FROM users
WHERE longitude IS NOT NULL AND latitude IS NOT NULL
"#;

/// Append the exclusion, age and gender filters of `query`, AND-ed together.
pub fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, query: &DiscoverQuery) {
    push_ids_filter(builder, query.requester_id, &query.excluded_ids);
    push_age_filter(builder, query.min_age, query.max_age);
    push_gender_filter(builder, query.gender.as_deref());
}

fn push_ids_filter(builder: &mut QueryBuilder<'_, Sqlite>, requester_id: i32, excluded: &[i32]) {
    let mut ids: BTreeSet<i32> = excluded.iter().copied().collect();
    ids.insert(requester_id);

    builder.push(" AND id NOT IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(id);
    }
    separated.push_unseparated(")");
}

fn push_age_filter(builder: &mut QueryBuilder<'_, Sqlite>, min_age: i32, max_age: i32) {
    if min_age > 0 {
        builder.push(" AND age_value >= ").push_bind(min_age);
    }
    if max_age > 0 {
        builder.push(" AND age_value <= ").push_bind(max_age);
    }
}

fn push_gender_filter(builder: &mut QueryBuilder<'_, Sqlite>, gender: Option<&str>) {
    if let Some(gender) = gender.filter(|g| !g.is_empty()) {
        builder.push(" AND gender = ").push_bind(gender.to_string());
    }
}

/// Great-circle distance in metres (haversine).
pub fn distance_m(from: Coordinates, to: Coordinates) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().min(1.0).asin()
}

/// A filtered row with its exact distance from the requester.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: i32,
    pub name: String,
    pub gender: String,
    pub age: i32,
    pub distance_m: f64,
}

impl Candidate {
    pub fn into_profile(self) -> Profile {
        Profile {
            id: self.id,
            name: self.name,
            gender: self.gender,
            age: self.age,
            distance_from_me: self.distance_m as i32,
        }
    }
}

/// Sort candidates for display.
///
/// Without a rank: nearest first. With a rank: the preferred gender first
/// (when one was determined), then closest to the average liked age, then
/// nearest. Remaining ties fall back to id.
pub fn order_candidates(candidates: &mut [Candidate], rank: Option<&Rank>) {
    candidates.sort_by(|a, b| {
        let by_rank = match rank {
            Some(rank) => rank_key(a, rank).cmp(&rank_key(b, rank)),
            None => Ordering::Equal,
        };
        by_rank
            .then_with(|| a.distance_m.total_cmp(&b.distance_m))
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// (gender mismatch, age gap): lower sorts first.
fn rank_key(candidate: &Candidate, rank: &Rank) -> (bool, i32) {
    let gender_mismatch = rank
        .most_common_gender
        .as_deref()
        .is_some_and(|gender| candidate.gender != gender);
    (gender_mismatch, (candidate.age - rank.avg_age).abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: i32, gender: &str, age: i32, distance_m: f64) -> Candidate {
        Candidate {
            id,
            name: format!("C{}", id),
            gender: gender.to_string(),
            age,
            distance_m,
        }
    }

    fn fixed_set() -> Vec<Candidate> {
        vec![
            candidate(1, "male", 40, 100.0),
            candidate(2, "female", 45, 50.0),
            candidate(3, "female", 40, 900.0),
            candidate(4, "female", 35, 10.0),
            candidate(5, "male", 39, 5.0),
            candidate(6, "female", 40, 300.0),
        ]
    }

    fn ids(candidates: &[Candidate]) -> Vec<i32> {
        candidates.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_unranked_is_distance_only() {
        let mut set = fixed_set();
        order_candidates(&mut set, None);
        assert_eq!(ids(&set), vec![5, 4, 2, 1, 6, 3]);
    }

    #[test]
    fn test_ranked_gender_then_age_gap_then_distance() {
        let rank = Rank {
            avg_age: 40,
            most_common_gender: Some("female".to_string()),
        };
        let mut set = fixed_set();
        order_candidates(&mut set, Some(&rank));
        // females by |age-40| then distance, then males likewise
        assert_eq!(ids(&set), vec![6, 3, 4, 2, 1, 5]);
    }

    #[test]
    fn test_ranked_without_gender_uses_age_gap_then_distance() {
        let rank = Rank {
            avg_age: 40,
            most_common_gender: None,
        };
        let mut set = fixed_set();
        order_candidates(&mut set, Some(&rank));
        assert_eq!(ids(&set), vec![1, 6, 3, 5, 4, 2]);
    }

    #[test]
    fn test_distance_ties_break_on_id() {
        let mut set = vec![candidate(9, "male", 30, 1.0), candidate(2, "male", 30, 1.0)];
        order_candidates(&mut set, None);
        assert_eq!(ids(&set), vec![2, 9]);
    }

    #[test]
    fn test_distance_m() {
        let origin = Coordinates {
            longitude: 0.0,
            latitude: 0.0,
        };
        assert_eq!(distance_m(origin, origin), 0.0);

        // one degree of longitude on the equator
        let east = Coordinates {
            longitude: 1.0,
            latitude: 0.0,
        };
        let d = distance_m(origin, east);
        assert!((d - 111_195.0).abs() < 10.0, "{}", d);

        // London to Paris is roughly 344 km
        let london = Coordinates {
            longitude: -0.1276,
            latitude: 51.5072,
        };
        let paris = Coordinates {
            longitude: 2.3522,
            latitude: 48.8566,
        };
        let d = distance_m(london, paris);
        assert!((d - 343_500.0).abs() < 2_000.0, "{}", d);
        assert!((distance_m(paris, london) - d).abs() < 1e-6);
    }

    #[test]
    fn test_into_profile_truncates_distance() {
        let profile = candidate(1, "male", 30, 1234.9).into_profile();
        assert_eq!(profile.distance_from_me, 1234);
    }

    #[test]
    fn test_push_filters_sql() {
        let query = DiscoverQuery {
            requester_id: 1,
            min_age: 20,
            max_age: 40,
            gender: Some("female".to_string()),
            excluded_ids: vec![7, 3],
            origin: Coordinates {
                longitude: 0.0,
                latitude: 0.0,
            },
            rank: None,
        };
        let mut builder = QueryBuilder::<Sqlite>::new(SQL_DISCOVER_BASE);
        push_filters(&mut builder, &query);
        let sql = builder.sql();
        assert!(sql.ends_with(
            " AND id NOT IN (?, ?, ?) AND age_value >= ? AND age_value <= ? AND gender = ?"
        ));

        let open = DiscoverQuery {
            min_age: 0,
            max_age: 0,
            gender: None,
            excluded_ids: vec![],
            ..query
        };
        let mut builder = QueryBuilder::<Sqlite>::new(SQL_DISCOVER_BASE);
        push_filters(&mut builder, &open);
        assert!(builder.sql().ends_with(" AND id NOT IN (?)"));
    }
}
