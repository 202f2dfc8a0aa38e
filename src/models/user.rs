//! User record and its embedded value types.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// GeoJSON type tag used for every stored location.
pub const POINT: &str = "Point";

/// A stored user.
///
/// `password` holds the Argon2id hash, never the plaintext.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password: String,
    pub name: String,
    pub gender: String,
    pub age: Age,
    pub location: Option<Location>,
    pub swipes: Vec<Swipe>,
}

impl User {
    /// Every user this user has swiped on, in swipe order, regardless of decision.
    pub fn swiped_ids(&self) -> Vec<i32> {
        self.swipes.iter().map(|swipe| swipe.id).collect()
    }

    /// Users this user has swiped on positively.
    pub fn liked_ids(&self) -> Vec<i32> {
        self.swipes
            .iter()
            .filter(|swipe| swipe.ok)
            .map(|swipe| swipe.id)
            .collect()
    }
}

/// A user that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: String,
    pub gender: String,
    pub age: Age,
    pub location: Option<Location>,
}

impl NewUser {
    /// Attach the store-assigned identifier.
    pub fn with_id(self, id: i32) -> User {
        User {
            id,
            email: self.email,
            password: self.password,
            name: self.name,
            gender: self.gender,
            age: self.age,
            location: self.location,
            swipes: Vec::new(),
        }
    }
}

/// Age in whole years plus the date of birth it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Age {
    pub value: i32,
    pub dob: NaiveDate,
}

impl Age {
    pub fn from_dob(today: NaiveDate, dob: NaiveDate) -> Self {
        Self {
            value: calculate_age(today, dob),
            dob,
        }
    }
}

/// Completed years between `dob` and `today`.
pub fn calculate_age(today: NaiveDate, dob: NaiveDate) -> i32 {
    let mut years = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        years -= 1;
    }
    years
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Coordinates,
}

impl Location {
    pub fn point(longitude: f64, latitude: f64) -> Self {
        Self {
            kind: POINT.to_string(),
            coordinates: Coordinates {
                longitude,
                latitude,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

/// One swipe decision on another user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swipe {
    pub id: i32,
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_calculate_age_before_and_after_birthday() {
        let dob = date(1990, 6, 15);
        assert_eq!(calculate_age(date(2020, 6, 14), dob), 29);
        assert_eq!(calculate_age(date(2020, 6, 15), dob), 30);
        assert_eq!(calculate_age(date(2020, 12, 31), dob), 30);
    }

    #[test]
    fn test_swipe_id_projections() {
        let user = NewUser {
            email: "a@example.com".to_string(),
            password: "hash".to_string(),
            name: "A".to_string(),
            gender: "female".to_string(),
            age: Age::from_dob(date(2024, 1, 1), date(1990, 1, 1)),
            location: Some(Location::point(0.0, 0.0)),
        };
        let mut user = user.with_id(1);
        user.swipes = vec![
            Swipe { id: 3, ok: false },
            Swipe { id: 5, ok: true },
            Swipe { id: 8, ok: true },
        ];

        assert_eq!(user.swiped_ids(), vec![3, 5, 8]);
        assert_eq!(user.liked_ids(), vec![5, 8]);
    }

    #[test]
    fn test_location_serializes_as_geojson_point() {
        let json = serde_json::to_value(Location::point(-0.12, 51.5)).unwrap();
        assert_eq!(json["type"], "Point");
        assert_eq!(json["coordinates"]["longitude"], -0.12);
        assert_eq!(json["coordinates"]["latitude"], 51.5);
    }
}
