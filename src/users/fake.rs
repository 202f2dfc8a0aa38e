//! Random user generation backing `POST /user/create`.

use chrono::{Duration, Months, NaiveDate, Utc};
use rand::{distributions::Alphanumeric, seq::SliceRandom, Rng};
use uuid::Uuid;

use crate::models::{Age, Location, NewUser};

const FIRST_NAMES: &[&str] = &[
    "Amelia", "Aisha", "Bilal", "Chloe", "Daniel", "Elena", "Farah", "George", "Hana", "Ibrahim",
    "Isla", "Jack", "Leila", "Maya", "Noah", "Omar", "Priya", "Ravi", "Sofia", "Yusuf",
];

const LAST_NAMES: &[&str] = &[
    "Ahmed", "Brown", "Chen", "Davies", "Evans", "Garcia", "Hussain", "Khan", "Lopez", "Miller",
    "Nguyen", "Patel", "Rossi", "Smith", "Taylor", "Wilson",
];

const GENDERS: &[&str] = &["male", "female"];

const PASSWORD_LEN: usize = 32;

/// Generate a user with a random identity, birth date and location.
///
/// The returned password is plaintext.
pub fn fake_user() -> NewUser {
    fake_user_with(&mut rand::thread_rng(), Utc::now().date_naive())
}

pub fn fake_user_with<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate) -> NewUser {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Alex");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Doe");
    let gender = GENDERS.choose(rng).copied().unwrap_or("female");

    let token = Uuid::new_v4().simple().to_string();
    let email = format!(
        "{}.{}.{}@example.com",
        first.to_lowercase(),
        last.to_lowercase(),
        &token[..8]
    );

    let password = (0..PASSWORD_LEN)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect();

    NewUser {
        email,
        password,
        name: format!("{} {}", first, last),
        gender: gender.to_string(),
        age: Age::from_dob(today, fake_dob(rng, today)),
        location: Some(Location::point(
            rng.gen_range(-180.0..=180.0),
            rng.gen_range(-90.0..=90.0),
        )),
    }
}

/// A birth date between 100 and 18 years before `today`.
fn fake_dob<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate) -> NaiveDate {
    let oldest = today - Months::new(100 * 12);
    let youngest = today - Months::new(18 * 12);
    let span = (youngest - oldest).num_days();
    oldest + Duration::days(rng.gen_range(0..=span))
}
