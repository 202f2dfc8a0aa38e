//! Preference ranking over the users a requester liked.

use std::collections::HashMap;

use crate::models::{Rank, RankInput};

/// Derive a [`Rank`] from the records of liked users.
///
/// The average age is truncated. The most common gender is only reported when
/// it strictly outnumbers the runner-up. Returns `None` for an empty input.
pub fn rank(liked: &[RankInput]) -> Option<Rank> {
    if liked.is_empty() {
        return None;
    }

    let total_age: i64 = liked.iter().map(|input| i64::from(input.age)).sum();
    let avg_age = (total_age / liked.len() as i64) as i32;

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for input in liked {
        *counts.entry(input.gender.as_str()).or_default() += 1;
    }
    let mut by_count: Vec<(&str, usize)> = counts.into_iter().collect();
    by_count.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let most_common_gender = match by_count.as_slice() {
        [(gender, _)] => Some(gender.to_string()),
        [(gender, first), (_, second), ..] if first > second => Some(gender.to_string()),
        _ => None,
    };

    Some(Rank {
        avg_age,
        most_common_gender,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(age: i32, gender: &str) -> RankInput {
        RankInput {
            age,
            gender: gender.to_string(),
        }
    }

    #[test]
    fn test_empty_liked_set_has_no_rank() {
        assert_eq!(rank(&[]), None);
    }

    #[test]
    fn test_single_gender_is_used_unconditionally() {
        let rank = rank(&[input(40, "female")]).unwrap();
        assert_eq!(rank.avg_age, 40);
        assert_eq!(rank.most_common_gender.as_deref(), Some("female"));
    }

    #[test]
    fn test_plurality_gender_and_truncated_mean() {
        let rank = rank(&[
            input(25, "female"),
            input(30, "male"),
            input(28, "female"),
            input(33, "female"),
        ])
        .unwrap();
        // 116 / 4 = 29
        assert_eq!(rank.avg_age, 29);
        assert_eq!(rank.most_common_gender.as_deref(), Some("female"));

        let rank = super::rank(&[input(20, "male"), input(21, "male"), input(21, "female")]).unwrap();
        // 62 / 3 = 20.67
        assert_eq!(rank.avg_age, 20);
        assert_eq!(rank.most_common_gender.as_deref(), Some("male"));
    }

    #[test]
    fn test_tied_genders_drop_gender_bias() {
        let rank = rank(&[
            input(30, "male"),
            input(40, "female"),
            input(35, "female"),
            input(45, "male"),
        ])
        .unwrap();
        assert_eq!(rank.avg_age, 37);
        assert_eq!(rank.most_common_gender, None);
    }

    #[test]
    fn test_only_top_two_counts_matter() {
        let rank = rank(&[
            input(30, "female"),
            input(30, "female"),
            input(30, "male"),
            input(30, "other"),
        ])
        .unwrap();
        assert_eq!(rank.most_common_gender.as_deref(), Some("female"));
    }
}
