use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};

use crate::core::geography::state_distance;
use crate::models::{FederalState, Gender, LookingFor, Profile, ScoringWeights};

/// Score breakdown for a compatible pair of profiles.
///
/// Produced only when both gates pass; a gated pair yields no score at
/// all rather than a zero-score breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchScore {
    /// Overall compatibility, 0-100.
    pub score: u8,
    pub age_compatibility: u8,
    pub location_score: u8,
    pub state_distance: u8,
    pub shared_interests: Vec<String>,
    pub age_preference_match: bool,
}

/// Full age in years at `today`, counting a year only once the birthday
/// has been reached.
pub fn calculate_age(birthdate: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birthdate.year();
    if (today.month(), today.day()) < (birthdate.month(), birthdate.day()) {
        age -= 1;
    }
    age
}

/// Orientation gate: each profile's stated preference must accept the
/// other's gender. Symmetric in its arguments.
pub fn is_compatible_orientation(a: &Profile, b: &Profile) -> bool {
    accepts_gender(a.looking_for, b.gender) && accepts_gender(b.looking_for, a.gender)
}

fn accepts_gender(looking_for: LookingFor, gender: Gender) -> bool {
    match looking_for {
        LookingFor::Both => true,
        LookingFor::Male => gender == Gender::Male,
        LookingFor::Female => gender == Gender::Female,
    }
}

/// Mutual age-preference gate: both derived ages must fall inside the
/// other profile's accepted range. A one-sided match does not qualify.
pub fn check_age_preferences(a: &Profile, b: &Profile, today: NaiveDate) -> bool {
    let age_a = calculate_age(a.birthdate, today);
    let age_b = calculate_age(b.birthdate, today);

    a.accepts_age(age_b) && b.accepts_age(age_a)
}

/// Age compatibility score, 0-100.
///
/// Measures how centered each age sits in the other's preferred range,
/// with a bonus for near-identical ages. Returns 0 when the mutual gate
/// fails, so it is safe to call on its own.
pub fn calculate_age_compatibility(a: &Profile, b: &Profile, today: NaiveDate) -> u8 {
    let age_a = calculate_age(a.birthdate, today);
    let age_b = calculate_age(b.birthdate, today);

    if !a.accepts_age(age_b) || !b.accepts_age(age_a) {
        return 0;
    }

    let offset_a = preference_offset(age_b, a.looking_for_age_min, a.looking_for_age_max);
    let offset_b = preference_offset(age_a, b.looking_for_age_min, b.looking_for_age_max);

    let base = ((1.0 - (offset_a + offset_b) / 2.0) * 100.0).max(0.0);

    let age_diff = (age_a - age_b).abs();
    let scored = if age_diff <= 2 {
        (base + 20.0).min(100.0)
    } else if age_diff <= 5 {
        (base + 10.0).min(100.0)
    } else {
        base
    };

    scored.round() as u8
}

/// Normalized deviation of an age from the center of a preference range.
///
/// A zero-width range accepts only its exact center: any other age is
/// treated as infinitely far off, which zeroes the base score without
/// ever dividing by zero.
fn preference_offset(age: i32, min: i32, max: i32) -> f64 {
    let center = (min + max) as f64 / 2.0;
    let half_range = (max - min) as f64 / 2.0;
    let deviation = (age as f64 - center).abs();

    if half_range == 0.0 {
        if deviation == 0.0 {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        deviation / half_range
    }
}

/// Location score, 0-100: a perfect 100 for the same city (compared
/// case-insensitively), otherwise the federal-state proximity.
pub fn calculate_location_score(
    city_a: &str,
    city_b: &str,
    state_a: FederalState,
    state_b: FederalState,
) -> u8 {
    if city_a.to_lowercase() == city_b.to_lowercase() {
        return 100;
    }

    state_distance(state_a, state_b)
}

/// Shared-interest score: 100 · |intersection| / |union|, rounded, with
/// an empty union scoring 0. Also returns the shared tags for reporting.
pub fn calculate_interest_overlap(a: &[String], b: &[String]) -> (u8, Vec<String>) {
    let shared: Vec<String> = a.iter().filter(|tag| b.contains(tag)).cloned().collect();

    let union: HashSet<&str> = a.iter().chain(b.iter()).map(String::as_str).collect();
    if union.is_empty() {
        return (0, shared);
    }

    let score = (shared.len() as f64 / union.len() as f64) * 100.0;
    (score.round() as u8, shared)
}

/// Score a pair of profiles.
///
/// Gates short-circuit: an orientation or mutual age-preference mismatch
/// returns `None` with no partial score. Deterministic for a fixed
/// `today`.
pub fn score_pair(
    a: &Profile,
    b: &Profile,
    today: NaiveDate,
    weights: &ScoringWeights,
) -> Option<MatchScore> {
    if !is_compatible_orientation(a, b) {
        return None;
    }

    if !check_age_preferences(a, b, today) {
        return None;
    }

    let age_compatibility = calculate_age_compatibility(a, b, today);
    let location_score =
        calculate_location_score(&a.city, &b.city, a.federal_state, b.federal_state);
    let state_score = state_distance(a.federal_state, b.federal_state);
    let (interest_score, shared_interests) =
        calculate_interest_overlap(&a.interests, &b.interests);

    let same_city_bonus = if location_score == 100 {
        weights.same_city_bonus
    } else {
        0.0
    };

    let total = f64::from(age_compatibility) * weights.age
        + f64::from(state_score) * weights.state_distance
        + f64::from(interest_score) * weights.interests
        + same_city_bonus;

    Some(MatchScore {
        score: total.min(100.0).round() as u8,
        age_compatibility,
        location_score,
        state_distance: state_score,
        shared_interests,
        age_preference_match: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()
    }

    fn birthdate_for_age(age: i32) -> NaiveDate {
        // Born well before the reference month/day, so the age is exact.
        NaiveDate::from_ymd_opt(2026 - age, 1, 15).unwrap()
    }

    fn test_profile(
        id: i32,
        age: i32,
        gender: Gender,
        looking_for: LookingFor,
        age_min: i32,
        age_max: i32,
    ) -> Profile {
        Profile {
            id,
            display_name: format!("Profile {id}"),
            birthdate: birthdate_for_age(age),
            gender,
            looking_for,
            looking_for_age_min: age_min,
            looking_for_age_max: age_max,
            city: "Berlin".to_string(),
            federal_state: FederalState::Berlin,
            phone_number: "+4915112345678".to_string(),
            facebook_profile: None,
            interests: vec!["hiking".to_string()],
            bio: None,
            email: format!("p{id}@example.com"),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn age_counts_only_completed_years() {
        let birthdate = NaiveDate::from_ymd_opt(1990, 9, 20).unwrap();
        // Birthday not yet reached this year
        assert_eq!(calculate_age(birthdate, today()), 35);
        // Birthday passed
        let later = NaiveDate::from_ymd_opt(2026, 9, 20).unwrap();
        assert_eq!(calculate_age(birthdate, later), 36);
    }

    #[test]
    fn orientation_gate_is_symmetric() {
        let genders = [Gender::Male, Gender::Female, Gender::Other];
        let preferences = [LookingFor::Male, LookingFor::Female, LookingFor::Both];

        for ga in genders {
            for gb in genders {
                for la in preferences {
                    for lb in preferences {
                        let a = test_profile(1, 30, ga, la, 18, 99);
                        let b = test_profile(2, 30, gb, lb, 18, 99);
                        assert_eq!(
                            is_compatible_orientation(&a, &b),
                            is_compatible_orientation(&b, &a)
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn other_gender_only_matched_by_both() {
        let other = test_profile(1, 30, Gender::Other, LookingFor::Both, 18, 99);
        let seeking_female = test_profile(2, 30, Gender::Male, LookingFor::Female, 18, 99);
        let seeking_both = test_profile(3, 30, Gender::Male, LookingFor::Both, 18, 99);

        assert!(!is_compatible_orientation(&other, &seeking_female));
        assert!(is_compatible_orientation(&other, &seeking_both));
    }

    #[test]
    fn age_gate_requires_both_directions() {
        // A accepts B's age, but B does not accept A's
        let a = test_profile(1, 40, Gender::Male, LookingFor::Female, 18, 25);
        let b = test_profile(2, 22, Gender::Female, LookingFor::Male, 20, 30);

        assert!(a.accepts_age(22));
        assert!(!b.accepts_age(40));
        assert!(!check_age_preferences(&a, &b, today()));
    }

    #[test]
    fn gated_pair_returns_none_not_zero() {
        let a = test_profile(1, 40, Gender::Male, LookingFor::Female, 18, 25);
        let b = test_profile(2, 22, Gender::Female, LookingFor::Male, 20, 30);

        assert!(score_pair(&a, &b, today(), &ScoringWeights::default()).is_none());
    }

    #[test]
    fn identical_ages_get_capped_bonus() {
        // Both 30, both centered in the other's 25-35 range: base 100,
        // bonus +20 must cap at 100 rather than overflow.
        let a = test_profile(1, 30, Gender::Male, LookingFor::Female, 25, 35);
        let b = test_profile(2, 30, Gender::Female, LookingFor::Male, 25, 35);

        assert_eq!(calculate_age_compatibility(&a, &b, today()), 100);
    }

    #[test]
    fn close_ages_get_smaller_bonus() {
        // Ages 26 and 30 (diff 4): +10 bonus branch
        let a = test_profile(1, 26, Gender::Male, LookingFor::Female, 18, 38);
        let b = test_profile(2, 30, Gender::Female, LookingFor::Male, 18, 38);

        let with_bonus = calculate_age_compatibility(&a, &b, today());
        // offsets: |30-28|/10 = 0.2, |26-28|/10 = 0.2 -> base 80, +10
        assert_eq!(with_bonus, 90);
    }

    #[test]
    fn zero_width_range_does_not_divide_by_zero() {
        // Both only accept exactly age 30, and both are 30: the gate
        // passes and the exact-center case scores full marks.
        let a = test_profile(1, 30, Gender::Male, LookingFor::Female, 30, 30);
        let b = test_profile(2, 30, Gender::Female, LookingFor::Male, 30, 30);

        assert_eq!(calculate_age_compatibility(&a, &b, today()), 100);

        // Off-center against a zero-width range never panics either.
        assert_eq!(preference_offset(31, 30, 30), f64::INFINITY);
    }

    #[test]
    fn interest_overlap_empty_lists() {
        let (score, shared) = calculate_interest_overlap(&[], &[]);
        assert_eq!(score, 0);
        assert!(shared.is_empty());
    }

    #[test]
    fn interest_overlap_half_shared() {
        let a = vec![
            "hiking".to_string(),
            "reading".to_string(),
            "cooking".to_string(),
        ];
        let b = vec![
            "cooking".to_string(),
            "hiking".to_string(),
            "movies".to_string(),
        ];

        let (score, shared) = calculate_interest_overlap(&a, &b);
        assert_eq!(shared, vec!["hiking".to_string(), "cooking".to_string()]);
        assert_eq!(score, 50); // 2 shared / 4 unique
    }

    #[test]
    fn interest_overlap_disjoint() {
        let a = vec!["hiking".to_string()];
        let b = vec!["cooking".to_string()];

        let (score, shared) = calculate_interest_overlap(&a, &b);
        assert_eq!(score, 0);
        assert!(shared.is_empty());
    }

    #[test]
    fn same_city_is_case_insensitive() {
        assert_eq!(
            calculate_location_score(
                "köln",
                "KÖLN",
                FederalState::NordrheinWestfalen,
                FederalState::NordrheinWestfalen
            ),
            100
        );
    }

    #[test]
    fn different_cities_fall_back_to_state_proximity() {
        let score = calculate_location_score(
            "München",
            "Hamburg",
            FederalState::Bayern,
            FederalState::Hamburg,
        );
        assert_eq!(score, state_distance(FederalState::Bayern, FederalState::Hamburg));
        assert!(score < 100);
    }

    #[test]
    fn full_score_breakdown_is_reported() {
        let mut a = test_profile(1, 30, Gender::Male, LookingFor::Female, 25, 35);
        let mut b = test_profile(2, 30, Gender::Female, LookingFor::Male, 25, 35);
        a.interests = vec!["hiking".to_string(), "cooking".to_string()];
        b.interests = vec!["hiking".to_string(), "movies".to_string()];

        let score = score_pair(&a, &b, today(), &ScoringWeights::default()).unwrap();

        assert_eq!(score.age_compatibility, 100);
        assert_eq!(score.location_score, 100); // same city
        assert_eq!(score.state_distance, 100); // same state
        assert_eq!(score.shared_interests, vec!["hiking".to_string()]);
        assert!(score.age_preference_match);
        // 100*0.25 + 100*0.35 + 33*0.30 + 10 = 79.9 -> 80
        assert_eq!(score.score, 80);
    }

    #[test]
    fn scoring_is_deterministic() {
        let a = test_profile(1, 28, Gender::Male, LookingFor::Female, 22, 34);
        let b = test_profile(2, 31, Gender::Female, LookingFor::Both, 25, 40);

        let first = score_pair(&a, &b, today(), &ScoringWeights::default());
        let second = score_pair(&a, &b, today(), &ScoringWeights::default());
        assert_eq!(first, second);
    }
}
